//! Engine Configuration
//!
//! Grid size, terrain density, sight range, seeding, and the weapon catalog.
//! Built from defaults or from `HEX_TACTICS_*` environment variables.

use std::str::FromStr;
use tracing::warn;

use crate::DEFAULT_SIGHT_RANGE;
use crate::error::GameError;
use crate::game::weapons::WeaponCatalog;

/// Smallest grid that fits spawn blocks in every corner without overlap.
pub const MIN_GRID_SIZE: usize = 8;

/// Highest accepted terrain density.
pub const MAX_BLOCKED_PERCENT: u8 = 60;

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Grid rows.
    pub rows: usize,
    /// Grid columns.
    pub cols: usize,
    /// Chance (0-100) that a non-spawn cell is blocked.
    pub blocked_percent: u8,
    /// Sight range of unarmed actors, in hexes.
    pub default_sight_range: u32,
    /// Mixed with each game id to seed terrain generation.
    pub base_seed: u64,
    /// Weapons handed to new squads.
    pub weapon_catalog: WeaponCatalog,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rows: 20,
            cols: 20,
            blocked_percent: 15,
            default_sight_range: DEFAULT_SIGHT_RANGE,
            base_seed: 0,
            weapon_catalog: WeaponCatalog::default(),
        }
    }
}

impl EngineConfig {
    /// Build from the environment.
    ///
    /// Reads `HEX_TACTICS_ROWS`, `HEX_TACTICS_COLS`,
    /// `HEX_TACTICS_BLOCKED_PERCENT`, `HEX_TACTICS_SIGHT_RANGE`,
    /// `HEX_TACTICS_SEED`, and `HEX_TACTICS_WEAPONS` (path to a JSON weapon
    /// catalog). Unset or unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            rows: env_or("HEX_TACTICS_ROWS", defaults.rows),
            cols: env_or("HEX_TACTICS_COLS", defaults.cols),
            blocked_percent: env_or("HEX_TACTICS_BLOCKED_PERCENT", defaults.blocked_percent),
            default_sight_range: env_or("HEX_TACTICS_SIGHT_RANGE", defaults.default_sight_range),
            base_seed: env_or("HEX_TACTICS_SEED", defaults.base_seed),
            weapon_catalog: catalog_from_env().unwrap_or(defaults.weapon_catalog),
        }
    }

    /// Reject configurations the engine cannot run with.
    pub fn validate(&self) -> Result<(), GameError> {
        if self.rows < MIN_GRID_SIZE || self.cols < MIN_GRID_SIZE {
            return Err(GameError::validation(format!(
                "grid must be at least {}x{}, got {}x{}",
                MIN_GRID_SIZE, MIN_GRID_SIZE, self.rows, self.cols
            )));
        }
        if self.blocked_percent > MAX_BLOCKED_PERCENT {
            return Err(GameError::validation(format!(
                "blocked percent {} exceeds {}",
                self.blocked_percent, MAX_BLOCKED_PERCENT
            )));
        }
        Ok(())
    }
}

/// Parse an environment variable, falling back to `default`.
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring unparsable {}={:?}", key, raw);
            default
        }),
        Err(_) => default,
    }
}

/// Load the catalog named by `HEX_TACTICS_WEAPONS`, if set and valid.
fn catalog_from_env() -> Option<WeaponCatalog> {
    let path = std::env::var("HEX_TACTICS_WEAPONS").ok()?;
    let json = match std::fs::read_to_string(&path) {
        Ok(json) => json,
        Err(e) => {
            warn!("Cannot read weapon catalog {}: {}", path, e);
            return None;
        }
    };
    match WeaponCatalog::from_json(&json) {
        Ok(catalog) => Some(catalog),
        Err(e) => {
            warn!("Ignoring weapon catalog {}: {}", path, e);
            None
        }
    }
}
