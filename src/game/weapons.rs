//! Weapon Catalog
//!
//! Named weapon archetypes used to equip newly spawned actors, plus the
//! per-actor [`Weapon`] instance that combat and visibility read.

use serde::{Serialize, Deserialize};

use crate::error::GameError;

/// A weapon carried by one actor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Weapon {
    /// Archetype name.
    pub name: String,
    /// Minimum hex distance at which the weapon can fire.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_range: Option<u32>,
    /// Maximum hex distance; also the carrier's sight range.
    #[serde(alias = "range")]
    pub max_range: u32,
    /// Health removed per landed attack.
    pub damage: u32,
    /// Rounds left. `None` means unlimited.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ammo: Option<u32>,
}

impl Weapon {
    /// Check whether a target at hex `distance` is inside the firing band.
    #[inline]
    pub fn in_range(&self, distance: u32) -> bool {
        distance >= self.min_range.unwrap_or(0) && distance <= self.max_range
    }

    /// Check whether the weapon can fire at all.
    #[inline]
    pub fn has_ammo(&self) -> bool {
        self.ammo != Some(0)
    }

    /// Spend one round if ammo is tracked.
    #[inline]
    pub fn spend_round(&mut self) {
        if let Some(ammo) = self.ammo.as_mut() {
            *ammo = ammo.saturating_sub(1);
        }
    }
}

/// A named weapon template.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeaponArchetype {
    /// Archetype id, copied into [`Weapon::name`].
    pub id: String,
    /// Minimum range.
    #[serde(default)]
    pub min_range: Option<u32>,
    /// Maximum range.
    pub max_range: u32,
    /// Damage per hit.
    pub damage: u32,
    /// Starting ammunition. `None` means unlimited.
    #[serde(default)]
    pub ammo: Option<u32>,
}

impl WeaponArchetype {
    /// Create a fresh weapon from this template.
    pub fn equip(&self) -> Weapon {
        Weapon {
            name: self.id.clone(),
            min_range: self.min_range,
            max_range: self.max_range,
            damage: self.damage,
            ammo: self.ammo,
        }
    }
}

/// Table of weapon archetypes, in loadout order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeaponCatalog {
    archetypes: Vec<WeaponArchetype>,
}

impl Default for WeaponCatalog {
    fn default() -> Self {
        Self {
            archetypes: vec![
                WeaponArchetype {
                    id: "rifle".to_string(),
                    min_range: None,
                    max_range: 5,
                    damage: 10,
                    ammo: None,
                },
                WeaponArchetype {
                    id: "carbine".to_string(),
                    min_range: None,
                    max_range: 3,
                    damage: 15,
                    ammo: None,
                },
                WeaponArchetype {
                    id: "marksman".to_string(),
                    min_range: Some(2),
                    max_range: 7,
                    damage: 25,
                    ammo: Some(6),
                },
            ],
        }
    }
}

impl WeaponCatalog {
    /// Build a catalog, rejecting empty tables and inverted range bands.
    pub fn new(archetypes: Vec<WeaponArchetype>) -> Result<Self, GameError> {
        if archetypes.is_empty() {
            return Err(GameError::validation("weapon catalog is empty"));
        }
        for archetype in &archetypes {
            if let Some(min) = archetype.min_range {
                if min > archetype.max_range {
                    return Err(GameError::validation(format!(
                        "weapon {} has minRange {} above maxRange {}",
                        archetype.id, min, archetype.max_range
                    )));
                }
            }
        }
        Ok(Self { archetypes })
    }

    /// Parse a catalog from a JSON array of archetypes.
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let archetypes: Vec<WeaponArchetype> = serde_json::from_str(json)
            .map_err(|e| GameError::validation(format!("invalid weapon catalog: {}", e)))?;
        Self::new(archetypes)
    }

    /// Look up an archetype by id.
    pub fn get(&self, id: &str) -> Option<&WeaponArchetype> {
        self.archetypes.iter().find(|a| a.id == id)
    }

    /// Weapon for squad member `slot`, cycling through the catalog.
    pub fn loadout(&self, slot: usize) -> Weapon {
        self.archetypes[slot % self.archetypes.len()].equip()
    }

    /// Number of archetypes.
    pub fn len(&self) -> usize {
        self.archetypes.len()
    }

    /// Always false for a validated catalog.
    pub fn is_empty(&self) -> bool {
        self.archetypes.is_empty()
    }
}
