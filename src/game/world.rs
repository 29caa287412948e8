//! Grid World
//!
//! Terrain grid, actor roster, terrain generation, and squad spawning.
//!
//! Terrain is stored row-major in odd-q offset layout; every position that
//! crosses into hex space goes through [`GridPos::to_hex`].

use serde::{Serialize, Deserialize};

use crate::{ACTOR_MAX_HEALTH, SQUAD_FORMATION_WIDTH, SQUAD_SIZE, MAX_SUPPORTED_PLAYERS};
use crate::core::hash::{StateHash, StateHasher};
use crate::core::hex::GridPos;
use crate::core::rng::DeterministicRng;
use crate::error::{EntityKind, GameError};
use crate::game::state::{ActorId, EntityId, PlayerId};
use crate::game::weapons::{Weapon, WeaponCatalog};

// =============================================================================
// TERRAIN
// =============================================================================

/// Content of one grid cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum Terrain {
    /// Passable and transparent.
    #[default]
    Empty = 0,
    /// Impassable and opaque.
    Blocked = 1,
    /// Hidden from the viewer. Only ever appears in a player's filtered view.
    Unexplored = 2,
}

// =============================================================================
// ACTOR
// =============================================================================

/// Life state of an actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActorState {
    /// Health above zero.
    Alive,
    /// Health is zero.
    Dead,
}

/// A unit on the grid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    /// Unique within the world.
    pub id: ActorId,
    /// Current position, always in bounds.
    pub pos: GridPos,
    /// Owning player.
    pub owner: PlayerId,
    /// Alive or dead; dead exactly when health is zero.
    pub state: ActorState,
    /// Remaining health.
    pub health: u32,
    /// Carried weapon. Actors without one cannot attack.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weapon: Option<Weapon>,
}

impl Actor {
    /// Create a live actor at full health.
    pub fn new(id: ActorId, pos: GridPos, owner: PlayerId, weapon: Option<Weapon>) -> Self {
        Self {
            id,
            pos,
            owner,
            state: ActorState::Alive,
            health: ACTOR_MAX_HEALTH,
            weapon,
        }
    }

    /// Check if the actor is alive.
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.state == ActorState::Alive
    }

    /// Remove `damage` health, clamping at zero. Returns true if this killed the actor.
    pub fn apply_damage(&mut self, damage: u32) -> bool {
        let was_alive = self.is_alive();
        self.health = self.health.saturating_sub(damage);
        if self.health == 0 {
            self.state = ActorState::Dead;
        }
        was_alive && !self.is_alive()
    }
}

// =============================================================================
// WORLD
// =============================================================================

/// Terrain grid plus every actor in the game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct World {
    terrain: Vec<Vec<Terrain>>,
    /// All actors, in creation order.
    pub actors: Vec<Actor>,
    next_actor_id: u32,
}

impl World {
    /// Create an all-empty world.
    pub fn new_empty(rows: usize, cols: usize) -> Self {
        Self {
            terrain: vec![vec![Terrain::Empty; cols]; rows],
            actors: Vec::new(),
            next_actor_id: 0,
        }
    }

    /// Create a world from explicit terrain.
    ///
    /// Rows must have equal length and contain no `Unexplored` cells.
    pub fn from_terrain(terrain: Vec<Vec<Terrain>>) -> Result<Self, GameError> {
        let cols = terrain.first().map(Vec::len).unwrap_or(0);
        if terrain.iter().any(|row| row.len() != cols) {
            return Err(GameError::InvalidWorld("terrain rows differ in length".to_string()));
        }
        if terrain.iter().flatten().any(|t| *t == Terrain::Unexplored) {
            return Err(GameError::InvalidWorld(
                "canonical terrain cannot contain UNEXPLORED cells".to_string(),
            ));
        }
        Ok(Self {
            terrain,
            actors: Vec::new(),
            next_actor_id: 0,
        })
    }

    /// Generate terrain from a seed.
    ///
    /// Each cell is blocked with probability `blocked_percent`, except the
    /// spawn blocks, which are always empty.
    pub fn generate(rows: usize, cols: usize, blocked_percent: u8, seed: u64) -> Self {
        let mut rng = DeterministicRng::new(seed);
        let reserved: Vec<GridPos> = (0..MAX_SUPPORTED_PLAYERS as u8)
            .filter_map(|slot| spawn_anchor(rows, cols, slot))
            .collect();

        let mut world = Self::new_empty(rows, cols);
        for (row, cells) in world.terrain.iter_mut().enumerate() {
            for (col, cell) in cells.iter_mut().enumerate() {
                let pos = GridPos::new(row as i32, col as i32);
                if reserved.iter().any(|anchor| in_formation(*anchor, pos)) {
                    continue;
                }
                if rng.roll_percent(blocked_percent) {
                    *cell = Terrain::Blocked;
                }
            }
        }
        world
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.terrain.len()
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.terrain.first().map(Vec::len).unwrap_or(0)
    }

    /// Raw terrain rows.
    pub fn terrain(&self) -> &[Vec<Terrain>] {
        &self.terrain
    }

    /// Check that a position lies inside the grid.
    #[inline]
    pub fn in_bounds(&self, pos: GridPos) -> bool {
        pos.in_bounds(self.rows(), self.cols())
    }

    /// Terrain at `pos`, or `None` when out of bounds.
    #[inline]
    pub fn terrain_at(&self, pos: GridPos) -> Option<Terrain> {
        if !self.in_bounds(pos) {
            return None;
        }
        Some(self.terrain[pos.row as usize][pos.col as usize])
    }

    /// Overwrite one terrain cell. Out-of-bounds writes are ignored.
    pub fn set_terrain(&mut self, pos: GridPos, terrain: Terrain) {
        if self.in_bounds(pos) && terrain != Terrain::Unexplored {
            self.terrain[pos.row as usize][pos.col as usize] = terrain;
        }
    }

    /// Check that an actor may stand on `pos`: in bounds and not blocked.
    #[inline]
    pub fn is_passable(&self, pos: GridPos) -> bool {
        matches!(self.terrain_at(pos), Some(Terrain::Empty))
    }

    /// Check whether any actor stands on `pos`.
    pub fn is_occupied(&self, pos: GridPos) -> bool {
        self.actors.iter().any(|a| a.pos == pos)
    }

    /// Find an actor by id.
    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.iter().find(|a| a.id == id)
    }

    /// Find an actor by id, mutably.
    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.iter_mut().find(|a| a.id == id)
    }

    /// Index of an actor in the roster.
    pub fn actor_index(&self, id: ActorId) -> Option<usize> {
        self.actors.iter().position(|a| a.id == id)
    }

    /// Find an actor by id, or fail with NotFound.
    pub fn require_actor(&self, id: ActorId) -> Result<&Actor, GameError> {
        self.actor(id)
            .ok_or_else(|| GameError::not_found(EntityKind::Actor, id.raw()))
    }

    /// All actors owned by `owner`, in roster order.
    pub fn actors_owned_by(&self, owner: PlayerId) -> impl Iterator<Item = &Actor> {
        self.actors.iter().filter(move |a| a.owner == owner)
    }

    /// Add one actor at `pos`. Fails if the cell is out of bounds or blocked.
    pub fn add_actor(
        &mut self,
        owner: PlayerId,
        pos: GridPos,
        weapon: Option<Weapon>,
    ) -> Result<ActorId, GameError> {
        if !self.is_passable(pos) {
            return Err(GameError::InvalidWorld(format!(
                "cannot place actor at ({}, {})",
                pos.row, pos.col
            )));
        }
        let id = ActorId::new(self.next_actor_id);
        self.next_actor_id += 1;
        self.actors.push(Actor::new(id, pos, owner, weapon));
        Ok(id)
    }

    /// Spawn a full squad for `owner` in spawn block `slot`.
    ///
    /// The squad is a square formation anchored at the slot's corner; weapons
    /// are handed out in catalog loadout order. Nothing is added on failure.
    pub fn spawn_squad(
        &mut self,
        owner: PlayerId,
        slot: u8,
        catalog: &WeaponCatalog,
    ) -> Result<Vec<ActorId>, GameError> {
        let anchor = spawn_anchor(self.rows(), self.cols(), slot).ok_or_else(|| {
            GameError::InvalidWorld(format!(
                "no spawn block {} on a {}x{} grid",
                slot,
                self.rows(),
                self.cols()
            ))
        })?;

        let positions: Vec<GridPos> = (0..SQUAD_SIZE).map(|k| formation_cell(anchor, k)).collect();
        if let Some(bad) = positions.iter().find(|p| !self.is_passable(**p)) {
            return Err(GameError::InvalidWorld(format!(
                "spawn cell ({}, {}) is not passable",
                bad.row, bad.col
            )));
        }

        let mut ids = Vec::with_capacity(SQUAD_SIZE);
        for (k, pos) in positions.into_iter().enumerate() {
            ids.push(self.add_actor(owner, pos, Some(catalog.loadout(k)))?);
        }
        Ok(ids)
    }

    /// Compute a digest of terrain and every actor's state.
    pub fn compute_hash(&self) -> StateHash {
        let mut hasher = StateHasher::for_world();
        hasher.update_u32(self.rows() as u32);
        hasher.update_u32(self.cols() as u32);
        for cell in self.terrain.iter().flatten() {
            hasher.update_u8(*cell as u8);
        }
        for actor in &self.actors {
            hasher.update_u32(actor.id.raw());
            hasher.update_pos(actor.pos);
            hasher.update_u32(actor.owner.raw());
            hasher.update_u8(actor.is_alive() as u8);
            hasher.update_u32(actor.health);
            hasher.update_opt_u32(actor.weapon.as_ref().and_then(|w| w.ammo));
        }
        hasher.finalize()
    }
}

// =============================================================================
// SPAWN LAYOUT
// =============================================================================

/// Top-left cell of spawn block `slot`, one cell in from a grid corner.
///
/// Slots alternate between opposite corners: top-left, bottom-right,
/// top-right, bottom-left. Returns `None` if the block does not fit.
pub fn spawn_anchor(rows: usize, cols: usize, slot: u8) -> Option<GridPos> {
    let span = SQUAD_FORMATION_WIDTH + 2;
    if rows < span || cols < span || slot as usize >= MAX_SUPPORTED_PLAYERS {
        return None;
    }
    let far_row = (rows - SQUAD_FORMATION_WIDTH - 1) as i32;
    let far_col = (cols - SQUAD_FORMATION_WIDTH - 1) as i32;
    let anchor = match slot {
        0 => GridPos::new(1, 1),
        1 => GridPos::new(far_row, far_col),
        2 => GridPos::new(1, far_col),
        _ => GridPos::new(far_row, 1),
    };
    Some(anchor)
}

/// Cell `k` of the square formation anchored at `anchor`.
#[inline]
fn formation_cell(anchor: GridPos, k: usize) -> GridPos {
    let w = SQUAD_FORMATION_WIDTH;
    GridPos::new(anchor.row + (k / w) as i32, anchor.col + (k % w) as i32)
}

/// Check whether `pos` falls inside the formation block at `anchor`.
#[inline]
fn in_formation(anchor: GridPos, pos: GridPos) -> bool {
    let w = SQUAD_FORMATION_WIDTH as i32;
    pos.row >= anchor.row && pos.row < anchor.row + w && pos.col >= anchor.col && pos.col < anchor.col + w
}

// =============================================================================
// TESTS
// =============================================================================
