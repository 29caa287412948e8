//! Game Logic Module
//!
//! All rules code. 100% deterministic: nothing here reads the clock except
//! through timestamps passed in by the caller.
//!
//! ## Module Structure
//!
//! - `state`: Typed ids, games, players, turn status and results
//! - `world`: Terrain grid, actors, terrain generation, squad spawning
//! - `weapons`: Weapon archetypes and squad loadouts
//! - `orders`: Order parsing, validation, normalization
//! - `visibility`: Fog of war
//! - `combat`: Range, line of sight, damage
//! - `turn`: Authoritative multi-timestep resolution loop
//! - `events`: Turn events for replay/debugging

pub mod state;
pub mod world;
pub mod weapons;
pub mod orders;
pub mod visibility;
pub mod combat;
pub mod turn;
pub mod events;

// Re-export key types
pub use state::{ActorId, Game, GameId, Player, PlayerId, TurnPhase, TurnResult, TurnStatus, WorldId};
pub use world::{Actor, ActorState, Terrain, World};
pub use weapons::{Weapon, WeaponCatalog};
pub use orders::{ActorOrders, OrderType, RawActorOrder, TurnOrders};
pub use visibility::{visible_world_for, PlayerView};
pub use turn::{resolve_turn, TurnOutcome};
pub use events::TurnEvent;
