//! # Hex Tactics Server
//!
//! Server-authoritative turn resolution and fog of war for a hex-grid
//! tactics game. Players submit per-actor orders each turn; once every
//! player has submitted, all orders are resolved together over a fixed
//! number of timesteps and each player reads back a filtered view.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    HEX TACTICS SERVER                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/             - Deterministic primitives                │
//! │  ├── hex.rs        - Cube coords, odd-q grid, linedraw       │
//! │  ├── rng.rs        - Deterministic Xorshift128+ PRNG         │
//! │  └── hash.rs       - World digests                           │
//! │                                                              │
//! │  game/             - Rules (deterministic)                   │
//! │  ├── state.rs      - Ids, games, players, turn status        │
//! │  ├── world.rs      - Terrain grid, actors, spawning          │
//! │  ├── weapons.rs    - Weapon catalog                          │
//! │  ├── orders.rs     - Order validation and normalization      │
//! │  ├── visibility.rs - Fog of war                              │
//! │  ├── combat.rs     - Range, line of sight, damage            │
//! │  ├── turn.rs       - Multi-timestep resolution loop          │
//! │  └── events.rs     - Turn events                             │
//! │                                                              │
//! │  server/           - Service layer (async)                   │
//! │  ├── store.rs      - Typed-arena entity store                │
//! │  ├── service.rs    - Game lifecycle and turn barrier         │
//! │  ├── protocol.rs   - JSON wire bodies                        │
//! │  └── config.rs     - Engine configuration                    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! The `core/` and `game/` modules are **100% deterministic**:
//! - Integer-only hex geometry, no floating point
//! - Orders are resolved in player-id order, never arrival order
//! - All terrain randomness from seeded Xorshift128+
//!
//! Given identical worlds and orders, a turn produces an **identical
//! world digest** on every run.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod error;
pub mod game;
pub mod server;

// Re-export commonly used types
pub use core::hex::{Direction, GridPos, Hex};
pub use error::GameError;
pub use game::state::{ActorId, GameId, PlayerId};
pub use game::world::World;
pub use server::{EngineConfig, GameService};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Timesteps simulated per turn; also the length of every order schedule
pub const TIMESTEP_MAX: usize = 10;

/// Actors spawned per joining player
pub const SQUAD_SIZE: usize = 9;

/// Side length of the square spawn formation
pub const SQUAD_FORMATION_WIDTH: usize = 3;

/// Starting health of every actor
pub const ACTOR_MAX_HEALTH: u32 = 100;

/// Sight range of unarmed actors, in hexes
pub const DEFAULT_SIGHT_RANGE: u32 = 4;

/// Players per game (one spawn block per grid corner)
pub const MAX_SUPPORTED_PLAYERS: usize = 4;
