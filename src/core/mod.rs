//! Core deterministic primitives.
//!
//! Hex geometry, seeded randomness, and state hashing. Nothing in this
//! module performs I/O or reads the clock.

pub mod hex;
pub mod rng;
pub mod hash;

// Re-export core types
pub use hex::{Hex, GridPos, Direction, linedraw};
pub use rng::{DeterministicRng, derive_game_seed};
pub use hash::{StateHash, StateHasher};
