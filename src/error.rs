//! Error Taxonomy
//!
//! Every rejected operation in the engine surfaces as a [`GameError`].
//! Nothing here retries or recovers; the HTTP layer maps the variant to a
//! status code with [`GameError::status_code`].

use std::fmt;
use serde::{Serialize, Deserialize};

/// Kinds of persisted entity, used in not-found errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    /// A game.
    Game,
    /// A player.
    Player,
    /// An actor inside a world.
    Actor,
    /// A world (terrain plus actors).
    World,
    /// One player's orders for one turn.
    TurnOrders,
    /// One player's result for one turn.
    TurnResult,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Game => "game",
            EntityKind::Player => "player",
            EntityKind::Actor => "actor",
            EntityKind::World => "world",
            EntityKind::TurnOrders => "turn orders",
            EntityKind::TurnResult => "turn result",
        };
        f.write_str(name)
    }
}

/// Engine errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// A referenced entity does not exist.
    #[error("{kind} {id} not found")]
    NotFound {
        /// Entity kind.
        kind: EntityKind,
        /// Raw id that was looked up.
        id: u32,
    },

    /// Malformed payload or a request that contradicts game state.
    #[error("{0}")]
    Validation(String),

    /// The request conflicts with the game's lifecycle.
    #[error("{0}")]
    Conflict(String),

    /// The requester may not act on this entity.
    #[error("{0}")]
    Unauthorized(String),

    /// The world is not usable for the requested computation.
    #[error("invalid world: {0}")]
    InvalidWorld(String),
}

impl GameError {
    /// Shorthand for a not-found error.
    pub fn not_found(kind: EntityKind, id: u32) -> Self {
        GameError::NotFound { kind, id }
    }

    /// Shorthand for a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        GameError::Validation(msg.into())
    }

    /// Shorthand for a conflict error.
    pub fn conflict(msg: impl Into<String>) -> Self {
        GameError::Conflict(msg.into())
    }

    /// HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            GameError::NotFound { .. } => 404,
            GameError::Validation(_) => 400,
            GameError::Conflict(_) => 409,
            GameError::Unauthorized(_) => 403,
            GameError::InvalidWorld(_) => 500,
        }
    }
}
