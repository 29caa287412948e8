//! Game State Definitions
//!
//! Typed entity ids, the game record, players, and per-turn status and
//! result types.

use std::fmt;
use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};

use crate::error::EntityKind;
use crate::game::world::Actor;

// =============================================================================
// ENTITY IDS
// =============================================================================

/// A typed integer id for one kind of persisted entity.
pub trait EntityId: Copy + Ord + fmt::Debug {
    /// Entity kind, for error reporting.
    const KIND: EntityKind;

    /// Build an id from its raw index.
    fn from_raw(raw: u32) -> Self;

    /// Raw index.
    fn raw(self) -> u32;
}

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $kind:expr) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            /// Create from a raw index.
            pub const fn new(raw: u32) -> Self {
                Self(raw)
            }
        }

        impl EntityId for $name {
            const KIND: EntityKind = $kind;

            #[inline]
            fn from_raw(raw: u32) -> Self {
                Self(raw)
            }

            #[inline]
            fn raw(self) -> u32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// Game identifier.
    GameId, EntityKind::Game
);
entity_id!(
    /// Player identifier. Players are minted per join, so one id belongs to exactly one game.
    PlayerId, EntityKind::Player
);
entity_id!(
    /// World identifier.
    WorldId, EntityKind::World
);
entity_id!(
    /// Actor identifier, unique within one world.
    ActorId, EntityKind::Actor
);
entity_id!(
    /// Identifier of a stored TurnOrders row.
    TurnOrdersId, EntityKind::TurnOrders
);
entity_id!(
    /// Identifier of a stored TurnResult row.
    TurnResultId, EntityKind::TurnResult
);

// =============================================================================
// GAME
// =============================================================================

/// A game: its participants, current turn, and world.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    /// Game id.
    pub id: GameId,
    /// Participants, in join order.
    pub players: Vec<PlayerId>,
    /// Maximum number of participants.
    pub max_players: u32,
    /// Current turn. Starts at 1 and only ever grows by one.
    pub turn: u32,
    /// The game's world.
    pub world_id: WorldId,
}

impl Game {
    /// Check whether `player` takes part in this game.
    pub fn has_player(&self, player: PlayerId) -> bool {
        self.players.contains(&player)
    }

    /// Check whether no further player may join.
    pub fn is_full(&self) -> bool {
        self.players.len() as u32 >= self.max_players
    }

    /// A game has started once its first turn resolved.
    pub fn has_started(&self) -> bool {
        self.turn > 1
    }
}

/// A participant in one game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    /// Player id.
    pub id: PlayerId,
    /// The game this player joined.
    pub game_id: GameId,
    /// Spawn slot (join order, 0-based).
    pub slot: u8,
}

// =============================================================================
// TURN STATUS
// =============================================================================

/// Where a game's current turn is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnPhase {
    /// Accepting orders; the barrier has not been reached.
    AwaitingOrders {
        /// Players who have submitted for this turn.
        submitted: u32,
        /// Players in the game.
        expected: u32,
    },
    /// All orders are in and the turn is being simulated.
    Resolving,
    /// The turn resolved; the game awaits orders for the next one.
    Advanced {
        /// The new current turn.
        turn: u32,
    },
}

/// Outcome of a submission or resolution attempt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnStatus {
    /// True only once every current player's orders were consumed.
    pub complete: bool,
    /// Human-readable progress note.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    /// The game's turn after resolution.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub turn: Option<u32>,
}

impl TurnStatus {
    /// Barrier not yet reached.
    pub fn waiting(submitted: usize, expected: usize) -> Self {
        Self {
            complete: false,
            msg: Some(format!("waiting for orders: {} of {} players submitted", submitted, expected)),
            turn: None,
        }
    }

    /// Turn resolved; `next_turn` is now current.
    pub fn completed(next_turn: u32) -> Self {
        Self {
            complete: true,
            msg: None,
            turn: Some(next_turn),
        }
    }
}

// =============================================================================
// TURN RESULT
// =============================================================================

/// One player's view of one resolved turn: their own actors after simulation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnResult {
    /// Game id.
    pub game_id: GameId,
    /// The turn that was resolved.
    pub turn: u32,
    /// Owner of the actors below.
    pub player_id: PlayerId,
    /// The player's actors after the last timestep.
    pub updated_actors: Vec<Actor>,
    /// When the turn was resolved.
    pub resolved_at: DateTime<Utc>,
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn game(players: Vec<PlayerId>, max_players: u32, turn: u32) -> Game {
        Game {
            id: GameId::new(0),
            players,
            max_players,
            turn,
            world_id: WorldId::new(0),
        }
    }

    #[test]
    fn test_game_membership_and_capacity() {
        let g = game(vec![PlayerId::new(0)], 2, 1);
        assert!(g.has_player(PlayerId::new(0)));
        assert!(!g.has_player(PlayerId::new(1)));
        assert!(!g.is_full());
        assert!(!g.has_started());

        let g = game(vec![PlayerId::new(0), PlayerId::new(1)], 2, 2);
        assert!(g.is_full());
        assert!(g.has_started());
    }

    #[test]
    fn test_turn_status_serialization() {
        let done = serde_json::to_value(TurnStatus::completed(2)).unwrap();
        assert_eq!(done, serde_json::json!({"complete": true, "turn": 2}));

        let waiting = TurnStatus::waiting(1, 2);
        assert!(!waiting.complete);
        assert_eq!(waiting.turn, None);
    }

    #[test]
    fn test_ids_are_transparent_on_the_wire() {
        let json = serde_json::to_string(&ActorId::new(17)).unwrap();
        assert_eq!(json, "17");
        assert_eq!(GameId::KIND, EntityKind::Game);
    }
}
