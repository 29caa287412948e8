//! Order Validation and Normalization
//!
//! Turns a player's raw order batch into [`ActorOrders`] the resolver can
//! run. Raw direction integers are bounds-checked, and every direction list
//! is padded or truncated to exactly [`TIMESTEP_MAX`] entries.

use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};

use crate::TIMESTEP_MAX;
use crate::core::hex::Direction;
use crate::error::GameError;
use crate::game::state::{ActorId, EntityId, Game, GameId, PlayerId};
use crate::game::world::World;

/// Message for a requester that is not a participant.
pub const MSG_NOT_A_PLAYER: &str = "playerId is not in game.players array";

/// Message for orders addressed to a turn other than the current one.
pub const MSG_WRONG_TURN: &str = "orders turn does not match game turn";

/// One direction per timestep.
pub type Schedule = [Direction; TIMESTEP_MAX];

// =============================================================================
// ORDER TYPES
// =============================================================================

/// What an actor does this turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    /// Follow the direction schedule.
    Move,
    /// Fire at `target_id` every timestep.
    Attack,
}

/// One actor's order as it arrives on the wire, before validation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawActorOrder {
    /// Actor being ordered.
    pub actor_id: u32,
    /// Move or attack.
    pub order_type: OrderType,
    /// Raw direction values, any length.
    #[serde(default)]
    pub orders_list: Option<Vec<i64>>,
    /// Attack target.
    #[serde(default)]
    pub target_id: Option<u32>,
}

/// A validated order for one actor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorOrders {
    /// Ordered actor, owned by the submitting player.
    pub actor_id: ActorId,
    /// Move or attack.
    pub order_type: OrderType,
    /// Exactly one direction per timestep.
    pub orders_list: Schedule,
    /// Attack target, if any.
    pub target_id: Option<ActorId>,
}

impl ActorOrders {
    /// Movement for `timestep`. Always `None` for attack orders.
    #[inline]
    pub fn direction_at(&self, timestep: usize) -> Direction {
        match self.order_type {
            OrderType::Move => self.orders_list.get(timestep).copied().unwrap_or_default(),
            OrderType::Attack => Direction::None,
        }
    }
}

/// One player's accepted orders for one turn. Immutable once stored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnOrders {
    /// Game id.
    pub game_id: GameId,
    /// Turn the orders are for.
    pub turn: u32,
    /// Submitting player.
    pub player_id: PlayerId,
    /// Validated per-actor orders, in submission order.
    pub orders: Vec<ActorOrders>,
    /// When the orders were accepted.
    pub submitted_at: DateTime<Utc>,
}

// =============================================================================
// NORMALIZATION
// =============================================================================

/// Pad with `None` or truncate so the list has exactly [`TIMESTEP_MAX`] entries.
pub fn normalize_orders_list(list: &[Direction]) -> Schedule {
    let mut schedule = [Direction::None; TIMESTEP_MAX];
    for (slot, direction) in schedule.iter_mut().zip(list) {
        *slot = *direction;
    }
    schedule
}

/// Parse raw wire values into directions, rejecting anything outside `0..=6`.
///
/// Only the first [`TIMESTEP_MAX`] values are read; the rest are dropped
/// unchecked.
pub fn parse_direction_list(raw: &[i64]) -> Result<Vec<Direction>, GameError> {
    raw.iter()
        .take(TIMESTEP_MAX)
        .map(|value| {
            Direction::from_raw(*value)
                .ok_or_else(|| GameError::validation(format!("invalid direction value {}", value)))
        })
        .collect()
}

// =============================================================================
// VALIDATION
// =============================================================================

/// Validate a raw order batch for `player` on `turn` of `game`.
///
/// Checks run in order: participation, turn number, then per order the
/// actor's existence, its ownership, and its direction values. The first
/// failure rejects the whole batch.
pub fn validate_orders(
    raw: &[RawActorOrder],
    game: &Game,
    world: &World,
    turn: u32,
    player: PlayerId,
) -> Result<Vec<ActorOrders>, GameError> {
    if !game.has_player(player) {
        return Err(GameError::validation(MSG_NOT_A_PLAYER));
    }
    if turn != game.turn {
        return Err(GameError::validation(MSG_WRONG_TURN));
    }

    raw.iter()
        .map(|order| validate_actor_order(order, world, player))
        .collect()
}

fn validate_actor_order(
    order: &RawActorOrder,
    world: &World,
    player: PlayerId,
) -> Result<ActorOrders, GameError> {
    let actor_id = ActorId::from_raw(order.actor_id);
    let actor = world.require_actor(actor_id)?;
    if actor.owner != player {
        return Err(GameError::Unauthorized(format!(
            "actor {} is not owned by player {}",
            actor_id, player
        )));
    }

    let directions = parse_direction_list(order.orders_list.as_deref().unwrap_or(&[]))?;

    Ok(ActorOrders {
        actor_id,
        order_type: order.order_type,
        orders_list: normalize_orders_list(&directions),
        target_id: order.target_id.map(ActorId::from_raw),
    })
}

/// Number of distinct players among `orders`.
///
/// The turn barrier compares this to the game's player count.
pub fn distinct_submitters(orders: &[TurnOrders]) -> usize {
    let mut players: Vec<PlayerId> = orders.iter().map(|o| o.player_id).collect();
    players.sort_unstable();
    players.dedup();
    players.len()
}

// =============================================================================
// TESTS
// =============================================================================
