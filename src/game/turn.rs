//! Authoritative Turn Resolution
//!
//! Simulates one turn over an owned world. Must be 100% deterministic:
//! given the same world and the same orders, the resulting world digest is
//! identical on every run.
//!
//! The loop is `for timestep { for order { move; attack } }`. Movement and
//! combat interleave per actor per timestep, so an actor that moves early in
//! a timestep can change what a later actor sees or hits in that same step.

use chrono::{DateTime, Utc};

use crate::TIMESTEP_MAX;
use crate::core::hash::StateHash;
use crate::core::hex::Direction;
use crate::game::combat::resolve_attack;
use crate::game::events::TurnEvent;
use crate::game::orders::{ActorOrders, OrderType, TurnOrders};
use crate::game::state::{GameId, PlayerId, TurnResult};
use crate::game::world::World;

/// Result of resolving one turn.
#[derive(Debug, Default)]
pub struct TurnOutcome {
    /// Events in the order they happened
    pub events: Vec<TurnEvent>,
    /// Digest of the world after the last timestep
    pub world_hash: StateHash,
}

impl TurnOutcome {
    /// Number of actors killed this turn.
    pub fn kills(&self) -> usize {
        self.events.iter().filter(|e| e.is_kill()).count()
    }
}

/// Flatten every player's orders into the single list the resolver walks.
///
/// Players are taken in ascending id order; each player's orders keep their
/// submission order.
pub fn flatten_orders(orders: &[TurnOrders]) -> Vec<&ActorOrders> {
    let mut by_player: Vec<&TurnOrders> = orders.iter().collect();
    // Stable sort keeps submission order for equal ids
    by_player.sort_by_key(|o| o.player_id);
    by_player.into_iter().flat_map(|o| o.orders.iter()).collect()
}

/// Run one turn.
///
/// # Arguments
///
/// * `world` - The world (will be mutated)
/// * `orders` - Every player's accepted orders for this turn
///
/// Dead actors neither move nor attack. Moves onto blocked or off-grid
/// cells are dropped for that timestep. Rejected attacks change nothing.
pub fn resolve_turn(world: &mut World, orders: &[TurnOrders]) -> TurnOutcome {
    let flattened = flatten_orders(orders);
    let mut outcome = TurnOutcome::default();

    for timestep in 0..TIMESTEP_MAX {
        #[cfg(feature = "debug-tracing")]
        tracing::trace!(timestep, orders = flattened.len(), "simulating timestep");

        for order in &flattened {
            apply_movement(world, order, timestep, &mut outcome.events);
            apply_combat(world, order, timestep, &mut outcome.events);
        }
    }

    outcome.world_hash = world.compute_hash();
    outcome
}

/// Step one actor along its schedule.
fn apply_movement(world: &mut World, order: &ActorOrders, timestep: usize, events: &mut Vec<TurnEvent>) {
    let direction = order.direction_at(timestep);
    if direction == Direction::None {
        return;
    }

    let Some(from) = world
        .actor(order.actor_id)
        .filter(|a| a.is_alive())
        .map(|a| a.pos)
    else {
        return;
    };

    let to = from.step(direction);
    if !world.is_passable(to) {
        events.push(TurnEvent::move_blocked(timestep as u32, order.actor_id, from));
        return;
    }

    if let Some(actor) = world.actor_mut(order.actor_id) {
        actor.pos = to;
        events.push(TurnEvent::actor_moved(timestep as u32, order.actor_id, from, to));
    }
}

/// Fire one attack, if the order is an attack.
fn apply_combat(world: &mut World, order: &ActorOrders, timestep: usize, events: &mut Vec<TurnEvent>) {
    if order.order_type != OrderType::Attack {
        return;
    }
    if !world.actor(order.actor_id).is_some_and(|a| a.is_alive()) {
        return;
    }

    let step = timestep as u32;
    match resolve_attack(world, order.actor_id, order.target_id) {
        Ok(hit) => {
            events.push(TurnEvent::attack_hit(
                step,
                order.actor_id,
                hit.target_id,
                hit.damage,
                hit.remaining_health,
            ));
            if hit.killed {
                events.push(TurnEvent::actor_killed(step, hit.target_id, hit.target_owner, order.actor_id));
            }
        }
        Err(reason) => {
            events.push(TurnEvent::attack_rejected(step, order.actor_id, order.target_id, reason));
        }
    }
}

/// Build one result per player holding that player's actors after the turn.
pub fn build_results(
    world: &World,
    game_id: GameId,
    turn: u32,
    players: &[PlayerId],
    resolved_at: DateTime<Utc>,
) -> Vec<TurnResult> {
    players
        .iter()
        .map(|player| TurnResult {
            game_id,
            turn,
            player_id: *player,
            updated_actors: world.actors_owned_by(*player).cloned().collect(),
            resolved_at,
        })
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================
