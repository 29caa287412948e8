//! Turn Events
//!
//! Events generated while a turn is simulated, for replay and debugging.

use serde::{Serialize, Deserialize};

use crate::core::hex::GridPos;
use crate::game::state::{ActorId, PlayerId};

/// Why an attack did not land.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RejectReason {
    /// Attacker is dead or gone.
    AttackerDown,
    /// No target id on the order.
    NoTarget,
    /// The order named a target that does not exist.
    UnknownTarget,
    /// Attacker and target are the same actor.
    SelfTarget,
    /// Target is already dead.
    TargetDead,
    /// Attacker carries no weapon.
    Unarmed,
    /// Weapon has no rounds left.
    OutOfAmmo,
    /// Target outside the weapon's range band.
    OutOfRange,
    /// Terrain or another actor is in the way.
    NoLineOfSight,
}

/// Event data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnEventData {
    /// Actor stepped to a new cell
    ActorMoved {
        actor_id: ActorId,
        from: GridPos,
        to: GridPos,
    },

    /// Move dropped: destination blocked or off the grid
    MoveBlocked {
        actor_id: ActorId,
        at: GridPos,
    },

    /// Attack landed
    AttackHit {
        attacker_id: ActorId,
        target_id: ActorId,
        damage: u32,
        remaining_health: u32,
    },

    /// Attack did not land
    AttackRejected {
        attacker_id: ActorId,
        target_id: Option<ActorId>,
        reason: RejectReason,
    },

    /// Actor reached zero health
    ActorKilled {
        actor_id: ActorId,
        owner: PlayerId,
        killer_id: ActorId,
    },
}

/// An event stamped with its timestep.
///
/// A turn's events are kept in emission order, so a hit always precedes
/// the kill it caused.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnEvent {
    /// Timestep when the event occurred
    pub timestep: u32,

    /// Event data
    pub data: TurnEventData,
}

impl TurnEvent {
    fn new(timestep: u32, data: TurnEventData) -> Self {
        Self { timestep, data }
    }

    /// Create actor moved event.
    pub fn actor_moved(timestep: u32, actor_id: ActorId, from: GridPos, to: GridPos) -> Self {
        Self::new(timestep, TurnEventData::ActorMoved { actor_id, from, to })
    }

    /// Create move blocked event.
    pub fn move_blocked(timestep: u32, actor_id: ActorId, at: GridPos) -> Self {
        Self::new(timestep, TurnEventData::MoveBlocked { actor_id, at })
    }

    /// Create attack hit event.
    pub fn attack_hit(
        timestep: u32,
        attacker_id: ActorId,
        target_id: ActorId,
        damage: u32,
        remaining_health: u32,
    ) -> Self {
        Self::new(
            timestep,
            TurnEventData::AttackHit {
                attacker_id,
                target_id,
                damage,
                remaining_health,
            },
        )
    }

    /// Create attack rejected event.
    pub fn attack_rejected(
        timestep: u32,
        attacker_id: ActorId,
        target_id: Option<ActorId>,
        reason: RejectReason,
    ) -> Self {
        Self::new(
            timestep,
            TurnEventData::AttackRejected {
                attacker_id,
                target_id,
                reason,
            },
        )
    }

    /// Create actor killed event.
    pub fn actor_killed(timestep: u32, actor_id: ActorId, owner: PlayerId, killer_id: ActorId) -> Self {
        Self::new(
            timestep,
            TurnEventData::ActorKilled {
                actor_id,
                owner,
                killer_id,
            },
        )
    }

    /// Check if this is a kill.
    pub fn is_kill(&self) -> bool {
        matches!(self.data, TurnEventData::ActorKilled { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kill_detection() {
        let kill = TurnEvent::actor_killed(3, ActorId::new(1), PlayerId::new(0), ActorId::new(9));
        let hit = TurnEvent::attack_hit(3, ActorId::new(9), ActorId::new(1), 10, 0);
        let moved = TurnEvent::actor_moved(3, ActorId::new(2), GridPos::new(0, 0), GridPos::new(1, 0));

        assert!(kill.is_kill());
        assert!(!hit.is_kill());
        assert!(!moved.is_kill());
        assert_eq!(kill.timestep, 3);
    }

    #[test]
    fn test_reject_reason_wire_name() {
        let json = serde_json::to_string(&RejectReason::NoLineOfSight).unwrap();
        assert_eq!(json, "\"noLineOfSight\"");
    }
}
