//! Combat Resolution
//!
//! Range, line of sight, and damage for a single attack. Called by the turn
//! resolver once per attacking actor per timestep.

use crate::core::hex::GridPos;
use crate::game::events::RejectReason;
use crate::game::state::{ActorId, PlayerId};
use crate::game::visibility::clear_line;
use crate::game::world::World;

/// A landed attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttackHit {
    /// Damaged actor.
    pub target_id: ActorId,
    /// Owner of the damaged actor.
    pub target_owner: PlayerId,
    /// Health removed.
    pub damage: u32,
    /// Target health after the hit.
    pub remaining_health: u32,
    /// True if this hit took the target to zero.
    pub killed: bool,
}

/// Check for an unobstructed hex line between two cells.
///
/// Blocked terrain or any actor strictly between the endpoints breaks the
/// line. Actors on the endpoints do not.
pub fn has_line_of_sight(world: &World, from: GridPos, to: GridPos) -> bool {
    clear_line(world, from, to, |pos| world.is_occupied(pos))
}

/// Resolve one attack by `attacker_id` on `target_id`.
///
/// Nothing changes on rejection. On a hit the target loses the weapon's
/// damage (clamped at zero, dead at zero) and tracked ammo drops by one.
pub fn resolve_attack(
    world: &mut World,
    attacker_id: ActorId,
    target_id: Option<ActorId>,
) -> Result<AttackHit, RejectReason> {
    let target_id = target_id.ok_or(RejectReason::NoTarget)?;

    let attacker = world
        .actor(attacker_id)
        .filter(|a| a.is_alive())
        .ok_or(RejectReason::AttackerDown)?;
    let weapon = attacker.weapon.as_ref().ok_or(RejectReason::Unarmed)?;

    if target_id == attacker_id {
        return Err(RejectReason::SelfTarget);
    }
    let target = world.actor(target_id).ok_or(RejectReason::UnknownTarget)?;
    if !target.is_alive() {
        return Err(RejectReason::TargetDead);
    }
    if !weapon.has_ammo() {
        return Err(RejectReason::OutOfAmmo);
    }
    if !weapon.in_range(attacker.pos.distance(target.pos)) {
        return Err(RejectReason::OutOfRange);
    }
    if !has_line_of_sight(world, attacker.pos, target.pos) {
        return Err(RejectReason::NoLineOfSight);
    }

    let damage = weapon.damage;

    if let Some(weapon) = world.actor_mut(attacker_id).and_then(|a| a.weapon.as_mut()) {
        weapon.spend_round();
    }
    let target = world.actor_mut(target_id).ok_or(RejectReason::UnknownTarget)?;
    let killed = target.apply_damage(damage);

    Ok(AttackHit {
        target_id,
        target_owner: target.owner,
        damage,
        remaining_health: target.health,
        killed,
    })
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use crate::ACTOR_MAX_HEALTH;
    use crate::game::weapons::{Weapon, WeaponCatalog};
    use crate::game::world::{Actor, ActorState, Terrain};

    const ME: PlayerId = PlayerId::new(0);
    const THEM: PlayerId = PlayerId::new(1);

    fn rifle() -> Weapon {
        Weapon {
            name: "rifle".to_string(),
            min_range: None,
            max_range: 5,
            damage: 10,
            ammo: None,
        }
    }

    /// Attacker at the top of a single-column corridor, target `distance` rows below.
    fn duel(distance: i32, weapon: Weapon) -> (World, ActorId, ActorId) {
        let mut world = World::new_empty(12, 1);
        let attacker = world.add_actor(ME, GridPos::new(0, 0), Some(weapon)).unwrap();
        let target = world.add_actor(THEM, GridPos::new(distance, 0), None).unwrap();
        (world, attacker, target)
    }

    #[test]
    fn test_hit_at_max_range() {
        let (mut world, attacker, target) = duel(5, rifle());
        let hit = resolve_attack(&mut world, attacker, Some(target)).unwrap();

        assert_eq!(hit.damage, 10);
        assert_eq!(hit.remaining_health, ACTOR_MAX_HEALTH - 10);
        assert!(!hit.killed);
        assert_eq!(world.actor(target).unwrap().health, ACTOR_MAX_HEALTH - 10);
    }

    #[test]
    fn test_miss_beyond_max_range() {
        let (mut world, attacker, target) = duel(6, rifle());
        let before = world.clone();

        assert_eq!(resolve_attack(&mut world, attacker, Some(target)), Err(RejectReason::OutOfRange));
        assert_eq!(world, before);
    }

    #[test]
    fn test_min_range_band() {
        let marksman = WeaponCatalog::default().get("marksman").unwrap().equip();
        let (mut world, attacker, target) = duel(1, marksman.clone());
        assert_eq!(resolve_attack(&mut world, attacker, Some(target)), Err(RejectReason::OutOfRange));

        let (mut world, attacker, target) = duel(2, marksman);
        assert!(resolve_attack(&mut world, attacker, Some(target)).is_ok());
    }

    #[test]
    fn test_wall_blocks_shot() {
        let (mut world, attacker, target) = duel(4, rifle());
        world.set_terrain(GridPos::new(2, 0), Terrain::Blocked);
        assert_eq!(resolve_attack(&mut world, attacker, Some(target)), Err(RejectReason::NoLineOfSight));
    }

    #[test]
    fn test_actor_in_between_blocks_shot() {
        let (mut world, attacker, target) = duel(4, rifle());
        // Even a friendly actor is in the way
        world.add_actor(ME, GridPos::new(2, 0), None).unwrap();
        assert_eq!(resolve_attack(&mut world, attacker, Some(target)), Err(RejectReason::NoLineOfSight));
    }

    #[test]
    fn test_adjacent_target_has_sight() {
        let (world, attacker, target) = duel(1, rifle());
        let from = world.actor(attacker).unwrap().pos;
        let to = world.actor(target).unwrap().pos;
        assert!(has_line_of_sight(&world, from, to));
    }

    #[test]
    fn test_invalid_targets_rejected() {
        let (mut world, attacker, target) = duel(2, rifle());
        assert_eq!(resolve_attack(&mut world, attacker, None), Err(RejectReason::NoTarget));
        assert_eq!(resolve_attack(&mut world, attacker, Some(attacker)), Err(RejectReason::SelfTarget));
        assert_eq!(
            resolve_attack(&mut world, attacker, Some(ActorId::new(99))),
            Err(RejectReason::UnknownTarget)
        );

        world.actor_mut(target).unwrap().apply_damage(ACTOR_MAX_HEALTH);
        assert_eq!(resolve_attack(&mut world, attacker, Some(target)), Err(RejectReason::TargetDead));
    }

    #[test]
    fn test_unarmed_and_dead_attackers() {
        let (mut world, attacker, target) = duel(2, rifle());
        world.actor_mut(attacker).unwrap().weapon = None;
        assert_eq!(resolve_attack(&mut world, attacker, Some(target)), Err(RejectReason::Unarmed));

        let (mut world, attacker, target) = duel(2, rifle());
        world.actor_mut(attacker).unwrap().apply_damage(ACTOR_MAX_HEALTH);
        assert_eq!(resolve_attack(&mut world, attacker, Some(target)), Err(RejectReason::AttackerDown));
    }

    #[test]
    fn test_ammo_runs_out() {
        let weapon = Weapon { ammo: Some(2), ..rifle() };
        let (mut world, attacker, target) = duel(3, weapon);

        assert!(resolve_attack(&mut world, attacker, Some(target)).is_ok());
        assert!(resolve_attack(&mut world, attacker, Some(target)).is_ok());
        assert_eq!(resolve_attack(&mut world, attacker, Some(target)), Err(RejectReason::OutOfAmmo));
        assert_eq!(world.actor(target).unwrap().health, ACTOR_MAX_HEALTH - 20);
    }

    #[test]
    fn test_killing_blow() {
        let weapon = Weapon { damage: 60, ..rifle() };
        let (mut world, attacker, target) = duel(3, weapon);

        assert!(!resolve_attack(&mut world, attacker, Some(target)).unwrap().killed);
        let hit = resolve_attack(&mut world, attacker, Some(target)).unwrap();
        assert!(hit.killed);
        assert_eq!(hit.remaining_health, 0);
        assert_eq!(hit.target_owner, THEM);
        assert_eq!(world.actor(target).unwrap().state, ActorState::Dead);
    }

    proptest! {
        #[test]
        fn prop_damage_is_monotonic(health in 1u32..=500, damage in 0u32..=600) {
            let mut actor = Actor::new(ActorId::new(0), GridPos::new(0, 0), ME, None);
            actor.health = health;
            actor.apply_damage(damage);

            prop_assert_eq!(actor.health, health.saturating_sub(damage));
            prop_assert_eq!(actor.state == ActorState::Dead, actor.health == 0);
        }
    }
}
