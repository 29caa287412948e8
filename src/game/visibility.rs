//! Fog of War
//!
//! Computes the part of a world one player can see. Sight is traced along
//! hex lines from each of the player's live actors; walls and any actor
//! standing on an intermediate hex block the view beyond them.
//!
//! The world is never mutated here. A [`PlayerView`] is a filtered copy.

use serde::{Serialize, Deserialize};

use crate::core::hex::{linedraw, GridPos};
use crate::error::GameError;
use crate::game::state::PlayerId;
use crate::game::world::{Actor, Terrain, World};

/// One player's fog-of-war view of a world.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    /// Terrain with every unseen cell replaced by `Unexplored`.
    pub terrain: Vec<Vec<Terrain>>,
    /// The player's own actors plus every other actor on a visible cell.
    pub actors: Vec<Actor>,
}

impl PlayerView {
    /// Check whether `pos` was revealed.
    pub fn is_visible(&self, pos: GridPos) -> bool {
        if pos.row < 0 || pos.col < 0 {
            return false;
        }
        self.terrain
            .get(pos.row as usize)
            .and_then(|row| row.get(pos.col as usize))
            .is_some_and(|t| *t != Terrain::Unexplored)
    }

    /// Number of revealed cells.
    pub fn visible_count(&self) -> usize {
        self.terrain
            .iter()
            .flatten()
            .filter(|t| **t != Terrain::Unexplored)
            .count()
    }
}

/// Check that nothing stands between `from` and `to`.
///
/// Only hexes strictly between the endpoints are inspected. Each must map
/// to an in-bounds cell that is not blocked and that `occupied` reports as
/// free. The endpoints themselves never block.
pub fn clear_line<F>(world: &World, from: GridPos, to: GridPos, occupied: F) -> bool
where
    F: Fn(GridPos) -> bool,
{
    let line = linedraw(from.to_hex(), to.to_hex());
    if line.len() <= 2 {
        return true;
    }
    line[1..line.len() - 1].iter().all(|hex| {
        let pos = hex.to_grid();
        world.is_passable(pos) && !occupied(pos)
    })
}

/// Compute the view of `player`.
///
/// Observers are the player's live actors. Each sees up to its weapon's
/// maximum range, or `default_sight_range` when unarmed. A cell is visible
/// when any observer has a clear line to it.
///
/// Returns `InvalidWorld` if an observer stands outside the grid, which
/// includes every observer of a zero-size world.
pub fn visible_world_for(
    world: &World,
    player: PlayerId,
    default_sight_range: u32,
) -> Result<PlayerView, GameError> {
    let rows = world.rows();
    let cols = world.cols();

    let observers: Vec<&Actor> = world
        .actors_owned_by(player)
        .filter(|a| a.is_alive())
        .collect();

    if observers.is_empty() {
        return Ok(PlayerView {
            terrain: vec![vec![Terrain::Unexplored; cols]; rows],
            actors: Vec::new(),
        });
    }

    if let Some(outside) = observers.iter().find(|a| !world.in_bounds(a.pos)) {
        return Err(GameError::InvalidWorld(format!(
            "observer {} at ({}, {}) is outside the {}x{} grid",
            outside.id, outside.pos.row, outside.pos.col, rows, cols
        )));
    }

    let mut occupancy = vec![vec![false; cols]; rows];
    for actor in world.actors.iter().filter(|a| world.in_bounds(a.pos)) {
        occupancy[actor.pos.row as usize][actor.pos.col as usize] = true;
    }
    let occupied = |pos: GridPos| occupancy[pos.row as usize][pos.col as usize];

    let mut visible = vec![vec![false; cols]; rows];
    for observer in &observers {
        let range = observer
            .weapon
            .as_ref()
            .map(|w| w.max_range)
            .unwrap_or(default_sight_range);

        for (row, cells) in visible.iter_mut().enumerate() {
            for (col, seen) in cells.iter_mut().enumerate() {
                if *seen {
                    continue;
                }
                let target = GridPos::new(row as i32, col as i32);
                if observer.pos.distance(target) > range {
                    continue;
                }
                // is_passable rejects out-of-bounds cells, so `occupied` only sees in-bounds ones
                if clear_line(world, observer.pos, target, occupied) {
                    *seen = true;
                }
            }
        }
    }

    let terrain = world
        .terrain()
        .iter()
        .zip(&visible)
        .map(|(cells, seen)| {
            cells
                .iter()
                .zip(seen)
                .map(|(t, s)| if *s { *t } else { Terrain::Unexplored })
                .collect()
        })
        .collect();

    let actors = world
        .actors
        .iter()
        .filter(|a| {
            a.owner == player
                || (world.in_bounds(a.pos) && visible[a.pos.row as usize][a.pos.col as usize])
        })
        .cloned()
        .collect();

    Ok(PlayerView { terrain, actors })
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::ActorId;

    const ME: PlayerId = PlayerId::new(0);
    const THEM: PlayerId = PlayerId::new(1);

    /// A single-column corridor; every cell lies on one straight hex line.
    fn corridor(len: usize) -> World {
        World::new_empty(len, 1)
    }

    #[test]
    fn test_no_observers_sees_nothing() {
        let mut world = World::new_empty(4, 4);
        world.add_actor(THEM, GridPos::new(1, 1), None).unwrap();

        let view = visible_world_for(&world, ME, 4).unwrap();
        assert_eq!(view.visible_count(), 0);
        assert!(view.actors.is_empty());
        assert_eq!(view.terrain.len(), 4);
        assert!(view.terrain.iter().all(|row| row.len() == 4));
    }

    #[test]
    fn test_own_tile_always_visible() {
        let mut world = World::new_empty(6, 6);
        world.add_actor(ME, GridPos::new(2, 3), None).unwrap();

        let view = visible_world_for(&world, ME, 0).unwrap();
        assert!(view.is_visible(GridPos::new(2, 3)));
        assert_eq!(view.visible_count(), 1);
        assert_eq!(view.actors.len(), 1);
    }

    #[test]
    fn test_straight_line_fully_visible() {
        let mut world = corridor(8);
        world.add_actor(ME, GridPos::new(0, 0), None).unwrap();

        let view = visible_world_for(&world, ME, 7).unwrap();
        for row in 0..8 {
            assert!(view.is_visible(GridPos::new(row, 0)), "row {} hidden", row);
        }
    }

    #[test]
    fn test_wall_hides_cells_beyond() {
        let mut world = corridor(8);
        world.set_terrain(GridPos::new(3, 0), Terrain::Blocked);
        world.add_actor(ME, GridPos::new(0, 0), None).unwrap();

        let view = visible_world_for(&world, ME, 7).unwrap();
        for row in 0..3 {
            assert!(view.is_visible(GridPos::new(row, 0)));
        }
        // The wall itself is seen
        assert_eq!(view.terrain[3][0], Terrain::Blocked);
        for row in 4..8 {
            assert_eq!(view.terrain[row][0], Terrain::Unexplored);
        }
    }

    #[test]
    fn test_actor_occludes_but_is_seen() {
        let mut world = corridor(8);
        world.add_actor(ME, GridPos::new(0, 0), None).unwrap();
        let blocker = world.add_actor(THEM, GridPos::new(2, 0), None).unwrap();
        let hidden = world.add_actor(THEM, GridPos::new(5, 0), None).unwrap();

        let view = visible_world_for(&world, ME, 7).unwrap();
        let ids: Vec<ActorId> = view.actors.iter().map(|a| a.id).collect();
        assert!(ids.contains(&blocker));
        assert!(!ids.contains(&hidden));
        assert!(!view.is_visible(GridPos::new(3, 0)));
    }

    #[test]
    fn test_sight_range_limits_view() {
        let mut world = corridor(8);
        world.add_actor(ME, GridPos::new(0, 0), None).unwrap();

        let view = visible_world_for(&world, ME, 2).unwrap();
        assert!(view.is_visible(GridPos::new(2, 0)));
        assert!(!view.is_visible(GridPos::new(3, 0)));
    }

    #[test]
    fn test_weapon_range_overrides_default() {
        let mut world = corridor(8);
        let weapon = crate::game::weapons::WeaponCatalog::default().loadout(0);
        let range = weapon.max_range as i32;
        world.add_actor(ME, GridPos::new(0, 0), Some(weapon)).unwrap();

        let view = visible_world_for(&world, ME, 1).unwrap();
        assert!(view.is_visible(GridPos::new(range, 0)));
        assert!(!view.is_visible(GridPos::new(range + 1, 0)));
    }

    #[test]
    fn test_union_across_observers() {
        let mut world = corridor(10);
        world.add_actor(ME, GridPos::new(0, 0), None).unwrap();
        world.add_actor(ME, GridPos::new(9, 0), None).unwrap();

        let view = visible_world_for(&world, ME, 2).unwrap();
        assert!(view.is_visible(GridPos::new(2, 0)));
        assert!(view.is_visible(GridPos::new(7, 0)));
        assert!(!view.is_visible(GridPos::new(5, 0)));
    }

    #[test]
    fn test_line_leaving_grid_hides_target() {
        // In a single row the line from column 0 to column 2 passes through
        // row -1 of column 1.
        let mut world = World::new_empty(1, 3);
        world.add_actor(ME, GridPos::new(0, 0), None).unwrap();

        let view = visible_world_for(&world, ME, 5).unwrap();
        assert!(view.is_visible(GridPos::new(0, 1)));
        assert!(!view.is_visible(GridPos::new(0, 2)));
    }

    #[test]
    fn test_dead_actors_do_not_observe_but_are_listed() {
        let mut world = corridor(4);
        let id = world.add_actor(ME, GridPos::new(0, 0), None).unwrap();
        world.actor_mut(id).unwrap().apply_damage(1000);

        let view = visible_world_for(&world, ME, 3).unwrap();
        assert_eq!(view.visible_count(), 0);
        assert!(view.actors.is_empty());

        world.add_actor(ME, GridPos::new(3, 0), None).unwrap();
        let view = visible_world_for(&world, ME, 3).unwrap();
        assert_eq!(view.actors.len(), 2);
    }

    #[test]
    fn test_zero_size_world_with_observer_fails() {
        let mut world = World::new_empty(0, 0);
        world.actors.push(Actor::new(ActorId::new(0), GridPos::new(0, 0), ME, None));

        let err = visible_world_for(&world, ME, 4).unwrap_err();
        assert!(matches!(err, GameError::InvalidWorld(_)));
    }

    #[test]
    fn test_view_never_mutates_world() {
        let mut world = World::generate(12, 12, 30, 7);
        world.spawn_squad(ME, 0, &crate::game::weapons::WeaponCatalog::default()).unwrap();
        let before = world.compute_hash();
        let _ = visible_world_for(&world, ME, 4).unwrap();
        assert_eq!(world.compute_hash(), before);
    }
}
