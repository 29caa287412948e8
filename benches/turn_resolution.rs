use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};

use hex_tactics::game::orders::{ActorOrders, OrderType, TurnOrders};
use hex_tactics::game::turn::resolve_turn;
use hex_tactics::game::visibility::visible_world_for;
use hex_tactics::game::weapons::WeaponCatalog;
use hex_tactics::{Direction, GameId, PlayerId, World, DEFAULT_SIGHT_RANGE, TIMESTEP_MAX};

fn make_world(players: u8) -> World {
    let mut world = World::generate(20, 20, 15, 0xBEEF);
    let catalog = WeaponCatalog::default();
    for slot in 0..players {
        world
            .spawn_squad(PlayerId::new(slot as u32), slot, &catalog)
            .expect("spawn blocks are reserved");
    }
    world
}

/// One turn of random moves and attacks for every actor.
fn make_orders(world: &World, players: u8, seed: u64) -> Vec<TurnOrders> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..players)
        .map(|slot| {
            let player = PlayerId::new(slot as u32);
            let orders = world
                .actors_owned_by(player)
                .map(|actor| {
                    if rng.gen_bool(0.3) {
                        let target = &world.actors[rng.gen_range(0..world.actors.len())];
                        ActorOrders {
                            actor_id: actor.id,
                            order_type: OrderType::Attack,
                            orders_list: [Direction::None; TIMESTEP_MAX],
                            target_id: Some(target.id),
                        }
                    } else {
                        let mut schedule = [Direction::None; TIMESTEP_MAX];
                        for step in schedule.iter_mut() {
                            *step = Direction::ALL[rng.gen_range(0..Direction::ALL.len())];
                        }
                        ActorOrders {
                            actor_id: actor.id,
                            order_type: OrderType::Move,
                            orders_list: schedule,
                            target_id: None,
                        }
                    }
                })
                .collect();
            TurnOrders {
                game_id: GameId::new(0),
                turn: 1,
                player_id: player,
                orders,
                submitted_at: Utc::now(),
            }
        })
        .collect()
}

fn bench_visibility(c: &mut Criterion) {
    let world = make_world(4);
    c.bench_function("visible_world_for", |b| {
        b.iter(|| visible_world_for(black_box(&world), PlayerId::new(0), DEFAULT_SIGHT_RANGE))
    });
}

fn bench_resolve_turn(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_turn");
    for players in 2..=4u8 {
        let world = make_world(players);
        let orders = make_orders(&world, players, 42);
        group.bench_with_input(BenchmarkId::from_parameter(players), &players, |b, _| {
            b.iter(|| {
                let mut scratch = world.clone();
                resolve_turn(&mut scratch, black_box(&orders))
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_visibility, bench_resolve_turn);
criterion_main!(benches);
