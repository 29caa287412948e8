//! End-to-end checks of the JSON wire contract through the game service.

use chrono::Utc;
use serde_json::{json, Value};

use hex_tactics::{
    EngineConfig, GameError, GameService, GameId, GridPos, PlayerId, World, ACTOR_MAX_HEALTH, SQUAD_SIZE,
    game::orders::{validate_orders, TurnOrders},
    game::state::{Game, WorldId},
    game::turn::resolve_turn,
    game::weapons::Weapon,
    server::protocol::{
        CreateGameRequest, CreateGameResponse, ErrorResponse, SubmitOrdersRequest, SubmitOrdersResponse,
    },
    server::WireMessage,
};

fn to_value<T: WireMessage>(body: &T) -> Value {
    serde_json::from_str(&body.to_json().unwrap()).unwrap()
}

#[tokio::test]
async fn test_single_player_game_over_the_wire() {
    let service = GameService::new(EngineConfig::default()).unwrap();

    let request = CreateGameRequest::from_json(r#"{"maxPlayers": 1}"#).unwrap();
    let game_id = service.create_game(request.max_players).await.unwrap();
    assert_eq!(to_value(&CreateGameResponse { id: game_id }), json!({"id": game_id.0}));

    let joined = to_value(&service.join_game(game_id).await.unwrap());
    assert_eq!(joined["gameId"], json!(game_id.0));
    assert_eq!(joined["turn"], json!(1));
    assert_eq!(joined["playerCount"], json!(1));
    assert_eq!(joined["maxPlayers"], json!(1));
    let player_id = PlayerId::new(joined["playerId"].as_u64().unwrap() as u32);

    let spawned = joined["world"]["actors"].as_array().unwrap().clone();
    assert_eq!(spawned.len(), SQUAD_SIZE);
    let mut cells: Vec<(i64, i64)> = spawned
        .iter()
        .map(|a| (a["pos"]["x"].as_i64().unwrap(), a["pos"]["y"].as_i64().unwrap()))
        .collect();
    cells.sort();
    let (x0, y0) = cells[0];
    let block: Vec<(i64, i64)> = (0..3).flat_map(|dx| (0..3).map(move |dy| (x0 + dx, y0 + dy))).collect();
    assert_eq!(cells, block);

    let body = SubmitOrdersRequest::from_json(r#"{"orders": []}"#).unwrap();
    let status = service.submit_orders(game_id, 1, player_id, &body.orders).await.unwrap();
    assert_eq!(
        to_value(&SubmitOrdersResponse { turn_status: status }),
        json!({"turnStatus": {"complete": true, "turn": 2}})
    );

    let read = to_value(&service.read_turn(game_id, 1, player_id).await.unwrap());
    assert_eq!(read["success"], json!(true));
    let updated = read["results"]["updatedActors"].as_array().unwrap();
    assert_eq!(updated.len(), SQUAD_SIZE);
    for actor in updated {
        let before = spawned.iter().find(|a| a["id"] == actor["id"]).unwrap();
        assert_eq!(actor["pos"], before["pos"]);
        assert_eq!(actor["state"], json!("ALIVE"));
    }
}

#[tokio::test]
async fn test_rejections_carry_status_codes() {
    let service = GameService::new(EngineConfig::default()).unwrap();
    let game_id = service.create_game(2).await.unwrap();
    let player_id = service.join_game(game_id).await.unwrap().player_id;

    let body = SubmitOrdersRequest::from_json(
        r#"{"orders": [{"actorId": 0, "orderType": "MOVE", "ordersList": [1, 2, 12]}]}"#,
    )
    .unwrap();
    let err = service.submit_orders(game_id, 1, player_id, &body.orders).await.unwrap_err();
    assert_eq!(
        to_value(&ErrorResponse::from(&err)),
        json!({"status": 400, "message": "invalid direction value 12"})
    );

    let err = service.submit_orders(game_id, 5, player_id, &[]).await.unwrap_err();
    assert_eq!(to_value(&ErrorResponse::from(&err))["status"], json!(400));

    // A second player keeps turn 1 open after the first submission
    service.join_game(game_id).await.unwrap();
    let status = service.submit_orders(game_id, 1, player_id, &[]).await.unwrap();
    assert!(!status.complete);
    let err = service.submit_orders(game_id, 1, player_id, &[]).await.unwrap_err();
    assert_eq!(
        to_value(&ErrorResponse::from(&err)),
        json!({"status": 409, "message": "orders already submitted for this turn"})
    );

    let err = service.read_turn(GameId::new(9), 1, player_id).await.unwrap_err();
    assert_eq!(err, GameError::NotFound { kind: hex_tactics::error::EntityKind::Game, id: 9 });

    let err = SubmitOrdersRequest::from_json(r#"{"orders": 3}"#).unwrap_err();
    assert_eq!(ErrorResponse::from(&err).status, 400);
}

/// Attacker in a single-column corridor, target `distance` rows below.
fn duel(distance: i32) -> (Game, World) {
    let mut world = World::new_empty(10, 1);
    let rifle = Weapon {
        name: "rifle".to_string(),
        min_range: None,
        max_range: 5,
        damage: 7,
        ammo: None,
    };
    world.add_actor(PlayerId::new(0), GridPos::new(0, 0), Some(rifle)).unwrap();
    world.add_actor(PlayerId::new(1), GridPos::new(distance, 0), None).unwrap();
    let game = Game {
        id: GameId::new(0),
        players: vec![PlayerId::new(0), PlayerId::new(1)],
        max_players: 2,
        turn: 1,
        world_id: WorldId::new(0),
    };
    (game, world)
}

/// Resolve one turn of actor 0 attacking actor 1; returns the target's health.
fn fire(distance: i32) -> u32 {
    let (game, mut world) = duel(distance);
    let body = SubmitOrdersRequest::from_json(
        r#"{"orders": [{"actorId": 0, "orderType": "ATTACK", "targetId": 1}]}"#,
    )
    .unwrap();
    let orders = validate_orders(&body.orders, &game, &world, 1, PlayerId::new(0)).unwrap();
    let turn_orders = TurnOrders {
        game_id: game.id,
        turn: 1,
        player_id: PlayerId::new(0),
        orders,
        submitted_at: Utc::now(),
    };
    resolve_turn(&mut world, &[turn_orders]);
    world.actors[1].health
}

#[test]
fn test_attack_range_boundary() {
    let in_range = fire(5);
    assert_eq!(in_range, ACTOR_MAX_HEALTH - 7 * hex_tactics::TIMESTEP_MAX as u32);
    assert_eq!(fire(6), ACTOR_MAX_HEALTH);
}
