//! Hex Tactics Server
//!
//! Demo binary: plays a scripted two-player game through the service layer
//! and logs every turn's outcome.

use anyhow::{ensure, Context};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use hex_tactics::{
    EngineConfig, GameService, TIMESTEP_MAX, VERSION,
    game::orders::{OrderType, RawActorOrder},
    game::world::Actor,
    server::WireMessage,
    server::protocol::SubmitOrdersResponse,
};

/// Turns the demo plays.
const DEMO_TURNS: u32 = 4;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    let config = EngineConfig::from_env();

    info!("Hex Tactics Server v{}", VERSION);
    info!("Grid: {}x{}, {}% blocked, seed {}", config.rows, config.cols, config.blocked_percent, config.base_seed);
    info!("Timesteps per turn: {}", TIMESTEP_MAX);

    let service = GameService::new(config).context("invalid engine configuration")?;
    demo_game(service).await
}

/// Play a short two-player game: one squad advances, the other holds and fires.
async fn demo_game(service: GameService) -> anyhow::Result<()> {
    info!("=== Starting Demo Game ===");

    let game_id = service.create_game(2).await?;
    let red = service.join_game(game_id).await?;
    let blue = service.join_game(game_id).await?;
    info!(
        "Red is player {}, blue is player {}; red sees {} cells",
        red.player_id,
        blue.player_id,
        red.world.visible_count()
    );

    for turn in 1..=DEMO_TURNS {
        let red_view = service.player_view(game_id, red.player_id).await?;
        let blue_view = service.player_view(game_id, blue.player_id).await?;

        let red_orders = advance_orders(&red_view.actors, red.player_id);
        let blue_orders = fire_orders(&blue_view.actors, blue.player_id);

        let waiting = service.submit_orders(game_id, turn, red.player_id, &red_orders).await?;
        ensure!(!waiting.complete, "turn {} resolved before blue submitted", turn);

        let status = service.submit_orders(game_id, turn, blue.player_id, &blue_orders).await?;
        let body = SubmitOrdersResponse { turn_status: status }.to_json()?;
        info!("Turn {} submitted: {}", turn, body);
    }

    info!("=== Game Results ===");
    for player in [red.player_id, blue.player_id] {
        let read = service.read_turn(game_id, DEMO_TURNS, player).await?;
        let Some(result) = read.results else {
            warn!("No result for player {} on turn {}", player, DEMO_TURNS);
            continue;
        };
        let alive = result.updated_actors.iter().filter(|a| a.is_alive()).count();
        let health: u32 = result.updated_actors.iter().map(|a| a.health).sum();
        info!("Player {}: {} actors alive, {} total health", player, alive, health);
    }

    Ok(())
}

/// Every live actor of `owner` walks south-east for the whole turn.
fn advance_orders(actors: &[Actor], owner: hex_tactics::PlayerId) -> Vec<RawActorOrder> {
    actors
        .iter()
        .filter(|a| a.owner == owner && a.is_alive())
        .map(|a| RawActorOrder {
            actor_id: a.id.0,
            order_type: OrderType::Move,
            orders_list: Some(vec![3; TIMESTEP_MAX]),
            target_id: None,
        })
        .collect()
}

/// Every live actor of `owner` fires at the first visible enemy.
fn fire_orders(actors: &[Actor], owner: hex_tactics::PlayerId) -> Vec<RawActorOrder> {
    let Some(target) = actors.iter().find(|a| a.owner != owner && a.is_alive()) else {
        return Vec::new();
    };
    actors
        .iter()
        .filter(|a| a.owner == owner && a.is_alive())
        .map(|a| RawActorOrder {
            actor_id: a.id.0,
            order_type: OrderType::Attack,
            orders_list: None,
            target_id: Some(target.id.0),
        })
        .collect()
}
