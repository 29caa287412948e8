//! Game Service
//!
//! Coordinates games, players, order submission, and turn resolution over
//! the entity store.
//!
//! Every operation that mutates a game holds that game's mutex for its whole
//! duration, so the duplicate-submission check and the insert that follows
//! it cannot interleave with another call for the same game. Different games
//! never share a mutex.
//!
//! Turn resolution works on cloned snapshots and commits the new world, the
//! per-player results, and the turn increment in one store write. A failure
//! before the commit leaves the store untouched.

use std::collections::BTreeMap;
use std::sync::Arc;
use chrono::Utc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, instrument, warn};

use crate::MAX_SUPPORTED_PLAYERS;
use crate::core::rng::derive_game_seed;
use crate::error::{EntityKind, GameError};
use crate::game::orders::{distinct_submitters, validate_orders, RawActorOrder, TurnOrders, MSG_NOT_A_PLAYER};
use crate::game::state::{EntityId, Game, GameId, Player, PlayerId, TurnPhase, TurnStatus};
use crate::game::turn::{build_results, resolve_turn};
use crate::game::visibility::{visible_world_for, PlayerView};
use crate::game::world::World;
use crate::server::config::EngineConfig;
use crate::server::protocol::{JoinGameResponse, TurnReadResponse};
use crate::server::store::Store;

/// Shared game state and the operations on it.
pub struct GameService {
    /// Engine configuration.
    config: EngineConfig,
    /// All persisted entities.
    store: RwLock<Store>,
    /// One mutex per game, serializing its mutations.
    game_locks: RwLock<BTreeMap<GameId, Arc<Mutex<()>>>>,
}

impl GameService {
    /// Create a service with an empty store.
    ///
    /// Fails with `Validation` if `config` is out of bounds.
    pub fn new(config: EngineConfig) -> Result<Self, GameError> {
        config.validate()?;
        Ok(Self {
            config,
            store: RwLock::new(Store::new()),
            game_locks: RwLock::new(BTreeMap::new()),
        })
    }

    /// Engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The mutex guarding `game_id`, or NotFound.
    async fn game_lock(&self, game_id: GameId) -> Result<Arc<Mutex<()>>, GameError> {
        let locks = self.game_locks.read().await;
        locks
            .get(&game_id)
            .cloned()
            .ok_or_else(|| GameError::not_found(EntityKind::Game, game_id.raw()))
    }

    // =========================================================================
    // GAMES AND PLAYERS
    // =========================================================================

    /// Create a game with freshly generated terrain and no players.
    #[instrument(skip(self))]
    pub async fn create_game(&self, max_players: u32) -> Result<GameId, GameError> {
        if max_players == 0 || max_players as usize > MAX_SUPPORTED_PLAYERS {
            warn!("Rejected game with maxPlayers {}", max_players);
            return Err(GameError::validation(format!(
                "maxPlayers must be between 1 and {}",
                MAX_SUPPORTED_PLAYERS
            )));
        }

        let game_id = {
            let mut store = self.store.write().await;
            let game_id = store.games.next_id();
            let seed = derive_game_seed(self.config.base_seed, game_id.raw());
            let world = World::generate(self.config.rows, self.config.cols, self.config.blocked_percent, seed);
            let world_id = store.worlds.create(world);

            store.games.create_with(|id| Game {
                id,
                players: Vec::new(),
                max_players,
                turn: 1,
                world_id,
            })
        };

        self.game_locks
            .write()
            .await
            .insert(game_id, Arc::new(Mutex::new(())));

        info!(
            "Created game {} ({}x{}, max {} players)",
            game_id, self.config.rows, self.config.cols, max_players
        );
        Ok(game_id)
    }

    /// Add a new player to a game and spawn their squad.
    #[instrument(skip(self))]
    pub async fn join_game(&self, game_id: GameId) -> Result<JoinGameResponse, GameError> {
        let lock = self.game_lock(game_id).await?;
        let _guard = lock.lock().await;

        let mut store = self.store.write().await;
        let game = store.games.read(game_id)?.clone();
        if game.has_started() {
            warn!("Join rejected: game {} already started", game_id);
            return Err(GameError::conflict("game already started"));
        }
        if game.is_full() {
            warn!("Join rejected: game {} is full", game_id);
            return Err(GameError::conflict("game is full"));
        }

        let player_id = store.players.next_id();
        let slot = game.players.len() as u8;

        let mut world = store.worlds.read(game.world_id)?.clone();
        world.spawn_squad(player_id, slot, &self.config.weapon_catalog)?;
        let view = visible_world_for(&world, player_id, self.config.default_sight_range)?;

        store.worlds.replace(game.world_id, world)?;
        store.players.create_with(|id| Player { id, game_id, slot });
        store.games.update(game_id, |g| g.players.push(player_id))?;

        let player_count = game.players.len() as u32 + 1;
        info!("Player {} joined game {} in slot {} ({}/{})", player_id, game_id, slot, player_count, game.max_players);

        Ok(JoinGameResponse {
            game_id,
            player_id,
            turn: game.turn,
            world: view,
            player_count,
            max_players: game.max_players,
        })
    }

    // =========================================================================
    // ORDERS AND RESOLUTION
    // =========================================================================

    /// Accept one player's orders for one turn, then resolve the turn if
    /// every player has now submitted.
    #[instrument(skip(self, raw_orders), fields(orders = raw_orders.len()))]
    pub async fn submit_orders(
        &self,
        game_id: GameId,
        turn: u32,
        player_id: PlayerId,
        raw_orders: &[RawActorOrder],
    ) -> Result<TurnStatus, GameError> {
        let lock = self.game_lock(game_id).await?;
        let _guard = lock.lock().await;

        {
            let mut store = self.store.write().await;
            let game = store.games.read(game_id)?;
            let world = store.worlds.read(game.world_id)?;

            let orders = validate_orders(raw_orders, game, world, turn, player_id).map_err(|e| {
                warn!("Orders rejected for player {} in game {}: {}", player_id, game_id, e);
                e
            })?;

            if store.has_submitted(game_id, turn, player_id) {
                warn!("Duplicate orders from player {} for game {} turn {}", player_id, game_id, turn);
                return Err(GameError::conflict("orders already submitted for this turn"));
            }

            store.turn_orders.create(TurnOrders {
                game_id,
                turn,
                player_id,
                orders,
                submitted_at: Utc::now(),
            });
            debug!("Accepted orders from player {} for game {} turn {}", player_id, game_id, turn);
        }

        self.resolve_locked(game_id).await
    }

    /// Resolve the current turn of a game if the barrier is reached.
    ///
    /// Returns `complete: false` while players are still missing.
    #[instrument(skip(self))]
    pub async fn resolve_turn(&self, game_id: GameId) -> Result<TurnStatus, GameError> {
        let lock = self.game_lock(game_id).await?;
        let _guard = lock.lock().await;
        self.resolve_locked(game_id).await
    }

    /// Barrier check and resolution. The caller holds the game's mutex.
    async fn resolve_locked(&self, game_id: GameId) -> Result<TurnStatus, GameError> {
        let (game, mut world, orders) = {
            let store = self.store.read().await;
            let game = store.games.read(game_id)?.clone();
            let orders: Vec<TurnOrders> = store
                .orders_for(game_id, game.turn)
                .into_iter()
                .cloned()
                .collect();

            let submitted = distinct_submitters(&orders);
            let expected = game.players.len();
            if expected == 0 || submitted < expected {
                debug!("Game {} turn {}: {} of {} players submitted", game_id, game.turn, submitted, expected);
                return Ok(TurnStatus::waiting(submitted, expected));
            }

            let world = store.worlds.read(game.world_id)?.clone();
            (game, world, orders)
        };

        let outcome = resolve_turn(&mut world, &orders);
        let results = build_results(&world, game.id, game.turn, &game.players, Utc::now());
        let next_turn = game.turn + 1;

        {
            let mut store = self.store.write().await;
            // Check everything the commit touches before writing any of it
            store.games.read(game_id)?;
            store.worlds.read(game.world_id)?;

            store.worlds.replace(game.world_id, world)?;
            for result in results {
                store.turn_results.create(result);
            }
            store.games.update(game_id, |g| g.turn = next_turn)?;
        }

        info!(
            "Resolved game {} turn {}: {} orders, {} events, {} kills, digest {}",
            game_id,
            game.turn,
            orders.iter().map(|o| o.orders.len()).sum::<usize>(),
            outcome.events.len(),
            outcome.kills(),
            hex::encode(outcome.world_hash)
        );

        Ok(TurnStatus::completed(next_turn))
    }

    // =========================================================================
    // READS
    // =========================================================================

    /// Read one player's view of one turn.
    ///
    /// A resolved turn yields the player's result; the current turn yields
    /// the player's fog-of-war view; a later turn yields `success: false`.
    #[instrument(skip(self))]
    pub async fn read_turn(
        &self,
        game_id: GameId,
        turn: u32,
        player_id: PlayerId,
    ) -> Result<TurnReadResponse, GameError> {
        let store = self.store.read().await;
        let game = store.games.read(game_id)?;
        if !game.has_player(player_id) {
            return Err(GameError::validation(MSG_NOT_A_PLAYER));
        }

        if turn < game.turn {
            let result = store
                .result_for(game_id, turn, player_id)
                .cloned()
                .ok_or_else(|| GameError::not_found(EntityKind::TurnResult, turn))?;
            return Ok(TurnReadResponse {
                success: true,
                results: Some(result),
                world: None,
                message: None,
            });
        }

        if turn == game.turn {
            let world = store.worlds.read(game.world_id)?;
            let view = visible_world_for(world, player_id, self.config.default_sight_range)?;
            return Ok(TurnReadResponse {
                success: true,
                results: None,
                world: Some(view),
                message: Some(format!("turn {} has not been resolved yet", turn)),
            });
        }

        Ok(TurnReadResponse {
            success: false,
            results: None,
            world: None,
            message: Some(format!("turn {} has not started; current turn is {}", turn, game.turn)),
        })
    }

    /// Read a player's current fog-of-war view.
    pub async fn player_view(&self, game_id: GameId, player_id: PlayerId) -> Result<PlayerView, GameError> {
        let store = self.store.read().await;
        let game = store.games.read(game_id)?;
        if !game.has_player(player_id) {
            return Err(GameError::validation(MSG_NOT_A_PLAYER));
        }
        let world = store.worlds.read(game.world_id)?;
        visible_world_for(world, player_id, self.config.default_sight_range)
    }

    /// Read a game record.
    pub async fn game(&self, game_id: GameId) -> Result<Game, GameError> {
        let store = self.store.read().await;
        store.games.read(game_id).cloned()
    }

    /// Lifecycle phase of `turn` of a game.
    ///
    /// Earlier turns are `Advanced`. The current turn is `AwaitingOrders`
    /// until every player has submitted and `Resolving` from then until the
    /// turn counter moves.
    pub async fn turn_phase(&self, game_id: GameId, turn: u32) -> Result<TurnPhase, GameError> {
        let store = self.store.read().await;
        let game = store.games.read(game_id)?;

        if turn < game.turn {
            return Ok(TurnPhase::Advanced { turn: turn + 1 });
        }
        if turn > game.turn {
            return Err(GameError::validation(format!("turn {} has not started", turn)));
        }

        let orders: Vec<TurnOrders> = store.orders_for(game_id, turn).into_iter().cloned().collect();
        let submitted = distinct_submitters(&orders) as u32;
        let expected = game.players.len() as u32;
        if expected > 0 && submitted >= expected {
            Ok(TurnPhase::Resolving)
        } else {
            Ok(TurnPhase::AwaitingOrders { submitted, expected })
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
