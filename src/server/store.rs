//! Entity Store
//!
//! In-memory persistence: one arena per entity kind, indexed by typed ids.
//! Ids are arena slots and are never reused. The store has no internal
//! locking; [`GameService`](crate::server::service::GameService) wraps it.

use crate::error::GameError;
use crate::game::orders::TurnOrders;
use crate::game::state::{
    EntityId, Game, GameId, Player, PlayerId, TurnOrdersId, TurnResult, TurnResultId, WorldId,
};
use crate::game::world::World;

/// An arena of values of one kind.
#[derive(Debug)]
pub struct Table<K: EntityId, V> {
    slots: Vec<Option<V>>,
    _key: std::marker::PhantomData<K>,
}

impl<K: EntityId, V> Default for Table<K, V> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            _key: std::marker::PhantomData,
        }
    }
}

impl<K: EntityId, V> Table<K, V> {
    /// Id the next `create` will assign.
    pub fn next_id(&self) -> K {
        K::from_raw(self.slots.len() as u32)
    }

    /// Store a value and return its id.
    pub fn create(&mut self, value: V) -> K {
        let id = self.next_id();
        self.slots.push(Some(value));
        id
    }

    /// Store a value that embeds its own id.
    pub fn create_with(&mut self, build: impl FnOnce(K) -> V) -> K {
        let id = self.next_id();
        self.slots.push(Some(build(id)));
        id
    }

    /// Read a value, or fail with NotFound.
    pub fn read(&self, id: K) -> Result<&V, GameError> {
        self.slots
            .get(id.raw() as usize)
            .and_then(Option::as_ref)
            .ok_or_else(|| GameError::not_found(K::KIND, id.raw()))
    }

    /// Every value matching `predicate`, in id order.
    pub fn read_all<F>(&self, predicate: F) -> Vec<&V>
    where
        F: Fn(&V) -> bool,
    {
        self.slots
            .iter()
            .flatten()
            .filter(|v| predicate(*v))
            .collect()
    }

    /// Overwrite an existing value.
    pub fn replace(&mut self, id: K, value: V) -> Result<(), GameError> {
        let slot = self.slot_mut(id)?;
        *slot = value;
        Ok(())
    }

    /// Modify an existing value in place.
    pub fn update<F>(&mut self, id: K, apply: F) -> Result<(), GameError>
    where
        F: FnOnce(&mut V),
    {
        apply(self.slot_mut(id)?);
        Ok(())
    }

    /// Check whether `id` holds a value.
    pub fn contains(&self, id: K) -> bool {
        self.read(id).is_ok()
    }

    /// Remove a value. The id stays retired.
    pub fn remove(&mut self, id: K) -> Option<V> {
        self.slots.get_mut(id.raw() as usize).and_then(Option::take)
    }

    /// Number of live values.
    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// Check whether the table holds no live values.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot_mut(&mut self, id: K) -> Result<&mut V, GameError> {
        self.slots
            .get_mut(id.raw() as usize)
            .and_then(Option::as_mut)
            .ok_or_else(|| GameError::not_found(K::KIND, id.raw()))
    }
}

/// All persisted entities.
///
/// Actors are stored inside their world rather than in a table of their own,
/// so a world and its roster are always replaced together.
#[derive(Debug, Default)]
pub struct Store {
    /// Games.
    pub games: Table<GameId, Game>,
    /// Players.
    pub players: Table<PlayerId, Player>,
    /// Worlds, with their actors.
    pub worlds: Table<WorldId, World>,
    /// Accepted orders.
    pub turn_orders: Table<TurnOrdersId, TurnOrders>,
    /// Resolved turn results.
    pub turn_results: Table<TurnResultId, TurnResult>,
}

impl Store {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Orders accepted for `turn` of `game`.
    pub fn orders_for(&self, game: GameId, turn: u32) -> Vec<&TurnOrders> {
        self.turn_orders
            .read_all(|o| o.game_id == game && o.turn == turn)
    }

    /// Check whether `player` already has orders for `turn` of `game`.
    pub fn has_submitted(&self, game: GameId, turn: u32, player: PlayerId) -> bool {
        self.orders_for(game, turn)
            .iter()
            .any(|o| o.player_id == player)
    }

    /// The result of `turn` of `game` for `player`.
    pub fn result_for(&self, game: GameId, turn: u32, player: PlayerId) -> Option<&TurnResult> {
        self.turn_results
            .read_all(|r| r.game_id == game && r.turn == turn && r.player_id == player)
            .into_iter()
            .next()
    }
}
