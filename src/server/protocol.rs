//! Wire Protocol
//!
//! JSON request and response bodies of the game HTTP surface. Field names are
//! camelCase on the wire. Parse failures surface as validation errors.

use serde::{de::DeserializeOwned, Serialize, Deserialize};

use crate::error::GameError;
use crate::game::orders::RawActorOrder;
use crate::game::state::{GameId, PlayerId, TurnResult, TurnStatus};
use crate::game::visibility::PlayerView;

// =============================================================================
// REQUESTS / RESPONSES
// =============================================================================

/// `POST /games`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGameRequest {
    /// Player capacity.
    pub max_players: u32,
}

/// Response to `POST /games`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateGameResponse {
    /// New game id.
    pub id: GameId,
}

/// Response to `POST /games/{id}/join`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinGameResponse {
    /// Joined game.
    pub game_id: GameId,
    /// Newly minted player.
    pub player_id: PlayerId,
    /// Current turn.
    pub turn: u32,
    /// The new player's fog-of-war view.
    pub world: PlayerView,
    /// Players in the game, including this one.
    pub player_count: u32,
    /// Player capacity.
    pub max_players: u32,
}

/// `POST /games/{gameId}/turns/{turn}/players/{playerId}`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitOrdersRequest {
    /// One entry per ordered actor.
    pub orders: Vec<RawActorOrder>,
}

/// Response to an order submission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOrdersResponse {
    /// Barrier status after this submission.
    pub turn_status: TurnStatus,
}

/// Response to `GET /games/{gameId}/turns/{turn}/players/{playerId}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnReadResponse {
    /// False when the turn has not started yet.
    pub success: bool,
    /// The player's result, for resolved turns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<TurnResult>,
    /// The player's current view, for the turn in progress.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub world: Option<PlayerView>,
    /// Progress note.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Body sent with a non-2xx status.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// HTTP status code.
    pub status: u16,
    /// Error message.
    pub message: String,
}

impl From<&GameError> for ErrorResponse {
    fn from(err: &GameError) -> Self {
        Self {
            status: err.status_code(),
            message: err.to_string(),
        }
    }
}

// =============================================================================
// SERIALIZATION HELPERS
// =============================================================================

/// JSON encoding shared by every wire body.
pub trait WireMessage: Serialize + DeserializeOwned {
    /// Serialize to JSON string.
    fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string.
    fn from_json(s: &str) -> Result<Self, GameError> {
        serde_json::from_str(s)
            .map_err(|e| GameError::validation(format!("malformed request body: {}", e)))
    }
}

impl WireMessage for CreateGameRequest {}
impl WireMessage for CreateGameResponse {}
impl WireMessage for JoinGameResponse {}
impl WireMessage for SubmitOrdersRequest {}
impl WireMessage for SubmitOrdersResponse {}
impl WireMessage for TurnReadResponse {}
impl WireMessage for ErrorResponse {}
