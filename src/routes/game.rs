//! Guessing-game endpoints.

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::error::ApiError;
use crate::routes::parse_json;
use crate::server::AppState;
use crate::session::{Attempt, GameId};

/// Optional body of `POST /api/game/newgame`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewGameRequest {
    /// Overrides the server default.
    pub allow_repeats: Option<bool>,
}

/// Reply to `POST /api/game/newgame`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGameResponse {
    /// Id to send with every guess.
    pub game_id: GameId,
    /// Greeting.
    pub message: String,
    /// Always `true`.
    pub success: bool,
    /// Whether the secret may repeat digits.
    pub allow_repeats: bool,
}

/// Body of `POST /api/game/guess`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuessRequest {
    /// Target session.
    pub game_id: GameId,
    /// Raw guess, validated server-side.
    #[serde(default)]
    pub guess: String,
}

/// Reply to a scored guess.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuessResponse {
    /// Exact matches.
    pub a: u8,
    /// Partial matches.
    pub b: u8,
    /// True when the guess was the secret.
    pub is_win: bool,
    /// Human-readable result.
    pub message: String,
    /// Attempts so far.
    pub attempt_count: usize,
    /// Always `true`.
    pub success: bool,
}

/// Reply to `GET /api/game/{id}/history`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    /// Session id.
    pub game_id: GameId,
    /// Attempts in submission order.
    pub history: Vec<Attempt>,
    /// True once the secret was guessed.
    pub is_completed: bool,
    /// Number of attempts.
    pub attempt_count: usize,
}

/// Starts a new game.
#[instrument(skip(state, body))]
pub async fn new_game(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<NewGameResponse>, ApiError> {
    let request: NewGameRequest = if body.is_empty() {
        NewGameRequest::default()
    } else {
        parse_json(&body)?
    };
    let allow_repeats = request
        .allow_repeats
        .unwrap_or(state.default_allow_repeats);

    let game_id = state.sessions.create_session(allow_repeats)?;
    info!(game_id, allow_repeats, "New game started");

    Ok(Json(NewGameResponse {
        game_id,
        message: "New game started! Guess the 4-digit number".to_string(),
        success: true,
        allow_repeats,
    }))
}

/// Scores a guess.
#[instrument(skip(state, body))]
pub async fn guess(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<GuessResponse>, ApiError> {
    let request: GuessRequest = parse_json(&body)?;
    let outcome = state
        .sessions
        .submit_guess(request.game_id, &request.guess)?;

    let message = match outcome.secret {
        Some(secret) => format!(
            "Congratulations! The answer was {secret}, found in {} attempts",
            outcome.attempt_count
        ),
        None => format!("Result: {}, keep going!", outcome.score),
    };

    Ok(Json(GuessResponse {
        a: outcome.score.exact,
        b: outcome.score.partial,
        is_win: outcome.is_win,
        message,
        attempt_count: outcome.attempt_count,
        success: true,
    }))
}

/// Returns a session's attempts.
#[instrument(skip(state))]
pub async fn history(
    State(state): State<AppState>,
    Path(game_id): Path<GameId>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let snapshot = state.sessions.history(game_id)?;
    let attempt_count = snapshot.attempt_count();

    Ok(Json(HistoryResponse {
        game_id: snapshot.id,
        history: snapshot.attempts,
        is_completed: snapshot.is_completed,
        attempt_count,
    }))
}
