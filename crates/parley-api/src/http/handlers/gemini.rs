//! Chat session endpoints under `/api/gemini`.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use parley_core::chat::session::LoadOutcome;
use parley_types::chat::ChatSummary;

use crate::http::error::AppError;
use crate::state::AppState;

/// Body returned with 404 when `load_chat` had to create the chat.
pub const CHAT_CREATED_MESSAGE: &str =
    "Session ID not found. Creating new Chat with the provided session ID";

// Missing or null fields become empty so the controller reports them as bad input.

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PromptRequest {
    pub prompt: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoadChatRequest {
    pub session_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeleteChatsRequest {
    pub session_ids: Option<Vec<String>>,
}

/// POST /api/gemini/request
pub async fn request(
    State(state): State<AppState>,
    body: Result<Json<PromptRequest>, JsonRejection>,
) -> Result<Json<String>, AppError> {
    let Json(body) = body?;
    let prompt = body.prompt.unwrap_or_default();
    let mut controller = state.controller.lock().await;
    let reply = controller.send_message(&prompt).await?;
    Ok(Json(reply))
}

/// POST /api/gemini/new_chat
pub async fn new_chat(State(state): State<AppState>) -> Result<Json<String>, AppError> {
    let mut controller = state.controller.lock().await;
    let session_id = controller.start_new_chat().await?;
    Ok(Json(session_id))
}

/// POST /api/gemini/load_chat
///
/// An unknown id answers 404 but still leaves an empty chat under that id
/// as the current session.
pub async fn load_chat(
    State(state): State<AppState>,
    body: Result<Json<LoadChatRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(body) = body?;
    let session_id = body.session_id.unwrap_or_default();
    let mut controller = state.controller.lock().await;
    match controller.load_chat(&session_id)? {
        LoadOutcome::Loaded(chat) => Ok(Json(chat).into_response()),
        LoadOutcome::Created(_) => {
            Ok((StatusCode::NOT_FOUND, Json(CHAT_CREATED_MESSAGE)).into_response())
        }
    }
}

/// POST or DELETE /api/gemini/delete_chats
///
/// Answers 404 with the ids that were deleted when some requested ids were
/// not stored.
pub async fn delete_chats(
    State(state): State<AppState>,
    body: Result<Json<DeleteChatsRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Vec<String>>), AppError> {
    let Json(body) = body?;
    let session_ids = body.session_ids.unwrap_or_default();
    let mut controller = state.controller.lock().await;
    let outcome = controller.delete_chats(&session_ids).await?;
    let status = if outcome.complete {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    };
    Ok((status, Json(outcome.deleted)))
}

/// GET /api/gemini/current_session_id
pub async fn current_session_id(State(state): State<AppState>) -> Json<String> {
    let controller = state.controller.lock().await;
    Json(controller.current_session_id().to_string())
}

/// GET /api/gemini/all_chat_summaries
pub async fn all_chat_summaries(State(state): State<AppState>) -> Json<Vec<ChatSummary>> {
    let controller = state.controller.lock().await;
    Json(controller.all_chat_summaries())
}
