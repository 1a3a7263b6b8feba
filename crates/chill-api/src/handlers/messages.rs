//! Message history handlers

use axum::{
    extract::{Path, State},
    Json,
};
use chill_service::dto::MessageResponse;
use chill_service::MessageService;

use crate::extractors::{AuthUser, HistoryQuery, RoomMessagePath, RoomPath};
use crate::response::{ApiResult, NoContent};
use crate::state::AppState;

/// Recent messages in a room, newest first
#[utoipa::path(
    get,
    path = "/api/v1/rooms/{room_id}/messages",
    tag = "messages",
    params(
        ("room_id" = String, Path, description = "Room id"),
        chill_service::dto::ListMessagesQuery
    ),
    responses(
        (status = 200, description = "Newest first", body = [MessageResponse]),
        (status = 404, description = "Unknown room")
    )
)]
pub async fn list_messages(
    State(state): State<AppState>,
    Path(path): Path<RoomPath>,
    query: HistoryQuery,
) -> ApiResult<Json<Vec<MessageResponse>>> {
    let messages = MessageService::new(state.service_context())
        .list_recent(path.room_id()?, query.limit)
        .await?;
    Ok(Json(messages))
}

/// Delete a message; only its sender may
#[utoipa::path(
    delete,
    path = "/api/v1/rooms/{room_id}/messages/{message_id}",
    tag = "messages",
    params(
        ("room_id" = String, Path, description = "Room id"),
        ("message_id" = String, Path, description = "Message id")
    ),
    security(("bearer" = [])),
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Not the sender"),
        (status = 404, description = "Unknown message")
    )
)]
pub async fn delete_message(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<RoomMessagePath>,
) -> ApiResult<NoContent> {
    MessageService::new(state.service_context())
        .delete_message(Some(path.room_id()?), path.message_id()?, &auth.user_id)
        .await?;
    Ok(NoContent)
}
