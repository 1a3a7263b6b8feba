//! Room directory handlers

use axum::{
    extract::{Path, State},
    Json,
};
use chill_service::dto::{CreateRoomRequest, RoomResponse};
use chill_service::RoomService;

use crate::extractors::{AuthUser, RoomPath, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// List every room with its live participants, ordered by name
#[utoipa::path(
    get,
    path = "/api/v1/rooms",
    tag = "rooms",
    responses((status = 200, description = "All rooms", body = [RoomResponse]))
)]
pub async fn list_rooms(State(state): State<AppState>) -> ApiResult<Json<Vec<RoomResponse>>> {
    let rooms = RoomService::new(state.service_context()).list_rooms().await?;
    Ok(Json(rooms))
}

/// Get one room with its live participants
#[utoipa::path(
    get,
    path = "/api/v1/rooms/{room_id}",
    tag = "rooms",
    params(("room_id" = String, Path, description = "Room id")),
    responses(
        (status = 200, description = "The room", body = RoomResponse),
        (status = 404, description = "Unknown room")
    )
)]
pub async fn get_room(
    State(state): State<AppState>,
    Path(path): Path<RoomPath>,
) -> ApiResult<Json<RoomResponse>> {
    let room = RoomService::new(state.service_context())
        .get_room(path.room_id()?)
        .await?;
    Ok(Json(room))
}

/// Create a room
#[utoipa::path(
    post,
    path = "/api/v1/rooms",
    tag = "rooms",
    request_body = CreateRoomRequest,
    security(("bearer" = [])),
    responses(
        (status = 201, description = "Room created", body = RoomResponse),
        (status = 400, description = "Invalid name or category"),
        (status = 401, description = "Missing or invalid token"),
        (status = 409, description = "Room name already taken")
    )
)]
pub async fn create_room(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateRoomRequest>,
) -> ApiResult<Created<Json<RoomResponse>>> {
    let room = RoomService::new(state.service_context())
        .create_room(request)
        .await?;

    tracing::info!(room_id = %room.id, created_by = %auth.user_id, "Room created via API");

    Ok(Created(Json(room)))
}
