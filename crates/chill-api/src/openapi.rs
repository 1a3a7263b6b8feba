//! OpenAPI document for the REST surface

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use chill_service::dto::{
    CreateRoomRequest, HealthChecks, HealthResponse, MessageResponse, ParticipantResponse,
    ReadinessResponse, RoomResponse, UploadResponse, UploadedFile, UserResponse,
};

use crate::handlers::{health, messages, rooms, upload};

#[derive(OpenApi)]
#[openapi(
    info(title = "Chill Rooms API", description = "Room directory, message history and uploads"),
    paths(
        health::health_check,
        health::readiness_check,
        rooms::list_rooms,
        rooms::get_room,
        rooms::create_room,
        messages::list_messages,
        messages::delete_message,
        upload::upload_image,
    ),
    components(schemas(
        CreateRoomRequest,
        RoomResponse,
        ParticipantResponse,
        UserResponse,
        MessageResponse,
        UploadResponse,
        UploadedFile,
        upload::UploadImageForm,
        HealthResponse,
        ReadinessResponse,
        HealthChecks,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "rooms", description = "Room directory"),
        (name = "messages", description = "Message history"),
        (name = "upload", description = "Editor image uploads"),
        (name = "health", description = "Probes"),
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();

        for expected in [
            "/health",
            "/health/ready",
            "/api/v1/rooms",
            "/api/v1/rooms/{room_id}",
            "/api/v1/rooms/{room_id}/messages",
            "/api/v1/rooms/{room_id}/messages/{message_id}",
            "/api/v1/upload/image",
        ] {
            assert!(paths.contains(&expected), "missing {expected}");
        }

        let schemes = &doc.components.unwrap().security_schemes;
        assert!(schemes.contains_key("bearer"));
    }
}
