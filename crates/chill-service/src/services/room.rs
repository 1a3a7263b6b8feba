//! Room service
//!
//! Handles the room directory: listing, lookup, creation and seeding.

use std::collections::HashMap;

use chill_core::entities::{Participant, Room};
use chill_core::{DomainError, Snowflake, UserId};
use tracing::{debug, info, instrument};
use validator::Validate;

use crate::dto::{CreateRoomRequest, ParticipantWithUser, RoomResponse, RoomWithParticipants};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Room service
pub struct RoomService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> RoomService<'a> {
    /// Create a new RoomService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// List every room with its live participants, ordered by name
    #[instrument(skip(self))]
    pub async fn list_rooms(&self) -> ServiceResult<Vec<RoomResponse>> {
        let rooms = self.ctx.room_repo().list().await?;
        let room_ids: Vec<Snowflake> = rooms.iter().map(|r| r.id).collect();

        let participants = self.ctx.participant_repo().find_by_rooms(&room_ids).await?;
        let mut by_room: HashMap<Snowflake, Vec<Participant>> = HashMap::new();
        for participant in participants {
            by_room
                .entry(participant.room_id)
                .or_default()
                .push(participant);
        }

        let user_ids = unique_user_ids(by_room.values().flatten());
        let users = self.ctx.users_by_id(&user_ids).await?;

        let responses = rooms
            .into_iter()
            .map(|room| {
                let participants = by_room
                    .remove(&room.id)
                    .unwrap_or_default()
                    .into_iter()
                    .map(|participant| {
                        let user = users.get(&participant.user_id).cloned();
                        ParticipantWithUser { participant, user }
                    })
                    .collect();
                RoomResponse::from(RoomWithParticipants { room, participants })
            })
            .collect();

        Ok(responses)
    }

    /// Get one room with its live participants
    #[instrument(skip(self))]
    pub async fn get_room(&self, room_id: Snowflake) -> ServiceResult<RoomResponse> {
        let room = self.require_room(room_id).await?;
        self.room_response(room).await
    }

    /// Create a new room
    #[instrument(skip(self, request))]
    pub async fn create_room(&self, request: CreateRoomRequest) -> ServiceResult<RoomResponse> {
        let request = CreateRoomRequest {
            name: request.name.trim().to_string(),
            category: request.category.trim().to_string(),
        };
        request
            .validate()
            .map_err(|e| ServiceError::validation(e.to_string()))?;

        let room = Room::new(self.ctx.generate_id(), request.name, request.category);
        if !self.ctx.room_repo().create(&room).await? {
            return Err(ServiceError::conflict(format!(
                "Room name already taken: {}",
                room.name
            )));
        }

        info!(room_id = %room.id, name = %room.name, "Room created");

        Ok(RoomResponse::from(RoomWithParticipants {
            room,
            participants: Vec::new(),
        }))
    }

    /// Create each `(name, category)` room whose name is not taken yet.
    ///
    /// Returns the number of rooms created.
    #[instrument(skip(self, rooms))]
    pub async fn seed_rooms(&self, rooms: &[(&str, &str)]) -> ServiceResult<usize> {
        let mut created = 0;

        for &(name, category) in rooms {
            let room = Room::new(self.ctx.generate_id(), name, category);
            if self.ctx.room_repo().create(&room).await? {
                created += 1;
            } else {
                debug!(name, "Room already exists, skipping");
            }
        }

        info!(created, "Seeded default rooms");
        Ok(created)
    }

    /// Load a room or fail with `RoomNotFound`
    pub(crate) async fn require_room(&self, room_id: Snowflake) -> ServiceResult<Room> {
        self.ctx
            .room_repo()
            .find_by_id(room_id)
            .await?
            .ok_or_else(|| DomainError::RoomNotFound(room_id).into())
    }

    /// Build the room snapshot with the current roster
    pub(crate) async fn room_response(&self, room: Room) -> ServiceResult<RoomResponse> {
        let participants = self.ctx.participant_repo().find_by_room(room.id).await?;
        let user_ids = unique_user_ids(participants.iter());
        let users = self.ctx.users_by_id(&user_ids).await?;

        let participants = participants
            .into_iter()
            .map(|participant| {
                let user = users.get(&participant.user_id).cloned();
                ParticipantWithUser { participant, user }
            })
            .collect();

        Ok(RoomResponse::from(RoomWithParticipants { room, participants }))
    }
}

fn unique_user_ids<'p>(participants: impl Iterator<Item = &'p Participant>) -> Vec<UserId> {
    let mut ids: Vec<UserId> = participants.map(|p| p.user_id.clone()).collect();
    ids.sort();
    ids.dedup();
    ids
}
