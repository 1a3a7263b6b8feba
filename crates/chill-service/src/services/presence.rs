//! Presence service
//!
//! Handles room membership: join, leave and emoji/status updates. The cached
//! `active_users` count is always re-derived from the participant rows.

use chill_core::entities::Participant;
use chill_core::{DomainError, Snowflake, UserId};
use tracing::{debug, info, instrument};

use crate::dto::{JoinRoomResponse, ParticipantResponse, ParticipantWithUser};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::message::MessageService;
use super::room::RoomService;

/// Number of messages handed to a client when it joins a room
pub const JOIN_MESSAGE_WINDOW: i64 = 20;

/// Presence service
pub struct PresenceService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PresenceService<'a> {
    /// Create a new PresenceService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Join a room, or refresh emoji/status when already present
    #[instrument(skip(self))]
    pub async fn join(
        &self,
        user_id: &UserId,
        room_id: Snowflake,
        emoji: Option<&str>,
        status: Option<&str>,
    ) -> ServiceResult<ParticipantResponse> {
        RoomService::new(self.ctx).require_room(room_id).await?;

        let participant = match self.ctx.participant_repo().find(user_id, room_id).await? {
            Some(mut existing) => {
                existing.rejoin(emoji, status);
                self.ctx.participant_repo().update(&existing).await?;
                existing
            }
            None => {
                let participant = Participant::new(user_id.clone(), room_id, emoji, status);
                match self.ctx.participant_repo().create(&participant).await {
                    Ok(()) => participant,
                    Err(DomainError::ParticipantExists) => {
                        // Lost a race with a concurrent join of the same user
                        debug!(user_id = %user_id, room_id = %room_id, "Concurrent join, updating");
                        let mut existing = self.require_participant(user_id, room_id).await?;
                        existing.rejoin(emoji, status);
                        self.ctx.participant_repo().update(&existing).await?;
                        existing
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        };

        let active_users = self.refresh_count(room_id).await?;

        info!(user_id = %user_id, room_id = %room_id, active_users, "User joined room");

        self.participant_response(participant).await
    }

    /// Leave a room. Leaving a room the user is not in is a no-op.
    ///
    /// Returns whether a participant row was removed.
    #[instrument(skip(self))]
    pub async fn leave(&self, user_id: &UserId, room_id: Snowflake) -> ServiceResult<bool> {
        let removed = self.ctx.participant_repo().delete(user_id, room_id).await?;

        let active_users = self.ctx.room_repo().refresh_active_users(room_id).await?;

        if removed {
            info!(user_id = %user_id, room_id = %room_id, ?active_users, "User left room");
        } else {
            debug!(user_id = %user_id, room_id = %room_id, "Leave without membership");
        }

        Ok(removed)
    }

    /// Change emoji and/or status of a current participant
    #[instrument(skip(self))]
    pub async fn update_presence(
        &self,
        user_id: &UserId,
        room_id: Snowflake,
        emoji: Option<&str>,
        status: Option<&str>,
    ) -> ServiceResult<ParticipantResponse> {
        let mut participant = self.require_participant(user_id, room_id).await?;

        if participant.update_presence(emoji, status) {
            self.ctx.participant_repo().update(&participant).await?;
            info!(
                user_id = %user_id,
                room_id = %room_id,
                emoji = %participant.emoji,
                status = %participant.status,
                "Presence updated"
            );
        }

        self.participant_response(participant).await
    }

    /// Room snapshot plus its most recent messages in chronological order
    #[instrument(skip(self))]
    pub async fn room_snapshot(&self, room_id: Snowflake) -> ServiceResult<JoinRoomResponse> {
        let rooms = RoomService::new(self.ctx);
        let room = rooms.require_room(room_id).await?;
        let room = rooms.room_response(room).await?;

        let mut messages = MessageService::new(self.ctx)
            .list_recent(room_id, Some(JOIN_MESSAGE_WINDOW))
            .await?;
        messages.reverse();

        Ok(JoinRoomResponse { room, messages })
    }

    async fn require_participant(
        &self,
        user_id: &UserId,
        room_id: Snowflake,
    ) -> ServiceResult<Participant> {
        self.ctx
            .participant_repo()
            .find(user_id, room_id)
            .await?
            .ok_or_else(|| {
                DomainError::ParticipantNotFound {
                    user_id: user_id.clone(),
                    room_id,
                }
                .into()
            })
    }

    async fn refresh_count(&self, room_id: Snowflake) -> ServiceResult<i32> {
        self.ctx
            .room_repo()
            .refresh_active_users(room_id)
            .await?
            .ok_or_else(|| DomainError::RoomNotFound(room_id).into())
    }

    async fn participant_response(
        &self,
        participant: Participant,
    ) -> ServiceResult<ParticipantResponse> {
        let user = self.ctx.user_repo().find_by_id(&participant.user_id).await?;
        Ok(ParticipantResponse::from(ParticipantWithUser { participant, user }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::InMemoryStore;
    use async_trait::async_trait;
    use chill_core::entities::{Room, UserSummary};
    use chill_core::traits::{ParticipantRepository, RepoResult};
    use chill_core::{DEFAULT_EMOJI, DEFAULT_STATUS};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn setup() -> (InMemoryStore, Room) {
        let store = InMemoryStore::new();
        let room = store.add_room("Deep Focus", "focus");
        (store, room)
    }

    /// Participant rows whose next lookups miss, as when another join inserts
    /// the row between our read and our insert
    struct StaleReads {
        inner: InMemoryStore,
        misses: AtomicUsize,
        conflicts: AtomicUsize,
    }

    impl StaleReads {
        fn new(inner: InMemoryStore, misses: usize) -> Self {
            Self {
                inner,
                misses: AtomicUsize::new(misses),
                conflicts: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ParticipantRepository for StaleReads {
        async fn find(
            &self,
            user_id: &UserId,
            room_id: Snowflake,
        ) -> RepoResult<Option<Participant>> {
            let stale = self
                .misses
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();
            if stale {
                return Ok(None);
            }
            ParticipantRepository::find(&self.inner, user_id, room_id).await
        }

        async fn find_by_room(&self, room_id: Snowflake) -> RepoResult<Vec<Participant>> {
            ParticipantRepository::find_by_room(&self.inner, room_id).await
        }

        async fn find_by_rooms(&self, room_ids: &[Snowflake]) -> RepoResult<Vec<Participant>> {
            ParticipantRepository::find_by_rooms(&self.inner, room_ids).await
        }

        async fn create(&self, participant: &Participant) -> RepoResult<()> {
            let result = ParticipantRepository::create(&self.inner, participant).await;
            if matches!(result, Err(DomainError::ParticipantExists)) {
                self.conflicts.fetch_add(1, Ordering::SeqCst);
            }
            result
        }

        async fn update(&self, participant: &Participant) -> RepoResult<()> {
            ParticipantRepository::update(&self.inner, participant).await
        }

        async fn delete(&self, user_id: &UserId, room_id: Snowflake) -> RepoResult<bool> {
            ParticipantRepository::delete(&self.inner, user_id, room_id).await
        }
    }

    #[tokio::test]
    async fn test_join_creates_participant_and_counts() {
        let (store, room) = setup();
        let ctx = store.context();
        let u1 = UserId::new("u1");

        let participant = PresenceService::new(&ctx)
            .join(&u1, room.id, Some("🎵"), Some("focus"))
            .await
            .unwrap();

        assert_eq!(participant.emoji, "🎵");
        assert_eq!(participant.status, "focus");
        assert_eq!(store.active_users(room.id), Some(1));
        assert_eq!(store.participant_count(room.id), 1);
    }

    #[tokio::test]
    async fn test_rejoin_without_fields_keeps_presence() {
        let (store, room) = setup();
        let ctx = store.context();
        let service = PresenceService::new(&ctx);
        let u1 = UserId::new("u1");

        service
            .join(&u1, room.id, Some("🎵"), Some("focus"))
            .await
            .unwrap();
        let again = service.join(&u1, room.id, None, Some("  ")).await.unwrap();

        assert_eq!(again.emoji, "🎵");
        assert_eq!(again.status, "focus");
        assert_eq!(store.participant_count(room.id), 1);
        assert_eq!(store.active_users(room.id), Some(1));
    }

    #[tokio::test]
    async fn test_join_uses_defaults() {
        let (store, room) = setup();
        let ctx = store.context();

        let participant = PresenceService::new(&ctx)
            .join(&UserId::new("u1"), room.id, None, None)
            .await
            .unwrap();

        assert_eq!(participant.emoji, DEFAULT_EMOJI);
        assert_eq!(participant.status, DEFAULT_STATUS);
    }

    #[tokio::test]
    async fn test_join_attaches_user() {
        let (store, room) = setup();
        store.add_user(UserSummary {
            id: UserId::new("u1"),
            username: Some("mina".to_string()),
            display_name: Some("Mina".to_string()),
            avatar_url: None,
        });
        let ctx = store.context();

        let participant = PresenceService::new(&ctx)
            .join(&UserId::new("u1"), room.id, None, None)
            .await
            .unwrap();

        let user = participant.user.unwrap();
        assert_eq!(user.display_name.as_deref(), Some("Mina"));
    }

    #[tokio::test]
    async fn test_join_missing_room() {
        let store = InMemoryStore::new();
        let ctx = store.context();

        let err = PresenceService::new(&ctx)
            .join(&UserId::new("u1"), Snowflake::new(99), None, None)
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), 404);
        assert_eq!(err.to_string(), "Room not found: 99");
    }

    #[tokio::test]
    async fn test_duplicate_joins_leave_one_row() {
        let (store, room) = setup();
        let ctx = store.context();
        let u1 = UserId::new("u1");

        let a = PresenceService::new(&ctx);
        let b = PresenceService::new(&ctx);
        let (first, second) = tokio::join!(
            a.join(&u1, room.id, Some("🌙"), None),
            b.join(&u1, room.id, None, Some("sleepy")),
        );

        first.unwrap();
        second.unwrap();
        assert_eq!(store.participant_count(room.id), 1);
        assert_eq!(store.active_users(room.id), Some(1));
    }

    #[tokio::test]
    async fn test_join_recovers_from_insert_conflict() {
        let (store, room) = setup();
        let u1 = UserId::new("u1");
        PresenceService::new(&store.context())
            .join(&u1, room.id, Some("🌙"), Some("focus"))
            .await
            .unwrap();

        let participants = Arc::new(StaleReads::new(store.clone(), 1));
        let ctx = store
            .context_builder()
            .participant_repo(participants.clone())
            .build()
            .unwrap();

        let joined = PresenceService::new(&ctx)
            .join(&u1, room.id, None, Some("sleepy"))
            .await
            .unwrap();

        assert_eq!(participants.conflicts.load(Ordering::SeqCst), 1);
        assert_eq!(joined.emoji, "🌙");
        assert_eq!(joined.status, "sleepy");
        assert_eq!(store.participant_count(room.id), 1);
        assert_eq!(store.active_users(room.id), Some(1));
    }

    #[tokio::test]
    async fn test_join_conflict_without_row_fails() {
        let (store, room) = setup();
        let u1 = UserId::new("u1");
        PresenceService::new(&store.context())
            .join(&u1, room.id, None, None)
            .await
            .unwrap();

        // Both the first lookup and the re-read miss
        let participants = Arc::new(StaleReads::new(store.clone(), 2));
        let ctx = store
            .context_builder()
            .participant_repo(participants.clone())
            .build()
            .unwrap();

        let err = PresenceService::new(&ctx)
            .join(&u1, room.id, None, None)
            .await
            .unwrap_err();

        assert_eq!(participants.conflicts.load(Ordering::SeqCst), 1);
        assert_eq!(err.status_code(), 404);
        assert_eq!(store.participant_count(room.id), 1);
    }

    #[tokio::test]
    async fn test_leave_twice_is_noop() {
        let (store, room) = setup();
        let ctx = store.context();
        let service = PresenceService::new(&ctx);
        let u1 = UserId::new("u1");

        service.join(&u1, room.id, None, None).await.unwrap();
        assert!(service.leave(&u1, room.id).await.unwrap());
        assert!(!service.leave(&u1, room.id).await.unwrap());

        assert_eq!(store.participant_count(room.id), 0);
        assert_eq!(store.active_users(room.id), Some(0));
    }

    #[tokio::test]
    async fn test_leave_non_member_keeps_count() {
        let (store, room) = setup();
        let ctx = store.context();
        let service = PresenceService::new(&ctx);

        service
            .join(&UserId::new("u1"), room.id, None, None)
            .await
            .unwrap();
        assert!(!service.leave(&UserId::new("u2"), room.id).await.unwrap());
        assert_eq!(store.active_users(room.id), Some(1));
    }

    #[tokio::test]
    async fn test_leave_missing_room_is_noop() {
        let store = InMemoryStore::new();
        let ctx = store.context();

        let removed = PresenceService::new(&ctx)
            .leave(&UserId::new("u1"), Snowflake::new(5))
            .await
            .unwrap();
        assert!(!removed);
    }

    #[tokio::test]
    async fn test_update_presence_requires_membership() {
        let (store, room) = setup();
        let ctx = store.context();

        let err = PresenceService::new(&ctx)
            .update_presence(&UserId::new("u1"), room.id, Some("🔥"), None)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.error_code(), "UNKNOWN_PARTICIPANT");
    }

    #[tokio::test]
    async fn test_update_presence_changes_supplied_fields() {
        let (store, room) = setup();
        let ctx = store.context();
        let service = PresenceService::new(&ctx);
        let u1 = UserId::new("u1");

        service
            .join(&u1, room.id, Some("🎵"), Some("focus"))
            .await
            .unwrap();
        let updated = service
            .update_presence(&u1, room.id, None, Some("break"))
            .await
            .unwrap();

        assert_eq!(updated.emoji, "🎵");
        assert_eq!(updated.status, "break");
    }

    #[tokio::test]
    async fn test_room_snapshot_orders_messages_oldest_first() {
        let (store, room) = setup();
        let ctx = store.context();
        let u1 = UserId::new("u1");
        let messages = MessageService::new(&ctx);

        for i in 0..25 {
            messages
                .post_message(&u1, room.id, &format!("msg {i}"), None)
                .await
                .unwrap();
        }
        PresenceService::new(&ctx)
            .join(&u1, room.id, None, None)
            .await
            .unwrap();

        let snapshot = PresenceService::new(&ctx)
            .room_snapshot(room.id)
            .await
            .unwrap();

        assert_eq!(snapshot.room.participant_count, 1);
        assert_eq!(snapshot.messages.len(), 20);
        assert_eq!(snapshot.messages[0].content, "msg 5");
        assert_eq!(snapshot.messages[19].content, "msg 24");
    }
}
