//! In-memory repositories for service and gateway tests
//!
//! Enabled for this crate's tests and, through the `testing` feature, for
//! dependent crates.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chill_core::entities::{Message, Participant, Room, UserSummary};
use chill_core::traits::{
    MessageRepository, ObjectStore, ParticipantRepository, RepoResult, RoomRepository,
    UserRepository,
};
use chill_core::{DomainError, Snowflake, SnowflakeGenerator, UserId};
use parking_lot::Mutex;

use crate::services::{ServiceContext, ServiceContextBuilder};

#[derive(Default)]
struct State {
    rooms: BTreeMap<Snowflake, Room>,
    participants: HashMap<(UserId, Snowflake), Participant>,
    messages: BTreeMap<Snowflake, Message>,
    users: HashMap<UserId, UserSummary>,
}

/// Shared in-memory store implementing every repository trait
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
    ids: Arc<SnowflakeGenerator>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder with all repositories pointing at this store
    pub fn context_builder(&self) -> ServiceContextBuilder {
        ServiceContext::builder()
            .room_repo(Arc::new(self.clone()))
            .participant_repo(Arc::new(self.clone()))
            .message_repo(Arc::new(self.clone()))
            .user_repo(Arc::new(self.clone()))
            .snowflake_generator(self.ids.clone())
    }

    /// Context with default collaborators
    pub fn context(&self) -> ServiceContext {
        match self.context_builder().build() {
            Ok(ctx) => ctx,
            Err(e) => panic!("in-memory context is complete: {e}"),
        }
    }

    pub fn add_room(&self, name: &str, category: &str) -> Room {
        let room = Room::new(self.ids.generate(), name, category);
        self.state.lock().rooms.insert(room.id, room.clone());
        room
    }

    pub fn add_user(&self, user: UserSummary) {
        self.state.lock().users.insert(user.id.clone(), user);
    }

    /// Insert a participant row directly, bypassing the count refresh
    pub fn add_participant(&self, participant: Participant) {
        let key = (participant.user_id.clone(), participant.room_id);
        self.state.lock().participants.insert(key, participant);
    }

    pub fn room_by_name(&self, name: &str) -> Option<Room> {
        self.state
            .lock()
            .rooms
            .values()
            .find(|r| r.name == name)
            .cloned()
    }

    pub fn room_count(&self) -> usize {
        self.state.lock().rooms.len()
    }

    /// Cached `active_users` of a room
    pub fn active_users(&self, room_id: Snowflake) -> Option<i32> {
        self.state.lock().rooms.get(&room_id).map(|r| r.active_users)
    }

    /// Number of participant rows of a room
    pub fn participant_count(&self, room_id: Snowflake) -> usize {
        self.state
            .lock()
            .participants
            .values()
            .filter(|p| p.room_id == room_id)
            .count()
    }

    pub fn message_count(&self) -> usize {
        self.state.lock().messages.len()
    }
}

#[async_trait]
impl RoomRepository for InMemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Room>> {
        Ok(self.state.lock().rooms.get(&id).cloned())
    }

    async fn list(&self) -> RepoResult<Vec<Room>> {
        let mut rooms: Vec<Room> = self.state.lock().rooms.values().cloned().collect();
        rooms.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rooms)
    }

    async fn create(&self, room: &Room) -> RepoResult<bool> {
        let mut state = self.state.lock();
        if state.rooms.values().any(|r| r.name == room.name) {
            return Ok(false);
        }
        state.rooms.insert(room.id, room.clone());
        Ok(true)
    }

    async fn refresh_active_users(&self, id: Snowflake) -> RepoResult<Option<i32>> {
        let mut state = self.state.lock();
        let count = state
            .participants
            .values()
            .filter(|p| p.room_id == id)
            .count() as i32;
        Ok(state.rooms.get_mut(&id).map(|room| {
            room.active_users = count;
            room.updated_at = chrono::Utc::now();
            count
        }))
    }
}

#[async_trait]
impl ParticipantRepository for InMemoryStore {
    async fn find(&self, user_id: &UserId, room_id: Snowflake) -> RepoResult<Option<Participant>> {
        let key = (user_id.clone(), room_id);
        Ok(self.state.lock().participants.get(&key).cloned())
    }

    async fn find_by_room(&self, room_id: Snowflake) -> RepoResult<Vec<Participant>> {
        self.find_by_rooms(&[room_id]).await
    }

    async fn find_by_rooms(&self, room_ids: &[Snowflake]) -> RepoResult<Vec<Participant>> {
        let mut participants: Vec<Participant> = self
            .state
            .lock()
            .participants
            .values()
            .filter(|p| room_ids.contains(&p.room_id))
            .cloned()
            .collect();
        participants.sort_by(|a, b| {
            a.joined_at
                .cmp(&b.joined_at)
                .then_with(|| a.user_id.cmp(&b.user_id))
        });
        Ok(participants)
    }

    async fn create(&self, participant: &Participant) -> RepoResult<()> {
        let mut state = self.state.lock();
        if !state.rooms.contains_key(&participant.room_id) {
            return Err(DomainError::RoomNotFound(participant.room_id));
        }
        let key = (participant.user_id.clone(), participant.room_id);
        if state.participants.contains_key(&key) {
            return Err(DomainError::ParticipantExists);
        }
        state.participants.insert(key, participant.clone());
        Ok(())
    }

    async fn update(&self, participant: &Participant) -> RepoResult<()> {
        let key = (participant.user_id.clone(), participant.room_id);
        let mut state = self.state.lock();
        let row = state
            .participants
            .get_mut(&key)
            .ok_or_else(|| DomainError::ParticipantNotFound {
                user_id: participant.user_id.clone(),
                room_id: participant.room_id,
            })?;
        row.emoji.clone_from(&participant.emoji);
        row.status.clone_from(&participant.status);
        row.updated_at = participant.updated_at;
        Ok(())
    }

    async fn delete(&self, user_id: &UserId, room_id: Snowflake) -> RepoResult<bool> {
        let key = (user_id.clone(), room_id);
        Ok(self.state.lock().participants.remove(&key).is_some())
    }
}

#[async_trait]
impl MessageRepository for InMemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Message>> {
        Ok(self.state.lock().messages.get(&id).cloned())
    }

    async fn find_recent(&self, room_id: Snowflake, limit: i64) -> RepoResult<Vec<Message>> {
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(self
            .state
            .lock()
            .messages
            .values()
            .rev()
            .filter(|m| m.room_id == room_id)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn create(&self, message: &Message) -> RepoResult<()> {
        let mut state = self.state.lock();
        if !state.rooms.contains_key(&message.room_id) {
            return Err(DomainError::RoomNotFound(message.room_id));
        }
        state.messages.insert(message.id, message.clone());
        Ok(())
    }

    async fn delete(&self, id: Snowflake) -> RepoResult<bool> {
        Ok(self.state.lock().messages.remove(&id).is_some())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: &UserId) -> RepoResult<Option<UserSummary>> {
        Ok(self.state.lock().users.get(id).cloned())
    }

    async fn find_by_ids(&self, ids: &[UserId]) -> RepoResult<Vec<UserSummary>> {
        let state = self.state.lock();
        Ok(ids.iter().filter_map(|id| state.users.get(id).cloned()).collect())
    }
}

/// Object store keeping uploads in memory
pub struct MemoryObjectStore {
    base_url: String,
    objects: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryObjectStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            objects: Mutex::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.objects.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.lock().is_empty()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put(&self, key: &str, bytes: Vec<u8>, _content_type: &str) -> RepoResult<String> {
        self.objects.lock().insert(key.to_string(), bytes);
        Ok(format!("{}/{key}", self.base_url.trim_end_matches('/')))
    }
}
