//! Service context - dependency container for services
//!
//! Holds the repositories and external collaborators needed by services.

use std::collections::HashMap;
use std::sync::Arc;

use chill_common::{
    object_store_from_config, AppConfig, IdentityResolver, JwtService, UnconfiguredIdentity,
    UnconfiguredObjectStore,
};
use chill_core::entities::UserSummary;
use chill_core::traits::{
    MessageRepository, ObjectStore, ParticipantRepository, PassThroughTone, RoomRepository,
    ToneTransformer, UserRepository,
};
use chill_core::{Snowflake, SnowflakeGenerator, UserId};
use chill_db::{
    PgMessageRepository, PgParticipantRepository, PgPool, PgRoomRepository, PgUserRepository,
};

use super::error::{ServiceError, ServiceResult};

/// Default upload size limit (5 MB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Service context containing all dependencies
///
/// Cheap to clone; every dependency is behind an `Arc`.
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    room_repo: Arc<dyn RoomRepository>,
    participant_repo: Arc<dyn ParticipantRepository>,
    message_repo: Arc<dyn MessageRepository>,
    user_repo: Arc<dyn UserRepository>,

    // Collaborators
    object_store: Arc<dyn ObjectStore>,
    tone_transformer: Arc<dyn ToneTransformer>,
    identity: Arc<dyn IdentityResolver>,

    snowflake_generator: Arc<SnowflakeGenerator>,
    max_upload_bytes: usize,
}

impl ServiceContext {
    /// Start building a context
    pub fn builder() -> ServiceContextBuilder {
        ServiceContextBuilder::new()
    }

    /// Wire PostgreSQL repositories and the configured collaborators
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if the snowflake worker id is out of range
    pub fn from_pool(pool: PgPool, config: &AppConfig) -> ServiceResult<Self> {
        let identity: Arc<dyn IdentityResolver> = match &config.jwt.secret {
            Some(secret) => Arc::new(JwtService::new(secret, config.jwt.token_expiry)),
            None => Arc::new(UnconfiguredIdentity),
        };

        let generator = SnowflakeGenerator::new(config.snowflake.worker_id)
            .map_err(|e| ServiceError::validation(e.to_string()))?;

        Self::builder()
            .room_repo(Arc::new(PgRoomRepository::new(pool.clone())))
            .participant_repo(Arc::new(PgParticipantRepository::new(pool.clone())))
            .message_repo(Arc::new(PgMessageRepository::new(pool.clone())))
            .user_repo(Arc::new(PgUserRepository::new(pool)))
            .object_store(object_store_from_config(&config.storage))
            .identity(identity)
            .snowflake_generator(Arc::new(generator))
            .max_upload_bytes(config.storage.max_upload_bytes())
            .build()
    }

    // === Repositories ===

    pub fn room_repo(&self) -> &dyn RoomRepository {
        self.room_repo.as_ref()
    }

    pub fn participant_repo(&self) -> &dyn ParticipantRepository {
        self.participant_repo.as_ref()
    }

    pub fn message_repo(&self) -> &dyn MessageRepository {
        self.message_repo.as_ref()
    }

    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    // === Collaborators ===

    pub fn object_store(&self) -> &dyn ObjectStore {
        self.object_store.as_ref()
    }

    pub fn tone_transformer(&self) -> &dyn ToneTransformer {
        self.tone_transformer.as_ref()
    }

    /// Get the bearer token resolver
    pub fn identity(&self) -> &dyn IdentityResolver {
        self.identity.as_ref()
    }

    /// Largest accepted upload in bytes
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    /// Generate a new Snowflake ID
    pub fn generate_id(&self) -> Snowflake {
        self.snowflake_generator.generate()
    }

    /// Look up display fields for a set of users, keyed by id
    pub(crate) async fn users_by_id(
        &self,
        ids: &[UserId],
    ) -> ServiceResult<HashMap<UserId, UserSummary>> {
        let users = self.user_repo.find_by_ids(ids).await?;
        Ok(users.into_iter().map(|u| (u.id.clone(), u)).collect())
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("object_store_configured", &self.object_store.is_configured())
            .field("max_upload_bytes", &self.max_upload_bytes)
            .finish_non_exhaustive()
    }
}

/// Builder for creating ServiceContext with custom configuration
///
/// Repositories are required. Collaborators fall back to their
/// pass-through or unconfigured variants.
#[derive(Default)]
pub struct ServiceContextBuilder {
    room_repo: Option<Arc<dyn RoomRepository>>,
    participant_repo: Option<Arc<dyn ParticipantRepository>>,
    message_repo: Option<Arc<dyn MessageRepository>>,
    user_repo: Option<Arc<dyn UserRepository>>,
    object_store: Option<Arc<dyn ObjectStore>>,
    tone_transformer: Option<Arc<dyn ToneTransformer>>,
    identity: Option<Arc<dyn IdentityResolver>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
    max_upload_bytes: Option<usize>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn room_repo(mut self, repo: Arc<dyn RoomRepository>) -> Self {
        self.room_repo = Some(repo);
        self
    }

    pub fn participant_repo(mut self, repo: Arc<dyn ParticipantRepository>) -> Self {
        self.participant_repo = Some(repo);
        self
    }

    pub fn message_repo(mut self, repo: Arc<dyn MessageRepository>) -> Self {
        self.message_repo = Some(repo);
        self
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn object_store(mut self, store: Arc<dyn ObjectStore>) -> Self {
        self.object_store = Some(store);
        self
    }

    pub fn tone_transformer(mut self, transformer: Arc<dyn ToneTransformer>) -> Self {
        self.tone_transformer = Some(transformer);
        self
    }

    pub fn identity(mut self, identity: Arc<dyn IdentityResolver>) -> Self {
        self.identity = Some(identity);
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    pub fn max_upload_bytes(mut self, bytes: usize) -> Self {
        self.max_upload_bytes = Some(bytes);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any repository is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext {
            room_repo: self
                .room_repo
                .ok_or_else(|| ServiceError::validation("room_repo is required"))?,
            participant_repo: self
                .participant_repo
                .ok_or_else(|| ServiceError::validation("participant_repo is required"))?,
            message_repo: self
                .message_repo
                .ok_or_else(|| ServiceError::validation("message_repo is required"))?,
            user_repo: self
                .user_repo
                .ok_or_else(|| ServiceError::validation("user_repo is required"))?,
            object_store: self
                .object_store
                .unwrap_or_else(|| Arc::new(UnconfiguredObjectStore)),
            tone_transformer: self
                .tone_transformer
                .unwrap_or_else(|| Arc::new(PassThroughTone)),
            identity: self
                .identity
                .unwrap_or_else(|| Arc::new(UnconfiguredIdentity)),
            snowflake_generator: self.snowflake_generator.unwrap_or_default(),
            max_upload_bytes: self.max_upload_bytes.unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
        })
    }
}
