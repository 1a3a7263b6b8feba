//! PostgreSQL implementation of ParticipantRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use chill_core::entities::Participant;
use chill_core::error::DomainError;
use chill_core::traits::{ParticipantRepository, RepoResult};
use chill_core::value_objects::{Snowflake, UserId};

use crate::models::ParticipantModel;

use super::error::{map_db_error, map_unique_violation};

/// PostgreSQL implementation of ParticipantRepository
#[derive(Clone)]
pub struct PgParticipantRepository {
    pool: PgPool,
}

impl PgParticipantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ParticipantRepository for PgParticipantRepository {
    #[instrument(skip(self))]
    async fn find(&self, user_id: &UserId, room_id: Snowflake) -> RepoResult<Option<Participant>> {
        let result = sqlx::query_as::<_, ParticipantModel>(
            r"
            SELECT user_id, room_id, emoji, status, joined_at, updated_at
            FROM room_participants
            WHERE user_id = $1 AND room_id = $2
            ",
        )
        .bind(user_id.as_str())
        .bind(room_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Participant::from))
    }

    #[instrument(skip(self))]
    async fn find_by_room(&self, room_id: Snowflake) -> RepoResult<Vec<Participant>> {
        let results = sqlx::query_as::<_, ParticipantModel>(
            r"
            SELECT user_id, room_id, emoji, status, joined_at, updated_at
            FROM room_participants
            WHERE room_id = $1
            ORDER BY joined_at, user_id
            ",
        )
        .bind(room_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Participant::from).collect())
    }

    #[instrument(skip(self, room_ids), fields(rooms = room_ids.len()))]
    async fn find_by_rooms(&self, room_ids: &[Snowflake]) -> RepoResult<Vec<Participant>> {
        if room_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = room_ids.iter().map(|id| id.into_inner()).collect();

        let results = sqlx::query_as::<_, ParticipantModel>(
            r"
            SELECT user_id, room_id, emoji, status, joined_at, updated_at
            FROM room_participants
            WHERE room_id = ANY($1)
            ORDER BY room_id, joined_at, user_id
            ",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Participant::from).collect())
    }

    #[instrument(skip(self))]
    async fn create(&self, participant: &Participant) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO room_participants (user_id, room_id, emoji, status, joined_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(participant.user_id.as_str())
        .bind(participant.room_id.into_inner())
        .bind(&participant.emoji)
        .bind(&participant.status)
        .bind(participant.joined_at)
        .bind(participant.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let missing_room = e
                .as_database_error()
                .is_some_and(|db| db.is_foreign_key_violation());
            if missing_room {
                DomainError::RoomNotFound(participant.room_id)
            } else {
                map_unique_violation(e, || DomainError::ParticipantExists)
            }
        })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn update(&self, participant: &Participant) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE room_participants
            SET emoji = $3, status = $4, updated_at = $5
            WHERE user_id = $1 AND room_id = $2
            ",
        )
        .bind(participant.user_id.as_str())
        .bind(participant.room_id.into_inner())
        .bind(&participant.emoji)
        .bind(&participant.status)
        .bind(participant.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ParticipantNotFound {
                user_id: participant.user_id.clone(),
                room_id: participant.room_id,
            });
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, user_id: &UserId, room_id: Snowflake) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            DELETE FROM room_participants
            WHERE user_id = $1 AND room_id = $2
            ",
        )
        .bind(user_id.as_str())
        .bind(room_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}
