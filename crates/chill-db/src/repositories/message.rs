//! PostgreSQL implementation of MessageRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use chill_core::entities::Message;
use chill_core::error::DomainError;
use chill_core::traits::{MessageRepository, RepoResult};
use chill_core::value_objects::Snowflake;

use crate::models::MessageModel;

use super::error::{map_db_error, map_foreign_key_violation};

/// PostgreSQL implementation of MessageRepository
#[derive(Clone)]
pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Message>> {
        let result = sqlx::query_as::<_, MessageModel>(
            r"
            SELECT id, room_id, sender_id, content, tone, original_content, created_at
            FROM room_messages
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Message::from))
    }

    #[instrument(skip(self))]
    async fn find_recent(&self, room_id: Snowflake, limit: i64) -> RepoResult<Vec<Message>> {
        // Snowflake ids are time ordered, so id order is creation order
        let results = sqlx::query_as::<_, MessageModel>(
            r"
            SELECT id, room_id, sender_id, content, tone, original_content, created_at
            FROM room_messages
            WHERE room_id = $1
            ORDER BY id DESC
            LIMIT $2
            ",
        )
        .bind(room_id.into_inner())
        .bind(limit.max(0))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Message::from).collect())
    }

    #[instrument(skip(self, message), fields(message_id = %message.id, room_id = %message.room_id))]
    async fn create(&self, message: &Message) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO room_messages (id, room_id, sender_id, content, tone, original_content, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(message.id.into_inner())
        .bind(message.room_id.into_inner())
        .bind(message.sender_id.as_str())
        .bind(&message.content)
        .bind(message.tone.as_deref())
        .bind(message.original_content.as_deref())
        .bind(message.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_foreign_key_violation(e, || DomainError::RoomNotFound(message.room_id)))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM room_messages WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgMessageRepository>();
    }
}
