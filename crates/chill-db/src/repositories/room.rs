//! PostgreSQL implementation of RoomRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use chill_core::entities::Room;
use chill_core::traits::{RepoResult, RoomRepository};
use chill_core::value_objects::Snowflake;

use crate::models::RoomModel;

use super::error::map_db_error;

/// PostgreSQL implementation of RoomRepository
#[derive(Clone)]
pub struct PgRoomRepository {
    pool: PgPool,
}

impl PgRoomRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoomRepository for PgRoomRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Room>> {
        let result = sqlx::query_as::<_, RoomModel>(
            r"
            SELECT id, name, category, active_users, created_at, updated_at
            FROM rooms
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Room::from))
    }

    #[instrument(skip(self))]
    async fn list(&self) -> RepoResult<Vec<Room>> {
        let results = sqlx::query_as::<_, RoomModel>(
            r"
            SELECT id, name, category, active_users, created_at, updated_at
            FROM rooms
            ORDER BY name, id
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Room::from).collect())
    }

    #[instrument(skip(self))]
    async fn create(&self, room: &Room) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            INSERT INTO rooms (id, name, category, active_users, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (name) DO NOTHING
            ",
        )
        .bind(room.id.into_inner())
        .bind(&room.name)
        .bind(&room.category)
        .bind(room.active_users)
        .bind(room.created_at)
        .bind(room.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self))]
    async fn refresh_active_users(&self, id: Snowflake) -> RepoResult<Option<i32>> {
        // Count and store in one statement so concurrent joins cannot
        // interleave between the read and the write.
        let count: Option<i32> = sqlx::query_scalar(
            r"
            UPDATE rooms
            SET active_users = (
                    SELECT COUNT(*)::INTEGER FROM room_participants WHERE room_id = $1
                ),
                updated_at = NOW()
            WHERE id = $1
            RETURNING active_users
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgRoomRepository>();
    }
}
