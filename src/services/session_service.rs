use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::session_dto::SessionPayload;
use crate::error::{Error, Result};
use crate::models::session::{resolve_on_write, Session, StatusFilter, SESSION_COLUMNS};
use crate::utils::time::Clock;

#[derive(Clone)]
pub struct SessionService {
    pool: PgPool,
    clock: Arc<dyn Clock>,
}

impl SessionService {
    pub fn new(pool: PgPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }

    pub async fn create(&self, payload: SessionPayload, created_by: Uuid) -> Result<Session> {
        let resolution = resolve_on_write(payload.date_time, true, self.clock.now());
        let query = format!(
            r#"
            INSERT INTO sessions (title, description, date_time, meet_link, created_by, is_active, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            SESSION_COLUMNS
        );
        let session = sqlx::query_as::<_, Session>(&query)
            .bind(&payload.title)
            .bind(&payload.description)
            .bind(payload.date_time)
            .bind(&payload.meet_link)
            .bind(created_by)
            .bind(resolution.is_active)
            .bind(resolution.status.as_str())
            .fetch_one(&self.pool)
            .await?;
        tracing::info!(session_id = %session.id, status = %session.status, "session created");
        Ok(session)
    }

    /// Replaces the editable fields and re-runs the status rule against the
    /// row's current `is_active`.
    pub async fn update(&self, id: Uuid, payload: SessionPayload) -> Result<Session> {
        let previous_is_active: bool =
            sqlx::query_scalar("SELECT is_active FROM sessions WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or_else(|| Error::NotFound("Session not found".to_string()))?;

        let resolution = resolve_on_write(payload.date_time, previous_is_active, self.clock.now());
        let query = format!(
            r#"
            UPDATE sessions
            SET title = $2, description = $3, date_time = $4, meet_link = $5,
                is_active = $6, status = $7, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            SESSION_COLUMNS
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(id)
            .bind(&payload.title)
            .bind(&payload.description)
            .bind(payload.date_time)
            .bind(&payload.meet_link)
            .bind(resolution.is_active)
            .bind(resolution.status.as_str())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Session not found".to_string()))
    }

    /// Deleting an id that does not exist is not an error.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        tracing::info!(session_id = %id, rows = result.rows_affected(), "session delete");
        Ok(())
    }

    pub async fn list(&self, filter: StatusFilter) -> Result<Vec<Session>> {
        let sessions = match filter.sql_predicate() {
            Some(predicate) => {
                let query = format!(
                    "SELECT {} FROM sessions WHERE {} ORDER BY date_time ASC",
                    SESSION_COLUMNS, predicate
                );
                sqlx::query_as::<_, Session>(&query)
                    .bind(self.clock.now())
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let query = format!(
                    "SELECT {} FROM sessions ORDER BY date_time ASC",
                    SESSION_COLUMNS
                );
                sqlx::query_as::<_, Session>(&query)
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(sessions)
    }
}
