use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::game_dto::CreateGamePayload;
use crate::error::Result;
use crate::models::game::Game;

const GAME_COLUMNS: &str = "id, name, description, link, topic, created_by, created_at, updated_at";

#[derive(Clone)]
pub struct GameService {
    pool: PgPool,
}

impl GameService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, payload: CreateGamePayload, created_by: Uuid) -> Result<Game> {
        let query = format!(
            "INSERT INTO games (name, description, link, topic, created_by) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            GAME_COLUMNS
        );
        let game = sqlx::query_as::<_, Game>(&query)
            .bind(&payload.name)
            .bind(&payload.description)
            .bind(&payload.link)
            .bind(&payload.topic)
            .bind(created_by)
            .fetch_one(&self.pool)
            .await?;
        tracing::info!(game_id = %game.id, "game created");
        Ok(game)
    }

    pub async fn list(&self) -> Result<Vec<Game>> {
        let query = format!("SELECT {} FROM games ORDER BY created_at DESC", GAME_COLUMNS);
        let games = sqlx::query_as::<_, Game>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(games)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM games WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        tracing::info!(game_id = %id, rows = result.rows_affected(), "game delete");
        Ok(())
    }
}
