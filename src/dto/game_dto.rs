use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::game::Game;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateGamePayload {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[validate(url(message = "Game link must be a valid URL"))]
    pub link: String,
    #[serde(default)]
    pub topic: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub link: String,
    pub topic: String,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Game> for GameResponse {
    fn from(value: Game) -> Self {
        Self {
            id: value.id,
            name: value.name,
            description: value.description,
            link: value.link,
            topic: value.topic,
            created_by: value.created_by,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}
