use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DsaTopic {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DsaQuestion {
    pub id: Uuid,
    pub topic_id: Uuid,
    pub title: String,
    pub link: String,
    pub platform: String,
    pub difficulty: String,
    pub added_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub const DIFFICULTIES: [&str; 3] = ["Easy", "Medium", "Hard"];

/// A topic together with its questions in insertion order.
#[derive(Debug, Clone)]
pub struct TopicWithQuestions {
    pub topic: DsaTopic,
    pub questions: Vec<DsaQuestion>,
}
