use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::dsa_topic::{DsaQuestion, TopicWithQuestions, DIFFICULTIES};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTopicPayload {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AddQuestionPayload {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Link is required"))]
    pub link: String,
    #[validate(length(min = 1, message = "Platform is required"))]
    pub platform: String,
    pub difficulty: String,
}

impl AddQuestionPayload {
    pub fn has_known_difficulty(&self) -> bool {
        DIFFICULTIES.contains(&self.difficulty.as_str())
    }

    /// Absolute http(s) URL.
    pub fn has_web_link(&self) -> bool {
        url::Url::parse(self.link.trim())
            .map(|u| matches!(u.scheme(), "http" | "https"))
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResponse {
    pub id: Uuid,
    pub title: String,
    pub link: String,
    pub platform: String,
    pub difficulty: String,
    pub added_by: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<DsaQuestion> for QuestionResponse {
    fn from(value: DsaQuestion) -> Self {
        Self {
            id: value.id,
            title: value.title,
            link: value.link,
            platform: value.platform,
            difficulty: value.difficulty,
            added_by: value.added_by,
            created_at: value.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub questions: Vec<QuestionResponse>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TopicWithQuestions> for TopicResponse {
    fn from(value: TopicWithQuestions) -> Self {
        let topic = value.topic;
        Self {
            id: topic.id,
            name: topic.name,
            description: topic.description,
            questions: value.questions.into_iter().map(Into::into).collect(),
            created_by: topic.created_by,
            created_at: topic.created_at,
            updated_at: topic.updated_at,
        }
    }
}
