use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::dsa_dto::{AddQuestionPayload, CreateTopicPayload};
use crate::error::{Error, Result};
use crate::models::dsa_topic::{DsaQuestion, DsaTopic, TopicWithQuestions};

const TOPIC_COLUMNS: &str = "id, name, description, created_by, created_at, updated_at";
const QUESTION_COLUMNS: &str =
    "id, topic_id, title, link, platform, difficulty, added_by, created_at, updated_at";

#[derive(Clone)]
pub struct DsaService {
    pool: PgPool,
}

impl DsaService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_topic(
        &self,
        payload: CreateTopicPayload,
        created_by: Uuid,
    ) -> Result<TopicWithQuestions> {
        let query = format!(
            "INSERT INTO dsa_topics (name, description, created_by) VALUES ($1, $2, $3) RETURNING {}",
            TOPIC_COLUMNS
        );
        let topic = sqlx::query_as::<_, DsaTopic>(&query)
            .bind(&payload.name)
            .bind(&payload.description)
            .bind(created_by)
            .fetch_one(&self.pool)
            .await?;
        tracing::info!(topic_id = %topic.id, "dsa topic created");
        Ok(TopicWithQuestions {
            topic,
            questions: Vec::new(),
        })
    }

    pub async fn list_topics(&self) -> Result<Vec<TopicWithQuestions>> {
        let query = format!("SELECT {} FROM dsa_topics ORDER BY created_at ASC", TOPIC_COLUMNS);
        let topics = sqlx::query_as::<_, DsaTopic>(&query)
            .fetch_all(&self.pool)
            .await?;
        let query = format!(
            "SELECT {} FROM dsa_questions ORDER BY created_at ASC",
            QUESTION_COLUMNS
        );
        let questions = sqlx::query_as::<_, DsaQuestion>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(group_questions(topics, questions))
    }

    pub async fn get_topic(&self, id: Uuid) -> Result<TopicWithQuestions> {
        let query = format!("SELECT {} FROM dsa_topics WHERE id = $1", TOPIC_COLUMNS);
        let topic = sqlx::query_as::<_, DsaTopic>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(topic_not_found)?;
        let query = format!(
            "SELECT {} FROM dsa_questions WHERE topic_id = $1 ORDER BY created_at ASC",
            QUESTION_COLUMNS
        );
        let questions = sqlx::query_as::<_, DsaQuestion>(&query)
            .bind(id)
            .fetch_all(&self.pool)
            .await?;
        Ok(TopicWithQuestions { topic, questions })
    }

    pub async fn add_question(
        &self,
        topic_id: Uuid,
        payload: AddQuestionPayload,
        added_by: Uuid,
    ) -> Result<TopicWithQuestions> {
        if !payload.has_known_difficulty() {
            return Err(Error::BadRequest(
                "Difficulty must be Easy, Medium or Hard".to_string(),
            ));
        }
        if !payload.has_web_link() {
            return Err(Error::BadRequest("Link must be a valid URL".to_string()));
        }

        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM dsa_topics WHERE id = $1)")
                .bind(topic_id)
                .fetch_one(&self.pool)
                .await?;
        if !exists {
            return Err(topic_not_found());
        }

        sqlx::query(
            "INSERT INTO dsa_questions (topic_id, title, link, platform, difficulty, added_by) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(topic_id)
        .bind(&payload.title)
        .bind(&payload.link)
        .bind(&payload.platform)
        .bind(&payload.difficulty)
        .bind(added_by)
        .execute(&self.pool)
        .await?;
        sqlx::query("UPDATE dsa_topics SET updated_at = NOW() WHERE id = $1")
            .bind(topic_id)
            .execute(&self.pool)
            .await?;

        self.get_topic(topic_id).await
    }

    pub async fn delete_question(
        &self,
        topic_id: Uuid,
        question_id: Uuid,
    ) -> Result<TopicWithQuestions> {
        // an unknown question id still answers with the topic
        sqlx::query("DELETE FROM dsa_questions WHERE id = $1 AND topic_id = $2")
            .bind(question_id)
            .bind(topic_id)
            .execute(&self.pool)
            .await?;
        self.get_topic(topic_id).await
    }

    /// Questions go with the topic through `ON DELETE CASCADE`. A missing
    /// topic is not an error.
    pub async fn delete_topic(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM dsa_topics WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        tracing::info!(topic_id = %id, rows = result.rows_affected(), "dsa topic delete");
        Ok(())
    }
}

fn topic_not_found() -> Error {
    Error::NotFound("Topic not found".to_string())
}

/// Attaches each question to its topic, keeping both input orders. Questions
/// whose topic is not in `topics` are dropped.
pub fn group_questions(
    topics: Vec<DsaTopic>,
    questions: Vec<DsaQuestion>,
) -> Vec<TopicWithQuestions> {
    let mut by_topic: HashMap<Uuid, Vec<DsaQuestion>> = HashMap::new();
    for question in questions {
        by_topic.entry(question.topic_id).or_default().push(question);
    }
    topics
        .into_iter()
        .map(|topic| {
            let questions = by_topic.remove(&topic.id).unwrap_or_default();
            TopicWithQuestions { topic, questions }
        })
        .collect()
}
