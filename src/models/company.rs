use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    pub month: String,
    pub year: i32,
    pub job_description: Option<String>,
    pub cgpa: Decimal,
    pub backlog: i32,
    pub branches: Vec<String>,
    pub ctc: Decimal,
    pub presentation_date: NaiveDate,
    pub presentation_time: String,
    pub oa_date: NaiveDate,
    pub oa_time: String,
    pub interview_date: NaiveDate,
    pub interview_time: String,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub const COMPANY_COLUMNS: &str = "id, name, month, year, job_description, cgpa, backlog, branches, ctc, \
    presentation_date, presentation_time, oa_date, oa_time, interview_date, interview_time, \
    created_by, created_at, updated_at";
