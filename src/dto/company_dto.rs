use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::company::Company;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityCriteria {
    pub cgpa: Decimal,
    #[serde(default)]
    #[validate(range(min = 0, message = "Backlog cannot be negative"))]
    pub backlog: i32,
    #[serde(default)]
    pub branches: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CompanyPayload {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Month is required"))]
    pub month: String,
    pub year: i32,
    pub job_description: Option<String>,
    #[validate(nested)]
    pub eligibility_criteria: EligibilityCriteria,
    pub ctc: Decimal,
    pub presentation_date: NaiveDate,
    #[validate(length(min = 1, message = "Presentation time is required"))]
    pub presentation_time: String,
    pub oa_date: NaiveDate,
    #[validate(length(min = 1, message = "OA time is required"))]
    pub oa_time: String,
    pub interview_date: NaiveDate,
    #[validate(length(min = 1, message = "Interview time is required"))]
    pub interview_time: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyListQuery {
    pub month: Option<String>,
    pub year: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyResponse {
    pub id: Uuid,
    pub name: String,
    pub month: String,
    pub year: i32,
    pub job_description: Option<String>,
    pub eligibility_criteria: EligibilityCriteria,
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

impl From<Company> for CompanyResponse {
    fn from(value: Company) -> Self {
        Self {
            id: value.id,
            name: value.name,
            month: value.month,
            year: value.year,
            job_description: value.job_description,
            eligibility_criteria: EligibilityCriteria {
                cgpa: value.cgpa,
                backlog: value.backlog,
                branches: value.branches,
            },
            ctc: value.ctc,
            presentation_date: value.presentation_date,
            presentation_time: value.presentation_time,
            oa_date: value.oa_date,
            oa_time: value.oa_time,
            interview_date: value.interview_date,
            interview_time: value.interview_time,
            created_by: value.created_by,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}
