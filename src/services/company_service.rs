use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::company_dto::CompanyPayload;
use crate::error::{Error, Result};
use crate::models::company::{Company, COMPANY_COLUMNS};

#[derive(Clone)]
pub struct CompanyService {
    pool: PgPool,
}

impl CompanyService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, payload: CompanyPayload, created_by: Uuid) -> Result<Company> {
        let query = format!(
            r#"
            INSERT INTO companies (
                name, month, year, job_description, cgpa, backlog, branches, ctc,
                presentation_date, presentation_time, oa_date, oa_time,
                interview_date, interview_time, created_by
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8,
                $9, $10, $11, $12,
                $13, $14, $15
            )
            RETURNING {}
            "#,
            COMPANY_COLUMNS
        );
        let company = sqlx::query_as::<_, Company>(&query)
            .bind(&payload.name)
            .bind(&payload.month)
            .bind(payload.year)
            .bind(&payload.job_description)
            .bind(payload.eligibility_criteria.cgpa)
            .bind(payload.eligibility_criteria.backlog)
            .bind(&payload.eligibility_criteria.branches)
            .bind(payload.ctc)
            .bind(payload.presentation_date)
            .bind(&payload.presentation_time)
            .bind(payload.oa_date)
            .bind(&payload.oa_time)
            .bind(payload.interview_date)
            .bind(&payload.interview_time)
            .bind(created_by)
            .fetch_one(&self.pool)
            .await?;
        tracing::info!(company_id = %company.id, name = %company.name, "company created");
        Ok(company)
    }

    /// Companies visiting in the given month, earliest presentation first.
    pub async fn list_for_month(&self, month: &str, year: i32) -> Result<Vec<Company>> {
        let query = format!(
            "SELECT {} FROM companies WHERE month = $1 AND year = $2 ORDER BY presentation_date ASC",
            COMPANY_COLUMNS
        );
        let companies = sqlx::query_as::<_, Company>(&query)
            .bind(month)
            .bind(year)
            .fetch_all(&self.pool)
            .await?;
        Ok(companies)
    }

    pub async fn update(&self, id: Uuid, payload: CompanyPayload) -> Result<Company> {
        let query = format!(
            r#"
            UPDATE companies
            SET name = $2, month = $3, year = $4, job_description = $5, cgpa = $6,
                backlog = $7, branches = $8, ctc = $9,
                presentation_date = $10, presentation_time = $11,
                oa_date = $12, oa_time = $13,
                interview_date = $14, interview_time = $15,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            COMPANY_COLUMNS
        );
        sqlx::query_as::<_, Company>(&query)
            .bind(id)
            .bind(&payload.name)
            .bind(&payload.month)
            .bind(payload.year)
            .bind(&payload.job_description)
            .bind(payload.eligibility_criteria.cgpa)
            .bind(payload.eligibility_criteria.backlog)
            .bind(&payload.eligibility_criteria.branches)
            .bind(payload.ctc)
            .bind(payload.presentation_date)
            .bind(&payload.presentation_time)
            .bind(payload.oa_date)
            .bind(&payload.oa_time)
            .bind(payload.interview_date)
            .bind(&payload.interview_time)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Company not found".to_string()))
    }

    /// Deleting an id that does not exist is not an error.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM companies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        tracing::info!(company_id = %id, rows = result.rows_affected(), "company delete");
        Ok(())
    }
}
