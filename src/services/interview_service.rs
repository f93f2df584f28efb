use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::interview::InterviewCompanyRow;
use crate::database::models::{Interview, InterviewPatch, NewInterview, PopulatedInterview};
use crate::error::ApiError;
use crate::middleware::RequestContext;
use crate::services::access::{authorize_interview, interview_scope, InterviewAction, InterviewScope};
use crate::services::company_service::company_not_found;
use crate::services::interview_rules::{check_interview_date, check_quota};

const INTERVIEW_COLUMNS_SQL: &str = "id, interview_date, name, user_id, company_id, created_at";

const POPULATED_SELECT: &str = r#"
    SELECT i.id, i.interview_date, i.name, i.user_id, i.company_id, i.created_at,
           c.name AS company_name, c.address AS company_address, c.website AS company_website,
           c.description AS company_description, c.tel AS company_tel
    FROM interviews i
    JOIN companies c ON c.id = i.company_id
"#;

fn interview_not_found(id: Uuid) -> ApiError {
    ApiError::not_found(format!("No interview with the id of {}", id))
}

pub struct InterviewService {
    pool: PgPool,
}

impl InterviewService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Interviews visible to the caller, optionally limited to one company
    pub async fn list(
        &self,
        context: &RequestContext,
        company_id: Option<Uuid>,
    ) -> Result<Vec<PopulatedInterview>, ApiError> {
        if let Some(company_id) = company_id {
            self.ensure_company(company_id).await?;
        }

        let mut query = sqlx::QueryBuilder::<Postgres>::new(POPULATED_SELECT);
        query.push(" WHERE TRUE");
        if let InterviewScope::OwnedBy(user_id) = interview_scope(context) {
            query.push(" AND i.user_id = ").push_bind(user_id);
        }
        if let Some(company_id) = company_id {
            query.push(" AND i.company_id = ").push_bind(company_id);
        }
        query.push(" ORDER BY i.interview_date, i.created_at");

        let rows = query
            .build_query_as::<InterviewCompanyRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(PopulatedInterview::from).collect())
    }

    pub async fn get(&self, context: &RequestContext, id: Uuid) -> Result<PopulatedInterview, ApiError> {
        let row = sqlx::query_as::<_, InterviewCompanyRow>(&format!("{} WHERE i.id = $1", POPULATED_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| interview_not_found(id))?;

        authorize_interview(context, row.user_id, InterviewAction::Read)?;
        Ok(row.into())
    }

    /// Books an interview for the caller. The company row is share-locked and
    /// the caller's user row is locked for update so concurrent bookings by the
    /// same user are serialized and the quota cannot be overrun.
    pub async fn create(
        &self,
        context: &RequestContext,
        company_id: Uuid,
        new: NewInterview,
    ) -> Result<Interview, ApiError> {
        let mut tx = self.pool.begin().await?;

        let company: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM companies WHERE id = $1 FOR SHARE")
            .bind(company_id)
            .fetch_optional(&mut *tx)
            .await?;
        if company.is_none() {
            return Err(company_not_found(company_id));
        }

        sqlx::query("SELECT id FROM users WHERE id = $1 FOR UPDATE")
            .bind(context.user_id)
            .fetch_optional(&mut *tx)
            .await?;

        let (existing,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM interviews WHERE user_id = $1")
            .bind(context.user_id)
            .fetch_one(&mut *tx)
            .await?;

        check_quota(context, existing)?;
        check_interview_date(&new.interview_date)?;

        let interview = sqlx::query_as::<_, Interview>(&format!(
            "INSERT INTO interviews (id, interview_date, name, user_id, company_id) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            INTERVIEW_COLUMNS_SQL
        ))
        .bind(Uuid::new_v4())
        .bind(new.interview_date)
        .bind(&new.name)
        .bind(context.user_id)
        .bind(company_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        tracing::info!(
            "User {} booked interview {} with company {}",
            context.user_id,
            interview.id,
            company_id
        );
        Ok(interview)
    }

    pub async fn update(
        &self,
        context: &RequestContext,
        id: Uuid,
        patch: InterviewPatch,
    ) -> Result<Interview, ApiError> {
        let current = self.find(id).await?.ok_or_else(|| interview_not_found(id))?;
        authorize_interview(context, current.user, InterviewAction::Update)?;

        if let Some(date) = &patch.interview_date {
            check_interview_date(date)?;
        }

        let interview = sqlx::query_as::<_, Interview>(&format!(
            "UPDATE interviews SET interview_date = COALESCE($2, interview_date), name = COALESCE($3, name) \
             WHERE id = $1 RETURNING {}",
            INTERVIEW_COLUMNS_SQL
        ))
        .bind(id)
        .bind(patch.interview_date)
        .bind(&patch.name)
        .fetch_optional(&self.pool)
        .await?;

        interview.ok_or_else(|| interview_not_found(id))
    }

    pub async fn delete(&self, context: &RequestContext, id: Uuid) -> Result<(), ApiError> {
        let current = self.find(id).await?.ok_or_else(|| interview_not_found(id))?;
        authorize_interview(context, current.user, InterviewAction::Delete)?;

        sqlx::query("DELETE FROM interviews WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        tracing::info!("User {} deleted interview {}", context.user_id, id);
        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<Option<Interview>, DatabaseError> {
        let interview = sqlx::query_as::<_, Interview>(&format!(
            "SELECT {} FROM interviews WHERE id = $1",
            INTERVIEW_COLUMNS_SQL
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(interview)
    }

    async fn ensure_company(&self, company_id: Uuid) -> Result<(), ApiError> {
        let exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM companies WHERE id = $1")
            .bind(company_id)
            .fetch_optional(&self.pool)
            .await?;
        exists.map(|_| ()).ok_or_else(|| company_not_found(company_id))
    }
}
