use serde_json::{Map, Value};
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::company::COMPANY_TABLE;
use crate::database::models::{Company, CompanyDetail, CompanyPatch, Interview, NewCompany};
use crate::database::query_builder::QueryBuilder;
use crate::error::ApiError;
use crate::filter::Pagination;
use crate::services::company_query::CompanyQuery;
use crate::services::quote_service::{enrich_quote, QuoteSource};

const COMPANY_COLUMNS_SQL: &str = "id, name, address, website, description, tel, quote";
const INTERVIEW_COLUMNS_SQL: &str = "id, interview_date, name, user_id, company_id, created_at";

/// One page of the company listing
#[derive(Debug)]
pub struct CompanyPage {
    pub companies: Vec<Map<String, Value>>,
    pub pagination: Pagination,
}

pub fn company_not_found(id: Uuid) -> ApiError {
    ApiError::not_found(format!("No company with the id of {}", id))
}

pub struct CompanyService {
    pool: PgPool,
}

impl CompanyService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Filtered, sorted and paged companies, each with its interviews
    pub async fn list(&self, query: &CompanyQuery) -> Result<CompanyPage, ApiError> {
        let mut companies = QueryBuilder::new(COMPANY_TABLE)?
            .filter(query.to_filter_data())?
            .select_json(&self.pool)
            .await?;

        // Pagination cues are computed against the whole collection
        let total = QueryBuilder::new(COMPANY_TABLE)?.count(&self.pool).await?;

        let ids: Vec<Uuid> = companies
            .iter()
            .filter_map(|c| c.get("id").and_then(Value::as_str))
            .filter_map(|id| id.parse().ok())
            .collect();
        let mut interviews = self.interviews_by_company(&ids).await?;

        for company in companies.iter_mut() {
            if matches!(company.get("quote"), Some(Value::Null)) {
                company.remove("quote");
            }
            let owned = company
                .get("id")
                .and_then(Value::as_str)
                .and_then(|id| id.parse::<Uuid>().ok())
                .and_then(|id| interviews.remove(&id))
                .unwrap_or_default();
            let owned = serde_json::to_value(owned).map_err(|e| {
                tracing::error!("Failed to serialize interviews: {}", e);
                ApiError::internal_server_error("An error occurred while processing your request")
            })?;
            company.insert("interviews".to_string(), owned);
        }

        Ok(CompanyPage {
            companies,
            pagination: Pagination::compute(query.page, total),
        })
    }

    pub async fn get(&self, id: Uuid) -> Result<CompanyDetail, ApiError> {
        let company = self.find(id).await?.ok_or_else(|| company_not_found(id))?;
        let interviews = self
            .interviews_by_company(&[id])
            .await?
            .remove(&id)
            .unwrap_or_default();
        Ok(CompanyDetail { company, interviews })
    }

    pub async fn find(&self, id: Uuid) -> Result<Option<Company>, DatabaseError> {
        let company = sqlx::query_as::<_, Company>(&format!(
            "SELECT {} FROM companies WHERE id = $1",
            COMPANY_COLUMNS_SQL
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(company)
    }

    /// Inserts the company, first asking `quotes` for a quote when none was given
    pub async fn create(&self, mut new: NewCompany, quotes: &dyn QuoteSource) -> Result<Company, ApiError> {
        if new.quote.is_none() {
            new.quote = enrich_quote(quotes).await;
        }

        let company = sqlx::query_as::<_, Company>(&format!(
            "INSERT INTO companies ({cols}) VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {cols}",
            cols = COMPANY_COLUMNS_SQL
        ))
        .bind(Uuid::new_v4())
        .bind(&new.name)
        .bind(&new.address)
        .bind(&new.website)
        .bind(&new.description)
        .bind(&new.tel)
        .bind(&new.quote)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("Created company {} ({})", company.id, company.name);
        Ok(company)
    }

    pub async fn update(&self, id: Uuid, patch: CompanyPatch) -> Result<Company, ApiError> {
        if patch.is_empty() {
            return self.find(id).await?.ok_or_else(|| company_not_found(id));
        }

        let company = sqlx::query_as::<_, Company>(&format!(
            r#"
            UPDATE companies
            SET name = COALESCE($2, name),
                address = COALESCE($3, address),
                website = COALESCE($4, website),
                description = COALESCE($5, description),
                tel = COALESCE($6, tel),
                quote = COALESCE($7, quote)
            WHERE id = $1
            RETURNING {}
            "#,
            COMPANY_COLUMNS_SQL
        ))
        .bind(id)
        .bind(&patch.name)
        .bind(&patch.address)
        .bind(&patch.website)
        .bind(&patch.description)
        .bind(&patch.tel)
        .bind(&patch.quote)
        .fetch_optional(&self.pool)
        .await?;

        company.ok_or_else(|| company_not_found(id))
    }

    /// Removes the company and every interview booked with it, atomically
    pub async fn delete(&self, id: Uuid) -> Result<u64, ApiError> {
        let mut tx = self.pool.begin().await?;

        let removed = sqlx::query("DELETE FROM interviews WHERE company_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let deleted = sqlx::query("DELETE FROM companies WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted == 0 {
            tx.rollback().await?;
            return Err(company_not_found(id));
        }

        tx.commit().await?;
        tracing::info!("Deleted company {} with {} interviews", id, removed);
        Ok(removed)
    }

    async fn interviews_by_company(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, Vec<Interview>>, DatabaseError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, Interview>(&format!(
            "SELECT {} FROM interviews WHERE company_id = ANY($1) ORDER BY interview_date, created_at",
            INTERVIEW_COLUMNS_SQL
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        let mut grouped: HashMap<Uuid, Vec<Interview>> = HashMap::new();
        for interview in rows {
            grouped.entry(interview.company).or_default().push(interview);
        }
        Ok(grouped)
    }
}
