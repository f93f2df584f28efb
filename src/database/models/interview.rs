use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::ApiError;
use crate::sanitize::clean_text;

/// Interview as stored; `user` and `company` are ids
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Interview {
    pub id: Uuid,
    pub interview_date: DateTime<Utc>,
    pub name: String,
    #[sqlx(rename = "user_id")]
    pub user: Uuid,
    #[sqlx(rename = "company_id")]
    pub company: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Company fields exposed when an interview is populated
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompanySummary {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub website: String,
    pub description: String,
    pub tel: String,
}

/// Interview with its company joined in
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopulatedInterview {
    pub id: Uuid,
    pub interview_date: DateTime<Utc>,
    pub name: String,
    pub user: Uuid,
    pub company: CompanySummary,
    pub created_at: DateTime<Utc>,
}

/// Flat row from `interviews JOIN companies`
#[derive(Debug, Clone, FromRow)]
pub struct InterviewCompanyRow {
    pub id: Uuid,
    pub interview_date: DateTime<Utc>,
    pub name: String,
    pub user_id: Uuid,
    pub company_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub company_name: String,
    pub company_address: String,
    pub company_website: String,
    pub company_description: String,
    pub company_tel: String,
}

impl From<InterviewCompanyRow> for PopulatedInterview {
    fn from(row: InterviewCompanyRow) -> Self {
        Self {
            id: row.id,
            interview_date: row.interview_date,
            name: row.name,
            user: row.user_id,
            company: CompanySummary {
                id: row.company_id,
                name: row.company_name,
                address: row.company_address,
                website: row.company_website,
                description: row.company_description,
                tel: row.company_tel,
            },
            created_at: row.created_at,
        }
    }
}

/// Interview body for POST and PUT. Owner and company come from the
/// request context and the route, never from the body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewInput {
    pub interview_date: Option<DateTime<Utc>>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInterview {
    pub interview_date: DateTime<Utc>,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterviewPatch {
    pub interview_date: Option<DateTime<Utc>>,
    pub name: Option<String>,
}

impl InterviewInput {
    pub fn into_new(self) -> Result<NewInterview, ApiError> {
        let name = clean_text(self.name).filter(|n| !n.trim().is_empty());
        let mut errors = HashMap::new();
        if self.interview_date.is_none() {
            errors.insert("interviewDate".to_string(), "Please add an interview date".to_string());
        }
        if name.is_none() {
            errors.insert("name".to_string(), "Please add a name".to_string());
        }

        match (self.interview_date, name) {
            (Some(interview_date), Some(name)) => Ok(NewInterview { interview_date, name }),
            _ => Err(ApiError::validation_error("Interview validation failed", Some(errors))),
        }
    }

    pub fn into_patch(self) -> Result<InterviewPatch, ApiError> {
        let name = clean_text(self.name);
        if matches!(&name, Some(n) if n.trim().is_empty()) {
            let mut errors = HashMap::new();
            errors.insert("name".to_string(), "Please add a name".to_string());
            return Err(ApiError::validation_error("Interview validation failed", Some(errors)));
        }
        Ok(InterviewPatch { interview_date: self.interview_date, name })
    }
}
