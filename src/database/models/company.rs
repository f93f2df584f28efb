use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::ApiError;
use crate::sanitize::clean_text;

use super::interview::Interview;

pub const COMPANY_TABLE: &str = "companies";

/// Columns a listing may filter, sort or select on
pub const COMPANY_COLUMNS: &[&str] = &["id", "name", "address", "website", "description", "tel", "quote"];

pub const NAME_MAX_LEN: usize = 50;

static WEBSITE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(http://|https://)?([a-z0-9][a-z0-9\-]*\.)+[a-z0-9][a-z0-9\-]*$")
        .expect("website pattern compiles")
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub website: String,
    pub description: String,
    pub tel: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote: Option<String>,
}

/// Company with its interviews populated
#[derive(Debug, Clone, Serialize)]
pub struct CompanyDetail {
    #[serde(flatten)]
    pub company: Company,
    pub interviews: Vec<Interview>,
}

/// Company body for POST and PUT. All fields are optional at the wire level so
/// that missing fields surface as per-field validation messages.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompanyInput {
    pub name: Option<String>,
    pub address: Option<String>,
    pub website: Option<String>,
    pub description: Option<String>,
    pub tel: Option<String>,
    pub quote: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCompany {
    pub name: String,
    pub address: String,
    pub website: String,
    pub description: String,
    pub tel: String,
    pub quote: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyPatch {
    pub name: Option<String>,
    pub address: Option<String>,
    pub website: Option<String>,
    pub description: Option<String>,
    pub tel: Option<String>,
    pub quote: Option<String>,
}

impl CompanyPatch {
    pub fn is_empty(&self) -> bool {
        *self == CompanyPatch::default()
    }
}

impl CompanyInput {
    /// Strip markup from every text field and trim the name
    pub fn sanitized(self) -> Self {
        Self {
            name: clean_text(self.name).map(|n| n.trim().to_string()),
            address: clean_text(self.address),
            website: clean_text(self.website).map(|w| w.trim().to_string()),
            description: clean_text(self.description),
            tel: clean_text(self.tel),
            quote: clean_text(self.quote),
        }
    }

    pub fn into_new(self) -> Result<NewCompany, ApiError> {
        let input = self.sanitized();
        let mut errors = HashMap::new();

        let name = required(input.name, "name", "Please add a name", &mut errors);
        let address = required(input.address, "address", "Please add an address", &mut errors);
        let website = required(input.website, "website", "Please add a link to your website", &mut errors);
        let description = required(input.description, "description", "Please add a description", &mut errors);
        let tel = required(input.tel, "tel", "Please add a telephone number", &mut errors);

        if let Some(name) = &name { check_name(name, &mut errors); }
        if let Some(website) = &website { check_website(website, &mut errors); }

        match (name, address, website, description, tel) {
            (Some(name), Some(address), Some(website), Some(description), Some(tel)) if errors.is_empty() => {
                Ok(NewCompany {
                    name,
                    address,
                    website,
                    description,
                    tel,
                    quote: input.quote.filter(|q| !q.trim().is_empty()),
                })
            }
            _ => Err(ApiError::validation_error("Company validation failed", Some(errors))),
        }
    }

    /// Validates only the fields present; present fields must still be non-blank
    pub fn into_patch(self) -> Result<CompanyPatch, ApiError> {
        let input = self.sanitized();
        let mut errors = HashMap::new();

        let name = present(input.name, "name", "Please add a name", &mut errors);
        let address = present(input.address, "address", "Please add an address", &mut errors);
        let website = present(input.website, "website", "Please add a link to your website", &mut errors);
        let description = present(input.description, "description", "Please add a description", &mut errors);
        let tel = present(input.tel, "tel", "Please add a telephone number", &mut errors);

        if let Some(name) = &name { check_name(name, &mut errors); }
        if let Some(website) = &website { check_website(website, &mut errors); }

        if !errors.is_empty() {
            return Err(ApiError::validation_error("Company validation failed", Some(errors)));
        }

        Ok(CompanyPatch { name, address, website, description, tel, quote: input.quote })
    }
}

fn required(
    value: Option<String>,
    field: &str,
    message: &str,
    errors: &mut HashMap<String, String>,
) -> Option<String> {
    match value.filter(|v| !v.trim().is_empty()) {
        Some(v) => Some(v),
        None => {
            errors.insert(field.to_string(), message.to_string());
            None
        }
    }
}

fn present(
    value: Option<String>,
    field: &str,
    message: &str,
    errors: &mut HashMap<String, String>,
) -> Option<String> {
    match value {
        Some(v) if v.trim().is_empty() => {
            errors.insert(field.to_string(), message.to_string());
            None
        }
        other => other,
    }
}

fn check_name(name: &str, errors: &mut HashMap<String, String>) {
    if name.chars().count() > NAME_MAX_LEN {
        errors.insert("name".to_string(), "Name can not be more than 50 characters".to_string());
    }
}

fn check_website(website: &str, errors: &mut HashMap<String, String>) {
    if !is_valid_website(website) {
        errors.insert("website".to_string(), "Please add a valid link".to_string());
    }
}

pub fn is_valid_website(website: &str) -> bool {
    WEBSITE_PATTERN.is_match(website)
}
