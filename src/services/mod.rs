pub mod access;
pub mod company_query;
pub mod company_service;
pub mod interview_rules;
pub mod interview_service;
pub mod quote_service;
pub mod user_service;

pub use company_query::CompanyQuery;
pub use company_service::CompanyService;
pub use interview_service::InterviewService;
pub use quote_service::{NoQuotes, QuotableClient, QuoteSource};
