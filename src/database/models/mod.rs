pub mod company;
pub mod interview;
pub mod user;

pub use company::{Company, CompanyDetail, CompanyInput, CompanyPatch, NewCompany};
pub use interview::{Interview, InterviewInput, InterviewPatch, NewInterview, PopulatedInterview};
pub use user::{Role, User};
