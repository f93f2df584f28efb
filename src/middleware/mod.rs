pub mod auth;
pub mod rate_limit;
pub mod response;
pub mod security;

pub use auth::{require_admin, require_auth, RequestContext};
pub use rate_limit::{ip_rate_limit_middleware, IpRateLimiter};
pub use response::{ApiResponse, ApiResult};
pub use security::security_headers_middleware;
