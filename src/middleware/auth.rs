use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::validate_jwt;
use crate::database::models::Role;
use crate::error::ApiError;
use crate::services::user_service;
use crate::state::AppState;

const NOT_AUTHORIZED: &str = "Not authorized to access this route";

/// Identity of the caller, inserted once by `require_auth` and never mutated
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequestContext {
    pub user_id: Uuid,
    pub role: Role,
}

impl RequestContext {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Verifies the bearer token and loads its user. The role in the context is
/// the stored one, so a demoted user loses admin rights before the token expires.
pub async fn require_auth(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_jwt_from_headers(&headers).map_err(|reason| {
        tracing::debug!("Rejected request without usable token: {}", reason);
        ApiError::unauthorized(NOT_AUTHORIZED)
    })?;

    let claims = validate_jwt(&token).map_err(|e| {
        tracing::debug!("Rejected token: {}", e);
        ApiError::unauthorized(NOT_AUTHORIZED)
    })?;

    let user = user_service::find_by_id(&state.pool, claims.sub)
        .await?
        .ok_or_else(|| {
            tracing::debug!("Token subject {} no longer exists", claims.sub);
            ApiError::unauthorized(NOT_AUTHORIZED)
        })?;

    request.extensions_mut().insert(RequestContext {
        user_id: user.id,
        role: user.role(),
    });

    Ok(next.run(request).await)
}

/// Must run after `require_auth`
pub async fn require_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    let context = request
        .extensions()
        .get::<RequestContext>()
        .copied()
        .ok_or_else(|| ApiError::unauthorized(NOT_AUTHORIZED))?;

    if !context.is_admin() {
        return Err(ApiError::forbidden(format!(
            "User role {} is not authorized to access this route",
            context.role
        )));
    }

    Ok(next.run(request).await)
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<String, &'static str> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or("Missing Authorization header")?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format")?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        Some(_) => Err("Empty JWT token"),
        None => Err("Authorization header must use Bearer token format"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header::AUTHORIZATION, HeaderValue, Request as HttpRequest, StatusCode},
        middleware,
        routing::get,
        Extension, Router,
    };
    use tower::ServiceExt;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(extract_jwt_from_headers(&headers_with("Bearer abc.def")).unwrap(), "abc.def");
    }

    #[test]
    fn rejects_missing_or_malformed_headers() {
        assert!(extract_jwt_from_headers(&HeaderMap::new()).is_err());
        assert!(extract_jwt_from_headers(&headers_with("Basic dXNlcjpwdw==")).is_err());
        assert!(extract_jwt_from_headers(&headers_with("Bearer   ")).is_err());
    }

    async fn ok() -> &'static str {
        "ok"
    }

    fn admin_router(context: RequestContext) -> Router {
        Router::new()
            .route("/", get(ok))
            .layer(middleware::from_fn(require_admin))
            .layer(Extension(context))
    }

    #[tokio::test]
    async fn admin_gate_allows_admins() {
        let app = admin_router(RequestContext { user_id: Uuid::new_v4(), role: Role::Admin });
        let response = app
            .oneshot(HttpRequest::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn admin_gate_forbids_users() {
        let app = admin_router(RequestContext { user_id: Uuid::new_v4(), role: Role::User });
        let response = app
            .oneshot(HttpRequest::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn admin_gate_without_context_is_unauthorized() {
        let app = Router::new()
            .route("/", get(ok))
            .layer(middleware::from_fn(require_admin));
        let response = app
            .oneshot(HttpRequest::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
