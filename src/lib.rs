pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod middleware;
pub mod sanitize;
pub mod services;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post, put, MethodRouter},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::SecurityConfig;
use crate::handlers::{companies, interviews, system};
use crate::middleware::{
    ip_rate_limit_middleware, require_admin, require_auth, security_headers_middleware,
    IpRateLimiter,
};
use crate::state::AppState;

/// Full application router with every global layer applied
pub fn app(state: AppState) -> Router {
    let config = config::config();

    let mut router = Router::new()
        // Public
        .route("/", get(system::root))
        .route("/health", get(system::health))
        .nest("/api/v1", api_routes(&state))
        .fallback(system::not_found)
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes));

    if config.api.enable_rate_limiting {
        let limiter = Arc::new(IpRateLimiter::new(&config.api));
        limiter.spawn_pruning();
        router = router.layer(from_fn_with_state(limiter, ip_rate_limit_middleware));
    }

    router = router.layer(from_fn(security_headers_middleware));

    if let Some(cors) = cors_layer(&config.security) {
        router = router.layer(cors);
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

fn api_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/companies",
            get(companies::list).merge(admin_only(post(companies::create), state)),
        )
        .route(
            "/companies/:id",
            get(companies::get).merge(admin_only(
                put(companies::update).delete(companies::delete),
                state,
            )),
        )
        .route(
            "/companies/:id/interviews",
            protected(
                get(interviews::list_for_company).post(interviews::create),
                state,
            ),
        )
        .route("/interviews", protected(get(interviews::list), state))
        .route(
            "/interviews/:id",
            protected(
                get(interviews::get)
                    .put(interviews::update)
                    .delete(interviews::delete),
                state,
            ),
        )
}

/// Requires a valid bearer token for a known user
fn protected(route: MethodRouter<AppState>, state: &AppState) -> MethodRouter<AppState> {
    route.layer(from_fn_with_state(state.clone(), require_auth))
}

/// Authenticated and admin role
fn admin_only(route: MethodRouter<AppState>, state: &AppState) -> MethodRouter<AppState> {
    protected(route.layer(from_fn(require_admin)), state)
}

fn cors_layer(security: &SecurityConfig) -> Option<CorsLayer> {
    if !security.enable_cors {
        return None;
    }

    if security.cors_origins.iter().any(|origin| origin == "*") {
        return Some(CorsLayer::permissive());
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]),
    )
}
