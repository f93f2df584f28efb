mod common;

use anyhow::Result;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

use jobfair_api::database::models::Role;

#[tokio::test]
async fn root_describes_the_service() -> Result<()> {
    let app = common::offline_app()?;
    let (status, body) = common::get(&app, "/", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["name"], json!("Job Fair API"));
    Ok(())
}

#[tokio::test]
async fn health_reports_unavailable_database() -> Result<()> {
    let app = common::offline_app()?;
    let (status, body) = common::get(&app, "/health", None).await?;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["success"], json!(false));
    Ok(())
}

#[tokio::test]
async fn unknown_routes_use_failure_envelope() -> Result<()> {
    let app = common::offline_app()?;
    let (status, body) = common::get(&app, "/api/v1/nothing-here", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], json!(false));
    assert!(body["message"].as_str().unwrap_or_default().contains("/api/v1/nothing-here"));
    Ok(())
}

#[tokio::test]
async fn protected_routes_require_a_token() -> Result<()> {
    let app = common::offline_app()?;
    let id = Uuid::new_v4();

    for (method, uri) in [
        (Method::GET, "/api/v1/interviews".to_string()),
        (Method::GET, format!("/api/v1/interviews/{}", id)),
        (Method::PUT, format!("/api/v1/interviews/{}", id)),
        (Method::DELETE, format!("/api/v1/interviews/{}", id)),
        (Method::GET, format!("/api/v1/companies/{}/interviews", id)),
        (Method::POST, format!("/api/v1/companies/{}/interviews", id)),
        (Method::POST, "/api/v1/companies".to_string()),
        (Method::PUT, format!("/api/v1/companies/{}", id)),
        (Method::DELETE, format!("/api/v1/companies/{}", id)),
    ] {
        let (status, body) = common::send(&app, method.clone(), &uri, None, None).await?;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {}", method, uri);
        assert_eq!(body, json!({ "success": false, "message": "Not authorized to access this route" }));
    }
    Ok(())
}

#[tokio::test]
async fn forged_tokens_are_rejected() -> Result<()> {
    let app = common::offline_app()?;
    let mut token = common::token_for(Uuid::new_v4(), Role::Admin);
    token.push_str("tampered");

    let (status, _) = common::get(&app, "/api/v1/interviews", Some(&token)).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = common::get(&app, "/api/v1/interviews", Some("not.a.jwt")).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn malformed_company_id_is_a_bad_request() -> Result<()> {
    let app = common::offline_app()?;
    let (status, body) = common::get(&app, "/api/v1/companies/not-a-uuid", None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    Ok(())
}

#[tokio::test]
async fn unsupported_filter_operator_is_rejected() -> Result<()> {
    let app = common::offline_app()?;
    let (status, body) = common::get(&app, "/api/v1/companies?name%5Bregex%5D=.%2A", None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    Ok(())
}

#[tokio::test]
async fn responses_carry_security_headers() -> Result<()> {
    let app = common::offline_app()?;
    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty())?)
        .await?;

    let headers = response.headers();
    assert_eq!(headers.get("x-content-type-options").map(|v| v.as_bytes()), Some(&b"nosniff"[..]));
    assert_eq!(headers.get("x-frame-options").map(|v| v.as_bytes()), Some(&b"DENY"[..]));
    assert!(headers.contains_key("content-security-policy"));
    Ok(())
}
