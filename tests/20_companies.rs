mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use serde_json::{json, Value};
use uuid::Uuid;

use jobfair_api::database::models::Role;

#[tokio::test]
async fn admin_creates_and_reads_back_company() -> Result<()> {
    let Some(app) = common::db_app().await? else { return Ok(()) };
    let (_, admin) = common::create_user(&app.pool, Role::Admin).await?;

    let body = common::company_body("Acme");
    let (status, created) =
        common::send(&app.router, Method::POST, "/api/v1/companies", Some(&admin), Some(body.clone())).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["success"], json!(true));
    assert_eq!(created["data"]["name"], body["name"]);
    assert_eq!(created["data"]["quote"], json!(common::TEST_QUOTE));

    let id = created["data"]["id"].as_str().unwrap_or_default().to_string();
    let (status, fetched) = common::get(&app.router, &format!("/api/v1/companies/{}", id), None).await?;
    assert_eq!(status, StatusCode::OK);
    for field in ["id", "name", "address", "website", "description", "tel", "quote"] {
        assert_eq!(fetched["data"][field], created["data"][field], "{}", field);
    }
    assert_eq!(fetched["data"]["interviews"], json!([]));
    Ok(())
}

#[tokio::test]
async fn supplied_quote_is_kept() -> Result<()> {
    let Some(app) = common::db_app().await? else { return Ok(()) };
    let (_, admin) = common::create_user(&app.pool, Role::Admin).await?;

    let mut body = common::company_body("Quoted");
    body["quote"] = json!("Our own motto");
    let (status, created) =
        common::send(&app.router, Method::POST, "/api/v1/companies", Some(&admin), Some(body)).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["data"]["quote"], json!("Our own motto"));
    Ok(())
}

#[tokio::test]
async fn regular_users_cannot_manage_companies() -> Result<()> {
    let Some(app) = common::db_app().await? else { return Ok(()) };
    let (_, user) = common::create_user(&app.pool, Role::User).await?;

    let (status, body) = common::send(
        &app.router,
        Method::POST,
        "/api/v1/companies",
        Some(&user),
        Some(common::company_body("Nope")),
    )
    .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], json!("User role user is not authorized to access this route"));
    Ok(())
}

#[tokio::test]
async fn validation_and_duplicate_names() -> Result<()> {
    let Some(app) = common::db_app().await? else { return Ok(()) };
    let (_, admin) = common::create_user(&app.pool, Role::Admin).await?;

    let (status, body) = common::send(
        &app.router,
        Method::POST,
        "/api/v1/companies",
        Some(&admin),
        Some(json!({ "name": "x".repeat(51), "website": "not a site" })),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"]["name"], json!("Name can not be more than 50 characters"));
    assert_eq!(body["errors"]["website"], json!("Please add a valid link"));
    assert_eq!(body["errors"]["tel"], json!("Please add a telephone number"));

    let company = common::company_body("Twin");
    let (status, _) =
        common::send(&app.router, Method::POST, "/api/v1/companies", Some(&admin), Some(company.clone())).await?;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) =
        common::send(&app.router, Method::POST, "/api/v1/companies", Some(&admin), Some(company)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!("Duplicate field value entered"));
    Ok(())
}

#[tokio::test]
async fn markup_is_stripped_from_input() -> Result<()> {
    let Some(app) = common::db_app().await? else { return Ok(()) };
    let (_, admin) = common::create_user(&app.pool, Role::Admin).await?;

    let mut body = common::company_body("Clean");
    body["description"] = json!("<script>alert(1)</script>We hire");
    body["address"] = json!("Floor < 3, Wing B");
    let (status, created) =
        common::send(&app.router, Method::POST, "/api/v1/companies", Some(&admin), Some(body)).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["data"]["description"], json!("alert(1)We hire"));
    assert_eq!(created["data"]["address"], json!("Floor &lt; 3, Wing B"));
    Ok(())
}

#[tokio::test]
async fn update_changes_only_given_fields() -> Result<()> {
    let Some(app) = common::db_app().await? else { return Ok(()) };
    let (_, admin) = common::create_user(&app.pool, Role::Admin).await?;
    let id = common::create_company(&app.router, &admin, "Patch").await?;

    let (status, updated) = common::send(
        &app.router,
        Method::PUT,
        &format!("/api/v1/companies/{}", id),
        Some(&admin),
        Some(json!({ "tel": "02-000-0000" })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["data"]["tel"], json!("02-000-0000"));
    assert_eq!(updated["data"]["address"], json!("99 Phaya Thai Rd, Bangkok"));

    let missing = Uuid::new_v4();
    let (status, body) = common::send(
        &app.router,
        Method::PUT,
        &format!("/api/v1/companies/{}", missing),
        Some(&admin),
        Some(json!({ "tel": "1" })),
    )
    .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], json!(format!("No company with the id of {}", missing)));
    Ok(())
}

#[tokio::test]
async fn listing_filters_selects_sorts_and_pages() -> Result<()> {
    let Some(app) = common::db_app().await? else { return Ok(()) };
    let (_, admin) = common::create_user(&app.pool, Role::Admin).await?;

    let mut names = Vec::new();
    for _ in 0..3 {
        let id = common::create_company(&app.router, &admin, "List").await?;
        let (_, company) = common::get(&app.router, &format!("/api/v1/companies/{}", id), None).await?;
        names.push(company["data"]["name"].as_str().unwrap_or_default().to_string());
    }
    names.sort();
    let in_list = names.join(",");

    let (status, body) = common::get(
        &app.router,
        &format!("/api/v1/companies?name%5Bin%5D={}&select=name&sort=-name&limit=2", in_list.replace(' ', "%20")),
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], json!(2));

    let data = body["data"].as_array().cloned().unwrap_or_default();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["name"], json!(names[2]));
    assert_eq!(data[1]["name"], json!(names[1]));
    for company in &data {
        let keys: Vec<&String> = company.as_object().map(|o| o.keys().collect()).unwrap_or_default();
        assert!(company.get("id").is_some());
        assert!(company.get("interviews").is_some());
        assert!(company.get("tel").is_none(), "unexpected keys {:?}", keys);
    }
    assert!(body["pagination"].get("prev").is_none());

    let (_, page2) = common::get(
        &app.router,
        &format!("/api/v1/companies?name%5Bin%5D={}&sort=-name&limit=2&page=2", in_list.replace(' ', "%20")),
        None,
    )
    .await?;
    assert_eq!(page2["count"], json!(1));
    assert_eq!(page2["data"][0]["name"], json!(names[0]));
    assert_eq!(page2["pagination"]["prev"], json!({ "page": 1, "limit": 2 }));
    Ok(())
}

#[tokio::test]
async fn listing_ignores_unknown_filters() -> Result<()> {
    let Some(app) = common::db_app().await? else { return Ok(()) };
    let (_, admin) = common::create_user(&app.pool, Role::Admin).await?;
    let id = common::create_company(&app.router, &admin, "Loose").await?;
    let (_, company) = common::get(&app.router, &format!("/api/v1/companies/{}", id), None).await?;
    let name = company["data"]["name"].as_str().unwrap_or_default().replace(' ', "%20");

    let (status, body) = common::get(
        &app.router,
        &format!("/api/v1/companies?name={}&ingredient=salt&%24where=1", name),
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], json!(1));
    assert_eq!(body["data"][0]["id"], json!(id));
    Ok(())
}

#[tokio::test]
async fn deleting_company_removes_its_interviews() -> Result<()> {
    let Some(app) = common::db_app().await? else { return Ok(()) };
    let (_, admin) = common::create_user(&app.pool, Role::Admin).await?;
    let id = common::create_company(&app.router, &admin, "Doomed").await?;

    for day in ["2022-05-10T09:00:00Z", "2022-05-11T09:00:00Z"] {
        let (status, _) = common::send(
            &app.router,
            Method::POST,
            &format!("/api/v1/companies/{}/interviews", id),
            Some(&admin),
            Some(common::interview_body(day)),
        )
        .await?;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) =
        common::send(&app.router, Method::DELETE, &format!("/api/v1/companies/{}", id), Some(&admin), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "data": {} }));

    let company_id: Uuid = id.parse()?;
    let (remaining,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM interviews WHERE company_id = $1")
        .bind(company_id)
        .fetch_one(&app.pool)
        .await?;
    assert_eq!(remaining, 0);

    let (status, _) = common::get(&app.router, &format!("/api/v1/companies/{}", id), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) =
        common::send(&app.router, Method::DELETE, &format!("/api/v1/companies/{}", id), Some(&admin), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn company_detail_lists_its_interviews() -> Result<()> {
    let Some(app) = common::db_app().await? else { return Ok(()) };
    let (_, admin) = common::create_user(&app.pool, Role::Admin).await?;
    let (_, user) = common::create_user(&app.pool, Role::User).await?;
    let id = common::create_company(&app.router, &admin, "Busy").await?;

    let (status, _) = common::send(
        &app.router,
        Method::POST,
        &format!("/api/v1/companies/{}/interviews", id),
        Some(&user),
        Some(common::interview_body("2022-05-12T13:00:00Z")),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);

    let (_, company) = common::get(&app.router, &format!("/api/v1/companies/{}", id), None).await?;
    let interviews = company["data"]["interviews"].as_array().cloned().unwrap_or_default();
    assert_eq!(interviews.len(), 1);
    assert_eq!(interviews[0]["company"], Value::String(id));
    Ok(())
}
