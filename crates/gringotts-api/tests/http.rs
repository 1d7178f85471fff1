//! HTTP surface tests driven through the in-process client fixture.

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

use gringotts_test_support::{TestApp, postgres};

async fn launch_or_skip() -> Result<Option<TestApp>> {
    if !postgres::available() {
        eprintln!("skipping http tests: no postgres available");
        return Ok(None);
    }
    TestApp::launch().await.map(Some)
}

#[tokio::test]
async fn health_reports_database_status() -> Result<()> {
    let Some(app) = launch_or_skip().await? else {
        return Ok(());
    };

    let response = app.get("/health").await?;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert_eq!(response.body["database"]["status"], "ok");

    app.teardown().await
}

#[tokio::test]
async fn vaults_round_trip_through_the_api() -> Result<()> {
    let Some(app) = launch_or_skip().await? else {
        return Ok(());
    };

    let created = app
        .post_json(
            "/vaults",
            &json!({"owner": "Harry Potter", "galleons": 50_000}),
        )
        .await?;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["owner"], "Harry Potter");
    assert_eq!(created.body["galleons"], 50_000);
    let id = created.body["id"].as_str().expect("id must be a string");

    let fetched = app.get(&format!("/vaults/{id}")).await?;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body["owner"], "Harry Potter");

    let listed = app.get("/vaults").await?;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.body.as_array().map(Vec::len), Some(1));

    app.teardown().await
}

#[tokio::test]
async fn blank_owner_is_rejected() -> Result<()> {
    let Some(app) = launch_or_skip().await? else {
        return Ok(());
    };

    let response = app.post_json("/vaults", &json!({"owner": "   "})).await?;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["title"], "bad request");

    app.teardown().await
}

#[tokio::test]
async fn unknown_vault_is_not_found() -> Result<()> {
    let Some(app) = launch_or_skip().await? else {
        return Ok(());
    };

    let response = app
        .get("/vaults/00000000-0000-0000-0000-000000000000")
        .await?;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["title"], "resource not found");

    app.teardown().await
}

#[tokio::test]
async fn each_launch_starts_from_a_clean_schema() -> Result<()> {
    let Some(app) = launch_or_skip().await? else {
        return Ok(());
    };
    app.post_json("/vaults", &json!({"owner": "Griphook"}))
        .await?;
    app.teardown().await?;

    let Some(app) = launch_or_skip().await? else {
        return Ok(());
    };
    let listed = app.get("/vaults").await?;
    let count = listed.body.as_array().map_or(0, Vec::len);
    // A fresh launch resets the schema, so earlier rows never leak through
    // unless the seed hook is on.
    if !gringotts_test_support::seed_requested() {
        assert_eq!(count, 0);
    }
    app.teardown().await
}
