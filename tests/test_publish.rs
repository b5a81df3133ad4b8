#![cfg(feature = "ssr")]

mod common;

use axum::http::StatusCode;

use a2p_docs::db::models::DocumentType;
use a2p_docs::db::project_repository::ProjectRepository;
use a2p_docs::db::repository::DocumentRepository;

#[tokio::test]
async fn publish_rejects_invalid_service_token() {
    let env = common::TestEnv::start();
    let server = env.server_permissive();

    let response = server
        .post("/api/v1/documents")
        .json(&serde_json::json!({
            "service_token": "wrong-token",
            "project_id": "proj-1",
            "type": "privacy_policy",
            "content": "<p>x</p>"
        }))
        .await;

    response.assert_status_unauthorized();
}

#[tokio::test]
async fn publish_rejects_unknown_project() {
    let env = common::TestEnv::start();
    let server = env.server_permissive();

    let response = env
        .publish(&server, "missing-project", "privacy_policy", "<p>x</p>")
        .await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn publish_rejects_invalid_type() {
    let env = common::TestEnv::start();
    let server = env.server();
    let permissive = env.server_permissive();

    env.create_project(&server, "proj-1", "Acme").await;
    let response = env
        .publish(&permissive, "proj-1", "cookie_banner", "<p>x</p>")
        .await;

    response.assert_status_bad_request();
    let body: serde_json::Value = response.json();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("Invalid document type"));
}

#[tokio::test]
async fn publish_increments_versions() {
    let env = common::TestEnv::start();
    let server = env.server();

    env.create_project(&server, "proj-2", "Acme").await;

    let first: serde_json::Value = env
        .publish(&server, "proj-2", "terms_of_service", "<p>v1</p>")
        .await
        .json();
    let second: serde_json::Value = env
        .publish(&server, "proj-2", "Terms-Of-Service", "<p>v2</p>")
        .await
        .json();

    assert_eq!(first["version"], 1);
    assert_eq!(second["version"], 2);
    assert_eq!(second["type"], "terms_of_service");

    let latest = env
        .store
        .find_latest("proj-2", DocumentType::TermsOfService)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(latest.content, "<p>v2</p>");
}

#[tokio::test]
async fn project_upsert_renames_and_is_visible_in_shares() {
    let env = common::TestEnv::start();
    let server = env.server();

    let created: serde_json::Value = env.create_project(&server, "proj-3", "Acme").await.json();
    assert_eq!(created["id"], "proj-3");

    env.create_project(&server, "proj-3", "Acme Dental Group").await;
    let project = env.store.find_by_id("proj-3").await.unwrap().unwrap();
    assert_eq!(project.business_name, "Acme Dental Group");

    env.publish(&server, "proj-3", "privacy_policy", "<p>p</p>").await;
    let token = env.issue_link(&server, "proj-3", "privacy_policy").await;

    let body: serde_json::Value = server.get(&format!("/api/doc/{token}")).await.json();
    assert_eq!(body["projectName"], "Acme Dental Group");
}

#[tokio::test]
async fn issue_link_returns_public_urls() {
    let env = common::TestEnv::start();
    let server = env.server();

    env.create_project(&server, "proj-4", "Acme").await;

    let body: serde_json::Value = server
        .post("/api/v1/share-links")
        .json(&serde_json::json!({
            "service_token": common::SERVICE_TOKEN,
            "project_id": "proj-4",
            "type": "submission_language"
        }))
        .await
        .json();

    let token = body["token"].as_str().unwrap();
    assert_eq!(
        body["embed_url"],
        format!("{}/api/embed/{}", common::PUBLIC_BASE_URL, token)
    );
    assert_eq!(
        body["doc_url"],
        format!("{}/api/doc/{}", common::PUBLIC_BASE_URL, token)
    );
}

#[tokio::test]
async fn issue_link_for_unknown_project_fails() {
    let env = common::TestEnv::start();
    let server = env.server_permissive();

    let response = server
        .post("/api/v1/share-links")
        .json(&serde_json::json!({
            "service_token": common::SERVICE_TOKEN,
            "project_id": "nope",
            "type": "privacy_policy"
        }))
        .await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn revoke_unknown_link_is_not_found() {
    let env = common::TestEnv::start();
    let server = env.server_permissive();

    let response = server
        .post("/api/v1/share-links/revoke")
        .json(&serde_json::json!({
            "service_token": common::SERVICE_TOKEN,
            "token": "never-issued"
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_json_body_is_json_bad_request() {
    let env = common::TestEnv::start();
    let server = env.server_permissive();

    let response = server
        .post("/api/v1/documents")
        .text("<p>not json</p>")
        .await;

    response.assert_status_bad_request();
    let body: serde_json::Value = response.json();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn malformed_or_incomplete_json_is_bad_request() {
    let env = common::TestEnv::start();
    let server = env.server_permissive();

    let malformed = server
        .post("/api/v1/share-links")
        .content_type("application/json")
        .bytes(axum::body::Bytes::from_static(b"{\"service_token\":"))
        .await;
    malformed.assert_status_bad_request();
    assert!(malformed.json::<serde_json::Value>()["error"].is_string());

    let missing_field = server
        .post("/api/v1/projects")
        .json(&serde_json::json!({ "service_token": common::SERVICE_TOKEN }))
        .await;
    missing_field.assert_status_bad_request();
    assert!(missing_field.json::<serde_json::Value>()["error"].is_string());
}
