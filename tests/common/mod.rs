use std::sync::Arc;

use axum::Router;

use a2p_docs::app::{api_router, AppState};
use a2p_docs::db::memory::InMemoryStore;
use a2p_docs::rendering::footer::EmbedBranding;

pub const SERVICE_TOKEN: &str = "test-token";
pub const PUBLIC_BASE_URL: &str = "https://docs.test";

/// Holds the in-memory store and the Axum router wired to it.
pub struct TestEnv {
    pub store: Arc<InMemoryStore>,
    pub router: Router,
}

impl TestEnv {
    /// Build the API router (no static files) over a fresh in-memory store.
    pub fn start() -> Self {
        let store = Arc::new(InMemoryStore::new());

        let app_state = AppState {
            share_links: store.clone(),
            projects: store.clone(),
            documents: store.clone(),
            service_token: SERVICE_TOKEN.to_string(),
            public_base_url: PUBLIC_BASE_URL.to_string(),
            branding: EmbedBranding {
                brand: "A2P Docs".to_string(),
                url: PUBLIC_BASE_URL.to_string(),
            },
        };

        Self {
            store,
            router: api_router(app_state),
        }
    }

    /// Build an `axum_test::TestServer` from this environment's router.
    pub fn server(&self) -> axum_test::TestServer {
        axum_test::TestServer::builder()
            .expect_success_by_default()
            .try_build(self.router.clone())
            .expect("Failed to build TestServer")
    }

    /// Build a `TestServer` that does NOT expect success by default (for error tests).
    pub fn server_permissive(&self) -> axum_test::TestServer {
        axum_test::TestServer::builder()
            .try_build(self.router.clone())
            .expect("Failed to build TestServer")
    }

    /// Helper: create a project via the API.
    pub async fn create_project(
        &self,
        server: &axum_test::TestServer,
        id: &str,
        business_name: &str,
    ) -> axum_test::TestResponse {
        server
            .post("/api/v1/projects")
            .json(&serde_json::json!({
                "service_token": SERVICE_TOKEN,
                "id": id,
                "business_name": business_name
            }))
            .await
    }

    /// Helper: publish a document version via the API.
    pub async fn publish(
        &self,
        server: &axum_test::TestServer,
        project_id: &str,
        doc_type: &str,
        content: &str,
    ) -> axum_test::TestResponse {
        server
            .post("/api/v1/documents")
            .json(&serde_json::json!({
                "service_token": SERVICE_TOKEN,
                "project_id": project_id,
                "type": doc_type,
                "content": content
            }))
            .await
    }

    /// Helper: issue a share link and return its token.
    pub async fn issue_link(
        &self,
        server: &axum_test::TestServer,
        project_id: &str,
        doc_type: &str,
    ) -> String {
        let response = server
            .post("/api/v1/share-links")
            .json(&serde_json::json!({
                "service_token": SERVICE_TOKEN,
                "project_id": project_id,
                "type": doc_type
            }))
            .await;

        let body: serde_json::Value = response.json();
        body["token"]
            .as_str()
            .expect("token in share link response")
            .to_string()
    }
}
