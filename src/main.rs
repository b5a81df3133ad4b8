#[cfg(feature = "ssr")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use a2p_docs::app::{build_router, AppState};
    use a2p_docs::config::Settings;
    use a2p_docs::db::memory::InMemoryStore;
    use a2p_docs::db::project_repository::{MongoProjectRepository, ProjectRepository};
    use a2p_docs::db::repository::{DocumentRepository, MongoDocumentRepository};
    use a2p_docs::db::share_link_repository::{MongoShareLinkRepository, ShareLinkRepository};
    use anyhow::Context;
    use std::sync::Arc;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "a2p_docs=info,tower_http=info".into()),
        )
        .init();

    tracing::info!("Starting A2P Docs server...");

    let settings = Settings::load().context("Failed to load configuration")?;

    let (share_links, projects, documents): (
        Arc<dyn ShareLinkRepository>,
        Arc<dyn ProjectRepository>,
        Arc<dyn DocumentRepository>,
    ) = if settings.demo_mode {
        tracing::warn!("Demo mode enabled: using in-memory storage");
        let store = Arc::new(InMemoryStore::new());
        a2p_docs::demo_seeder::seed_demo_data(&*store, &*store, &*store)
            .await
            .context("Failed to seed demo data")?;
        let share_links: Arc<dyn ShareLinkRepository> = store.clone();
        let projects: Arc<dyn ProjectRepository> = store.clone();
        let documents: Arc<dyn DocumentRepository> = store;
        (share_links, projects, documents)
    } else {
        let mongo_client = mongodb::Client::with_uri_str(&settings.mongodb_uri)
            .await
            .context("Failed to connect to MongoDB")?;
        let mongo_db = mongo_client.database(&settings.mongodb_database);

        let links_repo = MongoShareLinkRepository::new(&mongo_db);
        let documents_repo = MongoDocumentRepository::new(&mongo_db);
        links_repo
            .ensure_indexes()
            .await
            .context("Failed to create share link indexes")?;
        documents_repo
            .ensure_indexes()
            .await
            .context("Failed to create document indexes")?;

        tracing::info!("Connected to MongoDB database '{}'", settings.mongodb_database);

        let share_links: Arc<dyn ShareLinkRepository> = Arc::new(links_repo);
        let projects: Arc<dyn ProjectRepository> =
            Arc::new(MongoProjectRepository::new(&mongo_db));
        let documents: Arc<dyn DocumentRepository> = Arc::new(documents_repo);
        (share_links, projects, documents)
    };

    let app_state = AppState {
        share_links,
        projects,
        documents,
        service_token: settings.service_token.clone(),
        public_base_url: settings.public_base_url.clone(),
        branding: settings.branding(),
    };

    let app = build_router(app_state, &settings.site_root);

    // Start the server
    tracing::info!("Listening on http://{}", settings.bind_addr);
    let listener = tokio::net::TcpListener::bind(&settings.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", settings.bind_addr))?;
    axum::serve(listener, app.into_make_service())
        .await
        .context("Server error")?;

    Ok(())
}

// When compiled for WASM (client-side), there's no main function.
// The loader entry points live in `embed::web`.
#[cfg(not(feature = "ssr"))]
fn main() {}
