use chrono::Utc;

use crate::db::models::{DocumentType, GeneratedDocument, Project, ShareLink};
use crate::db::project_repository::ProjectRepository;
use crate::db::repository::DocumentRepository;
use crate::db::share_link_repository::{generate_token, ShareLinkRepository};
use crate::error::AppError;

pub const DEMO_PROJECT_ID: &str = "demo-project";

/// Seed one demo project with a few document versions and a share link per
/// seeded type. Returns the issued `(type, token)` pairs.
pub async fn seed_demo_data(
    projects: &dyn ProjectRepository,
    documents: &dyn DocumentRepository,
    links: &dyn ShareLinkRepository,
) -> Result<Vec<(DocumentType, String)>, AppError> {
    tracing::info!("Starting demo data seeding...");

    projects
        .upsert(Project {
            id: DEMO_PROJECT_ID.to_string(),
            business_name: "Sunrise Dental Clinic".to_string(),
            created_at: Utc::now(),
        })
        .await?;

    let demo_docs = [
        (
            DocumentType::PrivacyPolicy,
            1,
            "<h1>Privacy Policy</h1><p>Draft.</p>",
        ),
        (
            DocumentType::PrivacyPolicy,
            2,
            "<h1>Privacy Policy</h1><p>No mobile information will be shared with third parties or affiliates for marketing or promotional purposes.</p>",
        ),
        (
            DocumentType::TermsOfService,
            1,
            "<h1>SMS Terms</h1><p>Message frequency varies. Message and data rates may apply. Reply STOP to opt out, HELP for help.</p>",
        ),
    ];

    for (doc_type, version, content) in demo_docs {
        if let Some(existing) = documents.find_latest(DEMO_PROJECT_ID, doc_type).await? {
            if existing.version >= version {
                tracing::info!("Demo {} v{} already exists, skipping.", doc_type, version);
                continue;
            }
        }

        documents
            .insert_version(GeneratedDocument {
                id: uuid::Uuid::new_v4().to_string(),
                project_id: DEMO_PROJECT_ID.to_string(),
                doc_type,
                version,
                content: content.to_string(),
                created_at: Utc::now(),
            })
            .await?;
    }

    let mut issued = Vec::new();
    for doc_type in [DocumentType::PrivacyPolicy, DocumentType::TermsOfService] {
        let token = generate_token();
        links
            .create(ShareLink {
                token: token.clone(),
                project_id: DEMO_PROJECT_ID.to_string(),
                doc_type,
                created_at: Utc::now(),
            })
            .await?;
        tracing::info!("Demo share link for {}: /api/embed/{}", doc_type, token);
        issued.push((doc_type, token));
    }

    tracing::info!("Demo data seeding completed.");
    Ok(issued)
}
