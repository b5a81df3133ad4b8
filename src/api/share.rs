use crate::db::models::{EmbedResponse, SharedDocumentResponse};
use crate::db::project_repository::ProjectRepository;
use crate::db::repository::DocumentRepository;
use crate::db::share_link_repository::{token_fingerprint, ShareLinkRepository};
use crate::error::AppError;
use crate::rendering::footer::{render_embed_html, EmbedBranding};

/// Body of the 404 for unknown and revoked tokens alike.
pub const LINK_NOT_FOUND: &str = "Link not found";
pub const DOCUMENT_NOT_FOUND: &str = "Document not found";

/// Core share-link resolution, separated from the HTTP layer for testability.
///
/// Resolves the token, then loads the project's display name and the latest
/// document version concurrently. A missing project (or a failed project
/// lookup) yields an empty display name.
pub async fn resolve_shared_document(
    links: &dyn ShareLinkRepository,
    projects: &dyn ProjectRepository,
    documents: &dyn DocumentRepository,
    token: &str,
) -> Result<SharedDocumentResponse, AppError> {
    let fingerprint = token_fingerprint(token);

    let link = links
        .find_by_token(token)
        .await?
        .ok_or_else(|| {
            tracing::debug!(token = %fingerprint, "share link not found");
            AppError::NotFound(LINK_NOT_FOUND.into())
        })?;

    let (project, document) = futures::join!(
        projects.find_by_id(&link.project_id),
        documents.find_latest(&link.project_id, link.doc_type),
    );

    let project_name = match project {
        Ok(Some(project)) => project.business_name,
        Ok(None) => String::new(),
        Err(e) => {
            tracing::warn!(
                token = %fingerprint,
                project_id = %link.project_id,
                "project lookup failed, serving without display name: {e}"
            );
            String::new()
        }
    };

    let document = document?.ok_or_else(|| {
        tracing::debug!(token = %fingerprint, doc_type = %link.doc_type, "no document version published");
        AppError::NotFound(DOCUMENT_NOT_FOUND.into())
    })?;

    Ok(SharedDocumentResponse {
        document: document.into(),
        project_name,
    })
}

/// Resolve a token into the pre-rendered fragment the embed loader injects.
pub async fn render_shared_embed(
    links: &dyn ShareLinkRepository,
    projects: &dyn ProjectRepository,
    documents: &dyn DocumentRepository,
    branding: &EmbedBranding,
    token: &str,
) -> Result<EmbedResponse, AppError> {
    let shared = resolve_shared_document(links, projects, documents, token).await?;

    Ok(EmbedResponse {
        html: render_embed_html(&shared.document.content, &shared.project_name, branding),
    })
}

/// A token segment that cannot be decoded can never match a link, so it gets
/// the same 404 as an unknown token.
#[cfg(feature = "ssr")]
fn token_from_path(
    token: Result<axum::extract::Path<String>, axum::extract::rejection::PathRejection>,
) -> Result<String, AppError> {
    match token {
        Ok(axum::extract::Path(token)) => Ok(token),
        Err(rejection) => {
            tracing::debug!("undecodable share token: {}", rejection.body_text());
            Err(AppError::NotFound(LINK_NOT_FOUND.into()))
        }
    }
}

/// Axum handler for `GET /api/doc/{token}`.
///
/// Only available when the `ssr` feature is enabled.
#[cfg(feature = "ssr")]
pub async fn doc_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
    token: Result<axum::extract::Path<String>, axum::extract::rejection::PathRejection>,
) -> Result<axum::Json<SharedDocumentResponse>, AppError> {
    let token = token_from_path(token)?;
    let response = resolve_shared_document(
        state.share_links.as_ref(),
        state.projects.as_ref(),
        state.documents.as_ref(),
        &token,
    )
    .await?;

    Ok(axum::Json(response))
}

/// Axum handler for `GET /api/embed/{token}`.
#[cfg(feature = "ssr")]
pub async fn embed_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
    token: Result<axum::extract::Path<String>, axum::extract::rejection::PathRejection>,
) -> Result<axum::Json<EmbedResponse>, AppError> {
    let token = token_from_path(token)?;
    let response = render_shared_embed(
        state.share_links.as_ref(),
        state.projects.as_ref(),
        state.documents.as_ref(),
        &state.branding,
        &token,
    )
    .await?;

    Ok(axum::Json(response))
}
