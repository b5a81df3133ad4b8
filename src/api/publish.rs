use chrono::Utc;

use crate::db::models::{
    DocumentType, GeneratedDocument, IssueLinkRequest, IssueLinkResponse, Project,
    ProjectResponse, PublishRequest, PublishResponse, RevokeLinkRequest, ShareLink,
    UpsertProjectRequest,
};
use crate::db::project_repository::ProjectRepository;
use crate::db::repository::DocumentRepository;
use crate::db::share_link_repository::{generate_token, token_fingerprint, ShareLinkRepository};
use crate::error::AppError;

use super::share::LINK_NOT_FOUND;

fn check_service_token(provided: &str, expected: &str) -> Result<(), AppError> {
    if provided != expected {
        return Err(AppError::Auth("Invalid service token".into()));
    }
    Ok(())
}

fn parse_doc_type(raw: &str) -> Result<DocumentType, AppError> {
    DocumentType::from_str_ci(raw).ok_or_else(|| {
        AppError::BadRequest(format!(
            "Invalid document type '{}'. Expected: {}",
            raw,
            DocumentType::ALL
                .iter()
                .map(|t| t.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ))
    })
}

async fn require_project(
    projects: &dyn ProjectRepository,
    project_id: &str,
) -> Result<Project, AppError> {
    projects
        .find_by_id(project_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Project '{}' not found", project_id)))
}

/// Create a project or rename an existing one.
pub async fn process_upsert_project(
    projects: &dyn ProjectRepository,
    request: UpsertProjectRequest,
    expected_token: &str,
) -> Result<ProjectResponse, AppError> {
    check_service_token(&request.service_token, expected_token)?;

    let business_name = request.business_name.trim().to_string();
    if business_name.is_empty() {
        return Err(AppError::BadRequest("Business name cannot be empty".into()));
    }

    let id = match request.id {
        Some(id) if !id.trim().is_empty() => id.trim().to_string(),
        _ => uuid::Uuid::new_v4().to_string(),
    };

    // Keep the original creation time on rename
    let created_at = projects
        .find_by_id(&id)
        .await?
        .map(|p| p.created_at)
        .unwrap_or_else(Utc::now);

    projects
        .upsert(Project {
            id: id.clone(),
            business_name: business_name.clone(),
            created_at,
        })
        .await?;

    tracing::info!(project_id = %id, "project saved");

    Ok(ProjectResponse { id, business_name })
}

/// Publish a new version of a document.
///
/// The version number is one above the current latest (1 for the first
/// publish). Two publishers racing for the same number get a conflict from
/// the repository rather than overwriting each other.
pub async fn process_publish(
    projects: &dyn ProjectRepository,
    documents: &dyn DocumentRepository,
    request: PublishRequest,
    expected_token: &str,
) -> Result<PublishResponse, AppError> {
    check_service_token(&request.service_token, expected_token)?;

    let doc_type = parse_doc_type(&request.doc_type)?;

    if request.content.trim().is_empty() {
        return Err(AppError::BadRequest("Content cannot be empty".into()));
    }

    require_project(projects, &request.project_id).await?;

    let version = documents
        .find_latest(&request.project_id, doc_type)
        .await?
        .map(|d| d.version + 1)
        .unwrap_or(1);

    documents
        .insert_version(GeneratedDocument {
            id: uuid::Uuid::new_v4().to_string(),
            project_id: request.project_id.clone(),
            doc_type,
            version,
            content: request.content,
            created_at: Utc::now(),
        })
        .await?;

    tracing::info!(
        project_id = %request.project_id,
        doc_type = %doc_type,
        version,
        "document version published"
    );

    Ok(PublishResponse {
        message: "Document version published".to_string(),
        project_id: request.project_id,
        doc_type,
        version,
    })
}

/// Issue a fresh share link for a project's document type.
pub async fn process_issue_link(
    projects: &dyn ProjectRepository,
    links: &dyn ShareLinkRepository,
    request: IssueLinkRequest,
    expected_token: &str,
    public_base_url: &str,
) -> Result<IssueLinkResponse, AppError> {
    check_service_token(&request.service_token, expected_token)?;

    let doc_type = parse_doc_type(&request.doc_type)?;
    require_project(projects, &request.project_id).await?;

    let token = generate_token();
    links
        .create(ShareLink {
            token: token.clone(),
            project_id: request.project_id.clone(),
            doc_type,
            created_at: Utc::now(),
        })
        .await?;

    tracing::info!(
        project_id = %request.project_id,
        doc_type = %doc_type,
        token = %token_fingerprint(&token),
        "share link issued"
    );

    let base = public_base_url.trim_end_matches('/');
    Ok(IssueLinkResponse {
        embed_url: format!("{}/api/embed/{}", base, token),
        doc_url: format!("{}/api/doc/{}", base, token),
        token,
    })
}

/// Revoke a share link. Afterwards the token is indistinguishable from one
/// that was never issued.
pub async fn process_revoke_link(
    links: &dyn ShareLinkRepository,
    request: RevokeLinkRequest,
    expected_token: &str,
) -> Result<(), AppError> {
    check_service_token(&request.service_token, expected_token)?;

    if !links.delete_by_token(&request.token).await? {
        return Err(AppError::NotFound(LINK_NOT_FOUND.into()));
    }

    tracing::info!(token = %token_fingerprint(&request.token), "share link revoked");
    Ok(())
}

/// Axum handler for `POST /api/v1/projects`.
#[cfg(feature = "ssr")]
pub async fn upsert_project_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
    request: Result<axum::Json<UpsertProjectRequest>, axum::extract::rejection::JsonRejection>,
) -> Result<axum::Json<ProjectResponse>, AppError> {
    let axum::Json(request) = request?;
    let response =
        process_upsert_project(state.projects.as_ref(), request, &state.service_token).await?;

    Ok(axum::Json(response))
}

/// Axum handler for `POST /api/v1/documents`.
#[cfg(feature = "ssr")]
pub async fn publish_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
    request: Result<axum::Json<PublishRequest>, axum::extract::rejection::JsonRejection>,
) -> Result<axum::Json<PublishResponse>, AppError> {
    let axum::Json(request) = request?;
    let response = process_publish(
        state.projects.as_ref(),
        state.documents.as_ref(),
        request,
        &state.service_token,
    )
    .await?;

    Ok(axum::Json(response))
}

/// Axum handler for `POST /api/v1/share-links`.
#[cfg(feature = "ssr")]
pub async fn issue_link_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
    request: Result<axum::Json<IssueLinkRequest>, axum::extract::rejection::JsonRejection>,
) -> Result<axum::Json<IssueLinkResponse>, AppError> {
    let axum::Json(request) = request?;
    let response = process_issue_link(
        state.projects.as_ref(),
        state.share_links.as_ref(),
        request,
        &state.service_token,
        &state.public_base_url,
    )
    .await?;

    Ok(axum::Json(response))
}

/// Axum handler for `POST /api/v1/share-links/revoke`.
#[cfg(feature = "ssr")]
pub async fn revoke_link_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
    request: Result<axum::Json<RevokeLinkRequest>, axum::extract::rejection::JsonRejection>,
) -> Result<axum::http::StatusCode, AppError> {
    let axum::Json(request) = request?;
    process_revoke_link(state.share_links.as_ref(), request, &state.service_token).await?;

    Ok(axum::http::StatusCode::NO_CONTENT)
}
