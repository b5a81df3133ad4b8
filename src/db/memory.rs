use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::db::models::{DocumentType, GeneratedDocument, Project, ShareLink};
use crate::db::project_repository::ProjectRepository;
use crate::db::repository::DocumentRepository;
use crate::db::share_link_repository::ShareLinkRepository;
use crate::error::AppError;

/// In-process store implementing every repository trait.
///
/// Backs demo mode and the HTTP integration tests. Enforces the same
/// uniqueness rules as the MongoDB indexes.
#[derive(Default)]
pub struct InMemoryStore {
    projects: RwLock<HashMap<String, Project>>,
    links: RwLock<HashMap<String, ShareLink>>,
    documents: RwLock<Vec<GeneratedDocument>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> AppError {
    AppError::Internal("in-memory store lock poisoned".into())
}

#[async_trait]
impl ProjectRepository for InMemoryStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<Project>, AppError> {
        Ok(self.projects.read().map_err(poisoned)?.get(id).cloned())
    }

    async fn upsert(&self, project: Project) -> Result<(), AppError> {
        self.projects
            .write()
            .map_err(poisoned)?
            .insert(project.id.clone(), project);
        Ok(())
    }
}

#[async_trait]
impl ShareLinkRepository for InMemoryStore {
    async fn create(&self, link: ShareLink) -> Result<(), AppError> {
        let mut links = self.links.write().map_err(poisoned)?;
        if links.contains_key(&link.token) {
            return Err(AppError::Conflict("Share token already issued".into()));
        }
        links.insert(link.token.clone(), link);
        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<ShareLink>, AppError> {
        Ok(self.links.read().map_err(poisoned)?.get(token).cloned())
    }

    async fn delete_by_token(&self, token: &str) -> Result<bool, AppError> {
        Ok(self.links.write().map_err(poisoned)?.remove(token).is_some())
    }
}

#[async_trait]
impl DocumentRepository for InMemoryStore {
    async fn insert_version(&self, doc: GeneratedDocument) -> Result<(), AppError> {
        let mut documents = self.documents.write().map_err(poisoned)?;
        let taken = documents.iter().any(|d| {
            d.project_id == doc.project_id && d.doc_type == doc.doc_type && d.version == doc.version
        });
        if taken {
            return Err(AppError::Conflict(format!(
                "Version {} of '{}' already exists for project '{}'",
                doc.version, doc.doc_type, doc.project_id
            )));
        }
        documents.push(doc);
        Ok(())
    }

    async fn find_latest(
        &self,
        project_id: &str,
        doc_type: DocumentType,
    ) -> Result<Option<GeneratedDocument>, AppError> {
        Ok(self
            .documents
            .read()
            .map_err(poisoned)?
            .iter()
            .filter(|d| d.project_id == project_id && d.doc_type == doc_type)
            .max_by_key(|d| d.version)
            .cloned())
    }
}
