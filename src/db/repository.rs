use async_trait::async_trait;

use crate::db::models::{DocumentType, GeneratedDocument};
use crate::error::AppError;

/// Repository trait for generated document versions.
///
/// This trait allows mocking the database layer in tests.
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Insert a new version. Versions are never updated in place.
    ///
    /// Returns `AppError::Conflict` if the `(project_id, type, version)`
    /// triple already exists.
    async fn insert_version(&self, doc: GeneratedDocument) -> Result<(), AppError>;

    /// Find the version with the highest `version` number for a project and type.
    async fn find_latest(
        &self,
        project_id: &str,
        doc_type: DocumentType,
    ) -> Result<Option<GeneratedDocument>, AppError>;
}

/// Whether a MongoDB error is a unique index violation.
#[cfg(feature = "ssr")]
pub(crate) fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    use mongodb::error::{ErrorKind, WriteFailure};

    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == 11000
    )
}

/// MongoDB implementation of the DocumentRepository.
///
/// This is only available when the `ssr` feature is enabled (i.e., server-side).
#[cfg(feature = "ssr")]
pub struct MongoDocumentRepository {
    collection: mongodb::Collection<GeneratedDocument>,
}

#[cfg(feature = "ssr")]
impl MongoDocumentRepository {
    pub fn new(db: &mongodb::Database) -> Self {
        Self {
            collection: db.collection("generated_documents"),
        }
    }

    /// Create the unique `(project_id, type, version)` index.
    ///
    /// Also serves the latest-version lookup, which sorts on `version`.
    pub async fn ensure_indexes(&self) -> Result<(), AppError> {
        use mongodb::bson::doc;
        use mongodb::options::IndexOptions;
        use mongodb::IndexModel;

        let index = IndexModel::builder()
            .keys(doc! { "project_id": 1, "type": 1, "version": -1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        self.collection
            .create_index(index)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}

#[cfg(feature = "ssr")]
#[async_trait]
impl DocumentRepository for MongoDocumentRepository {
    async fn insert_version(&self, doc: GeneratedDocument) -> Result<(), AppError> {
        self.collection.insert_one(&doc).await.map_err(|e| {
            if is_duplicate_key(&e) {
                AppError::Conflict(format!(
                    "Version {} of '{}' already exists for project '{}'",
                    doc.version, doc.doc_type, doc.project_id
                ))
            } else {
                AppError::Database(e.to_string())
            }
        })?;

        Ok(())
    }

    async fn find_latest(
        &self,
        project_id: &str,
        doc_type: DocumentType,
    ) -> Result<Option<GeneratedDocument>, AppError> {
        use mongodb::bson::doc;
        use mongodb::options::FindOneOptions;

        // Sorting server-side keeps the result independent of insertion order.
        let options = FindOneOptions::builder()
            .sort(doc! { "version": -1 })
            .build();

        self.collection
            .find_one(doc! { "project_id": project_id, "type": doc_type.as_str() })
            .with_options(options)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
