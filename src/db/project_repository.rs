use async_trait::async_trait;

use crate::db::models::Project;
use crate::error::AppError;

/// Repository trait for projects.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Find a project by its identifier.
    async fn find_by_id(&self, id: &str) -> Result<Option<Project>, AppError>;

    /// Create a project or replace an existing one (matched by id).
    async fn upsert(&self, project: Project) -> Result<(), AppError>;
}

/// MongoDB implementation of the ProjectRepository.
#[cfg(feature = "ssr")]
pub struct MongoProjectRepository {
    collection: mongodb::Collection<Project>,
}

#[cfg(feature = "ssr")]
impl MongoProjectRepository {
    pub fn new(db: &mongodb::Database) -> Self {
        Self {
            collection: db.collection("projects"),
        }
    }
}

#[cfg(feature = "ssr")]
#[async_trait]
impl ProjectRepository for MongoProjectRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<Project>, AppError> {
        use mongodb::bson::doc;

        self.collection
            .find_one(doc! { "id": id })
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn upsert(&self, project: Project) -> Result<(), AppError> {
        use mongodb::bson::doc;
        use mongodb::options::ReplaceOptions;

        let filter = doc! { "id": &project.id };
        let options = ReplaceOptions::builder().upsert(true).build();

        self.collection
            .replace_one(filter, &project)
            .with_options(options)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}
