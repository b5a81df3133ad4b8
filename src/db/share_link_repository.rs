use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use sha2::{Digest, Sha256};

use crate::db::models::ShareLink;
use crate::error::AppError;

/// Number of random bytes behind every share token.
const TOKEN_BYTES: usize = 32;

/// Generate an unguessable, URL-safe share token.
pub fn generate_token() -> String {
    let bytes: [u8; TOKEN_BYTES] = rand::random();
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Short, non-reversible token identifier for log lines.
pub fn token_fingerprint(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    digest.iter().take(4).map(|b| format!("{b:02x}")).collect()
}

/// Repository trait for share links.
#[async_trait]
pub trait ShareLinkRepository: Send + Sync {
    /// Insert a new link. Fails with `AppError::Conflict` if the token is taken.
    async fn create(&self, link: ShareLink) -> Result<(), AppError>;

    /// Exact-match lookup by token.
    async fn find_by_token(&self, token: &str) -> Result<Option<ShareLink>, AppError>;

    /// Delete a link. Returns `false` if no link had this token.
    async fn delete_by_token(&self, token: &str) -> Result<bool, AppError>;
}

/// MongoDB implementation of the ShareLinkRepository.
#[cfg(feature = "ssr")]
pub struct MongoShareLinkRepository {
    collection: mongodb::Collection<ShareLink>,
}

#[cfg(feature = "ssr")]
impl MongoShareLinkRepository {
    pub fn new(db: &mongodb::Database) -> Self {
        Self {
            collection: db.collection("share_links"),
        }
    }

    /// Create the unique index on `token`.
    pub async fn ensure_indexes(&self) -> Result<(), AppError> {
        use mongodb::bson::doc;
        use mongodb::options::IndexOptions;
        use mongodb::IndexModel;

        let index = IndexModel::builder()
            .keys(doc! { "token": 1 })
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
impl ShareLinkRepository for MongoShareLinkRepository {
    async fn create(&self, link: ShareLink) -> Result<(), AppError> {
        self.collection.insert_one(&link).await.map_err(|e| {
            if crate::db::repository::is_duplicate_key(&e) {
                AppError::Conflict("Share token already issued".into())
            } else {
                AppError::Database(e.to_string())
            }
        })?;

        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<ShareLink>, AppError> {
        use mongodb::bson::doc;

        self.collection
            .find_one(doc! { "token": token })
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn delete_by_token(&self, token: &str) -> Result<bool, AppError> {
        use mongodb::bson::doc;

        let result = self
            .collection
            .delete_one(doc! { "token": token })
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.deleted_count > 0)
    }
}
