use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The kinds of compliance documents a project can publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    PrivacyPolicy,
    TermsOfService,
    SubmissionLanguage,
}

impl DocumentType {
    pub const ALL: [DocumentType; 3] = [
        DocumentType::PrivacyPolicy,
        DocumentType::TermsOfService,
        DocumentType::SubmissionLanguage,
    ];

    /// Storage and wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::PrivacyPolicy => "privacy_policy",
            DocumentType::TermsOfService => "terms_of_service",
            DocumentType::SubmissionLanguage => "submission_language",
        }
    }

    /// Parse a document type (case-insensitive, `-` and `_` interchangeable).
    pub fn from_str_ci(s: &str) -> Option<Self> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A public, token-keyed grant to one document type of one project.
///
/// Stored in the `share_links` collection. Never mutated; revocation deletes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareLink {
    /// Opaque URL-safe token handed out in embed snippets.
    pub token: String,
    pub project_id: String,
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    pub created_at: DateTime<Utc>,
}

/// One immutable version of a rendered document.
///
/// Stored in the `generated_documents` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedDocument {
    pub id: String,
    pub project_id: String,
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    /// Strictly increasing per `(project_id, type)`, starting at 1.
    pub version: i64,
    /// Rendered HTML.
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A customer project (one registered business).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub business_name: String,
    pub created_at: DateTime<Utc>,
}

/// The document part of a shared document response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentPayload {
    pub content: String,
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    pub version: i64,
    pub created_at: DateTime<Utc>,
}

impl From<GeneratedDocument> for DocumentPayload {
    fn from(doc: GeneratedDocument) -> Self {
        Self {
            content: doc.content,
            doc_type: doc.doc_type,
            version: doc.version,
            created_at: doc.created_at,
        }
    }
}

/// Response of `GET /api/doc/{token}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedDocumentResponse {
    pub document: DocumentPayload,
    pub project_name: String,
}

/// Response of `GET /api/embed/{token}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedResponse {
    /// Self-contained fragment, footer included, ready to inject.
    pub html: String,
}

/// Request payload to create or rename a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertProjectRequest {
    pub service_token: String,
    /// Generated when omitted.
    #[serde(default)]
    pub id: Option<String>,
    pub business_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectResponse {
    pub id: String,
    pub business_name: String,
}

/// Request payload to publish a new document version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishRequest {
    pub service_token: String,
    pub project_id: String,
    /// Document type as a string, parsed with [`DocumentType::from_str_ci`].
    #[serde(rename = "type")]
    pub doc_type: String,
    /// Rendered HTML.
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishResponse {
    pub message: String,
    pub project_id: String,
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    pub version: i64,
}

/// Request payload to issue a share link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueLinkRequest {
    pub service_token: String,
    pub project_id: String,
    #[serde(rename = "type")]
    pub doc_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueLinkResponse {
    pub token: String,
    pub embed_url: String,
    pub doc_url: String,
}

/// Request payload to revoke a share link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevokeLinkRequest {
    pub service_token: String,
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_type_parsing() {
        assert_eq!(
            DocumentType::from_str_ci("privacy_policy"),
            Some(DocumentType::PrivacyPolicy)
        );
        assert_eq!(
            DocumentType::from_str_ci("Terms-Of-Service"),
            Some(DocumentType::TermsOfService)
        );
        assert_eq!(
            DocumentType::from_str_ci(" SUBMISSION_LANGUAGE "),
            Some(DocumentType::SubmissionLanguage)
        );
        assert_eq!(DocumentType::from_str_ci("cookie_policy"), None);
        assert_eq!(DocumentType::from_str_ci(""), None);
    }

    #[test]
    fn test_document_type_wire_format_matches_as_str() {
        for t in DocumentType::ALL {
            let json = serde_json::to_value(t).unwrap();
            assert_eq!(json.as_str(), Some(t.as_str()));
            assert_eq!(t.to_string(), t.as_str());
        }
    }

    #[test]
    fn test_shared_document_response_shape() {
        let resp = SharedDocumentResponse {
            document: DocumentPayload {
                content: "<h1>Privacy</h1>".to_string(),
                doc_type: DocumentType::PrivacyPolicy,
                version: 3,
                created_at: "2024-05-01T12:00:00Z".parse().unwrap(),
            },
            project_name: "Acme Dental".to_string(),
        };

        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["projectName"], "Acme Dental");
        assert_eq!(json["document"]["type"], "privacy_policy");
        assert_eq!(json["document"]["version"], 3);
        assert_eq!(json["document"]["content"], "<h1>Privacy</h1>");
        assert!(json["document"]["created_at"].is_string());
        assert!(json["document"].get("project_id").is_none());
    }

    #[test]
    fn test_share_link_uses_type_field() {
        let json = r#"{
            "token": "abc",
            "project_id": "p-1",
            "type": "terms_of_service",
            "created_at": "2024-01-01T00:00:00Z"
        }"#;

        let link: ShareLink = serde_json::from_str(json).unwrap();
        assert_eq!(link.doc_type, DocumentType::TermsOfService);
        assert_eq!(link.project_id, "p-1");
    }

    #[test]
    fn test_upsert_project_request_optional_id() {
        let json = r#"{ "service_token": "tok", "business_name": "Acme" }"#;
        let req: UpsertProjectRequest = serde_json::from_str(json).unwrap();
        assert!(req.id.is_none());
        assert_eq!(req.business_name, "Acme");
    }
}
