//! Host-independent embed loader.
//!
//! The loader mounts one container per token, shows a loading placeholder,
//! issues a single request to the embed endpoint and replaces the container
//! content with the returned fragment or with an error placeholder. DOM and
//! network access go through [`EmbedHost`] so the flow runs unchanged in the
//! browser and in native tests.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

/// Prefix of the container element id; the token is appended verbatim.
pub const CONTAINER_ID_PREFIX: &str = "a2p-doc-";

pub const LOADING_HTML: &str =
    "<p class=\"a2p-embed-loading\" style=\"color:#9ca3af;font-style:italic\">Loading document...</p>";

pub const ERROR_HTML: &str =
    "<p class=\"a2p-embed-error\" style=\"color:#b91c1c;border:1px solid #fca5a5;padding:0.5em\">This document could not be loaded.</p>";

/// Everything that can end a mount attempt early.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoaderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("embed endpoint answered with status {0}")]
    Status(u16),

    #[error("malformed embed response: {0}")]
    MalformedBody(String),

    #[error("embed response has no html")]
    EmptyHtml,

    #[error("DOM error: {0}")]
    Dom(String),
}

/// Raw HTTP response as seen by the loader.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

/// Final state of a mount attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountOutcome {
    /// No token: nothing was touched and no request was sent.
    MissingToken,
    /// The container holds the fragment returned by the endpoint.
    Rendered,
    /// The container holds [`ERROR_HTML`] (or could not be created).
    Failed(LoaderError),
}

/// DOM and network capabilities the loader needs from its environment.
#[async_trait(?Send)]
pub trait EmbedHost {
    type Container;

    /// Look up an existing element by id.
    fn find_container(&self, id: &str) -> Option<Self::Container>;

    /// Create a container with `id` immediately before the loader's anchor element.
    fn create_container(&self, id: &str) -> Result<Self::Container, LoaderError>;

    /// Replace the container's content with `html`.
    fn set_content(&self, container: &Self::Container, html: &str);

    /// Issue a GET request.
    async fn fetch(&self, url: &str) -> Result<FetchResponse, LoaderError>;

    /// Emit a diagnostic for the page's developer.
    fn log_diagnostic(&self, message: &str);
}

#[derive(Deserialize)]
struct EmbedBody {
    #[serde(default)]
    html: Option<String>,
}

/// Deterministic container id for a token.
pub fn container_id(token: &str) -> String {
    format!("{CONTAINER_ID_PREFIX}{token}")
}

/// Embed endpoint URL for a token, relative to `api_base` (empty = same origin).
pub fn embed_url(api_base: &str, token: &str) -> String {
    format!(
        "{}/api/embed/{}",
        api_base.trim_end_matches('/'),
        urlencoding::encode(token)
    )
}

/// Origin of an absolute script URL. Inline scripts (empty `src`) and
/// relative URLs have none.
pub fn script_origin(src: &str) -> Option<String> {
    url::Url::parse(src)
        .ok()
        .filter(|u| u.has_host())
        .map(|u| u.origin().ascii_serialization())
}

/// Server the loader talks to.
///
/// An explicit base wins, then the anchor's `data-api-base` attribute, then
/// the origin of the anchor's `src`. With none of them the page's own origin
/// is used (empty base).
pub fn resolve_api_base(explicit: Option<&str>, data_api_base: Option<&str>, script_src: &str) -> String {
    let given = |value: Option<&str>| {
        value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    given(explicit)
        .or_else(|| given(data_api_base))
        .or_else(|| script_origin(script_src))
        .unwrap_or_default()
}

/// What the loader's anchor element asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptConfig {
    pub token: Option<String>,
    pub api_base: String,
}

impl ScriptConfig {
    /// Read `data-token` and the API base through `attribute`. A missing
    /// anchor element is an `attribute` that always answers `None`.
    pub fn read(
        attribute: impl Fn(&str) -> Option<String>,
        script_src: &str,
        explicit_api_base: Option<&str>,
    ) -> Self {
        let data_api_base = attribute("data-api-base");
        Self {
            token: attribute("data-token"),
            api_base: resolve_api_base(explicit_api_base, data_api_base.as_deref(), script_src),
        }
    }
}

/// Turn a raw response into the fragment to inject.
pub fn extract_html(response: &FetchResponse) -> Result<String, LoaderError> {
    if !(200..300).contains(&response.status) {
        return Err(LoaderError::Status(response.status));
    }

    let body: EmbedBody = serde_json::from_str(&response.body)
        .map_err(|e| LoaderError::MalformedBody(e.to_string()))?;

    match body.html {
        Some(html) if !html.is_empty() => Ok(html),
        _ => Err(LoaderError::EmptyHtml),
    }
}

/// Mount the document for `token` into the host page.
///
/// Never panics: every failure path ends with the container showing
/// [`ERROR_HTML`] (when one exists) and a diagnostic being logged.
pub async fn mount<H: EmbedHost>(host: &H, api_base: &str, token: Option<&str>) -> MountOutcome {
    let token = match token {
        Some(token) if !token.trim().is_empty() => token,
        _ => {
            host.log_diagnostic("a2p-docs embed: missing data-token, nothing to load");
            return MountOutcome::MissingToken;
        }
    };

    let id = container_id(token);
    let container = match host.find_container(&id) {
        Some(existing) => existing,
        None => match host.create_container(&id) {
            Ok(created) => created,
            Err(e) => {
                host.log_diagnostic(&format!("a2p-docs embed: {e}"));
                return MountOutcome::Failed(e);
            }
        },
    };

    host.set_content(&container, LOADING_HTML);

    let result = match host.fetch(&embed_url(api_base, token)).await {
        Ok(response) => extract_html(&response),
        Err(e) => Err(e),
    };

    match result {
        Ok(html) => {
            host.set_content(&container, &html);
            MountOutcome::Rendered
        }
        Err(e) => {
            host.log_diagnostic(&format!("a2p-docs embed: {e}"));
            host.set_content(&container, ERROR_HTML);
            MountOutcome::Failed(e)
        }
    }
}
