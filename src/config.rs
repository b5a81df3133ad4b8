use serde::Deserialize;

use crate::error::AppError;
use crate::rendering::footer::EmbedBranding;

/// Default configuration file name, looked up in the working directory.
const DEFAULT_CONFIG_FILE: &str = "a2p-docs";

/// Server settings.
///
/// Sources, lowest precedence first: built-in defaults, the optional
/// `a2p-docs.toml` file (or the file named by `A2P_DOCS_CONFIG`), then
/// environment variables (`MONGODB_URI`, `SERVICE_TOKEN`, ...).
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub mongodb_uri: String,
    pub mongodb_database: String,
    /// Shared secret for the publishing API.
    pub service_token: String,
    pub bind_addr: String,
    /// Base URL used when building share URLs and the footer link.
    pub public_base_url: String,
    /// Directory with static assets (the wasm loader bundle lives under `pkg/`).
    pub site_root: String,
    /// Use the in-memory store and seed demo data instead of MongoDB.
    pub demo_mode: bool,
    pub footer_brand: String,
}

impl Settings {
    /// Load settings from defaults, the config file and the environment.
    pub fn load() -> Result<Self, AppError> {
        let file = std::env::var("A2P_DOCS_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.into());

        let builder = Self::defaults()?
            .add_source(config::File::with_name(&file).required(false))
            .add_source(config::Environment::default().try_parsing(true));

        Self::build(builder)
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, AppError> {
        config::Config::builder()
            .set_default("mongodb_uri", "mongodb://localhost:27017")
            .and_then(|b| b.set_default("mongodb_database", "a2p_docs"))
            .and_then(|b| b.set_default("service_token", "dev-token"))
            .and_then(|b| b.set_default("bind_addr", "127.0.0.1:3000"))
            .and_then(|b| b.set_default("public_base_url", "http://localhost:3000"))
            .and_then(|b| b.set_default("site_root", "target/site"))
            .and_then(|b| b.set_default("demo_mode", false))
            .and_then(|b| b.set_default("footer_brand", "A2P Docs"))
            .map_err(|e| AppError::Config(e.to_string()))
    }

    fn build(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, AppError> {
        builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| AppError::Config(e.to_string()))
    }

    /// Footer branding derived from these settings.
    pub fn branding(&self) -> EmbedBranding {
        EmbedBranding {
            brand: self.footer_brand.clone(),
            url: self.public_base_url.clone(),
        }
    }
}
