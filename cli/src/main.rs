use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};

/// Publish compliance documents and manage share links on an A2P Docs server.
#[derive(Debug, Parser)]
#[command(name = "a2p-docs-sync", version)]
struct Cli {
    /// Base URL of the A2P Docs server.
    #[arg(long, env = "A2P_DOCS_URL", default_value = "http://localhost:3000")]
    server: String,

    /// Service token for the publishing API.
    #[arg(long, env = "SERVICE_TOKEN")]
    service_token: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create or rename a project.
    Project {
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        name: String,
    },
    /// Publish a rendered HTML file as the next version of a document.
    Publish {
        #[arg(long)]
        project: String,
        /// privacy_policy, terms_of_service or submission_language
        #[arg(long = "type")]
        doc_type: String,
        file: PathBuf,
    },
    /// Issue a new share link.
    Link {
        #[arg(long)]
        project: String,
        #[arg(long = "type")]
        doc_type: String,
    },
    /// Revoke a share link.
    Revoke { token: String },
}

/// Endpoint path and JSON body for a command.
fn build_request(command: &Command, service_token: &str) -> Result<(&'static str, Value)> {
    let request = match command {
        Command::Project { id, name } => (
            "/api/v1/projects",
            json!({ "service_token": service_token, "id": id, "business_name": name }),
        ),
        Command::Publish {
            project,
            doc_type,
            file,
        } => (
            "/api/v1/documents",
            json!({
                "service_token": service_token,
                "project_id": project,
                "type": doc_type,
                "content": read_content(file)?,
            }),
        ),
        Command::Link { project, doc_type } => (
            "/api/v1/share-links",
            json!({ "service_token": service_token, "project_id": project, "type": doc_type }),
        ),
        Command::Revoke { token } => (
            "/api/v1/share-links/revoke",
            json!({ "service_token": service_token, "token": token }),
        ),
    };
    Ok(request)
}

fn read_content(path: &Path) -> Result<String> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    if content.trim().is_empty() {
        bail!("{} is empty", path.display());
    }
    Ok(content)
}

fn endpoint_url(server: &str, path: &str) -> String {
    format!("{}{}", server.trim_end_matches('/'), path)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let (path, body) = build_request(&cli.command, &cli.service_token)?;
    let url = endpoint_url(&cli.server, path);

    let response = reqwest::Client::new()
        .post(&url)
        .json(&body)
        .send()
        .await
        .with_context(|| format!("Request to {} failed", url))?;

    let status = response.status();
    let text = response.text().await.context("Failed to read response")?;

    if !status.is_success() {
        let message = serde_json::from_str::<Value>(&text)
            .ok()
            .and_then(|v| v["error"].as_str().map(String::from))
            .unwrap_or(text);
        bail!("Server returned {}: {}", status, message);
    }

    if text.is_empty() {
        println!("OK ({})", status);
    } else {
        let value: Value = serde_json::from_str(&text).context("Invalid JSON response")?;
        println!("{}", serde_json::to_string_pretty(&value)?);
    }

    Ok(())
}
