use serde::{Deserialize, Serialize};

/// Attribution shown under every embedded document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedBranding {
    /// Product name shown in the footer link.
    pub brand: String,
    /// Public URL the footer links to.
    pub url: String,
}

impl Default for EmbedBranding {
    fn default() -> Self {
        Self {
            brand: "A2P Docs".to_string(),
            url: "http://localhost:3000".to_string(),
        }
    }
}

/// Escape untrusted text so markup shows up literally.
fn plain_text(raw: &str) -> String {
    ammonia::clean_text(raw)
}

/// Render the attribution footer block.
///
/// `project_name` and the brand are escaped as text; an empty project
/// name drops the "Prepared for" line. An unparsable branding URL renders
/// the brand without a link.
pub fn render_footer(project_name: &str, branding: &EmbedBranding) -> String {
    let mut footer = String::from(
        "<div class=\"a2p-embed-footer\" style=\"margin-top:2em;font-size:0.8em;color:#6b7280\">",
    );

    let name = project_name.trim();
    if !name.is_empty() {
        footer.push_str(&format!("<p>Prepared for {}.</p>", plain_text(name)));
    }

    let brand = plain_text(&branding.brand);
    match url::Url::parse(&branding.url) {
        Ok(url) => footer.push_str(&format!(
            "<p>Compliance documents by <a href=\"{}\" target=\"_blank\" rel=\"noopener\">{}</a></p>",
            url, brand
        )),
        Err(_) => footer.push_str(&format!("<p>Compliance documents by {}</p>", brand)),
    }
    footer.push_str("</div>");
    footer
}

/// Assemble the self-contained fragment served to the embed loader.
///
/// Document content is already rendered HTML and is passed through as-is.
pub fn render_embed_html(content: &str, project_name: &str, branding: &EmbedBranding) -> String {
    format!("{}\n{}", content, render_footer(project_name, branding))
}
