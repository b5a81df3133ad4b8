//! Browser host for the embed loader (wasm, `hydrate` feature).

use async_trait::async_trait;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element};

use super::loader::{mount, EmbedHost, FetchResponse, LoaderError, ScriptConfig};

/// `EmbedHost` backed by the live DOM and `fetch`.
pub struct WebHost {
    document: Document,
    /// Element the container is inserted before (normally the loader's script tag).
    anchor: Option<Element>,
}

impl WebHost {
    pub fn new(document: Document, anchor: Option<Element>) -> Self {
        Self { document, anchor }
    }
}

fn js_error(value: JsValue) -> LoaderError {
    LoaderError::Dom(value.as_string().unwrap_or_else(|| format!("{value:?}")))
}

#[async_trait(?Send)]
impl EmbedHost for WebHost {
    type Container = Element;

    fn find_container(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn create_container(&self, id: &str) -> Result<Element, LoaderError> {
        let container = self.document.create_element("div").map_err(js_error)?;
        container.set_id(id);

        match self.anchor.as_ref().and_then(|a| a.parent_node().map(|p| (a, p))) {
            Some((anchor, parent)) => {
                let anchor: &web_sys::Node = anchor;
                parent
                    .insert_before(&container, Some(anchor))
                    .map_err(js_error)?;
            }
            None => {
                let body = self
                    .document
                    .body()
                    .ok_or_else(|| LoaderError::Dom("document has no body".into()))?;
                body.append_child(&container).map_err(js_error)?;
            }
        }

        Ok(container)
    }

    fn set_content(&self, container: &Element, html: &str) {
        container.set_inner_html(html);
    }

    async fn fetch(&self, url: &str) -> Result<FetchResponse, LoaderError> {
        let response = gloo_net::http::Request::get(url)
            .send()
            .await
            .map_err(|e| LoaderError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| LoaderError::Network(e.to_string()))?;

        Ok(FetchResponse { status, body })
    }

    fn log_diagnostic(&self, message: &str) {
        web_sys::console::error_1(&JsValue::from_str(message));
    }
}

fn current_document() -> Option<Document> {
    web_sys::window().and_then(|w| w.document())
}

/// Mount a document by token into a container appended to `<body>` (or an
/// existing `a2p-doc-{token}` element). An empty `api_base` means same origin.
#[wasm_bindgen]
pub async fn mount_embed(token: String, api_base: Option<String>) {
    console_error_panic_hook::set_once();

    let Some(document) = current_document() else {
        return;
    };
    let host = WebHost::new(document, None);
    mount(&host, api_base.as_deref().unwrap_or(""), Some(token.as_str())).await;
}

/// Mount the document named by the `data-token` attribute of the element
/// with id `script_id`. The container is inserted right before that element.
///
/// Requests go to `api_base` when given, else to the element's
/// `data-api-base`, else to the origin of its `src`.
#[wasm_bindgen]
pub async fn mount_from_script(script_id: String, api_base: Option<String>) {
    console_error_panic_hook::set_once();

    let Some(document) = current_document() else {
        return;
    };

    let script = document.get_element_by_id(&script_id);
    let src = script
        .as_ref()
        .and_then(|s| s.dyn_ref::<web_sys::HtmlScriptElement>())
        .map(|s| s.src())
        .unwrap_or_default();
    let config = ScriptConfig::read(
        |name| script.as_ref().and_then(|s| s.get_attribute(name)),
        &src,
        api_base.as_deref(),
    );

    let host = WebHost::new(document, script);
    mount(&host, &config.api_base, config.token.as_deref()).await;
}
