//! Design-context derivation.
//!
//! Builds the deep-link URL and selection metadata attached to records
//! logged from the plugin. The document identifier comes from an
//! ordered fallback chain: the live document snapshot first, then the
//! identifier cached from an earlier call. When neither yields one the
//! context degrades (generic URL, `file_key_found = false`) — this
//! derivation never fails the enclosing request.

use crate::env::HostEnv;
use crate::protocol::DesignContext;
use tracing::debug;

/// Storage key caching the last seen document identifier.
pub const KEY_LAST_FILE: &str = "debtrix_last_file_key";

const FALLBACK_URL: &str = "https://www.figma.com/files";
const UNKNOWN: &str = "Unknown";

/// Derives best-effort context for the open document.
pub async fn derive_design_context<E: HostEnv + ?Sized>(env: &E) -> DesignContext {
    let snapshot = env.document();

    let file_key = match snapshot.file_key.clone() {
        Some(key) => {
            env.storage_set(KEY_LAST_FILE, &key).await;
            Some(key)
        }
        None => {
            let cached = env.storage_get(KEY_LAST_FILE).await;
            if cached.is_some() {
                debug!("document identifier taken from cache");
            }
            cached
        }
    };

    let file_name = snapshot.file_name.unwrap_or_else(|| UNKNOWN.to_string());
    let page_name = snapshot.page_name.unwrap_or_else(|| UNKNOWN.to_string());

    let url = match &file_key {
        Some(key) => {
            let mut url = format!(
                "https://www.figma.com/file/{key}/{}",
                urlencoding::encode(&file_name)
            );
            if let Some(node) = snapshot.selection.first() {
                // Node ids use colons internally; the URL form wants dashes.
                let node_id = node.id.replace(':', "-");
                url.push_str("?node-id=");
                url.push_str(&urlencoding::encode(&node_id));
                url.push_str("&viewport=");
                url.push_str(&urlencoding::encode("0,0,1,1"));
            }
            url
        }
        None => FALLBACK_URL.to_string(),
    };

    DesignContext {
        url,
        page_name,
        file_name,
        selected_nodes: snapshot.selection.len(),
        selected_node_names: snapshot.selection.into_iter().map(|n| n.name).collect(),
        file_key_found: file_key.is_some(),
    }
}
