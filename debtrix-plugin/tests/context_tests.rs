use debtrix_plugin::context::KEY_LAST_FILE;
use debtrix_plugin::{derive_design_context, DocumentSnapshot, HostEnv, MemoryEnv, NodeRef};
use pretty_assertions::assert_eq;

fn snapshot(file_key: Option<&str>) -> DocumentSnapshot {
    DocumentSnapshot {
        file_key: file_key.map(str::to_string),
        file_name: Some("Checkout Flow".to_string()),
        page_name: Some("Page 1".to_string()),
        selection: Vec::new(),
    }
}

#[tokio::test]
async fn empty_environment_degrades_instead_of_failing() {
    let env = MemoryEnv::new();

    let context = derive_design_context(&env).await;

    assert!(!context.file_key_found);
    assert_eq!(context.url, "https://www.figma.com/files");
    assert_eq!(context.file_name, "Unknown");
    assert_eq!(context.page_name, "Unknown");
    assert_eq!(context.selected_nodes, 0);
    assert!(context.selected_node_names.is_empty());
}

#[tokio::test]
async fn live_file_key_builds_a_deep_link_and_caches() {
    let env = MemoryEnv::new().with_document(snapshot(Some("abc123")));

    let context = derive_design_context(&env).await;

    assert!(context.file_key_found);
    assert_eq!(
        context.url,
        "https://www.figma.com/file/abc123/Checkout%20Flow"
    );
    assert_eq!(env.storage_get(KEY_LAST_FILE).await, Some("abc123".to_string()));
}

#[tokio::test]
async fn cached_file_key_is_the_fallback() {
    let env = MemoryEnv::new().with_document(snapshot(None));
    env.seed(KEY_LAST_FILE, "cached456").await;

    let context = derive_design_context(&env).await;

    assert!(context.file_key_found);
    assert_eq!(
        context.url,
        "https://www.figma.com/file/cached456/Checkout%20Flow"
    );
}

#[tokio::test]
async fn selection_adds_the_node_anchor() {
    let mut doc = snapshot(Some("abc123"));
    doc.selection = vec![
        NodeRef {
            id: "12:34".to_string(),
            name: "Buy button".to_string(),
        },
        NodeRef {
            id: "56:78".to_string(),
            name: "Price label".to_string(),
        },
    ];
    let env = MemoryEnv::new().with_document(doc);

    let context = derive_design_context(&env).await;

    // The link anchors on the first selected node; ids swap their colon
    // for the URL form's dash.
    assert_eq!(
        context.url,
        "https://www.figma.com/file/abc123/Checkout%20Flow?node-id=12-34&viewport=0%2C0%2C1%2C1"
    );
    assert_eq!(context.selected_nodes, 2);
    assert_eq!(
        context.selected_node_names,
        vec!["Buy button".to_string(), "Price label".to_string()]
    );
}
