//! Resolver fallback-chain behavior.
//!
//! Covers the precedence matrix for both roles, the auto-detection
//! scenarios, and the bootstrap path against a mocked engine.

mod common;

use common::{engine_client, temp_store, UNROUTABLE};
use flowsync::{FlowResolver, ResolutionSource, ResolverRole, SyncError};

fn resolver(
    store: flowsync::FlowIdStore,
    engine_url: &str,
    role: ResolverRole,
    configured: Option<&str>,
) -> FlowResolver {
    FlowResolver::new(
        store,
        engine_client(engine_url),
        role,
        configured.map(str::to_string),
        "Travel Chatbot",
    )
}

#[tokio::test]
async fn persisted_value_wins_for_orchestrator_without_network() {
    let (_dir, store) = temp_store();
    store.save("flow-42").unwrap();

    // Unroutable engine: any network call would fail the test.
    let mut resolver = resolver(store, UNROUTABLE, ResolverRole::Orchestrator, None);
    let resolution = resolver.resolve().await.unwrap();

    assert_eq!(resolution.flow_id, "flow-42");
    assert_eq!(resolution.source, ResolutionSource::Persisted);
}

#[tokio::test]
async fn orchestrator_prefers_persisted_over_configured() {
    let (_dir, store) = temp_store();
    store.save("from-file").unwrap();

    let mut resolver = resolver(
        store,
        UNROUTABLE,
        ResolverRole::Orchestrator,
        Some("from-config"),
    );
    let resolution = resolver.resolve().await.unwrap();

    assert_eq!(resolution.flow_id, "from-file");
    assert_eq!(resolution.source, ResolutionSource::Persisted);
}

#[tokio::test]
async fn backend_prefers_configured_over_persisted() {
    let (_dir, store) = temp_store();
    store.save("from-file").unwrap();

    let mut resolver = resolver(store, UNROUTABLE, ResolverRole::Backend, Some("from-config"));
    let resolution = resolver.resolve().await.unwrap();

    assert_eq!(resolution.flow_id, "from-config");
    assert_eq!(resolution.source, ResolutionSource::Configured);
}

#[tokio::test]
async fn configured_value_used_when_store_empty() {
    let (_dir, store) = temp_store();

    let mut resolver = resolver(
        store,
        UNROUTABLE,
        ResolverRole::Orchestrator,
        Some("from-config"),
    );
    let resolution = resolver.resolve().await.unwrap();

    assert_eq!(resolution.flow_id, "from-config");
    assert_eq!(resolution.source, ResolutionSource::Configured);
}

#[tokio::test]
async fn all_sources_present_highest_priority_wins() {
    let (_dir, store) = temp_store();
    store.save("from-file").unwrap();

    let mut resolver = resolver(
        store.clone(),
        UNROUTABLE,
        ResolverRole::Orchestrator,
        Some("from-config"),
    );

    // Fill the cache, then make every source disagree.
    resolver.resolve().await.unwrap();
    store.save("from-file-2").unwrap();

    let resolution = resolver.resolve().await.unwrap();
    assert_eq!(resolution.flow_id, "from-file-2");
    assert_eq!(resolution.source, ResolutionSource::Persisted);
}

#[tokio::test]
async fn configured_beats_cache_when_store_empty() {
    let (dir, store) = temp_store();
    store.save("seed").unwrap();

    let mut resolver = resolver(
        store,
        UNROUTABLE,
        ResolverRole::Orchestrator,
        Some("from-config"),
    );

    // Cache now holds "seed"; remove the record so only config and
    // cache remain.
    resolver.resolve().await.unwrap();
    std::fs::remove_file(dir.path().join("flow_id.txt")).unwrap();

    let resolution = resolver.resolve().await.unwrap();
    assert_eq!(resolution.flow_id, "from-config");
    assert_eq!(resolution.source, ResolutionSource::Configured);
}

#[tokio::test]
async fn cache_survives_store_removal() {
    let (dir, store) = temp_store();
    store.save("flow-cached").unwrap();

    let mut resolver = resolver(store, UNROUTABLE, ResolverRole::Orchestrator, None);

    // First resolution fills the cache from the persisted record.
    resolver.resolve().await.unwrap();
    assert_eq!(resolver.cached(), Some("flow-cached"));

    // Record gone: the cache is now the highest-priority present source.
    std::fs::remove_file(dir.path().join("flow_id.txt")).unwrap();
    let resolution = resolver.resolve().await.unwrap();

    assert_eq!(resolution.flow_id, "flow-cached");
    assert_eq!(resolution.source, ResolutionSource::Cached);
}

#[tokio::test]
async fn auto_detect_prefers_target_name() {
    let mut server = mockito::Server::new_async().await;
    let listing = server
        .mock("GET", "/api/v1/flows/")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"[{"id": "a1", "name": "Other"}, {"id": "a2", "name": "Travel Chatbot"}]"#,
        )
        .create_async()
        .await;

    let (_dir, store) = temp_store();
    let mut resolver = resolver(store, &server.url(), ResolverRole::Orchestrator, None);
    let resolution = resolver.resolve().await.unwrap();

    assert_eq!(resolution.flow_id, "a2");
    assert_eq!(
        resolution.source,
        ResolutionSource::AutoDetected { matched_name: true }
    );
    listing.assert_async().await;
}

#[tokio::test]
async fn auto_detect_falls_back_to_first_flow() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/v1/flows/")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"id": "b1", "name": "Other"}, {"id": "b2", "name": "Another"}]"#)
        .create_async()
        .await;

    let (_dir, store) = temp_store();
    let mut resolver = resolver(store, &server.url(), ResolverRole::Orchestrator, None);
    let resolution = resolver.resolve().await.unwrap();

    assert_eq!(resolution.flow_id, "b1");
    assert_eq!(
        resolution.source,
        ResolutionSource::AutoDetected {
            matched_name: false
        }
    );
}

#[tokio::test]
async fn empty_listing_is_no_flow_found() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/v1/flows/")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create_async()
        .await;

    let (_dir, store) = temp_store();
    let mut resolver = resolver(store, &server.url(), ResolverRole::Orchestrator, None);

    let err = resolver.resolve().await.unwrap_err();
    assert!(matches!(err, SyncError::NoFlowFound));
}

#[tokio::test]
async fn bootstrap_uploads_when_engine_is_empty() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/v1/flows/")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create_async()
        .await;
    let upload = server
        .mock("POST", "/api/v1/flows/upload/")
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"id": "new-99", "name": "Travel Chatbot"}]"#)
        .create_async()
        .await;

    let (_dir, store) = temp_store();

    let definition = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(definition.path(), r#"{"name": "Travel Chatbot", "data": {}}"#).unwrap();

    let mut resolver = resolver(
        store.clone(),
        &server.url(),
        ResolverRole::Orchestrator,
        None,
    );
    let resolution = resolver
        .get_or_create(definition.path().to_str().unwrap())
        .await
        .unwrap();

    assert_eq!(resolution.flow_id, "new-99");
    assert_eq!(resolution.source, ResolutionSource::Bootstrapped);
    // The adopted id must be persisted for the other processes.
    assert_eq!(store.load().as_deref(), Some("new-99"));
    upload.assert_async().await;
}

#[tokio::test]
async fn bootstrap_distrusts_stale_persisted_id() {
    let mut server = mockito::Server::new_async().await;
    // The persisted flow no longer exists on the engine.
    let _mock = server
        .mock("GET", "/api/v1/flows/stale-1")
        .with_status(404)
        .create_async()
        .await;
    let _mock = server
        .mock("GET", "/api/v1/flows/")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"id": "fresh-2", "name": "Travel Chatbot"}]"#)
        .create_async()
        .await;

    let (_dir, store) = temp_store();
    store.save("stale-1").unwrap();

    let mut resolver = resolver(
        store.clone(),
        &server.url(),
        ResolverRole::Orchestrator,
        None,
    );
    let resolution = resolver.get_or_create("unused.json").await.unwrap();

    assert_eq!(resolution.flow_id, "fresh-2");
    assert_eq!(store.load().as_deref(), Some("fresh-2"));
}

#[tokio::test]
async fn bootstrap_trusts_live_persisted_id() {
    let mut server = mockito::Server::new_async().await;
    let existence = server
        .mock("GET", "/api/v1/flows/live-1")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id": "live-1", "name": "Travel Chatbot"}"#)
        .create_async()
        .await;

    let (_dir, store) = temp_store();
    store.save("live-1").unwrap();

    let mut resolver = resolver(store, &server.url(), ResolverRole::Orchestrator, None);
    let resolution = resolver.get_or_create("unused.json").await.unwrap();

    assert_eq!(resolution.flow_id, "live-1");
    assert_eq!(resolution.source, ResolutionSource::Persisted);
    existence.assert_async().await;
}
