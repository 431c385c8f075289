mod support;

use memlane_core::{
    ApiError, ApiOperation, FeedView, MemoryApiClient, MemoryFeed, RecordStore, RestRecordStore,
    StoreError, StorePath,
};
use support::StubServer;

const MEMORIES_BODY: &str = r#"{
    "-Na": {"topic": "Coffee", "timestamp": "2025-02-16 07-10-00", "image_url": "https://img/a.png"},
    "-Nb": {"topic": "Dinner", "timestamp": "2025-02-16 19-00-00"}
}"#;

const DETAIL_BODY: &str = r#"{
    "topic": "Beach day",
    "dallEPrompt": "watercolor beach",
    "imageUrl": null,
    "timestamp": "2025-02-16 10-00-00",
    "sentences": ["We swam.", "It was cold."],
    "context": "family trip",
    "summary": "A cold swim.",
    "emotion": "joy",
    "metadata": {"conversationType": "story", "emotionalTone": "warm", "importanceLevel": 3, "visualStyle": "soft"}
}"#;

#[test]
fn api_lists_memories() {
    let server = StubServer::start();
    server.route(
        "GET",
        "/memories",
        200,
        &format!("[{}]", DETAIL_BODY.replacen('{', r#"{"id": "42","#, 1)),
    );
    let client = MemoryApiClient::new(format!("{}/", server.base_url()), None).unwrap();

    let memories = client.list_memories().unwrap();
    assert_eq!(memories.len(), 1);
    let detail = &memories[0];
    assert_eq!(detail.dalle_prompt.as_deref(), Some("watercolor beach"));
    assert_eq!(detail.sentences.len(), 2);
    assert_eq!(detail.metadata.importance_level, 3);

    let record = detail.to_record();
    assert_eq!(record.id, "42");
    assert_eq!(record.summary.as_deref(), Some("A cold swim."));
    assert!(record.image_url().is_none());
}

#[test]
fn api_get_memory_fills_in_the_requested_id() {
    let server = StubServer::start();
    server.route("GET", "/memory/abc", 200, DETAIL_BODY);
    let client = MemoryApiClient::new(server.base_url(), None).unwrap();

    let detail = client.get_memory(" abc ").unwrap().unwrap();
    assert_eq!(detail.id, "abc");
    assert_eq!(detail.topic, "Beach day");
    assert_eq!(detail.to_record().id, "abc");
}

#[test]
fn api_get_memory_handles_null_and_status_errors() {
    let server = StubServer::start();
    server.route("GET", "/memory/missing", 200, "null");
    server.route("GET", "/memory/broken", 500, "{}");
    let client = MemoryApiClient::new(server.base_url(), None).unwrap();

    assert_eq!(client.get_memory("missing").unwrap(), None);
    let err = client.get_memory("broken").unwrap_err();
    assert!(matches!(
        err,
        ApiError::Status {
            operation: ApiOperation::GetMemory,
            status: 500
        }
    ));
    assert_eq!(err.to_string(), "failed to fetch memory (http status 500)");
    assert!(matches!(
        client.get_memory("a/b"),
        Err(ApiError::InvalidId(_))
    ));
}

#[test]
fn api_generate_images_and_decode_errors() {
    let server = StubServer::start();
    server.route("POST", "/generate-images", 200, r#"{"message": "queued 2"}"#);
    server.route("GET", "/memories", 200, "not json");
    let client = MemoryApiClient::new(server.base_url(), None).unwrap();

    assert_eq!(client.generate_images().unwrap().message, "queued 2");
    let err = client.list_memories().unwrap_err();
    assert_eq!(err.operation(), Some(ApiOperation::ListMemories));
    assert!(matches!(err, ApiError::Decode { .. }));
}

#[test]
fn api_rejects_blank_base_url() {
    assert!(matches!(
        MemoryApiClient::new("  ", None),
        Err(ApiError::InvalidBaseUrl(_))
    ));
}

#[test]
fn rest_store_feeds_the_today_view_and_refreshes_after_delete() {
    let server = StubServer::start();
    server.route("GET", "/memories.json", 200, MEMORIES_BODY);
    server.route("DELETE", "/memories/-Na.json", 200, "null");
    let store = RestRecordStore::new(server.base_url(), None).unwrap();

    let mut feed = MemoryFeed::new(FeedView::All);
    feed.attach(&store).unwrap();
    let ids = feed.records().into_iter().map(|r| r.id).collect::<Vec<_>>();
    assert_eq!(ids, vec!["-Nb".to_string(), "-Na".to_string()]);

    server.route(
        "GET",
        "/memories.json",
        200,
        r#"{"-Nb": {"topic": "Dinner", "timestamp": "2025-02-16 19-00-00"}}"#,
    );
    store.delete(&StorePath::memory("-Na").unwrap()).unwrap();

    let ids = feed.records().into_iter().map(|r| r.id).collect::<Vec<_>>();
    assert_eq!(ids, vec!["-Nb".to_string()]);
    assert!(server
        .requests()
        .contains(&"DELETE /memories/-Na.json".to_string()));
}

#[test]
fn rest_store_reports_failures() {
    let server = StubServer::start();
    server.route("DELETE", "/memories/x.json", 403, r#"{"error": "denied"}"#);
    let store = RestRecordStore::new(server.base_url(), None).unwrap();

    let err = store.delete(&StorePath::memory("x").unwrap()).unwrap_err();
    assert!(matches!(err, StoreError::Status { status: 403, .. }));

    // Unrouted fetch answers 404 and is delivered as an empty snapshot.
    let mut feed = MemoryFeed::new(FeedView::All);
    feed.attach(&store).unwrap();
    assert!(feed.state().is_empty_loaded());
}
