//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Flatten core results into plain envelopes for the UI.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Failures are reported in envelopes, never thrown.

use log::warn;
use memlane_core::db::open_db;
use memlane_core::feed::{derive_all, derive_today, filter_on_date, sort_newest_first};
use memlane_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    ClientConfig, Clock, MemoryApiClient, MemoryRecord, MemoryTimestamp, NoteDraftService,
    RecordStore, RestRecordStore, ScatterLayout, SqliteLocalStateRepository, StorePath,
    SystemClock,
};
use std::sync::OnceLock;

static CLIENT_CONFIG: OnceLock<ClientConfig> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Card label for a raw store timestamp; unparseable input is echoed back.
#[flutter_rust_bridge::frb(sync)]
pub fn format_memory_timestamp(raw: String) -> String {
    match MemoryTimestamp::parse(&raw) {
        Ok(parsed) => parsed.display(),
        Err(_) => raw,
    }
}

/// One card of the all-memories wall.
#[derive(Debug, Clone, PartialEq)]
pub struct CardPosition {
    pub id: String,
    pub x_offset: f64,
    pub rotation_degrees: f64,
    pub top: f64,
}

/// Computes a fresh scattered layout for `ids` in display order.
#[flutter_rust_bridge::frb(sync)]
pub fn scatter_layout(ids: Vec<String>) -> Vec<CardPosition> {
    let layout = ScatterLayout::compute(&ids);
    layout
        .iter()
        .enumerate()
        .map(|(index, (id, position))| CardPosition {
            id: id.to_string(),
            x_offset: position.x_offset,
            rotation_degrees: position.rotation_degrees,
            top: memlane_core::layout::card_top(index),
        })
        .collect()
}

/// Memory list item for the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryItem {
    pub id: String,
    pub topic: String,
    pub image_url: Option<String>,
    pub timestamp: String,
    /// Pre-formatted card label.
    pub display_time: String,
    pub summary: Option<String>,
}

/// List response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryListResponse {
    pub ok: bool,
    pub items: Vec<MemoryItem>,
    pub message: String,
}

/// Fetches one derived view (`all` or `today`) once.
///
/// # FFI contract
/// - Blocking network call; run off the UI thread.
/// - Reads the hosted store when `MEMLANE_STORE_URL` is set, the REST API
///   otherwise.
pub fn fetch_memories(view: String) -> MemoryListResponse {
    let today_only = match view.trim().to_ascii_lowercase().as_str() {
        "all" => false,
        "today" => true,
        other => return MemoryListResponse::failure(format!("unknown view `{other}`")),
    };

    let config = client_config();
    let records = match &config.store_base_url {
        Some(store_url) => fetch_from_store(store_url, config, today_only),
        None => fetch_from_api(config, today_only),
    };
    match records {
        Ok(records) => {
            let items = records.into_iter().map(to_memory_item).collect::<Vec<_>>();
            let message = if items.is_empty() {
                "No memories yet.".to_string()
            } else {
                format!("Loaded {} memories.", items.len())
            };
            MemoryListResponse {
                ok: true,
                items,
                message,
            }
        }
        Err(message) => MemoryListResponse::failure(message),
    }
}

/// Deletes one memory from the hosted store (the review "reject" effect).
///
/// # FFI contract
/// - Blocking network call; run off the UI thread.
/// - Requires `MEMLANE_STORE_URL`; deleting an absent record succeeds.
/// - Returns empty string on success and error message on failure.
pub fn delete_memory(id: String) -> String {
    match delete_memory_with(client_config(), &id) {
        Ok(()) => String::new(),
        Err(message) => format!("delete_memory failed: {message}"),
    }
}

/// Asks the REST API to illustrate memories that have no image yet.
///
/// # FFI contract
/// - Blocking network call; run off the UI thread.
/// - Returns the server message on success.
pub fn generate_images() -> ActionResponse {
    match generate_images_with(client_config()) {
        Ok(message) => ActionResponse {
            ok: true,
            message,
        },
        Err(message) => ActionResponse {
            ok: false,
            message: format!("generate_images failed: {message}"),
        },
    }
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub ok: bool,
    pub message: String,
}

/// Note draft response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDraftResponse {
    pub ok: bool,
    pub content: String,
    pub message: String,
}

/// Loads the record-screen note draft (empty when none was saved).
#[flutter_rust_bridge::frb(sync)]
pub fn record_note_load() -> NoteDraftResponse {
    match with_note_service(|service| service.load()) {
        Ok(content) => NoteDraftResponse {
            ok: true,
            content,
            message: String::new(),
        },
        Err(message) => NoteDraftResponse {
            ok: false,
            content: String::new(),
            message: format!("record_note_load failed: {message}"),
        },
    }
}

/// Persists the note draft; called on every edit.
///
/// Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn record_note_save(content: String) -> String {
    match with_note_service(|service| service.save(&content)) {
        Ok(()) => String::new(),
        Err(message) => format!("record_note_save failed: {message}"),
    }
}

impl MemoryListResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            items: Vec::new(),
            message: message.into(),
        }
    }
}

fn client_config() -> &'static ClientConfig {
    CLIENT_CONFIG.get_or_init(|| {
        ClientConfig::from_env().unwrap_or_else(|err| {
            warn!("event=config_load module=ffi status=degraded error={err}");
            ClientConfig::default()
        })
    })
}

fn fetch_from_store(
    store_url: &str,
    config: &ClientConfig,
    today_only: bool,
) -> Result<Vec<MemoryRecord>, String> {
    let store = RestRecordStore::new(store_url, config.http_timeout).map_err(|err| err.to_string())?;
    let snapshot = store
        .fetch(&StorePath::memories())
        .map_err(|err| err.to_string())?;
    Ok(if today_only {
        derive_today(&snapshot, SystemClock.today())
    } else {
        derive_all(&snapshot)
    })
}

fn fetch_from_api(config: &ClientConfig, today_only: bool) -> Result<Vec<MemoryRecord>, String> {
    let client = MemoryApiClient::new(config.api_base_url.as_str(), config.http_timeout)
        .map_err(|err| err.to_string())?;
    let records = client
        .list_memories()
        .map_err(|err| err.to_string())?
        .iter()
        .map(|detail| detail.to_record())
        .collect::<Vec<_>>();
    Ok(if today_only {
        filter_on_date(records, SystemClock.today())
    } else {
        let mut records = records;
        sort_newest_first(&mut records);
        records
    })
}

fn delete_memory_with(config: &ClientConfig, id: &str) -> Result<(), String> {
    let path = StorePath::memory(id.trim()).map_err(|err| err.to_string())?;
    let store_url = config
        .store_base_url
        .as_deref()
        .ok_or_else(|| "no record store configured (MEMLANE_STORE_URL)".to_string())?;
    let store =
        RestRecordStore::new(store_url, config.http_timeout).map_err(|err| err.to_string())?;
    store.delete(&path).map_err(|err| err.to_string())
}

fn generate_images_with(config: &ClientConfig) -> Result<String, String> {
    let client = MemoryApiClient::new(config.api_base_url.as_str(), config.http_timeout)
        .map_err(|err| err.to_string())?;
    let response = client.generate_images().map_err(|err| err.to_string())?;
    Ok(response.message)
}

fn with_note_service<T>(
    f: impl FnOnce(
        &NoteDraftService<SqliteLocalStateRepository<'_>>,
    ) -> memlane_core::RepoResult<T>,
) -> Result<T, String> {
    let conn = open_db(&client_config().db_path).map_err(|err| format!("DB open failed: {err}"))?;
    let service = NoteDraftService::new(SqliteLocalStateRepository::new(&conn));
    f(&service).map_err(|err| err.to_string())
}

fn to_memory_item(record: MemoryRecord) -> MemoryItem {
    MemoryItem {
        display_time: record.display_timestamp(),
        image_url: record.image_url().map(str::to_string),
        id: record.id,
        topic: record.topic,
        timestamp: record.timestamp,
        summary: record.summary,
    }
}
