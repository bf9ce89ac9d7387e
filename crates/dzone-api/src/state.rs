//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor.
//!
//! ## Architecture
//!
//! AppState holds:
//! - **Registry** — the immutable zone catalog loaded at startup
//! - **Sessions** — one [`AddressState`] per checkout, keyed by UUID
//! - **Metrics** — the Prometheus render handle, when the recorder is installed
//!
//! The registry is never mutated after startup, so it is shared behind an
//! `Arc` without a lock. Sessions are mutated under the store's write lock,
//! one closure at a time, so each session has a single writer.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use dzone_state::AddressState;
use dzone_zones::ZoneRegistry;

// -- Generic In-Memory Store --------------------------------------------------

/// Thread-safe, cloneable in-memory key-value store.
///
/// All operations are synchronous (the RwLock is `parking_lot`, not `tokio::sync`)
/// because the lock is never held across `.await` points. `parking_lot::RwLock`
/// is non-poisonable, so a panicking writer does not wedge the store.
#[derive(Debug)]
pub struct Store<T: Clone + Send + Sync> {
    data: Arc<RwLock<HashMap<Uuid, T>>>,
}

impl<T: Clone + Send + Sync> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
        }
    }
}

impl<T: Clone + Send + Sync> Store<T> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert a record, returning the previous value if the key existed.
    pub fn insert(&self, id: Uuid, value: T) -> Option<T> {
        self.data.write().insert(id, value)
    }

    /// Retrieve a record by ID.
    pub fn get(&self, id: &Uuid) -> Option<T> {
        self.data.read().get(id).cloned()
    }

    /// Update a record in place. Returns the updated record, or `None` if not found.
    pub fn update(&self, id: &Uuid, f: impl FnOnce(&mut T)) -> Option<T> {
        let mut guard = self.data.write();
        let entry = guard.get_mut(id)?;
        f(entry);
        Some(entry.clone())
    }

    /// Atomically read-validate-update a record.
    ///
    /// The closure runs under a single write lock and may mutate the record
    /// even when it returns `Err`. Returns `None` if the record doesn't exist.
    pub fn try_update<R, E>(
        &self,
        id: &Uuid,
        f: impl FnOnce(&mut T) -> Result<R, E>,
    ) -> Option<Result<R, E>> {
        self.data.write().get_mut(id).map(f)
    }

    /// Remove a record by ID.
    pub fn remove(&self, id: &Uuid) -> Option<T> {
        self.data.write().remove(id)
    }

    /// Return the number of records.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone + Send + Sync> Default for Store<T> {
    fn default() -> Self {
        Self::new()
    }
}

// -- Session Records ----------------------------------------------------------

/// One checkout's address session.
#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub id: Uuid,
    pub address: AddressState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SessionRecord {
    /// A fresh session in the empty phase.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            address: AddressState::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Stamp `updated_at` after a mutation.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Default for SessionRecord {
    fn default() -> Self {
        Self::new()
    }
}

// -- Configuration ------------------------------------------------------------

/// Log output format for the service binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Zone catalog to load. `None` means the built-in catalog.
    pub zone_config: Option<PathBuf>,
    /// Log output format.
    pub log_format: LogFormat,
    /// Whether to install the Prometheus recorder and mount `/metrics`.
    pub metrics_enabled: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            zone_config: None,
            log_format: LogFormat::Pretty,
            metrics_enabled: true,
        }
    }
}

impl AppConfig {
    /// Build configuration from process environment variables.
    ///
    /// | Variable                | Default    |
    /// |-------------------------|------------|
    /// | `PORT`                  | `8080`     |
    /// | `ZONE_CONFIG`           | built-in   |
    /// | `DZONE_LOG_FORMAT`      | `pretty`   |
    /// | `DZONE_METRICS_ENABLED` | `true`     |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup. Unparseable values
    /// fall back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let port = lookup("PORT")
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(defaults.port);
        let zone_config = lookup("ZONE_CONFIG")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);
        let log_format = match lookup("DZONE_LOG_FORMAT").as_deref().map(str::trim) {
            Some(f) if f.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => defaults.log_format,
        };
        let metrics_enabled = match lookup("DZONE_METRICS_ENABLED").as_deref().map(str::trim) {
            Some("0") | Some("false") | Some("no") | Some("off") => false,
            _ => defaults.metrics_enabled,
        };
        Self {
            port,
            zone_config,
            log_format,
            metrics_enabled,
        }
    }
}

// -- AppState -----------------------------------------------------------------

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub registry: Arc<ZoneRegistry>,
    pub sessions: Store<SessionRecord>,
    pub metrics: Option<PrometheusHandle>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("zones", &self.registry.len())
            .field("sessions", &self.sessions.len())
            .field("metrics", &self.metrics.as_ref().map(|_| "[installed]"))
            .finish()
    }
}

impl AppState {
    /// Default configuration with the built-in zone catalog.
    pub fn new() -> Self {
        Self::with_registry(AppConfig::default(), ZoneRegistry::builtin())
    }

    /// State over an explicit registry, with no metrics recorder.
    pub fn with_registry(config: AppConfig, registry: ZoneRegistry) -> Self {
        Self {
            config,
            registry: Arc::new(registry),
            sessions: Store::new(),
            metrics: None,
        }
    }

    /// Attach a Prometheus render handle.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
