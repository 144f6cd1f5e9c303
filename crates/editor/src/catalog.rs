//! Asset catalog
//!
//! The catalog is filled once by an async source. Until then lookups miss
//! and scene loads wait on the loaded gate.

use std::future::Future;
use std::path::PathBuf;

use shared::{CatalogEntry, CatalogManifest};
use tokio::sync::watch;

use crate::error::CatalogError;

/// Where catalog entries come from
pub trait CatalogSource {
    fn load_all(&self) -> impl Future<Output = Result<Vec<CatalogEntry>, CatalogError>> + Send;
}

/// Fixed list of entries, for tests and embedded catalogs
#[derive(Debug, Clone, Default)]
pub struct StaticCatalogSource {
    entries: Vec<CatalogEntry>,
}

impl StaticCatalogSource {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }
}

impl CatalogSource for StaticCatalogSource {
    fn load_all(&self) -> impl Future<Output = Result<Vec<CatalogEntry>, CatalogError>> + Send {
        let entries = self.entries.clone();
        async move { Ok(entries) }
    }
}

/// Manifest file on disk
#[derive(Debug, Clone)]
pub struct JsonCatalogSource {
    path: PathBuf,
}

impl JsonCatalogSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CatalogSource for JsonCatalogSource {
    fn load_all(&self) -> impl Future<Output = Result<Vec<CatalogEntry>, CatalogError>> + Send {
        let path = self.path.clone();
        async move {
            let json = tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| CatalogError::Manifest {
                    path: path.clone(),
                    message: e.to_string(),
                })?;
            let manifest: CatalogManifest =
                serde_json::from_str(&json).map_err(|e| CatalogError::Manifest {
                    path: path.clone(),
                    message: e.to_string(),
                })?;
            Ok(manifest.entries)
        }
    }
}

/// Load progress published to waiters
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogStatus {
    Pending,
    Loaded(Vec<CatalogEntry>),
    Failed(CatalogError),
}

/// Catalog entries plus the loaded gate
#[derive(Debug)]
pub struct AssetCatalog {
    status: watch::Sender<CatalogStatus>,
}

impl Default for AssetCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetCatalog {
    /// Empty catalog, pending
    pub fn new() -> Self {
        let (status, _) = watch::channel(CatalogStatus::Pending);
        Self { status }
    }

    /// Catalog that is loaded from the start
    pub fn with_entries(entries: Vec<CatalogEntry>) -> Self {
        let catalog = Self::new();
        catalog.status.send_replace(CatalogStatus::Loaded(entries));
        catalog
    }

    /// Run `source` and publish its outcome. Waiters wake either way.
    pub async fn load_from<S: CatalogSource>(&self, source: &S) -> Result<usize, CatalogError> {
        match source.load_all().await {
            Ok(entries) => {
                let count = entries.len();
                let missing = entries.iter().filter(|e| e.template.is_none()).count();
                if missing > 0 {
                    tracing::warn!("{missing} catalog entries have no template");
                }
                tracing::info!("Catalog loaded with {count} entries");
                self.status.send_replace(CatalogStatus::Loaded(entries));
                Ok(count)
            }
            Err(e) => {
                tracing::error!("Catalog load failed: {e}");
                self.status.send_replace(CatalogStatus::Failed(e.clone()));
                Err(e)
            }
        }
    }

    /// Resolve once loading finished
    pub async fn wait_until_loaded(&self) -> Result<(), CatalogError> {
        let mut rx = self.status.subscribe();
        let status = rx
            .wait_for(|s| !matches!(s, CatalogStatus::Pending))
            .await
            .map_err(|_| CatalogError::Abandoned)?;
        match &*status {
            CatalogStatus::Failed(e) => Err(e.clone()),
            _ => Ok(()),
        }
    }

    pub fn status(&self) -> CatalogStatus {
        self.status.borrow().clone()
    }

    pub fn is_loaded(&self) -> bool {
        matches!(*self.status.borrow(), CatalogStatus::Loaded(_))
    }

    /// Find an entry by id. Misses while the catalog is pending.
    pub fn lookup(&self, id: &str) -> Option<CatalogEntry> {
        match &*self.status.borrow() {
            CatalogStatus::Loaded(entries) => entries.iter().find(|e| e.id == id).cloned(),
            _ => None,
        }
    }

    /// All entries, in manifest order
    pub fn entries(&self) -> Vec<CatalogEntry> {
        match &*self.status.borrow() {
            CatalogStatus::Loaded(entries) => entries.clone(),
            _ => Vec::new(),
        }
    }
}
