//! Scene files on disk
//!
//! One JSON file per scene inside a single folder. The storage key of a
//! scene is its file name.

use std::path::{Path, PathBuf};

use shared::SceneSnapshot;

use crate::error::PersistenceError;
use crate::state::settings::StorageSettings;

const EXTENSION: &str = "json";
const TEMP_EXTENSION: &str = "tmp";

/// Keep only ASCII letters, digits and underscores
pub fn sanitize_scene_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

/// Result of scanning the scenes folder
#[derive(Debug, Default)]
pub struct SnapshotListing {
    /// Readable snapshots, sorted by storage key
    pub snapshots: Vec<SceneSnapshot>,
    /// One message per file that could not be read or parsed
    pub warnings: Vec<String>,
}

/// Folder of scene files
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    folder: PathBuf,
}

impl SnapshotStore {
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
        }
    }

    /// Store in the platform data directory
    pub fn default_location(settings: &StorageSettings) -> Option<Self> {
        settings.default_folder().map(Self::new)
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    async fn ensure_folder(&self) -> Result<(), PersistenceError> {
        tokio::fs::create_dir_all(&self.folder)
            .await
            .map_err(|e| PersistenceError::io(&self.folder, e))
    }

    /// Path of a stored scene. Keys that are not plain file names never resolve.
    fn path_for(&self, storage_key: &str) -> Result<PathBuf, PersistenceError> {
        let plain = !storage_key.is_empty()
            && Path::new(storage_key).file_name().and_then(|n| n.to_str()) == Some(storage_key);
        if !plain {
            return Err(PersistenceError::NotFound(storage_key.to_string()));
        }
        Ok(self.folder.join(storage_key))
    }

    /// Read every scene in the folder. Unreadable files are reported, not fatal.
    pub async fn list_snapshots(&self) -> Result<SnapshotListing, PersistenceError> {
        self.ensure_folder().await?;

        let mut dir = tokio::fs::read_dir(&self.folder)
            .await
            .map_err(|e| PersistenceError::io(&self.folder, e))?;

        let mut listing = SnapshotListing::default();
        while let Some(entry) = dir
            .next_entry()
            .await
            .map_err(|e| PersistenceError::io(&self.folder, e))?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            let Some(key) = path.file_name().and_then(|n| n.to_str()).map(str::to_string) else {
                continue;
            };

            match read_file(&path).await {
                Ok(mut snapshot) => {
                    // The file name wins over whatever key was saved inside it
                    snapshot.storage_key = key;
                    listing.snapshots.push(snapshot);
                }
                Err(e) => {
                    tracing::warn!("Skipping scene file: {e}");
                    listing.warnings.push(e.to_string());
                }
            }
        }

        listing
            .snapshots
            .sort_by(|a, b| a.storage_key.cmp(&b.storage_key));
        tracing::debug!(
            "Listed {} scene(s) in {}",
            listing.snapshots.len(),
            self.folder.display()
        );
        Ok(listing)
    }

    /// Read one scene by storage key
    pub async fn read_snapshot(&self, storage_key: &str) -> Result<SceneSnapshot, PersistenceError> {
        let path = self.path_for(storage_key)?;
        let exists = tokio::fs::try_exists(&path)
            .await
            .map_err(|e| PersistenceError::io(&path, e))?;
        if !exists {
            return Err(PersistenceError::NotFound(storage_key.to_string()));
        }
        let mut snapshot = read_file(&path).await?;
        snapshot.storage_key = storage_key.to_string();
        Ok(snapshot)
    }

    /// Write a scene under a new file name derived from its display name.
    /// Returns the storage key.
    pub async fn write_snapshot(&self, snapshot: &SceneSnapshot) -> Result<String, PersistenceError> {
        self.ensure_folder().await?;

        let mut base = sanitize_scene_name(&snapshot.name);
        if base.is_empty() {
            base = "empty".to_string();
        }

        let mut key = format!("{base}.{EXTENSION}");
        let mut suffix = 1;
        while tokio::fs::try_exists(self.folder.join(&key))
            .await
            .map_err(|e| PersistenceError::io(self.folder.join(&key), e))?
        {
            key = format!("{base}-{suffix}.{EXTENSION}");
            suffix += 1;
        }

        let mut stored = snapshot.clone();
        stored.storage_key = key.clone();
        let json = serde_json::to_string_pretty(&stored)?;

        let path = self.folder.join(&key);
        let temp = self.folder.join(format!(".{key}.{TEMP_EXTENSION}"));
        if let Err(e) = tokio::fs::write(&temp, json).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(PersistenceError::io(&temp, e));
        }
        if let Err(e) = tokio::fs::rename(&temp, &path).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(PersistenceError::io(&path, e));
        }

        tracing::info!(
            "Saved scene {:?} as {} ({} items)",
            stored.name,
            key,
            stored.items.len()
        );
        Ok(key)
    }

    /// Remove a stored scene
    pub async fn delete_snapshot(&self, storage_key: &str) -> Result<(), PersistenceError> {
        let path = self.path_for(storage_key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!("Deleted scene {storage_key}");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(PersistenceError::NotFound(storage_key.to_string()))
            }
            Err(e) => Err(PersistenceError::io(&path, e)),
        }
    }
}

async fn read_file(path: &Path) -> Result<SceneSnapshot, PersistenceError> {
    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| PersistenceError::io(path, e))?;
    serde_json::from_str(&json).map_err(|source| PersistenceError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
