//! File-backed number registry.

use crate::error::RegistryError;
use sms_client::Number;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, instrument};

/// Directory created under the home directory when no override is set.
pub const DEFAULT_DIR_NAME: &str = ".fake-sms";

/// Name of the registry document inside the registry directory.
pub const DB_FILE_NAME: &str = "db.json";

const EMPTY_DOCUMENT: &[u8] = b"[\n]\n";

/// Pick the registry directory: the override if given, else `~/.fake-sms`.
pub fn resolve_dir(override_dir: Option<&Path>) -> Result<PathBuf, RegistryError> {
    match override_dir {
        Some(dir) => Ok(dir.to_path_buf()),
        None => dirs::home_dir()
            .map(|home| home.join(DEFAULT_DIR_NAME))
            .ok_or(RegistryError::NoHomeDir),
    }
}

/// `entries` with `number` appended.
pub fn appended(entries: &[Number], number: Number) -> Vec<Number> {
    let mut next = Vec::with_capacity(entries.len() + 1);
    next.extend_from_slice(entries);
    next.push(number);
    next
}

/// `entries` without the entry at `position`, plus the removed entry.
pub fn without(
    entries: &[Number],
    position: usize,
) -> Result<(Vec<Number>, Number), RegistryError> {
    let removed = entries
        .get(position)
        .cloned()
        .ok_or(RegistryError::OutOfRange {
            position,
            len: entries.len(),
        })?;

    let next = entries[..position]
        .iter()
        .chain(&entries[position + 1..])
        .cloned()
        .collect();
    Ok((next, removed))
}

/// Ordered list of numbers persisted as one JSON array.
///
/// Every operation reads the whole document and mutations write the whole
/// document back. Nothing is cached between calls and there is no locking,
/// so two processes mutating the same file can lose each other's updates.
#[derive(Debug, Clone)]
pub struct NumberRegistry {
    dir: PathBuf,
    path: PathBuf,
}

impl NumberRegistry {
    /// Registry stored in `dir/db.json`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let path = dir.join(DB_FILE_NAME);
        Self { dir, path }
    }

    /// Registry in the override directory, or the default one under home.
    pub fn open(override_dir: Option<&Path>) -> Result<Self, RegistryError> {
        Ok(Self::new(resolve_dir(override_dir)?))
    }

    /// Path of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, path: &Path) -> impl FnOnce(std::io::Error) -> RegistryError {
        let path = path.to_path_buf();
        move |source| RegistryError::Io { path, source }
    }

    /// Create the directory and an empty document if they are missing.
    async fn ensure_initialized(&self) -> Result<(), RegistryError> {
        if self.path.exists() {
            return Ok(());
        }

        fs::create_dir_all(&self.dir)
            .await
            .map_err(self.io_error(&self.dir))?;
        fs::write(&self.path, EMPTY_DOCUMENT)
            .await
            .map_err(self.io_error(&self.path))?;

        info!("Initialized empty registry at {:?}", self.path);
        Ok(())
    }

    async fn load(&self) -> Result<Vec<Number>, RegistryError> {
        self.ensure_initialized().await?;

        let data = fs::read(&self.path).await.map_err(self.io_error(&self.path))?;
        serde_json::from_slice(&data).map_err(|source| RegistryError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    /// Write the whole document through a temp file and rename it into place.
    async fn save(&self, entries: &[Number]) -> Result<(), RegistryError> {
        let data = serde_json::to_vec(entries)?;

        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, &data)
            .await
            .map_err(self.io_error(&temp_path))?;
        fs::rename(&temp_path, &self.path)
            .await
            .map_err(self.io_error(&self.path))?;

        debug!("Saved {} numbers to {:?}", entries.len(), self.path);
        Ok(())
    }

    /// All registered numbers in insertion order.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Number>, RegistryError> {
        let entries = self.load().await?;
        debug!("Loaded {} numbers", entries.len());
        Ok(entries)
    }

    /// Append `number` to the registry.
    #[instrument(skip(self, number), fields(number = %number.number))]
    pub async fn add(&self, number: Number) -> Result<(), RegistryError> {
        let entries = self.load().await?;
        let next = appended(&entries, number);
        self.save(&next).await?;

        info!("Registered number at position {}", next.len() - 1);
        Ok(())
    }

    /// Remove the number at `position` and return it.
    ///
    /// Later entries shift down by one. An out of range position leaves the
    /// document untouched.
    #[instrument(skip(self))]
    pub async fn remove(&self, position: usize) -> Result<Number, RegistryError> {
        let entries = self.load().await?;
        let (next, removed) = without(&entries, position)?;
        self.save(&next).await?;

        info!("Removed {} from position {}", removed.number, position);
        Ok(removed)
    }
}
