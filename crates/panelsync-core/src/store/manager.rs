use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::models::PanelId;

/// Meta key holding the dataset version of the cached bulk blob.
const VERSION_KEY: &str = "time";

/// Meta key holding when the bulk blob was last written.
const SYNCED_AT_KEY: &str = "synced_at";

/// Records key holding the whole encoded catalog.
const CATALOG_KEY: &str = "panels";

/// Width of the version prefix on a per-panel entry.
const VERSION_PREFIX_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Partition {
    Meta,
    Records,
}

impl Partition {
    fn dir_name(&self) -> &'static str {
        match self {
            Partition::Meta => "meta",
            Partition::Records => "records",
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// A single cached panel with the dataset version it was cached at.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelEntry {
    pub version: u64,
    pub bytes: Vec<u8>,
}

impl PanelEntry {
    fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(VERSION_PREFIX_LEN + self.bytes.len());
        out.extend_from_slice(&self.version.to_be_bytes());
        out.extend_from_slice(&self.bytes);
        out
    }

    fn from_bytes(raw: Vec<u8>) -> Option<Self> {
        if raw.len() < VERSION_PREFIX_LEN {
            return None;
        }
        let (head, body) = raw.split_at(VERSION_PREFIX_LEN);
        let version = u64::from_be_bytes(head.try_into().ok()?);
        Some(Self {
            version,
            bytes: body.to_vec(),
        })
    }
}

/// Handle to the on-disk cache.
///
/// Each partition is a directory; each key is a file holding raw bytes.
/// Open once and share the handle.
#[derive(Debug)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        for partition in [Partition::Meta, Partition::Records] {
            let dir = root.join(partition.dir_name());
            tokio::fs::create_dir_all(&dir)
                .await
                .with_context(|| format!("Failed to create cache partition: {}", dir.display()))?;
        }
        debug!(root = %root.display(), "Local store opened");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn key_path(&self, partition: Partition, key: &str) -> Result<PathBuf> {
        let plain = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
            && key != "."
            && key != "..";
        if !plain {
            bail!("Invalid cache key: {:?}", key);
        }
        Ok(self.root.join(partition.dir_name()).join(key))
    }

    pub async fn get(&self, partition: Partition, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.key_path(partition, key)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read cache entry: {}/{}", partition, key)),
        }
    }

    pub async fn put(&self, partition: Partition, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.key_path(partition, key)?;
        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("Failed to write cache entry: {}/{}", partition, key))
    }

    // ===== Version marker =====

    /// Cached dataset version; a missing or malformed marker reads as `None`.
    pub async fn load_version(&self) -> Result<Option<u64>> {
        let Some(raw) = self.get(Partition::Meta, VERSION_KEY).await? else {
            return Ok(None);
        };
        match <[u8; 8]>::try_from(raw.as_slice()) {
            Ok(head) => Ok(Some(u64::from_be_bytes(head))),
            Err(_) => {
                debug!(len = raw.len(), "Ignoring malformed version marker");
                Ok(None)
            }
        }
    }

    pub async fn save_version(&self, version: u64) -> Result<()> {
        self.put(Partition::Meta, VERSION_KEY, &version.to_be_bytes()).await
    }

    // ===== Sync timestamp =====

    pub async fn load_synced_at(&self) -> Result<Option<DateTime<Utc>>> {
        let Some(raw) = self.get(Partition::Meta, SYNCED_AT_KEY).await? else {
            return Ok(None);
        };
        let parsed = std::str::from_utf8(&raw)
            .ok()
            .and_then(|s| DateTime::parse_from_rfc3339(s.trim()).ok())
            .map(|dt| dt.with_timezone(&Utc));
        Ok(parsed)
    }

    pub async fn save_synced_at(&self, at: DateTime<Utc>) -> Result<()> {
        self.put(Partition::Meta, SYNCED_AT_KEY, at.to_rfc3339().as_bytes())
            .await
    }

    // ===== Bulk catalog =====

    pub async fn load_catalog_bytes(&self) -> Result<Option<Vec<u8>>> {
        self.get(Partition::Records, CATALOG_KEY).await
    }

    pub async fn save_catalog_bytes(&self, bytes: &[u8]) -> Result<()> {
        self.put(Partition::Records, CATALOG_KEY, bytes).await
    }

    // ===== Individual panels =====

    /// A per-panel entry too short to carry its version reads as `None`.
    pub async fn load_panel_entry(&self, id: PanelId) -> Result<Option<PanelEntry>> {
        let raw = self.get(Partition::Records, &id.to_string()).await?;
        Ok(raw.and_then(PanelEntry::from_bytes))
    }

    pub async fn save_panel_entry(&self, id: PanelId, entry: &PanelEntry) -> Result<()> {
        self.put(Partition::Records, &id.to_string(), &entry.to_bytes())
            .await
    }
}

// ============================================================================
// Tests
// ============================================================================
