use chrono::Utc;
use tracing::{debug, info, warn};

use super::SyncStatus;
use crate::codec::{decode_catalog, decode_panel, encode_panel};
use crate::config::Config;
use crate::error::SyncError;
use crate::models::{Catalog, Panel, PanelId};
use crate::remote::{HttpRemote, RemoteSource};
use crate::search::{rank, Query, Ranked, Weights};
use crate::store::{LocalStore, PanelEntry};

/// Keeps the local catalog replica in step with the published one.
///
/// The dataset version is the only freshness token: cached data is served
/// while its version is at least the remote version, and the whole catalog
/// is refetched otherwise.
pub struct PanelSync<R> {
    remote: R,
    store: LocalStore,
}

impl PanelSync<HttpRemote> {
    /// Build the HTTP remote and open the cache directory named by `config`.
    pub async fn from_config(config: &Config) -> Result<Self, SyncError> {
        let remote = HttpRemote::from_config(config)?;
        let store = LocalStore::open(config.cache_dir()?).await?;
        Ok(Self::new(remote, store))
    }
}

impl<R: RemoteSource> PanelSync<R> {
    pub fn new(remote: R, store: LocalStore) -> Self {
        Self { remote, store }
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    /// The full catalog, refetched when the cache is behind the remote.
    ///
    /// `force_refresh` skips the cache comparison and always pulls the blob.
    pub async fn get_catalog(&self, force_refresh: bool) -> Result<Catalog, SyncError> {
        let remote_version = self.remote.fetch_version().await?;
        let (catalog, _) = self.catalog_at(remote_version, force_refresh).await?;
        Ok(catalog)
    }

    /// A single panel, or `None` if the published catalog has no such id.
    pub async fn get_panel(&self, id: PanelId) -> Result<Option<Panel>, SyncError> {
        let remote_version = self.remote.fetch_version().await?;

        let local_version = self.local_version().await;
        if let Some(panel) = self.cached_panel(id, local_version, remote_version).await {
            debug!(id, "Serving panel from per-panel cache");
            return Ok(Some(panel));
        }

        let (mut catalog, version) = self.catalog_at(remote_version, false).await?;
        let Some(panel) = catalog.remove(&id) else {
            debug!(id, version, "Panel not in catalog");
            return Ok(None);
        };

        if let Err(e) = self.remember_panel(id, &panel, version).await {
            warn!(id, error = %e, "Failed to cache panel entry");
        }
        Ok(Some(panel))
    }

    /// Rank the current catalog against a query.
    pub async fn search(
        &self,
        query: &Query,
        weights: &Weights,
        force_refresh: bool,
    ) -> Result<Vec<Ranked<PanelId, Panel>>, SyncError> {
        let catalog = self.get_catalog(force_refresh).await?;
        Ok(rank(catalog, query, weights))
    }

    /// What is cached locally. Never touches the network.
    pub async fn status(&self) -> Result<SyncStatus, SyncError> {
        Ok(SyncStatus {
            version: self.store.load_version().await?,
            synced_at: self.store.load_synced_at().await?,
            has_catalog: self.store.load_catalog_bytes().await?.is_some(),
        })
    }

    /// Resolve the catalog against an already fetched remote version.
    ///
    /// Returns the catalog with the dataset version it corresponds to.
    async fn catalog_at(&self, remote_version: u64, force_refresh: bool) -> Result<(Catalog, u64), SyncError> {
        if !force_refresh {
            let local_version = self.local_version().await;
            debug!(local_version, remote_version, "Comparing dataset versions");

            if local_version >= remote_version {
                if let Some(catalog) = self.cached_catalog().await {
                    debug!(count = catalog.len(), "Serving catalog from cache");
                    return Ok((catalog, local_version));
                }
            }
        }

        let bytes = self.remote.fetch_catalog().await?;
        let catalog = decode_catalog(&bytes)?;

        // Blob before marker: a crash in between leaves an old marker, which
        // only causes a redundant refetch.
        self.store.save_catalog_bytes(&bytes).await?;
        self.store.save_version(remote_version).await?;
        self.store.save_synced_at(Utc::now()).await?;

        info!(count = catalog.len(), version = remote_version, "Catalog refreshed");
        Ok((catalog, remote_version))
    }

    /// Cached dataset version, 0 when absent or unreadable.
    async fn local_version(&self) -> u64 {
        match self.store.load_version().await {
            Ok(version) => version.unwrap_or(0),
            Err(e) => {
                warn!(error = %e, "Failed to read cached version, treating as empty");
                0
            }
        }
    }

    /// The cached bulk catalog; anything missing or undecodable is a miss.
    async fn cached_catalog(&self) -> Option<Catalog> {
        let bytes = match self.store.load_catalog_bytes().await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                debug!("Version marker present but no cached catalog");
                return None;
            }
            Err(e) => {
                warn!(error = %e, "Failed to read cached catalog");
                return None;
            }
        };

        match decode_catalog(&bytes) {
            Ok(catalog) => Some(catalog),
            Err(e) => {
                warn!(error = %e, "Cached catalog is corrupt, refetching");
                None
            }
        }
    }

    /// A per-panel entry, if it is at least as new as both versions.
    async fn cached_panel(&self, id: PanelId, local_version: u64, remote_version: u64) -> Option<Panel> {
        let entry = match self.store.load_panel_entry(id).await {
            Ok(Some(entry)) => entry,
            Ok(None) => return None,
            Err(e) => {
                warn!(id, error = %e, "Failed to read cached panel");
                return None;
            }
        };

        if entry.version < local_version || entry.version < remote_version {
            debug!(id, cached = entry.version, local_version, remote_version, "Panel entry is stale");
            return None;
        }

        match decode_panel(&entry.bytes) {
            Ok(panel) => Some(panel),
            Err(e) => {
                warn!(id, error = %e, "Cached panel is corrupt, ignoring");
                None
            }
        }
    }

    async fn remember_panel(&self, id: PanelId, panel: &Panel, version: u64) -> Result<(), SyncError> {
        let entry = PanelEntry {
            version,
            bytes: encode_panel(panel)?,
        };
        self.store.save_panel_entry(id, &entry).await?;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
