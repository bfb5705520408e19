//! Per-request scratch directories for converted files
//!
//! Layout: `<root>/<request_id>/<sanitized title>.mp3`. Keying by request id
//! keeps two conversions of the same video from overwriting each other.
//!
//! Requests still being converted are marked in-flight and never pruned.
//! Finished requests age from their newest entry, so a staged MP3 lives for
//! the full retention period after it was written.

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, SystemTime};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// A converted file waiting to be downloaded
#[derive(Debug, Clone, Serialize)]
pub struct StagedFile {
    pub request_id: Uuid,
    pub path: PathBuf,
    pub file_name: String,
    pub size_bytes: u64,
}

#[derive(Debug, Clone)]
pub struct StagingArea {
    root: PathBuf,

    /// Request ids with a conversion still running; shared by all clones
    in_flight: Arc<Mutex<HashSet<Uuid>>>,
}

/// Keeps a request out of pruning until dropped
#[derive(Debug)]
pub struct InFlight {
    request_id: Uuid,
    in_flight: Arc<Mutex<HashSet<Uuid>>>,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        lock(&self.in_flight).remove(&self.request_id);
    }
}

// A poisoned set is still a valid set of ids
fn lock(set: &Mutex<HashSet<Uuid>>) -> MutexGuard<'_, HashSet<Uuid>> {
    set.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl StagingArea {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn request_dir(&self, request_id: Uuid) -> PathBuf {
        self.root.join(request_id.to_string())
    }

    /// Mark `request_id` as being converted until the guard is dropped.
    pub fn begin(&self, request_id: Uuid) -> InFlight {
        lock(&self.in_flight).insert(request_id);
        InFlight {
            request_id,
            in_flight: Arc::clone(&self.in_flight),
        }
    }

    pub fn is_in_flight(&self, request_id: Uuid) -> bool {
        lock(&self.in_flight).contains(&request_id)
    }

    /// Create the request's directory (and the root) if missing.
    pub async fn allocate(&self, request_id: Uuid) -> Result<PathBuf> {
        let dir = self.request_dir(request_id);
        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("Failed to create staging directory {}", dir.display()))?;
        debug!("Allocated staging directory {}", dir.display());
        Ok(dir)
    }

    /// Find the MP3 staged for `request_id`, if any.
    pub async fn locate(&self, request_id: Uuid) -> Result<Option<StagedFile>> {
        let dir = self.request_dir(request_id);
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read staging directory {}", dir.display()))
            }
        };

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let is_mp3 = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("mp3"));
            if !is_mp3 {
                continue;
            }

            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }

            return Ok(Some(StagedFile {
                request_id,
                file_name: entry.file_name().to_string_lossy().into_owned(),
                path,
                size_bytes: metadata.len(),
            }));
        }

        Ok(None)
    }

    /// Remove finished request directories whose newest entry is at least
    /// `max_age` old.
    ///
    /// Entries whose names are not request ids are left alone, as are
    /// requests still in flight.
    pub async fn prune_older_than(&self, max_age: Duration) -> Result<usize> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to read staging root {}", self.root.display())
                })
            }
        };

        let now = SystemTime::now();
        let mut removed = 0;

        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let Some(request_id) = name.to_str().and_then(|n| Uuid::parse_str(n).ok()) else {
                continue;
            };
            if self.is_in_flight(request_id) {
                debug!("Skipping in-flight request {}", request_id);
                continue;
            }

            let metadata = entry.metadata().await?;
            if !metadata.is_dir() {
                continue;
            }

            let age = newest_modification(&entry.path(), metadata.modified().ok())
                .await
                .and_then(|modified| now.duration_since(modified).ok())
                .unwrap_or(Duration::ZERO);
            if age < max_age {
                continue;
            }

            match tokio::fs::remove_dir_all(entry.path()).await {
                Ok(()) => removed += 1,
                Err(e) => warn!("Failed to prune {}: {}", entry.path().display(), e),
            }
        }

        if removed > 0 {
            info!("Pruned {} staged request(s) from {}", removed, self.root.display());
        }
        Ok(removed)
    }
}

/// Latest mtime of `dir` and the files directly inside it.
async fn newest_modification(dir: &Path, dir_modified: Option<SystemTime>) -> Option<SystemTime> {
    let mut newest = dir_modified;

    let Ok(mut entries) = tokio::fs::read_dir(dir).await else {
        return newest;
    };
    while let Ok(Some(entry)) = entries.next_entry().await {
        let modified = match entry.metadata().await.and_then(|m| m.modified()) {
            Ok(modified) => modified,
            Err(_) => continue,
        };
        newest = Some(newest.map_or(modified, |n| n.max(modified)));
    }

    newest
}

/// Sweep the staging area every `retention / 2` (at least once a minute apart).
pub fn spawn_pruner(staging: StagingArea, retention: Duration) -> JoinHandle<()> {
    let period = (retention / 2).max(Duration::from_secs(60));

    tokio::spawn(async move {
        info!(
            "Staging pruner started (retention {}s, every {}s)",
            retention.as_secs(),
            period.as_secs()
        );
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            if let Err(e) = staging.prune_older_than(retention).await {
                warn!("Staging prune failed: {:#}", e);
            }
        }
    })
}
