use crate::model::{Pagination, Recording, RecordingPage};
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Document store for recording metadata.
///
/// One JSON file per recording under the metadata directory, mirrored by an
/// in-memory index. A recording is only ever mutated by its own id-scoped
/// requests, so the per-store lock is all the coordination needed.
#[derive(Clone)]
pub struct RecordingStore {
    dir: PathBuf,
    index: Arc<RwLock<HashMap<String, Recording>>>,
}

impl RecordingStore {
    /// Open the store, creating the directory and loading existing documents.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create metadata directory {:?}", dir))?;

        let mut index = HashMap::new();
        for entry in std::fs::read_dir(&dir)
            .with_context(|| format!("Failed to read metadata directory {:?}", dir))?
        {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            let data = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read document {:?}", path))?;
            match serde_json::from_str::<Recording>(&data) {
                Ok(rec) => {
                    index.insert(rec.id.clone(), rec);
                }
                Err(e) => {
                    warn!("Skipping unreadable document {:?}: {}", path, e);
                }
            }
        }

        info!("Recording store opened: {} documents in {:?}", index.len(), dir);

        Ok(Self {
            dir,
            index: Arc::new(RwLock::new(index)),
        })
    }

    fn document_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    async fn persist(&self, rec: &Recording) -> Result<()> {
        let path = self.document_path(&rec.id);
        let data = serde_json::to_vec_pretty(rec).context("Failed to serialize recording")?;
        tokio::fs::write(&path, data)
            .await
            .with_context(|| format!("Failed to write document {:?}", path))?;
        Ok(())
    }

    /// Insert a newly created recording.
    pub async fn insert(&self, rec: Recording) -> Result<Recording> {
        self.persist(&rec).await?;
        let mut index = self.index.write().await;
        index.insert(rec.id.clone(), rec.clone());
        Ok(rec)
    }

    pub async fn get(&self, id: &str) -> Option<Recording> {
        let index = self.index.read().await;
        index.get(id).cloned()
    }

    /// Apply a mutation to a recording and persist the result.
    ///
    /// Refreshes `updated_at`; returns `None` when the id is unknown.
    pub async fn update<F>(&self, id: &str, mutate: F) -> Result<Option<Recording>>
    where
        F: FnOnce(&mut Recording),
    {
        let updated = {
            let mut index = self.index.write().await;
            match index.get_mut(id) {
                Some(rec) => {
                    mutate(rec);
                    rec.touch();
                    rec.clone()
                }
                None => return Ok(None),
            }
        };

        self.persist(&updated).await?;
        Ok(Some(updated))
    }

    /// Remove a recording document; returns it if it existed.
    pub async fn delete(&self, id: &str) -> Result<Option<Recording>> {
        let removed = {
            let mut index = self.index.write().await;
            index.remove(id)
        };

        if removed.is_some() {
            let path = self.document_path(id);
            tokio::fs::remove_file(&path)
                .await
                .with_context(|| format!("Failed to remove document {:?}", path))?;
        }

        Ok(removed)
    }

    /// Paginated list, newest first.
    pub async fn list(&self, page: u64, limit: u64) -> RecordingPage {
        let page = page.max(1);
        let limit = limit.clamp(1, 100);

        let mut recordings: Vec<Recording> = {
            let index = self.index.read().await;
            index.values().cloned().collect()
        };
        recordings.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let count = recordings.len() as u64;
        let total = count.div_ceil(limit).max(1);
        let start = ((page - 1) * limit) as usize;

        let recordings = recordings
            .into_iter()
            .skip(start)
            .take(limit as usize)
            .collect();

        RecordingPage {
            recordings,
            pagination: Pagination {
                current: page,
                total,
                count,
            },
        }
    }
}
