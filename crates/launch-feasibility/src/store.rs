//! Analysis persistence
//!
//! Save, lookup by id, list newest-first (optionally per session) and
//! most-recent-N. Two backends: in-memory and a single JSON file.

use crate::engine::AnalysisResult;
use crate::{FeasibilityError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::{debug, info};

#[async_trait]
pub trait AnalysisStore: Send + Sync {
    async fn save(&self, result: &AnalysisResult) -> Result<()>;

    async fn get(&self, id: &str) -> Result<Option<AnalysisResult>>;

    /// Newest first; `None` lists every session
    async fn list(&self, session_id: Option<&str>) -> Result<Vec<AnalysisResult>>;

    async fn recent(&self, limit: usize) -> Result<Vec<AnalysisResult>>;
}

/// Newest-first ordering shared by both backends. Insertion order breaks
/// timestamp ties so later saves come first.
fn newest_first<'a>(
    records: impl DoubleEndedIterator<Item = &'a AnalysisResult>,
    session_id: Option<&str>,
) -> Vec<AnalysisResult> {
    let mut out: Vec<AnalysisResult> = records
        .rev()
        .filter(|r| session_id.map_or(true, |s| r.session_id.as_deref() == Some(s)))
        .cloned()
        .collect();
    out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    out
}

/// Replace by id or append
fn upsert(records: &mut Vec<AnalysisResult>, result: &AnalysisResult) {
    match records.iter_mut().find(|r| r.id == result.id) {
        Some(existing) => *existing = result.clone(),
        None => records.push(result.clone()),
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    records: RwLock<Vec<AnalysisResult>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AnalysisStore for InMemoryStore {
    async fn save(&self, result: &AnalysisResult) -> Result<()> {
        upsert(&mut *self.records.write().await, result);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<AnalysisResult>> {
        Ok(self.records.read().await.iter().find(|r| r.id == id).cloned())
    }

    async fn list(&self, session_id: Option<&str>) -> Result<Vec<AnalysisResult>> {
        Ok(newest_first(self.records.read().await.iter(), session_id))
    }

    async fn recent(&self, limit: usize) -> Result<Vec<AnalysisResult>> {
        let mut all = newest_first(self.records.read().await.iter(), None);
        all.truncate(limit);
        Ok(all)
    }
}

/// All analyses in one JSON array, rewritten on every save
pub struct JsonFileStore {
    path: PathBuf,
    records: RwLock<Vec<AnalysisResult>>,
}

impl JsonFileStore {
    /// Open the file, or start empty when it does not exist yet
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let records = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.is_empty() => Vec::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        info!("Loaded {} analyses from {}", records.len(), path.display());
        Ok(Self {
            path,
            records: RwLock::new(records),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn flush(&self, records: &[AnalysisResult]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let bytes = serde_json::to_vec_pretty(records)?;
        let tmp = self.path.with_extension("json.tmp");
        let written = match tokio::fs::write(&tmp, bytes).await {
            Ok(()) => tokio::fs::rename(&tmp, &self.path).await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            if let Err(cleanup) = tokio::fs::remove_file(&tmp).await {
                debug!("Could not remove {}: {}", tmp.display(), cleanup);
            }
            return Err(FeasibilityError::Store(format!("{}: {}", self.path.display(), e)));
        }
        debug!("Wrote {} analyses to {}", records.len(), self.path.display());
        Ok(())
    }
}

#[async_trait]
impl AnalysisStore for JsonFileStore {
    async fn save(&self, result: &AnalysisResult) -> Result<()> {
        let mut records = self.records.write().await;
        let mut next = records.clone();
        upsert(&mut next, result);
        // Only a successful write becomes visible
        self.flush(&next).await?;
        *records = next;
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<AnalysisResult>> {
        Ok(self.records.read().await.iter().find(|r| r.id == id).cloned())
    }

    async fn list(&self, session_id: Option<&str>) -> Result<Vec<AnalysisResult>> {
        Ok(newest_first(self.records.read().await.iter(), session_id))
    }

    async fn recent(&self, limit: usize) -> Result<Vec<AnalysisResult>> {
        let mut all = newest_first(self.records.read().await.iter(), None);
        all.truncate(limit);
        Ok(all)
    }
}
