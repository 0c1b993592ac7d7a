use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use super::{is_valid_run_id, AuditRecord, AuditStore};
use crate::error::AuditError;

/// One pretty-printed JSON document per run at `<dir>/<run_id>.json`.
///
/// Files are opened with create-new semantics, so a record can never be
/// overwritten through this store.
#[derive(Debug, Clone)]
pub struct FileAuditStore {
    dir: PathBuf,
}

impl FileAuditStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, run_id: &str) -> Result<PathBuf, AuditError> {
        if !is_valid_run_id(run_id) {
            return Err(AuditError::NotFound(run_id.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", run_id)))
    }
}

/// Write a freshly created record file. A partial file would block any later
/// append for the same run, so it is removed when the write fails.
async fn write_or_remove<W>(path: &Path, file: &mut W, bytes: &[u8]) -> Result<(), AuditError>
where
    W: AsyncWrite + Unpin,
{
    let written = async {
        file.write_all(bytes).await?;
        file.flush().await
    }
    .await;

    if let Err(e) = written {
        if let Err(remove_err) = tokio::fs::remove_file(path).await {
            tracing::warn!("Failed to remove partial audit file {:?}: {}", path, remove_err);
        }
        return Err(AuditError::Io(e));
    }
    Ok(())
}

#[async_trait]
impl AuditStore for FileAuditStore {
    async fn append(&self, record: &AuditRecord) -> Result<(), AuditError> {
        let path = self.record_path(&record.run_id)?;
        let json = serde_json::to_string_pretty(record)?;

        tokio::fs::create_dir_all(&self.dir).await?;

        let mut file = match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                return Err(AuditError::AlreadyExists(record.run_id.clone()));
            }
            Err(e) => return Err(AuditError::Io(e)),
        };

        write_or_remove(&path, &mut file, json.as_bytes()).await
    }

    async fn get(&self, run_id: &str) -> Result<AuditRecord, AuditError> {
        let path = self.record_path(run_id)?;
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AuditError::NotFound(run_id.to_string()));
            }
            Err(e) => return Err(AuditError::Io(e)),
        };
        Ok(serde_json::from_str(&content)?)
    }

    async fn list(&self) -> Result<Vec<String>, AuditError> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(AuditError::Io(e)),
        };

        let mut run_ids = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                run_ids.push(stem.to_string());
            }
        }
        run_ids.sort();
        Ok(run_ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::pin::Pin;
    use std::task::{Context, Poll};

    /// Accepts a few bytes, then fails like a full disk
    struct FullDisk {
        accepted: usize,
    }

    impl AsyncWrite for FullDisk {
        fn poll_write(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &[u8],
        ) -> Poll<std::io::Result<usize>> {
            if self.accepted >= 8 {
                return Poll::Ready(Err(std::io::Error::other("no space left on device")));
            }
            let n = buf.len().min(8 - self.accepted);
            self.accepted += n;
            Poll::Ready(Ok(n))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
        ) -> Poll<std::io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    fn record(run_id: &str) -> AuditRecord {
        AuditRecord {
            run_id: run_id.to_string(),
            sanitized_spec: "Add [EMAIL] to footer".to_string(),
            responses: Vec::new(),
            quorum_result: false,
            agreed_plan: None,
            agreed_plan_hash: None,
            performance_metrics: None,
            success: false,
            error: Some("No quorum reached: AI providers disagree".to_string()),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_append_and_get() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileAuditStore::new(dir.path().join("audit"));

        store.append(&record("run_1_aa")).await.unwrap();
        let loaded = store.get("run_1_aa").await.unwrap();

        assert_eq!(loaded, record_with_time("run_1_aa", loaded.created_at));
        assert!(dir.path().join("audit/run_1_aa.json").exists());
    }

    fn record_with_time(run_id: &str, created_at: chrono::DateTime<Utc>) -> AuditRecord {
        AuditRecord {
            created_at,
            ..record(run_id)
        }
    }

    #[tokio::test]
    async fn test_append_is_create_only() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileAuditStore::new(dir.path());

        store.append(&record("run_2_bb")).await.unwrap();
        let err = store.append(&record("run_2_bb")).await.unwrap_err();
        assert!(matches!(err, AuditError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_list_sorted_and_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileAuditStore::new(dir.path().join("missing"));
        assert!(store.list().await.unwrap().is_empty());

        let store = FileAuditStore::new(dir.path());
        store.append(&record("run_2")).await.unwrap();
        store.append(&record("run_1")).await.unwrap();
        std::fs::write(dir.path().join("notes.txt"), "x").unwrap();

        assert_eq!(store.list().await.unwrap(), vec!["run_1", "run_2"]);
    }

    #[tokio::test]
    async fn test_get_unknown_and_invalid_ids() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileAuditStore::new(dir.path());

        assert!(matches!(
            store.get("run_missing").await,
            Err(AuditError::NotFound(_))
        ));
        assert!(matches!(
            store.get("../secrets").await,
            Err(AuditError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_failed_write_leaves_no_partial_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileAuditStore::new(dir.path());
        let path = dir.path().join("run_3_cc.json");
        std::fs::write(&path, "{\"runId\":").unwrap();

        let json = serde_json::to_string(&record("run_3_cc")).unwrap();
        let err = write_or_remove(&path, &mut FullDisk { accepted: 0 }, json.as_bytes())
            .await
            .unwrap_err();

        assert!(matches!(err, AuditError::Io(_)));
        assert!(!path.exists());

        // The run can still be recorded afterwards
        store.append(&record("run_3_cc")).await.unwrap();
        assert_eq!(store.get("run_3_cc").await.unwrap().run_id, "run_3_cc");
    }
}
