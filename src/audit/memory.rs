use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{AuditRecord, AuditStore};
use crate::error::AuditError;

/// In-process audit store backed by a `BTreeMap<run_id, record>`
#[derive(Debug, Default)]
pub struct MemoryAuditStore {
    records: Mutex<BTreeMap<String, AuditRecord>>,
}

impl MemoryAuditStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, AuditRecord>>, AuditError> {
        self.records
            .lock()
            .map_err(|_| AuditError::Unavailable("audit store lock poisoned".to_string()))
    }
}

#[async_trait]
impl AuditStore for MemoryAuditStore {
    async fn append(&self, record: &AuditRecord) -> Result<(), AuditError> {
        let mut records = self.lock()?;
        if records.contains_key(&record.run_id) {
            return Err(AuditError::AlreadyExists(record.run_id.clone()));
        }
        records.insert(record.run_id.clone(), record.clone());
        Ok(())
    }

    async fn get(&self, run_id: &str) -> Result<AuditRecord, AuditError> {
        self.lock()?
            .get(run_id)
            .cloned()
            .ok_or_else(|| AuditError::NotFound(run_id.to_string()))
    }

    async fn list(&self) -> Result<Vec<String>, AuditError> {
        Ok(self.lock()?.keys().cloned().collect())
    }
}
