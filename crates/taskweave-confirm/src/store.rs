//! Durable confirmation item store.
//!
//! The in-memory list is the source of truth for the running process; the
//! snapshot file is rewritten in full after every mutation, inside the same
//! critical section as the list change. Any agent thread may add items, so
//! one mutex guards both the list and the write.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, info};

use taskweave_core::Timestamp;

use crate::error::ConfirmError;
use crate::state_machine::validate_transition;
use crate::types::{ConfirmationItem, ConfirmationStatus};

struct StoreInner {
    items: Vec<ConfirmationItem>,
    next_seq: u64,
}

/// Durable queue of items awaiting human approval or rejection.
pub struct ConfirmationStore {
    storage_path: PathBuf,
    inner: Mutex<StoreInner>,
}

impl ConfirmationStore {
    /// Open a store backed by the given snapshot path.
    ///
    /// A missing file yields an empty store. The snapshot is written once at
    /// open so an unwritable path fails here, at startup, rather than on the
    /// first mutation mid-pipeline.
    pub fn open(path: &Path) -> Result<Self, ConfirmError> {
        let items = match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str::<Vec<ConfirmationItem>>(&content)
                .map_err(|e| ConfirmError::Storage(format!("corrupt snapshot: {}", e)))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(ConfirmError::Storage(e.to_string())),
        };

        let next_seq = items.iter().filter_map(|item| item_seq(&item.id)).max().unwrap_or(0) + 1;
        info!(
            path = %path.display(),
            items = items.len(),
            "confirmation store opened"
        );

        let store = Self {
            storage_path: path.to_path_buf(),
            inner: Mutex::new(StoreInner { items, next_seq }),
        };
        {
            let inner = store.lock()?;
            store.persist(&inner.items)?;
        }
        Ok(store)
    }

    /// Queue an item for confirmation, returning its generation-ordered id.
    pub fn add_for_confirmation(
        &self,
        item_type: &str,
        data: serde_json::Value,
        confidence: f64,
    ) -> Result<String, ConfirmError> {
        let mut inner = self.lock()?;
        let id = format!("{}-{:06}", item_type, inner.next_seq);
        inner.next_seq += 1;

        let item = ConfirmationItem {
            id: id.clone(),
            item_type: item_type.to_string(),
            data,
            confidence,
            status: ConfirmationStatus::Pending,
            created_at: Timestamp::now(),
            approved_at: None,
            rejected_at: None,
            rejection_reason: None,
            edited: false,
        };
        debug!(id = %item.id, confidence, "confirmation item queued");
        inner.items.push(item);
        self.persist(&inner.items)?;
        Ok(id)
    }

    /// Pending items, optionally filtered by type.
    pub fn pending(&self, item_type: Option<&str>) -> Vec<ConfirmationItem> {
        let inner = match self.lock() {
            Ok(inner) => inner,
            Err(_) => return Vec::new(),
        };
        inner
            .items
            .iter()
            .filter(|item| item.status == ConfirmationStatus::Pending)
            .filter(|item| item_type.map_or(true, |t| item.item_type == t))
            .cloned()
            .collect()
    }

    /// All approved items (audit/read path).
    pub fn approved(&self) -> Vec<ConfirmationItem> {
        let inner = match self.lock() {
            Ok(inner) => inner,
            Err(_) => return Vec::new(),
        };
        inner
            .items
            .iter()
            .filter(|item| item.status == ConfirmationStatus::Approved)
            .cloned()
            .collect()
    }

    /// Approve a pending item, optionally replacing its data with a human
    /// edit. Fails with `NotFound` for unknown ids and `InvalidTransition`
    /// for items already processed.
    pub fn approve(
        &self,
        id: &str,
        edited_data: Option<serde_json::Value>,
    ) -> Result<ConfirmationItem, ConfirmError> {
        let mut inner = self.lock()?;
        let item = inner
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| ConfirmError::NotFound(id.to_string()))?;

        validate_transition(item.status, ConfirmationStatus::Approved)?;
        item.status = ConfirmationStatus::Approved;
        item.approved_at = Some(Timestamp::now());
        if let Some(data) = edited_data {
            item.data = data;
            item.edited = true;
        }
        let approved = item.clone();
        self.persist(&inner.items)?;
        Ok(approved)
    }

    /// Reject a pending item with an optional reason. Symmetric to `approve`.
    pub fn reject(
        &self,
        id: &str,
        reason: Option<&str>,
    ) -> Result<ConfirmationItem, ConfirmError> {
        let mut inner = self.lock()?;
        let item = inner
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| ConfirmError::NotFound(id.to_string()))?;

        validate_transition(item.status, ConfirmationStatus::Rejected)?;
        item.status = ConfirmationStatus::Rejected;
        item.rejected_at = Some(Timestamp::now());
        item.rejection_reason = reason.map(str::to_string);
        let rejected = item.clone();
        self.persist(&inner.items)?;
        Ok(rejected)
    }

    /// Drop approved and rejected items, keeping only pending ones.
    pub fn clear_processed(&self) -> Result<(), ConfirmError> {
        let mut inner = self.lock()?;
        inner
            .items
            .retain(|item| item.status == ConfirmationStatus::Pending);
        self.persist(&inner.items)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, StoreInner>, ConfirmError> {
        self.inner
            .lock()
            .map_err(|e| ConfirmError::Storage(format!("lock poisoned: {}", e)))
    }

    fn persist(&self, items: &[ConfirmationItem]) -> Result<(), ConfirmError> {
        if let Some(parent) = self.storage_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConfirmError::Storage(e.to_string()))?;
        }
        let content = serde_json::to_string_pretty(items)
            .map_err(|e| ConfirmError::Storage(e.to_string()))?;
        std::fs::write(&self.storage_path, content).map_err(|e| ConfirmError::Storage(e.to_string()))
    }
}

/// Parse the trailing sequence number out of a `"{type}-{seq}"` id.
fn item_seq(id: &str) -> Option<u64> {
    id.rsplit('-').next()?.parse().ok()
}
