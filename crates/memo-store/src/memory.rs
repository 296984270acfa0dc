//! In-memory memo store handler

use async_trait::async_trait;
use chrono::Utc;
use memo_core::{
    Memo, MemoDraft, MemoError, MemoFilter, MemoId, MemoPatch, MemoResult, MemoStats, MemoStore,
    OwnerId,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::trace;

#[derive(Debug)]
struct MemoTable {
    next_id: u64,
    rows: BTreeMap<MemoId, Memo>,
}

impl Default for MemoTable {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }
}

/// In-memory memo store, keyed by id
///
/// Clones share the same table.
#[derive(Debug, Clone, Default)]
pub struct MemoryMemoStore {
    table: Arc<RwLock<MemoTable>>,
}

impl MemoryMemoStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored memos
    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    /// Whether the store holds no memos
    pub async fn is_empty(&self) -> bool {
        self.table.read().await.rows.is_empty()
    }
}

fn missing(id: MemoId) -> MemoError {
    MemoError::not_found(format!("memo {id}"))
}

#[async_trait]
impl MemoStore for MemoryMemoStore {
    async fn create(&self, owner: &OwnerId, draft: MemoDraft) -> MemoResult<Memo> {
        let mut table = self.table.write().await;
        let id = MemoId::new(table.next_id);
        table.next_id += 1;

        let now = Utc::now();
        let memo = Memo {
            id,
            owner: owner.clone(),
            content: draft.content,
            visibility: draft.visibility,
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(id, memo.clone());
        trace!(%id, %owner, "stored memo");
        Ok(memo)
    }

    async fn patch(&self, id: MemoId, patch: MemoPatch) -> MemoResult<Memo> {
        let mut table = self.table.write().await;
        let memo = table.rows.get_mut(&id).ok_or_else(|| missing(id))?;
        patch.apply_to(memo, Utc::now());
        Ok(memo.clone())
    }

    async fn delete(&self, id: MemoId) -> MemoResult<()> {
        let mut table = self.table.write().await;
        table.rows.remove(&id).map(|_| ()).ok_or_else(|| missing(id))
    }

    async fn find_many(&self, filter: &MemoFilter) -> MemoResult<Vec<Memo>> {
        let table = self.table.read().await;
        let memos = table
            .rows
            .values()
            .rev()
            .filter(|memo| filter.matches(memo))
            .skip(filter.page.offset)
            .take(filter.page.limit)
            .cloned()
            .collect();
        Ok(memos)
    }

    async fn stats_for(&self, id: MemoId) -> MemoResult<MemoStats> {
        let table = self.table.read().await;
        table.rows.get(&id).map(MemoStats::of).ok_or_else(|| missing(id))
    }
}
