//! Memo operations exposed to the transport layer.
//!
//! Mutations and stats require an authenticated requester; that is an identity
//! check, not an ownership check. Listings go through [`memo_core::resolve`]
//! before the store is queried, and the store only returns private memos to
//! their owner.

use memo_core::{
    resolve, ListMode, ListQuery, Memo, MemoDraft, MemoError, MemoFilter, MemoId, MemoPatch,
    MemoResult, MemoStats, MemoStore, OwnerId, Requester, VisibilitySet,
};
use std::sync::Arc;
use tracing::{info, warn};

use crate::paging::PageLimits;

/// Listing parameters shared by both listing endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListRequest {
    /// Whose memos are requested
    pub target_owner: Option<OwnerId>,
    /// Visibility levels asked for explicitly
    pub visibilities: Option<VisibilitySet>,
    /// Memos to skip
    pub offset: Option<usize>,
    /// Maximum memos to return
    pub limit: Option<usize>,
}

impl ListRequest {
    fn into_query(self, mode: ListMode) -> (ListQuery, Option<usize>, Option<usize>) {
        let query = ListQuery {
            target_owner: self.target_owner,
            explicit_visibilities: self.visibilities,
            mode,
        };
        (query, self.offset, self.limit)
    }
}

/// Memo operations over a store handler
pub struct MemoService<S> {
    store: Arc<S>,
    limits: PageLimits,
}

impl<S> Clone for MemoService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            limits: self.limits,
        }
    }
}

impl<S: MemoStore> MemoService<S> {
    /// Create a service with default page limits
    pub fn new(store: S) -> Self {
        Self::with_limits(store, PageLimits::default())
    }

    /// Create a service with explicit page limits
    pub fn with_limits(store: S, limits: PageLimits) -> Self {
        Self {
            store: Arc::new(store),
            limits,
        }
    }

    /// The underlying store handler
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Create a memo owned by the requester
    pub async fn create_memo(&self, requester: &Requester, draft: MemoDraft) -> MemoResult<Memo> {
        let owner = require_session(requester, "createMemo")?;
        let memo = self.store.create(owner, draft).await?;
        info!(id = %memo.id, %owner, visibility = %memo.visibility, "created memo");
        Ok(memo)
    }

    /// Delete a memo by id
    pub async fn delete_memo(&self, requester: &Requester, id: MemoId) -> MemoResult<()> {
        let owner = require_session(requester, "deleteMemo")?;
        self.store.delete(id).await?;
        info!(%id, requested_by = %owner, "deleted memo");
        Ok(())
    }

    /// Apply a partial update to a memo
    pub async fn patch_memo(
        &self,
        requester: &Requester,
        id: MemoId,
        patch: MemoPatch,
    ) -> MemoResult<Memo> {
        let owner = require_session(requester, "patchMemo")?;
        let memo = self.store.patch(id, patch).await?;
        info!(%id, requested_by = %owner, "patched memo");
        Ok(memo)
    }

    /// Aggregate figures for one memo
    pub async fn get_memo_stats(&self, requester: &Requester, id: MemoId) -> MemoResult<MemoStats> {
        require_session(requester, "getMemoStats")?;
        self.store.stats_for(id).await
    }

    /// Owner-aware listing
    pub async fn get_memo_list(
        &self,
        requester: &Requester,
        request: ListRequest,
    ) -> MemoResult<Vec<Memo>> {
        self.list(requester, request, ListMode::Scoped).await
    }

    /// Public and protected memos across all owners
    pub async fn get_all_memos(
        &self,
        requester: &Requester,
        request: ListRequest,
    ) -> MemoResult<Vec<Memo>> {
        self.list(requester, request, ListMode::Public).await
    }

    async fn list(
        &self,
        requester: &Requester,
        request: ListRequest,
        mode: ListMode,
    ) -> MemoResult<Vec<Memo>> {
        let (query, offset, limit) = request.into_query(mode);
        let resolved = resolve(&query, requester).map_err(|error| {
            warn!(?mode, %error, "memo listing rejected");
            MemoError::from(error)
        })?;
        let page = self.limits.clamp(offset, limit);
        let filter = MemoFilter::from_resolved(resolved, requester.owner().cloned(), page);
        self.store.find_many(&filter).await
    }
}

/// Guard for operations that need a session; returns the session owner
pub fn require_session<'a>(requester: &'a Requester, operation: &str) -> MemoResult<&'a OwnerId> {
    requester.owner().ok_or_else(|| {
        warn!(operation, "anonymous requester on guarded operation");
        MemoError::unauthenticated(format!("{operation} requires a session"))
    })
}
