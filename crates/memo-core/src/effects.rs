//! Memo Store Effects
//!
//! Persistence interface consumed by the service layer. Handlers live in
//! `memo-store`; the service is generic over this trait so tests and
//! alternative backends plug in without touching the policy.
//!
//! The visibility policy decides which owner and levels a listing asks for.
//! Handlers add the row-level ownership check: a `PRIVATE` memo is returned
//! only when the viewer owns it, whatever levels the filter names.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::MemoResult;
use crate::identifiers::{MemoId, OwnerId};
use crate::memo::{Memo, MemoDraft, MemoPatch, MemoStats, Page};
use crate::policy::ResolvedQuery;
use crate::visibility::{Visibility, VisibilityFilter};

/// Row filter for [`MemoStore::find_many`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoFilter {
    /// Restrict to this owner; `None` spans all owners
    pub owner: Option<OwnerId>,
    /// Restrict to these visibility levels
    pub visibilities: VisibilityFilter,
    /// Requester the rows are listed for; `None` when anonymous
    pub viewer: Option<OwnerId>,
    /// Window over the matching rows
    pub page: Page,
}

impl MemoFilter {
    /// Build a filter from a resolved listing request.
    pub fn from_resolved(resolved: ResolvedQuery, viewer: Option<OwnerId>, page: Page) -> Self {
        Self {
            owner: resolved.effective_owner,
            visibilities: resolved.visibilities,
            viewer,
            page,
        }
    }

    /// Whether `memo` matches the owner and visibility constraints and the
    /// viewer may read it.
    pub fn matches(&self, memo: &Memo) -> bool {
        self.owner.as_ref().map_or(true, |owner| &memo.owner == owner)
            && self.visibilities.permits(memo.visibility)
            && self.viewer_may_read(memo)
    }

    /// Private memos are readable by their owner only.
    pub fn viewer_may_read(&self, memo: &Memo) -> bool {
        memo.visibility != Visibility::Private || self.viewer.as_ref() == Some(&memo.owner)
    }
}

/// Memo persistence operations
#[async_trait]
pub trait MemoStore: Send + Sync {
    /// Store a new memo owned by `owner`
    async fn create(&self, owner: &OwnerId, draft: MemoDraft) -> MemoResult<Memo>;

    /// Apply a partial update; fails with `NotFound` for unknown ids
    async fn patch(&self, id: MemoId, patch: MemoPatch) -> MemoResult<Memo>;

    /// Remove a memo; fails with `NotFound` for unknown ids
    async fn delete(&self, id: MemoId) -> MemoResult<()>;

    /// List matching memos, newest first
    async fn find_many(&self, filter: &MemoFilter) -> MemoResult<Vec<Memo>>;

    /// Aggregate figures for one memo
    async fn stats_for(&self, id: MemoId) -> MemoResult<MemoStats>;
}
