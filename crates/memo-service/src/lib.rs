//! # Memo Service
//!
//! Operations bound to routes by the transport layer: `createMemo`,
//! `deleteMemo`, `patchMemo`, `getMemoStats`, `getMemoList` and `getAllMemos`.
//! Each takes the requester as a plain value; nothing here reads sessions.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Page window limits
pub mod paging;

/// Guarded memo operations
pub mod service;

pub use paging::PageLimits;
pub use service::{require_session, ListRequest, MemoService};
