//! # Memo Core
//!
//! **Purpose**: Domain types, the visibility resolution policy and the store
//! effect trait for the memo service.
//!
//! ## Core Concepts
//!
//! - **Visibility**: every memo is `PRIVATE`, `PROTECTED` or `PUBLIC`
//! - **Requester**: anonymous or authenticated, decided by the identity provider
//! - **Resolver**: pure function turning a listing request into an owner and a
//!   visibility filter, see [`policy::resolve`]
//! - **MemoStore**: async persistence interface implemented by `memo-store`
//!
//! ## What's NOT in this crate
//!
//! - Store handlers (belong in `memo-store`)
//! - Operation guards and orchestration (belong in `memo-service`)
//! - HTTP routing, sessions and configuration (belong in `memo-server`)

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Persistence effect trait and row filters
pub mod effects;

/// Unified error types
pub mod errors;

/// Memo and owner identifiers
pub mod identifiers;

/// Memo records, drafts, patches and stats
pub mod memo;

/// Visibility resolution policy
pub mod policy;

/// Visibility levels and sets
pub mod visibility;

pub use effects::{MemoFilter, MemoStore};
pub use errors::{MemoError, MemoResult, PolicyError};
pub use identifiers::{MemoId, OwnerId};
pub use memo::{Memo, MemoDraft, MemoPatch, MemoStats, Page};
pub use policy::{resolve, ListMode, ListQuery, Requester, ResolvedQuery};
pub use visibility::{Visibility, VisibilityFilter, VisibilitySet};
