//! # Memo Store
//!
//! Handlers for the [`memo_core::MemoStore`] effect trait.
//!
//! Only an in-memory handler ships today. It keeps rows in id order so listings
//! can walk newest first without sorting.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// In-memory store handler
pub mod memory;

pub use memory::MemoryMemoStore;
