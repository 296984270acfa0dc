//! Request payload parsing and validation.
//!
//! Malformed input is rejected here, before the visibility policy runs.

use memo_core::{MemoDraft, MemoError, MemoPatch, MemoResult, OwnerId, VisibilitySet};
use memo_service::ListRequest;
use serde::Deserialize;

/// Query string of the listing endpoints
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    /// Owner whose memos are requested
    pub creator_id: Option<String>,
    /// Comma separated visibility levels
    #[serde(alias = "visibilityList")]
    pub visibility: Option<String>,
    /// Memos to skip
    pub offset: Option<usize>,
    /// Maximum memos to return
    pub limit: Option<usize>,
}

impl ListParams {
    /// Convert into a service listing request. Blank parameters count as absent.
    pub fn into_request(self) -> MemoResult<ListRequest> {
        let target_owner = self
            .creator_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .map(OwnerId::new);

        let visibilities = match self.visibility {
            Some(list) => VisibilitySet::parse_list(&list)?,
            None => None,
        };

        Ok(ListRequest {
            target_owner,
            visibilities,
            offset: self.offset,
            limit: self.limit,
        })
    }
}

/// Body checks shared by create and patch
#[derive(Debug, Clone, Copy)]
pub struct ContentRules {
    /// Longest body accepted, in characters
    pub max_length: usize,
}

impl ContentRules {
    fn check(&self, content: &str) -> MemoResult<()> {
        if content.trim().is_empty() {
            return Err(MemoError::invalid("content must not be empty"));
        }
        let length = content.chars().count();
        if length > self.max_length {
            return Err(MemoError::invalid(format!(
                "content is {length} characters, limit is {}",
                self.max_length
            )));
        }
        Ok(())
    }

    /// Validate a creation payload
    pub fn draft(&self, draft: MemoDraft) -> MemoResult<MemoDraft> {
        self.check(&draft.content)?;
        Ok(draft)
    }

    /// Validate a patch payload
    pub fn patch(&self, patch: MemoPatch) -> MemoResult<MemoPatch> {
        if patch.is_empty() {
            return Err(MemoError::invalid("patch must change content or visibility"));
        }
        if let Some(content) = &patch.content {
            self.check(content)?;
        }
        Ok(patch)
    }
}
