//! Memo records and the payloads used to create, patch and summarize them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identifiers::{MemoId, OwnerId};
use crate::visibility::Visibility;

/// A stored memo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Memo {
    /// Store-assigned identifier
    pub id: MemoId,
    /// Owner that created the memo
    #[serde(rename = "creatorId")]
    pub owner: OwnerId,
    /// Memo body
    pub content: String,
    /// Access tier
    pub visibility: Visibility,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when creating a memo. The owner comes from the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoDraft {
    /// Memo body
    pub content: String,
    /// Access tier, private unless stated
    #[serde(default = "default_visibility")]
    pub visibility: Visibility,
}

impl MemoDraft {
    /// Create a draft.
    pub fn new(content: impl Into<String>, visibility: Visibility) -> Self {
        Self {
            content: content.into(),
            visibility,
        }
    }
}

fn default_visibility() -> Visibility {
    Visibility::Private
}

/// Partial update of a memo. Absent fields are left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MemoPatch {
    /// Replacement body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Replacement access tier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
}

impl MemoPatch {
    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.content.is_none() && self.visibility.is_none()
    }

    /// Apply the patch to `memo`, stamping `now` as the update time.
    pub fn apply_to(&self, memo: &mut Memo, now: DateTime<Utc>) {
        if let Some(content) = &self.content {
            memo.content.clone_from(content);
        }
        if let Some(visibility) = self.visibility {
            memo.visibility = visibility;
        }
        memo.updated_at = now;
    }
}

/// Aggregate figures about one memo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoStats {
    /// Memo the figures describe
    pub id: MemoId,
    /// Unicode scalar count of the body
    pub characters: usize,
    /// Whitespace separated word count
    pub words: usize,
    /// Line count; an empty body has zero lines
    pub lines: usize,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

impl MemoStats {
    /// Compute the figures for `memo`.
    pub fn of(memo: &Memo) -> Self {
        Self {
            id: memo.id,
            characters: memo.content.chars().count(),
            words: memo.content.split_whitespace().count(),
            lines: memo.content.lines().count(),
            created_at: memo.created_at,
            updated_at: memo.updated_at,
        }
    }
}

/// Window over a listing, newest memos first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Number of memos to skip
    pub offset: usize,
    /// Maximum number of memos to return
    pub limit: usize,
}

impl Page {
    /// Create a page window.
    pub const fn new(offset: usize, limit: usize) -> Self {
        Self { offset, limit }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(0, 20)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn memo(content: &str) -> Memo {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        Memo {
            id: MemoId::new(1),
            owner: OwnerId::new("u1"),
            content: content.to_string(),
            visibility: Visibility::Private,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn stats_count_text() {
        let stats = MemoStats::of(&memo("buy milk\nand eggs"));
        assert_eq!(stats.characters, 17);
        assert_eq!(stats.words, 4);
        assert_eq!(stats.lines, 2);

        let empty = MemoStats::of(&memo(""));
        assert_eq!((empty.characters, empty.words, empty.lines), (0, 0, 0));
    }

    #[test]
    fn patch_only_touches_given_fields() {
        let mut target = memo("draft");
        let later = Utc.with_ymd_and_hms(2024, 5, 2, 8, 30, 0).unwrap();
        let patch = MemoPatch {
            visibility: Some(Visibility::Public),
            ..MemoPatch::default()
        };
        patch.apply_to(&mut target, later);
        assert_eq!(target.content, "draft");
        assert_eq!(target.visibility, Visibility::Public);
        assert_eq!(target.updated_at, later);
    }

    #[test]
    fn draft_visibility_defaults_to_private() {
        let draft: MemoDraft = serde_json::from_str(r#"{"content":"hi"}"#).unwrap();
        assert_eq!(draft.visibility, Visibility::Private);
    }

    #[test]
    fn memo_serializes_owner_as_creator_id() {
        let json = serde_json::to_value(memo("x")).unwrap();
        assert_eq!(json["creatorId"], "u1");
        assert_eq!(json["visibility"], "PRIVATE");
        assert!(json.get("createdAt").is_some());
    }
}
