//! Visibility levels and the sets of levels a listing may return.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::errors::{MemoError, MemoResult};

/// Access tier of a memo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Visibility {
    /// Visible to the owner only
    Private,
    /// Visible to any authenticated requester
    Protected,
    /// Visible to everyone
    Public,
}

impl Visibility {
    /// Every visibility level, in declaration order.
    pub const ALL: [Visibility; 3] = [Self::Private, Self::Protected, Self::Public];

    /// Wire name of the level.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Private => "PRIVATE",
            Self::Protected => "PROTECTED",
            Self::Public => "PUBLIC",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Visibility {
    type Err = MemoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "PRIVATE" => Ok(Self::Private),
            "PROTECTED" => Ok(Self::Protected),
            "PUBLIC" => Ok(Self::Public),
            other => Err(MemoError::invalid(format!(
                "unknown visibility {other:?}, expected one of PRIVATE, PROTECTED, PUBLIC"
            ))),
        }
    }
}

/// A non-empty set of visibility levels.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Visibility>", into = "Vec<Visibility>")]
pub struct VisibilitySet(BTreeSet<Visibility>);

impl VisibilitySet {
    /// Build a set from the given levels, or `None` when there are none.
    pub fn new(levels: impl IntoIterator<Item = Visibility>) -> Option<Self> {
        let levels: BTreeSet<_> = levels.into_iter().collect();
        (!levels.is_empty()).then_some(Self(levels))
    }

    /// Set holding exactly one level.
    pub fn single(level: Visibility) -> Self {
        Self(BTreeSet::from([level]))
    }

    /// Set holding every level.
    pub fn all() -> Self {
        Self(Visibility::ALL.into_iter().collect())
    }

    /// Parse a comma separated list such as `PUBLIC,PROTECTED`.
    ///
    /// Blank input means no filter was given and yields `Ok(None)`.
    pub fn parse_list(input: &str) -> MemoResult<Option<Self>> {
        let levels = input
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::parse)
            .collect::<MemoResult<Vec<Visibility>>>()?;
        Ok(Self::new(levels))
    }

    /// Add a level to the set.
    pub fn insert(&mut self, level: Visibility) {
        self.0.insert(level);
    }

    /// Whether the set contains `level`.
    pub fn contains(&self, level: Visibility) -> bool {
        self.0.contains(&level)
    }

    /// Number of levels in the set. Never zero.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; present for API symmetry with collections.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate the levels in order.
    pub fn iter(&self) -> impl Iterator<Item = Visibility> + '_ {
        self.0.iter().copied()
    }
}

impl TryFrom<Vec<Visibility>> for VisibilitySet {
    type Error = MemoError;

    fn try_from(levels: Vec<Visibility>) -> Result<Self, Self::Error> {
        Self::new(levels).ok_or_else(|| MemoError::invalid("visibility list must not be empty"))
    }
}

impl From<VisibilitySet> for Vec<Visibility> {
    fn from(set: VisibilitySet) -> Self {
        set.0.into_iter().collect()
    }
}

impl fmt::Display for VisibilitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<_> = self.iter().map(Visibility::as_str).collect();
        write!(f, "{{{}}}", names.join(", "))
    }
}

/// Visibility constraint applied by the store when listing memos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "levels", rename_all = "snake_case")]
pub enum VisibilityFilter {
    /// No constraint. Used when owners list their own memos.
    Unrestricted,
    /// Only memos whose visibility is in the set.
    Only(VisibilitySet),
}

impl VisibilityFilter {
    /// Whether a memo with `level` passes the filter.
    pub fn permits(&self, level: Visibility) -> bool {
        match self {
            Self::Unrestricted => true,
            Self::Only(set) => set.contains(level),
        }
    }

    /// The concrete levels this filter admits.
    pub fn levels(&self) -> VisibilitySet {
        match self {
            Self::Unrestricted => VisibilitySet::all(),
            Self::Only(set) => set.clone(),
        }
    }
}

impl fmt::Display for VisibilityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unrestricted => f.write_str("unrestricted"),
            Self::Only(set) => write!(f, "{set}"),
        }
    }
}
