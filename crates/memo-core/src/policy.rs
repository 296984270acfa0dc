//! Visibility Resolution Policy
//!
//! Decides which visibility levels a listing request may see and whose memos it
//! targets. The resolver sits between the transport layer, which supplies the
//! requester identity and query parameters, and the store, which runs the
//! resulting filter.
//!
//! ```text
//! Transport → Requester + ListQuery → resolve() → ResolvedQuery → MemoStore::find_many
//!                                     ^^^^^^^^^
//! ```
//!
//! # Rules
//!
//! Evaluated in order, first match wins:
//!
//! 1. An explicit visibility set is used verbatim. Whether the requester owns
//!    the rows it asks for is the store's concern, not the resolver's.
//! 2. [`ListMode::Public`] yields `{PUBLIC}`, plus `PROTECTED` for authenticated
//!    requesters, across all owners.
//! 3. [`ListMode::Scoped`]:
//!    - anonymous requesters must name an owner and see `{PUBLIC}`;
//!    - authenticated requesters without a target list their own memos
//!      unrestricted; with a target they see `{PUBLIC, PROTECTED}`.
//!
//! `PRIVATE` never appears in a computed default set.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::PolicyError;
use crate::identifiers::OwnerId;
use crate::visibility::{Visibility, VisibilityFilter, VisibilitySet};

/// Who is asking, as established by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Requester {
    /// No session was presented
    Anonymous,
    /// A session resolved to this owner
    Authenticated(OwnerId),
}

impl Requester {
    /// The authenticated owner, if any.
    pub fn owner(&self) -> Option<&OwnerId> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(owner) => Some(owner),
        }
    }

    /// Whether a session was presented.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}

/// Which listing endpoint is being served.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListMode {
    /// Owner-aware listing, the default endpoint
    #[default]
    Scoped,
    /// Public and protected memos of every owner
    Public,
}

/// Listing request as received from the transport layer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ListQuery {
    /// Whose memos are requested
    pub target_owner: Option<OwnerId>,
    /// Visibility levels asked for explicitly
    pub explicit_visibilities: Option<VisibilitySet>,
    /// Endpoint being served
    pub mode: ListMode,
}

impl ListQuery {
    /// Query for the owner-aware endpoint.
    pub fn scoped() -> Self {
        Self::default()
    }

    /// Query for the public endpoint.
    pub fn public() -> Self {
        Self {
            mode: ListMode::Public,
            ..Self::default()
        }
    }

    /// Target a specific owner.
    pub fn with_target_owner(mut self, owner: impl Into<OwnerId>) -> Self {
        self.target_owner = Some(owner.into());
        self
    }

    /// Ask for explicit visibility levels.
    pub fn with_visibilities(mut self, levels: VisibilitySet) -> Self {
        self.explicit_visibilities = Some(levels);
        self
    }
}

/// Outcome of resolution, ready to hand to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedQuery {
    /// Owner whose memos are listed; `None` spans all owners
    pub effective_owner: Option<OwnerId>,
    /// Levels the listing is restricted to
    pub visibilities: VisibilityFilter,
}

/// Resolve a listing request into the owner and visibility levels it may see.
///
/// Pure and deterministic; the query is not modified.
pub fn resolve(query: &ListQuery, requester: &Requester) -> Result<ResolvedQuery, PolicyError> {
    let resolved = resolve_rules(query, requester);
    match &resolved {
        Ok(resolved) => debug!(
            mode = ?query.mode,
            authenticated = requester.is_authenticated(),
            owner = ?resolved.effective_owner,
            visibilities = %resolved.visibilities,
            "resolved memo listing"
        ),
        Err(error) => debug!(mode = ?query.mode, %error, "rejected memo listing"),
    }
    resolved
}

fn resolve_rules(query: &ListQuery, requester: &Requester) -> Result<ResolvedQuery, PolicyError> {
    if let Some(explicit) = &query.explicit_visibilities {
        return Ok(resolve_explicit(query, requester, explicit));
    }

    match query.mode {
        ListMode::Public => Ok(resolve_public(requester)),
        ListMode::Scoped => resolve_scoped(query, requester),
    }
}

/// Rule 1: the caller named its levels.
fn resolve_explicit(
    query: &ListQuery,
    requester: &Requester,
    explicit: &VisibilitySet,
) -> ResolvedQuery {
    let effective_owner = match (&query.target_owner, query.mode) {
        (Some(target), _) => Some(target.clone()),
        (None, ListMode::Scoped) => requester.owner().cloned(),
        (None, ListMode::Public) => None,
    };

    ResolvedQuery {
        effective_owner,
        visibilities: VisibilityFilter::Only(explicit.clone()),
    }
}

/// Rule 2: everything public, plus protected for signed-in requesters.
fn resolve_public(requester: &Requester) -> ResolvedQuery {
    let mut levels = VisibilitySet::single(Visibility::Public);
    if requester.is_authenticated() {
        levels.insert(Visibility::Protected);
    }

    ResolvedQuery {
        effective_owner: None,
        visibilities: VisibilityFilter::Only(levels),
    }
}

/// Rule 3: owner-aware listing.
fn resolve_scoped(query: &ListQuery, requester: &Requester) -> Result<ResolvedQuery, PolicyError> {
    match (requester, &query.target_owner) {
        (Requester::Anonymous, None) => Err(PolicyError::AmbiguousOwner),
        (Requester::Anonymous, Some(target)) => Ok(ResolvedQuery {
            effective_owner: Some(target.clone()),
            visibilities: VisibilityFilter::Only(VisibilitySet::single(Visibility::Public)),
        }),
        (Requester::Authenticated(self_id), None) => Ok(ResolvedQuery {
            effective_owner: Some(self_id.clone()),
            visibilities: VisibilityFilter::Unrestricted,
        }),
        // Naming yourself as target still narrows to the shared levels.
        (Requester::Authenticated(_), Some(target)) => Ok(ResolvedQuery {
            effective_owner: Some(target.clone()),
            visibilities: VisibilityFilter::Only(shared_levels()),
        }),
    }
}

fn shared_levels() -> VisibilitySet {
    let mut levels = VisibilitySet::single(Visibility::Public);
    levels.insert(Visibility::Protected);
    levels
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str) -> Requester {
        Requester::Authenticated(OwnerId::new(id))
    }

    fn only(levels: &[Visibility]) -> VisibilityFilter {
        VisibilityFilter::Only(VisibilitySet::new(levels.iter().copied()).unwrap())
    }

    #[test]
    fn anonymous_scoped_without_owner_is_ambiguous() {
        let result = resolve(&ListQuery::scoped(), &Requester::Anonymous);
        assert_eq!(result, Err(PolicyError::AmbiguousOwner));
    }

    #[test]
    fn anonymous_scoped_explicit_levels_bypass_owner_check() {
        let query =
            ListQuery::scoped().with_visibilities(VisibilitySet::single(Visibility::Public));
        let resolved = resolve(&query, &Requester::Anonymous).unwrap();
        assert_eq!(resolved.effective_owner, None);
        assert_eq!(resolved.visibilities, only(&[Visibility::Public]));
    }

    #[test]
    fn anonymous_scoped_with_owner_sees_public() {
        let query = ListQuery::scoped().with_target_owner("u1");
        let resolved = resolve(&query, &Requester::Anonymous).unwrap();
        assert_eq!(resolved.effective_owner, Some(OwnerId::new("u1")));
        assert_eq!(resolved.visibilities, only(&[Visibility::Public]));
    }

    #[test]
    fn authenticated_scoped_without_owner_lists_self_unrestricted() {
        let resolved = resolve(&ListQuery::scoped(), &user("u1")).unwrap();
        assert_eq!(resolved.effective_owner, Some(OwnerId::new("u1")));
        assert_eq!(resolved.visibilities, VisibilityFilter::Unrestricted);
    }

    #[test]
    fn authenticated_scoped_with_other_owner_sees_shared_levels() {
        let query = ListQuery::scoped().with_target_owner("u2");
        let resolved = resolve(&query, &user("u1")).unwrap();
        assert_eq!(resolved.effective_owner, Some(OwnerId::new("u2")));
        assert_eq!(
            resolved.visibilities,
            only(&[Visibility::Public, Visibility::Protected])
        );
    }

    #[test]
    fn authenticated_scoped_targeting_self_still_narrows() {
        let query = ListQuery::scoped().with_target_owner("u1");
        let resolved = resolve(&query, &user("u1")).unwrap();
        assert_eq!(resolved.effective_owner, Some(OwnerId::new("u1")));
        assert_eq!(
            resolved.visibilities,
            only(&[Visibility::Public, Visibility::Protected])
        );
    }

    #[test]
    fn public_mode_anonymous_sees_public() {
        let resolved = resolve(&ListQuery::public(), &Requester::Anonymous).unwrap();
        assert_eq!(resolved.effective_owner, None);
        assert_eq!(resolved.visibilities, only(&[Visibility::Public]));
    }

    #[test]
    fn public_mode_authenticated_adds_protected() {
        let resolved = resolve(&ListQuery::public(), &user("u1")).unwrap();
        assert_eq!(resolved.effective_owner, None);
        assert_eq!(
            resolved.visibilities,
            only(&[Visibility::Public, Visibility::Protected])
        );
    }

    #[test]
    fn public_mode_ignores_target_owner_without_explicit_levels() {
        let query = ListQuery::public().with_target_owner("u2");
        let resolved = resolve(&query, &Requester::Anonymous).unwrap();
        assert_eq!(resolved.effective_owner, None);
    }

    #[test]
    fn explicit_private_is_passed_through_for_every_requester() {
        let private = VisibilitySet::single(Visibility::Private);
        for requester in [Requester::Anonymous, user("u1")] {
            for base in [ListQuery::scoped(), ListQuery::public()] {
                let query = base.with_target_owner("u2").with_visibilities(private.clone());
                let resolved = resolve(&query, &requester).unwrap();
                assert_eq!(resolved.visibilities, only(&[Visibility::Private]));
                assert_eq!(resolved.effective_owner, Some(OwnerId::new("u2")));
            }
        }
    }

    #[test]
    fn explicit_levels_scoped_default_to_self_owner() {
        let query =
            ListQuery::scoped().with_visibilities(VisibilitySet::single(Visibility::Private));
        let resolved = resolve(&query, &user("u1")).unwrap();
        assert_eq!(resolved.effective_owner, Some(OwnerId::new("u1")));
    }

    #[test]
    fn resolve_does_not_touch_query() {
        let query = ListQuery::scoped();
        let before = query.clone();
        let _ = resolve(&query, &user("u1"));
        assert_eq!(query, before);
    }
}
