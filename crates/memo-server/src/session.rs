//! Identity provider seam: turns request headers into a [`Requester`].

use axum::http::{header, HeaderMap};
use memo_core::{OwnerId, Requester};
use std::collections::HashMap;

/// Resolves the requester of an HTTP request
pub trait SessionResolver: Send + Sync {
    /// Requester for these headers; unknown or missing sessions are anonymous
    fn requester(&self, headers: &HeaderMap) -> Requester;
}

/// Fixed token table taken from configuration
#[derive(Debug, Clone)]
pub struct StaticSessions {
    cookie_name: String,
    tokens: HashMap<String, OwnerId>,
}

impl StaticSessions {
    /// Create a resolver reading `cookie_name` and bearer tokens
    pub fn new<I, T, O>(cookie_name: impl Into<String>, tokens: I) -> Self
    where
        I: IntoIterator<Item = (T, O)>,
        T: Into<String>,
        O: Into<OwnerId>,
    {
        Self {
            cookie_name: cookie_name.into(),
            tokens: tokens
                .into_iter()
                .map(|(token, owner)| (token.into(), owner.into()))
                .collect(),
        }
    }

    fn bearer_token(headers: &HeaderMap) -> Option<&str> {
        headers
            .get(header::AUTHORIZATION)?
            .to_str()
            .ok()?
            .strip_prefix("Bearer ")
            .map(str::trim)
    }

    fn cookie_token<'h>(&self, headers: &'h HeaderMap) -> Option<&'h str> {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|cookies| cookies.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == self.cookie_name)
            .map(|(_, value)| value.trim())
    }
}

impl SessionResolver for StaticSessions {
    fn requester(&self, headers: &HeaderMap) -> Requester {
        Self::bearer_token(headers)
            .or_else(|| self.cookie_token(headers))
            .and_then(|token| self.tokens.get(token))
            .map_or(Requester::Anonymous, |owner| {
                Requester::Authenticated(owner.clone())
            })
    }
}
