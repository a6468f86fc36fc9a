//! Bearer-token session resolution.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;

use super::state::AppState;
use crate::config::SessionEntry;
use crate::services::{Identity, RequestContext};

/// Maps a bearer token to the caller's identity.
pub trait SessionResolver: Send + Sync {
    fn resolve(&self, token: &str) -> Option<Identity>;
}

/// In-memory token table.
#[derive(Clone, Default)]
pub struct StaticSessions {
    tokens: Arc<RwLock<HashMap<String, Identity>>>,
}

impl StaticSessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: &[SessionEntry]) -> Self {
        let sessions = Self::new();
        for entry in entries {
            sessions.insert(
                entry.token.clone(),
                Identity::new(entry.user_id.clone(), entry.role),
            );
        }
        sessions
    }

    pub fn insert(&self, token: impl Into<String>, identity: Identity) {
        self.tokens.write().insert(token.into(), identity);
    }

    pub fn len(&self) -> usize {
        self.tokens.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionResolver for StaticSessions {
    fn resolve(&self, token: &str) -> Option<Identity> {
        self.tokens.read().get(token).cloned()
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))?
        .trim();
    (!token.is_empty()).then_some(token)
}

/// Never rejects: a missing or unknown token yields an anonymous context,
/// and the coordinator decides what that caller may do.
impl FromRequestParts<AppState> for RequestContext {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let identity = bearer_token(parts).and_then(|token| state.sessions.resolve(token));
        Ok(RequestContext { identity })
    }
}
