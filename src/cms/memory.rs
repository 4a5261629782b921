use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::Value;

use crate::cms::{queries, ContentSource, QueryParams};
use crate::error::{CmsError, Result};

/// In-memory document store answering the crate's own queries.
#[derive(Default)]
pub(crate) struct MemorySource {
    games: Vec<Value>,
    members: Vec<Value>,
    failing: AtomicBool,
    calls: AtomicUsize,
}

impl MemorySource {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// A source whose every query fails like an unavailable backend.
    pub(crate) fn failing() -> Self {
        let source = Self::default();
        source.set_failing(true);
        source
    }

    pub(crate) fn with_game(mut self, doc: Value) -> Self {
        self.games.push(doc);
        self
    }

    pub(crate) fn with_member(mut self, doc: Value) -> Self {
        self.members.push(doc);
        self
    }

    pub(crate) fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

fn slug_of(doc: &Value) -> Option<&str> {
    doc.get("slug").and_then(Value::as_str)
}

fn by_slug(docs: &[Value], params: QueryParams<'_>) -> Value {
    let wanted = params
        .iter()
        .find(|(name, _)| *name == "slug")
        .and_then(|(_, value)| value.as_str());
    docs.iter()
        .find(|doc| wanted.is_some() && slug_of(doc) == wanted)
        .cloned()
        .unwrap_or(Value::Null)
}

fn slugs(docs: &[Value]) -> Value {
    docs.iter()
        .filter_map(slug_of)
        .map(|s| Value::String(s.to_string()))
        .collect()
}

#[async_trait]
impl ContentSource for MemorySource {
    async fn query(&self, query: &str, params: QueryParams<'_>) -> Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(CmsError::UnexpectedStatus {
                url: "memory://content".to_string(),
                status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
            });
        }

        let result = match query {
            queries::GAMES_QUERY => Value::Array(self.games.clone()),
            queries::GAME_BY_SLUG_QUERY => by_slug(&self.games, params),
            queries::GAME_SLUGS_QUERY => slugs(&self.games),
            queries::TEAM_QUERY => Value::Array(self.members.clone()),
            queries::MEMBER_BY_SLUG_QUERY => by_slug(&self.members, params),
            queries::MEMBER_SLUGS_QUERY => slugs(&self.members),
            _ => Value::Null,
        };
        Ok(result)
    }
}
