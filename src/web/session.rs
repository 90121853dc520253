use std::collections::HashMap;
use std::sync::Arc;

use axum::http::{header, HeaderMap, HeaderValue};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::writer::{History, Interaction, Sentiment};

pub const SESSION_COOKIE: &str = "session";

/// Session id from the request's cookie, if it carries a valid one.
pub fn session_id(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

/// The request's session, or a fresh one plus the `Set-Cookie` value to hand out.
pub fn resolve_session(headers: &HeaderMap) -> (Uuid, Option<HeaderValue>) {
    match session_id(headers) {
        Some(id) => (id, None),
        None => {
            let id = Uuid::new_v4();
            (id, Some(session_cookie(id)))
        }
    }
}

fn session_cookie(id: Uuid) -> HeaderValue {
    // A hyphenated uuid is always a valid header value.
    HeaderValue::from_str(&format!(
        "{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax"
    ))
    .unwrap_or_else(|_| HeaderValue::from_static("session=; Path=/"))
}

/// Per-session histories, kept in memory for the life of the process.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<Mutex<HashMap<Uuid, History>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of the session's history, empty for unknown sessions.
    pub async fn history(&self, id: Uuid) -> History {
        self.inner.lock().await.get(&id).cloned().unwrap_or_default()
    }

    /// Append a record and return it with the session's full history.
    pub async fn record(
        &self,
        id: Uuid,
        prompt: &str,
        sentiment: Sentiment,
        text: &str,
    ) -> (Interaction, History) {
        let mut sessions = self.inner.lock().await;
        let history = sessions.entry(id).or_default();
        let record = history.record(prompt, sentiment, text).clone();
        (record, history.clone())
    }

    pub async fn interaction(&self, id: Uuid, seq: usize) -> Option<Interaction> {
        self.inner
            .lock()
            .await
            .get(&id)
            .and_then(|history| history.get(seq))
            .cloned()
    }
}
