//! Browser UI served with axum.
//!
//! Routes:
//!
//! | Method | Path | |
//! |--------|------|---|
//! | `GET` | `/` | page with the prompt form and the session's history |
//! | `POST` | `/generate` | run the writer on form fields `prompt` and `length` |
//! | `GET` | `/download/{seq}` | a record's text as a file (`?kind=result` for the result name) |
//! | `GET` | `/health` | `{"status": "ok", "models_loaded": bool}` |

mod render;
mod session;

use std::sync::Arc;

use axum::{
    extract::{Form, Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use minijinja::Environment;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::writer::{History, Interaction, OutputLength, Writer};

pub use render::{render_page, templates, Banner, BannerKind, Page};
pub use session::{resolve_session, session_id, SessionStore, SESSION_COOKIE};

/// Warning shown when the form is submitted without a prompt.
pub const EMPTY_PROMPT_WARNING: &str = "Please enter a prompt before starting.";

/// State shared across HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub writer: Arc<Writer>,
    pub sessions: SessionStore,
    pub templates: Arc<Environment<'static>>,
}

impl AppState {
    pub fn new(writer: Arc<Writer>) -> Result<Self, minijinja::Error> {
        Ok(Self {
            writer,
            sessions: SessionStore::new(),
            templates: templates()?,
        })
    }
}

/// Build the router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/generate", post(generate))
        .route("/download/{seq}", get(download))
        .route("/health", get(health))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct GenerateForm {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub length: OutputLength,
}

#[derive(Debug, Default, Deserialize)]
pub struct DownloadQuery {
    pub kind: Option<String>,
}

async fn index(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let (session, cookie) = resolve_session(&headers);
    info!(%session, "index requested");

    let history = state.sessions.history(session).await;
    let page = Page {
        load_error: state.writer.load_error(),
        ..Page::default()
    };
    page_response(&state, &page, &history, cookie)
}

async fn generate(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<GenerateForm>,
) -> Response {
    let (session, cookie) = resolve_session(&headers);
    let load_error = state.writer.load_error();

    if form.prompt.trim().is_empty() {
        let history = state.sessions.history(session).await;
        let page = Page {
            prompt: &form.prompt,
            length: form.length,
            banner: Some(Banner::warning(EMPTY_PROMPT_WARNING)),
            load_error,
            ..Page::default()
        };
        return page_response(&state, &page, &history, cookie);
    }

    let max_len = form.length.max_tokens();
    info!(%session, length = ?form.length, max_len, "generation requested");

    let writer = state.writer.clone();
    let prompt = form.prompt.clone();
    let outcome =
        tokio::task::spawn_blocking(move || writer.analyze_and_generate(&prompt, max_len)).await;

    let generation = match outcome {
        Ok(Ok(generation)) => generation,
        Ok(Err(e)) => {
            warn!(%session, error = %e, "generation failed");
            return failure_page(&state, session, &form, format!("Generation failed: {e}"), cookie)
                .await;
        }
        Err(e) => {
            error!(%session, error = %e, "generation task panicked");
            return failure_page(&state, session, &form, "Generation failed unexpectedly.", cookie)
                .await;
        }
    };

    let (record, history) = state
        .sessions
        .record(session, &form.prompt, generation.sentiment, &generation.text)
        .await;
    info!(%session, seq = record.seq, sentiment = %record.detected_sentiment, "interaction recorded");

    let page = Page {
        prompt: &form.prompt,
        length: form.length,
        banner: Some(Banner::success(format!(
            "Detected sentiment: {}",
            record.detected_sentiment
        ))),
        latest: Some(&record),
        load_error,
    };
    page_response(&state, &page, &history, cookie)
}

async fn failure_page(
    state: &AppState,
    session: Uuid,
    form: &GenerateForm,
    message: impl Into<String>,
    cookie: Option<HeaderValue>,
) -> Response {
    let history = state.sessions.history(session).await;
    let page = Page {
        prompt: &form.prompt,
        length: form.length,
        banner: Some(Banner::error(message)),
        load_error: state.writer.load_error(),
        ..Page::default()
    };
    page_response(state, &page, &history, cookie)
}

async fn download(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(seq): Path<usize>,
    Query(query): Query<DownloadQuery>,
) -> Response {
    let Some(session) = session_id(&headers) else {
        return (StatusCode::NOT_FOUND, "No such generation.").into_response();
    };
    let Some(record) = state.sessions.interaction(session, seq).await else {
        return (StatusCode::NOT_FOUND, "No such generation.").into_response();
    };

    let file_name = match query.kind.as_deref() {
        Some("result") => record.result_file_name(),
        _ => record.history_file_name(),
    };
    attachment(&record, &file_name)
}

fn attachment(record: &Interaction, file_name: &str) -> Response {
    let disposition = format!("attachment; filename=\"{file_name}\"");
    (
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        record.generated_text.clone(),
    )
        .into_response()
}

async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "models_loaded": state.writer.models_loaded(),
    }))
}

fn page_response(
    state: &AppState,
    page: &Page<'_>,
    history: &History,
    cookie: Option<HeaderValue>,
) -> Response {
    let html = match render_page(&state.templates, page, history) {
        Ok(html) => html,
        Err(e) => {
            error!(error = %e, "failed to render page");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render page.").into_response();
        }
    };

    let mut response = Html(html).into_response();
    if let Some(cookie) = cookie {
        response.headers_mut().insert(header::SET_COOKIE, cookie);
    }
    response
}
