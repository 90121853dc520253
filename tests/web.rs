//! HTTP surface, driven through the router without a socket.

mod common;

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use common::harness;
use sentiment_writer::web::{app, AppState, EMPTY_PROMPT_WARNING};
use sentiment_writer::writer::Writer;
use tower::ServiceExt;

fn router(writer: Writer) -> Router {
    app(AppState::new(Arc::new(writer)).unwrap())
}

fn form_post(body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/generate")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

async fn text(res: Response<Body>) -> String {
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// `session=<uuid>` from a response's `Set-Cookie`.
fn session_cookie(res: &Response<Body>) -> String {
    let set_cookie = res
        .headers()
        .get(header::SET_COOKIE)
        .expect("new session sets a cookie")
        .to_str()
        .unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

#[tokio::test]
async fn index_starts_empty() {
    let h = harness("POSITIVE", 0.9, Some("ok"));
    let res = router(h.writer).oneshot(get("/", None)).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key(header::SET_COOKIE));
    let html = text(res).await;
    assert!(html.contains("No interactions yet."));
}

#[tokio::test]
async fn generate_shows_sentiment_and_result() {
    let h = harness("POSITIVE", 0.92, Some("Waves sparkled.\n---\nextra"));
    let app = router(h.writer);

    let res = app
        .oneshot(form_post("prompt=a+sunny+beach+day&length=short", None))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let html = text(res).await;

    assert!(html.contains("Detected sentiment: POSITIVE"));
    assert!(html.contains("Waves sparkled."));
    assert!(!html.contains("extra"));
    assert!(!html.contains("No interactions yet."));
    assert_eq!(h.generated.lock().unwrap()[0].1, 80);
}

#[tokio::test]
async fn blank_prompt_warns_without_running() {
    let h = harness("POSITIVE", 0.9, Some("unused"));
    let res = router(h.writer)
        .oneshot(form_post("prompt=++&length=medium", None))
        .await
        .unwrap();

    let html = text(res).await;
    assert!(html.contains(EMPTY_PROMPT_WARNING));
    assert!(html.contains("No interactions yet."));
    assert!(h.classified.lock().unwrap().is_empty());
    assert!(h.generated.lock().unwrap().is_empty());
}

#[tokio::test]
async fn generation_failure_is_not_recorded() {
    let h = harness("POSITIVE", 0.9, None);
    let res = router(h.writer)
        .oneshot(form_post("prompt=hello", None))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let html = text(res).await;
    assert!(html.contains("banner error"));
    assert!(html.contains("generator unavailable"));
    assert!(html.contains("No interactions yet."));
}

#[tokio::test]
async fn missing_models_report_error_sentiment() {
    let app = router(Writer::without_models("Error loading models: offline"));

    let res = app.clone().oneshot(get("/health", None)).await.unwrap();
    let body: serde_json::Value = serde_json::from_str(&text(res).await).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["models_loaded"], false);

    let res = app.oneshot(form_post("prompt=hello", None)).await.unwrap();
    let html = text(res).await;
    assert!(html.contains("Error loading models: offline"));
    assert!(html.contains("Detected sentiment: ERROR"));
    assert!(html.contains("Models not loaded."));
}

#[tokio::test]
async fn history_and_downloads_follow_the_session() {
    let h = harness("NEGATIVE", 0.88, Some("Fog over the harbour."));
    let app = router(h.writer);

    let res = app.clone().oneshot(get("/", None)).await.unwrap();
    let cookie = session_cookie(&res);

    for prompt in ["first", "second", "third"] {
        let res = app
            .clone()
            .oneshot(form_post(&format!("prompt={prompt}"), Some(&cookie)))
            .await
            .unwrap();
        assert!(!res.headers().contains_key(header::SET_COOKIE));
    }

    let html = text(app.clone().oneshot(get("/", Some(&cookie))).await.unwrap()).await;
    let third = html.find("third").unwrap();
    let second = html.find("second").unwrap();
    let first = html.find("first").unwrap();
    assert!(third < second && second < first);

    let res = app
        .clone()
        .oneshot(get("/download/2", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"generation_2.txt\""
    );
    assert_eq!(text(res).await, "Fog over the harbour.");

    let res = app
        .clone()
        .oneshot(get("/download/3?kind=result", Some(&cookie)))
        .await
        .unwrap();
    let disposition = res.headers()[header::CONTENT_DISPOSITION].to_str().unwrap();
    assert!(disposition.starts_with("attachment; filename=\"generated_negative_"));
    assert!(disposition.ends_with(".txt\""));

    let res = app
        .clone()
        .oneshot(get("/download/4", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // Another session sees none of it.
    let res = app.oneshot(get("/download/1", None)).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
