//! Fixture HTTP server for exercising the transport over real sockets.
//!
//! Routes are scripted scenarios rather than a domain API: fixed bodies,
//! a chunk-streaming endpoint that forces multiple body frames, a slow
//! endpoint for deadline tests, and an echo endpoint for request bodies.

use std::convert::Infallible;
use std::time::Duration;

use axum::{
    body::Body,
    extract::Path,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::mpsc, time::sleep};

/// Body served by `/ok`; serializes to `{"id":1}`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Fixture {
    pub id: u64,
}

/// Chunks emitted by `/chunks`, in order.
pub const CHUNKS: [&[u8]; 3] = [b"b1", b"b2", b"b3"];

pub fn app() -> Router {
    Router::new()
        .route("/ok", get(ok))
        .route("/missing", get(missing))
        .route("/chunks", get(chunks))
        .route("/slow/{ms}", get(slow))
        .route("/echo", post(echo))
        .route("/headers", get(custom_headers))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn ok() -> Json<Fixture> {
    Json(Fixture { id: 1 })
}

async fn missing() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "no such resource")
}

/// Streams the fixture chunks with small pauses so they arrive as
/// separate HTTP chunks rather than one coalesced frame.
async fn chunks() -> Body {
    let (tx, mut rx) = mpsc::channel::<Result<Bytes, Infallible>>(1);
    tokio::spawn(async move {
        for chunk in CHUNKS {
            if tx.send(Ok(Bytes::from_static(chunk))).await.is_err() {
                return;
            }
            sleep(Duration::from_millis(20)).await;
        }
    });
    Body::from_stream(futures::stream::poll_fn(move |cx| rx.poll_recv(cx)))
}

async fn slow(Path(ms): Path<u64>) -> &'static str {
    sleep(Duration::from_millis(ms)).await;
    "late"
}

/// Reflects the request body and its content-type back at the caller.
async fn echo(headers: HeaderMap, body: Bytes) -> Response {
    let mut response = body.into_response();
    if let Some(content_type) = headers.get(header::CONTENT_TYPE) {
        response
            .headers_mut()
            .insert(header::CONTENT_TYPE, content_type.clone());
    }
    response
}

async fn custom_headers() -> ([(&'static str, &'static str); 1], &'static str) {
    ([("x-fixture", "present")], "with headers")
}
