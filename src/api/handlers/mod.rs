//! API request handlers.
//!
//! This module contains all HTTP request handlers organized by functionality.

/// Discovery and health handlers.
pub mod agents;
/// Multi-agent routing and streaming handlers.
pub mod chat;
/// Legacy single-provider streaming handler.
pub mod legacy;
/// Session and memory handlers.
pub mod session;

use crate::types::StreamEvent;
use axum::http::{header, HeaderName};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::IntoResponse;
use futures::{Stream, StreamExt};

static X_ACCEL_BUFFERING: HeaderName = HeaderName::from_static("x-accel-buffering");

/// Wrap an event stream as an SSE response with proxy buffering disabled.
///
/// Each event is sent as `data: <json>` the moment it is produced.
pub(crate) fn sse_response<S>(events: S) -> impl IntoResponse
where
    S: Stream<Item = StreamEvent> + Send + 'static,
{
    let stream = events.map(|event| Event::default().json_data(event));

    (
        [
            (header::CACHE_CONTROL, "no-cache"),
            (X_ACCEL_BUFFERING.clone(), "no"),
        ],
        Sse::new(stream).keep_alive(KeepAlive::default()),
    )
}
