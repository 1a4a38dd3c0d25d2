use std::convert::Infallible;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::{
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
    Extension, Json,
};
use futures::Stream;
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tracing::debug;

use crate::error::AppError;
use crate::live::{LiveRegistry, NotificationPayload};
use crate::services::notification_feed_service;
use crate::state::AppState;
use crate::web::middleware::auth::AuthenticatedMember;

pub async fn list_notifications_handler(
    Extension(auth): Extension<AuthenticatedMember>,
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    let notifications =
        notification_feed_service::list_unacknowledged(&state.pool, &auth.id).await?;
    Ok(Json(json!({ "notifications": notifications })))
}

pub async fn acknowledge_handler(
    Extension(auth): Extension<AuthenticatedMember>,
    Path(notification_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    notification_feed_service::acknowledge(&state.pool, &auth.id, &notification_id).await?;
    Ok(Json(json!({ "acknowledged": true })))
}

/// SSE stream of live notification pushes for the caller. The connection is
/// registered for the member's id and unregistered when the client goes away
/// and the stream is dropped.
pub async fn stream_handler(
    Extension(auth): Extension<AuthenticatedMember>,
    State(state): State<AppState>,
) -> Sse<NotificationStream> {
    let (conn_id, rx) = state.live.register(&auth.id);
    debug!(member_id = %auth.id, conn_id, "live stream opened");

    let stream = NotificationStream {
        member_id: auth.id,
        conn_id,
        registry: state.live.clone(),
        rx,
    };
    Sse::new(stream).keep_alive(KeepAlive::default())
}

pub struct NotificationStream {
    member_id: String,
    conn_id: u64,
    registry: LiveRegistry,
    rx: mpsc::UnboundedReceiver<NotificationPayload>,
}

impl Stream for NotificationStream {
    type Item = Result<Event, Infallible>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        match this.rx.poll_recv(cx) {
            Poll::Ready(Some(payload)) => {
                let event = match Event::default().event("notification").json_data(&payload) {
                    Ok(event) => event,
                    Err(e) => {
                        debug!(member_id = %this.member_id, "failed to encode live payload: {}", e);
                        // Skip the payload and ask to be polled again.
                        cx.waker().wake_by_ref();
                        return Poll::Pending;
                    }
                };
                Poll::Ready(Some(Ok(event)))
            }
            Poll::Ready(None) => Poll::Ready(None),
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Drop for NotificationStream {
    fn drop(&mut self) {
        self.registry.unregister(&self.member_id, self.conn_id);
        debug!(member_id = %self.member_id, conn_id = self.conn_id, "live stream closed");
    }
}
