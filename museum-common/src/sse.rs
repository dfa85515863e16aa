//! Server-Sent Events (SSE) utilities

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::{Stream, StreamExt};
use std::convert::Infallible;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tracing::{debug, info, warn};

use crate::events::MuseumEvent;

/// Stream edit-log events addressed to one supervisor
///
/// Sends a `ConnectionStatus` event first, then every [`MuseumEvent`] whose
/// supervisor matches. Lagged receivers skip the lost events and continue.
pub fn supervisor_event_stream(
    rx: broadcast::Receiver<MuseumEvent>,
    supervisor_email: String,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    info!("New SSE client connected for supervisor {}", supervisor_email);

    let connected = futures::stream::once(async {
        Ok::<_, Infallible>(Event::default().event("ConnectionStatus").data("connected"))
    });

    let updates = BroadcastStream::new(rx).filter_map(move |result| {
        let supervisor_email = supervisor_email.clone();
        async move {
            match result {
                Ok(event) if event.supervisor_email() == supervisor_email => {
                    match serde_json::to_string(&event) {
                        Ok(json) => {
                            debug!("Broadcasting SSE event: {}", event.event_type());
                            Some(Ok(Event::default().event(event.event_type()).data(json)))
                        }
                        Err(e) => {
                            warn!("Failed to serialize event: {}", e);
                            None
                        }
                    }
                }
                Ok(_) => None,
                Err(e) => {
                    // Lagged: events were dropped for this subscriber
                    warn!("SSE stream error: {:?}", e);
                    None
                }
            }
        }
    });

    Sse::new(connected.chain(updates)).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("heartbeat"),
    )
}
