// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Live-query fan-out: the change bus and snapshot streams.
//!
//! Mutation handlers publish a change event for their collection after a
//! successful write. Each live subscriber holds a broadcast receiver and
//! re-runs its server-side query per event, emitting the full result set as
//! a snapshot. Snapshots are whole-list replacements, so a subscriber that
//! lags and misses events loses nothing by re-querying once.

use crate::error::AppError;
use axum::response::sse::Event;
use dashmap::DashMap;
use futures_util::stream::Stream;
use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 16;

/// A change notification for one collection.
#[derive(Debug, Clone)]
pub struct ChangeEvent {
    pub collection: &'static str,
}

/// In-process fan-out of collection change notifications.
pub struct ChangeBus {
    channels: DashMap<&'static str, broadcast::Sender<ChangeEvent>>,
}

impl ChangeBus {
    pub fn new() -> Self {
        Self {
            channels: DashMap::new(),
        }
    }

    /// Subscribe to change events for a collection.
    ///
    /// Dropping the receiver cancels the subscription.
    pub fn subscribe(&self, collection: &'static str) -> broadcast::Receiver<ChangeEvent> {
        self.channels
            .entry(collection)
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }

    /// Notify subscribers that a collection changed.
    pub fn publish(&self, collection: &'static str) {
        if let Some(tx) = self.channels.get(collection) {
            // Send only fails when nobody is subscribed
            let _ = tx.send(ChangeEvent { collection });
        }
    }
}

impl Default for ChangeBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Build an SSE stream of full result-set snapshots.
///
/// Emits one snapshot immediately, then one per change event. A failed
/// refresh is logged and surfaced to the subscriber as a `sync-error` event;
/// the stream stays open and recovers on the next change.
pub fn snapshot_stream<T, F, Fut>(
    rx: broadcast::Receiver<ChangeEvent>,
    fetch: F,
) -> impl Stream<Item = std::result::Result<Event, std::convert::Infallible>>
where
    T: serde::Serialize,
    F: Fn() -> Fut + Send + 'static,
    Fut: std::future::Future<Output = Result<Vec<T>, AppError>> + Send,
{
    futures_util::stream::unfold((rx, fetch, true), |(mut rx, fetch, first)| async move {
        if !first {
            loop {
                match rx.recv().await {
                    Ok(_) => break,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::debug!(skipped, "Subscriber lagged; next snapshot covers it");
                        break;
                    }
                    Err(broadcast::error::RecvError::Closed) => return None,
                }
            }
        }

        let event = match fetch().await {
            Ok(records) => Event::default()
                .event("snapshot")
                .json_data(&records)
                .unwrap_or_else(|e| {
                    tracing::error!(error = %e, "Failed to encode snapshot");
                    Event::default().event("sync-error").data("encode_failed")
                }),
            Err(e) => {
                tracing::error!(error = %e, "Live query refresh failed");
                Event::default().event("sync-error").data("refresh_failed")
            }
        };

        Some((Ok(event), (rx, fetch, false)))
    })
}
