// ABOUTME: Stream coordinator turning live SSE replies into pollable per-stream event queues
// ABOUTME: Runs one producer task per stream and supports poll-based retrieval and cancellation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Stream Coordinator
//!
//! Each stream has a FIFO queue keyed by its [`StreamId`] and, while its
//! producer task runs, a cancellation token in the connection table.
//!
//! The producer is the only writer of a queue and enqueues exactly one
//! terminal event: `Complete` when the reply ends, `Error` when it cannot be
//! established or the transport fails. Pollers delete the queue when they
//! dequeue a terminal event. Cancellation deletes both the queue and the
//! connection and stops the producer.

use super::sse_parser::SseDecoder;
use crate::agentforce::ByteStream;
use crate::constants::messages;
use crate::errors::AppResult;
use crate::protocol::{StreamEvent, StreamId, StreamMessage};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures_util::StreamExt;
use std::collections::VecDeque;
use std::future::Future;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

type Queues = DashMap<String, VecDeque<StreamEvent>>;

/// Coordinates every in-flight stream
#[derive(Clone, Default)]
pub struct StreamCoordinator {
    queues: Arc<Queues>,
    connections: Arc<DashMap<String, CancellationToken>>,
}

impl StreamCoordinator {
    /// Create an empty coordinator
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a stream and spawn its producer
    ///
    /// `open` establishes the outbound request; it runs inside the producer
    /// task, so this returns immediately and establishment failures surface
    /// as a terminal `Error` event.
    pub fn start<F>(&self, stream_id: &StreamId, open: F) -> JoinHandle<()>
    where
        F: Future<Output = AppResult<ByteStream>> + Send + 'static,
    {
        let key = stream_id.to_string();
        let token = CancellationToken::new();

        self.queues.insert(key.clone(), VecDeque::new());
        self.connections.insert(key.clone(), token.clone());
        info!(stream_id = %key, "Stream registered");

        let queues = Arc::clone(&self.queues);
        let connections = Arc::clone(&self.connections);
        tokio::spawn(async move {
            let terminal = tokio::select! {
                () = token.cancelled() => None,
                terminal = produce(&queues, &key, open) => terminal,
            };

            match terminal {
                Some(event) => {
                    debug!(stream_id = %key, ?event, "Stream finished");
                    push(&queues, &key, event);
                }
                None => debug!(stream_id = %key, "Stream producer stopped"),
            }
            connections.remove(&key);
        })
    }

    /// Dequeue the oldest event of a stream
    ///
    /// Unknown streams and empty queues both report `Waiting`. Dequeuing a
    /// terminal event deletes the queue.
    #[must_use]
    pub fn get_stream_message(&self, stream_id: &StreamId) -> StreamMessage {
        let Entry::Occupied(mut entry) = self.queues.entry(stream_id.to_string()) else {
            return StreamMessage::from(None);
        };

        let event = entry.get_mut().pop_front();
        if event.as_ref().is_some_and(StreamEvent::is_terminal) {
            entry.remove();
            debug!(stream_id = %stream_id, "Stream closed after terminal event");
        }
        StreamMessage::from(event)
    }

    /// Cancel a stream
    ///
    /// Returns `false` when the stream is unknown, already closed or already
    /// cancelled.
    pub fn cancel(&self, stream_id: &StreamId) -> bool {
        let key = stream_id.to_string();

        let connection = self.connections.remove(&key);
        if let Some((_, token)) = &connection {
            token.cancel();
        }
        let queued = self.queues.remove(&key).is_some();

        let cancelled = connection.is_some() || queued;
        if cancelled {
            info!(stream_id = %key, "{}", messages::STREAM_CANCELLED);
        }
        cancelled
    }

    /// Number of events waiting in a stream's queue
    #[must_use]
    pub fn queued_events(&self, stream_id: &StreamId) -> usize {
        self.queues
            .get(&stream_id.to_string())
            .map_or(0, |queue| queue.len())
    }

    /// Whether a producer task is still attached to the stream
    #[must_use]
    pub fn is_active(&self, stream_id: &StreamId) -> bool {
        self.connections.contains_key(&stream_id.to_string())
    }

    /// Number of streams with a queue
    #[must_use]
    pub fn open_streams(&self) -> usize {
        self.queues.len()
    }
}

/// Append to a stream's queue; `false` once the queue has been deleted
fn push(queues: &Queues, key: &str, event: StreamEvent) -> bool {
    queues
        .get_mut(key)
        .map(|mut queue| queue.push_back(event))
        .is_some()
}

/// Drive a reply to its terminal event
///
/// Returns `None` when the queue disappeared mid-stream; nobody is left to
/// read what follows.
async fn produce<F>(queues: &Queues, key: &str, open: F) -> Option<StreamEvent>
where
    F: Future<Output = AppResult<ByteStream>>,
{
    let mut body = match open.await {
        Ok(body) => body,
        Err(e) => {
            warn!(stream_id = %key, "Failed to establish stream: {}", e);
            return Some(StreamEvent::error(error_message(&e.message)));
        }
    };

    let mut decoder = SseDecoder::new();
    while let Some(next) = body.next().await {
        match next {
            Ok(bytes) => {
                for event in decoder.feed(&bytes) {
                    if !push(queues, key, event) {
                        return None;
                    }
                }
            }
            Err(e) => {
                warn!(stream_id = %key, "Stream transport error: {}", e);
                return Some(StreamEvent::error(error_message(&e.message)));
            }
        }
    }

    Some(StreamEvent::complete(decoder.finish()))
}

fn error_message(message: &str) -> String {
    if message.is_empty() {
        messages::STREAM_ESTABLISH_FAILED.to_owned()
    } else {
        message.to_owned()
    }
}
