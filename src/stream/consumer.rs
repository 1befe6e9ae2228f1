//! Event stream consumer
//!
//! Maintains the one long-lived `/events` connection and turns its frames
//! into bus publishes. A malformed message is dropped, never fatal; a
//! dropped connection is reconnected after a delay, with no replay of
//! whatever happened in between — the protocol has no resynchronization.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;

use crate::bus::ClipBus;

use super::event;
use super::sse::SseParser;

/// Live counters for one consumer
#[derive(Debug, Default)]
pub struct StreamCounters {
    events_dispatched: AtomicU64,
    malformed_messages: AtomicU64,
    reconnects: AtomicU64,
}

impl StreamCounters {
    /// Point-in-time copy of the counters
    pub fn snapshot(&self) -> StreamStats {
        StreamStats {
            events_dispatched: self.events_dispatched.load(Ordering::Relaxed),
            malformed_messages: self.malformed_messages.load(Ordering::Relaxed),
            reconnects: self.reconnects.load(Ordering::Relaxed),
        }
    }
}

/// Consumer statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamStats {
    /// Events published to the bus
    pub events_dispatched: u64,
    /// Messages dropped as undecodable
    pub malformed_messages: u64,
    /// Times the connection was re-established
    pub reconnects: u64,
}

/// The persistent push-stream consumer
pub struct EventStream {
    http: reqwest::Client,
    events_url: String,
    bus: Arc<ClipBus>,
    reconnect_delay: Duration,
    counters: Arc<StreamCounters>,
}

impl EventStream {
    /// Create a consumer for `base_url`'s event stream, publishing to `bus`
    pub fn new(
        http: reqwest::Client,
        base_url: &str,
        bus: Arc<ClipBus>,
        reconnect_delay: Duration,
    ) -> Self {
        Self {
            http,
            events_url: format!("{}/events", base_url),
            bus,
            reconnect_delay,
            counters: Arc::new(StreamCounters::default()),
        }
    }

    /// Shared handle to this consumer's counters
    pub fn counters(&self) -> Arc<StreamCounters> {
        Arc::clone(&self.counters)
    }

    /// Consume the stream forever, reconnecting on every failure
    ///
    /// Only cancellation (dropping the task driving this future, or
    /// `run_until`) ends the loop.
    pub async fn run(self) {
        let mut first = true;
        loop {
            if !first {
                self.counters.reconnects.fetch_add(1, Ordering::Relaxed);
                tokio::time::sleep(self.reconnect_delay).await;
            }
            first = false;

            match self.consume_connection().await {
                Ok(()) => {
                    tracing::info!(url = %self.events_url, "Event stream ended, reconnecting");
                }
                Err(e) => {
                    tracing::warn!(url = %self.events_url, error = %e, "Event stream failed, reconnecting");
                }
            }
        }
    }

    /// Consume the stream until `shutdown` completes
    pub async fn run_until<F>(self, shutdown: F)
    where
        F: std::future::Future<Output = ()>,
    {
        tokio::select! {
            _ = shutdown => {
                tracing::info!("Event stream shutdown");
            }
            _ = self.run() => {}
        }
    }

    /// One connection: open, read frames, dispatch until EOF or error
    async fn consume_connection(&self) -> Result<(), reqwest::Error> {
        let response = self
            .http
            .get(&self.events_url)
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .send()
            .await?
            .error_for_status()?;

        tracing::info!(url = %self.events_url, "Event stream connected");

        let mut body = response.bytes_stream();
        let mut parser = SseParser::new();

        while let Some(chunk) = body.next().await {
            let chunk = chunk?;
            for payload in parser.feed(&chunk) {
                self.dispatch(&payload);
            }
        }

        Ok(())
    }

    /// Decode one message body and publish its events in order
    ///
    /// Undecodable messages are dropped; they affect neither the
    /// connection nor subsequent messages.
    pub fn dispatch(&self, payload: &str) {
        match event::decode(payload) {
            Ok(events) => {
                for event in &events {
                    let key = event.key();
                    tracing::trace!(key = %key, event = ?event, "Event dispatched");
                    self.bus.publish(&key, event.update());
                }
                self.counters
                    .events_dispatched
                    .fetch_add(events.len() as u64, Ordering::Relaxed);
            }
            Err(e) => {
                tracing::warn!(error = %e, payload = payload, "Dropping malformed stream message");
                self.counters
                    .malformed_messages
                    .fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use crate::bus::{ClipKey, ClipUpdate, Transition};

    use super::*;

    fn consumer(bus: Arc<ClipBus>) -> EventStream {
        EventStream::new(
            reqwest::Client::new(),
            "http://127.0.0.1:14181",
            bus,
            Duration::from_millis(10),
        )
    }

    #[tokio::test]
    async fn test_batch_dispatches_in_order_across_keys() {
        let bus = Arc::new(ClipBus::new());
        let stream = consumer(Arc::clone(&bus));

        let (tx, rx) = mpsc::channel();
        for clip in ["a", "b"] {
            let tx = tx.clone();
            bus.register(
                ClipKey::new("c1", clip),
                Box::new(move |update: ClipUpdate| {
                    tx.send((clip, update.transition)).unwrap();
                }),
            );
        }

        stream.dispatch(
            r#"[{"Started":{"coll_id":"c1","clip_id":"a"}},
                {"Stopped":{"coll_id":"c1","clip_id":"b"}}]"#,
        );

        let delivered: Vec<(&str, Transition)> = rx.try_iter().collect();
        assert_eq!(
            delivered,
            vec![("a", Transition::Started), ("b", Transition::Stopped)]
        );
        assert_eq!(stream.counters().snapshot().events_dispatched, 2);
    }

    #[tokio::test]
    async fn test_malformed_message_is_counted_and_isolated() {
        let bus = Arc::new(ClipBus::new());
        let stream = consumer(Arc::clone(&bus));

        let (tx, rx) = mpsc::channel();
        bus.register(
            ClipKey::new("c1", "a"),
            Box::new(move |update| tx.send(update).unwrap()),
        );

        stream.dispatch("definitely not json");
        stream.dispatch(r#"{"Started":{"coll_id":"c1","clip_id":"a"}}"#);

        // The bad message affects neither the connection nor the next one.
        assert_eq!(rx.try_recv().unwrap(), ClipUpdate::started(None));

        let stats = stream.counters().snapshot();
        assert_eq!(stats.malformed_messages, 1);
        assert_eq!(stats.events_dispatched, 1);
    }

    #[tokio::test]
    async fn test_event_for_unregistered_key_is_dropped() {
        let bus = Arc::new(ClipBus::new());
        let stream = consumer(bus);

        stream.dispatch(r#"{"Stopped":{"coll_id":"c9","clip_id":"9"}}"#);

        // Dispatched, even though nobody was listening.
        assert_eq!(stream.counters().snapshot().events_dispatched, 1);
    }
}
