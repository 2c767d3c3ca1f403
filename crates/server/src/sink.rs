//! Analytics sinks
//!
//! The engine returns events; the host decides where they go. Sinks must be
//! cheap and non-blocking since they run while a session lock is held.

use std::sync::Arc;

use tokio::sync::broadcast;

use onboarding_core::AnalyticsEvent;

/// Destination for analytics events
pub trait AnalyticsSink: Send + Sync {
    fn emit(&self, event: &AnalyticsEvent);

    fn emit_all(&self, events: &[AnalyticsEvent]) {
        for event in events {
            self.emit(event);
        }
    }
}

/// One structured log line per event
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl AnalyticsSink for TracingSink {
    fn emit(&self, event: &AnalyticsEvent) {
        let payload = serde_json::to_string(&event.payload).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to serialize event payload");
            String::new()
        });
        tracing::info!(
            target: "onboarding::analytics",
            event_type = %event.event_type,
            category = ?event.event_type.category(),
            session_id = %event.session_id,
            timestamp = %event.timestamp,
            payload = %payload,
            "Analytics event"
        );
    }
}

/// Counts events per type in the `metrics` registry
#[derive(Debug, Default, Clone, Copy)]
pub struct MetricsSink;

impl MetricsSink {
    pub const EVENTS_TOTAL: &'static str = "onboarding_events_total";
}

impl AnalyticsSink for MetricsSink {
    fn emit(&self, event: &AnalyticsEvent) {
        metrics::counter!(Self::EVENTS_TOTAL, "event_type" => event.event_type.as_str())
            .increment(1);
    }
}

/// Fans events out to in-process subscribers
///
/// Slow subscribers lag and lose the oldest events rather than blocking the
/// session that produced them.
#[derive(Debug, Clone)]
pub struct BroadcastSink {
    sender: broadcast::Sender<AnalyticsEvent>,
}

impl BroadcastSink {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AnalyticsEvent> {
        self.sender.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for BroadcastSink {
    fn default() -> Self {
        Self::new(256)
    }
}

impl AnalyticsSink for BroadcastSink {
    fn emit(&self, event: &AnalyticsEvent) {
        // No subscribers is not an error
        let _ = self.sender.send(event.clone());
    }
}

/// Forwards every event to each inner sink in order
#[derive(Clone, Default)]
pub struct FanoutSink {
    sinks: Vec<Arc<dyn AnalyticsSink>>,
}

impl FanoutSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: Arc<dyn AnalyticsSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl AnalyticsSink for FanoutSink {
    fn emit(&self, event: &AnalyticsEvent) {
        for sink in &self.sinks {
            sink.emit(event);
        }
    }
}
