//! Server-sent-events consumer for the bridge event stream.
//!
//! One logical subscription per process. A dedicated task reads
//! `/eventstream/clip/v2`, parses each `data:` frame into typed events,
//! retains every event in a bounded ring buffer, and fans type-filtered
//! events out on a bounded broadcast channel. Read errors trigger a
//! reconnect after a fixed backoff until the consumer is stopped.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::bridge::types::{
    Alert, ColorState, ColorTemperature, Dimming, Effects, OnState, ResourceIdentifier,
};
use crate::bridge::BridgeClient;
use crate::error::AppError;

/// Ring-buffer capacity; the oldest event is dropped when full.
pub const DEFAULT_MAX_EVENTS: usize = 1000;
/// Capacity of the filtered delivery channel. A lagging subscriber loses
/// the oldest buffered events, never blocking the reader.
pub const DELIVERY_CAPACITY: usize = 100;
const RECONNECT_DELAY: Duration = Duration::from_secs(5);

// ── Event model ─────────────────────────────────────────────────

/// Frame-level event kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Add,
    Update,
    Delete,
    Error,
    #[serde(other)]
    Unknown,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Add => "add",
            EventKind::Update => "update",
            EventKind::Delete => "delete",
            EventKind::Error => "error",
            EventKind::Unknown => "unknown",
        }
    }
}

/// Per-resource payload of an event. Absent fields mean "not reported in
/// this event".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResourceEvent {
    Light {
        id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        owner: Option<ResourceIdentifier>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        on: Option<OnState>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        dimming: Option<Dimming>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        color: Option<ColorState>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        color_temperature: Option<ColorTemperature>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        effects: Option<Effects>,
    },
    GroupedLight {
        id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        on: Option<OnState>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        dimming: Option<Dimming>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        alert: Option<Alert>,
    },
    Motion {
        id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        motion: Option<MotionPayload>,
    },
    Temperature {
        id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        temperature: Option<TemperaturePayload>,
    },
    LightLevel {
        id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        light: Option<LightLevelPayload>,
    },
    Button {
        id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        button: Option<ButtonPayload>,
    },
    Scene {
        id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        status: Option<SceneStatus>,
    },
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MotionPayload {
    #[serde(default)]
    pub motion: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TemperaturePayload {
    #[serde(default)]
    pub temperature: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LightLevelPayload {
    #[serde(default)]
    pub light_level: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ButtonPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_report: Option<ButtonReportPayload>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ButtonReportPayload {
    pub event: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneStatus {
    #[serde(default)]
    pub active: String,
}

impl ResourceEvent {
    /// The resource-type discriminator as it appears on the wire.
    pub fn kind_str(&self) -> &'static str {
        match self {
            ResourceEvent::Light { .. } => "light",
            ResourceEvent::GroupedLight { .. } => "grouped_light",
            ResourceEvent::Motion { .. } => "motion",
            ResourceEvent::Temperature { .. } => "temperature",
            ResourceEvent::LightLevel { .. } => "light_level",
            ResourceEvent::Button { .. } => "button",
            ResourceEvent::Scene { .. } => "scene",
            ResourceEvent::Unknown => "unknown",
        }
    }
}

/// One bridge event: a frame kind plus the resource payloads it carries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HueEvent {
    #[serde(default)]
    pub creationtime: String,
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: EventKind,
    #[serde(default)]
    pub data: Vec<ResourceEvent>,
}

impl HueEvent {
    /// A type filter matches on the frame kind (`add`/`update`/`delete`)
    /// or on any contained resource kind (`light`, `motion`, ...).
    pub fn matches(&self, filter: &str) -> bool {
        self.kind.as_str() == filter || self.data.iter().any(|d| d.kind_str() == filter)
    }
}

// ── SSE framing ─────────────────────────────────────────────────

/// Accumulates `data:` payload lines until the blank line that terminates
/// a frame. Keep-alive comment lines (`: hi`) are discarded.
#[derive(Default)]
struct FrameAccumulator {
    data: String,
}

impl FrameAccumulator {
    /// Feed one line (without its trailing newline). Returns a complete
    /// frame payload when the line terminates one.
    fn feed(&mut self, line: &str) -> Option<String> {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.is_empty() {
            if self.data.is_empty() {
                return None;
            }
            return Some(std::mem::take(&mut self.data));
        }
        if let Some(payload) = line.strip_prefix("data: ") {
            self.data.push_str(payload);
        }
        // Anything else (": hi" keep-alives, "id:" fields) is ignored.
        None
    }
}

// ── Consumer ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct EventStreamStatus {
    pub streaming: bool,
    pub buffered: usize,
    pub capacity: usize,
}

struct ConnState {
    streaming: bool,
    stop: CancellationToken,
}

/// Process-wide owner of the bridge event subscription.
pub struct EventConsumer {
    client: Arc<BridgeClient>,
    shutdown: CancellationToken,
    buffer: Arc<RwLock<VecDeque<HueEvent>>>,
    max_events: usize,
    conn: Mutex<ConnState>,
    delivery: broadcast::Sender<HueEvent>,
    errors: broadcast::Sender<String>,
}

impl EventConsumer {
    pub fn new(client: Arc<BridgeClient>, shutdown: CancellationToken) -> Self {
        Self::with_capacity(client, shutdown, DEFAULT_MAX_EVENTS)
    }

    pub fn with_capacity(
        client: Arc<BridgeClient>,
        shutdown: CancellationToken,
        max_events: usize,
    ) -> Self {
        let (delivery, _) = broadcast::channel(DELIVERY_CAPACITY);
        let (errors, _) = broadcast::channel(10);
        Self {
            client,
            shutdown,
            buffer: Arc::new(RwLock::new(VecDeque::with_capacity(max_events))),
            max_events,
            conn: Mutex::new(ConnState {
                streaming: false,
                stop: CancellationToken::new(),
            }),
            delivery,
            errors,
        }
    }

    /// Start the stream. Idempotent: a second start while streaming is a
    /// no-op and reports `false`. `filter` is an optional comma-separated
    /// list of event types; only matching events reach subscribers, but
    /// the ring buffer always retains everything.
    pub fn start(&self, filter: Option<&str>) -> bool {
        let mut conn = self.conn.lock();
        if conn.streaming {
            return false;
        }

        let filters: Vec<String> = filter
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let stop = self.shutdown.child_token();
        conn.stop = stop.clone();
        conn.streaming = true;

        let client = Arc::clone(&self.client);
        let buffer = Arc::clone(&self.buffer);
        let max_events = self.max_events;
        let delivery = self.delivery.clone();
        let errors = self.errors.clone();

        tokio::spawn(async move {
            loop {
                if stop.is_cancelled() {
                    break;
                }
                match read_stream(&client, &buffer, max_events, &filters, &delivery, &stop).await
                {
                    Ok(()) => debug!("event stream closed by bridge"),
                    Err(e) => {
                        warn!(error = %e, "event stream error");
                        let _ = errors.send(e.to_string());
                    }
                }
                tokio::select! {
                    () = stop.cancelled() => break,
                    () = tokio::time::sleep(RECONNECT_DELAY) => {}
                }
            }
            debug!("event consumer exited");
        });

        true
    }

    /// Stop reading. The ring buffer is retained for post-mortem queries.
    pub fn stop(&self) -> bool {
        let mut conn = self.conn.lock();
        if !conn.streaming {
            return false;
        }
        conn.stop.cancel();
        conn.streaming = false;
        true
    }

    pub fn is_streaming(&self) -> bool {
        self.conn.lock().streaming
    }

    pub fn status(&self) -> EventStreamStatus {
        EventStreamStatus {
            streaming: self.is_streaming(),
            buffered: self.buffer.read().len(),
            capacity: self.max_events,
        }
    }

    /// Newest-first slice of the ring buffer, filtered by event type and
    /// clipped to `limit`. Filtering here is retrospective: it works for
    /// types excluded from the live subscription filter.
    pub fn recent_events(&self, limit: usize, kind: Option<&str>) -> Vec<HueEvent> {
        let buffer = self.buffer.read();
        buffer
            .iter()
            .rev()
            .filter(|e| kind.map_or(true, |k| e.matches(k)))
            .take(limit)
            .cloned()
            .collect()
    }

    /// Subscribe to the filtered live delivery channel.
    pub fn subscribe(&self) -> broadcast::Receiver<HueEvent> {
        self.delivery.subscribe()
    }

    /// Subscribe to stream errors (reconnects are reported here too).
    pub fn subscribe_errors(&self) -> broadcast::Receiver<String> {
        self.errors.subscribe()
    }
}

/// Push one event into the ring buffer, evicting the oldest when full.
fn store_event(buffer: &RwLock<VecDeque<HueEvent>>, max_events: usize, event: HueEvent) {
    let mut buffer = buffer.write();
    if buffer.len() >= max_events {
        buffer.pop_front();
    }
    buffer.push_back(event);
}

/// One connection attempt: read frames until EOF, error, or stop.
async fn read_stream(
    client: &BridgeClient,
    buffer: &RwLock<VecDeque<HueEvent>>,
    max_events: usize,
    filters: &[String],
    delivery: &broadcast::Sender<HueEvent>,
    stop: &CancellationToken,
) -> Result<(), AppError> {
    let resp = client.open_event_stream().await?;
    let mut body = resp.bytes_stream();
    let mut pending = String::new();
    let mut frame = FrameAccumulator::default();

    loop {
        let chunk = tokio::select! {
            () = stop.cancelled() => return Ok(()),
            chunk = body.next() => chunk,
        };
        let Some(chunk) = chunk else {
            return Ok(()); // EOF
        };
        let chunk = chunk.map_err(|e| AppError::Transport {
            message: e.to_string(),
        })?;
        pending.push_str(&String::from_utf8_lossy(&chunk));

        while let Some(newline) = pending.find('\n') {
            let line: String = pending.drain(..=newline).collect();
            let Some(payload) = frame.feed(line.trim_end_matches('\n')) else {
                continue;
            };
            match serde_json::from_str::<Vec<HueEvent>>(&payload) {
                Ok(events) => {
                    for event in events {
                        let deliver =
                            filters.is_empty() || filters.iter().any(|f| event.matches(f));
                        if deliver {
                            // No subscribers is fine; lagging subscribers
                            // lose oldest events, the reader never blocks.
                            let _ = delivery.send(event.clone());
                        }
                        store_event(buffer, max_events, event);
                    }
                }
                Err(e) => warn!(error = %e, "failed to parse event frame"),
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn event(kind: EventKind, resource: ResourceEvent) -> HueEvent {
        HueEvent {
            creationtime: String::new(),
            id: String::new(),
            kind,
            data: vec![resource],
        }
    }

    fn motion_event() -> HueEvent {
        event(
            EventKind::Update,
            ResourceEvent::Motion {
                id: "m1".into(),
                motion: Some(MotionPayload { motion: true }),
            },
        )
    }

    fn button_event() -> HueEvent {
        event(
            EventKind::Update,
            ResourceEvent::Button {
                id: "b1".into(),
                button: None,
            },
        )
    }

    #[test]
    fn frame_accumulator_joins_data_and_skips_keepalives() {
        let mut acc = FrameAccumulator::default();
        assert_eq!(acc.feed(": hi"), None);
        assert_eq!(acc.feed(""), None); // blank without data: nothing
        assert_eq!(acc.feed("data: [{\"a\":"), None);
        assert_eq!(acc.feed("data: 1}]"), None);
        assert_eq!(acc.feed("").as_deref(), Some("[{\"a\":1}]"));
        // Accumulator resets after a frame.
        assert_eq!(acc.feed("data: next"), None);
        assert_eq!(acc.feed("\r").as_deref(), Some("next"));
    }

    #[test]
    fn event_frame_parses_typed_payloads() {
        let payload = r#"[{
            "creationtime": "2025-01-01T00:00:00Z",
            "id": "evt-1",
            "type": "update",
            "data": [
                {"type": "light", "id": "l1", "on": {"on": true}, "dimming": {"brightness": 40.0}},
                {"type": "motion", "id": "m1", "motion": {"motion": true}},
                {"type": "something_new", "id": "x"}
            ]
        }]"#;
        let events: Vec<HueEvent> = serde_json::from_str(payload).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EventKind::Update);
        assert_eq!(events[0].data.len(), 3);
        assert!(matches!(events[0].data[0], ResourceEvent::Light { .. }));
        assert!(matches!(events[0].data[2], ResourceEvent::Unknown));
        assert!(events[0].matches("light"));
        assert!(events[0].matches("update"));
        assert!(!events[0].matches("button"));
    }

    #[test]
    fn ring_buffer_drops_oldest_at_capacity() {
        let buffer = RwLock::new(VecDeque::new());
        for i in 0..15 {
            let mut e = motion_event();
            e.id = format!("evt-{i}");
            store_event(&buffer, 10, e);
        }
        let buffer = buffer.read();
        assert_eq!(buffer.len(), 10);
        // Oldest surviving entry is evt-5; order matches receive order.
        assert_eq!(buffer.front().unwrap().id, "evt-5");
        assert_eq!(buffer.back().unwrap().id, "evt-14");
    }

    #[tokio::test]
    async fn recent_events_filters_retrospectively() {
        let client = Arc::new(
            BridgeClient::new("127.0.0.1", "test-key").unwrap(),
        );
        let consumer =
            EventConsumer::with_capacity(client, CancellationToken::new(), 100);

        for _ in 0..3 {
            store_event(&consumer.buffer, consumer.max_events, motion_event());
        }
        store_event(&consumer.buffer, consumer.max_events, button_event());

        let buttons = consumer.recent_events(50, Some("button"));
        assert_eq!(buttons.len(), 1);
        let motions = consumer.recent_events(2, Some("motion"));
        assert_eq!(motions.len(), 2); // clipped to limit
        let all = consumer.recent_events(50, None);
        assert_eq!(all.len(), 4);
        // Newest first.
        assert!(matches!(all[0].data[0], ResourceEvent::Button { .. }));
    }

    #[tokio::test]
    async fn slow_subscribers_lose_oldest_events_and_never_block_the_reader() {
        let client = Arc::new(
            BridgeClient::new("127.0.0.1", "test-key").unwrap(),
        );
        let consumer =
            EventConsumer::with_capacity(client, CancellationToken::new(), 2000);

        let mut rx = consumer.subscribe();
        // Overfill the delivery channel without draining it.
        for i in 0..(DELIVERY_CAPACITY + 50) {
            let mut e = motion_event();
            e.id = format!("evt-{i}");
            let _ = consumer.delivery.send(e);
        }

        // The lagging subscriber is told how much it missed, then reads
        // the newest retained events in order.
        match rx.recv().await {
            Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                assert_eq!(n as usize, 50);
            }
            other => panic!("expected lag, got {other:?}"),
        }
        let next = rx.recv().await.unwrap();
        assert_eq!(next.id, "evt-50");
    }

    #[tokio::test]
    async fn start_is_idempotent_and_stop_retains_buffer() {
        let client = Arc::new(
            BridgeClient::new("127.0.0.1", "test-key").unwrap(),
        );
        let consumer =
            EventConsumer::with_capacity(client, CancellationToken::new(), 10);

        assert!(consumer.start(Some("motion")));
        assert!(!consumer.start(None), "second start must be a no-op");
        assert!(consumer.is_streaming());

        store_event(&consumer.buffer, consumer.max_events, motion_event());
        assert!(consumer.stop());
        assert!(!consumer.stop(), "second stop must be a no-op");
        assert!(!consumer.is_streaming());
        assert_eq!(consumer.status().buffered, 1, "buffer survives stop");
    }
}
