//! UDP entertainment streaming.
//!
//! One streamer per entertainment configuration: a UDP socket to
//! `<bridge>:2100`, a keep-alive ticker at the configured cadence, and a
//! monotonically wrapping 8-bit frame sequence. Writes are best-effort;
//! send errors are logged and the session continues.
//!
//! The plain-UDP framing here is a development fixture. Production
//! bridges expect a DTLS handshake keyed by the application key before
//! they accept frames; that handshake is out of scope.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use tokio::net::UdpSocket;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::bridge::BridgeClient;
use crate::color;
use crate::error::AppError;

/// Default frame cadence, ≈ 20 fps.
pub const DEFAULT_UPDATE_RATE: Duration = Duration::from_millis(50);

/// Entertainment UDP port on the bridge.
const STREAM_PORT: u16 = 2100;

/// One light's 16-bit color for a frame.
#[derive(Debug, Clone)]
pub struct ColorUpdate {
    pub light_id: String,
    pub red: u16,
    pub green: u16,
    pub blue: u16,
}

/// Build one `HueStream` v2 frame: 16 header bytes plus a 7-byte block
/// per channel (u16le channel id, u16le red, green, blue). Channels with
/// no supplied color are driven to zero; colors for lights not enrolled
/// in the configuration are silently discarded.
pub fn build_frame(
    sequence: u8,
    channel_lights: &[(u16, String)],
    colors: &HashMap<String, (u16, u16, u16)>,
) -> Vec<u8> {
    let mut packet = Vec::with_capacity(16 + 7 * channel_lights.len());
    packet.extend_from_slice(b"HueStream");
    packet.extend_from_slice(&[0x02, 0x00]); // protocol version 2.0
    packet.push(sequence);
    packet.extend_from_slice(&[0x00, 0x00]); // reserved
    packet.push(0x01); // color mode: RGB
    packet.push(0x00); // reserved

    for (channel_id, light_id) in channel_lights {
        let (r, g, b) = colors.get(light_id).copied().unwrap_or((0, 0, 0));
        packet.extend_from_slice(&channel_id.to_le_bytes());
        packet.extend_from_slice(&r.to_le_bytes());
        packet.extend_from_slice(&g.to_le_bytes());
        packet.extend_from_slice(&b.to_le_bytes());
    }
    packet
}

fn next_sequence(counter: &AtomicU8) -> u8 {
    counter.fetch_add(1, Ordering::Relaxed)
}

#[derive(Debug, Clone, Serialize)]
pub struct StreamerStatus {
    pub config_id: String,
    pub channels: usize,
    pub lights: Vec<String>,
    pub update_rate_ms: u64,
}

/// A live streaming session for one entertainment configuration.
pub struct EntertainmentStreamer {
    client: Arc<BridgeClient>,
    config_id: String,
    channel_lights: Vec<(u16, String)>,
    socket: Arc<UdpSocket>,
    sequence: AtomicU8,
    update_rate: Mutex<Duration>,
    stop: CancellationToken,
}

impl EntertainmentStreamer {
    /// Start a session: tell the bridge to open the configuration, fetch
    /// its channel layout, connect the UDP socket, and start the
    /// keep-alive ticker.
    pub async fn start(
        client: Arc<BridgeClient>,
        config_id: &str,
        update_rate: Duration,
        shutdown: &CancellationToken,
    ) -> Result<Arc<Self>, AppError> {
        client.start_entertainment(config_id).await?;
        let config = client.get_entertainment_configuration(config_id).await?;

        let socket = UdpSocket::bind("0.0.0.0:0")
            .await
            .map_err(|e| AppError::Transport {
                message: e.to_string(),
            })?;
        socket
            .connect((client.bridge_ip(), STREAM_PORT))
            .await
            .map_err(|e| AppError::Transport {
                message: e.to_string(),
            })?;

        let streamer = Arc::new(Self {
            client,
            config_id: config_id.to_string(),
            channel_lights: config.channel_lights(),
            socket: Arc::new(socket),
            sequence: AtomicU8::new(0),
            update_rate: Mutex::new(update_rate),
            stop: shutdown.child_token(),
        });

        let ticker = Arc::clone(&streamer);
        tokio::spawn(async move {
            loop {
                let rate = *ticker.update_rate.lock();
                tokio::select! {
                    () = ticker.stop.cancelled() => break,
                    () = tokio::time::sleep(rate) => {}
                }
                // Keep-alive: a structurally valid zero-update frame.
                ticker.send_frame(&[]);
            }
            debug!(config = %ticker.config_id, "streaming ticker stopped");
        });

        info!(config = %config_id, channels = streamer.channel_lights.len(), "UDP streaming started");
        Ok(streamer)
    }

    pub fn config_id(&self) -> &str {
        &self.config_id
    }

    /// Lights enrolled in the configuration's channels.
    pub fn lights(&self) -> Vec<String> {
        self.channel_lights
            .iter()
            .map(|(_, light)| light.clone())
            .collect()
    }

    pub fn update_rate(&self) -> Duration {
        *self.update_rate.lock()
    }

    /// Change the ticker cadence; takes effect at the next tick.
    pub fn set_update_rate(&self, rate: Duration) {
        *self.update_rate.lock() = rate;
    }

    /// Send one frame now with the supplied colors. Absent channels are
    /// driven to zero.
    pub fn send_colors(&self, updates: &[ColorUpdate]) {
        self.send_frame(updates);
    }

    fn send_frame(&self, updates: &[ColorUpdate]) {
        let colors: HashMap<String, (u16, u16, u16)> = updates
            .iter()
            .map(|u| (u.light_id.clone(), (u.red, u.green, u.blue)))
            .collect();
        let packet = build_frame(
            next_sequence(&self.sequence),
            &self.channel_lights,
            &colors,
        );
        if let Err(e) = self.socket.try_send(&packet) {
            // Best-effort: log and keep the session alive.
            warn!(config = %self.config_id, error = %e, "UDP send failed");
        }
    }

    /// End the session: stop the ticker and tell the bridge.
    pub async fn stop(&self) -> Result<(), AppError> {
        self.stop.cancel();
        self.client.stop_entertainment(&self.config_id).await
    }
}

// ── Registry ────────────────────────────────────────────────────

/// Process-wide registry holding at most one session per configuration.
pub struct StreamerRegistry {
    client: Arc<BridgeClient>,
    shutdown: CancellationToken,
    streamers: RwLock<HashMap<String, Arc<EntertainmentStreamer>>>,
}

impl StreamerRegistry {
    pub fn new(client: Arc<BridgeClient>, shutdown: CancellationToken) -> Self {
        Self {
            client,
            shutdown,
            streamers: RwLock::new(HashMap::new()),
        }
    }

    /// Start streaming for a configuration. Returns `false` when a
    /// session is already active for it.
    pub async fn start(
        &self,
        config_id: &str,
        update_rate_ms: Option<u64>,
    ) -> Result<bool, AppError> {
        if self.streamers.read().contains_key(config_id) {
            return Ok(false);
        }

        let rate = update_rate_ms
            .filter(|&ms| ms > 0)
            .map_or(DEFAULT_UPDATE_RATE, Duration::from_millis);
        let streamer = EntertainmentStreamer::start(
            Arc::clone(&self.client),
            config_id,
            rate,
            &self.shutdown,
        )
        .await?;

        self.streamers
            .write()
            .insert(config_id.to_string(), streamer);
        Ok(true)
    }

    /// Stop and remove a session. Returns `false` when none was active.
    pub async fn stop(&self, config_id: &str) -> Result<bool, AppError> {
        let streamer = self.streamers.write().remove(config_id);
        match streamer {
            Some(streamer) => {
                streamer.stop().await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn get(&self, config_id: &str) -> Option<Arc<EntertainmentStreamer>> {
        self.streamers.read().get(config_id).cloned()
    }

    pub fn status(&self) -> Vec<StreamerStatus> {
        let streamers = self.streamers.read();
        let mut list: Vec<StreamerStatus> = streamers
            .values()
            .map(|s| StreamerStatus {
                config_id: s.config_id().to_string(),
                channels: s.channel_lights.len(),
                lights: s.lights(),
                update_rate_ms: s.update_rate().as_millis() as u64,
            })
            .collect();
        list.sort_by(|a, b| a.config_id.cmp(&b.config_id));
        list
    }

    /// Run a rainbow over the session's lights for `duration`, each light
    /// phase-shifted, at 20 fps.
    pub fn rainbow(&self, config_id: &str, duration: Duration) -> Result<(), AppError> {
        let streamer = self.get(config_id).ok_or_else(|| AppError::State {
            message: format!("no active streaming for configuration {config_id}"),
        })?;
        if streamer.channel_lights.is_empty() {
            return Err(AppError::state("no lights found in configuration"));
        }

        tokio::spawn(async move {
            let started = Instant::now();
            let mut ticker = tokio::time::interval(Duration::from_millis(50));
            loop {
                tokio::select! {
                    () = streamer.stop.cancelled() => break,
                    _ = ticker.tick() => {}
                }
                let elapsed = started.elapsed();
                if elapsed >= duration {
                    break;
                }
                let progress = elapsed.as_secs_f64() / duration.as_secs_f64();

                let updates: Vec<ColorUpdate> = streamer
                    .channel_lights
                    .iter()
                    .enumerate()
                    .map(|(i, (_, light_id))| {
                        let hue = ((progress + i as f64 * 0.1) * 360.0) % 360.0;
                        let (r, g, b) = color::hsv_to_rgb(hue, 1.0, 1.0);
                        let (red, green, blue) = color::float_rgb_to_u16(r, g, b);
                        ColorUpdate {
                            light_id: light_id.clone(),
                            red,
                            green,
                            blue,
                        }
                    })
                    .collect();
                streamer.send_colors(&updates);
            }
            debug!(config = %streamer.config_id, "rainbow finished");
        });

        Ok(())
    }

    /// Stop every session; used on engine shutdown.
    pub async fn stop_all(&self) {
        let streamers: Vec<Arc<EntertainmentStreamer>> =
            self.streamers.write().drain().map(|(_, s)| s).collect();
        for streamer in streamers {
            if let Err(e) = streamer.stop().await {
                warn!(config = %streamer.config_id(), error = %e, "failed to stop streamer");
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn channels(n: u16) -> Vec<(u16, String)> {
        (0..n).map(|i| (i, format!("light-{i}"))).collect()
    }

    #[test]
    fn frame_header_and_length() {
        let frame = build_frame(7, &channels(3), &HashMap::new());
        assert_eq!(frame.len(), 16 + 7 * 3);
        assert_eq!(&frame[..9], b"HueStream");
        assert_eq!(&frame[9..11], &[0x02, 0x00]);
        assert_eq!(frame[11], 7);
        assert_eq!(&frame[12..14], &[0x00, 0x00]);
        assert_eq!(frame[14], 0x01);
        assert_eq!(frame[15], 0x00);
    }

    #[test]
    fn channel_blocks_are_little_endian() {
        let mut colors = HashMap::new();
        colors.insert("light-1".to_string(), (0x1234_u16, 0xABCD_u16, 0x00FF_u16));
        let frame = build_frame(0, &channels(2), &colors);

        // Channel 0: no color supplied → zeros.
        assert_eq!(&frame[16..23], &[0x00, 0x00, 0, 0, 0, 0, 0]);
        // Channel 1: id 1 then r, g, b little-endian.
        assert_eq!(&frame[23..25], &[0x01, 0x00]);
        assert_eq!(&frame[25..27], &[0x34, 0x12]);
        assert_eq!(&frame[27..29], &[0xCD, 0xAB]);
        assert_eq!(&frame[29..31], &[0xFF, 0x00]);
    }

    #[test]
    fn colors_for_unenrolled_lights_are_discarded() {
        let mut colors = HashMap::new();
        colors.insert("stranger".to_string(), (65535, 65535, 65535));
        let with_stranger = build_frame(0, &channels(2), &colors);
        let without = build_frame(0, &channels(2), &HashMap::new());
        assert_eq!(with_stranger, without);
    }

    #[test]
    fn empty_update_frame_is_still_structurally_valid() {
        let frame = build_frame(42, &channels(1), &HashMap::new());
        assert_eq!(frame.len(), 23);
        assert_eq!(&frame[..9], b"HueStream");
    }

    #[test]
    fn sequence_wraps_at_256() {
        let counter = AtomicU8::new(254);
        assert_eq!(next_sequence(&counter), 254);
        assert_eq!(next_sequence(&counter), 255);
        assert_eq!(next_sequence(&counter), 0);
        assert_eq!(next_sequence(&counter), 1);
    }
}
