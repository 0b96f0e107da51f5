//! Typed parameter structs for every tool. Targets named `*_id` accept
//! either a bridge UUID or a human name; names are resolved before any
//! mutation.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::batch::BatchCommand;
use crate::scheduler::Sequence;

fn default_true() -> bool {
    true
}

fn default_delay_ms() -> u64 {
    100
}

fn default_flash_color() -> String {
    "#FFFFFF".to_string()
}

fn default_flash_count() -> u32 {
    3
}

fn default_flash_duration_ms() -> u64 {
    200
}

fn default_min_brightness() -> f64 {
    10.0
}

fn default_max_brightness() -> f64 {
    100.0
}

fn default_pulse_duration_ms() -> u64 {
    2000
}

fn default_pulse_count() -> u32 {
    5
}

fn default_transition_ms() -> u64 {
    1000
}

fn default_strobe_rate_ms() -> u64 {
    100
}

fn default_strobe_duration_ms() -> u64 {
    5000
}

fn default_alert_color() -> String {
    "#FF0000".to_string()
}

fn default_normal_color() -> String {
    "#FFFFFF".to_string()
}

fn default_fade_duration_ms() -> u64 {
    3000
}

fn default_fade_steps() -> u32 {
    10
}

fn default_event_limit() -> usize {
    50
}

fn default_rainbow_secs() -> u64 {
    10
}

// ── Lights ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct LightIdParams {
    /// Light id or name.
    pub light_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct LightBrightnessParams {
    pub light_id: String,
    /// Brightness percentage, 0-100.
    pub brightness: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct LightColorParams {
    pub light_id: String,
    /// Hex code (#RRGGBB) or color name.
    pub color: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct LightEffectParams {
    pub light_id: String,
    /// Native effect name, e.g. `candle`, `fire`, `prism`.
    pub effect: String,
    /// Duration in seconds; 0 or absent means indefinite.
    #[serde(default)]
    pub duration: Option<u64>,
}

// ── Groups ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct GroupIdParams {
    /// Grouped-light id, or a room/zone name.
    pub group_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct GroupBrightnessParams {
    pub group_id: String,
    pub brightness: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct GroupColorParams {
    pub group_id: String,
    pub color: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct GroupEffectParams {
    pub group_id: String,
    pub effect: String,
    #[serde(default)]
    pub duration: Option<u64>,
}

// ── Scenes / zones ──────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct SceneIdParams {
    /// Scene id or name; `name:room` disambiguates by parent room.
    pub scene_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CreateSceneParams {
    pub name: String,
    /// Room whose current light states become the scene.
    pub group_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct UpdateSceneParams {
    pub scene_id: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Dynamic-scene speed, 0.0-1.0.
    #[serde(default)]
    pub speed: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CreateZoneParams {
    pub name: String,
    /// Lights to enroll, by id or name.
    #[serde(default)]
    pub light_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ZoneIdParams {
    pub zone_id: String,
}

// ── Batch ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct BatchParams {
    pub commands: Vec<BatchCommand>,
    /// Pause between steps, milliseconds.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
    /// Fire-and-forget by default; false waits and returns per-step
    /// results.
    #[serde(default = "default_true", rename = "async")]
    pub async_: bool,
    /// When set, the batch is also stored in the scene cache under this
    /// name before execution.
    #[serde(default)]
    pub cache_name: Option<String>,
    #[serde(default)]
    pub cache_description: Option<String>,
}

// ── Choreography effects ────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct FlashParams {
    /// Light id or name.
    pub target_id: String,
    #[serde(default = "default_flash_color")]
    pub color: String,
    #[serde(default = "default_flash_count")]
    pub flash_count: u32,
    #[serde(default = "default_flash_duration_ms")]
    pub flash_duration_ms: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct PulseParams {
    pub target_id: String,
    #[serde(default = "default_min_brightness")]
    pub min_brightness: f64,
    #[serde(default = "default_max_brightness")]
    pub max_brightness: f64,
    /// One full cycle, milliseconds.
    #[serde(default = "default_pulse_duration_ms")]
    pub pulse_duration_ms: u64,
    #[serde(default = "default_pulse_count")]
    pub pulse_count: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ColorLoopParams {
    pub target_id: String,
    /// Hex codes to cycle through; defaults to the rainbow.
    #[serde(default)]
    pub colors: Option<Vec<String>>,
    #[serde(default = "default_transition_ms")]
    pub transition_time_ms: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct StrobeParams {
    pub target_id: String,
    #[serde(default = "default_flash_color")]
    pub color: String,
    #[serde(default = "default_strobe_rate_ms")]
    pub strobe_rate_ms: u64,
    #[serde(default = "default_strobe_duration_ms")]
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct AlertParams {
    pub target_id: String,
    #[serde(default = "default_alert_color")]
    pub alert_color: String,
    #[serde(default = "default_normal_color")]
    pub normal_color: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct FadeParams {
    pub target_id: String,
    pub start_color: String,
    pub end_color: String,
    #[serde(default)]
    pub start_brightness: f64,
    #[serde(default = "default_max_brightness")]
    pub end_brightness: f64,
    #[serde(default = "default_fade_duration_ms")]
    pub duration_ms: u64,
    #[serde(default = "default_fade_steps")]
    pub steps: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CustomSequenceParams {
    /// Full sequence: name, commands (kind, action, target, params,
    /// delay_ms), and an optional loop flag.
    pub sequence: Sequence,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct StopSequenceParams {
    #[serde(default)]
    pub sequence_id: Option<String>,
    #[serde(default)]
    pub sequence_ids: Vec<String>,
}

// ── Cached scenes ───────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct SceneNameParams {
    pub scene_name: String,
}

// ── Event stream ────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct StartEventStreamParams {
    /// Comma-separated event types delivered to subscribers, e.g.
    /// `motion,button`. The ring buffer retains everything regardless.
    #[serde(default)]
    pub filter: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct RecentEventsParams {
    #[serde(default = "default_event_limit")]
    pub limit: usize,
    /// Event type to filter by, e.g. `motion`, `button`, `update`.
    #[serde(default, rename = "type")]
    pub type_: Option<String>,
}

// ── Entertainment streaming ─────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct StartStreamingParams {
    pub config_id: String,
    #[serde(default)]
    pub update_rate_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ConfigIdParams {
    pub config_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ColorSpec {
    pub light_id: String,
    /// 8-bit channels; scaled to the protocol's 16-bit range.
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct SendColorsParams {
    pub config_id: String,
    pub colors: Vec<ColorSpec>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct RainbowParams {
    pub config_id: String,
    /// Seconds.
    #[serde(default = "default_rainbow_secs")]
    pub duration: u64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn batch_defaults() {
        let p: BatchParams = serde_json::from_str(
            r#"{"commands": [{"action": "light_on", "target_id": "l1"}]}"#,
        )
        .unwrap();
        assert_eq!(p.delay_ms, 100);
        assert!(p.async_);
        assert!(p.cache_name.is_none());
    }

    #[test]
    fn async_false_round_trips_under_its_wire_name() {
        let p: BatchParams =
            serde_json::from_str(r#"{"commands": [], "async": false, "delay_ms": 5}"#).unwrap();
        assert!(!p.async_);
        assert_eq!(p.delay_ms, 5);
    }

    #[test]
    fn effect_defaults_match_the_originals() {
        let flash: FlashParams =
            serde_json::from_str(r#"{"target_id": "l1"}"#).unwrap();
        assert_eq!(flash.color, "#FFFFFF");
        assert_eq!(flash.flash_count, 3);
        assert_eq!(flash.flash_duration_ms, 200);

        let pulse: PulseParams =
            serde_json::from_str(r#"{"target_id": "l1"}"#).unwrap();
        assert_eq!(pulse.min_brightness, 10.0);
        assert_eq!(pulse.max_brightness, 100.0);
        assert_eq!(pulse.pulse_duration_ms, 2000);
        assert_eq!(pulse.pulse_count, 5);

        let strobe: StrobeParams =
            serde_json::from_str(r#"{"target_id": "l1"}"#).unwrap();
        assert_eq!(strobe.strobe_rate_ms, 100);
        assert_eq!(strobe.duration_ms, 5000);
    }

    #[test]
    fn recent_events_type_uses_wire_name() {
        let p: RecentEventsParams =
            serde_json::from_str(r#"{"limit": 5, "type": "motion"}"#).unwrap();
        assert_eq!(p.limit, 5);
        assert_eq!(p.type_.as_deref(), Some("motion"));
    }
}
