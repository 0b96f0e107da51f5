//! Typed models for the Hue v2 REST resources the engine touches.
//!
//! Cross-resource links (room ↔ device ↔ light ↔ grouped-light) are plain
//! id-based [`ResourceIdentifier`]s; the resolver walks them by querying the
//! bridge rather than materializing a graph in memory.

use serde::{Deserialize, Serialize};

// ── Shared fragments ────────────────────────────────────────────

/// One entry of the `errors` array in the v2 response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct BridgeApiError {
    pub description: String,
}

/// Reference to another bridge resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceIdentifier {
    pub rid: String,
    pub rtype: String,
}

impl ResourceIdentifier {
    pub fn new(rid: impl Into<String>, rtype: impl Into<String>) -> Self {
        Self {
            rid: rid.into(),
            rtype: rtype.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archetype: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OnState {
    pub on: bool,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Dimming {
    pub brightness: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_dim_level: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Xy {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorState {
    pub xy: Xy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gamut_type: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColorTemperature {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mirek: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mirek_valid: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dynamics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Transition duration in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Effects {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub effect_values: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Alert {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub action_values: Vec<String>,
}

// ── Read models ─────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct Light {
    pub id: String,
    #[serde(default)]
    pub id_v1: Option<String>,
    #[serde(default)]
    pub owner: Option<ResourceIdentifier>,
    #[serde(default)]
    pub metadata: Metadata,
    pub on: OnState,
    #[serde(default)]
    pub dimming: Option<Dimming>,
    #[serde(default)]
    pub color: Option<ColorState>,
    #[serde(default)]
    pub color_temperature: Option<ColorTemperature>,
    #[serde(default)]
    pub effects: Option<Effects>,
    #[serde(default)]
    pub mode: Option<String>,
}

impl Light {
    pub fn brightness(&self) -> f64 {
        self.dimming.map_or(0.0, |d| d.brightness)
    }
}

/// Joint light state of a room or zone; the target of group mutations.
#[derive(Debug, Clone, Deserialize)]
pub struct GroupedLight {
    pub id: String,
    #[serde(default)]
    pub id_v1: Option<String>,
    #[serde(default)]
    pub owner: Option<ResourceIdentifier>,
    #[serde(default)]
    pub on: Option<OnState>,
    #[serde(default)]
    pub dimming: Option<Dimming>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scene {
    pub id: String,
    #[serde(default)]
    pub id_v1: Option<String>,
    #[serde(default)]
    pub metadata: Metadata,
    pub group: ResourceIdentifier,
    #[serde(default)]
    pub actions: Vec<SceneAction>,
    #[serde(default)]
    pub speed: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneAction {
    pub target: ResourceIdentifier,
    pub action: LightUpdate,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Room {
    pub id: String,
    #[serde(default)]
    pub id_v1: Option<String>,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub children: Vec<ResourceIdentifier>,
    #[serde(default)]
    pub services: Vec<ResourceIdentifier>,
}

impl Room {
    /// The grouped-light service of this room, if it has one.
    pub fn grouped_light_id(&self) -> Option<&str> {
        self.services
            .iter()
            .find(|s| s.rtype == "grouped_light")
            .map(|s| s.rid.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Zone {
    pub id: String,
    #[serde(default)]
    pub id_v1: Option<String>,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub children: Vec<ResourceIdentifier>,
    #[serde(default)]
    pub services: Vec<ResourceIdentifier>,
}

impl Zone {
    pub fn grouped_light_id(&self) -> Option<&str> {
        self.services
            .iter()
            .find(|s| s.rtype == "grouped_light")
            .map(|s| s.rid.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Device {
    pub id: String,
    #[serde(default)]
    pub id_v1: Option<String>,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub services: Vec<ResourceIdentifier>,
    #[serde(default)]
    pub product_data: Option<ProductData>,
}

impl Device {
    /// Ids of all light services this device exposes.
    pub fn light_ids(&self) -> impl Iterator<Item = &str> {
        self.services
            .iter()
            .filter(|s| s.rtype == "light")
            .map(|s| s.rid.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductData {
    #[serde(default)]
    pub model_id: Option<String>,
    #[serde(default)]
    pub manufacturer_name: Option<String>,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub software_version: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BridgeInfo {
    pub id: String,
    #[serde(default)]
    pub id_v1: Option<String>,
    pub bridge_id: String,
    #[serde(default)]
    pub time_zone: Option<TimeZone>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TimeZone {
    pub time_zone: String,
}

// ── Write models ────────────────────────────────────────────────

/// Partial update for a light or a grouped light. Only the populated
/// fields go on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LightUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on: Option<OnState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimming: Option<DimmingUpdate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorUpdate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_temperature: Option<MirekUpdate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dynamics: Option<Dynamics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effects: Option<EffectsUpdate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert: Option<AlertUpdate>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DimmingUpdate {
    pub brightness: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ColorUpdate {
    pub xy: Xy,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MirekUpdate {
    pub mirek: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectsUpdate {
    pub effect: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertUpdate {
    pub action: String,
}

impl LightUpdate {
    pub fn on(self) -> Self {
        Self {
            on: Some(OnState { on: true }),
            ..self
        }
    }

    pub fn off(self) -> Self {
        Self {
            on: Some(OnState { on: false }),
            ..self
        }
    }

    pub fn with_brightness(self, brightness: f64) -> Self {
        Self {
            dimming: Some(DimmingUpdate { brightness }),
            ..self
        }
    }

    pub fn with_xy(self, x: f64, y: f64) -> Self {
        Self {
            color: Some(ColorUpdate { xy: Xy { x, y } }),
            ..self
        }
    }

    pub fn with_mirek(self, mirek: u16) -> Self {
        Self {
            color_temperature: Some(MirekUpdate { mirek }),
            ..self
        }
    }

    pub fn with_effect(self, effect: impl Into<String>) -> Self {
        Self {
            effects: Some(EffectsUpdate {
                effect: effect.into(),
            }),
            ..self
        }
    }

    /// Transition duration, milliseconds on the wire.
    pub fn with_duration_ms(self, ms: u64) -> Self {
        Self {
            dynamics: Some(Dynamics {
                duration: Some(ms),
                ..Dynamics::default()
            }),
            ..self
        }
    }

    pub fn with_alert(self, action: impl Into<String>) -> Self {
        Self {
            alert: Some(AlertUpdate {
                action: action.into(),
            }),
            ..self
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SceneCreate {
    #[serde(rename = "type")]
    pub type_: &'static str,
    pub metadata: Metadata,
    pub group: ResourceIdentifier,
    pub actions: Vec<SceneAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SceneUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ZoneCreate {
    #[serde(rename = "type")]
    pub type_: &'static str,
    pub metadata: Metadata,
    pub children: Vec<ResourceIdentifier>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GroupUpdateBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<ResourceIdentifier>>,
}

/// POST responses return references to the created resources.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedRef {
    pub rid: String,
}
