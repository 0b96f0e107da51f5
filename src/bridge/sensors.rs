//! Motion, temperature, light-level, and button resources.

use serde::Deserialize;

use super::types::{Metadata, ResourceIdentifier};
use super::BridgeClient;
use crate::error::AppError;

#[derive(Debug, Clone, Deserialize)]
pub struct Motion {
    pub id: String,
    #[serde(default)]
    pub id_v1: Option<String>,
    #[serde(default)]
    pub owner: Option<ResourceIdentifier>,
    #[serde(default)]
    pub enabled: bool,
    pub motion: MotionReport,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MotionReport {
    #[serde(default)]
    pub motion: bool,
    #[serde(default)]
    pub motion_valid: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Temperature {
    pub id: String,
    #[serde(default)]
    pub id_v1: Option<String>,
    #[serde(default)]
    pub owner: Option<ResourceIdentifier>,
    #[serde(default)]
    pub enabled: bool,
    pub temperature: TemperatureReport,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TemperatureReport {
    /// Degrees Celsius.
    #[serde(default)]
    pub temperature: f64,
    #[serde(default)]
    pub temperature_valid: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LightLevel {
    pub id: String,
    #[serde(default)]
    pub id_v1: Option<String>,
    #[serde(default)]
    pub owner: Option<ResourceIdentifier>,
    #[serde(default)]
    pub enabled: bool,
    #[serde(rename = "light")]
    pub light_level: LightLevelReport,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LightLevelReport {
    /// 10000 * log10(lux) + 1, the bridge's logarithmic scale.
    #[serde(default)]
    pub light_level: i64,
    #[serde(default)]
    pub light_level_valid: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Button {
    pub id: String,
    #[serde(default)]
    pub id_v1: Option<String>,
    #[serde(default)]
    pub owner: Option<ResourceIdentifier>,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub button: ButtonState,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ButtonState {
    #[serde(default)]
    pub button_report: Option<ButtonReport>,
    #[serde(default)]
    pub event_values: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ButtonReport {
    #[serde(default)]
    pub updated: Option<String>,
    pub event: String,
}

impl BridgeClient {
    pub async fn get_motion_sensors(&self) -> Result<Vec<Motion>, AppError> {
        self.get_data("/resource/motion").await
    }

    pub async fn get_temperature_sensors(&self) -> Result<Vec<Temperature>, AppError> {
        self.get_data("/resource/temperature").await
    }

    pub async fn get_light_level_sensors(&self) -> Result<Vec<LightLevel>, AppError> {
        self.get_data("/resource/light_level").await
    }

    pub async fn get_buttons(&self) -> Result<Vec<Button>, AppError> {
        self.get_data("/resource/button").await
    }
}
