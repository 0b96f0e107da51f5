//! Light and grouped-light reads and mutations.

use std::collections::BTreeSet;

use super::types::{GroupedLight, Light, LightUpdate};
use super::BridgeClient;
use crate::color;
use crate::error::AppError;

impl BridgeClient {
    pub async fn get_lights(&self) -> Result<Vec<Light>, AppError> {
        self.get_data("/resource/light").await
    }

    pub async fn get_light(&self, id: &str) -> Result<Light, AppError> {
        self.get_one(&format!("/resource/light/{id}"), "light").await
    }

    /// Generic PUT of a partial light update.
    pub async fn update_light(&self, id: &str, update: &LightUpdate) -> Result<(), AppError> {
        self.put_json(&format!("/resource/light/{id}"), update).await
    }

    pub async fn turn_on_light(&self, id: &str) -> Result<(), AppError> {
        self.update_light(id, &LightUpdate::default().on()).await
    }

    pub async fn turn_off_light(&self, id: &str) -> Result<(), AppError> {
        self.update_light(id, &LightUpdate::default().off()).await
    }

    /// Brightness is a percentage in [0, 100]; fractional values pass
    /// through unrounded. Bounds are the caller's responsibility.
    pub async fn set_light_brightness(&self, id: &str, brightness: f64) -> Result<(), AppError> {
        self.update_light(id, &LightUpdate::default().with_brightness(brightness))
            .await
    }

    pub async fn set_light_color(&self, id: &str, hex: &str) -> Result<(), AppError> {
        let (x, y) = color::hex_to_xy(hex);
        self.update_light(id, &LightUpdate::default().with_xy(x, y)).await
    }

    /// Apply a native bridge effect. `duration` is whole seconds at this
    /// boundary and milliseconds (`dynamics.duration`) on the wire.
    pub async fn set_light_effect(
        &self,
        id: &str,
        effect: &str,
        duration_secs: Option<u64>,
    ) -> Result<(), AppError> {
        let mut update = LightUpdate::default().with_effect(effect);
        if let Some(secs) = duration_secs.filter(|&s| s > 0) {
            update = update.with_duration_ms(secs * 1000);
        }
        self.update_light(id, &update).await
    }

    /// Make a light breathe once so a human can spot it.
    pub async fn identify_light(&self, id: &str) -> Result<(), AppError> {
        self.update_light(id, &LightUpdate::default().with_alert("breathe"))
            .await
    }

    // ── Grouped lights ──────────────────────────────────────────

    pub async fn get_grouped_lights(&self) -> Result<Vec<GroupedLight>, AppError> {
        self.get_data("/resource/grouped_light").await
    }

    pub async fn get_grouped_light(&self, id: &str) -> Result<GroupedLight, AppError> {
        self.get_one(&format!("/resource/grouped_light/{id}"), "group")
            .await
    }

    pub async fn update_group(&self, id: &str, update: &LightUpdate) -> Result<(), AppError> {
        self.put_json(&format!("/resource/grouped_light/{id}"), update)
            .await
    }

    pub async fn turn_on_group(&self, id: &str) -> Result<(), AppError> {
        self.update_group(id, &LightUpdate::default().on()).await
    }

    pub async fn turn_off_group(&self, id: &str) -> Result<(), AppError> {
        self.update_group(id, &LightUpdate::default().off()).await
    }

    pub async fn set_group_brightness(&self, id: &str, brightness: f64) -> Result<(), AppError> {
        self.update_group(id, &LightUpdate::default().with_brightness(brightness))
            .await
    }

    pub async fn set_group_color(&self, id: &str, hex: &str) -> Result<(), AppError> {
        let (x, y) = color::hex_to_xy(hex);
        self.update_group(id, &LightUpdate::default().with_xy(x, y)).await
    }

    pub async fn set_group_effect(
        &self,
        id: &str,
        effect: &str,
        duration_secs: Option<u64>,
    ) -> Result<(), AppError> {
        let mut update = LightUpdate::default().with_effect(effect);
        if let Some(secs) = duration_secs.filter(|&s| s > 0) {
            update = update.with_duration_ms(secs * 1000);
        }
        self.update_group(id, &update).await
    }

    /// Union of `effects.effect_values` across every light, sorted.
    pub async fn supported_effects(&self) -> Result<Vec<String>, AppError> {
        let lights = self.get_lights().await?;
        let set: BTreeSet<String> = lights
            .into_iter()
            .filter_map(|l| l.effects)
            .flat_map(|e| e.effect_values)
            .collect();
        Ok(set.into_iter().collect())
    }
}
