use std::sync::Arc;

use crate::error::AppError;
use crate::registry::CommandOutput;
use crate::state::AppState;

pub async fn list_motion_sensors(state: &Arc<AppState>) -> Result<CommandOutput, AppError> {
    let sensors = state.bridge.get_motion_sensors().await?;
    let mut lines = vec![format!("Found {} motion sensors:", sensors.len())];
    let mut data = Vec::with_capacity(sensors.len());
    for sensor in &sensors {
        lines.push(format!(
            "- {} motion: {} (enabled: {})",
            sensor.id, sensor.motion.motion, sensor.enabled
        ));
        data.push(serde_json::json!({
            "id": sensor.id,
            "motion": sensor.motion.motion,
            "enabled": sensor.enabled,
        }));
    }
    Ok(CommandOutput::data(
        lines.join("\n"),
        serde_json::Value::Array(data),
    ))
}

pub async fn list_temperature_sensors(state: &Arc<AppState>) -> Result<CommandOutput, AppError> {
    let sensors = state.bridge.get_temperature_sensors().await?;
    let mut lines = vec![format!("Found {} temperature sensors:", sensors.len())];
    let mut data = Vec::with_capacity(sensors.len());
    for sensor in &sensors {
        lines.push(format!(
            "- {}: {:.1}°C (enabled: {})",
            sensor.id, sensor.temperature.temperature, sensor.enabled
        ));
        data.push(serde_json::json!({
            "id": sensor.id,
            "temperature": sensor.temperature.temperature,
            "enabled": sensor.enabled,
        }));
    }
    Ok(CommandOutput::data(
        lines.join("\n"),
        serde_json::Value::Array(data),
    ))
}

pub async fn list_light_level_sensors(state: &Arc<AppState>) -> Result<CommandOutput, AppError> {
    let sensors = state.bridge.get_light_level_sensors().await?;
    let mut lines = vec![format!("Found {} light level sensors:", sensors.len())];
    let mut data = Vec::with_capacity(sensors.len());
    for sensor in &sensors {
        lines.push(format!(
            "- {}: level {} (enabled: {})",
            sensor.id, sensor.light_level.light_level, sensor.enabled
        ));
        data.push(serde_json::json!({
            "id": sensor.id,
            "light_level": sensor.light_level.light_level,
            "enabled": sensor.enabled,
        }));
    }
    Ok(CommandOutput::data(
        lines.join("\n"),
        serde_json::Value::Array(data),
    ))
}

pub async fn list_buttons(state: &Arc<AppState>) -> Result<CommandOutput, AppError> {
    let buttons = state.bridge.get_buttons().await?;
    let mut lines = vec![format!("Found {} buttons:", buttons.len())];
    let mut data = Vec::with_capacity(buttons.len());
    for button in &buttons {
        let last_event = button
            .button
            .button_report
            .as_ref()
            .map(|r| r.event.clone())
            .unwrap_or_default();
        lines.push(format!(
            "- {} ({}) last event: {last_event}",
            button.metadata.name, button.id
        ));
        data.push(serde_json::json!({
            "id": button.id,
            "name": button.metadata.name,
            "last_event": last_event,
        }));
    }
    Ok(CommandOutput::data(
        lines.join("\n"),
        serde_json::Value::Array(data),
    ))
}
