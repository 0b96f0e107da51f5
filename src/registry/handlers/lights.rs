use std::sync::Arc;

use crate::bridge::native;
use crate::color;
use crate::error::AppError;
use crate::registry::params::{
    LightBrightnessParams, LightColorParams, LightEffectParams, LightIdParams,
};
use crate::registry::CommandOutput;
use crate::resolve;
use crate::state::AppState;

pub async fn light_on(state: &Arc<AppState>, p: LightIdParams) -> Result<CommandOutput, AppError> {
    let id = resolve::resolve_light(&state.bridge, &p.light_id).await?;
    state.bridge.turn_on_light(&id).await?;
    Ok(CommandOutput::unit(format!("Light {} turned on", p.light_id)))
}

pub async fn light_off(state: &Arc<AppState>, p: LightIdParams) -> Result<CommandOutput, AppError> {
    let id = resolve::resolve_light(&state.bridge, &p.light_id).await?;
    state.bridge.turn_off_light(&id).await?;
    Ok(CommandOutput::unit(format!("Light {} turned off", p.light_id)))
}

pub async fn light_brightness(
    state: &Arc<AppState>,
    p: LightBrightnessParams,
) -> Result<CommandOutput, AppError> {
    if !(0.0..=100.0).contains(&p.brightness) {
        return Err(AppError::input("brightness must be between 0 and 100"));
    }
    let id = resolve::resolve_light(&state.bridge, &p.light_id).await?;
    state.bridge.set_light_brightness(&id, p.brightness).await?;
    Ok(CommandOutput::unit(format!(
        "Light {} brightness set to {}%",
        p.light_id, p.brightness
    )))
}

pub async fn light_color(
    state: &Arc<AppState>,
    p: LightColorParams,
) -> Result<CommandOutput, AppError> {
    let hex = color::normalize_color(&p.color)?;
    let id = resolve::resolve_light(&state.bridge, &p.light_id).await?;
    state.bridge.set_light_color(&id, &hex).await?;
    Ok(CommandOutput::unit(format!(
        "Light {} color set to {}",
        p.light_id, p.color
    )))
}

pub async fn light_effect(
    state: &Arc<AppState>,
    p: LightEffectParams,
) -> Result<CommandOutput, AppError> {
    let id = resolve::resolve_light(&state.bridge, &p.light_id).await?;
    state.bridge.set_light_effect(&id, &p.effect, p.duration).await?;

    let mut message = format!(
        "Light {} effect set to {} - {}",
        p.light_id,
        p.effect,
        native::description(&p.effect)
    );
    if let Some(duration) = p.duration.filter(|&d| d > 0) {
        message.push_str(&format!(" (duration: {duration} seconds)"));
    }
    Ok(CommandOutput::unit(message))
}

pub async fn identify_light(
    state: &Arc<AppState>,
    p: LightIdParams,
) -> Result<CommandOutput, AppError> {
    let id = resolve::resolve_light(&state.bridge, &p.light_id).await?;
    state.bridge.identify_light(&id).await?;
    Ok(CommandOutput::unit(format!(
        "Light {} is blinking for identification",
        p.light_id
    )))
}

pub async fn get_light_state(
    state: &Arc<AppState>,
    p: LightIdParams,
) -> Result<CommandOutput, AppError> {
    let id = resolve::resolve_light(&state.bridge, &p.light_id).await?;
    let light = state.bridge.get_light(&id).await?;

    let mut lines = vec![
        format!("Light: {}", light.metadata.name),
        format!("On: {}", light.on.on),
        format!("Brightness: {}%", light.brightness()),
    ];
    if let Some(color) = &light.color {
        lines.push(format!("Color XY: ({:.3}, {:.3})", color.xy.x, color.xy.y));
    }
    if let Some(ct) = &light.color_temperature {
        if ct.mirek_valid.unwrap_or(false) {
            if let Some(mirek) = ct.mirek {
                lines.push(format!("Color temperature: {mirek} mirek"));
            }
        }
    }
    if let Some(effects) = &light.effects {
        if let Some(effect) = &effects.effect {
            lines.push(format!("Effect: {effect}"));
        }
    }

    Ok(CommandOutput::json(lines.join("\n"), &light_summary(&light)))
}

fn light_summary(light: &crate::bridge::types::Light) -> serde_json::Value {
    serde_json::json!({
        "id": light.id,
        "name": light.metadata.name,
        "on": light.on.on,
        "brightness": light.brightness(),
        "xy": light.color.as_ref().map(|c| [c.xy.x, c.xy.y]),
        "mirek": light.color_temperature.as_ref().and_then(|ct| ct.mirek),
        "effect": light.effects.as_ref().and_then(|e| e.effect.clone()),
    })
}
