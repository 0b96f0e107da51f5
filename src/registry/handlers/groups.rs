use std::sync::Arc;

use crate::bridge::native;
use crate::color;
use crate::error::AppError;
use crate::registry::params::{
    GroupBrightnessParams, GroupColorParams, GroupEffectParams, GroupIdParams,
};
use crate::registry::CommandOutput;
use crate::resolve;
use crate::state::AppState;

pub async fn group_on(state: &Arc<AppState>, p: GroupIdParams) -> Result<CommandOutput, AppError> {
    let id = resolve::resolve_group(&state.bridge, &p.group_id).await?;
    state.bridge.turn_on_group(&id).await?;
    Ok(CommandOutput::unit(format!("Group {} turned on", p.group_id)))
}

pub async fn group_off(state: &Arc<AppState>, p: GroupIdParams) -> Result<CommandOutput, AppError> {
    let id = resolve::resolve_group(&state.bridge, &p.group_id).await?;
    state.bridge.turn_off_group(&id).await?;
    Ok(CommandOutput::unit(format!("Group {} turned off", p.group_id)))
}

pub async fn group_brightness(
    state: &Arc<AppState>,
    p: GroupBrightnessParams,
) -> Result<CommandOutput, AppError> {
    if !(0.0..=100.0).contains(&p.brightness) {
        return Err(AppError::input("brightness must be between 0 and 100"));
    }
    let id = resolve::resolve_group(&state.bridge, &p.group_id).await?;
    state.bridge.set_group_brightness(&id, p.brightness).await?;
    Ok(CommandOutput::unit(format!(
        "Group {} brightness set to {}%",
        p.group_id, p.brightness
    )))
}

pub async fn group_color(
    state: &Arc<AppState>,
    p: GroupColorParams,
) -> Result<CommandOutput, AppError> {
    let hex = color::normalize_color(&p.color)?;
    let id = resolve::resolve_group(&state.bridge, &p.group_id).await?;
    state.bridge.set_group_color(&id, &hex).await?;
    Ok(CommandOutput::unit(format!(
        "Group {} color set to {}",
        p.group_id, p.color
    )))
}

pub async fn group_effect(
    state: &Arc<AppState>,
    p: GroupEffectParams,
) -> Result<CommandOutput, AppError> {
    let id = resolve::resolve_group(&state.bridge, &p.group_id).await?;
    state.bridge.set_group_effect(&id, &p.effect, p.duration).await?;

    let mut message = format!(
        "Group {} effect set to {} - {}",
        p.group_id,
        p.effect,
        native::description(&p.effect)
    );
    if let Some(duration) = p.duration.filter(|&d| d > 0) {
        message.push_str(&format!(" (duration: {duration} seconds)"));
    }
    Ok(CommandOutput::unit(message))
}
