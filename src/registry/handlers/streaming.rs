use std::sync::Arc;
use std::time::Duration;

use crate::color;
use crate::error::AppError;
use crate::registry::params::{
    ConfigIdParams, RainbowParams, SendColorsParams, StartStreamingParams,
};
use crate::registry::CommandOutput;
use crate::state::AppState;
use crate::streamer::ColorUpdate;

pub async fn list_entertainment(state: &Arc<AppState>) -> Result<CommandOutput, AppError> {
    let configs = state.bridge.get_entertainment_configurations().await?;
    let mut lines = vec![format!(
        "Found {} entertainment configurations:",
        configs.len()
    )];
    let mut data = Vec::with_capacity(configs.len());
    for config in &configs {
        lines.push(format!(
            "- {} (ID: {}) channels: {}, lights: {}, status: {}",
            config.metadata.name,
            config.id,
            config.channels.len(),
            config.light_services.len(),
            config.status.as_deref().unwrap_or("unknown")
        ));
        data.push(serde_json::json!({
            "id": config.id,
            "name": config.metadata.name,
            "channels": config.channels.len(),
            "lights": config.light_services.len(),
            "status": config.status,
        }));
    }
    Ok(CommandOutput::data(
        lines.join("\n"),
        serde_json::Value::Array(data),
    ))
}

pub async fn start_streaming(
    state: &Arc<AppState>,
    p: StartStreamingParams,
) -> Result<CommandOutput, AppError> {
    if p.config_id.is_empty() {
        return Err(AppError::input("config_id is required"));
    }
    if state.streamers.start(&p.config_id, p.update_rate_ms).await? {
        Ok(CommandOutput::unit(format!(
            "UDP streaming started for configuration {}",
            p.config_id
        )))
    } else {
        Ok(CommandOutput::unit(format!(
            "Streaming already active for configuration {}",
            p.config_id
        )))
    }
}

pub async fn stop_streaming(
    state: &Arc<AppState>,
    p: ConfigIdParams,
) -> Result<CommandOutput, AppError> {
    if state.streamers.stop(&p.config_id).await? {
        Ok(CommandOutput::unit(format!(
            "UDP streaming stopped for configuration {}",
            p.config_id
        )))
    } else {
        Ok(CommandOutput::unit(format!(
            "No active streaming for configuration {}",
            p.config_id
        )))
    }
}

pub async fn send_colors(
    state: &Arc<AppState>,
    p: SendColorsParams,
) -> Result<CommandOutput, AppError> {
    if p.colors.is_empty() {
        return Err(AppError::input("colors is required"));
    }
    let streamer = state.streamers.get(&p.config_id).ok_or_else(|| {
        AppError::state(format!(
            "no active streaming for configuration {}",
            p.config_id
        ))
    })?;

    let updates: Vec<ColorUpdate> = p
        .colors
        .iter()
        .map(|c| {
            let (red, green, blue) = color::rgb8_to_u16(c.r, c.g, c.b);
            ColorUpdate {
                light_id: c.light_id.clone(),
                red,
                green,
                blue,
            }
        })
        .collect();
    streamer.send_colors(&updates);

    Ok(CommandOutput::unit(format!(
        "Sent color updates to {} lights",
        updates.len()
    )))
}

pub async fn streaming_status(state: &Arc<AppState>) -> Result<CommandOutput, AppError> {
    let sessions = state.streamers.status();
    if sessions.is_empty() {
        return Ok(CommandOutput::unit("No active streaming sessions"));
    }

    let mut lines = vec!["Active streaming sessions:".to_string()];
    for session in &sessions {
        lines.push(format!(
            "- {} ({} channels, every {}ms)",
            session.config_id, session.channels, session.update_rate_ms
        ));
        for light in &session.lights {
            lines.push(format!("  - {light}"));
        }
    }
    Ok(CommandOutput::json(lines.join("\n"), &sessions))
}

pub async fn rainbow_effect(
    state: &Arc<AppState>,
    p: RainbowParams,
) -> Result<CommandOutput, AppError> {
    if p.duration == 0 {
        return Err(AppError::input("duration must be a positive number of seconds"));
    }
    state
        .streamers
        .rainbow(&p.config_id, Duration::from_secs(p.duration))?;
    Ok(CommandOutput::unit(format!(
        "Rainbow effect started for {} seconds",
        p.duration
    )))
}
