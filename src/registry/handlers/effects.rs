use std::sync::Arc;

use crate::color;
use crate::effects;
use crate::error::AppError;
use crate::registry::params::{
    AlertParams, ColorLoopParams, CustomSequenceParams, FadeParams, FlashParams, PulseParams,
    StopSequenceParams, StrobeParams,
};
use crate::registry::CommandOutput;
use crate::resolve;
use crate::state::AppState;

pub async fn flash_effect(
    state: &Arc<AppState>,
    p: FlashParams,
) -> Result<CommandOutput, AppError> {
    let color = color::normalize_color(&p.color)?;
    let target = resolve::resolve_light(&state.bridge, &p.target_id).await?;
    let seq = effects::flash(&target, &color, p.flash_count, p.flash_duration_ms);
    let id = state.scheduler.execute_sequence(seq)?;
    Ok(CommandOutput::json(
        format!(
            "Flash effect started on {}\nSequence ID: {id}\nColor: {}\nFlashes: {}",
            p.target_id, p.color, p.flash_count
        ),
        &serde_json::json!({ "sequence_id": id }),
    ))
}

pub async fn pulse_effect(
    state: &Arc<AppState>,
    p: PulseParams,
) -> Result<CommandOutput, AppError> {
    if !(0.0..=100.0).contains(&p.min_brightness) || !(0.0..=100.0).contains(&p.max_brightness) {
        return Err(AppError::input("brightness must be between 0 and 100"));
    }
    let target = resolve::resolve_light(&state.bridge, &p.target_id).await?;
    let seq = effects::pulse(
        &target,
        p.min_brightness,
        p.max_brightness,
        p.pulse_duration_ms,
        p.pulse_count,
    );
    let id = state.scheduler.execute_sequence(seq)?;
    Ok(CommandOutput::json(
        format!(
            "Pulse effect started on {}\nSequence ID: {id}\nBrightness: {}% - {}%\nPulses: {}",
            p.target_id, p.min_brightness, p.max_brightness, p.pulse_count
        ),
        &serde_json::json!({ "sequence_id": id }),
    ))
}

pub async fn color_loop_effect(
    state: &Arc<AppState>,
    p: ColorLoopParams,
) -> Result<CommandOutput, AppError> {
    let colors = match &p.colors {
        Some(colors) if !colors.is_empty() => {
            let mut normalized = Vec::with_capacity(colors.len());
            for c in colors {
                normalized.push(color::normalize_color(c)?);
            }
            normalized
        }
        _ => color::RAINBOW_HEX.iter().map(|c| (*c).to_string()).collect(),
    };

    let target = resolve::resolve_light(&state.bridge, &p.target_id).await?;
    let seq = effects::color_loop(&target, &colors, p.transition_time_ms);
    let id = state.scheduler.execute_sequence(seq)?;
    Ok(CommandOutput::json(
        format!(
            "Color loop started on {}\nSequence ID: {id}\nColors: {}\nTransition time: {}ms",
            p.target_id,
            colors.len(),
            p.transition_time_ms
        ),
        &serde_json::json!({ "sequence_id": id, "colors": colors.len() }),
    ))
}

pub async fn strobe_effect(
    state: &Arc<AppState>,
    p: StrobeParams,
) -> Result<CommandOutput, AppError> {
    let color = color::normalize_color(&p.color)?;
    let target = resolve::resolve_light(&state.bridge, &p.target_id).await?;
    let seq = effects::strobe(&target, &color, p.strobe_rate_ms, p.duration_ms);
    let id = state.scheduler.execute_sequence(seq)?;
    Ok(CommandOutput::json(
        format!(
            "Strobe effect started on {}\nSequence ID: {id}\nColor: {}\nRate: {}ms",
            p.target_id, p.color, p.strobe_rate_ms
        ),
        &serde_json::json!({ "sequence_id": id }),
    ))
}

pub async fn alert_effect(
    state: &Arc<AppState>,
    p: AlertParams,
) -> Result<CommandOutput, AppError> {
    let alert_color = color::normalize_color(&p.alert_color)?;
    let normal_color = color::normalize_color(&p.normal_color)?;
    let target = resolve::resolve_light(&state.bridge, &p.target_id).await?;
    let seq = effects::alert(&target, &alert_color, &normal_color);
    let id = state.scheduler.execute_sequence(seq)?;
    Ok(CommandOutput::json(
        format!(
            "Alert effect started on {}\nSequence ID: {id}\nAlert color: {}",
            p.target_id, p.alert_color
        ),
        &serde_json::json!({ "sequence_id": id }),
    ))
}

pub async fn fade_effect(state: &Arc<AppState>, p: FadeParams) -> Result<CommandOutput, AppError> {
    if !(0.0..=100.0).contains(&p.start_brightness) || !(0.0..=100.0).contains(&p.end_brightness)
    {
        return Err(AppError::input("brightness must be between 0 and 100"));
    }
    let start_color = color::normalize_color(&p.start_color)?;
    let end_color = color::normalize_color(&p.end_color)?;
    let target = resolve::resolve_light(&state.bridge, &p.target_id).await?;
    let seq = effects::fade(
        &target,
        &start_color,
        &end_color,
        p.start_brightness,
        p.end_brightness,
        p.duration_ms,
        p.steps,
    );
    let id = state.scheduler.execute_sequence(seq)?;
    Ok(CommandOutput::json(
        format!(
            "Fade started on {}\nSequence ID: {id}\nDuration: {}ms over {} steps",
            p.target_id, p.duration_ms, p.steps
        ),
        &serde_json::json!({ "sequence_id": id }),
    ))
}

pub async fn custom_sequence(
    state: &Arc<AppState>,
    p: CustomSequenceParams,
) -> Result<CommandOutput, AppError> {
    let mut seq = p.sequence;
    if seq.commands.is_empty() {
        return Err(AppError::input("sequence must have at least one command"));
    }
    if seq.name.is_empty() {
        seq.name = "Custom Sequence".to_string();
    }
    let name = seq.name.clone();
    let commands = seq.commands.len();
    let looping = seq.looping;
    let id = state.scheduler.execute_sequence(seq)?;
    Ok(CommandOutput::json(
        format!(
            "Custom sequence started: {name}\nSequence ID: {id}\nCommands: {commands}\nLoop: {looping}"
        ),
        &serde_json::json!({ "sequence_id": id, "commands": commands, "loop": looping }),
    ))
}

pub async fn list_sequences(state: &Arc<AppState>) -> Result<CommandOutput, AppError> {
    let sequences = state.scheduler.list_sequences();
    if sequences.is_empty() {
        return Ok(CommandOutput::unit("No active sequences"));
    }

    let mut lines = vec![format!("Sequences ({}):", sequences.len())];
    for seq in &sequences {
        let status = if seq.running { "running" } else { "stopped" };
        lines.push(format!("- {}: {} [{status}]", seq.id, seq.name));
    }
    Ok(CommandOutput::json(lines.join("\n"), &sequences))
}

pub async fn stop_sequence(
    state: &Arc<AppState>,
    p: StopSequenceParams,
) -> Result<CommandOutput, AppError> {
    let ids: Vec<String> = if p.sequence_ids.is_empty() {
        match p.sequence_id {
            Some(id) => vec![id],
            None => {
                return Err(AppError::input(
                    "sequence_id or sequence_ids is required",
                ))
            }
        }
    } else {
        p.sequence_ids
    };

    let outcomes = state.scheduler.stop_sequences(&ids);
    let stopped = outcomes.iter().filter(|o| o.stopped).count();
    let failed = outcomes.len() - stopped;

    let mut lines = Vec::new();
    if stopped > 0 {
        lines.push(format!("Stopped {stopped} sequences:"));
        for outcome in outcomes.iter().filter(|o| o.stopped) {
            lines.push(format!("- {}", outcome.id));
        }
    }
    if failed > 0 {
        lines.push(format!("Failed to stop {failed} sequences:"));
        for outcome in outcomes.iter().filter(|o| !o.stopped) {
            lines.push(format!(
                "- {} ({})",
                outcome.id,
                outcome.error.as_deref().unwrap_or("unknown error")
            ));
        }
    }

    Ok(CommandOutput::json(lines.join("\n"), &outcomes))
}
