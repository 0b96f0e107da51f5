//! Ordered execution of heterogeneous command lists with inter-step
//! pacing.
//!
//! A batch runs either synchronously, returning one result per input
//! command, or detached on a background task that outlives the
//! originating tool call. A step's failure is recorded (sync) or logged
//! (async) and never aborts the rest of the batch.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::bridge::native;
use crate::bridge::BridgeClient;
use crate::color;
use crate::error::AppError;

/// Deadline for each step's REST call.
const STEP_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum BatchAction {
    LightOn,
    LightOff,
    LightBrightness,
    LightColor,
    LightEffect,
    GroupOn,
    GroupOff,
    GroupBrightness,
    GroupColor,
    GroupEffect,
    ActivateScene,
    IdentifyLight,
}

/// One step of a batch. `value` carries the action-specific payload
/// (brightness, color, effect name); `duration` is whole seconds and only
/// meaningful for effects.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BatchCommand {
    pub action: BatchAction,
    pub target_id: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub duration: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchStepResult {
    pub success: bool,
    pub message: String,
}

/// Batch ids are `batch_<unix>_<n>` where `n` is the command count.
pub fn batch_id(command_count: usize) -> String {
    format!("batch_{}_{command_count}", Utc::now().timestamp())
}

/// Recalled cached scenes get their own id shape for log correlation.
pub fn recall_id(scene_name: &str) -> String {
    format!("recalled_{scene_name}_{}", Utc::now().timestamp())
}

/// Execute every command in order, pausing `delay_ms` between steps (but
/// not after the last). Returns one result per input command.
pub async fn execute_batch(
    client: &BridgeClient,
    commands: &[BatchCommand],
    delay_ms: u64,
) -> Vec<BatchStepResult> {
    let mut results = Vec::with_capacity(commands.len());
    for (i, cmd) in commands.iter().enumerate() {
        let result = match run_step(client, cmd).await {
            Ok(message) => BatchStepResult {
                success: true,
                message,
            },
            Err(e) => BatchStepResult {
                success: false,
                message: format!("Command {i} ({:?}): {e}", cmd.action),
            },
        };
        results.push(result);

        if i + 1 < commands.len() && delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }
    }
    results
}

/// Run a batch on a detached task. The task answers only to engine
/// shutdown; cancelling the originating tool call does not stop it.
pub fn execute_batch_async(
    client: Arc<BridgeClient>,
    commands: Vec<BatchCommand>,
    delay_ms: u64,
    batch_id: String,
    shutdown: CancellationToken,
) {
    tokio::spawn(async move {
        info!(batch = %batch_id, commands = commands.len(), "starting async batch");
        for (i, cmd) in commands.iter().enumerate() {
            if shutdown.is_cancelled() {
                info!(batch = %batch_id, step = i, "batch cancelled by shutdown");
                return;
            }
            match run_step(&client, cmd).await {
                Ok(message) => debug!(batch = %batch_id, step = i, "{message}"),
                Err(e) => {
                    warn!(batch = %batch_id, step = i, action = ?cmd.action, error = %e, "batch step failed");
                }
            }
            if i + 1 < commands.len() && delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
        info!(batch = %batch_id, "batch completed");
    });
}

async fn run_step(client: &BridgeClient, cmd: &BatchCommand) -> Result<String, AppError> {
    tokio::time::timeout(STEP_TIMEOUT, dispatch_step(client, cmd))
        .await
        .map_err(|_| AppError::Timeout {
            what: format!("{:?} step", cmd.action),
        })?
}

/// Validation happens before any network call; bad values fail the step
/// without touching the bridge.
async fn dispatch_step(client: &BridgeClient, cmd: &BatchCommand) -> Result<String, AppError> {
    let target = &cmd.target_id;
    match cmd.action {
        BatchAction::LightOn => {
            client.turn_on_light(target).await?;
            Ok(format!("Light {target} turned on"))
        }
        BatchAction::LightOff => {
            client.turn_off_light(target).await?;
            Ok(format!("Light {target} turned off"))
        }
        BatchAction::LightBrightness => {
            let brightness = parse_brightness(&cmd.value)?;
            client.set_light_brightness(target, brightness).await?;
            Ok(format!("Light {target} brightness set to {brightness}%"))
        }
        BatchAction::LightColor => {
            let hex = parse_color(&cmd.value)?;
            client.set_light_color(target, &hex).await?;
            Ok(format!("Light {target} color set to {}", cmd.value))
        }
        BatchAction::LightEffect => {
            let effect = parse_effect(&cmd.value)?;
            client
                .set_light_effect(target, &effect, Some(cmd.duration))
                .await?;
            Ok(effect_message("Light", target, &effect, cmd.duration))
        }
        BatchAction::GroupOn => {
            client.turn_on_group(target).await?;
            Ok(format!("Group {target} turned on"))
        }
        BatchAction::GroupOff => {
            client.turn_off_group(target).await?;
            Ok(format!("Group {target} turned off"))
        }
        BatchAction::GroupBrightness => {
            let brightness = parse_brightness(&cmd.value)?;
            client.set_group_brightness(target, brightness).await?;
            Ok(format!("Group {target} brightness set to {brightness}%"))
        }
        BatchAction::GroupColor => {
            let hex = parse_color(&cmd.value)?;
            client.set_group_color(target, &hex).await?;
            Ok(format!("Group {target} color set to {}", cmd.value))
        }
        BatchAction::GroupEffect => {
            let effect = parse_effect(&cmd.value)?;
            client
                .set_group_effect(target, &effect, Some(cmd.duration))
                .await?;
            Ok(effect_message("Group", target, &effect, cmd.duration))
        }
        BatchAction::ActivateScene => {
            client.activate_scene(target).await?;
            Ok(format!("Scene {target} activated"))
        }
        BatchAction::IdentifyLight => {
            client.identify_light(target).await?;
            Ok(format!("Light {target} is blinking for identification"))
        }
    }
}

fn parse_brightness(value: &str) -> Result<f64, AppError> {
    let brightness: f64 = value
        .parse()
        .map_err(|_| AppError::input(format!("invalid brightness value: {value}")))?;
    if !(0.0..=100.0).contains(&brightness) {
        return Err(AppError::input("brightness must be between 0 and 100"));
    }
    Ok(brightness)
}

fn parse_color(value: &str) -> Result<String, AppError> {
    if value.is_empty() {
        return Err(AppError::input("color value is required"));
    }
    color::normalize_color(value)
}

fn parse_effect(value: &str) -> Result<String, AppError> {
    if value.is_empty() {
        return Err(AppError::input("effect value is required"));
    }
    Ok(value.to_string())
}

fn effect_message(noun: &str, target: &str, effect: &str, duration: u64) -> String {
    let mut message = format!(
        "{noun} {target} effect set to {effect} - {}",
        native::description(effect)
    );
    if duration > 0 {
        message.push_str(&format!(" (duration: {duration} seconds)"));
    }
    message
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn cmd(action: BatchAction, value: &str) -> BatchCommand {
        BatchCommand {
            action,
            target_id: "l1".to_string(),
            value: value.to_string(),
            duration: 0,
        }
    }

    #[test]
    fn actions_deserialize_from_snake_case() {
        let parsed: Vec<BatchCommand> = serde_json::from_str(
            r##"[{"action": "light_on", "target_id": "abc"},
                {"action": "group_color", "target_id": "g", "value": "#00FF00"},
                {"action": "light_effect", "target_id": "l", "value": "candle", "duration": 5}]"##,
        )
        .unwrap();
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[0].action, BatchAction::LightOn);
        assert_eq!(parsed[2].duration, 5);
    }

    #[test]
    fn unknown_actions_are_rejected_at_parse_time() {
        let result: Result<Vec<BatchCommand>, _> =
            serde_json::from_str(r#"[{"action": "light_disco", "target_id": "x"}]"#);
        assert!(result.is_err());
    }

    #[test]
    fn id_formats() {
        let id = batch_id(4);
        assert!(id.starts_with("batch_"));
        assert!(id.ends_with("_4"));
        assert!(recall_id("go").starts_with("recalled_go_"));
    }

    #[tokio::test]
    async fn failed_steps_are_recorded_without_aborting() {
        let client = BridgeClient::new("127.0.0.1", "test-key").unwrap();
        let commands = vec![
            cmd(BatchAction::LightBrightness, "not-a-number"),
            cmd(BatchAction::LightBrightness, "150"),
            cmd(BatchAction::LightColor, "purple-ish"),
        ];

        let results = execute_batch(&client, &commands, 0).await;
        assert_eq!(results.len(), commands.len());
        assert!(results.iter().all(|r| !r.success));
        assert!(results[0].message.contains("Command 0"));
        assert!(results[1].message.contains("between 0 and 100"));
        assert!(results[2].message.contains("Command 2"));
    }

    #[test]
    fn value_validation_is_local() {
        assert!(parse_brightness("55.5").is_ok());
        assert!(parse_brightness("101").is_err());
        assert!(parse_brightness("").is_err());
        assert_eq!(parse_color("red").unwrap(), "#FF0000");
        assert!(parse_color("").is_err());
        assert!(parse_effect("").is_err());
    }
}
