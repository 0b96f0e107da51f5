//! Concurrent execution of named command sequences.
//!
//! Each sequence runs on its own task, iterating its commands in declared
//! order: sleep the command's delay, then execute it against the bridge
//! under a fresh 5-second deadline. Sequences honor both their private
//! stop signal and engine shutdown before sleeping and before dispatching
//! each command. Distinct sequences overlap freely; there is no ordering
//! across them.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use parking_lot::RwLock;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::bridge::BridgeClient;
use crate::color;
use crate::error::AppError;

/// Deadline for every scheduler-initiated REST call.
const COMMAND_TIMEOUT: Duration = Duration::from_secs(5);

// ── Command / sequence model ────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum CommandKind {
    Light,
    Group,
    Scene,
}

/// One timed step of a sequence. Immutable after construction.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Command {
    pub kind: CommandKind,
    /// Verb: `on`, `off`, `brightness`, `color` for lights and groups;
    /// `recall` / `activate` for scenes.
    pub action: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub params: HashMap<String, Value>,
    /// Pre-delay applied before this command executes.
    #[serde(default)]
    pub delay_ms: u64,
}

impl Command {
    pub fn new(kind: CommandKind, action: &str, target: &str) -> Self {
        Self {
            kind,
            action: action.to_string(),
            target: target.to_string(),
            params: HashMap::new(),
            delay_ms: 0,
        }
    }

    pub fn with_param(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }

    pub fn with_delay_ms(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct Sequence {
    /// Assigned by the scheduler when empty.
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub commands: Vec<Command>,
    #[serde(default, rename = "loop")]
    pub looping: bool,
}

/// Registry snapshot of one sequence, terminated ones included.
#[derive(Debug, Clone, Serialize)]
pub struct SequenceStatus {
    pub id: String,
    pub name: String,
    pub running: bool,
    pub looping: bool,
    pub commands: usize,
}

struct SequenceEntry {
    seq: Sequence,
    running: bool,
    stop: CancellationToken,
}

#[derive(Debug, Clone, Serialize)]
pub struct StopOutcome {
    pub id: String,
    pub stopped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ── Scheduler ───────────────────────────────────────────────────

/// Registry and runner for named sequences. Cheap to clone; all clones
/// share one registry.
#[derive(Clone)]
pub struct Scheduler {
    client: Arc<BridgeClient>,
    sequences: Arc<RwLock<HashMap<String, SequenceEntry>>>,
    shutdown: CancellationToken,
}

impl Scheduler {
    pub fn new(client: Arc<BridgeClient>, shutdown: CancellationToken) -> Self {
        Self {
            client,
            sequences: Arc::new(RwLock::new(HashMap::new())),
            shutdown,
        }
    }

    /// Run a single command on a background task. The caller is never
    /// blocked; failures are logged.
    pub fn execute_command(&self, cmd: Command) {
        let client = Arc::clone(&self.client);
        let shutdown = self.shutdown.clone();
        tokio::spawn(async move {
            if !cmd.delay().is_zero() {
                tokio::select! {
                    () = shutdown.cancelled() => return,
                    () = tokio::time::sleep(cmd.delay()) => {}
                }
            }
            if let Err(e) = run_with_timeout(&client, &cmd).await {
                warn!(action = %cmd.action, target = %cmd.target, error = %e, "command failed");
            }
        });
    }

    /// Register and start a sequence. Assigns an id when absent. Rejects
    /// an id that is currently running; a terminated id may be reused.
    pub fn execute_sequence(&self, mut seq: Sequence) -> Result<String, AppError> {
        let mut sequences = self.sequences.write();

        if seq.id.is_empty() {
            seq.id = next_sequence_id();
        }
        if let Some(existing) = sequences.get(&seq.id) {
            if existing.running {
                return Err(AppError::state(format!(
                    "sequence {} is already running",
                    seq.id
                )));
            }
        }

        let stop = self.shutdown.child_token();
        let id = seq.id.clone();
        sequences.insert(
            id.clone(),
            SequenceEntry {
                seq: seq.clone(),
                running: true,
                stop: stop.clone(),
            },
        );
        drop(sequences);

        let client = Arc::clone(&self.client);
        let registry = Arc::clone(&self.sequences);
        let task_id = id.clone();
        tokio::spawn(async move {
            run_sequence(&client, &seq, &stop).await;
            if let Some(entry) = registry.write().get_mut(&task_id) {
                entry.running = false;
            }
            debug!(sequence = %task_id, "sequence finished");
        });

        Ok(id)
    }

    /// Signal a sequence's private stop token. Idempotent for a known id.
    pub fn stop_sequence(&self, id: &str) -> Result<(), AppError> {
        let mut sequences = self.sequences.write();
        let entry = sequences.get_mut(id).ok_or_else(|| AppError::NotFound {
            what: format!("sequence {id}"),
        })?;
        entry.stop.cancel();
        entry.running = false;
        Ok(())
    }

    pub fn stop_sequences(&self, ids: &[String]) -> Vec<StopOutcome> {
        ids.iter()
            .map(|id| match self.stop_sequence(id) {
                Ok(()) => StopOutcome {
                    id: id.clone(),
                    stopped: true,
                    error: None,
                },
                Err(e) => StopOutcome {
                    id: id.clone(),
                    stopped: false,
                    error: Some(e.to_string()),
                },
            })
            .collect()
    }

    /// Snapshot of the registry, terminated sequences included.
    pub fn list_sequences(&self) -> Vec<SequenceStatus> {
        let sequences = self.sequences.read();
        let mut list: Vec<SequenceStatus> = sequences
            .values()
            .map(|entry| SequenceStatus {
                id: entry.seq.id.clone(),
                name: entry.seq.name.clone(),
                running: entry.running,
                looping: entry.seq.looping,
                commands: entry.seq.commands.len(),
            })
            .collect();
        list.sort_by(|a, b| a.id.cmp(&b.id));
        list
    }

    /// Stop every sequence and refuse further work.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
        let mut sequences = self.sequences.write();
        for entry in sequences.values_mut() {
            entry.stop.cancel();
            entry.running = false;
        }
    }
}

fn next_sequence_id() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    format!("seq_{nanos}")
}

async fn run_sequence(client: &BridgeClient, seq: &Sequence, stop: &CancellationToken) {
    loop {
        for cmd in &seq.commands {
            if stop.is_cancelled() {
                return;
            }
            if !cmd.delay().is_zero() {
                tokio::select! {
                    () = stop.cancelled() => return,
                    () = tokio::time::sleep(cmd.delay()) => {}
                }
            }
            // Step failures never abort the sequence.
            if let Err(e) = run_with_timeout(client, cmd).await {
                warn!(
                    sequence = %seq.id,
                    action = %cmd.action,
                    target = %cmd.target,
                    error = %e,
                    "sequence step failed"
                );
            }
        }
        if !seq.looping {
            return;
        }
    }
}

async fn run_with_timeout(client: &BridgeClient, cmd: &Command) -> Result<(), AppError> {
    tokio::time::timeout(COMMAND_TIMEOUT, dispatch(client, cmd))
        .await
        .map_err(|_| AppError::Timeout {
            what: format!("{} command", cmd.action),
        })?
}

/// Dispatch one command to the bridge. Parameter validation happens
/// before any network call.
async fn dispatch(client: &BridgeClient, cmd: &Command) -> Result<(), AppError> {
    match cmd.kind {
        CommandKind::Light => match cmd.action.as_str() {
            "on" => client.turn_on_light(&cmd.target).await,
            "off" => client.turn_off_light(&cmd.target).await,
            "brightness" => {
                let brightness = require_brightness(cmd)?;
                client.set_light_brightness(&cmd.target, brightness).await
            }
            "color" => {
                let hex = require_color(cmd)?;
                client.set_light_color(&cmd.target, &hex).await
            }
            other => Err(AppError::input(format!("unknown light action: {other}"))),
        },
        CommandKind::Group => match cmd.action.as_str() {
            "on" => client.turn_on_group(&cmd.target).await,
            "off" => client.turn_off_group(&cmd.target).await,
            "brightness" => {
                let brightness = require_brightness(cmd)?;
                client.set_group_brightness(&cmd.target, brightness).await
            }
            "color" => {
                let hex = require_color(cmd)?;
                client.set_group_color(&cmd.target, &hex).await
            }
            other => Err(AppError::input(format!("unknown group action: {other}"))),
        },
        CommandKind::Scene => match cmd.action.as_str() {
            "recall" | "activate" => client.activate_scene(&cmd.target).await,
            other => Err(AppError::input(format!("unknown scene action: {other}"))),
        },
    }
}

fn require_brightness(cmd: &Command) -> Result<f64, AppError> {
    let brightness = cmd
        .params
        .get("brightness")
        .and_then(Value::as_f64)
        .ok_or_else(|| AppError::input("brightness parameter required"))?;
    if !(0.0..=100.0).contains(&brightness) {
        return Err(AppError::input("brightness must be between 0 and 100"));
    }
    Ok(brightness)
}

fn require_color(cmd: &Command) -> Result<String, AppError> {
    let raw = cmd
        .params
        .get("color")
        .and_then(Value::as_str)
        .ok_or_else(|| AppError::input("color parameter required"))?;
    color::normalize_color(raw)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn test_scheduler() -> Scheduler {
        let client = Arc::new(BridgeClient::new("127.0.0.1", "test-key").unwrap());
        Scheduler::new(client, CancellationToken::new())
    }

    fn slow_sequence(id: &str, looping: bool) -> Sequence {
        Sequence {
            id: id.to_string(),
            name: "test".to_string(),
            // A long pre-delay keeps the sequence in its sleep, so no
            // network traffic happens during the test.
            commands: vec![
                Command::new(CommandKind::Light, "on", "l1").with_delay_ms(60_000)
            ],
            looping,
        }
    }

    #[tokio::test]
    async fn assigns_sequence_ids() {
        let scheduler = test_scheduler();
        let seq = Sequence {
            id: String::new(),
            name: "anon".to_string(),
            commands: vec![Command::new(CommandKind::Light, "on", "l1").with_delay_ms(60_000)],
            looping: false,
        };
        let id = scheduler.execute_sequence(seq).unwrap();
        assert!(id.starts_with("seq_"), "unexpected id: {id}");
        scheduler.stop_sequence(&id).unwrap();
    }

    #[tokio::test]
    async fn running_id_collision_is_rejected_until_stopped() {
        let scheduler = test_scheduler();
        scheduler.execute_sequence(slow_sequence("dup", false)).unwrap();

        let err = scheduler
            .execute_sequence(slow_sequence("dup", false))
            .unwrap_err();
        assert!(matches!(err, AppError::State { .. }), "got {err:?}");

        scheduler.stop_sequence("dup").unwrap();
        // A terminated id may be reused.
        scheduler.execute_sequence(slow_sequence("dup", false)).unwrap();
        scheduler.stop_sequence("dup").unwrap();
    }

    #[tokio::test]
    async fn stop_is_idempotent_and_unknown_ids_fail() {
        let scheduler = test_scheduler();
        scheduler.execute_sequence(slow_sequence("s1", true)).unwrap();
        scheduler.stop_sequence("s1").unwrap();
        scheduler.stop_sequence("s1").unwrap();

        let outcomes = scheduler.stop_sequences(&["s1".to_string(), "ghost".to_string()]);
        assert!(outcomes[0].stopped);
        assert!(!outcomes[1].stopped);
        assert!(outcomes[1].error.as_deref().unwrap_or("").contains("not found"));
    }

    #[tokio::test]
    async fn looping_sequence_observes_stop_within_one_delay() {
        let scheduler = test_scheduler();
        let seq = Sequence {
            id: "loop".to_string(),
            name: "loop".to_string(),
            commands: vec![
                Command::new(CommandKind::Light, "brightness", "l1").with_delay_ms(60_000)
            ],
            looping: true,
        };
        scheduler.execute_sequence(seq).unwrap();
        scheduler.stop_sequence("loop").unwrap();

        // The task parks in its delay sleep; cancellation wakes it.
        tokio::time::sleep(Duration::from_millis(50)).await;
        let status = scheduler
            .list_sequences()
            .into_iter()
            .find(|s| s.id == "loop")
            .unwrap();
        assert!(!status.running);
    }

    #[tokio::test]
    async fn terminated_sequences_stay_listed() {
        let scheduler = test_scheduler();
        scheduler.execute_sequence(slow_sequence("keep", false)).unwrap();
        scheduler.stop_sequence("keep").unwrap();
        let listed = scheduler.list_sequences();
        assert!(listed.iter().any(|s| s.id == "keep" && !s.running));
    }

    #[tokio::test]
    async fn dispatch_validates_before_any_network_call() {
        let client = BridgeClient::new("127.0.0.1", "test-key").unwrap();

        let missing = Command::new(CommandKind::Light, "brightness", "l1");
        let err = dispatch(&client, &missing).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput { .. }));

        let out_of_range = Command::new(CommandKind::Light, "brightness", "l1")
            .with_param("brightness", 150.0);
        let err = dispatch(&client, &out_of_range).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput { .. }));

        let bad_color =
            Command::new(CommandKind::Group, "color", "g1").with_param("color", "nope");
        let err = dispatch(&client, &bad_color).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput { .. }));

        let unknown = Command::new(CommandKind::Scene, "dance", "s1");
        let err = dispatch(&client, &unknown).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput { .. }));
    }

    #[tokio::test]
    async fn execute_command_never_blocks_the_caller() {
        let scheduler = test_scheduler();
        let started = std::time::Instant::now();
        scheduler.execute_command(
            Command::new(CommandKind::Light, "on", "l1").with_delay_ms(60_000),
        );
        assert!(started.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test]
    async fn shutdown_stops_everything() {
        let scheduler = test_scheduler();
        scheduler.execute_sequence(slow_sequence("a", true)).unwrap();
        scheduler.execute_sequence(slow_sequence("b", true)).unwrap();
        scheduler.shutdown();
        for status in scheduler.list_sequences() {
            assert!(!status.running, "{} still running", status.id);
        }
    }
}
