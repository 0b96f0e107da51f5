use std::sync::Arc;

use crate::batch;
use crate::error::AppError;
use crate::registry::params::BatchParams;
use crate::registry::CommandOutput;
use crate::state::AppState;

/// Execute a command batch, optionally caching it first. Caching happens
/// before execution and its success is independent of execution outcome.
pub async fn batch_commands(
    state: &Arc<AppState>,
    p: BatchParams,
) -> Result<CommandOutput, AppError> {
    if p.commands.is_empty() {
        return Err(AppError::input("commands must not be empty"));
    }

    let mut cached_note = String::new();
    if let Some(cache_name) = p.cache_name.as_deref() {
        state.scene_cache.save(
            cache_name,
            p.commands.clone(),
            p.delay_ms,
            p.cache_description.as_deref().unwrap_or(""),
        )?;
        cached_note = format!("Cached scene '{cache_name}'\n");
    }

    let batch_id = batch::batch_id(p.commands.len());

    if p.async_ {
        batch::execute_batch_async(
            Arc::clone(&state.bridge),
            p.commands.clone(),
            p.delay_ms,
            batch_id.clone(),
            state.shutdown.child_token(),
        );
        return Ok(CommandOutput::json(
            format!(
                "{cached_note}Batch started asynchronously with ID: {batch_id}\nCommands: {}\nDelay between commands: {}ms",
                p.commands.len(),
                p.delay_ms
            ),
            &serde_json::json!({ "batch_id": batch_id, "commands": p.commands.len() }),
        ));
    }

    let results = batch::execute_batch(&state.bridge, &p.commands, p.delay_ms).await;
    let successful = results.iter().filter(|r| r.success).count();
    let failed = results.len() - successful;

    Ok(CommandOutput::json(
        format!(
            "{cached_note}Batch completed: {successful} successful, {failed} failed\nBatch ID: {batch_id}"
        ),
        &results,
    ))
}
