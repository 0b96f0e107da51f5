use std::sync::Arc;

use crate::batch;
use crate::error::AppError;
use crate::registry::params::SceneNameParams;
use crate::registry::CommandOutput;
use crate::state::AppState;

/// Recall a cached scene: schedule its commands asynchronously and count
/// the use.
pub async fn recall_scene(
    state: &Arc<AppState>,
    p: SceneNameParams,
) -> Result<CommandOutput, AppError> {
    let scene = state.scene_cache.get(&p.scene_name)?;

    let batch_id = batch::recall_id(&scene.name);
    batch::execute_batch_async(
        Arc::clone(&state.bridge),
        scene.commands.clone(),
        scene.delay_ms,
        batch_id.clone(),
        state.shutdown.child_token(),
    );

    let description = if scene.description.is_empty() {
        String::new()
    } else {
        format!("\nDescription: {}", scene.description)
    };
    Ok(CommandOutput::json(
        format!(
            "Recalling atmosphere: {}...{description}\nCommands: {}\nDelay: {}ms\nBatch ID: {batch_id}\nUsage count: {}",
            scene.name,
            scene.commands.len(),
            scene.delay_ms,
            scene.usage_count
        ),
        &serde_json::json!({
            "batch_id": batch_id,
            "commands": scene.commands.len(),
            "usage_count": scene.usage_count,
        }),
    ))
}

pub async fn list_cached_scenes(state: &Arc<AppState>) -> Result<CommandOutput, AppError> {
    let scenes = state.scene_cache.list();
    if scenes.is_empty() {
        return Ok(CommandOutput::unit("No cached scenes available"));
    }

    let mut lines = vec![format!("Cached scenes ({}):", scenes.len())];
    for scene in &scenes {
        lines.push(format!(
            "- {}: {} commands | delay {}ms | used {} times",
            scene.name,
            scene.commands.len(),
            scene.delay_ms,
            scene.usage_count
        ));
        if !scene.description.is_empty() {
            lines.push(format!("  {}", scene.description));
        }
    }
    Ok(CommandOutput::json(lines.join("\n"), &scenes))
}

pub async fn clear_cached_scene(
    state: &Arc<AppState>,
    p: SceneNameParams,
) -> Result<CommandOutput, AppError> {
    state.scene_cache.delete(&p.scene_name)?;
    Ok(CommandOutput::unit(format!(
        "Scene '{}' has been cleared from cache",
        p.scene_name
    )))
}

pub async fn export_scene(
    state: &Arc<AppState>,
    p: SceneNameParams,
) -> Result<CommandOutput, AppError> {
    let json = state.scene_cache.export(&p.scene_name)?;
    let data: serde_json::Value = serde_json::from_str(&json)?;
    Ok(CommandOutput::data(
        format!("Scene export for '{}':\n\n{json}", p.scene_name),
        data,
    ))
}
