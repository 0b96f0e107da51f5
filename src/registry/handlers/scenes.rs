use std::sync::Arc;

use crate::bridge::types::{Metadata, SceneUpdate};
use crate::error::AppError;
use crate::registry::params::{
    CreateSceneParams, CreateZoneParams, SceneIdParams, UpdateSceneParams, ZoneIdParams,
};
use crate::registry::CommandOutput;
use crate::resolve;
use crate::state::AppState;

pub async fn list_scenes(state: &Arc<AppState>) -> Result<CommandOutput, AppError> {
    let scenes = state.bridge.get_scenes().await?;
    let mut lines = vec![format!("Found {} scenes:", scenes.len())];
    let mut data = Vec::with_capacity(scenes.len());
    for scene in &scenes {
        lines.push(format!("- {} (ID: {})", scene.metadata.name, scene.id));
        data.push(serde_json::json!({
            "id": scene.id,
            "name": scene.metadata.name,
            "group": scene.group.rid,
            "actions": scene.actions.len(),
        }));
    }
    Ok(CommandOutput::data(
        lines.join("\n"),
        serde_json::Value::Array(data),
    ))
}

pub async fn activate_scene(
    state: &Arc<AppState>,
    p: SceneIdParams,
) -> Result<CommandOutput, AppError> {
    let id = resolve::resolve_scene(&state.bridge, &p.scene_id).await?;
    state.bridge.activate_scene(&id).await?;
    Ok(CommandOutput::unit(format!("Scene {} activated", p.scene_id)))
}

pub async fn create_scene_from_state(
    state: &Arc<AppState>,
    p: CreateSceneParams,
) -> Result<CommandOutput, AppError> {
    if p.name.is_empty() {
        return Err(AppError::input("name is required"));
    }
    // The group must be a room here: scene capture walks room → device →
    // light, so the grouped-light id is not enough.
    let scene = state
        .bridge
        .create_scene_from_state(&p.name, &p.group_id)
        .await?;
    Ok(CommandOutput::json(
        format!(
            "Scene '{}' created with ID: {} ({} light states captured)",
            p.name,
            scene.id,
            scene.actions.len()
        ),
        &serde_json::json!({ "id": scene.id, "actions": scene.actions.len() }),
    ))
}

pub async fn update_scene(
    state: &Arc<AppState>,
    p: UpdateSceneParams,
) -> Result<CommandOutput, AppError> {
    if p.name.is_none() && p.speed.is_none() {
        return Err(AppError::input("nothing to update: provide name and/or speed"));
    }
    let id = resolve::resolve_scene(&state.bridge, &p.scene_id).await?;
    let update = SceneUpdate {
        metadata: p.name.clone().map(|name| Metadata {
            name,
            archetype: None,
        }),
        speed: p.speed,
    };
    state.bridge.update_scene(&id, &update).await?;
    Ok(CommandOutput::unit(format!("Scene {} updated", p.scene_id)))
}

pub async fn delete_scene(
    state: &Arc<AppState>,
    p: SceneIdParams,
) -> Result<CommandOutput, AppError> {
    let id = resolve::resolve_scene(&state.bridge, &p.scene_id).await?;
    state.bridge.delete_scene(&id).await?;
    Ok(CommandOutput::unit(format!("Scene {} deleted", p.scene_id)))
}

pub async fn create_zone(
    state: &Arc<AppState>,
    p: CreateZoneParams,
) -> Result<CommandOutput, AppError> {
    if p.name.is_empty() {
        return Err(AppError::input("name is required"));
    }
    let mut light_ids = Vec::with_capacity(p.light_ids.len());
    for light in &p.light_ids {
        light_ids.push(resolve::resolve_light(&state.bridge, light).await?);
    }
    let zone = state.bridge.create_zone(&p.name, &light_ids).await?;
    Ok(CommandOutput::json(
        format!(
            "Zone '{}' created with ID: {} ({} lights)",
            p.name,
            zone.id,
            light_ids.len()
        ),
        &serde_json::json!({ "id": zone.id, "lights": light_ids }),
    ))
}

pub async fn delete_zone(
    state: &Arc<AppState>,
    p: ZoneIdParams,
) -> Result<CommandOutput, AppError> {
    state.bridge.delete_zone(&p.zone_id).await?;
    Ok(CommandOutput::unit(format!("Zone {} deleted", p.zone_id)))
}
