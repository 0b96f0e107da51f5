use std::sync::Arc;

use crate::error::AppError;
use crate::registry::CommandOutput;
use crate::state::AppState;

pub async fn list_lights(state: &Arc<AppState>) -> Result<CommandOutput, AppError> {
    let lights = state.bridge.get_lights().await?;

    let mut lines = vec![format!("Found {} lights:", lights.len())];
    let mut data = Vec::with_capacity(lights.len());
    for light in &lights {
        let status = if light.on.on {
            format!("on, brightness: {}%", light.brightness())
        } else {
            "off".to_string()
        };
        lines.push(format!(
            "- {}: {} (ID: {})",
            light.metadata.name, status, light.id
        ));
        data.push(serde_json::json!({
            "id": light.id,
            "name": light.metadata.name,
            "on": light.on.on,
            "brightness": light.brightness(),
        }));
    }

    Ok(CommandOutput::data(
        lines.join("\n"),
        serde_json::Value::Array(data),
    ))
}

pub async fn list_groups(state: &Arc<AppState>) -> Result<CommandOutput, AppError> {
    // Rooms and zones carry the names; grouped lights carry the state.
    let rooms = state.bridge.get_rooms().await?;
    let zones = state.bridge.get_zones().await?;
    let grouped_lights = state.bridge.get_grouped_lights().await?;

    let group_status = |id: &str| -> String {
        let Some(group) = grouped_lights.iter().find(|g| g.id == id) else {
            return "unknown".to_string();
        };
        if group.on.map_or(false, |on| on.on) {
            match group.dimming {
                Some(d) => format!("on, brightness: {}%", d.brightness),
                None => "on".to_string(),
            }
        } else {
            "off".to_string()
        }
    };

    let mut data = Vec::new();
    let mut lines = Vec::new();
    for (kind, name, grouped) in rooms
        .iter()
        .map(|r| ("room", &r.metadata.name, r.grouped_light_id()))
        .chain(
            zones
                .iter()
                .map(|z| ("zone", &z.metadata.name, z.grouped_light_id())),
        )
    {
        let Some(grouped) = grouped else { continue };
        lines.push(format!(
            "- {name} ({kind}): {} [group ID: {grouped}]",
            group_status(grouped)
        ));
        data.push(serde_json::json!({
            "name": name,
            "kind": kind,
            "grouped_light_id": grouped,
            "status": group_status(grouped),
        }));
    }

    let mut message = format!("Found {} groups:\n", lines.len());
    message.push_str(&lines.join("\n"));
    Ok(CommandOutput::data(message, serde_json::Value::Array(data)))
}

pub async fn list_rooms(state: &Arc<AppState>) -> Result<CommandOutput, AppError> {
    let rooms = state.bridge.get_rooms().await?;
    let mut lines = vec![format!("Found {} rooms:", rooms.len())];
    let mut data = Vec::with_capacity(rooms.len());
    for room in &rooms {
        lines.push(format!(
            "- {} (ID: {}, devices: {})",
            room.metadata.name,
            room.id,
            room.children.len()
        ));
        data.push(serde_json::json!({
            "id": room.id,
            "name": room.metadata.name,
            "grouped_light_id": room.grouped_light_id(),
            "devices": room.children.len(),
        }));
    }
    Ok(CommandOutput::data(
        lines.join("\n"),
        serde_json::Value::Array(data),
    ))
}

pub async fn list_zones(state: &Arc<AppState>) -> Result<CommandOutput, AppError> {
    let zones = state.bridge.get_zones().await?;
    let mut lines = vec![format!("Found {} zones:", zones.len())];
    let mut data = Vec::with_capacity(zones.len());
    for zone in &zones {
        lines.push(format!(
            "- {} (ID: {}, lights: {})",
            zone.metadata.name,
            zone.id,
            zone.children.len()
        ));
        data.push(serde_json::json!({
            "id": zone.id,
            "name": zone.metadata.name,
            "grouped_light_id": zone.grouped_light_id(),
            "lights": zone.children.len(),
        }));
    }
    Ok(CommandOutput::data(
        lines.join("\n"),
        serde_json::Value::Array(data),
    ))
}

pub async fn list_devices(state: &Arc<AppState>) -> Result<CommandOutput, AppError> {
    let devices = state.bridge.get_devices().await?;
    let mut lines = vec![format!("Found {} devices:", devices.len())];
    let mut data = Vec::with_capacity(devices.len());
    for device in &devices {
        let product = device
            .product_data
            .as_ref()
            .and_then(|p| p.product_name.clone())
            .unwrap_or_default();
        lines.push(format!(
            "- {} ({product}) [ID: {}]",
            device.metadata.name, device.id
        ));
        data.push(serde_json::json!({
            "id": device.id,
            "name": device.metadata.name,
            "product": product,
            "lights": device.light_ids().collect::<Vec<_>>(),
        }));
    }
    Ok(CommandOutput::data(
        lines.join("\n"),
        serde_json::Value::Array(data),
    ))
}

pub async fn list_supported_effects(state: &Arc<AppState>) -> Result<CommandOutput, AppError> {
    let effects = state.bridge.supported_effects().await?;
    let message = if effects.is_empty() {
        "No native effects reported by any light".to_string()
    } else {
        format!("Supported effects: {}", effects.join(", "))
    };
    Ok(CommandOutput::json(message, &effects))
}

pub async fn bridge_info(state: &Arc<AppState>) -> Result<CommandOutput, AppError> {
    let bridge = state.bridge.get_bridge().await?;
    let time_zone = bridge
        .time_zone
        .as_ref()
        .map(|tz| tz.time_zone.clone())
        .unwrap_or_default();
    let message = format!(
        "Hue Bridge Information:\nBridge ID: {}\nTime zone: {time_zone}\nAPI ID: {}",
        bridge.bridge_id, bridge.id
    );
    Ok(CommandOutput::json(message, &serde_json::json!({
        "id": bridge.id,
        "bridge_id": bridge.bridge_id,
        "time_zone": time_zone,
    })))
}
