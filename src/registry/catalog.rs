//! Tool catalog: JSON schemas for every command, plus the mapping from
//! `(tool name, JSON args)` to a typed [`Command`].

use schemars::schema_for;
use serde::Serialize;
use serde_json::Value;

use super::params::{
    AlertParams, BatchParams, ColorLoopParams, ConfigIdParams, CreateSceneParams,
    CreateZoneParams, CustomSequenceParams, FadeParams, FlashParams, GroupBrightnessParams,
    GroupColorParams, GroupEffectParams, GroupIdParams, LightBrightnessParams, LightColorParams,
    LightEffectParams, LightIdParams, PulseParams, RainbowParams, RecentEventsParams,
    SceneIdParams, SceneNameParams, SendColorsParams, StartEventStreamParams,
    StartStreamingParams, StopSequenceParams, StrobeParams, UpdateSceneParams, ZoneIdParams,
};
use super::{Command, CommandCategory, CommandInfo};

/// A registry entry: metadata + JSON schema for the params.
#[derive(Debug, Clone, Serialize)]
pub struct CommandRegistryEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub category: CommandCategory,
    pub param_schema: Value,
}

fn empty_object_schema() -> Value {
    serde_json::json!({ "type": "object", "properties": {} })
}

fn schema_value<T: schemars::JsonSchema>() -> Value {
    let root = schema_for!(T);
    serde_json::to_value(root).unwrap_or_else(|_| empty_object_schema())
}

fn entry(info: CommandInfo, param_schema: Value) -> CommandRegistryEntry {
    CommandRegistryEntry {
        name: info.name,
        description: info.description,
        category: info.category,
        param_schema,
    }
}

/// The complete command registry, auto-generated from param struct
/// schemas. Dummy instances exist only to reach the `CommandInfo`.
#[allow(clippy::too_many_lines)]
pub fn command_registry() -> Vec<CommandRegistryEntry> {

    let specs: Vec<(CommandInfo, Value)> = vec![
        // ── Lights ──────────────────────────────────────────
        (Command::LightOn(Default::default()).info(), schema_value::<LightIdParams>()),
        (Command::LightOff(Default::default()).info(), schema_value::<LightIdParams>()),
        (
            Command::LightBrightness(Default::default()).info(),
            schema_value::<LightBrightnessParams>(),
        ),
        (
            Command::LightColor(Default::default()).info(),
            schema_value::<LightColorParams>(),
        ),
        (
            Command::LightEffect(Default::default()).info(),
            schema_value::<LightEffectParams>(),
        ),
        (
            Command::IdentifyLight(Default::default()).info(),
            schema_value::<LightIdParams>(),
        ),
        (
            Command::GetLightState(Default::default()).info(),
            schema_value::<LightIdParams>(),
        ),
        // ── Groups ──────────────────────────────────────────
        (Command::GroupOn(Default::default()).info(), schema_value::<GroupIdParams>()),
        (Command::GroupOff(Default::default()).info(), schema_value::<GroupIdParams>()),
        (
            Command::GroupBrightness(Default::default()).info(),
            schema_value::<GroupBrightnessParams>(),
        ),
        (
            Command::GroupColor(Default::default()).info(),
            schema_value::<GroupColorParams>(),
        ),
        (
            Command::GroupEffect(Default::default()).info(),
            schema_value::<GroupEffectParams>(),
        ),
        // ── Discovery ───────────────────────────────────────
        (Command::ListLights.info(), empty_object_schema()),
        (Command::ListGroups.info(), empty_object_schema()),
        (Command::ListRooms.info(), empty_object_schema()),
        (Command::ListZones.info(), empty_object_schema()),
        (Command::ListDevices.info(), empty_object_schema()),
        (Command::ListScenes.info(), empty_object_schema()),
        (Command::ListMotionSensors.info(), empty_object_schema()),
        (Command::ListTemperatureSensors.info(), empty_object_schema()),
        (Command::ListLightLevelSensors.info(), empty_object_schema()),
        (Command::ListButtons.info(), empty_object_schema()),
        (Command::ListEntertainment.info(), empty_object_schema()),
        (Command::ListSupportedEffects.info(), empty_object_schema()),
        (Command::BridgeInfo.info(), empty_object_schema()),
        // ── Bridge scenes / zones ───────────────────────────
        (
            Command::ActivateScene(Default::default()).info(),
            schema_value::<SceneIdParams>(),
        ),
        (
            Command::CreateSceneFromState(Default::default()).info(),
            schema_value::<CreateSceneParams>(),
        ),
        (
            Command::UpdateScene(Default::default()).info(),
            schema_value::<UpdateSceneParams>(),
        ),
        (
            Command::DeleteScene(Default::default()).info(),
            schema_value::<SceneIdParams>(),
        ),
        (
            Command::CreateZone(Default::default()).info(),
            schema_value::<CreateZoneParams>(),
        ),
        (Command::DeleteZone(Default::default()).info(), schema_value::<ZoneIdParams>()),
        // ── Batch ───────────────────────────────────────────
        (
            Command::BatchCommands(Default::default()).info(),
            schema_value::<BatchParams>(),
        ),
        // ── Choreography ────────────────────────────────────
        (Command::FlashEffect(Default::default()).info(), schema_value::<FlashParams>()),
        (Command::PulseEffect(Default::default()).info(), schema_value::<PulseParams>()),
        (
            Command::ColorLoopEffect(Default::default()).info(),
            schema_value::<ColorLoopParams>(),
        ),
        (
            Command::StrobeEffect(Default::default()).info(),
            schema_value::<StrobeParams>(),
        ),
        (Command::AlertEffect(Default::default()).info(), schema_value::<AlertParams>()),
        (Command::FadeEffect(Default::default()).info(), schema_value::<FadeParams>()),
        (
            Command::CustomSequence(Default::default()).info(),
            schema_value::<CustomSequenceParams>(),
        ),
        (Command::ListSequences.info(), empty_object_schema()),
        (
            Command::StopSequence(Default::default()).info(),
            schema_value::<StopSequenceParams>(),
        ),
        // ── Cached scenes ───────────────────────────────────
        (
            Command::RecallScene(Default::default()).info(),
            schema_value::<SceneNameParams>(),
        ),
        (Command::ListCachedScenes.info(), empty_object_schema()),
        (
            Command::ClearCachedScene(Default::default()).info(),
            schema_value::<SceneNameParams>(),
        ),
        (
            Command::ExportScene(Default::default()).info(),
            schema_value::<SceneNameParams>(),
        ),
        // ── Event stream ────────────────────────────────────
        (
            Command::StartEventStream(Default::default()).info(),
            schema_value::<StartEventStreamParams>(),
        ),
        (Command::StopEventStream.info(), empty_object_schema()),
        (
            Command::GetRecentEvents(Default::default()).info(),
            schema_value::<RecentEventsParams>(),
        ),
        (Command::GetEventStreamStatus.info(), empty_object_schema()),
        // ── Entertainment streaming ─────────────────────────
        (
            Command::StartStreaming(Default::default()).info(),
            schema_value::<StartStreamingParams>(),
        ),
        (
            Command::StopStreaming(Default::default()).info(),
            schema_value::<ConfigIdParams>(),
        ),
        (
            Command::SendColors(Default::default()).info(),
            schema_value::<SendColorsParams>(),
        ),
        (Command::StreamingStatus.info(), empty_object_schema()),
        (
            Command::RainbowEffect(Default::default()).info(),
            schema_value::<RainbowParams>(),
        ),
    ];

    specs
        .into_iter()
        .map(|(info, schema)| entry(info, schema))
        .collect()
}

/// JSON-formatted tool list for the HTTP surface and AI hosts.
pub fn to_json_schema() -> Value {
    Value::Array(
        command_registry()
            .iter()
            .map(|e| {
                serde_json::json!({
                    "name": e.name,
                    "description": e.description,
                    "category": e.category,
                    "inputSchema": e.param_schema,
                })
            })
            .collect(),
    )
}

/// Deserialize a tool call (name + JSON args) into a Command.
#[allow(clippy::too_many_lines)]
pub fn deserialize_from_tool_call(name: &str, input: &Value) -> Result<Command, String> {
    match name {
        // Lights
        "light_on" => Ok(Command::LightOn(de(input)?)),
        "light_off" => Ok(Command::LightOff(de(input)?)),
        "light_brightness" => Ok(Command::LightBrightness(de(input)?)),
        "light_color" => Ok(Command::LightColor(de(input)?)),
        "light_effect" => Ok(Command::LightEffect(de(input)?)),
        "identify_light" => Ok(Command::IdentifyLight(de(input)?)),
        "get_light_state" => Ok(Command::GetLightState(de(input)?)),
        // Groups
        "group_on" => Ok(Command::GroupOn(de(input)?)),
        "group_off" => Ok(Command::GroupOff(de(input)?)),
        "group_brightness" => Ok(Command::GroupBrightness(de(input)?)),
        "group_color" => Ok(Command::GroupColor(de(input)?)),
        "group_effect" => Ok(Command::GroupEffect(de(input)?)),
        // Discovery
        "list_lights" => Ok(Command::ListLights),
        "list_groups" => Ok(Command::ListGroups),
        "list_rooms" => Ok(Command::ListRooms),
        "list_zones" => Ok(Command::ListZones),
        "list_devices" => Ok(Command::ListDevices),
        "list_scenes" => Ok(Command::ListScenes),
        "list_motion_sensors" => Ok(Command::ListMotionSensors),
        "list_temperature_sensors" => Ok(Command::ListTemperatureSensors),
        "list_light_level_sensors" => Ok(Command::ListLightLevelSensors),
        "list_buttons" => Ok(Command::ListButtons),
        "list_entertainment" => Ok(Command::ListEntertainment),
        "list_supported_effects" => Ok(Command::ListSupportedEffects),
        "bridge_info" => Ok(Command::BridgeInfo),
        // Bridge scenes / zones
        "activate_scene" => Ok(Command::ActivateScene(de(input)?)),
        "create_scene_from_state" => Ok(Command::CreateSceneFromState(de(input)?)),
        "update_scene" => Ok(Command::UpdateScene(de(input)?)),
        "delete_scene" => Ok(Command::DeleteScene(de(input)?)),
        "create_zone" => Ok(Command::CreateZone(de(input)?)),
        "delete_zone" => Ok(Command::DeleteZone(de(input)?)),
        // Batch
        "batch_commands" => Ok(Command::BatchCommands(de(input)?)),
        // Choreography
        "flash_effect" => Ok(Command::FlashEffect(de(input)?)),
        "pulse_effect" => Ok(Command::PulseEffect(de(input)?)),
        "color_loop_effect" => Ok(Command::ColorLoopEffect(de(input)?)),
        "strobe_effect" => Ok(Command::StrobeEffect(de(input)?)),
        "alert_effect" => Ok(Command::AlertEffect(de(input)?)),
        "fade_effect" => Ok(Command::FadeEffect(de(input)?)),
        "custom_sequence" => Ok(Command::CustomSequence(de(input)?)),
        "list_sequences" => Ok(Command::ListSequences),
        "stop_sequence" => Ok(Command::StopSequence(de(input)?)),
        // Cached scenes
        "recall_scene" => Ok(Command::RecallScene(de(input)?)),
        "list_cached_scenes" => Ok(Command::ListCachedScenes),
        "clear_cached_scene" => Ok(Command::ClearCachedScene(de(input)?)),
        "export_scene" => Ok(Command::ExportScene(de(input)?)),
        // Event stream
        "start_event_stream" => Ok(Command::StartEventStream(de(input)?)),
        "stop_event_stream" => Ok(Command::StopEventStream),
        "get_recent_events" => Ok(Command::GetRecentEvents(de(input)?)),
        "get_event_stream_status" => Ok(Command::GetEventStreamStatus),
        // Entertainment streaming
        "start_streaming" => Ok(Command::StartStreaming(de(input)?)),
        "stop_streaming" => Ok(Command::StopStreaming(de(input)?)),
        "send_colors" => Ok(Command::SendColors(de(input)?)),
        "streaming_status" => Ok(Command::StreamingStatus),
        "rainbow_effect" => Ok(Command::RainbowEffect(de(input)?)),
        _ => Err(format!("Unknown command: {name}")),
    }
}

fn de<T: serde::de::DeserializeOwned>(input: &Value) -> Result<T, String> {
    serde_json::from_value(input.clone()).map_err(|e| e.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn registry_covers_every_tool_exactly_once() {
        let registry = command_registry();
        let mut names: Vec<&str> = registry.iter().map(|e| e.name).collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total, "duplicate tool names in registry");

        // Every registry name deserializes into a Command with empty or
        // minimal args resolvable later (only the name mapping matters
        // here, so unknown-name detection is the real check).
        assert!(deserialize_from_tool_call("no_such_tool", &serde_json::json!({})).is_err());
    }

    #[test]
    fn tool_calls_deserialize_with_typed_params() {
        let cmd = deserialize_from_tool_call(
            "light_brightness",
            &serde_json::json!({"light_id": "l1", "brightness": 42.5}),
        )
        .unwrap();
        match cmd {
            Command::LightBrightness(p) => {
                assert_eq!(p.light_id, "l1");
                assert_eq!(p.brightness, 42.5);
            }
            other => panic!("wrong command: {other:?}"),
        }

        let cmd = deserialize_from_tool_call(
            "batch_commands",
            &serde_json::json!({
                "commands": [{"action": "light_on", "target_id": "l1"}],
                "delay_ms": 50,
                "cache_name": "go"
            }),
        )
        .unwrap();
        match cmd {
            Command::BatchCommands(p) => {
                assert_eq!(p.commands.len(), 1);
                assert_eq!(p.delay_ms, 50);
                assert!(p.async_);
                assert_eq!(p.cache_name.as_deref(), Some("go"));
            }
            other => panic!("wrong command: {other:?}"),
        }
    }

    #[test]
    fn missing_required_args_are_reported() {
        let err =
            deserialize_from_tool_call("light_on", &serde_json::json!({})).unwrap_err();
        assert!(err.contains("light_id"), "unhelpful error: {err}");
    }

    #[test]
    fn schemas_are_objects() {
        for entry in command_registry() {
            assert!(
                entry.param_schema.is_object(),
                "{} has a non-object schema",
                entry.name
            );
        }
    }
}
