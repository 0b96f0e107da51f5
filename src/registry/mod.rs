pub mod catalog;
pub mod execute;
pub mod handlers;
pub mod params;

use serde::{Deserialize, Serialize};

use params::{
    AlertParams, BatchParams, ColorLoopParams, ConfigIdParams, CreateSceneParams,
    CreateZoneParams, CustomSequenceParams, FadeParams, FlashParams, GroupBrightnessParams,
    GroupColorParams, GroupEffectParams, GroupIdParams, LightBrightnessParams, LightColorParams,
    LightEffectParams, LightIdParams, PulseParams, RainbowParams, RecentEventsParams,
    SceneIdParams, SceneNameParams, SendColorsParams, StartEventStreamParams,
    StartStreamingParams, StopSequenceParams, StrobeParams, UpdateSceneParams, ZoneIdParams,
};

// ── Command enum ────────────────────────────────────────────────

/// Unified tool type. Every surface (HTTP API, CLI, embedding hosts)
/// dispatches through the same executor. Adding a variant causes compiler
/// errors until it is fully handled.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "command", content = "params")]
pub enum Command {
    // ── Lights ──────────────────────────────────────────────
    LightOn(LightIdParams),
    LightOff(LightIdParams),
    LightBrightness(LightBrightnessParams),
    LightColor(LightColorParams),
    LightEffect(LightEffectParams),
    IdentifyLight(LightIdParams),
    GetLightState(LightIdParams),

    // ── Groups ──────────────────────────────────────────────
    GroupOn(GroupIdParams),
    GroupOff(GroupIdParams),
    GroupBrightness(GroupBrightnessParams),
    GroupColor(GroupColorParams),
    GroupEffect(GroupEffectParams),

    // ── Discovery ───────────────────────────────────────────
    ListLights,
    ListGroups,
    ListRooms,
    ListZones,
    ListDevices,
    ListScenes,
    ListMotionSensors,
    ListTemperatureSensors,
    ListLightLevelSensors,
    ListButtons,
    ListEntertainment,
    ListSupportedEffects,
    BridgeInfo,

    // ── Bridge scenes / zones ───────────────────────────────
    ActivateScene(SceneIdParams),
    CreateSceneFromState(CreateSceneParams),
    UpdateScene(UpdateSceneParams),
    DeleteScene(SceneIdParams),
    CreateZone(CreateZoneParams),
    DeleteZone(ZoneIdParams),

    // ── Batch ───────────────────────────────────────────────
    BatchCommands(BatchParams),

    // ── Choreography ────────────────────────────────────────
    FlashEffect(FlashParams),
    PulseEffect(PulseParams),
    ColorLoopEffect(ColorLoopParams),
    StrobeEffect(StrobeParams),
    AlertEffect(AlertParams),
    FadeEffect(FadeParams),
    CustomSequence(CustomSequenceParams),
    ListSequences,
    StopSequence(StopSequenceParams),

    // ── Cached scenes ───────────────────────────────────────
    RecallScene(SceneNameParams),
    ListCachedScenes,
    ClearCachedScene(SceneNameParams),
    ExportScene(SceneNameParams),

    // ── Event stream ────────────────────────────────────────
    StartEventStream(StartEventStreamParams),
    StopEventStream,
    GetRecentEvents(RecentEventsParams),
    GetEventStreamStatus,

    // ── Entertainment streaming ─────────────────────────────
    StartStreaming(StartStreamingParams),
    StopStreaming(ConfigIdParams),
    SendColors(SendColorsParams),
    StreamingStatus,
    RainbowEffect(RainbowParams),
}

// ── Command metadata ────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandCategory {
    Light,
    Group,
    System,
    Scene,
    Zone,
    Batch,
    Effect,
    Cache,
    Events,
    Streaming,
}

pub struct CommandInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub category: CommandCategory,
}

impl Command {
    /// Metadata for this command. Exhaustive match ensures compiler errors
    /// if a new variant is added without providing metadata.
    #[allow(clippy::too_many_lines)]
    pub fn info(&self) -> CommandInfo {
        use CommandCategory as C;
        match self {
            Command::LightOn(_) => CommandInfo {
                name: "light_on",
                description: "Turn a light on.",
                category: C::Light,
            },
            Command::LightOff(_) => CommandInfo {
                name: "light_off",
                description: "Turn a light off.",
                category: C::Light,
            },
            Command::LightBrightness(_) => CommandInfo {
                name: "light_brightness",
                description: "Set light brightness (0-100 percent).",
                category: C::Light,
            },
            Command::LightColor(_) => CommandInfo {
                name: "light_color",
                description: "Set light color by hex code or color name.",
                category: C::Light,
            },
            Command::LightEffect(_) => CommandInfo {
                name: "light_effect",
                description: "Apply a native bridge effect to a light.",
                category: C::Light,
            },
            Command::IdentifyLight(_) => CommandInfo {
                name: "identify_light",
                description: "Make a light blink so it can be spotted.",
                category: C::Light,
            },
            Command::GetLightState(_) => CommandInfo {
                name: "get_light_state",
                description: "Get the current state of a light.",
                category: C::Light,
            },

            Command::GroupOn(_) => CommandInfo {
                name: "group_on",
                description: "Turn a room or zone on.",
                category: C::Group,
            },
            Command::GroupOff(_) => CommandInfo {
                name: "group_off",
                description: "Turn a room or zone off.",
                category: C::Group,
            },
            Command::GroupBrightness(_) => CommandInfo {
                name: "group_brightness",
                description: "Set group brightness (0-100 percent).",
                category: C::Group,
            },
            Command::GroupColor(_) => CommandInfo {
                name: "group_color",
                description: "Set group color by hex code or color name.",
                category: C::Group,
            },
            Command::GroupEffect(_) => CommandInfo {
                name: "group_effect",
                description: "Apply a native bridge effect to a group.",
                category: C::Group,
            },

            Command::ListLights => CommandInfo {
                name: "list_lights",
                description: "List all lights with their state.",
                category: C::System,
            },
            Command::ListGroups => CommandInfo {
                name: "list_groups",
                description: "List all rooms and zones with their grouped-light ids.",
                category: C::System,
            },
            Command::ListRooms => CommandInfo {
                name: "list_rooms",
                description: "List all rooms.",
                category: C::System,
            },
            Command::ListZones => CommandInfo {
                name: "list_zones",
                description: "List all zones.",
                category: C::System,
            },
            Command::ListDevices => CommandInfo {
                name: "list_devices",
                description: "List all devices with product information.",
                category: C::System,
            },
            Command::ListScenes => CommandInfo {
                name: "list_scenes",
                description: "List all bridge scenes.",
                category: C::Scene,
            },
            Command::ListMotionSensors => CommandInfo {
                name: "list_motion_sensors",
                description: "List motion sensors and their last readings.",
                category: C::System,
            },
            Command::ListTemperatureSensors => CommandInfo {
                name: "list_temperature_sensors",
                description: "List temperature sensors and their readings.",
                category: C::System,
            },
            Command::ListLightLevelSensors => CommandInfo {
                name: "list_light_level_sensors",
                description: "List light-level sensors and their readings.",
                category: C::System,
            },
            Command::ListButtons => CommandInfo {
                name: "list_buttons",
                description: "List buttons (dimmer switches) and their last events.",
                category: C::System,
            },
            Command::ListEntertainment => CommandInfo {
                name: "list_entertainment",
                description: "List entertainment configurations.",
                category: C::Streaming,
            },
            Command::ListSupportedEffects => CommandInfo {
                name: "list_supported_effects",
                description: "List native effects supported by any light.",
                category: C::System,
            },
            Command::BridgeInfo => CommandInfo {
                name: "bridge_info",
                description: "Get bridge information.",
                category: C::System,
            },

            Command::ActivateScene(_) => CommandInfo {
                name: "activate_scene",
                description: "Activate a bridge scene.",
                category: C::Scene,
            },
            Command::CreateSceneFromState(_) => CommandInfo {
                name: "create_scene_from_state",
                description: "Create a scene from the current state of a room's lights.",
                category: C::Scene,
            },
            Command::UpdateScene(_) => CommandInfo {
                name: "update_scene",
                description: "Update a scene's name and/or speed.",
                category: C::Scene,
            },
            Command::DeleteScene(_) => CommandInfo {
                name: "delete_scene",
                description: "Delete a bridge scene.",
                category: C::Scene,
            },
            Command::CreateZone(_) => CommandInfo {
                name: "create_zone",
                description: "Create a zone containing the given lights.",
                category: C::Zone,
            },
            Command::DeleteZone(_) => CommandInfo {
                name: "delete_zone",
                description: "Delete a zone.",
                category: C::Zone,
            },

            Command::BatchCommands(_) => CommandInfo {
                name: "batch_commands",
                description:
                    "Execute a list of commands in order with pacing; optionally cache it as a named scene.",
                category: C::Batch,
            },

            Command::FlashEffect(_) => CommandInfo {
                name: "flash_effect",
                description: "Flash a light in a color a number of times.",
                category: C::Effect,
            },
            Command::PulseEffect(_) => CommandInfo {
                name: "pulse_effect",
                description: "Pulse brightness between two levels.",
                category: C::Effect,
            },
            Command::ColorLoopEffect(_) => CommandInfo {
                name: "color_loop_effect",
                description: "Cycle through a list of colors until stopped.",
                category: C::Effect,
            },
            Command::StrobeEffect(_) => CommandInfo {
                name: "strobe_effect",
                description: "Strobe a light at a fixed rate for a duration.",
                category: C::Effect,
            },
            Command::AlertEffect(_) => CommandInfo {
                name: "alert_effect",
                description: "Attention-grabbing flutter, then return to normal.",
                category: C::Effect,
            },
            Command::FadeEffect(_) => CommandInfo {
                name: "fade_effect",
                description: "Fade between two color/brightness states.",
                category: C::Effect,
            },
            Command::CustomSequence(_) => CommandInfo {
                name: "custom_sequence",
                description: "Run a custom command sequence.",
                category: C::Effect,
            },
            Command::ListSequences => CommandInfo {
                name: "list_sequences",
                description: "List registered sequences and their status.",
                category: C::Effect,
            },
            Command::StopSequence(_) => CommandInfo {
                name: "stop_sequence",
                description: "Stop one or more running sequences.",
                category: C::Effect,
            },

            Command::RecallScene(_) => CommandInfo {
                name: "recall_scene",
                description: "Recall a cached scene by name.",
                category: C::Cache,
            },
            Command::ListCachedScenes => CommandInfo {
                name: "list_cached_scenes",
                description: "List cached scenes, most used first.",
                category: C::Cache,
            },
            Command::ClearCachedScene(_) => CommandInfo {
                name: "clear_cached_scene",
                description: "Remove a cached scene.",
                category: C::Cache,
            },
            Command::ExportScene(_) => CommandInfo {
                name: "export_scene",
                description: "Export a cached scene as JSON.",
                category: C::Cache,
            },

            Command::StartEventStream(_) => CommandInfo {
                name: "start_event_stream",
                description: "Start consuming the bridge event stream.",
                category: C::Events,
            },
            Command::StopEventStream => CommandInfo {
                name: "stop_event_stream",
                description: "Stop the event stream; buffered events are kept.",
                category: C::Events,
            },
            Command::GetRecentEvents(_) => CommandInfo {
                name: "get_recent_events",
                description: "Get recent events, newest first, optionally by type.",
                category: C::Events,
            },
            Command::GetEventStreamStatus => CommandInfo {
                name: "get_event_stream_status",
                description: "Get event stream status and buffer usage.",
                category: C::Events,
            },

            Command::StartStreaming(_) => CommandInfo {
                name: "start_streaming",
                description: "Start UDP entertainment streaming for a configuration.",
                category: C::Streaming,
            },
            Command::StopStreaming(_) => CommandInfo {
                name: "stop_streaming",
                description: "Stop UDP entertainment streaming.",
                category: C::Streaming,
            },
            Command::SendColors(_) => CommandInfo {
                name: "send_colors",
                description: "Send one frame of per-light colors to a streaming session.",
                category: C::Streaming,
            },
            Command::StreamingStatus => CommandInfo {
                name: "streaming_status",
                description: "List active streaming sessions.",
                category: C::Streaming,
            },
            Command::RainbowEffect(_) => CommandInfo {
                name: "rainbow_effect",
                description: "Run a phase-shifted rainbow over a streaming session.",
                category: C::Streaming,
            },
        }
    }
}

// ── Command output ──────────────────────────────────────────────

/// Result of executing a Command. Dual output serves both audiences: the
/// AI host and CLI read `message`, programmatic callers read `data`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandOutput {
    pub message: String,
    pub data: serde_json::Value,
}

impl CommandOutput {
    pub fn unit(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: serde_json::Value::Null,
        }
    }

    pub fn data(message: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            message: message.into(),
            data,
        }
    }

    pub fn json(message: impl Into<String>, value: &impl Serialize) -> Self {
        Self {
            message: message.into(),
            data: serde_json::to_value(value).unwrap_or(serde_json::Value::Null),
        }
    }
}
