use std::sync::Arc;

use crate::error::AppError;
use crate::state::AppState;

use super::handlers::{
    batch, cache, effects, events, groups, lights, scenes, sensors, streaming, system,
};
use super::{Command, CommandOutput};

/// Execute a Command against the application state. This is the single
/// dispatch point for all surfaces (HTTP API, CLI, embedding hosts). The
/// exhaustive match ensures a compiler error if a new variant is added
/// without an implementation.
#[allow(clippy::too_many_lines)]
pub async fn execute(state: &Arc<AppState>, cmd: Command) -> Result<CommandOutput, AppError> {
    match cmd {
        // ── Lights ──────────────────────────────────────────
        Command::LightOn(p) => lights::light_on(state, p).await,
        Command::LightOff(p) => lights::light_off(state, p).await,
        Command::LightBrightness(p) => lights::light_brightness(state, p).await,
        Command::LightColor(p) => lights::light_color(state, p).await,
        Command::LightEffect(p) => lights::light_effect(state, p).await,
        Command::IdentifyLight(p) => lights::identify_light(state, p).await,
        Command::GetLightState(p) => lights::get_light_state(state, p).await,

        // ── Groups ──────────────────────────────────────────
        Command::GroupOn(p) => groups::group_on(state, p).await,
        Command::GroupOff(p) => groups::group_off(state, p).await,
        Command::GroupBrightness(p) => groups::group_brightness(state, p).await,
        Command::GroupColor(p) => groups::group_color(state, p).await,
        Command::GroupEffect(p) => groups::group_effect(state, p).await,

        // ── Discovery ───────────────────────────────────────
        Command::ListLights => system::list_lights(state).await,
        Command::ListGroups => system::list_groups(state).await,
        Command::ListRooms => system::list_rooms(state).await,
        Command::ListZones => system::list_zones(state).await,
        Command::ListDevices => system::list_devices(state).await,
        Command::ListScenes => scenes::list_scenes(state).await,
        Command::ListMotionSensors => sensors::list_motion_sensors(state).await,
        Command::ListTemperatureSensors => sensors::list_temperature_sensors(state).await,
        Command::ListLightLevelSensors => sensors::list_light_level_sensors(state).await,
        Command::ListButtons => sensors::list_buttons(state).await,
        Command::ListEntertainment => streaming::list_entertainment(state).await,
        Command::ListSupportedEffects => system::list_supported_effects(state).await,
        Command::BridgeInfo => system::bridge_info(state).await,

        // ── Bridge scenes / zones ───────────────────────────
        Command::ActivateScene(p) => scenes::activate_scene(state, p).await,
        Command::CreateSceneFromState(p) => scenes::create_scene_from_state(state, p).await,
        Command::UpdateScene(p) => scenes::update_scene(state, p).await,
        Command::DeleteScene(p) => scenes::delete_scene(state, p).await,
        Command::CreateZone(p) => scenes::create_zone(state, p).await,
        Command::DeleteZone(p) => scenes::delete_zone(state, p).await,

        // ── Batch ───────────────────────────────────────────
        Command::BatchCommands(p) => batch::batch_commands(state, p).await,

        // ── Choreography ────────────────────────────────────
        Command::FlashEffect(p) => effects::flash_effect(state, p).await,
        Command::PulseEffect(p) => effects::pulse_effect(state, p).await,
        Command::ColorLoopEffect(p) => effects::color_loop_effect(state, p).await,
        Command::StrobeEffect(p) => effects::strobe_effect(state, p).await,
        Command::AlertEffect(p) => effects::alert_effect(state, p).await,
        Command::FadeEffect(p) => effects::fade_effect(state, p).await,
        Command::CustomSequence(p) => effects::custom_sequence(state, p).await,
        Command::ListSequences => effects::list_sequences(state).await,
        Command::StopSequence(p) => effects::stop_sequence(state, p).await,

        // ── Cached scenes ───────────────────────────────────
        Command::RecallScene(p) => cache::recall_scene(state, p).await,
        Command::ListCachedScenes => cache::list_cached_scenes(state).await,
        Command::ClearCachedScene(p) => cache::clear_cached_scene(state, p).await,
        Command::ExportScene(p) => cache::export_scene(state, p).await,

        // ── Event stream ────────────────────────────────────
        Command::StartEventStream(p) => events::start_event_stream(state, p).await,
        Command::StopEventStream => events::stop_event_stream(state).await,
        Command::GetRecentEvents(p) => events::get_recent_events(state, p).await,
        Command::GetEventStreamStatus => events::get_event_stream_status(state).await,

        // ── Entertainment streaming ─────────────────────────
        Command::StartStreaming(p) => streaming::start_streaming(state, p).await,
        Command::StopStreaming(p) => streaming::stop_streaming(state, p).await,
        Command::SendColors(p) => streaming::send_colors(state, p).await,
        Command::StreamingStatus => streaming::streaming_status(state).await,
        Command::RainbowEffect(p) => streaming::rainbow_effect(state, p).await,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::registry::params::{
        BatchParams, RecentEventsParams, SceneNameParams, StopSequenceParams,
    };
    use crate::settings::AppSettings;

    fn test_state() -> Arc<AppState> {
        let settings = AppSettings {
            bridge_ip: "127.0.0.1".to_string(),
            application_key: Some("test-key".to_string()),
            ..AppSettings::default()
        };
        Arc::new(AppState::new(settings).unwrap())
    }

    fn one_light_on() -> Vec<crate::batch::BatchCommand> {
        vec![crate::batch::BatchCommand {
            action: crate::batch::BatchAction::LightOn,
            target_id: "15f36a9c-87f8-4fbe-ab26-63b1ad1a1b07".to_string(),
            value: String::new(),
            duration: 0,
        }]
    }

    #[tokio::test]
    async fn async_batch_with_cache_returns_immediately_and_caches() {
        let state = test_state();
        let p = BatchParams {
            commands: one_light_on(),
            delay_ms: 50,
            async_: true,
            cache_name: Some("go".to_string()),
            cache_description: Some("test".to_string()),
        };

        let out = execute(&state, Command::BatchCommands(p)).await.unwrap();
        assert!(out.message.contains("Batch started asynchronously"));
        assert!(out.message.contains("Cached scene 'go'"));

        let listed = state.scene_cache.list();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "go");
        assert_eq!(listed[0].delay_ms, 50);
        assert_eq!(listed[0].commands.len(), 1);
        assert_eq!(listed[0].usage_count, 0);
    }

    #[tokio::test]
    async fn recall_increments_usage_and_schedules() {
        let state = test_state();
        state
            .scene_cache
            .save("go", one_light_on(), 25, "desc")
            .unwrap();

        let out = execute(
            &state,
            Command::RecallScene(SceneNameParams {
                scene_name: "go".to_string(),
            }),
        )
        .await
        .unwrap();
        assert!(out.message.contains("Recalling atmosphere: go"));
        assert!(out.message.contains("Batch ID: recalled_go_"));

        assert_eq!(state.scene_cache.list()[0].usage_count, 1);
    }

    #[tokio::test]
    async fn recall_unknown_scene_fails() {
        let state = test_state();
        let err = execute(
            &state,
            Command::RecallScene(SceneNameParams {
                scene_name: "ghost".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn empty_batch_is_an_input_error() {
        let state = test_state();
        let err = execute(
            &state,
            Command::BatchCommands(BatchParams {
                commands: vec![],
                ..BatchParams::default()
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput { .. }));
    }

    #[tokio::test]
    async fn stop_sequence_requires_an_id() {
        let state = test_state();
        let err = execute(
            &state,
            Command::StopSequence(StopSequenceParams::default()),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput { .. }));
    }

    #[tokio::test]
    async fn event_stream_tools_work_without_a_bridge() {
        let state = test_state();

        let out = execute(&state, Command::GetEventStreamStatus).await.unwrap();
        assert!(out.message.contains("Streaming: false"));

        let out = execute(
            &state,
            Command::GetRecentEvents(RecentEventsParams {
                limit: 10,
                type_: Some("motion".to_string()),
            }),
        )
        .await
        .unwrap();
        assert!(out.message.contains("No events found of type 'motion'"));

        let out = execute(&state, Command::StopEventStream).await.unwrap();
        assert!(out.message.contains("not running"));
    }

    #[tokio::test]
    async fn streaming_status_is_empty_without_sessions() {
        let state = test_state();
        let out = execute(&state, Command::StreamingStatus).await.unwrap();
        assert!(out.message.contains("No active streaming sessions"));
    }
}
