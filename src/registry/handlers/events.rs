use std::sync::Arc;

use crate::error::AppError;
use crate::registry::params::{RecentEventsParams, StartEventStreamParams};
use crate::registry::CommandOutput;
use crate::state::AppState;

pub async fn start_event_stream(
    state: &Arc<AppState>,
    p: StartEventStreamParams,
) -> Result<CommandOutput, AppError> {
    let filter = p.filter.as_deref().filter(|f| !f.is_empty());
    if !state.events.start(filter) {
        return Ok(CommandOutput::unit("Event stream is already running"));
    }

    let message = match filter {
        Some(filter) => format!("Event stream started with filter: {filter}"),
        None => "Event stream started".to_string(),
    };
    Ok(CommandOutput::unit(message))
}

pub async fn stop_event_stream(state: &Arc<AppState>) -> Result<CommandOutput, AppError> {
    if state.events.stop() {
        Ok(CommandOutput::unit("Event stream stopped"))
    } else {
        Ok(CommandOutput::unit("Event stream is not running"))
    }
}

pub async fn get_recent_events(
    state: &Arc<AppState>,
    p: RecentEventsParams,
) -> Result<CommandOutput, AppError> {
    let events = state
        .events
        .recent_events(p.limit, p.type_.as_deref().filter(|t| !t.is_empty()));

    if events.is_empty() {
        let mut message = "No events found".to_string();
        if let Some(kind) = &p.type_ {
            message.push_str(&format!(" of type '{kind}'"));
        }
        return Ok(CommandOutput::unit(message));
    }

    let mut lines = vec![format!("Recent events ({} shown):", events.len())];
    for event in &events {
        lines.push(format!(
            "- {} {} at {}",
            event.kind.as_str(),
            event.id,
            event.creationtime
        ));
        for data in &event.data {
            lines.push(format!("  • {}", data.kind_str()));
        }
    }
    Ok(CommandOutput::json(lines.join("\n"), &events))
}

pub async fn get_event_stream_status(state: &Arc<AppState>) -> Result<CommandOutput, AppError> {
    let status = state.events.status();
    let message = format!(
        "Event stream status:\n- Streaming: {}\n- Events buffered: {}\n- Max buffer size: {}",
        status.streaming, status.buffered, status.capacity
    );
    Ok(CommandOutput::json(message, &status))
}
