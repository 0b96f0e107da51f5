//! Entertainment-configuration resources and the REST start/stop calls
//! that gate UDP streaming.

use serde::Deserialize;
use serde_json::json;

use super::types::{Metadata, ResourceIdentifier};
use super::BridgeClient;
use crate::error::AppError;

#[derive(Debug, Clone, Deserialize)]
pub struct Entertainment {
    pub id: String,
    #[serde(default)]
    pub id_v1: Option<String>,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub configuration_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub active_streamer: Option<ResourceIdentifier>,
    #[serde(default)]
    pub channels: Vec<EntertainmentChannel>,
    #[serde(default)]
    pub light_services: Vec<ResourceIdentifier>,
}

impl Entertainment {
    /// Channel-id → light-id pairs, one per channel. A channel's first
    /// member identifies the light it drives.
    pub fn channel_lights(&self) -> Vec<(u16, String)> {
        self.channels
            .iter()
            .filter_map(|ch| {
                ch.members
                    .first()
                    .map(|m| (ch.channel_id, m.service.rid.clone()))
            })
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EntertainmentChannel {
    pub channel_id: u16,
    #[serde(default)]
    pub position: Option<Position>,
    #[serde(default)]
    pub members: Vec<ChannelMember>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChannelMember {
    pub service: ResourceIdentifier,
    #[serde(default)]
    pub index: u32,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl BridgeClient {
    pub async fn get_entertainment_configurations(
        &self,
    ) -> Result<Vec<Entertainment>, AppError> {
        self.get_data("/resource/entertainment_configuration").await
    }

    pub async fn get_entertainment_configuration(
        &self,
        id: &str,
    ) -> Result<Entertainment, AppError> {
        self.get_one(
            &format!("/resource/entertainment_configuration/{id}"),
            "entertainment configuration",
        )
        .await
    }

    /// Tell the bridge to open the UDP side of this configuration.
    pub async fn start_entertainment(&self, id: &str) -> Result<(), AppError> {
        self.put_json(
            &format!("/resource/entertainment_configuration/{id}"),
            &json!({ "action": "start" }),
        )
        .await
    }

    pub async fn stop_entertainment(&self, id: &str) -> Result<(), AppError> {
        self.put_json(
            &format!("/resource/entertainment_configuration/{id}"),
            &json!({ "action": "stop" }),
        )
        .await
    }
}
