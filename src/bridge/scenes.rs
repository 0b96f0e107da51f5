//! Scene CRUD, plus the room / zone / device reads the scene machinery
//! and the resolver lean on.

use serde_json::json;

use super::types::{
    CreatedRef, Device, GroupUpdateBody, LightUpdate, Metadata, MirekUpdate, ResourceIdentifier,
    Room, Scene, SceneAction, SceneCreate, SceneUpdate, Zone, ZoneCreate,
};
use super::BridgeClient;
use crate::error::AppError;

impl BridgeClient {
    pub async fn get_scenes(&self) -> Result<Vec<Scene>, AppError> {
        self.get_data("/resource/scene").await
    }

    pub async fn get_scene(&self, id: &str) -> Result<Scene, AppError> {
        self.get_one(&format!("/resource/scene/{id}"), "scene").await
    }

    pub async fn activate_scene(&self, id: &str) -> Result<(), AppError> {
        self.put_json(
            &format!("/resource/scene/{id}"),
            &json!({ "recall": { "action": "active" } }),
        )
        .await
    }

    pub async fn create_scene(&self, scene: &SceneCreate) -> Result<Scene, AppError> {
        let created: Vec<CreatedRef> = self.post_data("/resource/scene", scene).await?;
        let rid = created
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Decode {
                message: "no scene id returned".to_string(),
            })?
            .rid;
        self.get_scene(&rid).await
    }

    /// Snapshot the current state of every light in a room into a new
    /// bridge scene. Lights that cannot be read are skipped.
    pub async fn create_scene_from_state(
        &self,
        name: &str,
        room_id: &str,
    ) -> Result<Scene, AppError> {
        let room = self.get_room(room_id).await?;
        let devices = self.get_devices().await?;

        let mut light_ids = Vec::new();
        for child in &room.children {
            if child.rtype != "device" {
                continue;
            }
            if let Some(device) = devices.iter().find(|d| d.id == child.rid) {
                light_ids.extend(device.light_ids().map(str::to_string));
            }
        }

        let mut actions = Vec::new();
        for light_id in light_ids {
            let Ok(light) = self.get_light(&light_id).await else {
                continue;
            };

            let mut update = LightUpdate {
                on: Some(light.on),
                ..LightUpdate::default()
            };
            if light.on.on && light.brightness() > 0.0 {
                update = update.with_brightness(light.brightness());
            }
            if let Some(color) = &light.color {
                update = update.with_xy(color.xy.x, color.xy.y);
            }
            if let Some(ct) = &light.color_temperature {
                if ct.mirek_valid.unwrap_or(false) {
                    if let Some(mirek) = ct.mirek {
                        update.color_temperature = Some(MirekUpdate { mirek });
                    }
                }
            }

            actions.push(SceneAction {
                target: ResourceIdentifier::new(light_id, "light"),
                action: update,
            });
        }

        self.create_scene(&SceneCreate {
            type_: "scene",
            metadata: Metadata {
                name: name.to_string(),
                archetype: None,
            },
            group: ResourceIdentifier::new(room_id, "room"),
            actions,
            speed: Some(0.5),
        })
        .await
    }

    pub async fn update_scene(&self, id: &str, update: &SceneUpdate) -> Result<(), AppError> {
        self.put_json(&format!("/resource/scene/{id}"), update).await
    }

    pub async fn delete_scene(&self, id: &str) -> Result<(), AppError> {
        self.delete_resource(&format!("/resource/scene/{id}")).await
    }

    // ── Rooms ───────────────────────────────────────────────────

    pub async fn get_rooms(&self) -> Result<Vec<Room>, AppError> {
        self.get_data("/resource/room").await
    }

    pub async fn get_room(&self, id: &str) -> Result<Room, AppError> {
        self.get_one(&format!("/resource/room/{id}"), "room").await
    }

    pub async fn update_room(&self, id: &str, update: &GroupUpdateBody) -> Result<(), AppError> {
        self.put_json(&format!("/resource/room/{id}"), update).await
    }

    // ── Zones ───────────────────────────────────────────────────

    pub async fn get_zones(&self) -> Result<Vec<Zone>, AppError> {
        self.get_data("/resource/zone").await
    }

    pub async fn get_zone(&self, id: &str) -> Result<Zone, AppError> {
        self.get_one(&format!("/resource/zone/{id}"), "zone").await
    }

    pub async fn create_zone(
        &self,
        name: &str,
        light_ids: &[String],
    ) -> Result<Zone, AppError> {
        let zone = ZoneCreate {
            type_: "zone",
            metadata: Metadata {
                name: name.to_string(),
                archetype: None,
            },
            children: light_ids
                .iter()
                .map(|id| ResourceIdentifier::new(id.clone(), "light"))
                .collect(),
        };
        let created: Vec<CreatedRef> = self.post_data("/resource/zone", &zone).await?;
        let rid = created
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Decode {
                message: "no zone id returned".to_string(),
            })?
            .rid;
        self.get_zone(&rid).await
    }

    pub async fn update_zone(&self, id: &str, update: &GroupUpdateBody) -> Result<(), AppError> {
        self.put_json(&format!("/resource/zone/{id}"), update).await
    }

    pub async fn delete_zone(&self, id: &str) -> Result<(), AppError> {
        self.delete_resource(&format!("/resource/zone/{id}")).await
    }

    // ── Devices ─────────────────────────────────────────────────

    pub async fn get_devices(&self) -> Result<Vec<Device>, AppError> {
        self.get_data("/resource/device").await
    }

    pub async fn get_device(&self, id: &str) -> Result<Device, AppError> {
        self.get_one(&format!("/resource/device/{id}"), "device").await
    }

    pub async fn identify_device(&self, id: &str) -> Result<(), AppError> {
        self.put_json(
            &format!("/resource/device/{id}"),
            &json!({ "identify": { "action": "identify" } }),
        )
        .await
    }

    pub async fn get_bridge(&self) -> Result<super::types::BridgeInfo, AppError> {
        self.get_one("/resource/bridge", "bridge").await
    }
}
