//! Process-local cache of user-named command batches ("atmospheres").
//!
//! Independent of bridge-native scenes: a cached scene is just a command
//! list plus its inter-step delay, recallable by name. In-memory only;
//! nothing survives a restart.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::batch::BatchCommand;
use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedScene {
    pub name: String,
    pub commands: Vec<BatchCommand>,
    pub delay_ms: u64,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub usage_count: u64,
}

#[derive(Default)]
pub struct SceneCache {
    scenes: RwLock<HashMap<String, CachedScene>>,
}

impl SceneCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a scene. Overwrites an existing entry of the same name,
    /// resetting its usage counter and creation time.
    pub fn save(
        &self,
        name: &str,
        commands: Vec<BatchCommand>,
        delay_ms: u64,
        description: &str,
    ) -> Result<(), AppError> {
        if name.is_empty() {
            return Err(AppError::state("scene name cannot be empty"));
        }
        if commands.is_empty() {
            return Err(AppError::state("scene must have at least one command"));
        }

        self.scenes.write().insert(
            name.to_string(),
            CachedScene {
                name: name.to_string(),
                commands,
                delay_ms,
                description: description.to_string(),
                created_at: Utc::now(),
                usage_count: 0,
            },
        );
        Ok(())
    }

    /// Fetch a scene for recall, counting the use. This is the only
    /// entry point that touches the usage counter.
    pub fn get(&self, name: &str) -> Result<CachedScene, AppError> {
        let mut scenes = self.scenes.write();
        let scene = scenes.get_mut(name).ok_or_else(|| AppError::NotFound {
            what: format!("scene '{name}'"),
        })?;
        scene.usage_count += 1;
        Ok(scene.clone())
    }

    /// Snapshot of every scene, most used first. Does not count as usage.
    pub fn list(&self) -> Vec<CachedScene> {
        let scenes = self.scenes.read();
        let mut list: Vec<CachedScene> = scenes.values().cloned().collect();
        list.sort_by(|a, b| b.usage_count.cmp(&a.usage_count).then(a.name.cmp(&b.name)));
        list
    }

    pub fn delete(&self, name: &str) -> Result<(), AppError> {
        let mut scenes = self.scenes.write();
        if scenes.remove(name).is_none() {
            return Err(AppError::NotFound {
                what: format!("scene '{name}'"),
            });
        }
        Ok(())
    }

    /// Pretty-printed JSON of one scene, suitable for sharing or backup.
    /// Reads directly from the store; does not count as usage.
    pub fn export(&self, name: &str) -> Result<String, AppError> {
        let scenes = self.scenes.read();
        let scene = scenes.get(name).ok_or_else(|| AppError::NotFound {
            what: format!("scene '{name}'"),
        })?;
        Ok(serde_json::to_string_pretty(scene)?)
    }

    pub fn len(&self) -> usize {
        self.scenes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.read().is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::batch::BatchAction;

    fn one_command() -> Vec<BatchCommand> {
        vec![BatchCommand {
            action: BatchAction::LightOn,
            target_id: "l1".to_string(),
            value: String::new(),
            duration: 0,
        }]
    }

    #[test]
    fn rejects_empty_name_and_empty_commands() {
        let cache = SceneCache::new();
        assert!(cache.save("", one_command(), 100, "").is_err());
        assert!(cache.save("go", vec![], 100, "").is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn get_counts_usage_but_list_and_export_do_not() {
        let cache = SceneCache::new();
        cache.save("go", one_command(), 50, "test scene").unwrap();

        cache.get("go").unwrap();
        cache.get("go").unwrap();
        let _ = cache.list();
        let _ = cache.export("go").unwrap();

        let listed = cache.list();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].usage_count, 2);
        assert_eq!(listed[0].delay_ms, 50);
    }

    #[test]
    fn overwrite_resets_usage() {
        let cache = SceneCache::new();
        cache.save("go", one_command(), 50, "v1").unwrap();
        cache.get("go").unwrap();
        cache.save("go", one_command(), 75, "v2").unwrap();

        let listed = cache.list();
        assert_eq!(listed[0].usage_count, 0);
        assert_eq!(listed[0].delay_ms, 75);
        assert_eq!(listed[0].description, "v2");
    }

    #[test]
    fn list_sorts_by_usage_descending() {
        let cache = SceneCache::new();
        cache.save("rarely", one_command(), 0, "").unwrap();
        cache.save("often", one_command(), 0, "").unwrap();
        cache.get("often").unwrap();
        cache.get("often").unwrap();
        cache.get("rarely").unwrap();

        let listed = cache.list();
        let names: Vec<&str> = listed.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["often", "rarely"]);
    }

    #[test]
    fn delete_unknown_fails() {
        let cache = SceneCache::new();
        assert!(matches!(
            cache.delete("ghost"),
            Err(AppError::NotFound { .. })
        ));
        cache.save("real", one_command(), 0, "").unwrap();
        cache.delete("real").unwrap();
        assert!(cache.is_empty());
    }

    #[test]
    fn export_round_trips() {
        let cache = SceneCache::new();
        cache.save("go", one_command(), 25, "desc").unwrap();
        let json = cache.export("go").unwrap();
        let parsed: CachedScene = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.name, "go");
        assert_eq!(parsed.delay_ms, 25);
        assert_eq!(parsed.commands.len(), 1);
    }
}
