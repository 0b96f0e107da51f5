//! Shared application state: one bridge client and the four long-lived
//! actors built around it. Every registry has its own lock; no lock is
//! held across a network call.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::bridge::BridgeClient;
use crate::cache::SceneCache;
use crate::error::AppError;
use crate::events::EventConsumer;
use crate::scheduler::Scheduler;
use crate::settings::AppSettings;
use crate::streamer::StreamerRegistry;

pub struct AppState {
    pub settings: AppSettings,
    pub bridge: Arc<BridgeClient>,
    pub scheduler: Scheduler,
    pub scene_cache: SceneCache,
    pub events: EventConsumer,
    pub streamers: StreamerRegistry,
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(settings: AppSettings) -> Result<Self, AppError> {
        let key = settings
            .application_key
            .as_deref()
            .ok_or_else(|| AppError::input("application key is required (HUE_APPLICATION_KEY)"))?;
        let bridge = Arc::new(BridgeClient::new(settings.bridge_ip.clone(), key)?);
        let shutdown = CancellationToken::new();

        Ok(Self {
            scheduler: Scheduler::new(Arc::clone(&bridge), shutdown.clone()),
            scene_cache: SceneCache::new(),
            events: EventConsumer::new(Arc::clone(&bridge), shutdown.clone()),
            streamers: StreamerRegistry::new(Arc::clone(&bridge), shutdown.clone()),
            bridge,
            settings,
            shutdown,
        })
    }

    /// Orderly shutdown: cancel everything, then stop entertainment
    /// sessions so the bridge leaves streaming mode.
    pub async fn shutdown(&self) {
        info!("shutting down");
        self.events.stop();
        self.scheduler.shutdown();
        self.streamers.stop_all().await;
        self.shutdown.cancel();
    }
}
