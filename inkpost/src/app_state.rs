use std::sync::Arc;

use inkpost_core::moderation::Denylist;
use tracing::info;

use crate::bootstrap::ensure_admin;
use crate::settings::config::Settings;
use crate::stop_flag;
use crate::store::Store;

#[derive(Debug, Clone)]
pub struct AppState {
    pub settings: Settings,
    pub stop_flag: stop_flag::StopFlag,
    pub store: Store,
    pub denylist: Denylist,
}

pub type SharedAppState = Arc<AppState>;

impl AppState {
    /// State of the running server, stopped by SIGINT/SIGTERM
    pub async fn new(settings: Settings) -> anyhow::Result<SharedAppState> {
        let state = Self::with_settings(settings).await?;
        stop_flag::register_signal_handler(&state.stop_flag);
        Ok(state)
    }

    /// State for a given configuration, with the bootstrap admin in place
    pub async fn with_settings(settings: Settings) -> anyhow::Result<SharedAppState> {
        let denylist = settings.moderation.build_denylist();
        info!("Loaded denylist with {} word(s)", denylist.len());

        let store = Store::new();
        ensure_admin(&store, &settings).await?;

        Ok(Arc::new(AppState {
            settings,
            stop_flag: stop_flag::StopFlag::new(),
            store,
            denylist,
        }))
    }

    pub async fn new_for_config_only() -> anyhow::Result<SharedAppState> {
        let settings = Settings::new()?;
        let denylist = settings.moderation.build_denylist();

        Ok(Arc::new(AppState {
            settings,
            stop_flag: stop_flag::StopFlag::new(),
            store: Store::new(),
            denylist,
        }))
    }
}
