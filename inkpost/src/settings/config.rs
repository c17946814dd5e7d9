use config::{Config, ConfigError, Environment, File};
use inkpost_core::settings::{
    api_server::ApiServer, bootstrap::BootstrapSettings, moderation::ModerationSettings,
    pagination::PaginationSettings,
};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
#[allow(unused)]
pub struct Settings {
    #[serde(default)]
    pub debug: bool,
    /// Comma separated list, `traces` enables OpenTelemetry export
    pub telemetry: Option<String>,
    #[serde(default)]
    pub api: ApiServer,
    #[serde(default)]
    pub pagination: PaginationSettings,
    #[serde(default)]
    pub moderation: ModerationSettings,
    #[serde(default)]
    pub bootstrap: BootstrapSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            debug: false,
            telemetry: None,
            api: ApiServer::default(),
            pagination: PaginationSettings::default(),
            moderation: ModerationSettings::default(),
            bootstrap: BootstrapSettings::default(),
        }
    }
}

impl Settings {
    pub fn get_environment() -> Environment {
        Environment::default()
            .prefix("INKPOST")
            .prefix_separator("__")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("moderation.denylist")
            .try_parsing(true)
    }

    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = env::var("INKPOST_RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            .set_default("api.bind_address", "0.0.0.0:8000")?
            .set_default("api.body_limit", "1M")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(Self::get_environment());

        let mut settings: Settings = builder.build()?.try_deserialize()?;

        // Special strings let the environment switch off telemetry that a
        // config file enabled.
        settings.telemetry = Self::check_if_optional(&settings.telemetry);
        Ok(settings)
    }

    fn check_if_optional(s: &Option<String>) -> Option<String> {
        match s {
            None => None,
            Some(s) => match s.to_lowercase().as_str() {
                "" | "no" | "none" | "false" | "0" => None,
                _ => Some(s.to_string()),
            },
        }
    }

    pub fn traces_enabled(&self) -> bool {
        self.telemetry
            .as_ref()
            .map(|settings| settings.to_lowercase().split(',').any(|s| s.trim() == "traces"))
            .unwrap_or(false)
    }
}
