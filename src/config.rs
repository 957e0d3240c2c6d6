// file: src/config.rs
// description: application configuration management with toml and environment support
// reference: https://docs.rs/config

use crate::error::{PortalError, Result};
use crate::utils::Validator;
use chrono::NaiveTime;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub backend: BackendConfig,
    pub scheduling: SchedulingConfig,
    pub session: SessionConfig,
    pub offline: OfflineConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    pub url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SchedulingConfig {
    pub max_per_day: usize,
    pub day_start: NaiveTime,
    pub day_end: NaiveTime,
    pub step_minutes: u32,
    pub allow_weekends: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OfflineConfig {
    pub enabled: bool,
    pub admin_email: String,
    pub admin_password: String,
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let defaults = config::Config::try_from(&Self::default_config())
            .map_err(|e| PortalError::Config(e.to_string()))?;

        let mut builder = config::Config::builder().add_source(defaults);

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder
                .add_source(config::File::from(Path::new(DEFAULT_CONFIG_PATH)).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("UNIVAL")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| PortalError::Config(e.to_string()))?;

        let mut config: Config = settings
            .try_deserialize()
            .map_err(|e| PortalError::Config(e.to_string()))?;

        config.apply_supabase_env();
        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            backend: BackendConfig {
                url: "http://localhost:54321".to_string(),
                api_key: None,
                timeout_secs: 10,
            },
            scheduling: SchedulingConfig {
                max_per_day: 2,
                day_start: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or_default(),
                day_end: NaiveTime::from_hms_opt(17, 55, 0).unwrap_or_default(),
                step_minutes: 5,
                allow_weekends: false,
            },
            session: SessionConfig {
                path: PathBuf::from(".unival/session.json"),
            },
            offline: OfflineConfig {
                enabled: true,
                admin_email: "admin".to_string(),
                admin_password: "admin123$".to_string(),
            },
        }
    }

    /// The hosted backend documents `SUPABASE_URL` / `SUPABASE_KEY`; they win
    /// over file and `UNIVAL__` values.
    fn apply_supabase_env(&mut self) {
        if let Ok(url) = std::env::var("SUPABASE_URL") {
            if !url.trim().is_empty() {
                self.backend.url = url.trim().to_string();
            }
        }
        if let Ok(key) = std::env::var("SUPABASE_KEY") {
            if !key.trim().is_empty() {
                self.backend.api_key = Some(key.trim().to_string());
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        Validator::validate_url(&self.backend.url)
            .map_err(|e| PortalError::Config(e.to_string()))?;

        if self.backend.timeout_secs == 0 {
            return Err(PortalError::Config(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.scheduling.max_per_day == 0 {
            return Err(PortalError::Config(
                "max_per_day must be greater than 0".to_string(),
            ));
        }

        if self.scheduling.step_minutes == 0 || 60 % self.scheduling.step_minutes != 0 {
            return Err(PortalError::Config(
                "step_minutes must divide an hour".to_string(),
            ));
        }

        if self.scheduling.day_start >= self.scheduling.day_end {
            return Err(PortalError::Config(
                "day_start must be before day_end".to_string(),
            ));
        }

        Ok(())
    }

    pub fn has_credentials(&self) -> bool {
        self.backend
            .api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }
}
