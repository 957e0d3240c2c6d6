// file: src/backend/mod.rs
// description: storage port and its REST and in-memory adapters
// reference: internal module structure

pub mod memory;
pub mod query;
pub mod rest;
pub mod store;

pub use memory::{MemoryStore, OFFLINE_ADMIN_ID};
pub use query::{Filter, TableQuery};
pub use rest::RestStore;
pub use store::{CourseFilter, EvaluationFilter, PortalStore, ScheduleFilter};

use crate::config::Config;
use crate::error::{PortalError, Result};
use std::sync::Arc;
use tracing::{info, warn};

/// Picks the adapter for this process. Without an API key the sample data
/// set is used when offline mode is enabled.
pub fn open(config: &Config, force_offline: bool) -> Result<Arc<dyn PortalStore>> {
    if force_offline {
        if !config.offline.enabled {
            return Err(PortalError::Config(
                "offline mode is disabled in configuration".to_string(),
            ));
        }
        info!("Using offline sample data");
        return Ok(Arc::new(MemoryStore::sample()));
    }

    if !config.has_credentials() && config.offline.enabled {
        warn!("No backend API key configured, falling back to offline sample data");
        return Ok(Arc::new(MemoryStore::sample()));
    }

    info!("Connecting to backend at {}", config.backend.url);
    Ok(Arc::new(RestStore::new(&config.backend)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_without_key_falls_back() {
        let config = Config::default_config();
        assert!(open(&config, false).is_ok());
    }

    #[test]
    fn test_open_without_key_and_offline_disabled() {
        let mut config = Config::default_config();
        config.offline.enabled = false;
        assert!(matches!(open(&config, false), Err(PortalError::Config(_))));
        assert!(open(&config, true).is_err());
    }
}
