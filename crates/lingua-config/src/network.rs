use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::env_or;

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_adapter_timeout_secs() -> u64 {
    45
}

/// Timeouts for every call that leaves the process
#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct NetworkConfig {
    /// HTTP client timeout for remote providers
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Upper bound on a single resolution step
    #[serde(default = "default_adapter_timeout_secs")]
    pub adapter_timeout_secs: u64,
}

impl NetworkConfig {
    pub fn new() -> Self {
        Self {
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECONDS", default_request_timeout_secs()),
            adapter_timeout_secs: env_or("ADAPTER_TIMEOUT_SECONDS", default_adapter_timeout_secs()),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn adapter_timeout(&self) -> Duration {
        Duration::from_secs(self.adapter_timeout_secs)
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout_secs(),
            adapter_timeout_secs: default_adapter_timeout_secs(),
        }
    }
}
