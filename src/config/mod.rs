#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:8000/";
pub const DEFAULT_DRIVER_PATTERN: &str = "driver";

/// Where the modeling server lives and how to talk to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacadeConfig {
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Component types matching this regex are offered to client-side
    /// driver handlers before going to the server.
    #[serde(default = "default_driver_pattern")]
    pub driver_pattern: String,

    /// Sent with every request, e.g. a session cookie.
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

fn default_server_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}

fn default_driver_pattern() -> String {
    DEFAULT_DRIVER_PATTERN.to_string()
}

impl Default for FacadeConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            driver_pattern: default_driver_pattern(),
            headers: HashMap::new(),
        }
    }
}

impl FacadeConfig {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            ..Self::default()
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

impl ConfigProvider for FacadeConfig {
    fn server_url(&self) -> &str {
        &self.server_url
    }

    fn driver_pattern(&self) -> &str {
        &self.driver_pattern
    }

    fn default_headers(&self) -> &HashMap<String, String> {
        &self.headers
    }
}

impl Validate for FacadeConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("server_url", &self.server_url)?;
        validation::validate_pattern("driver_pattern", &self.driver_pattern)?;
        for name in self.headers.keys() {
            validation::validate_header_name("headers", name)?;
        }
        Ok(())
    }
}
