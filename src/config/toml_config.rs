use crate::config::FacadeConfig;
use crate::utils::error::{FacadeError, Result};
use regex::Regex;
use std::path::Path;

impl FacadeConfig {
    /// Loads a config file, expanding `${VAR}` references first.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(FacadeError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parses TOML config text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| FacadeError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }
}

/// Expands `${VAR}` from the environment. Unset variables are left as written.
fn substitute_env_vars(content: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([^}]+)\}")?;

    let result = re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    });

    Ok(result.to_string())
}
