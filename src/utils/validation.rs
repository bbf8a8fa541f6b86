use crate::utils::error::{FacadeError, Result};
use regex::Regex;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(FacadeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(FacadeError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(FacadeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(FacadeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_pattern(field_name: &str, pattern: &str) -> Result<()> {
    validate_non_empty_string(field_name, pattern)?;

    Regex::new(pattern).map_err(|e| FacadeError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: pattern.to_string(),
        reason: format!("Invalid regular expression: {}", e),
    })?;
    Ok(())
}

pub fn validate_header_name(field_name: &str, name: &str) -> Result<()> {
    reqwest::header::HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
        FacadeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: name.to_string(),
            reason: format!("Invalid header name: {}", e),
        }
    })?;
    Ok(())
}
