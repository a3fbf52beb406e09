use crate::utils::error::{DashboardError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Returns true when the locator is an absolute `http`/`https` URL.
pub fn is_http_locator(locator: &str) -> bool {
    matches!(
        Url::parse(locator).map(|url| url.scheme().to_string()).as_deref(),
        Ok("http") | Ok("https")
    )
}

/// A source locator is either an `http(s)` URL or a filesystem path.
/// Other URL schemes are rejected so `ftp://...` is not mistaken for a path.
pub fn validate_locator(field_name: &str, locator: &str) -> Result<()> {
    validate_non_empty_string(field_name, locator)?;

    if is_http_locator(locator) {
        return Ok(());
    }

    match Url::parse(locator) {
        // single letter schemes are windows drive prefixes
        Ok(url) if url.scheme() == "file" => match url.to_file_path() {
            Ok(path) => validate_path(field_name, &path.to_string_lossy()),
            Err(()) => Err(DashboardError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: locator.to_string(),
                reason: "File URL does not name a local path".to_string(),
            }),
        },
        Ok(url) if url.scheme().len() > 1 => Err(DashboardError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: locator.to_string(),
            reason: format!("Unsupported URL scheme: {}", url.scheme()),
        }),
        _ => validate_path(field_name, locator),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(DashboardError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(DashboardError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(DashboardError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(DashboardError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(DashboardError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}
