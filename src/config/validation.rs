use crate::config::types::{
    ClassifierConfig, Config, CrawlerConfig, RuleEntry, SignalKind, UserAgentConfig,
};
use crate::ConfigError;
use std::time::Duration;

/// Longest request timeout accepted, in seconds
const MAX_REQUEST_TIMEOUT_SECS: u64 = 300;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_classifier_config(&config.classifier)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if !config.delay_seconds.is_finite() || config.delay_seconds < 0.0 {
        return Err(ConfigError::Validation(format!(
            "delay_seconds must be a finite number >= 0, got {}",
            config.delay_seconds
        )));
    }

    if Duration::try_from_secs_f64(config.delay_seconds).is_err() {
        return Err(ConfigError::Validation(format!(
            "delay_seconds is too large, got {}",
            config.delay_seconds
        )));
    }

    if config.request_timeout_secs < 1 || config.request_timeout_secs > MAX_REQUEST_TIMEOUT_SECS {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be between 1 and {}, got {}",
            MAX_REQUEST_TIMEOUT_SECS, config.request_timeout_secs
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.value.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user agent cannot be empty".to_string(),
        ));
    }

    // Header values cannot carry control characters
    if config.value.chars().any(|c| c.is_control()) {
        return Err(ConfigError::Validation(
            "user agent cannot contain control characters".to_string(),
        ));
    }

    Ok(())
}

/// Validates the classifier rule table
fn validate_classifier_config(config: &ClassifierConfig) -> Result<(), ConfigError> {
    for entry in &config.rules {
        validate_rule_entry(entry)?;
    }
    Ok(())
}

fn validate_rule_entry(entry: &RuleEntry) -> Result<(), ConfigError> {
    // Builds the rule, which rejects marker-less path/host rules
    entry.to_rule()?;

    match entry.signal {
        SignalKind::Host => {
            for marker in &entry.markers {
                validate_host_marker(marker.trim())?;
            }
        }
        SignalKind::SpeakerLabels if entry.min_lines == Some(0) => {
            return Err(ConfigError::Validation(
                "speaker-labels rule needs min-lines >= 1".to_string(),
            ));
        }
        SignalKind::ShortQuotedPost if entry.max_chars == Some(0) => {
            return Err(ConfigError::Validation(
                "short-quoted-post rule needs max-chars >= 1".to_string(),
            ));
        }
        _ => {}
    }

    Ok(())
}

/// Validates a host marker (supports a leading `*.`)
fn validate_host_marker(marker: &str) -> Result<(), ConfigError> {
    let domain = marker.strip_prefix("*.").unwrap_or(marker);

    if domain.is_empty() {
        return Err(ConfigError::Validation(
            "Host marker cannot be empty".to_string(),
        ));
    }

    if !domain
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "Host marker '{}' contains invalid characters",
            domain
        )));
    }

    if domain.starts_with('.')
        || domain.ends_with('.')
        || domain.starts_with('-')
        || domain.ends_with('-')
    {
        return Err(ConfigError::Validation(format!(
            "Host marker '{}' cannot start or end with '.' or '-'",
            domain
        )));
    }

    if domain.contains("..") {
        return Err(ConfigError::Validation(format!(
            "Host marker '{}' cannot contain consecutive dots",
            domain
        )));
    }

    Ok(())
}
