// SPDX-FileCopyrightText: 2026 GP2GP Transfers Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Semantic checks serde attributes cannot express.

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::model::Gp2gpConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration.
///
/// Collects every problem rather than stopping at the first one.
pub fn validate_config(config: &Gp2gpConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let protocol = &config.protocol;

    if config.engine.sla_threshold_days == 0 {
        errors.push(ConfigError::Validation {
            message: "engine.sla_threshold_days must be at least 1".to_string(),
        });
    }

    if config.engine.cutoff_hours == Some(0) {
        errors.push(ConfigError::Validation {
            message: "engine.cutoff_hours must be positive when set".to_string(),
        });
    }

    let interactions = [
        ("protocol.request_started", &protocol.request_started),
        ("protocol.request_completed", &protocol.request_completed),
        ("protocol.acknowledgment", &protocol.acknowledgment),
        ("protocol.large_payload_fragment", &protocol.large_payload_fragment),
    ];
    let mut seen = HashSet::new();
    for (key, value) in interactions {
        if value.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("{key} must not be empty"),
            });
        } else if !seen.insert(value.as_str()) {
            errors.push(ConfigError::Validation {
                message: format!("{key} `{value}` duplicates another interaction id"),
            });
        }
    }

    if protocol.suppressed_error_code == protocol.duplicate_error_code {
        errors.push(ConfigError::Validation {
            message: format!(
                "protocol.suppressed_error_code and protocol.duplicate_error_code must differ, both are {}",
                protocol.suppressed_error_code
            ),
        });
    }

    for code in [protocol.suppressed_error_code, protocol.duplicate_error_code] {
        if protocol.fatal_sender_error_codes.contains(&code) {
            errors.push(ConfigError::Validation {
                message: format!("protocol.fatal_sender_error_codes must not contain {code}"),
            });
        }
    }

    if !LOG_LEVELS.contains(&config.logging.level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "logging.level `{}` is not one of {}",
                config.logging.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_message(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&Gp2gpConfig::default()).is_ok());
    }

    #[test]
    fn zero_threshold_fails_validation() {
        let mut config = Gp2gpConfig::default();
        config.engine.sla_threshold_days = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "sla_threshold_days"));
    }

    #[test]
    fn duplicate_interaction_ids_fail_validation() {
        let mut config = Gp2gpConfig::default();
        config.protocol.large_payload_fragment = config.protocol.request_completed.clone();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "large_payload_fragment"));
    }

    #[test]
    fn fatal_list_containing_suppressed_fails() {
        let mut config = Gp2gpConfig::default();
        config.protocol.fatal_sender_error_codes.push(15);
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "must not contain 15"));
    }

    #[test]
    fn partial_toml_fills_defaults_and_validates() {
        let toml_str = r#"
[engine]
cutoff_hours = 336
"#;
        let config: Gp2gpConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.engine.sla_threshold_days, 8);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn zero_cutoff_from_toml_fails_validation() {
        let toml_str = r#"
[engine]
cutoff_hours = 0
"#;
        let config: Gp2gpConfig = toml::from_str(toml_str).unwrap();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "cutoff_hours"));
    }

    #[test]
    fn collects_all_errors() {
        let mut config = Gp2gpConfig::default();
        config.engine.sla_threshold_days = 0;
        config.engine.cutoff_hours = Some(0);
        config.logging.level = "loud".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
