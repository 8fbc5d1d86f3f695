// SPDX-FileCopyrightText: 2026 GP2GP Transfers Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for GP2GP transfer classification.
//!
//! Provides TOML parsing with strict validation (`deny_unknown_fields`), file
//! hierarchy lookup, `GP2GP_*` environment overrides, and miette diagnostics
//! with typo suggestions. The [`ProtocolConfig`] section is the wire-format
//! contract (interaction ids and well-known error codes) the engine is
//! parameterised by.
//!
//! # Usage
//!
//! ```no_run
//! use gp2gp_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("SLA threshold: {} days", config.engine.sla_threshold_days);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::Path;

pub use diagnostic::{render_errors, ConfigError};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{EngineConfig, Gp2gpConfig, LoggingConfig, ProtocolConfig};

/// Load from the file hierarchy plus environment, then validate.
pub fn load_and_validate() -> Result<Gp2gpConfig, Vec<ConfigError>> {
    finish(loader::load_config(), collect_toml_sources)
}

/// Load from an explicit file plus environment, then validate.
pub fn load_and_validate_path(path: &Path) -> Result<Gp2gpConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_path(path), || {
        read_source(path).into_iter().collect()
    })
}

/// Load from an inline TOML string, then validate.
pub fn load_and_validate_str(toml_content: &str) -> Result<Gp2gpConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_str(toml_content), || {
        vec![("<inline>".to_string(), toml_content.to_string())]
    })
}

fn finish(
    loaded: Result<Gp2gpConfig, figment::Error>,
    sources: impl FnOnce() -> Vec<(String, String)>,
) -> Result<Gp2gpConfig, Vec<ConfigError>> {
    match loaded {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err, &sources())),
    }
}

/// Contents of every config file in the hierarchy that exists, for source spans.
fn collect_toml_sources() -> Vec<(String, String)> {
    let local = std::env::current_dir()
        .map(|d| d.join(loader::LOCAL_CONFIG))
        .unwrap_or_else(|_| loader::LOCAL_CONFIG.into());

    [
        Some(local),
        loader::user_config_path(),
        Some(loader::SYSTEM_CONFIG.into()),
    ]
    .into_iter()
    .flatten()
    .filter_map(|path| read_source(&path))
    .collect()
}

fn read_source(path: &Path) -> Option<(String, String)> {
    std::fs::read_to_string(path)
        .ok()
        .map(|content| (path.display().to_string(), content))
}
