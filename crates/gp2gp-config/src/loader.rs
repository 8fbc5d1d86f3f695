// SPDX-FileCopyrightText: 2026 GP2GP Transfers Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Figment-based layered loading.
//!
//! Lookup order: `./gp2gp.toml` > `~/.config/gp2gp/gp2gp.toml` > `/etc/gp2gp/gp2gp.toml`,
//! with `GP2GP_*` environment variables on top.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::Gp2gpConfig;

pub(crate) const LOCAL_CONFIG: &str = "gp2gp.toml";
pub(crate) const SYSTEM_CONFIG: &str = "/etc/gp2gp/gp2gp.toml";

pub(crate) fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("gp2gp").join(LOCAL_CONFIG))
}

/// Load configuration from the standard hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/gp2gp/gp2gp.toml`
/// 3. `~/.config/gp2gp/gp2gp.toml`
/// 4. `./gp2gp.toml`
/// 5. `GP2GP_*` environment variables
pub fn load_config() -> Result<Gp2gpConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no file lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<Gp2gpConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(Gp2gpConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from one explicit file, with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<Gp2gpConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(Gp2gpConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// The full hierarchy before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Gp2gpConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG))
        .merge(env_provider())
}

/// `GP2GP_ENGINE_CUTOFF_HOURS` must land on `engine.cutoff_hours`, not
/// `engine.cutoff.hours`, so sections are mapped explicitly instead of
/// splitting on underscores. Keys arrive here still upper-cased.
fn env_provider() -> Env {
    Env::prefixed("GP2GP_").map(|key| {
        key.as_str()
            .to_ascii_lowercase()
            .replacen("engine_", "engine.", 1)
            .replacen("protocol_", "protocol.", 1)
            .replacen("logging_", "logging.", 1)
            .into()
    })
}
