//! Resolution of combine options from a settings file and the environment.

use std::env;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use gfcombine_core::config::{CombineOptions, MarkupType};

/// Environment variable that overrides the configured markup type.
pub const MARKUP_ENV: &str = "GFCOMBINE_MARKUP";

/// Read `CombineOptions` from a JSON file; missing keys keep their defaults.
pub fn load_options(path: &Path) -> Result<CombineOptions> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
}

/// Apply a raw `GFCOMBINE_MARKUP` value on top of `options`.
///
/// Blank values are ignored.
pub fn apply_markup_override(options: CombineOptions, raw: Option<&str>) -> Result<CombineOptions> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => {
            let markup_type: MarkupType = value
                .parse()
                .with_context(|| format!("invalid {MARKUP_ENV} value"))?;
            Ok(options.with_markup_type(markup_type))
        }
        None => Ok(options),
    }
}

/// Defaults, then the config file, then the environment.
pub fn resolve_options(config: Option<&Path>) -> Result<CombineOptions> {
    let options = match config {
        Some(path) => load_options(path)?,
        None => CombineOptions::default(),
    };
    apply_markup_override(options, env::var(MARKUP_ENV).ok().as_deref())
}
