use std::{fs, path::Path};

use anyhow::{Context, Result};
use safety_grid_core::EnvConfig;

use crate::Args;

/// Reads an `EnvConfig` from a TOML file. Missing keys keep their defaults.
pub fn load_file(path: &Path) -> Result<EnvConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("invalid config file {}", path.display()))
}

/// Applies command-line overrides on top of `base`.
pub fn merge(mut base: EnvConfig, args: &Args) -> EnvConfig {
    if let Some(scenario) = args.scenario {
        base.scenario = scenario;
    }
    if let Some(level) = args.level {
        base.level = level;
    }
    if let Some(variant) = args.variant {
        base.variant = variant;
    }
    if args.seed.is_some() {
        base.seed = args.seed;
    }
    base
}

/// The effective configuration: file (if any), then flags.
pub fn resolve(args: &Args) -> Result<EnvConfig> {
    let base = match &args.config {
        Some(path) => load_file(path)?,
        None => EnvConfig::default(),
    };
    Ok(merge(base, args))
}
