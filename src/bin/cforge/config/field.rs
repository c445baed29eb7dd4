use std::fs;

use anyhow::{Context, Result};
use cube_forge::{DivisionMode, FieldConfig};

use crate::cli::EngineOptions;

/// Starts from the TOML file (if any) and lets command-line flags override it.
pub fn build_field_config(opts: &EngineOptions) -> Result<FieldConfig> {
    let mut config = match &opts.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            FieldConfig::from_toml(&text)
                .with_context(|| format!("Invalid config file: {}", path.display()))?
        }
        None => FieldConfig::default(),
    };

    if let Some(chunk_size) = opts.chunk_size {
        config.chunk_size = chunk_size;
    }
    if opts.legacy_division {
        config.division = DivisionMode::LegacyMultiply;
    }

    config
        .validate()
        .context("Invalid engine options on the command line")?;
    Ok(config)
}

pub fn describe_field_config(config: &FieldConfig) -> String {
    let division = match config.division {
        DivisionMode::Elementwise => "true division",
        DivisionMode::LegacyMultiply => "legacy multiply",
    };
    format!("{} voxels per block, {}", config.chunk_size, division)
}
