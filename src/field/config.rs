//! Engine configuration.
//!
//! [`FieldConfig`] controls how the distance and potential engines walk the
//! grid and how cube division behaves. It can be built in code or loaded from
//! TOML, where every key is optional:
//!
//! ```toml
//! chunk_size = 32768
//! division = "legacy-multiply"
//! ```

use super::error::Error;
use serde::Deserialize;

/// How [`Cube::try_div`](super::Cube::try_div) combines its operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DivisionMode {
    /// True elementwise division.
    #[default]
    Elementwise,

    /// Multiplies instead of dividing.
    ///
    /// Matches cube files derived with older charge-analysis tools whose
    /// division operator multiplied.
    LegacyMultiply,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldConfig {
    /// Voxels evaluated per block by the distance and potential engines.
    ///
    /// Peak scratch memory is `chunk_size × atom_count` distances.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    #[serde(default)]
    pub division: DivisionMode,
}

fn default_chunk_size() -> usize {
    65_536
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            division: DivisionMode::default(),
        }
    }
}

impl FieldConfig {
    pub fn from_toml(text: &str) -> Result<Self, Error> {
        let config: FieldConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.chunk_size == 0 {
            return Err(Error::InvalidConfig("chunk_size must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = FieldConfig::default();
        assert_eq!(config.chunk_size, 65_536);
        assert_eq!(config.division, DivisionMode::Elementwise);
    }

    #[test]
    fn empty_toml_gives_defaults() {
        let config = FieldConfig::from_toml("").unwrap();
        assert_eq!(config, FieldConfig::default());
    }

    #[test]
    fn toml_overrides_fields() {
        let config =
            FieldConfig::from_toml("chunk_size = 128\ndivision = \"legacy-multiply\"\n").unwrap();
        assert_eq!(config.chunk_size, 128);
        assert_eq!(config.division, DivisionMode::LegacyMultiply);
    }

    #[test]
    fn zero_chunk_size_is_rejected() {
        let err = FieldConfig::from_toml("chunk_size = 0").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn unknown_key_is_a_parse_error() {
        let err = FieldConfig::from_toml("chunk = 3").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
