use std::{fs, path::Path};

use serde::Deserialize;
use thiserror::Error;

use crate::{
    enums::SortBy,
    metadata::UnknownAttribute,
    split_rules::{SplitRule, SplitRuleConfig},
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid split rule `{rule}`: {source}")]
    SplitRule {
        rule: String,
        #[source]
        source: UnknownAttribute,
    },
}

/// Tunables of the display set pipeline.
///
/// Every field has a default, so a configuration file only needs to name
/// what it changes:
///
/// ```
/// # use dicom_display_sets::config::DisplaySetConfig;
/// let config = DisplaySetConfig::from_toml_str(
///     r#"
///     spacing_tolerance = 0.05
///
///     [[split_rules]]
///     id = "by-echo"
///     attributes = ["SeriesInstanceUID", "SeriesNumber"]
///     "#,
/// )
/// .expect("should have parsed configuration");
/// assert_eq!(config.split_rules().unwrap().len(), 1);
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplaySetConfig {
    pub reconstructable_modalities: Vec<String>,
    pub single_image_modalities: Vec<String>,
    pub orientation_tolerance: f64,
    /// Fraction of the average slice spacing a single spacing may deviate.
    pub spacing_tolerance: f64,
    pub position_tolerance: f64,
    pub sort_by: SortBy,
    pub split_rules: Vec<SplitRuleConfig>,
}

impl Default for DisplaySetConfig {
    fn default() -> Self {
        Self {
            reconstructable_modalities: ["MR", "CT", "PT", "NM"].map(String::from).to_vec(),
            single_image_modalities: ["CR", "MG", "DX"].map(String::from).to_vec(),
            orientation_tolerance: 0.01,
            spacing_tolerance: 0.1,
            position_tolerance: 0.01,
            sort_by: SortBy::default(),
            split_rules: Vec::new(),
        }
    }
}

impl DisplaySetConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_str(&fs::read_to_string(path.as_ref())?)
    }

    pub fn is_reconstructable_modality(&self, modality: Option<&str>) -> bool {
        modality.is_some_and(|modality| {
            self.reconstructable_modalities
                .iter()
                .any(|allowed| allowed == modality)
        })
    }

    /// Split rules built from the configured entries, or the stock rules
    /// when none are configured.
    pub fn split_rules(&self) -> Result<Vec<SplitRule>, ConfigError> {
        if self.split_rules.is_empty() {
            return Ok(SplitRule::default_rules(&self.single_image_modalities));
        }

        self.split_rules
            .iter()
            .map(|rule| {
                SplitRule::try_from(rule).map_err(|source| ConfigError::SplitRule {
                    rule: rule.id.clone(),
                    source,
                })
            })
            .collect()
    }
}
