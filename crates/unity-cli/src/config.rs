//! CLI configuration: a JSON file plus command-line overrides.
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ArgMatches;
use serde::{Deserialize, Serialize};

use unity_core::io::{extend_unit_table, load_unit_table};
use unity_core::{Converter, NumberFormat, UnitTable};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct UnityConfig {
    pub version: String,
    /// Unit table file (.json, .csv or .tsv). The built-in table is used when unset.
    pub unit_table: Option<PathBuf>,
    /// Whether `unit_table` adds to the built-in units instead of replacing them.
    pub extend_builtin: bool,
    /// Number format override such as `.3f` or `.2E`, applied to every element.
    pub number_format: Option<String>,
}

impl Default for UnityConfig {
    fn default() -> Self {
        UnityConfig {
            version: clap::crate_version!().to_string(),
            unit_table: None,
            extend_builtin: true,
            number_format: None,
        }
    }
}

/// Load a configuration from a JSON file. Missing fields take their defaults.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<UnityConfig> {
    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config: {}", path.as_ref().display()))?;
    let config: UnityConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.as_ref().display()))?;
    Ok(config)
}

impl UnityConfig {
    /// Build the effective configuration from `--config`, `--units` and `--number-format`.
    pub fn from_arguments(matches: &ArgMatches) -> Result<Self> {
        let mut config = match matches.get_one::<PathBuf>("config") {
            Some(path) => {
                log::debug!("Using config: {}", path.display());
                load_config(path)?
            }
            None => UnityConfig::default(),
        };

        if let Some(units) = matches.get_one::<PathBuf>("units") {
            config.unit_table = Some(units.clone());
        }
        if matches.get_flag("replace_builtin") {
            config.extend_builtin = false;
        }
        if let Ok(Some(number_format)) = matches.try_get_one::<String>("number_format") {
            config.number_format = Some(number_format.clone());
        }
        Ok(config)
    }

    pub fn unit_table(&self) -> Result<UnitTable> {
        match &self.unit_table {
            Some(path) if self.extend_builtin => extend_unit_table(UnitTable::si(), path),
            Some(path) => load_unit_table(path),
            None => Ok(UnitTable::si()),
        }
    }

    pub fn converter(&self) -> Result<Converter> {
        Ok(Converter::new(self.unit_table()?))
    }

    pub fn number_format(&self) -> Result<Option<NumberFormat>> {
        match self.number_format.as_deref() {
            Some(spec) if !spec.trim().is_empty() => {
                let parsed = spec
                    .parse::<NumberFormat>()
                    .with_context(|| format!("Invalid number_format in configuration: '{}'", spec))?;
                Ok(Some(parsed))
            }
            _ => Ok(None),
        }
    }
}
