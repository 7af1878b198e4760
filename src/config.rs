//! Type-safe settings for the command-line front end, loaded with the
//! `config` crate and then overridden by environment variables.
//!
//! The library core never reads these itself: the CLI turns them into a
//! `ProviderSources` and `ExportOptions` and hands those down.

use crate::errors::RegistryError;
use crate::exporter::ExportOptions;
use crate::loader::ProviderSources;
use crate::model::Provider;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};

/// Settings read from `Registry.toml` (if present).
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Settings {
    /// Root of the conventional `<data_dir>/<provider-slug>/nodes.json` layout
    pub data_dir: PathBuf,

    /// Per-provider file overrides, keyed by provider (`aws`, `alibaba_cloud`, ...)
    #[serde(default)]
    pub sources: BTreeMap<String, PathBuf>,

    /// Separator used inside the "Service Types" export column
    pub service_type_delimiter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            data_dir: PathBuf::from("data"),
            sources: BTreeMap::new(),
            service_type_delimiter: ",".to_string(),
        }
    }
}

fn with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("data_dir", "data")?
        .set_default("service_type_delimiter", ",")
}

impl Settings {
    /// Load settings from `Registry.toml` (if present),
    /// then apply any overrides from these environment variables:
    ///
    /// - `REGISTRY__DATA_DIR`
    /// - `REGISTRY__SERVICE_TYPE_DELIMITER`
    pub fn new() -> Result<Self, ConfigError> {
        let cfg = with_defaults()?
            .add_source(File::with_name("Registry").required(false))
            .build()?;

        let mut settings: Settings = cfg.try_deserialize()?;

        if let Ok(val) = env::var("REGISTRY__DATA_DIR") {
            settings.data_dir = PathBuf::from(val);
        }
        if let Ok(val) = env::var("REGISTRY__SERVICE_TYPE_DELIMITER") {
            settings.service_type_delimiter = val;
        }

        Ok(settings)
    }

    /// Load settings from an explicit file, without environment overrides
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        with_defaults()?
            .add_source(File::from(path))
            .build()?
            .try_deserialize()
    }

    /// Conventional layout under `data_dir`, with `sources` overrides applied
    pub fn provider_sources(&self) -> Result<ProviderSources, RegistryError> {
        let mut sources = ProviderSources::from_data_dir(&self.data_dir);
        for (key, path) in &self.sources {
            let provider: Provider = key.parse()?;
            sources.insert(provider, path.clone());
        }
        Ok(sources)
    }

    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            service_type_delimiter: self.service_type_delimiter.clone(),
        }
    }
}
