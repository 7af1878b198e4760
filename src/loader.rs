// 📂 Loader - provider file → ProviderDataset
//
// Every call reads the file again; there is no cache. File-level problems
// (missing, unreadable, not JSON) only cost that one provider. A malformed node
// inside a readable file fails the provider and reaches the caller.

use crate::errors::{RegistryError, Result};
use crate::model::{Provider, ProviderDataset, Registry};
use serde_json::Value;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// File name inside each provider directory of the conventional layout
pub const NODES_FILE: &str = "nodes.json";

// ============================================================================
// PROVIDER SOURCES
// ============================================================================

/// Where each provider's dataset file lives.
///
/// The loader only ever asks this mapping; it has no idea how directories are
/// laid out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderSources {
    paths: BTreeMap<Provider, PathBuf>,
}

impl ProviderSources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every provider at `<data_dir>/<slug>/nodes.json`
    pub fn from_data_dir(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref();
        let paths = Provider::ALL
            .iter()
            .map(|p| (*p, data_dir.join(p.slug()).join(NODES_FILE)))
            .collect();
        ProviderSources { paths }
    }

    /// Builder pattern: register (or replace) one provider's file
    pub fn with_source(mut self, provider: Provider, path: impl Into<PathBuf>) -> Self {
        self.insert(provider, path);
        self
    }

    pub fn insert(&mut self, provider: Provider, path: impl Into<PathBuf>) -> Option<PathBuf> {
        self.paths.insert(provider, path.into())
    }

    pub fn path_for(&self, provider: Provider) -> Option<&Path> {
        self.paths.get(&provider).map(PathBuf::as_path)
    }

    /// Configured providers in provider order
    pub fn providers(&self) -> impl Iterator<Item = Provider> + '_ {
        self.paths.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

// ============================================================================
// DATA LOADER
// ============================================================================

#[derive(Debug, Clone)]
pub struct DataLoader {
    sources: ProviderSources,
}

impl DataLoader {
    pub fn new(sources: ProviderSources) -> Self {
        DataLoader { sources }
    }

    pub fn sources(&self) -> &ProviderSources {
        &self.sources
    }

    /// Load one provider, surfacing every failure.
    pub fn try_load(&self, provider: Provider) -> Result<ProviderDataset> {
        let path = self
            .sources
            .path_for(provider)
            .ok_or(RegistryError::NoSource(provider))?;

        let contents = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                RegistryError::FileMissing {
                    provider,
                    path: path.to_path_buf(),
                }
            } else {
                RegistryError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        let value: Value =
            serde_json::from_str(&contents).map_err(|source| RegistryError::Parse {
                provider,
                path: path.to_path_buf(),
                source,
            })?;

        let dataset = ProviderDataset::from_json_value(value, provider)?;

        info!(
            provider = %provider,
            nodes = dataset.nodes.len(),
            version = %dataset.version,
            path = %path.display(),
            "Loaded provider dataset"
        );

        Ok(dataset)
    }

    /// Load one provider.
    ///
    /// `Ok(None)` when the file is missing, unreadable or not JSON (logged).
    /// `Err(SchemaViolation)` when the file is readable but a node is malformed.
    pub fn load(&self, provider: Provider) -> Result<Option<ProviderDataset>> {
        match self.try_load(provider) {
            Ok(dataset) => Ok(Some(dataset)),
            Err(RegistryError::NoSource(_)) => {
                debug!(provider = %provider, "No data source configured, skipping");
                Ok(None)
            }
            Err(err) if err.is_recoverable() => {
                warn!(provider = %provider, error = %err, "Failed to load provider dataset");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Load every provider that has a readable file, in provider order.
    pub fn load_all(&self) -> Result<Registry> {
        let mut registry = Registry::new();

        for provider in Provider::ALL {
            if let Some(dataset) = self.load(provider)? {
                registry.insert(provider, dataset);
            }
        }

        debug!(
            loaded = registry.len(),
            configured = self.sources.len(),
            "Finished loading providers"
        );

        Ok(registry)
    }
}

// ============================================================================
// TESTS
// ============================================================================
