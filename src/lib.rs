// Cloud Node Registry - Core Library
// Canonical schema, loader, validator, query engine and exporter for
// per-provider cloud region datasets

pub mod errors;     // Error taxonomy shared by every layer
pub mod model;      // Canonical schema: providers, nodes, datasets
pub mod loader;     // Provider file → ProviderDataset
pub mod validator;  // Semantic checks, reported as data
pub mod query;      // Filters, search, coverage, statistics
pub mod exporter;   // Flat CSV rows
pub mod config;     // CLI settings (file + env)

// Re-export commonly used types
pub use errors::{RegistryError, Result};
pub use model::{
    CloudNode, Location, NetworkInfo, NodeStatus, Provider, ProviderDataset, Registry,
    ServiceType, DEFAULT_VERSION,
};
pub use loader::{DataLoader, ProviderSources, NODES_FILE};
pub use validator::{DataValidator, ValidationSummary, Violation, ViolationKind};
pub use query::{ProviderStatistics, QueryEngine};
pub use exporter::{CsvExporter, ExportOptions, HEADER};
pub use config::Settings;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
