// 📤 CSV Exporter - one flat row per node
//
// Column order is fixed. Rows follow the input order (provider, then node);
// nothing is re-sorted here.

use crate::errors::{RegistryError, Result};
use crate::model::{timestamp, CloudNode, ProviderDataset, Registry};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

pub const HEADER: [&str; 17] = [
    "Provider",
    "Node ID",
    "Name",
    "Country",
    "Region",
    "City",
    "Latitude",
    "Longitude",
    "Data Center",
    "Availability Zone",
    "Service Types",
    "Status",
    "Bandwidth",
    "Latency",
    "Uptime",
    "Description",
    "Launch Date",
];

#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    /// Joins the service types of one node inside a single cell
    pub service_type_delimiter: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        ExportOptions {
            service_type_delimiter: ",".to_string(),
        }
    }
}

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

// Debug keeps the decimal point on integral values (-5.0, not -5)
fn number(value: Option<f64>) -> String {
    value.map(|v| format!("{:?}", v)).unwrap_or_default()
}

#[derive(Debug, Clone, Default)]
pub struct CsvExporter {
    options: ExportOptions,
}

impl CsvExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ExportOptions) -> Self {
        CsvExporter { options }
    }

    pub fn node_row(&self, node: &CloudNode) -> Vec<String> {
        let network = node.network_info.as_ref();
        let service_types: Vec<&str> = node.service_types.iter().map(|t| t.as_str()).collect();

        vec![
            node.provider.as_str().to_string(),
            node.node_id.clone(),
            node.name.clone(),
            node.location.country.clone(),
            node.location.region.clone(),
            node.location.city.clone(),
            number(node.location.latitude),
            number(node.location.longitude),
            node.data_center.clone(),
            node.availability_zone.clone(),
            service_types.join(&self.options.service_type_delimiter),
            node.status.as_str().to_string(),
            optional(network.and_then(|n| n.bandwidth.as_deref())),
            number(network.and_then(|n| n.latency)),
            number(network.and_then(|n| n.uptime)),
            node.description.clone().unwrap_or_default(),
            optional(node.launch_date.as_ref().map(timestamp::format_naive)),
        ]
    }

    /// Header followed by one row per node
    pub fn rows(&self, registry: &Registry) -> Vec<Vec<String>> {
        let mut rows: Vec<Vec<String>> = vec![HEADER.iter().map(|h| h.to_string()).collect()];
        rows.extend(
            registry
                .values()
                .flat_map(|dataset| dataset.nodes.iter())
                .map(|node| self.node_row(node)),
        );
        rows
    }

    fn write_nodes<'a, W, I>(&self, nodes: I, writer: W) -> Result<usize>
    where
        W: Write,
        I: IntoIterator<Item = &'a CloudNode>,
    {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(HEADER)?;

        let mut written = 0;
        for node in nodes {
            csv_writer.write_record(self.node_row(node))?;
            written += 1;
        }

        csv_writer.flush().map_err(csv::Error::from)?;
        Ok(written)
    }

    /// Stream the whole registry as CSV; returns the number of data rows
    pub fn write_csv<W: Write>(&self, registry: &Registry, writer: W) -> Result<usize> {
        self.write_nodes(registry.values().flat_map(|d| d.nodes.iter()), writer)
    }

    /// Same layout, a single provider only
    pub fn export_provider<W: Write>(&self, dataset: &ProviderDataset, writer: W) -> Result<usize> {
        self.write_nodes(dataset.nodes.iter(), writer)
    }

    pub fn export_to_path(&self, registry: &Registry, path: &Path) -> Result<usize> {
        let file = File::create(path).map_err(|source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let written = self.write_csv(registry, file)?;

        info!(rows = written, path = %path.display(), "Exported nodes to CSV");
        Ok(written)
    }
}

// ============================================================================
// TESTS
// ============================================================================
