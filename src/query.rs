// 🔎 Query Engine - read-only views over loaded datasets
//
// Results follow provider order, then node order inside each dataset.
// Nothing is deduplicated across providers.

use crate::model::{timestamp, CloudNode, NodeStatus, Provider, ProviderDataset, Registry, ServiceType};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

// ============================================================================
// PROVIDER STATISTICS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderStatistics {
    pub total_nodes: usize,
    pub countries: BTreeMap<String, usize>,
    /// A node with N service types lands in N buckets
    pub service_types: BTreeMap<ServiceType, usize>,
    pub statuses: BTreeMap<NodeStatus, usize>,
    #[serde(with = "timestamp")]
    pub last_updated: DateTime<Utc>,
    pub version: String,
}

impl ProviderStatistics {
    fn from_dataset(dataset: &ProviderDataset) -> Self {
        let mut countries = BTreeMap::new();
        let mut service_types = BTreeMap::new();
        let mut statuses = BTreeMap::new();

        for node in &dataset.nodes {
            *countries.entry(node.location.country.clone()).or_insert(0) += 1;
            for service_type in &node.service_types {
                *service_types.entry(*service_type).or_insert(0) += 1;
            }
            *statuses.entry(node.status).or_insert(0) += 1;
        }

        ProviderStatistics {
            total_nodes: dataset.nodes.len(),
            countries,
            service_types,
            statuses,
            last_updated: dataset.last_updated,
            version: dataset.version.clone(),
        }
    }
}

// ============================================================================
// QUERY ENGINE
// ============================================================================

pub struct QueryEngine<'a> {
    registry: &'a Registry,
}

impl<'a> QueryEngine<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        QueryEngine { registry }
    }

    /// Every node, provider by provider
    pub fn nodes(&self) -> impl Iterator<Item = &'a CloudNode> + 'a {
        let registry = self.registry;
        registry.values().flat_map(|dataset| dataset.nodes.iter())
    }

    pub fn total_nodes(&self) -> usize {
        self.registry.values().map(ProviderDataset::len).sum()
    }

    fn filter<F>(&self, predicate: F) -> Vec<&'a CloudNode>
    where
        F: Fn(&CloudNode) -> bool,
    {
        self.nodes().filter(|node| predicate(node)).collect()
    }

    pub fn by_country(&self, country: &str) -> Vec<&'a CloudNode> {
        self.filter(|node| node.location.country == country)
    }

    pub fn by_region(&self, region: &str) -> Vec<&'a CloudNode> {
        self.filter(|node| node.location.region == region)
    }

    pub fn by_service_type(&self, service_type: ServiceType) -> Vec<&'a CloudNode> {
        self.filter(|node| node.has_service(service_type))
    }

    pub fn by_status(&self, status: NodeStatus) -> Vec<&'a CloudNode> {
        self.filter(|node| node.status == status)
    }

    pub fn by_provider(&self, provider: Provider) -> Vec<&'a CloudNode> {
        self.registry
            .get(&provider)
            .map(|dataset| dataset.nodes.iter().collect())
            .unwrap_or_default()
    }

    pub fn find_node(&self, provider: Provider, node_id: &str) -> Option<&'a CloudNode> {
        self.registry.get(&provider).and_then(|dataset| dataset.node(node_id))
    }

    /// Case-insensitive substring search over name, description, data center,
    /// country, region and city. An empty keyword matches every node.
    pub fn search(&self, keyword: &str) -> Vec<&'a CloudNode> {
        let keyword = keyword.to_lowercase();

        self.filter(|node| {
            let fields = [
                node.name.as_str(),
                node.description.as_deref().unwrap_or(""),
                node.data_center.as_str(),
                node.location.country.as_str(),
                node.location.region.as_str(),
                node.location.city.as_str(),
            ];
            fields
                .iter()
                .any(|field| field.to_lowercase().contains(&keyword))
        })
    }

    /// Distinct countries in first-seen order
    pub fn countries(&self) -> Vec<&'a str> {
        let mut seen = Vec::new();
        for node in self.nodes() {
            let country = node.location.country.as_str();
            if !seen.contains(&country) {
                seen.push(country);
            }
        }
        seen
    }

    /// Node count per country, highest first.
    ///
    /// Ties keep the order in which countries were first encountered
    /// (provider order, then node order), not alphabetical order.
    pub fn global_coverage(&self) -> Vec<(String, usize)> {
        let mut coverage: Vec<(String, usize)> = Vec::new();
        let mut positions: HashMap<&str, usize> = HashMap::new();

        for node in self.nodes() {
            let country = node.location.country.as_str();
            match positions.get(country) {
                Some(&position) => coverage[position].1 += 1,
                None => {
                    positions.insert(country, coverage.len());
                    coverage.push((country.to_string(), 1));
                }
            }
        }

        // sort_by is stable, which preserves first-seen order among ties
        coverage.sort_by(|a, b| b.1.cmp(&a.1));
        coverage
    }

    pub fn provider_statistics(&self) -> BTreeMap<Provider, ProviderStatistics> {
        self.registry
            .iter()
            .map(|(provider, dataset)| (*provider, ProviderStatistics::from_dataset(dataset)))
            .collect()
    }
}

// ============================================================================
// TESTS
// ============================================================================
