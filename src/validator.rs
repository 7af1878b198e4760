// ✅ Data Validator - semantic plausibility checks
//
// Walks loaded datasets and reports what looks wrong. Nothing here fails and
// nothing is dropped: the registry mirrors what providers published, flagged
// rather than rejected.

use crate::model::{CloudNode, Provider, ProviderDataset, Registry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::RangeInclusive;

// ============================================================================
// VIOLATION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ViolationKind {
    /// Required text field present but empty
    MissingField,
    /// Coordinate outside its plausible range
    RangeViolation,
    /// Metric that cannot be negative
    NegativeMetric,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Position of the node inside its dataset
    pub node_index: usize,
    pub node_id: String,
    pub field: String,
    pub kind: ViolationKind,
    pub message: String,
}

impl Violation {
    fn new(index: usize, node: &CloudNode, field: &str, kind: ViolationKind, message: String) -> Self {
        Violation {
            node_index: index,
            node_id: node.node_id.clone(),
            field: field.to_string(),
            kind,
            message,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.node_id.is_empty() {
            write!(f, "node {}: {}", self.node_index, self.message)
        } else {
            write!(f, "node {} ({}): {}", self.node_index, self.node_id, self.message)
        }
    }
}

// ============================================================================
// DATA VALIDATOR
// ============================================================================

pub struct DataValidator {
    latitude_range: RangeInclusive<f64>,
    longitude_range: RangeInclusive<f64>,
}

impl DataValidator {
    pub fn new() -> Self {
        DataValidator {
            latitude_range: -90.0..=90.0,
            longitude_range: -180.0..=180.0,
        }
    }

    /// Every violation of one node; checks never short-circuit
    pub fn validate_node(&self, index: usize, node: &CloudNode) -> Vec<Violation> {
        let mut violations = Vec::new();

        let required = [
            ("node_id", node.node_id.as_str()),
            ("name", node.name.as_str()),
            ("location.country", node.location.country.as_str()),
            ("location.city", node.location.city.as_str()),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                violations.push(Violation::new(
                    index,
                    node,
                    field,
                    ViolationKind::MissingField,
                    format!("{} is empty", field),
                ));
            }
        }

        if let Some(latitude) = node.location.latitude {
            if !self.latitude_range.contains(&latitude) {
                violations.push(Violation::new(
                    index,
                    node,
                    "location.latitude",
                    ViolationKind::RangeViolation,
                    format!("latitude {} is outside [-90, 90]", latitude),
                ));
            }
        }

        if let Some(longitude) = node.location.longitude {
            if !self.longitude_range.contains(&longitude) {
                violations.push(Violation::new(
                    index,
                    node,
                    "location.longitude",
                    ViolationKind::RangeViolation,
                    format!("longitude {} is outside [-180, 180]", longitude),
                ));
            }
        }

        if let Some(latency) = node.latency() {
            if latency < 0.0 {
                violations.push(Violation::new(
                    index,
                    node,
                    "network_info.latency",
                    ViolationKind::NegativeMetric,
                    format!("latency {} ms is negative", latency),
                ));
            }
        }

        violations
    }

    pub fn validate_dataset(&self, dataset: &ProviderDataset) -> Vec<Violation> {
        dataset
            .nodes
            .iter()
            .enumerate()
            .flat_map(|(index, node)| self.validate_node(index, node))
            .collect()
    }

    /// Structured violations per provider; clean providers are omitted
    pub fn validate_detailed(&self, registry: &Registry) -> BTreeMap<Provider, Vec<Violation>> {
        registry
            .iter()
            .map(|(provider, dataset)| (*provider, self.validate_dataset(dataset)))
            .filter(|(_, violations)| !violations.is_empty())
            .collect()
    }

    /// Human-readable violations per provider.
    ///
    /// An empty map means every provider is clean.
    pub fn validate(&self, registry: &Registry) -> BTreeMap<Provider, Vec<String>> {
        self.validate_detailed(registry)
            .into_iter()
            .map(|(provider, violations)| {
                (provider, violations.iter().map(Violation::to_string).collect())
            })
            .collect()
    }

    pub fn summary(&self, registry: &Registry) -> ValidationSummary {
        let mut summary = ValidationSummary {
            providers_checked: registry.len(),
            nodes_checked: registry.values().map(ProviderDataset::len).sum(),
            ..ValidationSummary::default()
        };

        for violations in self.validate_detailed(registry).values() {
            summary.providers_with_violations += 1;
            for violation in violations {
                *summary.by_kind.entry(violation.kind).or_insert(0) += 1;
            }
        }

        summary
    }
}

impl Default for DataValidator {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// VALIDATION SUMMARY
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationSummary {
    pub providers_checked: usize,
    pub nodes_checked: usize,
    pub providers_with_violations: usize,
    pub by_kind: BTreeMap<ViolationKind, usize>,
}

impl ValidationSummary {
    pub fn total_violations(&self) -> usize {
        self.by_kind.values().sum()
    }

    pub fn is_clean(&self) -> bool {
        self.total_violations() == 0
    }

    pub fn summary(&self) -> String {
        format!(
            "{} providers, {} nodes checked | {} violations ({} missing, {} out of range, {} negative)",
            self.providers_checked,
            self.nodes_checked,
            self.total_violations(),
            self.by_kind.get(&ViolationKind::MissingField).unwrap_or(&0),
            self.by_kind.get(&ViolationKind::RangeViolation).unwrap_or(&0),
            self.by_kind.get(&ViolationKind::NegativeMetric).unwrap_or(&0),
        )
    }
}

// ============================================================================
// TESTS
// ============================================================================
