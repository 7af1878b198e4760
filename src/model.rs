// 🗺️ Canonical Schema - provider-neutral cloud node records
// Every provider file is mapped into these types before anything else touches it.
//
// Structural shape is enforced here (missing fields, unknown enum values, wrong
// JSON shapes). Numeric plausibility is NOT: a latitude of 200.0 loads fine and
// is reported later by the validator.

use crate::errors::{RegistryError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Version assumed when a dataset file does not declare one.
pub const DEFAULT_VERSION: &str = "1.0.0";

/// All loaded datasets, iterated in provider declaration order.
pub type Registry = BTreeMap<Provider, ProviderDataset>;

// ============================================================================
// PROVIDER
// ============================================================================

/// Provider - closed set of supported cloud vendors
///
/// Declaration order is the canonical iteration order everywhere
/// (`load_all`, queries, validation, export).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    AlibabaCloud,
    HuaweiCloud,
    TencentCloud,
    Aws,
    Azure,
    GoogleCloud,
}

impl Provider {
    pub const ALL: [Provider; 6] = [
        Provider::AlibabaCloud,
        Provider::HuaweiCloud,
        Provider::TencentCloud,
        Provider::Aws,
        Provider::Azure,
        Provider::GoogleCloud,
    ];

    /// Wire value used in dataset files and exports
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::AlibabaCloud => "alibaba_cloud",
            Provider::HuaweiCloud => "huawei_cloud",
            Provider::TencentCloud => "tencent_cloud",
            Provider::Aws => "aws",
            Provider::Azure => "azure",
            Provider::GoogleCloud => "google_cloud",
        }
    }

    /// Human-readable name for display
    pub fn display_name(&self) -> &'static str {
        match self {
            Provider::AlibabaCloud => "Alibaba Cloud",
            Provider::HuaweiCloud => "Huawei Cloud",
            Provider::TencentCloud => "Tencent Cloud",
            Provider::Aws => "Amazon Web Services",
            Provider::Azure => "Microsoft Azure",
            Provider::GoogleCloud => "Google Cloud",
        }
    }

    /// Directory name in the conventional `<data_dir>/<slug>/nodes.json` layout
    pub fn slug(&self) -> &'static str {
        match self {
            Provider::AlibabaCloud => "alibaba-cloud",
            Provider::HuaweiCloud => "huawei-cloud",
            Provider::TencentCloud => "tencent-cloud",
            Provider::Aws => "aws",
            Provider::Azure => "azure",
            Provider::GoogleCloud => "google-cloud",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = RegistryError;

    /// Accepts the wire value (`alibaba_cloud`) or the directory slug (`alibaba-cloud`)
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Provider::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == wanted || p.slug() == wanted)
            .ok_or_else(|| RegistryError::UnknownVariant {
                kind: "provider",
                value: s.to_string(),
            })
    }
}

// ============================================================================
// SERVICE TYPE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceType {
    Compute,
    Storage,
    Network,
    Database,
    Cdn,
    Ai,
    Security,
}

impl ServiceType {
    pub const ALL: [ServiceType; 7] = [
        ServiceType::Compute,
        ServiceType::Storage,
        ServiceType::Network,
        ServiceType::Database,
        ServiceType::Cdn,
        ServiceType::Ai,
        ServiceType::Security,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::Compute => "compute",
            ServiceType::Storage => "storage",
            ServiceType::Network => "network",
            ServiceType::Database => "database",
            ServiceType::Cdn => "cdn",
            ServiceType::Ai => "ai",
            ServiceType::Security => "security",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceType {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        ServiceType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| RegistryError::UnknownVariant {
                kind: "service type",
                value: s.to_string(),
            })
    }
}

// ============================================================================
// NODE STATUS
// ============================================================================

/// Snapshot status of a node. No transitions are modeled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    Active,
    Maintenance,
    Deprecated,
    Planned,
}

impl NodeStatus {
    pub const ALL: [NodeStatus; 4] = [
        NodeStatus::Active,
        NodeStatus::Maintenance,
        NodeStatus::Deprecated,
        NodeStatus::Planned,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeStatus::Active => "active",
            NodeStatus::Maintenance => "maintenance",
            NodeStatus::Deprecated => "deprecated",
            NodeStatus::Planned => "planned",
        }
    }
}

impl fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeStatus {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        NodeStatus::ALL
            .iter()
            .copied()
            .find(|st| st.as_str() == wanted)
            .ok_or_else(|| RegistryError::UnknownVariant {
                kind: "node status",
                value: s.to_string(),
            })
    }
}

// ============================================================================
// LOCATION & NETWORK INFO
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub country: String,
    pub region: String,
    pub city: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl Location {
    pub fn new(country: &str, region: &str, city: &str) -> Self {
        Location {
            country: country.to_string(),
            region: region.to_string(),
            city: city.to_string(),
            latitude: None,
            longitude: None,
        }
    }

    /// Builder pattern: add coordinates
    pub fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bandwidth: Option<String>,

    /// Milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency: Option<f64>,

    /// Percentage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uptime: Option<f64>,
}

// ============================================================================
// CLOUD NODE
// ============================================================================

/// CloudNode - one point of presence published by a provider
///
/// Immutable once loaded; `provider` always equals the owning dataset's provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudNode {
    pub node_id: String,
    pub name: String,
    pub provider: Provider,
    pub location: Location,
    pub data_center: String,
    pub availability_zone: String,
    pub service_types: Vec<ServiceType>,
    pub status: NodeStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_info: Option<NetworkInfo>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(
        default,
        with = "timestamp::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub launch_date: Option<DateTime<Utc>>,

    /// Opaque to the registry; carried through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl CloudNode {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        node_id: &str,
        name: &str,
        provider: Provider,
        location: Location,
        data_center: &str,
        availability_zone: &str,
        service_types: Vec<ServiceType>,
        status: NodeStatus,
    ) -> Self {
        CloudNode {
            node_id: node_id.to_string(),
            name: name.to_string(),
            provider,
            location,
            data_center: data_center.to_string(),
            availability_zone: availability_zone.to_string(),
            service_types,
            status,
            network_info: None,
            description: None,
            launch_date: None,
            metadata: None,
        }
    }

    /// Builder pattern: add network info
    pub fn with_network_info(mut self, network_info: NetworkInfo) -> Self {
        self.network_info = Some(network_info);
        self
    }

    /// Builder pattern: add description
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Builder pattern: add launch date
    pub fn with_launch_date(mut self, launch_date: DateTime<Utc>) -> Self {
        self.launch_date = Some(launch_date);
        self
    }

    pub fn has_service(&self, service_type: ServiceType) -> bool {
        self.service_types.contains(&service_type)
    }

    /// Latency in milliseconds, if the provider published one
    pub fn latency(&self) -> Option<f64> {
        self.network_info.as_ref().and_then(|n| n.latency)
    }

    /// Build a node from one raw record of a `provider` dataset file.
    ///
    /// The record inherits `provider` from its file; a record that names a
    /// different provider is rejected.
    pub fn from_record(record: Value, provider: Provider) -> Result<Self> {
        node_from_record(record, provider).map_err(|reason| RegistryError::schema(provider, reason))
    }

    pub fn to_record(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

fn node_from_record(record: Value, provider: Provider) -> std::result::Result<CloudNode, String> {
    let mut fields = match record {
        Value::Object(fields) => fields,
        other => return Err(format!("node record must be an object, got {}", json_kind(&other))),
    };

    match fields.remove("provider") {
        None | Some(Value::Null) => {}
        Some(Value::String(declared)) if declared == provider.as_str() => {}
        Some(declared) => {
            return Err(format!(
                "node declares provider {} but the dataset belongs to {}",
                declared, provider
            ))
        }
    }
    fields.insert(
        "provider".to_string(),
        Value::String(provider.as_str().to_string()),
    );

    let mut node: CloudNode =
        serde_json::from_value(Value::Object(fields)).map_err(|e| e.to_string())?;

    if node.service_types.is_empty() {
        return Err("service_types must not be empty".to_string());
    }

    // service_types is a set: drop repeats, keep first-seen order
    let mut seen = HashSet::new();
    node.service_types.retain(|t| seen.insert(*t));

    Ok(node)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ============================================================================
// PROVIDER DATASET
// ============================================================================

/// All nodes published by one provider, as read from one file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderDataset {
    pub provider: Provider,
    pub version: String,
    #[serde(with = "timestamp")]
    pub last_updated: DateTime<Utc>,
    pub nodes: Vec<CloudNode>,
}

#[derive(Deserialize)]
struct DatasetHeader {
    provider: Provider,
    #[serde(default)]
    version: Option<String>,
    #[serde(with = "timestamp")]
    last_updated: DateTime<Utc>,
    nodes: Vec<Value>,
}

impl ProviderDataset {
    pub fn new(provider: Provider, last_updated: DateTime<Utc>) -> Self {
        ProviderDataset {
            provider,
            version: DEFAULT_VERSION.to_string(),
            last_updated,
            nodes: Vec::new(),
        }
    }

    /// Map a parsed dataset file into the canonical schema.
    ///
    /// Any malformed node fails the whole dataset. `expected` is the provider
    /// the file was resolved for; the file must agree with it.
    pub fn from_json_value(value: Value, expected: Provider) -> Result<Self> {
        let header: DatasetHeader = serde_json::from_value(value)
            .map_err(|e| RegistryError::schema(expected, format!("dataset header: {}", e)))?;

        if header.provider != expected {
            return Err(RegistryError::schema(
                expected,
                format!("file declares provider {}", header.provider),
            ));
        }

        let mut nodes = Vec::with_capacity(header.nodes.len());
        let mut ids = HashSet::new();

        for (index, record) in header.nodes.into_iter().enumerate() {
            let label = record
                .get("node_id")
                .and_then(Value::as_str)
                .map(|id| format!("node {} ({})", index, id))
                .unwrap_or_else(|| format!("node {}", index));

            let node = node_from_record(record, expected)
                .map_err(|reason| RegistryError::schema(expected, format!("{}: {}", label, reason)))?;

            // empty ids are left for the validator to report
            if !node.node_id.trim().is_empty() && !ids.insert(node.node_id.clone()) {
                return Err(RegistryError::schema(
                    expected,
                    format!("{}: duplicate node_id '{}'", label, node.node_id),
                ));
            }

            nodes.push(node);
        }

        Ok(ProviderDataset {
            provider: expected,
            version: header.version.unwrap_or_else(|| DEFAULT_VERSION.to_string()),
            last_updated: header.last_updated,
            nodes,
        })
    }

    pub fn to_json_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Pretty-printed dataset file contents (non-ASCII is written as-is)
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save_json(&self, path: &Path) -> Result<()> {
        let contents = self.to_json_string()?;
        std::fs::write(path, contents).map_err(|source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn node(&self, node_id: &str) -> Option<&CloudNode> {
        self.nodes.iter().find(|n| n.node_id == node_id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

// ============================================================================
// TIMESTAMPS
// ============================================================================

/// Serde glue for dataset timestamps.
///
/// Reads RFC 3339 or naive ISO-8601 (taken as UTC); writes RFC 3339.
pub mod timestamp {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

    pub fn parse(value: &str) -> Option<DateTime<Utc>> {
        let value = value.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
            return Some(dt.with_timezone(&Utc));
        }

        for format in NAIVE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
                return Some(Utc.from_utc_datetime(&naive));
            }
        }

        NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| Utc.from_utc_datetime(&naive))
    }

    pub fn format(value: &DateTime<Utc>) -> String {
        value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }

    /// Zone-less ISO form used in flat exports; microseconds only when non-zero
    pub fn format_naive(value: &DateTime<Utc>) -> String {
        if value.timestamp_subsec_nanos() == 0 {
            value.format("%Y-%m-%dT%H:%M:%S").to_string()
        } else {
            value.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
        }
    }

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{}'", raw)))
    }

    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            value: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(dt) => super::serialize(dt, serializer),
                None => serializer.serialize_none(),
            }
        }

        /// Empty strings count as absent
        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                None => Ok(None),
                Some(raw) if raw.trim().is_empty() => Ok(None),
                Some(raw) => super::parse(&raw).map(Some).ok_or_else(|| {
                    serde::de::Error::custom(format!("invalid timestamp '{}'", raw))
                }),
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn hangzhou_record() -> Value {
        json!({
            "node_id": "cn-hangzhou",
            "name": "华东1（杭州）",
            "location": {
                "country": "中国",
                "region": "华东",
                "city": "杭州",
                "latitude": 30.2741,
                "longitude": 120.1551
            },
            "data_center": "阿里云杭州数据中心",
            "availability_zone": "cn-hangzhou-a",
            "service_types": ["ai", "compute"],
            "status": "active",
            "network_info": {"bandwidth": "100Gbps", "latency": 5.2, "uptime": 99.95},
            "description": "阿里云华东1区域主数据中心",
            "launch_date": "2009-09-10T00:00:00"
        })
    }

    fn dataset_file(nodes: Vec<Value>) -> Value {
        json!({
            "provider": "alibaba_cloud",
            "version": "2.1.0",
            "last_updated": "2024-01-15T00:00:00",
            "nodes": nodes
        })
    }

    #[test]
    fn test_enum_wire_values() {
        assert_eq!(serde_json::to_value(Provider::AlibabaCloud).unwrap(), json!("alibaba_cloud"));
        assert_eq!(serde_json::to_value(Provider::GoogleCloud).unwrap(), json!("google_cloud"));
        assert_eq!(serde_json::to_value(ServiceType::Ai).unwrap(), json!("ai"));
        assert_eq!(serde_json::to_value(NodeStatus::Maintenance).unwrap(), json!("maintenance"));

        for provider in Provider::ALL {
            assert_eq!(serde_json::to_value(provider).unwrap(), json!(provider.as_str()));
        }
    }

    #[test]
    fn test_provider_from_str_accepts_slug() {
        assert_eq!("huawei_cloud".parse::<Provider>().unwrap(), Provider::HuaweiCloud);
        assert_eq!("tencent-cloud".parse::<Provider>().unwrap(), Provider::TencentCloud);
        assert_eq!(" AWS ".parse::<Provider>().unwrap(), Provider::Aws);
        assert!("oracle_cloud".parse::<Provider>().is_err());
    }

    #[test]
    fn test_node_inherits_provider() {
        let node = CloudNode::from_record(hangzhou_record(), Provider::AlibabaCloud).unwrap();

        assert_eq!(node.provider, Provider::AlibabaCloud);
        assert_eq!(node.node_id, "cn-hangzhou");
        assert_eq!(node.location.latitude, Some(30.2741));
        assert_eq!(node.service_types, vec![ServiceType::Ai, ServiceType::Compute]);
        assert_eq!(node.latency(), Some(5.2));
        assert_eq!(
            node.launch_date.map(|d| timestamp::format(&d)),
            Some("2009-09-10T00:00:00Z".to_string())
        );
    }

    #[test]
    fn test_node_with_conflicting_provider_rejected() {
        let mut record = hangzhou_record();
        record["provider"] = json!("aws");

        let err = CloudNode::from_record(record, Provider::AlibabaCloud).unwrap_err();
        assert!(matches!(err, RegistryError::SchemaViolation { .. }));
    }

    #[test]
    fn test_missing_required_field_is_schema_violation() {
        let mut record = hangzhou_record();
        record.as_object_mut().unwrap().remove("name");

        let err = CloudNode::from_record(record, Provider::AlibabaCloud).unwrap_err();
        assert!(err.to_string().contains("name"));
    }

    #[test]
    fn test_wrong_shapes_are_schema_violations() {
        let mut not_a_list = hangzhou_record();
        not_a_list["service_types"] = json!("compute");
        assert!(CloudNode::from_record(not_a_list, Provider::AlibabaCloud).is_err());

        let mut unknown_service = hangzhou_record();
        unknown_service["service_types"] = json!(["quantum"]);
        assert!(CloudNode::from_record(unknown_service, Provider::AlibabaCloud).is_err());

        let mut empty_services = hangzhou_record();
        empty_services["service_types"] = json!([]);
        assert!(CloudNode::from_record(empty_services, Provider::AlibabaCloud).is_err());

        let mut bad_status = hangzhou_record();
        bad_status["status"] = json!("retired");
        assert!(CloudNode::from_record(bad_status, Provider::AlibabaCloud).is_err());

        let mut bad_location = hangzhou_record();
        bad_location["location"] = json!({"country": "中国", "region": "华东"});
        assert!(CloudNode::from_record(bad_location, Provider::AlibabaCloud).is_err());

        assert!(CloudNode::from_record(json!(["cn-hangzhou"]), Provider::AlibabaCloud).is_err());
    }

    #[test]
    fn test_out_of_range_numbers_still_load() {
        let mut record = hangzhou_record();
        record["location"]["latitude"] = json!(200.0);
        record["network_info"]["latency"] = json!(-5.0);

        let node = CloudNode::from_record(record, Provider::AlibabaCloud).unwrap();
        assert_eq!(node.location.latitude, Some(200.0));
        assert_eq!(node.latency(), Some(-5.0));
    }

    #[test]
    fn test_null_optionals_are_absent() {
        let mut record = hangzhou_record();
        record["network_info"] = Value::Null;
        record["description"] = Value::Null;
        record["launch_date"] = json!("");
        record["location"]["latitude"] = Value::Null;

        let node = CloudNode::from_record(record, Provider::AlibabaCloud).unwrap();
        assert!(node.network_info.is_none());
        assert!(node.description.is_none());
        assert!(node.launch_date.is_none());
        assert!(node.location.latitude.is_none());
    }

    #[test]
    fn test_repeated_service_types_collapse() {
        let mut record = hangzhou_record();
        record["service_types"] = json!(["compute", "ai", "compute"]);

        let node = CloudNode::from_record(record, Provider::AlibabaCloud).unwrap();
        assert_eq!(node.service_types, vec![ServiceType::Compute, ServiceType::Ai]);
    }

    #[test]
    fn test_dataset_round_trip() {
        let mut record = hangzhou_record();
        record["metadata"] = json!({"zones": ["cn-hangzhou-a", "cn-hangzhou-b"], "source": "api"});

        let dataset =
            ProviderDataset::from_json_value(dataset_file(vec![record]), Provider::AlibabaCloud)
                .unwrap();
        assert_eq!(dataset.version, "2.1.0");
        assert_eq!(dataset.len(), 1);

        let written = dataset.to_json_value().unwrap();
        let reloaded = ProviderDataset::from_json_value(written, Provider::AlibabaCloud).unwrap();

        assert_eq!(reloaded, dataset);
    }

    #[test]
    fn test_dataset_version_defaults() {
        let mut file = dataset_file(vec![hangzhou_record()]);
        file.as_object_mut().unwrap().remove("version");

        let dataset = ProviderDataset::from_json_value(file, Provider::AlibabaCloud).unwrap();
        assert_eq!(dataset.version, DEFAULT_VERSION);
    }

    #[test]
    fn test_one_bad_node_fails_whole_dataset() {
        let mut bad = hangzhou_record();
        bad["node_id"] = json!("cn-shanghai");
        bad["status"] = json!("unknown");

        let err = ProviderDataset::from_json_value(
            dataset_file(vec![hangzhou_record(), bad]),
            Provider::AlibabaCloud,
        )
        .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("node 1 (cn-shanghai)"), "{}", message);
    }

    #[test]
    fn test_duplicate_node_id_rejected() {
        let err = ProviderDataset::from_json_value(
            dataset_file(vec![hangzhou_record(), hangzhou_record()]),
            Provider::AlibabaCloud,
        )
        .unwrap_err();

        assert!(err.to_string().contains("duplicate node_id"));
    }

    #[test]
    fn test_empty_node_ids_left_to_validator() {
        let mut first = hangzhou_record();
        first["node_id"] = json!("");
        let mut second = hangzhou_record();
        second["node_id"] = json!("  ");

        let dataset = ProviderDataset::from_json_value(
            dataset_file(vec![first, second]),
            Provider::AlibabaCloud,
        )
        .unwrap();

        assert_eq!(dataset.len(), 2);
    }

    #[test]
    fn test_full_precision_numbers_survive_round_trip() {
        let mut record = hangzhou_record();
        record["location"]["latitude"] = json!(32.71213948713927);
        record["location"]["longitude"] = json!(-116.83361554809613);
        record["network_info"] = json!({"latency": 0.30000000000000004, "uptime": 99.98999999999999});

        let dataset =
            ProviderDataset::from_json_value(dataset_file(vec![record]), Provider::AlibabaCloud)
                .unwrap();
        let node = &dataset.nodes[0];
        assert_eq!(node.location.longitude, Some(-116.83361554809613));
        assert_eq!(node.latency(), Some(0.30000000000000004));

        let text = dataset.to_json_string().unwrap();
        let reparsed: Value = serde_json::from_str(&text).unwrap();
        let reloaded = ProviderDataset::from_json_value(reparsed, Provider::AlibabaCloud).unwrap();

        assert_eq!(reloaded, dataset);
        assert_eq!(reloaded.nodes[0].location.latitude, Some(32.71213948713927));
    }

    #[test]
    fn test_metadata_of_any_shape_passes_through() {
        for metadata in [json!(["edge", "gpu"]), json!("legacy"), json!(42)] {
            let mut record = hangzhou_record();
            record["metadata"] = metadata.clone();

            let dataset =
                ProviderDataset::from_json_value(dataset_file(vec![record]), Provider::AlibabaCloud)
                    .unwrap();
            assert_eq!(dataset.nodes[0].metadata, Some(metadata.clone()));

            let written = dataset.to_json_value().unwrap();
            assert_eq!(written["nodes"][0]["metadata"], metadata);
            let reloaded =
                ProviderDataset::from_json_value(written, Provider::AlibabaCloud).unwrap();
            assert_eq!(reloaded, dataset);
        }
    }

    #[test]
    fn test_dataset_provider_mismatch_rejected() {
        let err = ProviderDataset::from_json_value(dataset_file(vec![]), Provider::HuaweiCloud)
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::SchemaViolation { provider: Provider::HuaweiCloud, .. }
        ));
    }

    #[test]
    fn test_timestamp_formats() {
        let naive = timestamp::parse("2024-01-15T00:00:00").unwrap();
        let zoned = timestamp::parse("2024-01-15T08:00:00+08:00").unwrap();
        let date_only = timestamp::parse("2024-01-15").unwrap();
        let fractional = timestamp::parse("2024-01-15T00:00:00.250000").unwrap();

        assert_eq!(naive, zoned);
        assert_eq!(naive, date_only);
        assert_eq!(timestamp::format(&fractional), "2024-01-15T00:00:00.250Z");
        assert_eq!(timestamp::format_naive(&naive), "2024-01-15T00:00:00");
        assert_eq!(timestamp::format_naive(&fractional), "2024-01-15T00:00:00.250000");
        assert!(timestamp::parse("yesterday").is_none());
    }
}
