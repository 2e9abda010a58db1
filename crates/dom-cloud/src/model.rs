//! DigitalOcean resource models
//!
//! These are read-only projections of API responses. Every field is
//! defaulted, so a record missing an expected field (or carrying `null`)
//! deserializes with that field absent or zero instead of failing.

use serde::{Deserialize, Deserializer, Serialize};

/// Treat `null` the same as a missing field
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Placeholder rendered for absent values
pub const PLACEHOLDER: &str = "-";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Account {
    #[serde(deserialize_with = "nullable")]
    pub email: String,
    #[serde(deserialize_with = "nullable")]
    pub status: String,
    pub droplet_limit: u64,
    pub volume_limit: u64,
    #[serde(deserialize_with = "nullable")]
    pub uuid: String,
    pub email_verified: bool,
}

/// Month-to-date balance as reported by the billing endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Balance {
    pub month_to_date_balance: Option<String>,
    pub account_balance: Option<String>,
    pub month_to_date_usage: Option<String>,
    pub generated_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Region {
    #[serde(deserialize_with = "nullable")]
    pub slug: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Size {
    #[serde(deserialize_with = "nullable")]
    pub slug: String,
    pub price_monthly: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Image {
    pub slug: Option<String>,
    pub name: Option<String>,
    pub distribution: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkV4 {
    #[serde(deserialize_with = "nullable")]
    pub ip_address: String,
    #[serde(rename = "type", deserialize_with = "nullable")]
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Networks {
    #[serde(deserialize_with = "nullable")]
    pub v4: Vec<NetworkV4>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropletStatus {
    New,
    Active,
    Off,
    Archive,
    #[default]
    #[serde(other)]
    Unknown,
}

impl DropletStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DropletStatus::New => "new",
            DropletStatus::Active => "active",
            DropletStatus::Off => "off",
            DropletStatus::Archive => "archive",
            DropletStatus::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for DropletStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Droplet {
    pub id: u64,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    /// Memory in MB
    pub memory: u64,
    pub vcpus: u64,
    /// Disk in GB
    pub disk: u64,
    #[serde(deserialize_with = "nullable")]
    pub status: DropletStatus,
    #[serde(deserialize_with = "nullable")]
    pub created_at: String,
    #[serde(deserialize_with = "nullable")]
    pub size_slug: String,
    pub size: Option<Size>,
    pub region: Option<Region>,
    pub image: Option<Image>,
    #[serde(deserialize_with = "nullable")]
    pub networks: Networks,
    #[serde(deserialize_with = "nullable")]
    pub tags: Vec<String>,
}

impl Droplet {
    pub fn region_slug(&self) -> &str {
        region_slug(&self.region)
    }

    /// Region name, falling back to the slug
    pub fn region_name(&self) -> &str {
        match &self.region {
            Some(r) if !r.name.is_empty() => &r.name,
            _ => self.region_slug(),
        }
    }

    /// The first IPv4 address regardless of type
    pub fn first_ipv4(&self) -> Option<&str> {
        self.networks
            .v4
            .first()
            .map(|n| n.ip_address.as_str())
            .filter(|ip| !ip.is_empty())
    }

    /// The first IPv4 address of the given type ("public" or "private")
    pub fn ipv4(&self, kind: &str) -> Option<&str> {
        self.networks
            .v4
            .iter()
            .find(|n| n.kind == kind && !n.ip_address.is_empty())
            .map(|n| n.ip_address.as_str())
    }

    pub fn public_ipv4(&self) -> Option<&str> {
        self.ipv4("public")
    }

    pub fn private_ipv4(&self) -> Option<&str> {
        self.ipv4("private")
    }

    /// Image slug, falling back to the image name
    pub fn image_label(&self) -> &str {
        self.image
            .as_ref()
            .and_then(|i| i.slug.as_deref().or(i.name.as_deref()))
            .filter(|s| !s.is_empty())
            .unwrap_or(PLACEHOLDER)
    }

    /// Nested `size.price_monthly`, when the API included it
    pub fn nested_price(&self) -> Option<f64> {
        self.size.as_ref().and_then(|s| s.price_monthly)
    }

    pub fn created_date(&self) -> &str {
        date_part(&self.created_at)
    }

    pub fn tags_label(&self) -> String {
        join_or_placeholder(&self.tags)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Volume {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    pub size_gigabytes: u64,
    pub region: Option<Region>,
    #[serde(deserialize_with = "nullable")]
    pub droplet_ids: Vec<u64>,
    #[serde(deserialize_with = "nullable")]
    pub created_at: String,
    pub description: Option<String>,
}

impl Volume {
    pub fn is_attached(&self) -> bool {
        !self.droplet_ids.is_empty()
    }

    pub fn region_slug(&self) -> &str {
        region_slug(&self.region)
    }

    pub fn attached_label(&self) -> String {
        join_or_placeholder(&self.droplet_ids)
    }

    pub fn created_date(&self) -> &str {
        date_part(&self.created_at)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Domain {
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    pub ttl: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainRecord {
    pub id: u64,
    #[serde(rename = "type", deserialize_with = "nullable")]
    pub record_type: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub data: String,
    pub ttl: Option<u64>,
}

/// Sources of an inbound rule or destinations of an outbound rule
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FirewallTarget {
    #[serde(deserialize_with = "nullable")]
    pub addresses: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub droplet_ids: Vec<u64>,
    #[serde(deserialize_with = "nullable")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub load_balancer_uids: Vec<String>,
}

impl FirewallTarget {
    /// Addresses, else droplet ids, else tags, else load balancers, else "any"
    pub fn describe(&self) -> String {
        if !self.addresses.is_empty() {
            self.addresses.join(", ")
        } else if !self.droplet_ids.is_empty() {
            format!("droplets {}", join_or_placeholder(&self.droplet_ids))
        } else if !self.tags.is_empty() {
            format!("tags {}", self.tags.join(", "))
        } else if !self.load_balancer_uids.is_empty() {
            format!("load balancers {}", self.load_balancer_uids.join(", "))
        } else {
            "any".to_string()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InboundRule {
    #[serde(deserialize_with = "nullable")]
    pub protocol: String,
    #[serde(deserialize_with = "nullable")]
    pub ports: String,
    #[serde(deserialize_with = "nullable")]
    pub sources: FirewallTarget,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutboundRule {
    #[serde(deserialize_with = "nullable")]
    pub protocol: String,
    #[serde(deserialize_with = "nullable")]
    pub ports: String,
    #[serde(deserialize_with = "nullable")]
    pub destinations: FirewallTarget,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Firewall {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub status: String,
    #[serde(deserialize_with = "nullable")]
    pub droplet_ids: Vec<u64>,
    #[serde(deserialize_with = "nullable")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub inbound_rules: Vec<InboundRule>,
    #[serde(deserialize_with = "nullable")]
    pub outbound_rules: Vec<OutboundRule>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadBalancer {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub ip: String,
    #[serde(deserialize_with = "nullable")]
    pub status: String,
    pub region: Option<Region>,
    #[serde(deserialize_with = "nullable")]
    pub droplet_ids: Vec<u64>,
    #[serde(deserialize_with = "nullable")]
    pub created_at: String,
}

impl LoadBalancer {
    pub fn has_backends(&self) -> bool {
        !self.droplet_ids.is_empty()
    }

    pub fn region_slug(&self) -> &str {
        region_slug(&self.region)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseCluster {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub engine: String,
    #[serde(deserialize_with = "nullable")]
    pub version: String,
    #[serde(deserialize_with = "nullable")]
    pub size: String,
    /// Region slug (a plain string on this endpoint)
    #[serde(deserialize_with = "nullable")]
    pub region: String,
    #[serde(deserialize_with = "nullable")]
    pub status: String,
    pub num_nodes: u32,
}

impl DatabaseCluster {
    /// "pg 16" style engine label
    pub fn engine_label(&self) -> String {
        format!("{} {}", self.engine, self.version).trim().to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodePool {
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub size: String,
    pub count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterStatus {
    #[serde(deserialize_with = "nullable")]
    pub state: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KubernetesCluster {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub region: String,
    #[serde(deserialize_with = "nullable")]
    pub version: String,
    pub status: Option<ClusterStatus>,
    #[serde(deserialize_with = "nullable")]
    pub node_pools: Vec<NodePool>,
}

impl KubernetesCluster {
    pub fn node_count(&self) -> u32 {
        self.node_pools.iter().map(|p| p.count).sum()
    }

    pub fn state(&self) -> &str {
        self.status
            .as_ref()
            .map(|s| s.state.as_str())
            .filter(|s| !s.is_empty())
            .unwrap_or(PLACEHOLDER)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSpec {
    #[serde(deserialize_with = "nullable")]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct App {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    pub spec: Option<AppSpec>,
    pub live_url: Option<String>,
}

impl App {
    pub fn name(&self) -> &str {
        self.spec
            .as_ref()
            .map(|s| s.name.as_str())
            .filter(|s| !s.is_empty())
            .unwrap_or(PLACEHOLDER)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub created_at: String,
    pub min_disk_size: u64,
    pub size_gigabytes: f64,
    #[serde(deserialize_with = "nullable")]
    pub resource_type: String,
    #[serde(deserialize_with = "nullable")]
    pub regions: Vec<String>,
}

impl Snapshot {
    pub fn created_date(&self) -> &str {
        date_part(&self.created_at)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReservedIp {
    #[serde(deserialize_with = "nullable")]
    pub ip: String,
    pub region: Option<Region>,
    pub droplet: Option<Droplet>,
}

impl ReservedIp {
    pub fn is_assigned(&self) -> bool {
        self.droplet.is_some()
    }

    pub fn region_slug(&self) -> &str {
        region_slug(&self.region)
    }
}

fn region_slug(region: &Option<Region>) -> &str {
    region
        .as_ref()
        .map(|r| r.slug.as_str())
        .filter(|s| !s.is_empty())
        .unwrap_or(PLACEHOLDER)
}

/// `YYYY-MM-DD` prefix of an ISO-8601 timestamp
fn date_part(timestamp: &str) -> &str {
    if timestamp.is_empty() {
        return PLACEHOLDER;
    }
    timestamp.get(..10).unwrap_or(timestamp)
}

fn join_or_placeholder<T: ToString>(items: &[T]) -> String {
    if items.is_empty() {
        PLACEHOLDER.to_string()
    } else {
        items
            .iter()
            .map(|i| i.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
