//! DigitalOcean API trait definition

use crate::error::Result;
use crate::model::{
    Account, App, Balance, DatabaseCluster, Domain, DomainRecord, Droplet, Firewall,
    KubernetesCluster, LoadBalancer, ReservedIp, Snapshot, Volume,
};
use async_trait::async_trait;

/// Operations the CLI and TUI need from the DigitalOcean API
///
/// `DoClient` implements this over HTTPS. Commands take `&dyn DoApi` so the
/// same code runs against an in-memory fake in tests.
#[async_trait]
pub trait DoApi: Send + Sync {
    async fn get_account(&self) -> Result<Account>;

    async fn get_balance(&self) -> Result<Balance>;

    /// List droplets, optionally restricted to a tag
    async fn list_droplets(&self, tag: Option<&str>) -> Result<Vec<Droplet>>;

    async fn list_volumes(&self) -> Result<Vec<Volume>>;

    async fn list_domains(&self) -> Result<Vec<Domain>>;

    async fn list_domain_records(&self, domain: &str) -> Result<Vec<DomainRecord>>;

    async fn list_firewalls(&self) -> Result<Vec<Firewall>>;

    async fn list_load_balancers(&self) -> Result<Vec<LoadBalancer>>;

    async fn list_database_clusters(&self) -> Result<Vec<DatabaseCluster>>;

    async fn list_kubernetes_clusters(&self) -> Result<Vec<KubernetesCluster>>;

    async fn list_apps(&self) -> Result<Vec<App>>;

    async fn list_snapshots(&self) -> Result<Vec<Snapshot>>;

    async fn list_reserved_ips(&self) -> Result<Vec<ReservedIp>>;

    async fn delete_volume(&self, id: &str) -> Result<()>;

    async fn delete_snapshot(&self, id: &str) -> Result<()>;

    async fn delete_reserved_ip(&self, ip: &str) -> Result<()>;

    async fn delete_load_balancer(&self, id: &str) -> Result<()>;

    /// Trigger a power action on a droplet
    async fn droplet_action(&self, droplet_id: u64, action: DropletAction) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropletAction {
    Reboot,
    PowerOff,
    PowerOn,
}

impl DropletAction {
    /// Value of the `type` field in the action request body
    pub fn as_str(&self) -> &'static str {
        match self {
            DropletAction::Reboot => "reboot",
            DropletAction::PowerOff => "power_off",
            DropletAction::PowerOn => "power_on",
        }
    }

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            DropletAction::Reboot => "Reboot",
            DropletAction::PowerOff => "Power off",
            DropletAction::PowerOn => "Power on",
        }
    }
}
