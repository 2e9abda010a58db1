//! テスト用のインメモリ DoApi

use async_trait::async_trait;
use dom_cloud::{
    Account, App, Balance, DatabaseCluster, DoApi, DoError, Domain, DomainRecord, Droplet,
    DropletAction, Firewall, KubernetesCluster, LoadBalancer, ReservedIp, Result, Snapshot, Volume,
};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

#[derive(Default)]
pub struct FakeApi {
    pub account: Account,
    pub balance: Balance,
    pub droplets: Vec<Droplet>,
    pub volumes: Vec<Volume>,
    pub domains: Vec<Domain>,
    pub records: HashMap<String, Vec<DomainRecord>>,
    pub firewalls: Vec<Firewall>,
    pub load_balancers: Vec<LoadBalancer>,
    pub databases: Vec<DatabaseCluster>,
    pub kubernetes: Vec<KubernetesCluster>,
    pub apps: Vec<App>,
    pub snapshots: Vec<Snapshot>,
    pub reserved_ips: Vec<ReservedIp>,

    /// 失敗させるエンドポイント名（"droplets", "volumes", ...）
    pub failing: HashSet<&'static str>,
    /// 削除に失敗させるID
    pub undeletable: HashSet<String>,

    pub deleted: Mutex<Vec<String>>,
    pub actions: Mutex<Vec<(u64, DropletAction)>>,
    pub fetches: Mutex<Vec<&'static str>>,
}

impl FakeApi {
    pub fn fail(mut self, endpoint: &'static str) -> Self {
        self.failing.insert(endpoint);
        self
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }

    pub fn actions(&self) -> Vec<(u64, DropletAction)> {
        self.actions.lock().unwrap().clone()
    }

    pub fn fetches(&self) -> Vec<&'static str> {
        self.fetches.lock().unwrap().clone()
    }

    fn fetch<T: Clone>(&self, endpoint: &'static str, items: &[T]) -> Result<Vec<T>> {
        self.fetches.lock().unwrap().push(endpoint);
        if self.failing.contains(endpoint) {
            return Err(server_error());
        }
        Ok(items.to_vec())
    }

    fn delete(&self, kind: &str, id: &str) -> Result<()> {
        if self.undeletable.contains(id) {
            return Err(DoError::Api {
                status: 403,
                message: "forbidden".into(),
            });
        }
        self.deleted.lock().unwrap().push(format!("{}:{}", kind, id));
        Ok(())
    }
}

fn server_error() -> DoError {
    DoError::Api {
        status: 500,
        message: "boom".into(),
    }
}

#[async_trait]
impl DoApi for FakeApi {
    async fn get_account(&self) -> Result<Account> {
        if self.failing.contains("account") {
            return Err(server_error());
        }
        Ok(self.account.clone())
    }

    async fn get_balance(&self) -> Result<Balance> {
        if self.failing.contains("balance") {
            return Err(server_error());
        }
        Ok(self.balance.clone())
    }

    async fn list_droplets(&self, tag: Option<&str>) -> Result<Vec<Droplet>> {
        let droplets = self.fetch("droplets", &self.droplets)?;
        Ok(match tag {
            Some(tag) => droplets
                .into_iter()
                .filter(|d| d.tags.iter().any(|t| t == tag))
                .collect(),
            None => droplets,
        })
    }

    async fn list_volumes(&self) -> Result<Vec<Volume>> {
        self.fetch("volumes", &self.volumes)
    }

    async fn list_domains(&self) -> Result<Vec<Domain>> {
        self.fetch("domains", &self.domains)
    }

    async fn list_domain_records(&self, domain: &str) -> Result<Vec<DomainRecord>> {
        let records = self.records.get(domain).cloned().unwrap_or_default();
        self.fetch("records", &records)
    }

    async fn list_firewalls(&self) -> Result<Vec<Firewall>> {
        self.fetch("firewalls", &self.firewalls)
    }

    async fn list_load_balancers(&self) -> Result<Vec<LoadBalancer>> {
        self.fetch("load_balancers", &self.load_balancers)
    }

    async fn list_database_clusters(&self) -> Result<Vec<DatabaseCluster>> {
        self.fetch("databases", &self.databases)
    }

    async fn list_kubernetes_clusters(&self) -> Result<Vec<KubernetesCluster>> {
        self.fetch("kubernetes", &self.kubernetes)
    }

    async fn list_apps(&self) -> Result<Vec<App>> {
        self.fetch("apps", &self.apps)
    }

    async fn list_snapshots(&self) -> Result<Vec<Snapshot>> {
        self.fetch("snapshots", &self.snapshots)
    }

    async fn list_reserved_ips(&self) -> Result<Vec<ReservedIp>> {
        self.fetch("reserved_ips", &self.reserved_ips)
    }

    async fn delete_volume(&self, id: &str) -> Result<()> {
        self.delete("volume", id)
    }

    async fn delete_snapshot(&self, id: &str) -> Result<()> {
        self.delete("snapshot", id)
    }

    async fn delete_reserved_ip(&self, ip: &str) -> Result<()> {
        self.delete("ip", ip)
    }

    async fn delete_load_balancer(&self, id: &str) -> Result<()> {
        self.delete("lb", id)
    }

    async fn droplet_action(&self, droplet_id: u64, action: DropletAction) -> Result<()> {
        if self.failing.contains("actions") {
            return Err(server_error());
        }
        self.actions.lock().unwrap().push((droplet_id, action));
        Ok(())
    }
}
