//! DigitalOcean REST API client
//!
//! Direct API implementation using Bearer token authentication.
//! List endpoints are paginated; every page is fetched and concatenated.

use crate::api::{DoApi, DropletAction};
use crate::error::{DoError, Result};
use crate::model::{
    Account, App, Balance, DatabaseCluster, Domain, DomainRecord, Droplet, Firewall,
    KubernetesCluster, LoadBalancer, ReservedIp, Snapshot, Volume,
};
use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub const DIGITALOCEAN_API_BASE: &str = "https://api.digitalocean.com/v2";

/// Largest page size the API accepts
const PER_PAGE: &str = "200";

/// DigitalOcean API client
pub struct DoClient {
    client: reqwest::Client,
    token: String,
    base_url: String,
}

impl DoClient {
    /// Create a client against the public API
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_base_url(token, DIGITALOCEAN_API_BASE)
    }

    /// Create a client against a custom base URL (e.g. a proxy)
    pub fn with_base_url(token: impl Into<String>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::new(),
            token: token.into(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn user_agent() -> String {
        format!("dom/{}", env!("CARGO_PKG_VERSION"))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .header(reqwest::header::USER_AGENT, Self::user_agent())
            .send()
            .await?;

        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    /// Fetch every page of a list endpoint
    async fn list_all<T: DeserializeOwned>(
        &self,
        path: &str,
        key: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>> {
        let mut url = reqwest::Url::parse(&self.url(path))
            .map_err(|e| DoError::InvalidConfig(format!("invalid API URL {}: {}", self.base_url, e)))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("per_page", PER_PAGE);
            for (name, value) in query {
                pairs.append_pair(name, value);
            }
        }

        let mut items = Vec::new();
        let mut next = Some(url.to_string());

        while let Some(current) = next.take() {
            let page: Value = self.get_json(&current).await?;
            let (mut page_items, next_url) = parse_page::<T>(&page, key)?;
            items.append(&mut page_items);
            next = next_url.filter(|n| *n != current);
        }

        tracing::debug!("{}: {} items", key, items.len());
        Ok(items)
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let url = self.url(path);
        tracing::debug!("DELETE {}", url);

        let response = self
            .client
            .delete(&url)
            .bearer_auth(&self.token)
            .header(reqwest::header::USER_AGENT, Self::user_agent())
            .send()
            .await?;

        check_status(response).await?;
        Ok(())
    }
}

#[async_trait]
impl DoApi for DoClient {
    async fn get_account(&self) -> Result<Account> {
        let response: AccountResponse = self.get_json(&self.url("/account")).await?;
        Ok(response.account)
    }

    async fn get_balance(&self) -> Result<Balance> {
        self.get_json(&self.url("/customers/my/balance")).await
    }

    async fn list_droplets(&self, tag: Option<&str>) -> Result<Vec<Droplet>> {
        match tag {
            Some(tag) => {
                self.list_all("/droplets", "droplets", &[("tag_name", tag)])
                    .await
            }
            None => self.list_all("/droplets", "droplets", &[]).await,
        }
    }

    async fn list_volumes(&self) -> Result<Vec<Volume>> {
        self.list_all("/volumes", "volumes", &[]).await
    }

    async fn list_domains(&self) -> Result<Vec<Domain>> {
        self.list_all("/domains", "domains", &[]).await
    }

    async fn list_domain_records(&self, domain: &str) -> Result<Vec<DomainRecord>> {
        let path = format!("/domains/{}/records", domain);
        self.list_all(&path, "domain_records", &[]).await
    }

    async fn list_firewalls(&self) -> Result<Vec<Firewall>> {
        self.list_all("/firewalls", "firewalls", &[]).await
    }

    async fn list_load_balancers(&self) -> Result<Vec<LoadBalancer>> {
        self.list_all("/load_balancers", "load_balancers", &[]).await
    }

    async fn list_database_clusters(&self) -> Result<Vec<DatabaseCluster>> {
        self.list_all("/databases", "databases", &[]).await
    }

    async fn list_kubernetes_clusters(&self) -> Result<Vec<KubernetesCluster>> {
        self.list_all("/kubernetes/clusters", "kubernetes_clusters", &[])
            .await
    }

    async fn list_apps(&self) -> Result<Vec<App>> {
        self.list_all("/apps", "apps", &[]).await
    }

    async fn list_snapshots(&self) -> Result<Vec<Snapshot>> {
        self.list_all("/snapshots", "snapshots", &[]).await
    }

    async fn list_reserved_ips(&self) -> Result<Vec<ReservedIp>> {
        self.list_all("/reserved_ips", "reserved_ips", &[]).await
    }

    async fn delete_volume(&self, id: &str) -> Result<()> {
        self.delete(&format!("/volumes/{}", id)).await
    }

    async fn delete_snapshot(&self, id: &str) -> Result<()> {
        self.delete(&format!("/snapshots/{}", id)).await
    }

    async fn delete_reserved_ip(&self, ip: &str) -> Result<()> {
        self.delete(&format!("/reserved_ips/{}", ip)).await
    }

    async fn delete_load_balancer(&self, id: &str) -> Result<()> {
        self.delete(&format!("/load_balancers/{}", id)).await
    }

    async fn droplet_action(&self, droplet_id: u64, action: DropletAction) -> Result<()> {
        let url = self.url(&format!("/droplets/{}/actions", droplet_id));
        tracing::debug!("POST {} type={}", url, action.as_str());

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .header(reqwest::header::USER_AGENT, Self::user_agent())
            .json(&serde_json::json!({ "type": action.as_str() }))
            .send()
            .await?;

        check_status(response).await?;
        Ok(())
    }
}

/// Turn a non-2xx response into `DoError::Api`
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(DoError::Api {
        status: status.as_u16(),
        message: error_message(&body, status.canonical_reason()),
    })
}

/// Prefer the `message` field of an API error body
fn error_message(body: &str, reason: Option<&str>) -> String {
    if let Ok(error) = serde_json::from_str::<ApiErrorBody>(body)
        && let Some(message) = error.message.filter(|m| !m.is_empty())
    {
        return message;
    }

    let body = body.trim();
    if !body.is_empty() {
        return body.to_string();
    }
    reason.unwrap_or("Unknown error").to_string()
}

/// Split one page into its items and the next page URL
fn parse_page<T: DeserializeOwned>(page: &Value, key: &str) -> Result<(Vec<T>, Option<String>)> {
    let items = match page.get(key) {
        Some(Value::Null) | None => Vec::new(),
        Some(value) => serde_json::from_value(value.clone())?,
    };

    let next = page
        .pointer("/links/pages/next")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    Ok((items, next))
}

// ============ API Types ============

#[derive(Debug, Deserialize)]
struct AccountResponse {
    #[serde(default)]
    account: Account,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[allow(dead_code)]
    id: Option<String>,
    message: Option<String>,
}
