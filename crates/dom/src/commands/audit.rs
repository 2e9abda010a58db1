use crate::utils::{Cell, Table, error_line, heading, none_found, status_color};
use colored::{Color, Colorize};
use dom_cloud::{
    App, DatabaseCluster, DoApi, Domain, DomainRecord, Droplet, Firewall, KubernetesCluster,
    LoadBalancer, PLACEHOLDER, Volume,
};
use std::fmt::Write as _;

/// 一覧表示（audit all / TUI と同じ列）
pub fn render_droplets(droplets: &[Droplet]) -> String {
    if droplets.is_empty() {
        return format!("{}\n", none_found("droplets"));
    }

    let mut table = Table::new(&["ID", "Name", "Region", "Size", "IP", "Status"]);
    for d in droplets {
        table.row(vec![
            Cell::new(d.id.to_string()).color(Color::Cyan),
            Cell::new(d.name.clone()).color(Color::Green),
            d.region_slug().into(),
            d.size_slug.clone().into(),
            d.first_ipv4().unwrap_or(PLACEHOLDER).into(),
            Cell::new(d.status.as_str()).color(status_color(d.status.as_str())),
        ]);
    }
    table.render()
}

/// 詳細表示（audit droplets）
pub fn render_droplet_details(droplets: &[Droplet]) -> String {
    if droplets.is_empty() {
        return format!("{}\n", none_found("droplets"));
    }

    let mut table = Table::new(&[
        "ID", "Name", "Region", "Size", "vCPUs", "Memory", "Disk", "IP", "Status", "Tags",
    ]);
    for d in droplets {
        table.row(vec![
            Cell::new(d.id.to_string()).color(Color::Cyan),
            Cell::new(d.name.clone()).color(Color::Green),
            d.region_slug().into(),
            d.size_slug.clone().into(),
            d.vcpus.to_string().into(),
            format!("{} MB", d.memory).into(),
            format!("{} GB", d.disk).into(),
            d.first_ipv4().unwrap_or(PLACEHOLDER).into(),
            Cell::new(d.status.as_str()).color(status_color(d.status.as_str())),
            d.tags_label().into(),
        ]);
    }

    let mut out = table.render();
    let _ = writeln!(
        out,
        "\n{}",
        format!("Total: {} droplets", droplets.len()).dimmed()
    );
    out
}

pub fn render_volumes(volumes: &[Volume]) -> String {
    if volumes.is_empty() {
        return format!("{}\n", none_found("volumes"));
    }

    let mut table = Table::new(&["ID", "Name", "Size (GB)", "Region", "Attached To"]);
    for v in volumes {
        table.row(vec![
            Cell::new(v.id.clone()).color(Color::Cyan),
            Cell::new(v.name.clone()).color(Color::Green),
            v.size_gigabytes.to_string().into(),
            v.region_slug().into(),
            v.attached_label().into(),
        ]);
    }
    table.render()
}

pub fn render_domain_names(domains: &[Domain]) -> String {
    if domains.is_empty() {
        return format!("{}\n", none_found("domains"));
    }
    bullets(domains.iter().map(|d| d.name.clone()))
}

pub fn render_records(records: &[DomainRecord]) -> String {
    if records.is_empty() {
        return format!("{}\n", none_found("records"));
    }

    let mut table = Table::new(&["Type", "Name", "Data", "TTL"]);
    for r in records {
        table.row(vec![
            Cell::new(r.record_type.clone()).color(Color::Cyan),
            Cell::new(r.name.clone()).color(Color::Green),
            r.data.clone().into(),
            r.ttl
                .map(|t| t.to_string())
                .unwrap_or_else(|| PLACEHOLDER.to_string())
                .into(),
        ]);
    }
    table.render()
}

pub fn render_firewall_names(firewalls: &[Firewall]) -> String {
    if firewalls.is_empty() {
        return format!("{}\n", none_found("firewalls"));
    }
    bullets(
        firewalls
            .iter()
            .map(|fw| format!("{} ({} droplets)", fw.name, fw.droplet_ids.len())),
    )
}

/// ファイアウォールごとのルール詳細（audit firewalls）
pub fn render_firewall_rules(firewalls: &[Firewall]) -> String {
    if firewalls.is_empty() {
        return format!("{}\n", none_found("firewalls"));
    }

    let mut out = String::new();
    for fw in firewalls {
        let _ = writeln!(out, "\n{} ({})", fw.name.bold(), fw.id);
        let _ = writeln!(out, "  Droplets: {}", fw.droplet_ids.len());

        if !fw.inbound_rules.is_empty() {
            let _ = writeln!(out, "  {}", "Inbound:".green());
            for rule in &fw.inbound_rules {
                let _ = writeln!(
                    out,
                    "    {}:{} from {}",
                    rule.protocol,
                    rule.ports,
                    rule.sources.describe()
                );
            }
        }
        if !fw.outbound_rules.is_empty() {
            let _ = writeln!(out, "  {}", "Outbound:".yellow());
            for rule in &fw.outbound_rules {
                let _ = writeln!(
                    out,
                    "    {}:{} to {}",
                    rule.protocol,
                    rule.ports,
                    rule.destinations.describe()
                );
            }
        }
    }
    out
}

pub fn render_load_balancers(load_balancers: &[LoadBalancer]) -> String {
    if load_balancers.is_empty() {
        return format!("{}\n", none_found("load balancers"));
    }
    bullets(
        load_balancers
            .iter()
            .map(|lb| format!("{} ({}) - {}", lb.name, or_placeholder(&lb.ip), lb.status)),
    )
}

pub fn render_databases(databases: &[DatabaseCluster]) -> String {
    if databases.is_empty() {
        return format!("{}\n", none_found("database clusters"));
    }

    let mut table = Table::new(&["Name", "Engine", "Size", "Region", "Status"]);
    for db in databases {
        table.row(vec![
            Cell::new(db.name.clone()).color(Color::Green),
            db.engine_label().into(),
            or_placeholder(&db.size).into(),
            or_placeholder(&db.region).into(),
            Cell::new(db.status.clone()).color(status_color(&db.status)),
        ]);
    }
    table.render()
}

pub fn render_kubernetes(clusters: &[KubernetesCluster]) -> String {
    if clusters.is_empty() {
        return format!("{}\n", none_found("kubernetes clusters"));
    }

    let mut table = Table::new(&["Name", "Region", "Version", "Nodes", "Status"]);
    for k in clusters {
        table.row(vec![
            Cell::new(k.name.clone()).color(Color::Green),
            or_placeholder(&k.region).into(),
            or_placeholder(&k.version).into(),
            k.node_count().to_string().into(),
            Cell::new(k.state()).color(status_color(k.state())),
        ]);
    }
    table.render()
}

pub fn render_apps(apps: &[App]) -> String {
    if apps.is_empty() {
        return format!("{}\n", none_found("apps"));
    }
    bullets(apps.iter().map(|app| {
        let url = app
            .live_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .unwrap_or("no url");
        format!("{} - {}", app.name(), url)
    }))
}

fn bullets(items: impl Iterator<Item = String>) -> String {
    items.map(|item| format!("  - {}\n", item)).collect()
}

fn or_placeholder(value: &str) -> &str {
    if value.is_empty() { PLACEHOLDER } else { value }
}

fn section<T>(out: &mut String, title: &str, result: dom_cloud::Result<Vec<T>>, render: fn(&[T]) -> String) {
    let _ = writeln!(out, "\n{}", heading(title));
    match result {
        Ok(items) => out.push_str(&render(&items)),
        Err(e) => {
            tracing::warn!("{} の取得に失敗: {}", title, e);
            let _ = writeln!(out, "  {}", error_line(e));
        }
    }
}

/// 全リソースの一覧。セクションごとにエラーを表示して続行する
pub async fn audit_all_report(api: &dyn DoApi) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n{}", "DigitalOcean Resource Audit".bold());

    section(&mut out, "Droplets", api.list_droplets(None).await, render_droplets);
    section(&mut out, "Volumes", api.list_volumes().await, render_volumes);
    section(&mut out, "Domains", api.list_domains().await, render_domain_names);
    section(&mut out, "Firewalls", api.list_firewalls().await, render_firewall_names);
    section(
        &mut out,
        "Load Balancers",
        api.list_load_balancers().await,
        render_load_balancers,
    );
    section(
        &mut out,
        "Database Clusters",
        api.list_database_clusters().await,
        render_databases,
    );
    section(
        &mut out,
        "Kubernetes Clusters",
        api.list_kubernetes_clusters().await,
        render_kubernetes,
    );
    section(&mut out, "Apps (App Platform)", api.list_apps().await, render_apps);

    out
}

pub async fn handle_all(api: &dyn DoApi) -> anyhow::Result<()> {
    println!("{}", audit_all_report(api).await);
    Ok(())
}

/// audit droplets: タグはAPIに渡し、リージョンはクライアント側で絞り込む
pub async fn handle_droplets(
    api: &dyn DoApi,
    region: Option<&str>,
    tag: Option<&str>,
) -> anyhow::Result<()> {
    let droplets = fetch_droplets(api, region, tag).await?;
    print!("{}", render_droplet_details(&droplets));
    Ok(())
}

pub async fn fetch_droplets(
    api: &dyn DoApi,
    region: Option<&str>,
    tag: Option<&str>,
) -> anyhow::Result<Vec<Droplet>> {
    let mut droplets = api.list_droplets(tag).await?;
    if let Some(region) = region {
        droplets.retain(|d| d.region_slug() == region);
    }
    Ok(droplets)
}

/// audit domains: ドメインごとにレコード表
pub async fn domains_report(api: &dyn DoApi) -> anyhow::Result<String> {
    let domains = api.list_domains().await?;
    if domains.is_empty() {
        return Ok(format!("{}\n", none_found("domains")));
    }

    let mut out = String::new();
    for domain in &domains {
        let _ = writeln!(out, "\n{}", domain.name.bold());
        let records = api.list_domain_records(&domain.name).await?;
        out.push_str(&render_records(&records));
    }
    Ok(out)
}

pub async fn handle_domains(api: &dyn DoApi) -> anyhow::Result<()> {
    println!("{}", domains_report(api).await?);
    Ok(())
}

pub async fn handle_firewalls(api: &dyn DoApi) -> anyhow::Result<()> {
    let firewalls = api.list_firewalls().await?;
    println!("{}", render_firewall_rules(&firewalls));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeApi;
    use dom_cloud::{
        AppSpec, ClusterStatus, FirewallTarget, InboundRule, NetworkV4, Networks, NodePool,
        OutboundRule, Region,
    };

    fn droplet(id: u64, name: &str, region: &str, ip: Option<&str>) -> Droplet {
        Droplet {
            id,
            name: name.into(),
            region: Some(Region {
                slug: region.into(),
                name: String::new(),
            }),
            size_slug: "s-1vcpu-1gb".into(),
            memory: 1024,
            vcpus: 1,
            disk: 25,
            networks: Networks {
                v4: ip
                    .map(|ip| NetworkV4 {
                        ip_address: ip.into(),
                        kind: "public".into(),
                    })
                    .into_iter()
                    .collect(),
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_results() {
        colored::control::set_override(false);
        assert_eq!(render_droplets(&[]), "No droplets found\n");
        assert_eq!(render_volumes(&[]), "No volumes found\n");
        assert_eq!(render_databases(&[]), "No database clusters found\n");
        assert_eq!(render_load_balancers(&[]), "No load balancers found\n");
        assert_eq!(render_apps(&[]), "No apps found\n");
    }

    #[test]
    fn test_missing_ip_and_region_render_placeholder() {
        colored::control::set_override(false);
        let mut d = droplet(7, "bare", "nyc3", None);
        d.region = None;

        let rendered = render_droplets(&[d]);
        let row = rendered.lines().nth(2).unwrap();
        let cols: Vec<&str> = row.split_whitespace().collect();
        assert_eq!(cols, vec!["7", "bare", "-", "s-1vcpu-1gb", "-", "unknown"]);
    }

    #[test]
    fn test_droplet_details_footer() {
        colored::control::set_override(false);
        let rendered = render_droplet_details(&[
            droplet(1, "a", "nyc3", Some("203.0.113.1")),
            droplet(2, "b", "ams3", None),
        ]);
        assert!(rendered.contains("1024 MB"));
        assert!(rendered.contains("25 GB"));
        assert!(rendered.trim_end().ends_with("Total: 2 droplets"));
    }

    #[test]
    fn test_firewall_rules() {
        colored::control::set_override(false);
        let fw = Firewall {
            id: "fw-1".into(),
            name: "web".into(),
            droplet_ids: vec![1, 2],
            inbound_rules: vec![
                InboundRule {
                    protocol: "tcp".into(),
                    ports: "22".into(),
                    sources: FirewallTarget {
                        addresses: vec!["0.0.0.0/0".into()],
                        ..Default::default()
                    },
                },
                InboundRule {
                    protocol: "tcp".into(),
                    ports: "5432".into(),
                    sources: FirewallTarget {
                        droplet_ids: vec![9],
                        ..Default::default()
                    },
                },
            ],
            outbound_rules: vec![OutboundRule {
                protocol: "udp".into(),
                ports: "all".into(),
                destinations: FirewallTarget::default(),
            }],
            ..Default::default()
        };

        let rendered = render_firewall_rules(std::slice::from_ref(&fw));
        assert!(rendered.contains("web (fw-1)"));
        assert!(rendered.contains("  Droplets: 2"));
        assert!(rendered.contains("    tcp:22 from 0.0.0.0/0"));
        assert!(rendered.contains("    tcp:5432 from droplets 9"));
        assert!(rendered.contains("    udp:all to any"));
        assert_eq!(render_firewall_names(&[fw]), "  - web (2 droplets)\n");
    }

    #[test]
    fn test_kubernetes_and_apps() {
        colored::control::set_override(false);
        let cluster = KubernetesCluster {
            name: "k8s".into(),
            region: "fra1".into(),
            version: "1.29.1-do.0".into(),
            status: Some(ClusterStatus {
                state: "running".into(),
            }),
            node_pools: vec![
                NodePool {
                    count: 2,
                    ..Default::default()
                },
                NodePool {
                    count: 3,
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let rendered = render_kubernetes(&[cluster]);
        let cols: Vec<&str> = rendered.lines().nth(2).unwrap().split_whitespace().collect();
        assert_eq!(cols, vec!["k8s", "fra1", "1.29.1-do.0", "5", "running"]);

        let apps = vec![
            App {
                spec: Some(AppSpec { name: "site".into() }),
                live_url: Some("https://site.example".into()),
                ..Default::default()
            },
            App {
                spec: Some(AppSpec { name: "worker".into() }),
                ..Default::default()
            },
        ];
        assert_eq!(
            render_apps(&apps),
            "  - site - https://site.example\n  - worker - no url\n"
        );
    }

    #[tokio::test]
    async fn test_audit_all_continues_after_section_error() {
        colored::control::set_override(false);
        let api = FakeApi {
            droplets: vec![droplet(1, "web-1", "nyc3", Some("203.0.113.1"))],
            domains: vec![Domain {
                name: "example.com".into(),
                ttl: None,
            }],
            ..Default::default()
        }
        .fail("volumes");

        let report = audit_all_report(&api).await;
        assert!(report.contains("web-1"));
        assert!(report.contains("Volumes\n  Error: API error (500): boom"));
        assert!(report.contains("  - example.com"));
        assert!(report.contains("No firewalls found"));
        assert!(report.contains("No apps found"));
    }

    #[tokio::test]
    async fn test_region_filter_is_client_side() {
        let api = FakeApi {
            droplets: vec![
                droplet(1, "a", "nyc3", None),
                droplet(2, "b", "ams3", None),
            ],
            ..Default::default()
        };

        let filtered = fetch_droplets(&api, Some("ams3"), None).await.unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "b");
        assert_eq!(api.fetches(), vec!["droplets"]);
    }

    #[tokio::test]
    async fn test_single_command_propagates_error() {
        let api = FakeApi::default().fail("droplets");
        assert!(fetch_droplets(&api, None, None).await.is_err());
    }

    #[tokio::test]
    async fn test_domains_report() {
        colored::control::set_override(false);
        let mut api = FakeApi {
            domains: vec![Domain {
                name: "example.com".into(),
                ttl: Some(1800),
            }],
            ..Default::default()
        };
        api.records.insert(
            "example.com".into(),
            vec![DomainRecord {
                id: 1,
                record_type: "A".into(),
                name: "@".into(),
                data: "203.0.113.1".into(),
                ttl: Some(3600),
            }],
        );

        let report = domains_report(&api).await.unwrap();
        assert!(report.contains("example.com"));
        assert!(report.contains("Type  Name  Data         TTL"));
        assert!(report.contains("A     @     203.0.113.1  3600"));
    }
}
