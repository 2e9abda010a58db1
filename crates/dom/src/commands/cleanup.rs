use crate::utils::{Cell, Table, error_line, heading, money};
use chrono::Utc;
use colored::{Color, Colorize};
use dom_cloud::{DoApi, LoadBalancer, ReservedIp, Snapshot, Volume, cleanup, pricing};
use std::fmt::Write as _;

/// 削除の確認プロンプト（テストでは差し替える）
pub type Confirm<'a> = &'a mut dyn FnMut(&str) -> anyhow::Result<bool>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanupOptions {
    /// true の間は一覧表示のみ（--dry-run がデフォルト、--execute で解除）
    pub dry_run: bool,
    /// 確認プロンプトを省略
    pub force: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrphanKind {
    Volume,
    Snapshot,
    ReservedIp,
    LoadBalancer,
}

/// 削除候補
#[derive(Debug, Clone, PartialEq)]
pub struct Orphan {
    pub kind: OrphanKind,
    pub id: String,
    pub name: String,
}

impl Orphan {
    fn volume(v: &Volume) -> Self {
        Self {
            kind: OrphanKind::Volume,
            id: v.id.clone(),
            name: v.name.clone(),
        }
    }

    fn snapshot(s: &Snapshot) -> Self {
        Self {
            kind: OrphanKind::Snapshot,
            id: s.id.clone(),
            name: s.name.clone(),
        }
    }

    fn reserved_ip(ip: &ReservedIp) -> Self {
        Self {
            kind: OrphanKind::ReservedIp,
            id: ip.ip.clone(),
            name: ip.ip.clone(),
        }
    }

    fn load_balancer(lb: &LoadBalancer) -> Self {
        Self {
            kind: OrphanKind::LoadBalancer,
            id: lb.id.clone(),
            name: lb.name.clone(),
        }
    }

    async fn delete(&self, api: &dyn DoApi) -> dom_cloud::Result<()> {
        match self.kind {
            OrphanKind::Volume => api.delete_volume(&self.id).await,
            OrphanKind::Snapshot => api.delete_snapshot(&self.id).await,
            OrphanKind::ReservedIp => api.delete_reserved_ip(&self.id).await,
            OrphanKind::LoadBalancer => api.delete_load_balancer(&self.id).await,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupOutcome {
    /// 候補なし
    Clean,
    DryRun,
    Aborted,
    Deleted { deleted: usize, failed: usize },
}

/// 候補を1件ずつ削除する。失敗しても残りを続行
pub async fn delete_orphans(
    api: &dyn DoApi,
    orphans: &[Orphan],
    noun: &str,
    options: CleanupOptions,
    confirm: Confirm<'_>,
) -> anyhow::Result<CleanupOutcome> {
    if orphans.is_empty() {
        return Ok(CleanupOutcome::Clean);
    }

    if options.dry_run {
        println!("\n{}", "DRY RUN - use --execute to delete".yellow());
        return Ok(CleanupOutcome::DryRun);
    }

    if !options.force && !confirm(&format!("Delete {} {}?", orphans.len(), noun))? {
        println!("{}", "Aborted".dimmed());
        return Ok(CleanupOutcome::Aborted);
    }

    let mut deleted = 0;
    let mut failed = 0;
    for orphan in orphans {
        match orphan.delete(api).await {
            Ok(()) => {
                tracing::info!(kind = ?orphan.kind, id = %orphan.id, "deleted");
                println!("{} {}", "Deleted:".green(), orphan.name);
                deleted += 1;
            }
            Err(e) => {
                tracing::warn!(kind = ?orphan.kind, id = %orphan.id, "delete failed: {}", e);
                println!("{} {}", format!("Failed to delete {}:", orphan.name).red(), e);
                failed += 1;
            }
        }
    }

    Ok(CleanupOutcome::Deleted { deleted, failed })
}

pub fn render_volumes(volumes: &[&Volume]) -> String {
    let mut table = Table::new(&["ID", "Name", "Size (GB)", "Region", "Created", "Monthly Cost"]);
    for v in volumes {
        table.row(vec![
            Cell::new(v.id.clone()).color(Color::Cyan),
            Cell::new(v.name.clone()).color(Color::Green),
            v.size_gigabytes.to_string().into(),
            v.region_slug().into(),
            v.created_date().into(),
            money(pricing::volume_monthly_price(v)).into(),
        ]);
    }
    let savings: f64 = volumes.iter().map(|v| pricing::volume_monthly_price(v)).sum();

    let mut out = table.render();
    let _ = writeln!(out, "{}", savings_line(savings));
    out
}

pub fn render_snapshots(snapshots: &[&Snapshot]) -> String {
    let mut table = Table::new(&["ID", "Name", "Size (GB)", "Type", "Created"]);
    for s in snapshots {
        table.row(vec![
            Cell::new(s.id.clone()).color(Color::Cyan),
            Cell::new(s.name.clone()).color(Color::Green),
            s.size_gigabytes.to_string().into(),
            s.resource_type.clone().into(),
            s.created_date().into(),
        ]);
    }
    table.render()
}

pub fn render_reserved_ips(ips: &[&ReservedIp]) -> String {
    let mut table = Table::new(&["IP", "Region"]);
    for ip in ips {
        table.row(vec![
            Cell::new(ip.ip.clone()).color(Color::Cyan),
            ip.region_slug().into(),
        ]);
    }

    let mut out = table.render();
    let _ = writeln!(
        out,
        "{}",
        format!(
            "Reserved IPs cost {}/month when not attached",
            money(pricing::RESERVED_IP_PRICE)
        )
        .yellow()
    );
    let _ = writeln!(
        out,
        "{}",
        savings_line(ips.len() as f64 * pricing::RESERVED_IP_PRICE)
    );
    out
}

pub fn render_load_balancers(load_balancers: &[&LoadBalancer]) -> String {
    let mut table = Table::new(&["ID", "Name", "Region", "Status"]);
    for lb in load_balancers {
        table.row(vec![
            Cell::new(lb.id.clone()).color(Color::Cyan),
            Cell::new(lb.name.clone()).color(Color::Green),
            lb.region_slug().into(),
            lb.status.clone().into(),
        ]);
    }

    let mut out = table.render();
    let _ = writeln!(
        out,
        "{}",
        format!(
            "Load balancers cost {}+/month",
            money(pricing::LOAD_BALANCER_PRICE)
        )
        .yellow()
    );
    let _ = writeln!(
        out,
        "{}",
        savings_line(load_balancers.len() as f64 * pricing::LOAD_BALANCER_PRICE)
    );
    out
}

fn savings_line(amount: f64) -> String {
    format!("Potential savings: {}/month", money(amount))
        .yellow()
        .to_string()
}

pub async fn volumes(
    api: &dyn DoApi,
    options: CleanupOptions,
    confirm: Confirm<'_>,
) -> anyhow::Result<CleanupOutcome> {
    let volumes = api.list_volumes().await?;
    let unattached = cleanup::unattached_volumes(&volumes);

    if unattached.is_empty() {
        println!("{}", "No unattached volumes found".green());
        return Ok(CleanupOutcome::Clean);
    }

    println!("\n{}", heading("Unattached Volumes"));
    print!("{}", render_volumes(&unattached));

    let orphans: Vec<Orphan> = unattached.iter().map(|v| Orphan::volume(v)).collect();
    delete_orphans(api, &orphans, "volumes", options, confirm).await
}

pub async fn snapshots(
    api: &dyn DoApi,
    days: u32,
    options: CleanupOptions,
    confirm: Confirm<'_>,
) -> anyhow::Result<CleanupOutcome> {
    let snapshots = api.list_snapshots().await?;
    let old = cleanup::snapshots_older_than(&snapshots, days, Utc::now());

    if old.is_empty() {
        println!("{}", format!("No snapshots older than {} days", days).green());
        return Ok(CleanupOutcome::Clean);
    }

    println!("\n{}", heading(&format!("Snapshots older than {} days", days)));
    print!("{}", render_snapshots(&old));

    let orphans: Vec<Orphan> = old.iter().map(|s| Orphan::snapshot(s)).collect();
    delete_orphans(api, &orphans, "snapshots", options, confirm).await
}

pub async fn reserved_ips(
    api: &dyn DoApi,
    options: CleanupOptions,
    confirm: Confirm<'_>,
) -> anyhow::Result<CleanupOutcome> {
    let ips = api.list_reserved_ips().await?;
    let unassigned = cleanup::unassigned_ips(&ips);

    if unassigned.is_empty() {
        println!("{}", "No unassigned reserved IPs found".green());
        return Ok(CleanupOutcome::Clean);
    }

    println!("\n{}", heading("Unassigned Reserved IPs"));
    print!("{}", render_reserved_ips(&unassigned));

    let orphans: Vec<Orphan> = unassigned.iter().map(|ip| Orphan::reserved_ip(ip)).collect();
    delete_orphans(api, &orphans, "reserved IPs", options, confirm).await
}

pub async fn load_balancers(
    api: &dyn DoApi,
    options: CleanupOptions,
    confirm: Confirm<'_>,
) -> anyhow::Result<CleanupOutcome> {
    let lbs = api.list_load_balancers().await?;
    let empty = cleanup::empty_load_balancers(&lbs);

    if empty.is_empty() {
        println!("{}", "No load balancers without backends found".green());
        return Ok(CleanupOutcome::Clean);
    }

    println!("\n{}", heading("Load Balancers with No Backends"));
    print!("{}", render_load_balancers(&empty));

    let orphans: Vec<Orphan> = empty.iter().map(|lb| Orphan::load_balancer(lb)).collect();
    delete_orphans(api, &orphans, "load balancers", options, confirm).await
}

/// 全カテゴリを集計。取得に失敗したカテゴリはエラーを表示してスキップ
pub async fn all(
    api: &dyn DoApi,
    options: CleanupOptions,
    confirm: Confirm<'_>,
) -> anyhow::Result<CleanupOutcome> {
    println!("\n{}", "Cleanup Analysis".bold());
    if options.dry_run {
        println!("{}", "DRY RUN - no changes will be made".yellow());
    }

    let mut orphans = Vec::new();

    match api.list_volumes().await {
        Ok(volumes) => {
            let unattached = cleanup::unattached_volumes(&volumes);
            if !unattached.is_empty() {
                println!("\n{}", heading("Unattached Volumes"));
                print!("{}", render_volumes(&unattached));
                orphans.extend(unattached.iter().map(|v| Orphan::volume(v)));
            }
        }
        Err(e) => report_skipped("volumes", e),
    }

    match api.list_snapshots().await {
        Ok(snapshots) => {
            let days = cleanup::DEFAULT_SNAPSHOT_AGE_DAYS;
            let old = cleanup::snapshots_older_than(&snapshots, days, Utc::now());
            if !old.is_empty() {
                println!("\n{}", heading(&format!("Snapshots older than {} days", days)));
                print!("{}", render_snapshots(&old));
                orphans.extend(old.iter().map(|s| Orphan::snapshot(s)));
            }
        }
        Err(e) => report_skipped("snapshots", e),
    }

    match api.list_reserved_ips().await {
        Ok(ips) => {
            let unassigned = cleanup::unassigned_ips(&ips);
            if !unassigned.is_empty() {
                println!("\n{}", heading("Unassigned Reserved IPs"));
                print!("{}", render_reserved_ips(&unassigned));
                orphans.extend(unassigned.iter().map(|ip| Orphan::reserved_ip(ip)));
            }
        }
        Err(e) => report_skipped("reserved IPs", e),
    }

    match api.list_load_balancers().await {
        Ok(lbs) => {
            let empty = cleanup::empty_load_balancers(&lbs);
            if !empty.is_empty() {
                println!("\n{}", heading("Load Balancers with No Backends"));
                print!("{}", render_load_balancers(&empty));
                orphans.extend(empty.iter().map(|lb| Orphan::load_balancer(lb)));
            }
        }
        Err(e) => report_skipped("load balancers", e),
    }

    if orphans.is_empty() {
        println!("\n{}", "No obvious cleanup opportunities found!".green());
        return Ok(CleanupOutcome::Clean);
    }

    if options.dry_run {
        return Ok(CleanupOutcome::DryRun);
    }
    delete_orphans(api, &orphans, "resources", options, confirm).await
}

fn report_skipped(category: &str, err: dom_cloud::DoError) {
    tracing::warn!("{} の取得に失敗: {}", category, err);
    println!("\n{} ({})", error_line(err), category);
}

/// CLIからの呼び出し（標準入力で確認）
pub async fn run(api: &dyn DoApi, target: CleanupTarget, options: CleanupOptions) -> anyhow::Result<()> {
    let mut confirm = |prompt: &str| crate::utils::confirm(prompt);
    match target {
        CleanupTarget::All => all(api, options, &mut confirm).await?,
        CleanupTarget::Volumes => volumes(api, options, &mut confirm).await?,
        CleanupTarget::Snapshots { days } => snapshots(api, days, options, &mut confirm).await?,
        CleanupTarget::ReservedIps => reserved_ips(api, options, &mut confirm).await?,
        CleanupTarget::LoadBalancers => load_balancers(api, options, &mut confirm).await?,
    };
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupTarget {
    All,
    Volumes,
    Snapshots { days: u32 },
    ReservedIps,
    LoadBalancers,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeApi;
    use dom_cloud::Region;

    const DRY_RUN: CleanupOptions = CleanupOptions {
        dry_run: true,
        force: false,
    };
    const EXECUTE_FORCE: CleanupOptions = CleanupOptions {
        dry_run: false,
        force: true,
    };
    const EXECUTE: CleanupOptions = CleanupOptions {
        dry_run: false,
        force: false,
    };

    fn volume(id: &str, attached: bool) -> Volume {
        Volume {
            id: id.into(),
            name: format!("vol-{}", id),
            size_gigabytes: 10,
            region: Some(Region {
                slug: "nyc3".into(),
                name: String::new(),
            }),
            droplet_ids: if attached { vec![1] } else { vec![] },
            ..Default::default()
        }
    }

    fn never_asked() -> impl FnMut(&str) -> anyhow::Result<bool> {
        |prompt: &str| -> anyhow::Result<bool> { panic!("unexpected prompt: {}", prompt) }
    }

    #[tokio::test]
    async fn test_nothing_unattached() {
        let api = FakeApi {
            volumes: vec![volume("a", true)],
            ..Default::default()
        };

        let outcome = volumes(&api, EXECUTE_FORCE, &mut never_asked()).await.unwrap();
        assert_eq!(outcome, CleanupOutcome::Clean);
        assert!(api.deleted().is_empty());
    }

    #[tokio::test]
    async fn test_dry_run_never_deletes() {
        let api = FakeApi {
            volumes: vec![volume("a", false), volume("b", false)],
            ..Default::default()
        };

        let outcome = volumes(&api, DRY_RUN, &mut never_asked()).await.unwrap();
        assert_eq!(outcome, CleanupOutcome::DryRun);
        assert!(api.deleted().is_empty());
    }

    #[tokio::test]
    async fn test_execute_force_deletes_each_and_continues_after_failure() {
        let mut api = FakeApi {
            volumes: vec![volume("a", false), volume("b", false), volume("c", false), volume("d", true)],
            ..Default::default()
        };
        api.undeletable.insert("b".into());

        let outcome = volumes(&api, EXECUTE_FORCE, &mut never_asked()).await.unwrap();
        assert_eq!(outcome, CleanupOutcome::Deleted { deleted: 2, failed: 1 });
        assert_eq!(api.deleted(), vec!["volume:a", "volume:c"]);
    }

    #[tokio::test]
    async fn test_prompt_declined() {
        let api = FakeApi {
            load_balancers: vec![LoadBalancer {
                id: "lb-1".into(),
                name: "idle".into(),
                ..Default::default()
            }],
            ..Default::default()
        };

        let mut prompts = Vec::new();
        let mut decline = |prompt: &str| -> anyhow::Result<bool> {
            prompts.push(prompt.to_string());
            Ok(false)
        };
        let outcome = load_balancers(&api, EXECUTE, &mut decline).await.unwrap();

        assert_eq!(outcome, CleanupOutcome::Aborted);
        assert_eq!(prompts, vec!["Delete 1 load balancers?"]);
        assert!(api.deleted().is_empty());
    }

    #[tokio::test]
    async fn test_prompt_accepted() {
        let api = FakeApi {
            reserved_ips: vec![
                ReservedIp {
                    ip: "198.51.100.7".into(),
                    ..Default::default()
                },
                ReservedIp {
                    ip: "198.51.100.8".into(),
                    droplet: Some(Default::default()),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };

        let mut accept = |_: &str| -> anyhow::Result<bool> { Ok(true) };
        let outcome = reserved_ips(&api, EXECUTE, &mut accept).await.unwrap();
        assert_eq!(outcome, CleanupOutcome::Deleted { deleted: 1, failed: 0 });
        assert_eq!(api.deleted(), vec!["ip:198.51.100.7"]);
    }

    #[tokio::test]
    async fn test_old_snapshots_deleted() {
        let api = FakeApi {
            snapshots: vec![
                Snapshot {
                    id: "old".into(),
                    created_at: "2001-01-01T00:00:00Z".into(),
                    ..Default::default()
                },
                Snapshot {
                    id: "fresh".into(),
                    created_at: Utc::now().to_rfc3339(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };

        let outcome = snapshots(&api, 30, EXECUTE_FORCE, &mut never_asked()).await.unwrap();
        assert_eq!(outcome, CleanupOutcome::Deleted { deleted: 1, failed: 0 });
        assert_eq!(api.deleted(), vec!["snapshot:old"]);
    }

    #[tokio::test]
    async fn test_huge_snapshot_threshold_reports_clean() {
        let api = FakeApi {
            snapshots: vec![Snapshot {
                id: "old".into(),
                created_at: "2001-01-01T00:00:00Z".into(),
                ..Default::default()
            }],
            ..Default::default()
        };

        let outcome = snapshots(&api, u32::MAX, EXECUTE_FORCE, &mut never_asked())
            .await
            .unwrap();
        assert_eq!(outcome, CleanupOutcome::Clean);
        assert!(api.deleted().is_empty());
    }

    #[tokio::test]
    async fn test_all_skips_failed_category_and_confirms_once() {
        let api = FakeApi {
            volumes: vec![volume("a", false)],
            load_balancers: vec![LoadBalancer {
                id: "lb-1".into(),
                ..Default::default()
            }],
            ..Default::default()
        }
        .fail("reserved_ips");

        let mut asked = 0;
        let mut accept = |prompt: &str| -> anyhow::Result<bool> {
            asked += 1;
            assert_eq!(prompt, "Delete 2 resources?");
            Ok(true)
        };
        let outcome = all(&api, EXECUTE, &mut accept).await.unwrap();

        assert_eq!(asked, 1);
        assert_eq!(outcome, CleanupOutcome::Deleted { deleted: 2, failed: 0 });
        assert_eq!(api.deleted(), vec!["volume:a", "lb:lb-1"]);
    }

    #[tokio::test]
    async fn test_all_clean() {
        let api = FakeApi::default();
        let outcome = all(&api, DRY_RUN, &mut never_asked()).await.unwrap();
        assert_eq!(outcome, CleanupOutcome::Clean);
    }

    #[test]
    fn test_savings() {
        colored::control::set_override(false);
        let a = volume("a", false);
        let b = Volume {
            size_gigabytes: 250,
            ..volume("b", false)
        };
        assert!(render_volumes(&[&a, &b]).contains("Potential savings: $26.00/month"));

        let lb = LoadBalancer::default();
        assert!(render_load_balancers(&[&lb, &lb]).contains("Potential savings: $24.00/month"));
    }
}
