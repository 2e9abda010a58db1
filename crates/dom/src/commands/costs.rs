use crate::utils::{Cell, Table, heading, money};
use colored::{Color, Colorize};
use dom_cloud::pricing::{self, TagCosts};
use dom_cloud::{Balance, DatabaseCluster, DoApi, Droplet, Volume};
use std::fmt::Write as _;

const NOT_AVAILABLE: &str = "N/A";

pub fn render_balance(balance: &Balance) -> String {
    let field = |v: &Option<String>| v.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string());

    let mut out = String::new();
    let _ = writeln!(out, "\n{}\n", "Account Balance".bold());
    let _ = writeln!(out, "  Month-to-date balance: ${}", field(&balance.month_to_date_balance));
    let _ = writeln!(out, "  Account balance: ${}", field(&balance.account_balance));
    let _ = writeln!(out, "  Month-to-date usage: ${}", field(&balance.month_to_date_usage));
    let _ = writeln!(out, "  Generated at: {}", field(&balance.generated_at));
    out
}

pub async fn handle_summary(api: &dyn DoApi) -> anyhow::Result<()> {
    let balance = api.get_balance().await?;
    println!("{}", render_balance(&balance));
    Ok(())
}

/// 見積もり表と合計。データベースは取得できなかった場合 None（セクションを省略）
pub fn render_estimate(
    droplets: &[Droplet],
    volumes: &[Volume],
    databases: Option<&[DatabaseCluster]>,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n{}", "Estimated Monthly Costs".bold());

    if !droplets.is_empty() {
        let mut table = Table::new(&["Name", "Size", "Est. Monthly"]);
        for d in droplets {
            table.row(vec![
                Cell::new(d.name.clone()).color(Color::Green),
                d.size_slug.clone().into(),
                money(pricing::droplet_monthly_price(d)).into(),
            ]);
        }
        let _ = writeln!(out, "\n{}", heading("Droplets"));
        out.push_str(&table.render());
    }

    if !volumes.is_empty() {
        let mut table = Table::new(&["Name", "Size (GB)", "Est. Monthly"]);
        for v in volumes {
            table.row(vec![
                Cell::new(v.name.clone()).color(Color::Green),
                v.size_gigabytes.to_string().into(),
                money(pricing::volume_monthly_price(v)).into(),
            ]);
        }
        let _ = writeln!(
            out,
            "\n{}",
            heading(&format!("Volumes ({}/GB/month)", money(pricing::VOLUME_PRICE_PER_GB)))
        );
        out.push_str(&table.render());
    }

    let databases = databases.unwrap_or_default();
    if !databases.is_empty() {
        let mut table = Table::new(&["Name", "Engine", "Size", "Est. Monthly"]);
        for db in databases {
            table.row(vec![
                Cell::new(db.name.clone()).color(Color::Green),
                db.engine.clone().into(),
                db.size.clone().into(),
                format!("{}+", money(pricing::database_monthly_price(db))).into(),
            ]);
        }
        let _ = writeln!(out, "\n{}", heading("Database Clusters"));
        out.push_str(&table.render());
    }

    let total = pricing::estimate_total(droplets, volumes, databases);
    let _ = writeln!(
        out,
        "\n{}",
        format!("Estimated Total: {}/month", money(total)).bold()
    );
    let _ = writeln!(
        out,
        "{}",
        "Note: Estimates are approximate. Check billing for actual costs.".dimmed()
    );
    out
}

pub async fn handle_estimate(api: &dyn DoApi) -> anyhow::Result<()> {
    let droplets = api.list_droplets(None).await?;
    let volumes = api.list_volumes().await?;
    let databases = match api.list_database_clusters().await {
        Ok(dbs) => Some(dbs),
        Err(e) => {
            tracing::warn!("データベースクラスタの取得に失敗したため見積もりから除外: {}", e);
            None
        }
    };

    println!("{}", render_estimate(&droplets, &volumes, databases.as_deref()));
    Ok(())
}

pub fn render_by_tag(costs: &TagCosts) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n{}\n", "Costs by Tag".bold());

    if costs.tags.is_empty() {
        let _ = writeln!(out, "{}", "No tagged resources found".dimmed());
        return out;
    }

    let mut table = Table::new(&["Tag", "Est. Monthly"]);
    for (tag, cost) in &costs.tags {
        table.row(vec![Cell::new(tag.clone()).color(Color::Cyan), money(*cost).into()]);
    }
    if costs.untagged > 0.0 {
        table.row(vec![
            Cell::new("untagged").color(Color::BrightBlack),
            money(costs.untagged).into(),
        ]);
    }
    out.push_str(&table.render());
    out
}

pub async fn handle_by_tag(api: &dyn DoApi) -> anyhow::Result<()> {
    let droplets = api.list_droplets(None).await?;
    println!("{}", render_by_tag(&pricing::costs_by_tag(&droplets)));
    Ok(())
}
