use colored::Colorize;
use dom_cloud::DoApi;
use std::fmt::Write as _;

/// アカウント情報と主要リソースの件数
pub async fn status_report(api: &dyn DoApi) -> anyhow::Result<String> {
    let account = api.get_account().await?;
    let droplets = api.list_droplets(None).await?;
    let volumes = api.list_volumes().await?;
    let domains = api.list_domains().await?;

    let mut out = String::new();
    let _ = writeln!(out, "\n{}\n", "DigitalOcean Account Status".bold());
    let _ = writeln!(out, "  Email: {}", account.email);
    let _ = writeln!(out, "  Status: {}", account.status);
    let _ = writeln!(out, "  Droplet Limit: {}", account.droplet_limit);

    let _ = writeln!(out, "\n{}", "Resources:".bold());
    let _ = writeln!(out, "  Droplets: {}", droplets.len());
    let _ = writeln!(out, "  Volumes: {}", volumes.len());
    let _ = writeln!(out, "  Domains: {}", domains.len());
    Ok(out)
}

pub async fn handle(api: &dyn DoApi) -> anyhow::Result<()> {
    println!("{}", status_report(api).await?);
    Ok(())
}
