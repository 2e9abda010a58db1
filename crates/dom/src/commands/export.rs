use colored::Colorize;
use dom_cloud::DoApi;
use dom_config::Settings;
use dom_tools::ansible::{INVENTORY_DIR, INVENTORY_FILES};
use dom_tools::export::{self, PROVIDER_FILE, RESOURCES_FILE};
use dom_tools::terraform::{GENERATED_DIR, IMPORT_SCRIPT};
use std::path::PathBuf;

/// dom export ansible: ドロップレットから inventory.ini を生成
pub async fn ansible(api: &dyn DoApi, settings: &Settings) -> anyhow::Result<PathBuf> {
    let droplets = api.list_droplets(None).await?;
    let content = export::render_inventory(&droplets, &settings.ssh_user);

    let path = settings
        .ansible_dir
        .join(INVENTORY_DIR)
        .join(INVENTORY_FILES[0]);
    export::write_file(&path, &content)?;

    println!(
        "{} {} ({} hosts)",
        "✓ Wrote".green(),
        path.display().to_string().cyan(),
        droplets.len()
    );
    println!("  Next: {}", "dom ansible ping".cyan());
    Ok(path)
}

/// dom export terraform: リソース定義と import.sh を生成
pub async fn terraform(api: &dyn DoApi, settings: &Settings) -> anyhow::Result<Vec<PathBuf>> {
    let droplets = api.list_droplets(None).await?;
    let volumes = api.list_volumes().await?;
    let domains = api.list_domains().await?;

    let rendered = export::render_terraform(&droplets, &volumes, &domains);
    let root = &settings.terraform_dir;
    let mut written = Vec::new();

    // 既存の provider.tf は上書きしない
    let provider = root.join(PROVIDER_FILE);
    if !provider.exists() {
        export::write_file(&provider, &export::render_provider())?;
        written.push(provider);
    }

    let resources = root.join(RESOURCES_FILE);
    export::write_file(&resources, &rendered.resources)?;
    written.push(resources);

    let script = root.join(GENERATED_DIR).join(IMPORT_SCRIPT);
    export::write_file(&script, &rendered.import_script())?;
    written.push(script);

    for path in &written {
        println!("{} {}", "✓ Wrote".green(), path.display().to_string().cyan());
    }
    println!(
        "  {} resources ({} droplets, {} volumes, {} domains)",
        rendered.imports.len(),
        droplets.len(),
        volumes.len(),
        domains.len()
    );
    println!(
        "  Next: {} then {}",
        "dom terraform init".cyan(),
        "dom terraform import".cyan()
    );
    Ok(written)
}
