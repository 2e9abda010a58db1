mod client;
mod commands;
#[cfg(test)]
mod testing;
mod tui;
mod utils;

use clap::{Args, Parser, Subcommand};
use commands::cleanup::{CleanupOptions, CleanupTarget};
use dom_config::Settings;
use dom_tools::ToolCommand;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dom")]
#[command(
    about = "DigitalOcean Infrastructure Manager - Audit, manage and export your DO resources.",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// リソースの棚卸し
    #[command(subcommand)]
    Audit(AuditCommands),
    /// コストの確認と見積もり
    #[command(subcommand)]
    Costs(CostsCommands),
    /// 未使用リソースの検出と削除
    #[command(subcommand)]
    Cleanup(CleanupCommands),
    /// Ansible/Terraform 用ファイルを生成
    #[command(subcommand)]
    Export(ExportCommands),
    /// Ansible ラッパー
    #[command(subcommand)]
    Ansible(AnsibleCommands),
    /// Terraform ラッパー
    #[command(subcommand)]
    Terraform(TerraformCommands),
    /// バージョン情報を表示
    Version,
    /// アカウント状態とリソース数を表示
    Status,
    /// インタラクティブなリソースブラウザを起動
    Tui,
}

#[derive(Subcommand)]
enum AuditCommands {
    /// 全リソースの概要
    All,
    /// ドロップレットの詳細一覧
    Droplets {
        /// リージョンで絞り込み (例: nyc1)
        #[arg(short, long)]
        region: Option<String>,
        /// タグで絞り込み
        #[arg(short, long)]
        tag: Option<String>,
    },
    /// ドメインとDNSレコード
    Domains,
    /// ファイアウォールとルール
    Firewalls,
}

#[derive(Subcommand)]
enum CostsCommands {
    /// 残高と今月の利用額
    Summary,
    /// 月額コストの見積もり
    Estimate,
    /// タグ別のコスト
    ByTag,
}

/// 削除系コマンドの共通フラグ
#[derive(Args, Debug, Clone, Copy)]
struct CleanupFlags {
    /// 一覧表示のみ（デフォルト）
    #[arg(long, overrides_with = "execute")]
    dry_run: bool,
    /// 実際に削除する
    #[arg(long, overrides_with = "dry_run")]
    execute: bool,
    /// 確認プロンプトを省略
    #[arg(short, long)]
    force: bool,
}

impl From<CleanupFlags> for CleanupOptions {
    fn from(flags: CleanupFlags) -> Self {
        CleanupOptions {
            dry_run: flags.dry_run || !flags.execute,
            force: flags.force,
        }
    }
}

#[derive(Subcommand)]
enum CleanupCommands {
    /// 全カテゴリを検出
    All {
        #[command(flatten)]
        flags: CleanupFlags,
    },
    /// 未接続のボリューム
    Volumes {
        #[command(flatten)]
        flags: CleanupFlags,
    },
    /// 古いスナップショット
    Snapshots {
        /// この日数より古いものを対象にする
        #[arg(short = 'd', long = "older-than", default_value = "90")]
        days: u32,
        #[command(flatten)]
        flags: CleanupFlags,
    },
    /// 未割り当ての予約IP
    Ips {
        #[command(flatten)]
        flags: CleanupFlags,
    },
    /// バックエンドの無いロードバランサー
    LoadBalancers {
        #[command(flatten)]
        flags: CleanupFlags,
    },
}

impl CleanupCommands {
    fn into_target(self) -> (CleanupTarget, CleanupOptions) {
        match self {
            CleanupCommands::All { flags } => (CleanupTarget::All, flags.into()),
            CleanupCommands::Volumes { flags } => (CleanupTarget::Volumes, flags.into()),
            CleanupCommands::Snapshots { days, flags } => {
                (CleanupTarget::Snapshots { days }, flags.into())
            }
            CleanupCommands::Ips { flags } => (CleanupTarget::ReservedIps, flags.into()),
            CleanupCommands::LoadBalancers { flags } => {
                (CleanupTarget::LoadBalancers, flags.into())
            }
        }
    }
}

#[derive(Subcommand)]
enum ExportCommands {
    /// ドロップレットから Ansible インベントリを生成
    Ansible,
    /// Terraform のリソース定義と import スクリプトを生成
    Terraform,
}

#[derive(Subcommand)]
pub enum AnsibleCommands {
    /// ホストへの疎通確認
    Ping {
        /// 対象ホストまたはグループ
        #[arg(default_value = "all")]
        host: String,
    },
    /// プレイブックを実行
    Play {
        /// プレイブック名 (playbooks/ 配下、.yml は省略可)
        playbook: String,
        /// 対象ホストを制限
        #[arg(short, long, default_value = "all")]
        limit: String,
        /// ドライラン (--check)
        #[arg(short = 'C', long)]
        check: bool,
    },
    /// インベントリファイルを表示
    Inventory,
    /// インベントリのホスト一覧
    List,
    /// ホストの facts を取得
    Facts {
        /// 対象ホスト
        host: String,
    },
    /// シェルコマンドを実行
    Shell {
        /// 実行するコマンド
        command: String,
        /// 対象ホストまたはグループ
        #[arg(short = 'H', long, default_value = "all")]
        host: String,
    },
    /// 利用可能なプレイブック一覧
    Playbooks,
}

#[derive(Subcommand)]
pub enum TerraformCommands {
    /// terraform init
    Init,
    /// terraform plan
    Plan,
    /// terraform apply
    Apply {
        /// 確認を省略 (-auto-approve)
        #[arg(short, long)]
        yes: bool,
    },
    /// terraform destroy
    Destroy {
        /// 確認を省略 (-auto-approve)
        #[arg(short, long)]
        yes: bool,
    },
    /// terraform output
    Output,
    /// terraform state list
    State,
    /// terraform fmt -recursive
    Fmt,
    /// terraform validate
    Validate,
    /// generated/import.sh を実行して既存リソースを取り込む
    Import,
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// ログ出力を初期化（TUIは画面を壊さないよう一時ファイルへ）
fn init_tracing(tui: bool) {
    if tui {
        let path = std::env::temp_dir().join("dom-tui.log");
        if let Ok(file) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
        {
            tracing_subscriber::fmt()
                .with_writer(std::sync::Mutex::new(file))
                .with_env_filter(env_filter())
                .with_ansi(false)
                .init();
        }
        return;
    }

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(env_filter())
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(matches!(cli.command, Commands::Tui));

    // Versionコマンドは設定ファイル不要
    if matches!(cli.command, Commands::Version) {
        println!("dom version {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let settings = dom_config::load_settings()?;
    tracing::debug!("Settings: {:?}", settings);

    let code = run(cli.command, &settings).await?;
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}

/// コマンドを実行し、プロセスの終了コードを返す
async fn run(command: Commands, settings: &Settings) -> anyhow::Result<i32> {
    match command {
        Commands::Version => {
            unreachable!("Version is handled before config loading");
        }
        // ラッパーはトークン不要
        Commands::Ansible(cmd) => commands::ansible::handle(cmd, settings).await,
        Commands::Terraform(cmd) => commands::terraform::handle(cmd, settings).await,
        command => {
            let api = client::get_client(settings)?;
            run_api(command, &api, settings).await
        }
    }
}

async fn run_api(
    command: Commands,
    api: &dom_cloud::DoClient,
    settings: &Settings,
) -> anyhow::Result<i32> {
    match command {
        Commands::Audit(cmd) => match cmd {
            AuditCommands::All => commands::audit::handle_all(api).await?,
            AuditCommands::Droplets { region, tag } => {
                commands::audit::handle_droplets(api, region.as_deref(), tag.as_deref()).await?
            }
            AuditCommands::Domains => commands::audit::handle_domains(api).await?,
            AuditCommands::Firewalls => commands::audit::handle_firewalls(api).await?,
        },
        Commands::Costs(cmd) => match cmd {
            CostsCommands::Summary => commands::costs::handle_summary(api).await?,
            CostsCommands::Estimate => commands::costs::handle_estimate(api).await?,
            CostsCommands::ByTag => commands::costs::handle_by_tag(api).await?,
        },
        Commands::Cleanup(cmd) => {
            let (target, options) = cmd.into_target();
            commands::cleanup::run(api, target, options).await?;
        }
        Commands::Export(cmd) => match cmd {
            ExportCommands::Ansible => {
                commands::export::ansible(api, settings).await?;
            }
            ExportCommands::Terraform => {
                commands::export::terraform(api, settings).await?;
            }
        },
        Commands::Status => commands::status::handle(api).await?,
        Commands::Tui => {
            if let Some(target) = tui::run(api, &settings.ssh_user).await? {
                return commands::run_tool(&ToolCommand::new("ssh", ".").arg(target)).await;
            }
        }
        Commands::Version | Commands::Ansible(_) | Commands::Terraform(_) => {
            unreachable!("handled without an API client");
        }
    }
    Ok(0)
}
