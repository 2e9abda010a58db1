pub mod ansible;
pub mod audit;
pub mod cleanup;
pub mod costs;
pub mod export;
pub mod status;
pub mod terraform;

use colored::Colorize;
use dom_tools::{ToolCommand, ToolError, exit_code};

/// コマンドラインを表示してから実行し、子プロセスの終了コードを返す
pub async fn run_tool(command: &ToolCommand) -> anyhow::Result<i32> {
    println!("{}\n", format!("$ {}", command.command_line()).dimmed());
    let status = command.status().await?;
    Ok(exit_code(status))
}

/// 入力ファイル不足などのエラーを案内付きで表示し、終了コード1を返す
pub fn report_tool_error(err: &ToolError) -> i32 {
    eprintln!("{} {}", "Error:".red().bold(), err);

    if let ToolError::PlaybookNotFound { available, .. } = err {
        eprintln!("\nAvailable playbooks:");
        for name in available {
            eprintln!("  - {}", name);
        }
    }
    if let Some(hint) = err.export_hint() {
        eprintln!("Run '{}' first", hint);
    }
    1
}
