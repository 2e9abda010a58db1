use super::{report_tool_error, run_tool};
use crate::TerraformCommands;
use colored::Colorize;
use dom_config::Settings;
use dom_tools::{ImportStep, Terraform, TerraformCommand};

pub async fn handle(cmd: TerraformCommands, settings: &Settings) -> anyhow::Result<i32> {
    let terraform = Terraform::new(&settings.terraform_dir);

    let command = match cmd {
        TerraformCommands::Init => TerraformCommand::Init,
        TerraformCommands::Plan => TerraformCommand::Plan,
        TerraformCommands::Apply { yes } => TerraformCommand::Apply { auto_approve: yes },
        TerraformCommands::Destroy { yes } => TerraformCommand::Destroy { auto_approve: yes },
        TerraformCommands::Output => TerraformCommand::Output,
        TerraformCommands::State => TerraformCommand::StateList,
        TerraformCommands::Fmt => TerraformCommand::Fmt,
        TerraformCommands::Validate => TerraformCommand::Validate,
        TerraformCommands::Import => return import(&terraform).await,
    };

    run_tool(&terraform.command(command)).await
}

/// generated/import.sh を1行ずつ実行。失敗した行は警告して続行
async fn import(terraform: &Terraform) -> anyhow::Result<i32> {
    let script = match terraform.import_script() {
        Ok(path) => path,
        Err(e) => return Ok(report_tool_error(&e)),
    };

    println!("{}\n", format!("Running {}", script.display()).bold());

    let report = terraform
        .replay_import(|step| match step {
            ImportStep::Running(line) => println!("{}", format!("$ {}", line).dimmed()),
            ImportStep::Failed(_) => println!("{}", "Warning: command failed".yellow()),
        })
        .await?;

    println!();
    if report.failed.is_empty() {
        println!("{}", format!("✓ {} import commands completed", report.ran).green());
    } else {
        println!(
            "{}",
            format!(
                "{} of {} import commands failed",
                report.failed.len(),
                report.ran
            )
            .yellow()
        );
    }
    Ok(0)
}
