use super::{report_tool_error, run_tool};
use crate::AnsibleCommands;
use crate::utils::{Cell, Table};
use colored::{Color, Colorize};
use dom_config::Settings;
use dom_tools::Ansible;

pub async fn handle(cmd: AnsibleCommands, settings: &Settings) -> anyhow::Result<i32> {
    let ansible = Ansible::new(&settings.ansible_dir);

    let command = match cmd {
        AnsibleCommands::Ping { host } => ansible.ping(&host),
        AnsibleCommands::Play {
            playbook,
            limit,
            check,
        } => ansible.play(&playbook, &limit, check),
        AnsibleCommands::List => ansible.list_hosts(),
        AnsibleCommands::Facts { host } => ansible.facts(&host),
        AnsibleCommands::Shell { command, host } => ansible.shell(&command, &host),
        AnsibleCommands::Inventory => return show_inventory(&ansible),
        AnsibleCommands::Playbooks => return list_playbooks(&ansible),
    };

    match command {
        Ok(command) => run_tool(&command).await,
        Err(e) => Ok(report_tool_error(&e)),
    }
}

/// インベントリファイルの内容を表示
fn show_inventory(ansible: &Ansible) -> anyhow::Result<i32> {
    let path = match ansible.inventory_path() {
        Ok(path) => path,
        Err(e) => return Ok(report_tool_error(&e)),
    };

    let content = std::fs::read_to_string(&path)?;
    println!("\n{} {}\n", "Inventory:".bold(), path.display());
    println!("{}", content);
    Ok(0)
}

fn list_playbooks(ansible: &Ansible) -> anyhow::Result<i32> {
    println!(
        "\n{} {}\n",
        "Available Playbooks:".bold(),
        ansible.playbooks_dir().display()
    );

    let playbooks = ansible.list_playbooks()?;
    if playbooks.is_empty() {
        println!("{}", "No playbooks found".dimmed());
        return Ok(0);
    }

    let mut table = Table::new(&["Playbook", "Description"]);
    for playbook in playbooks {
        table.row(vec![
            Cell::new(playbook.name).color(Color::Green),
            playbook.description.unwrap_or_else(|| "-".to_string()).into(),
        ]);
    }
    print!("{}", table.render());
    Ok(0)
}
