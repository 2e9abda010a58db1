//! ansible / ansible-playbook wrapper
//!
//! Commands run with the Ansible root as working directory, so inventory
//! and playbook paths are passed relative to it.

use crate::error::{Result, ToolError};
use crate::process::ToolCommand;
use std::path::{Path, PathBuf};

pub const INVENTORY_DIR: &str = "inventory";
pub const PLAYBOOKS_DIR: &str = "playbooks";

/// Inventory file names in lookup order
pub const INVENTORY_FILES: [&str; 2] = ["inventory.ini", "inventory.yml"];

/// A playbook and the description taken from its leading `#` comment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playbook {
    pub name: String,
    pub description: Option<String>,
}

/// Ansible project rooted at a directory (default `./ansible`)
#[derive(Debug, Clone)]
pub struct Ansible {
    root: PathBuf,
}

impl Ansible {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn inventory_dir(&self) -> PathBuf {
        self.root.join(INVENTORY_DIR)
    }

    pub fn playbooks_dir(&self) -> PathBuf {
        self.root.join(PLAYBOOKS_DIR)
    }

    /// `inventory.ini` if present, else `inventory.yml`
    ///
    /// Returned relative to the root.
    pub fn find_inventory(&self) -> Result<PathBuf> {
        let dir = self.inventory_dir();
        INVENTORY_FILES
            .iter()
            .find(|name| dir.join(name).is_file())
            .map(|name| Path::new(INVENTORY_DIR).join(name))
            .ok_or(ToolError::InventoryNotFound(dir))
    }

    /// Inventory path joined onto the root, for reading its contents
    pub fn inventory_path(&self) -> Result<PathBuf> {
        Ok(self.root.join(self.find_inventory()?))
    }

    /// `playbooks/<name>`, else `playbooks/<name>.yml`, relative to the root
    pub fn resolve_playbook(&self, name: &str) -> Result<PathBuf> {
        let dir = self.playbooks_dir();
        let with_ext = format!("{}.yml", name);

        [name, with_ext.as_str()]
            .into_iter()
            .find(|candidate| dir.join(candidate).is_file())
            .map(|found| Path::new(PLAYBOOKS_DIR).join(found))
            .ok_or_else(|| ToolError::PlaybookNotFound {
                name: name.to_string(),
                available: self
                    .list_playbooks()
                    .unwrap_or_default()
                    .into_iter()
                    .map(|p| p.name)
                    .collect(),
            })
    }

    /// `*.yml` files in the playbooks directory, sorted by name
    pub fn list_playbooks(&self) -> Result<Vec<Playbook>> {
        let pattern = self.playbooks_dir().join("*.yml");
        let pattern = pattern.to_string_lossy();

        let mut playbooks = Vec::new();
        let paths = glob::glob(&pattern).map_err(|e| {
            ToolError::IoError(std::io::Error::new(std::io::ErrorKind::InvalidInput, e))
        })?;

        for path in paths.flatten() {
            let Some(name) = path.file_name().map(|n| n.to_string_lossy().to_string()) else {
                continue;
            };
            let content = std::fs::read_to_string(&path)?;
            playbooks.push(Playbook {
                name,
                description: description_from(&content),
            });
        }

        playbooks.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(playbooks)
    }

    fn ansible(&self, inventory: &Path, pattern: &str) -> ToolCommand {
        ToolCommand::new("ansible", &self.root)
            .arg("-i")
            .arg(inventory.to_string_lossy())
            .arg(pattern)
    }

    /// `ansible -i <inv> <host> -m ping`
    pub fn ping(&self, host: &str) -> Result<ToolCommand> {
        let inventory = self.find_inventory()?;
        Ok(self.ansible(&inventory, host).args(["-m", "ping"]))
    }

    /// `ansible-playbook -i <inv> <playbook> [--limit H] [--check]`
    ///
    /// A limit of `all` is the same as no limit and is left out.
    pub fn play(&self, playbook: &str, limit: &str, check: bool) -> Result<ToolCommand> {
        let inventory = self.find_inventory()?;
        let playbook = self.resolve_playbook(playbook)?;

        let mut cmd = ToolCommand::new("ansible-playbook", &self.root)
            .arg("-i")
            .arg(inventory.to_string_lossy())
            .arg(playbook.to_string_lossy());
        if limit != "all" {
            cmd = cmd.args(["--limit", limit]);
        }
        if check {
            cmd = cmd.arg("--check");
        }
        Ok(cmd)
    }

    /// `ansible -i <inv> all --list-hosts`
    pub fn list_hosts(&self) -> Result<ToolCommand> {
        let inventory = self.find_inventory()?;
        Ok(self.ansible(&inventory, "all").arg("--list-hosts"))
    }

    /// `ansible -i <inv> <host> -m setup`
    pub fn facts(&self, host: &str) -> Result<ToolCommand> {
        let inventory = self.find_inventory()?;
        Ok(self.ansible(&inventory, host).args(["-m", "setup"]))
    }

    /// `ansible -i <inv> <host> -m shell -a <command>`
    pub fn shell(&self, command: &str, host: &str) -> Result<ToolCommand> {
        let inventory = self.find_inventory()?;
        Ok(self
            .ansible(&inventory, host)
            .args(["-m", "shell", "-a", command]))
    }
}

fn description_from(content: &str) -> Option<String> {
    content
        .lines()
        .next()
        .map(str::trim)
        .and_then(|line| line.strip_prefix('#'))
        .map(|rest| rest.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn project() -> (tempfile::TempDir, Ansible) {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("inventory")).unwrap();
        fs::create_dir_all(tmp.path().join("playbooks")).unwrap();
        let ansible = Ansible::new(tmp.path());
        (tmp, ansible)
    }

    #[test]
    fn test_inventory_missing() {
        let (tmp, ansible) = project();

        let err = ansible.ping("all").unwrap_err();
        assert!(matches!(&err, ToolError::InventoryNotFound(dir) if *dir == tmp.path().join("inventory")));
        assert_eq!(err.export_hint(), Some("dom export ansible"));
    }

    #[test]
    fn test_inventory_prefers_ini() {
        let (tmp, ansible) = project();
        fs::write(tmp.path().join("inventory/inventory.yml"), "all: {}\n").unwrap();
        assert_eq!(
            ansible.find_inventory().unwrap(),
            PathBuf::from("inventory/inventory.yml")
        );

        fs::write(tmp.path().join("inventory/inventory.ini"), "[all]\n").unwrap();
        assert_eq!(
            ansible.find_inventory().unwrap(),
            PathBuf::from("inventory/inventory.ini")
        );
    }

    #[test]
    fn test_ping_args() {
        let (tmp, ansible) = project();
        fs::write(tmp.path().join("inventory/inventory.ini"), "[all]\n").unwrap();

        let cmd = ansible.ping("web").unwrap();
        assert_eq!(cmd.program, "ansible");
        assert_eq!(cmd.cwd, tmp.path());
        assert_eq!(cmd.command_line(), "ansible -i inventory/inventory.ini web -m ping");
    }

    #[test]
    fn test_play_resolves_extension_and_flags() {
        let (tmp, ansible) = project();
        fs::write(tmp.path().join("inventory/inventory.ini"), "[all]\n").unwrap();
        fs::write(tmp.path().join("playbooks/setup-base.yml"), "- hosts: all\n").unwrap();

        let cmd = ansible.play("setup-base", "all", false).unwrap();
        assert_eq!(
            cmd.command_line(),
            "ansible-playbook -i inventory/inventory.ini playbooks/setup-base.yml"
        );

        let cmd = ansible.play("setup-base.yml", "web-1", true).unwrap();
        assert_eq!(
            cmd.args,
            vec![
                "-i",
                "inventory/inventory.ini",
                "playbooks/setup-base.yml",
                "--limit",
                "web-1",
                "--check"
            ]
        );
    }

    #[test]
    fn test_play_not_found_lists_available() {
        let (tmp, ansible) = project();
        fs::write(tmp.path().join("inventory/inventory.ini"), "[all]\n").unwrap();
        fs::write(tmp.path().join("playbooks/b.yml"), "").unwrap();
        fs::write(tmp.path().join("playbooks/a.yml"), "").unwrap();
        fs::write(tmp.path().join("playbooks/notes.txt"), "").unwrap();

        match ansible.play("deploy", "all", false) {
            Err(ToolError::PlaybookNotFound { name, available }) => {
                assert_eq!(name, "deploy");
                assert_eq!(available, vec!["a.yml", "b.yml"]);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_shell_and_facts() {
        let (tmp, ansible) = project();
        fs::write(tmp.path().join("inventory/inventory.yml"), "all: {}\n").unwrap();

        assert_eq!(
            ansible.shell("uptime -p", "all").unwrap().args,
            vec!["-i", "inventory/inventory.yml", "all", "-m", "shell", "-a", "uptime -p"]
        );
        assert_eq!(
            ansible.facts("db").unwrap().command_line(),
            "ansible -i inventory/inventory.yml db -m setup"
        );
        assert_eq!(
            ansible.list_hosts().unwrap().command_line(),
            "ansible -i inventory/inventory.yml all --list-hosts"
        );
    }

    #[test]
    fn test_list_playbooks_descriptions() {
        let (tmp, ansible) = project();
        fs::write(
            tmp.path().join("playbooks/setup-base.yml"),
            "# Base packages and users\n- hosts: all\n",
        )
        .unwrap();
        fs::write(tmp.path().join("playbooks/plain.yml"), "- hosts: all\n").unwrap();

        let playbooks = ansible.list_playbooks().unwrap();
        assert_eq!(
            playbooks,
            vec![
                Playbook {
                    name: "plain.yml".into(),
                    description: None,
                },
                Playbook {
                    name: "setup-base.yml".into(),
                    description: Some("Base packages and users".into()),
                },
            ]
        );
    }

    #[test]
    fn test_list_playbooks_without_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let ansible = Ansible::new(tmp.path().join("missing"));
        assert!(ansible.list_playbooks().unwrap().is_empty());
    }
}
