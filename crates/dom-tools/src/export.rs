//! Export renderers
//!
//! Turn fetched resources into the files the wrappers consume: an Ansible
//! INI inventory, Terraform resource blocks for the current account, and the
//! `import.sh` that binds those blocks to the existing resources.

use crate::error::Result;
use dom_cloud::{Domain, Droplet, Volume};
use std::collections::{BTreeMap, HashSet};
use std::fmt::Write as _;
use std::path::Path;

/// Terraform file holding the exported resource blocks, in the Terraform root
pub const RESOURCES_FILE: &str = "dom_resources.tf";

/// Provider requirements, written only when absent
pub const PROVIDER_FILE: &str = "provider.tf";

const HEADER: &str = "Generated by dom export. Edits are overwritten on the next export.";

/// Ansible INI inventory with an `[all]` group, one group per tag, and the SSH user
///
/// Hosts use the public IPv4, else the first IPv4. Droplets without any
/// address are listed as a comment only.
pub fn render_inventory(droplets: &[Droplet], ssh_user: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {}", HEADER);
    let _ = writeln!(out, "[all]");

    let mut groups: BTreeMap<String, Vec<&str>> = BTreeMap::new();
    for droplet in droplets {
        let Some(ip) = droplet.public_ipv4().or_else(|| droplet.first_ipv4()) else {
            let _ = writeln!(out, "# {} has no IPv4 address", droplet.name);
            continue;
        };
        let _ = writeln!(out, "{} ansible_host={}", droplet.name, ip);

        for tag in &droplet.tags {
            groups
                .entry(group_name(tag))
                .or_default()
                .push(droplet.name.as_str());
        }
    }

    for (group, hosts) in &groups {
        let _ = writeln!(out, "\n[{}]", group);
        for host in hosts {
            let _ = writeln!(out, "{}", host);
        }
    }

    let _ = writeln!(out, "\n[all:vars]");
    let _ = writeln!(out, "ansible_user={}", ssh_user);
    out
}

/// Tag to a valid Ansible group name: letters, digits and `_`, not starting with a digit
pub fn group_name(tag: &str) -> String {
    let mut name: String = tag
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert_str(0, "tag_");
    }
    name
}

/// Unique Terraform resource labels per resource type
#[derive(Debug, Default)]
pub struct ResourceNames {
    taken: HashSet<String>,
}

impl ResourceNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sanitized label for `resource_type`, suffixed `_2`, `_3`, ... on collision
    pub fn assign(&mut self, resource_type: &str, name: &str) -> String {
        let base = resource_label(name);
        let mut candidate = base.clone();
        let mut n = 1;
        while !self.taken.insert(format!("{}.{}", resource_type, candidate)) {
            n += 1;
            candidate = format!("{}_{}", base, n);
        }
        candidate
    }
}

/// Lowercase letters, digits, `_` and `-`; must start with a letter or `_`
pub fn resource_label(name: &str) -> String {
    let mut label: String = name
        .to_ascii_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '_' | '-' => c,
            _ => '_',
        })
        .collect();
    if !label.starts_with(|c: char| c.is_ascii_lowercase() || c == '_') {
        label.insert(0, '_');
    }
    label
}

/// One exported resource: `<type>.<label>` bound to a provider id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportTarget {
    pub address: String,
    pub id: String,
}

/// Terraform blocks plus the matching import targets
#[derive(Debug, Clone, Default)]
pub struct TerraformExport {
    pub resources: String,
    pub imports: Vec<ImportTarget>,
}

impl TerraformExport {
    pub fn import_script(&self) -> String {
        render_import_script(&self.imports)
    }
}

/// Render `digitalocean_droplet`, `digitalocean_volume` and `digitalocean_domain` blocks
pub fn render_terraform(droplets: &[Droplet], volumes: &[Volume], domains: &[Domain]) -> TerraformExport {
    let mut names = ResourceNames::new();
    let mut export = TerraformExport::default();
    let out = &mut export.resources;
    let _ = writeln!(out, "# {}", HEADER);

    for droplet in droplets {
        let label = names.assign("digitalocean_droplet", &droplet.name);
        let _ = writeln!(out, "\nresource \"digitalocean_droplet\" \"{}\" {{", label);
        let _ = writeln!(out, "  name   = {}", hcl_string(&droplet.name));
        let _ = writeln!(out, "  region = {}", hcl_string(droplet.region_slug()));
        let _ = writeln!(out, "  size   = {}", hcl_string(&droplet.size_slug));
        match droplet.image.as_ref().and_then(|i| i.slug.as_deref()) {
            Some(slug) => {
                let _ = writeln!(out, "  image  = {}", hcl_string(slug));
            }
            None => {
                let _ = writeln!(out, "  # image has no public slug: {}", droplet.image_label());
            }
        }
        if !droplet.tags.is_empty() {
            let tags: Vec<String> = droplet.tags.iter().map(|t| hcl_string(t)).collect();
            let _ = writeln!(out, "  tags   = [{}]", tags.join(", "));
        }
        let _ = writeln!(out, "\n  lifecycle {{\n    ignore_changes = [image]\n  }}");
        let _ = writeln!(out, "}}");

        export.imports.push(ImportTarget {
            address: format!("digitalocean_droplet.{}", label),
            id: droplet.id.to_string(),
        });
    }

    for volume in volumes {
        let label = names.assign("digitalocean_volume", &volume.name);
        let _ = writeln!(out, "\nresource \"digitalocean_volume\" \"{}\" {{", label);
        let _ = writeln!(out, "  name   = {}", hcl_string(&volume.name));
        let _ = writeln!(out, "  region = {}", hcl_string(volume.region_slug()));
        let _ = writeln!(out, "  size   = {}", volume.size_gigabytes);
        if let Some(description) = volume.description.as_deref().filter(|d| !d.is_empty()) {
            let _ = writeln!(out, "  description = {}", hcl_string(description));
        }
        let _ = writeln!(out, "}}");

        export.imports.push(ImportTarget {
            address: format!("digitalocean_volume.{}", label),
            id: volume.id.clone(),
        });
    }

    for domain in domains {
        let label = names.assign("digitalocean_domain", &domain.name);
        let _ = writeln!(out, "\nresource \"digitalocean_domain\" \"{}\" {{", label);
        let _ = writeln!(out, "  name = {}", hcl_string(&domain.name));
        let _ = writeln!(out, "}}");

        export.imports.push(ImportTarget {
            address: format!("digitalocean_domain.{}", label),
            id: domain.name.clone(),
        });
    }

    export
}

/// `#!/bin/sh` followed by one `terraform import <address> <id>` per target
pub fn render_import_script(imports: &[ImportTarget]) -> String {
    let mut out = String::from("#!/bin/sh\n");
    let _ = writeln!(out, "# {}", HEADER);
    for target in imports {
        let _ = writeln!(out, "terraform import {} {}", target.address, shell_quote(&target.id));
    }
    out
}

pub fn render_provider() -> String {
    format!(
        "# {}\nterraform {{\n  required_providers {{\n    digitalocean = {{\n      source = \"digitalocean/digitalocean\"\n    }}\n  }}\n}}\n\nprovider \"digitalocean\" {{}}\n",
        HEADER
    )
}

fn hcl_string(value: &str) -> String {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace("${", "$${")
        .replace("%{", "%%{");
    format!("\"{}\"", escaped)
}

fn shell_quote(value: &str) -> String {
    if value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        value.to_string()
    } else {
        format!("'{}'", value.replace('\'', "'\\''"))
    }
}

/// Write `content` to `path`, creating parent directories
pub fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    tracing::info!("Wrote {}", path.display());
    Ok(())
}
