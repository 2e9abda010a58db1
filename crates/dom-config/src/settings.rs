//! ユーザー設定 (~/.config/dom/config.yaml)

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_API_URL: &str = "https://api.digitalocean.com/v2";

/// 設定ファイルの内容。すべてのキーは省略可能
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// APIのベースURL
    pub api_url: String,
    /// Ansibleのルートディレクトリ (inventory/, playbooks/ を含む)
    pub ansible_dir: PathBuf,
    /// Terraformのルートディレクトリ (generated/ を含む)
    pub terraform_dir: PathBuf,
    /// TUIからSSH接続する際のユーザー
    pub ssh_user: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            ansible_dir: PathBuf::from("ansible"),
            terraform_dir: PathBuf::from("terraform"),
            ssh_user: "root".to_string(),
        }
    }
}

impl Settings {
    /// 環境変数による上書きを適用（設定ファイルより優先）
    pub fn apply_env_overrides(&mut self) {
        if let Some(url) = non_empty_env("DIGITALOCEAN_API_URL") {
            self.api_url = url;
        }
        if let Some(dir) = non_empty_env("DOM_ANSIBLE_DIR") {
            self.ansible_dir = PathBuf::from(dir);
        }
        if let Some(dir) = non_empty_env("DOM_TERRAFORM_DIR") {
            self.terraform_dir = PathBuf::from(dir);
        }
        if let Some(user) = non_empty_env("DOM_SSH_USER") {
            self.ssh_user = user;
        }
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// 設定ファイルを探す
///
/// 1. 環境変数 DOM_CONFIG_PATH (直接パス指定)
/// 2. ~/.config/dom/config.yaml
pub fn find_settings_file() -> Option<PathBuf> {
    if let Ok(config_path) = std::env::var("DOM_CONFIG_PATH") {
        let path = PathBuf::from(config_path);
        if path.exists() {
            return Some(path);
        }
    }

    let global = crate::get_config_dir().ok()?.join("config.yaml");
    global.exists().then_some(global)
}

/// 設定を読み込む。ファイルがなければデフォルト値を使う
pub fn load_settings() -> Result<Settings> {
    let mut settings = match find_settings_file() {
        Some(path) => {
            tracing::debug!("Loading settings from {}", path.display());
            load_settings_from(&path)?
        }
        None => Settings::default(),
    };
    settings.apply_env_overrides();
    Ok(settings)
}

/// 指定パスの設定ファイルを読み込む
pub fn load_settings_from(path: &Path) -> Result<Settings> {
    let content = std::fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(Settings::default());
    }
    serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
