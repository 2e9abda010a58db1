pub mod error;
pub mod settings;

pub use error::*;
pub use settings::*;

use std::path::PathBuf;

/// トークンを探す環境変数（優先順）
pub const TOKEN_ENV_VARS: [&str; 2] = ["DIGITALOCEAN_TOKEN", "DO_TOKEN"];

/// domの設定ディレクトリを取得 (~/.config/dom)
pub fn get_config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or(ConfigError::ConfigDirNotFound)?
        .join("dom");
    Ok(config_dir)
}

/// DigitalOcean APIトークンを環境変数から解決する
///
/// DIGITALOCEAN_TOKEN → DO_TOKEN の順で確認し、空文字列は未設定として扱う。
/// トークンの正当性はここでは検証しない（最初のAPI呼び出しで判明する）。
pub fn resolve_token() -> Result<String> {
    TOKEN_ENV_VARS
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|value| !value.trim().is_empty())
        .ok_or(ConfigError::TokenNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_get_config_dir() {
        let config_dir = get_config_dir().unwrap();
        assert!(config_dir.ends_with("dom"));
    }

    #[test]
    #[serial]
    fn test_resolve_token_primary_wins() {
        temp_env::with_vars(
            [
                ("DIGITALOCEAN_TOKEN", Some("primary")),
                ("DO_TOKEN", Some("fallback")),
            ],
            || {
                assert_eq!(resolve_token().unwrap(), "primary");
            },
        );
    }

    #[test]
    #[serial]
    fn test_resolve_token_fallback() {
        temp_env::with_vars(
            [
                ("DIGITALOCEAN_TOKEN", None),
                ("DO_TOKEN", Some("fallback")),
            ],
            || {
                assert_eq!(resolve_token().unwrap(), "fallback");
            },
        );
    }

    #[test]
    #[serial]
    fn test_resolve_token_empty_is_unset() {
        temp_env::with_vars(
            [("DIGITALOCEAN_TOKEN", Some("")), ("DO_TOKEN", Some("tok"))],
            || {
                assert_eq!(resolve_token().unwrap(), "tok");
            },
        );
    }

    #[test]
    #[serial]
    fn test_resolve_token_missing() {
        temp_env::with_vars(
            [("DIGITALOCEAN_TOKEN", None::<&str>), ("DO_TOKEN", None)],
            || {
                let err = resolve_token().unwrap_err();
                assert!(matches!(err, ConfigError::TokenNotFound));
                assert!(err.to_string().contains("export DIGITALOCEAN_TOKEN="));
            },
        );
    }
}
