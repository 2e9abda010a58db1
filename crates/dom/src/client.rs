use colored::Colorize;
use dom_cloud::DoClient;
use dom_config::{ConfigError, Settings};

/// 認証済みのAPIクライアントを取得
///
/// トークンが無い場合は案内を表示して終了コード1で終了する（API呼び出しは行わない）。
pub fn get_client(settings: &Settings) -> anyhow::Result<DoClient> {
    match dom_config::resolve_token() {
        Ok(token) => Ok(DoClient::with_base_url(token, settings.api_url.clone())),
        Err(ConfigError::TokenNotFound) => {
            eprintln!("{} {}", "Error:".red().bold(), ConfigError::TokenNotFound);
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_get_client_uses_fallback_token() {
        temp_env::with_vars(
            [("DIGITALOCEAN_TOKEN", None), ("DO_TOKEN", Some("fallback"))],
            || {
                let settings = Settings {
                    api_url: "http://localhost:8080/v2".to_string(),
                    ..Default::default()
                };
                let client = get_client(&settings).unwrap();
                assert_eq!(client.base_url(), "http://localhost:8080/v2");
            },
        );
    }
}
