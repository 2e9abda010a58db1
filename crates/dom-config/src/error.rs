use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("設定ディレクトリが見つかりません")]
    ConfigDirNotFound,

    #[error(
        "DIGITALOCEAN_TOKEN or DO_TOKEN environment variable not set.\n\
        Export your token: export DIGITALOCEAN_TOKEN='your-token-here'"
    )]
    TokenNotFound,

    #[error("設定ファイルの解析に失敗しました {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("IO エラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
