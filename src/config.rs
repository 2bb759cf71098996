//! 設定とHTTP設定
//!
//! 優先順位: CLIフラグ > 環境変数 > `~/.extm/config.toml` > 既定値

use crate::env::EnvVar;
use crate::error::{ExtmError, Result};
use crate::strings::Lang;
use reqwest::Client;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 既定のレジストリURL
pub const DEFAULT_REGISTRY_URL: &str = "https://s3.amazonaws.com/repository.brackets.io/registry.json";

/// 既定のダウンロードホスト（末尾スラッシュ付き）
pub const DEFAULT_DOWNLOAD_HOST: &str = "https://s3.amazonaws.com/repository.brackets.io/";

/// HTTP設定
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// タイムアウト（秒）
    pub timeout: Option<Duration>,
    /// User-Agent
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(30)),
            user_agent: "extm-cli".to_string(),
        }
    }
}

impl HttpConfig {
    /// reqwest::Client を構築
    pub fn build_client(&self) -> Client {
        let mut builder = Client::builder().user_agent(&self.user_agent);

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        builder.build().unwrap_or_else(|_| Client::new())
    }
}

/// config.toml のスキーマ（すべて任意）
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    registry_url: Option<String>,
    download_host: Option<String>,
    extensions_dir: Option<PathBuf>,
    lang: Option<String>,
    timeout_secs: Option<u64>,
}

/// 解決済みの設定
#[derive(Debug, Clone)]
pub struct Config {
    pub registry_url: String,
    pub download_host: String,
    pub extensions_dir: PathBuf,
    pub lang: Lang,
    pub http: HttpConfig,
}

impl Config {
    /// 既定パス（~/.extm/config.toml）と環境変数から読み込む
    pub fn load() -> Result<Self> {
        let home = home_dir()?;
        let path = home.join(".extm").join("config.toml");
        let mut config = Self::load_from(&path, &home)?;
        config.apply_env();
        Ok(config)
    }

    /// 指定ファイルから読み込む（存在しなければ既定値）
    pub fn load_from(path: &Path, home: &Path) -> Result<Self> {
        let file = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str::<ConfigFile>(&content)
                .map_err(|e| ExtmError::Config(format!("{}: {}", path.display(), e)))?
        } else {
            ConfigFile::default()
        };

        let mut http = HttpConfig::default();
        if let Some(secs) = file.timeout_secs {
            http.timeout = Some(Duration::from_secs(secs));
        }

        Ok(Self {
            registry_url: file
                .registry_url
                .unwrap_or_else(|| DEFAULT_REGISTRY_URL.to_string()),
            download_host: normalize_host(
                file.download_host
                    .unwrap_or_else(|| DEFAULT_DOWNLOAD_HOST.to_string()),
            ),
            extensions_dir: file
                .extensions_dir
                .unwrap_or_else(|| home.join(".extm").join("extensions")),
            lang: file.lang.as_deref().map(Lang::from_locale).unwrap_or_default(),
            http,
        })
    }

    /// 環境変数による上書きを適用
    pub fn apply_env(&mut self) {
        if let Some(url) = EnvVar::get(EnvVar::REGISTRY_URL) {
            self.registry_url = url;
        }
        if let Some(host) = EnvVar::get(EnvVar::DOWNLOAD_HOST) {
            self.download_host = normalize_host(host);
        }
        if let Some(dir) = EnvVar::get(EnvVar::EXTENSIONS_DIR) {
            self.extensions_dir = PathBuf::from(dir);
        }
        if let Some(lang) = EnvVar::get(EnvVar::LANG) {
            self.lang = Lang::from_locale(&lang);
        }
    }
}

/// ホストプレフィックスを末尾スラッシュ付きに揃える
fn normalize_host(host: String) -> String {
    if host.ends_with('/') {
        host
    } else {
        format!("{}/", host)
    }
}

fn home_dir() -> Result<PathBuf> {
    EnvVar::get("HOME")
        .or_else(|| EnvVar::get("USERPROFILE"))
        .map(PathBuf::from)
        .ok_or_else(|| ExtmError::Config("HOME environment variable not set".to_string()))
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
