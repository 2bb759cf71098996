//! ネイティブブラウザでURLを開く

use crate::error::{ExtmError, Result};
use url::Url;

/// URLオープナー trait
pub trait UrlOpener: Send + Sync {
    /// 既定のブラウザでURLを開く
    fn open_url_in_default_browser(&self, url: &str) -> Result<()>;
}

/// OS既定のハンドラでブラウザを起動するオープナー
#[derive(Debug, Default)]
pub struct SystemBrowser;

impl SystemBrowser {
    pub fn new() -> Self {
        Self
    }
}

impl UrlOpener for SystemBrowser {
    fn open_url_in_default_browser(&self, url: &str) -> Result<()> {
        let parsed = validate_web_url(url)?;
        log::info!("Opening {} in default browser", parsed);

        open::that(parsed.as_str()).map_err(|e| ExtmError::Opener(format!("{}: {}", parsed, e)))
    }
}

/// http/https 以外のURLは拒否し、正規化済みのURLを返す
pub fn validate_web_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url.trim()).map_err(|_| ExtmError::InvalidUrl(url.to_string()))?;

    match parsed.scheme() {
        "http" | "https" if parsed.host_str().is_some_and(|h| !h.is_empty()) => Ok(parsed),
        _ => Err(ExtmError::InvalidUrl(url.to_string())),
    }
}
