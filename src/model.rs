//! レジストリモデル
//!
//! ビューにレジストリを供給する境界と、HTTP経由の実装。

use crate::config::HttpConfig;
use crate::error::Result;
use crate::http;
use crate::registry::{parse_registry, Registry};
use reqwest::Client;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::Mutex;

/// レジストリ供給元 trait
pub trait RegistryModel: Send + Sync {
    /// レジストリを取得
    fn get_registry(&self) -> Pin<Box<dyn Future<Output = Result<Arc<Registry>>> + Send + '_>>;
}

/// リモートの registry.json を取得するモデル
///
/// 最初に成功した取得結果をスナップショットとして保持し、以降の
/// `get_registry()` は同じスナップショットを返す。失敗は保持しない。
pub struct RemoteRegistryModel {
    client: Client,
    url: String,
    snapshot: Mutex<Option<Arc<Registry>>>,
}

impl RemoteRegistryModel {
    pub fn new(url: impl Into<String>, config: &HttpConfig) -> Self {
        Self {
            client: config.build_client(),
            url: url.into(),
            snapshot: Mutex::new(None),
        }
    }

    async fn fetch(&self) -> Result<Arc<Registry>> {
        // 取得中はロックを保持し、同時呼び出しは1回の取得結果を共有する
        let mut snapshot = self.snapshot.lock().await;
        if let Some(registry) = snapshot.as_ref() {
            log::debug!("Using cached registry snapshot ({} entries)", registry.len());
            return Ok(registry.clone());
        }

        log::info!("Fetching extension registry from {}", self.url);
        let content = http::get_text(&self.client, &self.url).await?;
        let registry = Arc::new(parse_registry(&content)?);
        log::debug!("Fetched registry with {} entries", registry.len());

        *snapshot = Some(registry.clone());
        Ok(registry)
    }
}

impl RegistryModel for RemoteRegistryModel {
    fn get_registry(&self) -> Pin<Box<dyn Future<Output = Result<Arc<Registry>>> + Send + '_>> {
        Box::pin(self.fetch())
    }
}

#[cfg(test)]
#[path = "model_test.rs"]
mod tests;
