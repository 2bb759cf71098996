//! テスト用のHTTPサーバーとモック協調オブジェクト

use crate::error::{ExtmError, Result};
use crate::install::InstallDialog;
use crate::loader::ExtensionLoader;
use crate::model::RegistryModel;
use crate::opener::UrlOpener;
use crate::registry::{ExtensionMetadata, Registry, RegistryEntry, VersionInfo};
use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

// ============================================================================
// HTTPサーバー
// ============================================================================

/// 固定レスポンス
pub struct CannedResponse {
    status: u16,
    body: Vec<u8>,
    content_length: Option<u64>,
}

impl CannedResponse {
    pub fn ok(body: &str) -> Self {
        Self::status(200, body)
    }

    pub fn status(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.as_bytes().to_vec(),
            content_length: None,
        }
    }

    pub fn bytes(body: Vec<u8>) -> Self {
        Self {
            status: 200,
            body,
            content_length: None,
        }
    }

    /// 実際の本文長と異なる Content-Length を宣言する
    pub fn declared_length(mut self, length: u64) -> Self {
        self.content_length = Some(length);
        self
    }
}

/// 順番に固定レスポンスを返すローカルHTTPサーバー
pub struct TestServer {
    addr: SocketAddr,
    requests: Arc<AtomicUsize>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

/// サーバーを起動（レスポンスを使い切った後は 500 を返す）
pub async fn serve(responses: Vec<CannedResponse>) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(AtomicUsize::new(0));
    let queue = Arc::new(Mutex::new(VecDeque::from(responses)));

    let counter = requests.clone();
    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            counter.fetch_add(1, Ordering::SeqCst);
            let response = queue
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| CannedResponse::status(500, "exhausted"));

            tokio::spawn(async move {
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut chunk).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => buf.extend_from_slice(&chunk[..n]),
                    }
                }
                let header = format!(
                    "HTTP/1.1 {} Canned\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    response.status,
                    response
                        .content_length
                        .unwrap_or(response.body.len() as u64)
                );
                let _ = socket.write_all(header.as_bytes()).await;
                let _ = socket.write_all(&response.body).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    TestServer { addr, requests }
}

// ============================================================================
// レジストリ生成ヘルパー
// ============================================================================

pub fn make_entry(name: &str, version: &str, published: Option<&str>) -> RegistryEntry {
    RegistryEntry {
        metadata: ExtensionMetadata {
            name: name.to_string(),
            version: version.to_string(),
            title: None,
            description: Some(format!("{} description", name)),
            homepage: None,
            author: None,
            keywords: vec![],
        },
        owner: Some(format!("github:{}-owner", name)),
        versions: vec![VersionInfo {
            version: version.to_string(),
            published: published.map(str::to_string),
        }],
        total_downloads: None,
    }
}

pub fn make_registry(entries: &[(&str, &str)]) -> Registry {
    entries
        .iter()
        .map(|(id, version)| (id.to_string(), make_entry(id, version, None)))
        .collect()
}

// ============================================================================
// MockModel
// ============================================================================

/// 呼び出しごとに用意された結果を返すモデル
///
/// 結果を使い切った後は最後の結果を繰り返す。
pub struct MockModel {
    results: Mutex<VecDeque<std::result::Result<Registry, String>>>,
    last: Mutex<Option<std::result::Result<Registry, String>>>,
    gate: Mutex<Option<oneshot::Receiver<()>>>,
    calls: AtomicUsize,
}

impl MockModel {
    pub fn new(results: Vec<std::result::Result<Registry, String>>) -> Self {
        Self {
            results: Mutex::new(results.into()),
            last: Mutex::new(None),
            gate: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn ok(registry: Registry) -> Self {
        Self::new(vec![Ok(registry)])
    }

    pub fn failing() -> Self {
        Self::new(vec![Err("connection refused".to_string())])
    }

    /// 最初の呼び出しを送信側が完了するまで保留する
    pub fn gated(registry: Registry) -> (Self, oneshot::Sender<()>) {
        let (tx, rx) = oneshot::channel();
        let model = Self::ok(registry);
        *model.gate.lock().unwrap() = Some(rx);
        (model, tx)
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RegistryModel for MockModel {
    fn get_registry(&self) -> Pin<Box<dyn Future<Output = Result<Arc<Registry>>> + Send + '_>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let gate = self.gate.lock().unwrap().take();
            if let Some(gate) = gate {
                let _ = gate.await;
            }

            let next = self.results.lock().unwrap().pop_front();
            let result = match next {
                Some(result) => {
                    *self.last.lock().unwrap() = Some(result.clone());
                    result
                }
                None => self
                    .last
                    .lock()
                    .unwrap()
                    .clone()
                    .unwrap_or_else(|| Err("no result".to_string())),
            };

            result
                .map(Arc::new)
                .map_err(ExtmError::InvalidRegistry)
        })
    }
}

// ============================================================================
// MockDialog
// ============================================================================

/// URLごとの完了を外部から制御できるインストールダイアログ
#[derive(Default)]
pub struct MockDialog {
    urls: Mutex<Vec<String>>,
    gates: Mutex<HashMap<String, oneshot::Receiver<std::result::Result<(), String>>>>,
}

impl MockDialog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定URLの完了を保留し、完了用の送信側を返す
    pub fn gate(&self, url: &str) -> oneshot::Sender<std::result::Result<(), String>> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(url.to_string(), rx);
        tx
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

impl InstallDialog for MockDialog {
    fn show_dialog<'a>(
        &'a self,
        url: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            self.urls.lock().unwrap().push(url.to_string());
            let gate = self.gates.lock().unwrap().remove(url);
            match gate {
                Some(rx) => match rx.await {
                    Ok(Ok(())) => Ok(()),
                    Ok(Err(message)) => Err(ExtmError::InvalidArchive(message)),
                    Err(_) => Err(ExtmError::InvalidArchive("cancelled".to_string())),
                },
                None => Ok(()),
            }
        })
    }
}

// ============================================================================
// MockOpener / MockLoader
// ============================================================================

#[derive(Default)]
pub struct MockOpener {
    opened: Mutex<Vec<String>>,
}

impl MockOpener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }
}

impl UrlOpener for MockOpener {
    fn open_url_in_default_browser(&self, url: &str) -> Result<()> {
        self.opened.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct MockLoader {
    loaded: HashMap<String, ExtensionMetadata>,
}

impl MockLoader {
    pub fn with_loaded(names: &[&str]) -> Self {
        let loaded = names
            .iter()
            .map(|name| (name.to_string(), make_entry(name, "1.0.0", None).metadata))
            .collect();
        Self { loaded }
    }
}

impl ExtensionLoader for MockLoader {
    fn loaded_extension_metadata(&self) -> HashMap<String, ExtensionMetadata> {
        self.loaded.clone()
    }
}
