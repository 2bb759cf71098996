//! ビューの非同期ランタイム
//!
//! 協調オブジェクトを保持し、取得・クリック・インストールを
//! メッセージとして `update` に流す。破棄後に完了した処理は何もしない。

use super::model::{ClickTarget, Effect, Model, Msg};
use super::render::{is_row_installed, render, RenderContext};
use super::update::update;
use crate::install::{download_url, InstallDialog};
use crate::loader::ExtensionLoader;
use crate::markup::Element;
use crate::model::RegistryModel;
use crate::opener::UrlOpener;
use crate::registry::{ExtensionId, RegistryEntry};
use crate::strings::Lang;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tokio::task::{AbortHandle, JoinHandle};

/// ビューが依存する協調オブジェクト
#[derive(Clone)]
pub struct Collaborators {
    pub model: Arc<dyn RegistryModel>,
    pub loader: Arc<dyn ExtensionLoader>,
    pub dialog: Arc<dyn InstallDialog>,
    pub opener: Arc<dyn UrlOpener>,
}

/// ビューの表示オプション
#[derive(Debug, Clone)]
pub struct ViewOptions {
    /// ダウンロードホスト（末尾スラッシュ付き）
    pub download_host: String,
    pub lang: Lang,
}

/// クリック処理の結果
#[derive(Debug)]
pub enum Click {
    /// リンクを横取りした（既定の遷移も親への伝播も行わない）
    Consumed,
    /// インストールを開始した
    InstallStarted(JoinHandle<()>),
    /// 何もしなかった
    Ignored,
}

struct Shared {
    model: Mutex<Model>,
    disposed: AtomicBool,
    tasks: Mutex<Vec<AbortHandle>>,
    settled: watch::Sender<bool>,
}

impl Shared {
    fn lock_model(&self) -> MutexGuard<'_, Model> {
        self.model.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    /// 破棄済みなら何もしない
    fn dispatch(&self, msg: Msg) -> Effect {
        let mut model = self.lock_model();
        if self.is_disposed() {
            log::debug!("Ignoring {} for disposed view", msg_name(&msg));
            return Effect::None;
        }
        update(&mut model, msg)
    }

    fn track(&self, handle: AbortHandle) {
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        tasks.retain(|task| !task.is_finished());
        tasks.push(handle);
    }
}

fn msg_name(msg: &Msg) -> &'static str {
    match msg {
        Msg::RegistryLoaded(_) => "RegistryLoaded",
        Msg::RegistryFailed => "RegistryFailed",
        Msg::Clicked(_) => "Clicked",
        Msg::InstallCompleted(_) => "InstallCompleted",
        Msg::InstallFailed(_) => "InstallFailed",
    }
}

/// 初回取得タスクの終了時（パニック・中断を含む）に settled を通知する
struct SettleOnDrop(Arc<Shared>);

impl Drop for SettleOnDrop {
    fn drop(&mut self) {
        self.0.settled.send_replace(true);
    }
}

/// レジストリ一覧ビュー
///
/// 構築時にレジストリを一度だけ取得する。tokio ランタイム内で構築すること。
pub struct RegistryView {
    shared: Arc<Shared>,
    deps: Collaborators,
    options: ViewOptions,
}

impl RegistryView {
    /// ビューを構築し、初回取得を開始する
    pub fn new(deps: Collaborators, options: ViewOptions) -> Self {
        let (settled, _) = watch::channel(false);
        let shared = Arc::new(Shared {
            model: Mutex::new(Model::new()),
            disposed: AtomicBool::new(false),
            tasks: Mutex::new(Vec::new()),
            settled,
        });

        let task_shared = shared.clone();
        let model = deps.model.clone();
        let handle = tokio::spawn(async move {
            let _settle = SettleOnDrop(task_shared.clone());
            let msg = match model.get_registry().await {
                Ok(registry) => Msg::RegistryLoaded(registry),
                Err(e) => {
                    log::warn!("Failed to load extension registry: {}", e);
                    Msg::RegistryFailed
                }
            };
            task_shared.dispatch(msg);
        });
        shared.track(handle.abort_handle());

        Self {
            shared,
            deps,
            options,
        }
    }

    /// 初回取得の完了（成功・失敗いずれも）を待つ
    ///
    /// 破棄済みの場合は即座に戻る。
    pub async fn wait_until_settled(&self) {
        let mut rx = self.shared.settled.subscribe();
        if self.shared.is_disposed() {
            return;
        }
        let _ = rx.wait_for(|settled| *settled).await;
    }

    /// 現在の状態のスナップショット
    pub fn model(&self) -> Model {
        self.shared.lock_model().clone()
    }

    /// 現在の状態を描画
    ///
    /// 読み込み済み拡張機能は描画のたびに一度だけ問い合わせる。
    pub fn render(&self) -> Element {
        let loaded = self.deps.loader.loaded_extension_metadata();
        let ctx = RenderContext {
            loaded: &loaded,
            strings: self.options.lang.strings(),
        };
        render(&self.shared.lock_model(), &ctx)
    }

    /// 表示中のエントリと、描画と同じ判定によるインストール済みフラグ
    pub fn entries_with_status(&self) -> Vec<(ExtensionId, RegistryEntry, bool)> {
        let loaded = self.deps.loader.loaded_extension_metadata();
        let ctx = RenderContext {
            loaded: &loaded,
            strings: self.options.lang.strings(),
        };
        let model = self.shared.lock_model();
        model
            .entries()
            .iter()
            .map(|(id, entry)| {
                let installed = is_row_installed(&model, id, entry, &ctx);
                (id.clone(), entry.clone(), installed)
            })
            .collect()
    }

    /// 現在の状態をHTMLとして描画
    pub fn to_html(&self) -> String {
        self.render().to_html()
    }

    /// 描画済み要素のクリックを処理
    pub fn click(&self, target: &Element) -> Click {
        let target = ClickTarget::from_element(target);
        match self.shared.dispatch(Msg::Clicked(target)) {
            Effect::OpenUrl(href) => {
                if let Err(e) = self.deps.opener.open_url_in_default_browser(&href) {
                    log::warn!("{}", e);
                }
                Click::Consumed
            }
            Effect::BeginInstall(id) => Click::InstallStarted(self.begin_install(id)),
            Effect::None => Click::Ignored,
        }
    }

    fn begin_install(&self, id: ExtensionId) -> JoinHandle<()> {
        let shared = self.shared.clone();
        let deps = self.deps.clone();
        let host = self.options.download_host.clone();

        let handle = tokio::spawn(async move {
            install_using_dialog(shared, deps, host, id).await;
        });
        self.shared.track(handle.abort_handle());
        handle
    }

    /// ビューを破棄する
    ///
    /// 実行中の処理を中断し、以降に届いた完了通知はすべて無視する。
    pub fn dispose(&self) {
        {
            // フラグの更新は状態のロック下で行う
            let _model = self.shared.lock_model();
            if self.shared.disposed.swap(true, Ordering::SeqCst) {
                return;
            }
        }
        let tasks = std::mem::take(
            &mut *self.shared.tasks.lock().unwrap_or_else(PoisonError::into_inner),
        );
        for task in tasks {
            task.abort();
        }
        self.shared.settled.send_replace(true);
    }
}

impl Drop for RegistryView {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// レジストリを再取得し、エントリのバージョンからURLを組み立ててダイアログに委譲する
///
/// 再取得やダイアログの失敗はビューには表示しない。
async fn install_using_dialog(
    shared: Arc<Shared>,
    deps: Collaborators,
    host: String,
    id: ExtensionId,
) {
    let msg = if run_install(&shared, &deps, &host, &id).await {
        Msg::InstallCompleted(id)
    } else {
        Msg::InstallFailed(id)
    };
    shared.dispatch(msg);
}

async fn run_install(shared: &Shared, deps: &Collaborators, host: &str, id: &str) -> bool {
    let registry = match deps.model.get_registry().await {
        Ok(registry) => registry,
        Err(e) => {
            log::warn!("Failed to re-fetch registry before installing {}: {}", id, e);
            return false;
        }
    };
    if shared.is_disposed() {
        return false;
    }

    let Some(entry) = registry.get(id) else {
        log::debug!("Extension {} is not in the registry", id);
        return false;
    };

    let url = download_url(host, id, &entry.metadata.version);
    log::info!("Installing {} from {}", id, url);

    match deps.dialog.show_dialog(&url).await {
        Ok(()) => true,
        Err(e) => {
            log::warn!("Install of {} did not complete: {}", id, e);
            false
        }
    }
}

#[cfg(test)]
#[path = "runtime_test.rs"]
mod tests;
