use super::*;
use crate::config::DEFAULT_DOWNLOAD_HOST;
use crate::registry::Registry;
use crate::test_support::{make_registry, MockDialog, MockLoader, MockModel, MockOpener};
use crate::view::ViewState;
use std::time::Duration;

const FOO_URL: &str = "https://s3.amazonaws.com/repository.brackets.io/foo/foo-1.2.0.zip";
const BAR_URL: &str = "https://s3.amazonaws.com/repository.brackets.io/bar/bar-0.1.0.zip";

struct Harness {
    model: Arc<MockModel>,
    dialog: Arc<MockDialog>,
    opener: Arc<MockOpener>,
    view: RegistryView,
}

fn build(model: MockModel, loader: MockLoader) -> Harness {
    let model = Arc::new(model);
    let dialog = Arc::new(MockDialog::new());
    let opener = Arc::new(MockOpener::new());
    let deps = Collaborators {
        model: model.clone(),
        loader: Arc::new(loader),
        dialog: dialog.clone(),
        opener: opener.clone(),
    };
    let view = RegistryView::new(
        deps,
        ViewOptions {
            download_host: DEFAULT_DOWNLOAD_HOST.to_string(),
            lang: Lang::En,
        },
    );
    Harness {
        model,
        dialog,
        opener,
        view,
    }
}

fn sample_registry() -> Registry {
    make_registry(&[("foo", "1.2.0"), ("bar", "0.1.0")])
}

async fn loaded_harness() -> Harness {
    let h = build(MockModel::ok(sample_registry()), MockLoader::default());
    h.view.wait_until_settled().await;
    h
}

fn install_button<'a>(root: &'a Element, id: &str) -> &'a Element {
    root.find(|el| el.tag == "button" && el.get_attr("data-extension-id") == Some(id))
        .unwrap()
}

fn is_button_disabled(view: &RegistryView, id: &str) -> bool {
    install_button(&view.render(), id).is_disabled()
}

async fn click_install(view: &RegistryView, id: &str) -> JoinHandle<()> {
    let root = view.render();
    match view.click(install_button(&root, id)) {
        Click::InstallStarted(handle) => handle,
        other => panic!("Expected InstallStarted, got {:?}", other),
    }
}

/// 他タスクの進行を待つ
async fn settle_tasks() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
    tokio::time::sleep(Duration::from_millis(20)).await;
}

// ============================================================================
// 構築・初回取得
// ============================================================================

#[tokio::test]
async fn shows_spinner_while_loading() {
    let (model, _release) = MockModel::gated(sample_registry());
    let h = build(model, MockLoader::default());

    let root = h.view.render();

    assert_eq!(root.find_by_class("spinner").len(), 1);
    assert!(root.find_all(|el| el.tag == "tr").is_empty());
}

#[tokio::test]
async fn renders_one_row_per_entry_after_success() {
    let h = loaded_harness().await;

    let root = h.view.render();

    assert_eq!(root.find_all(|el| el.tag == "tr").len(), 2);
    assert!(root.find_by_class("spinner").is_empty());
    assert_eq!(h.model.call_count(), 1);
}

#[tokio::test]
async fn renders_error_message_after_failure() {
    let h = build(MockModel::failing(), MockLoader::default());
    h.view.wait_until_settled().await;

    let root = h.view.render();

    assert_eq!(root.find_by_class("spinner").len(), 0);
    assert!(root.find_all(|el| el.tag == "tr").is_empty());
    assert_eq!(
        root.text_content(),
        Lang::En.strings().extension_manager_error_load
    );
    assert_eq!(h.view.model().state, ViewState::Error);
}

#[tokio::test]
async fn marks_loaded_extensions_as_installed() {
    let h = build(MockModel::ok(sample_registry()), MockLoader::with_loaded(&["bar"]));
    h.view.wait_until_settled().await;

    let root = h.view.render();

    let installed_rows: Vec<String> = root
        .find_all(|el| el.tag == "tr" && !el.find_by_class("installed").is_empty())
        .iter()
        .filter_map(|row| {
            row.find(|el| el.tag == "button")
                .and_then(|b| b.get_attr("data-extension-id"))
                .map(str::to_string)
        })
        .collect();
    assert_eq!(installed_rows, vec!["bar".to_string()]);
}

#[tokio::test]
async fn entries_with_status_matches_rendered_markers() {
    let h = build(MockModel::ok(sample_registry()), MockLoader::with_loaded(&["bar"]));
    h.view.wait_until_settled().await;
    click_install(&h.view, "foo").await.await.unwrap();

    let status: Vec<(String, bool)> = h
        .view
        .entries_with_status()
        .into_iter()
        .map(|(id, _, installed)| (id, installed))
        .collect();

    assert_eq!(status.len(), 2);
    assert!(status.iter().all(|(_, installed)| *installed));
}

/// 取得中にパニックするモデル
struct PanickingModel;

impl RegistryModel for PanickingModel {
    fn get_registry(
        &self,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = crate::error::Result<Arc<Registry>>> + Send + '_>,
    > {
        Box::pin(async { panic!("registry backend exploded") })
    }
}

#[tokio::test]
async fn panicking_fetch_still_settles() {
    let deps = Collaborators {
        model: Arc::new(PanickingModel),
        loader: Arc::new(MockLoader::default()),
        dialog: Arc::new(MockDialog::new()),
        opener: Arc::new(MockOpener::new()),
    };
    let view = RegistryView::new(
        deps,
        ViewOptions {
            download_host: DEFAULT_DOWNLOAD_HOST.to_string(),
            lang: Lang::En,
        },
    );

    tokio::time::timeout(Duration::from_secs(5), view.wait_until_settled())
        .await
        .expect("wait_until_settled should return after the fetch task panics");
    assert_eq!(view.model().state, ViewState::Loading);
}

// ============================================================================
// リンク
// ============================================================================

#[tokio::test]
async fn anchor_click_opens_native_browser() {
    let h = loaded_harness().await;
    let anchor = Element::new("a")
        .attr("href", "https://example.com")
        .text("site");

    let click = h.view.click(&anchor);

    assert!(matches!(click, Click::Consumed));
    assert_eq!(h.opener.opened(), vec!["https://example.com".to_string()]);
}

#[tokio::test]
async fn rendered_owner_link_is_intercepted() {
    let h = loaded_harness().await;
    let root = h.view.render();
    let anchor = root.find(|el| el.tag == "a").unwrap();

    h.view.click(anchor);

    assert_eq!(
        h.opener.opened(),
        vec![anchor.get_attr("href").unwrap().to_string()]
    );
}

// ============================================================================
// インストール
// ============================================================================

#[tokio::test]
async fn install_uses_fixed_download_url_and_disables_button() {
    let h = loaded_harness().await;

    click_install(&h.view, "foo").await.await.unwrap();

    assert_eq!(h.dialog.urls(), vec![FOO_URL.to_string()]);
    assert_eq!(h.model.call_count(), 2);
    assert!(is_button_disabled(&h.view, "foo"));
    assert!(!is_button_disabled(&h.view, "bar"));
}

#[tokio::test]
async fn button_stays_enabled_until_dialog_completes() {
    let h = loaded_harness().await;
    let done = h.dialog.gate(FOO_URL);

    let handle = click_install(&h.view, "foo").await;
    settle_tasks().await;
    assert!(!is_button_disabled(&h.view, "foo"));

    done.send(Ok(())).unwrap();
    handle.await.unwrap();
    assert!(is_button_disabled(&h.view, "foo"));
}

#[tokio::test]
async fn concurrent_installs_disable_only_their_own_buttons() {
    let h = loaded_harness().await;
    let foo_done = h.dialog.gate(FOO_URL);
    let bar_done = h.dialog.gate(BAR_URL);

    let foo = click_install(&h.view, "foo").await;
    let bar = click_install(&h.view, "bar").await;
    settle_tasks().await;

    // 開始とは逆順に完了させる
    bar_done.send(Ok(())).unwrap();
    bar.await.unwrap();
    assert!(is_button_disabled(&h.view, "bar"));
    assert!(!is_button_disabled(&h.view, "foo"));

    foo_done.send(Ok(())).unwrap();
    foo.await.unwrap();
    assert!(is_button_disabled(&h.view, "foo"));
    assert!(is_button_disabled(&h.view, "bar"));
}

#[tokio::test]
async fn failed_dialog_leaves_button_enabled() {
    let h = loaded_harness().await;
    let done = h.dialog.gate(FOO_URL);

    let handle = click_install(&h.view, "foo").await;
    done.send(Err("checksum mismatch".to_string())).unwrap();
    handle.await.unwrap();

    assert!(!is_button_disabled(&h.view, "foo"));
}

#[tokio::test]
async fn install_uses_refetched_registry() {
    let h = build(
        MockModel::new(vec![
            Ok(sample_registry()),
            Ok(make_registry(&[("foo", "2.0.0")])),
        ]),
        MockLoader::default(),
    );
    h.view.wait_until_settled().await;

    click_install(&h.view, "foo").await.await.unwrap();
    click_install(&h.view, "bar").await.await.unwrap();

    // bar は再取得したレジストリに無いのでダイアログは開かない
    assert_eq!(
        h.dialog.urls(),
        vec!["https://s3.amazonaws.com/repository.brackets.io/foo/foo-2.0.0.zip".to_string()]
    );
    assert!(!is_button_disabled(&h.view, "bar"));
}

#[tokio::test]
async fn install_refetch_failure_is_silent() {
    let h = build(
        MockModel::new(vec![Ok(sample_registry()), Err("offline".to_string())]),
        MockLoader::default(),
    );
    h.view.wait_until_settled().await;

    click_install(&h.view, "foo").await.await.unwrap();

    assert!(h.dialog.urls().is_empty());
    assert!(matches!(h.view.model().state, ViewState::Loaded(_)));
}

#[tokio::test]
async fn disabled_button_click_is_ignored() {
    let h = loaded_harness().await;
    click_install(&h.view, "foo").await.await.unwrap();

    let root = h.view.render();
    let click = h.view.click(install_button(&root, "foo"));

    assert!(matches!(click, Click::Ignored));
    assert_eq!(h.dialog.urls().len(), 1);
}

#[tokio::test]
async fn second_click_while_installing_is_ignored() {
    let h = loaded_harness().await;
    let done = h.dialog.gate(FOO_URL);

    let handle = click_install(&h.view, "foo").await;
    settle_tasks().await;

    let root = h.view.render();
    let again = h.view.click(install_button(&root, "foo"));
    assert!(matches!(again, Click::Ignored));

    done.send(Ok(())).unwrap();
    handle.await.unwrap();
    assert_eq!(h.dialog.urls(), vec![FOO_URL.to_string()]);
}

#[tokio::test]
async fn failed_install_can_be_retried() {
    let h = loaded_harness().await;
    let done = h.dialog.gate(FOO_URL);

    let handle = click_install(&h.view, "foo").await;
    done.send(Err("network down".to_string())).unwrap();
    handle.await.unwrap();
    assert!(h.view.model().installing_ids.is_empty());

    click_install(&h.view, "foo").await.await.unwrap();

    assert_eq!(h.dialog.urls(), vec![FOO_URL.to_string(), FOO_URL.to_string()]);
    assert!(is_button_disabled(&h.view, "foo"));
}

// ============================================================================
// 破棄
// ============================================================================

#[tokio::test]
async fn fetch_completing_after_dispose_is_ignored() {
    let (model, release) = MockModel::gated(sample_registry());
    let h = build(model, MockLoader::default());
    settle_tasks().await;

    h.view.dispose();
    let _ = release.send(());
    settle_tasks().await;

    assert!(h.view.shared.is_disposed());
    assert_eq!(h.view.model().state, ViewState::Loading);
    h.view.wait_until_settled().await;
}

#[tokio::test]
async fn install_completing_after_dispose_is_ignored() {
    let h = loaded_harness().await;
    let done = h.dialog.gate(FOO_URL);

    let handle = click_install(&h.view, "foo").await;
    settle_tasks().await;
    h.view.dispose();
    let _ = done.send(Ok(()));

    assert!(handle.await.unwrap_err().is_cancelled());
    assert!(h.view.model().installed_ids.is_empty());
}

#[tokio::test]
async fn clicks_after_dispose_do_nothing() {
    let h = loaded_harness().await;
    let root = h.view.render();
    h.view.dispose();

    let click = h.view.click(install_button(&root, "foo"));

    assert!(matches!(click, Click::Ignored));
    assert!(h.opener.opened().is_empty());
}
