//! ビューの Model/Msg 定義

use crate::markup::Element;
use crate::registry::{ExtensionId, Registry, RegistryEntry, SortedRegistry};
use std::collections::HashSet;
use std::sync::Arc;

// ============================================================================
// ViewState（表示状態）
// ============================================================================

/// 表示状態
///
/// `Loading` から `Loaded` または `Error` へ一度だけ遷移する。
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    /// 取得中（スピナー表示）
    Loading,
    /// 取得完了（ソート済み一覧）
    Loaded(SortedRegistry),
    /// 取得失敗（固定メッセージ表示）
    Error,
}

// ============================================================================
// Model（画面状態）
// ============================================================================

/// ビューの状態
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub state: ViewState,
    /// このビューでインストールが完了したID
    pub installed_ids: HashSet<ExtensionId>,
    /// インストール実行中のID
    pub installing_ids: HashSet<ExtensionId>,
}

impl Model {
    pub fn new() -> Self {
        Self {
            state: ViewState::Loading,
            installed_ids: HashSet::new(),
            installing_ids: HashSet::new(),
        }
    }

    /// 取得中かどうか
    pub fn is_loading(&self) -> bool {
        matches!(self.state, ViewState::Loading)
    }

    /// 表示中のエントリ（Loaded 以外は空）
    pub fn entries(&self) -> &[(ExtensionId, RegistryEntry)] {
        match &self.state {
            ViewState::Loaded(entries) => entries,
            _ => &[],
        }
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Msg / ClickTarget / Effect
// ============================================================================

/// クリックされた要素の種別
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickTarget {
    /// `a[href]`
    Anchor { href: String },
    /// `button.install[data-extension-id]`
    InstallButton { id: ExtensionId, disabled: bool },
    /// それ以外
    Other,
}

impl ClickTarget {
    /// 要素からクリック対象を判定
    pub fn from_element(el: &Element) -> Self {
        if el.tag == "a" {
            if let Some(href) = el.get_attr("href") {
                return ClickTarget::Anchor {
                    href: href.to_string(),
                };
            }
        }

        if el.tag == "button" && el.has_class("install") {
            if let Some(id) = el.get_attr("data-extension-id") {
                return ClickTarget::InstallButton {
                    id: id.to_string(),
                    disabled: el.is_disabled(),
                };
            }
        }

        ClickTarget::Other
    }
}

/// ビューへのメッセージ
#[derive(Debug, Clone)]
pub enum Msg {
    /// 初回取得が成功した
    RegistryLoaded(Arc<Registry>),
    /// 初回取得が失敗した
    RegistryFailed,
    /// 描画済み要素がクリックされた
    Clicked(ClickTarget),
    /// インストールダイアログが正常終了した
    InstallCompleted(ExtensionId),
    /// インストールが完了しなかった（再取得失敗・未登録・ダイアログ失敗）
    InstallFailed(ExtensionId),
}

/// update の結果として実行すべき副作用
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    /// ネイティブブラウザでURLを開く
    OpenUrl(String),
    /// インストールを開始する
    BeginInstall(ExtensionId),
}
