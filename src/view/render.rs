//! ビューの render（描画）
//!
//! 状態とヘルパーからマークアップツリーを生成する純粋関数。

use super::model::{Model, ViewState};
use crate::markup::{Element, Node};
use crate::registry::utils::{format_user_id, last_version_date, owner_link};
use crate::registry::{ExtensionMetadata, RegistryEntry};
use crate::strings::Strings;
use std::collections::HashMap;

/// 描画コンテキスト
pub struct RenderContext<'a> {
    /// 読み込み済み拡張機能（名前 → メタデータ）
    pub loaded: &'a HashMap<String, ExtensionMetadata>,
    pub strings: &'a Strings,
}

impl RenderContext<'_> {
    /// エントリがインストール済みか（エントリごとに描画時に評価）
    pub fn is_installed(&self, entry: &RegistryEntry) -> bool {
        self.loaded.contains_key(&entry.metadata.name)
    }
}

/// 行をインストール済みとして表示するか
///
/// ローダーが報告したもの、またはこのビューでインストールが完了したもの。
pub fn is_row_installed(model: &Model, id: &str, entry: &RegistryEntry, ctx: &RenderContext) -> bool {
    model.installed_ids.contains(id) || ctx.is_installed(entry)
}

/// ビュー全体を描画
pub fn render(model: &Model, ctx: &RenderContext) -> Element {
    let root = Element::new("div").class("extension-list");

    match &model.state {
        ViewState::Loading => root.child(Element::new("div").class("spinner large spin")),
        ViewState::Error => root.child(
            Element::new("div")
                .class("alert-message error")
                .text(ctx.strings.extension_manager_error_load),
        ),
        ViewState::Loaded(entries) => {
            let rows = entries
                .iter()
                .map(|(id, entry)| render_row(id, entry, model, ctx).into());
            root.child(
                Element::new("table")
                    .class("table table-striped table-condensed row-border")
                    .child(Element::new("tbody").children(rows)),
            )
        }
    }
}

fn render_row(id: &str, entry: &RegistryEntry, model: &Model, ctx: &RenderContext) -> Element {
    let just_installed = model.installed_ids.contains(id);
    let installed = is_row_installed(model, id, entry, ctx);

    Element::new("tr")
        .child(render_info(entry, ctx))
        .child(render_description(entry, ctx))
        .child(render_action(id, installed, just_installed, ctx))
}

fn render_info(entry: &RegistryEntry, ctx: &RenderContext) -> Element {
    let metadata = &entry.metadata;
    let mut info = Element::new("td")
        .class("ext-info")
        .child(
            Element::new("span")
                .class("ext-name")
                .text(metadata.display_name()),
        )
        .text(" ")
        .child(
            Element::new("span")
                .class("muted ext-version")
                .text(metadata.version.as_str()),
        );

    let date = last_version_date(entry);
    if !date.is_empty() {
        info = info
            .text(" ")
            .child(Element::new("span").class("muted ext-date").text(date));
    }

    match render_author(entry, ctx) {
        Some(author) => info.child(Element::new("br")).child(author),
        None => info,
    }
}

/// 作者名、なければオーナーへのリンク
fn render_author(entry: &RegistryEntry, ctx: &RenderContext) -> Option<Element> {
    let author = Element::new("span")
        .class("ext-author")
        .text(format!("{} ", ctx.strings.by));

    if let Some(name) = entry.metadata.author.as_ref().map(|a| a.name()) {
        return Some(author.text(name));
    }

    let owner = entry.owner.as_deref()?;
    let user = format_user_id(owner)?;
    let node: Node = match owner_link(owner) {
        Some(href) => Element::new("a").attr("href", href).text(user).into(),
        None => Node::text(user),
    };
    Some(author.child(node))
}

fn render_description(entry: &RegistryEntry, ctx: &RenderContext) -> Element {
    let mut desc = Element::new("td").class("ext-desc");

    if let Some(description) = entry.metadata.description.as_deref() {
        desc = desc.text(description);
    }

    match entry.metadata.homepage.as_deref() {
        Some(homepage) => desc.text(" ").child(
            Element::new("a")
                .attr("href", homepage)
                .text(ctx.strings.more_info),
        ),
        None => desc,
    }
}

fn render_action(id: &str, installed: bool, disabled: bool, ctx: &RenderContext) -> Element {
    let mut action = Element::new("td").class("ext-action");

    if installed {
        action = action.child(
            Element::new("span")
                .class("installed")
                .text(ctx.strings.installed),
        );
    }

    let mut button = Element::new("button")
        .class("btn primary install")
        .attr("data-extension-id", id);
    if disabled {
        button = button.attr("disabled", "disabled");
    }

    action.child(button.text(ctx.strings.install))
}

#[cfg(test)]
#[path = "render_test.rs"]
mod tests;
