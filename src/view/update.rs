//! ビューの update（状態更新）

use super::model::{ClickTarget, Effect, Model, Msg, ViewState};
use crate::registry::utils::sort_registry;

/// メッセージに応じて状態を更新し、実行すべき副作用を返す
pub fn update(model: &mut Model, msg: Msg) -> Effect {
    match msg {
        Msg::RegistryLoaded(registry) => {
            if model.is_loading() {
                model.state = ViewState::Loaded(sort_registry(&registry));
            }
            Effect::None
        }
        Msg::RegistryFailed => {
            if model.is_loading() {
                model.state = ViewState::Error;
            }
            Effect::None
        }
        Msg::Clicked(target) => click(model, target),
        Msg::InstallCompleted(id) => {
            model.installing_ids.remove(&id);
            model.installed_ids.insert(id);
            Effect::None
        }
        Msg::InstallFailed(id) => {
            model.installing_ids.remove(&id);
            Effect::None
        }
    }
}

fn click(model: &mut Model, target: ClickTarget) -> Effect {
    match target {
        ClickTarget::Anchor { href } => Effect::OpenUrl(href),
        // 無効化されたボタンはクリックを受け付けない
        ClickTarget::InstallButton { disabled: true, .. } => Effect::None,
        ClickTarget::InstallButton { id, .. } if model.installed_ids.contains(&id) => Effect::None,
        // 実行中の同じIDは二重に開始しない
        ClickTarget::InstallButton { id, .. } if model.installing_ids.contains(&id) => Effect::None,
        ClickTarget::InstallButton { id, .. } => {
            model.installing_ids.insert(id.clone());
            Effect::BeginInstall(id)
        }
        ClickTarget::Other => Effect::None,
    }
}

#[cfg(test)]
#[path = "update_test.rs"]
mod tests;
