//! レジストリビューの Model/Msg/update/render
//!
//! レジストリを一覧表示し、外部リンクのオープンとインストール開始を
//! 協調オブジェクトへ委譲する。状態更新は `update` に、描画は純粋関数の
//! `render` に集約し、非同期処理は `RegistryView` が受け持つ。

mod model;
mod render;
mod runtime;
mod update;

// Re-exports
pub use model::ViewState;
pub use runtime::{Click, Collaborators, RegistryView, ViewOptions};
