//! レジストリ表示用ユーティリティ
//!
//! 並び替えと、テンプレートから呼ばれる3つの整形ヘルパー。

use super::{Registry, RegistryEntry, SortedRegistry};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;

/// GitHub のユーザーページ
const GITHUB_USER_BASE: &str = "https://github.com/";

/// 最新バージョンの公開日時が新しい順に並び替える
///
/// バージョン情報が無い（または日時が読めない）エントリは末尾。
/// 同順位はID昇順で安定させる。
pub fn sort_registry(registry: &Registry) -> SortedRegistry {
    let mut entries: SortedRegistry = registry
        .iter()
        .map(|(id, entry)| (id.clone(), entry.clone()))
        .collect();

    entries.sort_by(|(a_id, a), (b_id, b)| {
        compare_publish_time(publish_time(b), publish_time(a)).then_with(|| a_id.cmp(b_id))
    });

    entries
}

fn publish_time(entry: &RegistryEntry) -> Option<DateTime<Utc>> {
    entry.last_version().and_then(|v| v.published_at())
}

/// None を最小値として比較
fn compare_publish_time(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}

/// 最新バージョンの公開日（YYYY-MM-DD）、無ければ空文字列
pub fn last_version_date(entry: &RegistryEntry) -> String {
    publish_time(entry)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// オーナー文字列からプロフィールURLを生成
///
/// `github:<user>` のみ対応。
pub fn owner_link(owner: &str) -> Option<String> {
    match owner.split_once(':') {
        Some(("github", user)) if !user.is_empty() => Some(format!("{}{}", GITHUB_USER_BASE, user)),
        _ => None,
    }
}

/// オーナー文字列から表示用のユーザーIDを取り出す
pub fn format_user_id(owner: &str) -> Option<String> {
    owner
        .split_once(':')
        .map(|(_, user)| user)
        .filter(|user| !user.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
#[path = "utils_test.rs"]
mod tests;
