//! レジストリのデータモデル
//!
//! サーバーが配信する registry.json の構造。ビューは読み取り専用で扱う。

pub mod utils;

use crate::error::{ExtmError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 拡張機能ID
pub type ExtensionId = String;

/// 拡張機能IDからエントリへのマッピング（順序なし）
pub type Registry = HashMap<ExtensionId, RegistryEntry>;

/// ソート済みレジストリ
pub type SortedRegistry = Vec<(ExtensionId, RegistryEntry)>;

/// 拡張機能のメタデータ（package.json 相当）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtensionMetadata {
    pub name: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
}

impl ExtensionMetadata {
    /// 表示名（title があれば title、なければ name）
    pub fn display_name(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.name)
    }
}

/// 作者情報
///
/// package.json では文字列とオブジェクトの両形式が使われる。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Author {
    /// "Name <mail> (url)"
    Text(String),
    /// { "name": "...", "email": "...", "url": "..." }
    Detail {
        name: String,
        #[serde(default)]
        email: Option<String>,
        #[serde(default)]
        url: Option<String>,
    },
}

impl Author {
    /// 作者名
    pub fn name(&self) -> &str {
        match self {
            Author::Text(text) => text.split(" <").next().unwrap_or(text).trim(),
            Author::Detail { name, .. } => name,
        }
    }
}

/// 公開済みバージョン
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionInfo {
    pub version: String,
    #[serde(default)]
    pub published: Option<String>,
}

impl VersionInfo {
    /// 公開日時をパース（不正な形式は None）
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        let published = self.published.as_deref()?;
        DateTime::parse_from_rfc3339(published)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// レジストリ内の1拡張機能
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub metadata: ExtensionMetadata,
    /// "github:<user>" 形式
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default)]
    pub versions: Vec<VersionInfo>,
    #[serde(
        default,
        rename = "totalDownloads",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_downloads: Option<u64>,
}

impl RegistryEntry {
    /// 最新（末尾）のバージョン情報
    pub fn last_version(&self) -> Option<&VersionInfo> {
        self.versions.last()
    }
}

/// registry.json をパース
pub fn parse_registry(content: &str) -> Result<Registry> {
    serde_json::from_str(content)
        .map_err(|e| ExtmError::InvalidRegistry(format!("Failed to parse registry.json: {}", e)))
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;
