//! 読み込み済み拡張機能の検出

use crate::registry::ExtensionMetadata;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 拡張機能のマニフェストファイル名
pub const MANIFEST_FILE: &str = "package.json";

/// 読み込み済み拡張機能の問い合わせ先 trait
pub trait ExtensionLoader: Send + Sync {
    /// 拡張機能名からメタデータへのマッピング
    fn loaded_extension_metadata(&self) -> HashMap<String, ExtensionMetadata>;
}

/// 拡張機能ディレクトリ直下の `*/package.json` を走査するローダー
pub struct DirectoryExtensionLoader {
    extensions_dir: PathBuf,
}

impl DirectoryExtensionLoader {
    pub fn new(extensions_dir: impl Into<PathBuf>) -> Self {
        Self {
            extensions_dir: extensions_dir.into(),
        }
    }
}

impl ExtensionLoader for DirectoryExtensionLoader {
    fn loaded_extension_metadata(&self) -> HashMap<String, ExtensionMetadata> {
        let mut loaded = HashMap::new();

        if !self.extensions_dir.is_dir() {
            return loaded;
        }

        let manifests = WalkDir::new(&self.extensions_dir)
            .min_depth(2)
            .max_depth(2)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file() && entry.file_name() == MANIFEST_FILE);

        for entry in manifests {
            match read_manifest(entry.path()) {
                Some(metadata) => {
                    loaded.insert(metadata.name.clone(), metadata);
                }
                None => log::debug!("Skipping unreadable manifest {}", entry.path().display()),
            }
        }

        loaded
    }
}

fn read_manifest(path: &Path) -> Option<ExtensionMetadata> {
    let content = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
}

#[cfg(test)]
#[path = "loader_test.rs"]
mod tests;
