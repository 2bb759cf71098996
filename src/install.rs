//! 拡張機能のインストール
//!
//! ビューからはダウンロードURLを受け取る `InstallDialog` としてのみ見える。

use crate::config::HttpConfig;
use crate::error::{ExtmError, Result};
use crate::http;
use crate::loader::MANIFEST_FILE;
use reqwest::Client;
use std::fs;
use std::future::Future;
use std::io::{Cursor, Read};
use std::path::{Component, Path, PathBuf};
use std::pin::Pin;
use url::Url;
use zip::ZipArchive;

/// インストールダイアログ trait
pub trait InstallDialog: Send + Sync {
    /// 指定URLのパッケージをダウンロードしてインストール
    fn show_dialog<'a>(
        &'a self,
        url: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;
}

/// パッケージのダウンロードURLを組み立てる
///
/// `<host><id>/<id>-<version>.zip`（host は末尾スラッシュ付き）
pub fn download_url(host: &str, id: &str, version: &str) -> String {
    format!("{}{}/{}-{}.zip", host, id, id, version)
}

/// ダウンロードURLから拡張機能IDを取り出す（最後から2番目のパス要素）
pub fn extension_id_from_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let segments: Vec<&str> = parsed.path_segments()?.collect();
    let [.., id, _file] = segments.as_slice() else {
        return None;
    };
    (!id.is_empty()).then(|| id.to_string())
}

/// zipをダウンロードして拡張機能ディレクトリへ展開するインストーラー
pub struct ArchiveInstaller {
    client: Client,
    extensions_dir: PathBuf,
}

impl ArchiveInstaller {
    pub fn new(extensions_dir: impl Into<PathBuf>, config: &HttpConfig) -> Self {
        Self {
            client: config.build_client(),
            extensions_dir: extensions_dir.into(),
        }
    }

    async fn install(&self, url: &str) -> Result<PathBuf> {
        let id = extension_id_from_url(url)
            .ok_or_else(|| ExtmError::InvalidUrl(url.to_string()))?;

        log::info!("Downloading extension {} from {}", id, url);
        let archive = http::download_with_progress(&self.client, url).await?;
        log::info!("Downloaded {} bytes for extension {}", archive.len(), id);

        let dest = install_archive(&self.extensions_dir, &id, &archive)?;
        log::info!("Extension {} installed to {}", id, dest.display());
        Ok(dest)
    }
}

impl InstallDialog for ArchiveInstaller {
    fn show_dialog<'a>(
        &'a self,
        url: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move { self.install(url).await.map(|_| ()) })
    }
}

/// zipアーカイブを `<extensions_dir>/<id>` に展開する
///
/// 一時ディレクトリへ展開・検証してから置き換えるため、失敗時に既存の
/// インストールは壊れない。
pub fn install_archive(extensions_dir: &Path, id: &str, archive: &[u8]) -> Result<PathBuf> {
    if Path::new(id)
        .components()
        .any(|c| !matches!(c, Component::Normal(_)))
        || id.contains(['/', '\\'])
    {
        return Err(ExtmError::InvalidArchive(format!("invalid extension id: {}", id)));
    }

    fs::create_dir_all(extensions_dir)?;
    let staging = tempfile::Builder::new()
        .prefix(".extm-install-")
        .tempdir_in(extensions_dir)?;

    extract_archive(archive, staging.path())?;

    if !staging.path().join(MANIFEST_FILE).is_file() {
        return Err(ExtmError::InvalidArchive(format!(
            "{} not found at the root of the package",
            MANIFEST_FILE
        )));
    }

    let dest = extensions_dir.join(id);
    if dest.exists() {
        fs::remove_dir_all(&dest)?;
    }
    fs::rename(staging.keep(), &dest)?;

    Ok(dest)
}

/// zipアーカイブを展開
///
/// 全エントリが単一のトップレベルディレクトリ配下にあり、ルートに
/// マニフェストが無い場合はそのディレクトリを除去する。
fn extract_archive(archive: &[u8], dest: &Path) -> Result<()> {
    let mut zip = ZipArchive::new(Cursor::new(archive))?;

    let names: Vec<String> = zip.file_names().map(|n| n.replace('\\', "/")).collect();
    let prefix = common_prefix(&names);

    let mut skipped_for_security = 0usize;

    for i in 0..zip.len() {
        let mut file = zip.by_index(i)?;
        let normalized = file.name().replace('\\', "/");

        let relative = match &prefix {
            Some(prefix) => normalized
                .strip_prefix(prefix.as_str())
                .unwrap_or(normalized.as_str()),
            None => normalized.as_str(),
        };

        // ルートディレクトリ自体
        if relative.is_empty() {
            continue;
        }

        // zip-slip 対策: Normal コンポーネントのみ許容
        let relative_path = Path::new(relative);
        if relative_path
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            skipped_for_security += 1;
            continue;
        }

        let target = dest.join(relative_path);
        if file.is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut content = Vec::new();
            file.read_to_end(&mut content)?;
            fs::write(&target, content)?;
        }
    }

    if skipped_for_security > 0 {
        return Err(ExtmError::InvalidArchive(format!(
            "{} entries were rejected for security reasons (possible zip-slip)",
            skipped_for_security
        )));
    }

    Ok(())
}

/// 除去すべき共通トップレベルディレクトリ（"dir/" 形式）
fn common_prefix(names: &[String]) -> Option<String> {
    if names.iter().any(|n| n == MANIFEST_FILE) {
        return None;
    }

    let mut tops = names.iter().filter_map(|n| n.split_once('/').map(|(top, _)| top));
    let first = tops.next()?;

    let all_nested = names.iter().all(|n| n.contains('/'));
    let all_same = tops.all(|top| top == first);

    (all_nested && all_same && !first.is_empty() && first != "..")
        .then(|| format!("{}/", first))
}

#[cfg(test)]
#[path = "install_test.rs"]
mod tests;
