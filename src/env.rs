/// 環境変数ユーティリティ
pub struct EnvVar;

impl EnvVar {
    /// レジストリURLの上書き
    pub const REGISTRY_URL: &'static str = "EXTM_REGISTRY_URL";
    /// ダウンロードホストの上書き
    pub const DOWNLOAD_HOST: &'static str = "EXTM_DOWNLOAD_HOST";
    /// 拡張機能ディレクトリの上書き
    pub const EXTENSIONS_DIR: &'static str = "EXTM_EXTENSIONS_DIR";
    /// 表示言語
    pub const LANG: &'static str = "EXTM_LANG";
    /// ログレベル（env_logger のフィルタ書式）
    pub const LOG: &'static str = "EXTM_LOG";

    /// 環境変数を取得（空文字列はNoneとして扱う）
    pub fn get(key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
#[path = "env_test.rs"]
mod tests;
