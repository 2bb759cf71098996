//! UI文字列のローカライズ
//!
//! ビューが表示する固定文言を言語ごとに保持する。

/// 表示言語
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lang {
    #[default]
    En,
    Ja,
}

impl Lang {
    /// ロケール文字列から言語を決定（"ja", "ja_JP.UTF-8", "ja-JP" など）
    ///
    /// 未対応の言語は英語にフォールバックする。
    pub fn from_locale(locale: &str) -> Self {
        let primary = locale
            .split(['_', '-', '.'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match primary.as_str() {
            "ja" => Lang::Ja,
            _ => Lang::En,
        }
    }

    /// 言語に対応する文字列テーブルを取得
    pub fn strings(self) -> &'static Strings {
        match self {
            Lang::En => &EN,
            Lang::Ja => &JA,
        }
    }
}

/// ビューで使用する文字列テーブル
#[derive(Debug)]
pub struct Strings {
    pub extension_manager_error_load: &'static str,
    pub install: &'static str,
    pub installed: &'static str,
    pub more_info: &'static str,
    pub by: &'static str,
}

static EN: Strings = Strings {
    extension_manager_error_load:
        "Unable to access the extension registry. Please try again later.",
    install: "Install",
    installed: "Installed",
    more_info: "More info...",
    by: "by",
};

static JA: Strings = Strings {
    extension_manager_error_load:
        "拡張機能レジストリにアクセスできません。しばらくしてから再度お試しください。",
    install: "インストール",
    installed: "インストール済み",
    more_info: "詳細...",
    by: "作成者:",
};
