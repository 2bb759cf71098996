use crate::cli::{Cli, Command, GlobalArgs};
use crate::config::Config;
use crate::install::ArchiveInstaller;
use crate::loader::DirectoryExtensionLoader;
use crate::model::RemoteRegistryModel;
use crate::opener::SystemBrowser;
use crate::strings::Lang;
use crate::view::{Collaborators, RegistryView, ViewOptions, ViewState};
use std::sync::Arc;

pub mod install;
pub mod list;
pub mod open;
pub mod view;

pub async fn dispatch(cli: Cli) -> Result<(), String> {
    let config = load_config(&cli.global)?;

    match cli.command {
        Command::View(args) => view::run(args, &config).await,
        Command::List(args) => list::run(args, &config).await,
        Command::Install(args) => install::run(args, &config).await,
        Command::Open(args) => open::run(args).await,
    }
}

/// 設定ファイル・環境変数・CLIフラグの順に解決
fn load_config(global: &GlobalArgs) -> Result<Config, String> {
    let mut config = Config::load().map_err(|e| e.to_string())?;

    if let Some(url) = &global.registry_url {
        config.registry_url = url.clone();
    }
    if let Some(dir) = &global.extensions_dir {
        config.extensions_dir = dir.clone();
    }
    if let Some(lang) = &global.lang {
        config.lang = Lang::from_locale(lang);
    }

    log::debug!("Resolved configuration: {:?}", config);
    Ok(config)
}

/// 設定から実装を組み立ててビューを構築し、初回取得の完了を待つ
async fn open_view(config: &Config) -> RegistryView {
    let deps = Collaborators {
        model: Arc::new(RemoteRegistryModel::new(&config.registry_url, &config.http)),
        loader: Arc::new(DirectoryExtensionLoader::new(&config.extensions_dir)),
        dialog: Arc::new(ArchiveInstaller::new(&config.extensions_dir, &config.http)),
        opener: Arc::new(SystemBrowser::new()),
    };
    let view = RegistryView::new(
        deps,
        ViewOptions {
            download_host: config.download_host.clone(),
            lang: config.lang,
        },
    );
    view.wait_until_settled().await;
    view
}

/// 取得失敗時はローカライズ済みの固定メッセージをエラーにする
fn ensure_loaded(view: &RegistryView, config: &Config) -> Result<(), String> {
    match view.model().state {
        ViewState::Error => Err(config.lang.strings().extension_manager_error_load.to_string()),
        _ => Ok(()),
    }
}
