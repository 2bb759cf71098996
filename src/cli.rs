use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::commands::{install, list, open, view};

#[derive(Debug, Parser)]
#[command(name = "extm")]
#[command(about = "Extension Manager CLI", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// 全サブコマンド共通の設定上書き
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Registry JSON URL (overrides config and EXTM_REGISTRY_URL)
    #[arg(long, global = true)]
    pub registry_url: Option<String>,

    /// Directory holding installed extensions (overrides config and EXTM_EXTENSIONS_DIR)
    #[arg(long, global = true)]
    pub extensions_dir: Option<PathBuf>,

    /// UI language, e.g. "en" or "ja" (overrides config and EXTM_LANG)
    #[arg(long, global = true)]
    pub lang: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Render the registry view as HTML
    #[command(
        long_about = "Fetch the extension registry and print the rendered extension list as an HTML fragment."
    )]
    View(view::Args),

    /// List extensions in the registry
    #[command(long_about = "List the extensions in the registry, most recently updated first.

OUTPUT FORMATS:
  (default)  Table with id, name, version, last update, owner and install status
  --json     JSON array with the same fields")]
    List(list::Args),

    /// Install an extension from the registry
    #[command(long_about = "Install an extension from the registry.

The package is downloaded from <download-host>/<ID>/<ID>-<version>.zip using the
version currently listed in the registry, and extracted into the extensions directory.")]
    Install(install::Args),

    /// Open a URL in the default browser
    #[command(
        long_about = "Open an http(s) URL, such as an extension homepage, in the default browser."
    )]
    Open(open::Args),
}
