//! extm view コマンド
//!
//! レジストリビューの描画結果をHTML断片として出力する。

use super::{ensure_loaded, open_view};
use crate::config::Config;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
pub struct Args {
    /// Write the HTML fragment to a file instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

pub async fn run(args: Args, config: &Config) -> Result<(), String> {
    let view = open_view(config).await;
    let html = view.to_html();

    match args.output {
        Some(path) => {
            std::fs::write(&path, html)
                .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
            log::info!("Wrote registry view to {}", path.display());
        }
        None => println!("{html}"),
    }

    // 描画は失敗時も行い、終了コードで失敗を伝える
    ensure_loaded(&view, config)
}
