//! extm install コマンド
//!
//! ビューのインストールボタンを押したのと同じ手順でインストールする。

use super::{ensure_loaded, open_view};
use crate::config::Config;
use crate::error::ExtmError;
use crate::output::CommandSummary;
use crate::view::Click;
use clap::Parser;

#[derive(Debug, Parser)]
pub struct Args {
    /// Extension ID as listed by `extm list`
    pub id: String,
}

pub async fn run(args: Args, config: &Config) -> Result<(), String> {
    let view = open_view(config).await;
    ensure_loaded(&view, config)?;

    let root = view.render();
    let button = root
        .find(|el| {
            el.tag == "button"
                && el.has_class("install")
                && el.get_attr("data-extension-id") == Some(args.id.as_str())
        })
        .ok_or_else(|| ExtmError::ExtensionNotFound(args.id.clone()).to_string())?;

    let handle = match view.click(button) {
        Click::InstallStarted(handle) => handle,
        _ => return Err(format!("Extension {} is already installed", args.id)),
    };
    handle.await.map_err(|e| e.to_string())?;

    let installed = view.model().installed_ids.contains(&args.id);
    let summary = CommandSummary::install(&args.id, installed);
    println!("{} {}", summary.prefix, summary.message);

    if installed {
        Ok(())
    } else {
        Err(format!("Install of {} did not complete (see warnings above)", args.id))
    }
}
