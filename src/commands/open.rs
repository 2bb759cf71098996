//! extm open コマンド

use crate::opener::{SystemBrowser, UrlOpener};
use clap::Parser;

#[derive(Debug, Parser)]
pub struct Args {
    /// URL to open
    pub url: String,
}

pub async fn run(args: Args) -> Result<(), String> {
    SystemBrowser::new()
        .open_url_in_default_browser(&args.url)
        .map_err(|e| e.to_string())
}
