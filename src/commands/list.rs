//! extm list コマンド
//!
//! レジストリの拡張機能を新しい順に一覧表示する。

use super::{ensure_loaded, open_view};
use crate::config::Config;
use crate::output::CommandSummary;
use crate::registry::utils::{format_user_id, last_version_date};
use crate::registry::RegistryEntry;
use clap::Parser;
use comfy_table::{presets::UTF8_FULL, Table};
use serde::Serialize;

#[derive(Debug, Parser)]
pub struct Args {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,

    /// Show only installed extensions
    #[arg(long)]
    pub installed: bool,
}

/// 一覧出力用の1行
#[derive(Debug, Clone, Serialize)]
struct ListItem {
    id: String,
    name: String,
    version: String,
    last_updated: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    owner: Option<String>,
    installed: bool,
}

impl ListItem {
    fn new(id: &str, entry: &RegistryEntry, installed: bool) -> Self {
        Self {
            id: id.to_string(),
            name: entry.metadata.display_name().to_string(),
            version: entry.metadata.version.clone(),
            last_updated: last_version_date(entry),
            owner: entry.owner.as_deref().and_then(format_user_id),
            installed,
        }
    }
}

pub async fn run(args: Args, config: &Config) -> Result<(), String> {
    let view = open_view(config).await;
    ensure_loaded(&view, config)?;

    let items = build_items(&view.entries_with_status(), args.installed);

    if args.json {
        serde_json::to_string_pretty(&items)
            .map(|json| println!("{json}"))
            .map_err(|e| e.to_string())
    } else {
        print_table(&items, config);
        Ok(())
    }
}

fn build_items(entries: &[(String, RegistryEntry, bool)], installed_only: bool) -> Vec<ListItem> {
    entries
        .iter()
        .map(|(id, entry, installed)| ListItem::new(id, entry, *installed))
        .filter(|item| !installed_only || item.installed)
        .collect()
}

fn print_table(items: &[ListItem], config: &Config) {
    if !items.is_empty() {
        let strings = config.lang.strings();
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec!["ID", "Name", "Version", "Updated", "Owner", "Status"]);

        for item in items {
            table.add_row(vec![
                item.id.as_str(),
                item.name.as_str(),
                item.version.as_str(),
                item.last_updated.as_str(),
                item.owner.as_deref().unwrap_or("-"),
                if item.installed { strings.installed } else { "" },
            ]);
        }

        println!("{table}");
    }

    let installed = items.iter().filter(|item| item.installed).count();
    let summary = CommandSummary::list(items.len(), installed);
    println!("{} {}", summary.prefix, summary.message);
}
