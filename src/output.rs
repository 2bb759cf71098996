use owo_colors::OwoColorize;

pub struct CommandSummary {
    pub prefix: String,
    pub message: String,
}

impl CommandSummary {
    /// list コマンドの集計
    pub fn list(total: usize, installed: usize) -> Self {
        match total {
            0 => Self {
                prefix: "•".yellow().to_string(),
                message: "No matching extensions found".to_string(),
            },
            _ => Self {
                prefix: "✓".green().to_string(),
                message: format!("{} extension(s), {} installed", total, installed.green()),
            },
        }
    }

    /// install コマンドの結果
    pub fn install(id: &str, installed: bool) -> Self {
        if installed {
            Self {
                prefix: "✓".green().to_string(),
                message: format!("{} installed", id.green()),
            }
        } else {
            Self {
                prefix: "✗".red().to_string(),
                message: format!("{} was not installed", id.red()),
            }
        }
    }
}
