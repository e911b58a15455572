//! Shared CLI definitions for sensortui.
//!
//! Used by the main application and by the build script (manpage) and
//! gen_docs binary (command-line-options markdown).

use clap::{CommandFactory, Parser};
use std::path::PathBuf;

/// Where telemetry records come from, decided from the `SOURCE` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    /// Fetch a JSON array over HTTP(S)
    Url(String),
    /// Read a JSON array from a local file
    File(PathBuf),
}

impl SourceKind {
    /// Anything starting with `http://` or `https://` is a URL, the rest are paths.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let lower = trimmed.to_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Url(trimmed.to_string())
        } else {
            Self::File(PathBuf::from(trimmed))
        }
    }
}

/// Command-line arguments for sensortui
#[derive(Clone, Parser, Debug, Default)]
#[command(
    name = "sensortui",
    version,
    about = "Browse IoT device telemetry in the terminal"
)]
pub struct Args {
    /// URL or JSON file to load records from. Defaults to [source] url in the config file
    #[arg(value_name = "SOURCE")]
    pub source: Option<String>,

    /// Rows per page (must be one of the configured page size options)
    #[arg(long = "page-size", value_name = "N")]
    pub page_size: Option<usize>,

    /// Start in dense mode (compact rows)
    #[arg(long = "dense", action)]
    pub dense: bool,

    /// Initial filter text applied to device names
    #[arg(long = "filter", value_name = "TEXT")]
    pub filter: Option<String>,

    /// Interpret filter text as a regular expression instead of a literal
    #[arg(long = "regex", action)]
    pub regex: bool,

    /// HTTP timeout in seconds when SOURCE is a URL
    #[arg(long = "timeout", value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Enable debug mode (debug status line and debug-level logging)
    #[arg(long = "debug", action)]
    pub debug: bool,

    /// Clear all cache data (log file) and exit
    #[arg(long = "clear-cache", action)]
    pub clear_cache: bool,

    /// Generate default configuration file at ~/.config/sensortui/config.toml
    #[arg(long = "generate-config", action)]
    pub generate_config: bool,

    /// Force overwrite existing config file when using --generate-config
    #[arg(long = "force", requires = "generate_config", action)]
    pub force: bool,
}

impl Args {
    pub fn source_kind(&self) -> Option<SourceKind> {
        self.source.as_deref().map(SourceKind::parse)
    }
}

/// Escape `|` and newlines for use in markdown table cells.
fn escape_table_cell(s: &str) -> String {
    s.replace('|', "\\|").replace(['\n', '\r'], " ")
}

/// Render command-line options as markdown.
pub fn render_options_markdown() -> String {
    let mut cmd = Args::command();
    cmd.build();

    let mut out = String::from("# Command Line Options\n\n");

    out.push_str("## Usage\n\n```\n");
    out.push_str(&cmd.render_usage().to_string());
    out.push_str("\n```\n\n");

    out.push_str("## Options\n\n");
    out.push_str("| Option | Description |\n");
    out.push_str("|--------|-------------|\n");

    for arg in cmd.get_arguments() {
        let id = arg.get_id().as_ref().to_string();
        if id == "help" || id == "version" {
            continue;
        }

        let placeholder: String = arg
            .get_value_names()
            .map(|names| {
                names
                    .iter()
                    .map(|n: &clap::builder::Str| format!("<{}>", n.as_ref() as &str))
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .unwrap_or_default();

        let option_str = if arg.is_positional() {
            if arg.is_required_set() {
                placeholder
            } else {
                format!("[{placeholder}]")
            }
        } else {
            let mut parts = Vec::new();
            if let Some(s) = arg.get_short() {
                parts.push(format!("-{s}"));
            }
            if let Some(l) = arg.get_long() {
                parts.push(format!("--{l}"));
            }
            let op = parts.join(", ");
            if arg.get_action().takes_values() && !placeholder.is_empty() {
                format!("{op} {placeholder}")
            } else {
                op
            }
        };

        let help = arg
            .get_help()
            .map(|h| escape_table_cell(&h.to_string()))
            .unwrap_or_else(|| "-".to_string());

        out.push_str(&format!("| `{option_str}` | {help} |\n"));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_kind_parse() {
        assert_eq!(
            SourceKind::parse("http://localhost:4000/posts"),
            SourceKind::Url("http://localhost:4000/posts".to_string())
        );
        assert_eq!(
            SourceKind::parse("HTTPS://example.com/x"),
            SourceKind::Url("HTTPS://example.com/x".to_string())
        );
        assert_eq!(
            SourceKind::parse("data/devices.json"),
            SourceKind::File(PathBuf::from("data/devices.json"))
        );
    }

    #[test]
    fn test_args_parse() {
        let args = Args::parse_from([
            "sensortui",
            "devices.json",
            "--page-size",
            "10",
            "--dense",
            "--filter",
            "sensor",
        ]);
        assert_eq!(args.source.as_deref(), Some("devices.json"));
        assert_eq!(args.page_size, Some(10));
        assert!(args.dense);
        assert_eq!(args.filter.as_deref(), Some("sensor"));
        assert!(!args.regex);
    }

    #[test]
    fn test_force_requires_generate_config() {
        assert!(Args::try_parse_from(["sensortui", "--force"]).is_err());
        assert!(Args::try_parse_from(["sensortui", "--generate-config", "--force"]).is_ok());
    }

    #[test]
    fn test_options_markdown_lists_flags() {
        let md = render_options_markdown();
        assert!(md.contains("--page-size"));
        assert!(md.contains("[<SOURCE>]"));
    }
}
