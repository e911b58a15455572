//! Glue between parsed command-line arguments and the application config.

use crate::config::AppConfig;
use crate::fetch::{FileSource, HttpSource, RecordSource};
use crate::filter::FilterMode;
use std::sync::Arc;
use std::time::Duration;

pub use sensortui_cli::{Args, SourceKind};

/// Flags win over the config file.
pub fn apply_overrides(args: &Args, config: &mut AppConfig) {
    if let Some(page_size) = args.page_size {
        config.display.page_size = page_size;
        if !config.display.page_size_options.contains(&page_size) {
            config.display.page_size_options.push(page_size);
            config.display.page_size_options.sort_unstable();
        }
    }
    if args.dense {
        config.display.dense = true;
    }
    if args.regex {
        config.filter.mode = FilterMode::Regex;
    }
    if let Some(timeout) = args.timeout_secs {
        config.source.timeout_secs = timeout;
    }
    if args.debug {
        config.debug.enabled = true;
        config.debug.log_level = "debug".to_string();
    }
}

/// The positional `SOURCE` if given, else the configured URL.
pub fn record_source(args: &Args, config: &AppConfig) -> Arc<dyn RecordSource> {
    let timeout = Duration::from_secs(config.source.timeout_secs);
    match args.source_kind() {
        Some(SourceKind::File(path)) => Arc::new(FileSource::new(path)),
        Some(SourceKind::Url(url)) => Arc::new(HttpSource::new(url).with_timeout(timeout)),
        None => Arc::new(HttpSource::new(config.source.url.clone()).with_timeout(timeout)),
    }
}
