//! User-facing error message formatting.
//!
//! Matches on typed errors (FetchError variants, io::ErrorKind) rather than
//! parsing strings, so the status line stays short and actionable.

use crate::fetch::FetchError;
use crate::filter::FilterError;
use std::io;

/// Format a FetchError for the status line.
pub fn user_message_from_fetch(err: &FetchError) -> String {
    match err {
        FetchError::Http { url, reason } => {
            let lower = reason.to_lowercase();
            if lower.contains("connection refused") {
                format!("Could not connect to {}. Is the server running?", url)
            } else if lower.contains("timed out") || lower.contains("timeout") {
                format!("Request to {} timed out.", url)
            } else if lower.contains("dns") || lower.contains("resolve") {
                format!("Could not resolve host for {}. Check the URL.", url)
            } else {
                format!("Request to {} failed: {}", url, reason)
            }
        }
        FetchError::Status { url, code, text } => match code {
            404 => format!("Not found (404): {}. Check the URL.", url),
            401 | 403 => format!("Access denied ({}) by {}.", code, url),
            500..=599 => format!("Server error ({} {}) from {}. Try again later.", code, text, url),
            _ => format!("Server returned {} {} for {}.", code, text, url),
        },
        FetchError::Io { path, source } => {
            user_message_from_io(source, Some(&format!("({})", path.display())))
        }
        FetchError::Malformed(detail) => format!("Received malformed device data: {}", detail),
    }
}

/// Format an io::Error as a user-facing message by matching on ErrorKind.
pub fn user_message_from_io(err: &io::Error, context: Option<&str>) -> String {
    use std::io::ErrorKind;

    let base: String = match err.kind() {
        ErrorKind::NotFound => "File or directory not found.".to_string(),
        ErrorKind::PermissionDenied => "Permission denied. Check read access.".to_string(),
        ErrorKind::ConnectionRefused => "Connection refused.".to_string(),
        ErrorKind::ConnectionReset => "Connection reset.".to_string(),
        ErrorKind::InvalidData | ErrorKind::InvalidInput => {
            "Invalid or corrupted data.".to_string()
        }
        ErrorKind::UnexpectedEof => "Unexpected end of file.".to_string(),
        ErrorKind::Interrupted => "Operation interrupted.".to_string(),
        ErrorKind::Other => {
            let msg = err.to_string();
            if msg.contains("Is a directory") {
                return "Path is a directory, not a file.".to_string();
            }
            return if context.is_some() {
                format!("I/O error: {}", msg)
            } else {
                msg
            };
        }
        _ => err.to_string(),
    };

    match context {
        Some(ctx) if !ctx.is_empty() => format!("{} {}", base, ctx),
        _ => base,
    }
}

/// One-line notice for a filter that did not compile.
pub fn user_message_from_filter(err: &FilterError) -> String {
    let FilterError::InvalidPattern { pattern, reason } = err;
    // regex errors are multi-line; the last line carries the actual problem
    let detail = reason
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .next_back()
        .unwrap_or("invalid pattern");
    format!("Invalid pattern '{}': {} (showing all devices)", pattern, detail)
}
