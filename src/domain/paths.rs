//! # Sandbox Paths & Limits
//!
//! Centralized definitions for file locations, size ceilings and the name lists
//! the file tools consult. Single source of truth for these values.

/// Per-user directory name under the platform config and data dirs.
/// Nothing here is ever read from or written to the working directory, which the
/// tools expose to the caller.
pub const APP_DIR: &str = "fsgate";
pub const CONFIG_FILE_NAME: &str = "config.yaml";

pub const LOG_FILE: &str = "session.log";

/// Read ceiling for a single file (1 MiB). Configuration may lower it, never raise it.
pub const MAX_FILE_SIZE: u64 = 1024 * 1024;

/// Number of leading bytes inspected when sniffing for binary content.
pub const SNIFF_LEN: u64 = 1024;

/// Maximum number of symlinks followed while resolving one path.
pub const MAX_SYMLINK_HOPS: usize = 40;

/// Directory entries starting with this marker are hidden from listings.
pub const HIDDEN_MARKER: char = '.';

/// Conventional build-cache and dependency directories skipped by listings.
pub const IGNORED_NAMES: &[&str] = &[
    "__pycache__",
    "node_modules",
    "target",
    "venv",
    "dist",
    "build",
];

/// Extensions always treated as text, regardless of content.
pub const TEXT_EXTENSIONS: &[&str] = &[
    // plain text & docs
    "txt", "md", "rst", "adoc", "log", "csv", "tsv",
    // source
    "py", "js", "jsx", "ts", "tsx", "rs", "go", "c", "h", "cpp", "hpp", "cc", "java", "kt",
    "rb", "php", "swift", "cs", "lua", "sql",
    // shell
    "sh", "bash", "zsh", "bat", "ps1",
    // markup & styles
    "html", "htm", "css", "scss", "xml", "svg",
    // config & data interchange
    "json", "yaml", "yml", "toml", "ini", "cfg", "conf", "env",
];

/// Returns true when `name` is hidden or on the ignore list.
pub fn is_ignored_name(name: &str) -> bool {
    name.starts_with(HIDDEN_MARKER) || IGNORED_NAMES.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ignored_names() {
        assert!(is_ignored_name(".git"));
        assert!(is_ignored_name(".env"));
        assert!(is_ignored_name("node_modules"));
        assert!(is_ignored_name("__pycache__"));
        assert!(!is_ignored_name("src"));
        assert!(!is_ignored_name("targets"));
    }
}
