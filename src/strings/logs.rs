use std::path::Path;

pub fn config_loaded(source: &str) -> String {
    format!("Loaded configuration from {source}")
}

pub fn session_started(root: &Path) -> String {
    format!("Sandbox root: {}", root.display())
}

pub const SERVE_START: &str = "Serving tool calls on stdin/stdout";
pub const SERVE_EOF: &str = "stdin closed, shutting down";

pub fn serve_bad_line(err: &str) -> String {
    format!("Rejected malformed request line: {err}")
}

pub fn serve_handled(count: usize) -> String {
    format!("Handled {count} tool call(s)")
}

pub fn dispatch_panicked(err: &str) -> String {
    format!("Tool worker stopped unexpectedly: {err}")
}
