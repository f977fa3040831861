//! # Call Command
//!
//! One-shot invocation: `fsgate call <tool> --args '<json>'`.

use anyhow::{Context, Result};
use serde_json::Value;

use crate::application::dispatcher::ToolDispatcher;
use crate::domain::types::Envelope;

/// Runs a single tool call and prints its envelope. Returns false on failure.
pub fn handle_call(dispatcher: &ToolDispatcher, tool: &str, args: Option<&str>) -> Result<bool> {
    let params = match args {
        Some(raw) => serde_json::from_str::<Value>(raw).context("--args is not valid JSON")?,
        None => Value::Null,
    };

    let result = dispatcher.invoke(tool, params);
    println!("{}", serde_json::to_string_pretty(&Envelope(&result))?);

    Ok(result.is_ok())
}
