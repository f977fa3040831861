use anyhow::Result;

use crate::application::registry;

/// Prints the tool catalogue the orchestrator binds its function calling to.
pub fn handle_tools() -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&registry::catalogue())?);
    Ok(())
}
