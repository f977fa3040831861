use anyhow::Result;

use crate::application::context;
use crate::infrastructure::tools::store::FileStore;

/// Prints `path` (a file, or every text file beneath a directory) as prompt context.
pub fn handle_context(store: &FileStore, path: &str) -> Result<()> {
    let bundle = context::collect(store, path)?;
    print!("{}", bundle.render());

    for (skipped, reason) in &bundle.skipped {
        eprintln!("skipped {skipped}: {reason}");
    }
    Ok(())
}
