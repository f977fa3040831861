//! # Context Collection
//!
//! Gathers files into a prompt-ready bundle for an orchestrator's conversation.
//! A file path yields that file; a directory is walked recursively with the same
//! hidden/ignore filtering as `list_directory`. All access goes through the
//! [`FileStore`], so sandbox, size and binary guards apply to every file.

use std::collections::HashSet;
use std::fmt::Write as _;
use std::path::Path;

use crate::domain::errors::{OperationResult, ToolError};
use crate::domain::types::{EntryKind, ReadOutput};
use crate::infrastructure::tools::store::FileStore;

#[derive(Debug, Default)]
pub struct ContextBundle {
    pub files: Vec<ReadOutput>,
    /// Files that could not be read as text, and subdirectories that could not be listed.
    pub skipped: Vec<(String, ToolError)>,
}

impl ContextBundle {
    /// Renders each file as a `File:` header followed by a fenced block.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for file in &self.files {
            let _ = writeln!(out, "File: {}\n```\n{}\n```", file.file_path, file.content);
        }
        out
    }
}

pub fn collect(store: &FileStore, path: &str) -> OperationResult<ContextBundle> {
    let mut bundle = ContextBundle::default();

    match store.list_directory(path) {
        Ok(_) => {
            let mut visited = HashSet::new();
            walk(store, path, &mut visited, &mut bundle)?;
        }
        Err(ToolError::NotADirectory { .. }) => bundle.files.push(store.read_file(path)?),
        Err(e) => return Err(e),
    }

    tracing::info!(
        "Collected {} file(s) from {} ({} skipped)",
        bundle.files.len(),
        path,
        bundle.skipped.len()
    );
    Ok(bundle)
}

fn walk(
    store: &FileStore,
    dir_path: &str,
    visited: &mut HashSet<String>,
    bundle: &mut ContextBundle,
) -> OperationResult<()> {
    let listing = store.list_directory(dir_path)?;

    // Symlinked directories can lead back to an ancestor
    if !visited.insert(listing.directory.clone()) {
        return Ok(());
    }

    for item in &listing.items {
        let child = Path::new(&listing.directory).join(&item.name);
        let child = child.to_string_lossy();

        let outcome = match item.kind {
            EntryKind::Directory => walk(store, &child, visited, bundle),
            EntryKind::File => store.read_file(&child).map(|file| bundle.files.push(file)),
        };

        if let Err(e) = outcome {
            tracing::debug!("Skipping {}: {}", child, e);
            bundle.skipped.push((child.into_owned(), e));
        }
    }

    Ok(())
}
