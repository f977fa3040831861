//! # File Store
//!
//! The file primitives exposed as tools: read, create, edit and list, plus their
//! batch variants. Each one resolves through [`PathGuard`] before touching the
//! filesystem and reports every failure as a [`ToolError`] value.
//!
//! Operations are synchronous and not atomic: `create_file` overwrites without a
//! backup, and `edit_file` is a plain read-modify-write (last writer wins).

use std::fs;
use std::io;

use crate::domain::errors::{OperationResult, ToolError};
use crate::domain::paths::{self, MAX_FILE_SIZE};
use crate::domain::types::{
    BatchResult, CreateOutput, EditOutput, EntryKind, FileClassification, FileSpec, ListEntry,
    ListOutput, ReadOutput,
};
use crate::infrastructure::tools::classifier;
use crate::infrastructure::tools::sandbox::{PathGuard, ResolvedPath};

/// One entry of a `create_multiple_files` request after shape checking.
#[derive(Debug, Clone, PartialEq)]
pub enum FileEntry {
    Valid(FileSpec),
    /// Entry without a usable `path`/`content`; `id` is its batch identifier.
    Malformed { id: String, reason: String },
}

#[derive(Debug, Clone)]
pub struct FileStore {
    guard: PathGuard,
    max_file_size: u64,
}

impl FileStore {
    pub fn new(guard: PathGuard) -> Self {
        Self {
            guard,
            max_file_size: MAX_FILE_SIZE,
        }
    }

    /// Lowers the read ceiling. Values above [`MAX_FILE_SIZE`] are clamped to it.
    pub fn with_max_file_size(mut self, limit: u64) -> Self {
        self.max_file_size = limit.min(MAX_FILE_SIZE);
        self
    }

    pub fn guard(&self) -> &PathGuard {
        &self.guard
    }

    pub fn read_file(&self, file_path: &str) -> OperationResult<ReadOutput> {
        let path = self.guard.resolve(file_path)?;
        let content = self.load_text(file_path, &path)?;
        let size = content.chars().count();

        tracing::debug!("Read {} ({} chars)", path, size);
        Ok(ReadOutput {
            file_path: path.to_string(),
            content,
            size,
        })
    }

    /// Reads each path independently; one failure never aborts the others.
    pub fn read_multiple_files(&self, file_paths: &[String]) -> BatchResult<ReadOutput> {
        let mut batch = BatchResult::new();
        for file_path in file_paths {
            batch.push(file_path.as_str(), self.read_file(file_path));
        }
        batch
    }

    /// Writes `content`, creating parent directories and overwriting any existing file.
    pub fn create_file(&self, file_path: &str, content: &str) -> OperationResult<CreateOutput> {
        let path = self.guard.resolve(file_path)?;

        if path.as_path().is_dir() {
            return Err(ToolError::NotAFile {
                path: file_path.to_string(),
            });
        }

        if let Some(parent) = path.as_path().parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ToolError::failed(format!("Failed to create parent directories for {file_path}"), e)
            })?;
        }

        fs::write(path.as_path(), content)
            .map_err(|e| ToolError::failed(format!("Failed to create {file_path}"), e))?;

        let size = content.chars().count();
        tracing::debug!("Wrote {} ({} chars)", path, size);
        Ok(CreateOutput {
            file_path: path.to_string(),
            size,
        })
    }

    pub fn create_multiple_files(&self, entries: Vec<FileEntry>) -> BatchResult<CreateOutput> {
        let mut batch = BatchResult::new();
        for entry in entries {
            match entry {
                FileEntry::Valid(spec) => {
                    let result = self.create_file(&spec.path, &spec.content);
                    batch.push(spec.path, result);
                }
                FileEntry::Malformed { id, reason } => {
                    batch.push(id, Err(ToolError::InvalidParameters(reason)));
                }
            }
        }
        batch
    }

    /// Replaces the first occurrence of `original_snippet` with `new_snippet`.
    pub fn edit_file(
        &self,
        file_path: &str,
        original_snippet: &str,
        new_snippet: &str,
    ) -> OperationResult<EditOutput> {
        if original_snippet.is_empty() {
            return Err(ToolError::invalid("original_snippet must not be empty"));
        }

        let path = self.guard.resolve(file_path)?;
        let content = self.load_text(file_path, &path)?;

        if !content.contains(original_snippet) {
            return Err(ToolError::SnippetNotFound {
                path: file_path.to_string(),
            });
        }

        let updated = content.replacen(original_snippet, new_snippet, 1);
        fs::write(path.as_path(), &updated)
            .map_err(|e| ToolError::failed(format!("Failed to edit {file_path}"), e))?;

        let original_length = content.chars().count();
        let new_length = updated.chars().count();
        tracing::debug!("Edited {} ({} -> {} chars)", path, original_length, new_length);

        Ok(EditOutput {
            file_path: path.to_string(),
            original_length,
            new_length,
            diff: new_length as i64 - original_length as i64,
        })
    }

    /// Lists immediate children, skipping hidden and conventionally ignored names.
    /// Items come back in filesystem enumeration order, which is unordered.
    pub fn list_directory(&self, dir_path: &str) -> OperationResult<ListOutput> {
        let path = self.guard.resolve(dir_path)?;

        let meta = stat(dir_path, &path)?;
        if !meta.is_dir() {
            return Err(ToolError::NotADirectory {
                path: dir_path.to_string(),
            });
        }

        let entries = fs::read_dir(path.as_path())
            .map_err(|e| ToolError::failed(format!("Failed to list directory {dir_path}"), e))?;

        let mut items = Vec::new();
        for entry in entries {
            let entry = entry
                .map_err(|e| ToolError::failed(format!("Failed to list directory {dir_path}"), e))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if paths::is_ignored_name(&name) {
                continue;
            }
            items.push(self.describe_entry(name, &entry));
        }

        tracing::debug!("Listed {} ({} entries)", path, items.len());
        Ok(ListOutput {
            directory: path.to_string(),
            count: items.len(),
            items,
        })
    }

    fn describe_entry(&self, name: String, entry: &fs::DirEntry) -> ListEntry {
        let is_symlink = entry
            .file_type()
            .map(|ft| ft.is_symlink())
            .unwrap_or(false);

        // Links are only followed when their target stays inside the sandbox
        let meta = if is_symlink {
            self.guard
                .resolve_path(&entry.path())
                .ok()
                .and_then(|target| fs::metadata(target.as_path()).ok())
        } else {
            entry.metadata().ok()
        };

        match meta {
            Some(meta) if meta.is_dir() => ListEntry {
                name,
                kind: EntryKind::Directory,
                size: None,
            },
            Some(meta) => ListEntry {
                name,
                kind: EntryKind::File,
                size: Some(meta.len()),
            },
            None => ListEntry {
                name,
                kind: EntryKind::File,
                size: None,
            },
        }
    }

    /// Loads a file as text, applying the existence, size and binary guards.
    fn load_text(&self, requested: &str, path: &ResolvedPath) -> OperationResult<String> {
        let meta = stat(requested, path)?;
        if !meta.is_file() {
            return Err(ToolError::NotAFile {
                path: requested.to_string(),
            });
        }

        if meta.len() > self.max_file_size {
            return Err(ToolError::TooLarge {
                path: requested.to_string(),
                size: meta.len(),
                limit: self.max_file_size,
            });
        }

        if classifier::classify(path) == FileClassification::Binary {
            return Err(ToolError::BinaryRejected {
                path: requested.to_string(),
            });
        }

        fs::read_to_string(path.as_path())
            .map_err(|e| ToolError::failed(format!("Failed to read {requested}"), e))
    }
}

fn stat(requested: &str, path: &ResolvedPath) -> OperationResult<fs::Metadata> {
    fs::metadata(path.as_path()).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory => ToolError::NotFound {
            path: requested.to_string(),
        },
        _ => ToolError::failed(format!("Failed to access {requested}"), e),
    })
}
