//! # Tool Dispatcher
//!
//! Turns a tool name plus an untyped parameter bag into a typed [`ToolCall`], then
//! routes it to the [`FileStore`]. Validation happens before any filesystem access,
//! so malformed calls never reach the path guard.
//!
//! `invoke` is total: unknown tools, bad parameters, I/O faults and even panics
//! inside an operation all come back as an `Err` value.

use std::io;
use std::panic::{self, AssertUnwindSafe};

use serde_json::{Map, Value};

use crate::application::registry::ToolName;
use crate::domain::errors::{OperationResult, ToolError};
use crate::domain::types::{FileSpec, ToolOutput};
use crate::infrastructure::tools::store::{FileEntry, FileStore};

/// A validated call, one variant per registered tool.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolCall {
    ReadFile {
        file_path: String,
    },
    ReadMultipleFiles {
        file_paths: Vec<String>,
    },
    CreateFile {
        file_path: String,
        content: String,
    },
    CreateMultipleFiles {
        files: Vec<FileEntry>,
    },
    EditFile {
        file_path: String,
        original_snippet: String,
        new_snippet: String,
    },
    ListDirectory {
        dir_path: String,
    },
}

impl ToolCall {
    /// Validating constructor. `params` may be `null`, which counts as `{}`.
    pub fn parse(name: &str, params: Value) -> OperationResult<Self> {
        let tool = ToolName::from_str(name).ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;

        let mut params = match params {
            Value::Null => Map::new(),
            Value::Object(map) => map,
            other => {
                return Err(ToolError::invalid(format!(
                    "parameters for {} must be an object, got {}",
                    name,
                    json_type(&other)
                )));
            }
        };

        tool.spec().validate(&params)?;

        let call = match tool {
            ToolName::ReadFile => ToolCall::ReadFile {
                file_path: take_string(&mut params, "file_path")?,
            },
            ToolName::ReadMultipleFiles => ToolCall::ReadMultipleFiles {
                file_paths: take_array(&mut params, "file_paths")?
                    .into_iter()
                    .map(|v| match v {
                        Value::String(s) => Ok(s),
                        _ => Err(ToolError::invalid("'file_paths' must be an array of strings")),
                    })
                    .collect::<OperationResult<Vec<_>>>()?,
            },
            ToolName::CreateFile => ToolCall::CreateFile {
                file_path: take_string(&mut params, "file_path")?,
                content: take_string(&mut params, "content")?,
            },
            ToolName::CreateMultipleFiles => ToolCall::CreateMultipleFiles {
                files: take_array(&mut params, "files")?
                    .into_iter()
                    .enumerate()
                    .map(|(index, entry)| file_entry(index, entry))
                    .collect(),
            },
            ToolName::EditFile => ToolCall::EditFile {
                file_path: take_string(&mut params, "file_path")?,
                original_snippet: take_string(&mut params, "original_snippet")?,
                new_snippet: take_string(&mut params, "new_snippet")?,
            },
            ToolName::ListDirectory => ToolCall::ListDirectory {
                dir_path: match params.remove("dir_path") {
                    Some(Value::String(s)) => s,
                    _ => ".".to_string(),
                },
            },
        };

        Ok(call)
    }

    pub fn tool(&self) -> ToolName {
        match self {
            ToolCall::ReadFile { .. } => ToolName::ReadFile,
            ToolCall::ReadMultipleFiles { .. } => ToolName::ReadMultipleFiles,
            ToolCall::CreateFile { .. } => ToolName::CreateFile,
            ToolCall::CreateMultipleFiles { .. } => ToolName::CreateMultipleFiles,
            ToolCall::EditFile { .. } => ToolName::EditFile,
            ToolCall::ListDirectory { .. } => ToolName::ListDirectory,
        }
    }
}

fn take_string(params: &mut Map<String, Value>, key: &str) -> OperationResult<String> {
    match params.remove(key) {
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(ToolError::invalid(format!("'{key}' must be a string"))),
        None => Err(ToolError::invalid(format!("missing required parameter '{key}'"))),
    }
}

fn take_array(params: &mut Map<String, Value>, key: &str) -> OperationResult<Vec<Value>> {
    match params.remove(key) {
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(ToolError::invalid(format!("'{key}' must be an array"))),
        None => Err(ToolError::invalid(format!("missing required parameter '{key}'"))),
    }
}

/// Shape-checks one `files` entry. Malformed entries stay in the batch as item failures.
fn file_entry(index: usize, entry: Value) -> FileEntry {
    let id = entry
        .get("path")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("files[{index}]"));

    match serde_json::from_value::<FileSpec>(entry) {
        Ok(spec) => FileEntry::Valid(spec),
        Err(e) => FileEntry::Malformed {
            id,
            reason: format!("File info must contain 'path' and 'content' keys ({e})"),
        },
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Stateless router from tool calls to file operations.
#[derive(Debug, Clone)]
pub struct ToolDispatcher {
    store: FileStore,
}

impl ToolDispatcher {
    pub fn new(store: FileStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &FileStore {
        &self.store
    }

    pub fn invoke(&self, name: &str, params: Value) -> OperationResult<ToolOutput> {
        tracing::info!("Tool call: {}", name);

        let result = ToolCall::parse(name, params).and_then(|call| self.execute(call));

        match &result {
            Ok(ToolOutput::ReadBatch(batch)) if !batch.success() => {
                tracing::warn!("Tool {} finished with {} failed item(s)", name, batch.failed())
            }
            Ok(ToolOutput::CreateBatch(batch)) if !batch.success() => {
                tracing::warn!("Tool {} finished with {} failed item(s)", name, batch.failed())
            }
            Ok(_) => tracing::info!("Tool {} succeeded", name),
            Err(e) => tracing::warn!("Tool {} failed: {}", name, e),
        }

        result
    }

    pub fn execute(&self, call: ToolCall) -> OperationResult<ToolOutput> {
        tracing::debug!("Executing {}", call.tool().as_str());

        // The store holds no state a panic could leave half-updated
        panic::catch_unwind(AssertUnwindSafe(|| self.run(call))).unwrap_or_else(|payload| {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            Err(ToolError::failed("Tool execution failed", io::Error::other(message)))
        })
    }

    fn run(&self, call: ToolCall) -> OperationResult<ToolOutput> {
        let store = &self.store;
        match call {
            ToolCall::ReadFile { file_path } => store.read_file(&file_path).map(ToolOutput::Read),
            ToolCall::ReadMultipleFiles { file_paths } => Ok(ToolOutput::ReadBatch(
                store.read_multiple_files(&file_paths),
            )),
            ToolCall::CreateFile { file_path, content } => store
                .create_file(&file_path, &content)
                .map(ToolOutput::Created),
            ToolCall::CreateMultipleFiles { files } => {
                Ok(ToolOutput::CreateBatch(store.create_multiple_files(files)))
            }
            ToolCall::EditFile {
                file_path,
                original_snippet,
                new_snippet,
            } => store
                .edit_file(&file_path, &original_snippet, &new_snippet)
                .map(ToolOutput::Edited),
            ToolCall::ListDirectory { dir_path } => {
                store.list_directory(&dir_path).map(ToolOutput::Listing)
            }
        }
    }
}
