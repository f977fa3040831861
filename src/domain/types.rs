//! # Domain Types
//!
//! Payloads returned by the file tools, the batch container, and the envelope
//! that puts an [`OperationResult`] on the wire.

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use crate::domain::errors::{OperationResult, ToolError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileClassification {
    Text,
    Binary,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReadOutput {
    pub file_path: String,
    pub content: String,
    pub size: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CreateOutput {
    pub file_path: String,
    pub size: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EditOutput {
    pub file_path: String,
    pub original_length: usize,
    pub new_length: usize,
    pub diff: i64,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ListEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub size: Option<u64>,
}

/// Directory listing. `items` is in filesystem enumeration order, which is unordered.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ListOutput {
    pub directory: String,
    pub items: Vec<ListEntry>,
    pub count: usize,
}

/// One `create_multiple_files` entry after shape validation. Keys other than
/// `path` and `content` are ignored.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FileSpec {
    pub path: String,
    pub content: String,
}

/// Independently attributable result of one batch item.
#[derive(Debug)]
pub struct BatchItem<T> {
    pub id: String,
    pub result: OperationResult<T>,
}

/// Fan-out result. `success` is true iff no item failed.
#[derive(Debug)]
pub struct BatchResult<T> {
    pub items: Vec<BatchItem<T>>,
}

impl<T> BatchResult<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, id: impl Into<String>, result: OperationResult<T>) {
        self.items.push(BatchItem {
            id: id.into(),
            result,
        });
    }

    pub fn success(&self) -> bool {
        self.failed() == 0
    }

    pub fn failed(&self) -> usize {
        self.items.iter().filter(|item| item.result.is_err()).count()
    }

    /// First item recorded under `id`.
    #[cfg(test)]
    pub fn get(&self, id: &str) -> Option<&OperationResult<T>> {
        self.items
            .iter()
            .find(|item| item.id == id)
            .map(|item| &item.result)
    }
}

impl<T> Default for BatchResult<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Serialize> Serialize for BatchResult<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("success", &self.success())?;
        map.serialize_entry("failed", &self.failed())?;
        map.serialize_entry("results", &self.items)?;
        map.end()
    }
}

impl<T: Serialize> Serialize for BatchItem<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Item<'a, T: Serialize> {
            id: &'a str,
            #[serde(flatten)]
            outcome: Envelope<'a, T>,
        }

        Item {
            id: &self.id,
            outcome: Envelope(&self.result),
        }
        .serialize(serializer)
    }
}

/// Output of any tool, as produced by the dispatcher.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ToolOutput {
    Read(ReadOutput),
    ReadBatch(BatchResult<ReadOutput>),
    Created(CreateOutput),
    CreateBatch(BatchResult<CreateOutput>),
    Edited(EditOutput),
    Listing(ListOutput),
}

/// Wire form of an [`OperationResult`].
///
/// Success writes the payload's own fields; failure writes `error` and `kind`.
/// Consumers detect failure solely by the presence of the `error` key.
#[derive(Debug)]
pub struct Envelope<'a, T>(pub &'a OperationResult<T>);

impl<T: Serialize> Serialize for Envelope<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Ok(payload) => payload.serialize(serializer),
            Err(err) => serialize_failure(err, serializer),
        }
    }
}

fn serialize_failure<S: Serializer>(err: &ToolError, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(2))?;
    map.serialize_entry("error", &err.to_string())?;
    map.serialize_entry("kind", &err.kind())?;
    map.end()
}
