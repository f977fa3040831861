//! # Tool Registry
//!
//! The fixed catalogue of tools the orchestrator may call. Each [`ToolSpec`] names its
//! parameters, their shapes and which are required; the orchestrator binds its
//! function-calling schema to [`catalogue`], and the dispatcher validates incoming
//! parameter bags against the same specs.
//!
//! Parameter names and types here are a wire contract. Renaming one breaks callers.

use serde_json::{Map, Value, json};

use crate::domain::errors::{OperationResult, ToolError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    ReadFile,
    ReadMultipleFiles,
    CreateFile,
    CreateMultipleFiles,
    EditFile,
    ListDirectory,
}

impl ToolName {
    pub const ALL: [ToolName; 6] = [
        ToolName::ReadFile,
        ToolName::ReadMultipleFiles,
        ToolName::CreateFile,
        ToolName::CreateMultipleFiles,
        ToolName::EditFile,
        ToolName::ListDirectory,
    ];

    pub fn from_str(name: &str) -> Option<Self> {
        match name {
            "read_file" => Some(ToolName::ReadFile),
            "read_multiple_files" => Some(ToolName::ReadMultipleFiles),
            "create_file" => Some(ToolName::CreateFile),
            "create_multiple_files" => Some(ToolName::CreateMultipleFiles),
            "edit_file" => Some(ToolName::EditFile),
            "list_directory" => Some(ToolName::ListDirectory),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::ReadFile => "read_file",
            ToolName::ReadMultipleFiles => "read_multiple_files",
            ToolName::CreateFile => "create_file",
            ToolName::CreateMultipleFiles => "create_multiple_files",
            ToolName::EditFile => "edit_file",
            ToolName::ListDirectory => "list_directory",
        }
    }

    pub fn spec(&self) -> &'static ToolSpec {
        match self {
            ToolName::ReadFile => &READ_FILE,
            ToolName::ReadMultipleFiles => &READ_MULTIPLE_FILES,
            ToolName::CreateFile => &CREATE_FILE,
            ToolName::CreateMultipleFiles => &CREATE_MULTIPLE_FILES,
            ToolName::EditFile => &EDIT_FILE,
            ToolName::ListDirectory => &LIST_DIRECTORY,
        }
    }
}

/// Shape of a single parameter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    String,
    StringArray,
    /// Array of `{path, content}` objects. Entries are checked one by one at dispatch.
    FileArray,
}

impl ParamType {
    fn matches(&self, value: &Value) -> bool {
        match self {
            ParamType::String => value.is_string(),
            ParamType::StringArray => value
                .as_array()
                .map(|items| items.iter().all(Value::is_string))
                .unwrap_or(false),
            ParamType::FileArray => value.is_array(),
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            ParamType::String => "a string",
            ParamType::StringArray => "an array of strings",
            ParamType::FileArray => "an array of {path, content} objects",
        }
    }

    fn schema(&self) -> Value {
        match self {
            ParamType::String => json!({ "type": "string" }),
            ParamType::StringArray => json!({ "type": "array", "items": { "type": "string" } }),
            ParamType::FileArray => json!({
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "path": { "type": "string" },
                        "content": { "type": "string" }
                    },
                    "required": ["path", "content"]
                }
            }),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamType,
    pub required: bool,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct ToolSpec {
    pub name: ToolName,
    pub description: &'static str,
    pub params: &'static [ParamSpec],
}

impl ToolSpec {
    /// Function declaration in the JSON-schema form LLM function calling expects.
    pub fn declaration(&self) -> Value {
        let mut properties = Map::new();
        for param in self.params {
            let mut schema = param.kind.schema();
            if let Some(obj) = schema.as_object_mut() {
                obj.insert("description".to_string(), json!(param.description));
            }
            properties.insert(param.name.to_string(), schema);
        }

        let mut parameters = json!({ "type": "object", "properties": properties });
        let required: Vec<&str> = self
            .params
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name)
            .collect();
        if !required.is_empty() {
            parameters["required"] = json!(required);
        }

        json!({
            "name": self.name.as_str(),
            "description": self.description,
            "parameters": parameters,
        })
    }

    /// Checks a parameter bag against the declared parameters without touching the filesystem.
    pub fn validate(&self, params: &Map<String, Value>) -> OperationResult<()> {
        if let Some(unknown) = params
            .keys()
            .find(|key| !self.params.iter().any(|p| p.name == key.as_str()))
        {
            return Err(ToolError::invalid(format!(
                "{} does not accept parameter '{}'",
                self.name.as_str(),
                unknown
            )));
        }

        for param in self.params {
            match params.get(param.name) {
                None | Some(Value::Null) if param.required => {
                    return Err(ToolError::invalid(format!(
                        "{} requires parameter '{}'",
                        self.name.as_str(),
                        param.name
                    )));
                }
                None | Some(Value::Null) => {}
                Some(value) if !param.kind.matches(value) => {
                    return Err(ToolError::invalid(format!(
                        "'{}' must be {}",
                        param.name,
                        param.kind.describe()
                    )));
                }
                Some(_) => {}
            }
        }

        Ok(())
    }
}

static READ_FILE: ToolSpec = ToolSpec {
    name: ToolName::ReadFile,
    description: "Read the content of a single file",
    params: &[ParamSpec {
        name: "file_path",
        kind: ParamType::String,
        required: true,
        description: "Path to the file to read",
    }],
};

static READ_MULTIPLE_FILES: ToolSpec = ToolSpec {
    name: ToolName::ReadMultipleFiles,
    description: "Read the contents of multiple files",
    params: &[ParamSpec {
        name: "file_paths",
        kind: ParamType::StringArray,
        required: true,
        description: "List of file paths to read",
    }],
};

static CREATE_FILE: ToolSpec = ToolSpec {
    name: ToolName::CreateFile,
    description: "Create a new file or overwrite an existing one",
    params: &[
        ParamSpec {
            name: "file_path",
            kind: ParamType::String,
            required: true,
            description: "Path where the file should be created",
        },
        ParamSpec {
            name: "content",
            kind: ParamType::String,
            required: true,
            description: "Content to write to the file",
        },
    ],
};

static CREATE_MULTIPLE_FILES: ToolSpec = ToolSpec {
    name: ToolName::CreateMultipleFiles,
    description: "Create multiple files at once",
    params: &[ParamSpec {
        name: "files",
        kind: ParamType::FileArray,
        required: true,
        description: "List of files to create, each with path and content",
    }],
};

static EDIT_FILE: ToolSpec = ToolSpec {
    name: ToolName::EditFile,
    description: "Replace the first occurrence of a snippet in a file with new content",
    params: &[
        ParamSpec {
            name: "file_path",
            kind: ParamType::String,
            required: true,
            description: "Path to the file to edit",
        },
        ParamSpec {
            name: "original_snippet",
            kind: ParamType::String,
            required: true,
            description: "The exact text to be replaced",
        },
        ParamSpec {
            name: "new_snippet",
            kind: ParamType::String,
            required: true,
            description: "The new text to replace the original snippet",
        },
    ],
};

static LIST_DIRECTORY: ToolSpec = ToolSpec {
    name: ToolName::ListDirectory,
    description: "List the contents of a directory",
    params: &[ParamSpec {
        name: "dir_path",
        kind: ParamType::String,
        required: false,
        description: "Path to the directory to list (default: current directory)",
    }],
};

/// All tool declarations, in registry order.
pub fn catalogue() -> Vec<Value> {
    ToolName::ALL.iter().map(|t| t.spec().declaration()).collect()
}
