//! # Help Text
//!
//! Descriptions shown by `--help` for the binary and its subcommands.

pub const ABOUT: &str = "Sandboxed file tools for an LLM orchestrator";

pub const LONG_ABOUT: &str = concat!(
    "Sandboxed file tools for an LLM orchestrator.\n",
    "\n",
    "Every path is resolved against the current working directory, which is the\n",
    "sandbox root; nothing outside it can be read, written or listed.\n",
    "\n",
    "Tools: read_file, read_multiple_files, create_file, create_multiple_files,\n",
    "edit_file, list_directory. Run `fsgate tools` for their parameter schemas."
);

pub const TOOLS: &str = "Print the tool catalogue as JSON function declarations";

pub const CALL: &str = "Invoke one tool and print its result";

pub const SERVE: &str = concat!(
    "Answer tool calls over stdin/stdout, one JSON object per line.\n",
    "\n",
    "Input:  {\"name\": \"read_file\", \"args\": {\"file_path\": \"src/main.rs\"}}\n",
    "Output: {\"name\": \"read_file\", \"result\": {...}}\n",
    "\n",
    "A result with an \"error\" key is a failure; anything else is a success."
);

pub const CONTEXT: &str = "Print a file, or every text file under a directory, as prompt context";
