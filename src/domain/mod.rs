//! # Domain Layer
//!
//! Core definitions, types, and errors that define the file-tool domain.
//! Independent of the CLI and transport, serving as the contract for other layers.

pub mod config;
pub mod errors;
pub mod paths;
pub mod types;
