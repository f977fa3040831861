//! # Tools Module
//!
//! In-process file tools with sandboxing: path resolution, text/binary
//! classification, and the file operations built on both.

pub mod classifier;
pub mod sandbox;
pub mod store;
