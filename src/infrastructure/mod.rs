//! # Infrastructure Layer
//!
//! Handles interactions with the host filesystem.
//! Everything that touches disk on behalf of a tool call lives under `tools`.

pub mod tools;
