//! # Interface Layer
//!
//! Entry points reachable from the command line.

pub mod commands;
