//! # Command Handlers
//!
//! One handler per subcommand (tools, call, serve, context).
//! These handlers are invoked from `main` after configuration and logging are set up.

pub mod call;
pub mod context;
pub mod serve;
pub mod tools;
