//! # Application Layer
//!
//! Tool registry and dispatch on top of the file store, plus the process-wide
//! services (logging, context collection) the entry points rely on.

pub mod context;
pub mod dispatcher;
pub mod logging;
pub mod registry;
