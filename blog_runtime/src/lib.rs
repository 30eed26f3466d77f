#![forbid(unsafe_code)]

//! Blog runtime
//!
//! Wraps the blog engine with configuration, logging setup, a
//! thread-safe handle, journal replay and the interactive shell.
//!
//! No domain logic lives here. Registration, sessions and ownership
//! checks are all delegated to the engine.

pub mod config;
pub mod error;
pub mod logging;
pub mod session;
pub mod replay;
pub mod shell;
