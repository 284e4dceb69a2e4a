//! CLI command implementations.

pub mod build;
pub mod classify;
pub mod init;
pub mod sources;
