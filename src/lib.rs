//! Music Wiki Graph Server Library
//!
//! This library exposes the internal modules for testing and reuse by the
//! server and seed binaries.

pub mod catalog;
pub mod graph;
pub mod server;
pub mod view;

// Re-export commonly used types for convenience
pub use graph::{normalize, GraphData};
pub use server::{run_server, RequestsLoggingLevel, ServerConfig};
