//! Server data model
//!
//! `document` mirrors the dashboard payload as it arrives over the wire,
//! `server` is the normalized snapshot every other module works on.

mod document;
mod server;

// Re-exports
pub use document::*;
pub use server::*;
