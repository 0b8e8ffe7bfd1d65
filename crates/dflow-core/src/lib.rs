//! dFlow server status core
//!
//! This crate turns server snapshots fetched from the dashboard backend into
//! the status outcomes, addresses and card data shown for each server.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │       snapshot (JSON / YAML, camelCase)       │
//! └──────────────────────┬───────────────────────┘
//!                        │ loader + ServerDocument
//! ┌──────────────────────▼───────────────────────┐
//! │            ServerRecord (normalized)          │
//! └───────┬──────────────┬───────────────┬───────┘
//!         │              │               │
//! ┌───────▼──────┐ ┌─────▼──────┐ ┌──────▼──────┐
//! │  classifier  │ │  address   │ │    card     │
//! │ DecisionTable│ │ IpSelection│ │ ServerCard  │
//! └──────────────┘ └────────────┘ └─────────────┘
//! ```
//!
//! Everything below the loader is pure: no I/O, no shared state.

pub mod address;
pub mod card;
pub mod classifier;
pub mod error;
pub mod loader;
pub mod model;
pub mod status;

// Re-exports
pub use address::{
    AddressIcon, AddressTone, IpSelection, NO_IP_AVAILABLE, NO_PUBLIC_IP_ADVISORY, NO_PUBLIC_IP_LABEL,
    needs_no_public_ip_advisory, select_ip,
};
pub use card::{
    AddressView, BillingView, CardAlert, CardContext, ServerCard, StatusIcon, attempts_annotation,
};
pub use classifier::{
    Classifier, ClassifierOptions, DecisionTable, DpkgPrecedence, Facts, MAX_CONNECTION_ATTEMPTS,
    Rule, classify,
};
pub use error::{CoreError, Result};
pub use loader::{SnapshotFormat, find_server, load_servers_file, parse_servers};
pub use model::*;
pub use status::{Accent, Badge, BadgeVariant, Banner, ConnectionProgress, ServerStatus, StatusKind};
