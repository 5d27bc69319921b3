//! MeshInvite Common Library
//!
//! Invite issuance and node status for a tinc mesh, driven through the
//! `tinc` control binary.

pub mod config;
pub mod control;
pub mod error;
pub mod invite;
pub mod parse;
pub mod sanitize;
pub mod status;
pub mod types;

// Re-export commonly used types
pub use config::{Config, InviteConfig, StatusConfig, TincConfig};
pub use control::{ControlClient, TincControl};
pub use error::{Error, Result};
pub use invite::{InviteManager, InviteOutcome};
pub use parse::{parse_pending_invites, parse_reachable_nodes};
pub use sanitize::{resolve_node_name, sanitize};
pub use status::{MeshStatus, StatusTracker};
pub use types::*;

/// MeshInvite version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration file path
pub fn default_config_path() -> std::path::PathBuf {
    std::path::PathBuf::from("meshinvite.toml")
}
