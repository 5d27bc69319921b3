//! MeshInvite configuration
//!
//! Loaded once by the binary and handed to each component by value.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Placeholder substituted with the invite link in [`InviteConfig::invite_message`]
pub const INVITE_LINK_PLACEHOLDER: &str = "{INVITE_LINK}";

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Tinc control binary
    pub tinc: TincConfig,

    /// Invite policy and user-facing messages
    pub invite: InviteConfig,

    /// Status polling
    pub status: StatusConfig,
}

/// How to reach the tinc control interface
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TincConfig {
    /// Path to the `tinc` binary
    pub bin: String,

    /// Arguments placed before every command, e.g. `["-n", "mesh"]`
    pub params: Vec<String>,

    /// Per-invocation timeout
    pub timeout_secs: u64,
}

impl Default for TincConfig {
    fn default() -> Self {
        Self {
            bin: "tinc".to_string(),
            params: Vec::new(),
            timeout_secs: 30,
        }
    }
}

impl TincConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Invite creation policy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InviteConfig {
    /// Refuse to issue a second invite while one is pending for the same name
    pub no_duplicate_invites: bool,

    /// Extra attempts with an underscore appended after a name collision
    pub max_retries: u32,

    /// Message sent with a fresh invite; `{INVITE_LINK}` is replaced
    pub invite_message: String,

    /// Shown when tinc answers with something unrecognized
    pub invite_error: String,

    /// Shown when a pending invite already exists
    pub already_invited: String,

    /// Shown when every suffixed name collided
    pub exhausted: String,
}

impl Default for InviteConfig {
    fn default() -> Self {
        Self {
            no_duplicate_invites: true,
            max_retries: 8,
            invite_message: format!("Your invite: {}", INVITE_LINK_PLACEHOLDER),
            invite_error: "Could not create an invite, please contact an administrator."
                .to_string(),
            already_invited: "Invite has not expired.\nUse your last invite first.".to_string(),
            exhausted: "Could not allocate a unique node name, please contact an administrator."
                .to_string(),
        }
    }
}

impl InviteConfig {
    /// Render the invite message for a link
    pub fn render_invite(&self, link: &str) -> String {
        self.invite_message.replace(INVITE_LINK_PLACEHOLDER, link)
    }
}

/// Status polling
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusConfig {
    /// Seconds between reachable-node polls; 0 disables polling
    pub refresh_secs: u64,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self { refresh_secs: 60 }
    }
}

impl Config {
    /// Load configuration from file, falling back to defaults if it is absent
    pub fn load(path: &Path) -> Result<Self> {
        let config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)?
        } else {
            Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Reject settings the core cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.tinc.bin.trim().is_empty() {
            return Err(Error::InvalidConfig("tinc.bin must not be empty".to_string()));
        }
        if self.tinc.timeout_secs == 0 {
            return Err(Error::InvalidConfig(
                "tinc.timeout_secs must be greater than zero".to_string(),
            ));
        }
        if !self.invite.invite_message.contains(INVITE_LINK_PLACEHOLDER) {
            return Err(Error::InvalidConfig(format!(
                "invite.invite_message must contain {}",
                INVITE_LINK_PLACEHOLDER
            )));
        }
        Ok(())
    }
}
