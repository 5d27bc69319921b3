//! Invite and status manager
//!
//! Every query re-runs the relevant `tinc dump` command; nothing is cached.
//! Invite creation is serialized per manager so that the duplicate check and
//! the `tinc invite` call cannot interleave with another creation.

use crate::config::InviteConfig;
use crate::control::ControlClient;
use crate::parse::{parse_pending_invites, parse_reachable_nodes};
use crate::status::MeshStatus;
use crate::types::{InviteRecord, NodeName};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

/// tinc refusing a name it already has a host file or node for
static COLLISION_PATTERNS: Lazy<[Regex; 2]> = Lazy::new(|| {
    [
        Regex::new(r"^.*host.*exists").expect("valid regex"),
        Regex::new(r"^.*name.*known").expect("valid regex"),
    ]
});

/// `host[:port]/token` where host is a DNS name or dotted labels
static INVITATION_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^(([a-zA-Z0-9]|[a-zA-Z0-9][a-zA-Z0-9-]*[a-zA-Z0-9])\.)*",
        r"([a-zA-Z0-9]|[a-zA-Z0-9][a-zA-Z0-9-]*[a-zA-Z0-9])",
        r"(:(0|[1-9][0-9]{0,3}|[1-5][0-9]{4}|6[0-4][0-9]{3}|65[0-4][0-9]{2}|655[0-2][0-9]|6553[0-5]))?",
        r"/\S+$",
    ))
    .expect("valid regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InviteResponse {
    Collision,
    Link,
    Unrecognized,
}

fn classify(text: &str) -> InviteResponse {
    if COLLISION_PATTERNS.iter().any(|re| re.is_match(text)) {
        InviteResponse::Collision
    } else if INVITATION_URL.is_match(text) {
        InviteResponse::Link
    } else {
        InviteResponse::Unrecognized
    }
}

/// Result of an invite request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum InviteOutcome {
    /// tinc issued an invitation for `name`, which may carry retry underscores
    Created { name: NodeName, link: String },
    /// A pending invite for the requested name exists; tinc was not called
    AlreadyInvited { name: NodeName, notice: String },
    /// tinc answered with something that is neither a link nor a collision
    Rejected { name: NodeName, notice: String },
    /// Every suffixed name collided
    Exhausted {
        name: NodeName,
        attempts: u32,
        notice: String,
    },
}

impl InviteOutcome {
    /// The invite link on success, otherwise the configured notice
    pub fn text(&self) -> &str {
        match self {
            InviteOutcome::Created { link, .. } => link,
            InviteOutcome::AlreadyInvited { notice, .. }
            | InviteOutcome::Rejected { notice, .. }
            | InviteOutcome::Exhausted { notice, .. } => notice,
        }
    }

    /// Whether the requester should be told about a problem rather than
    /// being pointed at an invite they already hold
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            InviteOutcome::Rejected { .. } | InviteOutcome::Exhausted { .. }
        )
    }
}

/// Issues invites and reports reachability through a [`ControlClient`]
pub struct InviteManager<C> {
    client: C,
    config: InviteConfig,
    create_lock: Mutex<()>,
}

impl<C: ControlClient> InviteManager<C> {
    pub fn new(client: C, config: InviteConfig) -> Self {
        Self {
            client,
            config,
            create_lock: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &InviteConfig {
        &self.config
    }

    /// Pending invitations, in the order tinc lists them
    pub async fn list_invites(&self) -> Vec<InviteRecord> {
        let result = self.client.invoke(&["dump", "invitations"]).await;
        if !result.succeeded {
            return Vec::new();
        }
        parse_pending_invites(&result.stdout)
    }

    /// Whether a pending invitation exists for `name`
    pub async fn is_invited(&self, name: &NodeName) -> bool {
        self.list_invites()
            .await
            .iter()
            .any(|invite| invite.owner == name.as_str())
    }

    /// Reachable nodes keyed by name
    pub async fn reachable_nodes(&self) -> BTreeMap<String, String> {
        let result = self.client.invoke(&["dump", "reachable", "nodes"]).await;
        if !result.succeeded {
            return BTreeMap::new();
        }
        parse_reachable_nodes(&result.stdout)
    }

    /// Number of distinct reachable nodes, the supernode included
    pub async fn count_reachable(&self) -> usize {
        self.reachable_nodes().await.len()
    }

    pub async fn status(&self) -> MeshStatus {
        MeshStatus::from_reachable(self.count_reachable().await)
    }

    /// Create an invitation for `name`.
    ///
    /// When tinc reports the name as taken, the request is retried with an
    /// underscore appended, up to `max_retries` times. Only the originally
    /// requested name is checked for a pending invite.
    pub async fn create_invite(&self, name: &NodeName) -> InviteOutcome {
        let _guard = self.create_lock.lock().await;

        if self.config.no_duplicate_invites && self.is_invited(name).await {
            info!("{} already holds a pending invite", name);
            return InviteOutcome::AlreadyInvited {
                name: name.clone(),
                notice: self.config.already_invited.clone(),
            };
        }

        let attempts = self.config.max_retries.saturating_add(1);
        let mut candidate = name.clone();

        for attempt in 1..=attempts {
            let result = self.client.invoke(&["invite", candidate.as_str()]).await;
            let text = result.text().trim();

            match classify(text) {
                InviteResponse::Link => {
                    info!("Created invite for {}", candidate);
                    return InviteOutcome::Created {
                        name: candidate,
                        link: text.to_string(),
                    };
                }
                InviteResponse::Unrecognized => {
                    error!("Unrecognized invite response for {}: {:?}", candidate, text);
                    return InviteOutcome::Rejected {
                        name: candidate,
                        notice: self.config.invite_error.clone(),
                    };
                }
                InviteResponse::Collision if attempt < attempts => {
                    let next = candidate.suffixed();
                    warn!("{} already exists! Retrying as {}", candidate, next);
                    candidate = next;
                }
                InviteResponse::Collision => {
                    debug!("{} already exists and no retries remain", candidate);
                }
            }
        }

        warn!(
            "Gave up creating an invite for {} after {} attempts",
            name, attempts
        );
        InviteOutcome::Exhausted {
            name: name.clone(),
            attempts,
            notice: self.config.exhausted.clone(),
        }
    }
}
