//! Mesh status derived from the reachable node count

use serde::{Deserialize, Serialize};

/// Human-facing view of the mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum MeshStatus {
    /// At least the supernode is reachable
    Online { players: usize },
    /// Nothing is reachable; tinc is down or misconfigured
    Offline,
}

impl MeshStatus {
    /// Derive status from the raw reachable count.
    ///
    /// The supernode always counts itself, so it is subtracted here.
    pub fn from_reachable(count: usize) -> Self {
        match count {
            0 => MeshStatus::Offline,
            n => MeshStatus::Online { players: n - 1 },
        }
    }

    pub fn is_online(&self) -> bool {
        matches!(self, MeshStatus::Online { .. })
    }
}

impl std::fmt::Display for MeshStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeshStatus::Online { players } => write!(f, "{} player(s) online", players),
            MeshStatus::Offline => write!(f, "Offline"),
        }
    }
}

/// Remembers the last observed status so pollers only report transitions
#[derive(Debug, Default)]
pub struct StatusTracker {
    last: Option<MeshStatus>,
}

impl StatusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `status`; returns true if it differs from the previous one
    pub fn observe(&mut self, status: MeshStatus) -> bool {
        let changed = self.last != Some(status);
        self.last = Some(status);
        changed
    }

    pub fn last(&self) -> Option<MeshStatus> {
        self.last
    }
}
