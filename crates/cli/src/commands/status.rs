//! Status Commands
//!
//! Reachable nodes, the online count, and the periodic status poller.

use anyhow::{bail, Result};
use clap::Subcommand;
use meshinvite_common::{MeshStatus, ReachableNode, StatusTracker};
use serde::Serialize;
use std::time::Duration;
use tracing::{info, warn};

use crate::client::Manager;
use crate::output::{print_item, print_list, OutputFormat, TableDisplay};

#[derive(Subcommand)]
pub enum StatusCommands {
    /// List reachable nodes
    Nodes,

    /// Show the reachable node count and mesh status
    Online,

    /// Poll mesh status until interrupted
    Watch {
        /// Seconds between polls (overrides status.refresh_secs)
        #[arg(short, long)]
        interval: Option<u64>,
    },
}

impl TableDisplay for ReachableNode {
    fn headers() -> Vec<&'static str> {
        vec!["Name", "Address"]
    }

    fn row(&self) -> Vec<String> {
        vec![self.name.clone(), self.address.clone()]
    }
}

#[derive(Serialize)]
struct OnlineSummary {
    reachable: usize,
    status: MeshStatus,
}

impl TableDisplay for OnlineSummary {
    fn headers() -> Vec<&'static str> {
        vec!["Reachable", "Status"]
    }

    fn row(&self) -> Vec<String> {
        vec![self.reachable.to_string(), self.status.to_string()]
    }
}

pub async fn execute(
    cmd: StatusCommands,
    manager: &Manager,
    refresh_secs: u64,
    format: OutputFormat,
) -> Result<()> {
    match cmd {
        StatusCommands::Nodes => {
            let nodes: Vec<ReachableNode> = manager
                .reachable_nodes()
                .await
                .into_iter()
                .map(|(name, address)| ReachableNode { name, address })
                .collect();
            print_list(&nodes, format);
        }

        StatusCommands::Online => {
            let reachable = manager.count_reachable().await;
            let summary = OnlineSummary {
                reachable,
                status: MeshStatus::from_reachable(reachable),
            };
            print_item(&summary, format);
        }

        StatusCommands::Watch { interval } => {
            let secs = interval.unwrap_or(refresh_secs);
            if secs == 0 {
                bail!("status polling is disabled (status.refresh_secs = 0)");
            }
            watch(manager, Duration::from_secs(secs)).await;
        }
    }

    Ok(())
}

/// Poll the mesh status, logging every transition, until Ctrl-C.
///
/// Polling continues through outages so the status recovers on its own once
/// tinc is reachable again.
async fn watch(manager: &Manager, period: Duration) {
    info!("Status poller started, refreshing every {}s", period.as_secs());

    let mut ticker = tokio::time::interval(period);
    let mut tracker = StatusTracker::new();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                match tracker.last() {
                    Some(status) => info!("Received shutdown signal, last status: {}", status),
                    None => info!("Received shutdown signal"),
                }
                break;
            }
            _ = ticker.tick() => {
                let status = manager.status().await;
                if tracker.observe(status) {
                    if status.is_online() {
                        info!("Mesh status: {}", status);
                    } else {
                        warn!("Mesh status: {} (no reachable nodes, check tinc)", status);
                    }
                }
            }
        }
    }
}
