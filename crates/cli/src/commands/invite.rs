//! Invite Commands

use anyhow::Result;
use clap::Subcommand;
use meshinvite_common::{resolve_node_name, sanitize, InviteOutcome, InviteRecord, NodeName};
use serde::Serialize;

use crate::client::Manager;
use crate::output::{
    print_error, print_item, print_list, print_message, print_warning, OutputFormat, TableDisplay,
};

#[derive(Subcommand)]
pub enum InviteCommands {
    /// Request an invite for a display name
    Request {
        /// Display name of the requester (any unicode)
        display_name: String,

        /// Unique id used when the display name has no usable characters
        #[arg(long)]
        fallback_id: Option<String>,
    },

    /// List pending invitations
    Invites,

    /// Check whether a node name holds a pending invite
    Check {
        /// Node name
        name: String,
    },

    /// Show the node name derived from a display name
    Sanitize {
        /// Display name
        display_name: String,
    },
}

impl TableDisplay for InviteRecord {
    fn headers() -> Vec<&'static str> {
        vec!["Name", "Invitation"]
    }

    fn row(&self) -> Vec<String> {
        vec![self.owner.clone(), self.token.clone()]
    }
}

impl TableDisplay for InviteOutcome {
    fn headers() -> Vec<&'static str> {
        vec!["Name", "Outcome", "Message"]
    }

    fn row(&self) -> Vec<String> {
        let (name, outcome) = match self {
            InviteOutcome::Created { name, .. } => (name, "created"),
            InviteOutcome::AlreadyInvited { name, .. } => (name, "already invited"),
            InviteOutcome::Rejected { name, .. } => (name, "rejected"),
            InviteOutcome::Exhausted { name, .. } => (name, "exhausted"),
        };
        vec![name.to_string(), outcome.to_string(), self.text().to_string()]
    }
}

#[derive(Serialize)]
struct InviteCheck {
    name: String,
    invited: bool,
}

impl TableDisplay for InviteCheck {
    fn headers() -> Vec<&'static str> {
        vec!["Name", "Invited"]
    }

    fn row(&self) -> Vec<String> {
        vec![self.name.clone(), self.invited.to_string()]
    }
}

pub async fn execute(cmd: InviteCommands, manager: &Manager, format: OutputFormat) -> Result<()> {
    match cmd {
        InviteCommands::Request {
            display_name,
            fallback_id,
        } => {
            let name = resolve_node_name(&display_name, fallback_id.as_deref())?;
            tracing::info!("Invite request for: {}", name);

            let outcome = manager.create_invite(&name).await;
            match (&outcome, format) {
                (_, OutputFormat::Json) => print_item(&outcome, format),
                (InviteOutcome::Created { link, .. }, _) => {
                    println!("{}", manager.config().render_invite(link));
                }
                (InviteOutcome::AlreadyInvited { .. }, _) => print_warning(outcome.text()),
                _ => print_error(outcome.text()),
            }

            if outcome.is_failure() {
                std::process::exit(1);
            }
        }

        InviteCommands::Invites => {
            let invites = manager.list_invites().await;
            print_list(&invites, format);
        }

        InviteCommands::Check { name } => {
            let name = NodeName::new(name)?;
            let check = InviteCheck {
                invited: manager.is_invited(&name).await,
                name: name.to_string(),
            };
            print_item(&check, format);
        }

        InviteCommands::Sanitize { display_name } => {
            let derived = sanitize(&display_name);
            if derived.is_empty() {
                print_warning("No usable characters; a fallback id is required");
            } else {
                print_message(&derived, format);
            }
        }
    }

    Ok(())
}
