//! End-to-end invite flow against a scripted stand-in for the tinc binary.
//!
//! The script keeps its state in the temp directory it lives in:
//! - `invitations`: pending `token name` pairs
//! - `hosts/<name>`: names tinc already knows
//! - `nodes`: the reachable node dump

#![cfg(unix)]

use meshinvite_common::{
    resolve_node_name, InviteConfig, InviteManager, InviteOutcome, MeshStatus, NodeName,
    TincConfig, TincControl,
};
use std::path::Path;
use tempfile::TempDir;

const FAKE_TINC: &str = r#"
state="$(dirname "$0")"
case "$1" in
  dump)
    case "$2" in
      invitations) cat "$state/invitations" 2>/dev/null ;;
      reachable) cat "$state/nodes" 2>/dev/null ;;
      *) echo "Unknown dump type '$2'." >&2; exit 1 ;;
    esac
    ;;
  invite)
    if [ -e "$state/hosts/$2" ]; then
      echo "A host config file for $2 already exists!" >&2
      exit 1
    fi
    echo "T$2 $2" >> "$state/invitations"
    echo "vpn.example.com:655/T$2"
    ;;
  *)
    echo "Unknown command '$1'." >&2
    exit 1
    ;;
esac
"#;

fn fake_tinc() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("tinc.sh"), FAKE_TINC).unwrap();
    std::fs::create_dir(dir.path().join("hosts")).unwrap();
    dir
}

fn manager(dir: &Path, config: InviteConfig) -> InviteManager<TincControl> {
    let control = TincControl::new(&TincConfig {
        bin: "sh".to_string(),
        params: vec![dir.join("tinc.sh").to_string_lossy().to_string()],
        timeout_secs: 10,
    });
    InviteManager::new(control, config)
}

fn name(s: &str) -> NodeName {
    NodeName::new(s).unwrap()
}

#[tokio::test]
async fn invite_then_dedup() {
    let dir = fake_tinc();
    let manager = manager(dir.path(), InviteConfig::default());

    let first = manager.create_invite(&name("alice")).await;
    assert_eq!(first.text(), "vpn.example.com:655/Talice");

    assert!(manager.is_invited(&name("alice")).await);
    let invites = manager.list_invites().await;
    assert_eq!(invites.len(), 1);
    assert_eq!(invites[0].token, "Talice");

    let second = manager.create_invite(&name("alice")).await;
    assert!(matches!(second, InviteOutcome::AlreadyInvited { .. }));
    assert_eq!(manager.list_invites().await.len(), 1);
}

#[tokio::test]
async fn existing_host_gets_underscore() {
    let dir = fake_tinc();
    std::fs::write(dir.path().join("hosts/alice"), "").unwrap();
    let manager = manager(dir.path(), InviteConfig::default());

    let outcome = manager.create_invite(&name("alice")).await;
    match outcome {
        InviteOutcome::Created { name, link } => {
            assert_eq!(name.as_str(), "alice_");
            assert_eq!(link, "vpn.example.com:655/Talice_");
        }
        other => panic!("expected an invite, got {:?}", other),
    }
    assert!(manager.is_invited(&name("alice_")).await);
    assert!(!manager.is_invited(&name("alice")).await);
}

#[tokio::test]
async fn display_name_to_invite() {
    let dir = fake_tinc();
    let manager = manager(dir.path(), InviteConfig::default());

    let node = resolve_node_name("Zoë the Great", Some("184467440737")).unwrap();
    let outcome = manager.create_invite(&node).await;
    assert_eq!(outcome.text(), "vpn.example.com:655/TZoe_the_Great");

    let node = resolve_node_name("🎮🎮", Some("184467440737")).unwrap();
    let outcome = manager.create_invite(&node).await;
    assert_eq!(outcome.text(), "vpn.example.com:655/T184467440737");
}

#[tokio::test]
async fn reachable_count_and_status() {
    let dir = fake_tinc();
    std::fs::write(
        dir.path().join("nodes"),
        "supernode 0a 203.0.113.7 port 203.0.113.7 port 655\n\
         alice 0b 10.0.0.2 port 10.0.0.2 port 655\n\
         broken line\n",
    )
    .unwrap();
    let manager = manager(dir.path(), InviteConfig::default());

    assert_eq!(manager.count_reachable().await, 2);
    assert_eq!(manager.status().await, MeshStatus::Online { players: 1 });
    assert_eq!(
        manager.reachable_nodes().await.get("alice").map(String::as_str),
        Some("10.0.0.2:655")
    );
}

#[tokio::test]
async fn empty_daemon_state() {
    let dir = fake_tinc();
    let manager = manager(dir.path(), InviteConfig::default());

    assert!(manager.list_invites().await.is_empty());
    assert_eq!(manager.count_reachable().await, 0);
    assert_eq!(manager.status().await, MeshStatus::Offline);
}

#[tokio::test]
async fn missing_binary_degrades() {
    let control = TincControl::new(&TincConfig {
        bin: "/nonexistent/tinc".to_string(),
        ..Default::default()
    });
    let manager = InviteManager::new(control, InviteConfig::default());

    assert_eq!(manager.count_reachable().await, 0);
    let outcome = manager.create_invite(&name("alice")).await;
    assert!(outcome.is_failure());
    assert_eq!(outcome.text(), InviteConfig::default().invite_error);
}
