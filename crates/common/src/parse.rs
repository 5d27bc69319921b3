//! Parsers for tinc control output
//!
//! Both parsers are total: empty or malformed input produces an empty (or
//! shorter) collection, never an error.

use crate::types::{InviteRecord, ReachableNode};
use std::collections::BTreeMap;
use tracing::debug;

/// Minimum number of fields in a `dump reachable nodes` line
const NODE_LINE_FIELDS: usize = 7;
const NODE_HOST_FIELD: usize = 4;
const NODE_PORT_FIELD: usize = 6;

/// Parse `tinc dump invitations` output.
///
/// The output is a stream of alternating `handle name` tokens, newline or
/// space separated. A trailing unpaired token is dropped.
pub fn parse_pending_invites(raw: &str) -> Vec<InviteRecord> {
    let tokens: Vec<&str> = raw.split_whitespace().collect();

    if tokens.len() % 2 != 0 {
        debug!(
            "Dropping unpaired trailing token in invitation dump: {:?}",
            tokens[tokens.len() - 1]
        );
    }

    tokens
        .chunks_exact(2)
        .map(|pair| InviteRecord {
            token: pair[0].to_string(),
            owner: pair[1].to_string(),
        })
        .collect()
}

/// Parse `tinc dump reachable nodes` output into `name -> host:port`.
///
/// Lines with fewer than seven fields are skipped. A repeated node name
/// replaces the earlier entry.
pub fn parse_reachable_nodes(raw: &str) -> BTreeMap<String, String> {
    let mut nodes = BTreeMap::new();

    for line in raw.lines() {
        if let Some(node) = parse_node_line(line) {
            nodes.insert(node.name, node.address);
        }
    }

    nodes
}

fn parse_node_line(line: &str) -> Option<ReachableNode> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.is_empty() {
        return None;
    }
    if fields.len() < NODE_LINE_FIELDS {
        debug!(
            "Skipping malformed node line ({} fields): {:?}",
            fields.len(),
            line
        );
        return None;
    }

    Some(ReachableNode {
        name: fields[0].to_string(),
        address: format!("{}:{}", fields[NODE_HOST_FIELD], fields[NODE_PORT_FIELD]),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(token: &str, owner: &str) -> InviteRecord {
        InviteRecord {
            token: token.to_string(),
            owner: owner.to_string(),
        }
    }

    #[test]
    fn test_invites_pairs_across_lines() {
        let parsed = parse_pending_invites("tok1 name1\ntok2 name2");
        assert_eq!(parsed, vec![record("tok1", "name1"), record("tok2", "name2")]);
    }

    #[test]
    fn test_invites_odd_token_dropped() {
        let parsed = parse_pending_invites("tok1 name1 tok2");
        assert_eq!(parsed, vec![record("tok1", "name1")]);
    }

    #[test]
    fn test_invites_empty() {
        assert!(parse_pending_invites("").is_empty());
        assert!(parse_pending_invites("\n\n  ").is_empty());
    }

    #[test]
    fn test_invites_irregular_whitespace() {
        let parsed = parse_pending_invites("  tok1   name1\n\ntok2\tname2\n");
        assert_eq!(parsed, vec![record("tok1", "name1"), record("tok2", "name2")]);
    }

    #[test]
    fn test_nodes_single_line() {
        let nodes = parse_reachable_nodes("node1 a b c 10.0.0.1 x 655");
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes["node1"], "10.0.0.1:655");
    }

    #[test]
    fn test_nodes_short_line_skipped() {
        let raw = "node1 a b c 10.0.0.1 x 655\nnode2 a b c 10.0.0.2";
        let nodes = parse_reachable_nodes(raw);
        assert_eq!(nodes.len(), 1);
        assert!(!nodes.contains_key("node2"));
        assert!(nodes.values().all(|addr| !addr.contains("undefined")));
    }

    #[test]
    fn test_nodes_duplicate_overwrites() {
        let raw = "node1 a b c 10.0.0.1 x 655\nnode1 a b c 10.0.0.9 x 656";
        let nodes = parse_reachable_nodes(raw);
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes["node1"], "10.0.0.9:656");
    }

    #[test]
    fn test_nodes_extra_fields_and_blank_lines() {
        let raw = "\nsupernode 0a1b 192.168.1.1 port 655 x 655 cipher digest\n\nbob 0c 10.0.0.5 port 10.0.0.5 x 1655 more fields here\n";
        let nodes = parse_reachable_nodes(raw);
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes["supernode"], "655:655");
        assert_eq!(nodes["bob"], "10.0.0.5:1655");
    }

    #[test]
    fn test_nodes_empty() {
        assert!(parse_reachable_nodes("").is_empty());
    }
}
