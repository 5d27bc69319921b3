//! Node name derivation
//!
//! Chat display names are arbitrary unicode while tinc node names must be
//! `[a-zA-Z0-9_]+`. Derivation:
//! - Letters and digits outside ASCII are transliterated (`é` -> `e`)
//! - Combining marks are dropped, so decomposed input (`e` + U+0301)
//!   transliterates the same as its precomposed form
//! - Every run of other characters collapses to a single `_`
//! - Separators produced at either end are dropped, but underscores that were
//!   already at the start or end of the display name are kept

use crate::error::{Error, Result};
use crate::types::{is_node_name_char, NodeName};
use deunicode::deunicode_char;

enum Piece {
    Char(char),
    Separator,
}

/// Derive a node name candidate from a display name.
///
/// Returns an empty string when nothing in the input can be transliterated
/// (an all-emoji name, for example). Callers must substitute a unique
/// fallback in that case; see [`resolve_node_name`].
pub fn sanitize(display_name: &str) -> String {
    let mut pieces: Vec<Piece> = Vec::with_capacity(display_name.len());

    for c in display_name.chars() {
        if is_node_name_char(c) {
            pieces.push(Piece::Char(c));
            continue;
        }
        if is_combining_mark(c) {
            continue;
        }

        let transliterated = if !c.is_ascii() && c.is_alphanumeric() {
            deunicode_char(c)
        } else {
            None
        };

        match transliterated {
            Some(ascii) => push_ascii(&mut pieces, ascii),
            None => push_separator(&mut pieces),
        }
    }

    let start = pieces
        .iter()
        .position(|p| matches!(p, Piece::Char(_)))
        .unwrap_or(pieces.len());
    let end = pieces
        .iter()
        .rposition(|p| matches!(p, Piece::Char(_)))
        .map_or(start, |i| i + 1);

    pieces[start..end]
        .iter()
        .map(|p| match p {
            Piece::Char(c) => *c,
            Piece::Separator => '_',
        })
        .collect()
}

/// Combining diacritics that attach to the preceding letter
fn is_combining_mark(c: char) -> bool {
    matches!(
        c,
        '\u{0300}'..='\u{036F}'
            | '\u{1AB0}'..='\u{1AFF}'
            | '\u{1DC0}'..='\u{1DFF}'
            | '\u{20D0}'..='\u{20FF}'
            | '\u{FE20}'..='\u{FE2F}'
    )
}

fn push_ascii(pieces: &mut Vec<Piece>, ascii: &str) {
    for c in ascii.chars() {
        if is_node_name_char(c) {
            pieces.push(Piece::Char(c));
        } else {
            push_separator(pieces);
        }
    }
}

fn push_separator(pieces: &mut Vec<Piece>) {
    if !matches!(pieces.last(), Some(Piece::Separator)) {
        pieces.push(Piece::Separator);
    }
}

/// Derive a node name, falling back to `fallback_id` when the display name
/// yields nothing usable.
///
/// The fallback is expected to be unique per user (a numeric account id) and
/// must itself be a valid node name.
pub fn resolve_node_name(display_name: &str, fallback_id: Option<&str>) -> Result<NodeName> {
    let derived = sanitize(display_name);
    if !derived.is_empty() {
        return NodeName::new(derived);
    }

    match fallback_id {
        Some(id) => NodeName::new(id),
        None => Err(Error::invalid_name(
            display_name,
            "no transliterable characters and no fallback id",
        )),
    }
}
