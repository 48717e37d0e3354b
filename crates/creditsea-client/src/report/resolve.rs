//! Ordered-fallback lookups over a [`Node`] tree.
//!
//! A candidate path is a dot-separated list of segments. A numeric segment
//! indexes the current sequence; a key segment descends into the first node of
//! the current sequence. A trailing `@name` segment reads an attribute. Any
//! miss fails the path quietly so the next candidate can be tried.

use crate::report::tree::Node;

#[derive(Debug, Clone, Copy)]
enum Cursor<'a> {
    One(&'a Node),
    Many(&'a [Node]),
}

impl<'a> Cursor<'a> {
    fn first(self) -> Option<&'a Node> {
        match self {
            Self::One(node) => Some(node),
            Self::Many(nodes) => nodes.first(),
        }
    }
}

/// First non-empty text value among `candidates`, tried in order.
pub fn resolve_text(node: &Node, candidates: &[&str]) -> Option<String> {
    candidates.iter().find_map(|path| text_at(node, path))
}

pub fn resolve_or(node: &Node, candidates: &[&str], default: &str) -> String {
    resolve_text(node, candidates).unwrap_or_else(|| default.to_string())
}

/// First candidate that lands on a non-empty sequence. Used for repeated
/// sections such as the account and enquiry lists.
pub fn resolve_sequence<'a>(node: &'a Node, candidates: &[&str]) -> &'a [Node] {
    candidates
        .iter()
        .find_map(|path| match walk(node, path)? {
            Cursor::Many(nodes) if !nodes.is_empty() => Some(nodes),
            _ => None,
        })
        .unwrap_or(&[])
}

fn text_at(node: &Node, path: &str) -> Option<String> {
    let (element_path, attribute) = match path.rsplit_once(".@") {
        Some((head, name)) => (head, Some(name)),
        None => match path.strip_prefix('@') {
            Some(name) => ("", Some(name)),
            None => (path, None),
        },
    };

    let cursor = if element_path.is_empty() {
        Cursor::One(node)
    } else {
        walk(node, element_path)?
    };
    let target = cursor.first()?;

    let value = match attribute {
        Some(name) => target.attribute(name)?,
        None => target.as_text()?,
    };
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_string())
}

fn walk<'a>(node: &'a Node, path: &str) -> Option<Cursor<'a>> {
    let mut cursor = Cursor::One(node);
    for segment in path.split('.') {
        cursor = step(cursor, segment)?;
    }
    Some(cursor)
}

fn step<'a>(cursor: Cursor<'a>, segment: &str) -> Option<Cursor<'a>> {
    if let Ok(index) = segment.parse::<usize>() {
        return match cursor {
            Cursor::Many(nodes) => nodes.get(index).map(Cursor::One),
            Cursor::One(_) => None,
        };
    }
    cursor.first()?.child(segment).map(Cursor::Many)
}
