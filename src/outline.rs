use petgraph::stable_graph::NodeIndex;
use thiserror::Error;

use crate::{Node, Tree};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OutlineError {
    #[error("outline has no content")]
    Empty,
    #[error("line {0}: item has no title")]
    BlankTitle(usize),
}

/// Parses indented outline text into a [`Tree`].
///
/// One item per line; two spaces or one tab per indentation level; an
/// optional `-` or `*` bullet before the title. The first item is the root,
/// later top-level items become its children. Over-indented lines are clamped
/// to one level below the deepest open item, blank lines are skipped.
///
/// Node ids are the slugified title path from the root (`trip/packing/tent`),
/// with `-2`, `-3`… suffixes disambiguating repeated titles under one parent.
/// The derivation is deterministic: re-parsing unchanged text reproduces
/// identical ids, which is what lets recorded sibling orders re-attach after
/// the tree is rebuilt.
///
/// # Errors
///
/// [`OutlineError::Empty`] for a document without content,
/// [`OutlineError::BlankTitle`] for a bullet with nothing behind it.
pub fn parse_outline(text: &str) -> Result<Tree, OutlineError> {
    let mut tree: Option<Tree> = None;
    // (indent level, index) of the currently open items, root first
    let mut open: Vec<(usize, NodeIndex)> = Vec::new();

    for (line_no, raw) in text.lines().enumerate() {
        let Some((level, title)) = split_item(raw) else {
            continue;
        };
        if title.is_empty() {
            return Err(OutlineError::BlankTitle(line_no + 1));
        }

        let Some(tree) = tree.as_mut() else {
            let root = Node::new(slug(title), title, ());
            let t = Tree::new(root);
            open.push((0, t.root()));
            tree = Some(t);
            continue;
        };

        // everything after the first line hangs off the root
        let mut level = level.max(1);
        while open.last().is_some_and(|&(open_level, _)| open_level >= level) {
            open.pop();
        }
        // the root stays open for the whole parse, so the stack is never empty
        let Some(&(parent_level, parent)) = open.last() else {
            continue;
        };
        level = level.min(parent_level + 1);

        let id = child_id(tree, parent, title);
        let idx = tree.add_child(parent, Node::new(id, title, ()));
        open.push((level, idx));
    }

    tree.ok_or(OutlineError::Empty)
}

/// Splits a raw line into (indent level, title); `None` for blank lines.
fn split_item(raw: &str) -> Option<(usize, &str)> {
    let mut cols = 0;
    let mut rest = raw;
    for ch in raw.chars() {
        match ch {
            ' ' => cols += 1,
            '\t' => cols += 2,
            _ => break,
        }
        rest = &rest[ch.len_utf8()..];
    }

    let rest = rest
        .strip_prefix("- ")
        .or_else(|| rest.strip_prefix("* "))
        .unwrap_or(rest)
        .trim();
    if rest.is_empty() && raw.trim().is_empty() {
        return None;
    }
    Some((cols / 2, rest))
}

fn child_id(tree: &Tree, parent: NodeIndex, title: &str) -> String {
    let parent_id = tree
        .node(parent)
        .map(|n| n.id().to_owned())
        .unwrap_or_default();
    let base = format!("{parent_id}/{}", slug(title));

    if tree.node_by_id(&base).is_none() {
        return base;
    }
    let mut n = 2;
    loop {
        let candidate = format!("{base}-{n}");
        if tree.node_by_id(&candidate).is_none() {
            return candidate;
        }
        n += 1;
    }
}

fn slug(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut prev_dash = false;
    for ch in title.chars() {
        let ch = ch.to_ascii_lowercase();
        if ch.is_ascii_alphanumeric() {
            out.push(ch);
            prev_dash = false;
        } else if !prev_dash && !out.is_empty() {
            out.push('-');
            prev_dash = true;
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    if out.is_empty() {
        "item".to_owned()
    } else {
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIP: &str = "Trip\n  - Packing\n    Tent\n    Stove\n  - Route\n";

    #[test]
    fn parses_structure_and_ids() {
        let tree = parse_outline(TRIP).unwrap();
        let root = tree.root();
        assert_eq!(tree.node(root).unwrap().id(), "trip");
        assert_eq!(tree.child_ids(root), ["trip/packing", "trip/route"]);

        let packing = tree.node_by_id("trip/packing").unwrap();
        assert_eq!(tree.child_ids(packing), ["trip/packing/tent", "trip/packing/stove"]);
        assert_eq!(tree.node_count(), 5);
    }

    #[test]
    fn reparsing_identical_text_reproduces_identical_ids() {
        let a = parse_outline(TRIP).unwrap();
        let b = parse_outline(TRIP).unwrap();
        let ids = |t: &Tree| {
            let mut v: Vec<String> = t.nodes_iter().map(|(_, n)| n.id().to_owned()).collect();
            v.sort();
            v
        };
        assert_eq!(ids(&a), ids(&b));
    }

    #[test]
    fn repeated_titles_under_one_parent_get_suffixes() {
        let tree = parse_outline("Notes\n  Idea\n  Idea\n  Idea\n").unwrap();
        assert_eq!(
            tree.child_ids(tree.root()),
            ["notes/idea", "notes/idea-2", "notes/idea-3"]
        );
    }

    #[test]
    fn over_indented_lines_are_clamped() {
        // "Deep" skips a level; it must still land under Packing, not error
        let tree = parse_outline("Trip\n  Packing\n      Deep\n").unwrap();
        let packing = tree.node_by_id("trip/packing").unwrap();
        assert_eq!(tree.child_ids(packing), ["trip/packing/deep"]);
    }

    #[test]
    fn second_top_level_item_becomes_a_child_of_the_root() {
        let tree = parse_outline("Main\nStray\n").unwrap();
        assert_eq!(tree.child_ids(tree.root()), ["main/stray"]);
    }

    #[test]
    fn tabs_and_bullets_are_accepted() {
        let tree = parse_outline("Root\n\t* One\n\t- Two\n").unwrap();
        assert_eq!(tree.child_ids(tree.root()), ["root/one", "root/two"]);
    }

    #[test]
    fn blank_lines_are_skipped() {
        let tree = parse_outline("Root\n\n  One\n\n").unwrap();
        assert_eq!(tree.node_count(), 2);
    }

    #[test]
    fn empty_document_is_an_error() {
        assert_eq!(parse_outline("").unwrap_err(), OutlineError::Empty);
        assert_eq!(parse_outline("\n  \n").unwrap_err(), OutlineError::Empty);
    }

    #[test]
    fn bullet_without_title_is_an_error() {
        assert_eq!(
            parse_outline("Root\n  - \n").unwrap_err(),
            OutlineError::BlankTitle(2)
        );
    }

    #[test]
    fn symbols_slug_to_something_stable() {
        let tree = parse_outline("Root\n  C++ & Rust!\n").unwrap();
        assert_eq!(tree.child_ids(tree.root()), ["root/c-rust"]);
    }
}
