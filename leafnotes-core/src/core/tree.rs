//! Projection of the flat `notes` table into a nested tree.
//!
//! The tree is never stored. [`build_tree`] recomputes it from the record
//! list on every read, in a single linear pass plus a reachability sweep.
//!
//! ## Placement rules
//!
//! - A record whose `parent_id` names a record in the input becomes that
//!   record's child.
//! - A record with no parent, or whose parent is absent from the input
//!   (an orphan), becomes a root.
//! - For each parent cycle, one record on the cycle is promoted to a root,
//!   detaching it from its cyclic parent. Records hanging off the cycle keep
//!   their parents. The mutation layer refuses to
//!   create cycles, so this only matters for externally edited databases.
//!
//! Relative input order is kept among roots and within every sibling group,
//! so callers should pass records sorted by `(sort_order, created_at)`.

use crate::Note;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A note together with its ordered children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteTreeNode {
    #[serde(flatten)]
    pub note: Note,
    pub children: Vec<NoteTreeNode>,
}

impl NoteTreeNode {
    /// Depth-first search for `id` in this node and its descendants.
    pub fn find(&self, id: &str) -> Option<&NoteTreeNode> {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if node.note.id == id {
                return Some(node);
            }
            stack.extend(node.children.iter().rev());
        }
        None
    }

    /// Number of notes in this subtree, including this one.
    pub fn subtree_size(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }
}

/// Builds the display hierarchy from a flat record list.
pub fn build_tree(records: Vec<Note>) -> Vec<NoteTreeNode> {
    let parents: Vec<Option<usize>> = {
        let index: HashMap<&str, usize> = records
            .iter()
            .enumerate()
            .map(|(i, note)| (note.id.as_str(), i))
            .collect();
        records
            .iter()
            .enumerate()
            .map(|(i, note)| {
                note.parent_id
                    .as_deref()
                    .and_then(|pid| index.get(pid).copied())
                    .filter(|&p| p != i)
            })
            .collect()
    };

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); records.len()];
    let mut roots: Vec<usize> = Vec::new();
    for (i, parent) in parents.iter().enumerate() {
        match *parent {
            Some(p) => children[p].push(i),
            None => roots.push(i),
        }
    }

    // Anything not reachable from a root is on a cycle or hangs off one.
    let mut visited = vec![false; records.len()];
    mark_reachable(&roots, &children, &mut visited);
    let mut walked = vec![false; records.len()];
    let mut promoted = false;
    for i in 0..records.len() {
        if visited[i] {
            continue;
        }
        let member = find_cycle_member(i, &parents, &mut walked);
        if let Some(p) = parents[member] {
            children[p].retain(|&c| c != member);
        }
        roots.push(member);
        mark_reachable(&[member], &children, &mut visited);
        promoted = true;
    }
    if promoted {
        roots.sort_unstable();
    }

    assemble(records, &roots, &children)
}

/// Flattens a forest back into records in depth-first pre-order.
pub fn flatten(nodes: &[NoteTreeNode]) -> Vec<Note> {
    let mut out = Vec::new();
    let mut stack: Vec<&NoteTreeNode> = nodes.iter().rev().collect();
    while let Some(node) = stack.pop() {
        out.push(node.note.clone());
        stack.extend(node.children.iter().rev());
    }
    out
}

// Follows parent links up from an unreachable record until one repeats.
// Every record passed is reachable from the returned cycle member once it
// becomes a root, so `walked` never needs resetting.
fn find_cycle_member(start: usize, parents: &[Option<usize>], walked: &mut [bool]) -> usize {
    let mut current = start;
    while !walked[current] {
        walked[current] = true;
        match parents[current] {
            Some(p) => current = p,
            None => break,
        }
    }
    current
}

fn mark_reachable(starts: &[usize], children: &[Vec<usize>], visited: &mut [bool]) {
    let mut stack: Vec<usize> = starts.to_vec();
    while let Some(i) = stack.pop() {
        if visited[i] {
            continue;
        }
        visited[i] = true;
        stack.extend(children[i].iter().copied());
    }
}

// Builds nodes bottom-up from a reversed pre-order so deep trees never recurse.
fn assemble(records: Vec<Note>, roots: &[usize], children: &[Vec<usize>]) -> Vec<NoteTreeNode> {
    let mut order = Vec::with_capacity(records.len());
    let mut stack: Vec<usize> = roots.iter().rev().copied().collect();
    while let Some(i) = stack.pop() {
        order.push(i);
        stack.extend(children[i].iter().rev().copied());
    }

    let mut slots: Vec<Option<Note>> = records.into_iter().map(Some).collect();
    let mut built: Vec<Option<NoteTreeNode>> = vec![None; slots.len()];
    for &i in order.iter().rev() {
        let kids = children[i]
            .iter()
            .filter_map(|&c| built[c].take())
            .collect();
        if let Some(note) = slots[i].take() {
            built[i] = Some(NoteTreeNode {
                note,
                children: kids,
            });
        }
    }

    roots.iter().filter_map(|&r| built[r].take()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn make_note(id: &str, title: &str, parent_id: Option<&str>, is_folder: bool) -> Note {
        let ts = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        Note {
            id: id.to_string(),
            title: title.to_string(),
            content: String::new(),
            parent_id: parent_id.map(str::to_string),
            is_folder,
            sort_order: 0,
            created_at: ts,
            updated_at: ts,
        }
    }

    fn ids(nodes: &[NoteTreeNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.note.id.as_str()).collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(build_tree(Vec::new()).is_empty());
    }

    #[test]
    fn test_root_level_notes() {
        let tree = build_tree(vec![
            make_note("1", "Note 1", None, false),
            make_note("2", "Note 2", None, false),
        ]);
        assert_eq!(ids(&tree), ["1", "2"]);
        assert!(tree[0].children.is_empty());
        assert!(tree[1].children.is_empty());
    }

    #[test]
    fn test_children_nest_under_folder() {
        let tree = build_tree(vec![
            make_note("folder", "My Folder", None, true),
            make_note("child", "Child Note", Some("folder"), false),
        ]);
        assert_eq!(ids(&tree), ["folder"]);
        assert_eq!(tree[0].children.len(), 1);
        assert_eq!(tree[0].children[0].note.title, "Child Note");
    }

    #[test]
    fn test_child_listed_before_parent() {
        let tree = build_tree(vec![
            make_note("child", "Child", Some("folder"), false),
            make_note("folder", "Folder", None, true),
        ]);
        assert_eq!(ids(&tree), ["folder"]);
        assert_eq!(ids(&tree[0].children), ["child"]);
    }

    #[test]
    fn test_deeply_nested() {
        let tree = build_tree(vec![
            make_note("f1", "Level 1", None, true),
            make_note("f2", "Level 2", Some("f1"), true),
            make_note("n1", "Deep Note", Some("f2"), false),
        ]);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].children[0].children[0].note.title, "Deep Note");
        assert_eq!(tree[0].subtree_size(), 3);
        assert!(tree[0].find("n1").is_some());
        assert!(tree[0].find("missing").is_none());
    }

    #[test]
    fn test_orphan_placed_at_root() {
        let tree = build_tree(vec![make_note("1", "Orphan", Some("nonexistent"), false)]);
        assert_eq!(ids(&tree), ["1"]);
    }

    #[test]
    fn test_self_parent_placed_at_root() {
        let tree = build_tree(vec![make_note("loop", "Loop", Some("loop"), false)]);
        assert_eq!(ids(&tree), ["loop"]);
    }

    #[test]
    fn test_cycle_is_broken_not_dropped() {
        let tree = build_tree(vec![
            make_note("root", "Root", None, true),
            make_note("a", "A", Some("b"), false),
            make_note("b", "B", Some("a"), false),
        ]);
        assert_eq!(ids(&tree), ["root", "a"]);
        assert_eq!(ids(&tree[1].children), ["b"]);
        assert_eq!(flatten(&tree).len(), 3);
    }

    #[test]
    fn test_record_hanging_off_cycle_keeps_its_parent() {
        let tree = build_tree(vec![
            make_note("c", "C", Some("a"), false),
            make_note("a", "A", Some("b"), false),
            make_note("b", "B", Some("a"), false),
        ]);
        assert_eq!(ids(&tree), ["a"]);
        assert_eq!(ids(&tree[0].children), ["c", "b"]);
        assert!(tree[0].children[1].children.is_empty());
    }

    #[test]
    fn test_two_separate_cycles_each_get_one_root() {
        let tree = build_tree(vec![
            make_note("x", "X", Some("y"), false),
            make_note("y", "Y", Some("x"), false),
            make_note("tail", "Tail", Some("y"), false),
            make_note("p", "P", Some("q"), false),
            make_note("q", "Q", Some("p"), false),
        ]);
        assert_eq!(ids(&tree), ["x", "p"]);
        assert_eq!(ids(&tree[0].children), ["y"]);
        assert_eq!(ids(&tree[0].children[0].children), ["tail"]);
        assert_eq!(flatten(&tree).len(), 5);
    }

    #[test]
    fn test_leaf_note_may_hold_children() {
        let tree = build_tree(vec![
            make_note("doc", "Doc", None, false),
            make_note("sub", "Sub", Some("doc"), false),
        ]);
        assert_eq!(ids(&tree[0].children), ["sub"]);
    }

    #[test]
    fn test_flatten_is_pre_order() {
        let tree = build_tree(vec![
            make_note("a", "A", None, false),
            make_note("f", "F", None, true),
            make_note("b", "B", Some("f"), false),
            make_note("c", "C", None, false),
        ]);
        let order: Vec<String> = flatten(&tree).into_iter().map(|n| n.id).collect();
        assert_eq!(order, ["a", "f", "b", "c"]);
    }

    #[test]
    fn test_tree_serializes_with_children() {
        let tree = build_tree(vec![
            make_note("f", "F", None, true),
            make_note("b", "B", Some("f"), false),
        ]);
        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(json[0]["id"], "f");
        assert_eq!(json[0]["is_folder"], true);
        assert_eq!(json[0]["children"][0]["parent_id"], "f");
        assert_eq!(json[0]["children"][0]["children"].as_array().unwrap().len(), 0);
    }
}
