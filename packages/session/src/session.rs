//! # Session
//!
//! One open document tab: the cached tree mirror, the mutation log, and
//! UI-ephemeral state (fold flags, highlight, drag state, clipboard slot,
//! scroll positions).
//!
//! The cached tree is always the engine's most recent serialized node list.
//! Nothing in this module mutates it structurally; it is replaced wholesale
//! by the store after every successful engine call.

use std::collections::{HashMap, VecDeque};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::MutationLog;
use dertree_engine::Node;

/// Opaque stable session identifier. Allocated from a monotonic counter
/// and never reused within a store's lifetime.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct SessionId(u64);

impl SessionId {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The (container, child index) pair identifying where a dragged node
/// would be inserted. Activity is a pure equality test against the
/// session's current target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropTarget {
    pub container: usize,
    pub index: usize,
}

/// One independently-undoable open document.
pub struct Session<E> {
    /// Stable identifier within the store.
    pub id: SessionId,

    /// Mutable display label.
    pub name: String,

    /// Authoritative engine instance; `None` until the first load command.
    pub(crate) engine: Option<E>,

    /// Read-only mirror of the engine's serialized tree.
    pub(crate) tree: Vec<Node>,

    /// Replayable edit history.
    pub(crate) log: MutationLog,

    // UI-ephemeral state; never logged, never sent to the engine
    expanded: HashMap<usize, bool>,
    positions: HashMap<usize, (f64, f64)>,
    highlighted: Option<usize>,
    target: Option<DropTarget>,
    dragged_node: Option<usize>,
    is_dragging: bool,
    active_drop_context: Option<usize>,
    copied_node: Option<Node>,
}

impl<E> Session<E> {
    /// Create an empty, unloaded session.
    pub(crate) fn new(id: SessionId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            engine: None,
            tree: Vec::new(),
            log: MutationLog::new(),
            expanded: HashMap::new(),
            positions: HashMap::new(),
            highlighted: None,
            target: None,
            dragged_node: None,
            is_dragging: false,
            active_drop_context: None,
            copied_node: None,
        }
    }

    /// Whether a load command has been applied yet.
    pub fn is_loaded(&self) -> bool {
        self.engine.is_some()
    }

    /// Reset to the empty/unloaded state: engine dropped, tree cleared,
    /// log cleared. Pure local reset, no engine calls.
    pub(crate) fn reset_document(&mut self) {
        self.engine = None;
        self.tree.clear();
        self.log.clear();
    }

    pub fn log(&self) -> &MutationLog {
        &self.log
    }

    // ---- Tree queries (total functions; misses yield neutral values) ----

    pub fn tree(&self) -> &[Node] {
        &self.tree
    }

    pub fn find_node(&self, id: usize) -> Option<&Node> {
        self.tree.iter().find(|node| node.id == id)
    }

    /// Node by id, or an empty-children placeholder when absent.
    pub fn node(&self, id: usize) -> Node {
        self.find_node(id)
            .cloned()
            .unwrap_or_else(|| Node::detached(id))
    }

    pub fn parent_of(&self, id: usize) -> Option<usize> {
        self.find_node(id).and_then(|node| node.parent)
    }

    /// Whether `id` is reachable from `ancestor` via one or more `children`
    /// hops. Breadth-first over the cached tree; parent links are not used.
    /// False for `id == ancestor`.
    pub fn is_descendant(&self, ancestor: usize, id: usize) -> bool {
        let Some(ancestor_node) = self.find_node(ancestor) else {
            return false;
        };

        let mut queue: VecDeque<usize> = ancestor_node.children.iter().copied().collect();
        while let Some(current) = queue.pop_front() {
            if current == id {
                return true;
            }
            if let Some(node) = self.find_node(current) {
                queue.extend(node.children.iter().copied());
            }
        }
        false
    }

    // ---- UI-ephemeral state ----

    /// Fold state; absent entries default to collapsed.
    pub fn is_expanded(&self, id: usize) -> bool {
        self.expanded.get(&id).copied().unwrap_or(false)
    }

    pub fn any_expanded(&self) -> bool {
        self.expanded.values().any(|&expanded| expanded)
    }

    pub fn set_expanded(&mut self, id: usize, expanded: bool) {
        self.expanded.insert(id, expanded);
    }

    /// Recorded scroll position (top, height) of a rendered node.
    pub fn position(&self, id: usize) -> Option<(f64, f64)> {
        self.positions.get(&id).copied()
    }

    pub fn set_position(&mut self, id: usize, top: f64, height: f64) {
        self.positions.insert(id, (top, height));
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    pub fn set_highlighted(&mut self, id: Option<usize>) {
        self.highlighted = id;
    }

    pub fn drop_target(&self) -> Option<DropTarget> {
        self.target
    }

    pub fn set_drop_target(&mut self, target: Option<DropTarget>) {
        self.target = target;
    }

    /// Whether the given slot is the active drop target.
    pub fn is_drag_over(&self, container: usize, index: usize) -> bool {
        self.target == Some(DropTarget { container, index })
    }

    pub fn dragged_node(&self) -> Option<usize> {
        self.dragged_node
    }

    pub fn set_dragged_node(&mut self, id: Option<usize>) {
        self.dragged_node = id;
    }

    pub fn is_dragging(&self) -> bool {
        self.is_dragging
    }

    pub fn set_dragging(&mut self, dragging: bool) {
        self.is_dragging = dragging;
    }

    pub fn active_drop_context(&self) -> Option<usize> {
        self.active_drop_context
    }

    pub fn set_active_drop_context(&mut self, id: Option<usize>) {
        self.active_drop_context = id;
    }

    pub fn copied_node(&self) -> Option<&Node> {
        self.copied_node.as_ref()
    }

    pub fn set_copied_node(&mut self, node: Option<Node>) {
        self.copied_node = node;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(id: usize, parent: Option<usize>) -> Node {
        Node {
            parent,
            ..Node::detached(id)
        }
    }

    /// 0 ── 1 ── 2
    ///  └── 3        4 (separate root)
    fn session_with_tree() -> Session<()> {
        let mut session = Session::new(SessionId::from_raw(1), "test");
        let mut n0 = leaf(0, None);
        n0.children = vec![1, 3];
        let mut n1 = leaf(1, Some(0));
        n1.children = vec![2];
        session.tree = vec![n0, n1, leaf(2, Some(1)), leaf(3, Some(0)), leaf(4, None)];
        session
    }

    #[test]
    fn test_descendant_via_children_hops() {
        let session = session_with_tree();
        assert!(session.is_descendant(0, 1));
        assert!(session.is_descendant(0, 2));
        assert!(session.is_descendant(0, 3));
        assert!(session.is_descendant(1, 2));
    }

    #[test]
    fn test_descendant_is_false_for_self_and_unreachable() {
        let session = session_with_tree();
        assert!(!session.is_descendant(0, 0));
        assert!(!session.is_descendant(1, 3));
        assert!(!session.is_descendant(0, 4));
        assert!(!session.is_descendant(2, 0));
        assert!(!session.is_descendant(99, 1));
    }

    #[test]
    fn test_node_lookup_miss_yields_placeholder() {
        let session = session_with_tree();
        let node = session.node(99);
        assert_eq!(node.id, 99);
        assert!(node.children.is_empty());
    }

    #[test]
    fn test_parent_of() {
        let session = session_with_tree();
        assert_eq!(session.parent_of(2), Some(1));
        assert_eq!(session.parent_of(0), None);
        assert_eq!(session.parent_of(99), None);
    }

    #[test]
    fn test_expanded_defaults_to_collapsed() {
        let mut session = session_with_tree();
        assert!(!session.is_expanded(1));
        assert!(!session.any_expanded());

        session.set_expanded(1, true);
        assert!(session.is_expanded(1));
        assert!(session.any_expanded());

        session.set_expanded(1, false);
        assert!(!session.any_expanded());
    }

    #[test]
    fn test_drop_target_is_exact_equality() {
        let mut session = session_with_tree();
        assert!(!session.is_drag_over(0, 1));

        session.set_drop_target(Some(DropTarget { container: 0, index: 1 }));
        assert!(session.is_drag_over(0, 1));
        assert!(!session.is_drag_over(0, 2));
        assert!(!session.is_drag_over(1, 1));

        session.set_drop_target(None);
        assert!(!session.is_drag_over(0, 1));
    }
}
