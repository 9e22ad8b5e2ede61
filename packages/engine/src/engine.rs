//! # TreeEngine Trait
//!
//! The authoritative engine owns true document state, encoding rules, and
//! value validation. This trait is the whole of what the session layer is
//! allowed to ask of it: three constructors, one serializer, the structural
//! and content mutators, and three exporters.
//!
//! Implementations are expected to be deterministic: replaying the same
//! command sequence against a fresh instance must rebuild the same tree.
//! The session layer's undo machinery depends on this.

use crate::{EngineError, Node};

/// Narrow interface to the opaque document engine.
pub trait TreeEngine: Sized {
    /// Construct from raw encoded document data (e.g. hex or base64 DER).
    fn from_raw(data: &str) -> Result<Self, EngineError>;

    /// Reconstruct from a previously exported stored encoding.
    fn from_stored(encoded: &str) -> Result<Self, EngineError>;

    /// Construct a named built-in example document.
    fn load_example(name: &str) -> Result<Self, EngineError>;

    /// Serialize the current tree as a flat JSON node list (pre-order).
    ///
    /// Always callable after successful construction; never fails.
    fn serialize_tree(&self) -> String;

    /// Insert a new node as a child of `parent`, at `index` when given,
    /// otherwise appended.
    fn add_node(
        &mut self,
        tag: u8,
        content: &str,
        parent: usize,
        label: &str,
        index: Option<usize>,
    ) -> Result<(), EngineError>;

    /// Reparent `id` under `new_parent` at child position `index`.
    fn move_node(&mut self, id: usize, new_parent: usize, index: usize)
        -> Result<(), EngineError>;

    /// Bulk replace tag, length, and content of one node.
    fn replace_node(
        &mut self,
        id: usize,
        tag: u8,
        length: usize,
        content: &str,
    ) -> Result<(), EngineError>;

    /// Replace a single node's content value.
    fn set_content(&mut self, id: usize, content: &str) -> Result<(), EngineError>;

    /// Replace a single node's encoded length.
    fn set_length(&mut self, id: usize, length: usize) -> Result<(), EngineError>;

    /// Replace a single node's type tag.
    fn set_tag(&mut self, id: usize, tag: u8) -> Result<(), EngineError>;

    /// Replace a single node's label.
    fn set_label(&mut self, id: usize, label: &str) -> Result<(), EngineError>;

    /// Delete a node and its entire subtree.
    fn remove_node(&mut self, id: usize) -> Result<(), EngineError>;

    /// Binary export of the encoded document.
    fn export_bin(&self) -> Vec<u8>;

    /// Base64 export of the encoded document.
    fn export_base64(&self) -> String;

    /// Opaque stored encoding suitable for [`TreeEngine::from_stored`].
    fn export_stored(&self) -> String;

    /// Parse a serialized node list back into records.
    ///
    /// Provided for callers refreshing a cached tree; the list comes from
    /// [`TreeEngine::serialize_tree`].
    fn parse_node_list(json: &str) -> Result<Vec<Node>, serde_json::Error> {
        serde_json::from_str(json)
    }
}
