//! Flat node records exchanged with the authoritative engine.
//!
//! A serialized tree is a flat list of these records in pre-order. The
//! session layer treats everything except `id`, `parent`, and `children` as
//! opaque display payload: the triples carry (value, display form, binary
//! form) exactly as the engine produced them.

use serde::{Deserialize, Serialize};

/// One node of the serialized document tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Stable identifier, unique within a tree, assigned by the engine.
    pub id: usize,

    /// Human-readable field name, when the schema assigns one.
    pub label: String,

    /// Type tag: (value, display form, binary form).
    pub tag: (u8, String, Vec<u8>),

    /// Encoded length: (value, display form, binary form).
    pub length: (usize, String, Vec<u8>),

    /// Content: (value, display form, binary form).
    pub content: (String, String, Vec<u8>),

    /// Ordered child ids.
    pub children: Vec<usize>,

    /// Parent id; `None` for roots.
    pub parent: Option<usize>,
}

impl Node {
    /// Neutral placeholder for lookups that miss.
    ///
    /// Read-path getters in the session layer are total functions: asking
    /// for a node that is not in the cached tree yields this rather than an
    /// error.
    pub fn detached(id: usize) -> Self {
        Self {
            id,
            label: String::new(),
            tag: (0, String::new(), Vec::new()),
            length: (0, String::new(), Vec::new()),
            content: (String::new(), String::new(), Vec::new()),
            children: Vec::new(),
            parent: None,
        }
    }
}
