//! # Logged Edit Commands
//!
//! Every structural or content edit is a `Command`: a named, replayable
//! operation with a fixed payload shape, scoped to one session. Commands
//! are what the mutation log records, so a payload must carry exactly the
//! arguments needed to replay the edit byte-for-byte identically.
//!
//! Dispatch is a closed set: the apply phase matches exhaustively over the
//! six kinds, so an unhandled command is a compile error rather than a
//! runtime warning branch.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::session::SessionId;

/// Where a document load draws its bytes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadSource {
    /// Raw encoded document data (hex or base64 DER).
    Raw(String),
    /// A previously exported stored encoding.
    Stored(String),
    /// A named built-in example document.
    Example(String),
}

/// A single-field edit of one node.
///
/// Field name and value travel together so the pair is well-formed by
/// construction; resolving a free-form field name happens once, at the UI
/// boundary, in [`FieldEdit::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldEdit {
    Content(String),
    Length(usize),
    Tag(u8),
    Label(String),
}

impl FieldEdit {
    /// Resolve a field name and raw value from the UI.
    ///
    /// Unknown field names and unparseable values are advisory-level
    /// problems: they log a warning and yield `None` (the edit becomes a
    /// no-op), never a failure.
    pub fn parse(field: &str, value: &str) -> Option<Self> {
        match field {
            "content" => Some(Self::Content(value.to_string())),
            "label" => Some(Self::Label(value.to_string())),
            "length" => match value.parse() {
                Ok(length) => Some(Self::Length(length)),
                Err(_) => {
                    warn!(value, "length edit is not a number, ignoring");
                    None
                }
            },
            "tag" => match value.parse() {
                Ok(tag) => Some(Self::Tag(tag)),
                Err(_) => {
                    warn!(value, "tag edit is not a byte value, ignoring");
                    None
                }
            },
            other => {
                warn!(field = other, "unknown field to update, ignoring");
                None
            }
        }
    }

    /// The canonical field name.
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::Content(_) => "content",
            Self::Length(_) => "length",
            Self::Tag(_) => "tag",
            Self::Label(_) => "label",
        }
    }
}

/// A logged, replayable edit command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Command {
    /// Construct or replace the session's engine instance.
    StateSet {
        session: SessionId,
        source: LoadSource,
    },

    /// Insert a new node under `parent`, at `index` when given.
    NodeAdded {
        session: SessionId,
        tag: u8,
        content: String,
        parent: usize,
        label: String,
        index: Option<usize>,
    },

    /// Reparent node `id` under `target` at child position `index`
    /// (drag/drop result).
    NodeMoved {
        session: SessionId,
        id: usize,
        target: usize,
        index: usize,
    },

    /// Bulk field replace for one node.
    NodeChanged {
        session: SessionId,
        id: usize,
        tag: u8,
        length: usize,
        content: String,
    },

    /// Single-field replace for one node.
    NodeUpdated {
        session: SessionId,
        id: usize,
        edit: FieldEdit,
    },

    /// Delete a node and its subtree.
    NodeRemoved { session: SessionId, id: usize },
}

impl Command {
    /// The session this command targets.
    pub fn session(&self) -> SessionId {
        match self {
            Command::StateSet { session, .. } => *session,
            Command::NodeAdded { session, .. } => *session,
            Command::NodeMoved { session, .. } => *session,
            Command::NodeChanged { session, .. } => *session,
            Command::NodeUpdated { session, .. } => *session,
            Command::NodeRemoved { session, .. } => *session,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_serialization_round_trip() {
        let cmd = Command::NodeAdded {
            session: SessionId::from_raw(7),
            tag: 2,
            content: "42".to_string(),
            parent: 0,
            label: "x".to_string(),
            index: Some(1),
        };

        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains("\"kind\":\"nodeAdded\""));

        let back: Command = serde_json::from_str(&json).unwrap();
        assert_eq!(cmd, back);
    }

    #[test]
    fn test_field_edit_parsing() {
        assert_eq!(
            FieldEdit::parse("content", "43"),
            Some(FieldEdit::Content("43".to_string()))
        );
        assert_eq!(FieldEdit::parse("length", "12"), Some(FieldEdit::Length(12)));
        assert_eq!(FieldEdit::parse("tag", "2"), Some(FieldEdit::Tag(2)));
        assert_eq!(
            FieldEdit::parse("label", "serial"),
            Some(FieldEdit::Label("serial".to_string()))
        );
    }

    #[test]
    fn test_unknown_field_is_a_no_op() {
        assert_eq!(FieldEdit::parse("color", "red"), None);
        assert_eq!(FieldEdit::parse("length", "not a number"), None);
    }
}
