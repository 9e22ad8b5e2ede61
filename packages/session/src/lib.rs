//! # Dertree Session Layer
//!
//! Tab sessions, the mutation log, and deterministic undo/redo for a
//! structured DER/ASN.1 document editor.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ UI / event handlers                         │
//! └─────────────────────────────────────────────┘
//!                     ↓ commands
//! ┌─────────────────────────────────────────────┐
//! │ session (this crate)                        │
//! │  - SessionStore: tab lifecycle + dispatch   │
//! │  - MutationLog: replayable command record   │
//! │  - undo/redo: rebuild-and-replay            │
//! │  - drag/drop target + descendant queries    │
//! └─────────────────────────────────────────────┘
//!                     ↓ TreeEngine trait
//! ┌─────────────────────────────────────────────┐
//! │ authoritative engine (opaque)               │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Engine is source of truth**: every session's cached tree is the
//!    engine's most recent serialized node list, never hand-mutated
//! 2. **History is a command log**: the engine exposes no undo, so prior
//!    states are rebuilt from scratch by replaying logged commands
//! 3. **Sessions are isolated**: no operation on one session reads or
//!    writes another session's log, tree, or ephemeral state
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dertree_engine::MemoryEngine;
//! use dertree_session::{Command, LoadSource, SessionStore};
//!
//! let mut store: SessionStore<MemoryEngine> = SessionStore::new();
//! let id = store.add_session("doc1");
//!
//! store.apply(Command::StateSet {
//!     session: id,
//!     source: LoadSource::Example("rsa-cert".to_string()),
//! })?;
//!
//! store.apply(Command::NodeAdded {
//!     session: id,
//!     tag: 2,
//!     content: "42".to_string(),
//!     parent: 0,
//!     label: "x".to_string(),
//!     index: None,
//! })?;
//!
//! store.undo()?; // back to the freshly loaded example
//! store.redo()?; // node is back
//! ```

mod commands;
mod log;
mod session;
mod store;
mod types;

pub use commands::{Command, FieldEdit, LoadSource};
pub use log::MutationLog;
pub use session::{DropTarget, Session, SessionId};
pub use store::{SessionStore, StoreError};
pub use types::{type_info, TypeInfo};

// Re-export the engine contract for convenience
pub use dertree_engine::{EngineError, Node, TreeEngine};
