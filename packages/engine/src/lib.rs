//! # Dertree Engine Interface
//!
//! The narrow contract between the session layer and the authoritative
//! document engine.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ session: tabs, mutation log, undo/redo      │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ engine (this crate): TreeEngine trait       │
//! │  - construct from raw/stored/example input  │
//! │  - structural + content mutators            │
//! │  - flat node-list serialization             │
//! │  - binary/base64/stored exports             │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ authoritative engine: owns true tree state, │
//! │ encoding rules, and value validation        │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Engine is source of truth**: callers never derive tree state
//!    themselves, they re-pull the serialized node list after every mutation
//! 2. **No undo here**: the engine exposes no history; the session layer
//!    rebuilds prior states by replaying its own command log
//! 3. **Errors propagate**: decode and mutation failures surface to the
//!    caller untouched, with no retry and no rollback of partial effects

mod engine;
mod errors;
mod mem;
mod node;

pub use engine::TreeEngine;
pub use errors::EngineError;
pub use mem::MemoryEngine;
pub use node::Node;
