//! # Session Store
//!
//! The registry of open sessions, the two-phase command dispatch, and the
//! undo/redo replay machinery.
//!
//! ## Dispatch protocol
//!
//! Every logged command goes through the same two phases:
//!
//! 1. **Log phase** — the command is recorded into the session's mutation
//!    log (truncating any redo branch) and the cursor advances. During
//!    replay, only the cursor advances.
//! 2. **Apply phase** — the operation is sent to the session's engine,
//!    then the cached tree is replaced with the engine's freshly
//!    serialized node list.
//!
//! The log write happens unconditionally before the engine call: a
//! rejected edit still consumes a log slot and advances the cursor.
//!
//! ## Undo model
//!
//! The engine exposes no native undo and no diffing, so the only way back
//! to a prior state is to rebuild it: drop the engine, clear the cache,
//! and replay the logged commands up to the new cursor against a fresh
//! engine instance. The full entry list is reinstated afterwards so the
//! redo branch survives.

use tracing::debug;

use crate::commands::{Command, FieldEdit, LoadSource};
use crate::session::{DropTarget, Session, SessionId};
use dertree_engine::{EngineError, Node, TreeEngine};

/// Errors surfaced by command dispatch.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("unknown session: {0}")]
    UnknownSession(SessionId),

    #[error("session {0} has no loaded document")]
    NotLoaded(SessionId),

    #[error("malformed node list from engine: {0}")]
    NodeList(#[from] serde_json::Error),
}

/// Registry of open sessions plus the single active-session pointer.
///
/// Explicitly constructed and owned by the application root; there is no
/// process-wide singleton.
pub struct SessionStore<E> {
    sessions: Vec<Session<E>>,
    active: Option<SessionId>,
    next_id: u64,
}

impl<E> Default for SessionStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> SessionStore<E> {
    pub fn new() -> Self {
        Self {
            sessions: Vec::new(),
            active: None,
            next_id: 0,
        }
    }

    // ---- Session lifecycle (no engine calls) ----

    /// Create an empty session and make it active.
    pub fn add_session(&mut self, name: impl Into<String>) -> SessionId {
        let id = SessionId::from_raw(self.next_id);
        self.next_id += 1;

        self.sessions.push(Session::new(id, name));
        self.active = Some(id);
        id
    }

    /// Set the active pointer. Selecting a nonexistent id is a caller
    /// error; read paths then fall back to neutral values.
    pub fn select_session(&mut self, id: SessionId) {
        self.active = Some(id);
    }

    /// Remove a session. If it was active, selection moves to the
    /// neighbor immediately preceding it in registry order, or to none
    /// when the registry becomes empty.
    pub fn remove_session(&mut self, id: SessionId) {
        let Some(index) = self.sessions.iter().position(|s| s.id == id) else {
            return;
        };

        self.sessions.remove(index);

        if self.active == Some(id) {
            self.active = if self.sessions.is_empty() {
                None
            } else {
                Some(self.sessions[index.saturating_sub(1)].id)
            };
        }
    }

    /// Rename the active session.
    pub fn rename_session(&mut self, new_name: impl Into<String>) {
        if let Some(session) = self.active_session_mut() {
            session.name = new_name.into();
        }
    }

    pub fn sessions(&self) -> &[Session<E>] {
        &self.sessions
    }

    pub fn active_id(&self) -> Option<SessionId> {
        self.active
    }

    pub fn session(&self, id: SessionId) -> Option<&Session<E>> {
        self.sessions.iter().find(|s| s.id == id)
    }

    fn session_mut(&mut self, id: SessionId) -> Option<&mut Session<E>> {
        self.sessions.iter_mut().find(|s| s.id == id)
    }

    pub fn active_session(&self) -> Option<&Session<E>> {
        self.active.and_then(|id| self.session(id))
    }

    fn active_session_mut(&mut self) -> Option<&mut Session<E>> {
        let id = self.active?;
        self.session_mut(id)
    }

    // ---- Read getters (total functions) ----

    /// Display name of the active session, if any.
    pub fn name(&self) -> Option<&str> {
        self.active_session().map(|s| s.name.as_str())
    }

    /// Cached tree of the active session; empty when none.
    pub fn tree(&self) -> &[Node] {
        self.active_session().map(|s| s.tree()).unwrap_or(&[])
    }

    /// Node by id in the active tree, or an empty-children placeholder.
    pub fn node(&self, id: usize) -> Node {
        self.active_session()
            .map(|s| s.node(id))
            .unwrap_or_else(|| Node::detached(id))
    }

    pub fn parent_of(&self, id: usize) -> Option<usize> {
        self.active_session().and_then(|s| s.parent_of(id))
    }

    pub fn is_descendant(&self, ancestor: usize, id: usize) -> bool {
        self.active_session()
            .is_some_and(|s| s.is_descendant(ancestor, id))
    }

    pub fn is_expanded(&self, id: usize) -> bool {
        self.active_session().is_some_and(|s| s.is_expanded(id))
    }

    pub fn any_expanded(&self) -> bool {
        self.active_session().is_some_and(|s| s.any_expanded())
    }

    pub fn is_drag_over(&self, container: usize, index: usize) -> bool {
        self.active_session()
            .is_some_and(|s| s.is_drag_over(container, index))
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.active_session().and_then(|s| s.highlighted())
    }

    pub fn drop_target(&self) -> Option<DropTarget> {
        self.active_session().and_then(|s| s.drop_target())
    }

    pub fn dragged_node(&self) -> Option<usize> {
        self.active_session().and_then(|s| s.dragged_node())
    }

    pub fn is_dragging(&self) -> bool {
        self.active_session().is_some_and(|s| s.is_dragging())
    }

    pub fn active_drop_context(&self) -> Option<usize> {
        self.active_session().and_then(|s| s.active_drop_context())
    }

    pub fn position(&self, id: usize) -> Option<(f64, f64)> {
        self.active_session().and_then(|s| s.position(id))
    }

    pub fn copied_node(&self) -> Option<&Node> {
        self.active_session().and_then(|s| s.copied_node())
    }

    // ---- UI-ephemeral setters (never logged, never reach the engine) ----

    pub fn set_expanded(&mut self, id: usize, expanded: bool) {
        if let Some(session) = self.active_session_mut() {
            session.set_expanded(id, expanded);
        }
    }

    /// Bulk-set fold state for every node currently in the active tree.
    pub fn set_all(&mut self, expanded: bool) {
        if let Some(session) = self.active_session_mut() {
            let ids: Vec<usize> = session.tree().iter().map(|n| n.id).collect();
            for id in ids {
                session.set_expanded(id, expanded);
            }
        }
    }

    pub fn set_position(&mut self, id: usize, top: f64, height: f64) {
        if let Some(session) = self.active_session_mut() {
            session.set_position(id, top, height);
        }
    }

    pub fn set_highlighted(&mut self, id: Option<usize>) {
        if let Some(session) = self.active_session_mut() {
            session.set_highlighted(id);
        }
    }

    pub fn set_drop_target(&mut self, target: Option<DropTarget>) {
        if let Some(session) = self.active_session_mut() {
            session.set_drop_target(target);
        }
    }

    pub fn set_dragged_node(&mut self, id: Option<usize>) {
        if let Some(session) = self.active_session_mut() {
            session.set_dragged_node(id);
        }
    }

    pub fn set_dragging(&mut self, dragging: bool) {
        if let Some(session) = self.active_session_mut() {
            session.set_dragging(dragging);
        }
    }

    pub fn set_active_drop_context(&mut self, id: Option<usize>) {
        if let Some(session) = self.active_session_mut() {
            session.set_active_drop_context(id);
        }
    }

    pub fn set_copied_node(&mut self, node: Option<Node>) {
        if let Some(session) = self.active_session_mut() {
            session.set_copied_node(node);
        }
    }
}

impl<E: TreeEngine> SessionStore<E> {
    // ---- Command dispatch ----

    /// Apply a freshly issued command: record it, send it to the engine,
    /// refresh the cached tree.
    pub fn apply(&mut self, command: Command) -> Result<(), StoreError> {
        self.dispatch(command, true)
    }

    fn dispatch(&mut self, command: Command, push: bool) -> Result<(), StoreError> {
        let id = command.session();
        let session = self
            .session_mut(id)
            .ok_or(StoreError::UnknownSession(id))?;

        // Log phase. Unconditional: a failing apply still occupies a slot.
        if push {
            session.log.record(command.clone());
        } else {
            session.log.mark_replayed();
        }

        // Apply phase
        match &command {
            Command::StateSet { source, .. } => {
                // A decode failure leaves the prior engine and tree alone.
                let engine = Self::construct(source)?;
                session.tree = Self::pull_tree(&engine)?;
                session.engine = Some(engine);
            }
            _ => {
                let engine = session
                    .engine
                    .as_mut()
                    .ok_or(StoreError::NotLoaded(id))?;
                Self::apply_edit(engine, &command)?;
                let json = engine.serialize_tree();
                session.tree = E::parse_node_list(&json)?;
            }
        }

        Ok(())
    }

    fn construct(source: &LoadSource) -> Result<E, EngineError> {
        match source {
            LoadSource::Raw(data) => E::from_raw(data),
            LoadSource::Stored(encoded) => E::from_stored(encoded),
            LoadSource::Example(name) => E::load_example(name),
        }
    }

    fn pull_tree(engine: &E) -> Result<Vec<Node>, StoreError> {
        Ok(E::parse_node_list(&engine.serialize_tree())?)
    }

    fn apply_edit(engine: &mut E, command: &Command) -> Result<(), EngineError> {
        match command {
            // Loads construct a new engine; dispatch handles them directly
            Command::StateSet { .. } => Ok(()),

            Command::NodeAdded {
                tag,
                content,
                parent,
                label,
                index,
                ..
            } => engine.add_node(*tag, content, *parent, label, *index),

            Command::NodeMoved {
                id, target, index, ..
            } => engine.move_node(*id, *target, *index),

            Command::NodeChanged {
                id,
                tag,
                length,
                content,
                ..
            } => engine.replace_node(*id, *tag, *length, content),

            Command::NodeUpdated { id, edit, .. } => match edit {
                FieldEdit::Content(value) => engine.set_content(*id, value),
                FieldEdit::Length(value) => engine.set_length(*id, *value),
                FieldEdit::Tag(value) => engine.set_tag(*id, *value),
                FieldEdit::Label(value) => engine.set_label(*id, value),
            },

            Command::NodeRemoved { id, .. } => engine.remove_node(*id),
        }
    }

    // ---- Undo/redo ----

    /// Step the active session one command back by rebuilding its state
    /// from the log.
    ///
    /// The first logged entry is the document's initial load and is never
    /// itself undoable past; with fewer than two applied entries this is a
    /// no-op. Replay failures are reported after the replay has run to the
    /// new cursor, so the log and cursor stay consistent either way.
    pub fn undo(&mut self) -> Result<(), StoreError> {
        let Some(id) = self.active else {
            return Ok(());
        };
        let Some(session) = self.session_mut(id) else {
            return Ok(());
        };
        if session.log.count() < 2 {
            return Ok(());
        }

        let entries = session.log.entries().to_vec();
        let new_count = session.log.count() - 1;

        debug!(session = %id, replay = new_count, "rebuilding session state for undo");
        session.reset_document();

        // Replay runs the full prefix even past a failing command: the
        // failure happened identically when the command was first applied,
        // so skipping the rest would diverge from the recorded state.
        let mut first_error = None;
        for command in &entries[..new_count] {
            if let Err(error) = self.dispatch(command.clone(), false) {
                first_error.get_or_insert(error);
            }
        }

        if let Some(session) = self.session_mut(id) {
            session.log.reinstate(entries, new_count);
        }

        match first_error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// Re-apply the next redoable command of the active session, if any.
    pub fn redo(&mut self) -> Result<(), StoreError> {
        let Some(session) = self.active_session() else {
            return Ok(());
        };
        if session.log.count() >= session.log.len() {
            return Ok(());
        }

        let command = session.log.entries()[session.log.count()].clone();
        debug!(session = %session.id, "redoing logged command");
        self.dispatch(command, false)
    }

    // ---- Export pass-throughs (active session) ----

    pub fn export_bin(&self) -> Option<Vec<u8>> {
        self.active_session()
            .and_then(|s| s.engine.as_ref())
            .map(|e| e.export_bin())
    }

    pub fn export_base64(&self) -> Option<String> {
        self.active_session()
            .and_then(|s| s.engine.as_ref())
            .map(|e| e.export_base64())
    }

    pub fn export_stored(&self) -> Option<String> {
        self.active_session()
            .and_then(|s| s.engine.as_ref())
            .map(|e| e.export_stored())
    }
}
