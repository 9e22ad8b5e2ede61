//! Undo/redo behavior against the in-memory engine.
//!
//! History is a log replay: undo rebuilds the session from a fresh engine
//! by re-running the logged prefix, so these tests assert on the cached
//! tree rather than on stored snapshots.

use dertree_engine::MemoryEngine;
use dertree_session::{Command, FieldEdit, LoadSource, SessionId, SessionStore};

fn loaded_store() -> (SessionStore<MemoryEngine>, SessionId) {
    let mut store = SessionStore::new();
    let id = store.add_session("doc1");
    store
        .apply(Command::StateSet {
            session: id,
            source: LoadSource::Example("rsa-cert".to_string()),
        })
        .unwrap();
    (store, id)
}

fn add_integer(session: SessionId, content: &str) -> Command {
    Command::NodeAdded {
        session,
        tag: 2,
        content: content.to_string(),
        parent: 0,
        label: "x".to_string(),
        index: None,
    }
}

fn tree_fingerprint(store: &SessionStore<MemoryEngine>) -> Vec<(usize, String, String)> {
    store
        .tree()
        .iter()
        .map(|n| (n.id, n.label.clone(), n.content.0.clone()))
        .collect()
}

#[test]
fn undo_redo_round_trip_reproduces_tree() {
    let (mut store, id) = loaded_store();

    // N = 4 logged commands total (load + three edits)
    store.apply(add_integer(id, "1")).unwrap();
    store.apply(add_integer(id, "2")).unwrap();
    store.apply(add_integer(id, "3")).unwrap();

    let final_tree = tree_fingerprint(&store);

    for _ in 0..3 {
        store.undo().unwrap();
    }
    assert_eq!(store.session(id).unwrap().log().count(), 1);

    for _ in 0..3 {
        store.redo().unwrap();
    }
    assert_eq!(store.session(id).unwrap().log().count(), 4);
    assert_eq!(tree_fingerprint(&store), final_tree);
}

#[test]
fn new_command_after_undo_truncates_redo_branch() {
    let (mut store, id) = loaded_store();

    store.apply(add_integer(id, "1")).unwrap();
    store.apply(add_integer(id, "2")).unwrap();
    store.undo().unwrap();

    let log = store.session(id).unwrap().log();
    assert_eq!(log.redoable(), 1);

    store.apply(add_integer(id, "9")).unwrap();

    let log = store.session(id).unwrap().log();
    assert_eq!(log.len(), log.count());
    assert_eq!(log.redoable(), 0);
}

#[test]
fn undo_at_initial_load_is_a_no_op() {
    let (mut store, id) = loaded_store();
    assert_eq!(store.session(id).unwrap().log().count(), 1);

    store.undo().unwrap();

    assert_eq!(store.session(id).unwrap().log().count(), 1);
    assert!(!store.tree().is_empty());
}

#[test]
fn redo_with_nothing_redoable_is_a_no_op() {
    let (mut store, id) = loaded_store();
    store.apply(add_integer(id, "1")).unwrap();

    let before = tree_fingerprint(&store);
    store.redo().unwrap();

    assert_eq!(tree_fingerprint(&store), before);
    assert_eq!(store.session(id).unwrap().log().count(), 2);
}

#[test]
fn undo_on_empty_registry_is_a_no_op() {
    let mut store: SessionStore<MemoryEngine> = SessionStore::new();
    store.undo().unwrap();
    store.redo().unwrap();
}

/// The concrete end-to-end scenario: load, add, update, two undos, one
/// redo, then a fresh edit that permanently discards the truncated update.
#[test]
fn scenario_load_add_update_undo_redo() {
    let (mut store, id) = loaded_store();
    assert_eq!(store.session(id).unwrap().log().count(), 1);

    store.apply(add_integer(id, "42")).unwrap();
    assert_eq!(store.session(id).unwrap().log().count(), 2);

    let added = store
        .tree()
        .iter()
        .find(|n| n.label == "x")
        .expect("added node present")
        .id;

    store
        .apply(Command::NodeUpdated {
            session: id,
            id: added,
            edit: FieldEdit::Content("43".to_string()),
        })
        .unwrap();
    assert_eq!(store.session(id).unwrap().log().count(), 3);
    assert_eq!(store.node(added).content.0, "43");

    // Undo the content update
    store.undo().unwrap();
    assert_eq!(store.session(id).unwrap().log().count(), 2);
    assert_eq!(store.node(added).content.0, "42");

    // Undo the add
    store.undo().unwrap();
    assert_eq!(store.session(id).unwrap().log().count(), 1);
    assert!(store.tree().iter().all(|n| n.label != "x"));

    // Redo the add
    store.redo().unwrap();
    assert_eq!(store.session(id).unwrap().log().count(), 2);
    assert_eq!(store.node(added).content.0, "42");

    // A fresh edit instead of redo discards the "43" update for good
    store.apply(add_integer(id, "7")).unwrap();
    let log = store.session(id).unwrap().log();
    assert_eq!(log.count(), 3);
    assert_eq!(log.len(), 3);
    assert_eq!(store.node(added).content.0, "42");
}

#[test]
fn move_node_survives_undo_and_redo() -> anyhow::Result<()> {
    let (mut store, id) = loaded_store();

    let tbs = store
        .tree()
        .iter()
        .find(|n| n.label == "TBSCertificate")
        .expect("example has a TBSCertificate")
        .id;
    let alg = store
        .tree()
        .iter()
        .find(|n| n.label == "signatureAlgorithm")
        .expect("example has a signatureAlgorithm")
        .id;
    assert_eq!(store.parent_of(alg), store.parent_of(tbs));

    store.apply(Command::NodeMoved {
        session: id,
        id: alg,
        target: tbs,
        index: 0,
    })?;
    assert_eq!(store.parent_of(alg), Some(tbs));
    assert_eq!(store.node(tbs).children[0], alg);
    let moved = tree_fingerprint(&store);

    store.undo()?;
    assert_eq!(store.parent_of(alg), store.parent_of(tbs));
    assert!(!store.node(tbs).children.contains(&alg));

    store.redo()?;
    assert_eq!(store.parent_of(alg), Some(tbs));
    assert_eq!(tree_fingerprint(&store), moved);
    Ok(())
}

#[test]
fn undo_replays_only_the_target_session() {
    let (mut store, a) = loaded_store();
    let b = store.add_session("doc2");
    store
        .apply(Command::StateSet {
            session: b,
            source: LoadSource::Example("rsa-key".to_string()),
        })
        .unwrap();
    store.apply(add_integer(b, "5")).unwrap();

    // Undo targets the active session (b); a's log is untouched
    store.undo().unwrap();

    assert_eq!(store.session(b).unwrap().log().count(), 1);
    assert_eq!(store.session(a).unwrap().log().count(), 1);
    assert!(!store.session(a).unwrap().tree().is_empty());
}

#[test]
fn rejected_command_still_consumes_a_log_slot() {
    let (mut store, id) = loaded_store();

    let err = store
        .apply(Command::NodeRemoved {
            session: id,
            id: 9999,
        })
        .unwrap_err();
    assert!(err.to_string().contains("invalid operation"));

    // The log write happened before the apply; the cursor advanced
    let log = store.session(id).unwrap().log();
    assert_eq!(log.count(), 2);
    assert_eq!(log.len(), 2);

    // Replaying through that entry fails identically but keeps the
    // cursor bookkeeping intact
    store.apply(add_integer(id, "1")).unwrap();
    let result = store.undo();
    assert!(result.is_err());
    assert_eq!(store.session(id).unwrap().log().count(), 2);
    assert_eq!(store.session(id).unwrap().log().len(), 3);
}

#[test]
fn failed_load_keeps_prior_state() {
    let (mut store, id) = loaded_store();
    let before = tree_fingerprint(&store);

    let err = store
        .apply(Command::StateSet {
            session: id,
            source: LoadSource::Raw("certainly not a document".to_string()),
        })
        .unwrap_err();
    assert!(err.to_string().contains("decode error"));

    // Prior engine and tree survive; the load attempt still took a slot
    assert_eq!(tree_fingerprint(&store), before);
    assert_eq!(store.session(id).unwrap().log().count(), 2);
}

#[test]
fn stored_round_trip_through_the_store() {
    let (mut store, id) = loaded_store();
    store.apply(add_integer(id, "8")).unwrap();

    let stored = store.export_stored().expect("active session is loaded");
    let fingerprint = tree_fingerprint(&store);

    let other = store.add_session("copy");
    store
        .apply(Command::StateSet {
            session: other,
            source: LoadSource::Stored(stored),
        })
        .unwrap();

    assert_eq!(tree_fingerprint(&store), fingerprint);
}
