#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Named-slot save, load and autosave over a key-value snapshot store.
//!
//! Snapshots are serialized as JSON with the wire field names defined on
//! [`GameSnapshot`], so saves written by one host round-trip identically
//! through any other. A missing slot is an ordinary return case, not an
//! error path: callers report it and leave state unchanged.

use std::collections::HashMap;

use thiserror::Error;
use tilegarden_core::GameSnapshot;
use tilegarden_system_history::History;

/// First named save slot.
pub const SLOT_ONE: &str = "gameStateSlot1";
/// Second named save slot.
pub const SLOT_TWO: &str = "gameStateSlot2";
/// Slot reserved for the autosave checkpoint.
pub const AUTOSAVE_SLOT: &str = "autoSaveState";

/// External key-value mapping backing the persistence gateway.
///
/// Entries are created or overwritten by saves and read by loads; the
/// core never deletes them.
pub trait SnapshotStore {
    /// Retrieves the payload stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;
    /// Creates or overwrites the payload stored under `key`.
    fn set(&mut self, key: &str, value: String);
}

impl SnapshotStore for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        let _ = self.insert(key.to_owned(), value);
    }
}

/// Failures reported by the load path.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The requested slot holds no save state. Reported, non-fatal.
    #[error("no save state found for slot '{0}'")]
    SlotNotFound(String),
    /// The slot payload could not be parsed back into a snapshot.
    #[error("slot '{slot}' holds a malformed snapshot")]
    MalformedSnapshot {
        /// Slot whose payload failed to parse.
        slot: String,
        /// Underlying parse failure.
        #[source]
        source: serde_json::Error,
    },
}

/// Serializes `snapshot` into `slot` and records it as a checkpoint.
///
/// Saving doubles as a history record: the just-saved state lands on the
/// undo stack and the redo branch is discarded.
pub fn save(
    store: &mut dyn SnapshotStore,
    history: &mut History,
    slot: &str,
    snapshot: &GameSnapshot,
) {
    let payload =
        serde_json::to_string(snapshot).expect("snapshot serialization never fails");
    store.set(slot, payload);
    history.record(snapshot.clone());
    log::info!("game saved to {slot}");
}

/// Deserializes the snapshot stored under `slot`.
pub fn load(store: &dyn SnapshotStore, slot: &str) -> Result<GameSnapshot, PersistenceError> {
    let payload = store
        .get(slot)
        .ok_or_else(|| PersistenceError::SlotNotFound(slot.to_owned()))?;
    serde_json::from_str(&payload).map_err(|source| PersistenceError::MalformedSnapshot {
        slot: slot.to_owned(),
        source,
    })
}

/// Saves `snapshot` into the autosave slot.
pub fn autosave(store: &mut dyn SnapshotStore, history: &mut History, snapshot: &GameSnapshot) {
    save(store, history, AUTOSAVE_SLOT, snapshot);
}

/// Offers to resume from the autosave checkpoint at startup.
///
/// When the autosave slot holds a valid snapshot, the host-supplied
/// `confirm` collaborator is asked once; the snapshot is returned only on
/// an affirmative answer. A malformed autosave is reported and skipped.
pub fn startup_resume(
    store: &dyn SnapshotStore,
    confirm: impl FnOnce() -> bool,
) -> Option<GameSnapshot> {
    match load(store, AUTOSAVE_SLOT) {
        Ok(snapshot) => confirm().then_some(snapshot),
        Err(PersistenceError::SlotNotFound(_)) => None,
        Err(error) => {
            log::warn!("autosave ignored: {error}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilegarden_core::PlayerPosition;

    fn snapshot(marker: u32) -> GameSnapshot {
        GameSnapshot {
            grid_state: vec![0, 0, 3, 0, 9, 9, 1, 2],
            player_position: PlayerPosition { x: 96.0, y: 160.0 },
            steps_taken: marker,
            water_level: 7,
            reaped_flowers: 3,
            won: false,
        }
    }

    #[test]
    fn save_then_load_round_trips_the_snapshot() {
        let mut store = HashMap::new();
        let mut history = History::new();
        save(&mut store, &mut history, SLOT_ONE, &snapshot(4));
        let loaded = load(&store, SLOT_ONE).expect("slot exists");
        assert_eq!(loaded, snapshot(4));
    }

    #[test]
    fn missing_slot_is_reported_not_fatal() {
        let store = HashMap::new();
        match load(&store, SLOT_TWO) {
            Err(PersistenceError::SlotNotFound(slot)) => assert_eq!(slot, SLOT_TWO),
            other => panic!("expected SlotNotFound, got {other:?}"),
        }
    }

    #[test]
    fn malformed_payload_is_reported() {
        let mut store = HashMap::new();
        store.set(SLOT_ONE, "{not json".to_owned());
        assert!(matches!(
            load(&store, SLOT_ONE),
            Err(PersistenceError::MalformedSnapshot { .. })
        ));
    }

    #[test]
    fn save_records_a_history_checkpoint() {
        let mut store = HashMap::new();
        let mut history = History::new();
        save(&mut store, &mut history, SLOT_ONE, &snapshot(1));
        assert_eq!(history.undo_depth(), 1);
        assert_eq!(history.undo(snapshot(2)), Ok(snapshot(1)));
    }

    #[test]
    fn autosave_writes_the_reserved_slot() {
        let mut store = HashMap::new();
        let mut history = History::new();
        autosave(&mut store, &mut history, &snapshot(2));
        assert!(SnapshotStore::get(&store, AUTOSAVE_SLOT).is_some());
        assert!(SnapshotStore::get(&store, SLOT_ONE).is_none());
    }

    #[test]
    fn startup_resume_honors_the_confirmation() {
        let mut store = HashMap::new();
        let mut history = History::new();
        autosave(&mut store, &mut history, &snapshot(6));

        assert_eq!(startup_resume(&store, || true), Some(snapshot(6)));
        assert_eq!(startup_resume(&store, || false), None);
    }

    #[test]
    fn startup_resume_without_autosave_never_prompts() {
        let store = HashMap::new();
        let resumed = startup_resume(&store, || panic!("prompt must not fire"));
        assert_eq!(resumed, None);
    }
}
