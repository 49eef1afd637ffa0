//! Progression sync.
//!
//! After every state-changing operation the session pushes a
//! [`SessionSnapshot`] to an optional [`ProgressionStore`]. The store is
//! an opaque collaborator: its failures are logged and never roll back
//! board mutations.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::core::{GameRngState, Piece, ProgressionError};

/// Everything needed to reproduce a session's observable state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub turn_number: u32,
    pub active: bool,
    /// Pieces ordered by position.
    pub pieces: Vec<Piece>,
    /// Damage RNG position, so a restored session rolls the same damage.
    pub rng: GameRngState,
}

impl SessionSnapshot {
    /// Encode with bincode.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ProgressionError> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode bytes produced by [`SessionSnapshot::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ProgressionError> {
        Ok(bincode::deserialize(bytes)?)
    }
}

/// External persistence for session snapshots.
pub trait ProgressionStore {
    /// Store the latest snapshot.
    fn sync(&mut self, snapshot: &SessionSnapshot) -> Result<(), ProgressionError>;
}

/// In-memory store keeping the latest snapshot as bincode bytes.
///
/// Cloned handles share the same slot.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    latest: Rc<RefCell<Option<Vec<u8>>>>,
    syncs: Rc<RefCell<usize>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the latest stored snapshot, if any.
    pub fn load(&self) -> Result<Option<SessionSnapshot>, ProgressionError> {
        self.latest
            .borrow()
            .as_deref()
            .map(SessionSnapshot::from_bytes)
            .transpose()
    }

    /// Number of successful syncs.
    #[must_use]
    pub fn sync_count(&self) -> usize {
        *self.syncs.borrow()
    }
}

impl ProgressionStore for MemoryStore {
    fn sync(&mut self, snapshot: &SessionSnapshot) -> Result<(), ProgressionError> {
        let bytes = snapshot.to_bytes()?;
        *self.latest.borrow_mut() = Some(bytes);
        *self.syncs.borrow_mut() += 1;
        Ok(())
    }
}
