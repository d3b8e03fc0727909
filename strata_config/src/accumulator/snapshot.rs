//! Lazily materialised snapshot storage.

use serde_json::{Map, Value};

/// Whether the accumulator has produced a snapshot yet.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SnapshotState {
    /// No source has been applied and the snapshot has not been read.
    Uninitialized,
    /// The snapshot exists; defaults have been computed exactly once.
    Materialized,
}

#[derive(Clone, Debug, Default)]
pub(super) struct Snapshot {
    current: Option<Map<String, Value>>,
}

impl Snapshot {
    pub(super) const fn state(&self) -> SnapshotState {
        match self.current {
            Some(_) => SnapshotState::Materialized,
            None => SnapshotState::Uninitialized,
        }
    }

    pub(super) const fn get(&self) -> Option<&Map<String, Value>> {
        self.current.as_ref()
    }

    /// Returns the snapshot, running `init` first if it was never
    /// materialised. A failing `init` leaves the snapshot uninitialised.
    pub(super) fn get_or_try_init<E>(
        &mut self,
        init: impl FnOnce() -> Result<Map<String, Value>, E>,
    ) -> Result<&mut Map<String, Value>, E> {
        let map = match self.current.take() {
            Some(map) => map,
            None => init()?,
        };
        Ok(self.current.insert(map))
    }

    pub(super) fn into_inner(self) -> Option<Map<String, Value>> {
        self.current
    }
}
