//! Shared in-memory table and its context lifecycle.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::core::ContextProvider;
use crate::error::{PersistenceResult, TransactionError};

/// A row of an in-memory table.
pub trait MemoryRecord: Clone + Send + Sync + 'static {
    /// Primary key type.
    type Key: Ord + Clone + fmt::Debug + Send + Sync + 'static;

    /// Returns the primary key of this row.
    fn key(&self) -> Self::Key;
}

struct TableState<E: MemoryRecord> {
    rows: BTreeMap<E::Key, E>,
    /// Version of the last commit that wrote each key, deleted keys included.
    /// Only entries newer than the oldest open snapshot are kept.
    written_at: BTreeMap<E::Key, u64>,
    /// Open contexts per base version.
    snapshots: BTreeMap<u64, usize>,
    version: u64,
}

impl<E: MemoryRecord> TableState<E> {
    fn open_snapshot(&mut self) -> u64 {
        *self.snapshots.entry(self.version).or_insert(0) += 1;
        self.version
    }

    fn close_snapshot(&mut self, version: u64) {
        if let Some(open) = self.snapshots.get_mut(&version) {
            *open -= 1;
            if *open == 0 {
                self.snapshots.remove(&version);
            }
        }
        self.prune();
    }

    /// Forgets writes no open context can conflict with.
    fn prune(&mut self) {
        let horizon = self.snapshots.keys().next().copied().unwrap_or(self.version);
        self.written_at.retain(|_, written| *written > horizon);
    }
}

/// Registration of a context's base version; closed on drop if the context
/// was never committed.
struct Snapshot<E: MemoryRecord> {
    state: Arc<RwLock<TableState<E>>>,
    version: u64,
    open: bool,
}

impl<E: MemoryRecord> Snapshot<E> {
    fn close(&mut self, state: &mut TableState<E>) {
        if self.open {
            self.open = false;
            state.close_snapshot(self.version);
        }
    }
}

impl<E: MemoryRecord> Drop for Snapshot<E> {
    fn drop(&mut self) {
        if self.open {
            self.open = false;
            self.state.write().close_snapshot(self.version);
        }
    }
}

/// A table of records shared by every context opened on it.
///
/// Cloning the table yields another handle to the same rows.
pub struct MemoryTable<E: MemoryRecord> {
    state: Arc<RwLock<TableState<E>>>,
}

impl<E: MemoryRecord> MemoryTable<E> {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(TableState {
                rows: BTreeMap::new(),
                written_at: BTreeMap::new(),
                snapshots: BTreeMap::new(),
                version: 0,
            })),
        }
    }

    /// Returns the number of committed rows.
    pub fn len(&self) -> usize {
        self.state.read().rows.len()
    }

    /// Returns true if no row is committed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a copy of the committed row under `key`.
    pub fn row(&self, key: &E::Key) -> Option<E> {
        self.state.read().rows.get(key).cloned()
    }

    /// Returns the number of commits that changed the table.
    pub fn version(&self) -> u64 {
        self.state.read().version
    }
}

impl<E: MemoryRecord> Default for MemoryTable<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: MemoryRecord> Clone for MemoryTable<E> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<E: MemoryRecord> fmt::Debug for MemoryTable<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("MemoryTable")
            .field("rows", &state.rows.len())
            .field("version", &state.version)
            .finish()
    }
}

/// Execution context over a [`MemoryTable`].
///
/// Writes are staged on a private copy of the rows taken at `begin`; they
/// become visible to other contexts only when the context commits.
pub struct MemoryContext<E: MemoryRecord> {
    rows: BTreeMap<E::Key, E>,
    written: BTreeSet<E::Key>,
    snapshot: Snapshot<E>,
}

impl<E: MemoryRecord> MemoryContext<E> {
    /// Returns true if the context staged any write.
    pub fn is_dirty(&self) -> bool {
        !self.written.is_empty()
    }

    pub(super) fn rows(&self) -> &BTreeMap<E::Key, E> {
        &self.rows
    }

    pub(super) fn put(&mut self, entity: E) {
        let key = entity.key();
        self.written.insert(key.clone());
        self.rows.insert(key, entity);
    }

    pub(super) fn delete(&mut self, key: &E::Key) -> Option<E> {
        let removed = self.rows.remove(key);
        if removed.is_some() {
            self.written.insert(key.clone());
        }
        removed
    }

    /// Deletes the rows matching `predicate` and returns how many were deleted.
    pub(super) fn delete_where(&mut self, mut predicate: impl FnMut(&E) -> bool) -> u64 {
        let keys: Vec<E::Key> = self
            .rows
            .iter()
            .filter(|(_, e)| predicate(e))
            .map(|(k, _)| k.clone())
            .collect();
        for key in &keys {
            self.delete(key);
        }
        keys.len() as u64
    }
}

impl<E: MemoryRecord> fmt::Debug for MemoryContext<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryContext")
            .field("rows", &self.rows.len())
            .field("written", &self.written.len())
            .field("base_version", &self.snapshot.version)
            .finish()
    }
}

/// Opens [`MemoryContext`]s on a table.
///
/// A context fails to commit with [`TransactionError::Conflict`] if another
/// context committed a write to one of the keys it wrote after it began.
/// Writes to disjoint keys never conflict.
pub struct MemoryContextProvider<E: MemoryRecord> {
    table: MemoryTable<E>,
}

impl<E: MemoryRecord> MemoryContextProvider<E> {
    /// Creates a provider over `table`.
    pub fn new(table: MemoryTable<E>) -> Self {
        Self { table }
    }

    /// Returns the table.
    pub fn table(&self) -> &MemoryTable<E> {
        &self.table
    }
}

impl<E: MemoryRecord> Clone for MemoryContextProvider<E> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
        }
    }
}

impl<E: MemoryRecord> fmt::Debug for MemoryContextProvider<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryContextProvider")
            .field("table", &self.table)
            .finish()
    }
}

impl<E: MemoryRecord> ContextProvider for MemoryContextProvider<E> {
    type Context = MemoryContext<E>;

    fn begin(&self) -> PersistenceResult<MemoryContext<E>> {
        let mut state = self.table.state.write();
        let version = state.open_snapshot();
        Ok(MemoryContext {
            rows: state.rows.clone(),
            written: BTreeSet::new(),
            snapshot: Snapshot {
                state: Arc::clone(&self.table.state),
                version,
                open: true,
            },
        })
    }

    fn commit(&self, context: MemoryContext<E>) -> PersistenceResult<()> {
        let MemoryContext {
            mut rows,
            written,
            mut snapshot,
        } = context;
        let mut state = self.table.state.write();
        let base_version = snapshot.version;
        let conflict = written
            .iter()
            .find(|key| state.written_at.get(*key).is_some_and(|v| *v > base_version))
            .map(|key| format!("key {:?} was written after version {}", key, base_version));
        // Close after the check; closing prunes the history read above.
        snapshot.close(&mut state);

        if let Some(reason) = conflict {
            return Err(TransactionError::Conflict { reason }.into());
        }
        if written.is_empty() {
            return Ok(());
        }

        let version = state.version + 1;
        for key in written {
            match rows.remove(&key) {
                Some(row) => state.rows.insert(key.clone(), row),
                None => state.rows.remove(&key),
            };
            state.written_at.insert(key, version);
        }
        state.version = version;
        state.prune();
        tracing::debug!(version, rows = state.rows.len(), "memory table committed");
        Ok(())
    }

    fn rollback(&self, context: MemoryContext<E>) -> PersistenceResult<()> {
        tracing::debug!(written = context.written.len(), "memory context discarded");
        Ok(())
    }
}
