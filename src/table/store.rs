use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

use super::Table;

/// Home of the single working document. Codecs and the normalizer never see
/// this; only the service layer reads and replaces through it.
///
/// Read-modify-write sequences (`get`, edit, `replace`) are not atomic: two
/// writers can race and the last `replace` wins.
pub trait TableStore: Send + Sync {
    /// A snapshot of the current table.
    fn get(&self) -> Table;
    /// Swap in a new table wholesale.
    fn replace(&self, table: Table);
}

/// In-process store holding one table behind a lock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    table: RwLock<Table>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(table: Table) -> Self {
        Self {
            table: RwLock::new(table),
        }
    }
}

impl TableStore for MemoryStore {
    fn get(&self) -> Table {
        self.table
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn replace(&self, table: Table) {
        debug!(rows = table.len(), "replacing stored table");
        *self.table.write().unwrap_or_else(PoisonError::into_inner) = table;
    }
}

impl<T: TableStore + ?Sized> TableStore for Arc<T> {
    fn get(&self) -> Table {
        (**self).get()
    }

    fn replace(&self, table: Table) {
        (**self).replace(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::generate;
    use std::thread;

    #[test]
    fn replace_swaps_whole_table() {
        let store = MemoryStore::new();
        assert!(store.get().is_empty());

        let table = generate(&["Name"], 2);
        store.replace(table.clone());
        assert_eq!(store.get(), table);

        store.replace(Table::new());
        assert!(store.get().is_empty());
    }

    #[test]
    fn shared_store_is_visible_across_threads() {
        let store = Arc::new(MemoryStore::new());
        let writer = Arc::clone(&store);
        thread::spawn(move || writer.replace(generate(&["a", "b"], 4)))
            .join()
            .unwrap();
        assert_eq!(store.get().len(), 4);
    }
}
