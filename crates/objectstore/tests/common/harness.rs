//! Test harness for running the same scenario against every adapter.
//!
//! [`DeviceStore`] is the object store surface the shared tests drive; each
//! adapter harness implements it over an [`ObjectStore`] wired to that
//! adapter. [`adapter_test!`] expands one test function into one test per
//! adapter.

use helios_objectstore::backends::memory::{
    MemoryContextProvider, MemoryFilter, MemoryStore, MemoryTable,
};
use helios_objectstore::core::TransactionalDataStore;
use helios_objectstore::entity::EntityDao;
use helios_objectstore::error::PersistenceResult;
use helios_objectstore::store::ObjectStore;
use helios_objectstore::types::{MarkPage, MarkPageRequest, Sort};

use super::fixtures::{Device, DeviceEntity, DeviceMapping, DeviceSort, device_update_strategy};

/// Object store operations over devices, independent of the adapter.
pub trait DeviceStore {
    /// Adapter name, for messages.
    fn name(&self) -> &'static str;

    fn add(&self, device: Device) -> PersistenceResult<Device>;
    fn update(&self, device: Device) -> PersistenceResult<Device>;
    fn delete(&self, id: i64) -> PersistenceResult<()>;
    fn get(&self, id: i64) -> PersistenceResult<Option<Device>>;
    fn exist(&self, id: i64) -> PersistenceResult<bool>;
    fn get_all(&self) -> PersistenceResult<Vec<Device>>;
    fn size(&self) -> PersistenceResult<u64>;
    fn clear(&self) -> PersistenceResult<()>;

    /// Finds devices of `kind` (every device when `None`).
    fn find(&self, kind: Option<&str>, sort: Vec<Sort<DeviceSort>>) -> PersistenceResult<Vec<Device>>;
    fn count(&self, kind: Option<&str>) -> PersistenceResult<u64>;
    fn delete_matching(&self, kind: Option<&str>) -> PersistenceResult<u64>;
    fn find_page(
        &self,
        kind: Option<&str>,
        sort: Vec<Sort<DeviceSort>>,
        request: MarkPageRequest<Device>,
    ) -> PersistenceResult<MarkPage<Device>>;
}

/// Adds every device, panicking on failure.
pub fn seed(store: &impl DeviceStore, devices: impl IntoIterator<Item = Device>) {
    for d in devices {
        let id = d.id;
        store
            .add(d)
            .unwrap_or_else(|e| panic!("{}: seeding device {} failed: {}", store.name(), id, e));
    }
}

/// Walks every page forward from the first and returns the ids seen.
pub fn walk_forward(store: &impl DeviceStore, kind: Option<&str>, sort: &[Sort<DeviceSort>], size: usize) -> Vec<i64> {
    let mut seen = Vec::new();
    let mut request = Some(MarkPageRequest::first(size));
    while let Some(req) = request {
        let page = store.find_page(kind, sort.to_vec(), req).unwrap();
        seen.extend(page.data().iter().map(|d| d.id));
        request = page.next_page_request();
    }
    seen
}

/// Walks every page backward from the last and returns the ids seen, in
/// forward order.
pub fn walk_backward(store: &impl DeviceStore, kind: Option<&str>, sort: &[Sort<DeviceSort>], size: usize) -> Vec<i64> {
    let mut pages = Vec::new();
    let mut request = Some(MarkPageRequest::last(size));
    while let Some(req) = request {
        let page = store.find_page(kind, sort.to_vec(), req).unwrap();
        pages.push(page.data().iter().map(|d| d.id).collect::<Vec<_>>());
        request = page.previous_page_request();
    }
    pages.into_iter().rev().flatten().collect()
}

/// Installs a test-writer subscriber honoring `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// ============================================================================
// Memory
// ============================================================================

pub type MemoryDeviceDao = EntityDao<DeviceEntity, Device, MemoryStore<DeviceEntity>, DeviceMapping>;
pub type MemoryDataStore = TransactionalDataStore<MemoryContextProvider<DeviceEntity>>;

/// Devices over the in-memory adapter.
pub struct MemoryHarness {
    pub table: MemoryTable<DeviceEntity>,
    pub store: ObjectStore<Device, MemoryDataStore, MemoryDeviceDao>,
}

impl MemoryHarness {
    pub fn new() -> Self {
        init_tracing();
        let table = MemoryTable::new();
        let data_store = TransactionalDataStore::new(MemoryContextProvider::new(table.clone()));
        let dao = EntityDao::new(MemoryStore::new(), DeviceMapping).with_update_strategy(device_update_strategy());
        Self {
            table,
            store: ObjectStore::new(data_store, dao),
        }
    }

    fn filter(kind: Option<&str>) -> MemoryFilter<DeviceEntity> {
        match kind {
            Some(kind) => {
                let kind = kind.to_string();
                MemoryFilter::new(move |e: &DeviceEntity| e.kind == kind)
            }
            None => MemoryFilter::all(),
        }
    }
}

macro_rules! delegate_key_value {
    () => {
        fn add(&self, device: Device) -> PersistenceResult<Device> {
            self.store.add(device)
        }

        fn update(&self, device: Device) -> PersistenceResult<Device> {
            self.store.update(device)
        }

        fn delete(&self, id: i64) -> PersistenceResult<()> {
            self.store.delete(id)
        }

        fn get(&self, id: i64) -> PersistenceResult<Option<Device>> {
            self.store.get(id)
        }

        fn exist(&self, id: i64) -> PersistenceResult<bool> {
            self.store.exist(id)
        }

        fn get_all(&self) -> PersistenceResult<Vec<Device>> {
            self.store.get_all()
        }

        fn size(&self) -> PersistenceResult<u64> {
            self.store.size()
        }

        fn clear(&self) -> PersistenceResult<()> {
            self.store.clear()
        }

        fn find(&self, kind: Option<&str>, sort: Vec<Sort<DeviceSort>>) -> PersistenceResult<Vec<Device>> {
            self.store.find(Self::filter(kind), sort)
        }

        fn count(&self, kind: Option<&str>) -> PersistenceResult<u64> {
            self.store.count::<_, DeviceSort>(Self::filter(kind))
        }

        fn delete_matching(&self, kind: Option<&str>) -> PersistenceResult<u64> {
            self.store.delete_matching::<_, DeviceSort>(Self::filter(kind))
        }

        fn find_page(
            &self,
            kind: Option<&str>,
            sort: Vec<Sort<DeviceSort>>,
            request: MarkPageRequest<Device>,
        ) -> PersistenceResult<MarkPage<Device>> {
            self.store.find_page(Self::filter(kind), sort, request)
        }
    };
}

impl DeviceStore for MemoryHarness {
    fn name(&self) -> &'static str {
        "memory"
    }

    delegate_key_value!();
}

// ============================================================================
// SQLite
// ============================================================================

#[cfg(feature = "sqlite")]
pub use self::sqlite::{SqliteDataStore, SqliteDeviceDao, SqliteHarness};

#[cfg(feature = "sqlite")]
mod sqlite {
    use std::path::Path;

    use helios_objectstore::backends::sqlite::{SqlFilter, SqliteContextProvider, SqliteTable};
    use rusqlite::types::Value;

    use super::*;
    use crate::common::fixtures::DEVICE_SCHEMA;

    pub type SqliteDeviceDao = EntityDao<DeviceEntity, Device, SqliteTable<DeviceEntity>, DeviceMapping>;
    pub type SqliteDataStore = TransactionalDataStore<SqliteContextProvider>;

    /// Devices over the SQLite adapter.
    pub struct SqliteHarness {
        pub store: ObjectStore<Device, SqliteDataStore, SqliteDeviceDao>,
    }

    impl SqliteHarness {
        /// A harness over a fresh in-memory database.
        pub fn new() -> Self {
            Self::with_provider(SqliteContextProvider::in_memory().expect("Failed to create SQLite provider"))
        }

        /// A harness over a database file, created if missing.
        pub fn open(path: &Path) -> Self {
            Self::with_provider(SqliteContextProvider::open(path).expect("Failed to open SQLite database"))
        }

        /// A harness over an already configured provider.
        pub fn with_provider(provider: SqliteContextProvider) -> Self {
            init_tracing();
            provider
                .init_schema(DEVICE_SCHEMA)
                .expect("Failed to initialize schema");
            let dao = EntityDao::new(SqliteTable::new(), DeviceMapping).with_update_strategy(device_update_strategy());
            Self {
                store: ObjectStore::new(TransactionalDataStore::new(provider), dao),
            }
        }

        fn filter(kind: Option<&str>) -> SqlFilter {
            match kind {
                Some(kind) => SqlFilter::new("kind = ?", vec![Value::Text(kind.to_string())]),
                None => SqlFilter::all(),
            }
        }
    }

    impl DeviceStore for SqliteHarness {
        fn name(&self) -> &'static str {
            "sqlite"
        }

        delegate_key_value!();
    }
}

/// Generates one test per adapter from a function taking `&impl DeviceStore`.
macro_rules! adapter_test {
    ($test_name:ident, $test_fn:expr) => {
        paste::paste! {
            #[test]
            fn [<memory_ $test_name>]() {
                let harness = $crate::common::harness::MemoryHarness::new();
                $test_fn(&harness);
            }

            #[cfg(feature = "sqlite")]
            #[test]
            fn [<sqlite_ $test_name>]() {
                let harness = $crate::common::harness::SqliteHarness::new();
                $test_fn(&harness);
            }
        }
    };
}
