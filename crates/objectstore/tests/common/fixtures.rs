//! Device fixtures shared by the adapter tests.
//!
//! `Device` is the domain object; `DeviceEntity` is its storage form for both
//! adapters. Updates go through a composite strategy: the serial number is
//! fixed at creation and every update must carry the stored version.

use helios_objectstore::backends::memory::{EntitySortKey, MemoryRecord};
use helios_objectstore::core::{CompositeUpdateStrategy, Converter, UpdateStrategy};
use helios_objectstore::entity::EntityMapping;
use helios_objectstore::error::ValidationError;
use helios_objectstore::types::{Identifiable, SortValue, Sortable};

/// A managed device.
#[derive(Debug, Clone, PartialEq)]
pub struct Device {
    pub id: i64,
    pub serial: String,
    pub name: String,
    pub kind: String,
    pub priority: i64,
    pub version: i64,
}

impl Identifiable for Device {
    type Id = i64;

    fn identifier(&self) -> &i64 {
        &self.id
    }
}

/// Sort attributes of devices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceSort {
    Priority,
    Name,
    Kind,
}

impl Sortable<DeviceSort> for Device {
    fn sort_value(&self, attribute: &DeviceSort) -> SortValue {
        match attribute {
            DeviceSort::Priority => self.priority.into(),
            DeviceSort::Name => self.name.as_str().into(),
            DeviceSort::Kind => self.kind.as_str().into(),
        }
    }
}

/// Storage form of a [`Device`].
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceEntity {
    pub id: i64,
    pub serial: String,
    pub name: String,
    pub kind: String,
    pub priority: i64,
    pub version: i64,
}

impl MemoryRecord for DeviceEntity {
    type Key = i64;

    fn key(&self) -> i64 {
        self.id
    }
}

impl EntitySortKey<DeviceEntity> for DeviceSort {
    fn sort_value(&self, entity: &DeviceEntity) -> SortValue {
        match self {
            DeviceSort::Priority => entity.priority.into(),
            DeviceSort::Name => entity.name.as_str().into(),
            DeviceSort::Kind => entity.kind.as_str().into(),
        }
    }
}

#[cfg(feature = "sqlite")]
mod sqlite {
    use helios_objectstore::backends::sqlite::{SqlSortColumn, SqliteEntity};
    use rusqlite::types::Value;

    use super::{DeviceEntity, DeviceSort};

    pub const DEVICE_SCHEMA: &str = "
        CREATE TABLE IF NOT EXISTS devices (
            id INTEGER PRIMARY KEY,
            serial TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            kind TEXT NOT NULL,
            priority INTEGER NOT NULL,
            version INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS devices_priority ON devices (priority, id);
    ";

    impl SqliteEntity for DeviceEntity {
        type Id = i64;

        const TABLE: &'static str = "devices";
        const ID_COLUMN: &'static str = "id";
        const COLUMNS: &'static [&'static str] = &["serial", "name", "kind", "priority", "version"];

        fn id(&self) -> i64 {
            self.id
        }

        fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
            Ok(DeviceEntity {
                id: row.get(0)?,
                serial: row.get(1)?,
                name: row.get(2)?,
                kind: row.get(3)?,
                priority: row.get(4)?,
                version: row.get(5)?,
            })
        }

        fn to_values(&self) -> Vec<Value> {
            vec![
                Value::Text(self.serial.clone()),
                Value::Text(self.name.clone()),
                Value::Text(self.kind.clone()),
                Value::Integer(self.priority),
                Value::Integer(self.version),
            ]
        }
    }

    impl SqlSortColumn for DeviceSort {
        fn column(&self) -> &str {
            match self {
                DeviceSort::Priority => "priority",
                DeviceSort::Name => "name",
                DeviceSort::Kind => "kind",
            }
        }
    }
}

#[cfg(feature = "sqlite")]
pub use sqlite::DEVICE_SCHEMA;

/// Maps devices to entities; every conform bumps the version.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeviceMapping;

impl Converter<DeviceEntity, Device> for DeviceMapping {
    fn convert(&self, e: &DeviceEntity) -> Device {
        Device {
            id: e.id,
            serial: e.serial.clone(),
            name: e.name.clone(),
            kind: e.kind.clone(),
            priority: e.priority,
            version: e.version,
        }
    }
}

impl EntityMapping<DeviceEntity, Device> for DeviceMapping {
    fn id_of(&self, entity: &DeviceEntity) -> i64 {
        entity.id
    }

    fn create(&self, d: &Device) -> DeviceEntity {
        DeviceEntity {
            id: d.id,
            serial: d.serial.clone(),
            name: d.name.clone(),
            kind: d.kind.clone(),
            priority: d.priority,
            version: d.version,
        }
    }

    fn conform(&self, entity: &mut DeviceEntity, d: &Device) {
        entity.name = d.name.clone();
        entity.kind = d.kind.clone();
        entity.priority = d.priority;
        entity.version += 1;
    }
}

/// Rejects updates that change the serial number.
#[derive(Debug)]
pub struct ImmutableSerial;

impl UpdateStrategy<DeviceEntity, Device> for ImmutableSerial {
    fn validate_read(&self, _entity: &DeviceEntity, _device: &Device) -> Result<(), ValidationError> {
        Ok(())
    }

    fn validate_write(&self, entity: &DeviceEntity, device: &Device) -> Result<(), ValidationError> {
        if entity.serial != device.serial {
            return Err(ValidationError::ImmutableField {
                field: "serial".to_string(),
            });
        }
        Ok(())
    }
}

/// Rejects updates derived from an outdated version.
#[derive(Debug)]
pub struct CurrentVersion;

impl UpdateStrategy<DeviceEntity, Device> for CurrentVersion {
    fn validate_read(&self, _entity: &DeviceEntity, _device: &Device) -> Result<(), ValidationError> {
        Ok(())
    }

    fn validate_write(&self, entity: &DeviceEntity, device: &Device) -> Result<(), ValidationError> {
        if entity.version != device.version {
            return Err(ValidationError::VersionMismatch {
                expected: entity.version.to_string(),
                actual: device.version.to_string(),
            });
        }
        Ok(())
    }
}

/// The update strategy every harness installs.
pub fn device_update_strategy() -> CompositeUpdateStrategy<DeviceEntity, Device> {
    CompositeUpdateStrategy::new()
        .with(ImmutableSerial)
        .with(CurrentVersion)
}

/// A sensor device at version 0.
pub fn device(id: i64, name: &str, priority: i64) -> Device {
    Device {
        id,
        serial: format!("SN-{:04}", id),
        name: name.to_string(),
        kind: "sensor".to_string(),
        priority,
        version: 0,
    }
}

/// A device of the given kind at version 0.
pub fn device_of_kind(id: i64, kind: &str, priority: i64) -> Device {
    Device {
        kind: kind.to_string(),
        ..device(id, &format!("{}-{}", kind, id), priority)
    }
}

/// Ids of `devices`, in order.
pub fn ids(devices: &[Device]) -> Vec<i64> {
    devices.iter().map(|d| d.id).collect()
}
