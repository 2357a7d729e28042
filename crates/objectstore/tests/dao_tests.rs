//! DAO operation tests, run against every adapter.

#[macro_use]
mod common;

use helios_objectstore::error::{BackendError, PersistenceError, ValidationError};
use helios_objectstore::types::Sort;

use common::{Device, DeviceSort, DeviceStore, device, device_of_kind, ids, seed};

// ============================================================================
// Key-value operations
// ============================================================================

fn add_then_get_round_trip(store: &impl DeviceStore) {
    let d = device(1, "thermostat", 3);
    let added = store.add(d.clone()).unwrap();

    assert_eq!(added, d);
    assert_eq!(store.get(1).unwrap(), Some(d));
    assert!(store.exist(1).unwrap());
}

adapter_test!(add_then_get_round_trip, add_then_get_round_trip);

fn get_missing_is_none(store: &impl DeviceStore) {
    assert_eq!(store.get(42).unwrap(), None);
    assert!(!store.exist(42).unwrap());
}

adapter_test!(get_missing_is_none, get_missing_is_none);

fn add_duplicate_id_fails(store: &impl DeviceStore) {
    store.add(device(1, "a", 0)).unwrap();

    let mut dup = device(1, "b", 0);
    dup.serial = "SN-OTHER".to_string();
    let err = store.add(dup).unwrap_err();

    assert!(
        matches!(err, PersistenceError::Backend(BackendError::Constraint { .. })),
        "{}: unexpected error {:?}",
        store.name(),
        err
    );
    assert_eq!(store.get(1).unwrap().unwrap().name, "a");
}

adapter_test!(add_duplicate_id_fails, add_duplicate_id_fails);

fn update_applies_and_bumps_version(store: &impl DeviceStore) {
    store.add(device(1, "old", 1)).unwrap();

    let mut changed = device(1, "new", 9);
    changed.kind = "actuator".to_string();
    let updated = store.update(changed).unwrap();

    assert_eq!(updated.name, "new");
    assert_eq!(updated.kind, "actuator");
    assert_eq!(updated.priority, 9);
    assert_eq!(updated.version, 1);
    assert_eq!(store.get(1).unwrap(), Some(updated));
}

adapter_test!(update_applies_and_bumps_version, update_applies_and_bumps_version);

fn update_missing_is_not_found(store: &impl DeviceStore) {
    store.add(device(1, "a", 0)).unwrap();

    let err = store.update(device(2, "b", 0)).unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(store.size().unwrap(), 1);
    assert_eq!(store.get(2).unwrap(), None);
}

adapter_test!(update_missing_is_not_found, update_missing_is_not_found);

fn update_rejects_serial_change(store: &impl DeviceStore) {
    let original = device(1, "a", 0);
    store.add(original.clone()).unwrap();

    let mut changed = device(1, "renamed", 0);
    changed.serial = "SN-FORGED".to_string();
    let err = store.update(changed).unwrap_err();

    assert!(matches!(
        err,
        PersistenceError::Validation(ValidationError::ImmutableField { ref field }) if field == "serial"
    ));
    assert_eq!(store.get(1).unwrap(), Some(original));
}

adapter_test!(update_rejects_serial_change, update_rejects_serial_change);

fn update_rejects_stale_version(store: &impl DeviceStore) {
    store.add(device(1, "a", 0)).unwrap();
    let first = store.update(device(1, "b", 0)).unwrap();
    assert_eq!(first.version, 1);

    // Still based on version 0.
    let err = store.update(device(1, "c", 0)).unwrap_err();
    assert!(err.is_validation());

    let retry = store.update(Device { name: "c".to_string(), ..first }).unwrap();
    assert_eq!(retry.version, 2);
    assert_eq!(store.get(1).unwrap().unwrap().name, "c");
}

adapter_test!(update_rejects_stale_version, update_rejects_stale_version);

fn delete_removes_and_reports_missing(store: &impl DeviceStore) {
    seed(store, [device(1, "a", 0), device(2, "b", 0)]);

    store.delete(1).unwrap();
    assert!(!store.exist(1).unwrap());
    assert_eq!(store.size().unwrap(), 1);

    assert!(store.delete(1).unwrap_err().is_not_found());
}

adapter_test!(delete_removes_and_reports_missing, delete_removes_and_reports_missing);

fn get_all_size_and_clear(store: &impl DeviceStore) {
    seed(store, (1..=4).map(|id| device(id, "d", id)));

    assert_eq!(store.size().unwrap(), 4);
    let mut all = ids(&store.get_all().unwrap());
    all.sort();
    assert_eq!(all, vec![1, 2, 3, 4]);

    store.clear().unwrap();
    assert_eq!(store.size().unwrap(), 0);
    assert!(store.get_all().unwrap().is_empty());

    // Clearing an empty store is fine.
    store.clear().unwrap();
}

adapter_test!(get_all_size_and_clear, get_all_size_and_clear);

// ============================================================================
// Filtered operations
// ============================================================================

fn find_orders_by_sort_then_id(store: &impl DeviceStore) {
    seed(
        store,
        [
            device_of_kind(1, "sensor", 2),
            device_of_kind(2, "actuator", 9),
            device_of_kind(3, "sensor", 7),
            device_of_kind(4, "sensor", 7),
            device_of_kind(5, "sensor", 1),
        ],
    );

    let sensors = store
        .find(Some("sensor"), vec![Sort::desc(DeviceSort::Priority)])
        .unwrap();
    assert_eq!(ids(&sensors), vec![3, 4, 1, 5]);

    let by_kind_then_priority = store
        .find(None, vec![Sort::asc(DeviceSort::Kind), Sort::asc(DeviceSort::Priority)])
        .unwrap();
    assert_eq!(ids(&by_kind_then_priority), vec![2, 5, 1, 3, 4]);

    let unsorted = store.find(None, Vec::new()).unwrap();
    assert_eq!(ids(&unsorted), vec![1, 2, 3, 4, 5]);
}

adapter_test!(find_orders_by_sort_then_id, find_orders_by_sort_then_id);

fn count_and_delete_matching(store: &impl DeviceStore) {
    seed(
        store,
        [
            device_of_kind(1, "sensor", 0),
            device_of_kind(2, "gateway", 0),
            device_of_kind(3, "sensor", 0),
        ],
    );

    assert_eq!(store.count(Some("sensor")).unwrap(), 2);
    assert_eq!(store.count(Some("camera")).unwrap(), 0);
    assert_eq!(store.count(None).unwrap(), 3);

    assert_eq!(store.delete_matching(Some("sensor")).unwrap(), 2);
    assert_eq!(store.delete_matching(Some("sensor")).unwrap(), 0);
    assert_eq!(ids(&store.get_all().unwrap()), vec![2]);
}

adapter_test!(count_and_delete_matching, count_and_delete_matching);
