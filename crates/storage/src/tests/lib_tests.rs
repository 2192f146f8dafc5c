use super::*;

#[test]
fn memory_store_round_trips_and_counts_writes() {
    let store = MemorySessionStore::new();
    store.set("pitchState", "{}").expect("set");
    store.set("pitchState", "{\"a\":1}").expect("overwrite");
    assert_eq!(
        store.get("pitchState").expect("get").as_deref(),
        Some("{\"a\":1}")
    );
    assert_eq!(store.write_count(), 2);
    assert_eq!(store.len(), 1);

    store.remove("pitchState").expect("remove");
    assert!(store.get("pitchState").expect("get").is_none());
    assert!(store.is_empty());
}

#[test]
fn clones_share_entries() {
    let store = MemorySessionStore::new();
    let other = store.clone();
    store.set("k", "v").expect("set");
    assert_eq!(other.get("k").expect("get").as_deref(), Some("v"));
}

#[test]
fn quota_rejects_oversized_writes() {
    let store = MemorySessionStore::with_quota(8);
    store.set("k", "1234").expect("fits");
    let err = store.set("k2", "123456").expect_err("over quota");
    assert!(matches!(err, StoreError::QuotaExceeded { limit: 8, .. }));
    // Replacing an existing key only counts the new value.
    store.set("k", "1234567").expect("replace fits");
}

#[test]
fn unavailable_storage_is_a_normal_condition() {
    let storage = SessionStorage::unavailable();
    assert!(!storage.is_available());
    assert!(storage.get("pitchState").expect("get").is_none());
    assert_eq!(
        storage.set("pitchState", "{}").expect("set"),
        WriteOutcome::Unavailable
    );
    assert_eq!(
        storage.remove("pitchState").expect("remove"),
        WriteOutcome::Unavailable
    );
}

#[test]
fn backed_storage_delegates_to_store() {
    let store = MemorySessionStore::new();
    let storage = SessionStorage::new(Arc::new(store.clone()));
    assert_eq!(
        storage.set("pitchState", "{}").expect("set"),
        WriteOutcome::Stored
    );
    assert_eq!(store.get("pitchState").expect("get").as_deref(), Some("{}"));
}
