use pocketnote_core::{
    KeyValueStore, MemoryStore, Note, NoteStore, NoteStoreError, StorageError, StorageResult,
    NOTES_STORAGE_KEY,
};
use std::sync::Arc;
use std::thread;

struct UnavailableStore;

impl KeyValueStore for UnavailableStore {
    fn get(&self, _key: &str) -> StorageResult<Option<String>> {
        Err(StorageError::Backend("storage disabled".to_string()))
    }

    fn set(&self, _key: &str, _value: &str) -> StorageResult<()> {
        Err(StorageError::Backend("storage disabled".to_string()))
    }

    fn remove(&self, _key: &str) -> StorageResult<()> {
        Err(StorageError::Backend("storage disabled".to_string()))
    }
}

#[test]
fn empty_store_returns_no_notes() {
    let store = NoteStore::new(MemoryStore::new());
    assert_eq!(store.get_notes().unwrap(), Vec::new());
}

#[test]
fn saved_note_is_listed_once_with_identical_fields() {
    let store = NoteStore::new(MemoryStore::new());
    let note = Note::with_id("n-1", "buy milk", 1_700_000_000_000);

    store.save_note(&note).unwrap();

    let notes = store.get_notes().unwrap();
    assert_eq!(notes, vec![note]);
}

#[test]
fn save_preserves_insertion_order() {
    let store = NoteStore::new(MemoryStore::new());
    for (index, content) in ["first", "second", "third"].into_iter().enumerate() {
        store
            .save_note(&Note::with_id(index.to_string(), content, index as i64))
            .unwrap();
    }

    let contents: Vec<String> = store
        .get_notes()
        .unwrap()
        .into_iter()
        .map(|note| note.content)
        .collect();
    assert_eq!(contents, ["first", "second", "third"]);
}

#[test]
fn delete_removes_only_matching_note() {
    let store = NoteStore::new(MemoryStore::new());
    store.save_note(&Note::with_id("1", "buy milk", 10)).unwrap();
    store.save_note(&Note::with_id("2", "call mom", 20)).unwrap();

    store.delete_note("1").unwrap();

    assert_eq!(
        store.get_notes().unwrap(),
        vec![Note::with_id("2", "call mom", 20)]
    );
}

#[test]
fn delete_unknown_id_leaves_collection_unchanged() {
    let store = NoteStore::new(MemoryStore::new());
    store.save_note(&Note::with_id("1", "buy milk", 10)).unwrap();
    let before = store.get_notes().unwrap();

    store.delete_note("missing").unwrap();

    assert_eq!(store.get_notes().unwrap(), before);
}

#[test]
fn delete_removes_every_note_sharing_the_id() {
    let store = NoteStore::new(MemoryStore::new());
    store.save_note(&Note::with_id("dup", "first", 1)).unwrap();
    store.save_note(&Note::with_id("keep", "middle", 2)).unwrap();
    store.save_note(&Note::with_id("dup", "second", 3)).unwrap();

    store.delete_note("dup").unwrap();

    let notes = store.get_notes().unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].id, "keep");
}

#[test]
fn blob_is_a_json_array_under_fixed_key() {
    let store = NoteStore::new(MemoryStore::new());
    store.save_note(&Note::with_id("1", "buy milk", 5)).unwrap();

    let blob = store.backend().get(NOTES_STORAGE_KEY).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&blob).unwrap();
    assert_eq!(
        value,
        serde_json::json!([{"id": "1", "content": "buy milk", "timestamp": 5}])
    );
}

#[test]
fn invalid_json_is_reported_as_corrupt_data() {
    let backend = MemoryStore::new();
    backend.set(NOTES_STORAGE_KEY, "[{\"id\":").unwrap();
    let store = NoteStore::new(backend);

    let err = store.get_notes().unwrap_err();
    assert!(matches!(err, NoteStoreError::CorruptData(_)));
    assert!(err.to_string().starts_with("corrupt note data"));
}

#[test]
fn backend_failure_is_reported_as_storage_unavailable() {
    let store = NoteStore::new(UnavailableStore);

    assert!(matches!(
        store.get_notes().unwrap_err(),
        NoteStoreError::StorageUnavailable(StorageError::Backend(_))
    ));
    assert!(matches!(
        store.save_note(&Note::with_id("1", "x", 1)).unwrap_err(),
        NoteStoreError::StorageUnavailable(_)
    ));
    assert!(matches!(
        store.delete_note("1").unwrap_err(),
        NoteStoreError::StorageUnavailable(_)
    ));
}

#[test]
fn quota_exceeded_surfaces_and_keeps_previous_blob() {
    let store = NoteStore::new(MemoryStore::with_quota(96));
    store.save_note(&Note::with_id("1", "short", 1)).unwrap();
    let before = store.get_notes().unwrap();

    let err = store
        .save_note(&Note::with_id("2", "x".repeat(200), 2))
        .unwrap_err();

    assert!(matches!(
        err,
        NoteStoreError::StorageUnavailable(StorageError::QuotaExceeded { .. })
    ));
    assert_eq!(store.get_notes().unwrap(), before);
}

#[test]
fn concurrent_saves_on_shared_store_are_not_lost() {
    let store = Arc::new(NoteStore::new(MemoryStore::new()));
    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for index in 0..25 {
                    let id = format!("{worker}-{index}");
                    store.save_note(&Note::with_id(id, "body", 0)).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.get_notes().unwrap().len(), 200);
}
