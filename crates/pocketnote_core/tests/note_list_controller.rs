use pocketnote_core::{
    ControllerError, KeyValueStore, ListState, MemoryStore, Note, NoteListController, NoteStore,
    NoteStoreError, StorageError, StorageResult, NOTES_STORAGE_KEY,
};
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::Arc;

/// Memory backend that counts calls and can be told to reject reads or writes.
#[derive(Default)]
struct ScriptedStore {
    inner: MemoryStore,
    calls: AtomicUsize,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl ScriptedStore {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl KeyValueStore for ScriptedStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::Backend("storage offline".to_string()));
        }
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Backend("disk full".to_string()));
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.remove(key)
    }
}

fn controller_over(backend: Arc<ScriptedStore>) -> NoteListController<Arc<ScriptedStore>> {
    let ticks = AtomicI64::new(1_000);
    NoteListController::with_clock(NoteStore::new(backend), move || {
        ticks.fetch_add(1, Ordering::SeqCst)
    })
}

#[test]
fn load_publishes_persisted_collection() {
    let backend = Arc::new(ScriptedStore::default());
    let seed = NoteStore::new(Arc::clone(&backend));
    seed.save_note(&Note::with_id("1", "buy milk", 10)).unwrap();

    let mut controller = controller_over(backend);
    assert!(controller.is_loading());
    let loaded = controller.load().unwrap().to_vec();

    assert_eq!(loaded, vec![Note::with_id("1", "buy milk", 10)]);
    assert_eq!(controller.state(), ListState::Loaded);
    assert!(!controller.is_loading());
}

#[test]
fn mirror_matches_store_after_adds_and_removes() {
    let backend = Arc::new(ScriptedStore::default());
    let mut controller = controller_over(Arc::clone(&backend));
    controller.load().unwrap();

    let milk = controller.add_note("buy milk").unwrap();
    let mom = controller.add_note("call mom").unwrap();
    let bread = controller.add_note("bake bread").unwrap();
    controller.remove_note(milk.id.as_str()).unwrap();
    controller.add_note("water plants").unwrap();
    controller.remove_note(bread.id.as_str()).unwrap();

    let persisted = controller.store().get_notes().unwrap();
    assert_eq!(controller.notes(), persisted.as_slice());
    let contents: Vec<&str> = persisted.iter().map(|note| note.content.as_str()).collect();
    assert_eq!(contents, ["call mom", "water plants"]);
    assert_eq!(persisted[0].id, mom.id);
}

#[test]
fn added_notes_get_distinct_ids_and_clock_timestamps() {
    let backend = Arc::new(ScriptedStore::default());
    let mut controller = controller_over(backend);

    let first = controller.add_note("one").unwrap();
    let second = controller.add_note("two").unwrap();

    assert_ne!(first.id, second.id);
    assert_eq!(first.timestamp, 1_000);
    assert_eq!(second.timestamp, 1_001);
}

#[test]
fn whitespace_content_never_reaches_the_store() {
    let backend = Arc::new(ScriptedStore::default());
    let mut controller = controller_over(Arc::clone(&backend));

    for content in ["", "   ", "\n\t "] {
        let err = controller.add_note(content).unwrap_err();
        assert!(matches!(err, ControllerError::EmptyContent));
    }

    assert_eq!(backend.calls(), 0);
    assert!(backend.get(NOTES_STORAGE_KEY).unwrap().is_none());
}

#[test]
fn add_on_uninitialized_controller_keeps_existing_notes() {
    let backend = Arc::new(ScriptedStore::default());
    NoteStore::new(Arc::clone(&backend))
        .save_note(&Note::with_id("old", "existing", 1))
        .unwrap();

    let mut controller = controller_over(backend);
    controller.add_note("fresh").unwrap();

    let contents: Vec<&str> = controller
        .notes()
        .iter()
        .map(|note| note.content.as_str())
        .collect();
    assert_eq!(contents, ["existing", "fresh"]);
}

#[test]
fn failed_add_is_surfaced_and_mirror_reconciled() {
    let backend = Arc::new(ScriptedStore::default());
    let mut controller = controller_over(Arc::clone(&backend));
    controller.add_note("kept").unwrap();

    backend.fail_writes(true);
    let err = controller.add_note("lost").unwrap_err();

    assert!(matches!(
        err,
        ControllerError::Store(NoteStoreError::StorageUnavailable(_))
    ));
    assert!(controller.last_error().unwrap().contains("disk full"));
    assert_eq!(controller.notes(), controller.store().get_notes().unwrap());
    assert_eq!(controller.notes().len(), 1);

    backend.fail_writes(false);
    controller.add_note("recovered").unwrap();
    assert!(controller.last_error().is_none());
    assert_eq!(controller.notes().len(), 2);
}

#[test]
fn failed_remove_keeps_note_in_mirror() {
    let backend = Arc::new(ScriptedStore::default());
    let mut controller = controller_over(Arc::clone(&backend));
    let note = controller.add_note("sticky").unwrap();

    backend.fail_writes(true);
    assert!(controller.remove_note(note.id.as_str()).is_err());

    assert_eq!(controller.notes(), [note]);
    assert!(controller.last_error().is_some());
}

#[test]
fn failed_reconcile_keeps_mirror_and_reports_original_error() {
    let backend = Arc::new(ScriptedStore::default());
    let mut controller = controller_over(Arc::clone(&backend));
    let kept = controller.add_note("keep").unwrap();

    backend.fail_reads(true);
    backend.fail_writes(true);
    let err = controller.remove_note(kept.id.as_str()).unwrap_err();

    assert!(matches!(
        err,
        ControllerError::Store(NoteStoreError::StorageUnavailable(StorageError::Backend(_)))
    ));
    assert_eq!(controller.notes(), [kept]);
    assert_eq!(controller.state(), ListState::Loaded);
    assert!(controller
        .last_error()
        .unwrap()
        .contains("storage offline"));
}

#[test]
fn remove_unknown_id_is_a_no_op() {
    let backend = Arc::new(ScriptedStore::default());
    let mut controller = controller_over(backend);
    controller.add_note("only").unwrap();
    let before = controller.notes().to_vec();

    controller.remove_note("does-not-exist").unwrap();

    assert_eq!(controller.notes(), before.as_slice());
}

#[test]
fn remove_drops_all_mirrored_duplicates() {
    let backend = Arc::new(ScriptedStore::default());
    let seed = NoteStore::new(Arc::clone(&backend));
    seed.save_note(&Note::with_id("same", "a", 1)).unwrap();
    seed.save_note(&Note::with_id("same", "b", 2)).unwrap();

    let mut controller = controller_over(backend);
    controller.load().unwrap();
    assert_eq!(controller.notes().len(), 2);

    controller.remove_note("same").unwrap();
    assert!(controller.notes().is_empty());
}

#[test]
fn corrupt_blob_fails_load_and_stays_uninitialized() {
    let backend = Arc::new(ScriptedStore::default());
    backend.set(NOTES_STORAGE_KEY, "{{{").unwrap();

    let mut controller = controller_over(backend);
    let err = controller.load().unwrap_err();

    assert!(matches!(
        err,
        ControllerError::Store(NoteStoreError::CorruptData(_))
    ));
    assert!(controller.is_loading());
    assert!(controller
        .last_error()
        .unwrap()
        .starts_with("corrupt note data"));
}
