use std::{cell::Cell, collections::HashSet, io, rc::Rc};

use textnode::{
    escape_html, filter_notes, DeleteOutcome, EscapedNote, FileKeyValueStore, KeyValueStore,
    MemoryKeyValueStore, NotePersistence, NoteStore, TextNodeError, DEFAULT_STORAGE_KEY,
};

/// Memory backend whose writes can be switched to fail like a full disk
#[derive(Clone, Default)]
struct FlakyBackend {
    inner: MemoryKeyValueStore,
    fail_writes: Rc<Cell<bool>>,
}

impl KeyValueStore for FlakyBackend {
    fn get(&self, key: &str) -> textnode::Result<Option<String>> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> textnode::Result<()> {
        if self.fail_writes.get() {
            return Err(io::Error::new(io::ErrorKind::Other, "quota exceeded").into());
        }
        self.inner.set(key, value)
    }

    fn remove(&mut self, key: &str) -> textnode::Result<()> {
        self.inner.remove(key)
    }
}

fn flaky_store() -> (NoteStore<FlakyBackend>, Rc<Cell<bool>>) {
    let backend = FlakyBackend::default();
    let switch = Rc::clone(&backend.fail_writes);
    let store = NoteStore::open(NotePersistence::new(backend)).unwrap();
    (store, switch)
}

fn memory_store() -> NoteStore<MemoryKeyValueStore> {
    NoteStore::open(NotePersistence::new(MemoryKeyValueStore::new())).unwrap()
}

fn stored_json(store: &NoteStore<MemoryKeyValueStore>) -> serde_json::Value {
    let raw = store
        .persistence()
        .backend()
        .get(DEFAULT_STORAGE_KEY)
        .unwrap()
        .unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[test]
fn shopping_scenario() {
    let mut store = memory_store();

    let shopping = store.create("Shopping", "milk, eggs", "Errands").unwrap();
    assert_eq!(store.len(), 1);
    assert_eq!(shopping.title, "Shopping");
    assert_eq!(shopping.category, "Errands");

    let err = store.create("", "", "").unwrap_err();
    assert!(matches!(err, TextNodeError::EmptyNote));
    assert_eq!(store.len(), 1);

    let outcome = store.delete(shopping.id, &mut |_: &str| false).unwrap();
    assert_eq!(outcome, DeleteOutcome::Cancelled);
    assert_eq!(store.len(), 1);

    let outcome = store.delete(shopping.id, &mut |_: &str| true).unwrap();
    assert_eq!(outcome, DeleteOutcome::Deleted);
    assert!(store.is_empty());
    assert_eq!(stored_json(&store), serde_json::json!([]));
}

#[test]
fn rapid_creates_get_distinct_increasing_ids() {
    let mut store = memory_store();
    let ids: Vec<i64> = (0..200)
        .map(|i| store.create(&i.to_string(), "", "").unwrap().id.as_i64())
        .collect();

    let unique: HashSet<_> = ids.iter().collect();
    assert_eq!(unique.len(), ids.len());
    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn later_notes_are_listed_first() {
    let mut store = memory_store();
    let a = store.create("A", "", "").unwrap();
    let b = store.create("B", "", "").unwrap();
    let order: Vec<_> = store.notes().iter().map(|n| n.id).collect();
    assert_eq!(order, vec![b.id, a.id]);
}

#[test]
fn content_only_note_gets_defaults() {
    let mut store = memory_store();
    let note = store.create("", "hello", "").unwrap();
    assert_eq!(note.title, "Untitled Note");
    assert_eq!(note.category, "General");
    assert_eq!(note.content, "hello");
}

#[test]
fn input_is_trimmed() {
    let mut store = memory_store();
    let note = store.create("  Title \n", "\tbody  ", "  Work ").unwrap();
    assert_eq!(note.title, "Title");
    assert_eq!(note.content, "body");
    assert_eq!(note.category, "Work");
}

#[test]
fn deleting_unknown_id_is_a_silent_no_op() {
    let mut store = memory_store();
    store.create("kept", "", "").unwrap();
    let before = stored_json(&store);

    let outcome = store
        .delete(textnode::NoteId(1), &mut |_: &str| true)
        .unwrap();
    assert_eq!(outcome, DeleteOutcome::NotFound);
    assert_eq!(store.len(), 1);
    assert_eq!(stored_json(&store), before);
}

#[test]
fn collection_survives_reopen_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let open = || {
        NoteStore::open(NotePersistence::new(FileKeyValueStore::new(dir.path()))).unwrap()
    };

    let mut store = open();
    store.create("first", "1", "A").unwrap();
    store.create("second", "2", "B").unwrap();
    let expected = store.notes().to_vec();
    drop(store);

    let reopened = open();
    assert_eq!(reopened.notes(), expected.as_slice());
    assert_eq!(reopened.last_note_id(), None);
    assert!(dir.path().join("textnode_notes.json").exists());
}

#[test]
fn malformed_storage_fails_to_open() {
    let mut backend = MemoryKeyValueStore::new();
    backend.set(DEFAULT_STORAGE_KEY, "{not json").unwrap();

    let result = NoteStore::open(NotePersistence::new(backend));
    assert!(matches!(result, Err(TextNodeError::Serialization(_))));
}

#[test]
fn custom_storage_key_is_honoured() {
    let mut store =
        NoteStore::open(NotePersistence::with_key(MemoryKeyValueStore::new(), "work")).unwrap();
    store.create("x", "", "").unwrap();

    let backend = store.persistence().backend();
    assert!(backend.get("work").unwrap().is_some());
    assert!(backend.get(DEFAULT_STORAGE_KEY).unwrap().is_none());
}

#[test]
fn committed_edit_replaces_in_place() {
    let mut store = memory_store();
    let old = store.create("Old", "body", "Work").unwrap();
    store.create("Newer", "", "").unwrap();

    let mut draft = store.begin_edit(old.id).unwrap();
    assert_eq!(draft.title, "Old");
    assert_eq!(draft.category, "Work");
    draft.title = "  Renamed ".into();
    draft.category = "".into();

    let updated = store.commit_edit(draft).unwrap().unwrap();
    assert_eq!(updated.id, old.id);
    assert_eq!(updated.created_at, old.created_at);
    assert_eq!(updated.title, "Renamed");
    assert_eq!(updated.category, "General");
    assert_eq!(store.notes()[1], updated);
    assert_eq!(stored_json(&store)[1]["title"], "Renamed");
}

#[test]
fn abandoned_edit_keeps_original() {
    let mut store = memory_store();
    let note = store.create("Keep me", "safe", "").unwrap();
    let before = stored_json(&store);

    let mut draft = store.begin_edit(note.id).unwrap();
    draft.content = "never committed".into();
    drop(draft);

    assert_eq!(store.find(note.id), Some(&note));
    assert_eq!(stored_json(&store), before);
}

#[test]
fn emptied_edit_is_rejected() {
    let mut store = memory_store();
    let note = store.create("t", "c", "").unwrap();

    let mut draft = store.begin_edit(note.id).unwrap();
    draft.title.clear();
    draft.content = "   ".into();

    assert!(matches!(
        store.commit_edit(draft),
        Err(TextNodeError::EmptyNote)
    ));
    assert_eq!(store.find(note.id), Some(&note));
}

#[test]
fn edit_of_deleted_note_commits_nothing() {
    let mut store = memory_store();
    let note = store.create("t", "", "").unwrap();
    let draft = store.begin_edit(note.id).unwrap();
    store.delete(note.id, &mut |_: &str| true).unwrap();

    assert_eq!(store.commit_edit(draft).unwrap(), None);
    assert!(store.is_empty());
    assert!(store.begin_edit(note.id).is_none());
}

#[test]
fn filter_matches_exact_subset_and_leaves_store_alone() {
    let mut store = memory_store();
    store.create("Groceries", "Milk", "Errands").unwrap();
    store.create("Standup", "demo the milkshake", "Work").unwrap();
    store.create("Gym", "legs", "Health").unwrap();
    let before = store.notes().to_vec();
    let persisted = stored_json(&store);

    assert_eq!(store.filter(""), before);

    let titles: Vec<_> = store.filter("MILK").into_iter().map(|n| n.title).collect();
    assert_eq!(titles, vec!["Standup", "Groceries"]);

    let once = store.filter("e");
    assert_eq!(filter_notes(&once, "e"), once);

    assert_eq!(store.notes(), before.as_slice());
    assert_eq!(stored_json(&store), persisted);
}

#[test]
fn markup_rendering_escapes_every_user_field() {
    let mut store = memory_store();
    let note = store
        .create("<b>hi</b>", "Tom & \"Jerry\"", "<'cat'>")
        .unwrap();

    let escaped = EscapedNote::from(&note);
    assert_eq!(escaped.title, "&lt;b&gt;hi&lt;/b&gt;");
    assert!(!escaped.title.contains('<') && !escaped.title.contains('>'));
    assert_eq!(escaped.content, "Tom &amp; &quot;Jerry&quot;");
    assert_eq!(escaped.category, "&lt;&#039;cat&#039;&gt;");
    assert_eq!(note.title, "<b>hi</b>");
    assert_eq!(escape_html("&amp;"), "&amp;amp;");
}

#[test]
fn failed_save_on_create_changes_nothing() {
    let (mut store, fail_writes) = flaky_store();
    let kept = store.create("kept", "", "").unwrap();
    fail_writes.set(true);

    let err = store.create("lost", "", "").unwrap_err();
    assert!(matches!(err, TextNodeError::Io(_)));
    assert_eq!(store.notes(), std::slice::from_ref(&kept));
    assert_eq!(store.last_note_id(), Some(kept.id));
}

#[test]
fn failed_save_on_delete_restores_the_note() {
    let (mut store, fail_writes) = flaky_store();
    let older = store.create("older", "", "").unwrap();
    store.create("newer", "", "").unwrap();
    let before = store.notes().to_vec();
    fail_writes.set(true);

    let err = store.delete(older.id, &mut |_: &str| true).unwrap_err();
    assert!(matches!(err, TextNodeError::Io(_)));
    assert_eq!(store.notes(), before.as_slice());
}

#[test]
fn failed_save_on_commit_keeps_the_original() {
    let (mut store, fail_writes) = flaky_store();
    let note = store.create("Title", "body", "Work").unwrap();
    let before = store.notes().to_vec();

    let mut draft = store.begin_edit(note.id).unwrap();
    draft.title = "Renamed".into();
    fail_writes.set(true);

    let err = store.commit_edit(draft).unwrap_err();
    assert!(matches!(err, TextNodeError::Io(_)));
    assert_eq!(store.notes(), before.as_slice());
}
