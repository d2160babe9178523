// keypad/tests/store_redb.rs
//
// Redb-backed store: rows survive reopening the database, a second create
// keeps the first row, and profile updates report the changed fields.

use keypad::{EditorStore, UserChange, UserProfile};

fn temp_db(name: &str) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(format!("keypad_{}_{}.redb", name, std::process::id()));
    let _ = std::fs::remove_file(&path);
    path
}

#[test]
fn editor_rows_survive_reopen() {
    let path = temp_db("editors");
    {
        let store = EditorStore::new_redb(&path).unwrap();
        assert!(store.create_editor("AAQ", "draft", Some(9)).unwrap());
        assert!(!store.create_editor("AAQ", "ignored", Some(10)).unwrap());
        store.save_text("AAQ", "draft 2").unwrap();
        store.save_text("orphan", "no creator").unwrap();
    }

    let store = EditorStore::new_redb(&path).unwrap();
    let record = store.load_editor("AAQ").unwrap().unwrap();
    assert_eq!(record.text, "draft 2");
    assert_eq!(record.created_by, Some(9));
    assert_eq!(store.load_editor("orphan").unwrap().unwrap().created_by, None);
    assert_eq!(store.load_text("missing").unwrap(), None);

    drop(store);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn user_profiles_are_diffed() {
    let path = temp_db("users");
    let store = EditorStore::new_redb(&path).unwrap();

    let mut user = UserProfile::new(77, "Lin");
    user.language_code = Some("en".to_string());
    assert_eq!(store.record_user(&user).unwrap(), UserChange::Inserted);
    assert_eq!(store.record_user(&user).unwrap(), UserChange::Unchanged);

    user.language_code = None;
    user.last_name = Some("Q".to_string());
    assert_eq!(
        store.record_user(&user).unwrap(),
        UserChange::Updated(vec!["language_code".to_string(), "last_name".to_string()])
    );
    assert_eq!(store.user(77).unwrap(), Some(user));
    assert_eq!(store.user(78).unwrap(), None);

    drop(store);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn store_opens_in_a_missing_directory() {
    let dir = std::env::temp_dir().join(format!("keypad_nested_{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    let path = dir.join("state").join("editors.redb");

    let store = EditorStore::new_redb(&path).unwrap();
    assert!(store.create_editor("AAQ", "x", None).unwrap());
    assert!(path.exists());

    drop(store);
    let _ = std::fs::remove_dir_all(&dir);
}
