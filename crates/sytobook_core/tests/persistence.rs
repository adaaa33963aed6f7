use chrono::NaiveDate;
use sytobook_core::db::open_db_in_memory;
use sytobook_core::repo::book_repo::{load_address_book, load_note_book, save_books};
use sytobook_core::store::{AddressBook, NoteBook};
use sytobook_core::{AccountError, AccountRepository, Contact, GeneralNote, Persist, UserStore};

fn sample_books() -> (AddressBook, NoteBook) {
    let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    let mut book = AddressBook::new();
    let mut ann = Contact::parse("Ann", "Lee").unwrap();
    ann.add_phone("0501234567").unwrap();
    ann.add_phone("0507654321").unwrap();
    ann.update_email("ann@mail.io").unwrap();
    ann.update_address("1 Main St");
    ann.set_birthday_on("29.02.2000", today).unwrap();
    ann.add_note("Plays chess").unwrap();
    book.add_record(ann);
    book.add_record(Contact::parse("Bob", "").unwrap());

    let mut notes = NoteBook::new();
    notes.push(
        GeneralNote::with_date("Buy milk", vec!["home".into(), "errand".into()], today).unwrap(),
    );
    notes.push(GeneralNote::with_date("Call mom", Vec::new(), today).unwrap());
    (book, notes)
}

#[test]
fn save_then_load_restores_both_books() {
    let mut conn = open_db_in_memory().unwrap();
    let (book, notes) = sample_books();

    save_books(&mut conn, "alice", &book, &notes).unwrap();

    assert_eq!(load_address_book(&conn, "alice"), book);
    assert_eq!(load_note_book(&conn, "alice"), notes);
}

#[test]
fn save_replaces_previous_snapshot() {
    let mut conn = open_db_in_memory().unwrap();
    let (mut book, mut notes) = sample_books();
    save_books(&mut conn, "alice", &book, &notes).unwrap();

    book.delete("ann").unwrap();
    notes = NoteBook::new();
    save_books(&mut conn, "alice", &book, &notes).unwrap();

    let loaded = load_address_book(&conn, "alice");
    assert_eq!(loaded.len(), 1);
    assert!(loaded.get("bob").is_some());
    assert!(load_note_book(&conn, "alice").is_empty());
}

#[test]
fn owners_do_not_see_each_other() {
    let mut conn = open_db_in_memory().unwrap();
    let (book, notes) = sample_books();
    save_books(&mut conn, "alice", &book, &notes).unwrap();

    assert!(load_address_book(&conn, "bob").is_empty());
    assert!(load_note_book(&conn, "bob").is_empty());
}

#[test]
fn invalid_rows_load_as_empty_store() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "INSERT INTO contacts (owner, contact_key, name) VALUES ('alice', 'ann', 'Ann');
         INSERT INTO contact_phones (owner, contact_key, position, phone)
         VALUES ('alice', 'ann', 0, 'not-a-phone');
         INSERT INTO notes (owner, position, body, created_at)
         VALUES ('alice', 0, 'text', 'yesterday');",
    )
    .unwrap();

    assert!(load_address_book(&conn, "alice").is_empty());
    assert!(load_note_book(&conn, "alice").is_empty());
}

#[test]
fn user_store_persists_through_file_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sytobook.sqlite3");
    let (book, notes) = sample_books();

    {
        let mut store = UserStore::open(&path, "alice").unwrap();
        let (empty_book, empty_notes) = store.load();
        assert!(empty_book.is_empty());
        assert!(empty_notes.is_empty());
        store.persist(&book, &notes).unwrap();
    }

    let store = UserStore::open(&path, "alice").unwrap();
    assert_eq!(store.load(), (book, notes));
}

#[test]
fn register_and_login_round_trip() {
    let conn = open_db_in_memory().unwrap();
    let accounts = AccountRepository::new(&conn);

    assert_eq!(accounts.register("  Alice ", "secret").unwrap(), "alice");
    assert!(accounts.exists("ALICE").unwrap());
    assert_eq!(
        accounts.login("alice", "secret").unwrap(),
        Some("alice".to_string())
    );
    assert_eq!(accounts.login("alice", "wrong").unwrap(), None);
    assert_eq!(accounts.login("nobody", "secret").unwrap(), None);
}

#[test]
fn register_rejects_duplicates_and_bad_input() {
    let conn = open_db_in_memory().unwrap();
    let accounts = AccountRepository::new(&conn);
    accounts.register("alice", "secret").unwrap();

    assert!(matches!(
        accounts.register("Alice", "other"),
        Err(AccountError::AlreadyExists(_))
    ));
    assert!(matches!(
        accounts.register("two words", "x"),
        Err(AccountError::InvalidUsername(_))
    ));
    assert!(matches!(
        accounts.register("carol", ""),
        Err(AccountError::EmptyPassword)
    ));
}

#[test]
fn passwords_are_not_stored_in_clear() {
    let conn = open_db_in_memory().unwrap();
    AccountRepository::new(&conn)
        .register("alice", "secret")
        .unwrap();

    let (salt, hash): (String, String) = conn
        .query_row(
            "SELECT password_salt, password_hash FROM users WHERE username = 'alice';",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert!(!salt.is_empty());
    assert_eq!(hash.len(), 64);
    assert!(!hash.contains("secret"));
}
