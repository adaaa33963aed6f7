//! Owner-scoped SQLite persistence for address and note books.

use crate::model::contact::Contact;
use crate::model::field::Birthday;
use crate::model::note::GeneralNote;
use crate::repo::{Persist, RepoError, RepoResult};
use crate::store::{AddressBook, NoteBook};
use chrono::{Local, NaiveDate};
use log::{error, info};
use rusqlite::{params, Connection, TransactionBehavior};
use std::path::Path;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Loads `owner`'s address book; any failure yields an empty book.
pub fn load_address_book(conn: &Connection, owner: &str) -> AddressBook {
    match try_load_address_book(conn, owner, Local::now().date_naive()) {
        Ok(book) => {
            info!(
                "event=store_load module=repo store=contacts status=ok count={}",
                book.len()
            );
            book
        }
        Err(err) => {
            error!("event=store_load module=repo store=contacts status=error error={err}");
            AddressBook::new()
        }
    }
}

/// Loads `owner`'s note book; any failure yields an empty book.
pub fn load_note_book(conn: &Connection, owner: &str) -> NoteBook {
    match try_load_note_book(conn, owner) {
        Ok(notes) => {
            info!(
                "event=store_load module=repo store=notes status=ok count={}",
                notes.len()
            );
            notes
        }
        Err(err) => {
            error!("event=store_load module=repo store=notes status=error error={err}");
            NoteBook::new()
        }
    }
}

/// Replaces `owner`'s persisted contacts and notes in one transaction.
pub fn save_books(
    conn: &mut Connection,
    owner: &str,
    book: &AddressBook,
    notes: &NoteBook,
) -> RepoResult<()> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    for table in ["contact_phones", "contact_notes", "contacts", "note_tags", "notes"] {
        tx.execute(&format!("DELETE FROM {table} WHERE owner = ?1;"), [owner])?;
    }

    for (key, contact) in book.iter() {
        tx.execute(
            "INSERT INTO contacts (owner, contact_key, name, surname, address, email, birthday)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                owner,
                key,
                contact.name().as_str(),
                contact.surname().as_str(),
                contact.address().as_str(),
                contact.email().as_str(),
                contact
                    .birthday()
                    .map(|birthday| birthday.date().format(DATE_FORMAT).to_string()),
            ],
        )?;
        for (position, phone) in contact.phones().iter().enumerate() {
            tx.execute(
                "INSERT INTO contact_phones (owner, contact_key, position, phone)
                 VALUES (?1, ?2, ?3, ?4);",
                params![owner, key, position as i64, phone.as_str()],
            )?;
        }
        for (position, body) in contact.notes().iter().enumerate() {
            tx.execute(
                "INSERT INTO contact_notes (owner, contact_key, position, body)
                 VALUES (?1, ?2, ?3, ?4);",
                params![owner, key, position as i64, body],
            )?;
        }
    }

    for (note_position, note) in notes.notes().iter().enumerate() {
        tx.execute(
            "INSERT INTO notes (owner, position, body, created_at) VALUES (?1, ?2, ?3, ?4);",
            params![
                owner,
                note_position as i64,
                note.text(),
                note.created_at().format(DATE_FORMAT).to_string(),
            ],
        )?;
        for (position, tag) in note.tags().iter().enumerate() {
            tx.execute(
                "INSERT INTO note_tags (owner, note_position, position, tag)
                 VALUES (?1, ?2, ?3, ?4);",
                params![owner, note_position as i64, position as i64, tag],
            )?;
        }
    }

    tx.commit()?;
    info!(
        "event=store_save module=repo status=ok contacts={} notes={}",
        book.len(),
        notes.len()
    );
    Ok(())
}

fn try_load_address_book(
    conn: &Connection,
    owner: &str,
    today: NaiveDate,
) -> RepoResult<AddressBook> {
    let mut book = AddressBook::new();
    let mut stmt = conn.prepare(
        "SELECT contact_key, name, surname, address, email, birthday
         FROM contacts
         WHERE owner = ?1
         ORDER BY contact_key ASC;",
    )?;
    let mut rows = stmt.query([owner])?;

    while let Some(row) = rows.next()? {
        let key: String = row.get("contact_key")?;
        let name: String = row.get("name")?;
        let surname: String = row.get("surname")?;
        let mut contact =
            Contact::parse(&name, &surname).map_err(|err| invalid("contacts.name", &key, err))?;
        contact.update_address(&row.get::<_, String>("address")?);
        contact
            .update_email(&row.get::<_, String>("email")?)
            .map_err(|err| invalid("contacts.email", &key, err))?;
        if let Some(raw) = row.get::<_, Option<String>>("birthday")? {
            let date = NaiveDate::parse_from_str(&raw, DATE_FORMAT)
                .map_err(|err| invalid("contacts.birthday", &key, err))?;
            let birthday = Birthday::from_date_on(date, today)
                .map_err(|err| invalid("contacts.birthday", &key, err))?;
            contact.restore_birthday(birthday);
        }

        for phone in child_values(conn, "contact_phones", "phone", owner, &key)? {
            contact
                .add_phone(&phone)
                .map_err(|err| invalid("contact_phones.phone", &key, err))?;
        }
        for body in child_values(conn, "contact_notes", "body", owner, &key)? {
            contact
                .add_note(&body)
                .map_err(|err| invalid("contact_notes.body", &key, err))?;
        }

        if key.is_empty() {
            return Err(RepoError::InvalidData("empty contact key".to_string()));
        }
        book.insert_with_key(key, contact);
    }

    Ok(book)
}

fn try_load_note_book(conn: &Connection, owner: &str) -> RepoResult<NoteBook> {
    let mut notes = NoteBook::new();
    let mut stmt = conn.prepare(
        "SELECT position, body, created_at
         FROM notes
         WHERE owner = ?1
         ORDER BY position ASC;",
    )?;
    let mut rows = stmt.query([owner])?;
    let mut tag_stmt = conn.prepare(
        "SELECT tag
         FROM note_tags
         WHERE owner = ?1 AND note_position = ?2
         ORDER BY position ASC;",
    )?;

    while let Some(row) = rows.next()? {
        let position: i64 = row.get("position")?;
        let body: String = row.get("body")?;
        let created_raw: String = row.get("created_at")?;
        let label = position.to_string();
        let created_at = NaiveDate::parse_from_str(&created_raw, DATE_FORMAT)
            .map_err(|err| invalid("notes.created_at", &label, err))?;

        let tags = tag_stmt
            .query_map(params![owner, position], |tag_row| tag_row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        let note = GeneralNote::with_date(&body, tags, created_at)
            .map_err(|err| invalid("notes.body", &label, err))?;
        notes.push(note);
    }

    Ok(notes)
}

fn child_values(
    conn: &Connection,
    table: &str,
    column: &str,
    owner: &str,
    key: &str,
) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {column}
         FROM {table}
         WHERE owner = ?1 AND contact_key = ?2
         ORDER BY position ASC;"
    ))?;
    let values = stmt
        .query_map(params![owner, key], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(values)
}

fn invalid(column: &str, row: &str, err: impl std::fmt::Display) -> RepoError {
    RepoError::InvalidData(format!("{column} (row `{row}`): {err}"))
}

/// One user's open database plus their identity; the shell's flush target.
pub struct UserStore {
    conn: Connection,
    owner: String,
}

impl UserStore {
    pub fn new(conn: Connection, owner: impl Into<String>) -> Self {
        Self {
            conn,
            owner: owner.into(),
        }
    }

    /// Opens the database at `path` for `owner`.
    pub fn open(path: impl AsRef<Path>, owner: impl Into<String>) -> RepoResult<Self> {
        Ok(Self::new(crate::db::open_db(path)?, owner))
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Loads both books; never fails.
    pub fn load(&self) -> (AddressBook, NoteBook) {
        (
            load_address_book(&self.conn, &self.owner),
            load_note_book(&self.conn, &self.owner),
        )
    }

    pub fn save(&mut self, book: &AddressBook, notes: &NoteBook) -> RepoResult<()> {
        save_books(&mut self.conn, &self.owner, book, notes)
    }
}

impl Persist for UserStore {
    fn persist(&mut self, book: &AddressBook, notes: &NoteBook) -> RepoResult<()> {
        self.save(book, notes).inspect_err(|err| {
            error!("event=store_save module=repo status=error error={err}");
        })
    }
}
