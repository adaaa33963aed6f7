use chrono::NaiveDate;
use sytobook_core::store::AddressBook;
use sytobook_core::{Contact, ContactError};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn book(today: NaiveDate, people: &[(&str, &str)]) -> AddressBook {
    let mut book = AddressBook::new();
    for (name, birthday) in people {
        let mut contact = Contact::parse(name, "").unwrap();
        contact.set_birthday_on(birthday, today).unwrap();
        book.add_record(contact);
    }
    book
}

#[test]
fn zero_day_window_includes_today_and_excludes_tomorrow() {
    let today = day(2024, 6, 10);
    let book = book(today, &[("today", "10.06.1990"), ("tomorrow", "11.06.1990")]);

    let upcoming = book.upcoming_on(today, 0);
    assert_eq!(upcoming.len(), 1);
    let entry = upcoming.get("today").unwrap();
    assert_eq!(entry.date, today);
    assert_eq!(entry.age_turning, 34);

    assert!(book.upcoming_on(today, 1).contains_key("tomorrow"));
}

#[test]
fn passed_birthdays_roll_over_to_next_year() {
    let today = day(2024, 12, 30);
    let book = book(today, &[("early", "02.01.2000"), ("past", "29.12.2000")]);

    let upcoming = book.upcoming_on(today, 7);
    let early = upcoming.get("early").unwrap();
    assert_eq!(early.date, day(2025, 1, 2));
    assert_eq!(early.age_turning, 25);
    assert!(!upcoming.contains_key("past"));
}

#[test]
fn leap_day_falls_back_to_feb_28_in_common_years() {
    let today = day(2023, 2, 20);
    let book = book(today, &[("leap", "29.02.2000")]);

    let upcoming = book.upcoming_on(today, 10);
    let entry = upcoming.get("leap").unwrap();
    assert_eq!(entry.date, day(2023, 2, 28));
    assert_eq!(entry.age_turning, 2023 - 2000);
}

#[test]
fn leap_day_keeps_feb_29_in_leap_years() {
    let today = day(2024, 2, 20);
    let book = book(today, &[("leap", "29.02.2000")]);

    let entry = book.upcoming_on(today, 10).remove("leap").unwrap();
    assert_eq!(entry.date, day(2024, 2, 29));
    assert_eq!(entry.age_turning, 24);
}

#[test]
fn contacts_without_birthday_are_skipped() {
    let today = day(2024, 6, 10);
    let mut book = book(today, &[("ann", "10.06.1990")]);
    book.add_record(Contact::parse("bob", "").unwrap());

    assert_eq!(book.upcoming_on(today, 365).len(), 1);
}

#[test]
fn birthday_is_set_once_and_replace_is_explicit() {
    let today = day(2024, 6, 10);
    let mut contact = Contact::parse("Ann", "").unwrap();
    contact.set_birthday_on("01.01.1990", today).unwrap();

    assert_eq!(
        contact.set_birthday_on("02.02.1990", today),
        Err(ContactError::BirthdayAlreadySet)
    );
    let previous = contact.replace_birthday_on("02.02.1990", today).unwrap();
    assert_eq!(previous.map(|b| b.to_string()), Some("01.01.1990".to_string()));
    assert_eq!(contact.birthday().unwrap().to_string(), "02.02.1990");
}
