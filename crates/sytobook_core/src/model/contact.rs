//! Contact record aggregate.
//!
//! # Responsibility
//! - Aggregate validated fields, phones, birthday and contact notes.
//! - Expose mutations that keep every stored value validated.
//!
//! # Invariants
//! - Phones keep insertion order; duplicates are allowed.
//! - Birthday is set-once through [`Contact::set_birthday`]; the only
//!   overwrite path is the explicit [`Contact::replace_birthday`].
//! - Contact notes are trimmed and never empty.

use crate::model::field::{Address, Birthday, Email, Name, Phone, Surname, ValidationError};
use chrono::NaiveDate;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Record mutation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactError {
    Validation(ValidationError),
    PhoneNotFound(String),
    PhoneIndexOutOfRange { index: usize, len: usize },
    BirthdayAlreadySet,
}

impl Display for ContactError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::PhoneNotFound(_) => write!(f, "Phone not found."),
            Self::PhoneIndexOutOfRange { index, len } => {
                write!(f, "Phone position {index} is out of range (contact has {len}).")
            }
            Self::BirthdayAlreadySet => write!(f, "Birthday already set."),
        }
    }
}

impl Error for ContactError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for ContactError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Builds the address-book key: lowercase, trimmed `"name surname"`.
pub fn make_key(name: &str, surname: &str) -> String {
    format!("{} {}", name.trim(), surname.trim())
        .trim()
        .to_lowercase()
}

/// One person in the address book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    name: Name,
    surname: Surname,
    address: Address,
    email: Email,
    phones: Vec<Phone>,
    birthday: Option<Birthday>,
    notes: Vec<String>,
}

impl Contact {
    /// Creates a contact with no phones, birthday or notes.
    pub fn new(name: Name, surname: Surname) -> Self {
        Self {
            name,
            surname,
            address: Address::default(),
            email: Email::default(),
            phones: Vec::new(),
            birthday: None,
            notes: Vec::new(),
        }
    }

    /// Validates raw name/surname and creates a contact.
    pub fn parse(name: &str, surname: &str) -> Result<Self, ValidationError> {
        Ok(Self::new(Name::parse(name)?, Surname::new(surname)))
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn surname(&self) -> &Surname {
        &self.surname
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn phones(&self) -> &[Phone] {
        &self.phones
    }

    pub fn birthday(&self) -> Option<Birthday> {
        self.birthday
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    /// Canonical key derived from the current name and surname.
    pub fn key(&self) -> String {
        make_key(self.name.as_str(), self.surname.as_str())
    }

    /// `"Name Surname"` as entered, surname omitted when blank.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name.as_str(), self.surname.as_str())
            .trim()
            .to_string()
    }

    pub fn add_phone(&mut self, raw: &str) -> Result<(), ContactError> {
        self.phones.push(Phone::parse(raw)?);
        Ok(())
    }

    /// Removes the first phone equal to `raw`.
    pub fn remove_phone(&mut self, raw: &str) -> Result<(), ContactError> {
        let position = self
            .phones
            .iter()
            .position(|phone| phone.as_str() == raw)
            .ok_or_else(|| ContactError::PhoneNotFound(raw.to_string()))?;
        self.phones.remove(position);
        Ok(())
    }

    /// Replaces the phone at zero-based `index`.
    pub fn edit_phone(&mut self, index: usize, raw: &str) -> Result<(), ContactError> {
        let phone = Phone::parse(raw)?;
        let len = self.phones.len();
        let slot = self
            .phones
            .get_mut(index)
            .ok_or(ContactError::PhoneIndexOutOfRange { index, len })?;
        *slot = phone;
        Ok(())
    }

    /// Replaces the whole phone list with one validated phone.
    pub fn replace_phones(&mut self, raw: &str) -> Result<(), ContactError> {
        let phone = Phone::parse(raw)?;
        self.phones = vec![phone];
        Ok(())
    }

    /// Sets the birthday once; a second call fails with `BirthdayAlreadySet`.
    pub fn set_birthday_on(&mut self, raw: &str, today: NaiveDate) -> Result<(), ContactError> {
        if self.birthday.is_some() {
            return Err(ContactError::BirthdayAlreadySet);
        }
        self.birthday = Some(Birthday::parse_on(raw, today)?);
        Ok(())
    }

    pub fn set_birthday(&mut self, raw: &str) -> Result<(), ContactError> {
        self.set_birthday_on(raw, chrono::Local::now().date_naive())
    }

    /// Overwrites any existing birthday. Separate operation from
    /// [`Contact::set_birthday`] so the set-once rule stays explicit.
    pub fn replace_birthday_on(
        &mut self,
        raw: &str,
        today: NaiveDate,
    ) -> Result<Option<Birthday>, ContactError> {
        let birthday = Birthday::parse_on(raw, today)?;
        Ok(self.birthday.replace(birthday))
    }

    pub fn replace_birthday(&mut self, raw: &str) -> Result<Option<Birthday>, ContactError> {
        self.replace_birthday_on(raw, chrono::Local::now().date_naive())
    }

    pub(crate) fn restore_birthday(&mut self, birthday: Birthday) {
        self.birthday = Some(birthday);
    }

    pub fn add_note(&mut self, text: &str) -> Result<(), ContactError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyNote.into());
        }
        self.notes.push(trimmed.to_string());
        Ok(())
    }

    pub fn update_email(&mut self, raw: &str) -> Result<(), ContactError> {
        self.email = Email::parse(raw)?;
        Ok(())
    }

    pub fn update_address(&mut self, raw: &str) {
        self.address = Address::new(raw);
    }

    pub fn update_surname(&mut self, raw: &str) {
        self.surname = Surname::new(raw);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn key_is_lowercase_and_omits_blank_surname() {
        assert_eq!(make_key(" John ", "Smith"), "john smith");
        assert_eq!(make_key("Cher", ""), "cher");
        assert_eq!(Contact::parse("Ann", "  ").unwrap().key(), "ann");
    }

    #[test]
    fn phones_keep_order_and_allow_duplicates() {
        let mut contact = Contact::parse("John", "Smith").unwrap();
        contact.add_phone("1111111111").unwrap();
        contact.add_phone("2222222222").unwrap();
        contact.add_phone("1111111111").unwrap();
        let phones: Vec<&str> = contact.phones().iter().map(Phone::as_str).collect();
        assert_eq!(phones, ["1111111111", "2222222222", "1111111111"]);

        contact.remove_phone("1111111111").unwrap();
        let phones: Vec<&str> = contact.phones().iter().map(Phone::as_str).collect();
        assert_eq!(phones, ["2222222222", "1111111111"]);
    }

    #[test]
    fn remove_missing_phone_fails() {
        let mut contact = Contact::parse("John", "").unwrap();
        let err = contact.remove_phone("0000000000").unwrap_err();
        assert_eq!(err, ContactError::PhoneNotFound("0000000000".to_string()));
    }

    #[test]
    fn edit_phone_checks_value_and_position() {
        let mut contact = Contact::parse("John", "").unwrap();
        contact.add_phone("1111111111").unwrap();
        contact.edit_phone(0, "3333333333").unwrap();
        assert_eq!(contact.phones()[0].as_str(), "3333333333");
        assert!(matches!(
            contact.edit_phone(0, "abc"),
            Err(ContactError::Validation(ValidationError::InvalidPhone(_)))
        ));
        assert_eq!(
            contact.edit_phone(4, "4444444444").unwrap_err(),
            ContactError::PhoneIndexOutOfRange { index: 4, len: 1 }
        );
    }

    #[test]
    fn birthday_is_set_once_but_can_be_replaced_explicitly() {
        let mut contact = Contact::parse("John", "").unwrap();
        contact.set_birthday_on("01.02.1990", today()).unwrap();
        assert_eq!(
            contact.set_birthday_on("02.02.1990", today()).unwrap_err(),
            ContactError::BirthdayAlreadySet
        );

        let previous = contact.replace_birthday_on("03.03.1991", today()).unwrap();
        assert_eq!(previous.unwrap().to_string(), "01.02.1990");
        assert_eq!(contact.birthday().unwrap().to_string(), "03.03.1991");
    }

    #[test]
    fn notes_reject_blank_text() {
        let mut contact = Contact::parse("John", "").unwrap();
        assert!(contact.add_note("   ").is_err());
        contact.add_note("  met at conf ").unwrap();
        assert_eq!(contact.notes(), ["met at conf"]);
    }

    #[test]
    fn update_email_validates() {
        let mut contact = Contact::parse("John", "").unwrap();
        assert!(contact.update_email("bad").is_err());
        assert!(contact.email().is_blank());
        contact.update_email("j@x.org").unwrap();
        assert_eq!(contact.email().as_str(), "j@x.org");
    }
}
