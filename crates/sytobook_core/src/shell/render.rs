//! Plain-text views of stores for the interactive shell.

use crate::model::contact::Contact;
use crate::model::note::GeneralNote;
use crate::shell::command::{Command, Mode};
use crate::store::{AddressBook, TagGroup, UpcomingBirthday};
use std::collections::BTreeMap;

const EMPTY_FIELD: &str = "—";

/// Uppercases the first character of every whitespace-separated word.
pub fn title_case(raw: &str) -> String {
    raw.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() {
        EMPTY_FIELD
    } else {
        value
    }
}

pub fn contact_card(contact: &Contact) -> String {
    let phones = contact
        .phones()
        .iter()
        .map(|phone| phone.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let birthday = contact
        .birthday()
        .map(|birthday| birthday.to_string())
        .unwrap_or_default();
    let notes = contact.notes().join(" | ");

    let mut lines = vec![contact.full_name().to_uppercase()];
    lines.push(format!("  phones:   {}", or_dash(&phones)));
    lines.push(format!("  email:    {}", or_dash(contact.email().as_str())));
    lines.push(format!("  address:  {}", or_dash(contact.address().as_str())));
    lines.push(format!("  birthday: {}", or_dash(&birthday)));
    lines.push(format!("  notes:    {}", or_dash(&notes)));
    lines.join("\n")
}

pub fn contacts<'a>(items: impl IntoIterator<Item = &'a Contact>) -> String {
    let cards: Vec<String> = items.into_iter().map(contact_card).collect();
    if cards.is_empty() {
        "No contacts.".to_string()
    } else {
        cards.join("\n\n")
    }
}

/// Numbered list of candidate keys for an ambiguity prompt.
pub fn candidates(keys: &[String]) -> String {
    let mut lines = vec!["Several contacts match:".to_string()];
    lines.extend(
        keys.iter()
            .enumerate()
            .map(|(index, key)| format!("  {}. {}", index + 1, title_case(key))),
    );
    lines.join("\n")
}

/// Upcoming birthdays ordered by date, then by contact key.
pub fn birthdays(book: &AddressBook, upcoming: &BTreeMap<String, UpcomingBirthday>) -> String {
    if upcoming.is_empty() {
        return "No upcoming birthdays.".to_string();
    }
    let mut rows: Vec<(&String, &UpcomingBirthday)> = upcoming.iter().collect();
    rows.sort_by(|left, right| left.1.date.cmp(&right.1.date).then(left.0.cmp(right.0)));

    rows.into_iter()
        .map(|(key, entry)| {
            let name = book
                .get(key)
                .map(Contact::full_name)
                .unwrap_or_else(|| title_case(key));
            format!(
                "{}  {}  (turns {})",
                entry.date.format("%d.%m.%Y"),
                name,
                entry.age_turning
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Notes addressed by one-based position.
pub fn notes_table(notes: &[GeneralNote]) -> String {
    if notes.is_empty() {
        return "No notes.".to_string();
    }
    notes
        .iter()
        .enumerate()
        .map(|(index, note)| format!("{:>3}. {}", index + 1, note))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Subset of notes by zero-based index, keeping their one-based positions.
pub fn note_hits(notes: &[GeneralNote], indices: &[usize]) -> String {
    indices
        .iter()
        .filter_map(|&index| notes.get(index).map(|note| (index, note)))
        .map(|(index, note)| format!("{:>3}. {}", index + 1, note))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn groups(groups: &BTreeMap<TagGroup, Vec<&GeneralNote>>) -> String {
    if groups.is_empty() {
        return "No notes.".to_string();
    }
    groups
        .iter()
        .map(|(group, notes)| {
            let mut lines = vec![format!("#{}", group.label())];
            lines.extend(notes.iter().map(|note| format!("  {note}")));
            lines.join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn help(mode: Mode) -> String {
    let rows: Vec<(String, &str)> = Command::all(mode)
        .iter()
        .map(|command| (command.names().join(" | "), command.description()))
        .collect();
    let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);

    let mut lines = vec![format!("{} commands:", title_case(mode.as_str()))];
    lines.extend(
        rows.into_iter()
            .map(|(label, description)| format!("  {label:<width$}  {description}")),
    );
    lines.join("\n")
}
