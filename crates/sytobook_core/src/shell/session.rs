//! Turn-by-turn session over the contact and note stores.
//!
//! # Responsibility
//! - Read a line, resolve it to a command (directly or through the
//!   corrector), collect missing arguments, run it, and render the outcome.
//! - Flush both stores through [`Persist`] when the session ends, whether by
//!   `exit`/`close`, by an interrupt or by end of input.
//!
//! # Invariants
//! - A failed command never aborts the session; its message is shown and the
//!   next prompt follows.
//! - Ambiguous contact queries are never guessed: the operator picks from the
//!   numbered candidates or the command fails.
//! - Assistant failures degrade to "no suggestion" / "no matches".

use crate::assist::Assistant;
use crate::model::contact::{make_key, Contact, ContactError};
use crate::model::field::{Email, Name, Phone, ValidationError};
use crate::repo::{Persist, RepoResult};
use crate::shell::command::{complete_args, ArgCompletion, Command, Mode};
use crate::shell::render;
use crate::store::{
    disambiguate, split_tags, AddressBook, BookError, NoteBook, NoteSearch, Resolution, TagGroup,
};
use chrono::{Local, NaiveDate};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

const MAIN_PROMPT: &str = "Choose mode (contacts / notes / exit) >>> ";
const CONTACTS_PROMPT: &str = "contacts >>> ";
const NOTES_PROMPT: &str = "notes >>> ";
const SELECT_PROMPT: &str = "Select number >>> ";

/// One read from the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptInput {
    Line(String),
    /// Ctrl-C at a prompt.
    Interrupted,
    /// Input stream is closed.
    Closed,
}

/// Line-oriented operator I/O.
pub trait Prompter {
    /// Shows `prompt` and reads one line.
    fn read_line(&mut self, prompt: &str) -> PromptInput;
    fn show(&mut self, text: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellMode {
    Main,
    Contacts,
    Notes,
}

/// Whether the session keeps reading after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    Continue,
    Exit(ExitReason),
}

/// How [`Session::run`] ended; every variant has flushed the stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    Command,
    Interrupted,
    EndOfInput,
}

impl ExitReason {
    fn as_str(self) -> &'static str {
        match self {
            Self::Command => "command",
            Self::Interrupted => "interrupted",
            Self::EndOfInput => "end_of_input",
        }
    }
}

/// Command failure shown to the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellError {
    Book(BookError),
    InvalidArgument(String),
    /// Input ended while a command was still collecting values.
    InputEnded(ExitReason),
}

impl ShellError {
    fn kind(&self) -> &'static str {
        match self {
            Self::Book(BookError::NotFound(_)) => "not_found",
            Self::Book(BookError::Ambiguous(_)) => "ambiguous",
            Self::Book(BookError::Contact(_)) => "invalid_contact",
            Self::Book(_) => "invalid_note",
            Self::InvalidArgument(_) => "invalid_argument",
            Self::InputEnded(_) => "input_ended",
        }
    }
}

impl Display for ShellError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Book(err) => write!(f, "{err}"),
            Self::InvalidArgument(message) => write!(f, "{message}"),
            Self::InputEnded(_) => write!(f, "Input closed."),
        }
    }
}

impl Error for ShellError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Book(err) => Some(err),
            _ => None,
        }
    }
}

impl From<BookError> for ShellError {
    fn from(value: BookError) -> Self {
        Self::Book(value)
    }
}

impl From<ContactError> for ShellError {
    fn from(value: ContactError) -> Self {
        Self::Book(value.into())
    }
}

impl From<ValidationError> for ShellError {
    fn from(value: ValidationError) -> Self {
        Self::Book(value.into())
    }
}

type CommandResult = Result<Option<String>, ShellError>;

fn ask(io: &mut dyn Prompter, prompt: &str) -> Result<String, ShellError> {
    match io.read_line(prompt) {
        PromptInput::Line(line) => Ok(line.trim().to_string()),
        PromptInput::Interrupted => Err(ShellError::InputEnded(ExitReason::Interrupted)),
        PromptInput::Closed => Err(ShellError::InputEnded(ExitReason::EndOfInput)),
    }
}

fn confirmed(answer: &str) -> bool {
    answer.trim().to_lowercase().starts_with('y')
}

/// Interactive state over one user's stores.
pub struct Session {
    book: AddressBook,
    notes: NoteBook,
    assistant: Box<dyn Assistant>,
    mode: ShellMode,
    today: Option<NaiveDate>,
}

impl Session {
    pub fn new(book: AddressBook, notes: NoteBook, assistant: Box<dyn Assistant>) -> Self {
        Self {
            book,
            notes,
            assistant,
            mode: ShellMode::Main,
            today: None,
        }
    }

    /// Pins the calendar date used for birthday validation and projection.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn mode(&self) -> ShellMode {
        self.mode
    }

    pub fn address_book(&self) -> &AddressBook {
        &self.book
    }

    pub fn note_book(&self) -> &NoteBook {
        &self.notes
    }

    pub fn into_books(self) -> (AddressBook, NoteBook) {
        (self.book, self.notes)
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    pub fn prompt(&self) -> &'static str {
        match self.mode {
            ShellMode::Main => MAIN_PROMPT,
            ShellMode::Contacts => CONTACTS_PROMPT,
            ShellMode::Notes => NOTES_PROMPT,
        }
    }

    /// Runs turns until `exit`/`close`, an interrupt or end of input, then
    /// flushes.
    pub fn run(
        &mut self,
        io: &mut dyn Prompter,
        persist: &mut dyn Persist,
    ) -> RepoResult<ExitReason> {
        info!(
            "event=session_start module=shell status=ok contacts={} notes={} assistant={}",
            self.book.len(),
            self.notes.len(),
            self.assistant.is_enabled()
        );

        let reason = loop {
            match io.read_line(self.prompt()) {
                PromptInput::Line(line) => {
                    if let Turn::Exit(reason) = self.handle_line(&line, io) {
                        break reason;
                    }
                }
                PromptInput::Interrupted => break ExitReason::Interrupted,
                PromptInput::Closed => break ExitReason::EndOfInput,
            }
        };

        if let Err(err) = persist.persist(&self.book, &self.notes) {
            error!(
                "event=session_end module=shell status=error reason={} error={}",
                reason.as_str(),
                err
            );
            return Err(err);
        }
        info!(
            "event=session_end module=shell status=ok reason={} contacts={} notes={}",
            reason.as_str(),
            self.book.len(),
            self.notes.len()
        );
        match reason {
            ExitReason::Command => io.show("✔ Data saved. Good bye!"),
            ExitReason::Interrupted | ExitReason::EndOfInput => {
                io.show("\nInterrupted. Data saved.")
            }
        }
        Ok(reason)
    }

    /// Handles one operator line in the current mode.
    pub fn handle_line(&mut self, line: &str, io: &mut dyn Prompter) -> Turn {
        let line = line.trim();
        match self.mode {
            ShellMode::Main => self.handle_mode_choice(line, io),
            ShellMode::Contacts => self.handle_command_line(Mode::Contacts, line, io),
            ShellMode::Notes => self.handle_command_line(Mode::Notes, line, io),
        }
    }

    fn handle_mode_choice(&mut self, line: &str, io: &mut dyn Prompter) -> Turn {
        match line.to_lowercase().as_str() {
            "" => {}
            "exit" | "close" => return Turn::Exit(ExitReason::Command),
            "contacts" | "1" => {
                self.mode = ShellMode::Contacts;
                io.show(&render::help(Mode::Contacts));
            }
            "notes" | "2" => {
                self.mode = ShellMode::Notes;
                io.show(&render::help(Mode::Notes));
            }
            _ => io.show("Unknown mode."),
        }
        Turn::Continue
    }

    fn handle_command_line(&mut self, mode: Mode, line: &str, io: &mut dyn Prompter) -> Turn {
        let tokens: Vec<String> = line.split_whitespace().map(str::to_string).collect();
        let Some((head, rest)) = tokens.split_first() else {
            return Turn::Continue;
        };

        let (command, supplied) = match Command::parse(mode, head) {
            Some(command) => (command, rest.to_vec()),
            // A corrected command collects every argument afresh.
            None => match self.correct(mode, line, io) {
                Ok(Some(command)) => (command, Vec::new()),
                Err(err) => return self.finish(mode, None, Err(err), io),
                Ok(None) => {
                    info!(
                        "event=command module=shell status=unknown mode={}",
                        mode.as_str()
                    );
                    io.show("Unknown command.");
                    return Turn::Continue;
                }
            },
        };

        if command == Command::Exit {
            return Turn::Exit(ExitReason::Command);
        }
        let supplied = if matches!(command, Command::ChangeAddress | Command::AddContactNote) {
            self.join_name_prefix(supplied)
        } else {
            supplied
        };

        let outcome = collect_args(command, &supplied, io)
            .and_then(|args| self.execute(mode, command, &args, io));
        self.finish(mode, Some(command), outcome, io)
    }

    fn correct(
        &self,
        mode: Mode,
        raw: &str,
        io: &mut dyn Prompter,
    ) -> Result<Option<Command>, ShellError> {
        let vocabulary = Command::vocabulary(mode);
        let Some(suggestion) = self.assistant.suggest(raw, &vocabulary) else {
            return Ok(None);
        };
        let Some(command) = Command::parse(mode, &suggestion) else {
            return Ok(None);
        };
        let answer = ask(io, &format!("Did you mean '{suggestion}'? (y/n): "))?;
        let accepted = confirmed(&answer);
        info!(
            "event=command_correction module=shell status={} suggestion={}",
            if accepted { "accepted" } else { "declined" },
            command.name()
        );
        Ok(accepted.then_some(command))
    }

    fn execute(
        &mut self,
        mode: Mode,
        command: Command,
        args: &[String],
        io: &mut dyn Prompter,
    ) -> CommandResult {
        match command {
            Command::Exit => Ok(None),
            Command::Back => {
                self.mode = ShellMode::Main;
                Ok(None)
            }
            Command::Help => Ok(Some(render::help(mode))),
            Command::Add => self.add_contact(args, io),
            Command::Change => self.change(args, io),
            Command::ChangeEmail => self.change_email(args, io),
            Command::ChangeAddress => self.change_address(args, io),
            Command::RemovePhone => self.remove_phone(args, io),
            Command::ShowPhones => self.show_phones(args, io),
            Command::Delete => self.delete(args, io),
            Command::All => Ok(Some(render::contacts(self.book.iter().map(|(_, c)| c)))),
            Command::Search => Ok(Some(render::contacts(self.book.search(arg(args, 0))))),
            Command::AddBirthday => self.add_birthday(args, io),
            Command::ReplaceBirthday => self.replace_birthday(args, io),
            Command::ShowBirthday => self.show_birthday(args),
            Command::Birthdays => self.birthdays(args),
            Command::AddContactNote => self.add_contact_note(args, io),
            Command::AddNote => self.add_note(args, io),
            Command::ListNotes => Ok(Some(render::notes_table(self.notes.notes()))),
            Command::AddTag => self.add_tag(args),
            Command::SearchTag => self.search_tag(args),
            Command::SearchNote => self.search_note(args),
            Command::GroupNotes => self.group_notes(args),
        }
    }

    /// Reports a command outcome; input ending mid-command ends the session.
    fn finish(
        &self,
        mode: Mode,
        command: Option<Command>,
        outcome: CommandResult,
        io: &mut dyn Prompter,
    ) -> Turn {
        let name = command.map_or("unknown", Command::name);
        match outcome {
            Ok(message) => {
                info!(
                    "event=command module=shell status=ok mode={} command={}",
                    mode.as_str(),
                    name
                );
                if let Some(message) = message {
                    io.show(&message);
                }
                Turn::Continue
            }
            Err(ShellError::InputEnded(reason)) => {
                info!(
                    "event=command module=shell status=aborted mode={} command={} reason={}",
                    mode.as_str(),
                    name,
                    reason.as_str()
                );
                Turn::Exit(reason)
            }
            Err(err) => {
                warn!(
                    "event=command module=shell status=error mode={} command={} error_kind={}",
                    mode.as_str(),
                    name,
                    err.kind()
                );
                io.show(&err.to_string());
                Turn::Continue
            }
        }
    }

    /// For `<name> <text...>` commands: joins the longest leading run of
    /// tokens that resolves to exactly one contact into the name argument.
    /// At least one token is left for the text.
    fn join_name_prefix(&self, supplied: Vec<String>) -> Vec<String> {
        let unique_prefix = (2..supplied.len()).rev().find(|&len| {
            matches!(
                self.book.resolve(&supplied[..len].join(" ")),
                Resolution::Unique(_)
            )
        });
        match unique_prefix {
            Some(len) => {
                let mut joined = vec![supplied[..len].join(" ")];
                joined.extend_from_slice(&supplied[len..]);
                joined
            }
            None => supplied,
        }
    }

    /// Resolves `query` to one key, asking the operator to pick when several
    /// keys match.
    fn pick_contact(&self, query: &str, io: &mut dyn Prompter) -> Result<String, ShellError> {
        match self.book.resolve(query) {
            Resolution::Unique(key) => Ok(key),
            Resolution::NotFound => Err(BookError::NotFound(query.to_string()).into()),
            Resolution::Ambiguous(candidates) => {
                io.show(&render::candidates(&candidates));
                let answer = ask(io, SELECT_PROMPT)?;
                disambiguate(&candidates, &answer)
                    .ok_or_else(|| BookError::Ambiguous(candidates).into())
            }
        }
    }

    fn contact_mut(
        &mut self,
        query: &str,
        io: &mut dyn Prompter,
    ) -> Result<&mut Contact, ShellError> {
        let key = self.pick_contact(query, io)?;
        self.book
            .get_mut(&key)
            .ok_or_else(|| BookError::NotFound(key).into())
    }

    fn add_contact(&mut self, args: &[String], io: &mut dyn Prompter) -> CommandResult {
        let fields = if args.is_empty() {
            ContactFields::prompt(io)?
        } else {
            ContactFields::from_args(args)
        };
        let message = self.upsert_contact(&fields)?;
        Ok(Some(message))
    }

    fn upsert_contact(&mut self, fields: &ContactFields) -> Result<String, ShellError> {
        Name::parse(&fields.name)?;
        if !fields.phone.is_empty() {
            Phone::parse(&fields.phone)?;
        }
        Email::parse(&fields.email)?;

        let key = make_key(&fields.name, &fields.surname);
        if let Some(existing) = self.book.get_mut(&key) {
            existing.update_surname(&fields.surname);
            if !fields.phone.is_empty() {
                existing.add_phone(&fields.phone)?;
            }
            if !fields.email.is_empty() {
                existing.update_email(&fields.email)?;
            }
            if !fields.address.is_empty() {
                existing.update_address(&fields.address);
            }
            return Ok("✔ Contact updated.".to_string());
        }

        let mut contact = Contact::parse(&fields.name, &fields.surname)?;
        if !fields.phone.is_empty() {
            contact.add_phone(&fields.phone)?;
        }
        contact.update_email(&fields.email)?;
        contact.update_address(&fields.address);
        self.book.add_record(contact);
        Ok("✔ Contact added.".to_string())
    }

    fn change(&mut self, args: &[String], io: &mut dyn Prompter) -> CommandResult {
        let field = arg(args, 1).to_lowercase();
        let value = arg(args, 2);
        if !matches!(field.as_str(), "phone" | "email" | "address") {
            return Err(ShellError::InvalidArgument(
                "Unknown field. Choose from: phone / email / address".to_string(),
            ));
        }

        let contact = self.contact_mut(arg(args, 0), io)?;
        match field.as_str() {
            "phone" => contact.replace_phones(value)?,
            "email" => contact.update_email(value)?,
            _ => contact.update_address(value),
        }
        Ok(Some(format!("✔ {} updated for {}.", field, contact.full_name())))
    }

    fn change_email(&mut self, args: &[String], io: &mut dyn Prompter) -> CommandResult {
        let contact = self.contact_mut(arg(args, 0), io)?;
        contact.update_email(arg(args, 1))?;
        Ok(Some("✔ Email updated.".to_string()))
    }

    fn change_address(&mut self, args: &[String], io: &mut dyn Prompter) -> CommandResult {
        let contact = self.contact_mut(arg(args, 0), io)?;
        contact.update_address(arg(args, 1));
        Ok(Some("✔ Address updated.".to_string()))
    }

    fn remove_phone(&mut self, args: &[String], io: &mut dyn Prompter) -> CommandResult {
        let contact = self.contact_mut(arg(args, 0), io)?;
        contact.remove_phone(arg(args, 1))?;
        Ok(Some("✔ Phone removed.".to_string()))
    }

    fn show_phones(&self, args: &[String], io: &mut dyn Prompter) -> CommandResult {
        let key = self.pick_contact(arg(args, 0), io)?;
        let contact = self
            .book
            .get(&key)
            .ok_or_else(|| BookError::NotFound(key.clone()))?;
        if contact.phones().is_empty() {
            return Ok(Some(format!("{} has no phones.", contact.full_name())));
        }
        let phones: Vec<&str> = contact.phones().iter().map(|phone| phone.as_str()).collect();
        Ok(Some(format!("{}: {}", contact.full_name(), phones.join(", "))))
    }

    fn delete(&mut self, args: &[String], io: &mut dyn Prompter) -> CommandResult {
        let key = self.pick_contact(arg(args, 0), io)?;
        let (_, contact) = self.book.remove(&key)?;
        Ok(Some(format!("✔ Contact {} deleted.", contact.full_name())))
    }

    fn add_birthday(&mut self, args: &[String], io: &mut dyn Prompter) -> CommandResult {
        let today = self.today();
        let contact = self.contact_mut(arg(args, 0), io)?;
        contact.set_birthday_on(arg(args, 1), today)?;
        Ok(Some("✔ Birthday added.".to_string()))
    }

    fn replace_birthday(&mut self, args: &[String], io: &mut dyn Prompter) -> CommandResult {
        let today = self.today();
        let contact = self.contact_mut(arg(args, 0), io)?;
        let message = match contact.replace_birthday_on(arg(args, 1), today)? {
            Some(previous) => format!("✔ Birthday replaced (was {previous})."),
            None => "✔ Birthday added.".to_string(),
        };
        Ok(Some(message))
    }

    fn show_birthday(&self, args: &[String]) -> CommandResult {
        let query = arg(args, 0);
        let matches = self.book.find_exact_name(query);
        if matches.is_empty() {
            return Err(BookError::NotFound(query.to_string()).into());
        }
        let lines: Vec<String> = matches
            .into_iter()
            .map(|contact| {
                let birthday = contact
                    .birthday()
                    .map(|birthday| birthday.to_string())
                    .unwrap_or_else(|| "—".to_string());
                format!("{}: {}", contact.full_name(), birthday)
            })
            .collect();
        Ok(Some(lines.join("\n")))
    }

    fn birthdays(&self, args: &[String]) -> CommandResult {
        let days: u32 = arg(args, 0).parse().map_err(|_| {
            ShellError::InvalidArgument(
                "Enter a non-negative whole number of days.".to_string(),
            )
        })?;
        let upcoming = self.book.upcoming_on(self.today(), days);
        Ok(Some(render::birthdays(&self.book, &upcoming)))
    }

    fn add_contact_note(&mut self, args: &[String], io: &mut dyn Prompter) -> CommandResult {
        let contact = self.contact_mut(arg(args, 0), io)?;
        contact.add_note(arg(args, 1))?;
        Ok(Some("✔ Note added to contact.".to_string()))
    }

    fn add_note(&mut self, args: &[String], io: &mut dyn Prompter) -> CommandResult {
        let position = self.notes.add_note(arg(args, 0), Vec::new())?;
        if confirmed(&ask(io, "Add tags? (y/n): ")?) {
            let tags = split_tags(&ask(io, "Tags (comma): ")?);
            self.notes.add_tags(position, &tags)?;
        }
        Ok(Some(format!("✔ Note #{position} saved.")))
    }

    fn add_tag(&mut self, args: &[String]) -> CommandResult {
        let raw_index = arg(args, 0);
        let position: usize = raw_index
            .parse()
            .map_err(|_| BookError::InvalidNoteIndex(raw_index.to_string()))?;
        let tags = split_tags(arg(args, 1));
        if tags.is_empty() {
            return Err(ShellError::InvalidArgument("No tags given.".to_string()));
        }
        self.notes.add_tags(position, &tags)?;
        Ok(Some("✔ Tags added.".to_string()))
    }

    fn search_tag(&self, args: &[String]) -> CommandResult {
        let tag = arg(args, 0);
        let hits: Vec<usize> = self
            .notes
            .search_by_tag(tag)
            .into_iter()
            .map(|(index, _)| index)
            .collect();
        if hits.is_empty() {
            return Ok(Some(format!("No notes with tag '{tag}'.")));
        }
        Ok(Some(render::note_hits(self.notes.notes(), &hits)))
    }

    fn search_note(&self, args: &[String]) -> CommandResult {
        if self.notes.is_empty() {
            return Ok(Some("No notes.".to_string()));
        }
        let message = match self.notes.search_note(arg(args, 0), &*self.assistant) {
            NoteSearch::Keyword(hits) => {
                format!("Keyword matches:\n{}", render::note_hits(self.notes.notes(), &hits))
            }
            NoteSearch::Semantic(hits) => {
                format!("Related notes:\n{}", render::note_hits(self.notes.notes(), &hits))
            }
            NoteSearch::NoMatches => "Nothing found.".to_string(),
        };
        Ok(Some(message))
    }

    fn group_notes(&self, args: &[String]) -> CommandResult {
        let mut groups = self.notes.group_by_tag();
        if let Some(filter) = args.first() {
            let wanted = TagGroup::Tag(filter.to_lowercase());
            groups.retain(|group, _| *group == wanted);
            if groups.is_empty() {
                return Ok(Some(format!("No notes with tag '{filter}'.")));
            }
        }
        Ok(Some(render::groups(&groups)))
    }
}

/// Fills missing parameters by prompting for each, in order.
fn collect_args(
    command: Command,
    supplied: &[String],
    io: &mut dyn Prompter,
) -> Result<Vec<String>, ShellError> {
    match complete_args(command, supplied) {
        ArgCompletion::Complete(args) => Ok(args),
        ArgCompletion::Incomplete {
            mut supplied,
            missing,
        } => {
            for prompt in missing {
                supplied.push(ask(io, prompt)?);
            }
            Ok(supplied)
        }
    }
}

fn arg(args: &[String], index: usize) -> &str {
    args.get(index).map(String::as_str).unwrap_or("")
}

/// Raw values for `add`, validated by [`Session::upsert_contact`].
struct ContactFields {
    name: String,
    surname: String,
    phone: String,
    email: String,
    address: String,
}

impl ContactFields {
    fn from_args(args: &[String]) -> Self {
        Self {
            name: arg(args, 0).to_string(),
            surname: arg(args, 1).to_string(),
            phone: arg(args, 2).to_string(),
            email: arg(args, 3).to_string(),
            address: args.get(4..).map(|rest| rest.join(" ")).unwrap_or_default(),
        }
    }

    fn prompt(io: &mut dyn Prompter) -> Result<Self, ShellError> {
        let name = prompt_valid(io, "Name: ", |raw| Name::parse(raw).map(|_| ()))?;
        let surname = prompt_valid(io, "Surname: ", |_| Ok(()))?;
        let phone = prompt_valid(io, "Phone (10 digits, blank to skip): ", |raw| {
            if raw.is_empty() {
                Ok(())
            } else {
                Phone::parse(raw).map(|_| ())
            }
        })?;
        let email = prompt_valid(io, "Email (blank to skip): ", |raw| {
            Email::parse(raw).map(|_| ())
        })?;
        let address = prompt_valid(io, "Address (blank to skip): ", |_| Ok(()))?;
        Ok(Self {
            name,
            surname,
            phone,
            email,
            address,
        })
    }
}

/// Re-prompts until `check` accepts the trimmed line.
fn prompt_valid<F>(io: &mut dyn Prompter, prompt: &str, check: F) -> Result<String, ShellError>
where
    F: Fn(&str) -> Result<(), ValidationError>,
{
    loop {
        let raw = ask(io, prompt)?;
        match check(&raw) {
            Ok(()) => return Ok(raw),
            Err(err) => io.show(&err.to_string()),
        }
    }
}
