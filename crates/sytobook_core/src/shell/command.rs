//! Command vocabulary and argument completion.
//!
//! # Responsibility
//! - Map a leading token to a [`Command`] of the active [`Mode`].
//! - Decide, without I/O, which parameters are still missing for a command.
//!
//! # Invariants
//! - Lookup is exact and case-sensitive; anything else goes through the
//!   corrector.
//! - [`complete_args`] is pure: same inputs, same result.

/// Working mode of the shell after mode selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Contacts,
    Notes,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Contacts => "contacts",
            Self::Notes => "notes",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Add,
    Change,
    ChangeEmail,
    ChangeAddress,
    RemovePhone,
    ShowPhones,
    Delete,
    All,
    Search,
    AddBirthday,
    ReplaceBirthday,
    ShowBirthday,
    Birthdays,
    AddContactNote,
    AddNote,
    ListNotes,
    AddTag,
    SearchTag,
    SearchNote,
    GroupNotes,
    Back,
    Exit,
    Help,
}

/// One positional parameter and the prompt used to ask for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Param {
    pub prompt: &'static str,
    /// Absorbs surplus tokens, joined with single spaces.
    pub greedy: bool,
}

const fn one(prompt: &'static str) -> Param {
    Param {
        prompt,
        greedy: false,
    }
}

const fn rest(prompt: &'static str) -> Param {
    Param {
        prompt,
        greedy: true,
    }
}

const CONTACT_NAME: Param = one("Contact name: ");
const CONTACT_NAME_REST: Param = rest("Contact name: ");

const CONTACT_COMMANDS: &[Command] = &[
    Command::Add,
    Command::Change,
    Command::ChangeEmail,
    Command::ChangeAddress,
    Command::RemovePhone,
    Command::ShowPhones,
    Command::Delete,
    Command::All,
    Command::Search,
    Command::AddBirthday,
    Command::ReplaceBirthday,
    Command::ShowBirthday,
    Command::Birthdays,
    Command::AddContactNote,
    Command::Back,
    Command::Exit,
    Command::Help,
];

const NOTE_COMMANDS: &[Command] = &[
    Command::AddNote,
    Command::ListNotes,
    Command::AddTag,
    Command::SearchTag,
    Command::SearchNote,
    Command::GroupNotes,
    Command::Back,
    Command::Exit,
    Command::Help,
];

impl Command {
    /// Commands available in `mode`, in help order.
    pub fn all(mode: Mode) -> &'static [Command] {
        match mode {
            Mode::Contacts => CONTACT_COMMANDS,
            Mode::Notes => NOTE_COMMANDS,
        }
    }

    /// Canonical identifier followed by accepted aliases.
    pub fn names(self) -> &'static [&'static str] {
        match self {
            Self::Add => &["add"],
            Self::Change => &["change"],
            Self::ChangeEmail => &["change-email"],
            Self::ChangeAddress => &["change-address"],
            Self::RemovePhone => &["remove-phone"],
            Self::ShowPhones => &["phone"],
            Self::Delete => &["delete"],
            Self::All => &["all"],
            Self::Search => &["search"],
            Self::AddBirthday => &["add-birthday"],
            Self::ReplaceBirthday => &["replace-birthday"],
            Self::ShowBirthday => &["show-birthday"],
            Self::Birthdays => &["birthdays"],
            Self::AddContactNote => &["add-contact-note"],
            Self::AddNote => &["add-note"],
            Self::ListNotes => &["list-notes"],
            Self::AddTag => &["add-tag"],
            Self::SearchTag => &["search-tag"],
            Self::SearchNote => &["search-note"],
            Self::GroupNotes => &["group-notes"],
            Self::Back => &["back"],
            Self::Exit => &["exit", "close"],
            Self::Help => &["hello", "help"],
        }
    }

    pub fn name(self) -> &'static str {
        self.names()[0]
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Add => "add new contact (or update one with the same name)",
            Self::Change => "change contact phone, email or address",
            Self::ChangeEmail => "change contact email",
            Self::ChangeAddress => "change contact address (name may be several words)",
            Self::RemovePhone => "remove contact's phone",
            Self::ShowPhones => "show contact's phones",
            Self::Delete => "delete contact",
            Self::All => "show all contacts",
            Self::Search => "search contact by name, phone, email or notes",
            Self::AddBirthday => "add birthday to contact",
            Self::ReplaceBirthday => "replace an already set birthday",
            Self::ShowBirthday => "show contact's birthday",
            Self::Birthdays => "show contacts whose birthday is in the next N days",
            Self::AddContactNote => "add note to contact (name may be several words)",
            Self::AddNote => "add new note",
            Self::ListNotes => "view all notes",
            Self::AddTag => "add tags to a note",
            Self::SearchTag => "find notes by tag",
            Self::SearchNote => "find notes by text",
            Self::GroupNotes => "list notes grouped by tag",
            Self::Back => "return to mode selection",
            Self::Exit => "save and end assistant work",
            Self::Help => "output all commands",
        }
    }

    /// Positional parameters the handler needs before it can run.
    pub fn params(self) -> &'static [Param] {
        const CHANGE: &[Param] = &[
            one("Which contact do you want to change? "),
            one("What do you want to change in this contact? (phone / email / address) "),
            rest("New value: "),
        ];
        const CHANGE_EMAIL: &[Param] = &[CONTACT_NAME_REST, one("New email: ")];
        const CHANGE_ADDRESS: &[Param] = &[CONTACT_NAME, rest("New address: ")];
        const REMOVE_PHONE: &[Param] = &[CONTACT_NAME_REST, one("Phone: ")];
        const NAME_ONLY: &[Param] = &[CONTACT_NAME_REST];
        const SEARCH: &[Param] = &[rest("Enter name | surname | phone | email | notes: ")];
        const BIRTHDAY: &[Param] = &[CONTACT_NAME_REST, one("Birthday DD.MM.YYYY: ")];
        const SHOW_BIRTHDAY: &[Param] = &[rest("Name or surname: ")];
        const BIRTHDAYS: &[Param] = &[one("Days from today (N): ")];
        const CONTACT_NOTE: &[Param] = &[CONTACT_NAME, rest("Note: ")];
        const ADD_NOTE: &[Param] = &[rest("Text: ")];
        const ADD_TAG: &[Param] = &[one("Note index: "), rest("Tags (comma): ")];
        const SEARCH_TAG: &[Param] = &[one("Tag: ")];
        const SEARCH_NOTE: &[Param] = &[rest("Query: ")];

        match self {
            Self::Change => CHANGE,
            Self::ChangeEmail => CHANGE_EMAIL,
            Self::ChangeAddress => CHANGE_ADDRESS,
            Self::RemovePhone => REMOVE_PHONE,
            Self::ShowPhones | Self::Delete => NAME_ONLY,
            Self::Search => SEARCH,
            Self::AddBirthday | Self::ReplaceBirthday => BIRTHDAY,
            Self::ShowBirthday => SHOW_BIRTHDAY,
            Self::Birthdays => BIRTHDAYS,
            Self::AddContactNote => CONTACT_NOTE,
            Self::AddNote => ADD_NOTE,
            Self::AddTag => ADD_TAG,
            Self::SearchTag => SEARCH_TAG,
            Self::SearchNote => SEARCH_NOTE,
            Self::Add
            | Self::All
            | Self::ListNotes
            | Self::GroupNotes
            | Self::Back
            | Self::Exit
            | Self::Help => &[],
        }
    }

    /// Exact lookup of `token` among the commands of `mode`.
    pub fn parse(mode: Mode, token: &str) -> Option<Command> {
        Self::all(mode)
            .iter()
            .copied()
            .find(|command| command.names().contains(&token))
    }

    /// Every identifier (canonical names and aliases) valid in `mode`.
    pub fn vocabulary(mode: Mode) -> Vec<&'static str> {
        Self::all(mode)
            .iter()
            .flat_map(|command| command.names().iter().copied())
            .collect()
    }
}

/// Result of matching supplied tokens against a command's parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgCompletion {
    Complete(Vec<String>),
    /// `supplied` fills the leading parameters; `missing` are the prompts for
    /// the rest, in order.
    Incomplete {
        supplied: Vec<String>,
        missing: Vec<&'static str>,
    },
}

/// Fits whitespace-split tokens to `command`'s parameters.
///
/// Fewer tokens than parameters yields the prompts still needed. More tokens
/// than parameters are folded into the greedy parameter; commands without a
/// greedy parameter keep surplus tokens as-is.
pub fn complete_args(command: Command, supplied: &[String]) -> ArgCompletion {
    let params = command.params();
    if supplied.len() < params.len() {
        return ArgCompletion::Incomplete {
            supplied: supplied.to_vec(),
            missing: params[supplied.len()..]
                .iter()
                .map(|param| param.prompt)
                .collect(),
        };
    }

    let surplus = supplied.len() - params.len();
    let Some(greedy) = params.iter().position(|param| param.greedy) else {
        return ArgCompletion::Complete(supplied.to_vec());
    };
    if surplus == 0 {
        return ArgCompletion::Complete(supplied.to_vec());
    }

    let mut args = supplied[..greedy].to_vec();
    args.push(supplied[greedy..=greedy + surplus].join(" "));
    args.extend_from_slice(&supplied[greedy + surplus + 1..]);
    ArgCompletion::Complete(args)
}
