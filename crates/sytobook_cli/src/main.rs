//! SYTObook command-line entry point.
//!
//! # Responsibility
//! - Resolve configuration, start logging, open the database.
//! - Run the login/registration loop, then one shell session for the user.
//! - Map the outcome to a process exit code.

use clap::Parser;
use log::{error, info, warn};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use sytobook_core::{
    init_logging, open_db, AccountError, AccountRepository, AppConfig, Assistant,
    ChatAssistant, ConfigOverrides, DisabledAssistant, OpenAiChatClient, PromptInput, Prompter,
    Session, UserStore,
};

#[derive(Debug, Parser)]
#[command(name = "sytobook", version, about = "Contacts and notes assistant")]
struct Args {
    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding the database, logs and key.txt.
    #[arg(long, env = "SYTOBOOK_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[arg(long, env = "SYTOBOOK_LOG_LEVEL")]
    log_level: Option<String>,

    /// API key for the text service used by command correction and note search.
    #[arg(long, env = "SYTOBOOK_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Run without the text service even when a key is configured.
    #[arg(long)]
    no_assistant: bool,
}

/// Line editor prompter; Ctrl-C and Ctrl-D come back as values.
struct EditorPrompter {
    editor: DefaultEditor,
    /// Off during login so credentials stay out of history.
    keep_history: bool,
}

impl EditorPrompter {
    fn new() -> Result<Self, ReadlineError> {
        Ok(Self {
            editor: DefaultEditor::new()?,
            keep_history: false,
        })
    }
}

impl Prompter for EditorPrompter {
    fn read_line(&mut self, prompt: &str) -> PromptInput {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if self.keep_history && !line.trim().is_empty() {
                    let _ = self.editor.add_history_entry(line.as_str());
                }
                PromptInput::Line(line)
            }
            Err(ReadlineError::Interrupted) => PromptInput::Interrupted,
            Err(ReadlineError::Eof) => PromptInput::Closed,
            Err(err) => {
                warn!("event=read_line module=cli status=error error={err}");
                PromptInput::Closed
            }
        }
    }

    fn show(&mut self, text: &str) {
        println!("{text}");
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("sytobook: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), String> {
    let overrides = ConfigOverrides {
        data_dir: args.data_dir.map(|dir| absolute(&dir)),
        log_level: args.log_level,
        api_key: args.api_key,
        disable_assistant: args.no_assistant,
    };
    let config =
        AppConfig::load(args.config.as_deref(), overrides).map_err(|err| err.to_string())?;

    if let Err(err) = init_logging(&config.log_level, &absolute(&config.log_dir)) {
        eprintln!("sytobook: logging disabled: {err}");
    }
    info!(
        "event=app_start module=cli status=ok version={}",
        sytobook_core::core_version()
    );

    let conn = open_db(config.database_path()).map_err(|err| err.to_string())?;
    let mut io = EditorPrompter::new().map_err(|err| err.to_string())?;

    let Some(username) = authenticate(&AccountRepository::new(&conn), &mut io)
        .map_err(|err| err.to_string())?
    else {
        info!("event=app_exit module=cli status=ok reason=no_login");
        return Ok(());
    };

    let assistant = build_assistant(&config);
    if !assistant.is_enabled() {
        io.show("AI functions disabled (no API key configured).");
    }

    io.keep_history = true;
    let mut store = UserStore::new(conn, username);
    let (book, notes) = store.load();
    let mut session = Session::new(book, notes, assistant);
    io.show(&format!("Welcome, {}!", store.owner()));

    let reason = session.run(&mut io, &mut store).map_err(|err| {
        error!("event=app_exit module=cli status=error error={err}");
        err.to_string()
    })?;
    info!("event=app_exit module=cli status=ok reason={reason:?}");
    Ok(())
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

fn build_assistant(config: &AppConfig) -> Box<dyn Assistant> {
    if !config.assistant.is_available() {
        info!("event=assistant_init module=cli status=disabled");
        return Box::new(DisabledAssistant);
    }
    match OpenAiChatClient::from_settings(&config.assistant) {
        Ok(client) => {
            info!("event=assistant_init module=cli status=ok");
            Box::new(ChatAssistant::new(client))
        }
        Err(err) => {
            error!("event=assistant_init module=cli status=error error={err}");
            Box::new(DisabledAssistant)
        }
    }
}

/// Returns the logged-in username, or `None` when the operator exits.
fn authenticate(
    accounts: &AccountRepository<'_>,
    io: &mut dyn Prompter,
) -> Result<Option<String>, AccountError> {
    loop {
        let PromptInput::Line(choice) = io.read_line("(l)ogin, (r)egister or exit: ") else {
            return Ok(None);
        };
        match choice.trim().to_lowercase().as_str() {
            "l" | "login" => {
                let Some(username) = line(io, "Username: ") else {
                    return Ok(None);
                };
                let Some(password) = line(io, "Password: ") else {
                    return Ok(None);
                };
                match accounts.login(&username, &password)? {
                    Some(user) => return Ok(Some(user)),
                    None => io.show("Invalid username or password."),
                }
            }
            "r" | "register" => {
                let Some(username) = line(io, "New username: ") else {
                    return Ok(None);
                };
                let Some(password) = line(io, "New password: ") else {
                    return Ok(None);
                };
                match accounts.register(&username, &password) {
                    Ok(user) => {
                        io.show("✔ Registered.");
                        return Ok(Some(user));
                    }
                    Err(err @ AccountError::Repo(_)) => return Err(err),
                    Err(err) => io.show(&err.to_string()),
                }
            }
            "exit" | "close" => return Ok(None),
            _ => io.show("Choose l, r or exit."),
        }
    }
}

/// Text of the next line, or `None` when the operator interrupts or input ends.
fn line(io: &mut dyn Prompter, prompt: &str) -> Option<String> {
    match io.read_line(prompt) {
        PromptInput::Line(line) => Some(line),
        PromptInput::Interrupted | PromptInput::Closed => None,
    }
}
