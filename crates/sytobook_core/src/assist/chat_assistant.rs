//! Command correction and semantic ranking over a [`ChatClient`].

use crate::assist::{Assistant, ChatClient, ChatRequest, Corrector, SemanticRanker};
use crate::model::note::GeneralNote;
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;

/// Upper bound on semantic hits returned to the caller.
pub const MAX_SEMANTIC_HITS: usize = 5;

const CORRECTION_MAX_TOKENS: u32 = 6;
const RANKING_MAX_TOKENS: u32 = 20;
const RANKING_TOP_P: f32 = 0.1;

const RANKING_PROMPT: &str = "You are a semantic search assistant.
Below is a numbered list of notes. Each note has the format
<index>: <text>  [tags: <tag1>, <tag2>, ...]

User will send a search query in Russian, Ukrainian or English.
Return ONLY the indices (space-separated) of up to five notes
that are truly relevant. If nothing fits, return an empty string.
";

static INDEX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("valid index regex"));

/// Live assistant backed by a chat-completion client.
pub struct ChatAssistant<C: ChatClient> {
    client: C,
}

impl<C: ChatClient> ChatAssistant<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }
}

impl<C: ChatClient> Corrector for ChatAssistant<C> {
    fn suggest(&self, raw_input: &str, valid_commands: &[&str]) -> Option<String> {
        let request = ChatRequest {
            system: correction_prompt(valid_commands),
            user: raw_input.to_string(),
            max_tokens: CORRECTION_MAX_TOKENS,
            top_p: None,
        };
        match self.client.complete(&request) {
            Ok(reply) => {
                let suggestion = clean_suggestion(&reply, valid_commands);
                info!(
                    "event=command_correction module=assist status=ok suggested={}",
                    suggestion.is_some()
                );
                suggestion
            }
            Err(err) => {
                warn!("event=command_correction module=assist status=error error={err}");
                None
            }
        }
    }
}

impl<C: ChatClient> SemanticRanker for ChatAssistant<C> {
    fn rank(&self, query: &str, notes: &[GeneralNote]) -> Vec<usize> {
        if notes.is_empty() {
            return Vec::new();
        }
        let request = ChatRequest {
            system: format!("{RANKING_PROMPT}\n{}", note_catalog(notes)),
            user: query.to_string(),
            max_tokens: RANKING_MAX_TOKENS,
            top_p: Some(RANKING_TOP_P),
        };
        match self.client.complete(&request) {
            Ok(reply) => {
                let ranked = parse_ranked_indices(&reply, notes.len());
                info!(
                    "event=semantic_rank module=assist status=ok notes={} hits={}",
                    notes.len(),
                    ranked.len()
                );
                ranked
            }
            Err(err) => {
                warn!("event=semantic_rank module=assist status=error error={err}");
                Vec::new()
            }
        }
    }
}

impl<C: ChatClient> Assistant for ChatAssistant<C> {
    fn is_enabled(&self) -> bool {
        true
    }
}

fn correction_prompt(valid_commands: &[&str]) -> String {
    format!(
        "You are a CLI assistant that fixes mistyped commands. \
         User may write RU/UA/EN with typos.\n\n\
         Supported commands:\n{}\n\n\
         Return ONLY the canonical command name or empty string.",
        valid_commands.join("\n")
    )
}

/// Catalog sent to the ranker: `<1-based index>: <text>  [tags: a, b]`.
pub fn note_catalog(notes: &[GeneralNote]) -> String {
    notes
        .iter()
        .enumerate()
        .map(|(index, note)| {
            let tags = if note.tags().is_empty() {
                "—".to_string()
            } else {
                note.tags().join(", ")
            };
            format!("{}: {}  [tags: {}]", index + 1, note.text(), tags)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Accepts the reply only if, stripped of whitespace and quotes, it is one
/// of `valid_commands`.
fn clean_suggestion(reply: &str, valid_commands: &[&str]) -> Option<String> {
    let guess = reply.trim().trim_matches(|c| c == '"' || c == '\'').trim();
    valid_commands
        .iter()
        .find(|command| **command == guess)
        .map(|command| command.to_string())
}

/// Extracts one-based indices from the reply, converts them to zero-based,
/// drops out-of-range values and duplicates, and caps the list.
fn parse_ranked_indices(reply: &str, catalog_len: usize) -> Vec<usize> {
    let mut ranked = Vec::new();
    for found in INDEX_RE.find_iter(reply) {
        let Ok(position) = found.as_str().parse::<usize>() else {
            continue;
        };
        if position == 0 || position > catalog_len {
            continue;
        }
        let index = position - 1;
        if !ranked.contains(&index) {
            ranked.push(index);
        }
        if ranked.len() == MAX_SEMANTIC_HITS {
            break;
        }
    }
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assist::AssistError;
    use std::cell::RefCell;

    struct ScriptedClient {
        reply: Result<String, ()>,
        seen: RefCell<Vec<ChatRequest>>,
    }

    impl ScriptedClient {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                seen: RefCell::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                reply: Err(()),
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl ChatClient for ScriptedClient {
        fn complete(&self, request: &ChatRequest) -> Result<String, AssistError> {
            self.seen.borrow_mut().push(request.clone());
            self.reply
                .clone()
                .map_err(|_| AssistError::Transport("offline".to_string()))
        }
    }

    fn note(text: &str, tags: &[&str]) -> GeneralNote {
        GeneralNote::new(text, tags.iter().map(|t| t.to_string()).collect()).unwrap()
    }

    #[test]
    fn suggestion_must_be_in_vocabulary() {
        let valid = ["add", "delete"];
        assert_eq!(clean_suggestion(" \"add\" \n", &valid), Some("add".to_string()));
        assert_eq!(clean_suggestion("'delete'", &valid), Some("delete".to_string()));
        assert_eq!(clean_suggestion("remove", &valid), None);
        assert_eq!(clean_suggestion("", &valid), None);
        assert_eq!(clean_suggestion("Add", &valid), None);
    }

    #[test]
    fn corrector_sends_vocabulary_and_raw_input() {
        let assistant = ChatAssistant::new(ScriptedClient::replying("delete"));
        let suggestion = assistant.suggest("delte bob", &["add", "delete"]);
        assert_eq!(suggestion.as_deref(), Some("delete"));

        let seen = assistant.client.seen.borrow();
        assert_eq!(seen[0].user, "delte bob");
        assert!(seen[0].system.contains("add\ndelete"));
        assert_eq!(seen[0].max_tokens, CORRECTION_MAX_TOKENS);
    }

    #[test]
    fn service_failure_degrades_to_nothing() {
        let assistant = ChatAssistant::new(ScriptedClient::failing());
        assert_eq!(assistant.suggest("ad", &["add"]), None);
        assert!(assistant.rank("milk", &[note("buy milk", &[])]).is_empty());
    }

    #[test]
    fn ranked_indices_are_filtered_deduplicated_and_capped() {
        assert_eq!(parse_ranked_indices("3 1 3 9 0", 4), vec![2, 0]);
        assert_eq!(parse_ranked_indices("", 4), Vec::<usize>::new());
        assert_eq!(
            parse_ranked_indices("1 2 3 4 5 6 7", 10),
            vec![0, 1, 2, 3, 4]
        );
    }

    #[test]
    fn catalog_lists_one_based_entries_with_tags() {
        let catalog = note_catalog(&[note("alpha", &["a", "b"]), note("beta", &[])]);
        assert_eq!(catalog, "1: alpha  [tags: a, b]\n2: beta  [tags: —]");
    }
}
