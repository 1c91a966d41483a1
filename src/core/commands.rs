// src/core/commands.rs

//! Command parsing and execution against the store.
//!
//! One client line maps to exactly one command; matching is by first-token
//! verb and exact token count. The whole line is lowercased before it is
//! tokenized, so keys and values are stored case-normalized. Tokens are
//! whitespace-separated, which means a value containing spaces cannot be
//! expressed in this grammar: `set greeting hello world` is four tokens and
//! answers `UNKNOWN`. This is a documented limitation of the wire grammar,
//! not something the parser tries to repair with quoting.

use crate::core::storage::KeyValueStore;

/// A single parsed client command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Set { key: String, value: String },
    Get { key: String },
    Delete { key: String },
    /// Close this session's connection. No reply is sent.
    Exit,
    /// Anything that did not match the grammar; carries the normalized line
    /// so it can be echoed back.
    Unknown { line: String },
}

/// What the session should do after executing a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Write this line (the codec appends the prompt suffix) and keep reading.
    Message(String),
    /// Close the connection without a reply.
    Terminate,
}

impl Command {
    /// Parses one raw input line. Never fails: unmatched input becomes
    /// [`Command::Unknown`].
    pub fn parse(raw: &str) -> Command {
        let line = raw.trim().to_lowercase();
        let tokens: Vec<&str> = line.split_whitespace().collect();

        match tokens.as_slice() {
            ["set", key, value] => Command::Set {
                key: (*key).to_string(),
                value: (*value).to_string(),
            },
            ["get", key] => Command::Get {
                key: (*key).to_string(),
            },
            ["delete", key] => Command::Delete {
                key: (*key).to_string(),
            },
            ["exit"] => Command::Exit,
            _ => Command::Unknown { line: line.clone() },
        }
    }

    /// Executes the command against `store` and produces the session's next
    /// action. Stateless: the outcome is purely a function of the command and
    /// the store.
    pub fn apply(&self, store: &KeyValueStore) -> Reply {
        match self {
            Command::Set { key, value } => {
                store.set(key.clone(), value.clone());
                Reply::Message("OK".to_string())
            }
            Command::Get { key } => match store.get(key) {
                Some(value) => Reply::Message(value),
                None => Reply::Message(format!("Key {key} was not found")),
            },
            Command::Delete { key } => {
                store.delete(key);
                Reply::Message("DELETED".to_string())
            }
            Command::Exit => Reply::Terminate,
            Command::Unknown { line } => Reply::Message(format!("UNKNOWN: {line}")),
        }
    }
}
