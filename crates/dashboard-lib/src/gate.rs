//! Allow-list gate for terminal commands
//!
//! This is a syntactic check only: the first whitespace-delimited token of
//! the command must exactly match an allowed name. Arguments and shell
//! metacharacters are not inspected.

use thiserror::Error;

/// Commands the simulated terminal accepts
pub const ALLOWED_COMMANDS: &[&str] = &["ls", "pwd", "echo", "whoami", "date", "ps", "netstat"];

/// Why a command was refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectionReason {
    #[error("missing pod name or command")]
    EmptyInput,

    #[error("command `{0}` is not allowed")]
    DisallowedCommand(String),
}

/// A command that passed the gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandToken {
    pub pod: String,
    /// First token of the command, e.g. `ls`
    pub token: String,
    /// The command as typed
    pub raw: String,
}

/// Validates terminal requests against [`ALLOWED_COMMANDS`]
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandGate;

impl CommandGate {
    pub fn new() -> Self {
        Self
    }

    /// The allow-list, comma separated, for error messages
    pub fn allowed_list(&self) -> String {
        ALLOWED_COMMANDS.join(", ")
    }

    pub fn validate(&self, pod: &str, command: &str) -> Result<CommandToken, RejectionReason> {
        if pod.trim().is_empty() {
            return Err(RejectionReason::EmptyInput);
        }

        let token = match command.split_whitespace().next() {
            Some(token) => token,
            None => return Err(RejectionReason::EmptyInput),
        };

        if !ALLOWED_COMMANDS.contains(&token) {
            return Err(RejectionReason::DisallowedCommand(token.to_string()));
        }

        Ok(CommandToken {
            pod: pod.to_string(),
            token: token.to_string(),
            raw: command.to_string(),
        })
    }
}
