//! Outbound commands.
//!
//! Each command is sent as a single line followed by one blank line:
//! `<verb> <args>\n\n`.

use crate::error::ChatError;
use std::fmt;

/// A command the client can send to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    Login { username: &'a str },
    PublicMessage { text: &'a str },
    PrivateMessage { recipient: &'a str, text: &'a str },
    Users,
    Help,
}

impl Command<'_> {
    pub fn verb(&self) -> &'static str {
        match self {
            Command::Login { .. } => "login",
            Command::PublicMessage { .. } => "msg",
            Command::PrivateMessage { .. } => "privmsg",
            Command::Users => "users",
            Command::Help => "help",
        }
    }

    /// Check that the arguments cannot break line framing and render the
    /// command line (without terminators).
    pub fn encode(&self) -> Result<String, ChatError> {
        match self {
            Command::Login { username } => check_line("username", username)?,
            Command::PublicMessage { text } => check_line("message", text)?,
            Command::PrivateMessage { recipient, text } => {
                check_line("recipient", recipient)?;
                check_line("message", text)?;
                if recipient.is_empty() || recipient.contains(char::is_whitespace) {
                    return Err(ChatError::InvalidArgument(format!(
                        "recipient must be a single word, got {:?}",
                        recipient
                    )));
                }
            }
            Command::Users | Command::Help => {}
        }
        Ok(self.to_string())
    }
}

impl fmt::Display for Command<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Login { username } => write!(f, "{} {}", self.verb(), username),
            Command::PublicMessage { text } => write!(f, "{} {}", self.verb(), text),
            Command::PrivateMessage { recipient, text } => {
                write!(f, "{} {} {}", self.verb(), recipient, text)
            }
            Command::Users | Command::Help => f.write_str(self.verb()),
        }
    }
}

/// Wrap a command line in the wire framing: the line, then an empty line.
pub fn frame(line: &str) -> String {
    format!("{}\n\n", line)
}

fn check_line(what: &str, value: &str) -> Result<(), ChatError> {
    if value.contains(['\r', '\n']) {
        return Err(ChatError::InvalidArgument(format!(
            "{} must not contain line breaks",
            what
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_each_verb() {
        let cases = [
            (Command::Login { username: "alice" }, "login alice"),
            (Command::PublicMessage { text: "hello all" }, "msg hello all"),
            (
                Command::PrivateMessage {
                    recipient: "bob",
                    text: "hi bob",
                },
                "privmsg bob hi bob",
            ),
            (Command::Users, "users"),
            (Command::Help, "help"),
        ];
        for (command, expected) in cases {
            assert_eq!(command.encode().unwrap(), expected);
        }
    }

    #[test]
    fn framing_appends_blank_line() {
        assert_eq!(frame("users"), "users\n\n");
    }

    #[test]
    fn line_breaks_are_rejected() {
        let err = Command::PublicMessage {
            text: "hi\nloginok",
        }
        .encode()
        .unwrap_err();
        assert!(matches!(err, ChatError::InvalidArgument(_)));

        let err = Command::Login {
            username: "alice\r",
        }
        .encode()
        .unwrap_err();
        assert!(matches!(err, ChatError::InvalidArgument(_)));
    }

    #[test]
    fn recipient_must_be_one_word() {
        for recipient in ["", "bob smith"] {
            let err = Command::PrivateMessage {
                recipient,
                text: "hi",
            }
            .encode()
            .unwrap_err();
            assert!(matches!(err, ChatError::InvalidArgument(_)));
        }
    }
}
