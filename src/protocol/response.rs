//! Inbound protocol grammar.
//!
//! Every server line starts with a verb that selects its meaning:
//!
//! | Line                          | Response                        |
//! |-------------------------------|---------------------------------|
//! | `loginok ...`                 | [`ServerResponse::LoginOk`]     |
//! | `loginerr <message>`          | [`ServerResponse::LoginError`]  |
//! | `users <name> <name> ...`     | [`ServerResponse::Users`]       |
//! | `msg <sender> <text>`         | [`ServerResponse::Message`]     |
//! | `privmsg <sender> <text>`     | [`ServerResponse::Message`]     |
//! | `msgok ...`                   | [`ServerResponse::MessageAccepted`] |
//! | `msgerr <message>`            | [`ServerResponse::MessageError`] |
//! | `cmderr <message>`            | [`ServerResponse::CommandError`] |
//! | `supported <verb> <verb> ...` | [`ServerResponse::Supported`]   |

use super::tokenizer;
use crate::error::ParseError;

/// A chat message received from the server. Handed to observers and not retained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMessage {
    sender: String,
    is_private: bool,
    text: String,
}

impl TextMessage {
    pub fn new(sender: impl Into<String>, is_private: bool, text: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            is_private,
            text: text.into(),
        }
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn is_private(&self) -> bool {
        self.is_private
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// One parsed server line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerResponse {
    /// Login accepted. Carries the full response line.
    LoginOk { line: String },
    LoginError(String),
    Users(Vec<String>),
    Message(TextMessage),
    /// The server acknowledged a message we sent.
    MessageAccepted,
    MessageError(String),
    CommandError(String),
    /// Supported commands, with the `supported` verb itself as the first element.
    Supported(Vec<String>),
}

impl ServerResponse {
    /// Parse one line received from the server. Trailing line terminators are ignored.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let line = line.trim_end_matches(['\r', '\n']);
        let tokens = tokenizer::split(line, 2)?;

        let response = match tokens.verb() {
            "loginok" => ServerResponse::LoginOk {
                line: line.to_string(),
            },
            "loginerr" => ServerResponse::LoginError(tokens.rest()?.to_string()),
            "users" => ServerResponse::Users(tokenizer::split_all(tokens.rest()?)),
            verb @ ("msg" | "privmsg") => {
                let body = tokenizer::split(tokens.rest()?, 2)?;
                ServerResponse::Message(TextMessage::new(
                    body.part(0)?,
                    verb == "privmsg",
                    body.part(1)?,
                ))
            }
            "msgok" => ServerResponse::MessageAccepted,
            "msgerr" => ServerResponse::MessageError(tokens.rest()?.to_string()),
            "cmderr" => ServerResponse::CommandError(tokens.rest()?.to_string()),
            "supported" => ServerResponse::Supported(tokenizer::split_all(line)),
            other => return Err(ParseError::UnknownVerb(other.to_string())),
        };
        Ok(response)
    }
}
