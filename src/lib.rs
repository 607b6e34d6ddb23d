//! Client for a line-oriented TCP chat protocol.
//!
//! [`ChatClient`] owns one connection to a chat server. Commands are sent as
//! text lines (`login`, `msg`, `privmsg`, `users`, `help`), and a background
//! dispatcher started with [`ChatClient::start_listening`] parses each server
//! line and notifies every registered [`ChatObserver`].
//!
//! - [`chat`] holds the client, the dispatcher, and the observer plumbing.
//! - [`protocol`] tokenizes lines and defines the command/response grammar.
//! - [`config`] and [`logging`] are the ambient pieces the binary uses.

pub mod chat;
pub mod config;
pub mod error;
pub mod logging;
pub mod protocol;

pub use chat::{ChannelObserver, ChatClient, ChatEvent, ChatObserver, ObserverSet};
pub use error::{ChatError, ParseError};
pub use protocol::TextMessage;
