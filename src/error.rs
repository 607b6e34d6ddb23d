//! Error types for the chat client.

use parking_lot::Mutex;
use std::fmt::Display;
use std::io;
use thiserror::Error;

/// Failures surfaced by [`ChatClient`](crate::ChatClient) operations.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("not connected to a chat server")]
    NotConnected,

    #[error("already connected to a chat server")]
    AlreadyConnected,

    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("timed out connecting to {addr}")]
    ConnectTimeout { addr: String },

    #[error("connection I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("connection closed")]
    ConnectionClosed,

    #[error("server line longer than {limit} bytes")]
    LineTooLong { limit: usize },

    #[error("invalid command argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Reasons an inbound protocol line could not be turned into a response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty line")]
    EmptyLine,

    #[error("missing part {index} in `{context}`")]
    MissingPart { index: usize, context: String },

    #[error("unrecognized command `{0}`")]
    UnknownVerb(String),
}

/// Holds the message of the most recent failure seen by a connection.
#[derive(Debug, Default)]
pub(crate) struct ErrorSlot(Mutex<Option<String>>);

impl ErrorSlot {
    pub(crate) fn record(&self, err: impl Display) {
        *self.0.lock() = Some(err.to_string());
    }

    pub(crate) fn get(&self) -> Option<String> {
        self.0.lock().clone()
    }

    pub(crate) fn clear(&self) {
        self.0.lock().take();
    }
}
