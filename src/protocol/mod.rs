//! Wire protocol: line tokenizing, outbound commands, and inbound responses.

pub mod command;
pub mod response;
pub mod tokenizer;

pub use command::Command;
pub use response::{ServerResponse, TextMessage};
