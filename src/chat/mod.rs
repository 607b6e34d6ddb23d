//! Chat client: connection management, command sending, and the background
//! dispatcher that delivers server events to observers.

pub mod client;
mod connection;
mod dispatcher;
pub mod event;
pub mod observer;

pub use client::ChatClient;
pub use event::{ChannelObserver, ChatEvent};
pub use observer::{ChatObserver, ObserverSet};
