//! Channel-based observer.
//!
//! [`ChannelObserver`] turns observer callbacks into [`ChatEvent`] values on a
//! tokio channel, so async code can `recv().await` events instead of
//! implementing [`ChatObserver`] directly.

use super::observer::ChatObserver;
use crate::protocol::TextMessage;
use std::sync::Arc;
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    LoginResult { success: bool, message: String },
    Disconnected,
    UserList(Vec<String>),
    MessageReceived(TextMessage),
    MessageError(String),
    CommandError(String),
    SupportedCommands(Vec<String>),
}

/// Forwards every notification to an unbounded channel.
pub struct ChannelObserver {
    event_tx: mpsc::UnboundedSender<ChatEvent>,
}

impl ChannelObserver {
    pub fn new(event_tx: mpsc::UnboundedSender<ChatEvent>) -> Self {
        Self { event_tx }
    }

    /// Create an observer together with the receiving end of its channel.
    pub fn channel() -> (Arc<Self>, mpsc::UnboundedReceiver<ChatEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        (Arc::new(Self::new(event_tx)), event_rx)
    }

    fn forward(&self, event: ChatEvent) {
        // A dropped receiver just means nobody is listening any more.
        let _ = self.event_tx.send(event);
    }
}

impl ChatObserver for ChannelObserver {
    fn on_login_result(&self, success: bool, message: &str) {
        self.forward(ChatEvent::LoginResult {
            success,
            message: message.to_string(),
        });
    }

    fn on_disconnect(&self) {
        self.forward(ChatEvent::Disconnected);
    }

    fn on_user_list(&self, usernames: &[String]) {
        self.forward(ChatEvent::UserList(usernames.to_vec()));
    }

    fn on_message_received(&self, message: &TextMessage) {
        self.forward(ChatEvent::MessageReceived(message.clone()));
    }

    fn on_message_error(&self, message: &str) {
        self.forward(ChatEvent::MessageError(message.to_string()));
    }

    fn on_command_error(&self, message: &str) {
        self.forward(ChatEvent::CommandError(message.to_string()));
    }

    fn on_supported_commands(&self, commands: &[String]) {
        self.forward(ChatEvent::SupportedCommands(commands.to_vec()));
    }
}
