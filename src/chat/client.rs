use super::connection::Connection;
use super::dispatcher;
use super::observer::{ChatObserver, ObserverSet};
use crate::error::ChatError;
use crate::protocol::Command;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Client for the chat server.
///
/// Cloning is cheap and every clone drives the same connection, so one clone
/// can send commands while another awaits the dispatcher. Results of
/// requests such as [`try_login`](Self::try_login) arrive asynchronously as
/// observer events once [`start_listening`](Self::start_listening) is running.
#[derive(Clone)]
pub struct ChatClient {
    connection: Arc<Connection>,
    observers: Arc<ObserverSet>,
}

impl Default for ChatClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatClient {
    pub fn new() -> Self {
        let observers = Arc::new(ObserverSet::new());
        Self {
            connection: Arc::new(Connection::new(observers.clone())),
            observers,
        }
    }

    /// Connect to the chat server at `host:port`.
    pub async fn connect(&self, host: &str, port: u16) -> Result<(), ChatError> {
        self.connection.connect(host, port, None).await
    }

    /// Like [`connect`](Self::connect), giving up after `timeout`.
    pub async fn connect_with_timeout(
        &self,
        host: &str,
        port: u16,
        timeout: Duration,
    ) -> Result<(), ChatError> {
        self.connection.connect(host, port, Some(timeout)).await
    }

    /// Close the connection and fire the disconnect event. No-op when not connected.
    pub async fn disconnect(&self) {
        self.connection.disconnect().await;
    }

    pub fn is_connection_active(&self) -> bool {
        self.connection.is_active()
    }

    /// Start the background task that reads server responses and notifies
    /// observers. The task finishes when the connection closes.
    pub fn start_listening(&self) -> JoinHandle<()> {
        dispatcher::spawn(self.connection.clone(), self.observers.clone())
    }

    pub async fn send_public_message(&self, text: &str) -> Result<(), ChatError> {
        self.send(Command::PublicMessage { text }).await
    }

    pub async fn send_private_message(&self, recipient: &str, text: &str) -> Result<(), ChatError> {
        self.send(Command::PrivateMessage { recipient, text }).await
    }

    /// Request a login. The outcome arrives as a login result event.
    pub async fn try_login(&self, username: &str) -> Result<(), ChatError> {
        self.send(Command::Login { username }).await
    }

    /// Request the list of logged-in users. The list arrives as a user list event.
    pub async fn refresh_user_list(&self) -> Result<(), ChatError> {
        self.send(Command::Users).await
    }

    /// Ask which commands the server supports. The answer arrives as a
    /// supported commands event.
    pub async fn ask_supported_commands(&self) -> Result<(), ChatError> {
        self.send(Command::Help).await
    }

    /// Register an observer. Returns `false` if it was already registered.
    pub fn add_observer(&self, observer: Arc<dyn ChatObserver>) -> bool {
        self.observers.add(observer)
    }

    /// Unregister an observer. Returns `false` if it was not registered.
    pub fn remove_observer(&self, observer: &Arc<dyn ChatObserver>) -> bool {
        self.observers.remove(observer)
    }

    /// The most recent connection, I/O, or protocol error, if any.
    /// Cleared by a successful connect.
    pub fn last_error(&self) -> Option<String> {
        self.connection.last_error()
    }

    async fn send(&self, command: Command<'_>) -> Result<(), ChatError> {
        if !self.is_connection_active() {
            return Err(ChatError::NotConnected);
        }
        let line = command.encode()?;
        self.send_command(&line).await
    }

    /// Send a raw command line, framed with a trailing blank line.
    pub(crate) async fn send_command(&self, cmd: &str) -> Result<(), ChatError> {
        self.connection.send_line(cmd).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn send_command_requires_connection() {
        let client = ChatClient::new();
        assert!(matches!(
            client.send_command("users").await,
            Err(ChatError::NotConnected)
        ));
        assert!(matches!(
            client.send_public_message("hello").await,
            Err(ChatError::NotConnected)
        ));
    }

    #[tokio::test]
    async fn send_command_writes_framed_line() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let client = ChatClient::new();
        client.connect("127.0.0.1", port).await.unwrap();
        let (mut server_side, _) = listener.accept().await.unwrap();

        client.send_command("help").await.unwrap();
        client.disconnect().await;

        let mut received = String::new();
        server_side.read_to_string(&mut received).await.unwrap();
        assert_eq!(received, "help\n\n");
    }

    #[tokio::test]
    async fn invalid_argument_writes_nothing() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let client = ChatClient::new();
        client.connect("127.0.0.1", port).await.unwrap();
        let (mut server_side, _) = listener.accept().await.unwrap();

        assert!(matches!(
            client.send_public_message("one\ntwo").await,
            Err(ChatError::InvalidArgument(_))
        ));
        assert!(client.is_connection_active());
        client.disconnect().await;

        let mut received = String::new();
        server_side.read_to_string(&mut received).await.unwrap();
        assert!(received.is_empty());
    }
}
