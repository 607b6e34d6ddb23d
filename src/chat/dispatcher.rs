//! Background task that turns server lines into observer notifications.

use super::connection::Connection;
use super::observer::ObserverSet;
use crate::error::ParseError;
use crate::protocol::ServerResponse;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

/// Spawn the dispatcher. The task ends once the connection is no longer
/// active, so awaiting the handle waits for the session to finish.
pub(crate) fn spawn(connection: Arc<Connection>, observers: Arc<ObserverSet>) -> JoinHandle<()> {
    tokio::spawn(async move { run(&connection, &observers).await })
}

async fn run(connection: &Connection, observers: &ObserverSet) {
    debug!("dispatcher started");
    while connection.is_active() {
        // A failed read has already torn the connection down; the loop
        // condition ends the task.
        let Ok(line) = connection.wait_server_response().await else {
            continue;
        };
        trace!(%line, "received");

        match ServerResponse::parse(&line) {
            Ok(response) => deliver(observers, response),
            Err(ParseError::EmptyLine) => {}
            Err(ParseError::UnknownVerb(verb)) => {
                warn!(%verb, %line, "ignoring unrecognized server command");
                connection.record_error(ParseError::UnknownVerb(verb));
            }
            Err(err) => {
                warn!(error = %err, %line, "ignoring malformed server response");
                connection.record_error(err);
            }
        }
    }
    debug!("dispatcher stopped");
}

fn deliver(observers: &ObserverSet, response: ServerResponse) {
    match response {
        ServerResponse::LoginOk { line } => observers.notify_login_result(true, &line),
        ServerResponse::LoginError(message) => observers.notify_login_result(false, &message),
        ServerResponse::Users(usernames) => observers.notify_user_list(&usernames),
        ServerResponse::Message(message) => observers.notify_message_received(&message),
        ServerResponse::MessageAccepted => debug!("message accepted by server"),
        ServerResponse::MessageError(message) => observers.notify_message_error(&message),
        ServerResponse::CommandError(message) => observers.notify_command_error(&message),
        ServerResponse::Supported(commands) => observers.notify_supported_commands(&commands),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::event::{ChannelObserver, ChatEvent};
    use crate::protocol::TextMessage;

    #[test]
    fn responses_map_to_events() {
        let observers = ObserverSet::new();
        let (observer, mut events) = ChannelObserver::channel();
        observers.add(observer);

        for line in [
            "loginok",
            "loginerr bad credentials",
            "users alice bob",
            "msg alice hello there",
            "msgok 1",
            "msgerr no such user",
            "cmderr huh",
            "supported msg help",
        ] {
            deliver(&observers, ServerResponse::parse(line).unwrap());
        }

        let expected = vec![
            ChatEvent::LoginResult {
                success: true,
                message: "loginok".into(),
            },
            ChatEvent::LoginResult {
                success: false,
                message: "bad credentials".into(),
            },
            ChatEvent::UserList(vec!["alice".into(), "bob".into()]),
            ChatEvent::MessageReceived(TextMessage::new("alice", false, "hello there")),
            ChatEvent::MessageError("no such user".into()),
            ChatEvent::CommandError("huh".into()),
            ChatEvent::SupportedCommands(vec!["supported".into(), "msg".into(), "help".into()]),
        ];
        for event in expected {
            assert_eq!(events.try_recv().unwrap(), event);
        }
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn exits_immediately_without_connection() {
        let observers = Arc::new(ObserverSet::new());
        let connection = Arc::new(Connection::new(observers.clone()));
        spawn(connection, observers).await.unwrap();
    }
}
