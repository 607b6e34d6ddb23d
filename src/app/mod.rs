//! Line-based terminal front end for the chat client.

pub mod input;

use anyhow::{Context, Result};
use chrono::Local;
use input::{parse_input, UserInput};
use tcpchat::config::AppConfig;
use tcpchat::{ChannelObserver, ChatClient, ChatEvent};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

pub async fn run(cfg: AppConfig) -> Result<()> {
    let client = ChatClient::new();
    let (observer, mut event_rx) = ChannelObserver::channel();
    client.add_observer(observer);

    let server = &cfg.server;
    client
        .connect_with_timeout(&server.host, server.port, server.connect_timeout())
        .await
        .with_context(|| format!("Could not reach {}:{}", server.host, server.port))?;
    print_line(&cfg, &format!("*** connected to {}:{}", server.host, server.port));

    let listener = client.start_listening();
    if let Some(username) = &cfg.username {
        client.try_login(username).await?;
    }

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            event = event_rx.recv() => {
                let Some(event) = event else { break };
                print_line(&cfg, &format_event(&event));
                if event == ChatEvent::Disconnected {
                    break;
                }
            }
            line = stdin.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else { break };
                if !handle_input(&client, &cfg, &line).await {
                    break;
                }
            }
        }
    }

    client.disconnect().await;
    if let Err(e) = listener.await {
        warn!(error = %e, "dispatcher task failed");
    }
    Ok(())
}

/// Act on one line of user input. Returns `false` when the user wants to quit.
async fn handle_input(client: &ChatClient, cfg: &AppConfig, line: &str) -> bool {
    let Some(input) = parse_input(line) else {
        if !line.trim().is_empty() {
            print_line(cfg, "!!! unknown command (try /help)");
        }
        return true;
    };

    let result = match input {
        UserInput::Public { text } => client.send_public_message(&text).await,
        UserInput::Private { recipient, text } => {
            client.send_private_message(&recipient, &text).await
        }
        UserInput::Login { username } => client.try_login(&username).await,
        UserInput::Users => client.refresh_user_list().await,
        UserInput::Help => client.ask_supported_commands().await,
        UserInput::Quit => return false,
    };
    if let Err(e) = result {
        print_line(cfg, &format!("!!! send failed: {}", e));
    }
    true
}

/// Render an event as one line of terminal output.
pub fn format_event(event: &ChatEvent) -> String {
    match event {
        ChatEvent::LoginResult { success: true, .. } => "*** logged in".to_string(),
        ChatEvent::LoginResult {
            success: false,
            message,
        } => format!("!!! login failed: {}", message),
        ChatEvent::Disconnected => "*** disconnected".to_string(),
        ChatEvent::UserList(users) => format!("*** online: {}", users.join(", ")),
        ChatEvent::MessageReceived(msg) if msg.is_private() => {
            format!("*{}* {}", msg.sender(), msg.text())
        }
        ChatEvent::MessageReceived(msg) => format!("<{}> {}", msg.sender(), msg.text()),
        ChatEvent::MessageError(message) => format!("!!! message not delivered: {}", message),
        ChatEvent::CommandError(message) => format!("!!! command rejected: {}", message),
        ChatEvent::SupportedCommands(commands) => {
            let commands = commands.get(1..).unwrap_or_default();
            format!("*** server supports: {}", commands.join(" "))
        }
    }
}

fn print_line(cfg: &AppConfig, line: &str) {
    let timestamp = Local::now().format(&cfg.ui.timestamp_format);
    println!("[{}] {}", timestamp, line);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tcpchat::TextMessage;

    #[test]
    fn formats_messages() {
        let public = ChatEvent::MessageReceived(TextMessage::new("alice", false, "hi all"));
        let private = ChatEvent::MessageReceived(TextMessage::new("bob", true, "psst"));
        assert_eq!(format_event(&public), "<alice> hi all");
        assert_eq!(format_event(&private), "*bob* psst");
    }

    #[test]
    fn formats_status_events() {
        assert_eq!(
            format_event(&ChatEvent::LoginResult {
                success: false,
                message: "username taken".into()
            }),
            "!!! login failed: username taken"
        );
        assert_eq!(
            format_event(&ChatEvent::UserList(vec!["alice".into(), "bob".into()])),
            "*** online: alice, bob"
        );
        assert_eq!(
            format_event(&ChatEvent::SupportedCommands(vec![
                "supported".into(),
                "msg".into(),
                "help".into()
            ])),
            "*** server supports: msg help"
        );
    }
}
