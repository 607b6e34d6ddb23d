//! User input parser.
//!
//! Plain text is a public message. Lines starting with `/` are commands:
//! `/login <name>`, `/msg <user> <text>`, `/users`, `/help`, `/quit`.

/// A parsed line of user input.
#[derive(Debug, PartialEq, Eq)]
pub enum UserInput {
    Public { text: String },
    Private { recipient: String, text: String },
    Login { username: String },
    Users,
    Help,
    Quit,
}

/// Parse one input line into a [`UserInput`].
///
/// Returns `None` for blank lines, unknown commands, and commands missing
/// their arguments. Commands are case-insensitive.
pub fn parse_input(input: &str) -> Option<UserInput> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    let Some(command) = input.strip_prefix('/') else {
        return Some(UserInput::Public {
            text: input.to_string(),
        });
    };

    let parts: Vec<&str> = command.splitn(3, ' ').collect();
    let cmd = parts.first()?.to_lowercase();

    match cmd.as_str() {
        "login" | "nick" => {
            let username = parts.get(1)?.trim().to_string();
            if username.is_empty() {
                return None;
            }
            Some(UserInput::Login { username })
        }
        "msg" | "privmsg" | "query" => {
            let recipient = parts.get(1)?.to_string();
            let text = parts.get(2)?.trim().to_string();
            if recipient.is_empty() || text.is_empty() {
                return None;
            }
            Some(UserInput::Private { recipient, text })
        }
        "users" | "who" => Some(UserInput::Users),
        "help" | "h" => Some(UserInput::Help),
        "quit" | "exit" => Some(UserInput::Quit),
        _ => None,
    }
}
