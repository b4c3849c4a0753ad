#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Inbox,
    Refresh,
    Quit,
}

/// Parses a conversation-view command.
///
/// Matching is exact: no trimming, no arguments. Everything else is invalid
/// input, including a known command with surrounding whitespace.
pub fn parse_command(input: &str) -> Option<Command> {
    match input {
        "/inbox" => Some(Command::Inbox),
        "/refresh" => Some(Command::Refresh),
        "/quit" => Some(Command::Quit),
        _ => None,
    }
}
