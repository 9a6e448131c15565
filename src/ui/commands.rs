/// Commands accepted by the interactive prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    History,
    Insight,
    Clear,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

pub const HELP: &str = "Commands: start, history, insight, clear, help, quit";

impl Command {
    pub fn parse(line: &str) -> Self {
        match line.trim() {
            "" => Command::Empty,
            "start" | "s" => Command::Start,
            "history" | "h" => Command::History,
            "insight" | "i" => Command::Insight,
            "clear" | "c" => Command::Clear,
            "help" | "?" => Command::Help,
            "quit" | "q" | "exit" => Command::Quit,
            other => Command::Unknown(other.to_string()),
        }
    }
}

/// What the prompt does with a line typed while a test is running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusyAction {
    /// Hand the start to the session so it can reject it
    Start,
    /// Leave once the current test has finished
    QuitAfterRun,
    /// Only acknowledge that a test is in progress
    Ignore,
}

impl From<&Command> for BusyAction {
    fn from(command: &Command) -> Self {
        match command {
            Command::Start => BusyAction::Start,
            Command::Quit => BusyAction::QuitAfterRun,
            _ => BusyAction::Ignore,
        }
    }
}
