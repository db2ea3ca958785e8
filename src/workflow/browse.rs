//! One-file-at-a-time browsing of an old or large file list.
//!
//! The transitions are pure; the controller in [`super`] performs the
//! commands and feeds the result back through [`after_command`].

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowseState {
    /// Showing the numbered list, waiting for a file number.
    NavigateList,
    /// A file was picked; its options are about to be shown.
    FileSelected(usize),
    /// Waiting for an action on the file at this 0-based index.
    ActionChoice(usize),
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowseCommand {
    Read,
    Delete,
    Archive,
    Ignore,
}

impl BrowseCommand {
    /// `a` read, `b` delete, `c` archive, `d` ignore; case-insensitive.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "a" => Some(BrowseCommand::Read),
            "b" => Some(BrowseCommand::Delete),
            "c" => Some(BrowseCommand::Archive),
            "d" => Some(BrowseCommand::Ignore),
            _ => None,
        }
    }
}

/// What a line of input did, besides moving the state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseEvent {
    None,
    Invalid(String),
    Run(BrowseCommand, usize),
}

impl BrowseState {
    /// Feed one line of input. `len` is the current length of the list.
    pub fn on_input(self, input: &str, len: usize) -> (BrowseState, BrowseEvent) {
        match self {
            BrowseState::NavigateList => {
                let input = input.trim();
                match input.parse::<usize>() {
                    Ok(0) => (BrowseState::Done, BrowseEvent::None),
                    Ok(n) if n <= len => (BrowseState::FileSelected(n - 1), BrowseEvent::None),
                    Ok(_) => (
                        BrowseState::NavigateList,
                        BrowseEvent::Invalid("Invalid selection. Try again".to_string()),
                    ),
                    Err(_) => (
                        BrowseState::NavigateList,
                        BrowseEvent::Invalid("Invalid input. Please enter a number.".to_string()),
                    ),
                }
            }
            BrowseState::ActionChoice(index) => match BrowseCommand::parse(input) {
                Some(command) => (self, BrowseEvent::Run(command, index)),
                None => (
                    self,
                    BrowseEvent::Invalid("Invalid action. Choose from the options above".to_string()),
                ),
            },
            BrowseState::FileSelected(_) | BrowseState::Done => (self, BrowseEvent::None),
        }
    }

    /// The selected file's options have been shown.
    pub fn file_shown(self) -> BrowseState {
        match self {
            BrowseState::FileSelected(index) => BrowseState::ActionChoice(index),
            other => other,
        }
    }
}

/// Where a command leaves the browser. Delete and archive only leave the file
/// when they actually removed it from the list (`completed`); a declined or
/// failed attempt keeps asking about the same file. `remaining` is the list
/// length afterwards.
pub fn after_command(
    command: BrowseCommand,
    index: usize,
    completed: bool,
    remaining: usize,
) -> BrowseState {
    let next = match command {
        BrowseCommand::Read => BrowseState::ActionChoice(index),
        BrowseCommand::Ignore => BrowseState::NavigateList,
        BrowseCommand::Delete | BrowseCommand::Archive if completed => BrowseState::NavigateList,
        BrowseCommand::Delete | BrowseCommand::Archive => BrowseState::ActionChoice(index),
    };
    if next == BrowseState::NavigateList && remaining == 0 {
        BrowseState::Done
    } else {
        next
    }
}
