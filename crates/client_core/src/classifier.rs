//! Maps a fetch outcome onto what the screen should show.

use shared::{domain::Fact, error::FetchOutcome};

/// Opaque message identifiers, resolved to text by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    EmptySearch,
    Error404,
    Error400,
    ErrorGeneric,
    ErrorServer,
    LostConnection,
}

impl MessageKey {
    pub const ALL: [MessageKey; 6] = [
        MessageKey::EmptySearch,
        MessageKey::Error404,
        MessageKey::Error400,
        MessageKey::ErrorGeneric,
        MessageKey::ErrorServer,
        MessageKey::LostConnection,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MessageKey::EmptySearch => "empty_search_message",
            MessageKey::Error404 => "error_404_message",
            MessageKey::Error400 => "error_400_message",
            MessageKey::ErrorGeneric => "error_generic_message",
            MessageKey::ErrorServer => "error_server_message",
            MessageKey::LostConnection => "error_lost_connection_message",
        }
    }
}

impl std::fmt::Display for MessageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    Facts,
    Empty,
    Error,
}

/// Which panel to show. `Facts` never carries a message; `Empty` and
/// `Error` always do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayInstruction {
    panel: Panel,
    message: Option<MessageKey>,
}

impl DisplayInstruction {
    pub fn facts() -> Self {
        Self {
            panel: Panel::Facts,
            message: None,
        }
    }

    pub fn empty(message: MessageKey) -> Self {
        Self {
            panel: Panel::Empty,
            message: Some(message),
        }
    }

    pub fn error(message: MessageKey) -> Self {
        Self {
            panel: Panel::Error,
            message: Some(message),
        }
    }

    pub fn panel(&self) -> Panel {
        self.panel
    }

    pub fn message(&self) -> Option<MessageKey> {
        self.message
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionNotice {
    pub message: MessageKey,
    pub is_transient: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub payload: Option<Vec<Fact>>,
    pub instruction: Option<DisplayInstruction>,
    pub notice: Option<ConnectionNotice>,
}

impl Classification {
    fn panel_only(instruction: DisplayInstruction) -> Self {
        Self {
            payload: None,
            instruction: Some(instruction),
            notice: None,
        }
    }
}

pub fn classify(outcome: FetchOutcome<Vec<Fact>>) -> Classification {
    match outcome {
        FetchOutcome::Success(facts) if facts.is_empty() => {
            Classification::panel_only(DisplayInstruction::empty(MessageKey::EmptySearch))
        }
        FetchOutcome::Success(facts) => Classification {
            payload: Some(facts),
            instruction: Some(DisplayInstruction::facts()),
            notice: None,
        },
        FetchOutcome::ApiError { status_code } => {
            Classification::panel_only(DisplayInstruction::error(api_error_message(status_code)))
        }
        FetchOutcome::ServerError => {
            Classification::panel_only(DisplayInstruction::error(MessageKey::ErrorServer))
        }
        FetchOutcome::ConnectionError => Classification {
            payload: None,
            instruction: None,
            notice: Some(ConnectionNotice {
                message: MessageKey::LostConnection,
                is_transient: true,
            }),
        },
    }
}

fn api_error_message(status_code: u16) -> MessageKey {
    match status_code {
        404 => MessageKey::Error404,
        400 => MessageKey::Error400,
        _ => MessageKey::ErrorGeneric,
    }
}
