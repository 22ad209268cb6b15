//! Terminal presentation of the coordinator's channels.

use client_core::{ConnectionNotice, DisplayInstruction, MessageKey, Panel};
use shared::domain::Fact;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::warn;

pub fn message_text(key: MessageKey) -> &'static str {
    match key {
        MessageKey::EmptySearch => "No facts matched your search.",
        MessageKey::Error404 => "Nothing was found for that request.",
        MessageKey::Error400 => "Searches must be between 3 and 120 characters long.",
        MessageKey::ErrorGeneric => "Something went wrong. Please try again.",
        MessageKey::ErrorServer => "The facts service is unavailable right now.",
        MessageKey::LostConnection => "Connection lost. Check your network and try again.",
    }
}

pub fn render_fact(fact: &Fact) -> String {
    let tag = if fact.is_uncategorized() {
        "uncategorized".to_string()
    } else {
        fact.categories.join(", ")
    };
    format!("[{tag}] {}", fact.value)
}

/// Holds the last published facts and turns panel switches into text.
#[derive(Debug, Default)]
pub struct Screen {
    facts: Vec<Fact>,
}

impl Screen {
    pub fn on_results(&mut self, facts: Vec<Fact>) {
        self.facts = facts;
    }

    pub fn on_panel(&self, instruction: DisplayInstruction) -> String {
        match (instruction.panel(), instruction.message()) {
            (Panel::Facts, _) => self
                .facts
                .iter()
                .map(render_fact)
                .collect::<Vec<_>>()
                .join("\n"),
            (Panel::Empty | Panel::Error, Some(key)) => message_text(key).to_string(),
            (Panel::Empty | Panel::Error, None) => String::new(),
        }
    }

    pub fn on_connection(&self, notice: ConnectionNotice) -> String {
        let text = message_text(notice.message);
        if notice.is_transient {
            format!("! {text}")
        } else {
            text.to_string()
        }
    }
}

/// Prints everything the coordinator publishes until all three channels close.
pub async fn observe(
    mut results: broadcast::Receiver<Vec<Fact>>,
    mut panel: broadcast::Receiver<DisplayInstruction>,
    mut connection: broadcast::Receiver<ConnectionNotice>,
) {
    let mut screen = Screen::default();
    let (mut results_open, mut panel_open, mut connection_open) = (true, true, true);

    while results_open || panel_open || connection_open {
        // Results are published before the panel switch that shows them.
        tokio::select! {
            biased;
            received = results.recv(), if results_open => match received {
                Ok(facts) => screen.on_results(facts),
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "results observer lagged"),
                Err(RecvError::Closed) => results_open = false,
            },
            received = panel.recv(), if panel_open => match received {
                Ok(instruction) => println!("{}", screen.on_panel(instruction)),
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "panel observer lagged"),
                Err(RecvError::Closed) => panel_open = false,
            },
            received = connection.recv(), if connection_open => match received {
                Ok(notice) => eprintln!("{}", screen.on_connection(notice)),
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "connection observer lagged"),
                Err(RecvError::Closed) => connection_open = false,
            },
        }
    }
}
