use std::time::SystemTime;

use serde::Serialize;

use crate::event::{LogEvent, LogLevel};
use crate::relay::SessionId;

/// Append-only log of one session, in relay receive order.
#[derive(Debug, Clone, Serialize)]
pub struct LogTranscript {
    session: SessionId,
    events: Vec<LogEvent>,
    #[serde(skip)]
    last_sequence: u64,
}

impl LogTranscript {
    pub(crate) fn new(session: SessionId) -> Self {
        Self {
            session,
            events: Vec::new(),
            last_sequence: 0,
        }
    }

    pub(crate) fn push(&mut self, level: LogLevel, message: String) -> &LogEvent {
        self.last_sequence += 1;
        self.events.push(LogEvent {
            sequence: self.last_sequence,
            level,
            message,
            timestamp: SystemTime::now(),
        });
        &self.events[self.events.len() - 1]
    }

    /// Starts over for `session`; sequence numbers restart at 1.
    pub(crate) fn restart(&mut self, session: SessionId) {
        self.session = session;
        self.events.clear();
        self.last_sequence = 0;
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    pub fn events(&self) -> &[LogEvent] {
        &self.events
    }

    pub fn messages(&self) -> Vec<&str> {
        self.events.iter().map(|e| e.message.as_str()).collect()
    }

    pub fn errors(&self) -> impl Iterator<Item = &LogEvent> {
        self.events.iter().filter(|e| e.is_error())
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Log panel text: every event on its own `> ` line.
    pub fn render(&self) -> String {
        self.events
            .iter()
            .map(|e| format!("\n> {}", e.message))
            .collect()
    }
}
