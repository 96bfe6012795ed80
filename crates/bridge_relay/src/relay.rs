use std::fmt;

use log::{debug, trace};
use serde::Serialize;
use tokio::sync::mpsc;

use crate::event::{LogEvent, LogLevel};
use crate::observer::TranscriptObserver;
use crate::transcript::LogTranscript;

/// Markers the default harness prefixes error reports with.
pub const DEFAULT_ERROR_MARKERS: [&str; 2] = ["ERROR:", "Execution Error:"];

/// Identifies one harness load. Increases with every reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SessionId(u64);

impl SessionId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug)]
struct RelayMessage {
    session: SessionId,
    message: String,
}

/// Script-side end of the relay.
///
/// Handed to the hosting surface for one session. Calls only enqueue onto
/// the host's channel; the transcript is touched exclusively by the task
/// that owns the [`HostRelay`].
#[derive(Debug, Clone)]
pub struct RelayHandle {
    session: SessionId,
    tx: mpsc::UnboundedSender<RelayMessage>,
}

impl RelayHandle {
    pub fn session(&self) -> SessionId {
        self.session
    }

    /// Fire-and-forget delivery of one console line.
    ///
    /// Once the host is gone this is a no-op.
    pub fn show_log(&self, message: impl Into<String>) {
        let msg = RelayMessage {
            session: self.session,
            message: message.into(),
        };
        if self.tx.send(msg).is_err() {
            debug!("relay host is gone, dropping log line from session {}", self.session);
        }
    }

    /// Whether the host end still exists.
    pub fn is_connected(&self) -> bool {
        !self.tx.is_closed()
    }
}

/// Host-side end of the relay; owns the transcript of the current session.
pub struct HostRelay {
    tx: mpsc::UnboundedSender<RelayMessage>,
    rx: mpsc::UnboundedReceiver<RelayMessage>,
    current: SessionId,
    transcript: LogTranscript,
    error_markers: Vec<String>,
    observers: Vec<Box<dyn TranscriptObserver>>,
}

impl HostRelay {
    pub fn new() -> Self {
        Self::with_error_markers(DEFAULT_ERROR_MARKERS)
    }

    /// A relay classifying messages that start with any of `markers` as errors.
    pub fn with_error_markers<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let current = SessionId(0);
        Self {
            tx,
            rx,
            current,
            transcript: LogTranscript::new(current),
            error_markers: markers.into_iter().map(Into::into).collect(),
            observers: Vec::new(),
        }
    }

    pub fn add_observer(&mut self, observer: impl TranscriptObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn session(&self) -> SessionId {
        self.current
    }

    pub fn transcript(&self) -> &LogTranscript {
        &self.transcript
    }

    /// Clears the transcript and re-arms the relay for a new document load.
    ///
    /// Returns the handle the new session's surface must use. Handles of
    /// earlier sessions keep working but their lines are discarded.
    pub fn reset_session(&mut self) -> RelayHandle {
        self.current = SessionId(self.current.0 + 1);
        self.transcript.restart(self.current);
        debug!("relay session {} started", self.current);

        for observer in &mut self.observers {
            observer.on_reset(self.current);
        }

        RelayHandle {
            session: self.current,
            tx: self.tx.clone(),
        }
    }

    /// Appends `message` to the current transcript and notifies observers.
    pub fn append_to_transcript(&mut self, message: impl Into<String>) -> &LogEvent {
        let message = message.into();
        let level = LogLevel::classify(&message, self.error_markers.as_slice());
        let event = self.transcript.push(level, message);
        trace!("relay #{} [{}] {}", event.sequence, event.level, event.message);

        for observer in &mut self.observers {
            observer.on_event(event);
        }
        event
    }

    /// Applies every message already queued, without waiting.
    ///
    /// Returns how many events were appended.
    pub fn pump(&mut self) -> usize {
        let mut appended = 0;
        while let Ok(msg) = self.rx.try_recv() {
            if self.accept(msg).is_some() {
                appended += 1;
            }
        }
        appended
    }

    /// Waits for the next event of the current session and appends it.
    ///
    /// Lines from superseded sessions are skipped while waiting.
    pub async fn next_event(&mut self) -> Option<LogEvent> {
        loop {
            let msg = self.rx.recv().await?;
            if let Some(event) = self.accept(msg) {
                return Some(event.clone());
            }
        }
    }

    fn accept(&mut self, msg: RelayMessage) -> Option<&LogEvent> {
        if msg.session != self.current {
            debug!(
                "discarding late log line from session {} (current {})",
                msg.session, self.current
            );
            return None;
        }
        Some(self.append_to_transcript(msg.message))
    }
}

impl Default for HostRelay {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HostRelay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostRelay")
            .field("current", &self.current)
            .field("transcript", &self.transcript.len())
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}
