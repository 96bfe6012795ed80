use crate::event::LogEvent;
use crate::relay::SessionId;

/// Something that renders the transcript as it grows, e.g. a log panel.
///
/// Called on the host task, after the event has been appended.
pub trait TranscriptObserver {
    fn on_event(&mut self, event: &LogEvent);

    /// The transcript was cleared for `session`.
    fn on_reset(&mut self, _session: SessionId) {}
}

impl<F> TranscriptObserver for F
where
    F: FnMut(&LogEvent),
{
    fn on_event(&mut self, event: &LogEvent) {
        self(event);
    }
}
