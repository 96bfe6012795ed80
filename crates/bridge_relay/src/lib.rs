//! # Bridge relay
//!
//! The single crossing point between a hosted script context and the host.
//!
//! The script side holds a [`RelayHandle`] and calls
//! [`RelayHandle::show_log`] from whatever thread the execution context runs
//! on. Nothing is mutated there: each line is queued on a channel. The host
//! side, a [`HostRelay`] owned by one task, drains the channel and appends to
//! the [`LogTranscript`], so all mutation is serialized on that task without
//! locks.
//!
//! ```
//! use bridge_relay::HostRelay;
//!
//! let mut host = HostRelay::new();
//! let handle = host.reset_session();
//!
//! std::thread::spawn(move || {
//!     handle.show_log("a");
//!     handle.show_log("ERROR: boom at line 1");
//! })
//! .join()
//! .unwrap();
//!
//! assert_eq!(host.pump(), 2);
//! assert_eq!(host.transcript().messages(), ["a", "ERROR: boom at line 1"]);
//! assert_eq!(host.transcript().errors().count(), 1);
//! ```

mod event;
mod observer;
mod relay;
mod transcript;

pub use event::{LogEvent, LogLevel};
pub use observer::TranscriptObserver;
pub use relay::{DEFAULT_ERROR_MARKERS, HostRelay, RelayHandle, SessionId};
pub use transcript::LogTranscript;

#[cfg(test)]
mod tests;
