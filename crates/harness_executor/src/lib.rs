//! # Harness executor
//!
//! A headless hosting surface for harness documents produced by
//! `harness_codegen`, plus the host-side [`Playground`] that ties encoder,
//! surface and relay together.
//!
//! Each session gets its own thread running a single-threaded V8 context
//! (`deno_core::JsRuntime`). The context sees the relay object the harness
//! expects (`Android.showLog` by default); every call is forwarded as a
//! message to the host task, which owns the transcript.
//!
//! The surface does not fetch the runtime library scripts of the document;
//! only the inline bridge script is evaluated.
//!
//! ```no_run
//! use harness_codegen::SourceDocument;
//! use harness_executor::Playground;
//!
//! # async fn example() -> harness_executor::Result<()> {
//! let mut playground = Playground::default();
//! let source = SourceDocument::new(r#"console.log("a"); console.log("b");"#);
//! let result = playground.run(&source).await?;
//!
//! assert!(result.success);
//! assert_eq!(playground.transcript().messages(), ["a", "b"]);
//! # Ok(())
//! # }
//! ```

mod ops;
mod playground;
mod surface;

use bridge_relay::SessionId;
use thiserror::Error;

pub use playground::Playground;
pub use surface::{
    ExecuteResult, ExecutionError, ExecutorOptions, HarnessSurface, RelayBinding, SessionRun,
    spawn_session,
};

pub type Result<T> = std::result::Result<T, ExecutorError>;

#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("Failed to start hosting surface thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Hosting surface bootstrap failed: {0}")]
    Bootstrap(String),

    #[error("Session {0} ended without reporting a result")]
    SessionLost(SessionId),
}

#[cfg(test)]
mod tests;
