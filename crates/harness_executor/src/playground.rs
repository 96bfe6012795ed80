use bridge_relay::{HostRelay, LogTranscript};
use harness_codegen::{HarnessTemplate, SourceDocument};
use log::info;

use crate::surface::{ExecuteResult, ExecutorOptions, RelayBinding, SessionRun, spawn_session};
use crate::{ExecutorError, Result};

/// The host side of the playground: encodes sources, runs each one as a new
/// session and owns the relay transcript.
///
/// Lives on the host's task; every transcript mutation happens there.
#[derive(Debug)]
pub struct Playground {
    template: HarnessTemplate,
    binding: RelayBinding,
    options: ExecutorOptions,
    relay: HostRelay,
}

impl Playground {
    pub fn new(template: HarnessTemplate, options: ExecutorOptions) -> Self {
        let markers = [
            template.options().error_marker.clone(),
            template.options().execution_error_marker.clone(),
        ];
        Self {
            binding: RelayBinding::for_template(&template),
            relay: HostRelay::with_error_markers(markers),
            template,
            options,
        }
    }

    pub fn template(&self) -> &HarnessTemplate {
        &self.template
    }

    pub fn relay(&self) -> &HostRelay {
        &self.relay
    }

    /// For registering observers.
    pub fn relay_mut(&mut self) -> &mut HostRelay {
        &mut self.relay
    }

    pub fn transcript(&self) -> &LogTranscript {
        self.relay.transcript()
    }

    /// Starts a new session for `source` without waiting for it.
    ///
    /// The previous transcript is cleared first; lines still arriving from
    /// an older session are discarded.
    ///
    /// # Errors
    ///
    /// Fails if the surface thread cannot be spawned.
    pub fn launch(&mut self, source: &SourceDocument) -> Result<SessionRun> {
        let relay = self.relay.reset_session();
        let document = self.template.encode_source(source);
        info!(
            "launching session {} ({} bytes of source)",
            relay.session(),
            source.as_str().len()
        );
        spawn_session(document, self.binding.clone(), relay, self.options)
    }

    /// Relays events of `run` into the transcript as they arrive until the
    /// surface settles.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutorError::SessionLost`] if the surface thread died
    /// without reporting.
    pub async fn finish(&mut self, run: SessionRun) -> Result<ExecuteResult> {
        let (session, mut done) = run.into_parts();

        let result = loop {
            tokio::select! {
                result = &mut done => break result.map_err(|_| ExecutorError::SessionLost(session))?,
                _ = self.relay.next_event() => {}
            }
        };

        // everything sent before the result is already queued
        self.relay.pump();
        Ok(result)
    }

    /// Launches `source` and waits for its session to settle.
    ///
    /// # Errors
    ///
    /// See [`Playground::launch`] and [`Playground::finish`].
    pub async fn run(&mut self, source: &SourceDocument) -> Result<ExecuteResult> {
        let run = self.launch(source)?;
        self.finish(run).await
    }
}

impl Default for Playground {
    fn default() -> Self {
        Self::new(HarnessTemplate::default(), ExecutorOptions::default())
    }
}
