use std::sync::Arc;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::JoinHandle;
use std::time::Duration;

use bridge_relay::{RelayHandle, SessionId};
use deno_core::{JsRuntime, PollEventLoopOptions, RuntimeOptions, v8};
use harness_codegen::{HarnessDocument, HarnessTemplate};
use log::{debug, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use crate::{ExecutorError, Result};

// Exposes the relay to the script context.
deno_core::extension!(
    harness_host,
    ops = [crate::ops::op_show_log, crate::ops::op_console_passthrough],
    options = {
        relay: RelayHandle,
    },
    state = |state, options| {
        state.put(options.relay);
    },
);

static FRAME_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":(\d+):\d+\)?\s*$").expect("invalid frame regex"));

/// Name of the host object and method the harness calls into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayBinding {
    object: String,
    method: String,
}

impl RelayBinding {
    /// The binding a template's documents expect. Template options are
    /// validated, so both names are plain identifiers.
    pub fn for_template(template: &HarnessTemplate) -> Self {
        Self {
            object: template.options().relay_object.clone(),
            method: template.options().relay_method.clone(),
        }
    }

    pub fn object(&self) -> &str {
        &self.object
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    // The relay method takes strings only; anything else is dropped.
    fn bootstrap_script(&self) -> String {
        format!(
            r#"
            globalThis.window ??= globalThis;
            globalThis.console = {{
                log: (...args) =>
                    Deno.core.ops.op_console_passthrough(args.map((arg) => String(arg)).join(" ")),
            }};
            globalThis.{object} = {{
                {method}(message) {{
                    if (typeof message !== "string") {{
                        return;
                    }}
                    Deno.core.ops.op_show_log(message);
                }},
            }};
            "#,
            object = self.object,
            method = self.method,
        )
    }
}

impl Default for RelayBinding {
    fn default() -> Self {
        Self::for_template(&HarnessTemplate::default())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionError {
    pub message: String,
    pub stack: Option<String>,
}

impl ExecutionError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            stack: None,
        }
    }

    fn from_js(err: &impl ToString) -> Self {
        let full = err.to_string();
        let mut lines = full.lines();
        let message = lines.next().unwrap_or_default().to_string();
        let stack: Vec<&str> = lines.collect();

        Self {
            message,
            stack: (!stack.is_empty()).then(|| stack.join("\n")),
        }
    }

    /// Line of the innermost stack frame, when the error carries one.
    pub fn line(&self) -> Option<u32> {
        self.stack
            .as_deref()?
            .lines()
            .find_map(|l| FRAME_LINE.captures(l))
            .and_then(|c| c[1].parse().ok())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecuteResult {
    /// The harness loaded and ran to completion; errors in user code are
    /// reported through the transcript and do not clear this flag
    pub success: bool,

    /// The watchdog ended the session
    pub timed_out: bool,

    /// Error that escaped the harness's own guards (if any)
    pub error: Option<ExecutionError>,
}

impl ExecuteResult {
    fn ok() -> Self {
        Self {
            success: true,
            timed_out: false,
            error: None,
        }
    }

    pub(crate) fn failed(error: ExecutionError) -> Self {
        Self {
            success: false,
            timed_out: false,
            error: Some(error),
        }
    }

    fn timed_out(timeout: Duration) -> Self {
        Self {
            success: false,
            timed_out: true,
            error: Some(ExecutionError::new(format!(
                "Execution timed out after {} seconds",
                timeout.as_secs_f64()
            ))),
        }
    }
}

/// Host-imposed limits of one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutorOptions {
    /// Watchdog; `None` lets a session run forever
    pub timeout: Option<Duration>,
}

impl Default for ExecutorOptions {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(10)),
        }
    }
}

/// A headless hosting surface: one isolated V8 context with the relay object
/// installed.
///
/// `JsRuntime` is `!Send`, so a surface lives and dies on one thread.
pub struct HarnessSurface {
    runtime: JsRuntime,
    session: SessionId,
}

impl HarnessSurface {
    /// Creates the context and installs `binding` backed by `relay`.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutorError::Bootstrap`] if the binding script fails.
    pub fn new(binding: &RelayBinding, relay: RelayHandle) -> Result<Self> {
        let session = relay.session();
        let mut runtime = JsRuntime::new(RuntimeOptions {
            extensions: vec![harness_host::init(relay)],
            ..Default::default()
        });

        runtime
            .execute_script("<host_bootstrap>", binding.bootstrap_script())
            .map_err(|e| ExecutorError::Bootstrap(e.to_string()))?;

        Ok(Self { runtime, session })
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    /// Loads the document's bridge script and drives the event loop until it
    /// settles.
    ///
    /// Anything that escapes the harness's guards is handed to the
    /// document's `onerror`, as a browser would.
    pub async fn load(&mut self, document: &HarnessDocument, timeout: Option<Duration>) -> ExecuteResult {
        let watchdog = timeout.map(|t| Watchdog::arm(self.runtime.v8_isolate().thread_safe_handle(), t));

        let outcome = match self
            .runtime
            .execute_script("<harness>", document.inline_script().to_string())
        {
            Ok(_) => self
                .runtime
                .run_event_loop(PollEventLoopOptions::default())
                .await
                .map_err(|e| ExecutionError::from_js(&e)),
            Err(e) => Err(ExecutionError::from_js(&e)),
        };

        let fired = watchdog.is_some_and(Watchdog::disarm);
        if fired {
            // the watchdog may fire after the script already settled
            self.runtime.v8_isolate().cancel_terminate_execution();
            if outcome.is_err() {
                warn!("session {} terminated by watchdog", self.session);
                return ExecuteResult::timed_out(timeout.unwrap_or_default());
            }
        }

        match outcome {
            Ok(()) => ExecuteResult::ok(),
            Err(error) => {
                debug!("session {} uncaught: {}", self.session, error.message);
                self.dispatch_onerror(&error);
                ExecuteResult::failed(error)
            }
        }
    }

    /// Runs an extra script in the already loaded context.
    ///
    /// # Errors
    ///
    /// Returns the script's uncaught error.
    pub fn evaluate(&mut self, name: &'static str, script: impl Into<String>) -> std::result::Result<(), ExecutionError> {
        self.runtime
            .execute_script(name, script.into())
            .map(|_| ())
            .map_err(|e| ExecutionError::from_js(&e))
    }

    fn dispatch_onerror(&mut self, error: &ExecutionError) {
        let message = serde_json::to_string(&error.message).unwrap_or_else(|_| "\"\"".into());
        let line = error
            .line()
            .map_or_else(|| "undefined".to_string(), |l| l.to_string());

        let script = format!(
            r#"if (typeof globalThis.onerror === "function") {{
                globalThis.onerror({message}, "harness", {line});
            }}"#
        );
        if let Err(e) = self.evaluate("<onerror>", script) {
            warn!("session {} onerror handler failed: {}", self.session, e.message);
        }
    }
}

struct Watchdog {
    cancel: mpsc::Sender<()>,
    fired: Arc<AtomicBool>,
    thread: JoinHandle<()>,
}

impl Watchdog {
    fn arm(isolate: v8::IsolateHandle, timeout: Duration) -> Self {
        let (cancel, cancelled) = mpsc::channel::<()>();
        let fired = Arc::new(AtomicBool::new(false));
        let flag = fired.clone();

        let thread = std::thread::spawn(move || {
            if let Err(RecvTimeoutError::Timeout) = cancelled.recv_timeout(timeout) {
                flag.store(true, Ordering::SeqCst);
                isolate.terminate_execution();
            }
        });

        Self {
            cancel,
            fired,
            thread,
        }
    }

    /// Stops the watchdog; reports whether it already fired.
    fn disarm(self) -> bool {
        drop(self.cancel);
        let _ = self.thread.join();
        self.fired.load(Ordering::SeqCst)
    }
}

/// A session running on its own thread.
#[derive(Debug)]
pub struct SessionRun {
    session: SessionId,
    done: oneshot::Receiver<ExecuteResult>,
}

impl SessionRun {
    pub fn session(&self) -> SessionId {
        self.session
    }

    pub(crate) fn into_parts(self) -> (SessionId, oneshot::Receiver<ExecuteResult>) {
        (self.session, self.done)
    }
}

/// Loads `document` on a fresh surface running on a dedicated thread.
///
/// Relay calls cross back to the host through `relay`; the returned
/// [`SessionRun`] resolves once the surface has settled.
///
/// # Errors
///
/// Returns [`ExecutorError::Spawn`] if the thread cannot be started.
pub fn spawn_session(
    document: HarnessDocument,
    binding: RelayBinding,
    relay: RelayHandle,
    options: ExecutorOptions,
) -> Result<SessionRun> {
    let session = relay.session();
    let (done_tx, done) = oneshot::channel();

    std::thread::Builder::new()
        .name(format!("tutorjs-surface-{session}"))
        .spawn(move || {
            let result = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt.block_on(async {
                    match HarnessSurface::new(&binding, relay) {
                        Ok(mut surface) => surface.load(&document, options.timeout).await,
                        Err(e) => ExecuteResult::failed(ExecutionError::new(e.to_string())),
                    }
                }),
                Err(e) => ExecuteResult::failed(ExecutionError::new(format!(
                    "Failed to start surface runtime: {e}"
                ))),
            };

            if done_tx.send(result).is_err() {
                debug!("session {session} finished after the host stopped waiting");
            }
        })?;

    Ok(SessionRun { session, done })
}
