use std::time::Duration;

use anyhow::Result;
use bridge_relay::LogEvent;
use camino::Utf8PathBuf;
use clap::Parser;
use harness_codegen::HarnessTemplate;
use harness_executor::{ExecutorOptions, Playground};
use log::{info, warn};
use playground_config::Config;

use crate::commands::read_source;
use crate::utils::styles::{fmt_error, fmt_event, fmt_success, fmt_transcript_summary};

#[derive(Debug, Clone, Parser)]
pub struct RunCmd {
    /// Script to run, `-` reads stdin. Without one the placeholder source is used
    pub file: Option<Utf8PathBuf>,

    /// Watchdog in seconds, `0` disables it. Overrides the config
    #[arg(long, short)]
    pub timeout: Option<u64>,

    /// Print the transcript as JSON once the session settles
    #[arg(long)]
    pub json: bool,
}

impl RunCmd {
    pub(crate) async fn handle(&self, cfg: Config) -> Result<()> {
        let source = read_source(self.file.as_ref())?;
        let template = HarnessTemplate::new(cfg.harness)?;
        let options = ExecutorOptions {
            timeout: match self.timeout {
                Some(0) => None,
                Some(secs) => Some(Duration::from_secs(secs)),
                None => cfg.executor.timeout(),
            },
        };

        let mut playground = Playground::new(template, options);
        if !self.json {
            playground
                .relay_mut()
                .add_observer(|event: &LogEvent| println!("{}", fmt_event(event)));
        }

        let result = playground.run(&source).await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(playground.transcript())?);
        }

        if result.success {
            info!(
                "{}",
                fmt_success(&fmt_transcript_summary(playground.transcript()))
            );
            return Ok(());
        }

        if let Some(error) = &result.error
            && let Some(stack) = &error.stack
        {
            warn!("{stack}");
        }
        info!("{}", fmt_transcript_summary(playground.transcript()));
        let reason = result
            .error
            .map_or_else(|| "Harness failed".to_string(), |e| e.message);
        anyhow::bail!(fmt_error(&reason))
    }
}
