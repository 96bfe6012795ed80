use anyhow::Result;
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use harness_codegen::STARTER_SOURCE;
use log::info;
use playground_config::Config;

use crate::utils::styles::{fmt_bold, fmt_dimmed, fmt_success};

#[derive(Debug, Clone, Parser)]
pub struct InitCmd {
    /// Starter script to create next to the config
    #[arg(long, default_value = "main.js")]
    pub script: Utf8PathBuf,

    /// Overwrite existing files
    #[arg(long, short)]
    pub force: bool,
}

impl InitCmd {
    pub(crate) fn handle(&self, config_path: &Utf8Path) -> Result<()> {
        self.refuse_overwrite(config_path)?;
        self.refuse_overwrite(&self.script)?;

        Config::default().save(config_path)?;
        std::fs::write(&self.script, STARTER_SOURCE)?;

        info!(
            "{}",
            fmt_success(&format!(
                "Created {} and {}",
                fmt_bold(config_path.as_str()),
                fmt_bold(self.script.as_str())
            ))
        );
        info!("");
        info!(
            "Run {cmd} to try it out",
            cmd = fmt_bold(&format!("tutorjs run {}", self.script))
        );

        Ok(())
    }

    fn refuse_overwrite(&self, path: &Utf8Path) -> Result<()> {
        if path.exists() && !self.force {
            anyhow::bail!(
                "{} already exists, use --force to overwrite it",
                fmt_dimmed(path.as_str())
            );
        }
        Ok(())
    }
}
