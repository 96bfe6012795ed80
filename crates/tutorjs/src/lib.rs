pub mod commands;
pub mod utils;

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};

use crate::commands::{encode::EncodeCmd, init::InitCmd, run::RunCmd};
use playground_config::Config;

#[derive(Parser)]
#[command(name = "tutorjs")]
#[command(version)]
#[command(about = "tutorjs - Phaser script playground")]
#[command(
    long_about = "tutorjs wraps a JavaScript (Phaser) script in a harness document that intercepts the console, \
traps uncaught errors and relays every log line back to the host. The harness can be written out for a web view \
or run headless with the transcript streamed to the terminal."
)]
#[command(after_help = "EXAMPLES:\n  \
    tutorjs init\n  \
    tutorjs encode main.js -o game.html\n  \
    tutorjs run main.js\n  \
    cat main.js | tutorjs run - --json\n\
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file path, defaults to ./tutorjs.json
    #[arg(long, short = 'c', global = true, default_value_t = Config::default_path())]
    pub config: Utf8PathBuf,

    /// No logging except for errors
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Verbose logging (-v) or trace logging (-vv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

impl Cli {
    #[allow(clippy::missing_errors_doc)]
    pub async fn handle(&self) -> anyhow::Result<()> {
        match &self.command {
            Commands::Init(cmd) => cmd.handle(&self.config),
            Commands::Encode(cmd) => cmd.handle(Config::load(&self.config)?),
            Commands::Run(cmd) => cmd.handle(Config::load(&self.config)?).await,
        }
    }
}

#[derive(Debug, Subcommand)]
#[command(styles=utils::styles::get_styles())]
pub enum Commands {
    /// Write a default config and a starter script
    #[command(long_about = "Writes tutorjs.json with default harness settings and a main.js starter script.")]
    Init(InitCmd),

    /// Write the harness document for a script
    #[command(long_about = "Encodes a script into a self-contained HTML harness document.")]
    Encode(EncodeCmd),

    /// Run a script headless and stream its console
    #[command(
        long_about = "Runs a script inside the harness on a headless surface and prints every relayed console line."
    )]
    Run(RunCmd),
}
