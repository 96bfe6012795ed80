pub mod encode;
pub mod init;
pub mod run;

use std::io::Read;

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use harness_codegen::SourceDocument;

/// Reads the script snapshot: a file, `-` for stdin, or nothing at all.
pub(crate) fn read_source(path: Option<&Utf8PathBuf>) -> Result<SourceDocument> {
    let text = match path {
        None => None,
        Some(p) if p.as_str() == "-" => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read script from stdin")?;
            Some(buf)
        }
        Some(p) => Some(std::fs::read_to_string(p).context(format!("Failed to read script {p}"))?),
    };

    Ok(SourceDocument::from_snapshot(text))
}
