use std::io::Write;

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use clap::Parser;
use harness_codegen::HarnessTemplate;
use log::info;
use playground_config::Config;

use crate::commands::read_source;
use crate::utils::styles::{fmt_bold, fmt_success};

#[derive(Debug, Clone, Parser)]
pub struct EncodeCmd {
    /// Script to encode, `-` reads stdin. Without one the placeholder source is used
    pub file: Option<Utf8PathBuf>,

    /// Write the document here instead of stdout
    #[arg(long, short)]
    pub output: Option<Utf8PathBuf>,
}

impl EncodeCmd {
    pub(crate) fn handle(&self, cfg: Config) -> Result<()> {
        let source = read_source(self.file.as_ref())?;
        let template = HarnessTemplate::new(cfg.harness)?;
        let document = template.encode_source(&source);

        match &self.output {
            Some(path) => {
                std::fs::write(path, document.as_str())
                    .context(format!("Failed to write harness document {path}"))?;
                info!(
                    "{}",
                    fmt_success(&format!(
                        "Wrote {} ({} bytes)",
                        fmt_bold(path.as_str()),
                        document.len()
                    ))
                );
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(document.as_str().as_bytes())?;
                stdout.flush()?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_writes_document() {
        let dir = tempfile::tempdir().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("temp dir is utf-8");
        let script = root.join("main.js");
        std::fs::write(&script, "console.log(\"hi\");\n").expect("write");

        let cmd = EncodeCmd {
            file: Some(script),
            output: Some(root.join("game.html")),
        };
        cmd.handle(Config::default()).expect("encode");

        let html = std::fs::read_to_string(root.join("game.html")).expect("read");
        assert!(html.contains(r#"const userCode = "console.log(\"hi\");\n";"#));
        assert!(html.contains("Android.showLog(message);"));
    }

    #[test]
    fn test_missing_script_uses_placeholder() {
        let dir = tempfile::tempdir().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("temp dir is utf-8");

        let cmd = EncodeCmd {
            file: None,
            output: Some(root.join("game.html")),
        };
        cmd.handle(Config::default()).expect("encode");

        let html = std::fs::read_to_string(root.join("game.html")).expect("read");
        assert!(html.contains(r#"const userCode = "// No code provided";"#));
    }

    #[test]
    fn test_unreadable_script_is_an_error() {
        let cmd = EncodeCmd {
            file: Some(Utf8PathBuf::from("/definitely/not/here.js")),
            output: None,
        };
        let err = cmd.handle(Config::default()).expect_err("should fail");
        assert!(err.to_string().contains("Failed to read script"), "{err}");
    }
}
