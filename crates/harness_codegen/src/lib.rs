//! # Harness codegen
//!
//! Turns user-authored JavaScript into a self-contained harness document that
//! a web view (or the headless surface in `harness_executor`) can load.
//!
//! The document carries, in order:
//! - the runtime library scripts and a mount element
//! - a console shim, installed once, that passes every `console.log` call
//!   through and forwards it to the host relay
//! - a `window.onerror` trap reporting uncaught errors through the relay
//! - a guarded block evaluating the escaped source
//!
//! ```
//! let doc = harness_codegen::encode("console.log(\"hi\");");
//! assert!(doc.as_str().contains(r#"const userCode = "console.log(\"hi\");";"#));
//! ```

mod document;
pub mod escape;
mod source;
mod template;

use thiserror::Error;

pub use document::HarnessDocument;
pub use source::{NO_CODE_PLACEHOLDER, STARTER_SOURCE, SourceDocument};
pub use template::{HarnessOptions, HarnessTemplate, encode};

pub type CodegenResult<T> = Result<T, CodegenError>;

#[derive(Debug, Error)]
pub enum CodegenError {
    #[error("Invalid harness option `{option}`: {reason}")]
    InvalidOption {
        option: &'static str,
        reason: String,
    },

    #[error("Template render error: {0}")]
    Render(#[from] handlebars::RenderError),

    #[error("Malformed harness template: {0}")]
    Template(String),
}

#[cfg(test)]
mod tests;
