use std::sync::LazyLock;

use handlebars::Handlebars;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    CodegenError, CodegenResult, SourceDocument, document::HarnessDocument,
    escape::escape_js_string,
};

static HARNESS_TEMPLATE: &str = include_str!("./harness.handlebars");

// Stands in for the escaped source while the template renders. Contains
// control characters that can never survive option validation.
const SOURCE_SENTINEL: &str = "\u{1}__tutorjs_source__\u{1}";

static JS_IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("invalid identifier regex"));
static HTML_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_-]*$").expect("invalid html id regex"));
static CSS_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#[0-9A-Fa-f]{3,8}|[A-Za-z]+)$").expect("invalid color regex"));

static DEFAULT_TEMPLATE: LazyLock<HarnessTemplate> = LazyLock::new(|| {
    HarnessTemplate::new(HarnessOptions::default()).expect("default harness options are valid")
});

/// Knobs of the generated harness document.
///
/// The relay names must match the object the hosting surface exposes to the
/// script context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HarnessOptions {
    pub title: String,
    /// Runtime library scripts loaded before the bridge script
    pub runtime_scripts: Vec<String>,
    pub mount_id: String,
    pub background: String,
    pub relay_object: String,
    pub relay_method: String,
    /// Prefix of messages produced by the global error trap
    pub error_marker: String,
    /// Prefix of messages produced when evaluating the source throws
    pub execution_error_marker: String,
}

impl Default for HarnessOptions {
    fn default() -> Self {
        Self {
            title: "Phaser Game".into(),
            runtime_scripts: vec![
                "https://cdnjs.cloudflare.com/ajax/libs/phaser/3.55.0/phaser.min.js".into(),
            ],
            mount_id: "game-container".into(),
            background: "#0e0f12".into(),
            relay_object: "Android".into(),
            relay_method: "showLog".into(),
            error_marker: "ERROR:".into(),
            execution_error_marker: "Execution Error:".into(),
        }
    }
}

impl HarnessOptions {
    /// Checks that every option can be placed in its slot of the template
    /// without changing the document structure.
    ///
    /// # Errors
    ///
    /// Returns [`CodegenError::InvalidOption`] naming the first offending option.
    pub fn validate(&self) -> CodegenResult<()> {
        for (name, value) in [
            ("relayObject", &self.relay_object),
            ("relayMethod", &self.relay_method),
        ] {
            if !JS_IDENTIFIER.is_match(value) {
                return Err(invalid(name, format!("`{value}` is not a JavaScript identifier")));
            }
        }

        if !HTML_ID.is_match(&self.mount_id) {
            return Err(invalid("mountId", format!("`{}` is not a plain element id", self.mount_id)));
        }

        if !CSS_COLOR.is_match(&self.background) {
            return Err(invalid("background", format!("`{}` is not a color", self.background)));
        }

        for url in &self.runtime_scripts {
            if url.is_empty() || url.contains(['"', '<', '>']) || url.chars().any(char::is_control) {
                return Err(invalid("runtimeScripts", format!("`{url}` is not a usable script URL")));
            }
        }

        for (name, value) in [
            ("title", &self.title),
            ("errorMarker", &self.error_marker),
            ("executionErrorMarker", &self.execution_error_marker),
        ] {
            if value.chars().any(char::is_control) {
                return Err(invalid(name, "control characters are not allowed".into()));
            }
        }

        Ok(())
    }
}

fn invalid(option: &'static str, reason: String) -> CodegenError {
    CodegenError::InvalidOption { option, reason }
}

/// A harness template rendered once for a set of options.
///
/// Rendering splits the document around the source literal, so encoding a
/// source is only escaping plus concatenation and cannot fail.
#[derive(Debug, Clone)]
pub struct HarnessTemplate {
    options: HarnessOptions,
    head: String,
    tail: String,
    // byte offset in `head` where the bridge script body starts
    script_start: usize,
    // byte offset in `tail` where the bridge script body ends
    script_end: usize,
}

impl HarnessTemplate {
    /// Validates `options` and renders the template around a placeholder.
    ///
    /// # Errors
    ///
    /// Fails on invalid options or if the rendered template is malformed.
    pub fn new(options: HarnessOptions) -> CodegenResult<Self> {
        options.validate()?;

        let mut hb = Handlebars::new();
        hb.set_strict_mode(true);

        let rendered = hb.render_template(
            HARNESS_TEMPLATE,
            &json!({
                "title": options.title,
                "runtime_scripts": options.runtime_scripts,
                "mount_id": options.mount_id,
                "background": options.background,
                "relay_object": options.relay_object,
                "relay_method": options.relay_method,
                "error_marker": js_string_literal(&options.error_marker),
                "execution_error_marker": js_string_literal(&options.execution_error_marker),
                "source_literal": SOURCE_SENTINEL,
            }),
        )?;

        if rendered.matches(SOURCE_SENTINEL).count() != 1 {
            return Err(CodegenError::Template(
                "expected exactly one source placeholder".into(),
            ));
        }
        let Some((head, tail)) = rendered.split_once(SOURCE_SENTINEL) else {
            return Err(CodegenError::Template("missing source placeholder".into()));
        };

        let script_start = head
            .rfind("<script>")
            .map(|i| i + "<script>".len())
            .ok_or_else(|| CodegenError::Template("missing bridge script element".into()))?;
        let script_end = tail
            .find("</script>")
            .ok_or_else(|| CodegenError::Template("unterminated bridge script element".into()))?;

        Ok(Self {
            options,
            head: head.to_string(),
            tail: tail.to_string(),
            script_start,
            script_end,
        })
    }

    pub fn options(&self) -> &HarnessOptions {
        &self.options
    }

    /// Builds the harness document for `source`. Pure: equal input gives an
    /// equal document.
    pub fn encode(&self, source: &str) -> HarnessDocument {
        let escaped = escape_js_string(source);

        let mut html = String::with_capacity(self.head.len() + escaped.len() + self.tail.len());
        html.push_str(&self.head);
        html.push_str(&escaped);
        html.push_str(&self.tail);

        let literal_start = self.head.len();
        let literal_end = literal_start + escaped.len();

        HarnessDocument::new(
            html,
            self.script_start..literal_end + self.script_end,
            literal_start..literal_end,
        )
    }

    pub fn encode_source(&self, source: &SourceDocument) -> HarnessDocument {
        self.encode(source.as_str())
    }
}

impl Default for HarnessTemplate {
    fn default() -> Self {
        DEFAULT_TEMPLATE.clone()
    }
}

/// Encodes `source` with the default harness options.
pub fn encode(source: &str) -> HarnessDocument {
    DEFAULT_TEMPLATE.encode(source)
}

fn js_string_literal(value: &str) -> String {
    format!("\"{}\"", escape_js_string(value))
}
