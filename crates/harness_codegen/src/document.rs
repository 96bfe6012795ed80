use std::fmt;
use std::ops::Range;

use crate::escape::unescape_js_string;

/// A generated harness document.
///
/// Never mutated after creation. Besides the full text it remembers where
/// the bridge script and the embedded source literal sit, so a hosting
/// surface without an HTML parser can evaluate just the script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessDocument {
    html: String,
    script: Range<usize>,
    literal: Range<usize>,
}

impl HarnessDocument {
    pub(crate) fn new(html: String, script: Range<usize>, literal: Range<usize>) -> Self {
        Self {
            html,
            script,
            literal,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.html
    }

    pub fn into_string(self) -> String {
        self.html
    }

    pub fn len(&self) -> usize {
        self.html.len()
    }

    pub fn is_empty(&self) -> bool {
        self.html.is_empty()
    }

    /// Body of the inline bridge script: console shim, error trap and the
    /// guarded evaluation block.
    pub fn inline_script(&self) -> &str {
        &self.html[self.script.clone()]
    }

    /// The escaped source exactly as it appears between the literal's quotes.
    pub fn embedded_literal(&self) -> &str {
        &self.html[self.literal.clone()]
    }

    /// Decodes the embedded literal back into the source it was built from.
    pub fn decoded_source(&self) -> String {
        unescape_js_string(self.embedded_literal())
    }
}

impl AsRef<str> for HarnessDocument {
    fn as_ref(&self) -> &str {
        &self.html
    }
}

impl fmt::Display for HarnessDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.html)
    }
}
