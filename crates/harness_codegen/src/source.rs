/// Source substituted when the editor hands over no snapshot at all.
pub const NO_CODE_PLACEHOLDER: &str = "// No code provided";

/// Starter text of a fresh editor buffer.
pub const STARTER_SOURCE: &str = "// Write your Phaser game code here\nconsole.log(\"Hello, World!\");\n";

/// Immutable snapshot of the editor's script text, taken when execution is
/// requested.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceDocument {
    text: String,
}

impl SourceDocument {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// A missing snapshot becomes [`NO_CODE_PLACEHOLDER`]; an empty one is
    /// kept as is.
    pub fn from_snapshot(text: Option<String>) -> Self {
        Self::new(text.unwrap_or_else(|| NO_CODE_PLACEHOLDER.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl From<&str> for SourceDocument {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SourceDocument {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}
