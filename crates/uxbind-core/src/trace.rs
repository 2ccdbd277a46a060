//! Diagnostic context for error attribution.

use std::fmt;
use std::sync::Arc;

/// Location in scripted code on whose behalf a conversion runs.
///
/// The runtime supplies one with every request; errors surfaced back to the
/// runtime carry it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TraceInfo {
    /// Script file (or other source label)
    pub file: Arc<str>,
    /// 1-indexed line, 0 when unknown
    pub line: u32,
    /// 1-indexed column, 0 when unknown
    pub column: u32,
}

impl TraceInfo {
    pub fn new(file: impl Into<Arc<str>>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }

    /// Trace for requests made outside any script location.
    pub fn unknown() -> Self {
        Self::new("<unknown>", 0, 0)
    }

    pub fn is_unknown(&self) -> bool {
        self.line == 0 && self.column == 0
    }
}

impl Default for TraceInfo {
    fn default() -> Self {
        Self::unknown()
    }
}

impl fmt::Display for TraceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unknown() {
            write!(f, "{}", self.file)
        } else {
            write!(f, "{}:{}:{}", self.file, self.line, self.column)
        }
    }
}
