//! Marshalling configuration.

/// Default upper bound for bytes read from a single stream.
pub const DEFAULT_MAX_STREAM_BYTES: u64 = 16 * 1024 * 1024;

/// Settings frozen into the registry at build time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarshalConfig {
    /// Maximum number of bytes a converter may read from one stream.
    pub max_stream_bytes: u64,
    /// Whether path strings are accepted as stream sources.
    pub allow_path_streams: bool,
    /// Whether wrapper classes without an explicit converter get a
    /// passthrough-only converter at build time.
    pub synthesize_wrapper_converters: bool,
}

impl Default for MarshalConfig {
    fn default() -> Self {
        Self {
            max_stream_bytes: DEFAULT_MAX_STREAM_BYTES,
            allow_path_streams: true,
            synthesize_wrapper_converters: true,
        }
    }
}

impl MarshalConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_stream_bytes(mut self, limit: u64) -> Self {
        self.max_stream_bytes = limit;
        self
    }

    pub fn with_path_streams(mut self, enabled: bool) -> Self {
        self.allow_path_streams = enabled;
        self
    }

    pub fn with_synthesized_converters(mut self, enabled: bool) -> Self {
        self.synthesize_wrapper_converters = enabled;
        self
    }
}
