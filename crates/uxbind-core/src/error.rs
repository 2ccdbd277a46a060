//! Error types for the marshalling layer.
//!
//! ## Error Hierarchy
//!
//! ```text
//! MarshalError (what the scripting runtime sees, carries the TraceInfo)
//! ├── ConversionError     - value cannot satisfy the target type
//! │   └── ResourceError   - backing stream could not be opened or read
//! ├── NativeError         - failure inside a delegated property/method call
//! └── ConfigurationError  - bad registrations or unregistered types
//! ```
//!
//! Nothing in this layer recovers from or retries any of these.

use thiserror::Error;

use crate::trace::TraceInfo;
use crate::value::StreamHandle;

// ============================================================================
// Resource Errors
// ============================================================================

/// Failure opening or reading a stream during native object construction.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// The value cannot be used as a stream source.
    #[error("a {kind} value cannot be opened as a stream")]
    Unsupported { kind: &'static str },

    /// The stream handle is not known to the stream provider.
    #[error("unknown stream handle {0}")]
    UnknownHandle(StreamHandle),

    /// Path strings are not accepted as stream sources.
    #[error("path streams are disabled, cannot open '{path}'")]
    PathsDisabled { path: String },

    /// The stream is longer than the configured read limit.
    #[error("stream exceeds the read limit of {limit} bytes")]
    TooLarge { limit: u64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// ============================================================================
// Conversion Errors
// ============================================================================

/// A value's tag or shape cannot satisfy the target type's construction or
/// passthrough rules.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// The value's kind is incompatible with the target type.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        expected: String,
        actual: &'static str,
    },

    /// Null passed where the target type has no null representation.
    #[error("null cannot be converted to {target}")]
    NullValue { target: &'static str },

    /// Integer does not fit the target width.
    #[error("integer overflow: value {value} does not fit in {target}")]
    IntegerOverflow { value: i64, target: &'static str },

    /// The toolkit rejected the construction input.
    #[error("cannot construct {target}: {message}")]
    Construction { target: String, message: String },

    /// The backing stream failed.
    #[error("cannot construct {target} from stream")]
    Resource {
        target: String,
        #[source]
        source: ResourceError,
    },
}

impl ConversionError {
    /// Create a type mismatch error for a value of the given kind.
    pub fn mismatch(expected: impl Into<String>, actual: &'static str) -> Self {
        ConversionError::TypeMismatch {
            expected: expected.into(),
            actual,
        }
    }

    pub fn construction(target: impl Into<String>, message: impl Into<String>) -> Self {
        ConversionError::Construction {
            target: target.into(),
            message: message.into(),
        }
    }

    pub fn resource(target: impl Into<String>, source: ResourceError) -> Self {
        ConversionError::Resource {
            target: target.into(),
            source,
        }
    }
}

// ============================================================================
// Native Errors
// ============================================================================

/// Errors raised while delegating a property access, method call or
/// constructor to the native object.
#[derive(Debug, Error)]
pub enum NativeError {
    /// Error converting arguments or return values
    #[error("conversion error: {0}")]
    Conversion(#[from] ConversionError),

    /// The class does not declare the member.
    #[error("{class} has no member '{member}'")]
    UnknownMember { class: String, member: String },

    /// The property has no setter.
    #[error("property {class}::{property} is read-only")]
    ReadOnlyProperty { class: String, property: String },

    /// No overload accepts the arguments.
    #[error("no overload of {callee} accepts ({args})")]
    NoMatchingOverload { callee: String, args: String },

    /// More than one overload accepts the arguments equally well.
    #[error("call to {callee} with ({args}) is ambiguous")]
    AmbiguousOverload { callee: String, args: String },

    /// Argument index out of bounds
    #[error("argument index {index} out of bounds (call has {count} arguments)")]
    ArgumentIndexOutOfBounds { index: usize, count: usize },

    /// Invalid `this` reference for a member call
    #[error("invalid 'this' reference: {message}")]
    InvalidThis { message: String },

    /// The toolkit reported a failure.
    #[error("toolkit error: {message}")]
    Toolkit { message: String },
}

impl NativeError {
    pub fn invalid_this(message: impl Into<String>) -> Self {
        NativeError::InvalidThis {
            message: message.into(),
        }
    }

    pub fn toolkit(message: impl Into<String>) -> Self {
        NativeError::Toolkit {
            message: message.into(),
        }
    }
}

// ============================================================================
// Configuration Errors
// ============================================================================

/// Bad converter registrations, or a request for a type nobody serves.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// A converter declared no supported types.
    #[error("converter '{converter}' declares no supported types")]
    EmptyConverter { converter: String },

    /// Two converters claim the same foreign type.
    #[error("type {type_name} is claimed by both '{existing}' and '{incoming}'")]
    OverlappingConverters {
        type_name: String,
        existing: String,
        incoming: String,
    },

    /// More than one equally specific supertype converter matches.
    #[error("ambiguous converter for {type_name}: candidates {}", candidates.join(", "))]
    AmbiguousConverter {
        type_name: String,
        candidates: Vec<String>,
    },

    /// No converter serves the type or any of its supertypes.
    #[error("no converter registered for {type_name}")]
    UnregisteredType { type_name: String },

    /// A subtype edge names a type that was never declared.
    #[error("unknown foreign type: {type_name}")]
    UnknownType { type_name: String },

    /// A subtype edge would make a type its own ancestor.
    #[error("declaring {child} as a subtype of {parent} creates a cycle")]
    CyclicHierarchy { child: String, parent: String },

    /// Two wrapper classes share a qualified name.
    #[error("duplicate wrapper class: {name}")]
    DuplicateClass { name: String },

    /// No wrapper class with this name is registered.
    #[error("unknown wrapper class: {name}")]
    UnknownClass { name: String },
}

// ============================================================================
// Marshal Errors
// ============================================================================

/// Error surfaced to the scripting runtime.
#[derive(Debug, Error)]
pub enum MarshalError {
    #[error("{trace}: {source}")]
    Conversion {
        trace: TraceInfo,
        #[source]
        source: ConversionError,
    },

    #[error("{trace}: {source}")]
    Native {
        trace: TraceInfo,
        #[source]
        source: NativeError,
    },

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

impl MarshalError {
    pub fn conversion(trace: &TraceInfo, source: ConversionError) -> Self {
        MarshalError::Conversion {
            trace: trace.clone(),
            source,
        }
    }

    /// Attribute a native failure to `trace`.
    ///
    /// Conversion failures raised inside the call are surfaced as
    /// [`MarshalError::Conversion`] so callers see one shape for them.
    pub fn native(trace: &TraceInfo, source: NativeError) -> Self {
        match source {
            NativeError::Conversion(source) => MarshalError::conversion(trace, source),
            source => MarshalError::Native {
                trace: trace.clone(),
                source,
            },
        }
    }

    /// The diagnostic location, when the error is tied to one.
    pub fn trace(&self) -> Option<&TraceInfo> {
        match self {
            MarshalError::Conversion { trace, .. } | MarshalError::Native { trace, .. } => {
                Some(trace)
            }
            MarshalError::Configuration(_) => None,
        }
    }
}

impl From<MarshalError> for NativeError {
    /// Nested marshalling inside a native call keeps its original kind where
    /// it can; configuration failures become toolkit errors.
    fn from(err: MarshalError) -> Self {
        match err {
            MarshalError::Conversion { source, .. } => NativeError::Conversion(source),
            MarshalError::Native { source, .. } => source,
            MarshalError::Configuration(source) => NativeError::toolkit(source.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn conversion_error_type_mismatch() {
        let err = ConversionError::mismatch("Image", "int");
        assert!(err.to_string().contains("type mismatch"));
        assert!(err.to_string().contains("Image"));
        assert!(err.to_string().contains("int"));
    }

    #[test]
    fn resource_error_is_the_cause() {
        let err = ConversionError::resource("Image", ResourceError::TooLarge { limit: 16 });
        assert!(err.to_string().contains("Image"));
        let cause = err.source().unwrap();
        assert!(cause.to_string().contains("16 bytes"));
    }

    #[test]
    fn resource_error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: ResourceError = io.into();
        assert!(matches!(err, ResourceError::Io(_)));
    }

    #[test]
    fn native_error_from_conversion() {
        let native: NativeError = ConversionError::NullValue { target: "bool" }.into();
        assert!(matches!(native, NativeError::Conversion(_)));
    }

    #[test]
    fn ambiguous_converter_lists_candidates() {
        let err = ConfigurationError::AmbiguousConverter {
            type_name: "SplitPane".into(),
            candidates: vec!["controls".into(), "containers".into()],
        };
        assert_eq!(
            err.to_string(),
            "ambiguous converter for SplitPane: candidates controls, containers"
        );
    }

    #[test]
    fn marshal_error_carries_trace() {
        let trace = TraceInfo::new("form.ux", 3, 9);
        let err = MarshalError::conversion(&trace, ConversionError::mismatch("Image", "int"));
        assert_eq!(err.trace(), Some(&trace));
        assert!(err.to_string().starts_with("form.ux:3:9"));
    }

    #[test]
    fn marshal_error_native_unwraps_conversion() {
        let trace = TraceInfo::unknown();
        let err = MarshalError::native(
            &trace,
            NativeError::Conversion(ConversionError::NullValue { target: "int" }),
        );
        assert!(matches!(err, MarshalError::Conversion { .. }));
    }

    #[test]
    fn configuration_error_has_no_trace() {
        let err: MarshalError = ConfigurationError::UnregisteredType {
            type_name: "Menu".into(),
        }
        .into();
        assert!(err.trace().is_none());
        assert_eq!(err.to_string(), "no converter registered for Menu");
    }

    #[test]
    fn marshal_error_into_native_error() {
        let trace = TraceInfo::unknown();
        let err = MarshalError::Native {
            trace,
            source: NativeError::toolkit("boom"),
        };
        let native: NativeError = err.into();
        assert!(matches!(native, NativeError::Toolkit { .. }));
    }
}
