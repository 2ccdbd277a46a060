//! Runtime value representation.
//!
//! [`Dynamic`] is the scripting runtime's tagged value. Every value carries its
//! own [`ValueKind`] tag; nothing in the marshalling layer infers a value's
//! type from the slot it arrived in.

use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;
use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::object::ObjectRef;

/// Kind tag of a runtime value.
///
/// The discriminants match the raw tags a host runtime hands across its
/// boundary, so `ValueKind::try_from(raw)` recovers the tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum ValueKind {
    Null = 0,
    Bool = 1,
    Int = 2,
    Float = 3,
    String = 4,
    List = 5,
    Object = 6,
    Stream = 7,
}

impl ValueKind {
    /// Human-readable name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::String => "string",
            ValueKind::List => "list",
            ValueKind::Object => "object",
            ValueKind::Stream => "stream",
        }
    }
}

bitflags! {
    /// A set of value kinds, e.g. the kinds a converter accepts as raw
    /// construction input.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct KindSet: u16 {
        const NULL = 1 << 0;
        const BOOL = 1 << 1;
        const INT = 1 << 2;
        const FLOAT = 1 << 3;
        const STRING = 1 << 4;
        const LIST = 1 << 5;
        const OBJECT = 1 << 6;
        const STREAM = 1 << 7;
    }
}

impl From<ValueKind> for KindSet {
    fn from(kind: ValueKind) -> Self {
        KindSet::from_bits_truncate(1 << u8::from(kind))
    }
}

impl KindSet {
    /// Check whether `kind` is in the set.
    pub fn accepts(self, kind: ValueKind) -> bool {
        self.contains(KindSet::from(kind))
    }
}

/// Opaque identifier of a stream object owned by the scripting runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StreamHandle(pub u64);

impl fmt::Display for StreamHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stream#{}", self.0)
    }
}

/// A tagged value produced and consumed by the scripting runtime.
#[derive(Clone)]
pub enum Dynamic {
    /// Null reference
    Null,
    Bool(bool),
    /// Integer value (all integer widths are carried as i64)
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<Dynamic>),
    /// Reference to a wrapper object
    Object(ObjectRef),
    /// Handle to a runtime stream object
    Stream(StreamHandle),
}

impl Dynamic {
    /// The value's own kind tag.
    pub fn kind(&self) -> ValueKind {
        match self {
            Dynamic::Null => ValueKind::Null,
            Dynamic::Bool(_) => ValueKind::Bool,
            Dynamic::Int(_) => ValueKind::Int,
            Dynamic::Float(_) => ValueKind::Float,
            Dynamic::String(_) => ValueKind::String,
            Dynamic::List(_) => ValueKind::List,
            Dynamic::Object(_) => ValueKind::Object,
            Dynamic::Stream(_) => ValueKind::Stream,
        }
    }

    /// Get a human-readable name for this value's kind.
    pub fn type_name(&self) -> &'static str {
        self.kind().name()
    }

    /// Name used in mismatch diagnostics: the native type for wrappers,
    /// otherwise the kind.
    pub fn describe(&self) -> &'static str {
        match self {
            Dynamic::Object(obj) => obj.native().type_name(),
            other => other.type_name(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Dynamic::Null)
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Dynamic::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Dynamic::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Dynamic]> {
        match self {
            Dynamic::List(items) => Some(items),
            _ => None,
        }
    }

    /// True if both values reference the same wrapper object.
    ///
    /// Wrapping the same native object twice yields two distinct wrappers, so
    /// this is not native identity.
    pub fn same_object(&self, other: &Dynamic) -> bool {
        match (self, other) {
            (Dynamic::Object(a), Dynamic::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Dynamic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dynamic::Null => write!(f, "Null"),
            Dynamic::Bool(v) => write!(f, "Bool({})", v),
            Dynamic::Int(v) => write!(f, "Int({})", v),
            Dynamic::Float(v) => write!(f, "Float({})", v),
            Dynamic::String(s) => write!(f, "String({:?})", s),
            Dynamic::List(items) => f.debug_tuple("List").field(items).finish(),
            Dynamic::Object(obj) => write!(f, "Object({})", obj.class().qualified_name()),
            Dynamic::Stream(h) => write!(f, "Stream({})", h),
        }
    }
}

impl PartialEq for Dynamic {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Dynamic::Null, Dynamic::Null) => true,
            (Dynamic::Bool(a), Dynamic::Bool(b)) => a == b,
            (Dynamic::Int(a), Dynamic::Int(b)) => a == b,
            (Dynamic::Float(a), Dynamic::Float(b)) => a == b,
            (Dynamic::String(a), Dynamic::String(b)) => a == b,
            (Dynamic::List(a), Dynamic::List(b)) => a == b,
            (Dynamic::Object(_), Dynamic::Object(_)) => self.same_object(other),
            (Dynamic::Stream(a), Dynamic::Stream(b)) => a == b,
            _ => false,
        }
    }
}

impl From<bool> for Dynamic {
    fn from(v: bool) -> Self {
        Dynamic::Bool(v)
    }
}

impl From<i64> for Dynamic {
    fn from(v: i64) -> Self {
        Dynamic::Int(v)
    }
}

impl From<f64> for Dynamic {
    fn from(v: f64) -> Self {
        Dynamic::Float(v)
    }
}

impl From<&str> for Dynamic {
    fn from(v: &str) -> Self {
        Dynamic::String(v.to_string())
    }
}

impl From<String> for Dynamic {
    fn from(v: String) -> Self {
        Dynamic::String(v)
    }
}

impl From<StreamHandle> for Dynamic {
    fn from(h: StreamHandle) -> Self {
        Dynamic::Stream(h)
    }
}

impl From<ObjectRef> for Dynamic {
    fn from(obj: ObjectRef) -> Self {
        Dynamic::Object(obj)
    }
}

impl From<Vec<Dynamic>> for Dynamic {
    fn from(items: Vec<Dynamic>) -> Self {
        Dynamic::List(items)
    }
}
