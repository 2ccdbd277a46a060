//! Conversion traits for primitive argument extraction and return values.
//!
//! - [`FromDynamic`]: extract a Rust value from a [`Dynamic`]
//! - [`IntoDynamic`]: convert a Rust value into a [`Dynamic`]
//!
//! Native toolkit types do not implement these; they cross the boundary
//! through the registered converters instead.
//!
//! ```ignore
//! let value: i32 = i32::from_dynamic(&Dynamic::Int(42))?;
//! let back: Dynamic = value.into_dynamic();
//! ```

use crate::class::ParamKind;
use crate::error::ConversionError;
use crate::value::Dynamic;

/// Extract a value from a Dynamic.
pub trait FromDynamic: Sized {
    fn from_dynamic(value: &Dynamic) -> Result<Self, ConversionError>;

    /// Argument shape this type accepts, used for overload resolution.
    fn param_kind() -> ParamKind;
}

/// Convert a value into a Dynamic.
pub trait IntoDynamic {
    fn into_dynamic(self) -> Dynamic;
}

// ============================================================================
// Integer implementations
// ============================================================================

macro_rules! impl_dynamic_int {
    ($($ty:ty),*) => {
        $(
            impl FromDynamic for $ty {
                fn from_dynamic(value: &Dynamic) -> Result<Self, ConversionError> {
                    match value {
                        Dynamic::Int(v) => <$ty>::try_from(*v).map_err(|_| {
                            ConversionError::IntegerOverflow {
                                value: *v,
                                target: stringify!($ty),
                            }
                        }),
                        Dynamic::Null => Err(ConversionError::NullValue {
                            target: stringify!($ty),
                        }),
                        other => Err(ConversionError::mismatch("int", other.type_name())),
                    }
                }

                fn param_kind() -> ParamKind {
                    ParamKind::Int
                }
            }

            impl IntoDynamic for $ty {
                fn into_dynamic(self) -> Dynamic {
                    Dynamic::Int(self as i64)
                }
            }
        )*
    };
}

impl_dynamic_int!(i8, i16, i32, i64, u8, u16, u32, usize);

// ============================================================================
// Float implementations
// ============================================================================

impl FromDynamic for f64 {
    fn from_dynamic(value: &Dynamic) -> Result<Self, ConversionError> {
        match value {
            Dynamic::Float(v) => Ok(*v),
            Dynamic::Int(v) => Ok(*v as f64),
            Dynamic::Null => Err(ConversionError::NullValue { target: "f64" }),
            other => Err(ConversionError::mismatch("float", other.type_name())),
        }
    }

    fn param_kind() -> ParamKind {
        ParamKind::Float
    }
}

impl IntoDynamic for f64 {
    fn into_dynamic(self) -> Dynamic {
        Dynamic::Float(self)
    }
}

impl FromDynamic for f32 {
    fn from_dynamic(value: &Dynamic) -> Result<Self, ConversionError> {
        f64::from_dynamic(value).map(|v| v as f32)
    }

    fn param_kind() -> ParamKind {
        ParamKind::Float
    }
}

impl IntoDynamic for f32 {
    fn into_dynamic(self) -> Dynamic {
        Dynamic::Float(self as f64)
    }
}

// ============================================================================
// Other scalars
// ============================================================================

impl FromDynamic for bool {
    fn from_dynamic(value: &Dynamic) -> Result<Self, ConversionError> {
        match value {
            Dynamic::Bool(v) => Ok(*v),
            Dynamic::Null => Err(ConversionError::NullValue { target: "bool" }),
            other => Err(ConversionError::mismatch("bool", other.type_name())),
        }
    }

    fn param_kind() -> ParamKind {
        ParamKind::Bool
    }
}

impl IntoDynamic for bool {
    fn into_dynamic(self) -> Dynamic {
        Dynamic::Bool(self)
    }
}

impl FromDynamic for String {
    fn from_dynamic(value: &Dynamic) -> Result<Self, ConversionError> {
        match value {
            Dynamic::String(s) => Ok(s.clone()),
            Dynamic::Null => Err(ConversionError::NullValue { target: "string" }),
            other => Err(ConversionError::mismatch("string", other.type_name())),
        }
    }

    fn param_kind() -> ParamKind {
        ParamKind::String
    }
}

impl IntoDynamic for String {
    fn into_dynamic(self) -> Dynamic {
        Dynamic::String(self)
    }
}

impl IntoDynamic for &str {
    fn into_dynamic(self) -> Dynamic {
        Dynamic::String(self.to_string())
    }
}

impl IntoDynamic for () {
    fn into_dynamic(self) -> Dynamic {
        Dynamic::Null
    }
}

impl FromDynamic for Dynamic {
    fn from_dynamic(value: &Dynamic) -> Result<Self, ConversionError> {
        Ok(value.clone())
    }

    fn param_kind() -> ParamKind {
        ParamKind::Any
    }
}

impl IntoDynamic for Dynamic {
    fn into_dynamic(self) -> Dynamic {
        self
    }
}

// ============================================================================
// Containers
// ============================================================================

impl<T: FromDynamic> FromDynamic for Option<T> {
    fn from_dynamic(value: &Dynamic) -> Result<Self, ConversionError> {
        match value {
            Dynamic::Null => Ok(None),
            other => T::from_dynamic(other).map(Some),
        }
    }

    fn param_kind() -> ParamKind {
        ParamKind::Optional(Box::new(T::param_kind()))
    }
}

impl<T: IntoDynamic> IntoDynamic for Option<T> {
    fn into_dynamic(self) -> Dynamic {
        match self {
            Some(v) => v.into_dynamic(),
            None => Dynamic::Null,
        }
    }
}

impl<T: FromDynamic> FromDynamic for Vec<T> {
    fn from_dynamic(value: &Dynamic) -> Result<Self, ConversionError> {
        match value {
            Dynamic::List(items) => items.iter().map(T::from_dynamic).collect(),
            Dynamic::Null => Err(ConversionError::NullValue { target: "list" }),
            other => Err(ConversionError::mismatch("list", other.type_name())),
        }
    }

    fn param_kind() -> ParamKind {
        ParamKind::List
    }
}

impl<T: IntoDynamic> IntoDynamic for Vec<T> {
    fn into_dynamic(self) -> Dynamic {
        Dynamic::List(self.into_iter().map(IntoDynamic::into_dynamic).collect())
    }
}
