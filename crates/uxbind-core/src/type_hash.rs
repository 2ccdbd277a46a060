//! Deterministic hash-based foreign type identity.
//!
//! [`TypeHash`] is a 64-bit hash of a foreign type's name. The same name always
//! produces the same hash, so converters, wrapper classes and the subtype table
//! can refer to a type before (or without) holding any value of it.
//!
//! # Examples
//!
//! ```
//! use uxbind_core::TypeHash;
//!
//! let image = TypeHash::from_name("Image");
//! assert_eq!(image, TypeHash::from_name("Image"));
//! assert_ne!(image, TypeHash::from_name("ImageView"));
//! ```

use std::fmt;

use xxhash_rust::xxh64::xxh64;

use crate::native::NativeType;

/// Domain marker mixed into every foreign type hash.
const TYPE_DOMAIN: u64 = 0x2fac10b63a6cc57c;

/// A deterministic 64-bit hash identifying a foreign (native toolkit) type.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeHash(pub u64);

impl TypeHash {
    /// Empty/invalid hash constant.
    pub const EMPTY: TypeHash = TypeHash(0);

    /// Create a type hash from a foreign type name.
    #[inline]
    pub fn from_name(name: &str) -> Self {
        TypeHash(TYPE_DOMAIN ^ xxh64(name.as_bytes(), 0))
    }

    /// Hash of a registered native type, derived from [`NativeType::NAME`].
    #[inline]
    pub fn of<T: NativeType>() -> Self {
        Self::from_name(T::NAME)
    }

    /// Check if this is the empty hash.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Get the raw hash value.
    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeHash({:#018x})", self.0)
    }
}

impl fmt::Display for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

/// A foreign type identity paired with its display name.
///
/// Converters declare the types they claim as `ForeignType`s so that
/// configuration errors can name the types involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ForeignType {
    pub hash: TypeHash,
    pub name: &'static str,
}

impl ForeignType {
    /// Create a foreign type from a static name.
    pub fn named(name: &'static str) -> Self {
        Self {
            hash: TypeHash::from_name(name),
            name,
        }
    }

    /// The foreign type of a registered native type.
    pub fn of<T: NativeType>() -> Self {
        Self::named(T::NAME)
    }
}

impl fmt::Display for ForeignType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
