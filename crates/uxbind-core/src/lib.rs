//! Core value model for uxbind.
//!
//! This crate holds everything both sides of the boundary agree on:
//!
//! - Runtime values ([`Dynamic`], [`ValueKind`], [`StreamHandle`])
//! - Foreign type identity ([`TypeHash`], [`ForeignType`])
//! - Shared native object handles ([`NativeRef`], [`NativeType`])
//! - Wrapper classes and objects ([`ClassDef`], [`WrapperObject`])
//! - The converter protocol ([`Converter`], [`ConvertContext`])
//! - Primitive conversions ([`FromDynamic`], [`IntoDynamic`])
//! - Errors, diagnostic locations and configuration
//!
//! Dispatch (which converter serves which type) lives in `uxbind-registry`,
//! reached from here through the [`Marshal`] trait.
//!
//! ```text
//! Dynamic ──to_native──► Converter ──► NativeRef
//!    ▲                                    │
//!    └──────── WrapperObject ◄─from_native┘
//! ```

pub mod call_context;
pub mod class;
pub mod config;
pub mod convert;
pub mod converter;
pub mod error;
pub mod marshal;
pub mod native;
pub mod object;
pub mod overload;
pub mod trace;
pub mod type_hash;
pub mod value;

pub use call_context::{CallContext, native_list};
pub use class::{ClassDef, MethodDef, NativeFn, ParamKind, PropertyAccess, PropertyDef};
pub use config::{DEFAULT_MAX_STREAM_BYTES, MarshalConfig};
pub use convert::{FromDynamic, IntoDynamic};
pub use converter::{ConvertContext, Converter};
pub use error::{ConfigurationError, ConversionError, MarshalError, NativeError, ResourceError};
pub use marshal::{Marshal, StreamProvider, Subtyping};
pub use native::{NativeObject, NativeRef, NativeType};
pub use object::{ObjectRef, WrapperObject};
pub use trace::TraceInfo;
pub use type_hash::{ForeignType, TypeHash};
pub use value::{Dynamic, KindSet, StreamHandle, ValueKind};
