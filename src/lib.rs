//! Marshalling between a dynamic scripting runtime and a native UI toolkit.
//!
//! This crate is the facade over the workspace:
//!
//! - [`core`] - value model, wrapper objects, conversion traits, errors
//! - [`registry`] - registration, dispatch, and the [`Marshaller`]
//! - [`fx`] - the bundled widget toolkit bindings
//!
//! A [`Context`] installs modules and seals them into the shared registry.

pub mod context;

pub use uxbind_core as core;
pub use uxbind_fx as fx;
pub use uxbind_registry as registry;

pub use context::{Context, ContextError};
pub use uxbind_registry::Marshaller;

pub mod prelude {
    pub use crate::context::{Context, ContextError};
    pub use uxbind_core::{
        CallContext, ClassDef, ConfigurationError, ConversionError, Converter, Dynamic,
        ForeignType, Marshal, MarshalConfig, MarshalError, NativeError, NativeRef, NativeType,
        ObjectRef, ParamKind, ResourceError, StreamHandle, StreamProvider, TraceInfo, TypeHash,
        Subtyping, ValueKind, WrapperObject,
    };
    pub use uxbind_registry::{ClassBuilder, Marshaller, Module, Registry, RegistryBuilder, StreamTable};
}
