//! Wrapper objects: runtime-side stand-ins for native toolkit objects.
//!
//! A [`WrapperObject`] pairs one native object with the [`ClassDef`] that
//! describes what scripted code may do with it. It holds no state of its own;
//! every property read, write and method call is forwarded to the native
//! object, so mutations are visible to anyone else holding that object.

use std::sync::Arc;

use tracing::trace;

use crate::call_context::CallContext;
use crate::class::ClassDef;
use crate::error::{MarshalError, NativeError};
use crate::marshal::{Marshal, Subtyping};
use crate::native::NativeRef;
use crate::overload;
use crate::trace::TraceInfo;
use crate::type_hash::TypeHash;
use crate::value::Dynamic;

/// Shared handle to a wrapper, as carried by [`Dynamic::Object`].
pub type ObjectRef = Arc<WrapperObject>;

/// Runtime-visible object wrapping exactly one native object.
#[derive(Debug)]
pub struct WrapperObject {
    class: Arc<ClassDef>,
    native: NativeRef,
}

impl WrapperObject {
    /// Wrap an existing native object. The object is shared, never copied.
    pub fn adopt(class: Arc<ClassDef>, native: NativeRef) -> Self {
        Self { class, native }
    }

    pub fn class(&self) -> &Arc<ClassDef> {
        &self.class
    }

    /// The wrapped native object, for host code.
    ///
    /// Scripted code only ever holds the wrapper through [`Dynamic::Object`]
    /// and reaches the native object through `get`, `set` and `call`.
    /// Converters use [`native_for`](Self::native_for), which also checks that
    /// the object fits the slot.
    pub fn native(&self) -> &NativeRef {
        &self.native
    }

    pub fn native_type(&self) -> TypeHash {
        self.native.type_hash()
    }

    /// The wrapped object, if it may fill a slot expecting `target`.
    pub fn native_for<S: Subtyping + ?Sized>(
        &self,
        target: TypeHash,
        subtyping: &S,
    ) -> Option<&NativeRef> {
        subtyping
            .is_assignable(self.native.type_hash(), target)
            .then_some(&self.native)
    }

    /// Read a property through its native getter.
    pub fn get(
        &self,
        marshal: &dyn Marshal,
        name: &str,
        trace: &TraceInfo,
    ) -> Result<Dynamic, MarshalError> {
        let property = self
            .class
            .property(name)
            .ok_or_else(|| MarshalError::native(trace, self.unknown_member(name)))?;

        trace!(class = self.class.name(), property = name, "get");
        let mut ctx = CallContext::new(marshal, trace, Some(&self.native), &[]);
        property
            .getter
            .call(&mut ctx)
            .map_err(|e| MarshalError::native(trace, e))?;
        Ok(ctx.into_return())
    }

    /// Write a property through its native setter.
    pub fn set(
        &self,
        marshal: &dyn Marshal,
        name: &str,
        value: Dynamic,
        trace: &TraceInfo,
    ) -> Result<(), MarshalError> {
        let property = self
            .class
            .property(name)
            .ok_or_else(|| MarshalError::native(trace, self.unknown_member(name)))?;
        let setter = property.setter.as_ref().ok_or_else(|| {
            MarshalError::native(
                trace,
                NativeError::ReadOnlyProperty {
                    class: self.class.qualified_name(),
                    property: name.to_string(),
                },
            )
        })?;

        trace!(class = self.class.name(), property = name, "set");
        let args = [value];
        let mut ctx = CallContext::new(marshal, trace, Some(&self.native), &args);
        setter
            .call(&mut ctx)
            .map_err(|e| MarshalError::native(trace, e))
    }

    /// Call an instance method, picking the overload that fits `args`.
    pub fn call(
        &self,
        marshal: &dyn Marshal,
        name: &str,
        args: &[Dynamic],
        trace: &TraceInfo,
    ) -> Result<Dynamic, MarshalError> {
        let overloads = self.class.method(name);
        if overloads.is_empty() {
            return Err(MarshalError::native(trace, self.unknown_member(name)));
        }

        let callee = format!("{}::{}", self.class.name(), name);
        let method = overload::resolve(&callee, overloads, args, marshal)
            .map_err(|e| MarshalError::native(trace, e))?;

        trace!(class = self.class.name(), method = %method.signature(), "call");
        let mut ctx = CallContext::new(marshal, trace, Some(&self.native), args);
        method
            .native
            .call(&mut ctx)
            .map_err(|e| MarshalError::native(trace, e))?;
        Ok(ctx.into_return())
    }

    fn unknown_member(&self, member: &str) -> NativeError {
        NativeError::UnknownMember {
            class: self.class.qualified_name(),
            member: member.to_string(),
        }
    }
}
