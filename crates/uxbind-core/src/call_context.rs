//! Call context bridging the runtime and native delegates.

use crate::convert::{FromDynamic, IntoDynamic};
use crate::error::{ConversionError, NativeError};
use crate::marshal::Marshal;
use crate::native::{NativeRef, NativeType};
use crate::trace::TraceInfo;
use crate::type_hash::TypeHash;
use crate::value::Dynamic;

/// Context for one delegated property access, method call or constructor.
///
/// ## Typed Argument Access
///
/// ```ignore
/// let index: usize = ctx.arg(0)?;
/// let position: f64 = ctx.arg(1)?;
/// let node = ctx.arg_native(0, TypeHash::of::<Node>())?;
/// ```
///
/// ## Results
///
/// Getters and methods call `set_return`; constructors hand the new native
/// object to `construct`.
pub struct CallContext<'a> {
    marshal: &'a dyn Marshal,
    trace: &'a TraceInfo,
    /// Receiver (None for static methods and constructors)
    this: Option<&'a NativeRef>,
    args: &'a [Dynamic],
    return_value: Dynamic,
    constructed: Option<NativeRef>,
}

impl<'a> CallContext<'a> {
    pub fn new(
        marshal: &'a dyn Marshal,
        trace: &'a TraceInfo,
        this: Option<&'a NativeRef>,
        args: &'a [Dynamic],
    ) -> Self {
        Self {
            marshal,
            trace,
            this,
            args,
            return_value: Dynamic::Null,
            constructed: None,
        }
    }

    pub fn marshal(&self) -> &'a dyn Marshal {
        self.marshal
    }

    pub fn trace(&self) -> &'a TraceInfo {
        self.trace
    }

    // =========================================================================
    // Arguments
    // =========================================================================

    pub fn arg_count(&self) -> usize {
        self.args.len()
    }

    /// Get a raw argument value.
    pub fn arg_value(&self, index: usize) -> Result<&'a Dynamic, NativeError> {
        self.args
            .get(index)
            .ok_or(NativeError::ArgumentIndexOutOfBounds {
                index,
                count: self.args.len(),
            })
    }

    /// Get a typed primitive argument.
    pub fn arg<T: FromDynamic>(&self, index: usize) -> Result<T, NativeError> {
        let value = self.arg_value(index)?;
        T::from_dynamic(value).map_err(NativeError::Conversion)
    }

    /// Convert an argument for a native-typed parameter through its converter.
    pub fn arg_native(
        &self,
        index: usize,
        target: TypeHash,
    ) -> Result<Option<NativeRef>, NativeError> {
        let value = self.arg_value(index)?;
        Ok(self.marshal.to_native(target, value, self.trace)?)
    }

    /// Like [`arg_native`](Self::arg_native) for a parameter that may not be
    /// null.
    pub fn arg_native_required(
        &self,
        index: usize,
        target: TypeHash,
        target_name: &'static str,
    ) -> Result<NativeRef, NativeError> {
        self.arg_native(index, target)?
            .ok_or(NativeError::Conversion(ConversionError::NullValue {
                target: target_name,
            }))
    }

    /// Convert a list argument whose elements are native objects.
    pub fn arg_native_list(
        &self,
        index: usize,
        target: TypeHash,
    ) -> Result<Vec<NativeRef>, NativeError> {
        native_list(self.marshal, self.trace, self.arg_value(index)?, target)
    }

    // =========================================================================
    // Receiver
    // =========================================================================

    pub fn this_ref(&self) -> Result<&'a NativeRef, NativeError> {
        self.this
            .ok_or_else(|| NativeError::invalid_this("no receiver for this call"))
    }

    /// Borrow the receiver as `T`, directly or through an upcast.
    pub fn this<T: NativeType>(&self) -> Result<&'a T, NativeError> {
        let native = self.this_ref()?;
        native.get::<T>().ok_or_else(|| {
            NativeError::invalid_this(format!(
                "expected {}, got {}",
                T::NAME,
                native.type_name()
            ))
        })
    }

    // =========================================================================
    // Results
    // =========================================================================

    /// Set a typed return value.
    pub fn set_return<T: IntoDynamic>(&mut self, value: T) {
        self.return_value = value.into_dynamic();
    }

    /// Wrap a native return value through the converter serving `target`.
    pub fn set_return_native(
        &mut self,
        target: TypeHash,
        native: Option<NativeRef>,
    ) -> Result<(), NativeError> {
        self.return_value = self.marshal.from_native(target, native, self.trace)?;
        Ok(())
    }

    /// Wrap a list of native objects through the converter serving `target`.
    pub fn set_return_native_list(
        &mut self,
        target: TypeHash,
        natives: Vec<NativeRef>,
    ) -> Result<(), NativeError> {
        let items = natives
            .into_iter()
            .map(|native| self.marshal.from_native(target, Some(native), self.trace))
            .collect::<Result<Vec<_>, _>>()?;
        self.return_value = Dynamic::List(items);
        Ok(())
    }

    /// Hand the native object built by a constructor back to the binding.
    pub fn construct(&mut self, native: NativeRef) {
        self.constructed = Some(native);
    }

    pub fn take_constructed(&mut self) -> Option<NativeRef> {
        self.constructed.take()
    }

    pub fn into_return(self) -> Dynamic {
        self.return_value
    }
}

/// Convert every element of a list value for a native-typed slot.
///
/// Null elements are rejected; a list slot holds objects, not holes.
pub fn native_list(
    marshal: &dyn Marshal,
    trace: &TraceInfo,
    value: &Dynamic,
    target: TypeHash,
) -> Result<Vec<NativeRef>, NativeError> {
    let items = match value {
        Dynamic::List(items) => items,
        other => {
            return Err(ConversionError::mismatch("list", other.type_name()).into());
        }
    };

    let mut natives = Vec::with_capacity(items.len());
    for item in items {
        match marshal.to_native(target, item, trace)? {
            Some(native) => natives.push(native),
            None => {
                return Err(ConversionError::NullValue {
                    target: "list element",
                }
                .into());
            }
        }
    }
    Ok(natives)
}
