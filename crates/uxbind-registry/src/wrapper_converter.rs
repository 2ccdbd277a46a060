//! Converter for wrapper-only types.
//!
//! Types with no raw construction protocol (nodes, controls, panes) can only
//! cross into native code as null or as an already wrapped object. The
//! registry synthesizes one of these for every class whose native type has no
//! explicit converter.

use std::sync::Arc;

use uxbind_core::{
    ClassDef, ConversionError, ConvertContext, Converter, Dynamic, ForeignType, NativeRef,
};

/// Null / passthrough / reject.
pub struct WrapperConverter {
    name: String,
    types: Vec<ForeignType>,
    class: Arc<ClassDef>,
}

impl WrapperConverter {
    /// Serve the native type of `class`, wrapping results in it.
    pub fn for_class(class: Arc<ClassDef>) -> Self {
        Self {
            name: format!("{} wrapper", class.qualified_name()),
            types: vec![class.native_type()],
            class,
        }
    }

    /// Serve several types, wrapping results in `class` unless a more specific
    /// class is registered for the object.
    pub fn new(name: impl Into<String>, types: Vec<ForeignType>, class: Arc<ClassDef>) -> Self {
        Self {
            name: name.into(),
            types,
            class,
        }
    }

    pub fn class(&self) -> &Arc<ClassDef> {
        &self.class
    }
}

impl Converter for WrapperConverter {
    fn name(&self) -> &str {
        &self.name
    }

    fn supported_types(&self) -> &[ForeignType] {
        &self.types
    }

    fn to_native(
        &self,
        cx: &ConvertContext<'_>,
        target: ForeignType,
        value: &Dynamic,
    ) -> Result<Option<NativeRef>, ConversionError> {
        if value.is_null() {
            return Ok(None);
        }
        match cx.passthrough(value, target.hash) {
            Some(native) => Ok(Some(native)),
            None => Err(ConversionError::mismatch(target.name, value.describe())),
        }
    }

    fn from_native(&self, cx: &ConvertContext<'_>, native: Option<NativeRef>) -> Dynamic {
        match native {
            Some(native) => cx.wrap(native, &self.class),
            None => Dynamic::Null,
        }
    }
}
