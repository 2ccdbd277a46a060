//! The value converter protocol.
//!
//! A [`Converter`] translates between [`Dynamic`] values and one or more
//! foreign types. It is stateless: everything a conversion needs arrives in
//! the [`ConvertContext`].
//!
//! `to_native` follows a fixed order:
//!
//! 1. `Dynamic::Null` converts to no native object.
//! 2. A wrapper already holding an assignment-compatible native object is
//!    unwrapped without copying ([`ConvertContext::passthrough`]).
//! 3. Anything else is raw construction input, or a `TypeMismatch`.
//!
//! ```ignore
//! fn to_native(&self, cx: &ConvertContext<'_>, target: ForeignType, value: &Dynamic)
//!     -> Result<Option<NativeRef>, ConversionError>
//! {
//!     if value.is_null() {
//!         return Ok(None);
//!     }
//!     if let Some(native) = cx.passthrough(value, target.hash) {
//!         return Ok(Some(native));
//!     }
//!     let bytes = cx.read_stream(value).map_err(|e| ConversionError::resource(target.name, e))?;
//!     Image::from_bytes(&bytes).map(|i| Some(NativeRef::new(i))) ...
//! }
//! ```

use std::io::Read;
use std::sync::Arc;

use crate::class::ClassDef;
use crate::config::MarshalConfig;
use crate::error::{ConversionError, ResourceError};
use crate::marshal::{Marshal, StreamProvider};
use crate::native::NativeRef;
use crate::object::WrapperObject;
use crate::trace::TraceInfo;
use crate::type_hash::{ForeignType, TypeHash};
use crate::value::{Dynamic, KindSet};

/// Stateless bidirectional translator between runtime values and foreign types.
pub trait Converter: Send + Sync {
    /// Name used in diagnostics and configuration errors.
    fn name(&self) -> &str;

    /// Foreign types this converter claims. Must be non-empty.
    fn supported_types(&self) -> &[ForeignType];

    /// Raw value kinds this converter can construct a native object from.
    fn accepted_kinds(&self) -> KindSet {
        KindSet::empty()
    }

    /// Convert `value` for a slot expecting `target`.
    ///
    /// `target` is the requested type, which may be a subtype of one of the
    /// supported types.
    fn to_native(
        &self,
        cx: &ConvertContext<'_>,
        target: ForeignType,
        value: &Dynamic,
    ) -> Result<Option<NativeRef>, ConversionError>;

    /// Wrap a native object (or its absence) for the runtime.
    fn from_native(&self, cx: &ConvertContext<'_>, native: Option<NativeRef>) -> Dynamic;
}

/// Everything a single conversion call may use.
pub struct ConvertContext<'a> {
    pub marshal: &'a dyn Marshal,
    pub streams: &'a dyn StreamProvider,
    pub config: &'a MarshalConfig,
    pub trace: &'a TraceInfo,
}

impl<'a> ConvertContext<'a> {
    pub fn new(
        marshal: &'a dyn Marshal,
        streams: &'a dyn StreamProvider,
        config: &'a MarshalConfig,
        trace: &'a TraceInfo,
    ) -> Self {
        Self {
            marshal,
            streams,
            config,
            trace,
        }
    }

    /// The native object held by `value`, if it is a wrapper whose native type
    /// is `target` or a subtype of it.
    pub fn passthrough(&self, value: &Dynamic, target: TypeHash) -> Option<NativeRef> {
        value
            .as_object()?
            .native_for(target, self.marshal)
            .cloned()
    }

    /// Open `source` as a stream and read it fully, up to the configured limit.
    ///
    /// The reader is dropped, and the stream closed, before this returns on
    /// every path.
    pub fn read_stream(&self, source: &Dynamic) -> Result<Vec<u8>, ResourceError> {
        let limit = self.config.max_stream_bytes;
        let reader = self.streams.open(source, self.config)?;

        let mut bytes = Vec::new();
        reader.take(limit.saturating_add(1)).read_to_end(&mut bytes)?;

        if bytes.len() as u64 > limit {
            return Err(ResourceError::TooLarge { limit });
        }
        Ok(bytes)
    }

    /// Adopt `native` into a fresh wrapper.
    ///
    /// The most specific class registered for the object's actual type wins;
    /// `fallback` is used when none is.
    pub fn wrap(&self, native: NativeRef, fallback: &Arc<ClassDef>) -> Dynamic {
        let class = self
            .marshal
            .class_for_native(native.type_hash())
            .unwrap_or_else(|| Arc::clone(fallback));
        Dynamic::Object(Arc::new(WrapperObject::adopt(class, native)))
    }
}
