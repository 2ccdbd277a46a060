//! Seams between the value model and the dispatch layer.
//!
//! Wrapper objects and converters need to re-enter dispatch (a property whose
//! value is itself a native object, a list of nodes passed to a constructor)
//! without depending on the registry crate. [`Marshal`] is that re-entry
//! point; the registry's `Marshaller` implements it.

use std::io::Read;
use std::sync::Arc;

use crate::class::ClassDef;
use crate::config::MarshalConfig;
use crate::error::{MarshalError, ResourceError};
use crate::native::NativeRef;
use crate::trace::TraceInfo;
use crate::type_hash::TypeHash;
use crate::value::{Dynamic, KindSet};

/// Static subtype table query.
pub trait Subtyping {
    /// True if a `from` object may be passed where a `to` is expected
    /// (same type or a declared subtype).
    fn is_assignable(&self, from: TypeHash, to: TypeHash) -> bool;
}

/// Conversion dispatch, as seen from inside a native call.
pub trait Marshal: Subtyping {
    /// Convert a runtime value for a native-typed slot.
    fn to_native(
        &self,
        target: TypeHash,
        value: &Dynamic,
        trace: &TraceInfo,
    ) -> Result<Option<NativeRef>, MarshalError>;

    /// Wrap a native result for return to the runtime.
    fn from_native(
        &self,
        target: TypeHash,
        native: Option<NativeRef>,
        trace: &TraceInfo,
    ) -> Result<Dynamic, MarshalError>;

    /// Most specific wrapper class registered for a native type.
    fn class_for_native(&self, native_type: TypeHash) -> Option<Arc<ClassDef>>;

    /// Raw value kinds the converter serving `target` can construct from.
    fn accepted_kinds(&self, target: TypeHash) -> KindSet;
}

/// The scripting runtime's stream subsystem.
///
/// `open` hands back a reader that owns whatever the open acquired; dropping
/// the reader closes the stream.
pub trait StreamProvider {
    fn open<'a>(
        &'a self,
        source: &Dynamic,
        config: &MarshalConfig,
    ) -> Result<Box<dyn Read + 'a>, ResourceError>;
}
