//! Converter for [`Image`].
//!
//! Accepts, in order: null, a wrapper already holding an image, or a stream
//! (handle or path string) whose bytes decode as PNG or JPEG. Anything else
//! is a type mismatch and never touches the stream subsystem.

use std::sync::Arc;

use tracing::{debug, trace};
use uxbind_core::{
    ClassDef, ConversionError, ConvertContext, Converter, Dynamic, ForeignType, KindSet,
    NativeRef,
};

use crate::toolkit::Image;

pub struct ImageConverter {
    types: [ForeignType; 1],
    class: Arc<ClassDef>,
}

impl ImageConverter {
    /// `class` wraps images handed back to the runtime.
    pub fn new(class: Arc<ClassDef>) -> Self {
        Self {
            types: [ForeignType::of::<Image>()],
            class,
        }
    }
}

impl Converter for ImageConverter {
    fn name(&self) -> &str {
        "image"
    }

    fn supported_types(&self) -> &[ForeignType] {
        &self.types
    }

    fn accepted_kinds(&self) -> KindSet {
        KindSet::STREAM | KindSet::STRING
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
        if let Some(native) = cx.passthrough(value, target.hash) {
            trace!("image passthrough");
            return Ok(Some(native));
        }
        if !self.accepted_kinds().accepts(value.kind()) {
            return Err(ConversionError::mismatch(target.name, value.describe()));
        }

        let bytes = cx
            .read_stream(value)
            .map_err(|e| ConversionError::resource(target.name, e))?;
        let image = Image::from_bytes(&bytes)
            .map_err(|e| ConversionError::construction(target.name, e.to_string()))?;
        debug!(
            width = image.width(),
            height = image.height(),
            bytes = bytes.len(),
            "image decoded"
        );
        Ok(Some(NativeRef::new(image)))
    }

    fn from_native(&self, cx: &ConvertContext<'_>, native: Option<NativeRef>) -> Dynamic {
        match native {
            Some(native) => cx.wrap(native, &self.class),
            None => Dynamic::Null,
        }
    }
}
