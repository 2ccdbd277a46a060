//! Wrapper classes for the stand-in toolkit.
//!
//! Each module exposes a `class` function returning the capability table;
//! subclasses take their parent's table and extend it.

use std::sync::Arc;

use uxbind_core::{ConversionError, NativeError, NativeRef};

use crate::toolkit::Image;

pub mod ux_control;
pub mod ux_image;
pub mod ux_image_view;
pub mod ux_node;
pub mod ux_split_pane;

/// Recover the shared image behind a converted argument.
pub(crate) fn image_arc(native: NativeRef) -> Result<Arc<Image>, NativeError> {
    native
        .downcast::<Image>()
        .ok_or_else(|| ConversionError::mismatch("Image", native.type_name()).into())
}
