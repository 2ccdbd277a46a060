use uxbind_core::{ClassDef, NativeError, ParamKind, TypeHash};
use uxbind_registry::ClassBuilder;

use super::image_arc;
use crate::NAMESPACE;
use crate::toolkit::Image;

/// `fx\UXImage`: a decoded bitmap, built from a stream.
///
/// The stream argument goes through the Image converter, so a path string is
/// accepted too.
pub fn class() -> ClassDef {
    ClassBuilder::<Image>::new("UXImage")
        .namespace(NAMESPACE)
        .constructor_shared(vec![ParamKind::Stream], |ctx| {
            let native = ctx.arg_native_required(0, TypeHash::of::<Image>(), "Image")?;
            image_arc(native)
        })
        .property_get("width", Image::width)
        .property_get("height", Image::height)
        .method("getPixel", vec![ParamKind::Int, ParamKind::Int], |ctx| {
            let x: u32 = ctx.arg(0)?;
            let y: u32 = ctx.arg(1)?;
            let image = ctx.this::<Image>()?;
            let argb = image.pixel_argb(x, y).ok_or_else(|| {
                NativeError::toolkit(format!(
                    "pixel ({x}, {y}) is outside the {}x{} image",
                    image.width(),
                    image.height()
                ))
            })?;
            ctx.set_return(argb as i64);
            Ok(())
        })
        .build()
}
