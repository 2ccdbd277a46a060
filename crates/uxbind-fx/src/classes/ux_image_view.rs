use uxbind_core::{ClassDef, NativeFn, NativeRef, ParamKind, TypeHash};
use uxbind_registry::ClassBuilder;

use super::image_arc;
use crate::NAMESPACE;
use crate::toolkit::{Image, ImageView};

/// `fx\UXImageView`, extending `UXNode`.
///
/// Assigning `image` routes through the Image converter: a wrapped image is
/// shared, a stream handle builds a new one, null clears it.
pub fn class(node: &ClassDef) -> ClassDef {
    let image = TypeHash::of::<Image>();
    let optional_image = ParamKind::Optional(Box::new(ParamKind::native::<Image>()));

    ClassBuilder::<ImageView>::new("UXImageView")
        .namespace(NAMESPACE)
        .extends(node)
        .constructor(vec![], |_ctx| Ok(ImageView::new()))
        .constructor(vec![optional_image.clone()], move |ctx| {
            let view = ImageView::new();
            if let Some(native) = ctx.arg_native(0, image)? {
                view.set_image(Some(image_arc(native)?));
            }
            Ok(view)
        })
        .property_raw(
            "image",
            optional_image,
            NativeFn::new(move |ctx| {
                let current = ctx.this::<ImageView>()?.image();
                ctx.set_return_native(image, current.map(NativeRef::from_arc))
            }),
            Some(NativeFn::new(move |ctx| {
                let next = ctx.arg_native(0, image)?.map(image_arc).transpose()?;
                ctx.this::<ImageView>()?.set_image(next);
                Ok(())
            })),
        )
        .property("fitWidth", ImageView::fit_width, ImageView::set_fit_width)
        .property("fitHeight", ImageView::fit_height, ImageView::set_fit_height)
        .property(
            "preserveRatio",
            ImageView::is_preserve_ratio,
            ImageView::set_preserve_ratio,
        )
        .build()
}
