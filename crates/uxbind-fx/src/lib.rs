//! Bindings for the `fx` UI toolkit.
//!
//! - **toolkit** - the native object model (`Node`, `Control`, `SplitPane`,
//!   `Image`, `ImageView`)
//! - **classes** - wrapper classes exposed to scripts (`fx\UXNode`, ...)
//! - **bind** - converters for types with a raw construction protocol
//!
//! # Usage
//!
//! ```ignore
//! let mut builder = RegistryBuilder::new();
//! builder.install(uxbind_fx::module())?;
//! let registry = Arc::new(builder.build()?);
//! ```

use std::sync::Arc;

use uxbind_registry::Module;

pub mod bind;
pub mod classes;
pub mod toolkit;

pub use bind::ImageConverter;
pub use toolkit::{Control, Image, ImageView, Node, Orientation, SplitPane};

use classes::{ux_control, ux_image, ux_image_view, ux_node, ux_split_pane};

/// Namespace of every wrapper class in this crate.
pub const NAMESPACE: &str = "fx";

/// Everything the toolkit contributes to a registry.
pub fn module() -> Module {
    let node = ux_node::class();
    let control = ux_control::class(&node);
    let split_pane = ux_split_pane::class(&control);
    let image_view = ux_image_view::class(&node);
    let image = Arc::new(ux_image::class());

    Module::new(NAMESPACE)
        .ty::<Node>()
        .ty::<Control>()
        .ty::<SplitPane>()
        .ty::<Image>()
        .ty::<ImageView>()
        .subtype::<Control, Node>()
        .subtype::<SplitPane, Control>()
        .subtype::<ImageView, Node>()
        .converter(Arc::new(ImageConverter::new(Arc::clone(&image))))
        .class(node)
        .class(control)
        .class(split_pane)
        .class(image)
        .class(image_view)
}
