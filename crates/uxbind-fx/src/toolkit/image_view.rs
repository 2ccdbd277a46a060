use std::any::Any;
use std::sync::Arc;

use parking_lot::RwLock;
use uxbind_core::{NativeType, TypeHash};

use super::{Image, Node};

/// Node displaying an [`Image`].
#[derive(Debug, Default)]
pub struct ImageView {
    node: Node,
    state: RwLock<ViewState>,
}

#[derive(Debug, Default)]
struct ViewState {
    image: Option<Arc<Image>>,
    fit_width: f64,
    fit_height: f64,
    preserve_ratio: bool,
}

impl ImageView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image(image: Arc<Image>) -> Self {
        let view = Self::new();
        view.set_image(Some(image));
        view
    }

    pub fn node(&self) -> &Node {
        &self.node
    }

    /// The displayed image, shared with whoever else holds it.
    pub fn image(&self) -> Option<Arc<Image>> {
        self.state.read().image.clone()
    }

    pub fn set_image(&self, image: Option<Arc<Image>>) {
        self.state.write().image = image;
    }

    pub fn fit_width(&self) -> f64 {
        self.state.read().fit_width
    }

    /// Zero or negative disables fitting on this axis.
    pub fn set_fit_width(&self, width: f64) {
        self.state.write().fit_width = width.max(0.0);
    }

    pub fn fit_height(&self) -> f64 {
        self.state.read().fit_height
    }

    pub fn set_fit_height(&self, height: f64) {
        self.state.write().fit_height = height.max(0.0);
    }

    pub fn is_preserve_ratio(&self) -> bool {
        self.state.read().preserve_ratio
    }

    pub fn set_preserve_ratio(&self, preserve: bool) {
        self.state.write().preserve_ratio = preserve;
    }
}

impl NativeType for ImageView {
    const NAME: &'static str = "ImageView";

    fn upcast(&self, target: TypeHash) -> Option<&dyn Any> {
        (target == TypeHash::of::<Node>()).then_some(&self.node as &dyn Any)
    }
}
