use std::any::Any;

use parking_lot::RwLock;
use uxbind_core::{NativeType, TypeHash};

use super::Node;

/// A node the user can interact with.
#[derive(Debug, Default)]
pub struct Control {
    node: Node,
    tooltip: RwLock<Option<String>>,
}

impl Control {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self) -> &Node {
        &self.node
    }

    pub fn tooltip(&self) -> Option<String> {
        self.tooltip.read().clone()
    }

    pub fn set_tooltip(&self, tooltip: Option<String>) {
        *self.tooltip.write() = tooltip;
    }
}

impl NativeType for Control {
    const NAME: &'static str = "Control";

    fn upcast(&self, target: TypeHash) -> Option<&dyn Any> {
        (target == TypeHash::of::<Node>()).then_some(&self.node as &dyn Any)
    }
}
