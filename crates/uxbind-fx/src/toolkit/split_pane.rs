use std::any::Any;
use std::fmt;

use parking_lot::RwLock;
use uxbind_core::{
    ConversionError, Dynamic, FromDynamic, IntoDynamic, NativeRef, NativeType, ParamKind,
    TypeHash,
};

use super::{Control, Node};

/// Layout axis of a split pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

impl Orientation {
    pub fn as_str(self) -> &'static str {
        match self {
            Orientation::Horizontal => "HORIZONTAL",
            Orientation::Vertical => "VERTICAL",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "HORIZONTAL" => Some(Orientation::Horizontal),
            "VERTICAL" => Some(Orientation::Vertical),
            _ => None,
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromDynamic for Orientation {
    fn from_dynamic(value: &Dynamic) -> Result<Self, ConversionError> {
        match value {
            Dynamic::String(name) => Orientation::parse(name).ok_or_else(|| {
                ConversionError::construction("Orientation", format!("unknown orientation '{name}'"))
            }),
            Dynamic::Null => Err(ConversionError::NullValue {
                target: "Orientation",
            }),
            other => Err(ConversionError::mismatch("Orientation", other.type_name())),
        }
    }

    fn param_kind() -> ParamKind {
        ParamKind::String
    }
}

impl IntoDynamic for Orientation {
    fn into_dynamic(self) -> Dynamic {
        Dynamic::from(self.as_str())
    }
}

/// A control laying out its items side by side, separated by draggable
/// dividers.
///
/// Items are any node subtype. There is one divider between each pair of
/// neighbouring items, positioned as a fraction of the pane's extent.
#[derive(Debug, Default)]
pub struct SplitPane {
    control: Control,
    items: RwLock<Vec<NativeRef>>,
    orientation: RwLock<Orientation>,
    dividers: RwLock<Vec<f64>>,
}

impl SplitPane {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: Vec<NativeRef>) -> Self {
        let pane = Self::new();
        pane.set_items(items);
        pane
    }

    pub fn control(&self) -> &Control {
        &self.control
    }

    pub fn node(&self) -> &Node {
        self.control.node()
    }

    pub fn items(&self) -> Vec<NativeRef> {
        self.items.read().clone()
    }

    /// Replace the items. Dividers that still separate two items keep their
    /// positions; new ones are spread evenly.
    pub fn set_items(&self, items: Vec<NativeRef>) {
        let count = items.len();
        *self.items.write() = items;

        let wanted = count.saturating_sub(1);
        let mut dividers = self.dividers.write();
        let kept = dividers.len().min(wanted);
        dividers.truncate(kept);
        for k in kept..wanted {
            dividers.push((k + 1) as f64 / count as f64);
        }
    }

    pub fn orientation(&self) -> Orientation {
        *self.orientation.read()
    }

    pub fn set_orientation(&self, orientation: Orientation) {
        *self.orientation.write() = orientation;
    }

    pub fn divider_positions(&self) -> Vec<f64> {
        self.dividers.read().clone()
    }

    /// Set positions for the leading dividers. Extra positions are ignored.
    pub fn set_divider_positions(&self, positions: &[f64]) {
        let mut dividers = self.dividers.write();
        for (slot, position) in dividers.iter_mut().zip(positions) {
            *slot = position.clamp(0.0, 1.0);
        }
    }

    /// Move one divider. Out-of-range indices are ignored.
    pub fn set_divider_position(&self, index: usize, position: f64) {
        if let Some(slot) = self.dividers.write().get_mut(index) {
            *slot = position.clamp(0.0, 1.0);
        }
    }

    /// Whether `node` grows and shrinks with a split pane it is placed in.
    pub fn set_resizable_with_parent(node: &Node, value: bool) {
        node.set_resizable_with_parent(value);
    }

    pub fn is_resizable_with_parent(node: &Node) -> bool {
        node.is_resizable_with_parent()
    }
}

impl NativeType for SplitPane {
    const NAME: &'static str = "SplitPane";

    fn upcast(&self, target: TypeHash) -> Option<&dyn Any> {
        if target == TypeHash::of::<Control>() {
            Some(&self.control as &dyn Any)
        } else if target == TypeHash::of::<Node>() {
            Some(self.control.node() as &dyn Any)
        } else {
            None
        }
    }
}
