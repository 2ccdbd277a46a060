use parking_lot::RwLock;
use uxbind_core::NativeType;

/// Base of the scene graph.
#[derive(Debug)]
pub struct Node {
    state: RwLock<NodeState>,
}

#[derive(Debug, Clone)]
struct NodeState {
    id: Option<String>,
    style: String,
    visible: bool,
    opacity: f64,
    /// Set by split panes; None means the default (resizable)
    resizable_with_parent: Option<bool>,
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}

impl Node {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(NodeState {
                id: None,
                style: String::new(),
                visible: true,
                opacity: 1.0,
                resizable_with_parent: None,
            }),
        }
    }

    pub fn id(&self) -> Option<String> {
        self.state.read().id.clone()
    }

    pub fn set_id(&self, id: Option<String>) {
        self.state.write().id = id;
    }

    pub fn style(&self) -> String {
        self.state.read().style.clone()
    }

    pub fn set_style(&self, style: String) {
        self.state.write().style = style;
    }

    pub fn is_visible(&self) -> bool {
        self.state.read().visible
    }

    pub fn set_visible(&self, visible: bool) {
        self.state.write().visible = visible;
    }

    pub fn opacity(&self) -> f64 {
        self.state.read().opacity
    }

    /// Opacity is clamped to `0.0..=1.0`.
    pub fn set_opacity(&self, opacity: f64) {
        self.state.write().opacity = opacity.clamp(0.0, 1.0);
    }

    pub fn is_resizable_with_parent(&self) -> bool {
        self.state.read().resizable_with_parent.unwrap_or(true)
    }

    pub(crate) fn set_resizable_with_parent(&self, value: bool) {
        self.state.write().resizable_with_parent = Some(value);
    }
}

impl NativeType for Node {
    const NAME: &'static str = "Node";
}
