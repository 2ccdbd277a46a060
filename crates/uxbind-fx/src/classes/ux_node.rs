use uxbind_core::ClassDef;
use uxbind_registry::ClassBuilder;

use crate::NAMESPACE;
use crate::toolkit::Node;

/// `fx\UXNode`: identity, style and visibility shared by every node.
pub fn class() -> ClassDef {
    ClassBuilder::<Node>::new("UXNode")
        .namespace(NAMESPACE)
        .constructor(vec![], |_ctx| Ok(Node::new()))
        .property("id", Node::id, |node, id: Option<String>| node.set_id(id))
        .property("style", Node::style, Node::set_style)
        .property("visible", Node::is_visible, Node::set_visible)
        .property("opacity", Node::opacity, Node::set_opacity)
        .property_get("resizableWithParent", Node::is_resizable_with_parent)
        .build()
}
