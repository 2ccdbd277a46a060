use uxbind_core::ClassDef;
use uxbind_registry::ClassBuilder;

use crate::NAMESPACE;
use crate::toolkit::Control;

/// `fx\UXControl`, extending `UXNode`.
pub fn class(node: &ClassDef) -> ClassDef {
    ClassBuilder::<Control>::new("UXControl")
        .namespace(NAMESPACE)
        .extends(node)
        .constructor(vec![], |_ctx| Ok(Control::new()))
        .property("tooltip", Control::tooltip, |control, text: Option<String>| {
            control.set_tooltip(text)
        })
        .build()
}
