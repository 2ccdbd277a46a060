use uxbind_core::{
    ClassDef, ConversionError, NativeError, NativeFn, NativeRef, ParamKind, TypeHash,
};
use uxbind_registry::ClassBuilder;

use crate::NAMESPACE;
use crate::toolkit::{Node, Orientation, SplitPane};

/// `fx\UXSplitPane`, extending `UXControl`.
///
/// `items` holds wrapped nodes of any kind; reading it wraps each item with
/// its most specific class.
pub fn class(control: &ClassDef) -> ClassDef {
    let node = TypeHash::of::<Node>();

    ClassBuilder::<SplitPane>::new("UXSplitPane")
        .namespace(NAMESPACE)
        .extends(control)
        .constructor(vec![], |_ctx| Ok(SplitPane::new()))
        .constructor(vec![ParamKind::native_list::<Node>()], move |ctx| {
            Ok(SplitPane::with_items(ctx.arg_native_list(0, node)?))
        })
        .property_raw(
            "items",
            ParamKind::native_list::<Node>(),
            NativeFn::new(move |ctx| {
                let items = ctx.this::<SplitPane>()?.items();
                ctx.set_return_native_list(node, items)
            }),
            Some(NativeFn::new(move |ctx| {
                let items = ctx.arg_native_list(0, node)?;
                ctx.this::<SplitPane>()?.set_items(items);
                Ok(())
            })),
        )
        .property("orientation", SplitPane::orientation, |pane, o: Orientation| {
            pane.set_orientation(o)
        })
        .property(
            "dividerPositions",
            SplitPane::divider_positions,
            |pane, positions: Vec<f64>| pane.set_divider_positions(&positions),
        )
        .method2(
            "setDividerPosition",
            |pane, index: usize, position: f64| pane.set_divider_position(index, position),
        )
        .static_method(
            "setResizeWithParent",
            vec![ParamKind::native::<Node>(), ParamKind::Bool],
            move |ctx| {
                let target = ctx.arg_native_required(0, node, "Node")?;
                let value: bool = ctx.arg(1)?;
                SplitPane::set_resizable_with_parent(as_node(&target)?, value);
                Ok(())
            },
        )
        .static_method(
            "isResizeWithParent",
            vec![ParamKind::native::<Node>()],
            move |ctx| {
                let target = ctx.arg_native_required(0, node, "Node")?;
                ctx.set_return(SplitPane::is_resizable_with_parent(as_node(&target)?));
                Ok(())
            },
        )
        .build()
}

fn as_node(native: &NativeRef) -> Result<&Node, NativeError> {
    native
        .get::<Node>()
        .ok_or_else(|| ConversionError::mismatch("Node", native.type_name()).into())
}
