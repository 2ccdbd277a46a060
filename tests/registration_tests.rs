//! Integration tests for registration, conflict detection, and extending the
//! `fx` toolkit with a third-party module.

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use common::{init_tracing, trace};
use uxbind::fx::classes::{ux_control, ux_node};
use uxbind::fx::{Control, Node, SplitPane};
use uxbind::prelude::*;
use uxbind::registry::WrapperConverter;

// =============================================================================
// A third-party widget built on fx
// =============================================================================

#[derive(Default)]
struct Chart {
    control: Control,
    points: AtomicI64,
}

impl NativeType for Chart {
    const NAME: &'static str = "Chart";

    fn upcast(&self, target: TypeHash) -> Option<&dyn std::any::Any> {
        if target == TypeHash::of::<Control>() {
            Some(&self.control as &dyn std::any::Any)
        } else if target == TypeHash::of::<Node>() {
            Some(self.control.node() as &dyn std::any::Any)
        } else {
            None
        }
    }
}

/// Standalone type with its own explicit converter.
struct Dial;

impl NativeType for Dial {
    const NAME: &'static str = "Dial";
}

/// Both a control and a dial.
struct Gauge;

impl NativeType for Gauge {
    const NAME: &'static str = "Gauge";
}

fn charts_module() -> Module {
    let node = ux_node::class();
    let control = ux_control::class(&node);
    let chart = ClassBuilder::<Chart>::new("UXChart")
        .namespace("charts")
        .extends(&control)
        .constructor(vec![], |_ctx| Ok(Chart::default()))
        .constructor(vec![ParamKind::Int], |ctx| {
            let chart = Chart::default();
            chart.points.store(ctx.arg(0)?, Ordering::SeqCst);
            Ok(chart)
        })
        .property(
            "points",
            |c| c.points.load(Ordering::SeqCst),
            |c, v: i64| c.points.store(v, Ordering::SeqCst),
        )
        .build();

    Module::new("charts")
        .ty::<Chart>()
        .subtype::<Chart, Control>()
        .class(chart)
}

fn context_with(modules: Vec<Module>) -> Result<Context, ContextError> {
    init_tracing();
    let mut ctx = Context::new();
    ctx.install(uxbind::fx::module())?;
    for module in modules {
        ctx.install(module)?;
    }
    ctx.seal()?;
    Ok(ctx)
}

#[test]
fn extension_class_gets_a_wrapper_converter() {
    let ctx = context_with(vec![charts_module()]).unwrap();
    let registry = ctx.registry().unwrap();

    let converter = registry.lookup(TypeHash::of::<Chart>()).unwrap();
    assert_eq!(converter.name(), "charts\\UXChart wrapper");
    assert!(registry.class("UXChart").is_ok());
    assert!(registry.is_assignable(TypeHash::of::<Chart>(), TypeHash::of::<Node>()));
}

#[test]
fn extension_objects_live_in_fx_containers() {
    let ctx = context_with(vec![charts_module()]).unwrap();
    let streams = StreamTable::new();
    let m = ctx.marshaller(&streams).unwrap();

    let chart = m
        .construct("UXChart", &[Dynamic::Int(12)], &trace(30))
        .unwrap();
    m.set(&chart, "tooltip", Dynamic::from("sales"), &trace(30))
        .unwrap();
    m.set(&chart, "id", Dynamic::from("sales-chart"), &trace(30))
        .unwrap();

    let pane = m
        .construct("UXSplitPane", &[Dynamic::List(vec![chart.clone()])], &trace(31))
        .unwrap();
    let items = m.get(&pane, "items", &trace(32)).unwrap();
    let item = &items.as_list().unwrap()[0];
    assert_eq!(item.as_object().unwrap().class().qualified_name(), "charts\\UXChart");
    assert_eq!(m.get(item, "points", &trace(32)).unwrap(), Dynamic::Int(12));
    assert_eq!(m.get(item, "tooltip", &trace(32)).unwrap(), Dynamic::from("sales"));

    let native = item.as_object().unwrap().native();
    assert_eq!(native.get::<Node>().unwrap().id().as_deref(), Some("sales-chart"));
}

#[test]
fn explicit_base_converter_serves_subtypes() {
    let node = ux_node::class();
    let controls = Arc::new(WrapperConverter::new(
        "controls",
        vec![ForeignType::of::<Control>()],
        Arc::new(ux_control::class(&node)),
    ));
    let module = Module::new("controls").converter(controls);

    let ctx = context_with(vec![module, charts_module()]).unwrap();
    let registry = ctx.registry().unwrap();
    let served_by = |hash| registry.lookup(hash).unwrap().name().to_string();

    assert_eq!(served_by(TypeHash::of::<Control>()), "controls");
    assert_eq!(served_by(TypeHash::of::<SplitPane>()), "controls");
    assert_eq!(served_by(TypeHash::of::<Chart>()), "controls");
    assert_eq!(served_by(TypeHash::of::<Node>()), "fx\\UXNode wrapper");

    let streams = StreamTable::new();
    let m = ctx.marshaller(&streams).unwrap();
    let wrapped = m
        .from_native(
            TypeHash::of::<Control>(),
            Some(NativeRef::new(Chart::default())),
            &trace(33),
        )
        .unwrap();
    assert_eq!(wrapped.as_object().unwrap().class().name(), "UXChart");
}

// =============================================================================
// Conflicts
// =============================================================================

#[test]
fn duplicate_class_is_rejected() {
    let module = Module::new("fx-again").class(ux_node::class());
    let err = context_with(vec![module]).err().unwrap();
    assert!(matches!(
        err,
        ContextError::Registration(ConfigurationError::DuplicateClass { ref name }) if name == "fx\\UXNode"
    ));
}

#[test]
fn shared_short_name_needs_qualification() {
    let clone = ClassBuilder::<Chart>::new("UXNode")
        .namespace("charts")
        .constructor(vec![], |_ctx| Ok(Chart::default()))
        .build();
    let module = Module::new("charts").ty::<Chart>().class(clone);
    let ctx = context_with(vec![module]).unwrap();
    let registry = ctx.registry().unwrap();

    assert!(matches!(
        registry.class("UXNode"),
        Err(ConfigurationError::UnknownClass { .. })
    ));
    assert_eq!(
        registry.class("fx\\UXNode").unwrap().native_hash(),
        TypeHash::of::<Node>()
    );
    assert_eq!(
        registry.class("charts\\UXNode").unwrap().native_hash(),
        TypeHash::of::<Chart>()
    );
}

#[test]
fn equally_near_converters_are_ambiguous() {
    let dial_class = Arc::new(
        ClassBuilder::<Dial>::new("UXDial")
            .namespace("gauges")
            .build(),
    );
    let module = Module::new("gauges")
        .ty::<Dial>()
        .ty::<Gauge>()
        .subtype::<Gauge, Control>()
        .subtype::<Gauge, Dial>()
        .converter(Arc::new(WrapperConverter::new(
            "dials",
            vec![ForeignType::of::<Dial>()],
            Arc::clone(&dial_class),
        )))
        .class(dial_class);

    let err = context_with(vec![module]).err().unwrap();
    match err {
        ContextError::Registration(ConfigurationError::AmbiguousConverter {
            type_name,
            mut candidates,
        }) => {
            assert_eq!(type_name, "Gauge");
            candidates.sort();
            assert_eq!(candidates, vec!["dials", "fx\\UXControl wrapper"]);
        }
        other => panic!("expected ambiguity, got {other:?}"),
    }
}

#[test]
fn cyclic_subtype_is_rejected() {
    let mut builder = RegistryBuilder::new();
    builder.install(uxbind::fx::module()).unwrap();
    let err = builder.register_subtype::<Node, SplitPane>().unwrap_err();
    assert!(matches!(err, ConfigurationError::CyclicHierarchy { .. }));
}

#[test]
fn subtype_of_undeclared_type_is_rejected() {
    let mut builder = RegistryBuilder::new();
    builder.register_type::<Gauge>();
    let err = builder.register_subtype::<Gauge, Dial>().unwrap_err();
    assert!(matches!(
        err,
        ConfigurationError::UnknownType { ref type_name } if type_name == "Dial"
    ));
}

#[test]
fn converter_without_types_is_rejected() {
    let mut builder = RegistryBuilder::new();
    let empty = WrapperConverter::new("nothing", vec![], Arc::new(ux_node::class()));
    let err = builder.register_converter(Arc::new(empty)).unwrap_err();
    assert!(matches!(err, ConfigurationError::EmptyConverter { .. }));
}

#[test]
fn synthesis_can_be_disabled() {
    let mut ctx = Context::with_config(
        MarshalConfig::default().with_synthesized_converters(false),
    );
    ctx.install(uxbind::fx::module()).unwrap();
    ctx.seal().unwrap();
    let registry = ctx.registry().unwrap();

    assert_eq!(registry.converter_count(), 1);
    assert!(matches!(
        registry.lookup(TypeHash::of::<Node>()),
        Err(ConfigurationError::UnregisteredType { .. })
    ));
}
