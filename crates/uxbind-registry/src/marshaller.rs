//! Entry points the scripting runtime calls.
//!
//! A [`Marshaller`] pairs the frozen [`Registry`] with the runtime's stream
//! subsystem. It is cheap to create (two references) and implements
//! [`Marshal`], so converters and native delegates re-enter dispatch through
//! it for nested values.

use std::sync::Arc;

use tracing::{trace, warn};
use uxbind_core::{
    CallContext, ClassDef, ConvertContext, Dynamic, KindSet, Marshal, MarshalError, NativeError,
    NativeRef, NativeType, ObjectRef, StreamProvider, Subtyping, TraceInfo, TypeHash,
    WrapperObject, overload,
};

use crate::registry::Registry;

/// Conversion dispatch bound to one registry and one stream provider.
#[derive(Clone, Copy)]
pub struct Marshaller<'r> {
    registry: &'r Registry,
    streams: &'r dyn StreamProvider,
}

impl<'r> Marshaller<'r> {
    pub fn new(registry: &'r Registry, streams: &'r dyn StreamProvider) -> Self {
        Self { registry, streams }
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    /// Typed form of [`Marshal::to_native`].
    pub fn to_native_as<T: NativeType>(
        &self,
        value: &Dynamic,
        trace: &TraceInfo,
    ) -> Result<Option<NativeRef>, MarshalError> {
        self.to_native(TypeHash::of::<T>(), value, trace)
    }

    /// Typed form of [`Marshal::from_native`].
    pub fn from_native_as<T: NativeType>(
        &self,
        native: Option<Arc<T>>,
        trace: &TraceInfo,
    ) -> Result<Dynamic, MarshalError> {
        self.from_native(TypeHash::of::<T>(), native.map(NativeRef::from_arc), trace)
    }

    // =========================================================================
    // Wrapper construction and static calls
    // =========================================================================

    /// Build a new wrapper: pick the constructor variant that fits `args`,
    /// run it, and adopt the native object it returns.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn construct(
        &self,
        class_name: &str,
        args: &[Dynamic],
        trace: &TraceInfo,
    ) -> Result<Dynamic, MarshalError> {
        let class = self.registry.class(class_name)?;
        let constructor = overload::resolve(
            &class.qualified_name(),
            class.constructors(),
            args,
            self,
        )
        .map_err(|e| self.fail(trace, e))?;

        trace!(class = class.name(), ctor = %constructor.signature(), "construct");
        let mut ctx = CallContext::new(self, trace, None, args);
        constructor
            .native
            .call(&mut ctx)
            .map_err(|e| self.fail(trace, e))?;
        let native = ctx.take_constructed().ok_or_else(|| {
            self.fail(
                trace,
                NativeError::toolkit(format!("constructor of {} produced no object", class.name())),
            )
        })?;

        Ok(Dynamic::Object(Arc::new(WrapperObject::adopt(
            Arc::clone(class),
            native,
        ))))
    }

    /// Call a static method of a class.
    pub fn call_static(
        &self,
        class_name: &str,
        method: &str,
        args: &[Dynamic],
        trace: &TraceInfo,
    ) -> Result<Dynamic, MarshalError> {
        let class = self.registry.class(class_name)?;
        let overloads = class.static_method(method);
        if overloads.is_empty() {
            return Err(self.fail(
                trace,
                NativeError::UnknownMember {
                    class: class.qualified_name(),
                    member: method.to_string(),
                },
            ));
        }

        let callee = format!("{}::{}", class.name(), method);
        let method = overload::resolve(&callee, overloads, args, self)
            .map_err(|e| self.fail(trace, e))?;

        trace!(class = class.name(), method = %method.signature(), "call static");
        let mut ctx = CallContext::new(self, trace, None, args);
        method
            .native
            .call(&mut ctx)
            .map_err(|e| self.fail(trace, e))?;
        Ok(ctx.into_return())
    }

    // =========================================================================
    // Member access on runtime values
    // =========================================================================

    pub fn get(
        &self,
        object: &Dynamic,
        name: &str,
        trace: &TraceInfo,
    ) -> Result<Dynamic, MarshalError> {
        self.object(object, trace)?.get(self, name, trace)
    }

    pub fn set(
        &self,
        object: &Dynamic,
        name: &str,
        value: Dynamic,
        trace: &TraceInfo,
    ) -> Result<(), MarshalError> {
        self.object(object, trace)?.set(self, name, value, trace)
    }

    pub fn call(
        &self,
        object: &Dynamic,
        name: &str,
        args: &[Dynamic],
        trace: &TraceInfo,
    ) -> Result<Dynamic, MarshalError> {
        self.object(object, trace)?.call(self, name, args, trace)
    }

    fn object<'v>(
        &self,
        value: &'v Dynamic,
        trace: &TraceInfo,
    ) -> Result<&'v ObjectRef, MarshalError> {
        value.as_object().ok_or_else(|| {
            self.fail(
                trace,
                NativeError::invalid_this(format!("expected an object, got {}", value.type_name())),
            )
        })
    }

    fn fail(&self, trace: &TraceInfo, err: NativeError) -> MarshalError {
        warn!(%trace, error = %err, "native call failed");
        MarshalError::native(trace, err)
    }
}

impl Subtyping for Marshaller<'_> {
    fn is_assignable(&self, from: TypeHash, to: TypeHash) -> bool {
        self.registry.is_assignable(from, to)
    }
}

impl Marshal for Marshaller<'_> {
    #[cfg_attr(feature = "profiling", profiling::function)]
    fn to_native(
        &self,
        target: TypeHash,
        value: &Dynamic,
        trace: &TraceInfo,
    ) -> Result<Option<NativeRef>, MarshalError> {
        let (ty, converter) = self.registry.resolve(target).inspect_err(|e| {
            warn!(%trace, error = %e, "no converter");
        })?;

        trace!(
            target = ty.name,
            kind = value.type_name(),
            converter = converter.name(),
            "to_native"
        );
        let cx = ConvertContext::new(self, self.streams, self.registry.config(), trace);
        converter.to_native(&cx, ty, value).map_err(|e| {
            warn!(%trace, target = ty.name, error = %e, "conversion failed");
            MarshalError::conversion(trace, e)
        })
    }

    #[cfg_attr(feature = "profiling", profiling::function)]
    fn from_native(
        &self,
        target: TypeHash,
        native: Option<NativeRef>,
        trace: &TraceInfo,
    ) -> Result<Dynamic, MarshalError> {
        let (ty, converter) = self.registry.resolve(target).inspect_err(|e| {
            warn!(%trace, error = %e, "no converter");
        })?;

        trace!(
            target = ty.name,
            null = native.is_none(),
            converter = converter.name(),
            "from_native"
        );
        let cx = ConvertContext::new(self, self.streams, self.registry.config(), trace);
        Ok(converter.from_native(&cx, native))
    }

    fn class_for_native(&self, native_type: TypeHash) -> Option<Arc<ClassDef>> {
        self.registry.class_for_native(native_type).cloned()
    }

    fn accepted_kinds(&self, target: TypeHash) -> KindSet {
        self.registry
            .lookup(target)
            .map(|converter| converter.accepted_kinds())
            .unwrap_or(KindSet::empty())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicI64, Ordering};

    use uxbind_core::{
        ConfigurationError, ConversionError, Converter, ForeignType, MarshalConfig, ParamKind,
        ResourceError, StreamHandle, ValueKind,
    };

    use super::*;
    use crate::{ClassBuilder, Module, RegistryBuilder, StreamTable};

    struct Panel {
        width: AtomicI64,
    }

    impl Panel {
        fn new(width: i64) -> Self {
            Self {
                width: AtomicI64::new(width),
            }
        }
    }

    impl NativeType for Panel {
        const NAME: &'static str = "Panel";
    }

    struct Frame {
        panel: Panel,
        title: String,
    }

    impl NativeType for Frame {
        const NAME: &'static str = "Frame";

        fn upcast(&self, target: TypeHash) -> Option<&dyn std::any::Any> {
            (target == TypeHash::of::<Panel>()).then_some(&self.panel as &dyn std::any::Any)
        }
    }

    struct Blob {
        bytes: Vec<u8>,
    }

    impl NativeType for Blob {
        const NAME: &'static str = "Blob";
    }

    /// Builds blobs from streams.
    struct BlobConverter {
        types: [ForeignType; 1],
        class: Arc<ClassDef>,
    }

    impl Converter for BlobConverter {
        fn name(&self) -> &str {
            "blob"
        }

        fn supported_types(&self) -> &[ForeignType] {
            &self.types
        }

        fn accepted_kinds(&self) -> KindSet {
            KindSet::STREAM
        }

        fn to_native(
            &self,
            cx: &ConvertContext<'_>,
            target: ForeignType,
            value: &Dynamic,
        ) -> Result<Option<NativeRef>, ConversionError> {
            if value.is_null() {
                return Ok(None);
            }
            if let Some(native) = cx.passthrough(value, target.hash) {
                return Ok(Some(native));
            }
            if value.kind() != ValueKind::Stream {
                return Err(ConversionError::mismatch(target.name, value.describe()));
            }
            let bytes = cx
                .read_stream(value)
                .map_err(|e| ConversionError::resource(target.name, e))?;
            Ok(Some(NativeRef::new(Blob { bytes })))
        }

        fn from_native(&self, cx: &ConvertContext<'_>, native: Option<NativeRef>) -> Dynamic {
            match native {
                Some(native) => cx.wrap(native, &self.class),
                None => Dynamic::Null,
            }
        }
    }

    fn panel_class() -> ClassDef {
        ClassBuilder::<Panel>::new("UXPanel")
            .namespace("test")
            .constructor(vec![ParamKind::Int], |ctx| Ok(Panel::new(ctx.arg(0)?)))
            .property(
                "width",
                |p| p.width.load(Ordering::SeqCst),
                |p, w: i64| p.width.store(w, Ordering::SeqCst),
            )
            .static_method("defaultWidth", vec![], |ctx| {
                ctx.set_return(320i64);
                Ok(())
            })
            .build()
    }

    fn registry(config: MarshalConfig) -> Registry {
        let panel = panel_class();
        let frame = ClassBuilder::<Frame>::new("UXFrame")
            .namespace("test")
            .extends(&panel)
            .constructor(vec![ParamKind::String], |ctx| {
                Ok(Frame {
                    panel: Panel::new(0),
                    title: ctx.arg(0)?,
                })
            })
            .property_get("title", |f| f.title.clone())
            .build();
        let blob = Arc::new(ClassBuilder::<Blob>::new("UXBlob").build());

        let module = Module::new("test")
            .ty::<Panel>()
            .ty::<Frame>()
            .subtype::<Frame, Panel>()
            .class(panel)
            .class(frame)
            .class(Arc::clone(&blob))
            .converter(Arc::new(BlobConverter {
                types: [ForeignType::of::<Blob>()],
                class: blob,
            }));

        let mut builder = RegistryBuilder::with_config(config);
        builder.install(module).unwrap();
        builder.build().unwrap()
    }

    fn trace() -> TraceInfo {
        TraceInfo::new("window.ux", 12, 5)
    }

    #[test]
    fn null_round_trips_for_every_served_type() {
        let registry = registry(MarshalConfig::default());
        let streams = StreamTable::new();
        let m = Marshaller::new(&registry, &streams);

        for ty in registry.served_types() {
            assert!(m.to_native(ty.hash, &Dynamic::Null, &trace()).unwrap().is_none());
            assert!(m.from_native(ty.hash, None, &trace()).unwrap().is_null());
        }
    }

    #[test]
    fn passthrough_returns_same_native() {
        let registry = registry(MarshalConfig::default());
        let streams = StreamTable::new();
        let m = Marshaller::new(&registry, &streams);

        let native = NativeRef::new(Panel::new(10));
        let wrapped = m
            .from_native(TypeHash::of::<Panel>(), Some(native.clone()), &trace())
            .unwrap();
        let back = m
            .to_native(TypeHash::of::<Panel>(), &wrapped, &trace())
            .unwrap()
            .unwrap();
        assert!(back.ptr_eq(&native));
    }

    #[test]
    fn subtype_wrapper_passes_into_supertype_slot() {
        let registry = registry(MarshalConfig::default());
        let streams = StreamTable::new();
        let m = Marshaller::new(&registry, &streams);

        let frame = m
            .construct("UXFrame", &[Dynamic::from("main")], &trace())
            .unwrap();
        let native = frame.as_object().unwrap().native().clone();
        let as_panel = m
            .to_native(TypeHash::of::<Panel>(), &frame, &trace())
            .unwrap()
            .unwrap();
        assert!(as_panel.ptr_eq(&native));
    }

    #[test]
    fn supertype_wrapper_rejected_by_subtype_slot() {
        let registry = registry(MarshalConfig::default());
        let streams = StreamTable::new();
        let m = Marshaller::new(&registry, &streams);

        let panel = m.construct("UXPanel", &[Dynamic::Int(5)], &trace()).unwrap();
        let err = m
            .to_native(TypeHash::of::<Frame>(), &panel, &trace())
            .unwrap_err();
        assert!(matches!(
            err,
            MarshalError::Conversion {
                source: ConversionError::TypeMismatch { .. },
                ..
            }
        ));
        assert!(err.to_string().contains("window.ux:12:5"));
    }

    #[test]
    fn base_converter_wraps_with_most_specific_class() {
        let registry = registry(MarshalConfig::default());
        let streams = StreamTable::new();
        let m = Marshaller::new(&registry, &streams);

        let frame = NativeRef::new(Frame {
            panel: Panel::new(1),
            title: "child".into(),
        });
        let wrapped = m
            .from_native(TypeHash::of::<Panel>(), Some(frame), &trace())
            .unwrap();
        let obj = wrapped.as_object().unwrap();
        assert_eq!(obj.class().qualified_name(), "test\\UXFrame");
        assert_eq!(
            m.get(&wrapped, "title", &trace()).unwrap(),
            Dynamic::from("child")
        );
    }

    #[test]
    fn construct_then_mutate_through_wrapper() {
        let registry = registry(MarshalConfig::default());
        let streams = StreamTable::new();
        let m = Marshaller::new(&registry, &streams);

        let panel = m
            .construct("test\\UXPanel", &[Dynamic::Int(200)], &trace())
            .unwrap();
        assert_eq!(m.get(&panel, "width", &trace()).unwrap(), Dynamic::Int(200));

        m.set(&panel, "width", Dynamic::Int(640), &trace()).unwrap();
        let native = panel.as_object().unwrap().native();
        assert_eq!(native.get::<Panel>().unwrap().width.load(Ordering::SeqCst), 640);
    }

    #[test]
    fn inherited_property_reaches_base_state() {
        let registry = registry(MarshalConfig::default());
        let streams = StreamTable::new();
        let m = Marshaller::new(&registry, &streams);

        let frame = m
            .construct("UXFrame", &[Dynamic::from("main")], &trace())
            .unwrap();
        m.set(&frame, "width", Dynamic::Int(90), &trace()).unwrap();
        assert_eq!(m.get(&frame, "width", &trace()).unwrap(), Dynamic::Int(90));
    }

    #[test]
    fn constructor_arguments_must_match() {
        let registry = registry(MarshalConfig::default());
        let streams = StreamTable::new();
        let m = Marshaller::new(&registry, &streams);

        let err = m
            .construct("UXPanel", &[Dynamic::from("wide")], &trace())
            .unwrap_err();
        assert!(matches!(
            err,
            MarshalError::Native {
                source: NativeError::NoMatchingOverload { .. },
                ..
            }
        ));
    }

    #[test]
    fn unknown_class_is_configuration_error() {
        let registry = registry(MarshalConfig::default());
        let streams = StreamTable::new();
        let m = Marshaller::new(&registry, &streams);

        let err = m.construct("UXMissing", &[], &trace()).unwrap_err();
        assert!(matches!(
            err,
            MarshalError::Configuration(ConfigurationError::UnknownClass { .. })
        ));
    }

    #[test]
    fn static_method_runs_without_receiver() {
        let registry = registry(MarshalConfig::default());
        let streams = StreamTable::new();
        let m = Marshaller::new(&registry, &streams);

        assert_eq!(
            m.call_static("UXPanel", "defaultWidth", &[], &trace()).unwrap(),
            Dynamic::Int(320)
        );
        // statics are inherited
        assert_eq!(
            m.call_static("UXFrame", "defaultWidth", &[], &trace()).unwrap(),
            Dynamic::Int(320)
        );
        assert!(m.call_static("UXPanel", "nope", &[], &trace()).is_err());
    }

    #[test]
    fn stream_builds_native_object() {
        let registry = registry(MarshalConfig::default());
        let streams = StreamTable::new();
        let m = Marshaller::new(&registry, &streams);

        let handle = streams.register(b"payload".to_vec());
        let native = m
            .to_native_as::<Blob>(&Dynamic::Stream(handle), &trace())
            .unwrap()
            .unwrap();
        assert_eq!(native.get::<Blob>().unwrap().bytes, b"payload");
        assert_eq!(streams.open_count(), 1);
    }

    #[test]
    fn wrong_kind_opens_no_stream() {
        let registry = registry(MarshalConfig::default());
        let streams = StreamTable::new();
        let m = Marshaller::new(&registry, &streams);

        let err = m
            .to_native_as::<Blob>(&Dynamic::Int(7), &trace())
            .unwrap_err();
        assert!(matches!(
            err,
            MarshalError::Conversion {
                source: ConversionError::TypeMismatch { actual: "int", .. },
                ..
            }
        ));
        assert_eq!(streams.open_count(), 0);
    }

    #[test]
    fn oversized_stream_is_rejected() {
        let registry = registry(MarshalConfig::default().with_max_stream_bytes(4));
        let streams = StreamTable::new();
        let m = Marshaller::new(&registry, &streams);

        let handle = streams.register(vec![0u8; 5]);
        let err = m
            .to_native_as::<Blob>(&Dynamic::Stream(handle), &trace())
            .unwrap_err();
        assert!(matches!(
            err,
            MarshalError::Conversion {
                source: ConversionError::Resource {
                    source: ResourceError::TooLarge { limit: 4 },
                    ..
                },
                ..
            }
        ));
    }

    #[test]
    fn unknown_stream_handle() {
        let registry = registry(MarshalConfig::default());
        let streams = StreamTable::new();
        let m = Marshaller::new(&registry, &streams);

        let err = m
            .to_native_as::<Blob>(&Dynamic::Stream(StreamHandle(99)), &trace())
            .unwrap_err();
        assert!(matches!(
            err,
            MarshalError::Conversion {
                source: ConversionError::Resource {
                    source: ResourceError::UnknownHandle(_),
                    ..
                },
                ..
            }
        ));
    }

    #[test]
    fn unregistered_target_type() {
        let registry = registry(MarshalConfig::default());
        let streams = StreamTable::new();
        let m = Marshaller::new(&registry, &streams);

        let err = m
            .to_native(TypeHash::from_name("Slider"), &Dynamic::Null, &trace())
            .unwrap_err();
        assert!(matches!(
            err,
            MarshalError::Configuration(ConfigurationError::UnregisteredType { .. })
        ));
    }

    #[test]
    fn member_access_on_non_object() {
        let registry = registry(MarshalConfig::default());
        let streams = StreamTable::new();
        let m = Marshaller::new(&registry, &streams);

        let err = m.get(&Dynamic::Int(1), "width", &trace()).unwrap_err();
        assert!(matches!(
            err,
            MarshalError::Native {
                source: NativeError::InvalidThis { .. },
                ..
            }
        ));
    }

    #[test]
    fn accepted_kinds_follow_converter() {
        let registry = registry(MarshalConfig::default());
        let streams = StreamTable::new();
        let m = Marshaller::new(&registry, &streams);

        assert_eq!(m.accepted_kinds(TypeHash::of::<Blob>()), KindSet::STREAM);
        assert!(m.accepted_kinds(TypeHash::of::<Panel>()).is_empty());
    }
}
