//! Fluent builder for wrapper class capability tables.
//!
//! # Example
//!
//! ```ignore
//! let class = ClassBuilder::<SplitPane>::new("UXSplitPane")
//!     .namespace("fx")
//!     .extends(&control_class)
//!     .constructor(vec![], |_ctx| Ok(SplitPane::new()))
//!     .property("orientation", |p| p.orientation(), |p, o| p.set_orientation(o))
//!     .method2("setDividerPosition", |p, index: usize, pos: f64| p.set_divider_position(index, pos))
//!     .build();
//! ```
//!
//! Typed helpers cover properties and methods whose values are primitives.
//! Members that take or return native objects use the raw forms and
//! marshal through the [`CallContext`].

use std::marker::PhantomData;
use std::sync::Arc;

use uxbind_core::{
    CallContext, ClassDef, ForeignType, FromDynamic, IntoDynamic, MethodDef, NativeError,
    NativeFn, NativeRef, NativeType, ParamKind, PropertyDef,
};

/// Builder for the capability table of a class wrapping `T`.
pub struct ClassBuilder<T: NativeType> {
    class: ClassDef,
    _marker: PhantomData<fn() -> T>,
}

impl<T: NativeType> ClassBuilder<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            class: ClassDef::new(name, ForeignType::of::<T>()),
            _marker: PhantomData,
        }
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.class.set_namespace(namespace);
        self
    }

    /// Inherit the parent's properties and methods.
    ///
    /// Call this before declaring members so the class's own members shadow
    /// the inherited ones.
    pub fn extends(mut self, parent: &ClassDef) -> Self {
        self.class.inherit(parent);
        self
    }

    // =========================================================================
    // Constructors
    // =========================================================================

    /// Add a constructor variant. The returned object is adopted by the new
    /// wrapper.
    pub fn constructor<F>(mut self, params: Vec<ParamKind>, f: F) -> Self
    where
        F: Fn(&mut CallContext<'_>) -> Result<T, NativeError> + Send + Sync + 'static,
    {
        let native = NativeFn::new(move |ctx| {
            let value = f(ctx)?;
            ctx.construct(NativeRef::new(value));
            Ok(())
        });
        let name = self.class.name().to_string();
        self.class
            .add_constructor(MethodDef::new(name, params, native));
        self
    }

    /// Add a constructor variant that hands back an object the toolkit
    /// already shares.
    pub fn constructor_shared<F>(mut self, params: Vec<ParamKind>, f: F) -> Self
    where
        F: Fn(&mut CallContext<'_>) -> Result<Arc<T>, NativeError> + Send + Sync + 'static,
    {
        let native = NativeFn::new(move |ctx| {
            let value = f(ctx)?;
            ctx.construct(NativeRef::from_arc(value));
            Ok(())
        });
        let name = self.class.name().to_string();
        self.class
            .add_constructor(MethodDef::new(name, params, native));
        self
    }

    // =========================================================================
    // Properties
    // =========================================================================

    /// Read-write property with a primitive value.
    pub fn property<V, G, S>(mut self, name: &str, get: G, set: S) -> Self
    where
        V: FromDynamic + IntoDynamic,
        G: Fn(&T) -> V + Send + Sync + 'static,
        S: Fn(&T, V) + Send + Sync + 'static,
    {
        self.class.add_property(PropertyDef {
            name: name.to_string(),
            value_kind: V::param_kind(),
            getter: getter(get),
            setter: Some(NativeFn::new(move |ctx| {
                let value: V = ctx.arg(0)?;
                set(ctx.this::<T>()?, value);
                Ok(())
            })),
        });
        self
    }

    /// Read-only property with a primitive value.
    pub fn property_get<V, G>(mut self, name: &str, get: G) -> Self
    where
        V: FromDynamic + IntoDynamic,
        G: Fn(&T) -> V + Send + Sync + 'static,
    {
        self.class.add_property(PropertyDef {
            name: name.to_string(),
            value_kind: V::param_kind(),
            getter: getter(get),
            setter: None,
        });
        self
    }

    /// Property with hand-written delegates, for native-typed values.
    pub fn property_raw(
        mut self,
        name: &str,
        value_kind: ParamKind,
        getter: NativeFn,
        setter: Option<NativeFn>,
    ) -> Self {
        self.class.add_property(PropertyDef {
            name: name.to_string(),
            value_kind,
            getter,
            setter,
        });
        self
    }

    // =========================================================================
    // Methods
    // =========================================================================

    /// Instance method with a hand-written delegate.
    pub fn method<F>(mut self, name: &str, params: Vec<ParamKind>, f: F) -> Self
    where
        F: Fn(&mut CallContext<'_>) -> Result<(), NativeError> + Send + Sync + 'static,
    {
        self.class
            .add_method(MethodDef::new(name, params, NativeFn::new(f)));
        self
    }

    pub fn method0<R, F>(self, name: &str, f: F) -> Self
    where
        R: IntoDynamic,
        F: Fn(&T) -> R + Send + Sync + 'static,
    {
        self.method(name, vec![], move |ctx| {
            let result = f(ctx.this::<T>()?);
            ctx.set_return(result);
            Ok(())
        })
    }

    pub fn method1<A, R, F>(self, name: &str, f: F) -> Self
    where
        A: FromDynamic,
        R: IntoDynamic,
        F: Fn(&T, A) -> R + Send + Sync + 'static,
    {
        self.method(name, vec![A::param_kind()], move |ctx| {
            let a: A = ctx.arg(0)?;
            let result = f(ctx.this::<T>()?, a);
            ctx.set_return(result);
            Ok(())
        })
    }

    pub fn method2<A, B, R, F>(self, name: &str, f: F) -> Self
    where
        A: FromDynamic,
        B: FromDynamic,
        R: IntoDynamic,
        F: Fn(&T, A, B) -> R + Send + Sync + 'static,
    {
        self.method(name, vec![A::param_kind(), B::param_kind()], move |ctx| {
            let a: A = ctx.arg(0)?;
            let b: B = ctx.arg(1)?;
            let result = f(ctx.this::<T>()?, a, b);
            ctx.set_return(result);
            Ok(())
        })
    }

    /// Static method. The delegate runs without a receiver.
    pub fn static_method<F>(mut self, name: &str, params: Vec<ParamKind>, f: F) -> Self
    where
        F: Fn(&mut CallContext<'_>) -> Result<(), NativeError> + Send + Sync + 'static,
    {
        self.class
            .add_static_method(MethodDef::new(name, params, NativeFn::new(f)));
        self
    }

    pub fn build(self) -> ClassDef {
        self.class
    }
}

fn getter<T, V, G>(get: G) -> NativeFn
where
    T: NativeType,
    V: IntoDynamic,
    G: Fn(&T) -> V + Send + Sync + 'static,
{
    NativeFn::new(move |ctx| {
        let value = get(ctx.this::<T>()?);
        ctx.set_return(value);
        Ok(())
    })
}
