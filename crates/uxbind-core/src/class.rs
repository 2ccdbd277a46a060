//! Declared capability surface of a wrapper class.
//!
//! A [`ClassDef`] is the explicit, statically written table of what scripted
//! code may do with a wrapped native object: its properties (getter, optional
//! setter, value shape), instance methods, static methods and constructor
//! variants. Every entry is a [`NativeFn`] that delegates to the toolkit; the
//! table holds no business logic of its own.
//!
//! Tables are assembled once at registration time (see `ClassBuilder` in
//! `uxbind-registry`) and shared read-only behind an `Arc`.

use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;
use rustc_hash::FxHashMap;

use crate::call_context::CallContext;
use crate::error::NativeError;
use crate::type_hash::{ForeignType, TypeHash};

// ============================================================================
// Native functions
// ============================================================================

/// Type-erased native delegate.
///
/// Cloning shares the underlying callable.
#[derive(Clone)]
pub struct NativeFn {
    inner: Arc<dyn Fn(&mut CallContext<'_>) -> Result<(), NativeError> + Send + Sync>,
}

impl NativeFn {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&mut CallContext<'_>) -> Result<(), NativeError> + Send + Sync + 'static,
    {
        Self { inner: Arc::new(f) }
    }

    /// Call this native function with the given context.
    pub fn call(&self, ctx: &mut CallContext<'_>) -> Result<(), NativeError> {
        (self.inner)(ctx)
    }
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFn").finish_non_exhaustive()
    }
}

// ============================================================================
// Parameter shapes
// ============================================================================

/// Shape of one declared parameter, used to pick between overloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamKind {
    /// Any value, no conversion
    Any,
    Bool,
    Int,
    /// Float (ints widen)
    Float,
    String,
    /// List of scalars
    List,
    /// Runtime stream handle
    Stream,
    /// Native object of the given type, marshalled through its converter
    Native(ForeignType),
    /// List whose elements are native objects of the given type
    NativeList(ForeignType),
    /// The inner shape or null
    Optional(Box<ParamKind>),
}

impl ParamKind {
    pub fn native<T: crate::NativeType>() -> Self {
        ParamKind::Native(ForeignType::of::<T>())
    }

    pub fn native_list<T: crate::NativeType>() -> Self {
        ParamKind::NativeList(ForeignType::of::<T>())
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamKind::Any => f.write_str("mixed"),
            ParamKind::Bool => f.write_str("bool"),
            ParamKind::Int => f.write_str("int"),
            ParamKind::Float => f.write_str("float"),
            ParamKind::String => f.write_str("string"),
            ParamKind::List => f.write_str("list"),
            ParamKind::Stream => f.write_str("stream"),
            ParamKind::Native(ty) => f.write_str(ty.name),
            ParamKind::NativeList(ty) => write!(f, "list<{}>", ty.name),
            ParamKind::Optional(inner) => write!(f, "?{}", inner),
        }
    }
}

// ============================================================================
// Members
// ============================================================================

bitflags! {
    /// Access a property grants to scripted code.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PropertyAccess: u8 {
        const READ = 1 << 0;
        const WRITE = 1 << 1;
    }
}

/// An exposed property: native getter, optional native setter.
#[derive(Debug, Clone)]
pub struct PropertyDef {
    pub name: String,
    /// Shape of the property's value
    pub value_kind: ParamKind,
    pub getter: NativeFn,
    pub setter: Option<NativeFn>,
}

impl PropertyDef {
    pub fn access(&self) -> PropertyAccess {
        match self.setter {
            Some(_) => PropertyAccess::READ | PropertyAccess::WRITE,
            None => PropertyAccess::READ,
        }
    }

    pub fn is_read_only(&self) -> bool {
        self.setter.is_none()
    }
}

/// One overload of a method, static method or constructor.
#[derive(Debug, Clone)]
pub struct MethodDef {
    pub name: String,
    pub params: Vec<ParamKind>,
    pub native: NativeFn,
}

impl MethodDef {
    pub fn new(name: impl Into<String>, params: Vec<ParamKind>, native: NativeFn) -> Self {
        Self {
            name: name.into(),
            params,
            native,
        }
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Render the signature, e.g. `setDividerPosition(int, float)`.
    pub fn signature(&self) -> String {
        let params: Vec<String> = self.params.iter().map(ToString::to_string).collect();
        format!("{}({})", self.name, params.join(", "))
    }
}

// ============================================================================
// Class definition
// ============================================================================

/// Capability set of one wrapper class.
#[derive(Debug, Clone)]
pub struct ClassDef {
    name: String,
    namespace: Option<String>,
    native: ForeignType,
    parent: Option<String>,
    properties: FxHashMap<String, PropertyDef>,
    methods: FxHashMap<String, Vec<MethodDef>>,
    static_methods: FxHashMap<String, Vec<MethodDef>>,
    constructors: Vec<MethodDef>,
}

impl ClassDef {
    /// Create an empty capability set for a class wrapping `native`.
    pub fn new(name: impl Into<String>, native: ForeignType) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            native,
            parent: None,
            properties: FxHashMap::default(),
            methods: FxHashMap::default(),
            static_methods: FxHashMap::default(),
            constructors: Vec::new(),
        }
    }

    // =========================================================================
    // Identity
    // =========================================================================

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Name including the namespace, e.g. `fx\UXImage`.
    pub fn qualified_name(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{}\\{}", ns, self.name),
            None => self.name.clone(),
        }
    }

    /// Foreign type of the wrapped native objects.
    pub fn native_type(&self) -> ForeignType {
        self.native
    }

    pub fn native_hash(&self) -> TypeHash {
        self.native.hash
    }

    /// Qualified name of the class this one extends.
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    pub fn property(&self, name: &str) -> Option<&PropertyDef> {
        self.properties.get(name)
    }

    pub fn properties(&self) -> impl Iterator<Item = &PropertyDef> {
        self.properties.values()
    }

    /// Overloads of an instance method.
    pub fn method(&self, name: &str) -> &[MethodDef] {
        self.methods.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Overloads of a static method.
    pub fn static_method(&self, name: &str) -> &[MethodDef] {
        self.static_methods
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn constructors(&self) -> &[MethodDef] {
        &self.constructors
    }

    pub fn has_member(&self, name: &str) -> bool {
        self.properties.contains_key(name)
            || self.methods.contains_key(name)
            || self.static_methods.contains_key(name)
    }

    // =========================================================================
    // Assembly (used by class builders at registration time)
    // =========================================================================

    pub fn set_namespace(&mut self, namespace: impl Into<String>) {
        self.namespace = Some(namespace.into());
    }

    /// Inherit every member of `parent`. Members added later shadow it.
    ///
    /// Constructors are not inherited.
    pub fn inherit(&mut self, parent: &ClassDef) {
        self.parent = Some(parent.qualified_name());
        for (name, prop) in &parent.properties {
            self.properties.insert(name.clone(), prop.clone());
        }
        for (name, overloads) in &parent.methods {
            self.methods.insert(name.clone(), overloads.clone());
        }
        for (name, overloads) in &parent.static_methods {
            self.static_methods.insert(name.clone(), overloads.clone());
        }
    }

    pub fn add_property(&mut self, property: PropertyDef) {
        self.properties.insert(property.name.clone(), property);
    }

    /// Add an instance method overload.
    ///
    /// An overload with the same parameter shape as an inherited one replaces
    /// it.
    pub fn add_method(&mut self, method: MethodDef) {
        Self::push_overload(&mut self.methods, method);
    }

    pub fn add_static_method(&mut self, method: MethodDef) {
        Self::push_overload(&mut self.static_methods, method);
    }

    pub fn add_constructor(&mut self, constructor: MethodDef) {
        self.constructors.push(constructor);
    }

    fn push_overload(table: &mut FxHashMap<String, Vec<MethodDef>>, method: MethodDef) {
        let overloads = table.entry(method.name.clone()).or_default();
        overloads.retain(|existing| existing.params != method.params);
        overloads.push(method);
    }
}
