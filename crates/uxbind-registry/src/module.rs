//! Registration bundles.
//!
//! A [`Module`] collects everything one toolkit binding contributes (foreign
//! types, subtype edges, converters, wrapper classes) so it can be installed
//! into a [`RegistryBuilder`](crate::RegistryBuilder) in one step.
//!
//! ```ignore
//! let module = Module::new("fx")
//!     .ty::<Node>()
//!     .ty::<Control>()
//!     .subtype::<Control, Node>()
//!     .class(ux_node::class())
//!     .converter(Arc::new(ImageConverter::new(image_class)));
//!
//! builder.install(module)?;
//! ```

use std::fmt;
use std::sync::Arc;

use uxbind_core::{ClassDef, Converter, ForeignType, NativeType};

/// Types, edges, converters and classes contributed by one binding.
pub struct Module {
    name: String,
    pub(crate) types: Vec<ForeignType>,
    /// (child, parent)
    pub(crate) subtypes: Vec<(ForeignType, ForeignType)>,
    pub(crate) converters: Vec<Arc<dyn Converter>>,
    pub(crate) classes: Vec<Arc<ClassDef>>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            types: Vec::new(),
            subtypes: Vec::new(),
            converters: Vec::new(),
            classes: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declare a native type.
    pub fn ty<T: NativeType>(self) -> Self {
        self.foreign_type(ForeignType::of::<T>())
    }

    /// Declare a foreign type by identity.
    pub fn foreign_type(mut self, ty: ForeignType) -> Self {
        self.types.push(ty);
        self
    }

    /// Declare `C` a direct subtype of `P`.
    pub fn subtype<C: NativeType, P: NativeType>(mut self) -> Self {
        self.subtypes
            .push((ForeignType::of::<C>(), ForeignType::of::<P>()));
        self
    }

    pub fn converter(mut self, converter: Arc<dyn Converter>) -> Self {
        self.converters.push(converter);
        self
    }

    pub fn class(mut self, class: impl Into<Arc<ClassDef>>) -> Self {
        self.classes.push(class.into());
        self
    }
}

impl fmt::Debug for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Module")
            .field("name", &self.name)
            .field("types", &self.types)
            .field("subtypes", &self.subtypes)
            .field("converters", &format!("<{} converters>", self.converters.len()))
            .field("classes", &self.classes.len())
            .finish()
    }
}
