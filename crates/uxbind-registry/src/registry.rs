//! Converter registration and the frozen dispatch table.
//!
//! ```text
//! RegistryBuilder (mutable, registration time)
//!     ├── declare types / subtype edges
//!     ├── register converters   (overlap checked immediately)
//!     ├── register classes      (duplicate names checked immediately)
//!     └── build() ──► Registry  (immutable, shared via Arc)
//!                      ├── dispatch: TypeHash -> converter, resolved eagerly
//!                      ├── wrap classes: TypeHash -> most specific class
//!                      └── supertypes: TypeHash -> ancestors
//! ```
//!
//! Dispatch picks the converter registered for the exact type, else the one
//! registered for the nearest supertype. Two different converters at the same
//! nearest distance is an ambiguity, reported by `build()` so that it fails at
//! process start rather than on first use.

use std::fmt;
use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;
use uxbind_core::{
    ClassDef, ConfigurationError, Converter, ForeignType, MarshalConfig, NativeType, Subtyping,
    TypeHash,
};

use crate::hierarchy::TypeHierarchy;
use crate::module::Module;
use crate::wrapper_converter::WrapperConverter;

// ============================================================================
// Builder
// ============================================================================

/// Mutable registration-time view of the registry.
#[derive(Clone, Default)]
pub struct RegistryBuilder {
    config: MarshalConfig,
    hierarchy: TypeHierarchy,
    converters: Vec<Arc<dyn Converter>>,
    /// Foreign type -> index into `converters`
    claims: FxHashMap<TypeHash, usize>,
    classes: Vec<Arc<ClassDef>>,
    class_names: FxHashSet<String>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: MarshalConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &MarshalConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: MarshalConfig) {
        self.config = config;
    }

    // =========================================================================
    // Types
    // =========================================================================

    /// Declare a native type.
    pub fn register_type<T: NativeType>(&mut self) {
        self.declare_type(ForeignType::of::<T>());
    }

    pub fn declare_type(&mut self, ty: ForeignType) {
        self.hierarchy.declare(ty);
    }

    /// Declare `C` a direct subtype of `P`. Both must already be declared.
    pub fn register_subtype<C: NativeType, P: NativeType>(
        &mut self,
    ) -> Result<(), ConfigurationError> {
        self.declare_subtype(ForeignType::of::<C>(), ForeignType::of::<P>())
    }

    pub fn declare_subtype(
        &mut self,
        child: ForeignType,
        parent: ForeignType,
    ) -> Result<(), ConfigurationError> {
        self.hierarchy.add_subtype(child, parent)?;
        debug!(child = child.name, parent = parent.name, "subtype declared");
        Ok(())
    }

    // =========================================================================
    // Converters
    // =========================================================================

    /// Register a converter for the types it declares.
    ///
    /// Fails if the converter declares no types or claims a type another
    /// converter already serves. On failure nothing is registered.
    pub fn register_converter(
        &mut self,
        converter: Arc<dyn Converter>,
    ) -> Result<(), ConfigurationError> {
        let types = converter.supported_types();
        if types.is_empty() {
            return Err(ConfigurationError::EmptyConverter {
                converter: converter.name().to_string(),
            });
        }

        for ty in types {
            if let Some(&existing) = self.claims.get(&ty.hash) {
                return Err(ConfigurationError::OverlappingConverters {
                    type_name: ty.name.to_string(),
                    existing: self.converters[existing].name().to_string(),
                    incoming: converter.name().to_string(),
                });
            }
        }

        let index = self.converters.len();
        for ty in types {
            self.hierarchy.declare(*ty);
            self.claims.insert(ty.hash, index);
        }
        debug!(
            converter = converter.name(),
            types = types.len(),
            "converter registered"
        );
        self.converters.push(converter);
        Ok(())
    }

    // =========================================================================
    // Classes
    // =========================================================================

    /// Register a wrapper class. Its native type is declared implicitly.
    pub fn register_class(
        &mut self,
        class: impl Into<Arc<ClassDef>>,
    ) -> Result<(), ConfigurationError> {
        let class = class.into();
        let name = class.qualified_name();
        if !self.class_names.insert(name.clone()) {
            return Err(ConfigurationError::DuplicateClass { name });
        }
        self.hierarchy.declare(class.native_type());
        debug!(class = %name, native = class.native_type().name, "class registered");
        self.classes.push(class);
        Ok(())
    }

    /// Install everything a module contributes.
    ///
    /// All or nothing: when any registration fails the builder is left exactly
    /// as it was before the call.
    pub fn install(&mut self, module: Module) -> Result<(), ConfigurationError> {
        debug!(module = module.name(), "installing module");
        let mut staged = self.clone();
        for ty in module.types {
            staged.declare_type(ty);
        }
        for converter in module.converters {
            staged.register_converter(converter)?;
        }
        for class in module.classes {
            staged.register_class(class)?;
        }
        for (child, parent) in module.subtypes {
            staged.declare_subtype(child, parent)?;
        }
        *self = staged;
        Ok(())
    }

    // =========================================================================
    // Freeze
    // =========================================================================

    /// Freeze the registrations into an immutable [`Registry`].
    ///
    /// Synthesizes wrapper converters (if enabled), then resolves dispatch for
    /// every declared type.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn build(mut self) -> Result<Registry, ConfigurationError> {
        let synthesized = if self.config.synthesize_wrapper_converters {
            self.synthesize_wrapper_converters()?
        } else {
            0
        };

        let mut dispatch = FxHashMap::default();
        let mut wrap_classes = FxHashMap::default();
        let mut supertypes = FxHashMap::default();

        let mut class_by_native: FxHashMap<TypeHash, Arc<ClassDef>> = FxHashMap::default();
        for class in &self.classes {
            class_by_native
                .entry(class.native_hash())
                .or_insert_with(|| Arc::clone(class));
        }

        for ty in self.hierarchy.types() {
            let levels = self.hierarchy.levels(ty.hash);

            if let Some(index) = self.resolve_dispatch(ty, &levels)? {
                dispatch.insert(ty.hash, index);
            }

            let nearest_class = levels
                .iter()
                .flatten()
                .find_map(|candidate| class_by_native.get(&candidate.hash));
            if let Some(class) = nearest_class {
                wrap_classes.insert(ty.hash, Arc::clone(class));
            }

            supertypes.insert(ty.hash, self.hierarchy.ancestors(ty.hash));
        }

        let mut classes = FxHashMap::default();
        let mut short_names: FxHashMap<String, Option<String>> = FxHashMap::default();
        for class in self.classes {
            let qualified = class.qualified_name();
            short_names
                .entry(class.name().to_string())
                .and_modify(|slot| *slot = None)
                .or_insert_with(|| Some(qualified.clone()));
            classes.insert(qualified, class);
        }

        debug!(
            types = self.hierarchy.len(),
            converters = self.converters.len(),
            synthesized,
            classes = classes.len(),
            "registry frozen"
        );

        Ok(Registry {
            config: self.config,
            hierarchy: self.hierarchy,
            converters: self.converters,
            dispatch,
            classes,
            short_names,
            wrap_classes,
            supertypes,
        })
    }

    /// Give every class a wrapper converter unless an explicit converter
    /// already serves its native type or one of its supertypes.
    fn synthesize_wrapper_converters(&mut self) -> Result<usize, ConfigurationError> {
        let explicit: FxHashSet<TypeHash> = self.claims.keys().copied().collect();
        let mut count = 0;

        for class in self.classes.clone() {
            let native = class.native_hash();
            if self.claims.contains_key(&native) {
                continue;
            }
            let served_by_ancestor = self
                .hierarchy
                .ancestors(native)
                .iter()
                .any(|ancestor| explicit.contains(ancestor));
            if served_by_ancestor {
                continue;
            }
            self.register_converter(Arc::new(WrapperConverter::for_class(class)))?;
            count += 1;
        }
        Ok(count)
    }

    /// Nearest converter for `ty`, walking the hierarchy level by level.
    fn resolve_dispatch(
        &self,
        ty: ForeignType,
        levels: &[Vec<ForeignType>],
    ) -> Result<Option<usize>, ConfigurationError> {
        for level in levels {
            let mut found: Vec<usize> = level
                .iter()
                .filter_map(|candidate| self.claims.get(&candidate.hash).copied())
                .collect();
            found.sort_unstable();
            found.dedup();

            match found.as_slice() {
                [] => continue,
                [index] => return Ok(Some(*index)),
                _ => {
                    return Err(ConfigurationError::AmbiguousConverter {
                        type_name: ty.name.to_string(),
                        candidates: found
                            .iter()
                            .map(|&i| self.converters[i].name().to_string())
                            .collect(),
                    });
                }
            }
        }
        Ok(None)
    }
}

impl fmt::Debug for RegistryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryBuilder")
            .field("config", &self.config)
            .field("hierarchy", &self.hierarchy)
            .field("converters", &format!("<{} converters>", self.converters.len()))
            .field("classes", &self.class_names)
            .finish()
    }
}

// ============================================================================
// Frozen registry
// ============================================================================

/// Immutable dispatch table, shared via `Arc` by every marshaller.
pub struct Registry {
    config: MarshalConfig,
    hierarchy: TypeHierarchy,
    converters: Vec<Arc<dyn Converter>>,
    /// Foreign type -> index into `converters`, exact or inherited
    dispatch: FxHashMap<TypeHash, usize>,
    /// Qualified name -> class
    classes: FxHashMap<String, Arc<ClassDef>>,
    /// Short name -> qualified name, None when the short name is shared
    short_names: FxHashMap<String, Option<String>>,
    /// Native type -> most specific class to wrap it with
    wrap_classes: FxHashMap<TypeHash, Arc<ClassDef>>,
    /// Native type -> strict supertypes
    supertypes: FxHashMap<TypeHash, FxHashSet<TypeHash>>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    pub fn config(&self) -> &MarshalConfig {
        &self.config
    }

    pub fn hierarchy(&self) -> &TypeHierarchy {
        &self.hierarchy
    }

    // =========================================================================
    // Converter lookups
    // =========================================================================

    /// The converter serving `target`, exact or through its nearest supertype.
    pub fn lookup(&self, target: TypeHash) -> Result<&Arc<dyn Converter>, ConfigurationError> {
        self.resolve(target).map(|(_, converter)| converter)
    }

    /// Like [`lookup`](Self::lookup), also returning the target's declared
    /// identity.
    pub fn resolve(
        &self,
        target: TypeHash,
    ) -> Result<(ForeignType, &Arc<dyn Converter>), ConfigurationError> {
        let unregistered = || ConfigurationError::UnregisteredType {
            type_name: self.type_name(target),
        };
        let index = *self.dispatch.get(&target).ok_or_else(unregistered)?;
        let ty = self.hierarchy.get(target).ok_or_else(unregistered)?;
        Ok((ty, &self.converters[index]))
    }

    pub fn foreign_type(&self, hash: TypeHash) -> Option<ForeignType> {
        self.hierarchy.get(hash)
    }

    /// Declared name of a type, or its hash if it was never declared.
    pub fn type_name(&self, hash: TypeHash) -> String {
        match self.hierarchy.get(hash) {
            Some(ty) => ty.name.to_string(),
            None => hash.to_string(),
        }
    }

    pub fn converter_count(&self) -> usize {
        self.converters.len()
    }

    pub fn converters(&self) -> impl Iterator<Item = &Arc<dyn Converter>> {
        self.converters.iter()
    }

    /// Every type a converter serves, including those served through a
    /// supertype.
    pub fn served_types(&self) -> impl Iterator<Item = ForeignType> + '_ {
        self.hierarchy
            .types()
            .filter(|ty| self.dispatch.contains_key(&ty.hash))
    }

    // =========================================================================
    // Class lookups
    // =========================================================================

    /// Find a class by qualified (`fx\UXImage`) or unique short (`UXImage`)
    /// name.
    pub fn class(&self, name: &str) -> Result<&Arc<ClassDef>, ConfigurationError> {
        let unknown = || ConfigurationError::UnknownClass {
            name: name.to_string(),
        };
        if let Some(class) = self.classes.get(name) {
            return Ok(class);
        }
        let qualified = self
            .short_names
            .get(name)
            .and_then(Option::as_ref)
            .ok_or_else(unknown)?;
        self.classes.get(qualified).ok_or_else(unknown)
    }

    pub fn classes(&self) -> impl Iterator<Item = &Arc<ClassDef>> {
        self.classes.values()
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Most specific class registered for a native type or its supertypes.
    pub fn class_for_native(&self, native_type: TypeHash) -> Option<&Arc<ClassDef>> {
        self.wrap_classes.get(&native_type)
    }
}

impl Subtyping for Registry {
    fn is_assignable(&self, from: TypeHash, to: TypeHash) -> bool {
        from == to
            || self
                .supertypes
                .get(&from)
                .is_some_and(|ancestors| ancestors.contains(&to))
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("config", &self.config)
            .field("hierarchy", &self.hierarchy)
            .field("converters", &format!("<{} converters>", self.converters.len()))
            .field("dispatch", &self.dispatch.len())
            .field("classes", &self.classes.keys().collect::<Vec<_>>())
            .finish()
    }
}
