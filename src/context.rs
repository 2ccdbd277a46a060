//! Binding context for a scripting runtime.
//!
//! A `Context` collects toolkit modules, seals them into the shared
//! [`Registry`], and hands out [`Marshaller`]s over it.
//!
//! # Example
//!
//! ```ignore
//! use uxbind::Context;
//! use uxbind::registry::StreamTable;
//!
//! let mut ctx = Context::with_default_modules()?;
//! ctx.seal()?;
//!
//! let streams = StreamTable::new();
//! let m = ctx.marshaller(&streams)?;
//! let pane = m.construct("UXSplitPane", &[], &TraceInfo::unknown())?;
//! ```

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};
use uxbind_core::{ConfigurationError, MarshalConfig, StreamProvider};
use uxbind_registry::{Marshaller, Module, Registry, RegistryBuilder};

/// Owns the modules installed for one scripting runtime.
pub struct Context {
    /// Names of installed modules, in install order
    modules: Vec<String>,
    /// Consumed on seal
    builder: Option<RegistryBuilder>,
    /// Available after seal
    registry: Option<Arc<Registry>>,
    /// Set when `seal()` failed; the builder is gone and cannot be retried
    failed: Option<ConfigurationError>,
}

impl Context {
    pub fn new() -> Self {
        Self::with_config(MarshalConfig::default())
    }

    pub fn with_config(config: MarshalConfig) -> Self {
        Self {
            modules: Vec::new(),
            builder: Some(RegistryBuilder::with_config(config)),
            registry: None,
            failed: None,
        }
    }

    /// Create a context with the `fx` toolkit installed.
    ///
    /// The context is NOT sealed.
    pub fn with_default_modules() -> Result<Self, ContextError> {
        let mut ctx = Self::new();
        ctx.install(uxbind_fx::module())?;
        Ok(ctx)
    }

    /// Install a module's types, converters, and classes.
    ///
    /// # Errors
    ///
    /// Fails after `seal()`, for a module name that is already installed, or
    /// when the module conflicts with what is already registered. A rejected
    /// module leaves nothing behind.
    pub fn install(&mut self, module: Module) -> Result<(), ContextError> {
        self.check_failed()?;
        if self.registry.is_some() {
            return Err(ContextError::AlreadySealed);
        }
        if self.modules.iter().any(|name| name == module.name()) {
            return Err(ContextError::DuplicateModule(module.name().to_string()));
        }
        let builder = self.builder.as_mut().ok_or(ContextError::AlreadySealed)?;

        let name = module.name().to_string();
        builder.install(module)?;
        debug!(module = %name, "module installed");
        self.modules.push(name);
        Ok(())
    }

    /// Freeze everything installed so far into the shared registry.
    ///
    /// Calling `seal()` again after success is a no-op. After a failed build
    /// the context is poisoned: every later `seal()`, `install()`, and
    /// `marshaller()` returns the same error.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn seal(&mut self) -> Result<(), ContextError> {
        self.check_failed()?;
        if self.registry.is_some() {
            return Ok(());
        }

        let builder = self.builder.take().ok_or(ContextError::AlreadySealed)?;
        match builder.build() {
            Ok(registry) => {
                self.registry = Some(Arc::new(registry));
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "seal failed");
                self.failed = Some(err.clone());
                Err(err.into())
            }
        }
    }

    fn check_failed(&self) -> Result<(), ContextError> {
        match &self.failed {
            Some(err) => Err(ContextError::Registration(err.clone())),
            None => Ok(()),
        }
    }

    pub fn is_sealed(&self) -> bool {
        self.registry.is_some()
    }

    /// The frozen registry (available after sealing).
    pub fn registry(&self) -> Option<&Arc<Registry>> {
        self.registry.as_ref()
    }

    /// A marshaller over the sealed registry, reading streams from `streams`.
    pub fn marshaller<'a>(
        &'a self,
        streams: &'a dyn StreamProvider,
    ) -> Result<Marshaller<'a>, ContextError> {
        self.check_failed()?;
        let registry = self.registry.as_ref().ok_or(ContextError::NotSealed)?;
        Ok(Marshaller::new(registry, streams))
    }

    pub fn modules(&self) -> &[String] {
        &self.modules
    }

    pub fn module_count(&self) -> usize {
        self.modules.len()
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur during context operations.
#[derive(Debug, Error)]
pub enum ContextError {
    #[error("module '{0}' is already installed")]
    DuplicateModule(String),

    #[error("context is already sealed - cannot install modules after seal()")]
    AlreadySealed,

    #[error("context is not sealed - call seal() before marshalling")]
    NotSealed,

    #[error(transparent)]
    Registration(#[from] ConfigurationError),
}
