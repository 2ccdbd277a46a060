//! Registration and dispatch for uxbind.
//!
//! This crate turns toolkit bindings into a frozen dispatch table:
//!
//! - **hierarchy** - static subtype table of foreign types (`petgraph`)
//! - **registry** - `RegistryBuilder` and the immutable `Registry`
//! - **module** - registration bundles contributed by a binding
//! - **class_builder** - fluent construction of wrapper class tables
//! - **wrapper_converter** - null / passthrough / reject converter
//! - **stream** - in-memory stream subsystem
//! - **marshaller** - the runtime-facing entry points
//!
//! ```text
//! Module ─install─► RegistryBuilder ─build─► Arc<Registry> ─► Marshaller
//! ```

pub mod class_builder;
pub mod hierarchy;
pub mod marshaller;
pub mod module;
pub mod registry;
pub mod stream;
pub mod wrapper_converter;

pub use class_builder::ClassBuilder;
pub use hierarchy::TypeHierarchy;
pub use marshaller::Marshaller;
pub use module::Module;
pub use registry::{Registry, RegistryBuilder};
pub use stream::StreamTable;
pub use wrapper_converter::WrapperConverter;
