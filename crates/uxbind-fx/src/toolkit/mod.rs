//! Stand-in native toolkit.
//!
//! A small retained-mode scene graph with the same shape as the desktop
//! toolkit the wrappers target:
//!
//! ```text
//! Node
//! ├── Control
//! │   └── SplitPane
//! └── ImageView ──► Image
//! ```
//!
//! Inheritance is modelled by composition: each type embeds its base and
//! exposes it through `NativeType::upcast`. All state sits behind
//! `parking_lot` locks so setters work through shared references.

mod control;
mod image;
mod image_view;
mod node;
mod split_pane;

pub use self::control::Control;
pub use self::image::Image;
pub use self::image_view::ImageView;
pub use self::node::Node;
pub use self::split_pane::{Orientation, SplitPane};
