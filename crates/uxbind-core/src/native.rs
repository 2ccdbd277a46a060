//! Type-erased handles to native toolkit objects.
//!
//! The toolkit owns its objects; the marshalling layer only ever holds shared
//! [`NativeRef`] handles to them. A handle carries the foreign type identity of
//! the object so that converters and the subtype table can reason about it
//! without downcasting.
//!
//! Toolkits that model inheritance by composition (a `SplitPane` embedding a
//! `Control` embedding a `Node`) expose the embedded base state through
//! [`NativeType::upcast`], which lets [`NativeRef::get`] hand out a `&Node` for
//! a split pane.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::type_hash::{ForeignType, TypeHash};

/// A native toolkit type that can be wrapped and marshalled.
///
/// # Example
///
/// ```ignore
/// struct Image { width: u32, height: u32 }
///
/// impl NativeType for Image {
///     const NAME: &'static str = "Image";
/// }
/// ```
pub trait NativeType: Any + Send + Sync + Sized {
    /// Foreign type name. Hashed into the type identity.
    const NAME: &'static str;

    /// Return the embedded base-type state identified by `target`, if any.
    fn upcast(&self, _target: TypeHash) -> Option<&dyn Any> {
        None
    }
}

/// Object-safe view of a [`NativeType`], implemented for every native type.
pub trait NativeObject: Send + Sync {
    fn as_any(&self) -> &dyn Any;

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;

    fn upcast_any(&self, target: TypeHash) -> Option<&dyn Any>;
}

impl<T: NativeType> NativeObject for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }

    fn upcast_any(&self, target: TypeHash) -> Option<&dyn Any> {
        NativeType::upcast(self, target)
    }
}

/// Shared, non-exclusive reference to a native toolkit object.
///
/// Cloning a `NativeRef` never clones the object. Identity is pointer identity,
/// see [`NativeRef::ptr_eq`].
#[derive(Clone)]
pub struct NativeRef {
    ty: ForeignType,
    object: Arc<dyn NativeObject>,
}

impl NativeRef {
    /// Hand a freshly constructed native object to the toolkit's shared model.
    pub fn new<T: NativeType>(value: T) -> Self {
        Self::from_arc(Arc::new(value))
    }

    /// Reference an object the toolkit already shares.
    pub fn from_arc<T: NativeType>(object: Arc<T>) -> Self {
        Self {
            ty: ForeignType::of::<T>(),
            object,
        }
    }

    /// Foreign type identity of the referenced object.
    pub fn type_hash(&self) -> TypeHash {
        self.ty.hash
    }

    /// Foreign type name of the referenced object.
    pub fn type_name(&self) -> &'static str {
        self.ty.name
    }

    pub fn foreign_type(&self) -> ForeignType {
        self.ty
    }

    /// Borrow the object as `T`, either exactly or through an upcast.
    pub fn get<T: NativeType>(&self) -> Option<&T> {
        if let Some(value) = self.object.as_any().downcast_ref::<T>() {
            return Some(value);
        }
        self.object
            .upcast_any(TypeHash::of::<T>())?
            .downcast_ref::<T>()
    }

    /// Recover the shared `Arc<T>` when the object is exactly a `T`.
    pub fn downcast<T: NativeType>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.object).into_any().downcast::<T>().ok()
    }

    /// True if both handles reference the same native object.
    pub fn ptr_eq(&self, other: &NativeRef) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.object), Arc::as_ptr(&other.object))
    }

    /// Number of live handles to the object (toolkit handles included).
    pub fn strong_count(&self) -> usize {
        Arc::strong_count(&self.object)
    }
}

impl fmt::Debug for NativeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "NativeRef({} @ {:p})",
            self.ty.name,
            Arc::as_ptr(&self.object) as *const ()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Base {
        tag: u32,
    }

    impl NativeType for Base {
        const NAME: &'static str = "Base";
    }

    struct Derived {
        base: Base,
        extra: u32,
    }

    impl NativeType for Derived {
        const NAME: &'static str = "Derived";

        fn upcast(&self, target: TypeHash) -> Option<&dyn Any> {
            (target == TypeHash::of::<Base>()).then_some(&self.base as &dyn Any)
        }
    }

    #[test]
    fn carries_type_identity() {
        let native = NativeRef::new(Base { tag: 1 });
        assert_eq!(native.type_hash(), TypeHash::from_name("Base"));
        assert_eq!(native.type_name(), "Base");
    }

    #[test]
    fn get_exact_type() {
        let native = NativeRef::new(Base { tag: 7 });
        assert_eq!(native.get::<Base>().map(|b| b.tag), Some(7));
        assert!(native.get::<Derived>().is_none());
    }

    #[test]
    fn get_through_upcast() {
        let native = NativeRef::new(Derived {
            base: Base { tag: 3 },
            extra: 9,
        });
        assert_eq!(native.get::<Derived>().map(|d| d.extra), Some(9));
        assert_eq!(native.get::<Base>().map(|b| b.tag), Some(3));
    }

    #[test]
    fn downcast_returns_shared_arc() {
        let original = Arc::new(Base { tag: 5 });
        let native = NativeRef::from_arc(Arc::clone(&original));
        let recovered = native.downcast::<Base>().unwrap();
        assert!(Arc::ptr_eq(&original, &recovered));
    }

    #[test]
    fn downcast_wrong_type_fails() {
        let native = NativeRef::new(Base { tag: 5 });
        assert!(native.downcast::<Derived>().is_none());
    }

    #[test]
    fn clones_share_identity() {
        let a = NativeRef::new(Base { tag: 1 });
        let b = a.clone();
        let c = NativeRef::new(Base { tag: 1 });
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&c));
        assert_eq!(a.strong_count(), 2);
    }
}
