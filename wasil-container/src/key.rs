//! Type identities.
//!
//! [`TypeKey`] is what the injector maps values under. It wraps a
//! [`TypeId`] together with the type's name for diagnostics, and knows
//! whether the type is an interface handle (see [`crate::interface`]).

use std::any::{TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use tracing::error;
use wasil_support::rendering::shorten_type_name;

use crate::interface::{self, Interface};

/// Whether a type is a concrete value type or an interface handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Any type that was not declared as an interface.
    Concrete,
    /// `Arc<dyn Trait>` for a trait declared with [`interface!`](crate::interface!)
    /// or named by [`implements!`](crate::implements!).
    Interface,
}

/// Identifies a type in an injector.
///
/// Keys compare by [`TypeId`] alone: two keys built for the same type are
/// equal however they were obtained.
///
/// # Examples
/// ```
/// use wasil_container::key::{Kind, TypeKey};
///
/// let key = TypeKey::of::<String>();
/// assert_eq!(key.type_name(), "alloc::string::String");
/// assert_eq!(key.short_name(), "String");
/// assert_eq!(key.kind(), Kind::Concrete);
/// assert_eq!(key, TypeKey::of::<String>());
/// ```
#[derive(Clone, Copy)]
pub struct TypeKey {
    type_id: TypeId,
    type_name: &'static str,
}

impl TypeKey {
    /// Creates the key for type `T`.
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
        }
    }

    /// Creates the key for the interface handle `Arc<I>`.
    ///
    /// Interface values are always stored and requested as `Arc<dyn Trait>`,
    /// so `TypeKey::interface::<dyn Logger>()` equals
    /// `TypeKey::of::<Arc<dyn Logger>>()`.
    #[inline]
    pub fn interface<I: ?Sized + Interface>() -> Self {
        Self::of::<Arc<I>>()
    }

    /// Creates a key from a raw [`TypeId`] and type name.
    ///
    /// Prefer [`TypeKey::of`]. The name is only used for messages, so a
    /// wrong name produces confusing errors but never a wrong lookup.
    #[inline]
    pub fn from_raw(type_id: TypeId, type_name: &'static str) -> Self {
        Self { type_id, type_name }
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns the full type name, module paths included.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns the type name with module paths stripped.
    pub fn short_name(&self) -> String {
        shorten_type_name(self.type_name)
    }

    /// Reports whether this key names an interface handle.
    pub fn kind(&self) -> Kind {
        if interface::is_interface(self.type_id) {
            Kind::Interface
        } else {
            Kind::Concrete
        }
    }

    /// Returns the key unchanged if it names an interface handle.
    ///
    /// This is the runtime counterpart of the `I: Interface` bound on
    /// [`Injector::map_as`](crate::Injector::map_as), for code that only
    /// has a key in hand (for example before [`Injector::set_raw`](crate::Injector::set_raw)).
    ///
    /// # Panics
    /// Panics if the key names a concrete type. Passing one is a
    /// programming mistake, not a condition to recover from.
    pub fn expect_interface(self) -> Self {
        if self.kind() != Kind::Interface {
            error!(key = %self, "Key does not name an interface");
            panic!(
                "{} is not an interface handle; declare the trait with interface!(dyn Trait) and use Arc<dyn Trait>",
                self.type_name
            );
        }
        self
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeKey({})", self.type_name)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name)
    }
}
