//! Interfaces and the implementation table.
//!
//! An interface is a trait object type such as `dyn Logger`. Values are
//! stored and requested through its handle `Arc<dyn Logger>`, and the key
//! of that handle has [`Kind::Interface`](crate::key::Kind::Interface).
//!
//! Which concrete types implement which interface is declared once per
//! pair with [`implements!`](crate::implements!). The declarations are
//! gathered at startup into a process-wide table, and the injector
//! consults it when an interface is requested but only concrete values are
//! mapped.
//!
//! ```
//! use std::sync::Arc;
//! use wasil_container::{Injector, implements, interface};
//!
//! trait Logger: Send + Sync {
//!     fn log(&self, msg: &str) -> String;
//! }
//!
//! struct ConsoleLogger;
//! impl Logger for ConsoleLogger {
//!     fn log(&self, msg: &str) -> String { format!("[console] {msg}") }
//! }
//!
//! interface!(dyn Logger);
//! implements!(ConsoleLogger => dyn Logger);
//!
//! let injector = Injector::new();
//! injector.map_value(Arc::new(ConsoleLogger));
//!
//! let logger: Arc<dyn Logger> = injector.get().unwrap();
//! assert_eq!(logger.log("hi"), "[console] hi");
//! ```

use std::any::TypeId;
use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use tracing::debug;

use crate::key::TypeKey;
use crate::value::Value;

/// Marker for trait object types usable as interface identities.
///
/// Implemented by [`interface!`](crate::interface!); only interfaces can be
/// passed to [`Injector::map_as`](crate::Injector::map_as).
pub trait Interface: Send + Sync + 'static {}

/// Converts a value stored under a concrete key into the interface handle.
///
/// Returns `None` if the value is not of the concrete type the record was
/// declared for.
pub type Upcast = fn(&Value) -> Option<Value>;

/// An interface declared with [`interface!`](crate::interface!).
#[doc(hidden)]
pub struct Declaration {
    handle: fn() -> TypeId,
}

impl Declaration {
    pub const fn new(handle: fn() -> TypeId) -> Self {
        Self { handle }
    }
}

/// A `Concrete => dyn Interface` pair declared with [`implements!`](crate::implements!).
#[doc(hidden)]
pub struct Implementation {
    concrete: fn() -> TypeId,
    interface: fn() -> TypeId,
    upcast: Upcast,
}

impl Implementation {
    pub const fn new(concrete: fn() -> TypeId, interface: fn() -> TypeId, upcast: Upcast) -> Self {
        Self {
            concrete,
            interface,
            upcast,
        }
    }
}

inventory::collect!(Declaration);
inventory::collect!(Implementation);

struct Table {
    interfaces: HashSet<TypeId>,
    upcasts: HashMap<(TypeId, TypeId), Upcast>,
}

static TABLE: Lazy<Table> = Lazy::new(|| {
    let mut interfaces: HashSet<TypeId> = inventory::iter::<Declaration>
        .into_iter()
        .map(|declaration| (declaration.handle)())
        .collect();

    let mut upcasts = HashMap::new();
    for implementation in inventory::iter::<Implementation> {
        let interface = (implementation.interface)();
        interfaces.insert(interface);
        upcasts.insert(((implementation.concrete)(), interface), implementation.upcast);
    }

    debug!(
        interfaces = interfaces.len(),
        implementations = upcasts.len(),
        "Collected interface table"
    );
    Table { interfaces, upcasts }
});

pub(crate) fn is_interface(handle: TypeId) -> bool {
    TABLE.interfaces.contains(&handle)
}

pub(crate) fn upcaster(concrete: TypeId, interface: TypeId) -> Option<Upcast> {
    TABLE.upcasts.get(&(concrete, interface)).copied()
}

/// Reports whether values stored under `concrete` satisfy `interface`.
///
/// ```
/// use std::sync::Arc;
/// use wasil_container::{implements, interface};
/// use wasil_container::key::TypeKey;
///
/// trait Clock: Send + Sync {}
/// struct SystemClock;
/// impl Clock for SystemClock {}
///
/// interface!(dyn Clock);
/// implements!(SystemClock => dyn Clock);
///
/// assert!(wasil_container::interface::implements(
///     &TypeKey::of::<Arc<SystemClock>>(),
///     &TypeKey::interface::<dyn Clock>(),
/// ));
/// ```
pub fn implements(concrete: &TypeKey, interface: &TypeKey) -> bool {
    upcaster(concrete.type_id(), interface.type_id()).is_some()
}

/// Declares trait object types as interfaces.
///
/// ```
/// trait Mailer: Send + Sync {}
/// trait Clock: Send + Sync {}
///
/// wasil_container::interface!(dyn Mailer, dyn Clock);
/// ```
#[macro_export]
macro_rules! interface {
    ($($iface:ty),+ $(,)?) => {
        $(
            impl $crate::interface::Interface for $iface {}

            $crate::__private::inventory::submit! {
                $crate::interface::Declaration::new(|| {
                    ::std::any::TypeId::of::<::std::sync::Arc<$iface>>()
                })
            }
        )+
    };
}

/// Declares that values of a concrete type satisfy one or more interfaces.
///
/// Only values mapped as `Arc<Concrete>` take part in interface fallback.
/// A plain `Concrete` mapped with `map_value(Concrete)` is stored under
/// its own key and is never offered for `Arc<dyn Trait>`; map
/// `Arc::new(Concrete)` instead. The expansion only compiles if
/// `Concrete` really implements each trait.
///
/// ```
/// trait Mailer: Send + Sync {}
/// trait Clock: Send + Sync {}
///
/// struct Fake;
/// impl Mailer for Fake {}
/// impl Clock for Fake {}
///
/// wasil_container::interface!(dyn Mailer, dyn Clock);
/// wasil_container::implements!(Fake => dyn Mailer, dyn Clock);
/// ```
#[macro_export]
macro_rules! implements {
    ($concrete:ty => $($iface:ty),+ $(,)?) => {
        $(
            $crate::__private::inventory::submit! {
                $crate::interface::Implementation::new(
                    || ::std::any::TypeId::of::<::std::sync::Arc<$concrete>>(),
                    || ::std::any::TypeId::of::<::std::sync::Arc<$iface>>(),
                    |value: &$crate::Value| {
                        value
                            .downcast_ref::<::std::sync::Arc<$concrete>>()
                            .map(|concrete| {
                                let concrete: ::std::sync::Arc<$concrete> =
                                    ::std::sync::Arc::clone(concrete);
                                let handle: ::std::sync::Arc<$iface> = concrete;
                                $crate::Value::new(handle)
                            })
                    },
                )
            }
        )+
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    trait Speaker: Send + Sync {
        fn speak(&self) -> &'static str;
    }
    trait Walker: Send + Sync {}

    struct Duck;
    impl Speaker for Duck {
        fn speak(&self) -> &'static str {
            "quack"
        }
    }
    impl Walker for Duck {}

    struct Rock;

    crate::interface!(dyn Speaker, dyn Walker);
    crate::implements!(Duck => dyn Speaker, dyn Walker);

    #[test]
    fn declared_interfaces_are_known() {
        assert!(is_interface(TypeId::of::<Arc<dyn Speaker>>()));
        assert!(is_interface(TypeId::of::<Arc<dyn Walker>>()));
        assert!(!is_interface(TypeId::of::<Arc<Duck>>()));
    }

    #[test]
    fn implementation_pairs() {
        let duck = TypeKey::of::<Arc<Duck>>();
        let rock = TypeKey::of::<Arc<Rock>>();
        let speaker = TypeKey::interface::<dyn Speaker>();
        assert!(implements(&duck, &speaker));
        assert!(implements(&duck, &TypeKey::interface::<dyn Walker>()));
        assert!(!implements(&rock, &speaker));
    }

    #[test]
    fn upcast_shares_the_allocation() {
        let duck = Arc::new(Duck);
        let upcast = upcaster(TypeId::of::<Arc<Duck>>(), TypeId::of::<Arc<dyn Speaker>>())
            .expect("declared above");

        let value = upcast(&Value::new(duck.clone())).expect("value holds a duck");
        let speaker = value.downcast::<Arc<dyn Speaker>>().expect("upcast to handle");

        assert_eq!(speaker.speak(), "quack");
        assert!(std::ptr::addr_eq(Arc::as_ptr(&speaker), Arc::as_ptr(&duck)));
    }

    #[test]
    fn upcast_rejects_other_values() {
        let upcast = upcaster(TypeId::of::<Arc<Duck>>(), TypeId::of::<Arc<dyn Speaker>>())
            .expect("declared above");
        assert!(upcast(&Value::new(42u8)).is_none());
    }
}
