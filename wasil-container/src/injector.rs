//! # The Injector
//!
//! An [`Injector`] maps types to values and hands them out by type, to
//! callers, to functions ([`Injector::invoke`]) and to struct fields
//! ([`Injector::apply`]).
//!
//! # Architecture
//! ```text
//!   root ◄──parent── session ◄──parent── request      get::<T>() on request
//!    │                 │                    │
//!    │                 │                    └─ 1. exact match
//!    │                 │                       2. interface fallback
//!    │                 └─ same steps ◄───────── 3. delegate to parent
//!    └─ same steps
//!
//!   A provider found anywhere in the chain resolves its own parameters
//!   starting again from `request`, the injector the caller asked.
//! ```
//!
//! Injectors are shared through `Arc`. Children hold their parent; parents
//! know nothing of their children.
//!
//! # Examples
//! ```rust
//! use std::sync::Arc;
//! use wasil_container::prelude::*;
//!
//! #[derive(Clone)]
//! struct RequestId(u64);
//!
//! #[derive(Clone)]
//! struct AuditLog {
//!     request: RequestId,
//! }
//!
//! let root = Arc::new(Injector::with_label("root"));
//! root.map_provider(|request: RequestId| AuditLog { request });
//!
//! let request = root.child("request");
//! request.map_value(RequestId(7));
//!
//! // The provider lives on root but sees the request's RequestId.
//! let log: AuditLog = request.get().expect("mapped");
//! assert_eq!(log.request.0, 7);
//! ```
//!
//! # Cycles
//! Nothing detects cycles. A provider that needs its own output, directly
//! or through other providers, recurses until the stack overflows; so does
//! an injector that is made its own ancestor.

use std::any::type_name;
use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::RwLock;
use tracing::{debug, error, instrument, trace};
use wasil_support::rendering::suggest_similar;

use crate::error::{NotFoundError, Result, WasilError};
use crate::inject::Inject;
use crate::interface::{self, Interface, Upcast};
use crate::key::{Kind, TypeKey};
use crate::module::Module;
use crate::provider::{ErasedProvider, Handler, MultiOutput, Outputs, SingleOutput};
use crate::value::{MappedValue, Value};

const DEFAULT_LABEL: &str = "injector";

/// How many "did you mean?" entries a [`NotFoundError`] carries.
const MAX_SUGGESTIONS: usize = 3;

/// State of one retrieval, threaded through parent delegation and into
/// providers.
///
/// The youngest injector is the one the caller asked. It is fixed when the
/// retrieval starts and never narrowed while the lookup walks up parents.
#[derive(Clone, Copy)]
pub(crate) struct Resolution<'a> {
    youngest: &'a Injector,
}

impl<'a> Resolution<'a> {
    pub fn new(youngest: &'a Injector) -> Self {
        Self { youngest }
    }

    pub fn youngest(&self) -> &'a Injector {
        self.youngest
    }
}

/// A scope of type-to-value mappings with an optional parent.
///
/// All methods take `&self`; an injector can be shared across threads and
/// registered into while others read from it. Mapping a type that is
/// already mapped replaces the old entry, which is how a child overrides
/// what its parent provides.
pub struct Injector {
    label: String,
    values: DashMap<TypeKey, MappedValue>,
    parent: RwLock<Option<Arc<Injector>>>,
}

impl Injector {
    /// Creates an empty injector without a parent.
    pub fn new() -> Self {
        Self::with_label(DEFAULT_LABEL)
    }

    /// Creates an empty injector with a label for logs and error messages.
    pub fn with_label(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            values: DashMap::new(),
            parent: RwLock::new(None),
        }
    }

    /// Creates an empty child whose parent is `self`.
    pub fn child(self: &Arc<Self>, label: impl Into<String>) -> Arc<Injector> {
        let child = Injector::with_label(label);
        child.set_parent(Arc::clone(self));
        Arc::new(child)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    // ── Registration ──

    /// Maps `value` under its own type.
    pub fn map_value<T: Send + Sync + 'static>(&self, value: T) -> &Self {
        self.insert(TypeKey::of::<T>(), MappedValue::Literal(Value::new(value)))
    }

    /// Maps `value` under the interface handle `Arc<I>`.
    ///
    /// ```
    /// use std::sync::Arc;
    /// use wasil_container::{Injector, interface};
    ///
    /// trait Clock: Send + Sync { fn now(&self) -> u64; }
    /// struct Frozen;
    /// impl Clock for Frozen { fn now(&self) -> u64 { 42 } }
    /// interface!(dyn Clock);
    ///
    /// let injector = Injector::new();
    /// injector.map_as::<dyn Clock>(Arc::new(Frozen));
    ///
    /// let clock: Arc<dyn Clock> = injector.get().unwrap();
    /// assert_eq!(clock.now(), 42);
    /// ```
    pub fn map_as<I: ?Sized + Interface>(&self, value: Arc<I>) -> &Self {
        self.insert(TypeKey::interface::<I>(), MappedValue::Literal(Value::new(value)))
    }

    /// Maps a provider under its return type.
    ///
    /// The provider runs on every retrieval of that type, with its
    /// parameters resolved from the injector the retrieval started on.
    /// Its result is never cached.
    pub fn map_provider<Args, F>(&self, provider: F) -> &Self
    where
        Args: 'static,
        F: Handler<Args> + Send + Sync + 'static,
        F::Output: Send + Sync + 'static,
    {
        let provider: Arc<dyn ErasedProvider> = Arc::new(SingleOutput::<F, Args>::new(provider));
        self.insert(
            TypeKey::of::<F::Output>(),
            MappedValue::Provided {
                provider,
                out_index: 0,
            },
        )
    }

    /// Maps a provider returning a tuple under each element's type.
    ///
    /// One call serves one retrieval of any of the element types. A
    /// provider returning `()` maps nothing.
    ///
    /// ```
    /// use wasil_container::Injector;
    ///
    /// let injector = Injector::new();
    /// injector.map_provider_outputs(|| (String::from("localhost"), 5432u16));
    ///
    /// assert_eq!(injector.get::<String>().as_deref(), Some("localhost"));
    /// assert_eq!(injector.get::<u16>(), Some(5432));
    /// ```
    pub fn map_provider_outputs<Args, F>(&self, provider: F) -> &Self
    where
        Args: 'static,
        F: Handler<Args> + Send + Sync + 'static,
        F::Output: Outputs,
    {
        let keys = <F::Output as Outputs>::output_keys();
        if keys.is_empty() {
            debug!(
                injector = %self.label,
                provider = type_name::<F>(),
                "Provider declares no outputs, nothing mapped"
            );
            return self;
        }

        let provider: Arc<dyn ErasedProvider> = Arc::new(MultiOutput::<F, Args>::new(provider));
        for (out_index, key) in keys.into_iter().enumerate() {
            self.insert(
                key,
                MappedValue::Provided {
                    provider: Arc::clone(&provider),
                    out_index,
                },
            );
        }
        self
    }

    /// Maps `value` under an explicit key, bypassing type inference.
    ///
    /// The typed getters check the stored type against the key and
    /// report [`WasilError::TypeMismatch`] if they disagree.
    pub fn set_raw(&self, key: TypeKey, value: Value) -> &Self {
        self.insert(key, MappedValue::Literal(value))
    }

    /// Installs or replaces the parent.
    pub fn set_parent(&self, parent: Arc<Injector>) {
        debug!(injector = %self.label, parent = %parent.label, "Parent set");
        *self.parent.write() = Some(parent);
    }

    /// Lets a [`Module`] map its group of values.
    pub fn install(&self, module: &dyn Module) -> &Self {
        debug!(injector = %self.label, module = module.name(), "Installing module");
        module.configure(self);
        self
    }

    // ── Retrieval ──

    /// Returns the value mapped for `T`, or `None` if nothing along the
    /// chain maps it.
    ///
    /// Requesting an interface handle `Arc<dyn Trait>` also accepts a
    /// declared implementor mapped as `Arc<Concrete>`. A bare `Concrete`
    /// value is never upcast.
    ///
    /// # Panics
    /// Panics if a provider involved in producing the value fails, or if a
    /// raw value disagrees with its key. Use [`Injector::try_get`] to get
    /// those as errors instead.
    pub fn get<T: Clone + Send + Sync + 'static>(&self) -> Option<T> {
        self.try_get().unwrap_or_else(|err| fatal(self, err))
    }

    /// Like [`Injector::get`], but reports provider failures and type
    /// mismatches as errors.
    pub fn try_get<T: Clone + Send + Sync + 'static>(&self) -> Result<Option<T>> {
        let key = TypeKey::of::<T>();
        match self.try_get_key(&key)? {
            Some(value) => downcast(&key, &value).map(Some),
            None => Ok(None),
        }
    }

    /// Returns the value mapped for `key`, type-erased.
    ///
    /// # Panics
    /// Panics if a provider involved in producing the value fails.
    pub fn get_key(&self, key: &TypeKey) -> Option<Value> {
        self.try_get_key(key).unwrap_or_else(|err| fatal(self, err))
    }

    /// Like [`Injector::get_key`], but reports provider failures as errors.
    pub fn try_get_key(&self, key: &TypeKey) -> Result<Option<Value>> {
        self.resolve(key, Resolution::new(self))
    }

    /// Returns the value mapped for `T`, or a [`WasilError::NotFound`].
    pub fn require<T: Clone + Send + Sync + 'static>(&self) -> Result<T> {
        self.try_get()?
            .ok_or_else(|| self.not_found(TypeKey::of::<T>(), None))
    }

    /// Like [`Injector::require`], naming `required_by` as the dependent
    /// in the error.
    pub fn require_for<T: Clone + Send + Sync + 'static>(&self, required_by: &str) -> Result<T> {
        self.try_get()?
            .ok_or_else(|| self.not_found(TypeKey::of::<T>(), Some(required_by)))
    }

    // ── Application ──

    /// Calls `f` with every parameter resolved by type.
    ///
    /// If any parameter cannot be resolved, `f` is not called and the
    /// error names the first missing type.
    ///
    /// ```
    /// use wasil_container::Injector;
    ///
    /// let injector = Injector::new();
    /// injector.map_value(2u32).map_value(String::from("ab"));
    ///
    /// let out = injector.invoke(|n: u32, s: String| s.repeat(n as usize)).unwrap();
    /// assert_eq!(out, "abab");
    ///
    /// assert!(injector.invoke(|_: bool| ()).is_err());
    /// ```
    #[instrument(skip_all, fields(injector = %self.label, callable = type_name::<F>()))]
    pub fn invoke<Args, F: Handler<Args>>(&self, f: F) -> Result<F::Output> {
        f.call_with(self)
    }

    /// Fills the `#[inject]` fields of `target`.
    #[instrument(skip_all, fields(injector = %self.label, target = type_name::<T>()))]
    pub fn apply<T: Inject + ?Sized>(&self, target: &mut T) -> Result<()> {
        target.inject(self)
    }

    // ── Introspection ──

    pub fn parent(&self) -> Option<Arc<Injector>> {
        self.parent.read().clone()
    }

    /// Number of keys mapped on this injector, parents excluded.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether this injector itself maps `key`. Parents are not consulted.
    pub fn contains_key(&self, key: &TypeKey) -> bool {
        self.values.contains_key(key)
    }

    /// Keys mapped on this injector, in no particular order.
    pub fn keys(&self) -> Vec<TypeKey> {
        self.values.iter().map(|entry| *entry.key()).collect()
    }

    // ── Internal ──

    fn insert(&self, key: TypeKey, mapped: MappedValue) -> &Self {
        let source = mapped.describe();
        match self.values.insert(key, mapped) {
            Some(previous) => debug!(
                injector = %self.label,
                key = %key,
                source,
                replaced = previous.describe(),
                "Mapping replaced"
            ),
            None => debug!(injector = %self.label, key = %key, source, "Mapped"),
        }
        self
    }

    /// The lookup algorithm: exact match, interface fallback, parent.
    ///
    /// Map guards are released before any entry is evaluated, so providers
    /// can resolve against this injector again.
    pub(crate) fn resolve(&self, key: &TypeKey, cx: Resolution<'_>) -> Result<Option<Value>> {
        let exact = self.values.get(key).map(|entry| entry.value().clone());
        if let Some(mapped) = exact {
            trace!(injector = %self.label, key = %key, "Exact match");
            return mapped.get(cx).map(Some);
        }

        if key.kind() == Kind::Interface {
            if let Some((found, mapped, upcast)) = self.find_implementor(key) {
                debug!(
                    injector = %self.label,
                    key = %key,
                    implementor = %found,
                    "Interface satisfied by implementor"
                );
                let value = mapped.get(cx)?;
                return upcast(&value)
                    .map(Some)
                    .ok_or(WasilError::TypeMismatch {
                        key: found,
                        found: value.type_name(),
                    });
            }
        }

        let parent = self.parent.read().clone();
        match parent {
            Some(parent) => {
                trace!(injector = %self.label, parent = %parent.label, key = %key, "Delegating to parent");
                parent.resolve(key, cx)
            }
            None => {
                trace!(injector = %self.label, key = %key, "Not found");
                Ok(None)
            }
        }
    }

    /// First own entry whose key implements the requested interface.
    ///
    /// With several implementors mapped, which one wins is unspecified.
    fn find_implementor(&self, interface: &TypeKey) -> Option<(TypeKey, MappedValue, Upcast)> {
        self.values.iter().find_map(|entry| {
            interface::upcaster(entry.key().type_id(), interface.type_id())
                .map(|upcast| (*entry.key(), entry.value().clone(), upcast))
        })
    }

    /// Builds a [`WasilError::NotFound`] describing the whole chain.
    fn not_found(&self, requested: TypeKey, required_by: Option<&str>) -> WasilError {
        let mut searched = vec![self.label.clone()];
        let mut names: Vec<&'static str> =
            self.values.iter().map(|entry| entry.key().type_name()).collect();

        let mut next = self.parent();
        while let Some(injector) = next {
            searched.push(injector.label.clone());
            names.extend(injector.values.iter().map(|entry| entry.key().type_name()));
            next = injector.parent();
        }

        WasilError::NotFound(NotFoundError {
            requested,
            required_by: required_by.map(str::to_owned),
            searched,
            suggestions: suggest_similar(requested.type_name(), &names, MAX_SUGGESTIONS),
        })
    }
}

impl Default for Injector {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Injector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Injector")
            .field("label", &self.label)
            .field("mapped", &self.values.len())
            .field("parent", &self.parent.read().as_ref().map(|p| p.label.clone()))
            .finish()
    }
}

fn downcast<T: Clone + 'static>(key: &TypeKey, value: &Value) -> Result<T> {
    value.downcast::<T>().ok_or(WasilError::TypeMismatch {
        key: *key,
        found: value.type_name(),
    })
}

/// Aborts a retrieval that cannot complete.
fn fatal(injector: &Injector, err: WasilError) -> ! {
    error!(injector = %injector.label, error = %err, "Resolution aborted");
    panic!("{err}")
}
