//! Stored values.
//!
//! [`Value`] is a type-erased, shareable value. [`MappedValue`] is what an
//! injector keeps per key: either a value fixed at mapping time, or a
//! provider that computes it on every retrieval.

use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

use crate::error::{Result, WasilError};
use crate::injector::Resolution;
use crate::provider::ErasedProvider;

/// A type-erased value.
///
/// Cloning a `Value` clones the handle, not the payload.
///
/// ```
/// use wasil_container::Value;
///
/// let value = Value::new(String::from("postgres://localhost"));
/// assert!(value.is::<String>());
/// assert_eq!(value.downcast::<String>().as_deref(), Some("postgres://localhost"));
/// assert_eq!(value.downcast::<u32>(), None);
/// ```
#[derive(Clone)]
pub struct Value {
    inner: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Value {
    pub fn new<T: Send + Sync + 'static>(value: T) -> Self {
        Self {
            inner: Arc::new(value),
            type_name: type_name::<T>(),
        }
    }

    /// Name of the type held.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[inline]
    pub fn is<T: 'static>(&self) -> bool {
        self.inner.is::<T>()
    }

    #[inline]
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Clones the payload out if it is a `T`.
    pub fn downcast<T: Clone + 'static>(&self) -> Option<T> {
        self.downcast_ref::<T>().cloned()
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value({})", self.type_name)
    }
}

/// What an injector stores under a key.
#[derive(Clone)]
pub(crate) enum MappedValue {
    /// A value fixed at mapping time.
    Literal(Value),
    /// Output number `out_index` of a provider, computed on each retrieval.
    Provided {
        provider: Arc<dyn ErasedProvider>,
        out_index: usize,
    },
}

impl MappedValue {
    /// Produces the value for one retrieval.
    ///
    /// Providers resolve their parameters against the youngest injector of
    /// the retrieval, not against the injector the mapping lives in. They
    /// are invoked every time; nothing is cached.
    pub fn get(&self, cx: Resolution<'_>) -> Result<Value> {
        match self {
            MappedValue::Literal(value) => Ok(value.clone()),
            MappedValue::Provided { provider, out_index } => {
                let outputs = provider.provide(cx.youngest()).map_err(|source| {
                    WasilError::ProviderFailed {
                        provider: provider.name(),
                        source: Box::new(source),
                    }
                })?;

                outputs
                    .into_iter()
                    .nth(*out_index)
                    .ok_or(WasilError::MissingOutput {
                        provider: provider.name(),
                        index: *out_index,
                    })
            }
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            MappedValue::Literal(value) => value.type_name(),
            MappedValue::Provided { provider, .. } => provider.name(),
        }
    }
}

impl fmt::Debug for MappedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MappedValue::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            MappedValue::Provided { provider, out_index } => f
                .debug_struct("Provided")
                .field("provider", &provider.name())
                .field("out_index", out_index)
                .finish(),
        }
    }
}
