//! Callables whose parameters come from an injector.
//!
//! [`Handler`] is implemented for every `Fn(A1, …, An) -> R` with up to
//! twelve parameters, as long as each parameter type can be resolved
//! (`Clone + Send + Sync + 'static`). The same trait backs
//! [`Injector::invoke`] and provider mappings.
//!
//! [`Outputs`] describes providers that yield several types from one call:
//! they return a tuple, and every tuple element is mapped under its own type.

use std::any::type_name;
use std::marker::PhantomData;

use crate::error::Result;
use crate::injector::Injector;
use crate::key::TypeKey;
use crate::value::Value;

/// A callable whose parameters are resolved by type.
///
/// `Args` is the tuple of parameter types; it only exists to keep the
/// implementations for different arities apart and is always inferred.
///
/// ```
/// use wasil_container::{Handler, Injector};
/// use wasil_container::key::TypeKey;
///
/// let greet = |name: String, times: u8| name.repeat(times as usize);
/// assert_eq!(
///     greet.param_keys(),
///     vec![TypeKey::of::<String>(), TypeKey::of::<u8>()]
/// );
///
/// let injector = Injector::new();
/// injector.map_value(String::from("ab")).map_value(2u8);
/// assert_eq!(greet.call_with(&injector).unwrap(), "abab");
/// ```
pub trait Handler<Args> {
    type Output;

    /// Declared parameter types, in order.
    fn param_keys(&self) -> Vec<TypeKey>;

    /// Resolves every parameter against `injector`, then calls.
    ///
    /// Resolution stops at the first parameter that cannot be found and
    /// the callable is not invoked.
    fn call_with(&self, injector: &Injector) -> Result<Self::Output>;
}

macro_rules! impl_handler {
    ($($arg:ident),*) => {
        impl<F, R, $($arg,)*> Handler<($($arg,)*)> for F
        where
            F: Fn($($arg),*) -> R,
            $($arg: Clone + Send + Sync + 'static,)*
        {
            type Output = R;

            fn param_keys(&self) -> Vec<TypeKey> {
                vec![$(TypeKey::of::<$arg>()),*]
            }

            #[allow(non_snake_case, unused_variables)]
            fn call_with(&self, injector: &Injector) -> Result<R> {
                $(let $arg = injector.require_for::<$arg>(type_name::<F>())?;)*
                Ok((self)($($arg),*))
            }
        }
    };
}

impl_handler!();
impl_handler!(A1);
impl_handler!(A1, A2);
impl_handler!(A1, A2, A3);
impl_handler!(A1, A2, A3, A4);
impl_handler!(A1, A2, A3, A4, A5);
impl_handler!(A1, A2, A3, A4, A5, A6);
impl_handler!(A1, A2, A3, A4, A5, A6, A7);
impl_handler!(A1, A2, A3, A4, A5, A6, A7, A8);
impl_handler!(A1, A2, A3, A4, A5, A6, A7, A8, A9);
impl_handler!(A1, A2, A3, A4, A5, A6, A7, A8, A9, A10);
impl_handler!(A1, A2, A3, A4, A5, A6, A7, A8, A9, A10, A11);
impl_handler!(A1, A2, A3, A4, A5, A6, A7, A8, A9, A10, A11, A12);

/// The outputs of a multi-output provider.
///
/// Implemented for tuples up to eight elements. `()` declares no outputs.
pub trait Outputs {
    /// One key per output position.
    fn output_keys() -> Vec<TypeKey>;

    fn into_values(self) -> Vec<Value>;
}

macro_rules! impl_outputs {
    ($($out:ident),*) => {
        impl<$($out,)*> Outputs for ($($out,)*)
        where
            $($out: Send + Sync + 'static,)*
        {
            fn output_keys() -> Vec<TypeKey> {
                vec![$(TypeKey::of::<$out>()),*]
            }

            #[allow(non_snake_case)]
            fn into_values(self) -> Vec<Value> {
                let ($($out,)*) = self;
                vec![$(Value::new($out)),*]
            }
        }
    };
}

impl_outputs!();
impl_outputs!(O1);
impl_outputs!(O1, O2);
impl_outputs!(O1, O2, O3);
impl_outputs!(O1, O2, O3, O4);
impl_outputs!(O1, O2, O3, O4, O5);
impl_outputs!(O1, O2, O3, O4, O5, O6);
impl_outputs!(O1, O2, O3, O4, O5, O6, O7);
impl_outputs!(O1, O2, O3, O4, O5, O6, O7, O8);

/// A provider with its types erased, shared by all entries it backs.
pub(crate) trait ErasedProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Calls the provider with parameters from `injector`; one value per
    /// output position.
    fn provide(&self, injector: &Injector) -> Result<Vec<Value>>;
}

/// A provider whose return value is its single output.
pub(crate) struct SingleOutput<F, Args> {
    f: F,
    _args: PhantomData<fn(Args)>,
}

impl<F, Args> SingleOutput<F, Args> {
    pub fn new(f: F) -> Self {
        Self {
            f,
            _args: PhantomData,
        }
    }
}

impl<F, Args> ErasedProvider for SingleOutput<F, Args>
where
    F: Handler<Args> + Send + Sync,
    F::Output: Send + Sync + 'static,
{
    fn name(&self) -> &'static str {
        type_name::<F>()
    }

    fn provide(&self, injector: &Injector) -> Result<Vec<Value>> {
        Ok(vec![Value::new(self.f.call_with(injector)?)])
    }
}

/// A provider returning an [`Outputs`] tuple.
pub(crate) struct MultiOutput<F, Args> {
    f: F,
    _args: PhantomData<fn(Args)>,
}

impl<F, Args> MultiOutput<F, Args> {
    pub fn new(f: F) -> Self {
        Self {
            f,
            _args: PhantomData,
        }
    }
}

impl<F, Args> ErasedProvider for MultiOutput<F, Args>
where
    F: Handler<Args> + Send + Sync,
    F::Output: Outputs,
{
    fn name(&self) -> &'static str {
        type_name::<F>()
    }

    fn provide(&self, injector: &Injector) -> Result<Vec<Value>> {
        Ok(self.f.call_with(injector)?.into_values())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WasilError;

    #[derive(Clone)]
    struct Url(&'static str);

    fn connect(url: Url, retries: u8) -> String {
        format!("{}x{}", url.0, retries)
    }

    #[test]
    fn zero_arity_handler() {
        let injector = Injector::new();
        let handler = || 7;
        assert!(handler.param_keys().is_empty());
        assert_eq!(handler.call_with(&injector).unwrap(), 7);
    }

    #[test]
    fn fn_item_handler() {
        let injector = Injector::new();
        injector.map_value(Url("db")).map_value(3u8);
        assert_eq!(connect.call_with(&injector).unwrap(), "dbx3");
    }

    #[test]
    fn missing_parameter_names_type_and_callable() {
        let injector = Injector::new();
        injector.map_value(Url("db"));

        match connect.call_with(&injector).unwrap_err() {
            WasilError::NotFound(err) => {
                assert_eq!(err.requested, TypeKey::of::<u8>());
                assert!(err.required_by.as_deref().unwrap().contains("connect"));
            }
            other => panic!("Expected NotFound, got: {other:?}"),
        }
    }

    #[test]
    fn twelve_parameters() {
        let injector = Injector::new();
        injector.map_value(1u8);
        let sum = |a: u8, b: u8, c: u8, d: u8, e: u8, f: u8, g: u8, h: u8, i: u8, j: u8, k: u8, l: u8| {
            a + b + c + d + e + f + g + h + i + j + k + l
        };
        assert_eq!(sum.param_keys().len(), 12);
        assert_eq!(sum.call_with(&injector).unwrap(), 12);
    }

    #[test]
    fn output_keys_follow_positions() {
        assert_eq!(
            <(u8, String)>::output_keys(),
            vec![TypeKey::of::<u8>(), TypeKey::of::<String>()]
        );
        assert!(<()>::output_keys().is_empty());
    }

    #[test]
    fn outputs_into_values() {
        let values = (1u8, String::from("x")).into_values();
        assert_eq!(values.len(), 2);
        assert_eq!(values[0].downcast::<u8>(), Some(1));
        assert_eq!(values[1].downcast::<String>().as_deref(), Some("x"));
    }

    #[test]
    fn single_output_provider_wraps_return() {
        let injector = Injector::new();
        injector.map_value(Url("cache"));
        let provider = SingleOutput::<_, (Url,)>::new(|url: Url| url.0.len());
        let values = provider.provide(&injector).unwrap();
        assert_eq!(values.len(), 1);
        assert_eq!(values[0].downcast::<usize>(), Some(5));
        assert!(provider.name().contains("closure"));
    }

    #[test]
    fn multi_output_provider_splits_tuple() {
        let injector = Injector::new();
        let provider = MultiOutput::<_, ()>::new(|| (Url("a"), 2u16));
        let values = provider.provide(&injector).unwrap();
        assert_eq!(values.len(), 2);
        assert!(values[0].is::<Url>());
        assert_eq!(values[1].downcast::<u16>(), Some(2));
    }
}
