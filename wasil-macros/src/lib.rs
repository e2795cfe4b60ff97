//! Procedural macros for Wasil.
//!
//! * `#[derive(Inject)]` - fills `#[inject]` fields from an injector

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod inject;

/// Derives `wasil::Inject` for a struct.
///
/// Every field marked `#[inject]` is resolved by its declared type when the
/// struct is passed to `Injector::apply`. Unmarked fields are never touched,
/// even if a value of their type is mapped. Named and tuple structs are
/// supported; on an enum the derived impl does nothing.
///
/// ```ignore
/// #[derive(Default, Inject)]
/// struct Checkout {
///     #[inject]
///     payments: Arc<dyn Payments>,
///     #[inject]
///     tenant: Tenant,
///     attempts: u32,
/// }
/// ```
#[proc_macro_derive(Inject, attributes(inject))]
pub fn derive_inject(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    inject::derive_inject(&input)
        .unwrap_or_else(darling::Error::write_errors)
        .into()
}
