//! Derive macros for Wasil, re-exported by the `wasil` facade.

pub use wasil_macros::Inject;
