//! Runtime dependency injection for Wasil.
//!
//! Values are mapped by type into an [`Injector`] and handed out by type,
//! resolving through providers and up a chain of parent injectors.

pub mod error;
pub mod inject;
pub mod injector;
pub mod interface;
pub mod key;
pub mod module;
pub mod provider;
pub mod value;

pub use error::{NotFoundError, Result, WasilError};
pub use inject::Inject;
pub use injector::Injector;
pub use interface::Interface;
pub use key::{Kind, TypeKey};
pub use module::Module;
pub use provider::{Handler, Outputs};
pub use value::Value;

pub mod prelude {
    pub use crate::error::{Result, WasilError};
    pub use crate::inject::Inject;
    pub use crate::injector::Injector;
    pub use crate::interface::Interface;
    pub use crate::key::TypeKey;
    pub use crate::module::Module;
    pub use crate::value::Value;
    pub use crate::{implements, interface};
}

#[doc(hidden)]
pub mod __private {
    pub use inventory;
}
