//! Modules: groups of related mappings.
//!
//! A module bundles the mappings of one area of an application so they can
//! be installed together, on a root injector or on a child.
//!
//! # Examples
//! ```rust
//! use wasil_container::prelude::*;
//!
//! #[derive(Clone)]
//! struct DatabaseUrl(String);
//!
//! struct DatabaseModule {
//!     url: String,
//! }
//!
//! impl Module for DatabaseModule {
//!     fn configure(&self, injector: &Injector) {
//!         injector
//!             .map_value(DatabaseUrl(self.url.clone()))
//!             .map_provider(|url: DatabaseUrl| url.0.len());
//!     }
//! }
//!
//! let injector = Injector::new();
//! injector.install(&DatabaseModule { url: "postgres://db".into() });
//! assert_eq!(injector.get::<usize>(), Some(13));
//! ```

/// A set of mappings installed as one unit.
///
/// Split mappings by concern instead of one long block:
///
/// ```rust,ignore
/// injector
///     .install(&DatabaseModule)
///     .install(&AuthModule)
///     .install(&MailModule);
/// ```
pub trait Module: Send + Sync {
    /// Maps this module's values and providers into `injector`.
    fn configure(&self, injector: &crate::Injector);

    /// Human-readable name for logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}
