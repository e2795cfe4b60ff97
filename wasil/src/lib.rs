//! # Wasil
//!
//! Runtime dependency resolution by type, with hierarchical injectors.
//!
//! An [`Injector`] maps types to values, either literal values or providers
//! that compute one on demand. Lookups try an exact match, then any mapped
//! type implementing a requested interface, then the parent injector.
//! Providers always resolve their own parameters from the injector the
//! lookup started on, so a request-level child can feed a provider that
//! was mapped once at the root.
//!
//! ```rust
//! use std::sync::Arc;
//! use wasil::prelude::*;
//!
//! trait Greeter: Send + Sync {
//!     fn greet(&self) -> String;
//! }
//! interface!(dyn Greeter);
//!
//! struct English;
//! impl Greeter for English {
//!     fn greet(&self) -> String { "hello".into() }
//! }
//!
//! #[derive(Clone, Default)]
//! struct User(&'static str);
//!
//! #[derive(Default, Inject)]
//! struct Page {
//!     #[inject]
//!     user: User,
//!     views: u32,
//! }
//!
//! let root = Arc::new(Injector::with_label("app"));
//! root.map_as::<dyn Greeter>(Arc::new(English));
//!
//! let request = root.child("request");
//! request.map_value(User("ada"));
//!
//! let line = request
//!     .invoke(|g: Arc<dyn Greeter>, u: User| format!("{}, {}", g.greet(), u.0))
//!     .unwrap();
//! assert_eq!(line, "hello, ada");
//!
//! let mut page = Page::default();
//! request.apply(&mut page).unwrap();
//! assert_eq!(page.user.0, "ada");
//! assert_eq!(page.views, 0);
//! ```

pub use wasil_container::*;
pub use wasil_derive::*;
pub use wasil_support::*;

/// Everything needed to map, resolve and inject.
pub mod prelude {
    pub use wasil_container::prelude::*;
    pub use wasil_derive::Inject;
}
