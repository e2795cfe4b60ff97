//! Struct-field injection.
//!
//! [`Inject`] is normally derived: `#[derive(Inject)]` from the `wasil`
//! crate fills every field marked `#[inject]` by resolving the field's type,
//! and leaves unmarked fields alone. On enums the derived impl does nothing.
//!
//! ```rust,ignore
//! #[derive(Default, Inject)]
//! struct Handler {
//!     #[inject]
//!     db: Arc<Database>,
//!     hits: u64,
//! }
//!
//! let mut handler = Handler::default();
//! injector.apply(&mut handler)?;
//! ```

use crate::error::Result;
use crate::injector::Injector;

/// A target whose fields can be filled from an [`Injector`].
pub trait Inject {
    /// Resolves and assigns each injectable field.
    ///
    /// # Errors
    /// [`WasilError::NotFound`](crate::WasilError::NotFound) naming the first
    /// field type that could not be resolved. Fields assigned before the
    /// failure keep their new values.
    fn inject(&mut self, injector: &Injector) -> Result<()>;
}

impl<T: Inject + ?Sized> Inject for Box<T> {
    fn inject(&mut self, injector: &Injector) -> Result<()> {
        (**self).inject(injector)
    }
}

impl<T: Inject + ?Sized> Inject for &mut T {
    fn inject(&mut self, injector: &Injector) -> Result<()> {
        (**self).inject(injector)
    }
}
