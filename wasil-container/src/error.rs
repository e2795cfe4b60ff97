//! Error types for injector operations.
//!
//! Lookups that find nothing are ordinary, recoverable errors and say
//! exactly what was missing, who needed it and where the injector looked.

use std::fmt;

use wasil_support::rendering::{render_chain, shorten_type_name};

use crate::key::TypeKey;

/// Main error type for all Wasil operations.
#[derive(Debug, thiserror::Error)]
pub enum WasilError {
    /// No injector in the chain maps the requested type.
    #[error("{}", .0)]
    NotFound(NotFoundError),

    /// A provider could not produce its value. Fatal to the retrieval
    /// that triggered it: no partial result is ever returned.
    #[error("Provider {} failed: {source}", shorten_type_name(.provider))]
    ProviderFailed {
        provider: &'static str,
        #[source]
        source: Box<WasilError>,
    },

    /// The value stored under a key is not of the key's type.
    ///
    /// Only reachable through [`Injector::set_raw`](crate::Injector::set_raw).
    #[error("Type mismatch for {key}: stored value is {found}")]
    TypeMismatch { key: TypeKey, found: &'static str },

    /// A provider returned fewer values than were mapped for it.
    #[error("Provider {} yielded no output at position {index}", shorten_type_name(.provider))]
    MissingOutput { provider: &'static str, index: usize },
}

impl WasilError {
    /// Returns the innermost missing type, looking through provider
    /// failures.
    pub fn missing(&self) -> Option<&TypeKey> {
        match self {
            WasilError::NotFound(err) => Some(&err.requested),
            WasilError::ProviderFailed { source, .. } => source.missing(),
            _ => None,
        }
    }
}

/// Error when a type is mapped nowhere along the injector chain.
#[derive(Debug)]
pub struct NotFoundError {
    /// The type that was requested
    pub requested: TypeKey,
    /// The function, provider or field that needed it (if known)
    pub required_by: Option<String>,
    /// Labels of the injectors searched, youngest first
    pub searched: Vec<String>,
    /// Mapped types with similar names
    pub suggestions: Vec<String>,
}

impl fmt::Display for NotFoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value not found for type {}", self.requested)?;

        if let Some(ref dependent) = self.required_by {
            write!(f, "\n  Required by: {}", shorten_type_name(dependent))?;
        }

        if !self.searched.is_empty() {
            write!(f, "\n  Searched: {}", render_chain(&self.searched))?;
        }

        if !self.suggestions.is_empty() {
            write!(f, "\n  Did you mean one of:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n    - {suggestion}")?;
            }
        }

        write!(
            f,
            "\n  Hint: map a {} with map_value, map_as or map_provider on this injector or one of its parents",
            self.requested.short_name()
        )
    }
}

/// Convenient Result type for Wasil operations.
pub type Result<T> = std::result::Result<T, WasilError>;
