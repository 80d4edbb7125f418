//! The unified error handling system for the application.

use std::fmt::Display;

pub use business::BusinessError;
pub use types::PortalError;

/// A unified `Result` type for the entire application.
///
/// All functions that can fail should return this type.
pub type Result<T> = std::result::Result<T, PortalError>;

pub mod business;
pub mod types;

/// Context trait for adding context to errors.
pub trait Context<T, E> {
    /// Wrap the error with a fixed message.
    #[track_caller]
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display;

    /// Wrap the error with a lazily built message.
    #[track_caller]
    fn with_context<C, F>(self, context: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Display;
}

impl<T, E> Context<T, E> for std::result::Result<T, E>
where
    E: Into<PortalError>,
{
    #[track_caller]
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display,
    {
        self.with_context(|| context)
    }

    #[track_caller]
    fn with_context<C, F>(self, context: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Display,
    {
        self.map_err(|error| PortalError::Context {
            context: context().to_string(),
            source: Box::new(error.into()),
        })
    }
}
