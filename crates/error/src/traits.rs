//! # Error Traits
//!
//! Conversion traits for error handling.

use std::fmt;

use crate::{AppError, Result};

/// Trait for adding context to errors.
pub trait Context<T> {
    fn with_context<C: ToString>(self, context: C) -> Result<T>;
    fn context<C: ToString>(self, context: C) -> Result<T>
    where
        Self: Sized;
}

/// Extension methods for Result types.
pub trait ResultExt<T> {
    fn with_context<C: ToString>(self, context: C) -> Result<T>;
    fn context<C: ToString>(self, context: C) -> Result<T>
    where
        Self: Sized;
    fn log_error(self) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<AppError> + std::fmt::Display,
{
    fn with_context<C: ToString>(self, context: C) -> Result<T> {
        self.map_err(|e| {
            let err: AppError = e.into();
            err.context(context)
        })
    }

    fn context<C: ToString>(self, context: C) -> Result<T>
    where
        Self: Sized,
    {
        self.with_context(context)
    }

    fn log_error(self) -> Result<T> {
        self.map_err(|e| {
            let err: AppError = e.into();
            tracing::error!(error = %err, code = err.code(), "Operation failed");
            err
        })
    }
}

impl<T> Context<T> for Option<T> {
    fn with_context<C: ToString>(self, context: C) -> Result<T> { self.ok_or_else(|| AppError::not_found(context)) }

    fn context<C: ToString>(self, context: C) -> Result<T>
    where
        Self: Sized,
    {
        self.with_context(context)
    }
}

/// Wrap an error with additional context.
#[track_caller]
pub fn wrap_err<E, C>(err: E, context: C) -> AppError
where
    E: Into<AppError>,
    C: fmt::Display,
{
    let app_err: AppError = err.into();
    app_err.context(context)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context() {
        let result: Result<i32> = Err(AppError::not_found("Team"));
        let err = result.context("Loading team").unwrap_err();
        assert_eq!(err.message(), "Loading team: Team");
    }

    #[test]
    fn test_log_error_keeps_variant() {
        let result: Result<i32> = Err(AppError::forbidden("Denied"));
        let err = result.log_error().unwrap_err();
        assert_eq!(err.code(), "FORBIDDEN");
    }

    #[test]
    fn test_option_context_is_not_found() {
        let missing: Option<u8> = None;
        let err = missing.context("Invite not found").unwrap_err();
        assert_eq!(err.code(), "NOT_FOUND");
        assert_eq!(err.message(), "Invite not found");

        assert_eq!(Some(3u8).context("unused").unwrap(), 3);
    }

    #[test]
    fn test_wrap_err() {
        let err = wrap_err(AppError::not_found("Notice not found"), "Updating notice");
        assert_eq!(
            format!("{}", err),
            "NotFound: Updating notice: Notice not found"
        );
    }
}
