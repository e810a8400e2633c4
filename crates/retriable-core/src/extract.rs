// SPDX-License-Identifier: MIT OR Apache-2.0
//! Status code extraction from type-erased errors.

use crate::StatusError;
use std::error::Error;
use std::fmt;
use std::marker::PhantomData;
use tonic::{Code, Status};

/// An error value that may carry an embedded gRPC status code.
///
/// Implement it on your own error types and register them with
/// [`StatusExtractor::with`] so the chain walker can see their codes.
pub trait HasStatusCode {
    /// The embedded code, or `None` when this value carries none.
    fn status_code(&self) -> Option<Code>;
}

impl HasStatusCode for Status {
    fn status_code(&self) -> Option<Code> {
        Some(self.code())
    }
}

impl HasStatusCode for StatusError {
    fn status_code(&self) -> Option<Code> {
        Some(self.code)
    }
}

impl<T: HasStatusCode + ?Sized> HasStatusCode for Box<T> {
    fn status_code(&self) -> Option<Code> {
        (**self).status_code()
    }
}

/// Pulls a status code out of a single link of an error chain.
///
/// Only the link itself is inspected; walking `source()` is the caller's job.
pub trait CodeExtractor {
    /// Returns the code carried by `err`, if any.
    fn extract(&self, err: &(dyn Error + 'static)) -> Option<Code>;
}

impl<F> CodeExtractor for F
where
    F: Fn(&(dyn Error + 'static)) -> Option<Code>,
{
    fn extract(&self, err: &(dyn Error + 'static)) -> Option<Code> {
        self(err)
    }
}

/// Default extractor: recognises [`tonic::Status`], [`StatusError`] and
/// boxed statuses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusExtractor;

impl StatusExtractor {
    /// The default extractor, extended with a caller's [`HasStatusCode`]
    /// type.
    ///
    /// ```
    /// use retriable_core::{ChainWalker, Code, HasStatusCode, StatusExtractor};
    ///
    /// #[derive(Debug, thiserror::Error)]
    /// #[error("ledger busy")]
    /// struct LedgerBusy;
    ///
    /// impl HasStatusCode for LedgerBusy {
    ///     fn status_code(&self) -> Option<Code> {
    ///         Some(Code::Unavailable)
    ///     }
    /// }
    ///
    /// let walker = ChainWalker::new().with_extractor(StatusExtractor::with::<LedgerBusy>());
    /// assert!(walker.is_retriable(Some(&LedgerBusy)));
    /// ```
    pub fn with<T>() -> Fallback<StatusExtractor, Downcast<T>>
    where
        T: HasStatusCode + Error + 'static,
    {
        Fallback::new(StatusExtractor, Downcast::new())
    }
}

/// Extractor for one concrete [`HasStatusCode`] error type, found by
/// downcasting.
pub struct Downcast<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> Downcast<T> {
    /// Extractor for `T`.
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for Downcast<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Downcast<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Downcast<T> {}

impl<T> fmt::Debug for Downcast<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Downcast")
            .field(&std::any::type_name::<T>())
            .finish()
    }
}

impl<T> CodeExtractor for Downcast<T>
where
    T: HasStatusCode + Error + 'static,
{
    fn extract(&self, err: &(dyn Error + 'static)) -> Option<Code> {
        err.downcast_ref::<T>().and_then(HasStatusCode::status_code)
    }
}

impl CodeExtractor for StatusExtractor {
    fn extract(&self, err: &(dyn Error + 'static)) -> Option<Code> {
        if let Some(status) = err.downcast_ref::<Status>() {
            return status.status_code();
        }
        if let Some(status) = err.downcast_ref::<Box<Status>>() {
            return status.status_code();
        }
        err.downcast_ref::<StatusError>()
            .and_then(HasStatusCode::status_code)
    }
}

/// Chains two extractors: `first` wins when it finds a code.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fallback<A, B> {
    first: A,
    second: B,
}

impl<A, B> Fallback<A, B> {
    /// Consult `first`, then `second`.
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }

    /// Also recognise the [`HasStatusCode`] type `T`, after everything
    /// already registered.
    pub fn with<T>(self) -> Fallback<Self, Downcast<T>>
    where
        T: HasStatusCode + Error + 'static,
    {
        Fallback::new(self, Downcast::new())
    }
}

impl<A: CodeExtractor, B: CodeExtractor> CodeExtractor for Fallback<A, B> {
    fn extract(&self, err: &(dyn Error + 'static)) -> Option<Code> {
        self.first
            .extract(err)
            .or_else(|| self.second.extract(err))
    }
}
