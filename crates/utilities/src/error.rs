use core::error::Error;
use core::fmt::Debug;
use core::fmt::Display;

/// The catch-all error type of the toolset. Has a blanket [`From`] impl for
/// any type that implements Rust's [`Error`] (and for `&str` and `String`),
/// so it can be used with `?` at the tool level. Captures a backtrace that is
/// printed by the [`Debug`] implementation.
pub struct CanonError {
    inner: Box<InnerCanonError>,
}

impl CanonError {
    /// Attempts to downcast the underlying error to the given type.
    pub fn downcast_ref<E: Error + 'static>(&self) -> Option<&E> {
        self.inner.error.downcast_ref::<E>()
    }
}

/// Boxed separately so that `Result<T, CanonError>` stays a thin pointer wide.
struct InnerCanonError {
    error: Box<dyn Error + Send + Sync + 'static>,
    backtrace: std::backtrace::Backtrace,
}

// NOTE: writing the impl this way gives us From<&str>
impl<E> From<E> for CanonError
where
    Box<dyn Error + Send + Sync + 'static>: From<E>,
{
    #[cold]
    fn from(error: E) -> Self {
        CanonError {
            inner: Box::new(InnerCanonError {
                error: error.into(),
                backtrace: std::backtrace::Backtrace::capture(),
            }),
        }
    }
}

impl Display for CanonError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.inner.error)
    }
}

impl Debug for CanonError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "{}", self.inner.error)?;

        let backtrace = &self.inner.backtrace;
        if let std::backtrace::BacktraceStatus::Captured = backtrace.status() {
            writeln!(f, "{backtrace}")?;
        }

        Ok(())
    }
}
