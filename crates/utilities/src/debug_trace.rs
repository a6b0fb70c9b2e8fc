//! Tracing for the hot paths of the rewrite engine. Only active when the
//! `canon_debug-trace` feature is enabled, otherwise the arguments are not
//! even evaluated.

/// Prints trace information when the `canon_debug-trace` feature is enabled
/// by delegating to [`log::trace!`].
///
/// # Examples
///
/// ```
/// # use canon_utilities::debug_trace;
/// let offset = 3;
/// debug_trace!("trying rules at offset {}", offset);
/// ```
#[macro_export]
#[cfg(feature = "canon_debug-trace")]
macro_rules! debug_trace {
    ($($arg:tt)*) => {
        {
            log::trace!($($arg)*);
        }
    };
}

#[macro_export]
#[cfg(not(feature = "canon_debug-trace"))]
macro_rules! debug_trace {
    ($($arg:tt)*) => {{}};
}
