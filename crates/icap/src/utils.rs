//! Utility macros and functions for the ICAP crate.
//!
//! This module provides helper macros and functions that are used internally
//! by the codec implementation.

/// Line terminator used by every line oriented part of the wire format.
pub(crate) const CRLF: &[u8] = b"\r\n";

/// Returns the index of the first `\r\n` in `buf`, if any.
#[inline]
pub(crate) fn find_crlf(buf: &[u8]) -> Option<usize> {
    buf.windows(CRLF.len()).position(|window| window == CRLF)
}

/// A macro for early returns with an error if a condition is not met.
///
/// This is similar to the `assert!` macro, but returns an error instead of panicking.
/// It's useful for validation checks where you want to return early with an error
/// if some condition is not satisfied.
///
/// # Arguments
///
/// * `$predicate` - A boolean expression that should evaluate to true
/// * `$error` - The error value to return if the predicate is false
///
/// # Example
///
/// ```ignore
/// ensure!(last_kind.is_body(), ParseError::MissingBody);
/// ```
macro_rules! ensure {
    ($predicate:expr, $error:expr) => {
        if !$predicate {
            return Err($error);
        }
    };
}

pub(crate) use ensure;
