//! Crate-wide error type.
//!
//! Every public operation in this crate returns a `Result<T>` rather than
//! panicking; the query layer (see [`crate::query`]) is responsible for
//! turning these into the `[ERROR]`/`[INFO]` diagnostic lines spec'd for the
//! REPL. No variant here is meant to be shown to a user verbatim via
//! `Debug` — use `Display` (or `.to_string()`) when surfacing one.

use std::{fmt, result};

/// Crate-wide result alias.
pub type Result<T> = result::Result<T, Error>;

/// Closed set of error kinds produced by this crate's managers.
///
/// Each variant carries `(context, message)`: `context` is usually the
/// `file!():line!()` stamped in by [`err_at`], `message` is human text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Caller-supplied data failed a validation rule (bad schema, bad
    /// predicate, out-of-range primary-key index, ...).
    Invalid(String, String),
    /// Lookup failed: unknown table, unknown column, unknown record id.
    NotFound(String, String),
    /// Create would clobber an existing table/index.
    Duplicate(String, String),
    /// Failure opening, reading, or writing a file under the database
    /// directory.
    IOError(String, String),
    /// A persisted record or index line could not be parsed back into its
    /// in-memory form.
    DecodeFail(String, String),
    /// Anything the other variants don't fit; should be rare.
    Fatal(String, String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Invalid(ctx, msg) => write!(f, "invalid: {} ({})", msg, ctx),
            Error::NotFound(ctx, msg) => write!(f, "not-found: {} ({})", msg, ctx),
            Error::Duplicate(ctx, msg) => write!(f, "duplicate: {} ({})", msg, ctx),
            Error::IOError(ctx, msg) => write!(f, "io-error: {} ({})", msg, ctx),
            Error::DecodeFail(ctx, msg) => write!(f, "decode-fail: {} ({})", msg, ctx),
            Error::Fatal(ctx, msg) => write!(f, "fatal: {} ({})", msg, ctx),
        }
    }
}

impl std::error::Error for Error {}

/// Build an [`Error`] stamped with the call site, optionally wrapping an
/// underlying error's `Display` text.
///
/// ```ignore
/// err_at!(IOError, std::fs::File::open(path))?;
/// err_at!(Invalid, msg: "primary key index {} out of range", idx);
/// ```
#[macro_export]
macro_rules! err_at {
    ($variant:ident, msg: $($arg:expr),+) => {{
        let msg = format!($($arg),+);
        Err($crate::Error::$variant(format!("{}:{}", file!(), line!()), msg))
    }};
    ($variant:ident, $e:expr) => {{
        match $e {
            Ok(v) => Ok(v),
            Err(err) => {
                let ctx = format!("{}:{}", file!(), line!());
                Err($crate::Error::$variant(ctx, err.to_string()))
            }
        }
    }};
}
