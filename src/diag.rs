//! User-facing diagnostic lines.
//!
//! spec.md §7 requires every public operation to write a short diagnostic to
//! standard output/error rather than raise an exception. These macros are
//! that channel; they are distinct from the [`log`] crate macros used
//! elsewhere in this crate for developer-facing tracing (tree rebalancing,
//! index persistence, ...) — `diag` output is part of the REPL's observable
//! behavior, `log` output is not.

/// Print an `[INFO]` line.
#[macro_export]
macro_rules! info_line {
    ($($arg:tt)*) => {
        println!("[INFO] {}", format!($($arg)*))
    };
}

/// Print an `[ERROR]` line.
#[macro_export]
macro_rules! error_line {
    ($($arg:tt)*) => {
        println!("[ERROR] {}", format!($($arg)*))
    };
}
