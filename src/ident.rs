//! Identifier normalisation shared by the catalog, index, and query layers.
//!
//! spec.md §9: "Always trim and lowercase identifiers at the outer
//! boundary (Catalog, Index, Query). Never store or compare raw user
//! input."

use crate::{err_at, Result};

/// Trim ASCII whitespace and lowercase. Applied to every table/column name
/// before it is stored or compared.
pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// [`normalize`] every identifier in a slice.
pub fn normalize_all(raw: &[String]) -> Vec<String> {
    raw.iter().map(|s| normalize(s)).collect()
}

/// Reject identifiers containing `_`. spec.md §9 flags that the index
/// persistence filename `<table>_<column>.idx` is split at the *first*
/// underscore, making underscores in names unsafe; this crate forbids them
/// outright rather than risk silent corruption on reload.
pub fn validate(name: &str) -> Result<()> {
    if name.is_empty() {
        return err_at!(Invalid, msg: "identifier must not be empty");
    }
    if name.contains('_') {
        return err_at!(
            Invalid,
            msg: "identifier '{}' may not contain '_' (reserved for index filenames)",
            name
        );
    }
    Ok(())
}
