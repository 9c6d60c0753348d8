//! # Composite Keys
//!
//! Encoding for keys built from a namespace and an ordered list of attribute
//! values. A composite key is laid out as
//!
//! ```text
//! \u{0} namespace \u{0} attr_1 \u{0} attr_2 \u{0} ... attr_n \u{0}
//! ```
//!
//! so that every key sharing a namespace and a leading run of attributes also
//! shares a byte prefix. That is what lets a plain ordered range scan act as a
//! secondary index.

use super::errors::LedgerError;

/// Separator between the components of a composite key.
pub const COMPOSITE_KEY_DELIMITER: char = '\u{0}';

/// Largest code point; reserved by ledgers as a range-scan upper bound.
const MAX_UNICODE_RUNE: char = '\u{10FFFF}';

/// Build a composite key.
///
/// Order-sensitive: `["a", "b"]` and `["b", "a"]` produce different keys.
/// With fewer attributes than a full key this yields the scan prefix for a
/// partial-key range query.
pub fn create_composite_key(namespace: &str, attributes: &[&str]) -> Result<String, LedgerError> {
    if namespace.is_empty() {
        return Err(LedgerError::InvalidCompositeKey {
            message: "namespace must be a non-empty string".to_string(),
        });
    }
    validate_component(namespace)?;

    let mut key = String::with_capacity(
        2 + namespace.len() + attributes.iter().map(|a| a.len() + 1).sum::<usize>(),
    );
    key.push(COMPOSITE_KEY_DELIMITER);
    key.push_str(namespace);
    key.push(COMPOSITE_KEY_DELIMITER);
    for attribute in attributes {
        validate_component(attribute)?;
        key.push_str(attribute);
        key.push(COMPOSITE_KEY_DELIMITER);
    }
    Ok(key)
}

/// Split a composite key back into its namespace and attributes.
pub fn split_composite_key(key: &str) -> Result<(String, Vec<String>), LedgerError> {
    let body = key
        .strip_prefix(COMPOSITE_KEY_DELIMITER)
        .and_then(|rest| rest.strip_suffix(COMPOSITE_KEY_DELIMITER))
        .ok_or_else(|| LedgerError::InvalidCompositeKey {
            message: format!("not a composite key: {}", printable_key(key)),
        })?;

    let mut parts = body.split(COMPOSITE_KEY_DELIMITER).map(str::to_string);
    let namespace = parts.next().unwrap_or_default();
    if namespace.is_empty() {
        return Err(LedgerError::InvalidCompositeKey {
            message: "composite key has an empty namespace".to_string(),
        });
    }
    Ok((namespace, parts.collect()))
}

/// Whether `key` uses the composite layout.
pub fn is_composite_key(key: &str) -> bool {
    key.starts_with(COMPOSITE_KEY_DELIMITER)
}

/// Render a key for messages and logs; composite delimiters become `:`.
pub fn printable_key(key: &str) -> String {
    if is_composite_key(key) {
        key.trim_matches(COMPOSITE_KEY_DELIMITER)
            .replace(COMPOSITE_KEY_DELIMITER, ":")
    } else {
        key.to_string()
    }
}

fn validate_component(component: &str) -> Result<(), LedgerError> {
    if component.contains(COMPOSITE_KEY_DELIMITER) || component.contains(MAX_UNICODE_RUNE) {
        return Err(LedgerError::InvalidCompositeKey {
            message: format!(
                "component {:?} contains a reserved character",
                component.replace(COMPOSITE_KEY_DELIMITER, "\\u0000")
            ),
        });
    }
    Ok(())
}
