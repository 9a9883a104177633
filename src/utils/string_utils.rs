//! String utility functions
//!
//! Utilities for working with strings and text data.

/// True for a plain or schema-qualified SQL identifier (`name` or `schema.name`)
///
/// Table names come from configuration and end up inside SQL text, so only
/// ASCII letters, digits and underscores are accepted.
pub fn is_sql_identifier(name: &str) -> bool {
    let parts: Vec<&str> = name.split('.').collect();
    parts.len() <= 2 && parts.iter().all(|part| {
        let mut chars = part.chars();
        match chars.next() {
            Some(first) if first.is_ascii_alphabetic() || first == '_' => {
                chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
            }
            _ => false,
        }
    })
}

/// Fill `{key}` placeholders in a path template
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    values.iter().fold(template.to_string(), |acc, (key, value)| {
        acc.replace(&format!("{{{}}}", key), value)
    })
}
