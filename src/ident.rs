//! SQL identifier escaping
//!
//! Identifiers that are plain words stay bare so generated SQL reads
//! naturally; anything else is double-quoted with embedded quotes doubled.

const RESERVED: &[&str] = &[
    "ALL", "AND", "AS", "ASC", "BETWEEN", "BY", "CASE", "DESC", "DISTINCT", "ELSE", "END",
    "FALSE", "FROM", "GROUP", "HAVING", "IN", "IS", "JOIN", "LIMIT", "NOT", "NULL", "ON", "OR",
    "ORDER", "SELECT", "TABLE", "THEN", "TRUE", "UNION", "WHEN", "WHERE",
];

fn is_plain(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !RESERVED.contains(&name.to_ascii_uppercase().as_str())
}

/// Escape a single identifier (column, alias)
pub fn quote_identifier(name: &str) -> String {
    if is_plain(name) {
        name.to_string()
    } else {
        format!("\"{}\"", name.replace('"', "\"\""))
    }
}

/// Escape a possibly schema-qualified name, part by part
pub fn quote_qualified(name: &str) -> String {
    name.split('.')
        .map(quote_identifier)
        .collect::<Vec<_>>()
        .join(".")
}
