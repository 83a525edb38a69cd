//! Reference expressions carried by text properties.
//!
//! A text value of the form `$name` refers to the element whose id is
//! `name`. `${...}` is a binding expression and `$$` escapes a literal
//! dollar sign; neither is a reference.

pub const REFERENCE_PREFIX: char = '$';

/// Returns the source id if `value` is a reference expression
pub fn parse_reference_expression(value: &str) -> Option<&str> {
    let source = value.strip_prefix(REFERENCE_PREFIX)?;
    if is_valid_id(source) {
        Some(source)
    } else {
        None
    }
}

pub fn is_reference_expression(value: &str) -> bool {
    parse_reference_expression(value).is_some()
}

/// Build the reference expression naming `source`
pub fn reference_expression(source: &str) -> String {
    format!("{}{}", REFERENCE_PREFIX, source)
}

/// Identifier syntax accepted for element ids
pub fn is_valid_id(id: &str) -> bool {
    let mut chars = id.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reference_expression() {
        assert_eq!(parse_reference_expression("$foo"), Some("foo"));
        assert_eq!(parse_reference_expression("$_a1"), Some("_a1"));
        assert_eq!(parse_reference_expression("foo"), None);
        assert_eq!(parse_reference_expression("$"), None);
        assert_eq!(parse_reference_expression("${foo}"), None);
        assert_eq!(parse_reference_expression("$$foo"), None);
        assert_eq!(parse_reference_expression("$1abc"), None);
    }

    #[test]
    fn test_reference_expression_builds_prefix() {
        assert_eq!(reference_expression("okButton"), "$okButton");
        assert!(is_reference_expression(&reference_expression("okButton")));
    }
}
