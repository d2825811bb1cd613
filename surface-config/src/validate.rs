//! Syntax checks for names that appear in configuration documents

/// Validate doc-comment tag syntax: `@` followed by an ASCII letter and then
/// ASCII letters or digits.
/// Returns None if valid, Some(reason) if invalid
pub(crate) fn validate_tag_name(name: &str) -> Option<&'static str> {
    let Some(rest) = name.strip_prefix('@') else {
        return Some("tag names must start with \"@\"");
    };

    let mut chars = rest.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        Some(_) => return Some("tag names must have a letter after \"@\""),
        None => return Some("tag names cannot be empty"),
    }

    if !chars.all(|c| c.is_ascii_alphanumeric()) {
        return Some("tag names may only contain letters and digits");
    }

    None
}

pub fn is_valid_tag_name(name: &str) -> bool {
    validate_tag_name(name).is_none()
}

/// Compiler diagnostic ids look like `TS2551`.
pub(crate) fn is_compiler_message_id(id: &str) -> bool {
    id.strip_prefix("TS")
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}
