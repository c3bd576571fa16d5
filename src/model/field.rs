/// Longest statement accepted for an issue, in characters.
pub const MAX_STATEMENT_LEN: usize = 200;

/// A field value that failed its own validation rule
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {field}: {reason}")]
pub struct FieldError {
    pub field: &'static str,
    pub reason: String,
}

impl FieldError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        FieldError {
            field,
            reason: reason.into(),
        }
    }
}

/// Trim and check an issue statement.
pub fn validate_statement(raw: &str) -> Result<String, FieldError> {
    let statement = raw.trim();
    if statement.is_empty() {
        return Err(FieldError::new("statement", "must not be blank"));
    }
    if statement.chars().count() > MAX_STATEMENT_LEN {
        return Err(FieldError::new(
            "statement",
            format!("must be at most {} characters", MAX_STATEMENT_LEN),
        ));
    }
    Ok(statement.to_string())
}

/// Descriptions are free text; only surrounding whitespace is dropped.
pub fn validate_description(raw: &str) -> Result<String, FieldError> {
    Ok(raw.trim().to_string())
}

/// Trim and check a solution remark.
pub fn validate_remark(raw: &str) -> Result<String, FieldError> {
    let remark = raw.trim();
    if remark.is_empty() {
        return Err(FieldError::new("remark", "must not be blank"));
    }
    Ok(remark.to_string())
}

/// Check a solution link: `scheme://rest`, no whitespace.
///
/// The scheme starts with a letter and continues with letters, digits,
/// `+`, `.` or `-`. The part after `://` must be non-empty.
pub fn validate_link(raw: &str) -> Result<String, FieldError> {
    let link = raw.trim();
    let Some((scheme, rest)) = link.split_once("://") else {
        return Err(FieldError::new("link", "expected scheme://location"));
    };

    let mut chars = scheme.chars();
    let scheme_ok = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '.' | '-'))
        }
        _ => false,
    };
    if !scheme_ok {
        return Err(FieldError::new("link", format!("bad scheme '{}'", scheme)));
    }
    if rest.is_empty() {
        return Err(FieldError::new("link", "missing location after scheme"));
    }
    if link.chars().any(char::is_whitespace) {
        return Err(FieldError::new("link", "must not contain whitespace"));
    }
    Ok(link.to_string())
}

/// Strip an optional `#` and check a tag name.
pub fn validate_tag(raw: &str) -> Result<String, FieldError> {
    let tag = raw.trim().trim_start_matches('#');
    if tag.is_empty() {
        return Err(FieldError::new("tag", "must not be empty"));
    }
    if let Some(bad) = tag
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
    {
        return Err(FieldError::new(
            "tag",
            format!("'{}' contains illegal character '{}'", tag, bad),
        ));
    }
    Ok(tag.to_string())
}
