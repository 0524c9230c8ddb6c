//! Name lookup failure shared by every closed tag type.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Returned by `FromStr` on tag enums when the name is not a known variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTagError {
    /// Tag family, e.g. `priority` or `sort_by`.
    pub kind: &'static str,
    /// Raw input that failed to match.
    pub value: String,
}

impl UnknownTagError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

impl Display for UnknownTagError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown {} `{}`", self.kind, self.value)
    }
}

impl Error for UnknownTagError {}

/// Lowercases and trims a tag name, mapping spaces and dashes to `_`.
///
/// Lets `"In Progress"`, `"in-progress"` and `"in_progress"` resolve to the
/// same variant.
pub(crate) fn normalize_tag_name(value: &str) -> String {
    value
        .trim()
        .to_ascii_lowercase()
        .replace([' ', '-'], "_")
}

#[cfg(test)]
mod tests {
    use super::{normalize_tag_name, UnknownTagError};

    #[test]
    fn normalize_collapses_separators() {
        assert_eq!(normalize_tag_name(" In Progress "), "in_progress");
        assert_eq!(normalize_tag_name("not-started"), "not_started");
    }

    #[test]
    fn error_message_names_kind_and_value() {
        let err = UnknownTagError::new("priority", "critical");
        assert_eq!(err.to_string(), "unknown priority `critical`");
    }
}
