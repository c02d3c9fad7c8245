//! Raw query parsing.
//!
//! A `.` splits the query into a group filter and a text filter: everything
//! before the first dot scopes the search to matching group labels, the rest
//! filters titles. A leading dot substitutes the foreground candidate's
//! group, so ".tab" means "tabs within the group I'm already in".

/// Parsed query: the text filter plus an optional group scope.
///
/// Derived fresh from each raw query string, never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Query {
    pub text_filter: String,
    /// `None` means the query is group-agnostic.
    pub group_filter: Option<String>,
}

impl Query {
    /// Split `raw` on its first `.` only; later dots stay in the text
    /// filter. An empty group segment falls back to `fallback_group`.
    pub fn parse(raw: &str, fallback_group: &str) -> Self {
        match raw.split_once('.') {
            None => Self {
                text_filter: raw.to_owned(),
                group_filter: None,
            },
            Some((group, text)) => {
                let group = if group.is_empty() { fallback_group } else { group };
                Self {
                    text_filter: text.to_owned(),
                    group_filter: Some(group.to_owned()),
                }
            }
        }
    }
}
