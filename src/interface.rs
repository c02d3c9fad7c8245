//! Shared value types for the matching and ranking pipeline.
//!
//! This module is the source of truth for the types that cross the core's
//! boundary: candidates come in from the window-enumeration layer, ranked
//! results go out to the presentation layer.

// ─────────────────────────────────────────────────────────────────────────────
// MATCH SEGMENTATION
// ─────────────────────────────────────────────────────────────────────────────

/// A contiguous slice of an input string, labeled matched or unmatched.
///
/// Concatenating the `value`s of a matcher's parts in order reconstructs the
/// original input exactly. Matchers and the highlighter rely on this.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StringPart {
    pub value: String,
    pub is_match: bool,
}

impl StringPart {
    pub fn new(value: impl Into<String>, is_match: bool) -> Self {
        Self {
            value: value.into(),
            is_match,
        }
    }
}

/// Outcome of one strategy applied to one (input, pattern) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchResult {
    pub matched: bool,
    /// The strategy's confidence weight on match, 0 otherwise.
    pub score: u32,
    pub parts: Vec<StringPart>,
}

impl MatchResult {
    /// Non-match for a null input: no parts at all.
    pub(crate) fn null_input() -> Self {
        Self {
            matched: false,
            score: 0,
            parts: Vec::new(),
        }
    }

    /// Non-match for a present input: the whole input as one unmatched part.
    pub(crate) fn non_match(input: &str) -> Self {
        Self {
            matched: false,
            score: 0,
            parts: vec![StringPart::new(input, false)],
        }
    }

    pub(crate) fn found(score: u32, parts: Vec<StringPart>) -> Self {
        Self {
            matched: true,
            score,
            parts,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// CANDIDATES
// ─────────────────────────────────────────────────────────────────────────────

/// A matchable item supplied by the window-enumeration layer.
///
/// Read-only to the core; implementations typically wrap a live window
/// handle plus its cached title and process name.
pub trait Candidate {
    /// Primary text: the window title.
    fn title(&self) -> &str;

    /// Secondary text: the owning group, e.g. the process name.
    fn group_label(&self) -> &str;
}

/// Plain owned candidate for callers without their own window type.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CandidateItem {
    pub title: String,
    pub group_label: String,
}

impl CandidateItem {
    pub fn new(title: impl Into<String>, group_label: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            group_label: group_label.into(),
        }
    }
}

impl Candidate for CandidateItem {
    fn title(&self) -> &str {
        &self.title
    }

    fn group_label(&self) -> &str {
        &self.group_label
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// RANKED RESULTS
// ─────────────────────────────────────────────────────────────────────────────

/// One ranked candidate with the per-strategy match results that produced
/// its score, kept so the visible rows can be highlighted later.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FilterResult<T> {
    pub candidate: T,
    /// Sum of all matched strategies' scores across title and group.
    pub score: u32,
    /// One result per strategy, in evaluation order, against the title.
    pub title_matches: Vec<MatchResult>,
    /// One result per strategy, in evaluation order, against the group label.
    pub group_matches: Vec<MatchResult>,
}

impl<T> FilterResult<T> {
    /// The first matched title result in strategy order, which is what the
    /// presentation layer highlights for the title column.
    pub fn best_title_match(&self) -> Option<&MatchResult> {
        self.title_matches.iter().find(|m| m.matched)
    }

    /// The first matched group result in strategy order.
    pub fn best_group_match(&self) -> Option<&MatchResult> {
        self.group_matches.iter().find(|m| m.matched)
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn test_match_result_serde_round_trip() {
        let result = MatchResult::found(
            4,
            vec![
                StringPart::new("google", true),
                StringPart::new(" chrome", false),
            ],
        );
        let json = serde_json::to_string(&result).unwrap();
        let back: MatchResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }

    #[test]
    fn test_candidate_item_serde_round_trip() {
        let item = CandidateItem::new("Inbox - Mail", "thunderbird");
        let json = serde_json::to_string(&item).unwrap();
        let back: CandidateItem = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item);
    }
}
