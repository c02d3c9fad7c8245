//! The four matcher strategies.
//!
//! Each strategy is a total function over `(Option<input>, Option<pattern>)`:
//! no input combination errors or panics. Matching is case-insensitive; the
//! returned parts preserve original casing and concatenate back to the input
//! exactly.
//!
//! The SignificantCharacters and IndividualCharacters scans are explicit
//! forward passes over the character sequence, linear in the input with no
//! backtracking, so adversarial patterns cannot blow up evaluation time.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::Mutex;

use crate::interface::{MatchResult, StringPart};

/// Strategy confidence weights. An exact prefix beats a substring or a
/// structured-character alignment, which beat a loose subsequence. Summed
/// per candidate, never averaged or renormalized.
const STARTS_WITH_SCORE: u32 = 4;
const SIGNIFICANT_CHARACTERS_SCORE: u32 = 2;
const CONTAINS_SCORE: u32 = 2;
const INDIVIDUAL_CHARACTERS_SCORE: u32 = 1;

/// Above this many cached plans the cache is evicted wholesale before the
/// next insert, so an adversarial query stream cannot grow it without limit.
const SCAN_PLAN_CACHE_CAP: usize = 256;

/// The closed set of matching strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStrategy {
    StartsWith,
    SignificantCharacters,
    Contains,
    IndividualCharacters,
}

impl MatchStrategy {
    /// Evaluation order used by the filterer. IndividualCharacters is the
    /// most permissive strategy and always runs last.
    pub const EVALUATION_ORDER: [MatchStrategy; 4] = [
        MatchStrategy::StartsWith,
        MatchStrategy::SignificantCharacters,
        MatchStrategy::Contains,
        MatchStrategy::IndividualCharacters,
    ];

    /// Score contributed when this strategy matches.
    pub fn score(self) -> u32 {
        match self {
            MatchStrategy::StartsWith => STARTS_WITH_SCORE,
            MatchStrategy::SignificantCharacters => SIGNIFICANT_CHARACTERS_SCORE,
            MatchStrategy::Contains => CONTAINS_SCORE,
            MatchStrategy::IndividualCharacters => INDIVIDUAL_CHARACTERS_SCORE,
        }
    }

    /// Apply this strategy to one (input, pattern) pair.
    pub fn evaluate(self, input: Option<&str>, pattern: Option<&str>) -> MatchResult {
        let Some(input) = input else {
            return MatchResult::null_input();
        };
        let chars: Vec<char> = input.chars().collect();
        self.evaluate_prepared(input, &chars, pattern)
    }

    /// As `evaluate`, with the input's characters already collected. The
    /// filterer collects each text field once and runs all four strategies
    /// over the same buffer.
    pub(crate) fn evaluate_prepared(
        self,
        input: &str,
        chars: &[char],
        pattern: Option<&str>,
    ) -> MatchResult {
        let Some(pattern) = pattern else {
            return MatchResult::non_match(input);
        };
        if pattern.is_empty() {
            // An empty query keeps every candidate, with nothing highlighted.
            return MatchResult::found(self.score(), vec![StringPart::new(input, false)]);
        }
        let plan = ScanPlan::obtain(pattern);
        match self {
            MatchStrategy::StartsWith => starts_with(input, chars, &plan),
            MatchStrategy::SignificantCharacters => significant_characters(input, chars, &plan),
            MatchStrategy::Contains => contains(input, chars, &plan),
            MatchStrategy::IndividualCharacters => individual_characters(input, chars, &plan),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// SCAN PLANS
// ─────────────────────────────────────────────────────────────────────────────

/// A pattern compiled for scanning: its characters in order.
///
/// Plans are shared through a global cache so repeated keystrokes and the
/// per-candidate fan-out reuse one allocation per pattern. The cache is an
/// optimization only; matchers never write through a plan.
#[derive(Debug)]
pub(crate) struct ScanPlan {
    chars: Box<[char]>,
}

/// Single lock guarding the plan cache. Lookups and inserts can arrive from
/// multiple rayon workers at once.
static SCAN_PLANS: Lazy<Mutex<HashMap<String, Arc<ScanPlan>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

impl ScanPlan {
    pub(crate) fn obtain(pattern: &str) -> Arc<ScanPlan> {
        let mut cache = SCAN_PLANS.lock();
        if let Some(plan) = cache.get(pattern) {
            return Arc::clone(plan);
        }
        if cache.len() >= SCAN_PLAN_CACHE_CAP {
            cache.clear();
        }
        let plan = Arc::new(ScanPlan {
            chars: pattern.chars().collect(),
        });
        cache.insert(pattern.to_owned(), Arc::clone(&plan));
        plan
    }

    fn chars(&self) -> &[char] {
        &self.chars
    }

    #[cfg(test)]
    pub(crate) fn cached_count() -> usize {
        SCAN_PLANS.lock().len()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// STRATEGY ALGORITHMS
// ─────────────────────────────────────────────────────────────────────────────

/// Case-insensitive character comparison with Unicode lowercase folding.
fn chars_eq_ci(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

fn part_of(chars: &[char], is_match: bool) -> StringPart {
    StringPart::new(chars.iter().collect::<String>(), is_match)
}

/// Case-insensitive prefix test. On match: the prefix with original casing,
/// then the remainder (omitted when empty).
fn starts_with(input: &str, chars: &[char], plan: &ScanPlan) -> MatchResult {
    let pattern = plan.chars();
    if pattern.len() > chars.len()
        || !pattern.iter().zip(chars).all(|(&p, &c)| chars_eq_ci(c, p))
    {
        return MatchResult::non_match(input);
    }
    let mut parts = vec![part_of(&chars[..pattern.len()], true)];
    if pattern.len() < chars.len() {
        parts.push(part_of(&chars[pattern.len()..], false));
    }
    MatchResult::found(STARTS_WITH_SCORE, parts)
}

/// First case-insensitive occurrence anywhere in the input. Up to three
/// parts: prefix, matched substring, suffix; empty outer parts are omitted.
fn contains(input: &str, chars: &[char], plan: &ScanPlan) -> MatchResult {
    let pattern = plan.chars();
    if pattern.len() > chars.len() {
        return MatchResult::non_match(input);
    }
    for start in 0..=chars.len() - pattern.len() {
        if pattern
            .iter()
            .zip(&chars[start..])
            .all(|(&p, &c)| chars_eq_ci(c, p))
        {
            let end = start + pattern.len();
            let mut parts = Vec::with_capacity(3);
            if start > 0 {
                parts.push(part_of(&chars[..start], false));
            }
            parts.push(part_of(&chars[start..end], true));
            if end < chars.len() {
                parts.push(part_of(&chars[end..], false));
            }
            return MatchResult::found(CONTAINS_SCORE, parts);
        }
    }
    MatchResult::non_match(input)
}

/// A position is significant when it starts the input, holds an uppercase
/// letter, or follows a non-alphanumeric character (a word start).
fn is_significant(chars: &[char], k: usize) -> bool {
    k == 0 || chars[k].is_uppercase() || !chars[k - 1].is_alphanumeric()
}

/// Aligns each pattern character, in order, with a significant position of
/// the input, or with the character directly after the previous alignment.
/// The leading prefix is unrestricted; later fillers may not skip an
/// uppercase letter. Single forward pass, first anchor wins.
///
/// "TaskS" aligns along "TaskSwitcher"; "TS" aligns with the word heads of
/// "Task Switcher"; "tw" fails on "TaskSwitcher" because the significant
/// `S` cannot be skipped.
fn significant_characters(input: &str, chars: &[char], plan: &ScanPlan) -> MatchResult {
    let pattern = plan.chars();
    let mut anchors: Vec<usize> = Vec::with_capacity(pattern.len());
    let mut pos = 0usize;

    for (idx, &p) in pattern.iter().enumerate() {
        let run_start = pos;
        let anchor = loop {
            if pos >= chars.len() {
                break None;
            }
            let c = chars[pos];
            let continues_run = idx > 0 && pos == run_start;
            if chars_eq_ci(c, p) && (continues_run || is_significant(chars, pos)) {
                break Some(pos);
            }
            if idx > 0 && c.is_uppercase() {
                break None;
            }
            pos += 1;
        };
        match anchor {
            Some(at) => {
                anchors.push(at);
                pos = at + 1;
            }
            None => return MatchResult::non_match(input),
        }
    }

    // Strict alternating structure. Prefix, fillers, and suffix are kept
    // even when empty, so consumers see the true positions.
    let mut parts = Vec::with_capacity(pattern.len() * 2 + 1);
    parts.push(part_of(&chars[..anchors[0]], false));
    for (i, &at) in anchors.iter().enumerate() {
        if i > 0 {
            parts.push(part_of(&chars[anchors[i - 1] + 1..at], false));
        }
        parts.push(part_of(&chars[at..at + 1], true));
    }
    parts.push(part_of(&chars[anchors[anchors.len() - 1] + 1..], false));
    MatchResult::found(SIGNIFICANT_CHARACTERS_SCORE, parts)
}

/// Pure ordered-subsequence test: each pattern character at its nearest
/// following case-insensitive occurrence. The most permissive strategy.
fn individual_characters(input: &str, chars: &[char], plan: &ScanPlan) -> MatchResult {
    let pattern = plan.chars();
    let mut anchors: Vec<usize> = Vec::with_capacity(pattern.len());
    let mut pos = 0usize;

    for &p in pattern {
        let mut k = pos;
        while k < chars.len() && !chars_eq_ci(chars[k], p) {
            k += 1;
        }
        if k == chars.len() {
            return MatchResult::non_match(input);
        }
        anchors.push(k);
        pos = k + 1;
    }

    let mut parts = Vec::with_capacity(pattern.len() * 2 + 1);
    let mut prev_end = 0usize;
    for &at in &anchors {
        if at > prev_end {
            parts.push(part_of(&chars[prev_end..at], false));
        }
        parts.push(part_of(&chars[at..at + 1], true));
        prev_end = at + 1;
    }
    if prev_end < chars.len() {
        parts.push(part_of(&chars[prev_end..], false));
    }
    MatchResult::found(INDIVIDUAL_CHARACTERS_SCORE, parts)
}
