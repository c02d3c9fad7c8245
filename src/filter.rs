//! Filterer/Ranker: runs every strategy against every candidate and
//! produces the stable, descending-by-score result list.
//!
//! Per-candidate evaluation is read-only and independent, so large window
//! lists fan out over the rayon pool. The input rank travels with each
//! candidate through the parallel stage and breaks score ties, so both
//! evaluation paths produce byte-identical orderings.

use rayon::prelude::*;

use crate::interface::{Candidate, FilterResult, MatchResult};
use crate::matching::MatchStrategy;
use crate::query::Query;

/// Candidate counts below this evaluate sequentially; at or above it the
/// per-candidate scoring fans out over the rayon pool.
pub const PARALLEL_FILTER_THRESHOLD: usize = 30;

/// Parse `raw_query` against `foreground_group` and rank `candidates`.
///
/// The single call a UI layer makes per keystroke.
pub fn filter_query<T>(
    candidates: Vec<T>,
    raw_query: &str,
    foreground_group: &str,
) -> Vec<FilterResult<T>>
where
    T: Candidate + Send,
{
    let query = Query::parse(raw_query, foreground_group);
    filter_candidates(
        candidates,
        Some(query.text_filter.as_str()),
        query.group_filter.as_deref(),
    )
}

/// Rank `candidates` against an already-split text filter and optional
/// group filter. Null filters fall back to the matchers' null-pattern
/// behavior; the call never fails.
pub fn filter_candidates<T>(
    candidates: Vec<T>,
    text_filter: Option<&str>,
    group_filter: Option<&str>,
) -> Vec<FilterResult<T>>
where
    T: Candidate + Send,
{
    let parallel = candidates.len() >= PARALLEL_FILTER_THRESHOLD;
    filter_candidates_with(candidates, text_filter, group_filter, parallel)
}

pub(crate) fn filter_candidates_with<T>(
    candidates: Vec<T>,
    text_filter: Option<&str>,
    group_filter: Option<&str>,
    parallel: bool,
) -> Vec<FilterResult<T>>
where
    T: Candidate + Send,
{
    #[cfg(feature = "perf-log")]
    let t0 = std::time::Instant::now();
    #[cfg(feature = "perf-log")]
    let candidate_count = candidates.len();

    let mut ranked: Vec<(usize, FilterResult<T>)> = if parallel {
        candidates
            .into_par_iter()
            .enumerate()
            .filter_map(|(rank, candidate)| {
                evaluate_candidate(candidate, text_filter, group_filter).map(|r| (rank, r))
            })
            .collect()
    } else {
        candidates
            .into_iter()
            .enumerate()
            .filter_map(|(rank, candidate)| {
                evaluate_candidate(candidate, text_filter, group_filter).map(|r| (rank, r))
            })
            .collect()
    };

    // Descending by aggregate score; the input rank breaks ties so repeated
    // passes and both evaluation paths agree exactly.
    ranked.sort_unstable_by(|a, b| b.1.score.cmp(&a.1.score).then_with(|| a.0.cmp(&b.0)));

    #[cfg(feature = "perf-log")]
    eprintln!(
        "[perf] filter candidates={} matched={} parallel={} elapsed={:.1}ms",
        candidate_count,
        ranked.len(),
        parallel,
        t0.elapsed().as_secs_f64() * 1000.0,
    );

    ranked.into_iter().map(|(_, result)| result).collect()
}

/// Score one candidate. Returns `None` when the inclusion rule rejects it.
fn evaluate_candidate<T: Candidate>(
    candidate: T,
    text_filter: Option<&str>,
    group_filter: Option<&str>,
) -> Option<FilterResult<T>> {
    let title_matches = evaluate_field(candidate.title(), text_filter);
    // With no explicit group scope the group label is still searched,
    // against the text filter itself.
    let group_matches = evaluate_field(candidate.group_label(), group_filter.or(text_filter));

    let title_matched = title_matches.iter().any(|m| m.matched);
    let group_matched = group_matches.iter().any(|m| m.matched);
    let include = match group_filter {
        None => title_matched || group_matched,
        Some(_) => title_matched && group_matched,
    };
    if !include {
        return None;
    }

    let score = title_matches
        .iter()
        .chain(&group_matches)
        .map(|m| m.score)
        .sum();
    Some(FilterResult {
        candidate,
        score,
        title_matches,
        group_matches,
    })
}

/// Run all four strategies, in order, over one text field.
fn evaluate_field(input: &str, pattern: Option<&str>) -> Vec<MatchResult> {
    let chars: Vec<char> = input.chars().collect();
    MatchStrategy::EVALUATION_ORDER
        .iter()
        .map(|strategy| strategy.evaluate_prepared(input, &chars, pattern))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::CandidateItem;

    fn window(title: &str, group: &str) -> CandidateItem {
        CandidateItem::new(title, group)
    }

    fn titles<T: Candidate>(results: &[FilterResult<T>]) -> Vec<&str> {
        results.iter().map(|r| r.candidate.title()).collect()
    }

    // ── inclusion rule ───────────────────────────────────────────

    #[test]
    fn test_title_hit_includes_without_group_filter() {
        let results = filter_candidates(
            vec![window("Google Chrome", "chrome"), window("Inbox", "mail")],
            Some("goog"),
            None,
        );
        assert_eq!(titles(&results), vec!["Google Chrome"]);
    }

    #[test]
    fn test_group_hit_alone_includes_without_group_filter() {
        // The title has none of the query's characters, but the group label
        // is searched with the text filter too.
        let results = filter_candidates(
            vec![window("New Tab", "chrome"), window("Inbox", "mail")],
            Some("chrome"),
            None,
        );
        assert_eq!(titles(&results), vec!["New Tab"]);
        let result = &results[0];
        assert!(!result.title_matches.iter().any(|m| m.matched));
        assert!(result.group_matches.iter().any(|m| m.matched));
    }

    #[test]
    fn test_explicit_group_requires_both_fields() {
        let candidates = vec![
            window("Tab list", "explorer"),  // title hits, group does not
            window("New Tab", "chrome"),     // both hit
            window("Downloads", "chrome"),   // group hits, title does not
        ];
        let results = filter_candidates(candidates, Some("tab"), Some("chr"));
        assert_eq!(titles(&results), vec!["New Tab"]);
    }

    #[test]
    fn test_empty_candidate_list() {
        let results = filter_candidates(Vec::<CandidateItem>::new(), Some("tab"), None);
        assert!(results.is_empty());
    }

    #[test]
    fn test_null_text_filter_yields_no_results_without_group() {
        let results = filter_candidates(
            vec![window("Google Chrome", "chrome")],
            None,
            None,
        );
        assert!(results.is_empty());
    }

    #[test]
    fn test_empty_text_filter_keeps_everything_in_input_order() {
        let candidates = vec![
            window("Alpha", "a"),
            window("Beta", "b"),
            window("Gamma", "c"),
        ];
        let results = filter_candidates(candidates, Some(""), None);
        assert_eq!(titles(&results), vec!["Alpha", "Beta", "Gamma"]);
    }

    // ── aggregate score and ranking ──────────────────────────────

    #[test]
    fn test_prefix_match_outranks_loose_matches() {
        // "chrome" as a title prefix collects every strategy's score, while
        // a mid-title occurrence collects only the loose ones.
        let candidates = vec![
            window("view chrome notes", "editor"),
            window("chrome downloads", "files"),
        ];
        let results = filter_candidates(candidates, Some("chrome"), None);
        assert_eq!(
            titles(&results),
            vec!["chrome downloads", "view chrome notes"]
        );
        assert!(results[0].score > results[1].score);
    }

    #[test]
    fn test_score_sums_both_fields() {
        let results = filter_candidates(
            vec![window("chrome", "chrome")],
            Some("chrome"),
            None,
        );
        // StartsWith + SignificantCharacters + Contains + Individual on
        // both title and group label.
        assert_eq!(results[0].score, 2 * (4 + 2 + 2 + 1));
    }

    #[test]
    fn test_strategy_scores_are_fixed() {
        assert_eq!(MatchStrategy::StartsWith.score(), 4);
        assert_eq!(MatchStrategy::SignificantCharacters.score(), 2);
        assert_eq!(MatchStrategy::Contains.score(), 2);
        assert_eq!(MatchStrategy::IndividualCharacters.score(), 1);
        // A prefix hit alone outweighs a substring plus a subsequence hit.
        assert!(
            MatchStrategy::StartsWith.score()
                > MatchStrategy::Contains.score() + MatchStrategy::IndividualCharacters.score()
        );
    }

    #[test]
    fn test_starts_with_outranks_contains_plus_individual() {
        let candidates = vec![
            window("xtab", "g1"),     // Contains + IndividualCharacters only
            window("tab stop", "g2"), // prefix hit collects every strategy
        ];
        let results = filter_candidates(candidates, Some("tab"), None);
        assert_eq!(titles(&results), vec!["tab stop", "xtab"]);
        assert_eq!(results[1].score, 3);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let candidates: Vec<CandidateItem> = (0..8)
            .map(|i| window(&format!("chrome window {i}"), "chrome"))
            .collect();
        let results = filter_candidates(candidates, Some("chrome"), None);
        let expected: Vec<String> = (0..8).map(|i| format!("chrome window {i}")).collect();
        assert_eq!(titles(&results), expected);
    }

    // ── evaluation paths ─────────────────────────────────────────

    #[test]
    fn test_parallel_and_sequential_paths_agree() {
        let candidates: Vec<CandidateItem> = (0..64)
            .map(|i| match i % 3 {
                0 => window(&format!("Google Chrome {i}"), "chrome"),
                1 => window(&format!("Untitled {i} - Notepad"), "notepad"),
                _ => window(&format!("build.rs - Code {i}"), "code"),
            })
            .collect();

        let sequential =
            filter_candidates_with(candidates.clone(), Some("chrome"), None, false);
        let parallel = filter_candidates_with(candidates, Some("chrome"), None, true);
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_repeated_runs_are_deterministic() {
        let candidates: Vec<CandidateItem> = (0..40)
            .map(|i| window(&format!("Tab {}", i % 5), "chrome"))
            .collect();
        let first = filter_candidates(candidates.clone(), Some("tab"), None);
        for _ in 0..5 {
            let again = filter_candidates(candidates.clone(), Some("tab"), None);
            assert_eq!(again, first);
        }
    }

    #[test]
    fn test_result_carries_all_four_strategies_per_field() {
        let results = filter_candidates(
            vec![window("Google Chrome", "chrome")],
            Some("chrome"),
            None,
        );
        assert_eq!(results[0].title_matches.len(), 4);
        assert_eq!(results[0].group_matches.len(), 4);
    }

    // ── query orchestration ──────────────────────────────────────

    #[test]
    fn test_filter_query_scopes_to_group() {
        let candidates = vec![
            window("New Tab", "chrome"),
            window("Tab list", "explorer"),
        ];
        let results = filter_query(candidates, "chrome.tab", "explorer");
        assert_eq!(titles(&results), vec!["New Tab"]);
    }

    #[test]
    fn test_filter_query_leading_dot_uses_foreground_group() {
        let candidates = vec![
            window("New Tab", "chrome"),
            window("Tab list", "explorer"),
        ];
        let results = filter_query(candidates, ".tab", "explorer");
        assert_eq!(titles(&results), vec!["Tab list"]);
    }
}
