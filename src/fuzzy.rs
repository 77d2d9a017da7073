//! "Did you mean" suggestions for dictionary lookup misses.

use rapidfuzz::fuzz;

/// Rank candidates by similarity to the query and return the best `limit`.
///
/// Scores are rapidfuzz ratios over lowercased strings, descending; the
/// stable sort breaks ties by candidate order.
pub fn closest_matches(query: &str, candidates: &[String], limit: usize) -> Vec<String> {
    let needle = query.trim().to_lowercase();

    let mut scored: Vec<(f64, &String)> = candidates
        .iter()
        .map(|candidate| {
            let lowered = candidate.to_lowercase();
            let score = fuzz::ratio(needle.chars(), lowered.chars());
            (score, candidate)
        })
        .collect();

    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

    scored
        .into_iter()
        .take(limit)
        .map(|(_, candidate)| candidate.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn exact_match_ranks_first() {
        let candidates = words(&["Rock", "Mine", "Sediment"]);
        let matches = closest_matches("rock", &candidates, 3);
        assert_eq!(matches[0], "Rock");
    }

    #[test]
    fn close_misspelling_ranks_first() {
        let candidates = words(&["Mining", "Rock", "Sediment", "Mineral"]);
        let matches = closest_matches("minng", &candidates, 3);
        assert_eq!(matches[0], "Mining");
    }

    #[test]
    fn limit_caps_result_length() {
        let candidates = words(&["A", "B", "C", "D", "E"]);
        assert_eq!(closest_matches("a", &candidates, 3).len(), 3);
    }

    #[test]
    fn empty_candidates_give_empty_result() {
        assert!(closest_matches("anything", &[], 3).is_empty());
    }

    #[test]
    fn ties_keep_candidate_order() {
        let candidates = words(&["abx", "aby"]);
        let matches = closest_matches("ab", &candidates, 2);
        assert_eq!(matches, vec!["abx".to_string(), "aby".to_string()]);
    }
}
