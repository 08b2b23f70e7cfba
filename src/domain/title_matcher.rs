/// What to do when no candidate shares a single character with the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchPolicy {
    /// Fall back to the first candidate, as the portal matcher always has.
    #[default]
    FirstOnNoOverlap,
    /// Report no match at all.
    Strict,
}

/// Number of character positions in `query` whose character occurs anywhere in `candidate`.
///
/// Repeated characters in the query count once per occurrence.
pub fn overlap_score(query: &str, candidate: &str) -> usize {
    query.chars().filter(|c| candidate.contains(*c)).count()
}

/// Index of the candidate with the highest overlap score.
///
/// Ties keep the earliest index. When nothing overlaps, or `candidates` is
/// empty, the result is `0`; callers must check for emptiness before indexing.
pub fn find_closest_title<S: AsRef<str>>(query: &str, candidates: &[S]) -> usize {
    closest(query, candidates).0
}

/// Like [`find_closest_title`] but returns `None` for an empty slice, and for
/// a zero best score under [`MatchPolicy::Strict`].
pub fn best_match_index<S: AsRef<str>>(
    query: &str,
    candidates: &[S],
    policy: MatchPolicy,
) -> Option<usize> {
    if candidates.is_empty() {
        return None;
    }

    match closest(query, candidates) {
        (_, 0) if policy == MatchPolicy::Strict => None,
        (index, _) => Some(index),
    }
}

fn closest<S: AsRef<str>>(query: &str, candidates: &[S]) -> (usize, usize) {
    let mut best_index = 0;
    let mut max_score = 0;

    for (i, candidate) in candidates.iter().enumerate() {
        let score = overlap_score(query, candidate.as_ref());
        if score > max_score {
            max_score = score;
            best_index = i;
        }
    }

    (best_index, max_score)
}

#[cfg(test)]
mod tests {
    use super::{best_match_index, find_closest_title, overlap_score, MatchPolicy};

    #[test]
    fn picks_candidate_containing_query_chars() {
        let candidates = ["dog", "cats are great", "bird"];
        assert_eq!(find_closest_title("cat", &candidates), 1);
    }

    #[test]
    fn no_overlap_falls_back_to_first() {
        let candidates = ["abc", "def"];
        assert_eq!(find_closest_title("xyz", &candidates), 0);
    }

    #[test]
    fn empty_candidates_yield_zero() {
        let candidates: [&str; 0] = [];
        assert_eq!(find_closest_title("anything", &candidates), 0);
    }

    #[test]
    fn unique_maximum_wins_in_any_position() {
        let candidates = ["a", "b", "c", "abc"];
        assert_eq!(find_closest_title("abc", &candidates), 3);

        let candidates = ["abc", "a", "b", "c"];
        assert_eq!(find_closest_title("abc", &candidates), 0);
    }

    #[test]
    fn ties_keep_the_lower_index() {
        let candidates = ["q", "ab", "ba", "ab"];
        assert_eq!(find_closest_title("ab", &candidates), 1);
    }

    #[test]
    fn repeated_query_chars_count_per_occurrence() {
        assert_eq!(overlap_score("aaab", "a"), 3);
        assert_eq!(overlap_score("aaab", "b"), 1);

        // "a" wins on the repeated letter even though "bc" matches more distinct chars
        let candidates = ["bc", "a"];
        assert_eq!(find_closest_title("aaabc", &candidates), 1);
    }

    #[test]
    fn scores_non_ascii_characters() {
        let candidates = ["机器学习综述", "深度学习在图像识别中的应用", "自然语言处理"];
        assert_eq!(find_closest_title("深度学习图像", &candidates), 1);
        assert_eq!(overlap_score("深度学习", "学习"), 2);
    }

    #[test]
    fn scoring_is_case_sensitive() {
        assert_eq!(overlap_score("ABC", "abc"), 0);
    }

    #[test]
    fn result_is_always_in_bounds() {
        let queries = ["", "x", "hello world", "数据"];
        let sets: [&[&str]; 4] = [&["a"], &["", ""], &["hello", "world", "wor"], &["数", "据", "数据库"]];

        for query in queries {
            for set in sets {
                assert!(find_closest_title(query, set) < set.len());
            }
        }
    }

    #[test]
    fn repeated_calls_agree() {
        let candidates = vec!["graph neural networks".to_string(), "networks".to_string()];
        let first = find_closest_title("neural", &candidates);
        let second = find_closest_title("neural", &candidates);
        assert_eq!(first, second);
    }

    #[test]
    fn best_match_index_handles_empty() {
        let candidates: Vec<String> = vec![];
        assert_eq!(
            best_match_index("cat", &candidates, MatchPolicy::FirstOnNoOverlap),
            None
        );
        assert_eq!(best_match_index("cat", &candidates, MatchPolicy::Strict), None);
    }

    #[test]
    fn strict_policy_rejects_zero_overlap() {
        let candidates = ["abc", "def"];
        assert_eq!(
            best_match_index("xyz", &candidates, MatchPolicy::FirstOnNoOverlap),
            Some(0)
        );
        assert_eq!(best_match_index("xyz", &candidates, MatchPolicy::Strict), None);
        assert_eq!(best_match_index("e", &candidates, MatchPolicy::Strict), Some(1));
    }
}
