use serde::Serialize;

pub const MATCHED_MESSAGE: &str = "matched successfully.";
pub const NOT_FOUND_MESSAGE: &str = "not found.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub query: String,
    pub best_match: String,
    pub total_results: usize,
    pub message: String,
}

impl MatchResult {
    pub fn new(query: &str, best_match: String, total_results: usize) -> Self {
        let message = match best_match.is_empty() {
            true => NOT_FOUND_MESSAGE,
            false => MATCHED_MESSAGE,
        };

        MatchResult {
            query: query.to_string(),
            best_match,
            total_results,
            message: message.to_string(),
        }
    }

    pub fn not_found(query: &str) -> Self {
        MatchResult::new(query, String::new(), 0)
    }
}
