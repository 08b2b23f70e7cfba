pub mod match_result;
pub mod search_query;
pub mod title_matcher;

pub use match_result::*;
pub use search_query::*;
pub use title_matcher::*;
