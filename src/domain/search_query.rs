/// A caller-supplied paper title. Guaranteed not to be blank.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery(String);

impl SearchQuery {
    /// Keeps the raw text as given; only the emptiness check looks past surrounding whitespace.
    pub fn parse(s: String) -> Result<SearchQuery, String> {
        match s.trim().is_empty() {
            true => Err("query must not be empty".to_string()),
            false => Ok(SearchQuery(s)),
        }
    }
}

impl AsRef<str> for SearchQuery {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
