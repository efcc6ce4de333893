use serde::Serialize;

/// The outcome of a name search.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct SearchResults<T> {
    pub count: usize,
    pub data: Vec<T>,
}

impl<T> SearchResults<T> {
    pub fn new(data: Vec<T>) -> Self {
        SearchResults {
            count: data.len(),
            data,
        }
    }
}

/// Case-insensitive, unanchored substring match. An empty term
/// matches every name.
pub fn name_matches(name: &str, term: &str) -> bool {
    name.to_lowercase().contains(&term.to_lowercase())
}

/// Builds an `ILIKE` pattern matching `term` anywhere, with the
/// pattern metacharacters in `term` escaped.
pub fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');

    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }

    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::{like_pattern, name_matches, SearchResults};

    const NAMES: &[&str] = &["The Musical Hop", "Park Square Live Music & Coffee"];

    fn search(term: &str) -> Vec<&'static str> {
        NAMES.iter().copied().filter(|name| name_matches(name, term)).collect()
    }

    #[test]
    fn matching_ignores_case() {
        assert_eq!(search("hop"), vec!["The Musical Hop"]);
        assert_eq!(search("music"), NAMES.to_vec());
        assert_eq!(search("MUSIC"), NAMES.to_vec());
        assert!(search("jazz").is_empty());
    }

    #[test]
    fn empty_term_matches_everything() {
        assert_eq!(search(""), NAMES.to_vec());
    }

    #[test]
    fn count_follows_results() {
        let results = SearchResults::new(search("a"));

        assert_eq!(results.count, 2);
        assert_eq!(results.count, results.data.len());
    }

    #[test]
    fn like_metacharacters_are_escaped() {
        assert_eq!(like_pattern("hop"), "%hop%");
        assert_eq!(like_pattern(""), "%%");
        assert_eq!(like_pattern("100%_a\\b"), "%100\\%\\_a\\\\b%");
    }
}
