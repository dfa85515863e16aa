//! Free-text filtering for list endpoints

use serde::Deserialize;

/// `?q=` query parameter
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

impl SearchQuery {
    /// Lower-cased, trimmed term; `None` when absent or blank
    pub fn term(&self) -> Option<String> {
        self.q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase)
    }
}

/// True when any field contains `term` (already lower-cased)
pub fn matches(term: &str, fields: &[&str]) -> bool {
    fields.iter().any(|f| f.to_lowercase().contains(term))
}

/// Keep the items whose fields match, or all items without a term
pub fn filter<T, F>(items: Vec<T>, query: &SearchQuery, fields: F) -> Vec<T>
where
    F: Fn(&T) -> Vec<String>,
{
    match query.term() {
        Some(term) => items
            .into_iter()
            .filter(|item| {
                let values = fields(item);
                let refs: Vec<&str> = values.iter().map(String::as_str).collect();
                matches(&term, &refs)
            })
            .collect(),
        None => items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(q: &str) -> SearchQuery {
        SearchQuery { q: Some(q.to_string()) }
    }

    #[test]
    fn test_blank_query_has_no_term() {
        assert_eq!(SearchQuery::default().term(), None);
        assert_eq!(query("   ").term(), None);
        assert_eq!(query(" Mona ").term(), Some("mona".to_string()));
    }

    #[test]
    fn test_matches_is_case_insensitive() {
        assert!(matches("mona", &["The Mona Lisa", "oil"]));
        assert!(matches("oil", &["The Mona Lisa", "Oil on poplar"]));
        assert!(!matches("bronze", &["The Mona Lisa", "oil"]));
    }

    #[test]
    fn test_filter_keeps_everything_without_term() {
        let items = vec!["Louvre", "Prado"];
        let all = filter(items.clone(), &SearchQuery::default(), |s| vec![s.to_string()]);
        assert_eq!(all, items);

        let some = filter(items, &query("pra"), |s| vec![s.to_string()]);
        assert_eq!(some, vec!["Prado"]);
    }

    #[test]
    fn test_filter_matches_numeric_ids_as_text() {
        let items = vec![(12_i64, "Vase"), (7, "Helmet")];
        let found = filter(items, &query("12"), |(id, name)| vec![id.to_string(), name.to_string()]);
        assert_eq!(found, vec![(12, "Vase")]);
    }
}
