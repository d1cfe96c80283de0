//! Field-based lookup over the flattened publication table.

use std::str::FromStr;

use lattes_common::table::normalize_year_text;
use lattes_common::{columns, Row, Table};
use lattes_ingestion::RecordStore;
use serde::Serialize;
use tracing::debug;

/// Searchable publication fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SearchField {
    Title,
    Issn,
    Doi,
    Year,
}

impl SearchField {
    /// Candidate columns, in lookup order.
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            SearchField::Title => &[columns::ARTICLE_TITLE, columns::TITLE],
            SearchField::Issn  => &[columns::ISSN],
            SearchField::Doi   => &[columns::DOI],
            SearchField::Year  => &[columns::YEAR],
        }
    }
}

impl FromStr for SearchField {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "title" => Ok(SearchField::Title),
            "issn"  => Ok(SearchField::Issn),
            "doi"   => Ok(SearchField::Doi),
            "year"  => Ok(SearchField::Year),
            _       => Err(()),
        }
    }
}

/// Drop hyphens and spaces, then case-fold. Used for ISSN and DOI.
fn compact_identifier(s: &str) -> String {
    s.chars()
        .filter(|c| *c != '-' && *c != ' ')
        .flat_map(char::to_lowercase)
        .collect()
}

/// All publications of a store, flattened once.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    articles: Table,
}

impl SearchIndex {
    pub fn build(store: &RecordStore) -> Self {
        let articles = store.all_publications();
        debug!(rows = articles.len(), "Built publication search index");
        Self { articles }
    }

    pub fn from_table(articles: Table) -> Self {
        Self { articles }
    }

    /// Every indexed publication, unfiltered.
    pub fn all(&self) -> &Table {
        &self.articles
    }

    /// Search one field.
    ///
    /// `None` means there was nothing to search: blank query, empty index,
    /// unknown field, or the field's column is absent. A search that ran and
    /// matched nothing returns an empty table.
    pub fn search_by_criteria(&self, query: &str, field: &str) -> Option<Table> {
        let query = query.trim().to_lowercase();
        if query.is_empty() || self.articles.is_empty() {
            return None;
        }
        let field: SearchField = field.parse().ok()?;
        let column = field
            .columns()
            .iter()
            .copied()
            .find(|c| self.articles.has_column(c))?;

        let compact_query = compact_identifier(&query);
        let year_query = normalize_year_text(&query);
        let results = self.articles.filtered(|row: &Row| {
            let cell = row.get(column);
            match field {
                SearchField::Title => cell.to_display_string().to_lowercase().contains(&query),
                SearchField::Issn | SearchField::Doi => {
                    compact_identifier(&cell.to_display_string()) == compact_query
                }
                SearchField::Year => cell.normalized_year().as_deref() == Some(year_query.as_str()),
            }
        });
        debug!(?field, query = %query, hits = results.len(), "Publication search");
        Some(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lattes_common::{EntityType, Value};
    use lattes_test_utils::{table, ResearcherBuilder};
    use pretty_assertions::assert_eq;

    fn index() -> SearchIndex {
        let mut store = RecordStore::new();
        ResearcherBuilder::new("r1")
            .table(
                EntityType::PublishedArticles,
                table(
                    &["TITULO-DO-ARTIGO", "ANO", "ISSN", "DOI"],
                    &[
                        &["Social Network Analysis", "2020", "0378-8733", "10.1016/J.SOCNET.2020.01"],
                        &["Graph Theory, Revisited", "2019 ", "1932-6203", ""],
                        &["Deep nets", "2020.0", "", "10.1000/xyz"],
                    ],
                ),
            )
            .add_to(&mut store);
        SearchIndex::build(&store)
    }

    fn titles(t: &Table) -> Vec<String> {
        t.column_values("TITULO-DO-ARTIGO").map(Value::to_display_string).collect()
    }

    #[test]
    fn test_empty_query_is_none() {
        assert!(index().search_by_criteria("", "title").is_none());
        assert!(index().search_by_criteria("   ", "title").is_none());
    }

    #[test]
    fn test_title_substring_is_case_insensitive() {
        let hits = index().search_by_criteria("network", "title").unwrap();
        assert_eq!(titles(&hits), vec!["Social Network Analysis"]);
        let hits = index().search_by_criteria("NETS", "title").unwrap();
        assert_eq!(titles(&hits), vec!["Deep nets"]);
    }

    #[test]
    fn test_title_keeps_punctuation() {
        assert_eq!(index().search_by_criteria("theory, re", "title").unwrap().len(), 1);
        assert_eq!(index().search_by_criteria("theory re", "title").unwrap().len(), 0);
    }

    #[test]
    fn test_identifier_search_ignores_hyphens_and_spaces() {
        let hits = index().search_by_criteria("03788733", "issn").unwrap();
        assert_eq!(titles(&hits), vec!["Social Network Analysis"]);
        let hits = index().search_by_criteria("1932 6203", "issn").unwrap();
        assert_eq!(hits.len(), 1);
        let hits = index().search_by_criteria("10.1016/j.socnet.2020.01", "doi").unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_year_search_trims_and_normalises() {
        let hits = index().search_by_criteria("2020", "year").unwrap();
        assert_eq!(titles(&hits), vec!["Social Network Analysis", "Deep nets"]);
        assert_eq!(index().search_by_criteria(" 2019", "year").unwrap().len(), 1);
    }

    #[test]
    fn test_year_query_with_zero_fraction_matches() {
        let idx = SearchIndex::from_table(table(&["TITULO-DO-ARTIGO", "ANO"], &[&["A", "2020.0"], &["B", "2020"]]));
        assert_eq!(idx.search_by_criteria("2020.0", "year").unwrap().len(), 2);
        assert_eq!(idx.search_by_criteria(" 2020.0 ", "year").unwrap().len(), 2);
        assert_eq!(idx.search_by_criteria("2020.5", "year").unwrap().len(), 0);
    }

    #[test]
    fn test_unknown_field_is_none() {
        assert!(index().search_by_criteria("x", "abstract").is_none());
    }

    #[test]
    fn test_missing_column_is_none() {
        let idx = SearchIndex::from_table(table(&["TITULO-DO-ARTIGO"], &[&["A"]]));
        assert!(idx.search_by_criteria("123", "doi").is_none());
    }

    #[test]
    fn test_empty_index_is_none() {
        let idx = SearchIndex::build(&RecordStore::new());
        assert!(idx.search_by_criteria("x", "title").is_none());
    }

    #[test]
    fn test_no_hits_is_empty_table() {
        let hits = index().search_by_criteria("quantum", "title").unwrap();
        assert!(hits.is_empty());
        assert!(hits.has_column("CURRICULO_ID"));
    }
}
