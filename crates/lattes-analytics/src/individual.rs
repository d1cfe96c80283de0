//! Per-researcher profile.

use std::collections::BTreeMap;

use lattes_common::{columns, EntityType, Table};
use lattes_ingestion::{RecordStore, ResearcherRecord};
use serde::Serialize;
use tracing::debug;

use crate::aggregate::{
    column_counts, distinct_texts, kind_label, numeric_years, production_years, AggregationEngine, TOP_N,
};
use crate::degrees::degree_label;
use crate::stats::{mean, Ranked};

const HOME_COUNTRIES: [&str; 2] = ["BRASIL", "BRAZIL"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormationSummary {
    pub highest_degree: String,
    pub count: usize,
    pub institutions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResearcherProduction {
    /// Items per production kind.
    pub counts: BTreeMap<String, usize>,
    pub recent_articles: usize,
    pub top_venues: Vec<Ranked>,
    /// Over articles that carry the metric.
    pub mean_sjr: Option<f64>,
    pub mean_h_index: Option<f64>,
    pub top_publishers: Vec<Ranked>,
    /// Event papers held outside Brazil.
    pub international_events: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemporalProfile {
    pub per_year: BTreeMap<i32, usize>,
    pub first_year: Option<i32>,
    pub last_year: Option<i32>,
    /// Articles per year of the active span.
    pub articles_per_year: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResearcherProfile {
    pub id: String,
    pub name: Option<String>,
    pub institution: Option<String>,
    /// `None` when the curriculum has no formation table.
    pub formation: Option<FormationSummary>,
    pub production: ResearcherProduction,
    pub temporal: TemporalProfile,
    pub collaboration_index: Option<f64>,
    pub awards: usize,
    pub projects: usize,
}

impl AggregationEngine {
    /// Profile of one researcher, or `None` for an unknown ID.
    pub fn analyze_researcher(&self, store: &RecordStore, id: &str) -> Option<ResearcherProfile> {
        let record = store.researcher(id)?;
        debug!(researcher = id, "Analysing researcher");

        let general = record.table(&EntityType::GeneralData);
        let first_text = |column: &str| {
            general
                .and_then(|t| t.rows().first())
                .and_then(|r| r.text(column))
                .map(str::to_string)
        };

        let formation = record
            .table(&EntityType::AcademicFormation)
            .map(|t| FormationSummary {
                highest_degree: degree_label(Some(t)).to_string(),
                count: t.len(),
                institutions: distinct_texts(t, columns::INSTITUTION),
            });

        let collaboration_index = self
            .author_counts(record)
            .filter(|(articles, _)| *articles > 0)
            .map(|(articles, mentions)| mentions as f64 / articles as f64);

        Some(ResearcherProfile {
            id: record.id().to_string(),
            name: first_text(columns::FULL_NAME),
            institution: first_text(columns::INSTITUTION),
            formation,
            production: self.researcher_production(record),
            temporal: temporal_profile(record),
            collaboration_index,
            awards: record.count(&EntityType::Awards),
            projects: record.count(&EntityType::ResearchProjects),
        })
    }

    fn researcher_production(&self, record: &ResearcherRecord) -> ResearcherProduction {
        let counts = EntityType::production_kinds()
            .iter()
            .map(|k| (kind_label(k).to_string(), record.count(k)))
            .collect();

        let articles = record.table(&EntityType::PublishedArticles);
        let cutoff = self.recent_cutoff();
        let metric_mean = |column: &str| {
            let values: Vec<f64> = articles
                .into_iter()
                .flat_map(Table::iter)
                .filter_map(|r| r.get(column).as_f64())
                .collect();
            mean(&values)
        };

        let top_publishers = record
            .table(&EntityType::PublishedBooks)
            .map(|t| column_counts(t, columns::PUBLISHER).most_common(TOP_N))
            .unwrap_or_default();

        let international_events = record
            .table(&EntityType::EventPapers)
            .map(|t| {
                t.iter()
                    .filter_map(|r| r.text(columns::COUNTRY))
                    .filter(|c| !HOME_COUNTRIES.contains(&c.to_uppercase().as_str()))
                    .count()
            })
            .unwrap_or(0);

        ResearcherProduction {
            counts,
            recent_articles: articles.map_or(0, |t| numeric_years(t).filter(|y| *y >= cutoff).count()),
            top_venues: articles
                .map(|t| column_counts(t, columns::JOURNAL).most_common(TOP_N))
                .unwrap_or_default(),
            mean_sjr: metric_mean(columns::ENRICHED_SJR),
            mean_h_index: metric_mean(columns::ENRICHED_H_INDEX),
            top_publishers,
            international_events,
        }
    }
}

fn temporal_profile(record: &ResearcherRecord) -> TemporalProfile {
    let per_year = production_years(record);
    let first_year = per_year.keys().next().copied();
    let last_year = per_year.keys().next_back().copied();
    let articles = record.count(&EntityType::PublishedArticles);
    let articles_per_year = match (first_year, last_year) {
        (Some(first), Some(last)) => Some(articles as f64 / f64::from(last - first + 1)),
        _ => None,
    };
    TemporalProfile {
        per_year,
        first_year,
        last_year,
        articles_per_year,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lattes_test_utils::{table, ResearcherBuilder};
    use pretty_assertions::assert_eq;

    fn store() -> RecordStore {
        let mut store = RecordStore::new();
        ResearcherBuilder::new("0001")
            .table(
                EntityType::GeneralData,
                table(&["NOME-COMPLETO", "INSTITUICAO"], &[&["Ana Souza", "UFMG"]]),
            )
            .table(
                EntityType::AcademicFormation,
                table(
                    &["NIVEL", "INSTITUICAO"],
                    &[&["GRADUACAO", "UFMG"], &["MESTRADO", "USP"], &["DOUTORADO", "USP"]],
                ),
            )
            .table(
                EntityType::PublishedArticles,
                table(
                    &["TITULO-DO-ARTIGO", "ANO", "REVISTA", "AUTORES", "ENRICHED_SJR", "ENRICHED_H_index"],
                    &[
                        &["A", "2016", "PLOS ONE", "Souza; Lima", "0.8", "400"],
                        &["B", "2022", "PLOS ONE", "Souza", "1.2", "200"],
                        &["C", "2023", "Boletim", "Souza, Reis, Melo", "", ""],
                    ],
                ),
            )
            .table(
                EntityType::PublishedBooks,
                table(&["TITULO", "ANO", "EDITORA"], &[&["L1", "2020", "Editora UFMG"]]),
            )
            .table(
                EntityType::EventPapers,
                table(
                    &["TITULO", "ANO", "PAIS"],
                    &[&["E1", "2019", "Brasil"], &["E2", "2021", "Portugal"], &["E3", "x", ""]],
                ),
            )
            .production(EntityType::Awards, &["2020", "2021"])
            .production(EntityType::ResearchProjects, &["2018"])
            .add_to(&mut store);
        store
    }

    #[test]
    fn test_unknown_researcher_is_none() {
        assert!(AggregationEngine::new(2024).analyze_researcher(&store(), "9999").is_none());
    }

    #[test]
    fn test_full_profile() {
        let p = AggregationEngine::new(2024).analyze_researcher(&store(), "0001").unwrap();
        assert_eq!(p.name.as_deref(), Some("Ana Souza"));
        assert_eq!(p.institution.as_deref(), Some("UFMG"));

        let f = p.formation.unwrap();
        assert_eq!(f.highest_degree, "DOUTORADO");
        assert_eq!(f.count, 3);
        assert_eq!(f.institutions, vec!["UFMG", "USP"]);

        assert_eq!(p.production.counts["articles"], 3);
        assert_eq!(p.production.counts["events"], 3);
        assert_eq!(p.production.counts["chapters"], 0);
        assert_eq!(p.production.recent_articles, 2);
        assert_eq!(p.production.top_venues[0], Ranked { name: "PLOS ONE".into(), count: 2 });
        assert!((p.production.mean_sjr.unwrap() - 1.0).abs() < 1e-9);
        assert!((p.production.mean_h_index.unwrap() - 300.0).abs() < 1e-9);
        assert_eq!(p.production.top_publishers[0].name, "Editora UFMG");
        assert_eq!(p.production.international_events, 1);

        assert_eq!(p.temporal.first_year, Some(2016));
        assert_eq!(p.temporal.last_year, Some(2023));
        assert!((p.temporal.articles_per_year.unwrap() - 3.0 / 8.0).abs() < 1e-9);

        // (2 + 1 + 3) mentions over 3 articles
        assert_eq!(p.collaboration_index, Some(2.0));
        assert_eq!(p.awards, 2);
        assert_eq!(p.projects, 1);
    }

    #[test]
    fn test_sparse_profile() {
        let mut store = RecordStore::new();
        ResearcherBuilder::new("0003")
            .production(EntityType::PublishedBooks, &["sem data"])
            .add_to(&mut store);
        let p = AggregationEngine::new(2024).analyze_researcher(&store, "0003").unwrap();
        assert_eq!(p.name, None);
        assert_eq!(p.formation, None);
        assert_eq!(p.production.mean_sjr, None);
        assert!(p.production.top_venues.is_empty());
        assert_eq!(p.temporal.first_year, None);
        assert_eq!(p.temporal.articles_per_year, None);
        assert_eq!(p.collaboration_index, None);
    }
}
