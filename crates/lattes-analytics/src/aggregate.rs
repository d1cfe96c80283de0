//! Corpus-wide statistics over a [`RecordStore`].
//!
//! Every pass is a pure function of the store plus the engine parameters.
//! Missing tables, missing columns, blank cells and non-numeric years are
//! skipped; nothing here returns an error. Sections whose inputs are absent
//! come back as `None`.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use chrono::Datelike;
use lattes_common::{columns, EntityType, Row, Table};
use lattes_ingestion::{RecordStore, ResearcherRecord};
use serde::Serialize;
use tracing::debug;

use crate::authors::AuthorSplitter;
use crate::degrees::degree_label;
use crate::stats::{mean, median, percentage, quartiles, Frequencies, Ranked};

pub const DEFAULT_RECENT_WINDOW_YEARS: i32 = 5;
pub const TOP_N: usize = 10;

/// Short label of a production or advising kind, used as a result key.
pub fn kind_label(entity: &EntityType) -> &str {
    match entity {
        EntityType::PublishedArticles => "articles",
        EntityType::PublishedBooks    => "books",
        EntityType::BookChapters      => "chapters",
        EntityType::EventPapers       => "events",
        EntityType::AdvisingMasters   => "masters",
        EntityType::AdvisingDoctorate => "doctorate",
        EntityType::AdvisingPostdoc   => "postdoc",
        EntityType::AdvisingOther     => "other",
        other                         => other.as_str(),
    }
}

/// Numeric years of a table, one per row that has one.
pub(crate) fn numeric_years(table: &Table) -> impl Iterator<Item = i32> + '_ {
    table.column_values(columns::YEAR).filter_map(|v| v.year())
}

/// `(mean of the last two years - mean of the first two) / mean of the
/// first two * 100`. Needs at least two distinct years.
pub fn growth_rate(per_year: &BTreeMap<i32, usize>) -> Option<f64> {
    if per_year.len() < 2 {
        return None;
    }
    let counts: Vec<f64> = per_year.values().map(|&n| n as f64).collect();
    let first = mean(&counts[..2])?;
    let last = mean(&counts[counts.len() - 2..])?;
    if first <= 0.0 {
        return None;
    }
    Some((last - first) / first * 100.0)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlobalSummary {
    pub researchers: usize,
    /// Articles, books and chapters per researcher.
    pub mean_production: f64,
    /// Years since the earliest professional role, over researchers that
    /// have one.
    pub mean_career_years: Option<f64>,
    pub institutions: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitulationStats {
    /// Highest degree label → researchers, including the not-informed bucket.
    pub distribution: BTreeMap<String, usize>,
    pub top_areas: Vec<Ranked>,
    /// Level → sorted completion years.
    pub completion_years: BTreeMap<String, Vec<i32>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductionStats {
    pub volumes: BTreeMap<String, usize>,
    pub recent: BTreeMap<String, usize>,
    pub historical: BTreeMap<String, usize>,
    /// First year counted as recent.
    pub recent_since: i32,
    pub top_venues: Vec<Ranked>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CitationStats {
    /// Positive citation values, or a single zero when there are none.
    pub distribution: Vec<f64>,
    pub mean: f64,
    pub median: f64,
    pub quartiles: [f64; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImpactStats {
    pub articles: usize,
    pub citations: CitationStats,
    pub citations_per_article: f64,
    pub mean_sjr: f64,
    /// Share of Q1 among articles that carry a quartile.
    pub q1_percentage: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaShare {
    pub area: String,
    pub researchers: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaStats {
    pub tagged_researchers: usize,
    pub distribution: Vec<AreaShare>,
    pub subareas: BTreeMap<String, BTreeSet<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendStats {
    pub per_year: BTreeMap<i32, usize>,
    pub growth_rate: Option<f64>,
    pub growth_by_kind: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollaborationStats {
    pub articles: usize,
    pub author_mentions: usize,
    pub index: f64,
    pub per_researcher: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdvisingStats {
    pub totals: BTreeMap<String, usize>,
    pub total: usize,
    pub per_year: BTreeMap<i32, usize>,
    pub mean_per_researcher: BTreeMap<String, f64>,
    pub mean_total_per_researcher: Option<f64>,
}

/// Every corpus-wide section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorpusStats {
    pub reference_year: i32,
    pub summary: GlobalSummary,
    pub titulation: TitulationStats,
    pub production: ProductionStats,
    pub impact: Option<ImpactStats>,
    pub areas: AreaStats,
    pub trends: TrendStats,
    pub collaboration: Option<CollaborationStats>,
    pub advising: AdvisingStats,
}

/// Parameters of the aggregation passes.
#[derive(Debug, Clone)]
pub struct AggregationEngine {
    reference_year: i32,
    recent_window_years: i32,
    splitter: AuthorSplitter,
}

impl Default for AggregationEngine {
    fn default() -> Self {
        Self::new(chrono::Local::now().year())
    }
}

impl AggregationEngine {
    pub fn new(reference_year: i32) -> Self {
        Self {
            reference_year,
            recent_window_years: DEFAULT_RECENT_WINDOW_YEARS,
            splitter: AuthorSplitter::default(),
        }
    }

    pub fn with_recent_window(mut self, years: i32) -> Self {
        self.recent_window_years = years;
        self
    }

    pub fn with_splitter(mut self, splitter: AuthorSplitter) -> Self {
        self.splitter = splitter;
        self
    }

    pub fn reference_year(&self) -> i32 {
        self.reference_year
    }

    pub fn splitter(&self) -> &AuthorSplitter {
        &self.splitter
    }

    /// First year that counts as recent.
    pub fn recent_cutoff(&self) -> i32 {
        self.reference_year - self.recent_window_years
    }

    pub fn analyze_corpus(&self, store: &RecordStore) -> CorpusStats {
        debug!(researchers = store.len(), reference_year = self.reference_year, "Aggregating corpus");
        CorpusStats {
            reference_year: self.reference_year,
            summary: self.global_summary(store),
            titulation: self.titulation(store),
            production: self.production(store),
            impact: self.impact(store),
            areas: self.knowledge_areas(store),
            trends: self.trends(store),
            collaboration: self.collaboration(store),
            advising: self.advising(store),
        }
    }

    pub fn global_summary(&self, store: &RecordStore) -> GlobalSummary {
        let counted = [
            EntityType::PublishedArticles,
            EntityType::PublishedBooks,
            EntityType::BookChapters,
        ];
        let mut production = 0usize;
        let mut careers = Vec::new();
        let mut institutions = BTreeSet::new();

        for record in store.researchers() {
            production += counted.iter().map(|e| record.count(e)).sum::<usize>();
            if let Some(roles) = record.table(&EntityType::ProfessionalRoles) {
                let earliest = roles
                    .column_values(columns::START_YEAR)
                    .filter_map(|v| v.year())
                    .min();
                if let Some(start) = earliest {
                    careers.push(f64::from(self.reference_year - start));
                }
                for row in roles {
                    if let Some(institution) = row.text(columns::INSTITUTION) {
                        institutions.insert(institution.to_string());
                    }
                }
            }
        }

        let researchers = store.len();
        GlobalSummary {
            researchers,
            mean_production: if researchers == 0 {
                0.0
            } else {
                production as f64 / researchers as f64
            },
            mean_career_years: mean(&careers),
            institutions: institutions.len(),
        }
    }

    pub fn titulation(&self, store: &RecordStore) -> TitulationStats {
        let mut distribution = BTreeMap::new();
        let mut areas = Frequencies::new();
        let mut completion_years: BTreeMap<String, Vec<i32>> = BTreeMap::new();

        for record in store.researchers() {
            let formation = record.table(&EntityType::AcademicFormation);
            *distribution.entry(degree_label(formation).to_string()).or_insert(0) += 1;

            let Some(formation) = formation else { continue };
            for row in formation {
                if let Some(area) = row.text(columns::AREA) {
                    areas.add(area);
                }
                let level = row.text(columns::LEVEL);
                let year = row.get(columns::COMPLETION_YEAR).year();
                if let (Some(level), Some(year)) = (level, year) {
                    completion_years.entry(level.to_string()).or_default().push(year);
                }
            }
        }
        for years in completion_years.values_mut() {
            years.sort_unstable();
        }

        TitulationStats {
            distribution,
            top_areas: areas.most_common(TOP_N),
            completion_years,
        }
    }

    pub fn production(&self, store: &RecordStore) -> ProductionStats {
        let cutoff = self.recent_cutoff();
        let mut volumes = BTreeMap::new();
        let mut recent = BTreeMap::new();
        let mut historical = BTreeMap::new();
        let mut venues = Frequencies::new();

        for kind in EntityType::production_kinds() {
            let label = kind_label(&kind).to_string();
            let (mut total, mut new, mut old) = (0, 0, 0);
            for record in store.researchers() {
                let Some(table) = record.table(&kind) else { continue };
                total += table.len();
                for year in numeric_years(table) {
                    if year >= cutoff {
                        new += 1;
                    } else {
                        old += 1;
                    }
                }
            }
            volumes.insert(label.clone(), total);
            recent.insert(label.clone(), new);
            historical.insert(label, old);
        }

        for articles in store.researchers().filter_map(|r| r.table(&EntityType::PublishedArticles)) {
            for (journal, n) in column_counts(articles, columns::JOURNAL).entries() {
                venues.add_n(journal, n);
            }
        }

        ProductionStats {
            volumes,
            recent,
            historical,
            recent_since: cutoff,
            top_venues: venues.most_common(TOP_N),
        }
    }

    pub fn impact(&self, store: &RecordStore) -> Option<ImpactStats> {
        let articles: Vec<&Row> = store
            .researchers()
            .filter_map(|r| r.table(&EntityType::PublishedArticles))
            .flat_map(|t| t.iter())
            .collect();
        if articles.is_empty() {
            return None;
        }

        let positive = |column: &str| -> Vec<f64> {
            let values: Vec<f64> = articles
                .iter()
                .filter_map(|r| r.get(column).as_f64())
                .filter(|v| *v > 0.0)
                .collect();
            if values.is_empty() {
                vec![0.0]
            } else {
                values
            }
        };
        let citations = positive(columns::ENRICHED_TOTAL_CITES);
        let sjr = positive(columns::ENRICHED_SJR);

        let quartiles_seen: Vec<&str> = articles
            .iter()
            .filter_map(|r| r.text(columns::ENRICHED_QUARTILE))
            .collect();
        let q1 = quartiles_seen
            .iter()
            .filter(|q| q.eq_ignore_ascii_case("Q1"))
            .count();
        let q1_percentage = (!quartiles_seen.is_empty()).then(|| percentage(q1, quartiles_seen.len()));

        let total: f64 = citations.iter().sum();
        Some(ImpactStats {
            articles: articles.len(),
            citations: CitationStats {
                mean: mean(&citations).unwrap_or(0.0),
                median: median(&citations).unwrap_or(0.0),
                quartiles: quartiles(&citations).unwrap_or([0.0; 3]),
                distribution: citations,
            },
            citations_per_article: total / articles.len() as f64,
            mean_sjr: mean(&sjr).unwrap_or(0.0),
            q1_percentage,
        })
    }

    pub fn knowledge_areas(&self, store: &RecordStore) -> AreaStats {
        let mut majors = Frequencies::new();
        let mut subareas: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

        for record in store.researchers() {
            let Some(areas) = record.table(&EntityType::KnowledgeAreas) else { continue };
            if let Some(first) = areas.iter().find_map(|r| r.text(columns::MAJOR_AREA)) {
                majors.add(first);
            }
            for row in areas {
                if let (Some(major), Some(sub)) = (row.text(columns::MAJOR_AREA), row.text(columns::SUBAREA)) {
                    subareas.entry(major.to_string()).or_default().insert(sub.to_string());
                }
            }
        }

        let tagged = majors.total();
        AreaStats {
            tagged_researchers: tagged,
            distribution: majors
                .most_common(majors.len())
                .into_iter()
                .map(|r| AreaShare {
                    percentage: percentage(r.count, tagged),
                    area: r.name,
                    researchers: r.count,
                })
                .collect(),
            subareas,
        }
    }

    pub fn trends(&self, store: &RecordStore) -> TrendStats {
        let mut per_year: BTreeMap<i32, usize> = BTreeMap::new();
        let mut growth_by_kind = BTreeMap::new();

        for kind in EntityType::production_kinds() {
            let mut kind_years: BTreeMap<i32, usize> = BTreeMap::new();
            for table in store.researchers().filter_map(|r| r.table(&kind)) {
                for year in numeric_years(table) {
                    *kind_years.entry(year).or_insert(0) += 1;
                }
            }
            if let Some(growth) = growth_rate(&kind_years) {
                growth_by_kind.insert(kind_label(&kind).to_string(), growth);
            }
            for (year, n) in kind_years {
                *per_year.entry(year).or_insert(0) += n;
            }
        }

        TrendStats {
            growth_rate: growth_rate(&per_year),
            per_year,
            growth_by_kind,
        }
    }

    pub fn collaboration(&self, store: &RecordStore) -> Option<CollaborationStats> {
        let mut articles = 0usize;
        let mut mentions = 0usize;
        let mut per_researcher = BTreeMap::new();

        for record in store.researchers() {
            let Some((n, m)) = self.author_counts(record) else { continue };
            if n == 0 {
                continue;
            }
            per_researcher.insert(record.id().to_string(), m as f64 / n as f64);
            articles += n;
            mentions += m;
        }

        if articles == 0 {
            return None;
        }
        Some(CollaborationStats {
            articles,
            author_mentions: mentions,
            index: mentions as f64 / articles as f64,
            per_researcher,
        })
    }

    /// `(articles, author mentions)` of one researcher.
    pub(crate) fn author_counts(&self, record: &ResearcherRecord) -> Option<(usize, usize)> {
        let articles = record.table(&EntityType::PublishedArticles)?;
        let mentions = articles
            .iter()
            .map(|r| r.text(columns::AUTHORS).map_or(0, |a| self.splitter.count(a)))
            .sum();
        Some((articles.len(), mentions))
    }

    pub fn advising(&self, store: &RecordStore) -> AdvisingStats {
        let mut totals = BTreeMap::new();
        let mut per_year: BTreeMap<i32, usize> = BTreeMap::new();

        for kind in EntityType::advising_kinds() {
            let mut total = 0;
            for table in store.researchers().filter_map(|r| r.table(&kind)) {
                total += table.len();
                for year in numeric_years(table) {
                    *per_year.entry(year).or_insert(0) += 1;
                }
            }
            totals.insert(kind_label(&kind).to_string(), total);
        }

        let total: usize = totals.values().sum();
        let researchers = store.len();
        let mean_per_researcher: BTreeMap<String, f64> = if researchers == 0 {
            BTreeMap::new()
        } else {
            totals
                .iter()
                .map(|(k, &n)| (k.clone(), n as f64 / researchers as f64))
                .collect()
        };

        AdvisingStats {
            totals,
            total,
            per_year,
            mean_per_researcher,
            mean_total_per_researcher: (researchers > 0).then(|| total as f64 / researchers as f64),
        }
    }
}

/// Non-blank values of one column, counted.
pub(crate) fn column_counts(table: &Table, column: &str) -> Frequencies {
    let mut counts = Frequencies::new();
    for value in table.iter().filter_map(|r| r.text(column)) {
        counts.add(value);
    }
    counts
}

/// Per-year production counts across every production kind.
pub(crate) fn production_years(record: &ResearcherRecord) -> BTreeMap<i32, usize> {
    let mut per_year = BTreeMap::new();
    for kind in EntityType::production_kinds() {
        if let Some(table) = record.table(&kind) {
            for year in numeric_years(table) {
                *per_year.entry(year).or_insert(0) += 1;
            }
        }
    }
    per_year
}

/// Distinct non-blank values of a column in first-seen order.
pub(crate) fn distinct_texts(table: &Table, column: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for value in table.iter().filter_map(|r| r.text(column)) {
        if seen.insert(value) {
            out.push(value.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::degrees::NOT_INFORMED;
    use lattes_test_utils::{table, ResearcherBuilder};
    use pretty_assertions::assert_eq;

    fn engine() -> AggregationEngine {
        AggregationEngine::new(2024)
    }

    #[test]
    fn test_collaboration_index() {
        let mut store = RecordStore::new();
        ResearcherBuilder::new("r1")
            .articles(&[("T1", "2020", "J", "A; B; C"), ("T2", "2021", "J", "D")])
            .add_to(&mut store);

        let collab = engine().collaboration(&store).unwrap();
        assert_eq!(collab.articles, 2);
        assert_eq!(collab.author_mentions, 4);
        assert!((collab.index - 2.0).abs() < 1e-9);
        assert_eq!(collab.per_researcher["r1"], 2.0);
    }

    #[test]
    fn test_articles_without_authors_still_count() {
        let mut store = RecordStore::new();
        ResearcherBuilder::new("r1")
            .articles(&[("T1", "2020", "J", "A, B"), ("T2", "2021", "J", "")])
            .add_to(&mut store);
        let collab = engine().collaboration(&store).unwrap();
        assert_eq!((collab.articles, collab.author_mentions), (2, 2));
        assert!((collab.index - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_collaboration_absent_without_articles() {
        let mut store = RecordStore::new();
        ResearcherBuilder::new("r1").formation(&["MESTRADO"]).add_to(&mut store);
        assert!(engine().collaboration(&store).is_none());
        assert!(engine().impact(&store).is_none());
    }

    #[test]
    fn test_titulation_counts_not_informed() {
        let mut store = RecordStore::new();
        ResearcherBuilder::new("r1").formation(&["MESTRADO", "DOUTORADO"]).add_to(&mut store);
        ResearcherBuilder::new("r2").articles(&[("T", "2020", "J", "A")]).add_to(&mut store);
        ResearcherBuilder::new("r3").formation(&["GRADUACAO"]).add_to(&mut store);

        let t = engine().titulation(&store);
        assert_eq!(t.distribution["DOUTORADO"], 1);
        assert_eq!(t.distribution["GRADUACAO"], 1);
        assert_eq!(t.distribution[NOT_INFORMED], 1);
        assert_eq!(t.distribution.values().sum::<usize>(), 3);
    }

    #[test]
    fn test_titulation_areas_and_completion_years() {
        let mut store = RecordStore::new();
        ResearcherBuilder::new("r1")
            .table(
                EntityType::AcademicFormation,
                table(
                    &["NIVEL", "AREA", "ANO-CONCLUSAO"],
                    &[
                        &["DOUTORADO", "Fisica", "2010"],
                        &["MESTRADO", "Fisica", "2006.0"],
                        &["GRADUACAO", "Matematica", "em andamento"],
                    ],
                ),
            )
            .add_to(&mut store);
        ResearcherBuilder::new("r2")
            .table(
                EntityType::AcademicFormation,
                table(&["NIVEL", "AREA", "ANO-CONCLUSAO"], &[&["DOUTORADO", "Quimica", "2004"]]),
            )
            .add_to(&mut store);

        let t = engine().titulation(&store);
        assert_eq!(t.top_areas[0], Ranked { name: "Fisica".into(), count: 2 });
        assert_eq!(t.completion_years["DOUTORADO"], vec![2004, 2010]);
        assert_eq!(t.completion_years["MESTRADO"], vec![2006]);
        assert!(!t.completion_years.contains_key("GRADUACAO"));
    }

    #[test]
    fn test_global_summary() {
        let mut store = RecordStore::new();
        ResearcherBuilder::new("r1")
            .articles(&[("A", "2020", "J", "X"), ("B", "2021", "J", "X")])
            .production(EntityType::PublishedBooks, &["2019"])
            .production(EntityType::EventPapers, &["2019", "2018"])
            .roles(&[("UFRJ", "2004"), ("USP", "2014"), ("UFRJ", "n/d")])
            .add_to(&mut store);
        ResearcherBuilder::new("r2")
            .production(EntityType::BookChapters, &["2022"])
            .add_to(&mut store);

        let s = engine().global_summary(&store);
        assert_eq!(s.researchers, 2);
        assert!((s.mean_production - 2.0).abs() < 1e-9);
        assert_eq!(s.mean_career_years, Some(20.0));
        assert_eq!(s.institutions, 2);
    }

    #[test]
    fn test_production_recent_and_historical_skip_bad_years() {
        let mut store = RecordStore::new();
        ResearcherBuilder::new("r1")
            .articles(&[
                ("A", "2023", "Nature", "X"),
                ("B", "2019", "Nature", "X"),
                ("C", "2018", "PLOS ONE", "X"),
                ("D", "no prelo", "", "X"),
            ])
            .production(EntityType::EventPapers, &["2020"])
            .add_to(&mut store);
        ResearcherBuilder::new("r2")
            .articles(&[("E", "2010", "PLOS ONE", "Y"), ("F", "2011", "PLOS ONE", "Y")])
            .add_to(&mut store);

        let p = engine().production(&store);
        assert_eq!(p.recent_since, 2019);
        assert_eq!(p.volumes["articles"], 6);
        assert_eq!(p.volumes["books"], 0);
        assert_eq!(p.volumes["events"], 1);
        assert_eq!(p.recent["articles"], 2);
        assert_eq!(p.historical["articles"], 3);
        assert_eq!(p.top_venues[0], Ranked { name: "PLOS ONE".into(), count: 3 });
        assert_eq!(p.top_venues[1], Ranked { name: "Nature".into(), count: 2 });
    }

    #[test]
    fn test_impact_filters_and_falls_back() {
        let mut store = RecordStore::new();
        ResearcherBuilder::new("r1")
            .table(
                EntityType::PublishedArticles,
                table(
                    &["TITULO-DO-ARTIGO", "ENRICHED_Total_Cites_(3years)", "ENRICHED_SJR", "ENRICHED_Quartile"],
                    &[
                        &["A", "10", "1.5", "Q1"],
                        &["B", "30", "0.5", "Q2"],
                        &["C", "0", "0", ""],
                        &["D", "", "", ""],
                    ],
                ),
            )
            .add_to(&mut store);

        let i = engine().impact(&store).unwrap();
        assert_eq!(i.articles, 4);
        assert_eq!(i.citations.distribution, vec![10.0, 30.0]);
        assert!((i.citations.mean - 20.0).abs() < 1e-9);
        assert!((i.citations.median - 20.0).abs() < 1e-9);
        assert!((i.citations.quartiles[0] - 15.0).abs() < 1e-9);
        assert!((i.citations_per_article - 10.0).abs() < 1e-9);
        assert!((i.mean_sjr - 1.0).abs() < 1e-9);
        assert_eq!(i.q1_percentage, Some(50.0));
    }

    #[test]
    fn test_impact_without_enrichment() {
        let mut store = RecordStore::new();
        ResearcherBuilder::new("r1").articles(&[("A", "2020", "J", "X")]).add_to(&mut store);
        let i = engine().impact(&store).unwrap();
        assert_eq!(i.citations.distribution, vec![0.0]);
        assert_eq!(i.citations.quartiles, [0.0; 3]);
        assert_eq!(i.mean_sjr, 0.0);
        assert_eq!(i.q1_percentage, None);
    }

    #[test]
    fn test_knowledge_areas_use_first_row() {
        let mut store = RecordStore::new();
        ResearcherBuilder::new("r1")
            .areas(&[("Ciencias Exatas", "Fisica"), ("Ciencias Humanas", "Educacao")])
            .add_to(&mut store);
        ResearcherBuilder::new("r2")
            .areas(&[("Ciencias Exatas", "Matematica")])
            .add_to(&mut store);
        ResearcherBuilder::new("r3")
            .areas(&[("Ciencias Humanas", "Sociologia")])
            .add_to(&mut store);
        ResearcherBuilder::new("r4").formation(&["MESTRADO"]).add_to(&mut store);

        let a = engine().knowledge_areas(&store);
        assert_eq!(a.tagged_researchers, 3);
        assert_eq!(a.distribution[0].area, "Ciencias Exatas");
        assert_eq!(a.distribution[0].researchers, 2);
        assert!((a.distribution[0].percentage - 200.0 / 3.0).abs() < 1e-9);
        assert_eq!(a.subareas["Ciencias Humanas"].len(), 2);
    }

    #[test]
    fn test_growth_rate_needs_two_years() {
        let one: BTreeMap<i32, usize> = [(2020, 5)].into_iter().collect();
        assert_eq!(growth_rate(&one), None);

        let years: BTreeMap<i32, usize> = [(2018, 2), (2019, 4), (2020, 6), (2021, 8)].into_iter().collect();
        // first two average 3, last two average 7
        assert!((growth_rate(&years).unwrap() - 400.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_trends_omit_growth_for_single_year() {
        let mut store = RecordStore::new();
        ResearcherBuilder::new("r1")
            .articles(&[("A", "2020", "J", "X"), ("B", "2020.0", "J", "X"), ("C", "s/d", "J", "X")])
            .add_to(&mut store);

        let t = engine().trends(&store);
        assert_eq!(t.per_year.len(), 1);
        assert_eq!(t.per_year[&2020], 2);
        assert_eq!(t.growth_rate, None);
        assert!(t.growth_by_kind.is_empty());
    }

    #[test]
    fn test_trends_growth_per_kind() {
        let mut store = RecordStore::new();
        ResearcherBuilder::new("r1")
            .production(EntityType::PublishedBooks, &["2018", "2019", "2019"])
            .production(EntityType::EventPapers, &["2018"])
            .add_to(&mut store);

        let t = engine().trends(&store);
        assert_eq!(t.per_year[&2018], 2);
        assert_eq!(t.per_year[&2019], 2);
        assert_eq!(t.growth_by_kind["books"], 0.0);
        assert!(!t.growth_by_kind.contains_key("events"));
    }

    #[test]
    fn test_advising_totals_and_means() {
        let mut store = RecordStore::new();
        ResearcherBuilder::new("r1")
            .production(EntityType::AdvisingMasters, &["2019", "2020"])
            .production(EntityType::AdvisingDoctorate, &["2020"])
            .add_to(&mut store);
        ResearcherBuilder::new("r2")
            .production(EntityType::AdvisingOther, &["x"])
            .add_to(&mut store);

        let a = engine().advising(&store);
        assert_eq!(a.totals["masters"], 2);
        assert_eq!(a.totals["postdoc"], 0);
        assert_eq!(a.total, 4);
        assert_eq!(a.per_year[&2020], 2);
        assert_eq!(a.per_year.values().sum::<usize>(), 3);
        assert_eq!(a.mean_per_researcher["masters"], 1.0);
        assert_eq!(a.mean_total_per_researcher, Some(2.0));
    }

    #[test]
    fn test_empty_store_is_tolerated() {
        let stats = engine().analyze_corpus(&RecordStore::new());
        assert_eq!(stats.summary.researchers, 0);
        assert_eq!(stats.summary.mean_production, 0.0);
        assert_eq!(stats.summary.mean_career_years, None);
        assert!(stats.impact.is_none());
        assert!(stats.collaboration.is_none());
        assert_eq!(stats.advising.mean_total_per_researcher, None);
        assert!(stats.titulation.distribution.is_empty());
    }
}
