//! Fixtures shared by the Lattes crates' tests: a small journal ranking file
//! and builders for curriculum tables.

use lattes_common::{columns, EntityType, Row, Table, Value};
use lattes_ingestion::RecordStore;

/// A ranking export in the catalog's native format: `;`-delimited, decimal
/// commas, quoted titles, some blank cells.
pub const SAMPLE_CATALOG_CSV: &str = "\
Rank;Sourceid;Title;Type;Issn;SJR;SJR Best Quartile;H index;Total Docs. (2023);Total Docs. (3years);Total Refs.;Total Cites (3years);Citable Docs. (3years);Cites / Doc. (2years);Ref. / Doc.;Country;Publisher;Categories
1;21206;\"NATURE\";journal;\"00280836, 14764687\";18,509;Q1;1331;3957;11256;96340;190561;7858;21,57;24,35;United Kingdom;Nature Publishing Group;\"Multidisciplinary (Q1)\"
2;12345;\"Journal of Sound and Vibration\";journal;\"0022460X\";1,225;Q1;219;1178;3210;63400;16022;3190;4,98;53,82;United Kingdom;Elsevier;\"Acoustics and Ultrasonics (Q1); Mechanical Engineering (Q1)\"
3;23456;\"PLOS ONE\";journal;\"19326203\";0,839;Q1;435;17200;62000;950000;240000;61000;3,70;55,23;United States;Public Library of Science;\"Multidisciplinary (Q1)\"
4;34567;\"Social Networks\";journal;\"03788733\";1,910;Q1;120;80;260;5600;1120;250;4,31;70,00;Netherlands;Elsevier;\"Sociology and Political Science (Q1); Psychology (miscellaneous) (Q1)\"
5;45678;\"Revista Brasileira de Ensino de Fisica\";journal;\"18069126\";0,250;Q3;28;210;640;7300;410;630;0,64;34,76;Brazil;Sociedade Brasileira de Fisica;\"Physics and Astronomy (miscellaneous) (Q3); Education (Q3)\"
6;56789;\"Cadernos de Pesquisa\";journal;\"01001574\";;;n/a;95;300;;;;;;Brazil;Fundacao Carlos Chagas;
";

/// An article row with the usual columns. Blank arguments become `Null`.
pub fn article_row(title: &str, year: &str, journal: &str, authors: &str) -> Row {
    [
        (columns::ARTICLE_TITLE, title),
        (columns::YEAR, year),
        (columns::JOURNAL, journal),
        (columns::AUTHORS, authors),
    ]
    .into_iter()
    .map(|(c, v)| (c, Value::from_cell(v)))
    .collect()
}

/// A table from column names and rows of raw cells.
pub fn table(columns: &[&str], rows: &[&[&str]]) -> Table {
    let mut table = Table::with_columns(columns.iter().copied());
    for cells in rows {
        let row: Row = columns
            .iter()
            .zip(cells.iter())
            .map(|(c, v)| (*c, Value::from_cell(v)))
            .collect();
        table.push_row(row);
    }
    table
}

/// Builds one curriculum into a [`RecordStore`].
pub struct ResearcherBuilder {
    id: String,
    tables: Vec<(EntityType, Table)>,
}

impl ResearcherBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            tables: Vec::new(),
        }
    }

    pub fn table(mut self, entity: EntityType, table: Table) -> Self {
        self.tables.push((entity, table));
        self
    }

    /// Articles as `(title, year, journal, authors)`.
    pub fn articles(self, rows: &[(&str, &str, &str, &str)]) -> Self {
        let mut t = Table::with_columns([
            columns::ARTICLE_TITLE,
            columns::YEAR,
            columns::JOURNAL,
            columns::AUTHORS,
        ]);
        for (title, year, journal, authors) in rows {
            t.push_row(article_row(title, year, journal, authors));
        }
        self.table(EntityType::PublishedArticles, t)
    }

    /// Items of a production kind with just a title and a year.
    pub fn production(self, entity: EntityType, years: &[&str]) -> Self {
        let rows: Vec<Vec<String>> = years
            .iter()
            .enumerate()
            .map(|(i, y)| vec![format!("{} {}", entity.as_str(), i + 1), y.to_string()])
            .collect();
        let refs: Vec<Vec<&str>> = rows.iter().map(|r| r.iter().map(String::as_str).collect()).collect();
        let slices: Vec<&[&str]> = refs.iter().map(Vec::as_slice).collect();
        let t = table(&[columns::TITLE, columns::YEAR], &slices);
        self.table(entity, t)
    }

    /// Formation rows, one per degree level.
    pub fn formation(self, levels: &[&str]) -> Self {
        let rows: Vec<[&str; 1]> = levels.iter().map(|l| [*l]).collect();
        let slices: Vec<&[&str]> = rows.iter().map(|r| r.as_slice()).collect();
        let t = table(&[columns::LEVEL], &slices);
        self.table(EntityType::AcademicFormation, t)
    }

    /// Professional roles as `(institution, start year)`.
    pub fn roles(self, roles: &[(&str, &str)]) -> Self {
        let rows: Vec<[&str; 2]> = roles.iter().map(|(i, y)| [*i, *y]).collect();
        let slices: Vec<&[&str]> = rows.iter().map(|r| r.as_slice()).collect();
        let t = table(&[columns::INSTITUTION, columns::START_YEAR], &slices);
        self.table(EntityType::ProfessionalRoles, t)
    }

    /// Knowledge areas as `(major area, subarea)`, first row first.
    pub fn areas(self, areas: &[(&str, &str)]) -> Self {
        let rows: Vec<[&str; 2]> = areas.iter().map(|(a, s)| [*a, *s]).collect();
        let slices: Vec<&[&str]> = rows.iter().map(|r| r.as_slice()).collect();
        let t = table(&[columns::MAJOR_AREA, columns::SUBAREA], &slices);
        self.table(EntityType::KnowledgeAreas, t)
    }

    pub fn add_to(self, store: &mut RecordStore) {
        for (entity, table) in self.tables {
            store.insert_table(&self.id, entity, table);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builder_populates_store() {
        let mut store = RecordStore::new();
        ResearcherBuilder::new("r1")
            .articles(&[("T", "2020", "Nature", "A; B")])
            .formation(&["MESTRADO", "DOUTORADO"])
            .production(EntityType::PublishedBooks, &["2018", "2019"])
            .add_to(&mut store);

        assert_eq!(store.get("r1", &EntityType::PublishedArticles).unwrap().len(), 1);
        assert_eq!(store.get("r1", &EntityType::AcademicFormation).unwrap().len(), 2);
        assert_eq!(store.get("r1", &EntityType::PublishedBooks).unwrap().len(), 2);
    }

    #[test]
    fn test_article_row_blank_is_null() {
        let row = article_row("T", "", "J", "");
        assert!(row.get(columns::YEAR).is_null());
        assert!(row.get(columns::AUTHORS).is_null());
    }
}
