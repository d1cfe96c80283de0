//! In-memory record store: researcher → entity type → table.

use std::collections::BTreeMap;

use lattes_common::{columns, EntityType, Row, Table, Value};
use tracing::{debug, info};

use crate::dedup::{dedup_batch, ImportMode, ImportOutcome};

/// All tables of one curriculum.
#[derive(Debug, Clone, Default)]
pub struct ResearcherRecord {
    id: String,
    tables: BTreeMap<EntityType, Table>,
}

impl ResearcherRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tables: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The table for `entity`, if the curriculum has one. An absent table
    /// is not the same as an empty one.
    pub fn table(&self, entity: &EntityType) -> Option<&Table> {
        self.tables.get(entity)
    }

    pub fn table_mut(&mut self, entity: &EntityType) -> Option<&mut Table> {
        self.tables.get_mut(entity)
    }

    /// The table for `entity` when present and non-empty.
    pub fn non_empty(&self, entity: &EntityType) -> Option<&Table> {
        self.table(entity).filter(|t| !t.is_empty())
    }

    /// Row count of `entity`, zero when absent.
    pub fn count(&self, entity: &EntityType) -> usize {
        self.table(entity).map_or(0, Table::len)
    }

    pub fn tables(&self) -> impl Iterator<Item = (&EntityType, &Table)> {
        self.tables.iter()
    }

    pub fn insert(&mut self, entity: EntityType, table: Table) -> Option<Table> {
        self.tables.insert(entity, table)
    }
}

/// Every loaded curriculum, ordered by researcher ID.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    researchers: BTreeMap<String, ResearcherRecord>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.researchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.researchers.is_empty()
    }

    pub fn researcher(&self, id: &str) -> Option<&ResearcherRecord> {
        self.researchers.get(id)
    }

    pub fn researcher_mut(&mut self, id: &str) -> Option<&mut ResearcherRecord> {
        self.researchers.get_mut(id)
    }

    pub fn researchers(&self) -> impl Iterator<Item = &ResearcherRecord> {
        self.researchers.values()
    }

    pub fn researchers_mut(&mut self) -> impl Iterator<Item = &mut ResearcherRecord> {
        self.researchers.values_mut()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.researchers.keys().map(String::as_str)
    }

    /// Insert or overwrite one table, creating the researcher if needed.
    pub fn insert_table(&mut self, id: &str, entity: EntityType, table: Table) {
        self.researchers
            .entry(id.to_string())
            .or_insert_with(|| ResearcherRecord::new(id))
            .insert(entity, table);
    }

    pub fn get(&self, id: &str, entity: &EntityType) -> Option<&Table> {
        self.researchers.get(id)?.table(entity)
    }

    /// Concatenate every researcher's article table, tagging each row with
    /// its researcher ID. Researchers without articles contribute nothing.
    pub fn all_publications(&self) -> Table {
        let mut all = Table::new();
        for record in self.researchers.values() {
            let Some(articles) = record.table(&EntityType::PublishedArticles) else {
                continue;
            };
            let mut tagged = Table::with_columns(articles.columns().iter().cloned());
            tagged.ensure_column(columns::RESEARCHER_ID);
            for row in articles.rows() {
                let mut row: Row = row.clone();
                row.set(columns::RESEARCHER_ID, Value::Text(record.id.clone()));
                tagged.push_row(row);
            }
            all.append(tagged);
        }
        debug!(rows = all.len(), "Built corpus-wide publication table");
        all
    }

    /// Import `new_rows` as the `entity` table of `id`.
    pub fn import_or_merge(
        &mut self,
        id: &str,
        entity: EntityType,
        new_rows: Table,
        mode: ImportMode,
    ) -> ImportOutcome {
        let outcome = match mode {
            ImportMode::Abort => ImportOutcome::Aborted,
            ImportMode::Replace => {
                let rows = new_rows.len();
                self.insert_table(id, entity.clone(), new_rows);
                ImportOutcome::Replaced { rows }
            }
            ImportMode::Merge => match self.researcher_mut(id).and_then(|r| r.table_mut(&entity)) {
                Some(current) => {
                    let incoming_columns = new_rows.columns().to_vec();
                    let (keep, skipped) = dedup_batch(current, new_rows, &entity);
                    let added = keep.len();
                    for column in incoming_columns {
                        current.ensure_column(column);
                    }
                    for row in keep {
                        current.push_row(row);
                    }
                    ImportOutcome::Merged { added, skipped }
                }
                None => {
                    let added = new_rows.len();
                    self.insert_table(id, entity.clone(), new_rows);
                    ImportOutcome::Merged { added, skipped: 0 }
                }
            },
        };
        info!(researcher = id, entity = %entity, ?outcome, "Imported table");
        outcome
    }
}
