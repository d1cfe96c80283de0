//! Reads the per-entity CSV files produced by the curriculum conversion step.
//!
//! Layout: one directory, one file per (researcher, entity) pair, named
//! `<researcher-id>_<ENTITY>.csv`, comma-delimited with a header row.

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use lattes_common::{EntityType, LattesError, Result, Table};
use tracing::{debug, info, warn};

use crate::store::RecordStore;

/// Split `<id>_<ENTITY>.csv` into its parts. Anything else is `None`.
pub fn parse_file_name(file_name: &str) -> Option<(String, EntityType)> {
    let stem = file_name.strip_suffix(".csv")?;
    let (id, entity) = stem.split_once('_')?;
    if id.is_empty() || entity.is_empty() {
        return None;
    }
    Some((id.to_string(), EntityType::parse(entity)))
}

/// `<id>_<ENTITY>.csv` under `dir`.
pub fn table_path(dir: &Path, id: &str, entity: &EntityType) -> PathBuf {
    dir.join(format!("{id}_{entity}.csv"))
}

/// Read one comma-delimited table with a header row.
pub fn read_table<R: Read>(reader: R) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let h = if i == 0 { h.trim_start_matches('\u{feff}') } else { h };
            h.trim().to_string()
        })
        .collect();

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result?;
        records.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }
    Ok(Table::from_records(&headers, records))
}

pub fn read_table_file(path: &Path) -> Result<Table> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open table file {}", path.display()))?;
    read_table(file)
}

/// Write a table in the same layout [`read_table`] reads. Cells render with
/// [`Value::to_display_string`](lattes_common::Value::to_display_string),
/// so `Null` becomes an empty cell.
pub fn write_table<W: Write>(table: &Table, writer: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(table.columns())?;
    for row in table {
        writer.write_record(table.columns().iter().map(|c| row.get(c).to_display_string()))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_table_file(table: &Table, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create table file {}", path.display()))?;
    write_table(table, BufWriter::new(file))?;
    debug!(file = %path.display(), rows = table.len(), "Wrote table");
    Ok(())
}

/// Load every curriculum table found in `dir`.
///
/// Files that do not follow the naming scheme are ignored. A file that
/// fails to parse is logged and skipped; the remaining files still load.
/// Only an unreadable directory is an error.
pub fn load_csv_dir(dir: &Path) -> Result<RecordStore> {
    if !dir.is_dir() {
        return Err(LattesError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("CSV directory not found: {}", dir.display()),
        )));
    }

    let mut paths: Vec<_> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "csv"))
        .collect();
    paths.sort();

    let mut store = RecordStore::new();
    let mut loaded = 0usize;
    let mut skipped = 0usize;

    for path in paths {
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some((id, entity)) = parse_file_name(file_name) else {
            debug!(file = file_name, "Skipping file outside the naming scheme");
            skipped += 1;
            continue;
        };
        match read_table_file(&path) {
            Ok(table) => {
                debug!(researcher = %id, entity = %entity, rows = table.len(), "Loaded table");
                store.insert_table(&id, entity, table);
                loaded += 1;
            }
            Err(e) => {
                warn!(file = %path.display(), error = %e, "Failed to load table, skipping");
                skipped += 1;
            }
        }
    }

    info!(
        dir = %dir.display(),
        researchers = store.len(),
        tables = loaded,
        skipped,
        "Loaded curriculum tables"
    );
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lattes_common::Value;
    use std::io::Write;

    #[test]
    fn test_parse_file_name() {
        assert_eq!(
            parse_file_name("1234567890123456_ARTIGOS-PUBLICADOS.csv"),
            Some(("1234567890123456".to_string(), EntityType::PublishedArticles))
        );
        assert_eq!(parse_file_name("README.csv"), None);
        assert_eq!(parse_file_name("x_ARTIGOS-PUBLICADOS.txt"), None);
        assert_eq!(parse_file_name("_ARTIGOS-PUBLICADOS.csv"), None);
    }

    #[test]
    fn test_read_table_handles_bom_and_blank_cells() {
        let data = "\u{feff}TITULO-DO-ARTIGO,ANO,REVISTA\nGraphs,2020,\n\"Trees, forests\",,Nature\n";
        let table = read_table(data.as_bytes()).unwrap();
        assert_eq!(table.columns()[0], "TITULO-DO-ARTIGO");
        assert_eq!(table.len(), 2);
        assert!(table.rows()[0].get("REVISTA").is_null());
        assert_eq!(table.rows()[1].get("TITULO-DO-ARTIGO"), &Value::from("Trees, forests"));
        assert!(table.rows()[1].get("ANO").is_null());
    }

    #[test]
    fn test_load_csv_dir_skips_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut good = File::create(dir.path().join("r1_ARTIGOS-PUBLICADOS.csv")).unwrap();
        writeln!(good, "TITULO-DO-ARTIGO,ANO\nA,2020\nB,2021").unwrap();
        let mut formation = File::create(dir.path().join("r1_FORMACAO-ACADEMICA.csv")).unwrap();
        writeln!(formation, "NIVEL\nDOUTORADO").unwrap();
        let mut bad = File::create(dir.path().join("r2_ARTIGOS-PUBLICADOS.csv")).unwrap();
        bad.write_all(b"TITULO\n\xff\xfe broken utf8\n").unwrap();
        File::create(dir.path().join("notes.csv")).unwrap();

        let store = load_csv_dir(dir.path()).unwrap();
        assert_eq!(store.get("r1", &EntityType::PublishedArticles).unwrap().len(), 2);
        assert_eq!(store.get("r1", &EntityType::AcademicFormation).unwrap().len(), 1);
        assert!(store.get("r2", &EntityType::PublishedArticles).is_none());
    }

    #[test]
    fn test_written_table_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = table_path(dir.path(), "r9", &EntityType::PublishedArticles);
        assert!(path.ends_with("r9_ARTIGOS-PUBLICADOS.csv"));

        let table = read_table("TITULO-DO-ARTIGO,ANO\n\"Trees, forests\",\nGraphs,2020\n".as_bytes()).unwrap();
        write_table_file(&table, &path).unwrap();
        let store = load_csv_dir(dir.path()).unwrap();
        assert_eq!(store.get("r9", &EntityType::PublishedArticles), Some(&table));
    }

    #[test]
    fn test_load_missing_dir_is_error() {
        assert!(load_csv_dir(Path::new("/definitely/not/here")).is_err());
    }
}
