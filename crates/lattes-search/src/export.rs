//! CSV export of search results.
//!
//! Files start with a UTF-8 byte-order mark so spreadsheet software detects
//! the encoding. Only the fixed export columns that the results actually
//! carry are written, in their fixed order.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::Context;
use lattes_common::{columns, Result, Table};
use tracing::info;

/// Exported columns, in output order.
pub const EXPORT_COLUMNS: [&str; 8] = [
    columns::ARTICLE_TITLE,
    columns::JOURNAL,
    columns::YEAR,
    columns::ISSN,
    columns::DOI,
    columns::ENRICHED_SJR,
    columns::ENRICHED_H_INDEX,
    columns::RESEARCHER_ID,
];

const BOM: &[u8] = "\u{feff}".as_bytes();

/// Write `results` as BOM-prefixed CSV. Returns the number of data rows.
pub fn export_results<W: Write>(results: &Table, mut writer: W) -> Result<usize> {
    let present: Vec<&str> = EXPORT_COLUMNS
        .iter()
        .copied()
        .filter(|c| results.has_column(c))
        .collect();

    writer.write_all(BOM)?;
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(&present)?;
    for row in results {
        csv.write_record(present.iter().map(|c| row.get(c).to_display_string()))?;
    }
    csv.flush()?;
    Ok(results.len())
}

/// Export to a file, creating or truncating it.
pub fn export_results_to_path(results: &Table, path: &Path) -> Result<usize> {
    let file = File::create(path).with_context(|| format!("creating export file {}", path.display()))?;
    let rows = export_results(results, BufWriter::new(file))?;
    info!(path = %path.display(), rows, "Exported search results");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lattes_test_utils::table;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_export_writes_bom_and_present_columns_only() {
        let results = table(
            &["CURRICULO_ID", "ANO", "TITULO-DO-ARTIGO", "AUTORES"],
            &[&["r1", "2020", "Networks, revisited", "A; B"], &["r2", "", "Graphs", "C"]],
        );
        let mut out = Vec::new();
        let rows = export_results(&results, &mut out).unwrap();
        assert_eq!(rows, 2);

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with('\u{feff}'));
        let body = text.trim_start_matches('\u{feff}');
        assert_eq!(
            body,
            "TITULO-DO-ARTIGO,ANO,CURRICULO_ID\n\"Networks, revisited\",2020,r1\nGraphs,,r2\n"
        );
    }

    #[test]
    fn test_export_to_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        let results = table(&["TITULO-DO-ARTIGO", "ENRICHED_SJR"], &[&["A", "1.5"]]);
        assert_eq!(export_results_to_path(&results, &path).unwrap(), 1);
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..3], BOM);
        assert!(String::from_utf8_lossy(&bytes).contains("TITULO-DO-ARTIGO,ENRICHED_SJR"));
    }
}
