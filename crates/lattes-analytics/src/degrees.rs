//! Academic degree ordering.

use std::fmt;

use lattes_common::{columns, Table};
use serde::{Serialize, Serializer};

/// Label used when a researcher has no recognised degree.
pub const NOT_INFORMED: &str = "NAO-INFORMADO";

/// Degree levels in ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Degree {
    Graduation,
    Specialization,
    Masters,
    Doctorate,
    Postdoc,
}

impl Degree {
    pub const ALL: [Degree; 5] = [
        Degree::Graduation,
        Degree::Specialization,
        Degree::Masters,
        Degree::Doctorate,
        Degree::Postdoc,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Degree::Graduation     => "GRADUACAO",
            Degree::Specialization => "ESPECIALIZACAO",
            Degree::Masters        => "MESTRADO",
            Degree::Doctorate      => "DOUTORADO",
            Degree::Postdoc        => "POS-DOUTORADO",
        }
    }

    /// Parse a `NIVEL` cell. Case, accents, and space or underscore
    /// separators are ignored.
    pub fn parse(raw: &str) -> Option<Self> {
        let folded: String = raw
            .trim()
            .chars()
            .map(fold_char)
            .collect::<String>()
            .to_uppercase();
        Self::ALL.into_iter().find(|d| d.as_str() == folded)
    }
}

fn fold_char(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'Á' | 'À' | 'Â' | 'Ã' => 'A',
        'é' | 'ê' | 'É' | 'Ê' => 'E',
        'í' | 'Í' => 'I',
        'ó' | 'ô' | 'õ' | 'Ó' | 'Ô' | 'Õ' => 'O',
        'ú' | 'Ú' => 'U',
        'ç' | 'Ç' => 'C',
        ' ' | '_' => '-',
        other => other,
    }
}

impl fmt::Display for Degree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Degree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Highest recognised degree in a formation table.
pub fn highest_degree(formation: &Table) -> Option<Degree> {
    formation
        .column_values(columns::LEVEL)
        .filter_map(|v| v.as_str().and_then(Degree::parse))
        .max()
}

/// Label for a researcher's highest degree, [`NOT_INFORMED`] when none.
pub fn degree_label(formation: Option<&Table>) -> &'static str {
    formation
        .and_then(highest_degree)
        .map_or(NOT_INFORMED, Degree::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lattes_test_utils::table;

    #[test]
    fn test_ordering() {
        assert!(Degree::Graduation < Degree::Specialization);
        assert!(Degree::Masters < Degree::Doctorate);
        assert!(Degree::Doctorate < Degree::Postdoc);
    }

    #[test]
    fn test_highest_degree_picks_maximum() {
        let t = table(&["NIVEL"], &[&["MESTRADO"], &["DOUTORADO"], &["GRADUACAO"]]);
        assert_eq!(highest_degree(&t), Some(Degree::Doctorate));
        assert_eq!(degree_label(Some(&t)), "DOUTORADO");
    }

    #[test]
    fn test_parse_tolerates_accents_and_spacing() {
        assert_eq!(Degree::parse("Pós-Doutorado"), Some(Degree::Postdoc));
        assert_eq!(Degree::parse("pos doutorado"), Some(Degree::Postdoc));
        assert_eq!(Degree::parse(" graduação "), Some(Degree::Graduation));
        assert_eq!(Degree::parse("LIVRE-DOCENCIA"), None);
    }

    #[test]
    fn test_missing_or_unknown_is_not_informed() {
        assert_eq!(degree_label(None), NOT_INFORMED);
        let t = table(&["NIVEL"], &[&["APERFEICOAMENTO"], &[""]]);
        assert_eq!(degree_label(Some(&t)), NOT_INFORMED);
        assert_eq!(degree_label(Some(&Table::new())), NOT_INFORMED);
    }
}
