//! Entity-type vocabulary of a curriculum record and the column names each
//! table is known to carry.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of per-researcher table. The canonical name is the one the
/// ingestion step uses for its `<id>_<ENTITY>.csv` files.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityType {
    GeneralData,
    AcademicFormation,
    ProfessionalRoles,
    PublishedArticles,
    PublishedBooks,
    BookChapters,
    EventPapers,
    KnowledgeAreas,
    Keywords,
    AdvisingMasters,
    AdvisingDoctorate,
    AdvisingPostdoc,
    AdvisingOther,
    Awards,
    ResearchProjects,
    Software,
    Patents,
    TechnologicalProducts,
    TechnicalWorks,
    OtherTechnicalProduction,
    Other(String),
}

impl EntityType {
    pub fn as_str(&self) -> &str {
        match self {
            EntityType::GeneralData              => "DADOS-GERAIS",
            EntityType::AcademicFormation        => "FORMACAO-ACADEMICA",
            EntityType::ProfessionalRoles        => "ATUACOES-PROFISSIONAIS",
            EntityType::PublishedArticles        => "ARTIGOS-PUBLICADOS",
            EntityType::PublishedBooks           => "LIVROS-PUBLICADOS",
            EntityType::BookChapters             => "CAPITULOS-LIVROS",
            EntityType::EventPapers              => "TRABALHOS-EVENTOS",
            EntityType::KnowledgeAreas           => "AREAS-DE-ATUACAO",
            EntityType::Keywords                 => "PALAVRAS-CHAVES",
            EntityType::AdvisingMasters          => "ORIENTACOES-MESTRADO",
            EntityType::AdvisingDoctorate        => "ORIENTACOES-DOUTORADO",
            EntityType::AdvisingPostdoc          => "ORIENTACOES-POS-DOUTORADO",
            EntityType::AdvisingOther            => "OUTRAS-ORIENTACOES",
            EntityType::Awards                   => "PREMIOS-TITULOS",
            EntityType::ResearchProjects         => "PROJETOS-PESQUISA",
            EntityType::Software                 => "SOFTWARE",
            EntityType::Patents                  => "PATENTES",
            EntityType::TechnologicalProducts    => "PRODUTOS-TECNOLOGICOS",
            EntityType::TechnicalWorks           => "TRABALHOS-TECNICOS",
            EntityType::OtherTechnicalProduction => "DEMAIS-PRODUCOES-TECNICAS",
            EntityType::Other(name)              => name.as_str(),
        }
    }

    /// Parse a table name. Accepts the canonical name, the English alias and
    /// any casing; unknown names are kept as `Other`.
    pub fn parse(name: &str) -> Self {
        let upper = name.trim().to_uppercase().replace('_', "-");
        match upper.as_str() {
            "DADOS-GERAIS" | "GENERAL-DATA"                         => EntityType::GeneralData,
            "FORMACAO-ACADEMICA" | "ACADEMIC-FORMATION"             => EntityType::AcademicFormation,
            "ATUACOES-PROFISSIONAIS" | "PROFESSIONAL-ROLES"         => EntityType::ProfessionalRoles,
            "ARTIGOS-PUBLICADOS" | "PUBLISHED-ARTICLES"             => EntityType::PublishedArticles,
            "LIVROS-PUBLICADOS" | "PUBLISHED-BOOKS"                 => EntityType::PublishedBooks,
            "CAPITULOS-LIVROS" | "BOOK-CHAPTERS"                    => EntityType::BookChapters,
            "TRABALHOS-EVENTOS" | "EVENT-PAPERS"                    => EntityType::EventPapers,
            "AREAS-DE-ATUACAO" | "KNOWLEDGE-AREAS"                  => EntityType::KnowledgeAreas,
            "PALAVRAS-CHAVES" | "KEYWORDS"                          => EntityType::Keywords,
            "ORIENTACOES-MESTRADO" | "ADVISING-MASTERS"             => EntityType::AdvisingMasters,
            "ORIENTACOES-DOUTORADO" | "ADVISING-DOCTORATE"          => EntityType::AdvisingDoctorate,
            "ORIENTACOES-POS-DOUTORADO" | "ADVISING-POSTDOC"        => EntityType::AdvisingPostdoc,
            "OUTRAS-ORIENTACOES" | "ADVISING-OTHER"                 => EntityType::AdvisingOther,
            "PREMIOS-TITULOS" | "AWARDS"                            => EntityType::Awards,
            "PROJETOS-PESQUISA" | "RESEARCH-PROJECTS"               => EntityType::ResearchProjects,
            "SOFTWARE"                                              => EntityType::Software,
            "PATENTES" | "PATENTS"                                  => EntityType::Patents,
            "PRODUTOS-TECNOLOGICOS" | "TECHNOLOGICAL-PRODUCTS"      => EntityType::TechnologicalProducts,
            "TRABALHOS-TECNICOS" | "TECHNICAL-WORKS"                => EntityType::TechnicalWorks,
            "DEMAIS-PRODUCOES-TECNICAS" | "OTHER-TECHNICAL-PRODUCTION" => EntityType::OtherTechnicalProduction,
            _ => EntityType::Other(name.trim().to_string()),
        }
    }

    /// Columns holding the title of an item, in lookup order. The ingestion
    /// step has emitted both the long Lattes attribute name and a short
    /// `TITULO`, so both are accepted.
    pub fn title_columns(&self) -> &'static [&'static str] {
        match self {
            EntityType::PublishedArticles => &[columns::ARTICLE_TITLE, columns::TITLE],
            EntityType::PublishedBooks    => &["TITULO-DO-LIVRO", columns::TITLE],
            EntityType::BookChapters      => &["TITULO-CAPITULO", "TITULO-DO-CAPITULO-DO-LIVRO", columns::TITLE],
            EntityType::EventPapers       => &["TITULO-DO-TRABALHO", columns::TITLE],
            _                             => &[columns::TITLE],
        }
    }

    /// The bibliographic production kinds counted in volume and trend
    /// statistics.
    pub fn production_kinds() -> [EntityType; 4] {
        [
            EntityType::PublishedArticles,
            EntityType::PublishedBooks,
            EntityType::BookChapters,
            EntityType::EventPapers,
        ]
    }

    pub fn advising_kinds() -> [EntityType; 4] {
        [
            EntityType::AdvisingMasters,
            EntityType::AdvisingDoctorate,
            EntityType::AdvisingPostdoc,
            EntityType::AdvisingOther,
        ]
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Column vocabulary of the flat curriculum tables.
pub mod columns {
    pub const TITLE: &str = "TITULO";
    pub const ARTICLE_TITLE: &str = "TITULO-DO-ARTIGO";
    pub const YEAR: &str = "ANO";
    pub const JOURNAL: &str = "REVISTA";
    pub const ISSN: &str = "ISSN";
    pub const DOI: &str = "DOI";
    pub const AUTHORS: &str = "AUTORES";

    pub const FULL_NAME: &str = "NOME-COMPLETO";
    pub const INSTITUTION: &str = "INSTITUICAO";
    pub const LEVEL: &str = "NIVEL";
    pub const AREA: &str = "AREA";
    pub const COMPLETION_YEAR: &str = "ANO-CONCLUSAO";
    pub const START_YEAR: &str = "ANO-INICIO";
    pub const MAJOR_AREA: &str = "GRANDE-AREA";
    pub const SUBAREA: &str = "SUBAREA";
    pub const PUBLISHER: &str = "EDITORA";
    pub const COUNTRY: &str = "PAIS";

    /// Added to every row of the corpus-wide publication table.
    pub const RESEARCHER_ID: &str = "CURRICULO_ID";

    /// Prefix of every column derived from the journal catalog.
    pub const ENRICHED_PREFIX: &str = "ENRICHED_";
    pub const ENRICHED_SJR: &str = "ENRICHED_SJR";
    pub const ENRICHED_H_INDEX: &str = "ENRICHED_H_index";
    pub const ENRICHED_TOTAL_CITES: &str = "ENRICHED_Total_Cites_(3years)";
    pub const ENRICHED_QUARTILE: &str = "ENRICHED_Quartile";
    pub const ENRICHED_CATEGORIES: &str = "ENRICHED_Categories";

    /// Derived column name for a catalog field: prefix plus the source name
    /// with spaces replaced by underscores.
    pub fn enriched(source: &str) -> String {
        format!("{ENRICHED_PREFIX}{}", source.replace(' ', "_"))
    }
}
