use serde::Deserialize;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

const SERIAL_COLUMN: &str = "Infile id";
const SCORE_COLUMN: &str = "EDIA";

#[derive(Debug, Error)]
pub enum ScoreTableError {
    #[error("CSV parsing error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
    #[error("Quality score table is missing the '{0}' column")]
    MissingColumn(&'static str),
}

/// Per-atom electron-density quality score, keyed by the atom's serial in the source file.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct QualityScore {
    #[serde(rename = "Infile id")]
    pub serial: usize,
    #[serde(rename = "EDIA")]
    pub score: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QualityScoreTable {
    rows: Vec<QualityScore>,
    serials: HashSet<usize>,
}

impl QualityScoreTable {
    pub fn from_rows(rows: impl IntoIterator<Item = QualityScore>) -> Self {
        let rows: Vec<QualityScore> = rows.into_iter().collect();
        let serials = rows.iter().map(|row| row.serial).collect();
        Self { rows, serials }
    }

    /// Reads a score table from CSV with `Infile id` and `EDIA` columns.
    ///
    /// Extra columns are ignored and rows that do not deserialize are skipped with a
    /// warning; only a missing required column fails the whole table.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ScoreTableError> {
        Self::read_csv(reader, "<reader>")
    }

    pub fn from_path(path: &Path) -> Result<Self, ScoreTableError> {
        let file = std::fs::File::open(path).map_err(|e| ScoreTableError::Csv {
            path: path.to_string_lossy().to_string(),
            source: e.into(),
        })?;
        Self::read_csv(file, &path.to_string_lossy())
    }

    fn read_csv<R: Read>(reader: R, origin: &str) -> Result<Self, ScoreTableError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader.headers().map_err(|e| ScoreTableError::Csv {
            path: origin.to_string(),
            source: e,
        })?;
        for column in [SERIAL_COLUMN, SCORE_COLUMN] {
            if !headers.iter().any(|h| h == column) {
                return Err(ScoreTableError::MissingColumn(column));
            }
        }

        let mut rows = Vec::new();
        for (row, result) in reader.deserialize::<QualityScore>().enumerate() {
            match result {
                Ok(score) => rows.push(score),
                Err(e) => warn!(row = row + 1, error = %e, "Skipping unreadable quality score row"),
            }
        }
        Ok(Self::from_rows(rows))
    }

    pub fn rows(&self) -> &[QualityScore] {
        &self.rows
    }

    pub fn contains(&self, serial: usize) -> bool {
        self.serials.contains(&serial)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
