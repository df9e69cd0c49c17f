use super::header::{
    HeaderError, parse_missing_atoms, parse_missing_residues, parse_refinement, split_lines,
};
use super::record::{AtomRecord, ConectRecord, RecordError};
use super::traits::StructureFile;
use crate::core::chemistry::tables::ChemistryTables;
use crate::core::models::builder::{BuildError, ProteinBuilder};
use crate::core::models::protein::Protein;
use std::io;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, instrument, warn};

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {source}")]
    Record { line: usize, source: RecordError },
    #[error("Inconsistent data on line {line}: {source}")]
    Build { line: usize, source: BuildError },
    #[error(transparent)]
    Header(#[from] HeaderError),
}

/// Options controlling how tolerant the PDB reader is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadOptions {
    pub require_refinement: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            require_refinement: true,
        }
    }
}

impl ReadOptions {
    pub fn builder() -> ReadOptionsBuilder {
        ReadOptionsBuilder::new()
    }
}

#[derive(Debug, Default)]
pub struct ReadOptionsBuilder {
    require_refinement: Option<bool>,
}

impl ReadOptionsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// When disabled, a file without refinement statistics keeps the default R
    /// values instead of failing.
    pub fn require_refinement(mut self, required: bool) -> Self {
        self.require_refinement = Some(required);
        self
    }

    pub fn build(self) -> ReadOptions {
        let defaults = ReadOptions::default();
        ReadOptions {
            require_refinement: self
                .require_refinement
                .unwrap_or(defaults.require_refinement),
        }
    }
}

/// Reader for fixed-column PDB files.
///
/// Only the first model is loaded. `HETATM` records whose residue name is a known
/// amino-acid code are built into residues like `ATOM` records; all other `HETATM`
/// records go to the hetero registry.
#[derive(Debug, Clone, Default)]
pub struct PdbFile {
    tables: Arc<ChemistryTables>,
    options: ReadOptions,
}

impl PdbFile {
    pub fn new(tables: Arc<ChemistryTables>) -> Self {
        Self {
            tables,
            options: ReadOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ReadOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &ReadOptions {
        &self.options
    }

    /// Parses PDB text with the default chemistry tables and options.
    pub fn from_text(text: &str) -> Result<Protein, PdbError> {
        Self::default().read_str(text)
    }
}

impl StructureFile for PdbFile {
    type Error = PdbError;

    #[instrument(skip_all, name = "pdb_read")]
    fn read_str(&self, text: &str) -> Result<Protein, Self::Error> {
        let lines = split_lines(text);
        let mut builder = ProteinBuilder::new(Arc::clone(&self.tables));

        match parse_refinement(&lines)? {
            Some(values) => {
                builder.refinement(values);
            }
            None if self.options.require_refinement => {
                return Err(HeaderError::MissingRefinement.into());
            }
            None => warn!("No refinement statistics found; keeping default R values."),
        }
        builder
            .missing_residues(parse_missing_residues(&lines))
            .missing_atoms(parse_missing_atoms(&lines));

        let mut past_first_model = false;
        for (idx, line) in lines.iter().enumerate() {
            let line_num = idx + 1;
            let line: &str = line.as_ref();
            let record_type = line.get(..6).unwrap_or(line).trim_end();

            match record_type {
                "ATOM" | "HETATM" if past_first_model => {}
                "ATOM" | "HETATM" => {
                    let record = AtomRecord::parse(line).map_err(|source| PdbError::Record {
                        line: line_num,
                        source,
                    })?;
                    let is_hetero = record_type == "HETATM";
                    let added = if is_hetero && !self.tables.is_amino_acid(&record.residue_name) {
                        builder.add_hetero_atom(&record).map(|_| ())
                    } else {
                        builder.add_residue_atom(&record, is_hetero).map(|_| ())
                    };
                    added.map_err(|source| PdbError::Build {
                        line: line_num,
                        source,
                    })?;
                }
                "ENDMDL" => {
                    if !past_first_model {
                        debug!(line = line_num, "End of first model; ignoring later coordinates.");
                    }
                    past_first_model = true;
                }
                "CONECT" => match ConectRecord::parse(line) {
                    Ok(record) => {
                        builder.add_conect(record);
                    }
                    Err(e) => {
                        warn!(line = line_num, error = %e, "Skipping malformed CONECT record.")
                    }
                },
                _ => {}
            }
        }

        Ok(builder.build())
    }
}

/// Parses PDB text into a [`Protein`] with default tables and options.
pub fn build_from_text(text: &str) -> Result<Protein, PdbError> {
    PdbFile::from_text(text)
}
