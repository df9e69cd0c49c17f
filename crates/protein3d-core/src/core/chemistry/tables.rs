use phf::{Set, phf_set};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

static AMINO_ACID_CODES: Set<&'static str> = phf_set! {
    "ALA", "ARG", "ASN", "ASP", "CYS", "GLN", "GLU", "GLY", "HIS", "ILE",
    "LEU", "LYS", "MET", "PHE", "PRO", "SER", "THR", "TRP", "TYR", "VAL",
    // Non-canonical and protonation-state variants that are deposited as residues.
    "SEC", "PYL", "MSE", "CYX", "ASH", "GLH", "LYN",
    "HID", "HIE", "HIP", "HSD", "HSE", "HSP",
};

static TRANSITION_METALS: Set<&'static str> = phf_set! {
    "sc", "ti", "v", "cr", "mn", "fe", "co", "ni", "cu", "zn",
    "y", "zr", "nb", "mo", "tc", "ru", "rh", "pd", "ag", "cd",
    "hf", "ta", "w", "re", "os", "ir", "pt", "au", "hg",
};

static OTHER_METALS: Set<&'static str> = phf_set! {
    "li", "be", "na", "mg", "al", "k", "ca", "ga", "rb", "sr", "in", "sn",
    "cs", "ba", "tl", "pb", "bi", "po", "fr", "ra",
    "la", "ce", "pr", "nd", "pm", "sm", "eu", "gd", "tb", "dy", "ho", "er", "tm", "yb", "lu",
    "ac", "th", "pa", "u", "np", "pu", "am", "cm", "bk", "cf", "es", "fm", "md", "no", "lr",
};

/// Immutable chemistry knowledge injected into the structure builder and the protein.
///
/// Holds the residue names treated as amino acids (including those deposited as
/// `HETATM` records) and the element symbols treated as metals. Amino-acid codes are
/// stored upper-case, element symbols lower-case, so lookups are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChemistryTables {
    amino_acids: HashSet<String>,
    metals: HashSet<String>,
    transition_metals: HashSet<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TablesFile {
    amino_acids: Option<Vec<String>>,
    metals: Option<Vec<String>>,
    transition_metals: Option<Vec<String>>,
}

#[derive(Debug, Error)]
pub enum TablesLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
}

impl Default for ChemistryTables {
    fn default() -> Self {
        let transition_metals: HashSet<String> =
            TRANSITION_METALS.iter().map(|s| s.to_string()).collect();
        let metals = OTHER_METALS
            .iter()
            .map(|s| s.to_string())
            .chain(transition_metals.iter().cloned())
            .collect();
        Self {
            amino_acids: AMINO_ACID_CODES.iter().map(|s| s.to_string()).collect(),
            metals,
            transition_metals,
        }
    }
}

impl ChemistryTables {
    /// Builds tables from explicit lists.
    ///
    /// Transition metals are always also members of the metal set.
    pub fn new<A, M, T>(amino_acids: A, metals: M, transition_metals: T) -> Self
    where
        A: IntoIterator,
        A::Item: AsRef<str>,
        M: IntoIterator,
        M::Item: AsRef<str>,
        T: IntoIterator,
        T::Item: AsRef<str>,
    {
        let transition_metals: HashSet<String> = transition_metals
            .into_iter()
            .map(|s| s.as_ref().trim().to_ascii_lowercase())
            .collect();
        let metals = metals
            .into_iter()
            .map(|s| s.as_ref().trim().to_ascii_lowercase())
            .chain(transition_metals.iter().cloned())
            .collect();
        Self {
            amino_acids: amino_acids
                .into_iter()
                .map(|s| s.as_ref().trim().to_ascii_uppercase())
                .collect(),
            metals,
            transition_metals,
        }
    }

    /// Loads tables from a TOML file; any list the file omits keeps its default.
    pub fn load(path: &Path) -> Result<Self, TablesLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| TablesLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::from_toml_str(&content).map_err(|e| TablesLoadError::Toml {
            path: path.to_string_lossy().to_string(),
            source: e,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        let file: TablesFile = toml::from_str(content)?;
        let defaults = Self::default();
        let amino_acids = file
            .amino_acids
            .unwrap_or_else(|| defaults.amino_acids.iter().cloned().collect());
        let transition_metals = file
            .transition_metals
            .unwrap_or_else(|| defaults.transition_metals.iter().cloned().collect());
        let metals = file
            .metals
            .unwrap_or_else(|| defaults.metals.iter().cloned().collect());
        Ok(Self::new(amino_acids, metals, transition_metals))
    }

    pub fn is_amino_acid(&self, residue_name: &str) -> bool {
        self.amino_acids
            .contains(residue_name.trim().to_ascii_uppercase().as_str())
    }

    pub fn is_metal(&self, element: &str, transition_metals_only: bool) -> bool {
        let key = element.trim().to_ascii_lowercase();
        if transition_metals_only {
            self.transition_metals.contains(&key)
        } else {
            self.metals.contains(&key)
        }
    }

    pub fn amino_acid_count(&self) -> usize {
        self.amino_acids.len()
    }
}
