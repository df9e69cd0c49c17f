use crate::core::chemistry::tables::ChemistryTables;
use crate::core::utils::identifiers::{elements_match, missing_atom_element};
use nalgebra::Point3;

/// Represents an atom of a parsed structure with its crystallographic metadata.
///
/// Atoms are owned by the protein's atom table and referenced everywhere else by
/// their serial number. The identity fields are fixed at creation; `frozen` and
/// `quality_score` are annotations set afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The atom label within its residue (e.g., "CA", "N", "OXT").
    pub name: String,
    /// Capitalized element symbol (e.g., "C", "Fe").
    pub element: String,
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
    /// Fraction of the crystal population observed at this position, in `[0, 1]`.
    pub occupancy: f64,
    /// Isotropic temperature (B) factor.
    pub temperature_factor: f64,
    /// Alternate-location code, `None` when the record carries none.
    pub alt_loc: Option<char>,
    /// Whether the atom is held fixed by downstream geometry work.
    pub frozen: bool,
    /// Per-atom quality annotation from an external validation service.
    pub quality_score: Option<f64>,
}

impl Atom {
    /// Creates a fully occupied atom without alternate location or annotations.
    ///
    /// # Arguments
    ///
    /// * `name` - The atom label.
    /// * `element` - The element symbol.
    /// * `position` - The 3D coordinates of the atom.
    pub fn new(name: &str, element: &str, position: Point3<f64>) -> Self {
        Self {
            name: name.to_string(),
            element: element.to_string(),
            position,
            occupancy: 1.0,
            temperature_factor: 0.0,
            alt_loc: None,
            frozen: false,
            quality_score: None,
        }
    }

    pub fn with_occupancy(mut self, occupancy: f64) -> Self {
        self.occupancy = occupancy;
        self
    }

    pub fn with_alt_loc(mut self, alt_loc: Option<char>) -> Self {
        self.alt_loc = alt_loc;
        self
    }

    pub fn is_element(&self, symbol: &str) -> bool {
        elements_match(&self.element, symbol)
    }

    pub fn is_metal(&self, tables: &ChemistryTables, transition_metals_only: bool) -> bool {
        tables.is_metal(&self.element, transition_metals_only)
    }

    pub fn is_fully_occupied(&self) -> bool {
        self.occupancy == 1.0
    }
}

/// An atom documented as absent in the file header but chemically expected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingAtom {
    pub name: String,
    pub element: char,
}

impl MissingAtom {
    /// Creates a missing-atom entry, or `None` when the name does not start with C, N, O or H.
    pub fn from_name(name: &str) -> Option<Self> {
        missing_atom_element(name).map(|element| Self {
            name: name.to_string(),
            element,
        })
    }
}
