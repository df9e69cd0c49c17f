use super::ids::ResidueId;
use crate::core::chemistry::bonding;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Identity of a residue: two residues sharing chain and sequence id but differing
/// in alternate location are conformers of the same position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResidueKey {
    pub chain_id: char,
    pub sequence_id: isize,
    pub alt_loc: Option<char>,
}

impl ResidueKey {
    pub fn position(&self) -> (char, isize) {
        (self.chain_id, self.sequence_id)
    }
}

#[derive(Debug, Clone)]
pub struct Residue {
    pub name: String,               // Three-letter code (e.g., "ALA", "MSE")
    pub chain_id: char,             // Chain identifier from the source file
    pub sequence_id: isize,         // Residue sequence number from the source file
    pub alt_loc: Option<char>,      // Alternate-location code for conformers
    pub occupancy: f64,             // Occupancy of the first atom recorded for this residue
    pub from_hetero_record: bool,   // Deposited as HETATM records (fake amino acid)
    pub(crate) atoms: Vec<usize>,   // Serials of atoms belonging to this residue
    atom_name_map: HashMap<String, usize>,
    pub(crate) prev: Option<ResidueId>,
    pub(crate) next: Option<ResidueId>,
    pub(crate) bonds: BTreeMap<usize, BTreeSet<usize>>,
}

impl PartialEq for Residue {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Residue {}

impl Residue {
    pub(crate) fn new(
        name: &str,
        chain_id: char,
        sequence_id: isize,
        alt_loc: Option<char>,
        occupancy: f64,
    ) -> Self {
        Self {
            name: name.to_string(),
            chain_id,
            sequence_id,
            alt_loc,
            occupancy,
            from_hetero_record: false,
            atoms: Vec::new(),
            atom_name_map: HashMap::new(),
            prev: None,
            next: None,
            bonds: BTreeMap::new(),
        }
    }

    pub fn key(&self) -> ResidueKey {
        ResidueKey {
            chain_id: self.chain_id,
            sequence_id: self.sequence_id,
            alt_loc: self.alt_loc,
        }
    }

    pub fn position(&self) -> (char, isize) {
        (self.chain_id, self.sequence_id)
    }

    pub fn is_conformer(&self) -> bool {
        self.alt_loc.is_some()
    }

    pub(crate) fn add_atom(&mut self, atom_name: &str, serial: usize) {
        self.atoms.push(serial);
        self.atom_name_map
            .entry(atom_name.to_string())
            .or_insert(serial);
    }

    pub(crate) fn remove_atom(&mut self, serial: usize) {
        self.atoms.retain(|&s| s != serial);
        self.atom_name_map.retain(|_, &mut s| s != serial);
        self.bonds.remove(&serial);
        for neighbors in self.bonds.values_mut() {
            neighbors.remove(&serial);
        }
        self.bonds.retain(|_, neighbors| !neighbors.is_empty());
    }

    pub(crate) fn sort_atoms(&mut self) {
        self.atoms.sort_unstable();
    }

    pub fn atoms(&self) -> &[usize] {
        &self.atoms
    }

    pub fn contains_atom(&self, serial: usize) -> bool {
        self.atoms.contains(&serial)
    }

    pub fn get_atom_by_name(&self, name: &str) -> Option<usize> {
        self.atom_name_map.get(name).copied()
    }

    pub fn prev(&self) -> Option<ResidueId> {
        self.prev
    }

    pub fn next(&self) -> Option<ResidueId> {
        self.next
    }

    /// Intra-residue bonds inferred from standard atom names.
    pub fn bonds(&self) -> &BTreeMap<usize, BTreeSet<usize>> {
        &self.bonds
    }

    /// Recomputes the intra-residue bond map from the residue's bond template.
    ///
    /// Bonds are stored in both directions; atoms absent from the residue simply
    /// leave their template bonds out.
    pub(crate) fn set_bonds(&mut self) {
        self.bonds.clear();
        for (a, b) in bonding::template_bonds(&self.name) {
            if let (Some(&i), Some(&j)) = (self.atom_name_map.get(a), self.atom_name_map.get(b)) {
                self.bonds.entry(i).or_default().insert(j);
                self.bonds.entry(j).or_default().insert(i);
            }
        }
    }

    /// Whether the conformer survives automatic selection: occupancy above one half,
    /// or exactly one half for alternate location "A".
    pub fn meets_occupancy_rule(&self) -> bool {
        self.occupancy > 0.5 || (self.occupancy == 0.5 && self.alt_loc == Some('A'))
    }
}

/// A residue documented as absent from the deposited coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResidueStub {
    pub name: String,
    pub chain_id: char,
    pub sequence_id: isize,
}

impl ResidueStub {
    pub fn new(name: &str, chain_id: char, sequence_id: isize) -> Self {
        Self {
            name: name.to_string(),
            chain_id,
            sequence_id,
        }
    }
}
