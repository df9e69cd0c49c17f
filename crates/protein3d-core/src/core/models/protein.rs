use super::atom::{Atom, MissingAtom};
use super::hetero::HeteroAtom;
use super::ids::ResidueId;
use super::residue::{Residue, ResidueStub};
use crate::core::chemistry::tables::ChemistryTables;
use crate::core::io::pdb::{self, PdbError};
use crate::core::quality::scores::QualityScoreTable;
use crate::core::quality::validation::{
    DEFAULT_DATA_COMPLETENESS, DEFAULT_RSRZ, DEFAULT_TWIN_L, DEFAULT_TWIN_L2, ValidationReport,
};
use slotmap::SlotMap;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::{Arc, OnceLock};
use tracing::{debug, warn};

pub type BondGraph = BTreeMap<usize, BTreeSet<usize>>;

#[derive(Debug, Clone, Default)]
struct MetalCache {
    transition_only: OnceLock<Vec<usize>>,
    all: OnceLock<Vec<usize>>,
}

/// A parsed macromolecular structure and its derived indices.
///
/// Atoms are owned by a single table keyed by their serial number in the source file.
/// Residues live in a slotmap arena and are referenced everywhere else by
/// [`ResidueId`]. Every mutator keeps the atom table, the residue containers, the
/// hetero registry and the bond graph consistent with each other.
#[derive(Debug, Clone)]
pub struct Protein {
    pub(crate) atoms: BTreeMap<usize, Atom>,
    pub(crate) residues: SlotMap<ResidueId, Residue>,
    pub(crate) aas: BTreeMap<(char, isize), Vec<ResidueId>>,
    pub(crate) chains: BTreeMap<char, Vec<ResidueId>>,
    pub(crate) conformers: Vec<ResidueId>,
    pub(crate) atom_residue: BTreeMap<usize, ResidueId>,
    pub(crate) hetatms: BTreeMap<usize, HeteroAtom>,
    pub(crate) missing_atoms: BTreeMap<(char, isize), Vec<MissingAtom>>,
    pub(crate) missing_aas: Vec<ResidueStub>,
    pub(crate) bonds: BondGraph,

    r_value: f64,
    r_free: f64,
    data_completeness: f64,
    rsrz: f64,
    twin_l: f64,
    twin_l2: f64,
    pdb_code: Option<String>,

    metal_cache: MetalCache,
    tables: Arc<ChemistryTables>,
}

impl Default for Protein {
    fn default() -> Self {
        Self::new(Arc::new(ChemistryTables::default()))
    }
}

impl Protein {
    pub fn new(tables: Arc<ChemistryTables>) -> Self {
        Self {
            atoms: BTreeMap::new(),
            residues: SlotMap::with_key(),
            aas: BTreeMap::new(),
            chains: BTreeMap::new(),
            conformers: Vec::new(),
            atom_residue: BTreeMap::new(),
            hetatms: BTreeMap::new(),
            missing_atoms: BTreeMap::new(),
            missing_aas: Vec::new(),
            bonds: BTreeMap::new(),
            r_value: -1.0,
            r_free: -1.0,
            data_completeness: DEFAULT_DATA_COMPLETENESS,
            rsrz: DEFAULT_RSRZ,
            twin_l: DEFAULT_TWIN_L,
            twin_l2: DEFAULT_TWIN_L2,
            pdb_code: None,
            metal_cache: MetalCache::default(),
            tables,
        }
    }

    /// Parses PDB text with the default chemistry tables and read options.
    pub fn from_pdb_text(text: &str) -> Result<Self, PdbError> {
        pdb::build_from_text(text)
    }

    pub fn tables(&self) -> &ChemistryTables {
        &self.tables
    }

    pub fn atoms(&self) -> &BTreeMap<usize, Atom> {
        &self.atoms
    }

    pub fn residues(&self) -> &SlotMap<ResidueId, Residue> {
        &self.residues
    }

    pub fn residue(&self, id: ResidueId) -> Option<&Residue> {
        self.residues.get(id)
    }

    /// Every residue recorded at each (chain, sequence) position, conformers included.
    pub fn aas(&self) -> &BTreeMap<(char, isize), Vec<ResidueId>> {
        &self.aas
    }

    /// The selected residue of every position, grouped by chain in sequence order.
    pub fn chains(&self) -> &BTreeMap<char, Vec<ResidueId>> {
        &self.chains
    }

    pub fn chain(&self, chain_id: char) -> Option<&[ResidueId]> {
        self.chains.get(&chain_id).map(Vec::as_slice)
    }

    pub fn conformers(&self) -> &[ResidueId] {
        &self.conformers
    }

    pub fn hetatms(&self) -> &BTreeMap<usize, HeteroAtom> {
        &self.hetatms
    }

    pub fn missing_atoms(&self) -> &BTreeMap<(char, isize), Vec<MissingAtom>> {
        &self.missing_atoms
    }

    pub fn missing_aas(&self) -> &[ResidueStub] {
        &self.missing_aas
    }

    /// Bond adjacency keyed by atom serial. Template and peptide bonds are stored in
    /// both directions; bonds read from `CONECT` records only in the recorded direction.
    pub fn bonds(&self) -> &BondGraph {
        &self.bonds
    }

    pub fn r_value(&self) -> f64 {
        self.r_value
    }

    pub fn r_free(&self) -> f64 {
        self.r_free
    }

    pub fn data_completeness(&self) -> f64 {
        self.data_completeness
    }

    pub fn rsrz(&self) -> f64 {
        self.rsrz
    }

    pub fn twin_l(&self) -> f64 {
        self.twin_l
    }

    pub fn twin_l2(&self) -> f64 {
        self.twin_l2
    }

    pub fn pdb_code(&self) -> Option<&str> {
        self.pdb_code.as_deref()
    }

    pub fn nchains(&self) -> usize {
        self.chains.len()
    }

    pub fn nhetatms(&self) -> usize {
        self.hetatms.len()
    }

    /// Number of residue positions, counting a position with conformers once.
    pub fn count_aas(&self) -> usize {
        self.aas.len()
    }

    pub fn set_r_value(&mut self, r_value: f64) {
        self.r_value = r_value;
    }

    pub fn set_r_free(&mut self, r_free: f64) {
        self.r_free = r_free;
    }

    pub fn set_rsrz(&mut self, rsrz: f64) {
        self.rsrz = rsrz;
    }

    pub fn set_data_completeness(&mut self, data_completeness: f64) {
        self.data_completeness = data_completeness;
    }

    pub fn set_twin_l(&mut self, twin_l: f64) {
        self.twin_l = twin_l;
    }

    pub fn set_twin_l2(&mut self, twin_l2: f64) {
        self.twin_l2 = twin_l2;
    }

    pub fn set_pdb_code(&mut self, pdb_code: &str) {
        self.pdb_code = Some(pdb_code.to_string());
    }

    // --- Queries ---

    /// Serials of residue atoms with the given element, in ascending order.
    pub fn find_atoms_by_element(&self, symbol: &str) -> Vec<usize> {
        self.aas
            .values()
            .flatten()
            .filter_map(|&id| self.residues.get(id))
            .flat_map(|residue| residue.atoms.iter().copied())
            .filter(|serial| self.atoms.get(serial).is_some_and(|a| a.is_element(symbol)))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn find_hetero_atoms_by_element(&self, symbol: &str) -> Vec<usize> {
        self.hetatms
            .keys()
            .copied()
            .filter(|serial| self.atoms.get(serial).is_some_and(|a| a.is_element(symbol)))
            .collect()
    }

    /// Positions holding at least one residue with the given three-letter code.
    pub fn find_residues_by_code(&self, code: &str) -> BTreeSet<(char, isize)> {
        let code = code.trim();
        self.aas
            .iter()
            .filter(|(_, ids)| {
                ids.iter()
                    .filter_map(|&id| self.residues.get(id))
                    .any(|residue| residue.name.eq_ignore_ascii_case(code))
            })
            .map(|(&position, _)| position)
            .collect()
    }

    /// Extracts one chain into a new, independent protein.
    ///
    /// The result holds the chain's residues (conformers included), its atoms, the
    /// heteroatoms tagged with the chain, the chain's missing residues and atoms, and
    /// the bond graph restricted to retained atoms. Entry metadata is copied. `self`
    /// is not modified; an unknown chain yields an empty protein with the metadata.
    pub fn get_chain_as_protein(&self, chain_id: char) -> Protein {
        let mut chain = Protein::new(Arc::clone(&self.tables));
        chain.r_value = self.r_value;
        chain.r_free = self.r_free;
        chain.data_completeness = self.data_completeness;
        chain.rsrz = self.rsrz;
        chain.twin_l = self.twin_l;
        chain.twin_l2 = self.twin_l2;
        chain.pdb_code = self.pdb_code.clone();

        let on_chain = |position: &(char, isize)| position.0 == chain_id;

        chain.aas = self
            .aas
            .iter()
            .filter(|(position, _)| on_chain(position))
            .map(|(&position, ids)| (position, ids.clone()))
            .collect();
        let retained: HashSet<ResidueId> = chain.aas.values().flatten().copied().collect();

        chain.residues = self.residues.clone();
        chain.residues.retain(|id, _| retained.contains(&id));
        if let Some(ids) = self.chains.get(&chain_id) {
            chain.chains.insert(chain_id, ids.clone());
        }
        chain.conformers = self
            .conformers
            .iter()
            .copied()
            .filter(|id| retained.contains(id))
            .collect();
        chain.atom_residue = self
            .atom_residue
            .iter()
            .filter(|(_, id)| retained.contains(*id))
            .map(|(&serial, &id)| (serial, id))
            .collect();
        chain.hetatms = self
            .hetatms
            .iter()
            .filter(|(_, hetero)| hetero.chain_id == chain_id)
            .map(|(&serial, hetero)| (serial, hetero.clone()))
            .collect();

        chain.atoms = chain
            .atom_residue
            .keys()
            .chain(chain.hetatms.keys())
            .filter_map(|serial| self.atoms.get(serial).map(|atom| (*serial, atom.clone())))
            .collect();

        chain.missing_atoms = self
            .missing_atoms
            .iter()
            .filter(|(position, _)| on_chain(position))
            .map(|(&position, atoms)| (position, atoms.clone()))
            .collect();
        chain.missing_aas = self
            .missing_aas
            .iter()
            .filter(|stub| stub.chain_id == chain_id)
            .cloned()
            .collect();

        chain.bonds = self
            .bonds
            .iter()
            .filter(|(serial, _)| chain.atoms.contains_key(*serial))
            .map(|(&serial, neighbors)| {
                let kept: BTreeSet<usize> = neighbors
                    .iter()
                    .copied()
                    .filter(|n| chain.atoms.contains_key(n))
                    .collect();
                (serial, kept)
            })
            .filter(|(_, neighbors)| !neighbors.is_empty())
            .collect();

        chain
    }

    /// The residue owning an atom; `None` for heteroatoms and unknown serials.
    pub fn get_residue_for_atom(&self, serial: usize) -> Option<ResidueId> {
        self.atom_residue.get(&serial).copied()
    }

    pub fn get_atom(&self, serial: usize) -> Option<&Atom> {
        self.atoms.get(&serial)
    }

    /// Serial of the first atom equal to `atom`, scanning in serial order.
    ///
    /// This is a linear scan; callers holding a serial should use it directly.
    pub fn get_index(&self, atom: &Atom) -> Option<usize> {
        self.atoms
            .iter()
            .find(|(_, candidate)| *candidate == atom)
            .map(|(&serial, _)| serial)
    }

    fn participates_in_bond(&self, serial: usize) -> bool {
        self.bonds.get(&serial).is_some_and(|n| !n.is_empty())
            || self.bonds.values().any(|n| n.contains(&serial))
    }

    /// Serials of heteroatoms that are metals and either fully occupied or bonded.
    ///
    /// The result is computed once per flag and cached until [`Self::clear_metal_cache`];
    /// mutators do not invalidate it.
    pub fn find_metal_atoms(&self, transition_metals_only: bool) -> &[usize] {
        let cell = if transition_metals_only {
            &self.metal_cache.transition_only
        } else {
            &self.metal_cache.all
        };
        cell.get_or_init(|| {
            self.hetatms
                .keys()
                .copied()
                .filter(|&serial| {
                    self.atoms.get(&serial).is_some_and(|atom| {
                        atom.is_metal(&self.tables, transition_metals_only)
                            && (atom.is_fully_occupied() || self.participates_in_bond(serial))
                    })
                })
                .collect()
        })
    }

    pub fn clear_metal_cache(&mut self) {
        self.metal_cache = MetalCache::default();
    }

    /// Residues owning an atom bonded to `serial`, in either direction of the bond graph.
    pub fn get_residues_bound_to(&self, serial: usize) -> Vec<ResidueId> {
        let forward = self.bonds.get(&serial).into_iter().flatten().copied();
        let backward = self
            .bonds
            .iter()
            .filter(|(_, neighbors)| neighbors.contains(&serial))
            .map(|(&key, _)| key);

        let mut bound = Vec::new();
        for neighbor in forward.chain(backward) {
            if let Some(id) = self.atom_residue.get(&neighbor).copied() {
                if !bound.contains(&id) {
                    bound.push(id);
                }
            }
        }
        bound
    }

    // --- Mutators ---

    /// Removes atoms from every container that references them.
    ///
    /// Residues left without atoms are removed from the arena, the position and chain
    /// lists and the conformer list; their chain neighbours are linked to each other.
    /// Serials that were stripped are removed from `serials`; unknown serials stay.
    pub fn strip_atoms(&mut self, serials: &mut HashSet<usize>) {
        let targets: BTreeSet<usize> = serials
            .iter()
            .copied()
            .filter(|serial| self.atoms.contains_key(serial))
            .collect();
        if targets.is_empty() {
            return;
        }

        let mut emptied = BTreeSet::new();
        for &serial in &targets {
            self.atoms.remove(&serial);
            self.hetatms.remove(&serial);
            if let Some(id) = self.atom_residue.remove(&serial) {
                if let Some(residue) = self.residues.get_mut(id) {
                    residue.remove_atom(serial);
                    if residue.atoms.is_empty() {
                        emptied.insert(id);
                    }
                }
            }
            serials.remove(&serial);
        }

        self.bonds.retain(|serial, _| !targets.contains(serial));
        for neighbors in self.bonds.values_mut() {
            neighbors.retain(|n| !targets.contains(n));
        }
        self.bonds.retain(|_, neighbors| !neighbors.is_empty());

        for id in emptied {
            self.remove_residue(id);
        }
        debug!(stripped = targets.len(), "Stripped atoms from protein");
    }

    fn remove_residue(&mut self, id: ResidueId) {
        let Some(residue) = self.residues.remove(id) else {
            return;
        };
        if let Some(prev) = residue.prev.and_then(|p| self.residues.get_mut(p)) {
            prev.next = residue.next;
        }
        if let Some(next) = residue.next.and_then(|n| self.residues.get_mut(n)) {
            next.prev = residue.prev;
        }

        let position = residue.position();
        if let Some(ids) = self.aas.get_mut(&position) {
            ids.retain(|&r| r != id);
            if ids.is_empty() {
                self.aas.remove(&position);
            }
        }
        if let Some(ids) = self.chains.get_mut(&residue.chain_id) {
            ids.retain(|&r| r != id);
            if ids.is_empty() {
                self.chains.remove(&residue.chain_id);
            }
        }
        self.conformers.retain(|&r| r != id);
    }

    /// Strips every heteroatom of the named molecule and returns how many were removed.
    pub fn strip_hetero_group(&mut self, molecule: &str) -> usize {
        let mut serials: HashSet<usize> = self
            .hetatms
            .iter()
            .filter(|(_, hetero)| hetero.belongs_to(molecule))
            .map(|(&serial, _)| serial)
            .collect();
        let requested = serials.len();
        self.strip_atoms(&mut serials);
        requested - serials.len()
    }

    pub fn freeze_atom(&mut self, serial: usize) -> Option<()> {
        let atom = self.atoms.get_mut(&serial)?;
        atom.frozen = true;
        Some(())
    }

    /// Freezes the given atoms, highest serial first, and returns how many were found.
    pub fn freeze_atoms(&mut self, serials: &[usize]) -> usize {
        let mut ordered = serials.to_vec();
        ordered.sort_unstable_by(|a, b| b.cmp(a));
        ordered
            .into_iter()
            .filter_map(|serial| self.freeze_atom(serial))
            .count()
    }

    /// Drops conformers whose occupancy is below one half, or exactly one half on an
    /// alternate location other than "A".
    ///
    /// The conformer selected for a position during parsing is exempt and always kept,
    /// even when its own occupancy is below one half (for example A 0.4, B 0.3, C 0.3
    /// keeps A). Every position therefore retains a residue.
    pub fn auto_choose_conformer(&mut self) -> &mut Self {
        let selected: HashSet<ResidueId> = self.chains.values().flatten().copied().collect();
        let rejected: Vec<ResidueId> = self
            .conformers
            .iter()
            .copied()
            .filter(|id| !selected.contains(id))
            .filter(|&id| {
                self.residues
                    .get(id)
                    .is_some_and(|residue| !residue.meets_occupancy_rule())
            })
            .collect();

        let mut serials: HashSet<usize> = rejected
            .iter()
            .filter_map(|&id| self.residues.get(id))
            .flat_map(|residue| residue.atoms.iter().copied())
            .collect();
        self.strip_atoms(&mut serials);
        self.conformers.retain(|id| !rejected.contains(id));

        debug!(rejected = rejected.len(), "Chose conformers by occupancy");
        self
    }

    /// Applies per-atom quality scores by serial.
    ///
    /// A partially occupied atom whose alternate partner has no row of its own shares
    /// its score with the next serial, or the previous one when no next atom exists.
    pub fn set_quality_scores(&mut self, table: &QualityScoreTable) {
        for row in table.rows() {
            let Some(atom) = self.atoms.get_mut(&row.serial) else {
                warn!(
                    serial = row.serial,
                    "Quality score refers to an absent atom (likely terminal oxygen)"
                );
                continue;
            };
            atom.quality_score = Some(row.score);
            if atom.is_fully_occupied() || table.contains(row.serial + 1) {
                continue;
            }
            let partner = if self.atoms.contains_key(&(row.serial + 1)) {
                Some(row.serial + 1)
            } else {
                row.serial.checked_sub(1)
            };
            if let Some(partner) = partner.and_then(|p| self.atoms.get_mut(&p)) {
                partner.quality_score = Some(row.score);
            }
        }
    }

    /// Copies whole-entry validation statistics, defaulting (with a warning) any value
    /// the report lacks.
    pub fn apply_validation_report(&mut self, report: &ValidationReport) {
        self.data_completeness = ValidationReport::value_or_default(
            report.data_completeness,
            DEFAULT_DATA_COMPLETENESS,
            "DataCompleteness",
        );
        self.rsrz = ValidationReport::value_or_default(
            report.rsrz_outliers_percent,
            DEFAULT_RSRZ,
            "percent-RSRZ-outliers",
        );
        self.twin_l = ValidationReport::value_or_default(report.twin_l, DEFAULT_TWIN_L, "TwinL");
        self.twin_l2 =
            ValidationReport::value_or_default(report.twin_l2, DEFAULT_TWIN_L2, "TwinL2");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::fixtures::{
        atom_line, conformer_pdb, metals_pdb, refinement_remarks, two_chain_pdb,
    };
    use crate::core::quality::scores::QualityScore;

    fn two_chains() -> Protein {
        Protein::from_pdb_text(&two_chain_pdb()).unwrap()
    }

    fn residue_names(protein: &Protein, chain_id: char) -> Vec<String> {
        protein
            .chain(chain_id)
            .unwrap_or(&[])
            .iter()
            .map(|&id| protein.residues[id].name.clone())
            .collect()
    }

    #[test]
    fn new_protein_has_documented_defaults() {
        let protein = Protein::default();
        assert_eq!(protein.r_value(), -1.0);
        assert_eq!(protein.r_free(), -1.0);
        assert_eq!(protein.data_completeness(), 0.0);
        assert_eq!(protein.rsrz(), 100.0);
        assert_eq!(protein.twin_l(), 0.0);
        assert_eq!(protein.twin_l2(), 0.0);
        assert!(protein.pdb_code().is_none());
        assert_eq!(protein.nchains(), 0);
        assert_eq!(protein.count_aas(), 0);
    }

    #[test]
    fn get_index_round_trips_every_atom() {
        let protein = two_chains();
        for (&serial, atom) in protein.atoms() {
            let index = protein.get_index(atom).unwrap();
            assert_eq!(protein.get_atom(index), Some(atom));
            assert_eq!(index, serial);
        }
    }

    #[test]
    fn every_atom_is_owned_by_a_residue_or_the_hetero_registry() {
        let protein = two_chains();
        for &serial in protein.atoms().keys() {
            let in_residue = protein.get_residue_for_atom(serial).is_some();
            let in_hetero = protein.hetatms().contains_key(&serial);
            assert!(in_residue ^ in_hetero, "atom {serial} ownership");
        }
    }

    #[test]
    fn find_atoms_by_element_covers_residue_atoms_only() {
        let protein = two_chains();
        let sulfur = protein.find_atoms_by_element("S");
        assert_eq!(sulfur, vec![24]);
        let oxygen = protein.find_atoms_by_element("o");
        assert!(!oxygen.contains(&25)); // water oxygen is a heteroatom
        assert_eq!(protein.find_hetero_atoms_by_element("O"), vec![25]);
        assert_eq!(protein.find_hetero_atoms_by_element("Zn"), vec![26]);
    }

    #[test]
    fn find_residues_by_code_lists_positions() {
        let protein = two_chains();
        let glycines: Vec<_> = protein.find_residues_by_code("GLY").into_iter().collect();
        assert_eq!(glycines, vec![('A', 1), ('B', 1)]);
        assert!(protein.find_residues_by_code("TRP").is_empty());
    }

    #[test]
    fn get_chain_as_protein_extracts_one_chain() {
        let protein = two_chains();
        let chain_a = protein.get_chain_as_protein('A');

        assert_eq!(chain_a.nchains(), 1);
        assert_eq!(chain_a.chain('A').map(<[_]>::len), Some(3));
        assert_eq!(chain_a.nhetatms(), 0);
        assert_eq!(chain_a.atoms().len(), 14);
        assert_eq!(chain_a.r_value(), protein.r_value());
        assert_eq!(chain_a.missing_aas().len(), 1);
        assert!(chain_a.missing_atoms().contains_key(&('A', 3)));
        assert!(
            chain_a
                .bonds()
                .iter()
                .all(|(k, v)| chain_a.atoms().contains_key(k)
                    && v.iter().all(|n| chain_a.atoms().contains_key(n)))
        );
    }

    #[test]
    fn get_chain_as_protein_leaves_source_untouched() {
        let protein = two_chains();
        let chain_b = protein.get_chain_as_protein('B');

        assert_eq!(chain_b.nhetatms(), 2);
        assert_eq!(residue_names(&chain_b, 'B'), vec!["GLY", "CYS"]);
        assert_eq!(protein.nhetatms(), 2);
        assert_eq!(protein.nchains(), 2);
        assert_eq!(protein.atoms().len(), 26);
    }

    #[test]
    fn get_chain_as_protein_for_unknown_chain_is_empty() {
        let protein = two_chains();
        let empty = protein.get_chain_as_protein('Z');
        assert_eq!(empty.nchains(), 0);
        assert!(empty.atoms().is_empty());
        assert_eq!(empty.r_free(), protein.r_free());
    }

    #[test]
    fn get_residue_for_atom_is_none_for_heteroatoms() {
        let protein = two_chains();
        let id = protein.get_residue_for_atom(6).unwrap();
        assert_eq!(protein.residues[id].name, "ALA");
        assert!(protein.get_residue_for_atom(26).is_none());
        assert!(protein.get_residue_for_atom(999).is_none());
    }

    #[test]
    fn strip_atoms_removes_emptied_residue_and_relinks_neighbors() {
        let mut protein = two_chains();
        let chain = protein.chain('A').unwrap().to_vec();
        let middle = chain[1];
        let mut serials: HashSet<usize> =
            protein.residues[middle].atoms().iter().copied().collect();
        serials.insert(999);

        protein.strip_atoms(&mut serials);

        assert_eq!(serials, HashSet::from([999]));
        assert_eq!(residue_names(&protein, 'A'), vec!["GLY", "SER"]);
        assert!(protein.residue(middle).is_none());
        assert!(!protein.aas().contains_key(&('A', 2)));
        assert_eq!(protein.residues[chain[0]].next(), Some(chain[2]));
        assert_eq!(protein.residues[chain[2]].prev(), Some(chain[0]));
        for serial in 5..=9 {
            assert!(protein.get_atom(serial).is_none());
            assert!(!protein.bonds().contains_key(&serial));
            assert!(protein.bonds().values().all(|n| !n.contains(&serial)));
        }
    }

    #[test]
    fn strip_atoms_partial_strip_keeps_remaining_atoms() {
        let mut protein = two_chains();
        let id = protein.get_residue_for_atom(24).unwrap();
        protein.strip_atoms(&mut HashSet::from([24]));

        assert_eq!(protein.residues[id].atoms(), &[19, 20, 21, 22, 23]);
        assert!(protein.residues[id].get_atom_by_name("SG").is_none());
    }

    #[test]
    fn strip_atoms_removes_chain_with_its_last_residue() {
        let mut protein = two_chains();
        let mut serials: HashSet<usize> = protein
            .chain('B')
            .unwrap()
            .iter()
            .flat_map(|&id| protein.residues[id].atoms().to_vec())
            .collect();
        protein.strip_atoms(&mut serials);

        assert!(protein.chain('B').is_none());
        assert_eq!(protein.nchains(), 1);
        assert_eq!(protein.nhetatms(), 2);
    }

    #[test]
    fn strip_hetero_group_removes_registry_atoms_and_bonds() {
        let mut protein = two_chains();
        assert_eq!(protein.strip_hetero_group("ZN"), 1);
        assert!(protein.get_atom(26).is_none());
        assert!(!protein.hetatms().contains_key(&26));
        assert!(!protein.bonds().contains_key(&26));
        assert_eq!(protein.nhetatms(), 1);
        assert_eq!(protein.strip_hetero_group("HEM"), 0);
    }

    #[test]
    fn freeze_atoms_counts_found_atoms() {
        let mut protein = two_chains();
        assert_eq!(protein.freeze_atom(1), Some(()));
        assert_eq!(protein.freeze_atom(999), None);
        assert_eq!(protein.freeze_atoms(&[2, 3, 999]), 2);
        assert!(protein.get_atom(1).unwrap().frozen);
        assert!(protein.get_atom(3).unwrap().frozen);
        assert!(!protein.get_atom(4).unwrap().frozen);
    }

    #[test]
    fn find_metal_atoms_requires_occupancy_or_bond() {
        let protein = Protein::from_pdb_text(&metals_pdb()).unwrap();
        // ZN full occupancy, FE half occupancy but bonded, CU half occupancy unbonded.
        assert_eq!(protein.find_metal_atoms(true), &[6, 7]);
        // NA is a metal but not a transition metal.
        assert_eq!(protein.find_metal_atoms(false), &[6, 7, 9]);
    }

    #[test]
    fn find_metal_atoms_cache_is_stale_until_cleared() {
        let mut protein = Protein::from_pdb_text(&metals_pdb()).unwrap();
        assert_eq!(protein.find_metal_atoms(true), &[6, 7]);

        protein.strip_atoms(&mut HashSet::from([6]));
        assert_eq!(protein.find_metal_atoms(true), &[6, 7]);

        protein.clear_metal_cache();
        assert_eq!(protein.find_metal_atoms(true), &[7]);
    }

    #[test]
    fn get_residues_bound_to_follows_conect_bonds() {
        let protein = Protein::from_pdb_text(&metals_pdb()).unwrap();
        let bound = protein.get_residues_bound_to(7);
        assert_eq!(bound.len(), 1);
        assert_eq!(protein.residues[bound[0]].name, "ALA");
        assert!(protein.get_residues_bound_to(8).is_empty());
    }

    #[test]
    fn get_residues_bound_to_sees_reverse_edges() {
        let protein = two_chains();
        // CONECT 24 26 records the bond from the cysteine side only.
        let bound = protein.get_residues_bound_to(26);
        assert_eq!(bound, vec![protein.get_residue_for_atom(24).unwrap()]);
    }

    #[test]
    fn auto_choose_conformer_strips_minor_conformer() {
        let mut protein = Protein::from_pdb_text(&conformer_pdb(('A', 0.6), ('B', 0.4))).unwrap();
        assert_eq!(protein.conformers().len(), 2);

        protein.auto_choose_conformer();

        assert_eq!(protein.conformers().len(), 1);
        assert!(protein.get_atom(7).is_none());
        assert!(protein.get_atom(8).is_none());
        let kept = protein.conformers()[0];
        assert_eq!(protein.residues[kept].alt_loc, Some('A'));
        assert_eq!(protein.aas()[&('A', 5)], vec![kept]);
    }

    #[test]
    fn auto_choose_conformer_keeps_alt_loc_a_on_tie() {
        let mut protein = Protein::from_pdb_text(&conformer_pdb(('A', 0.5), ('B', 0.5))).unwrap();
        protein.auto_choose_conformer();
        let kept: Vec<_> = protein
            .conformers()
            .iter()
            .map(|&id| protein.residues[id].alt_loc)
            .collect();
        assert_eq!(kept, vec![Some('A')]);
    }

    #[test]
    fn set_quality_scores_shares_score_with_alternate_partner() {
        let mut protein = Protein::from_pdb_text(&conformer_pdb(('A', 0.6), ('B', 0.4))).unwrap();
        let table = QualityScoreTable::from_rows([
            QualityScore { serial: 1, score: 0.9 },
            QualityScore { serial: 5, score: 0.7 },
            QualityScore { serial: 8, score: 0.3 },
            QualityScore { serial: 500, score: 0.1 },
        ]);
        protein.set_quality_scores(&table);

        assert_eq!(protein.get_atom(1).unwrap().quality_score, Some(0.9));
        assert_eq!(protein.get_atom(2).unwrap().quality_score, None);
        // CB A has no alternate row at serial 6, so OG A inherits its score.
        assert_eq!(protein.get_atom(6).unwrap().quality_score, Some(0.7));
        // OG B at serial 8 shares with serial 9, the next atom.
        assert_eq!(protein.get_atom(9).unwrap().quality_score, Some(0.3));
    }

    #[test]
    fn set_quality_scores_falls_back_to_previous_serial_at_end_of_file() {
        let mut lines = refinement_remarks("0.2", "0.25");
        lines.push(atom_line("ATOM", 1, "N", None, "GLY", 'A', 1, [0.0, 0.0, 0.0], 1.0, "N"));
        for (serial, alt_loc, x) in [(2, 'A', 5.0), (3, 'B', 5.5)] {
            let position = [x, 0.0, 0.0];
            lines.push(atom_line(
                "HETATM",
                serial,
                "FE",
                Some(alt_loc),
                "FE",
                'A',
                60,
                position,
                0.5,
                "FE",
            ));
        }
        let mut protein = Protein::from_pdb_text(&lines.join("\n")).unwrap();
        let table = QualityScoreTable::from_rows([QualityScore { serial: 3, score: 0.42 }]);
        protein.set_quality_scores(&table);

        assert_eq!(protein.get_atom(3).unwrap().quality_score, Some(0.42));
        assert_eq!(protein.get_atom(2).unwrap().quality_score, Some(0.42));
        assert_eq!(protein.get_atom(1).unwrap().quality_score, None);
    }

    #[test]
    fn apply_validation_report_defaults_missing_values() {
        let mut protein = Protein::default();
        protein.apply_validation_report(&ValidationReport {
            data_completeness: Some(97.5),
            rsrz_outliers_percent: None,
            twin_l: Some(0.48),
            twin_l2: None,
        });
        assert_eq!(protein.data_completeness(), 97.5);
        assert_eq!(protein.rsrz(), 100.0);
        assert_eq!(protein.twin_l(), 0.48);
        assert_eq!(protein.twin_l2(), 0.0);
    }

    #[test]
    fn setters_update_metadata() {
        let mut protein = Protein::default();
        protein.set_r_value(0.2);
        protein.set_r_free(0.25);
        protein.set_rsrz(3.0);
        protein.set_pdb_code("1os7");
        assert_eq!(protein.r_value(), 0.2);
        assert_eq!(protein.r_free(), 0.25);
        assert_eq!(protein.rsrz(), 3.0);
        assert_eq!(protein.pdb_code(), Some("1os7"));
    }
}
