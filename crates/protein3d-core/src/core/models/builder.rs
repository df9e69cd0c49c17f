use super::atom::MissingAtom;
use super::hetero::HeteroAtom;
use super::ids::ResidueId;
use super::protein::Protein;
use super::residue::{Residue, ResidueKey, ResidueStub};
use crate::core::chemistry::bonding::{PEPTIDE_CARBON, PEPTIDE_NITROGEN};
use crate::core::chemistry::tables::ChemistryTables;
use crate::core::io::header::RefinementValues;
use crate::core::io::record::{AtomRecord, ConectRecord, ConectTarget};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("Duplicate atom serial: {0}")]
    DuplicateSerial(usize),
}

/// Accumulates parsed records and assembles them into a consistent [`Protein`].
///
/// Residues are keyed by (chain, sequence, alternate location) while records arrive;
/// conformer selection, bond inference, backbone linking and `CONECT` bonds are
/// resolved once in [`ProteinBuilder::build`], after every atom is known.
pub struct ProteinBuilder {
    protein: Protein,

    // --- Residue lookup and deferred records ---
    residue_keys: HashMap<ResidueKey, ResidueId>,
    pending_conects: Vec<ConectRecord>,
}

impl Default for ProteinBuilder {
    fn default() -> Self {
        Self::new(Arc::new(ChemistryTables::default()))
    }
}

impl ProteinBuilder {
    pub fn new(tables: Arc<ChemistryTables>) -> Self {
        Self {
            protein: Protein::new(tables),
            residue_keys: HashMap::new(),
            pending_conects: Vec::new(),
        }
    }

    pub fn tables(&self) -> &ChemistryTables {
        self.protein.tables()
    }

    pub fn refinement(&mut self, values: RefinementValues) -> &mut Self {
        self.protein.set_r_value(values.r_value);
        self.protein.set_r_free(values.r_free);
        self
    }

    pub fn missing_residues(&mut self, stubs: Vec<ResidueStub>) -> &mut Self {
        self.protein.missing_aas = stubs;
        self
    }

    pub fn missing_atoms(&mut self, atoms: BTreeMap<(char, isize), Vec<MissingAtom>>) -> &mut Self {
        self.protein.missing_atoms = atoms;
        self
    }

    fn check_serial(&self, serial: usize) -> Result<(), BuildError> {
        if self.protein.atoms.contains_key(&serial) {
            Err(BuildError::DuplicateSerial(serial))
        } else {
            Ok(())
        }
    }

    /// Adds an atom to the residue identified by the record's chain, sequence number
    /// and alternate location, creating the residue on first sight.
    pub fn add_residue_atom(
        &mut self,
        record: &AtomRecord,
        from_hetero_record: bool,
    ) -> Result<&mut Self, BuildError> {
        self.check_serial(record.serial)?;

        let key = ResidueKey {
            chain_id: record.chain_id,
            sequence_id: record.residue_seq,
            alt_loc: record.alt_loc,
        };
        let protein = &mut self.protein;
        let id = *self.residue_keys.entry(key).or_insert_with(|| {
            let mut residue = Residue::new(
                &record.residue_name,
                key.chain_id,
                key.sequence_id,
                key.alt_loc,
                record.occupancy,
            );
            residue.from_hetero_record = from_hetero_record;
            let id = protein.residues.insert(residue);
            protein.aas.entry(key.position()).or_default().push(id);
            if key.alt_loc.is_some() {
                protein.conformers.push(id);
            }
            id
        });

        protein.residues[id].add_atom(&record.name, record.serial);
        protein.atom_residue.insert(record.serial, id);
        protein.atoms.insert(record.serial, record.to_atom());
        Ok(self)
    }

    /// Registers a heteroatom. A record that repeats an already registered heteroatom
    /// exactly is skipped; a serial reused for a different atom is an error.
    pub fn add_hetero_atom(&mut self, record: &AtomRecord) -> Result<&mut Self, BuildError> {
        let entry = HeteroAtom::new(&record.residue_name, record.chain_id);
        if self.protein.hetatms.get(&record.serial) == Some(&entry)
            && self.protein.atoms.get(&record.serial) == Some(&record.to_atom())
        {
            warn!(
                serial = record.serial,
                molecule = %entry.molecule,
                "Skipping repeated HETATM record"
            );
            return Ok(self);
        }
        self.check_serial(record.serial)?;
        self.protein.hetatms.insert(record.serial, entry);
        self.protein.atoms.insert(record.serial, record.to_atom());
        Ok(self)
    }

    /// Queues a `CONECT` record; its bonds are applied after all atoms are registered.
    pub fn add_conect(&mut self, record: ConectRecord) -> &mut Self {
        self.pending_conects.push(record);
        self
    }

    pub fn build(mut self) -> Protein {
        let selected = self.resolve_conformers();
        self.assemble_chains(&selected);
        self.apply_template_bonds();
        self.link_chains();
        self.apply_conects();

        let protein = self.protein;
        info!(
            atoms = protein.atoms.len(),
            residues = protein.residues.len(),
            chains = protein.chains.len(),
            conformers = protein.conformers.len(),
            hetero_atoms = protein.hetatms.len(),
            "Assembled protein structure."
        );
        protein
    }

    /// Picks one conformer per position and folds the position's shared atoms into it.
    ///
    /// Conformers of a position are compared in creation order; a later conformer
    /// replaces the current pick only with strictly higher occupancy.
    fn resolve_conformers(&mut self) -> HashMap<(char, isize), ResidueId> {
        let protein = &mut self.protein;

        let mut groups: BTreeMap<(char, isize), Vec<ResidueId>> = BTreeMap::new();
        for &id in &protein.conformers {
            groups
                .entry(protein.residues[id].position())
                .or_default()
                .push(id);
        }

        let mut selected = HashMap::new();
        for (position, group) in groups {
            let Some(kept) = group.into_iter().reduce(|kept, candidate| {
                if protein.residues[kept].occupancy >= protein.residues[candidate].occupancy {
                    kept
                } else {
                    candidate
                }
            }) else {
                continue;
            };

            let shared = protein.aas.get(&position).and_then(|ids| {
                ids.iter()
                    .copied()
                    .find(|&id| protein.residues[id].alt_loc.is_none())
            });
            if let Some(shared) = shared {
                if let Some(shared_residue) = protein.residues.remove(shared) {
                    for &serial in &shared_residue.atoms {
                        if let Some(atom) = protein.atoms.get(&serial) {
                            protein.residues[kept].add_atom(&atom.name, serial);
                        }
                        protein.atom_residue.insert(serial, kept);
                    }
                    protein.residues[kept].sort_atoms();
                }
                if let Some(ids) = protein.aas.get_mut(&position) {
                    ids.retain(|&id| id != shared);
                }
            }
            selected.insert(position, kept);
        }
        selected
    }

    fn assemble_chains(&mut self, selected: &HashMap<(char, isize), ResidueId>) {
        let protein = &mut self.protein;
        for (position, ids) in &protein.aas {
            let chosen = selected.get(position).or_else(|| ids.first());
            if let Some(&id) = chosen {
                protein.chains.entry(position.0).or_default().push(id);
            }
        }
    }

    fn apply_template_bonds(&mut self) {
        let protein = &mut self.protein;
        for (_, residue) in protein.residues.iter_mut() {
            residue.set_bonds();
            for (&atom, neighbors) in &residue.bonds {
                protein
                    .bonds
                    .entry(atom)
                    .or_default()
                    .extend(neighbors.iter().copied());
            }
        }
    }

    fn link_chains(&mut self) {
        let protein = &mut self.protein;
        for ids in protein.chains.values() {
            for pair in ids.windows(2) {
                let (current, next) = (pair[0], pair[1]);
                protein.residues[current].next = Some(next);
                protein.residues[next].prev = Some(current);

                let carbon = protein.residues[current].get_atom_by_name(PEPTIDE_CARBON);
                let nitrogen = protein.residues[next].get_atom_by_name(PEPTIDE_NITROGEN);
                if let (Some(c), Some(n)) = (carbon, nitrogen) {
                    protein.bonds.entry(c).or_default().insert(n);
                    protein.bonds.entry(n).or_default().insert(c);
                }
            }
        }
    }

    fn apply_conects(&mut self) {
        let protein = &mut self.protein;
        for record in self.pending_conects.drain(..) {
            if !protein.atoms.contains_key(&record.source) {
                warn!(
                    serial = record.source,
                    "CONECT record refers to an absent atom; skipping."
                );
                continue;
            }
            for target in record.targets {
                match target {
                    ConectTarget::Serial(partner) if partner == record.source => {}
                    ConectTarget::Serial(partner) if protein.atoms.contains_key(&partner) => {
                        protein.bonds.entry(record.source).or_default().insert(partner);
                    }
                    ConectTarget::Serial(partner) => warn!(
                        serial = record.source,
                        partner, "CONECT partner not found (likely terminal oxygen); skipping."
                    ),
                    ConectTarget::Malformed(field) => warn!(
                        serial = record.source,
                        field = field.as_str(),
                        "CONECT partner field is not a serial; skipping."
                    ),
                    ConectTarget::Blank => {}
                }
            }
        }
    }
}
