/// Registry entry of a heteroatom: the molecule it belongs to and its chain.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HeteroAtom {
    pub molecule: String, // Residue name of the hetero group (e.g., "HEM", "ZN", "HOH")
    pub chain_id: char,
}

impl HeteroAtom {
    pub fn new(molecule: &str, chain_id: char) -> Self {
        Self {
            molecule: molecule.to_string(),
            chain_id,
        }
    }

    pub fn belongs_to(&self, molecule: &str) -> bool {
        self.molecule == molecule
    }
}
