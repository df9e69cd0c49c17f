use slotmap::new_key_type;

new_key_type! {
    /// Stable handle of a residue in the protein's residue arena.
    pub struct ResidueId;
}
