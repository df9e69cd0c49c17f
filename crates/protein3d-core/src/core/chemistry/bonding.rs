use phf::{Map, phf_map};

/// Bonds shared by every amino acid, keyed by standard atom names.
static BACKBONE_BONDS: &[(&str, &str)] = &[
    ("N", "CA"),
    ("CA", "C"),
    ("C", "O"),
    ("C", "OXT"),
    ("CA", "CB"),
];

const ARG: &[(&str, &str)] = &[
    ("CB", "CG"),
    ("CG", "CD"),
    ("CD", "NE"),
    ("NE", "CZ"),
    ("CZ", "NH1"),
    ("CZ", "NH2"),
];
const ASN: &[(&str, &str)] = &[("CB", "CG"), ("CG", "OD1"), ("CG", "ND2")];
const ASP: &[(&str, &str)] = &[("CB", "CG"), ("CG", "OD1"), ("CG", "OD2")];
const CYS: &[(&str, &str)] = &[("CB", "SG")];
const GLN: &[(&str, &str)] = &[("CB", "CG"), ("CG", "CD"), ("CD", "OE1"), ("CD", "NE2")];
const GLU: &[(&str, &str)] = &[("CB", "CG"), ("CG", "CD"), ("CD", "OE1"), ("CD", "OE2")];
const HIS: &[(&str, &str)] = &[
    ("CB", "CG"),
    ("CG", "ND1"),
    ("CG", "CD2"),
    ("ND1", "CE1"),
    ("CD2", "NE2"),
    ("CE1", "NE2"),
];
const ILE: &[(&str, &str)] = &[("CB", "CG1"), ("CB", "CG2"), ("CG1", "CD1")];
const LEU: &[(&str, &str)] = &[("CB", "CG"), ("CG", "CD1"), ("CG", "CD2")];
const LYS: &[(&str, &str)] = &[("CB", "CG"), ("CG", "CD"), ("CD", "CE"), ("CE", "NZ")];
const MET: &[(&str, &str)] = &[("CB", "CG"), ("CG", "SD"), ("SD", "CE")];
const MSE: &[(&str, &str)] = &[("CB", "CG"), ("CG", "SE"), ("SE", "CE")];
const PHE: &[(&str, &str)] = &[
    ("CB", "CG"),
    ("CG", "CD1"),
    ("CG", "CD2"),
    ("CD1", "CE1"),
    ("CD2", "CE2"),
    ("CE1", "CZ"),
    ("CE2", "CZ"),
];
const PRO: &[(&str, &str)] = &[("CB", "CG"), ("CG", "CD"), ("CD", "N")];
const SER: &[(&str, &str)] = &[("CB", "OG")];
const THR: &[(&str, &str)] = &[("CB", "OG1"), ("CB", "CG2")];
const TRP: &[(&str, &str)] = &[
    ("CB", "CG"),
    ("CG", "CD1"),
    ("CG", "CD2"),
    ("CD1", "NE1"),
    ("NE1", "CE2"),
    ("CD2", "CE2"),
    ("CD2", "CE3"),
    ("CE2", "CZ2"),
    ("CE3", "CZ3"),
    ("CZ2", "CH2"),
    ("CZ3", "CH2"),
];
const TYR: &[(&str, &str)] = &[
    ("CB", "CG"),
    ("CG", "CD1"),
    ("CG", "CD2"),
    ("CD1", "CE1"),
    ("CD2", "CE2"),
    ("CE1", "CZ"),
    ("CE2", "CZ"),
    ("CZ", "OH"),
];
const VAL: &[(&str, &str)] = &[("CB", "CG1"), ("CB", "CG2")];

static SIDECHAIN_BONDS: Map<&'static str, &'static [(&'static str, &'static str)]> = phf_map! {
    "ARG" => ARG,
    "ASN" => ASN,
    "ASP" => ASP, "ASH" => ASP,
    "CYS" => CYS, "CYX" => CYS,
    "GLN" => GLN,
    "GLU" => GLU, "GLH" => GLU,
    "HIS" => HIS, "HID" => HIS, "HIE" => HIS, "HIP" => HIS,
    "HSD" => HIS, "HSE" => HIS, "HSP" => HIS,
    "ILE" => ILE,
    "LEU" => LEU,
    "LYS" => LYS, "LYN" => LYS,
    "MET" => MET,
    "MSE" => MSE,
    "PHE" => PHE,
    "PRO" => PRO,
    "SER" => SER,
    "THR" => THR,
    "TRP" => TRP,
    "TYR" => TYR,
    "VAL" => VAL,
};

/// Returns the standard-name bond template of a residue: backbone bonds followed
/// by its side-chain bonds. Unknown residue names get the backbone only.
pub fn template_bonds(residue_name: &str) -> impl Iterator<Item = (&'static str, &'static str)> {
    let sidechain = SIDECHAIN_BONDS
        .get(residue_name.trim())
        .copied()
        .unwrap_or(&[]);
    BACKBONE_BONDS.iter().chain(sidechain.iter()).copied()
}

/// Atom names forming the peptide bond between a residue and its successor.
pub const PEPTIDE_CARBON: &str = "C";
pub const PEPTIDE_NITROGEN: &str = "N";
