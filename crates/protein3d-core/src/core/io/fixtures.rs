use super::header::{MISSING_ATOMS_LABEL, MISSING_RESIDUES_LABEL, R_WORKING_SET_LABEL};

#[allow(clippy::too_many_arguments)]
pub(crate) fn atom_line(
    record: &str,
    serial: usize,
    name: &str,
    alt_loc: Option<char>,
    residue: &str,
    chain: char,
    seq: isize,
    xyz: [f64; 3],
    occupancy: f64,
    element: &str,
) -> String {
    let padded_name = if element.len() == 1 && name.len() < 4 {
        format!(" {:<3}", name)
    } else {
        format!("{:<4}", name)
    };
    format!(
        "{:<6}{:>5} {}{}{:>3} {}{:>4}    {:>8.3}{:>8.3}{:>8.3}{:>6.2}{:>6.2}          {:>2}",
        record,
        serial,
        padded_name,
        alt_loc.unwrap_or(' '),
        residue,
        chain,
        seq,
        xyz[0],
        xyz[1],
        xyz[2],
        occupancy,
        20.0,
        element
    )
}

pub(crate) fn conect_line(source: usize, partners: &[usize]) -> String {
    let mut line = format!("CONECT{:>5}", source);
    for partner in partners {
        line.push_str(&format!("{:>5}", partner));
    }
    line
}

pub(crate) fn refinement_remarks(r_value: &str, r_free: &str) -> Vec<String> {
    vec![
        "REMARK   3  FIT TO DATA USED IN REFINEMENT.".to_string(),
        format!("REMARK   3   {}  : {}", R_WORKING_SET_LABEL, r_value),
        format!("REMARK   3   FREE R VALUE                     : {}", r_free),
    ]
}

/// Appends the backbone (and optional extra side-chain atoms) of one residue.
fn residue_lines(
    lines: &mut Vec<String>,
    serial: &mut usize,
    residue: &str,
    chain: char,
    seq: isize,
    extra: &[(&str, &str)],
) {
    let backbone = [("N", "N"), ("CA", "C"), ("C", "C"), ("O", "O")];
    for (i, (name, element)) in backbone.iter().chain(extra.iter()).enumerate() {
        let x = seq as f64 * 3.8 + i as f64 * 0.5;
        let position = [x, chain as u32 as f64, -1.0];
        lines.push(atom_line(
            "ATOM", *serial, name, None, residue, chain, seq, position, 1.0, element,
        ));
        *serial += 1;
    }
}

fn hetatm(
    serial: usize,
    name: &str,
    residue: &str,
    chain: char,
    seq: isize,
    occupancy: f64,
    element: &str,
) -> String {
    let position = [10.0, 10.0, serial as f64];
    atom_line(
        "HETATM", serial, name, None, residue, chain, seq, position, occupancy, element,
    )
}

/// Chain A: GLY 1, ALA 2, SER 3 (OG missing), serials 1-14.
/// Chain B: GLY 1, CYS 2, serials 15-24; water 25 and zinc 26 bonded to SG 24.
pub(crate) fn two_chain_pdb() -> String {
    let mut lines =
        vec!["HEADER    HYDROLASE                               01-JAN-00   1ABC".to_string()];
    lines.extend(refinement_remarks("0.191", "0.225"));
    lines.push("REMARK 465 MISSING RESIDUES".to_string());
    lines.push(format!("REMARK 465   {}", MISSING_RESIDUES_LABEL));
    lines.push("REMARK 465     MET A     0".to_string());
    lines.push("REMARK 470 MISSING ATOM".to_string());
    lines.push(format!("REMARK 470   {}", MISSING_ATOMS_LABEL));
    lines.push("REMARK 470     SER A   3    OG".to_string());

    let mut serial = 1;
    residue_lines(&mut lines, &mut serial, "GLY", 'A', 1, &[]);
    residue_lines(&mut lines, &mut serial, "ALA", 'A', 2, &[("CB", "C")]);
    residue_lines(&mut lines, &mut serial, "SER", 'A', 3, &[("CB", "C")]);
    lines.push("TER".to_string());
    residue_lines(&mut lines, &mut serial, "GLY", 'B', 1, &[]);
    residue_lines(&mut lines, &mut serial, "CYS", 'B', 2, &[("CB", "C"), ("SG", "S")]);
    lines.push("TER".to_string());
    lines.push(hetatm(25, "O", "HOH", 'B', 101, 1.0, "O"));
    lines.push(hetatm(26, "ZN", "ZN", 'B', 201, 1.0, "ZN"));
    lines.push(conect_line(24, &[26]));
    lines.push("END".to_string());
    lines.join("\n")
}

/// SER A 5 with shared backbone serials 1-4, conformer CB/OG pairs at 5-6 and 7-8,
/// followed by GLY A 6 at serials 9-12.
pub(crate) fn conformer_pdb(first: (char, f64), second: (char, f64)) -> String {
    let mut lines = refinement_remarks("0.200", "0.240");
    let mut serial = 1;
    residue_lines(&mut lines, &mut serial, "SER", 'A', 5, &[]);
    for (alt_loc, occupancy) in [first, second] {
        for (name, element) in [("CB", "C"), ("OG", "O")] {
            lines.push(atom_line(
                "ATOM",
                serial,
                name,
                Some(alt_loc),
                "SER",
                'A',
                5,
                [20.0, serial as f64, 0.0],
                occupancy,
                element,
            ));
            serial += 1;
        }
    }
    residue_lines(&mut lines, &mut serial, "GLY", 'A', 6, &[]);
    lines.push("END".to_string());
    lines.join("\n")
}

/// ALA A 1 (serials 1-5) with metal heteroatoms: ZN 6 (full occupancy), FE 7 (half,
/// bonded to CA), CU 8 (half, unbonded), NA 9 (full) and water 10.
pub(crate) fn metals_pdb() -> String {
    let mut lines = refinement_remarks("0.180", "0.210");
    let mut serial = 1;
    residue_lines(&mut lines, &mut serial, "ALA", 'A', 1, &[("CB", "C")]);
    lines.push(hetatm(6, "ZN", "ZN", 'A', 101, 1.0, "ZN"));
    lines.push(hetatm(7, "FE", "FE", 'A', 102, 0.5, "FE"));
    lines.push(hetatm(8, "CU", "CU", 'A', 103, 0.5, "CU"));
    lines.push(hetatm(9, "NA", "NA", 'A', 104, 1.0, "NA"));
    lines.push(hetatm(10, "O", "HOH", 'A', 105, 1.0, "O"));
    lines.push(conect_line(7, &[2]));
    lines.push("END".to_string());
    lines.join("\n")
}

/// ALA A 1 (serials 1-5), a selenomethionine deposited as HETATM records at A 2
/// (serials 6-13) and a water at 14.
pub(crate) fn fake_amino_acid_pdb() -> String {
    let mut lines = refinement_remarks("0.190", "0.230");
    let mut serial = 1;
    residue_lines(&mut lines, &mut serial, "ALA", 'A', 1, &[("CB", "C")]);
    for (name, element) in [
        ("N", "N"),
        ("CA", "C"),
        ("C", "C"),
        ("O", "O"),
        ("CB", "C"),
        ("CG", "C"),
        ("SE", "SE"),
        ("CE", "C"),
    ] {
        lines.push(hetatm(serial, name, "MSE", 'A', 2, 1.0, element));
        serial += 1;
    }
    lines.push(hetatm(14, "O", "HOH", 'A', 301, 1.0, "O"));
    lines.push("END".to_string());
    lines.join("\n")
}
