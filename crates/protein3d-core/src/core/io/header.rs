use crate::core::models::atom::MissingAtom;
use crate::core::models::residue::ResidueStub;
use std::borrow::Cow;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

pub const R_WORKING_SET_LABEL: &str = "R VALUE            (WORKING SET)";
pub const R_NO_CUTOFF_LABEL: &str = "R VALUE          (WORKING SET, NO CUTOFF)";
pub const MISSING_RESIDUES_LABEL: &str = "M RES C SSSEQI";
pub const MISSING_ATOMS_LABEL: &str = "M RES CSSEQI  ATOMS";

/// R value recorded when the header reports `NULL`.
pub const NULL_R_VALUE: f64 = -100.0;
/// R-free value recorded when the header reports `NULL`.
pub const NULL_R_FREE: f64 = 100.0;

const NULL_TOKEN: &str = "NULL";

#[derive(Debug, Error, PartialEq)]
pub enum HeaderError {
    #[error("No refinement statistics found (no R VALUE (WORKING SET) remark)")]
    MissingRefinement,
    #[error("Malformed refinement statistics after '{label}': token {token} is {found:?}")]
    MalformedRefinement {
        label: &'static str,
        token: usize,
        found: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefinementValues {
    pub r_value: f64,
    pub r_free: f64,
}

/// Splits raw file text into lines.
///
/// Text holding a real newline before its trailing line terminators is split on
/// newlines. Otherwise it is treated as an escaped single-line payload: the literal
/// two-character sequence `\n` separates lines and `\'` is unescaped to `'`.
pub fn split_lines(text: &str) -> Vec<Cow<'_, str>> {
    let body = text.trim_end_matches(['\n', '\r']);
    if body.contains('\n') {
        text.lines().map(Cow::Borrowed).collect()
    } else {
        body.split("\\n")
            .map(|line| {
                if line.contains("\\'") {
                    Cow::Owned(line.replace("\\'", "'"))
                } else {
                    Cow::Borrowed(line)
                }
            })
            .collect()
    }
}

fn refinement_value(
    tokens: &[&str],
    index: usize,
    label: &'static str,
    null_value: f64,
) -> Result<f64, HeaderError> {
    let malformed = |found: Option<&str>| HeaderError::MalformedRefinement {
        label,
        token: index,
        found: found.map(str::to_string),
    };
    match tokens.get(index).copied() {
        Some(NULL_TOKEN) => Ok(null_value),
        Some(token) => token.parse().map_err(|_| malformed(Some(token))),
        None => Err(malformed(None)),
    }
}

/// Reads the working-set R and R-free values from the refinement remarks.
///
/// The last occurrence of the working-set label wins; the no-cutoff label is only
/// consulted when the working-set label is absent. Tokens are counted across line
/// boundaries starting right after the label. Returns `Ok(None)` when neither label
/// is present.
pub fn parse_refinement<S: AsRef<str>>(
    lines: &[S],
) -> Result<Option<RefinementValues>, HeaderError> {
    const LABELS: [(&str, usize); 2] = [(R_WORKING_SET_LABEL, 8), (R_NO_CUTOFF_LABEL, 10)];

    for (label, r_free_index) in LABELS {
        let Some((line_idx, column)) = lines
            .iter()
            .enumerate()
            .rev()
            .find_map(|(i, line)| line.as_ref().rfind(label).map(|col| (i, col)))
        else {
            continue;
        };

        let first = &lines[line_idx].as_ref()[column + label.len()..];
        let tokens: Vec<&str> = std::iter::once(first)
            .chain(lines[line_idx + 1..].iter().map(|l| l.as_ref()))
            .flat_map(str::split_whitespace)
            .take(r_free_index + 1)
            .collect();

        let r_value = refinement_value(&tokens, 1, label, NULL_R_VALUE)?;
        let r_free = refinement_value(&tokens, r_free_index, label, NULL_R_FREE)?;
        return Ok(Some(RefinementValues { r_value, r_free }));
    }
    Ok(None)
}

/// Yields the body lines of the remark block introduced by `label`, with the shared
/// remark prefix removed. The block ends at the first line without that prefix.
fn remark_block<'a, S: AsRef<str>>(
    lines: &'a [S],
    label: &str,
) -> impl Iterator<Item = &'a str> {
    let start = lines
        .iter()
        .enumerate()
        .find_map(|(i, line)| line.as_ref().find(label).map(|col| (i, col)));

    let (block, prefix): (&'a [S], &'a str) = match start {
        Some((i, col)) => (&lines[i + 1..], &lines[i].as_ref()[..col]),
        None => (&lines[..0], ""),
    };
    block
        .iter()
        .map(|line| line.as_ref())
        .take_while(move |line| !prefix.is_empty() && line.starts_with(prefix))
        .map(move |line| &line[prefix.len()..])
}

/// Splits a chain/sequence pair whose fields may be fused (`"A1234"`).
fn chain_and_sequence<'a>(tokens: &mut impl Iterator<Item = &'a str>) -> Option<(char, isize)> {
    let chain_token = tokens.next()?;
    let mut chars = chain_token.chars();
    let chain_id = chars.next()?;
    let rest = chars.as_str();
    let sequence = if rest.is_empty() {
        tokens.next()?.parse().ok()?
    } else {
        rest.parse().ok()?
    };
    Some((chain_id, sequence))
}

pub fn parse_missing_residues<S: AsRef<str>>(lines: &[S]) -> Vec<ResidueStub> {
    remark_block(lines, MISSING_RESIDUES_LABEL)
        .filter_map(|body| {
            let mut tokens = body.split_whitespace();
            let parsed = tokens
                .next()
                .zip(chain_and_sequence(&mut tokens))
                .map(|(name, (chain, seq))| ResidueStub::new(name, chain, seq));
            if parsed.is_none() {
                debug!(line = body, "Skipping unreadable missing-residue remark");
            }
            parsed
        })
        .collect()
}

pub fn parse_missing_atoms<S: AsRef<str>>(
    lines: &[S],
) -> BTreeMap<(char, isize), Vec<MissingAtom>> {
    let mut missing = BTreeMap::new();
    for body in remark_block(lines, MISSING_ATOMS_LABEL) {
        let mut tokens = body.split_whitespace();
        let Some(position) = tokens.next().and_then(|_| chain_and_sequence(&mut tokens)) else {
            debug!(line = body, "Skipping unreadable missing-atom remark");
            continue;
        };
        let entry: &mut Vec<MissingAtom> = missing.entry(position).or_default();
        entry.extend(tokens.filter_map(MissingAtom::from_name));
    }
    missing
}
