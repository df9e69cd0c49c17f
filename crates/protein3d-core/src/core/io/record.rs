use crate::core::models::atom::Atom;
use crate::core::utils::identifiers::{infer_element_from_name, normalize_element};
use nalgebra::Point3;
use thiserror::Error;

/// Minimum length of a coordinate record: everything up to the Z column.
const MIN_ATOM_RECORD_LEN: usize = 54;
const CONECT_FIELD_START: usize = 6;
const CONECT_FIELD_WIDTH: usize = 5;

#[derive(Debug, Error, PartialEq)]
pub enum RecordError {
    #[error("Line is too short for ATOM/HETATM record (must reach column 54)")]
    LineTooShort,
    #[error("Invalid integer for {field} in columns {columns} (value: '{value}')")]
    InvalidInt {
        field: &'static str,
        columns: &'static str,
        value: String,
    },
    #[error("Invalid float for {field} in columns {columns} (value: '{value}')")]
    InvalidFloat {
        field: &'static str,
        columns: &'static str,
        value: String,
    },
    #[error("Required field {field} in columns {columns} is empty")]
    MissingRequiredField {
        field: &'static str,
        columns: &'static str,
    },
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end.min(line.len())).unwrap_or("").trim()
}

fn column_char(line: &str, index: usize) -> Option<char> {
    line.get(index..index + 1)
        .and_then(|s| s.chars().next())
        .filter(|c| !c.is_whitespace())
}

fn parse_int<T: std::str::FromStr>(
    line: &str,
    start: usize,
    end: usize,
    field: &'static str,
    columns: &'static str,
) -> Result<T, RecordError> {
    let value = slice_and_trim(line, start, end);
    if value.is_empty() {
        return Err(RecordError::MissingRequiredField { field, columns });
    }
    value.parse().map_err(|_| RecordError::InvalidInt {
        field,
        columns,
        value: value.to_string(),
    })
}

fn parse_float(
    line: &str,
    start: usize,
    end: usize,
    field: &'static str,
    columns: &'static str,
    default: Option<f64>,
) -> Result<f64, RecordError> {
    let value = slice_and_trim(line, start, end);
    match (value.is_empty(), default) {
        (true, Some(default)) => Ok(default),
        (true, None) => Err(RecordError::MissingRequiredField { field, columns }),
        (false, _) => value.parse().map_err(|_| RecordError::InvalidFloat {
            field,
            columns,
            value: value.to_string(),
        }),
    }
}

/// A single `ATOM` or `HETATM` coordinate record.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomRecord {
    pub serial: usize,
    pub name: String,
    /// The untrimmed four-column name field, used for element inference.
    pub raw_name: String,
    pub alt_loc: Option<char>,
    pub residue_name: String,
    pub chain_id: char,
    pub residue_seq: isize,
    pub position: Point3<f64>,
    pub occupancy: f64,
    pub temperature_factor: f64,
    pub element: String,
}

impl AtomRecord {
    /// Parses a fixed-column coordinate record.
    ///
    /// Occupancy defaults to 1.0 and the temperature factor to 0.0 when their columns
    /// are blank or absent. A blank element column falls back to inference from the
    /// atom name field.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError`] when the line stops before the coordinates or a
    /// numeric field does not parse.
    pub fn parse(line: &str) -> Result<Self, RecordError> {
        if line.len() < MIN_ATOM_RECORD_LEN {
            return Err(RecordError::LineTooShort);
        }

        let serial = parse_int(line, 6, 11, "serial", "7-11")?;
        let raw_name = line.get(12..16).unwrap_or("").to_string();
        let name = raw_name.trim().to_string();
        if name.is_empty() {
            return Err(RecordError::MissingRequiredField {
                field: "name",
                columns: "13-16",
            });
        }
        let residue_seq = parse_int(line, 22, 26, "residue sequence", "23-26")?;
        let x = parse_float(line, 30, 38, "x", "31-38", None)?;
        let y = parse_float(line, 38, 46, "y", "39-46", None)?;
        let z = parse_float(line, 46, 54, "z", "47-54", None)?;
        let occupancy = parse_float(line, 54, 60, "occupancy", "55-60", Some(1.0))?;
        let temperature_factor =
            parse_float(line, 60, 66, "temperature factor", "61-66", Some(0.0))?;

        let element = match slice_and_trim(line, 76, 78) {
            "" => infer_element_from_name(&raw_name),
            symbol => normalize_element(symbol),
        };

        Ok(Self {
            serial,
            name,
            raw_name,
            alt_loc: column_char(line, 16),
            residue_name: slice_and_trim(line, 17, 20).to_string(),
            chain_id: column_char(line, 21).unwrap_or(' '),
            residue_seq,
            position: Point3::new(x, y, z),
            occupancy,
            temperature_factor,
            element,
        })
    }

    pub fn to_atom(&self) -> Atom {
        let mut atom = Atom::new(&self.name, &self.element, self.position)
            .with_occupancy(self.occupancy)
            .with_alt_loc(self.alt_loc);
        atom.temperature_factor = self.temperature_factor;
        atom
    }
}

/// One bonded-partner field of a `CONECT` record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConectTarget {
    Serial(usize),
    Blank,
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConectRecord {
    pub source: usize,
    pub targets: Vec<ConectTarget>,
}

impl ConectRecord {
    /// Parses a `CONECT` record into its source serial and partner fields.
    ///
    /// Partner fields are kept even when they do not parse, so the caller can decide
    /// how to report them.
    pub fn parse(line: &str) -> Result<Self, RecordError> {
        let source = parse_int(
            line,
            CONECT_FIELD_START,
            CONECT_FIELD_START + CONECT_FIELD_WIDTH,
            "bond source",
            "7-11",
        )?;

        let mut targets = Vec::new();
        let mut start = CONECT_FIELD_START + CONECT_FIELD_WIDTH;
        while start < line.len() {
            let field = slice_and_trim(line, start, start + CONECT_FIELD_WIDTH);
            targets.push(if field.is_empty() {
                ConectTarget::Blank
            } else {
                field
                    .parse()
                    .map(ConectTarget::Serial)
                    .unwrap_or_else(|_| ConectTarget::Malformed(field.to_string()))
            });
            start += CONECT_FIELD_WIDTH;
        }

        Ok(Self { source, targets })
    }

    pub fn partner_serials(&self) -> impl Iterator<Item = usize> + '_ {
        self.targets.iter().filter_map(|target| match target {
            ConectTarget::Serial(serial) => Some(*serial),
            _ => None,
        })
    }
}
