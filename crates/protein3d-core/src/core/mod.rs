//! # Core Module
//!
//! This module provides the building blocks of the library: the protein object model,
//! the PDB reader that populates it, and the chemistry and quality data it consults.
//!
//! ## Architecture
//!
//! - **Structure Representation** ([`models`]) - Atoms, residues, hetero entries and the
//!   protein aggregate
//! - **File I/O** ([`io`]) - Fixed-column record parsing, header remarks and the PDB reader
//! - **Chemical Knowledge** ([`chemistry`]) - Amino-acid and metal tables, residue bond templates
//! - **Quality Metadata** ([`quality`]) - Validation-report statistics and per-atom quality scores
//! - **Utilities** ([`utils`]) - Element symbol handling

pub mod chemistry;
pub mod io;
pub mod models;
pub mod quality;
pub mod utils;
