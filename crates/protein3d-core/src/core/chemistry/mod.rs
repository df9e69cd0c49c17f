//! # Chemistry Module
//!
//! This module holds the chemical knowledge the structure builder and the protein
//! aggregate consult while classifying records and inferring connectivity.
//!
//! ## Overview
//!
//! Instead of ambient global tables, every consumer receives an explicit
//! [`tables::ChemistryTables`] instance. The defaults cover the twenty standard amino
//! acids plus common deposited variants, and the periodic-table metal sets; a TOML
//! file can replace any of the lists.
//!
//! ## Key Components
//!
//! - [`tables`] - Amino-acid codes and metal sets, loadable from TOML
//! - [`bonding`] - Standard-name bond templates for amino-acid residues
//!
//! ## Usage
//!
//! ```ignore
//! use protein3d::core::chemistry::tables::ChemistryTables;
//!
//! let tables = ChemistryTables::load(Path::new("chemistry.toml"))?;
//! assert!(tables.is_metal("Fe", true));
//! ```

pub mod bonding;
pub mod tables;
