//! # Core Models Module
//!
//! This module contains the data structures used to represent a parsed protein
//! structure and the builder that assembles them.
//!
//! ## Overview
//!
//! The [`protein::Protein`] aggregate owns one table of atoms keyed by file serial and
//! a slotmap arena of residues. Every other container (chains, conformers, the hetero
//! registry, the bond graph) refers to atoms by serial and to residues by
//! [`ids::ResidueId`], so edits made through the aggregate's mutators stay consistent
//! across all of them.
//!
//! ## Key Components
//!
//! - [`atom`] - Atoms with crystallographic metadata, and documented-missing atoms
//! - [`residue`] - Amino-acid residues with neighbour links and template bonds
//! - [`hetero`] - Hetero registry entries (ligands, waters, metal ions)
//! - [`protein`] - The aggregate with its queries and mutators
//! - [`builder`] - Incremental construction, conformer resolution and bond assembly
//! - [`ids`] - Arena handles
//!
//! ## Usage
//!
//! ```ignore
//! use protein3d::core::models::protein::Protein;
//!
//! let mut protein = Protein::from_pdb_text(&text)?;
//! protein.auto_choose_conformer();
//! let chain_a = protein.get_chain_as_protein('A');
//! let metals = protein.find_metal_atoms(true);
//! ```

pub mod atom;
pub mod builder;
pub mod hetero;
pub mod ids;
pub mod protein;
pub mod residue;
