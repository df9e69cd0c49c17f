//! # protein3d
//!
//! A parser for macromolecular structure files in PDB format and an object model that
//! keeps a protein's atoms, residues, chains, hetero groups and bonds consistent while
//! it is queried and edited.
//!
//! ## Overview
//!
//! - **Reading.** [`core::io::pdb::PdbFile`] turns PDB text into a
//!   [`core::models::protein::Protein`], resolving alternate conformers, inferring
//!   residue bonds from standard atom names and honouring `CONECT` records.
//!
//! - **Querying.** The protein answers element, residue-code, metal-site and
//!   bound-residue queries, and can extract a single chain as an independent protein.
//!
//! - **Editing.** Stripping atoms or hetero groups, freezing atoms and choosing
//!   conformers cascade through every container the protein maintains.
//!
//! Chemistry knowledge (amino-acid codes, metal sets) is an explicit
//! [`core::chemistry::tables::ChemistryTables`] value injected into the reader.

pub mod core;
