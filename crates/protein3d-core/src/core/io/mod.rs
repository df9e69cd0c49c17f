//! Provides input functionality for macromolecular structure files.
//!
//! Reading is split into stateless fixed-column record parsing ([`record`]), header
//! remark extraction ([`header`]) and the PDB reader that drives the
//! [`ProteinBuilder`](crate::core::models::builder::ProteinBuilder) ([`pdb`]). All
//! formats share the [`traits::StructureFile`] interface.

#[cfg(test)]
pub(crate) mod fixtures;
pub mod header;
pub mod pdb;
pub mod record;
pub mod traits;
