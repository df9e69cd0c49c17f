//! Externally supplied quality metadata for deposited structures.
//!
//! The values here come from validation services rather than from the coordinate
//! file itself: whole-entry statistics ([`validation`]) and per-atom electron-density
//! scores ([`scores`]). Fetching them is left to the caller; this module only models
//! and loads them so they can be applied to a [`Protein`](crate::core::models::protein::Protein).

pub mod scores;
pub mod validation;
