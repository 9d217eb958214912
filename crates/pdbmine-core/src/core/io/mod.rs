//! Provides input functionality for macromolecular structure file formats.
//!
//! Readers populate a [`Structure`](crate::core::models::structure::Structure)
//! including the per-atom alternate location indicators consumed by the
//! structure filters.

pub mod pdb;
pub mod traits;
