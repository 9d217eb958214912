//! # Core Module
//!
//! Structure-level building blocks of pdbmine.
//!
//! ## Overview
//!
//! - **Structure Representation** ([`models`]) - Atoms, residues, chains, and whole structures
//! - **File I/O** ([`io`]) - Readers that populate structures from PDB files
//! - **Structure Filters** ([`filters`]) - Predicates that decide which structures are kept
//!
//! Filters depend on capability traits rather than on [`models::structure::Structure`]
//! itself, so the same filter applies to any structure-like record that can
//! expose the data it inspects.

pub mod filters;
pub mod io;
pub mod models;
