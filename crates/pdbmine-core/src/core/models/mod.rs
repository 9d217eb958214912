//! # Core Models Module
//!
//! Data structures used to represent parsed macromolecular structures.
//!
//! - [`atom`] - Individual atom sites with coordinates and alternate location indicators
//! - [`residue`] - Residues (groups) and their atom sites
//! - [`chain`] - Chain organization and classification
//! - [`structure`] - A complete structure with all components
//! - [`ids`] - Unique identifier types for atoms, residues, and chains
//!
//! ```ignore
//! use pdbmine::core::models::{structure::Structure, atom::Atom, chain::ChainType};
//!
//! let mut structure = Structure::new("1ABC");
//! let chain_id = structure.add_chain('A', ChainType::Polymer);
//! let residue_id = structure.add_residue(chain_id, 1, "SER").unwrap();
//!
//! let atom = Atom::new("OG", residue_id, Point3::new(0.0, 0.0, 0.0)).with_alt_loc("A");
//! structure.add_atom_to_residue(residue_id, atom);
//! ```

pub mod atom;
pub mod chain;
pub mod ids;
pub mod residue;
pub mod structure;
