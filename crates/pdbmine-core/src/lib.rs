//! # pdbmine Core Library
//!
//! Mining of macromolecular structures and PDB annotation reports.
//!
//! ## Architecture
//!
//! - **[`core`]: Structures.** The slotmap-backed [`Structure`](core::models::structure::Structure)
//!   model, the PDB reader and the structure filters such as
//!   [`ContainsAlternativeLocations`](core::filters::ContainsAlternativeLocations).
//!
//! - **[`dataset`]: Annotation tables.** Typed values, schemas, tables and the
//!   CSV custom report reader.
//!
//! - **[`query`]: Conditions.** An expression builder and a small SQL dialect
//!   that compile to the same tree, evaluated with three-valued logic.
//!
//! - **[`session`]: Execution.** An explicit session handle owning a worker
//!   pool and a catalog of temporary views.
//!
//! - **[`workflows`]: The Public API.** End-to-end procedures built on the
//!   layers above, reporting progress through [`engine::progress`].

pub mod core;
pub mod dataset;
pub mod engine;
pub mod query;
pub mod session;
pub mod workflows;
