//! # Workflows Module
//!
//! High-level entry points that tie a [`Session`](crate::session::Session),
//! an annotation source and the query layer together.
//!
//! - **Custom report** ([`custom_report`]) retrieves selected report columns
//!   for every PDB entry and filters them twice, once with an expression tree
//!   and once with SQL over a temporary view, checking that both agree.
//!
//! Workflows report their phases through
//! [`ProgressReporter`](crate::engine::progress::ProgressReporter) and log
//! through `tracing`.

pub mod custom_report;
