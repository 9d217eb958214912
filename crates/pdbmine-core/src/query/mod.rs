//! Row conditions over annotation tables.
//!
//! Conditions are expressed either through the [`Expr`] builder or as query
//! text handled by [`parse_predicate`] and [`parse_select`]. Both forms yield
//! the same expression tree, which [`CompiledFilter`] evaluates with SQL
//! three-valued logic.

pub mod error;
pub mod expr;
mod lexer;
pub mod parser;

pub use error::QueryError;
pub use expr::{CompareOp, CompiledFilter, Expr, LikePattern, col, lit};
pub use parser::{Projection, SelectStatement, parse_predicate, parse_select};
