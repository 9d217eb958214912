//! Boolean filters over parsed structures.
//!
//! A filter decides whether a structure is kept in a data set. Filters are
//! stateless and `Send + Sync`, so one instance can be shared by every worker
//! of a [`Session`](crate::session::Session) while structures are processed
//! in parallel.
//!
//! Filters never reach into a concrete structure type. They are written
//! against small capability traits ([`AlternateLocations`], [`GroupNames`])
//! so any structure-like type can be filtered.

pub mod alt_locations;
pub mod capabilities;
pub mod combinators;
pub mod contains_group;
pub mod error;

pub use alt_locations::ContainsAlternativeLocations;
pub use capabilities::{AlternateLocations, GroupNames};
pub use combinators::{NotFilter, OrFilter};
pub use contains_group::ContainsGroup;
pub use error::FilterError;

/// A predicate over structures of type `S`.
pub trait StructureFilter<S: ?Sized>: Send + Sync {
    /// Returns `true` when the structure should be kept.
    fn accept(&self, structure: &S) -> bool;

    /// Applies the filter to a structure that may be missing.
    ///
    /// Upstream decoding can leave an entry without a structure. Such an entry
    /// cannot be classified and is reported instead of being dropped silently.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidInput`] when `structure` is `None`.
    fn check(&self, structure_id: &str, structure: Option<&S>) -> Result<bool, FilterError> {
        let structure = structure.ok_or_else(|| FilterError::InvalidInput {
            structure_id: structure_id.to_string(),
        })?;
        Ok(self.accept(structure))
    }
}

impl<S: ?Sized, F: StructureFilter<S> + ?Sized> StructureFilter<S> for Box<F> {
    fn accept(&self, structure: &S) -> bool {
        (**self).accept(structure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boxed_filters_compose() {
        let boxed: Box<dyn StructureFilter<[&str]>> = Box::new(ContainsAlternativeLocations);
        let inverted = NotFilter::new(boxed);
        assert!(inverted.accept(&["", ""][..]));
        assert!(!inverted.accept(&["", "B"][..]));
    }
}
