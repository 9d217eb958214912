use super::StructureFilter;

/// Inverts the decision of the wrapped filter.
///
/// A missing structure is still reported as invalid input; it is never
/// turned into a positive match.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotFilter<F>(pub F);

impl<F> NotFilter<F> {
    pub fn new(filter: F) -> Self {
        Self(filter)
    }
}

impl<S: ?Sized, F: StructureFilter<S>> StructureFilter<S> for NotFilter<F> {
    fn accept(&self, structure: &S) -> bool {
        !self.0.accept(structure)
    }
}

/// Keeps a structure when any of the wrapped filters keeps it.
pub struct OrFilter<S: ?Sized> {
    filters: Vec<Box<dyn StructureFilter<S>>>,
}

impl<S: ?Sized> OrFilter<S> {
    pub fn new(filters: Vec<Box<dyn StructureFilter<S>>>) -> Self {
        Self { filters }
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl<S: ?Sized> StructureFilter<S> for OrFilter<S> {
    fn accept(&self, structure: &S) -> bool {
        self.filters.iter().any(|filter| filter.accept(structure))
    }
}
