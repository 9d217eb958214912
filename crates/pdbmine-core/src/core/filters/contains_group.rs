use super::StructureFilter;
use super::capabilities::GroupNames;
use std::collections::HashSet;

/// Keeps structures containing at least one of the given groups (e.g., "ATP", "HEM").
///
/// Group names are compared exactly as written in the source file.
#[derive(Debug, Clone, Default)]
pub struct ContainsGroup {
    groups: HashSet<String>,
}

impl ContainsGroup {
    pub fn new<I, T>(groups: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            groups: groups.into_iter().map(Into::into).collect(),
        }
    }
}

impl<S: GroupNames + ?Sized> StructureFilter<S> for ContainsGroup {
    fn accept(&self, structure: &S) -> bool {
        structure
            .group_names()
            .any(|name| self.groups.contains(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_any_listed_group() {
        let filter = ContainsGroup::new(["ATP", "ADP"]);
        assert!(filter.accept(&["ALA", "ADP", "HOH"][..]));
        assert!(!filter.accept(&["ALA", "GLY"][..]));
    }

    #[test]
    fn comparison_is_case_sensitive() {
        let filter = ContainsGroup::new(["HEM"]);
        assert!(!filter.accept(&["hem"][..]));
    }

    #[test]
    fn empty_group_list_matches_nothing() {
        let filter = ContainsGroup::new(Vec::<String>::new());
        assert!(!filter.accept(&["HEM"][..]));
    }
}
