use super::StructureFilter;
use super::capabilities::AlternateLocations;

/// Keeps structures in which at least one atom site has an alternate location.
///
/// The scan stops at the first non-empty indicator, so the result does not
/// depend on atom order.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContainsAlternativeLocations;

impl ContainsAlternativeLocations {
    pub fn new() -> Self {
        Self
    }
}

impl<S: AlternateLocations + ?Sized> StructureFilter<S> for ContainsAlternativeLocations {
    fn accept(&self, structure: &S) -> bool {
        structure.alt_locs().any(|indicator| !indicator.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use crate::core::models::chain::ChainType;
    use crate::core::models::structure::Structure;
    use crate::core::filters::FilterError;
    use nalgebra::Point3;

    fn accepts(indicators: &[&str]) -> bool {
        ContainsAlternativeLocations.accept(indicators)
    }

    #[test]
    fn all_empty_indicators_are_rejected() {
        assert!(!accepts(&["", "", ""]));
    }

    #[test]
    fn one_non_empty_indicator_is_accepted() {
        assert!(accepts(&["", "A", ""]));
    }

    #[test]
    fn empty_sequence_is_rejected() {
        assert!(!accepts(&[]));
    }

    #[test]
    fn position_of_the_indicator_does_not_matter() {
        assert!(accepts(&["B", "", "", ""]));
        assert!(accepts(&["", "", "", "B"]));
        assert!(accepts(&["", "", "C", ""]));
    }

    #[test]
    fn result_is_invariant_under_permutation() {
        let base = ["", "", "A", "", "B"];
        let expected = accepts(&base);
        for shift in 0..base.len() {
            let mut rotated = base.to_vec();
            rotated.rotate_left(shift);
            assert_eq!(accepts(&rotated), expected);
            rotated.reverse();
            assert_eq!(accepts(&rotated), expected);
        }
    }

    #[test]
    fn owned_string_sequences_are_supported() {
        let indicators = vec![String::new(), "A".to_string()];
        assert!(ContainsAlternativeLocations.accept(&indicators));
    }

    #[test]
    fn absent_structure_is_invalid_input() {
        let result = StructureFilter::<[&str]>::check(&ContainsAlternativeLocations, "4HHB", None);
        assert_eq!(
            result,
            Err(FilterError::InvalidInput {
                structure_id: "4HHB".to_string()
            })
        );
    }

    #[test]
    fn present_structure_is_checked() {
        let indicators: &[&str] = &["", "A"];
        assert_eq!(
            ContainsAlternativeLocations.check("1ALT", Some(indicators)),
            Ok(true)
        );
    }

    #[test]
    fn works_on_parsed_structures() {
        let mut structure = Structure::new("1ALT");
        let chain = structure.add_chain('A', ChainType::Polymer);
        let residue = structure.add_residue(chain, 1, "SER").unwrap();
        structure.add_atom_to_residue(residue, Atom::new("CA", residue, Point3::origin()));
        assert!(!ContainsAlternativeLocations.accept(&structure));

        structure.add_atom_to_residue(
            residue,
            Atom::new("OG", residue, Point3::origin()).with_alt_loc("A"),
        );
        assert!(ContainsAlternativeLocations.accept(&structure));
    }
}
