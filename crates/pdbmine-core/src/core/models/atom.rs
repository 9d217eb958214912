use super::ids::ResidueId;
use nalgebra::Point3;

/// Represents one atom site of a parsed macromolecular structure.
///
/// Every site keeps its alternate location indicator as read from the source
/// file. An empty string means the site has a single resolved conformation;
/// any other value (usually `"A"`, `"B"`, ...) marks one of several
/// conformations modelled at the same position.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Serial number from the source file.
    pub serial: usize,
    /// The name of the atom (e.g., "CA", "N", "O").
    pub name: String,
    /// Alternate location indicator; empty when the site has none.
    pub alt_loc: String,
    /// The ID of the parent residue this atom belongs to.
    pub residue_id: ResidueId,
    /// Element symbol (e.g., "C", "FE").
    pub element: String,
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
    /// Fractional occupancy of this site.
    pub occupancy: f64,
    /// Isotropic temperature factor.
    pub b_factor: f64,
    /// `true` for atoms read from HETATM records.
    pub is_hetero: bool,
}

impl Atom {
    /// Creates a new `Atom` with default values for most fields.
    ///
    /// The alternate location indicator starts empty and the occupancy at `1.0`.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the atom.
    /// * `residue_id` - The ID of the residue this atom belongs to.
    /// * `position` - The 3D coordinates of the atom.
    pub fn new(name: &str, residue_id: ResidueId, position: Point3<f64>) -> Self {
        Self {
            serial: 0,
            name: name.to_string(),
            alt_loc: String::new(),
            residue_id,
            element: String::new(),
            position,
            occupancy: 1.0,
            b_factor: 0.0,
            is_hetero: false,
        }
    }

    /// Sets the alternate location indicator, consuming and returning the atom.
    pub fn with_alt_loc(mut self, alt_loc: &str) -> Self {
        self.alt_loc = alt_loc.to_string();
        self
    }

    /// Returns `true` when this site carries a non-empty alternate location indicator.
    pub fn has_alt_loc(&self) -> bool {
        !self.alt_loc.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::ids::ResidueId;
    use nalgebra::Point3;

    #[test]
    fn new_atom_has_expected_default_fields() {
        let residue_id = ResidueId::default();
        let atom = Atom::new("CA", residue_id, Point3::new(1.0, 2.0, 3.0));

        assert_eq!(atom.name, "CA");
        assert_eq!(atom.residue_id, residue_id);
        assert_eq!(atom.position, Point3::new(1.0, 2.0, 3.0));
        assert_eq!(atom.alt_loc, "");
        assert_eq!(atom.occupancy, 1.0);
        assert_eq!(atom.b_factor, 0.0);
        assert!(!atom.is_hetero);
        assert!(!atom.has_alt_loc());
    }

    #[test]
    fn with_alt_loc_marks_the_site() {
        let atom = Atom::new("CB", ResidueId::default(), Point3::origin()).with_alt_loc("B");
        assert_eq!(atom.alt_loc, "B");
        assert!(atom.has_alt_loc());
    }

    #[test]
    fn atom_equality_and_clone_works() {
        let mut atom1 = Atom::new("N", ResidueId::default(), Point3::new(0.0, 0.0, 0.0));
        atom1.occupancy = 0.5;
        let atom2 = atom1.clone();
        assert_eq!(atom1, atom2);
    }
}
