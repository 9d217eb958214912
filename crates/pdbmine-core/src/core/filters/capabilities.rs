use crate::core::models::structure::Structure;

/// Exposes the per-atom alternate location indicators of a structure.
///
/// Indicators are yielded one per atom site in file order. An empty string
/// marks a site without an alternate location.
pub trait AlternateLocations {
    fn alt_locs(&self) -> impl Iterator<Item = &str>;
}

/// Exposes the names of the groups (residues, ligands, solvent) of a structure.
pub trait GroupNames {
    fn group_names(&self) -> impl Iterator<Item = &str>;
}

impl AlternateLocations for Structure {
    fn alt_locs(&self) -> impl Iterator<Item = &str> {
        self.alt_loc_list()
    }
}

impl GroupNames for Structure {
    fn group_names(&self) -> impl Iterator<Item = &str> {
        Structure::group_names(self)
    }
}

impl<T: AsRef<str>> AlternateLocations for [T] {
    fn alt_locs(&self) -> impl Iterator<Item = &str> {
        self.iter().map(AsRef::<str>::as_ref)
    }
}

impl<T: AsRef<str>> AlternateLocations for Vec<T> {
    fn alt_locs(&self) -> impl Iterator<Item = &str> {
        self.as_slice().alt_locs()
    }
}

impl<T: AsRef<str>> GroupNames for [T] {
    fn group_names(&self) -> impl Iterator<Item = &str> {
        self.iter().map(AsRef::<str>::as_ref)
    }
}

impl<T: AsRef<str>> GroupNames for Vec<T> {
    fn group_names(&self) -> impl Iterator<Item = &str> {
        self.as_slice().group_names()
    }
}
