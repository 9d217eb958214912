use super::ids::{AtomId, ChainId};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Residue {
    pub id: isize,                               // Residue sequence number from source file
    pub insertion_code: Option<char>,            // Code distinguishing inserted residues (e.g. 52A)
    pub name: String,                            // Group name (e.g., "ALA", "HEM", "HOH")
    pub chain_id: ChainId,                       // ID of the parent chain
    pub(crate) atoms: Vec<AtomId>,               // Atoms of this residue in file order
    atom_name_map: HashMap<String, Vec<AtomId>>, // Alternate sites share a name
}

impl Residue {
    pub(crate) fn new(id: isize, name: &str, chain_id: ChainId) -> Self {
        Self {
            id,
            insertion_code: None,
            name: name.to_string(),
            chain_id,
            atoms: Vec::new(),
            atom_name_map: HashMap::new(),
        }
    }

    pub(crate) fn add_atom(&mut self, atom_name: &str, atom_id: AtomId) {
        self.atoms.push(atom_id);
        self.atom_name_map
            .entry(atom_name.to_string())
            .or_default()
            .push(atom_id);
    }

    pub fn atoms(&self) -> &[AtomId] {
        &self.atoms
    }

    /// Returns every atom site with the given name, one per alternate location.
    pub fn get_atom_ids_by_name(&self, name: &str) -> Option<&[AtomId]> {
        self.atom_name_map.get(name).map(Vec::as_slice)
    }
}
