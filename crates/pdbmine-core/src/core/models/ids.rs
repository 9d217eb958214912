//! Stable keys into the slot maps owned by [`Structure`](super::structure::Structure).

use slotmap::new_key_type;

new_key_type! {
    pub struct AtomId;
    pub struct ResidueId;
    pub struct ChainId;
}
