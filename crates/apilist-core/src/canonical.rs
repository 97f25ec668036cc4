//! Canonical ordering for snapshot records.
//!
//! Each record kind enumerates exactly which of its sequences get sorted;
//! anything not listed is left alone. Ordering is depth-first: a record's
//! children are canonicalized before the sequence holding the record is
//! sorted. Every sort is stable and keyed on the entity name, so
//! same-name entries keep their input order and re-canonicalizing an
//! already canonical snapshot changes nothing.

use apilist_types::{Interface, Snapshot};

/// Sort every order-insensitive sequence in the snapshot into
/// name-ascending order, in place.
pub fn canonicalize(snapshot: &mut Snapshot) {
    for interface in &mut snapshot.interfaces {
        canonicalize_interface(interface);
    }
    snapshot.interfaces.sort_by(|a, b| a.name.cmp(&b.name));
}

/// Sortable sequences of an interface: `attributes`, `operations`,
/// `constants`. Operation argument lists are call signatures and are
/// never reordered.
fn canonicalize_interface(interface: &mut Interface) {
    interface.attributes.sort_by(|a, b| a.name.cmp(&b.name));
    interface.operations.sort_by(|a, b| a.name.cmp(&b.name));
    interface.constants.sort_by(|a, b| a.name.cmp(&b.name));
}
