use crate::domain::entities::specification::Specification;

/// Deep, order-aware equality between two specification snapshots.
///
/// Two specifications are equal iff they have the same groups in the same
/// order, each group pair has the same name and item count, and items are
/// cell-wise equal at every index. Reordering is a difference. This is the
/// basis for the no-accidental-side-effect and reload-discards-edits checks.
pub fn equal(a: &Specification, b: &Specification) -> bool {
    first_difference(a, b).is_none()
}

/// Describes the first structural mismatch between two snapshots, or `None`
/// when they are equal. Used to make comparison failures diagnosable.
pub fn first_difference(a: &Specification, b: &Specification) -> Option<String> {
    if a.groups.len() != b.groups.len() {
        return Some(format!(
            "group count differs: {} vs {}",
            a.groups.len(),
            b.groups.len()
        ));
    }

    for (group_idx, (left, right)) in a.groups.iter().zip(&b.groups).enumerate() {
        if left.name != right.name {
            return Some(format!(
                "group {group_idx} name differs: '{}' vs '{}'",
                left.name, right.name
            ));
        }
        if left.items.len() != right.items.len() {
            return Some(format!(
                "group '{}' item count differs: {} vs {}",
                left.name,
                left.items.len(),
                right.items.len()
            ));
        }
        for (item_idx, (li, ri)) in left.items.iter().zip(&right.items).enumerate() {
            if li.cells != ri.cells {
                return Some(format!(
                    "group '{}' item {item_idx} differs: {:?} vs {:?}",
                    left.name, li.cells, ri.cells
                ));
            }
        }
    }

    None
}
