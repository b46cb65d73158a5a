use super::{Shadow, Shadowable, Shadowed};

/// Merge a shadow onto a canonical record.
///
/// Pure: the inputs are left untouched and the same inputs always give the same
/// output. With no shadow the result is the canonical record unchanged; a tombstone
/// always yields [`Shadowed::Tombstoned`].
pub fn merge<T: Shadowable>(canonical: &T, shadow: Option<&Shadow<T::Patch>>) -> Shadowed<T> {
    match shadow {
        None => Shadowed::Normal(canonical.clone()),
        Some(Shadow::Tombstone) => Shadowed::Tombstoned,
        Some(Shadow::Patch(patch)) => {
            let mut merged = canonical.clone();
            merged.apply_patch(patch);
            Shadowed::Normal(merged)
        }
    }
}
