use crate::types::Version;

/// Returns true when `a` is strictly newer than `b`.
///
/// Components are compared in order and the first difference decides; equal
/// versions are never greater.
pub fn is_greater(a: &Version, b: &Version) -> bool {
    for (left, right) in a.0.iter().zip(b.0.iter()) {
        if left != right {
            return left > right;
        }
    }
    false
}
