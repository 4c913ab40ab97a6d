//! Set algebra over identifier sets.
//!
//! All operations borrow their inputs and return a fresh, deduplicated set.
//! `BTreeSet` keeps iteration order stable so that reports are reproducible.

use std::collections::BTreeSet;

/// Elements present in `a` or `b`.
pub fn union<T: Ord + Clone>(a: &BTreeSet<T>, b: &BTreeSet<T>) -> BTreeSet<T> {
    a.iter().chain(b.iter()).cloned().collect()
}

/// Elements present in `a` but not in `b`.
pub fn difference<T: Ord + Clone>(a: &BTreeSet<T>, b: &BTreeSet<T>) -> BTreeSet<T> {
    a.iter().filter(|x| !b.contains(x)).cloned().collect()
}

/// Elements present in exactly one of `a` and `b`.
pub fn symmetric_difference<T: Ord + Clone>(a: &BTreeSet<T>, b: &BTreeSet<T>) -> BTreeSet<T> {
    union(&difference(a, b), &difference(b, a))
}

/// Elements present in both `a` and `b`.
pub fn intersection<T: Ord + Clone>(a: &BTreeSet<T>, b: &BTreeSet<T>) -> BTreeSet<T> {
    difference(&union(a, b), &symmetric_difference(a, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_union() {
        let u = union(&set(&["a", "c", "e", "f"]), &set(&["b", "d", "e", "f"]));
        assert_eq!(u, set(&["a", "b", "c", "d", "e", "f"]));
    }

    #[test]
    fn test_difference() {
        let a = set(&["a", "c", "e", "f"]);
        let b = set(&["b", "d", "e", "f"]);
        assert_eq!(difference(&a, &b), set(&["a", "c"]));
        assert_eq!(difference(&b, &a), set(&["b", "d"]));
    }

    #[test]
    fn test_symmetric_difference() {
        let a = set(&["a", "c", "e", "f"]);
        let b = set(&["b", "d", "e", "f"]);
        let d1 = symmetric_difference(&a, &b);
        assert_eq!(d1, set(&["a", "b", "c", "d"]));
        assert_eq!(symmetric_difference(&b, &a), d1);
    }

    #[test]
    fn test_intersection() {
        let a = set(&["a", "c", "e", "f"]);
        let b = set(&["b", "d", "e", "f"]);
        assert_eq!(intersection(&a, &b), set(&["e", "f"]));
    }

    #[test]
    fn test_empty_inputs() {
        let empty: BTreeSet<String> = BTreeSet::new();
        let a = set(&["a"]);
        assert_eq!(union(&empty, &a), a);
        assert!(difference(&empty, &a).is_empty());
        assert!(intersection(&empty, &a).is_empty());
        assert_eq!(symmetric_difference(&a, &empty), a);
    }
}
