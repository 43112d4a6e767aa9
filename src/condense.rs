//! Remove near-zero entries from sparse records
//!
//! Condensed entries are indistinguishable from nodes that were never
//! listed, they take the default value again when expanded.
use crate::types::{AttributeRecord, BasisVectorSet};

/// Default tolerance of [`condense`]
pub const CONDENSE_TOL: f64 = 1e-7;

/// Keep only entries with `value > tolerance`.
///
/// The comparison is on the signed value: attribute values are
/// non-negative, so negative entries are dropped as well.
///
/// # Example
///```
/// use meshbasis::condense::condense;
/// use meshbasis::AttributeRecord;
/// let record = AttributeRecord::from([(1, 0.1), (3, 0.2)]);
/// assert_eq!(condense(&record, 0.15), AttributeRecord::from([(3, 0.2)]));
///```
pub fn condense(record: &AttributeRecord, tolerance: f64) -> AttributeRecord {
    record.iter().filter(|(_, v)| *v > tolerance).collect()
}

/// Condense in place, returns the number of removed entries.
pub fn condense_inplace(record: &mut AttributeRecord, tolerance: f64) -> usize {
    let before = record.len();
    record.values.retain(|_, v| *v > tolerance);
    before - record.len()
}

/// Condense every basis vector of a set.
pub fn condense_basis(basis: &BasisVectorSet, tolerance: f64) -> BasisVectorSet {
    basis.iter().map(|r| condense(r, tolerance)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example() -> AttributeRecord {
        AttributeRecord::from([
            (1, 0.1),
            (2, 1e-9),
            (3, 0.2),
            (4, 0.),
            (5, -0.3),
            (6, CONDENSE_TOL),
        ])
    }

    #[test]
    fn test_condense_threshold() {
        let record = AttributeRecord::from([(1, 0.1), (3, 0.2)]);
        assert_eq!(condense(&record, 0.15), AttributeRecord::from([(3, 0.2)]));
    }

    #[test]
    fn test_condense_default_tol() {
        let condensed = condense(&example(), CONDENSE_TOL);
        assert_eq!(condensed, AttributeRecord::from([(1, 0.1), (3, 0.2)]));
    }

    #[test]
    fn test_condense_idempotent() {
        for tol in [0., CONDENSE_TOL, 0.15, 1.].iter() {
            let once = condense(&example(), *tol);
            let twice = condense(&once, *tol);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_condense_monotone() {
        let tol = 0.05;
        let record = example();
        let condensed = condense(&record, tol);
        for (node, value) in record.iter() {
            if condensed.contains(node) {
                assert!(value > tol);
            } else {
                assert!(value <= tol);
            }
        }
    }

    #[test]
    fn test_condense_inplace() {
        let mut record = example();
        let removed = condense_inplace(&mut record, CONDENSE_TOL);
        assert_eq!(removed, 4);
        assert_eq!(record, condense(&example(), CONDENSE_TOL));
    }

    #[test]
    fn test_condense_basis() {
        let basis = BasisVectorSet::new(vec![example(), AttributeRecord::from([(2, 0.)])]);
        let condensed = condense_basis(&basis, CONDENSE_TOL);
        assert_eq!(condensed.len(), 2);
        assert!(condensed[1].is_empty());
    }
}
