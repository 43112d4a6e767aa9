//! # Sparse / dense conversion of nodal attributes
//!
//! A sparse [`AttributeRecord`] lists values for some nodes only,
//! all other nodes take a default value. The dense representation
//! holds one value for every node, index `i` belongs to node `i + 1`.
//!
//! Parsing of attribute files lives in [`crate::io::fort13`].
use crate::types::{AttributeRecord, BasisArray, BasisVectorSet, DenseField};
use ndarray::{Array1, Array2, ArrayBase, Axis, Data, Ix1};

/// Expand a sparse record to a dense field of length `node_num`.
///
/// Nodes missing in `record` take `default`, listed nodes
/// beyond `node_num` are ignored.
///
/// # Example
///```
/// use meshbasis::codec::to_dense;
/// use meshbasis::AttributeRecord;
/// let record = AttributeRecord::from([(1, 0.1), (3, 0.2)]);
/// let field = to_dense(&record, 0.02, 4);
/// assert_eq!(field.to_vec(), vec![0.1, 0.02, 0.2, 0.02]);
///```
pub fn to_dense(record: &AttributeRecord, default: f64, node_num: usize) -> DenseField {
    let mut field = Array1::from_elem(node_num, default);
    for (node, value) in record.iter().take_while(|(n, _)| *n <= node_num) {
        if node > 0 {
            field[node - 1] = value;
        }
    }
    field
}

/// Collapse a dense field into a record listing every node.
pub fn from_dense<S>(field: &ArrayBase<S, Ix1>) -> AttributeRecord
where
    S: Data<Elem = f64>,
{
    field.iter().enumerate().map(|(i, v)| (i + 1, *v)).collect()
}

/// Collapse a dense field into a record, dropping nodes
/// that equal `default` exactly.
#[allow(clippy::float_cmp)]
pub fn from_dense_with_default<S>(field: &ArrayBase<S, Ix1>, default: f64) -> AttributeRecord
where
    S: Data<Elem = f64>,
{
    field
        .iter()
        .enumerate()
        .filter(|(_, v)| **v != default)
        .map(|(i, v)| (i + 1, *v))
        .collect()
}

/// Stack basis vectors as columns of an array of size (`node_num`, `num_basis`).
///
/// Nodes absent from a record contribute 0 to that column.
pub fn basis_array(basis: &BasisVectorSet, node_num: usize) -> BasisArray {
    let mut array = Array2::<f64>::zeros((node_num, basis.len()));
    for (mut column, record) in array.axis_iter_mut(Axis(1)).zip(basis.iter()) {
        column.assign(&to_dense(record, 0., node_num));
    }
    array
}

/// Overwrite every node outside `coverage` with `default`.
///
/// `coverage` holds node ids (1-based).
pub fn fill_uncovered<I>(field: &mut DenseField, coverage: I, default: f64)
where
    I: IntoIterator<Item = usize>,
{
    let mut covered = vec![false; field.len()];
    for node in coverage {
        if node > 0 && node <= covered.len() {
            covered[node - 1] = true;
        }
    }
    for (v, c) in field.iter_mut().zip(covered.iter()) {
        if !c {
            *v = default;
        }
    }
}
