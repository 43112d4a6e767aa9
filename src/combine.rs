//! # Linear combination of basis vectors
//!
//! A nodal attribute field is synthesized as
//!
//! `field = w_0 * basis_0 + w_1 * basis_1 + ... + w_k * basis_k`
//!
//! The basis vectors are either sparse ([`BasisVectorSet`]) or stacked
//! as columns of a dense array ([`BasisArray`]). Both representations
//! treat a node that is absent from a basis vector as contributing 0.
//! The default value is applied once, after combination
//! (see [`combine_sparse_full`] and [`Field::into_dense`]).
use crate::codec::to_dense;
use crate::error::{BasisError, Result};
use crate::types::{AttributeRecord, BasisArray, BasisVectorSet, DenseField};
use ndarray::{Array2, ArrayBase, ArrayView1, Data, Ix1, Ix2};

/// Combined field, sparse or dense depending on the basis representation
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    /// Values at the union of nodes listed in the basis vectors
    Sparse(AttributeRecord),
    /// Values at all nodes
    Dense(DenseField),
}

impl Field {
    /// Expand to a dense field, nodes without value take `default`.
    ///
    /// # Errors
    /// Dense field does not have `node_num` entries.
    pub fn into_dense(self, default: f64, node_num: usize) -> Result<DenseField> {
        match self {
            Self::Sparse(record) => Ok(to_dense(&record, default, node_num)),
            Self::Dense(field) => {
                if field.len() == node_num {
                    Ok(field)
                } else {
                    Err(BasisError::length_mismatch(
                        "dense field",
                        node_num,
                        field.len(),
                    ))
                }
            }
        }
    }
}

/// Combine basis vectors with weights
#[enum_dispatch]
pub trait Combine {
    /// Weighted sum of the basis vectors
    ///
    /// # Errors
    /// Number of weights and basis vectors differ.
    fn combine(&self, weights: ArrayView1<'_, f64>) -> Result<Field>;

    /// Number of basis vectors
    fn num_basis(&self) -> usize;
}

/// Basis vectors in sparse or dense form
#[enum_dispatch(Combine)]
#[derive(Debug, Clone)]
pub enum BasisRepresentation {
    /// List of sparse records
    Sparse(BasisVectorSet),
    /// Array of size (`node_num`, `num_basis`)
    Dense(BasisArray),
}

impl Combine for BasisVectorSet {
    fn combine(&self, weights: ArrayView1<'_, f64>) -> Result<Field> {
        combine_sparse(&weights, self).map(Field::Sparse)
    }

    fn num_basis(&self) -> usize {
        self.len()
    }
}

impl Combine for BasisArray {
    fn combine(&self, weights: ArrayView1<'_, f64>) -> Result<Field> {
        combine_dense(&weights, self).map(Field::Dense)
    }

    fn num_basis(&self) -> usize {
        self.ncols()
    }
}

fn check_dimension(weights: usize, basis: usize) -> Result<()> {
    if weights == basis {
        Ok(())
    } else {
        Err(BasisError::DimensionMismatch { weights, basis })
    }
}

/// Matrix-vector product `basis_array . weights`
///
/// # Errors
/// Number of weights differs from number of columns.
///
/// # Example
///```
/// use meshbasis::combine::combine_dense;
/// use ndarray::array;
/// let basis = array![[1., 0.], [0., 1.], [1., 1.]];
/// let weights = array![2., 3.];
/// let field = combine_dense(&weights, &basis).unwrap();
/// assert_eq!(field, array![2., 3., 5.]);
///```
pub fn combine_dense<S1, S2>(
    weights: &ArrayBase<S1, Ix1>,
    basis_array: &ArrayBase<S2, Ix2>,
) -> Result<DenseField>
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
{
    check_dimension(weights.len(), basis_array.ncols())?;
    Ok(basis_array.dot(weights))
}

/// Combine several weight vectors at once.
///
/// `weight_sets` holds one weight vector per column, size (`num_basis`,
/// `num_samples`). Returns one field per column, size (`node_num`, `num_samples`).
///
/// # Errors
/// Number of rows of `weight_sets` differs from number of basis vectors.
pub fn combine_dense_many<S1, S2>(
    weight_sets: &ArrayBase<S1, Ix2>,
    basis_array: &ArrayBase<S2, Ix2>,
) -> Result<Array2<f64>>
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
{
    check_dimension(weight_sets.nrows(), basis_array.ncols())?;
    Ok(basis_array.dot(weight_sets))
}

/// Weighted sum of sparse records.
///
/// `result[n] = sum_i weights[i] * basis[i][n]` over all nodes listed in
/// at least one record. Nodes absent from every record are not listed in the
/// result. Records are accumulated in index order, so the result is
/// reproducible bit for bit.
///
/// # Errors
/// Number of weights differs from number of basis vectors.
pub fn combine_sparse<S>(weights: &ArrayBase<S, Ix1>, basis: &BasisVectorSet) -> Result<AttributeRecord>
where
    S: Data<Elem = f64>,
{
    check_dimension(weights.len(), basis.len())?;
    let combined = basis
        .iter()
        .zip(weights.iter())
        .fold(AttributeRecord::new(), |mut acc, (record, w)| {
            acc.add_scaled(record, *w);
            acc
        });
    Ok(combined)
}

/// Weighted sum of sparse records, expanded to all `node_num` nodes.
///
/// Nodes absent from every record take `default`.
///
/// # Errors
/// Number of weights differs from number of basis vectors, or a basis
/// vector lists a node outside `[1, node_num]`.
///
/// # Example
///```
/// use meshbasis::combine::combine_sparse_full;
/// use meshbasis::{AttributeRecord, BasisVectorSet};
/// use ndarray::array;
/// let basis = BasisVectorSet::new(vec![
///     AttributeRecord::from([(1, 0.1), (3, 0.2)]),
///     AttributeRecord::from([(2, 0.05)]),
/// ]);
/// let field = combine_sparse_full(&array![1., 1.], &basis, 0.02, 5).unwrap();
/// assert_eq!(field, array![0.1, 0.05, 0.2, 0.02, 0.02]);
///```
pub fn combine_sparse_full<S>(
    weights: &ArrayBase<S, Ix1>,
    basis: &BasisVectorSet,
    default: f64,
    node_num: usize,
) -> Result<DenseField>
where
    S: Data<Elem = f64>,
{
    basis.validate(node_num)?;
    let combined = combine_sparse(weights, basis)?;
    Ok(to_dense(&combined, default, node_num))
}
