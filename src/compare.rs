//! # Validate a reconstruction against ground truth
//!
//! A field reconstructed from basis vectors and weights is compared
//! against an independently obtained field (e.g. read from a reference
//! attribute file). Both the sparse and the dense representation of the
//! basis vectors are combined, so inconsistencies between them show up in
//! `diff_com_array`.
//!
//! Nodes absent from every basis vector contribute 0 in both
//! representations and take the default value once, after combination.
use crate::codec::{basis_array, fill_uncovered, to_dense};
use crate::combine::{combine_dense, combine_sparse, combine_sparse_full};
use crate::config::BasisConfig;
use crate::error::{BasisError, Result};
use crate::io::fort13::{read_attribute, read_node_num};
use crate::io::read_write_hdf5::write_scalar_to_hdf5;
use crate::io::traits::ReadWrite;
use crate::landuse::{load_basis_vectors, reference_weights};
use crate::types::{BasisVectorSet, DenseField};
use ndarray::{Array1, ArrayBase, Data, Ix1, Ix2};
use std::path::Path;
use tracing::{error, info, warn};

/// Reconstruction and diagnostic fields, all of length `node_num`
#[derive(Debug, Clone)]
pub struct Comparison {
    /// Ground truth
    pub original: DenseField,
    /// Sparse combination, default filled
    pub reconstruction: DenseField,
    /// `original - reconstruction`
    pub difference: DenseField,
    /// Dense combination, default filled
    pub combo_array: DenseField,
    /// `original - combo_array`
    pub diff_ori_array: DenseField,
    /// `reconstruction - combo_array`
    pub diff_com_array: DenseField,
    /// Sparse combination with unit weights, default filled
    pub combo_bv: DenseField,
    /// Number of nodes absent from every basis vector
    pub uncovered: usize,
}

fn max_abs<S: Data<Elem = f64>>(x: &ArrayBase<S, Ix1>) -> f64 {
    x.iter().fold(0., |acc, v| acc.max(v.abs()))
}

impl Comparison {
    /// Largest absolute value of `difference`
    pub fn max_abs_difference(&self) -> f64 {
        max_abs(&self.difference)
    }

    /// Largest absolute value of `diff_ori_array`
    pub fn max_abs_diff_ori(&self) -> f64 {
        max_abs(&self.diff_ori_array)
    }

    /// Largest absolute value of `diff_com_array`
    pub fn max_abs_diff_com(&self) -> f64 {
        max_abs(&self.diff_com_array)
    }

    /// Sparse and dense combination agree within `tol`
    pub fn is_consistent(&self, tol: f64) -> bool {
        self.max_abs_diff_com() <= tol
    }

    /// Write all fields to an hdf5 file, for plotting.
    ///
    /// An existing file is replaced.
    ///
    /// # Errors
    /// Can't write file
    pub fn write<P: AsRef<Path>>(&self, filename: P) -> Result<()> {
        let filename = filename.as_ref();
        if let Some(parent) = filename.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        // Truncate, datasets of a previous mesh may have another shape
        drop(hdf5::File::create(filename)?);
        for (varname, field) in self.fields() {
            field.write(filename, varname)?;
        }
        #[allow(clippy::cast_precision_loss)]
        let uncovered = self.uncovered as f64;
        write_scalar_to_hdf5(filename, "uncovered", uncovered)?;
        info!(" ==> {:?}", filename);
        Ok(())
    }

    /// Dense fields with their dataset names
    pub fn fields(&self) -> [(&'static str, &DenseField); 7] {
        [
            ("original", &self.original),
            ("reconstruction", &self.reconstruction),
            ("difference", &self.difference),
            ("combo_array", &self.combo_array),
            ("diff_ori_array", &self.diff_ori_array),
            ("diff_com_array", &self.diff_com_array),
            ("combo_bv", &self.combo_bv),
        ]
    }

    /// Write all fields to an hdf5 file and handle result
    pub fn write_unwrap<P: AsRef<Path>>(&self, filename: P) {
        let filename = filename.as_ref();
        match self.write(filename) {
            Ok(_) => (),
            Err(e) => error!("Error while writing file {:?}. Error: {}", filename, e),
        }
    }
}

fn check_len(what: &str, expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(BasisError::length_mismatch(what, expected, actual))
    }
}

/// Reconstruct a field from basis vectors and compare it against `original`.
///
/// 1. `reconstruction`: sparse combination, expanded with `default`
/// 2. `difference = original - reconstruction`
/// 3. `combo_array`: dense combination, nodes absent from every basis vector
///    set to `default`
/// 4. `diff_ori_array = original - combo_array`
/// 5. `diff_com_array = reconstruction - combo_array`
///
/// # Errors
/// Dimension mismatch between weights and basis vectors, basis vectors
/// listing foreign nodes, or dense inputs not of length `node_num`.
///
/// # Example
///```
/// use meshbasis::compare::compare;
/// use meshbasis::codec::basis_array;
/// use meshbasis::{AttributeRecord, BasisVectorSet};
/// use ndarray::array;
/// let basis = BasisVectorSet::new(vec![
///     AttributeRecord::from([(1, 1.), (2, 1.)]),
///     AttributeRecord::from([(3, 1.)]),
/// ]);
/// let original = array![0.02, 0.02, 0.1, 0.012];
/// let weights = array![0.02, 0.1];
/// let array = basis_array(&basis, 4);
/// let cmp = compare(&original, &weights, &basis, &array, 0.012, 4).unwrap();
/// assert!(cmp.max_abs_difference() < 1e-12);
/// assert!(cmp.is_consistent(1e-12));
///```
pub fn compare<S1, S2, S3>(
    original: &ArrayBase<S1, Ix1>,
    weights: &ArrayBase<S2, Ix1>,
    basis: &BasisVectorSet,
    basis_array: &ArrayBase<S3, Ix2>,
    default: f64,
    node_num: usize,
) -> Result<Comparison>
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
    S3: Data<Elem = f64>,
{
    check_len("original field", node_num, original.len())?;
    check_len("basis array rows", node_num, basis_array.nrows())?;

    let reconstruction = combine_sparse_full(weights, basis, default, node_num)?;
    let difference = original - &reconstruction;

    let coverage = basis.coverage();
    let uncovered = node_num - coverage.len();
    let mut combo_array = combine_dense(weights, basis_array)?;
    fill_uncovered(&mut combo_array, coverage, default);
    let diff_ori_array = original - &combo_array;
    let diff_com_array = &reconstruction - &combo_array;

    let ones = Array1::<f64>::ones(basis.len());
    let combo_bv = to_dense(&combine_sparse(&ones, basis)?, default, node_num);

    Ok(Comparison {
        original: original.to_owned(),
        reconstruction,
        difference,
        combo_array,
        diff_ori_array,
        diff_com_array,
        combo_bv,
        uncovered,
    })
}

/// Compare the reference run of a basis directory against the
/// reconstruction from its `landuse_*` folders.
///
/// Reads
/// - the reference attribute file (`reference_dir/attribute_file`),
/// - the first land use table of the reference run (weights),
/// - the attribute file of every `landuse_*` folder (basis vectors).
///
/// # Errors
/// Files can't be read, or their contents don't fit together.
pub fn compare_basis_dir(config: &BasisConfig) -> Result<Comparison> {
    let reference = config.reference_file();
    let node_num = read_node_num(&reference)?;
    let original = read_attribute(&reference, &config.attribute_name)?;
    let original = to_dense(&original.record, config.default_value, node_num);

    let weights = reference_weights(config)?;

    let basis = load_basis_vectors(config)?;
    let array = basis_array(&basis, node_num);

    let cmp = compare(
        &original,
        &weights,
        &basis,
        &array,
        config.default_value,
        node_num,
    )?;
    info!(
        "max |difference| = {:e}, max |diff_com_array| = {:e}",
        cmp.max_abs_difference(),
        cmp.max_abs_diff_com()
    );
    if cmp.uncovered > 0 {
        warn!(
            "{} of {} nodes are not covered by any basis vector",
            cmp.uncovered, node_num
        );
    }
    Ok(cmp)
}
