//! # Basis directory
//!
//! A basis directory holds one folder per land classification,
//! `landuse_00`, `landuse_01`, ..., each with an attribute file whose
//! non-default values form one basis vector. Folder `landuse_NN` belongs to
//! the `NN`-th class of the land use table in ascending code order.
//!
//! ```text
//! basis_dir/
//! ├── landuse_00/fort.13
//! ├── landuse_01/fort.13
//! ├── ...
//! └── test/fort.13, *.table   (reference run)
//! ```
use crate::codec::{from_dense, from_dense_with_default};
use crate::combine::{combine_sparse, Field};
use crate::condense::condense_inplace;
use crate::config::BasisConfig;
use crate::error::{BasisError, Result};
use crate::io::fort13::{read_attribute, write_attribute};
use crate::io::table::{read_tables, LandUseTable};
use crate::types::{AttributeRecord, BasisVectorSet};
use crate::worker::WorkerContext;
use ndarray::Array1;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Prefix of basis folders
pub const LANDUSE_PREFIX: &str = "landuse_";

/// Sorted `landuse_*` subdirectories of `dir`
///
/// # Errors
/// `dir` can't be read or has no `landuse_*` subdirectory
pub fn landuse_folders<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let mut folders = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_landuse = path
            .file_name()
            .and_then(|s| s.to_str())
            .map_or(false, |s| s.starts_with(LANDUSE_PREFIX));
        if is_landuse && path.is_dir() {
            folders.push(path);
        }
    }
    if folders.is_empty() {
        return Err(BasisError::NoBasisFolders(dir.to_path_buf()));
    }
    folders.sort();
    Ok(folders)
}

/// Default value and sparse record of the attribute file in `folder`
///
/// # Errors
/// File can't be read or attribute is missing.
pub fn to_sparse_from_folder<P: AsRef<Path>>(
    folder: P,
    config: &BasisConfig,
) -> Result<(f64, AttributeRecord)> {
    let path = folder.as_ref().join(&config.attribute_file);
    let attribute = read_attribute(path, &config.attribute_name)?;
    Ok((attribute.default_value, attribute.record))
}

/// Read the basis vectors of all `landuse_*` folders, in folder order.
///
/// Folders are read in parallel.
///
/// # Errors
/// A file can't be read, or the files disagree on the number of nodes.
pub fn load_basis_vectors(config: &BasisConfig) -> Result<BasisVectorSet> {
    let folders = landuse_folders(&config.basis_dir)?;
    info!("Reading {} basis vectors", folders.len());
    let files = folders
        .par_iter()
        .map(|f| read_attribute(f.join(&config.attribute_file), &config.attribute_name))
        .collect::<Result<Vec<_>>>()?;

    let node_num = files[0].node_num;
    for (f, folder) in files.iter().zip(folders.iter()) {
        if f.node_num != node_num {
            return Err(BasisError::length_mismatch(
                format!("node count of {:?}", folder),
                node_num,
                f.node_num,
            ));
        }
    }
    let basis: BasisVectorSet = files.into_iter().map(|f| f.record).collect();
    basis.validate(node_num)?;
    Ok(basis)
}

/// Condense the attribute files of this worker's share of `landuse_*`
/// folders in place. Returns the indices of the folders handled.
///
/// # Errors
/// A file can't be read or written.
pub fn condense_basis_folders(ctx: &WorkerContext, config: &BasisConfig) -> Result<Vec<usize>> {
    let folders = landuse_folders(&config.basis_dir)?;
    let mut handled = Vec::new();
    for (i, folder) in ctx.partition(&folders) {
        let path = folder.join(&config.attribute_file);
        let mut attribute = read_attribute(&path, &config.attribute_name)?;
        let removed = condense_inplace(&mut attribute.record, config.tolerance);
        write_attribute(&path, &config.attribute_name, &attribute.record, None)?;
        debug!(
            "Rank {}: {:?} kept {} removed {}",
            ctx.rank,
            path,
            attribute.record.len(),
            removed
        );
        handled.push(i);
    }
    info!(
        "Rank {} condensed {} of {} folders",
        ctx.rank,
        handled.len(),
        folders.len()
    );
    Ok(handled)
}

/// Create folders `landuse_00`, `landuse_01`, ... in `basis_dir`, one per
/// land class of `table`. Each gets a copy of `table` where only its class
/// has `value`.
///
/// # Errors
/// Folders or tables can't be written.
pub fn setup_landuse_tables<P: AsRef<Path>>(
    table: &LandUseTable,
    basis_dir: P,
    value: f64,
) -> Result<Vec<PathBuf>> {
    let mut folders = Vec::with_capacity(table.num_land_classes());
    for (i, class) in table.land_classes().into_iter().enumerate() {
        let folder = basis_dir
            .as_ref()
            .join(format!("{}{:02}", LANDUSE_PREFIX, i));
        fs::create_dir_all(&folder)?;
        table.single_value(class, value).write(&folder)?;
        folders.push(folder);
    }
    Ok(folders)
}

/// Write `field` as attribute `name` of the existing file at `path`.
///
/// A dense field is condensed to the nodes differing from `default`.
/// The default value of the file is set to `default`.
///
/// # Errors
/// File can't be read/written, or attribute is missing.
pub fn write_field<P: AsRef<Path>>(path: P, name: &str, field: &Field, default: f64) -> Result<()> {
    let record = match field {
        Field::Sparse(record) => record.clone(),
        Field::Dense(values) => from_dense_with_default(values, default),
    };
    write_attribute(path, name, &record, Some(default))
}

/// Write `field` as attribute `name` keeping every node, including zeros.
///
/// # Errors
/// File can't be read/written, or attribute is missing.
pub fn write_field_full<P: AsRef<Path>>(path: P, name: &str, field: &Field) -> Result<()> {
    let record = match field {
        Field::Sparse(record) => record.clone(),
        Field::Dense(values) => from_dense(values),
    };
    write_attribute(path, name, &record, None)
}

/// Weights of the reference run, from the first land use table in its folder
///
/// # Errors
/// Folder can't be read or holds no `*.table`.
pub fn reference_weights(config: &BasisConfig) -> Result<Array1<f64>> {
    let reference = config.reference_path();
    let tables = read_tables(&reference)?;
    match tables.first() {
        Some(table) => Ok(table.weights()),
        None => Err(BasisError::MissingAttribute {
            path: reference,
            name: "*.table".to_owned(),
        }),
    }
}

/// Combine the basis vectors of `config.basis_dir` and write the result
/// into `output`.
///
/// `weights` default to [`reference_weights`]. `output` starts as a copy of
/// `template` (the reference attribute file if `None`) unless they are the
/// same file. Returns the combined record.
///
/// # Errors
/// Files can't be read/written, or weights don't match the basis vectors.
pub fn combine_basis_dir<P: AsRef<Path>>(
    config: &BasisConfig,
    weights: Option<Array1<f64>>,
    template: Option<&Path>,
    output: P,
) -> Result<AttributeRecord> {
    let output = output.as_ref();
    let weights = match weights {
        Some(w) => w,
        None => reference_weights(config)?,
    };
    let basis = load_basis_vectors(config)?;
    let record = combine_sparse(&weights, &basis)?;
    let template = template.map_or_else(|| config.reference_file(), Path::to_path_buf);
    if template != output {
        fs::copy(&template, output)?;
    }
    write_field(
        output,
        &config.attribute_name,
        &Field::Sparse(record.clone()),
        config.default_value,
    )?;
    info!(" ==> {:?}", output);
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::fort13::write_new_attribute;
    use crate::io::MANNINGS_N;
    use ndarray::array;
    use std::collections::BTreeMap;

    fn make_basis_dir(dir: &Path, records: &[AttributeRecord], node_num: usize) {
        for (i, r) in records.iter().enumerate() {
            let folder = dir.join(format!("landuse_{:02}", i));
            fs::create_dir_all(&folder).unwrap();
            write_new_attribute(folder.join("fort.13"), "grid", node_num, MANNINGS_N, 0., r)
                .unwrap();
        }
    }

    #[test]
    fn test_to_sparse_from_folder() {
        let tmp = tempfile::tempdir().unwrap();
        let folder = tmp.path().join("landuse_00");
        fs::create_dir_all(&folder).unwrap();
        let record = AttributeRecord::from([(2, 0.25), (7, 1.)]);
        write_new_attribute(folder.join("fort.13"), "grid", 8, MANNINGS_N, 0.012, &record)
            .unwrap();
        let (default, read) = to_sparse_from_folder(&folder, &BasisConfig::default()).unwrap();
        assert!((default - 0.012).abs() < 1e-15);
        assert_eq!(read, record);
    }

    #[test]
    fn test_landuse_folders_sorted() {
        let tmp = tempfile::tempdir().unwrap();
        for name in ["landuse_02", "landuse_00", "test", "landuse_01"] {
            fs::create_dir_all(tmp.path().join(name)).unwrap();
        }
        fs::write(tmp.path().join("landuse_readme"), "not a folder").unwrap();
        let folders = landuse_folders(tmp.path()).unwrap();
        let names: Vec<_> = folders
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["landuse_00", "landuse_01", "landuse_02"]);
    }

    #[test]
    fn test_no_landuse_folders() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(matches!(
            landuse_folders(tmp.path()),
            Err(BasisError::NoBasisFolders(_))
        ));
    }

    #[test]
    fn test_load_basis_vectors_in_folder_order() {
        let tmp = tempfile::tempdir().unwrap();
        let records = vec![
            AttributeRecord::from([(1, 0.1), (3, 0.2)]),
            AttributeRecord::from([(2, 0.05)]),
        ];
        make_basis_dir(tmp.path(), &records, 5);
        let basis = load_basis_vectors(&BasisConfig::new(tmp.path())).unwrap();
        assert_eq!(basis.records, records);
    }

    #[test]
    fn test_load_basis_vectors_node_count_mismatch() {
        let tmp = tempfile::tempdir().unwrap();
        make_basis_dir(tmp.path(), &[AttributeRecord::from([(1, 1.)])], 5);
        let folder = tmp.path().join("landuse_01");
        fs::create_dir_all(&folder).unwrap();
        let record = AttributeRecord::from([(2, 1.)]);
        write_new_attribute(folder.join("fort.13"), "grid", 6, MANNINGS_N, 0., &record).unwrap();
        assert!(matches!(
            load_basis_vectors(&BasisConfig::new(tmp.path())),
            Err(BasisError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_condense_basis_folders_by_worker() {
        let tmp = tempfile::tempdir().unwrap();
        let records = vec![
            AttributeRecord::from([(1, 1e-9), (2, 0.3)]),
            AttributeRecord::from([(3, 0.), (4, 0.5)]),
            AttributeRecord::from([(5, -1.), (6, 0.2)]),
        ];
        make_basis_dir(tmp.path(), &records, 6);
        let config = BasisConfig::new(tmp.path());

        let handled = condense_basis_folders(&WorkerContext::new(1, 2), &config).unwrap();
        assert_eq!(handled, vec![1]);
        let basis = load_basis_vectors(&config).unwrap();
        assert_eq!(basis[0], records[0]);
        assert_eq!(basis[1], AttributeRecord::from([(4, 0.5)]));

        let handled = condense_basis_folders(&WorkerContext::new(0, 2), &config).unwrap();
        assert_eq!(handled, vec![0, 2]);
        let basis = load_basis_vectors(&config).unwrap();
        assert_eq!(basis[0], AttributeRecord::from([(2, 0.3)]));
        assert_eq!(basis[2], AttributeRecord::from([(6, 0.2)]));
    }

    #[test]
    fn test_setup_landuse_tables() {
        let tmp = tempfile::tempdir().unwrap();
        let mut classes = BTreeMap::new();
        classes.insert(11, 0.02);
        classes.insert(21, 0.035);
        classes.insert(42, 0.1);
        let table = LandUseTable::new("nlcd.table", classes);
        let folders = setup_landuse_tables(&table, tmp.path(), 1.).unwrap();
        assert_eq!(folders.len(), 3);
        let second = read_tables(&folders[1]).unwrap();
        assert_eq!(second[0].weights(), array![0., 1., 0.]);
        assert_eq!(landuse_folders(tmp.path()).unwrap(), folders);
    }

    #[test]
    fn test_write_field_dense_and_sparse() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("fort.13");
        let empty = AttributeRecord::new();
        write_new_attribute(&path, "grid", 4, MANNINGS_N, 0.012, &empty).unwrap();

        let dense = Field::Dense(array![0.02, 0.012, 0.1, 0.012]);
        write_field(&path, MANNINGS_N, &dense, 0.012).unwrap();
        let attribute = read_attribute(&path, MANNINGS_N).unwrap();
        assert_eq!(attribute.record, AttributeRecord::from([(1, 0.02), (3, 0.1)]));

        let sparse = Field::Sparse(AttributeRecord::from([(2, 0.5)]));
        write_field(&path, MANNINGS_N, &sparse, 0.03).unwrap();
        let attribute = read_attribute(&path, MANNINGS_N).unwrap();
        assert_eq!(attribute.record, AttributeRecord::from([(2, 0.5)]));
        assert!((attribute.default_value - 0.03).abs() < 1e-15);

        write_field_full(&path, MANNINGS_N, &Field::Dense(array![0., 1., 0., 2.])).unwrap();
        let attribute = read_attribute(&path, MANNINGS_N).unwrap();
        assert_eq!(attribute.record.len(), 4);
    }

    /// Three classes over nodes 1..=6 of a 7 node mesh, reference run in `test/`
    fn make_reference_run(dir: &Path) -> LandUseTable {
        let mut classes = BTreeMap::new();
        classes.insert(11, 0.02);
        classes.insert(21, 0.035);
        classes.insert(42, 0.1);
        let table = LandUseTable::new("nlcd.table", classes);
        setup_landuse_tables(&table, dir, 1.).unwrap();
        make_basis_dir(
            dir,
            &[
                AttributeRecord::from([(1, 1.), (4, 1.)]),
                AttributeRecord::from([(2, 1.), (5, 1.)]),
                AttributeRecord::from([(3, 1.), (6, 1.)]),
            ],
            7,
        );
        let reference = dir.join("test");
        fs::create_dir_all(&reference).unwrap();
        let record = AttributeRecord::from([
            (1, 0.02),
            (2, 0.035),
            (3, 0.1),
            (4, 0.02),
            (5, 0.035),
            (6, 0.1),
        ]);
        write_new_attribute(reference.join("fort.13"), "grid", 7, MANNINGS_N, 0.012, &record)
            .unwrap();
        table.write(&reference).unwrap();
        table
    }

    #[test]
    fn test_reference_weights() {
        let tmp = tempfile::tempdir().unwrap();
        make_reference_run(tmp.path());
        let config = BasisConfig::new(tmp.path());
        assert_eq!(reference_weights(&config).unwrap(), array![0.02, 0.035, 0.1]);

        fs::remove_file(tmp.path().join("test").join("nlcd.table")).unwrap();
        assert!(matches!(
            reference_weights(&config),
            Err(BasisError::MissingAttribute { .. })
        ));
    }

    #[test]
    fn test_combine_basis_dir() {
        let tmp = tempfile::tempdir().unwrap();
        make_reference_run(tmp.path());
        let config = BasisConfig::new(tmp.path());
        let output = tmp.path().join("combined.13");

        let record = combine_basis_dir(&config, None, None, &output).unwrap();
        let written = read_attribute(&output, MANNINGS_N).unwrap();
        assert_eq!(written.record, record);
        assert_eq!(written.node_num, 7);
        assert!((written.default_value - 0.012).abs() < 1e-15);
        assert_eq!(record.get(5), Some(0.035));
        assert_eq!(record.get(7), None);

        let weights = array![1., 2., 3.];
        let record =
            combine_basis_dir(&config, Some(weights), Some(output.as_path()), &output).unwrap();
        assert_eq!(record.get(6), Some(3.));
        let written = read_attribute(&output, MANNINGS_N).unwrap();
        assert_eq!(written.record, record);

        assert!(matches!(
            combine_basis_dir(&config, Some(array![1., 2.]), None, &output),
            Err(BasisError::DimensionMismatch { .. })
        ));
    }
}
