//! `Hdf5` functions to write ndarrays
use hdf5::{H5Type, Result};
use ndarray::{Array, Array1, ArrayBase, ArrayD, Dimension};
use std::path::Path;

/// Read scalar from hdf5
///
/// # Errors
/// When file or variable does not exists, or variable
/// is not of dimensionality 1.
pub fn read_scalar_from_hdf5<T, P>(filename: P, name: &str) -> Result<T>
where
    T: H5Type + Clone + Copy,
    P: AsRef<Path>,
{
    let scalar = read_from_hdf5::<T, ndarray::Ix1, P>(filename, name)?;
    scalar
        .first()
        .copied()
        .ok_or_else(|| hdf5::Error::Internal(format!("Dataset {} is empty.", name)))
}

/// Interface to write scalar to hdf5 file
///
/// # Errors
/// When file can't be created.
pub fn write_scalar_to_hdf5<T, P>(filename: P, name: &str, scalar: T) -> Result<()>
where
    T: H5Type + Copy,
    P: AsRef<Path>,
{
    let x = Array1::<T>::from_elem(1, scalar);
    write_to_hdf5(filename, name, &x)?;
    Ok(())
}

/// Read ndarray from hdf5 file
///
/// # Errors
/// Errors when file/variable does not exist and
/// when the dataset has a different dimensionality than `D`.
pub fn read_from_hdf5<A, D, P>(filename: P, varname: &str) -> Result<Array<A, D>>
where
    A: H5Type,
    D: Dimension,
    P: AsRef<Path>,
{
    // Open file
    let file = hdf5::File::open(filename)?;

    //Read dataset
    let data = file.dataset(varname)?;
    let y: ArrayD<A> = data.read_dyn::<A>()?;

    // Dyn to static
    y.into_dimensionality::<D>()
        .map_err(|e| hdf5::Error::Internal(format!("{}: {}", varname, e)))
}

/// Write ndarray to hdf5 file
///
/// # Errors
/// When file can't be created or when file and
/// variable exists, but variable has different
/// shape than input array (assign new value will fail).
pub fn write_to_hdf5<A, S, D, P>(filename: P, varname: &str, array: &ArrayBase<S, D>) -> Result<()>
where
    A: H5Type,
    S: ndarray::Data<Elem = A>,
    D: ndarray::Dimension,
    P: AsRef<Path>,
{
    // Open file
    let file = if filename.as_ref().exists() {
        hdf5::File::append(filename)?
    } else {
        hdf5::File::create(filename)?
    };

    //Write dataset
    let dset = match file.dataset(varname) {
        Ok(dset) => {
            // Overwrite
            dset
        }
        Err(..) => {
            // Create new dataset
            file.new_dataset::<A>()
                .no_chunk()
                .shape(array.shape())
                .create(varname)?
        }
    };
    dset.write(&array.view())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2, Ix2};
    use tempfile::tempdir;

    #[test]
    fn test_write_read_array() {
        let dir = tempdir().unwrap();
        let filename = dir.path().join("basis.h5");
        let basis: Array2<f64> = array![[0.1, 0.], [0., 0.05], [0.2, 0.]];
        write_to_hdf5(&filename, "basis", &basis).unwrap();
        let read = read_from_hdf5::<f64, Ix2, _>(&filename, "basis").unwrap();
        assert_eq!(read, basis);
    }

    #[test]
    fn test_write_read_scalar() {
        let dir = tempdir().unwrap();
        let filename = dir.path().join("scalar.h5");
        write_scalar_to_hdf5(&filename, "default", 0.012).unwrap();
        write_scalar_to_hdf5(&filename, "default", 0.02).unwrap();
        let value: f64 = read_scalar_from_hdf5(&filename, "default").unwrap();
        assert!((value - 0.02).abs() < 1e-15);
    }
}
