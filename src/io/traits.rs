//! `ReadWrite` trait
use super::read_write_hdf5::{read_from_hdf5, write_to_hdf5};
use hdf5::{Error, Result};
use ndarray::{ArrayBase, Data, DataMut, Dimension};
use std::path::Path;
use tracing::{error, info};

/// Read and write fields (hdf5)
pub trait ReadWrite {
    /// Read field data from hdf5 file
    ///
    /// # Errors
    /// Can't read file
    fn read<P: AsRef<Path>>(&mut self, filename: P, varname: &str) -> Result<()>;
    /// Read field data from hdf5 file and handle result
    fn read_unwrap<P: AsRef<Path>>(&mut self, filename: P, varname: &str);
    /// Write field data to hdf5 file
    ///
    /// # Errors
    /// Can't write file
    fn write<P: AsRef<Path>>(&self, filename: P, varname: &str) -> Result<()>;
    /// Write field data to hdf5 file and handle result
    fn write_unwrap<P: AsRef<Path>>(&self, filename: P, varname: &str);
}

impl<S, D> ReadWrite for ArrayBase<S, D>
where
    S: Data<Elem = f64> + DataMut,
    D: Dimension,
{
    fn read<P: AsRef<Path>>(&mut self, filename: P, varname: &str) -> Result<()> {
        let data = read_from_hdf5::<f64, D, _>(filename, varname)?;
        if data.shape() == self.shape() {
            self.assign(&data);
            Ok(())
        } else {
            Err(Error::Internal("Shape mismatch while reading.".to_owned()))
        }
    }

    fn read_unwrap<P: AsRef<Path>>(&mut self, filename: P, varname: &str) {
        let filename = filename.as_ref();
        match self.read(filename, varname) {
            Ok(_) => {
                info!("Reading file {:?} was successfull.", filename);
            }
            Err(e) => error!("Error while reading file {:?}. Error: {}", filename, e),
        }
    }

    fn write<P: AsRef<Path>>(&self, filename: P, varname: &str) -> Result<()> {
        write_to_hdf5(filename, varname, self)?;
        Ok(())
    }

    fn write_unwrap<P: AsRef<Path>>(&self, filename: P, varname: &str) {
        let filename = filename.as_ref();
        match self.write(filename, varname) {
            Ok(_) => (),
            Err(e) => error!("Error while writing file {:?}. Error: {}", filename, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array1};
    use tempfile::tempdir;

    #[test]
    fn test_read_write_field() {
        let dir = tempdir().unwrap();
        let filename = dir.path().join("field.h5");
        let field = array![0.012, 0.02, 0.035];
        field.write(&filename, "field").unwrap();

        let mut read = Array1::<f64>::zeros(3);
        read.read(&filename, "field").unwrap();
        assert_eq!(read, field);

        let mut wrong = Array1::<f64>::zeros(4);
        assert!(wrong.read(&filename, "field").is_err());
    }
}
