//! # Input / output
//!
//! - `fort.13` nodal attribute files, see [`fort13`]
//! - `fort.14` grid files (node table), see [`fort14`]
//! - land classification tables, see [`table`]
//! - `hdf5` storage of dense fields, see [`read_write_hdf5`]
pub mod fort13;
pub mod fort14;
pub mod read_write_hdf5;
pub mod table;
pub mod traits;
pub use fort13::{read_attribute, write_attribute, AttributeFile, MANNINGS_N};
pub use fort14::{read_mesh, Mesh};
pub use read_write_hdf5::{read_from_hdf5, write_to_hdf5};
pub use read_write_hdf5::{read_scalar_from_hdf5, write_scalar_to_hdf5};
pub use table::{read_table, read_tables, LandUseTable};
pub use traits::ReadWrite;
