//! # `meshbasis`: Land classification basis vectors on unstructured meshes
//!
//! # Dependencies
//! - cargo >= v1.56
//! - `hdf5` (sudo apt-get install -y libhdf5-dev)
//!
//! With feature `mpi`, basis folders can be distributed across mpi ranks.
//! This requires an mpi installation and libclang.
//!
//! # Details
//!
//! A nodal attribute field (e.g. Manning's n at the sea floor) on a mesh of
//! `node_num` nodes is stored sparsely: only nodes that differ from a default
//! value are listed ([`AttributeRecord`]). A field is synthesized from one
//! basis vector per land classification,
//!
//! `field = w_0 * basis_0 + ... + w_k * basis_k`
//!
//! where the basis vectors are either sparse ([`BasisVectorSet`]) or the
//! columns of a dense array ([`types::BasisArray`]).
//!
//! - Expand/collapse sparse and dense fields, see [`codec`]
//! - Linear combination, see [`combine`]
//! - Drop near-zero entries of basis vectors, see [`condense`]
//! - Validate a reconstruction against ground truth, see [`compare`]
//! - Basis directories (`landuse_*` folders), see [`landuse`]
//! - File formats (`fort.13`, `fort.14`, `*.table`, `hdf5`), see [`io`]
//!
//! A node that no basis vector lists contributes 0 in every representation
//! and takes the default value once, after combination.
//!
//! # Example
//! Combine two basis vectors, nodes 4 and 5 take the default value
//! ```
//! use meshbasis::combine::combine_sparse_full;
//! use meshbasis::{AttributeRecord, BasisVectorSet};
//! use ndarray::array;
//!
//! let basis = BasisVectorSet::new(vec![
//!     AttributeRecord::from([(1, 0.1), (3, 0.2)]),
//!     AttributeRecord::from([(2, 0.05)]),
//! ]);
//! let field = combine_sparse_full(&array![1., 1.], &basis, 0.02, 5).unwrap();
//! assert_eq!(field, array![0.1, 0.05, 0.2, 0.02, 0.02]);
//! ```
//!
//! ## Compare a basis directory
//!
//! `cargo run --release -- compare path/to/basis`
//!
//! writes all diagnostic fields to `data/compare.h5`.
//!
//! ## Documentation
//!
//! Download and run:
//!
//! `cargo doc --open`
#![warn(missing_docs)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#[macro_use]
extern crate enum_dispatch;
pub mod codec;
pub mod combine;
pub mod compare;
pub mod condense;
pub mod config;
pub mod error;
pub mod io;
pub mod landuse;
pub mod sample;
pub mod types;
pub mod worker;

pub use combine::{BasisRepresentation, Combine, Field};
pub use compare::{compare, Comparison};
pub use config::BasisConfig;
pub use error::{BasisError, Result};
pub use types::{AttributeRecord, BasisVectorSet};
pub use worker::WorkerContext;
