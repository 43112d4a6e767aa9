//! Land classification tables (`*.table`)
//!
//! Map a land classification code to a coefficient (e.g. Manning's n):
//!
//! ```text
//!   3    ! Total number of Class
//!   1    0.02 :description
//!   2    0.035 :description
//!   3    0.1 :description
//! The class has default value(=-9999) will be skiped in mapping
//! ```
use crate::error::Result;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Relation between land classification codes and coefficient values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandUseTable {
    /// Name of the table file, `*.table`
    pub file_name: String,
    /// Land classification code and associated value
    pub land_classes: BTreeMap<i32, f64>,
}

impl LandUseTable {
    /// New table
    pub fn new(file_name: &str, land_classes: BTreeMap<i32, f64>) -> Self {
        Self {
            file_name: file_name.to_owned(),
            land_classes,
        }
    }

    /// Land classification codes in ascending order
    pub fn land_classes(&self) -> Vec<i32> {
        self.land_classes.keys().copied().collect()
    }

    /// Number of land classifications
    pub fn num_land_classes(&self) -> usize {
        self.land_classes.len()
    }

    /// Values in ascending code order.
    ///
    /// The i-th value weights the basis vector of folder `landuse_{i:02}`.
    pub fn weights(&self) -> Array1<f64> {
        self.land_classes.values().copied().collect()
    }

    /// Copy of this table where `class` has `value` and every
    /// other class has 0.
    pub fn single_value(&self, class: i32, value: f64) -> Self {
        let land_classes = self
            .land_classes
            .keys()
            .map(|k| (*k, if *k == class { value } else { 0. }))
            .collect();
        Self::new(&self.file_name, land_classes)
    }

    /// Write `self.file_name` into `folder`
    ///
    /// # Errors
    /// File can't be written
    pub fn write<P: AsRef<Path>>(&self, folder: P) -> Result<()> {
        let path = folder.as_ref().join(&self.file_name);
        debug!("Creating land use table {:?}", path);
        let mut f = BufWriter::new(File::create(&path)?);
        writeln!(f, " {:3}    ! Total number of Class", self.num_land_classes())?;
        for (k, v) in &self.land_classes {
            writeln!(f, "{:3}    {:?} :description", k, v)?;
        }
        write!(
            f,
            "The class has default value(=-9999) will be skiped in mapping"
        )?;
        f.flush()?;
        Ok(())
    }
}

/// Parse a `code value :description` line
fn parse_class_line(line: &str) -> Option<(i32, f64)> {
    let (head, _description) = line.split_once(':')?;
    let mut tokens = head.split_whitespace();
    let code = tokens.next()?.parse::<i32>().ok()?;
    let value = tokens.next()?.parse::<f64>().ok()?;
    if tokens.next().is_some() {
        return None;
    }
    Some((code, value))
}

/// Read a table file, lines which are no class entries are skipped.
///
/// # Errors
/// File can't be read
pub fn read_table<P: AsRef<Path>>(path: P) -> Result<LandUseTable> {
    let path = path.as_ref();
    debug!("Reading land use table {:?}", path);
    let reader = BufReader::new(File::open(path)?);
    let mut land_classes = BTreeMap::new();
    for line in reader.lines() {
        if let Some((code, value)) = parse_class_line(&line?) {
            land_classes.insert(code, value);
        }
    }
    let file_name = path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(LandUseTable::new(&file_name, land_classes))
}

/// Read all `*.table` files in `folder`, sorted by file name.
///
/// # Errors
/// Folder or a file can't be read
pub fn read_tables<P: AsRef<Path>>(folder: P) -> Result<Vec<LandUseTable>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(folder.as_ref())? {
        let path = entry?.path();
        if path.is_file() && path.extension().map_or(false, |e| e == "table") {
            paths.push(path);
        }
    }
    paths.sort();
    paths.iter().map(read_table).collect()
}
