//! Types for nodal attribute data on an unstructured mesh
//!
//! Nodes are numbered from 1 to `node_num`. Dense fields store node `i`
//! at array index `i - 1`.
use crate::error::{BasisError, Result};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::collections::btree_map;
use std::collections::{BTreeMap, BTreeSet};
use std::iter::FromIterator;

/// Node number, starting at 1
pub type NodeId = usize;

/// One scalar per node, in node order
pub type DenseField = Array1<f64>;

/// Coefficients of a linear combination of basis vectors
pub type WeightVector = Array1<f64>;

/// Basis vectors as columns, size (`node_num`, `num_basis`)
pub type BasisArray = Array2<f64>;

/// Mesh vertex
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// x - coordinate
    pub x: f64,
    /// y - coordinate
    pub y: f64,
    /// Bathymetry at (x, y)
    pub bathymetry: f64,
}

/// Sparse nodal attribute: values for the listed nodes,
/// every other node takes a default supplied by the caller.
///
/// Backed by an ordered map, so iteration always runs in
/// ascending node order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeRecord {
    /// Non-default values
    pub values: BTreeMap<NodeId, f64>,
}

impl AttributeRecord {
    /// Empty record (all nodes default)
    pub fn new() -> Self {
        Self::default()
    }

    /// Value at `node`, if listed
    pub fn get(&self, node: NodeId) -> Option<f64> {
        self.values.get(&node).copied()
    }

    /// Set value at `node`, returns the previous value
    pub fn insert(&mut self, node: NodeId, value: f64) -> Option<f64> {
        self.values.insert(node, value)
    }

    /// Add `value` to the entry of `node` (missing entries start at zero)
    pub fn accumulate(&mut self, node: NodeId, value: f64) {
        *self.values.entry(node).or_insert(0.) += value;
    }

    /// Number of listed nodes
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// No node listed
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Check if `node` is listed
    pub fn contains(&self, node: NodeId) -> bool {
        self.values.contains_key(&node)
    }

    /// Iterate over (node, value) in ascending node order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, f64)> + '_ {
        self.values.iter().map(|(k, v)| (*k, *v))
    }

    /// Listed nodes in ascending order
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.values.keys().copied()
    }

    /// Largest listed node id
    pub fn max_node(&self) -> Option<NodeId> {
        self.values.keys().next_back().copied()
    }

    /// Add `factor * other`, the result lists the union of nodes
    pub fn add_scaled(&mut self, other: &AttributeRecord, factor: f64) {
        for (node, value) in other.iter() {
            self.accumulate(node, factor * value);
        }
    }

    /// Multiply every entry by `factor`
    pub fn scaled(&self, factor: f64) -> Self {
        self.iter().map(|(k, v)| (k, factor * v)).collect()
    }
}

impl FromIterator<(NodeId, f64)> for AttributeRecord {
    fn from_iter<I: IntoIterator<Item = (NodeId, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for AttributeRecord {
    type Item = (NodeId, f64);
    type IntoIter = btree_map::IntoIter<NodeId, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl<const N: usize> From<[(NodeId, f64); N]> for AttributeRecord {
    fn from(pairs: [(NodeId, f64); N]) -> Self {
        pairs.iter().copied().collect()
    }
}

/// Ordered collection of basis vectors, index = land classification index
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BasisVectorSet {
    /// One record per basis vector
    pub records: Vec<AttributeRecord>,
}

impl BasisVectorSet {
    /// Collect basis vectors
    pub fn new(records: Vec<AttributeRecord>) -> Self {
        Self { records }
    }

    /// Number of basis vectors
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// No basis vector
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over basis vectors in index order
    pub fn iter(&self) -> std::slice::Iter<'_, AttributeRecord> {
        self.records.iter()
    }

    /// Nodes listed in at least one basis vector
    pub fn coverage(&self) -> BTreeSet<NodeId> {
        self.records.iter().flat_map(AttributeRecord::nodes).collect()
    }

    /// Check that every listed node lies in `[1, node_num]`
    ///
    /// # Errors
    /// Reports the first offending basis index and node id.
    pub fn validate(&self, node_num: usize) -> Result<()> {
        for (basis, record) in self.records.iter().enumerate() {
            if let Some(node) = record.nodes().find(|n| *n == 0 || *n > node_num) {
                return Err(BasisError::NodeOutOfRange {
                    basis,
                    node,
                    node_num,
                });
            }
        }
        Ok(())
    }
}

impl std::ops::Index<usize> for BasisVectorSet {
    type Output = AttributeRecord;

    fn index(&self, index: usize) -> &Self::Output {
        &self.records[index]
    }
}

impl FromIterator<AttributeRecord> for BasisVectorSet {
    fn from_iter<I: IntoIterator<Item = AttributeRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
