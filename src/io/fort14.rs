//! Read mesh nodes from a grid file (`fort.14`)
//!
//! Only the node table is read, elements and boundaries are skipped.
use crate::error::{BasisError, Result};
use crate::types::Node;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Mesh nodes, `nodes[i]` is node `i + 1`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    /// Grid name (first line)
    pub name: String,
    /// Number of elements
    pub element_num: usize,
    /// Nodes in node order
    pub nodes: Vec<Node>,
}

impl Mesh {
    /// Number of nodes
    pub fn node_num(&self) -> usize {
        self.nodes.len()
    }

    /// Node with id `node` (1-based)
    pub fn node(&self, node: usize) -> Option<&Node> {
        node.checked_sub(1).and_then(|i| self.nodes.get(i))
    }
}

/// Read the node table of a `fort.14`
///
/// # Errors
/// File can't be read, or node table is malformed or not numbered 1..NP.
pub fn read_mesh<P: AsRef<Path>>(path: P) -> Result<Mesh> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    parse_mesh(reader, path)
}

/// Parse the node table from a reader, `path` is used in error messages.
///
/// # Errors
/// Node table is malformed
pub fn parse_mesh<R: BufRead>(reader: R, path: &Path) -> Result<Mesh> {
    let mut lines = reader.lines();
    let err = |line: usize, msg: &str| BasisError::parse(path, line, msg);

    let name = lines
        .next()
        .ok_or_else(|| err(1, "missing grid name"))??
        .trim()
        .to_owned();
    let sizes = lines.next().ok_or_else(|| err(2, "missing NE NP line"))??;
    let sizes: Vec<usize> = sizes
        .split_whitespace()
        .take(2)
        .map(str::parse)
        .collect::<std::result::Result<_, _>>()
        .map_err(|_| err(2, "expected number of elements and nodes"))?;
    if sizes.len() != 2 {
        return Err(err(2, "expected number of elements and nodes"));
    }
    let (element_num, node_num) = (sizes[0], sizes[1]);

    let mut nodes = Vec::with_capacity(node_num);
    for i in 0..node_num {
        let line_num = i + 3;
        let line = lines
            .next()
            .ok_or_else(|| err(line_num, "unexpected end of node table"))??;
        let values: Vec<f64> = line
            .split_whitespace()
            .take(4)
            .map(str::parse)
            .collect::<std::result::Result<_, _>>()
            .map_err(|_| err(line_num, "expected id x y depth"))?;
        if values.len() != 4 {
            return Err(err(line_num, "expected id x y depth"));
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let id = values[0] as usize;
        if id != i + 1 {
            return Err(err(line_num, "nodes must be numbered consecutively from 1"));
        }
        nodes.push(Node {
            x: values[1],
            y: values[2],
            bathymetry: values[3],
        });
    }

    Ok(Mesh {
        name,
        element_num,
        nodes,
    })
}
