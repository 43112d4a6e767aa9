//! Read and write nodal attribute files (`fort.13`)
//!
//! ```text
//! grid name
//! 9                           ! number of nodes
//! 1                           ! number of attributes
//! mannings_n_at_sea_floor     ! header block, one per attribute
//! unitless
//! 1                           ! values per node
//! 0.012                       ! default value
//! mannings_n_at_sea_floor     ! body block, one per attribute
//! 2                           ! number of non-default nodes
//! 3        0.02
//! 7        0.035
//! ```
//!
//! Only single valued attributes are supported. Other attributes in the
//! file are carried through unchanged when writing.
use crate::error::{BasisError, Result};
use crate::types::{AttributeRecord, NodeId};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Manning's n attribute name
pub const MANNINGS_N: &str = "mannings_n_at_sea_floor";

/// Content of one attribute of a `fort.13` file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeFile {
    /// Number of mesh nodes
    pub node_num: usize,
    /// Value of every node not listed in `record`
    pub default_value: f64,
    /// Non-default values
    pub record: AttributeRecord,
}

/// Line reader which tracks line numbers for error messages
struct LineCursor<R> {
    lines: std::io::Lines<R>,
    path: PathBuf,
    line: usize,
}

impl<R: BufRead> LineCursor<R> {
    fn new(reader: R, path: &Path) -> Self {
        Self {
            lines: reader.lines(),
            path: path.to_path_buf(),
            line: 0,
        }
    }

    fn next_line(&mut self) -> Result<Option<String>> {
        match self.lines.next() {
            Some(line) => {
                self.line += 1;
                Ok(Some(line?))
            }
            None => Ok(None),
        }
    }

    fn expect_line(&mut self, what: &str) -> Result<String> {
        match self.next_line()? {
            Some(line) => Ok(line),
            None => Err(self.error(format!("unexpected end of file, expected {}", what))),
        }
    }

    /// Parse the first token of the next line
    fn parse_next<T: FromStr>(&mut self, what: &str) -> Result<T> {
        let line = self.expect_line(what)?;
        self.parse_token(line.split_whitespace().next(), what)
    }

    fn parse_token<T: FromStr>(&self, token: Option<&str>, what: &str) -> Result<T> {
        token
            .and_then(|t| t.parse::<T>().ok())
            .ok_or_else(|| self.error(format!("expected {}", what)))
    }

    /// Advance until a line starting with `name`, returns that line
    fn seek(&mut self, name: &str) -> Result<Option<String>> {
        while let Some(line) = self.next_line()? {
            if is_attribute_line(&line, name) {
                return Ok(Some(line));
            }
        }
        Ok(None)
    }

    fn error(&self, msg: String) -> BasisError {
        BasisError::parse(&self.path, self.line, msg)
    }
}

fn is_attribute_line(line: &str, name: &str) -> bool {
    line.split_whitespace().next() == Some(name)
}

fn missing(path: &Path, name: &str) -> BasisError {
    BasisError::MissingAttribute {
        path: path.to_path_buf(),
        name: name.to_owned(),
    }
}

fn open<P: AsRef<Path>>(path: P) -> Result<LineCursor<BufReader<File>>> {
    let file = File::open(path.as_ref())?;
    Ok(LineCursor::new(BufReader::new(file), path.as_ref()))
}

/// Read number of mesh nodes (second line)
///
/// # Errors
/// File can't be read or line is not an integer.
pub fn read_node_num<P: AsRef<Path>>(path: P) -> Result<usize> {
    let mut cursor = open(path)?;
    cursor.expect_line("grid name")?;
    cursor.parse_next("number of nodes")
}

/// Read default value of attribute `name`
///
/// # Errors
/// File can't be read, or attribute is missing or malformed.
pub fn read_default<P: AsRef<Path>>(path: P, name: &str) -> Result<f64> {
    let mut cursor = open(path.as_ref())?;
    if cursor.seek(name)?.is_none() {
        return Err(missing(path.as_ref(), name));
    }
    cursor.expect_line("units")?;
    cursor.expect_line("values per node")?;
    cursor.parse_next("default value")
}

/// Read attribute `name` into a sparse record plus its default value
///
/// # Errors
/// File can't be read, or attribute is missing or malformed.
pub fn read_attribute<P: AsRef<Path>>(path: P, name: &str) -> Result<AttributeFile> {
    let file = File::open(path.as_ref())?;
    parse_attribute(BufReader::new(file), path.as_ref(), name)
}

/// Parse attribute `name` from a reader positioned at the start of a `fort.13`.
///
/// `path` is used in error messages only.
///
/// # Errors
/// Attribute is missing or malformed.
pub fn parse_attribute<R: BufRead>(reader: R, path: &Path, name: &str) -> Result<AttributeFile> {
    let mut cursor = LineCursor::new(reader, path);
    cursor.expect_line("grid name")?;
    let node_num: usize = cursor.parse_next("number of nodes")?;

    // Header block
    if cursor.seek(name)?.is_none() {
        return Err(missing(path, name));
    }
    cursor.expect_line("units")?;
    let values_per_node: usize = cursor.parse_next("values per node")?;
    if values_per_node != 1 {
        return Err(cursor.error(format!(
            "{} has {} values per node, only 1 is supported",
            name, values_per_node
        )));
    }
    let default_value: f64 = cursor.parse_next("default value")?;

    // Body block
    if cursor.seek(name)?.is_none() {
        return Err(missing(path, name));
    }
    let count: usize = cursor.parse_next("number of non-default nodes")?;
    let mut record = AttributeRecord::new();
    for _ in 0..count {
        let line = cursor.expect_line("node value pair")?;
        let mut tokens = line.split_whitespace();
        let node: NodeId = cursor.parse_token(tokens.next(), "node number")?;
        let value: f64 = cursor.parse_token(tokens.next(), "nodal value")?;
        if node == 0 || node > node_num {
            return Err(cursor.error(format!(
                "node {} outside of mesh with {} nodes",
                node, node_num
            )));
        }
        record.insert(node, value);
    }

    Ok(AttributeFile {
        node_num,
        default_value,
        record,
    })
}

/// Format a node value line
pub fn format_node_value(node: NodeId, value: f64) -> String {
    format!("{:<8} {:>17}", node, value)
}

/// Replace attribute `name` of the file at `path` by `record`.
///
/// The existing file is the template: all other lines are kept, the default
/// value is replaced if `default` is `Some`. The file is written to a
/// temporary sibling and renamed afterwards.
///
/// # Errors
/// File can't be read/written, or attribute is missing.
pub fn write_attribute<P: AsRef<Path>>(
    path: P,
    name: &str,
    record: &AttributeRecord,
    default: Option<f64>,
) -> Result<()> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    let tmp = tmp_name(path);
    let rendered = File::create(&tmp).map_err(BasisError::from).and_then(|f| {
        let mut writer = BufWriter::new(f);
        render_attribute(reader, &mut writer, path, name, record, default)?;
        writer.flush()?;
        Ok(())
    });
    if let Err(e) = rendered {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    fs::rename(&tmp, path)?;
    Ok(())
}

fn tmp_name(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|s| s.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Copy `reader` to `writer`, replacing attribute `name` by `record`.
///
/// # Errors
/// Attribute is missing or malformed, or writing fails.
pub fn render_attribute<R: BufRead, W: Write>(
    reader: R,
    writer: &mut W,
    path: &Path,
    name: &str,
    record: &AttributeRecord,
    default: Option<f64>,
) -> Result<()> {
    let mut cursor = LineCursor::new(reader, path);

    // Header block
    copy_until(&mut cursor, writer, name)?;
    writeln!(writer, "{}", cursor.expect_line("units")?)?;
    writeln!(writer, "{}", cursor.expect_line("values per node")?)?;
    let old_default = cursor.expect_line("default value")?;
    match default {
        Some(value) => writeln!(writer, "{}", value)?,
        None => writeln!(writer, "{}", old_default)?,
    }

    // Body block
    copy_until(&mut cursor, writer, name)?;
    let old_count: usize = cursor.parse_next("number of non-default nodes")?;
    for _ in 0..old_count {
        cursor.expect_line("node value pair")?;
    }
    writeln!(writer, "{}", record.len())?;
    for (node, value) in record.iter() {
        writeln!(writer, "{}", format_node_value(node, value))?;
    }

    // Remaining attributes
    while let Some(line) = cursor.next_line()? {
        writeln!(writer, "{}", line)?;
    }
    Ok(())
}

fn copy_until<R: BufRead, W: Write>(
    cursor: &mut LineCursor<R>,
    writer: &mut W,
    name: &str,
) -> Result<()> {
    while let Some(line) = cursor.next_line()? {
        writeln!(writer, "{}", line)?;
        if is_attribute_line(&line, name) {
            return Ok(());
        }
    }
    Err(missing(&cursor.path, name))
}

/// Create a `fort.13` holding a single attribute.
///
/// # Errors
/// File can't be written.
pub fn write_new_attribute<P: AsRef<Path>>(
    path: P,
    grid_name: &str,
    node_num: usize,
    name: &str,
    default: f64,
    record: &AttributeRecord,
) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    writeln!(writer, "{}", grid_name)?;
    writeln!(writer, "{}", node_num)?;
    writeln!(writer, "1")?;
    writeln!(writer, "{}", name)?;
    writeln!(writer, "unitless")?;
    writeln!(writer, "1")?;
    writeln!(writer, "{}", default)?;
    writeln!(writer, "{}", name)?;
    writeln!(writer, "{}", record.len())?;
    for (node, value) in record.iter() {
        writeln!(writer, "{}", format_node_value(node, value))?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::tempdir;

    const TWO_ATTRIBUTES: &str = "test grid
9
2
primitive_weighting_in_continuity_equation
unitless
1
0.03
mannings_n_at_sea_floor
s/m^(1/3)
1
0.012
primitive_weighting_in_continuity_equation
1
4        0.05
mannings_n_at_sea_floor
2
3        0.02
7                    0.035
";

    #[test]
    fn test_parse_attribute() {
        let file = parse_attribute(Cursor::new(TWO_ATTRIBUTES), Path::new("fort.13"), MANNINGS_N)
            .unwrap();
        assert_eq!(file.node_num, 9);
        assert!((file.default_value - 0.012).abs() < 1e-15);
        assert_eq!(file.record, AttributeRecord::from([(3, 0.02), (7, 0.035)]));
    }

    #[test]
    fn test_parse_other_attribute() {
        let name = "primitive_weighting_in_continuity_equation";
        let file = parse_attribute(Cursor::new(TWO_ATTRIBUTES), Path::new("fort.13"), name).unwrap();
        assert_eq!(file.record, AttributeRecord::from([(4, 0.05)]));
    }

    #[test]
    fn test_parse_missing_attribute() {
        let result = parse_attribute(Cursor::new(TWO_ATTRIBUTES), Path::new("fort.13"), "foo");
        assert!(matches!(result, Err(BasisError::MissingAttribute { .. })));
    }

    #[test]
    fn test_parse_truncated_body() {
        let truncated = TWO_ATTRIBUTES.trim_end().rsplitn(2, '\n').nth(1).unwrap();
        let result = parse_attribute(Cursor::new(truncated), Path::new("fort.13"), MANNINGS_N);
        match result {
            Err(BasisError::Parse { line, .. }) => assert_eq!(line, 17),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_bad_value() {
        let bad = TWO_ATTRIBUTES.replace("0.035", "abc");
        let result = parse_attribute(Cursor::new(bad), Path::new("fort.13"), MANNINGS_N);
        match result {
            Err(BasisError::Parse { line, msg, .. }) => {
                assert_eq!(line, 18);
                assert!(msg.contains("nodal value"));
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_render_keeps_other_attributes() {
        let record = AttributeRecord::from([(1, 0.1), (2, 0.2), (9, 0.9)]);
        let mut out = Vec::new();
        render_attribute(
            Cursor::new(TWO_ATTRIBUTES),
            &mut out,
            Path::new("fort.13"),
            MANNINGS_N,
            &record,
            Some(0.02),
        )
        .unwrap();
        let text = String::from_utf8(out).unwrap();
        let file = parse_attribute(Cursor::new(&text), Path::new("fort.13"), MANNINGS_N).unwrap();
        assert_eq!(file.record, record);
        assert!((file.default_value - 0.02).abs() < 1e-15);
        let other = parse_attribute(
            Cursor::new(&text),
            Path::new("fort.13"),
            "primitive_weighting_in_continuity_equation",
        )
        .unwrap();
        assert_eq!(other.record, AttributeRecord::from([(4, 0.05)]));
        assert!((other.default_value - 0.03).abs() < 1e-15);
    }

    #[test]
    fn test_write_read_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fort.13");
        let record = AttributeRecord::from([(2, 0.1), (5, 0.123_456_789_012_345)]);
        write_new_attribute(&path, "grid", 6, MANNINGS_N, 0.012, &record).unwrap();
        assert_eq!(read_node_num(&path).unwrap(), 6);
        assert!((read_default(&path, MANNINGS_N).unwrap() - 0.012).abs() < 1e-15);

        let updated = AttributeRecord::from([(1, 0.3), (6, 0.4)]);
        write_attribute(&path, MANNINGS_N, &updated, None).unwrap();
        let file = read_attribute(&path, MANNINGS_N).unwrap();
        assert_eq!(file.record, updated);
        assert!((file.default_value - 0.012).abs() < 1e-15);
        assert!(!tmp_name(&path).exists());
    }

    #[test]
    fn test_write_missing_attribute_keeps_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fort.13");
        let record = AttributeRecord::from([(2, 0.1)]);
        write_new_attribute(&path, "grid", 4, MANNINGS_N, 0.012, &record).unwrap();

        let result = write_attribute(&path, "foo", &AttributeRecord::new(), None);
        assert!(matches!(result, Err(BasisError::MissingAttribute { .. })));
        assert!(!tmp_name(&path).exists());
        assert_eq!(read_attribute(&path, MANNINGS_N).unwrap().record, record);
    }

    #[test]
    fn test_format_node_value() {
        assert_eq!(format_node_value(12, 0.5), "12                     0.5");
    }
}
