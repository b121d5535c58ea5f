//! Positional layout sidecar.
//!
//! Node positions live in a plain-text file next to the exported network,
//! one line per node: `<identifier> <x> <y>`. The sidecar is produced on
//! export and consumed on import to restore where each node was drawn;
//! a network file without one falls back to interactive placement.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// One sidecar line: a node identifier and its canvas position.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutEntry {
    pub id: String,
    pub x: f64,
    pub y: f64,
}

/// Sidecar read/write failures.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("layout sidecar I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed layout line {line}: {content:?}")]
    Malformed { line: usize, content: String },
}

/// Derives the sidecar path from a network file path.
///
/// Every `.bif` occurrence in the path is replaced by `_LOC.txt`, so
/// `net.bif` maps to `net_LOC.txt`; a path without `.bif` gets `_LOC.txt`
/// appended.
pub fn sidecar_path(network_path: &Path) -> PathBuf {
    let raw = network_path.to_string_lossy();
    if raw.contains(".bif") {
        PathBuf::from(raw.replace(".bif", "_LOC.txt"))
    } else {
        PathBuf::from(format!("{raw}_LOC.txt"))
    }
}

/// Parses sidecar lines from a reader.
///
/// Blank lines are skipped. Any other line must hold exactly an
/// identifier and two coordinates.
pub fn read_layout<R: BufRead>(reader: R) -> Result<Vec<LayoutEntry>, LayoutError> {
    let mut entries = Vec::new();
    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let mut fields = line.split_whitespace();
        let entry = match (fields.next(), fields.next(), fields.next(), fields.next()) {
            (Some(id), Some(x), Some(y), None) => {
                match (x.parse::<f64>(), y.parse::<f64>()) {
                    (Ok(x), Ok(y)) => LayoutEntry {
                        id: id.to_string(),
                        x,
                        y,
                    },
                    _ => {
                        return Err(LayoutError::Malformed {
                            line: lineno + 1,
                            content: line,
                        })
                    }
                }
            }
            _ => {
                return Err(LayoutError::Malformed {
                    line: lineno + 1,
                    content: line,
                })
            }
        };
        entries.push(entry);
    }
    Ok(entries)
}

/// Loads the sidecar file at `path`.
pub fn load_layout(path: &Path) -> Result<Vec<LayoutEntry>, LayoutError> {
    let file = File::open(path)?;
    read_layout(BufReader::new(file))
}

/// Writes sidecar lines to a writer.
pub fn write_layout<W: Write>(mut writer: W, entries: &[LayoutEntry]) -> Result<(), LayoutError> {
    for entry in entries {
        writeln!(writer, "{} {} {}", entry.id, entry.x, entry.y)?;
    }
    Ok(())
}

/// Saves the sidecar file at `path`, replacing any existing content.
pub fn save_layout(path: &Path, entries: &[LayoutEntry]) -> Result<(), LayoutError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_layout(&mut writer, entries)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sidecar_path_replaces_bif_suffix() {
        assert_eq!(
            sidecar_path(Path::new("/tmp/alarm.bif")),
            PathBuf::from("/tmp/alarm_LOC.txt")
        );
        assert_eq!(
            sidecar_path(Path::new("net")),
            PathBuf::from("net_LOC.txt")
        );
    }

    #[test]
    fn read_write_round_trip() {
        let entries = vec![
            LayoutEntry {
                id: "Rain".to_string(),
                x: 120.0,
                y: 80.5,
            },
            LayoutEntry {
                id: "Wet".to_string(),
                x: 40.0,
                y: 200.0,
            },
        ];
        let mut buf = Vec::new();
        write_layout(&mut buf, &entries).unwrap();
        let parsed = read_layout(buf.as_slice()).unwrap();
        assert_eq!(parsed, entries);
    }

    #[test]
    fn blank_lines_are_skipped() {
        let input = "A 1 2\n\n  \nB 3 4\n";
        let parsed = read_layout(input.as_bytes()).unwrap();
        assert_eq!(parsed.len(), 2);
    }

    #[test]
    fn malformed_lines_are_rejected_with_line_number() {
        let err = read_layout("A 1 2\nB one 4\n".as_bytes()).unwrap_err();
        assert!(matches!(err, LayoutError::Malformed { line: 2, .. }));

        let err = read_layout("A 1\n".as_bytes()).unwrap_err();
        assert!(matches!(err, LayoutError::Malformed { line: 1, .. }));

        let err = read_layout("A 1 2 3\n".as_bytes()).unwrap_err();
        assert!(matches!(err, LayoutError::Malformed { line: 1, .. }));
    }
}
