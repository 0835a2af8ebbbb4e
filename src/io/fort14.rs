//! ADCIRC `fort.14` reader.
//!
//! # Supported format
//! ```text
//! <title>
//! <n_elements> <n_nodes>
//! <id x y depth>                     x n_nodes
//! <id nodes_per_element n1 n2 n3 [n4]>  x n_elements
//! <open boundary group>              optional
//! <land boundary group>              optional
//! ```
//! See [`boundary_chain`](crate::io::boundary_chain) for the boundary layouts.
//!
//! # Failure policy
//! - A short or non-numeric line in the counts, node or element sections is
//!   fatal and reported as [`MeshAuditError::InvalidFort14`] with the stage
//!   and line number.
//! - Boundary sections never fail: a missing or unreadable group header
//!   leaves the remaining boundary lists empty.
//! - Node ids referenced by elements or boundaries are not checked against
//!   the node table; dangling references are only logged.
//!
//! # Limitations
//! - Quadrilaterals are not modeled; a fourth node id is kept but unused.
//! - Nodal attributes (`fort.13`) and forcing sections are out of scope.

use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::io::MeshReader;
use crate::io::boundary_chain::{BoundaryGroup, BoundaryKind, GroupRead, read_boundary_group};
use crate::io::scanner::{LineScanner, parse_ints};
use crate::mesh_error::{MeshAuditError, ParseStage};
use crate::topology::mesh::{Element, Fort14Mesh, Node, NodeIdSet};

// header counts are untrusted until the tables are read
const PREALLOC_LIMIT: usize = 1 << 20;

/// Options controlling a fort.14 read.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fort14ReadOptions {
    /// Parse the open/land boundary trailer. When `false` the reader stops
    /// after the element table.
    pub read_boundaries: bool,
    /// Log a warning when elements or boundaries reference unknown node ids.
    pub report_dangling: bool,
}

impl Default for Fort14ReadOptions {
    fn default() -> Self {
        Self {
            read_boundaries: true,
            report_dangling: true,
        }
    }
}

/// A parsed mesh together with how its boundary groups were read.
#[derive(Clone, Debug, PartialEq)]
pub struct Fort14Document {
    pub mesh: Fort14Mesh,
    pub open_group: Option<BoundaryGroup>,
    pub land_group: Option<BoundaryGroup>,
}

/// ADCIRC fort.14 reader.
#[derive(Debug, Default, Clone)]
pub struct Fort14Reader;

impl Fort14Reader {
    /// Parse mesh data with explicit options.
    pub fn read_with_options<R: Read>(
        &self,
        reader: R,
        options: Fort14ReadOptions,
    ) -> Result<Fort14Mesh, MeshAuditError> {
        Ok(self.read_document(reader, options)?.mesh)
    }

    /// Parse mesh data, keeping the boundary group details.
    pub fn read_document<R: Read>(
        &self,
        mut reader: R,
        options: Fort14ReadOptions,
    ) -> Result<Fort14Document, MeshAuditError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        let text = String::from_utf8_lossy(&bytes);
        self.parse_document(&text, options)
    }

    /// Parse an in-memory fort.14 text.
    pub fn parse_document(
        &self,
        text: &str,
        options: Fort14ReadOptions,
    ) -> Result<Fort14Document, MeshAuditError> {
        let mut scanner = LineScanner::new(text);

        let title = scanner.read_line().unwrap_or_default().trim().to_string();
        let (element_count, node_count) = Self::parse_counts(&mut scanner)?;
        log::debug!("fort.14 '{title}': {node_count} nodes, {element_count} elements");

        let nodes = Self::parse_nodes(&mut scanner, node_count)?;
        let elements = Self::parse_elements(&mut scanner, element_count)?;

        let (open_group, land_group) = if options.read_boundaries {
            let known: NodeIdSet = nodes.iter().map(|n| n.id).collect();
            Self::parse_trailer(&mut scanner, &known)
        } else {
            (None, None)
        };

        let mesh = Fort14Mesh {
            title,
            node_count,
            element_count,
            nodes,
            elements,
            open_boundaries: open_group.as_ref().map(|g| g.chains()).unwrap_or_default(),
            land_boundaries: land_group.as_ref().map(|g| g.chains()).unwrap_or_default(),
        };

        if options.report_dangling {
            let dangling = mesh.dangling_reference_count();
            if dangling > 0 {
                log::warn!("fort.14 '{}': {dangling} references to unknown node ids", mesh.title);
            }
        }

        Ok(Fort14Document {
            mesh,
            open_group,
            land_group,
        })
    }

    fn parse_counts(scanner: &mut LineScanner<'_>) -> Result<(usize, usize), MeshAuditError> {
        let line_no = scanner.line_number();
        let counts = scanner.read_line().map(parse_ints).unwrap_or_default();
        let [elements, nodes, ..] = counts[..] else {
            return Err(MeshAuditError::fort14(
                ParseStage::Counts,
                line_no,
                "missing counts line",
            ));
        };
        let to_count = |raw: i64, what: &str| {
            usize::try_from(raw).map_err(|_| {
                MeshAuditError::fort14(ParseStage::Counts, line_no, format!("negative {what} count {raw}"))
            })
        };
        Ok((to_count(elements, "element")?, to_count(nodes, "node")?))
    }

    fn parse_nodes(
        scanner: &mut LineScanner<'_>,
        count: usize,
    ) -> Result<Vec<Node>, MeshAuditError> {
        let mut nodes = Vec::with_capacity(count.min(PREALLOC_LIMIT));
        for _ in 0..count {
            let line_no = scanner.line_number();
            let err = |reason: String| MeshAuditError::fort14(ParseStage::Nodes, line_no, reason);
            let line = scanner
                .read_line()
                .ok_or_else(|| err("unexpected end of node table".into()))?;
            let fields: Vec<&str> = line.split_whitespace().collect();
            let [id, x, y, depth, ..] = fields[..] else {
                return Err(err(format!(
                    "node line too short: expected id x y depth, found {} fields",
                    fields.len()
                )));
            };
            nodes.push(Node {
                id: parse_int(id).ok_or_else(|| err(format!("invalid node id: {id}")))?,
                x: parse_real(x).ok_or_else(|| err(format!("invalid x coordinate: {x}")))?,
                y: parse_real(y).ok_or_else(|| err(format!("invalid y coordinate: {y}")))?,
                depth: parse_real(depth).ok_or_else(|| err(format!("invalid depth: {depth}")))?,
            });
        }
        Ok(nodes)
    }

    fn parse_elements(
        scanner: &mut LineScanner<'_>,
        count: usize,
    ) -> Result<Vec<Element>, MeshAuditError> {
        let mut elements = Vec::with_capacity(count.min(PREALLOC_LIMIT));
        for _ in 0..count {
            let line_no = scanner.line_number();
            let err = |reason: String| MeshAuditError::fort14(ParseStage::Elements, line_no, reason);
            let line = scanner
                .read_line()
                .ok_or_else(|| err("unexpected end of element table".into()))?;
            let fields: Vec<&str> = line.split_whitespace().collect();
            let [id, per_element, n1, n2, n3, ref rest @ ..] = fields[..] else {
                return Err(err(format!(
                    "element line too short: expected id nodes_per_element n1 n2 n3, found {} fields",
                    fields.len()
                )));
            };
            let int = |tok: &str, what: &str| {
                parse_int(tok).ok_or_else(|| err(format!("invalid {what}: {tok}")))
            };
            int(per_element, "nodes-per-element count")?;
            let n4 = match rest.first() {
                Some(tok) => int(*tok, "fourth node id")?,
                None => 0,
            };
            elements.push(Element {
                id: int(id, "element id")?,
                n1: int(n1, "node id")?,
                n2: int(n2, "node id")?,
                n3: int(n3, "node id")?,
                n4,
            });
        }
        Ok(elements)
    }

    fn parse_trailer(
        scanner: &mut LineScanner<'_>,
        known: &NodeIdSet,
    ) -> (Option<BoundaryGroup>, Option<BoundaryGroup>) {
        let open = match read_boundary_group(scanner, BoundaryKind::Open, known) {
            GroupRead::Parsed(group) => group,
            GroupRead::Missing => {
                log::debug!("no open boundary section");
                return (None, None);
            }
            GroupRead::Unreadable(line) => {
                log::warn!("unreadable open boundary header {line:?}; boundaries left empty");
                return (None, None);
            }
        };
        let land = match read_boundary_group(scanner, BoundaryKind::Land, known) {
            GroupRead::Parsed(group) => Some(group),
            GroupRead::Missing => {
                log::debug!("no land boundary section");
                None
            }
            GroupRead::Unreadable(line) => {
                log::warn!("unreadable land boundary header {line:?}; land boundaries left empty");
                None
            }
        };
        (Some(open), land)
    }
}

impl MeshReader for Fort14Reader {
    type Mesh = Fort14Mesh;

    fn read<R: Read>(&self, reader: R) -> Result<Fort14Mesh, MeshAuditError> {
        self.read_with_options(reader, Fort14ReadOptions::default())
    }
}

fn parse_int(tok: &str) -> Option<i64> {
    tok.parse::<i64>().ok()
}

/// Parses a real number, accepting Fortran `D` exponents (`1.5D+02`).
fn parse_real(tok: &str) -> Option<f64> {
    tok.parse::<f64>()
        .ok()
        .or_else(|| tok.replace(['D', 'd'], "E").parse::<f64>().ok())
}

/// Parse the fort.14 file at `path` with default options.
pub fn parse_fort14(path: impl AsRef<Path>) -> Result<Fort14Mesh, MeshAuditError> {
    Fort14Reader.read_path(path.as_ref())
}

/// Parse fort.14 text with default options.
pub fn parse_fort14_str(text: &str) -> Result<Fort14Mesh, MeshAuditError> {
    Ok(Fort14Reader
        .parse_document(text, Fort14ReadOptions::default())?
        .mesh)
}
