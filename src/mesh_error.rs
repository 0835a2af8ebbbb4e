//! MeshAuditError: Unified error type for the fort.14 reader and audit APIs
//!
//! Only structural problems in the node and element tables are fatal. Boundary
//! sections degrade instead of failing, so they never surface here.

use std::fmt;
use thiserror::Error;

/// Parser stage that produced a fatal error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParseStage {
    /// The `<n_elements> <n_nodes>` line.
    Counts,
    /// The node table.
    Nodes,
    /// The element table.
    Elements,
}

impl fmt::Display for ParseStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParseStage::Counts => "counts",
            ParseStage::Nodes => "nodes",
            ParseStage::Elements => "elements",
        };
        f.write_str(name)
    }
}

/// Unified error type for mesh audit operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MeshAuditError {
    /// The file is not a usable fort.14 mesh.
    #[error("invalid fort.14 file ({stage} stage, line {line}): {reason}")]
    InvalidFort14 {
        stage: ParseStage,
        line: usize,
        reason: String,
    },
    /// Opening or reading the input failed.
    #[error("I/O error: {0}")]
    Io(String),
    /// A boundary segment failed validation.
    #[error("segment {index} is invalid: {reason}")]
    InvalidSegment { index: usize, reason: String },
}

impl MeshAuditError {
    pub(crate) fn fort14(stage: ParseStage, line: usize, reason: impl Into<String>) -> Self {
        MeshAuditError::InvalidFort14 {
            stage,
            line,
            reason: reason.into(),
        }
    }

    /// Stage name for fatal parse errors, `None` for every other variant.
    pub fn stage(&self) -> Option<ParseStage> {
        match self {
            MeshAuditError::InvalidFort14 { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

impl From<std::io::Error> for MeshAuditError {
    fn from(err: std::io::Error) -> Self {
        MeshAuditError::Io(err.to_string())
    }
}
