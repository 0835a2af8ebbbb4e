//! Audit configuration.
//!
//! Plain data with serde defaults, so callers can load it from whatever format
//! they already use and omit any field.

use serde::{Deserialize, Serialize};

use crate::io::fort14::Fort14ReadOptions;

/// Land boundary types treated as coastline by default (mainland, island).
pub const DEFAULT_COAST_IBTYPES: [i64; 2] = [20, 21];

/// Settings for [`audit_mesh`](crate::audit::audit_mesh).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    pub read: Fort14ReadOptions,
    /// Land ibtypes classified as coastline.
    pub coast_ibtypes: Vec<i64>,
    /// Coastline rings lying entirely within this distance of an open
    /// boundary are dropped. Filtering is off at 0.
    pub coast_near_open_tolerance: f64,
    /// Elements with a smaller minimum angle are listed in the report.
    pub min_angle_warning_deg: f64,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            read: Fort14ReadOptions::default(),
            coast_ibtypes: DEFAULT_COAST_IBTYPES.to_vec(),
            coast_near_open_tolerance: 0.0,
            min_angle_warning_deg: 10.0,
        }
    }
}
