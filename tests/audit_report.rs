use std::path::PathBuf;

use adcirc_mesh_audit::audit::audit_mesh;
use adcirc_mesh_audit::io::fort14_boundaries::fort14_boundaries_from_str;
use adcirc_mesh_audit::prelude::*;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

#[test]
fn island_audit_report() {
    let audit = audit_fort14(fixture("island.fort14"), &AuditConfig::default())
        .expect("island fixture audits");
    assert_eq!(audit.title, "square basin with one island");
    assert_eq!(audit.depth_range, Some((1.5, 12.0)));
    assert_eq!(audit.dangling_references, 0);
    assert_eq!(audit.loops.len(), 2);
    assert_eq!(audit.loops.holes.len(), 1);
    assert_eq!(audit.land.coast.len(), 2);
    assert!(audit.land.other.is_empty());
    // open boundary spans the bottom edge only; the top corners are 3 away
    assert_eq!(audit.open_hull_distance, Some(3.0));
    assert_eq!(audit.coast_rings.len(), 2);
    assert_eq!(audit.quality.inverted, 0);
    assert_eq!(audit.quality.degenerate, 0);
    assert!(audit.quality.worst_min_angle_deg.expect("quality rows") > 10.0);
}

#[test]
fn segment_open_boundary_coincides_with_hull() {
    let audit = audit_fort14(fixture("segments.fort14"), &AuditConfig::default())
        .expect("segments fixture audits");
    let d = audit.open_hull_distance.expect("open boundary and hull present");
    assert!(d < 5e-3, "hausdorff distance {d}");
    let offset = audit.open_hull_offset.expect("open boundary and hull present");
    assert!(offset <= 0.0);
}

#[test]
fn coast_ibtypes_are_configurable() {
    let cfg = AuditConfig {
        coast_ibtypes: vec![20],
        ..AuditConfig::default()
    };
    let audit = audit_fort14(fixture("island.fort14"), &cfg).expect("island fixture audits");
    assert_eq!(audit.land.coast, vec![vec![1, 2, 3, 0]]);
    assert_eq!(audit.land.other, vec![vec![4, 5, 6, 7, 4]]);
}

#[test]
fn audit_reports_small_angles_and_dangling_ids() {
    let text = "sliver\n2 4\n1 0.0 0.0 1.0\n2 10.0 0.0 1.0\n3 5.0 0.1 1.0\n4 0.0 5.0 1.0\n\
                1 3 1 2 3\n2 3 1 3 9\n";
    let mesh = parse_fort14_str(text).expect("sliver mesh parses");
    let boundaries = fort14_boundaries_from_str(text).expect("sliver boundaries");
    let audit = audit_mesh(&mesh, &boundaries, &AuditConfig::default());
    assert_eq!(audit.quality.small_angle_elements, vec![1]);
    assert_eq!(audit.quality.unresolvable, 1);
    assert_eq!(audit.dangling_references, 1);
    assert_eq!(audit.open_hull_distance, None);
}

#[test]
fn config_round_trips_through_json() {
    let cfg = AuditConfig {
        coast_ibtypes: vec![20, 21, 22],
        coast_near_open_tolerance: 0.002,
        ..AuditConfig::default()
    };
    let json = serde_json::to_string(&cfg).expect("serialize config");
    let back: AuditConfig = serde_json::from_str(&json).expect("deserialize config");
    assert_eq!(back, cfg);
}

#[test]
fn partial_config_uses_defaults() {
    let cfg: AuditConfig =
        serde_json::from_str(r#"{"min_angle_warning_deg": 20.0, "read": {"read_boundaries": false}}"#)
            .expect("partial config");
    assert_eq!(cfg.min_angle_warning_deg, 20.0);
    assert!(!cfg.read.read_boundaries);
    assert!(cfg.read.report_dangling);
    assert_eq!(cfg.coast_ibtypes, vec![20, 21]);
}

#[test]
fn audit_serializes_to_json() {
    let audit = audit_fort14(fixture("tiny.fort14"), &AuditConfig::default())
        .expect("tiny fixture audits");
    let value = serde_json::to_value(&audit).expect("serialize audit");
    assert_eq!(value["meta"]["nnodes"], 3);
    assert_eq!(value["loops"]["outer"]["kind"], "Outer");
}
