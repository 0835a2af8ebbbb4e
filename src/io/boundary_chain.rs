//! Boundary trailer parsing for fort.14 files.
//!
//! # Layouts
//! Files in the wild use two conventions for a boundary entry and may or may
//! not carry a total-node-count line after each group count:
//!
//! ```text
//! nodes-in-boundary          segments
//! 4        <- node count     1        <- segment count
//! 1                          4        <- nodes in segment
//! 2                          1
//! 3                          2
//! 1                          3
//!                            1
//! ```
//!
//! A group is first read speculatively in the plain ADCIRC layout
//! (`NOPE`/`NETA`, `NBOU`/`NVEL`, `NVELL IBTYPE` headers). If that does not
//! add up, the scanner is rewound and every entry is resolved on its own by
//! [`resolve_chain`], which builds both interpretations from the same offset,
//! scores them and commits the winner's end offset. Before that, plain
//! `count` + ids entries with all ids known are tried twice: after a total
//! line, accepted only when the ids add up to it, and without one, preferred
//! over the per-entry result unless the latter reads more ids.
//!
//! # Determinism
//! Every decision depends only on the bytes of the file; the known-id set is
//! used for membership tests and never iterated.

use std::cmp::Ordering;
use std::fmt;

use crate::io::scanner::{IntLine, LineScanner};
use crate::topology::mesh::{NodeId, NodeIdSet};

/// Which boundary group is being read.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BoundaryKind {
    Open,
    Land,
}

impl fmt::Display for BoundaryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BoundaryKind::Open => "open",
            BoundaryKind::Land => "land",
        })
    }
}

/// Interpretation that produced a chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChainStrategy {
    /// Header is a total node count; ids may share lines.
    NodesInBoundary,
    /// Header is a segment count; each segment carries its own node count.
    Segments,
    /// Header had several integers, taken as the id list itself.
    Literal,
}

/// How a whole group was read.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GroupLayout {
    /// Total line plus `count [ibtype]` headers, one id per line.
    Adcirc,
    /// `count` headers without ibtype followed by ids, with or without a
    /// total line.
    Counted,
    /// Per-entry dual-candidate resolution.
    Heuristic,
}

/// One boundary entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoundarySegment {
    /// Boundary type code, when the layout carries one.
    pub ibtype: Option<i64>,
    /// Member node ids in file order.
    pub nodes: Vec<NodeId>,
}

/// A fully read boundary group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoundaryGroup {
    pub kind: BoundaryKind,
    /// Number of entries declared on the group-count line (negative → 0).
    pub declared: usize,
    /// Total-node-count line, when the layout carries one.
    pub total: Option<i64>,
    pub layout: GroupLayout,
    pub segments: Vec<BoundarySegment>,
}

impl BoundaryGroup {
    /// The node-id chains without ibtype information.
    pub fn chains(&self) -> Vec<Vec<NodeId>> {
        self.segments.iter().map(|s| s.nodes.clone()).collect()
    }

    pub fn node_total(&self) -> usize {
        id_total(&self.segments)
    }
}

/// Outcome of reading a group header and its entries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GroupRead {
    Parsed(BoundaryGroup),
    /// Input ended before the group-count line.
    Missing,
    /// The group-count line did not start with an integer.
    Unreadable(String),
}

/// Heuristic score of a candidate chain, compared lexicographically.
#[derive(Clone, Copy, Debug)]
pub struct ChainScore {
    pub len: usize,
    /// First id equals last id (needs at least two ids).
    pub closed: bool,
    /// Share of ids present in the node table, 0 for an empty chain.
    pub known_fraction: f64,
}

impl ChainScore {
    pub fn of(ids: &[NodeId], known: &NodeIdSet) -> Self {
        let closed = ids.len() >= 2 && ids.first() == ids.last();
        let known_fraction = if ids.is_empty() {
            0.0
        } else {
            ids.iter().filter(|id| known.contains(*id)).count() as f64 / ids.len() as f64
        };
        Self {
            len: ids.len(),
            closed,
            known_fraction,
        }
    }
}

impl PartialEq for ChainScore {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for ChainScore {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(
            self.len
                .cmp(&other.len)
                .then(self.closed.cmp(&other.closed))
                .then(self.known_fraction.total_cmp(&other.known_fraction)),
        )
    }
}

/// A resolved chain and the offset just past the lines it consumed.
#[derive(Clone, Debug, PartialEq)]
pub struct ChainCandidate {
    pub strategy: ChainStrategy,
    pub ids: Vec<NodeId>,
    pub end: usize,
}

#[inline]
fn as_count(raw: i64) -> usize {
    usize::try_from(raw).unwrap_or(0)
}

/// Accumulates integer tokens line by line until `count` ids are collected,
/// then truncates. Stops early at end of input.
fn collect_ids(scanner: &mut LineScanner<'_>, count: usize) -> Vec<NodeId> {
    let mut ids = Vec::new();
    while ids.len() < count {
        match scanner.read_nonblank_ints() {
            IntLine::Ints { values, .. } => ids.extend(values),
            IntLine::Eof { .. } => break,
        }
    }
    ids.truncate(count);
    ids
}

fn segments_candidate(scanner: &mut LineScanner<'_>, segment_count: usize) -> Vec<NodeId> {
    let mut ids = Vec::new();
    for _ in 0..segment_count {
        let Some(line) = scanner.read_nonblank_ints().into_values() else {
            break;
        };
        match line.as_slice() {
            [n] => ids.extend(collect_ids(scanner, as_count(*n))),
            // inline count followed by the first ids of the segment
            [k, rest @ ..] if *k > 0 && as_count(*k) >= rest.len() => {
                ids.extend_from_slice(rest);
                ids.extend(collect_ids(scanner, as_count(*k) - rest.len()));
            }
            _ => ids.extend_from_slice(&line),
        }
    }
    ids
}

/// Resolves one boundary entry starting at the scanner's position.
///
/// Returns `None` when the input ends before the entry header. On return the
/// scanner sits right after the winning candidate's last line.
pub fn resolve_chain(scanner: &mut LineScanner<'_>, known: &NodeIdSet) -> Option<ChainCandidate> {
    let header = scanner.read_nonblank_ints().into_values()?;
    let origin = scanner.tell();

    if header.len() != 1 {
        return Some(ChainCandidate {
            strategy: ChainStrategy::Literal,
            ids: header,
            end: origin,
        });
    }
    let h = header[0];

    let nodes = collect_ids(scanner, as_count(h));
    let nodes = ChainCandidate {
        strategy: ChainStrategy::NodesInBoundary,
        ids: nodes,
        end: scanner.tell(),
    };

    scanner.seek(origin);
    let segments = segments_candidate(scanner, as_count(h));
    let segments = ChainCandidate {
        strategy: ChainStrategy::Segments,
        ids: segments,
        end: scanner.tell(),
    };

    let score_nodes = ChainScore::of(&nodes.ids, known);
    let score_segments = ChainScore::of(&segments.ids, known);
    // segment style wins ties
    let winner = if score_nodes > score_segments {
        nodes
    } else {
        segments
    };
    log::trace!(
        "boundary entry header {h}: nodes-in-boundary {score_nodes:?}, segments {score_segments:?} -> {:?}",
        winner.strategy
    );
    scanner.seek(winner.end);
    Some(winner)
}

/// [`resolve_chain`] returning just the ids; empty at end of input.
pub fn parse_chain(scanner: &mut LineScanner<'_>, known: &NodeIdSet) -> Vec<NodeId> {
    resolve_chain(scanner, known)
        .map(|c| c.ids)
        .unwrap_or_default()
}

fn is_paired_ibtype(ibtype: Option<i64>) -> bool {
    matches!(ibtype, Some(4 | 5 | 24 | 25))
}

/// Plain ADCIRC layout: total line, `count [ibtype]` headers, one id per line.
/// Returns `None` on any deviation; the caller rewinds.
fn read_adcirc_entries(
    scanner: &mut LineScanner<'_>,
    kind: BoundaryKind,
    count: usize,
) -> Option<(i64, Vec<BoundarySegment>)> {
    let total = match scanner.read_nonblank_ints().into_values()?.as_slice() {
        [t] if *t >= 0 => *t,
        _ => return None,
    };

    let mut segments = Vec::new();
    for _ in 0..count {
        let header = scanner.read_nonblank_ints().into_values()?;
        let (n, ibtype) = match (kind, header.as_slice()) {
            (BoundaryKind::Open, [n]) => (*n, None),
            (BoundaryKind::Open, [n, ib]) => (*n, Some(*ib)),
            (BoundaryKind::Land, [n, ib, ..]) => (*n, Some(*ib)),
            // "NVELL" and "IBTYPE" split over two lines
            (BoundaryKind::Land, [n]) => {
                let next = scanner.read_nonblank_ints().into_values()?;
                (*n, Some(next[0]))
            }
            _ => return None,
        };
        if n < 0 || n > total {
            return None;
        }
        let mut nodes = Vec::new();
        for _ in 0..n {
            let line = scanner.read_nonblank_ints().into_values()?;
            nodes.push(line[0]);
        }
        segments.push(BoundarySegment { ibtype, nodes });
    }

    let plain: i64 = segments.iter().map(|s| s.nodes.len() as i64).sum();
    let paired: i64 = segments
        .iter()
        .map(|s| {
            let weight = if kind == BoundaryKind::Land && is_paired_ibtype(s.ibtype) {
                2
            } else {
                1
            };
            s.nodes.len() as i64 * weight
        })
        .sum();
    (plain == total || paired == total).then_some((total, segments))
}

/// Nodes-in-boundary entries with no total line. Every id must be in the node
/// table, otherwise the layout is rejected.
fn read_counted_entries(
    scanner: &mut LineScanner<'_>,
    count: usize,
    known: &NodeIdSet,
) -> Option<Vec<BoundarySegment>> {
    let mut segments = Vec::new();
    for _ in 0..count {
        let header = scanner.read_nonblank_ints().into_values()?;
        let &[n] = header.as_slice() else {
            return None;
        };
        let n = usize::try_from(n).ok()?;
        let nodes = collect_ids(scanner, n);
        if nodes.len() < n || !nodes.iter().all(|id| known.contains(id)) {
            return None;
        }
        segments.push(BoundarySegment { ibtype: None, nodes });
    }
    Some(segments)
}

/// A total line followed by counted entries whose ids add up to it.
fn read_totalled_entries(
    scanner: &mut LineScanner<'_>,
    count: usize,
    known: &NodeIdSet,
) -> Option<(i64, Vec<BoundarySegment>)> {
    let total = match scanner.read_nonblank_ints().into_values()?.as_slice() {
        [t] if *t >= 0 => *t,
        _ => return None,
    };
    let segments = read_counted_entries(scanner, count, known)?;
    (i64::try_from(id_total(&segments)).ok() == Some(total)).then_some((total, segments))
}

fn id_total(segments: &[BoundarySegment]) -> usize {
    segments.iter().map(|s| s.nodes.len()).sum()
}

/// Reads a group-count line and all of its entries.
pub fn read_boundary_group(
    scanner: &mut LineScanner<'_>,
    kind: BoundaryKind,
    known: &NodeIdSet,
) -> GroupRead {
    let Some(line) = scanner.read_nonblank_line() else {
        return GroupRead::Missing;
    };
    let first = line.split_whitespace().next().unwrap_or_default();
    let Ok(declared) = first.parse::<i64>() else {
        return GroupRead::Unreadable(line.to_string());
    };
    let count = as_count(declared);
    let after_count = scanner.tell();

    if let Some((total, segments)) = read_adcirc_entries(scanner, kind, count) {
        log::debug!("{kind} boundaries: {count} entries, {total} nodes (ADCIRC layout)");
        return GroupRead::Parsed(BoundaryGroup {
            kind,
            declared: count,
            total: Some(total),
            layout: GroupLayout::Adcirc,
            segments,
        });
    }

    scanner.seek(after_count);
    if let Some((total, segments)) = read_totalled_entries(scanner, count, known) {
        log::debug!("{kind} boundaries: {count} entries, {total} nodes without ibtype");
        return GroupRead::Parsed(BoundaryGroup {
            kind,
            declared: count,
            total: Some(total),
            layout: GroupLayout::Counted,
            segments,
        });
    }

    scanner.seek(after_count);
    let counted = read_counted_entries(scanner, count, known).map(|segs| (segs, scanner.tell()));

    scanner.seek(after_count);
    let mut segments = Vec::with_capacity(count.min(1024));
    for index in 0..count {
        let Some(chain) = resolve_chain(scanner, known) else {
            log::warn!("{kind} boundaries: {count} declared but input ended after {index}");
            break;
        };
        segments.push(BoundarySegment {
            ibtype: None,
            nodes: chain.ids,
        });
    }

    if let Some((counted, end)) = counted {
        if id_total(&counted) >= id_total(&segments) {
            log::debug!("{kind} boundaries: {count} entries without total line");
            scanner.seek(end);
            return GroupRead::Parsed(BoundaryGroup {
                kind,
                declared: count,
                total: None,
                layout: GroupLayout::Counted,
                segments: counted,
            });
        }
    }
    log::debug!(
        "{kind} boundaries: {} entries resolved per entry",
        segments.len()
    );
    GroupRead::Parsed(BoundaryGroup {
        kind,
        declared: count,
        total: None,
        layout: GroupLayout::Heuristic,
        segments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn known(ids: &[NodeId]) -> NodeIdSet {
        ids.iter().copied().collect()
    }

    #[test]
    fn nodes_in_boundary_accepts_several_ids_per_line() {
        let text = "4\n1 2\n3\n1\n";
        let mut sc = LineScanner::new(text);
        let chain = resolve_chain(&mut sc, &known(&[1, 2, 3])).unwrap();
        assert_eq!(chain.strategy, ChainStrategy::NodesInBoundary);
        assert_eq!(chain.ids, vec![1, 2, 3, 1]);
        assert!(sc.is_eof());
    }

    #[test]
    fn segment_style_wins_when_longer() {
        let text = "1\n4\n1\n2\n3\n1\n";
        let mut sc = LineScanner::new(text);
        let chain = resolve_chain(&mut sc, &known(&[1, 2, 3])).unwrap();
        assert_eq!(chain.strategy, ChainStrategy::Segments);
        assert_eq!(chain.ids, vec![1, 2, 3, 1]);
        assert!(sc.is_eof());
    }

    #[test]
    fn segment_line_with_inline_count() {
        // 2 segments: "2 5 6" (count 2, ids inline) and "3 7" + one more line
        let text = "2\n2 5 6\n3 7\n8\n9\n";
        let mut sc = LineScanner::new(text);
        let ids = parse_chain(&mut sc, &known(&[5, 6, 7, 8, 9]));
        assert_eq!(ids, vec![5, 6, 7, 8, 9]);
    }

    #[test]
    fn nodes_in_boundary_wins_when_segments_run_out() {
        // segments reads "1" -> [2] and then hits the end: [2]
        let mut sc = LineScanner::new("2\n1\n2\n");
        let chain = resolve_chain(&mut sc, &known(&[1, 2])).unwrap();
        assert_eq!(chain.strategy, ChainStrategy::NodesInBoundary);
        assert_eq!(chain.ids, vec![1, 2]);
    }

    #[test]
    fn exact_tie_prefers_segments() {
        // nodes-in-boundary reads [1, 5]; segments reads [5] and [6].
        // Both are two known ids on an open chain.
        let mut sc = LineScanner::new("2\n1\n5\n1\n6\n");
        let chain = resolve_chain(&mut sc, &known(&[1, 5, 6])).unwrap();
        assert_eq!(chain.strategy, ChainStrategy::Segments);
        assert_eq!(chain.ids, vec![5, 6]);
        assert!(sc.is_eof());
    }

    #[test]
    fn empty_header_is_a_tie_too() {
        let mut sc = LineScanner::new("0\n9\n");
        let chain = resolve_chain(&mut sc, &known(&[9])).unwrap();
        assert_eq!(chain.strategy, ChainStrategy::Segments);
        assert!(chain.ids.is_empty());
        assert_eq!(sc.read_nonblank_ints().into_values(), Some(vec![9]));
    }

    #[test]
    fn ambiguous_segment_line_is_taken_whole() {
        // inline count 2 but three trailing ids
        let mut sc = LineScanner::new("1\n2 7 8 9\n");
        let chain = resolve_chain(&mut sc, &known(&[7, 8, 9])).unwrap();
        assert_eq!(chain.strategy, ChainStrategy::Segments);
        assert_eq!(chain.ids, vec![2, 7, 8, 9]);

        // non-positive inline count
        let mut sc = LineScanner::new("1\n-1 4\n");
        let chain = resolve_chain(&mut sc, &known(&[4])).unwrap();
        assert_eq!(chain.strategy, ChainStrategy::Segments);
        assert_eq!(chain.ids, vec![-1, 4]);
        assert!(sc.is_eof());
    }

    #[test]
    fn segment_cut_short_by_eof_keeps_its_ids() {
        let mut sc = LineScanner::new("1\n3\n5\n6\n");
        let chain = resolve_chain(&mut sc, &known(&[5, 6])).unwrap();
        assert_eq!(chain.strategy, ChainStrategy::Segments);
        assert_eq!(chain.ids, vec![5, 6]);
        assert!(sc.is_eof());
    }

    #[test]
    fn score_equality_matches_ordering() {
        let k = known(&[1]);
        let a = ChainScore::of(&[1, 2], &k);
        let b = ChainScore {
            known_fraction: 0.5,
            ..a
        };
        assert_eq!(a, b);
        assert_eq!(a.partial_cmp(&b), Some(Ordering::Equal));
        let zero = ChainScore::of(&[], &k);
        let negative_zero = ChainScore {
            known_fraction: -0.0,
            ..zero
        };
        // total ordering separates the zeros, so equality does as well
        assert_ne!(zero, negative_zero);
        assert!(zero > negative_zero);
    }

    #[test]
    fn land_total_line_without_ibtype() {
        let text = "1\n4\n4\n4\n3\n2\n1\n";
        let mut sc = LineScanner::new(text);
        let GroupRead::Parsed(group) =
            read_boundary_group(&mut sc, BoundaryKind::Land, &known(&[1, 2, 3, 4]))
        else {
            panic!("group not parsed");
        };
        assert_eq!(group.layout, GroupLayout::Counted);
        assert_eq!(group.total, Some(4));
        assert_eq!(group.chains(), vec![vec![4, 3, 2, 1]]);
        assert!(sc.is_eof());
    }

    #[test]
    fn multi_integer_header_is_literal() {
        let mut sc = LineScanner::new("4 5 6\n7\n");
        let chain = resolve_chain(&mut sc, &known(&[])).unwrap();
        assert_eq!(chain.strategy, ChainStrategy::Literal);
        assert_eq!(chain.ids, vec![4, 5, 6]);
        assert_eq!(sc.read_nonblank_ints().into_values(), Some(vec![7]));
    }

    #[test]
    fn header_at_eof_yields_empty_chain() {
        let mut sc = LineScanner::new("\n\n");
        assert!(resolve_chain(&mut sc, &known(&[1])).is_none());
        assert!(parse_chain(&mut sc, &known(&[1])).is_empty());
    }

    #[test]
    fn known_fraction_breaks_length_ties() {
        let k = known(&[1, 2]);
        let a = ChainScore::of(&[1, 2], &k);
        let b = ChainScore::of(&[1, 9], &k);
        assert!(a > b);
        let closed = ChainScore::of(&[1, 2, 1], &k);
        let open = ChainScore::of(&[1, 2, 2], &k);
        assert!(closed > open);
    }

    #[test]
    fn adcirc_group_is_preferred_when_totals_match() {
        let text = "1\n3\n3 20\n3\n2\n1\n";
        let mut sc = LineScanner::new(text);
        let GroupRead::Parsed(group) = read_boundary_group(&mut sc, BoundaryKind::Land, &known(&[1, 2, 3]))
        else {
            panic!("group not parsed");
        };
        assert_eq!(group.layout, GroupLayout::Adcirc);
        assert_eq!(group.total, Some(3));
        assert_eq!(
            group.segments,
            vec![BoundarySegment {
                ibtype: Some(20),
                nodes: vec![3, 2, 1]
            }]
        );
    }

    #[test]
    fn weir_pairs_may_count_twice_toward_total() {
        let text = "1\n4\n2 24\n5 9 1.0 1.0 1.0\n6 10 1.0 1.0 1.0\n";
        let mut sc = LineScanner::new(text);
        let GroupRead::Parsed(group) = read_boundary_group(&mut sc, BoundaryKind::Land, &known(&[]))
        else {
            panic!("group not parsed");
        };
        assert_eq!(group.layout, GroupLayout::Adcirc);
        assert_eq!(group.segments[0].nodes, vec![5, 6]);
    }

    #[test]
    fn group_falls_back_to_per_entry_resolution() {
        let text = "1\n1\n4\n1\n2\n3\n1\n";
        let mut sc = LineScanner::new(text);
        let GroupRead::Parsed(group) = read_boundary_group(&mut sc, BoundaryKind::Open, &known(&[1, 2, 3]))
        else {
            panic!("group not parsed");
        };
        assert_eq!(group.layout, GroupLayout::Heuristic);
        assert_eq!(group.chains(), vec![vec![1, 2, 3, 1]]);
    }

    #[test]
    fn counted_entries_without_total_line_stay_separate() {
        // two entries of two ids each, then an empty land group
        let text = "2\n2\n1\n2\n2\n2\n3\n0\n0\n";
        let mut sc = LineScanner::new(text);
        let GroupRead::Parsed(group) = read_boundary_group(&mut sc, BoundaryKind::Open, &known(&[1, 2, 3]))
        else {
            panic!("group not parsed");
        };
        assert_eq!(group.layout, GroupLayout::Counted);
        assert_eq!(group.chains(), vec![vec![1, 2], vec![2, 3]]);
        assert_eq!(sc.read_nonblank_ints().into_values(), Some(vec![0]));
    }

    #[test]
    fn missing_and_unreadable_headers() {
        let mut sc = LineScanner::new("  \n");
        assert_eq!(
            read_boundary_group(&mut sc, BoundaryKind::Open, &known(&[])),
            GroupRead::Missing
        );
        let mut sc = LineScanner::new("NOPE\n1\n");
        assert!(matches!(
            read_boundary_group(&mut sc, BoundaryKind::Open, &known(&[])),
            GroupRead::Unreadable(_)
        ));
    }

    #[test]
    fn zero_count_group_consumes_zero_total() {
        let mut sc = LineScanner::new("0\n0\n1\n");
        let GroupRead::Parsed(group) = read_boundary_group(&mut sc, BoundaryKind::Open, &known(&[])) else {
            panic!("group not parsed");
        };
        assert!(group.segments.is_empty());
        assert_eq!(group.layout, GroupLayout::Adcirc);
        assert_eq!(sc.read_nonblank_ints().into_values(), Some(vec![1]));
    }
}
