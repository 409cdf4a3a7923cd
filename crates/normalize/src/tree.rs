use std::collections::{HashMap, HashSet};

use ppltrace_core::model::trace::TraceHit;

use crate::error_flag::hit_has_error;

/// One span with its resolved children, for the waterfall view.
#[derive(Debug, Clone, PartialEq)]
pub struct SpanNode {
    pub hit: TraceHit,
    pub children: Vec<SpanNode>,
}

/// Reconstruct the span hierarchy from a normalized (sorted) hit list.
/// Roots are spans with an empty `parentSpanId`; spans referencing a parent
/// that is not in the batch are promoted to roots so partial traces still
/// render, as is one span of any parent cycle. Children keep the input
/// order, i.e. ascending start time.
pub fn build_span_tree(hits: &[TraceHit]) -> Vec<SpanNode> {
    let ids: HashSet<&str> = hits.iter().map(|h| h.span_id.as_str()).collect();

    let mut children: HashMap<&str, Vec<usize>> = HashMap::new();
    let mut roots: Vec<usize> = Vec::new();
    for (index, hit) in hits.iter().enumerate() {
        let parent = hit.parent_span_id.as_str();
        if parent.is_empty() || !ids.contains(parent) {
            roots.push(index);
        } else {
            children.entry(parent).or_default().push(index);
        }
    }

    let mut visited = HashSet::new();
    let mut nodes: Vec<SpanNode> = roots
        .into_iter()
        .map(|index| build_node(hits, &children, index, &mut visited))
        .collect();

    // parent cycles leave every member unreachable from a root; promote the
    // earliest unvisited span so the rest of the cycle hangs below it
    for index in 0..hits.len() {
        if !visited.contains(&index) {
            nodes.push(build_node(hits, &children, index, &mut visited));
        }
    }
    nodes
}

fn build_node(
    hits: &[TraceHit],
    children: &HashMap<&str, Vec<usize>>,
    index: usize,
    visited: &mut HashSet<usize>,
) -> SpanNode {
    visited.insert(index);
    let hit = hits[index].clone();
    let child_nodes = children
        .get(hit.span_id.as_str())
        .map(|indices| {
            indices
                .iter()
                .filter(|&&child| !visited.contains(&child))
                .copied()
                .collect::<Vec<_>>()
        })
        .unwrap_or_default()
        .into_iter()
        .map(|child| build_node(hits, children, child, visited))
        .collect();

    SpanNode {
        hit,
        children: child_nodes,
    }
}

/// Flattened waterfall geometry: depth for indentation, offset and duration
/// in nanoseconds relative to the earliest parseable start in the trace.
#[derive(Debug, Clone, PartialEq)]
pub struct WaterfallRow {
    pub span_id: String,
    pub service_name: String,
    pub name: String,
    pub depth: usize,
    pub offset_nanos: i64,
    pub duration_nanos: i64,
    pub is_error: bool,
}

pub fn waterfall_rows(roots: &[SpanNode]) -> Vec<WaterfallRow> {
    let base = earliest_start(roots);
    let mut rows = Vec::new();
    for root in roots {
        push_rows(root, 0, base, &mut rows);
    }
    rows
}

fn earliest_start(roots: &[SpanNode]) -> i64 {
    fn visit(node: &SpanNode, best: &mut Option<i64>) {
        let start = node.hit.sort_key();
        if start > 0 && best.map_or(true, |b| start < b) {
            *best = Some(start);
        }
        for child in &node.children {
            visit(child, best);
        }
    }
    let mut best = None;
    for root in roots {
        visit(root, &mut best);
    }
    best.unwrap_or(0)
}

fn push_rows(node: &SpanNode, depth: usize, base: i64, rows: &mut Vec<WaterfallRow>) {
    let start = node.hit.sort_key();
    let offset = if start > 0 { (start - base).max(0) } else { 0 };
    rows.push(WaterfallRow {
        span_id: node.hit.span_id.clone(),
        service_name: node.hit.service_name.clone(),
        name: node.hit.name.clone(),
        depth,
        offset_nanos: offset,
        duration_nanos: node.hit.duration_in_nanos,
        is_error: hit_has_error(&node.hit),
    });
    for child in &node.children {
        push_rows(child, depth + 1, base, rows);
    }
}
