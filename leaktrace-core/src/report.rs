//! Backlink trails from a matched object to its root.

use std::fmt::Write as _;

use serde::Serialize;

use crate::edge::{EdgeKind, ReferenceEdge};
use crate::runtime::Introspector;
use crate::visitor::Match;

/// Which kind of edge a backlink node was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BacklinkKind {
    Root,
    Slot,
    Index,
}

/// One hop of a backlink trail.
#[derive(Debug, Clone)]
pub struct BacklinkNode<O> {
    pub label: String,
    pub kind: BacklinkKind,
    /// Value held at this hop.
    pub value: O,
}

/// Backlink node with its value already described, for serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedBacklink {
    pub label: String,
    pub kind: BacklinkKind,
    pub value: String,
}

/// Trail of backlinks from a matched object (first node) to its root (last node).
///
/// Built purely from edges captured during the traversal, so it can be
/// rebuilt any number of times after the run has ended.
#[derive(Debug, Clone)]
pub struct PathReport<O> {
    nodes: Vec<BacklinkNode<O>>,
}

impl<O: Clone> PathReport<O> {
    /// Trail for a collector match.
    pub fn build(found: &Match<O>) -> Self {
        Self::from_edge(&found.edge)
    }

    /// Trail starting at `edge`.
    pub fn from_edge(edge: &ReferenceEdge<O>) -> Self {
        let nodes = edge
            .chain()
            .map(|e| BacklinkNode {
                label: e.label(),
                kind: match e.kind() {
                    EdgeKind::Root { .. } => BacklinkKind::Root,
                    EdgeKind::Slot { .. } => BacklinkKind::Slot,
                    EdgeKind::Index { .. } => BacklinkKind::Index,
                },
                value: e.value().clone(),
            })
            .collect();
        Self { nodes }
    }
}

impl<O> PathReport<O> {
    pub fn nodes(&self) -> &[BacklinkNode<O>] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root(&self) -> Option<&BacklinkNode<O>> {
        self.nodes.last()
    }

    /// Describe every value through `runtime`, truncated to `max_len` chars.
    pub fn to_rendered<I>(&self, runtime: &I, max_len: usize) -> Vec<RenderedBacklink>
    where
        I: Introspector<Object = O>,
    {
        self.nodes
            .iter()
            .map(|node| RenderedBacklink {
                label: node.label.clone(),
                kind: node.kind,
                value: truncate(&runtime.describe(&node.value), max_len),
            })
            .collect()
    }

    /// Indented text trail, one `label = value` line per hop.
    pub fn render<I>(&self, runtime: &I, max_len: usize) -> String
    where
        I: Introspector<Object = O>,
    {
        let mut out = String::new();
        for node in self.to_rendered(runtime, max_len) {
            let _ = writeln!(out, "    {} = {}", node.label, node.value);
        }
        out
    }
}

/// Cut `text` to at most `max_len` characters, marking the cut with `...`.
pub fn truncate(text: &str, max_len: usize) -> String {
    match text.char_indices().nth(max_len) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
