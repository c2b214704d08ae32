//! Plain-text edge lists: one `source destination [cost]` per line.
//!
//! Node labels are arbitrary whitespace-free strings, numbered densely in
//! order of first appearance, so the first label becomes the start node.
//! Blank lines and lines starting with `#`, `//` or `--` are skipped. A
//! missing cost means 1.0; columns past the third are ignored.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{bail, Context, Result};
use sssp_phases_core::{Graph, NodeIndex};

const COMMENT_PREFIXES: [&str; 3] = ["#", "//", "--"];
const DEFAULT_COST: f64 = 1.0;

#[derive(Debug)]
pub struct EdgeList {
    pub graph: Graph,
    /// `labels[i]` is the label of node `i`.
    pub labels: Vec<String>,
}

pub fn read_edge_list(path: &Path) -> Result<EdgeList> {
    let file = File::open(path).with_context(|| format!("opening graph file {}", path.display()))?;
    parse_edge_list(BufReader::new(file)).with_context(|| format!("reading graph file {}", path.display()))
}

pub fn parse_edge_list(reader: impl BufRead) -> Result<EdgeList> {
    let mut labels: Vec<String> = Vec::new();
    let mut ids: HashMap<String, NodeIndex> = HashMap::new();
    let mut edges: Vec<(usize, NodeIndex, NodeIndex, f64)> = Vec::new();

    for (number, line) in reader.lines().enumerate() {
        let line_no = number + 1;
        let line = line.with_context(|| format!("line {line_no}"))?;
        let line = line.trim();
        if line.is_empty() || COMMENT_PREFIXES.iter().any(|prefix| line.starts_with(prefix)) {
            continue;
        }

        let columns: Vec<&str> = line.split_whitespace().collect();
        let [from, to, rest @ ..] = columns.as_slice() else {
            bail!("line {line_no}: expected `source destination [cost]`, got '{line}'");
        };
        let cost = match rest.first() {
            Some(text) => text
                .parse::<f64>()
                .with_context(|| format!("line {line_no}: invalid cost '{text}'"))?,
            None => DEFAULT_COST,
        };

        let from = intern(&mut ids, &mut labels, from);
        let to = intern(&mut ids, &mut labels, to);
        edges.push((line_no, from, to, cost));
    }

    let mut graph = Graph::with_capacity(labels.len());
    for _ in &labels {
        graph.add_node();
    }
    for (line_no, from, to, cost) in edges {
        // a repeated identical line is harmless
        if from != to && graph.cost(from, to) == Some(cost) {
            continue;
        }
        graph
            .try_add_edge(from, to, cost)
            .with_context(|| format!("line {line_no}: {} -> {}", labels[from], labels[to]))?;
    }

    Ok(EdgeList { graph, labels })
}

fn intern(ids: &mut HashMap<String, NodeIndex>, labels: &mut Vec<String>, label: &str) -> NodeIndex {
    if let Some(&id) = ids.get(label) {
        return id;
    }
    let id = labels.len();
    labels.push(label.to_string());
    ids.insert(label.to_string(), id);
    id
}
