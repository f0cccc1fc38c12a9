//! gSpan-style transaction blocks.
//!
//! ```text
//! t # 0
//! v 0 0
//! v 1 0
//! e 0 1 2
//! t # 1 * 3
//! ...
//! ```
//!
//! Vertex lines carry a placeholder label `0`; edge lines carry the edge
//! color, or `0` for uncolored edges. The miner writes mined patterns in
//! the same shape, with `* <support>` on headers and `x: <ids>` lines
//! listing the transactions each pattern was found in.

use super::{SupportPlacement, parse_support, parse_token};
use crate::{Color, Edge, Graph};
use stitchmine_core::{Error, Result};

/// Placeholder vertex label written on every `v` line.
const VERTEX_LABEL: &str = "0";

// ============================================================================
// Encoding
// ============================================================================

/// Encode graphs as gSpan blocks.
///
/// Directed graphs are written through their undirected view, so a
/// reciprocal pair becomes two parallel undirected edges.
pub fn encode(graphs: &[Graph]) -> String {
    let mut out = String::new();
    for (index, graph) in graphs.iter().enumerate() {
        out.push_str(&format!("t # {index}\n"));
        for vertex in 0..graph.vertex_count() {
            out.push_str(&format!("v {vertex} {VERTEX_LABEL}\n"));
        }
        for edge in graph.edges() {
            out.push_str(&format!(
                "e {} {} {}\n",
                edge.source,
                edge.target,
                edge.color_or_neutral()
            ));
        }
    }
    out
}

// ============================================================================
// Decoding
// ============================================================================

struct Block {
    graph: Graph,
    header_support: Option<f64>,
}

struct Header {
    index: i64,
    support: Option<f64>,
}

/// Decode gSpan blocks into undirected graphs.
///
/// Header supports are assigned according to `placement`. A header with a
/// negative index (`t # -1`) ends the input; its support, if any, belongs
/// to the last block under [`SupportPlacement::FollowingHeader`].
pub fn decode(text: &str, placement: SupportPlacement) -> Result<Vec<Graph>> {
    let mut graphs = Vec::new();
    let mut current: Option<Block> = None;
    let mut ended_at: Option<usize> = None;

    for (i, raw) in text.lines().enumerate() {
        let line_no = i + 1;
        let tokens: Vec<&str> = raw.split_whitespace().collect();
        let Some(&kind) = tokens.first() else {
            continue;
        };

        if let Some(end) = ended_at {
            return Err(Error::format(
                line_no,
                format!("content after end-of-input header on line {end}"),
            ));
        }

        match kind {
            "t" => {
                let header = parse_header(&tokens, line_no)?;
                if let Some(block) = current.take() {
                    let support = match placement {
                        SupportPlacement::FollowingHeader => header.support,
                        SupportPlacement::OwnHeader => block.header_support,
                    };
                    graphs.push(finish(block.graph, support));
                } else if header.support.is_some()
                    && placement == SupportPlacement::FollowingHeader
                    && header.index >= 0
                {
                    log::debug!("Ignoring support on first header (line {line_no})");
                }

                if header.index < 0 {
                    ended_at = Some(line_no);
                } else {
                    current = Some(Block {
                        graph: Graph::undirected(0),
                        header_support: header.support,
                    });
                }
            }
            "v" => {
                let block = open_block(&mut current, line_no, "vertex")?;
                parse_vertex(&tokens, line_no, &mut block.graph)?;
            }
            "e" => {
                let block = open_block(&mut current, line_no, "edge")?;
                parse_edge(&tokens, line_no, &mut block.graph)?;
            }
            "x" | "x:" => {
                let block = open_block(&mut current, line_no, "transaction")?;
                let ids = tokens[1..]
                    .iter()
                    .map(|t| parse_token::<usize>(t, line_no, "transaction id"))
                    .collect::<Result<Vec<_>>>()?;
                block.graph.transactions = Some(ids);
            }
            other => {
                return Err(Error::format(
                    line_no,
                    format!("unrecognized line type '{other}'"),
                ));
            }
        }
    }

    if let Some(block) = current {
        let support = match placement {
            SupportPlacement::FollowingHeader => None,
            SupportPlacement::OwnHeader => block.header_support,
        };
        graphs.push(finish(block.graph, support));
    }

    Ok(graphs)
}

fn finish(mut graph: Graph, support: Option<f64>) -> Graph {
    graph.support = support;
    graph
}

fn open_block<'a>(current: &'a mut Option<Block>, line: usize, what: &str) -> Result<&'a mut Block> {
    current
        .as_mut()
        .ok_or_else(|| Error::format(line, format!("{what} line before any 't #' header")))
}

/// `t # <index>` or `t # <index> * <support>`.
fn parse_header(tokens: &[&str], line: usize) -> Result<Header> {
    match tokens {
        ["t", "#", index] => Ok(Header {
            index: parse_token(index, line, "graph index")?,
            support: None,
        }),
        ["t", "#", index, "*", support] => Ok(Header {
            index: parse_token(index, line, "graph index")?,
            support: Some(parse_support(support, line)?),
        }),
        _ => Err(Error::format(
            line,
            format!(
                "malformed header '{}' (expected 't # <index> [* <support>]')",
                tokens.join(" ")
            ),
        )),
    }
}

/// `v <id> [<label>]`, ids in order from 0.
fn parse_vertex(tokens: &[&str], line: usize, graph: &mut Graph) -> Result<()> {
    if !(2..=3).contains(&tokens.len()) {
        return Err(Error::format(
            line,
            format!("vertex line has {} tokens, expected 2 or 3", tokens.len()),
        ));
    }
    let id: usize = parse_token(tokens[1], line, "vertex id")?;
    if id != graph.vertex_count() {
        return Err(Error::format(
            line,
            format!("vertex {id} out of order, expected {}", graph.vertex_count()),
        ));
    }
    graph.add_vertex();
    Ok(())
}

/// `e <source> <target> <color>`.
fn parse_edge(tokens: &[&str], line: usize, graph: &mut Graph) -> Result<()> {
    if tokens.len() != 4 {
        return Err(Error::format(
            line,
            format!("edge line has {} tokens, expected 4", tokens.len()),
        ));
    }
    let source: usize = parse_token(tokens[1], line, "source vertex")?;
    let target: usize = parse_token(tokens[2], line, "target vertex")?;
    let color: Color = parse_token(tokens[3], line, "edge color")?;
    graph
        .add_edge(Edge::colored(source, target, color))
        .map_err(|e| Error::format(line, e.to_string()))
}

// ============================================================================
// Tests
// ============================================================================
