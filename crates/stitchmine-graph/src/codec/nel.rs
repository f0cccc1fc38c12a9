//! MOSS node/edge-list (NEL) transactions.
//!
//! ```text
//! v 1
//! v 2
//! e 1 2 0
//! g 1
//! x 0
//!
//! v 1
//! ...
//! ```
//!
//! Indices are 1-based in the file and 0-based in [`Graph`]. Mined
//! patterns are followed by an `s <nodes> <edges> <support> ...` line whose
//! fourth token is the absolute support of the pattern just closed.

use super::{parse_support, parse_token};
use crate::{Color, Edge, Graph};
use stitchmine_core::{Error, Result};

// ============================================================================
// Encoding
// ============================================================================

/// Encode graphs as NEL transactions.
///
/// Every edge carries a color token; uncolored edges are written as `0`.
pub fn encode(graphs: &[Graph]) -> String {
    let mut out = String::new();
    for (index, graph) in graphs.iter().enumerate() {
        for vertex in 0..graph.vertex_count() {
            out.push_str(&format!("v {}\n", vertex + 1));
        }
        for edge in graph.edges() {
            out.push_str(&format!(
                "e {} {} {}\n",
                edge.source + 1,
                edge.target + 1,
                edge.color_or_neutral()
            ));
        }
        out.push_str(&format!("g {}\nx 0\n\n", index + 1));
    }

    let trimmed = out.trim_end();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{trimmed}\n")
    }
}

// ============================================================================
// Decoding
// ============================================================================

/// Decode NEL transactions into directed graphs.
pub fn decode(text: &str) -> Result<Vec<Graph>> {
    let mut graphs: Vec<Graph> = Vec::new();
    let mut current = Graph::directed(0);
    let mut open_since: Option<usize> = None;

    for (i, raw) in text.lines().enumerate() {
        let line_no = i + 1;
        let tokens: Vec<&str> = raw.split_whitespace().collect();
        let Some(&kind) = tokens.first() else {
            continue;
        };

        match kind {
            "v" | "n" => {
                if tokens.len() < 2 {
                    return Err(Error::format(line_no, "vertex line without an id"));
                }
                let id = parse_one_based(tokens[1], line_no, "vertex id")?;
                if id != current.vertex_count() {
                    return Err(Error::format(
                        line_no,
                        format!(
                            "vertex {} out of order, expected {}",
                            id + 1,
                            current.vertex_count() + 1
                        ),
                    ));
                }
                current.add_vertex();
                open_since.get_or_insert(line_no);
            }
            "e" | "d" => {
                if !(3..=4).contains(&tokens.len()) {
                    return Err(Error::format(
                        line_no,
                        format!("edge line has {} tokens, expected 3 or 4", tokens.len()),
                    ));
                }
                let source = parse_one_based(tokens[1], line_no, "source vertex")?;
                let target = parse_one_based(tokens[2], line_no, "target vertex")?;
                let mut edge = Edge::new(source, target);
                if let Some(token) = tokens.get(3) {
                    edge = edge.with_color(parse_token::<Color>(token, line_no, "edge color")?);
                }
                current
                    .add_edge(edge)
                    .map_err(|e| Error::format(line_no, e.to_string()))?;
                open_since.get_or_insert(line_no);
            }
            "g" => {
                graphs.push(std::mem::replace(&mut current, Graph::directed(0)));
                open_since = None;
            }
            "s" => {
                if tokens.len() < 4 {
                    return Err(Error::format(
                        line_no,
                        format!("support line has {} tokens, expected at least 4", tokens.len()),
                    ));
                }
                let support = parse_support(tokens[3], line_no)?;
                let last = graphs
                    .last_mut()
                    .ok_or_else(|| Error::format(line_no, "support line before any graph"))?;
                last.support = Some(support);
            }
            "x" => {}
            other => {
                return Err(Error::format(
                    line_no,
                    format!("unrecognized line type '{other}'"),
                ));
            }
        }
    }

    if let Some(line) = open_since {
        return Err(Error::format(
            line,
            "graph starting here is never closed by a 'g' line",
        ));
    }

    Ok(graphs)
}

fn parse_one_based(token: &str, line: usize, what: &str) -> Result<usize> {
    let id: usize = parse_token(token, line, what)?;
    id.checked_sub(1)
        .ok_or_else(|| Error::format(line, format!("{what} must be 1-based, got 0")))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_layout() {
        let a = Graph::from_edges(2, true, [Edge::colored(0, 1, 2)]).unwrap();
        let b = Graph::from_edges(2, true, [Edge::new(1, 0)]).unwrap();
        assert_eq!(
            encode(&[a, b]),
            "v 1\nv 2\ne 1 2 2\ng 1\nx 0\n\nv 1\nv 2\ne 2 1 0\ng 2\nx 0\n"
        );
    }

    #[test]
    fn test_encode_empty() {
        assert_eq!(encode(&[]), "");
    }

    #[test]
    fn test_decode_translates_indices() {
        let graphs = decode("v 1\nv 2\nv 3\ne 3 1 1\ne 1 2\ng 1\nx 0\n").unwrap();
        assert_eq!(graphs.len(), 1);
        assert!(graphs[0].is_directed());
        assert_eq!(graphs[0].edges(), &[Edge::colored(2, 0, 1), Edge::new(0, 1)]);
    }

    #[test]
    fn test_decode_alternative_line_types() {
        let graphs = decode("n 1\nn 2\nd 1 2 0\ng 7\n").unwrap();
        assert_eq!(graphs[0].edges(), &[Edge::colored(0, 1, 0)]);
    }

    #[test]
    fn test_support_line_applies_to_closed_graph() {
        let text = "\
v 1
v 2
e 1 2 0
g 1
s 2 1 12 40.0 0 0.0
v 1
g 2
";
        let graphs = decode(text).unwrap();
        assert_eq!(graphs[0].support, Some(12.0));
        assert_eq!(graphs[1].support, None);
    }

    #[test]
    fn test_support_line_before_graph() {
        let err = decode("s 1 0 3 10.0\n").unwrap_err();
        assert!(matches!(err, Error::Format { line: 1, .. }));
    }

    #[test]
    fn test_short_support_line() {
        assert!(decode("v 1\ng 1\ns 1 0\n").is_err());
    }

    #[test]
    fn test_zero_index_rejected() {
        assert!(decode("v 0\ng 1\n").is_err());
        assert!(decode("v 1\ne 0 1\ng 1\n").is_err());
    }

    #[test]
    fn test_edge_token_count() {
        let err = decode("v 1\nv 2\ne 1\ng 1\n").unwrap_err();
        assert!(matches!(err, Error::Format { line: 3, .. }));
        assert!(decode("v 1\nv 2\ne 1 2 0 9\ng 1\n").is_err());
    }

    #[test]
    fn test_undeclared_endpoint() {
        assert!(decode("v 1\ne 1 2 0\ng 1\n").is_err());
    }

    #[test]
    fn test_unterminated_graph() {
        let err = decode("v 1\nv 2\ng 1\nv 1\n").unwrap_err();
        assert!(matches!(err, Error::Format { line: 4, .. }));
    }

    #[test]
    fn test_empty_graph_block() {
        let graphs = decode("g 1\nx 0\n").unwrap();
        assert_eq!(graphs.len(), 1);
        assert_eq!(graphs[0].vertex_count(), 0);
    }
}
