//! Named, ordered graph collections.
//!
//! Every stage of the pipeline works on populations: the observed hashtag
//! graphs, their largest components, null-model bootstraps and the
//! cross-platform control set. Graph order is stable so that reported
//! graph indices can be traced back to their source.

use crate::Graph;
use serde::{Deserialize, Serialize};

/// How the graphs of a population were produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PopulationKind {
    /// Graphs built from observed edge lists.
    Observed,
    /// Largest weakly connected components of observed graphs.
    LargestComponent,
    /// Configuration-model bootstrap draws.
    ConfigurationModel,
    /// Erdős–Rényi bootstrap draws.
    ErdosRenyi,
    /// Independently sourced graphs from another platform.
    CrossPlatform,
}

impl PopulationKind {
    /// Short identifier used in file names.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Observed => "graph",
            Self::LargestComponent => "lcc",
            Self::ConfigurationModel => "conf",
            Self::ErdosRenyi => "er",
            Self::CrossPlatform => "cross_platform",
        }
    }
}

/// A named, ordered list of graphs sharing a generation recipe.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Population {
    /// Population name.
    pub name: String,
    /// Generation recipe.
    pub kind: PopulationKind,
    graphs: Vec<Graph>,
}

impl Population {
    /// Create a population.
    pub fn new(name: impl Into<String>, kind: PopulationKind, graphs: Vec<Graph>) -> Self {
        Self {
            name: name.into(),
            kind,
            graphs,
        }
    }

    /// All graphs in order.
    pub fn graphs(&self) -> &[Graph] {
        &self.graphs
    }

    /// Consume the population, returning its graphs.
    pub fn into_graphs(self) -> Vec<Graph> {
        self.graphs
    }

    /// Number of graphs.
    pub fn len(&self) -> usize {
        self.graphs.len()
    }

    /// Whether the population holds no graphs.
    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }

    /// Whether any graph carries edge colors.
    pub fn is_colored(&self) -> bool {
        self.graphs.iter().any(Graph::is_colored)
    }

    /// Graph names, with the index standing in for unnamed graphs.
    pub fn labels(&self) -> Vec<String> {
        self.graphs
            .iter()
            .enumerate()
            .map(|(i, g)| g.name.clone().unwrap_or_else(|| i.to_string()))
            .collect()
    }

    /// A copy with every graph simplified.
    pub fn simplified(&self) -> Population {
        Population {
            name: self.name.clone(),
            kind: self.kind,
            graphs: self.graphs.iter().map(Graph::simplify).collect(),
        }
    }

    /// A copy with every edge color removed.
    pub fn without_colors(&self) -> Population {
        Population {
            name: self.name.clone(),
            kind: self.kind,
            graphs: self.graphs.iter().map(Graph::without_colors).collect(),
        }
    }

    /// The population of largest weakly connected components.
    pub fn largest_components(&self) -> Population {
        Population {
            name: format!("{}_lcc", self.name),
            kind: PopulationKind::LargestComponent,
            graphs: self.graphs.iter().map(Graph::largest_component).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Edge;

    fn population() -> Population {
        let a = Graph::from_edges(4, true, [Edge::new(0, 1), Edge::new(0, 1), Edge::new(2, 3)])
            .unwrap()
            .with_name("dance");
        let b = Graph::from_edges(2, true, [Edge::colored(0, 1, 2)]).unwrap();
        Population::new("tiktok", PopulationKind::Observed, vec![a, b])
    }

    #[test]
    fn test_labels_fall_back_to_index() {
        assert_eq!(population().labels(), vec!["dance", "1"]);
    }

    #[test]
    fn test_is_colored() {
        assert!(population().is_colored());
        let plain = Population::new("p", PopulationKind::Observed, vec![Graph::directed(1)]);
        assert!(!plain.is_colored());
    }

    #[test]
    fn test_simplified() {
        let simple = population().simplified();
        assert_eq!(simple.graphs()[0].edge_count(), 2);
        assert_eq!(simple.kind, PopulationKind::Observed);
    }

    #[test]
    fn test_without_colors() {
        assert!(!population().without_colors().is_colored());
    }

    #[test]
    fn test_largest_components() {
        let lcc = population().largest_components();
        assert_eq!(lcc.kind, PopulationKind::LargestComponent);
        assert_eq!(lcc.name, "tiktok_lcc");
        assert_eq!(lcc.graphs()[0].vertex_count(), 2);
        assert_eq!(lcc.graphs()[0].edge_count(), 2);
    }

    #[test]
    fn test_kind_serialization() {
        let json = serde_json::to_string(&PopulationKind::ErdosRenyi).unwrap();
        assert_eq!(json, "\"erdos_renyi\"");
        assert_eq!(PopulationKind::LargestComponent.slug(), "lcc");
    }
}
