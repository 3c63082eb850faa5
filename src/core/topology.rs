pub type NodeId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TopologyError {
    #[error("a topology needs at least 2 nodes, got {0}")]
    TooFewNodes(u32),
    #[error("a topology needs at least one edge")]
    NoEdges,
}

/// Size of an undirected fiber topology. Only the counts matter to instance
/// sizing; the edge list itself is never loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Topology {
    node_count: u32,
    edge_count: u32,
}

impl Topology {
    pub fn new(node_count: u32, edge_count: u32) -> Result<Self, TopologyError> {
        if node_count < 2 {
            return Err(TopologyError::TooFewNodes(node_count));
        }
        if edge_count == 0 {
            return Err(TopologyError::NoEdges);
        }
        Ok(Self {
            node_count,
            edge_count,
        })
    }

    pub fn node_count(&self) -> u32 {
        self.node_count
    }

    pub fn edge_count(&self) -> u32 {
        self.edge_count
    }

    pub fn max_edge_count(&self) -> u64 {
        let n = self.node_count as u64;
        n * (n - 1) / 2
    }

    /// Fraction of all unordered node pairs joined by an edge.
    pub fn density(&self) -> f64 {
        let n = self.node_count as f64;
        let m = self.edge_count as f64;
        2.0 * m / (n * (n - 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rejects_single_node() {
        assert_eq!(Err(TopologyError::TooFewNodes(1)), Topology::new(1, 1));
        assert_eq!(Err(TopologyError::TooFewNodes(0)), Topology::new(0, 3));
    }

    #[test]
    fn test_rejects_no_edges() {
        assert_eq!(Err(TopologyError::NoEdges), Topology::new(5, 0));
    }

    #[test]
    fn test_density_of_ring() {
        let t = Topology::new(4, 4).unwrap();
        assert_relative_eq!(t.density(), 2.0 / 3.0);
    }

    #[test]
    fn test_density_of_complete_graph() {
        let t = Topology::new(6, 15).unwrap();
        assert_eq!(15, t.max_edge_count());
        assert_relative_eq!(t.density(), 1.0);
    }

    #[test]
    fn test_density_of_single_link() {
        let t = Topology::new(2, 1).unwrap();
        assert_relative_eq!(t.density(), 1.0);
    }
}
