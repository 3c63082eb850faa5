use crate::core::topology::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Demand {
    pub source: NodeId,
    pub destination: NodeId,
    pub size: u32,
}

impl Demand {
    pub fn new(source: NodeId, destination: NodeId, size: u32) -> Self {
        Self {
            source,
            destination,
            size,
        }
    }
}

/// One RSA problem input: a per-link slot budget and the demands to route.
///
/// Demand order carries no meaning for the problem but is kept as drawn so
/// that serialized output is reproducible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    pub slot_budget: u32,
    pub demands: Vec<Demand>,
}

impl Instance {
    pub fn new(slot_budget: u32, demands: Vec<Demand>) -> Self {
        Self {
            slot_budget,
            demands,
        }
    }

    pub fn demand_count(&self) -> usize {
        self.demands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.demands.is_empty()
    }
}
