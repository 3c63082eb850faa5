use crate::core::topology::Topology;
use std::ops::RangeInclusive;

// absorbs representation error in `percentage * slot_budget`, e.g. 0.07 * 100
const CEIL_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum SizingError {
    #[error("slot budget must be positive")]
    ZeroSlotBudget,
    #[error("max demand size must be at least one slot")]
    ZeroDemandSize,
    #[error("percentage {0} is outside (0, 1]")]
    PercentageOutOfRange(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizingParameters {
    slot_budget: u32,
    max_demand_size: u32,
}

impl SizingParameters {
    pub fn new(slot_budget: u32, max_demand_size: u32) -> Result<Self, SizingError> {
        if slot_budget == 0 {
            return Err(SizingError::ZeroSlotBudget);
        }
        if max_demand_size == 0 {
            return Err(SizingError::ZeroDemandSize);
        }
        Ok(Self {
            slot_budget,
            max_demand_size,
        })
    }

    /// Caps a single demand at `ceil(percentage * slot_budget)` slots.
    ///
    /// Products within 1e-9 above an integer round down to it, so
    /// `0.30000000000000004 * 10` gives 3 where a literal `ceil` gives 4.
    pub fn from_percentage(slot_budget: u32, percentage: f64) -> Result<Self, SizingError> {
        if !(percentage > 0.0 && percentage <= 1.0) {
            return Err(SizingError::PercentageOutOfRange(percentage));
        }
        let cap = (percentage * slot_budget as f64 - CEIL_TOLERANCE).ceil();
        Self::new(slot_budget, (cap as u32).max(1))
    }

    pub fn slot_budget(&self) -> u32 {
        self.slot_budget
    }

    pub fn max_demand_size(&self) -> u32 {
        self.max_demand_size
    }
}

/// Heuristic ceiling on the number of demands a topology can carry.
///
/// This is deliberately loose: it ignores node degrees so that part of the
/// generated corpus is infeasible.
pub fn estimate_max_demands(topology: &Topology, sizing: &SizingParameters) -> u64 {
    let n = topology.node_count() as f64;
    let slots = sizing.slot_budget() as f64;
    let half_cap = sizing.max_demand_size() as f64 / 2.0;
    ((n - 1.0) * topology.density() * slots / half_cap) as u64
}

/// Closed range `[floor(max / 2), max]` the demand count is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemandBound {
    pub lower: u64,
    pub max: u64,
}

impl DemandBound {
    pub fn new(topology: &Topology, sizing: &SizingParameters) -> Self {
        let max = estimate_max_demands(topology, sizing);
        Self { lower: max / 2, max }
    }

    pub fn range(&self) -> RangeInclusive<u64> {
        self.lower..=self.max
    }

    pub fn contains(&self, demand_count: u64) -> bool {
        self.range().contains(&demand_count)
    }

    pub fn is_degenerate(&self) -> bool {
        self.max == 0
    }
}
