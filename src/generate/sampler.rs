use crate::core::instance::{Demand, Instance};
use crate::core::sizing::{DemandBound, SizingParameters};
use crate::core::topology::Topology;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Generator shared by every draw of a sweep. ChaCha keeps the stream stable
/// across platforms and `rand` releases.
pub type SweepRng = ChaCha8Rng;

pub fn seeded_rng(seed: u64) -> SweepRng {
    SweepRng::seed_from_u64(seed)
}

/// Endless stream of demands with distinct endpoints and sizes in
/// `1..=max_demand_size`.
pub fn demands<R: Rng + ?Sized>(
    topology: Topology,
    max_demand_size: u32,
    rng: &mut R,
) -> impl Iterator<Item = Demand> + '_ {
    let node_count = topology.node_count();

    std::iter::repeat_with(move || {
        let source = rng.random_range(0..node_count);
        // skip over the source so every ordered pair is equally likely
        let mut destination = rng.random_range(0..node_count - 1);
        if destination >= source {
            destination += 1;
        }

        Demand::new(source, destination, rng.random_range(1..=max_demand_size))
    })
}

pub fn sample_instance<R: Rng + ?Sized>(
    topology: &Topology,
    sizing: &SizingParameters,
    rng: &mut R,
) -> Instance {
    let bound = DemandBound::new(topology, sizing);
    let demand_count = if bound.is_degenerate() {
        0
    } else {
        rng.random_range(bound.range())
    };

    let demands = demands(*topology, sizing.max_demand_size(), rng)
        .take(demand_count as usize)
        .collect();

    Instance::new(sizing.slot_budget(), demands)
}
