//! Drives a full generation sweep: percentage, then topology, then slot
//! budget, all drawing from one seeded stream. Reordering the loops changes
//! every file after the first.

use crate::config::SweepConfig;
use crate::core::instance::Instance;
use crate::core::sizing::SizingParameters;
use crate::core::topology::Topology;
use crate::generate::sampler::{sample_instance, seeded_rng};
use crate::generate::writer::{Provenance, persist_instance};
use crate::ingest::topology::{TopologyFile, discover_topologies, read_topology};
use anyhow::Context;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Parameters encoded in an instance file name:
/// `instance_<topology>_<S>_<max demand size>_<|D|>.txt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceName {
    pub topology: String,
    pub slot_budget: u32,
    pub max_demand_size: u32,
    pub demand_count: usize,
}

impl InstanceName {
    pub fn file_name(&self) -> String {
        format!(
            "instance_{}_{}_{}_{}.txt",
            self.topology, self.slot_budget, self.max_demand_size, self.demand_count
        )
    }

    /// Topology names may contain underscores, so the numbers are split off
    /// from the right.
    pub fn parse(file_name: &str) -> Option<Self> {
        let stem = file_name
            .strip_prefix("instance_")?
            .strip_suffix(".txt")?;
        let mut parts = stem.rsplitn(4, '_');
        let demand_count = parts.next()?.parse().ok()?;
        let max_demand_size = parts.next()?.parse().ok()?;
        let slot_budget = parts.next()?.parse().ok()?;
        let topology = parts.next().filter(|t| !t.is_empty())?;

        Some(Self {
            topology: topology.to_string(),
            slot_budget,
            max_demand_size,
            demand_count,
        })
    }
}

/// `percentage * 100` rounded to two decimals, without trailing zeros.
pub fn percentage_dir_name(percentage: f64) -> String {
    let hundredths = (percentage * 10_000.0).round() / 100.0;
    format!("{hundredths}")
}

pub fn instance_path(root: &Path, percentage: f64, name: &InstanceName) -> PathBuf {
    root.join(percentage_dir_name(percentage))
        .join(&name.topology)
        .join(name.file_name())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepSummary {
    pub topologies: usize,
    pub instances: usize,
    pub empty_instances: usize,
    pub demands: u64,
}

impl SweepSummary {
    fn record(&mut self, instance: &Instance) {
        self.instances += 1;
        self.demands += instance.demand_count() as u64;
        if instance.is_empty() {
            self.empty_instances += 1;
        }
    }
}

/// Reads every topology up front so a malformed file stops the sweep before
/// anything is written.
pub fn load_topologies(dir: &Path) -> anyhow::Result<Vec<(TopologyFile, Topology)>> {
    let files = discover_topologies(dir)
        .with_context(|| format!("listing topologies in {}", dir.display()))?;

    let mut topologies = Vec::with_capacity(files.len());
    for file in files {
        let topology = read_topology(&file.path)
            .with_context(|| format!("malformed topology {}", file.path.display()))?;
        debug!(
            name = %file.name,
            nodes = topology.node_count(),
            edges = topology.edge_count(),
            density = topology.density(),
            "loaded topology"
        );
        topologies.push((file, topology));
    }

    anyhow::Ok(topologies)
}

pub fn run_sweep(config: &SweepConfig) -> anyhow::Result<SweepSummary> {
    let dirs = &config.directories;
    let topologies = load_topologies(&dirs.topologies)?;
    if topologies.is_empty() {
        warn!(dir = %dirs.topologies.display(), "no topology files found");
    }

    let mut provenance = Provenance::new(config.seed);
    if let Some(creator) = &config.creator {
        provenance = provenance.with_creator(creator.as_str());
    }

    std::fs::create_dir_all(&dirs.instances)
        .with_context(|| format!("creating {}", dirs.instances.display()))?;

    let mut rng = seeded_rng(config.seed);
    let mut summary = SweepSummary {
        topologies: topologies.len(),
        ..Default::default()
    };

    for &percentage in &config.percentages {
        let percentage_dir = dirs.instances.join(percentage_dir_name(percentage));
        for (file, topology) in &topologies {
            let topology_dir = percentage_dir.join(&file.name);
            std::fs::create_dir_all(&topology_dir)
                .with_context(|| format!("creating {}", topology_dir.display()))?;

            for &slot_budget in &config.slot_budgets {
                let sizing = SizingParameters::from_percentage(slot_budget, percentage)?;
                let instance = sample_instance(topology, &sizing, &mut rng);
                let name = InstanceName {
                    topology: file.name.clone(),
                    slot_budget,
                    max_demand_size: sizing.max_demand_size(),
                    demand_count: instance.demand_count(),
                };
                let path = instance_path(&dirs.instances, percentage, &name);
                persist_instance(&path, &instance, &provenance)
                    .with_context(|| format!("writing {}", path.display()))?;

                if instance.is_empty() {
                    warn!(
                        topology = %file.name,
                        slot_budget,
                        max_demand_size = name.max_demand_size,
                        "demand bound is zero, wrote an instance without demands"
                    );
                } else {
                    debug!(path = %path.display(), demands = name.demand_count, "wrote instance");
                }
                summary.record(&instance);
            }
        }
    }

    info!(
        topologies = summary.topologies,
        instances = summary.instances,
        empty = summary.empty_instances,
        demands = summary.demands,
        "sweep finished"
    );
    anyhow::Ok(summary)
}
