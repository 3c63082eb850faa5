//! Verifies a generated instance tree against the topologies it was built
//! from.

use crate::core::instance::Instance;
use crate::core::sizing::{DemandBound, SizingParameters};
use crate::core::topology::Topology;
use crate::ingest::instance::read_instance_file;
use crate::sweep::{InstanceName, load_topologies};
use anyhow::Context;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Violation {
    #[error("file name does not match instance_<topology>_<S>_<max>_<|D|>.txt")]
    BadFileName,
    #[error("file sits in directory `{found}` instead of `{expected}`")]
    Misplaced { expected: String, found: String },
    #[error("no topology named `{0}`")]
    UnknownTopology(String),
    #[error("unreadable instance: {0}")]
    Unreadable(String),
    #[error("invalid sizing in file name: {0}")]
    InvalidSizing(String),
    #[error("slot budget {found} differs from file name ({expected})")]
    SlotBudget { expected: u32, found: u32 },
    #[error("{found} demands listed but file name says {expected}")]
    DemandCount { expected: usize, found: usize },
    #[error("{count} demands outside the bound {lower}..={max}")]
    OutOfBound { count: usize, lower: u64, max: u64 },
    #[error("demand {index}: {from} -> {to} is not a pair of distinct nodes below {node_count}")]
    BadEndpoints {
        index: usize,
        from: u32,
        to: u32,
        node_count: u32,
    },
    #[error("demand {index}: size {size} outside 1..={max}")]
    BadSize { index: usize, size: u32, max: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub path: PathBuf,
    pub violation: Violation,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckReport {
    pub checked: usize,
    pub findings: Vec<Finding>,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }
}

pub fn validate_instance(
    instance: &Instance,
    topology: &Topology,
    name: &InstanceName,
) -> Vec<Violation> {
    let mut violations = Vec::new();

    if instance.slot_budget != name.slot_budget {
        violations.push(Violation::SlotBudget {
            expected: name.slot_budget,
            found: instance.slot_budget,
        });
    }
    if instance.demand_count() != name.demand_count {
        violations.push(Violation::DemandCount {
            expected: name.demand_count,
            found: instance.demand_count(),
        });
    }

    let sizing = match SizingParameters::new(name.slot_budget, name.max_demand_size) {
        Ok(sizing) => sizing,
        Err(e) => {
            violations.push(Violation::InvalidSizing(e.to_string()));
            return violations;
        }
    };
    let bound = DemandBound::new(topology, &sizing);
    if !bound.contains(instance.demand_count() as u64) {
        violations.push(Violation::OutOfBound {
            count: instance.demand_count(),
            lower: bound.lower,
            max: bound.max,
        });
    }

    let node_count = topology.node_count();
    for (index, demand) in instance.demands.iter().enumerate() {
        if demand.source == demand.destination
            || demand.source >= node_count
            || demand.destination >= node_count
        {
            violations.push(Violation::BadEndpoints {
                index,
                from: demand.source,
                to: demand.destination,
                node_count,
            });
        }
        if !(1..=sizing.max_demand_size()).contains(&demand.size) {
            violations.push(Violation::BadSize {
                index,
                size: demand.size,
                max: sizing.max_demand_size(),
            });
        }
    }

    violations
}

fn check_file(path: &Path, topologies: &HashMap<String, Topology>) -> Vec<Violation> {
    let Some(name) = path
        .file_name()
        .and_then(|f| f.to_str())
        .and_then(InstanceName::parse)
    else {
        return vec![Violation::BadFileName];
    };

    let dir_name = path
        .parent()
        .and_then(|p| p.file_name())
        .and_then(|f| f.to_str())
        .unwrap_or_default();
    if dir_name != name.topology {
        return vec![Violation::Misplaced {
            expected: name.topology,
            found: dir_name.to_string(),
        }];
    }

    let Some(topology) = topologies.get(&name.topology) else {
        return vec![Violation::UnknownTopology(name.topology)];
    };
    match read_instance_file(path) {
        Ok(instance) => validate_instance(&instance, topology, &name),
        Err(e) => vec![Violation::Unreadable(e.to_string())],
    }
}

/// Checks every `<instances>/<percentage>/<topology>/instance_*.txt` file.
pub fn check_tree(instances_dir: &Path, topologies_dir: &Path) -> anyhow::Result<CheckReport> {
    let topologies = load_topologies(topologies_dir)?
        .into_iter()
        .map(|(file, topology)| (file.name, topology))
        .collect::<HashMap<_, _>>();

    let root = instances_dir
        .to_str()
        .with_context(|| format!("{} is not valid UTF-8", instances_dir.display()))?;
    let pattern = format!("{}/*/*/instance_*.txt", glob::Pattern::escape(root));
    let mut paths = glob::glob(&pattern)?.collect::<Result<Vec<_>, _>>()?;
    paths.sort();

    let mut report = CheckReport::default();
    for path in paths {
        report.checked += 1;
        let violations = check_file(&path, &topologies);
        if violations.is_empty() {
            debug!(path = %path.display(), "instance ok");
        }
        for violation in violations {
            warn!(path = %path.display(), %violation, "invalid instance");
            report.findings.push(Finding {
                path: path.clone(),
                violation,
            });
        }
    }

    anyhow::Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Directories, SweepConfig};
    use crate::core::instance::Demand;
    use crate::sweep::run_sweep;

    fn ring_name(demand_count: usize) -> InstanceName {
        InstanceName {
            topology: "ring".to_string(),
            slot_budget: 10,
            max_demand_size: 5,
            demand_count,
        }
    }

    #[test]
    fn test_valid_instance() {
        let t = Topology::new(4, 4).unwrap();
        let demands = vec![Demand::new(0, 1, 5); 4];
        let instance = Instance::new(10, demands);
        assert!(validate_instance(&instance, &t, &ring_name(4)).is_empty());
    }

    #[test]
    fn test_invalid_demands() {
        let t = Topology::new(4, 4).unwrap();
        let mut demands = vec![Demand::new(0, 1, 1); 4];
        demands[1] = Demand::new(2, 2, 1);
        demands[2] = Demand::new(0, 4, 1);
        demands[3] = Demand::new(3, 0, 6);
        let instance = Instance::new(10, demands);

        assert_eq!(
            vec![
                Violation::BadEndpoints {
                    index: 1,
                    from: 2,
                    to: 2,
                    node_count: 4
                },
                Violation::BadEndpoints {
                    index: 2,
                    from: 0,
                    to: 4,
                    node_count: 4
                },
                Violation::BadSize {
                    index: 3,
                    size: 6,
                    max: 5
                },
            ],
            validate_instance(&instance, &t, &ring_name(4))
        );
    }

    #[test]
    fn test_count_outside_bound() {
        let t = Topology::new(4, 4).unwrap();
        let instance = Instance::new(10, vec![Demand::new(0, 1, 1); 9]);
        assert_eq!(
            vec![Violation::OutOfBound {
                count: 9,
                lower: 4,
                max: 8
            }],
            validate_instance(&instance, &t, &ring_name(9))
        );
    }

    #[test]
    fn test_header_disagrees_with_name() {
        let t = Topology::new(4, 4).unwrap();
        let instance = Instance::new(20, vec![Demand::new(0, 1, 1); 5]);
        let violations = validate_instance(&instance, &t, &ring_name(4));
        assert!(violations.contains(&Violation::SlotBudget {
            expected: 10,
            found: 20
        }));
        assert!(violations.contains(&Violation::DemandCount {
            expected: 4,
            found: 5
        }));
    }

    #[test]
    fn test_generated_tree_is_clean_until_tampered() {
        let tops = tempfile::tempdir().unwrap();
        std::fs::write(tops.path().join("ring.txt"), "4 4\n").unwrap();
        std::fs::write(tops.path().join("us_net.txt"), "24 43\n").unwrap();
        std::fs::write(tops.path().join("sparse.txt"), "10 1\n").unwrap();
        let out = tempfile::tempdir().unwrap();
        let dirs = Directories {
            topologies: tops.path().to_path_buf(),
            instances: out.path().to_path_buf(),
        };
        let summary = run_sweep(&SweepConfig::new(dirs, 7, &[], &[]).unwrap()).unwrap();

        let report = check_tree(out.path(), tops.path()).unwrap();
        assert_eq!(summary.instances, report.checked);
        assert!(report.is_clean(), "{:?}", report.findings);

        let ring_dir = out.path().join("50").join("ring");
        let victim = std::fs::read_dir(&ring_dir)
            .unwrap()
            .map(|e| e.unwrap().path())
            .find(|p| !p.to_str().unwrap().ends_with("_0.txt"))
            .unwrap();
        let text = std::fs::read_to_string(&victim).unwrap();
        let mut lines = text.lines().map(str::to_string).collect::<Vec<_>>();
        let last = lines.len() - 1;
        lines[last] = "0\t0\t1".to_string();
        std::fs::write(&victim, lines.join("\n") + "\n").unwrap();
        std::fs::write(ring_dir.join("notes.txt"), "ignored\n").unwrap();
        std::fs::write(ring_dir.join("instance_ring_x.txt"), "10\t0\n").unwrap();

        let report = check_tree(out.path(), tops.path()).unwrap();
        assert_eq!(summary.instances + 1, report.checked);
        assert_eq!(2, report.findings.len());
        assert!(report.findings.iter().any(|f| f.path == victim
            && matches!(f.violation, Violation::BadEndpoints { from: 0, to: 0, .. })));
        assert!(report
            .findings
            .iter()
            .any(|f| f.violation == Violation::BadFileName));
    }

    #[test]
    fn test_unknown_topology() {
        let tops = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let dir = out.path().join("10").join("gone");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("instance_gone_10_1_0.txt"), "10\t0\n").unwrap();

        let report = check_tree(out.path(), tops.path()).unwrap();
        assert_eq!(
            vec![Violation::UnknownTopology("gone".to_string())],
            report
                .findings
                .into_iter()
                .map(|f| f.violation)
                .collect::<Vec<_>>()
        );
    }
}
