//! Sweep configuration: defaults, directory resolution and filtering of the
//! user supplied value lists.

use crate::sweep::percentage_dir_name;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const DEFAULT_SEED: u64 = 1988;

/// Slots per fiber, from lightly to heavily provisioned links.
pub const DEFAULT_SLOT_BUDGETS: [u32; 15] = [
    10, 15, 20, 30, 40, 60, 80, 100, 150, 200, 300, 400, 600, 800, 1000,
];

/// Largest share of a link a single demand may take.
pub const DEFAULT_PERCENTAGES: [f64; 8] = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("directory '{}' not found", .0.display())]
    MissingDirectory(PathBuf),
    #[error("no positive slot budget given")]
    NoSlotBudgets,
    #[error("no percentage in (0, 1] given")]
    NoPercentages,
    #[error("cannot determine the working directory")]
    WorkingDirectory(#[source] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directories {
    pub topologies: PathBuf,
    pub instances: PathBuf,
}

impl Directories {
    /// `main` defaults to the working directory; the topology and instance
    /// directories default to `topologies/` and `instances/` inside it.
    pub fn resolve(
        main: Option<&Path>,
        topologies: Option<&Path>,
        instances: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        let main = match main {
            Some(dir) => dir.to_path_buf(),
            None => std::env::current_dir().map_err(ConfigError::WorkingDirectory)?,
        };
        let topologies = topologies.map_or_else(|| main.join("topologies"), Path::to_path_buf);
        let instances = instances.map_or_else(|| main.join("instances"), Path::to_path_buf);

        for dir in [&main, &topologies] {
            if !dir.is_dir() {
                return Err(ConfigError::MissingDirectory(dir.clone()));
            }
        }

        Ok(Self {
            topologies,
            instances,
        })
    }
}

#[derive(Debug, Clone)]
pub struct SweepConfig {
    pub directories: Directories,
    pub seed: u64,
    pub slot_budgets: Vec<u32>,
    pub percentages: Vec<f64>,
    pub creator: Option<String>,
}

impl SweepConfig {
    pub fn new(
        directories: Directories,
        seed: u64,
        slot_budgets: &[i64],
        percentages: &[f64],
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            directories,
            seed,
            slot_budgets: normalize_slot_budgets(slot_budgets)?,
            percentages: normalize_percentages(percentages)?,
            creator: None,
        })
    }

    pub fn with_creator(mut self, creator: Option<String>) -> Self {
        self.creator = creator;
        self
    }
}

/// Sorted, deduplicated positive budgets. An empty list selects the defaults.
pub fn normalize_slot_budgets(values: &[i64]) -> Result<Vec<u32>, ConfigError> {
    if values.is_empty() {
        return Ok(DEFAULT_SLOT_BUDGETS.to_vec());
    }

    let mut budgets = Vec::with_capacity(values.len());
    for &value in values {
        match u32::try_from(value) {
            Ok(budget) if budget > 0 => budgets.push(budget),
            _ => warn!(value, "ignoring slot budget outside 1..=u32::MAX"),
        }
    }
    budgets.sort_unstable();
    budgets.dedup();

    if budgets.is_empty() {
        return Err(ConfigError::NoSlotBudgets);
    }
    Ok(budgets)
}

/// Sorted percentages in (0, 1], one per output directory. An empty list
/// selects the defaults.
pub fn normalize_percentages(values: &[f64]) -> Result<Vec<f64>, ConfigError> {
    if values.is_empty() {
        return Ok(DEFAULT_PERCENTAGES.to_vec());
    }

    let mut percentages = Vec::with_capacity(values.len());
    for &value in values {
        if value > 0.0 && value <= 1.0 {
            percentages.push(value);
        } else {
            warn!(value, "ignoring percentage outside (0, 1]");
        }
    }
    percentages.sort_by(f64::total_cmp);
    // values that share a directory would overwrite each other's files
    percentages.dedup_by(|a, b| percentage_dir_name(*a) == percentage_dir_name(*b));

    if percentages.is_empty() {
        return Err(ConfigError::NoPercentages);
    }
    Ok(percentages)
}
