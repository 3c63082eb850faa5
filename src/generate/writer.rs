use crate::core::instance::Instance;
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Who produced an instance file and from which seed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provenance {
    pub creator: String,
    pub version: String,
    pub seed: u64,
}

impl Provenance {
    pub fn new(seed: u64) -> Self {
        Self {
            creator: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            seed,
        }
    }

    pub fn with_creator(mut self, creator: impl Into<String>) -> Self {
        self.creator = creator.into();
        self
    }
}

fn record_writer<W: Write>(out: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(out)
}

pub fn write_instance<W: Write>(
    mut out: W,
    instance: &Instance,
    provenance: &Provenance,
) -> anyhow::Result<()> {
    writeln!(out, "# Created by {}", provenance.creator)?;
    writeln!(out, "# Version: {}", provenance.version)?;
    writeln!(out, "# Seed: {}", provenance.seed)?;
    writeln!(out, "# Format:")?;
    writeln!(out, "#   First line: S  |D|")?;
    writeln!(out, "#   Other lines: <src\tdst\t#slots>")?;

    let mut records = record_writer(out);
    records.write_record([
        instance.slot_budget.to_string(),
        instance.demand_count().to_string(),
    ])?;
    for demand in &instance.demands {
        records.write_record([
            demand.source.to_string(),
            demand.destination.to_string(),
            demand.size.to_string(),
        ])?;
    }
    records.flush()?;

    anyhow::Ok(())
}

pub fn to_text(instance: &Instance, provenance: &Provenance) -> anyhow::Result<String> {
    let mut buf = Vec::new();
    write_instance(&mut buf, instance, provenance)?;
    Ok(String::from_utf8(buf)?)
}

/// Writes the instance next to `path` and renames it into place, so a reader
/// either sees the complete file or nothing.
pub fn persist_instance(
    path: &Path,
    instance: &Instance,
    provenance: &Provenance,
) -> anyhow::Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("{} has no parent directory", path.display()))?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    {
        let mut out = BufWriter::new(tmp.as_file_mut());
        write_instance(&mut out, instance, provenance)?;
        out.flush()?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(path)?;

    anyhow::Ok(())
}
