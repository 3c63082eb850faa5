use crate::core::instance::{Demand, Instance};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum InstanceParseError {
    #[error("missing `S |D|` line")]
    MissingHeader,
    #[error("record {record} has {found} fields, expected {expected}")]
    FieldCount {
        record: usize,
        found: usize,
        expected: usize,
    },
    #[error("record {record}: `{value}` is not a valid {field}")]
    InvalidNumber {
        record: usize,
        field: &'static str,
        value: String,
    },
    #[error("header announces {expected} demands but {found} follow")]
    DemandCount { expected: usize, found: usize },
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn field<T: std::str::FromStr>(
    record: &csv::StringRecord,
    index: usize,
    line: usize,
    name: &'static str,
) -> Result<T, InstanceParseError> {
    let value = &record[index];
    value
        .trim()
        .parse::<T>()
        .map_err(|_| InstanceParseError::InvalidNumber {
            record: line,
            field: name,
            value: value.to_string(),
        })
}

fn expect_fields(
    record: &csv::StringRecord,
    line: usize,
    expected: usize,
) -> Result<(), InstanceParseError> {
    if record.len() != expected {
        return Err(InstanceParseError::FieldCount {
            record: line,
            found: record.len(),
            expected,
        });
    }
    Ok(())
}

/// Parses the tab separated instance format. Comment lines are skipped and
/// the demand list must match the announced count exactly.
pub fn read_instance<R: Read>(reader: R) -> Result<Instance, InstanceParseError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .from_reader(BufReader::new(reader));
    let mut records = csv_reader.records();

    let header = records.next().ok_or(InstanceParseError::MissingHeader)??;
    expect_fields(&header, 0, 2)?;
    let slot_budget = field::<u32>(&header, 0, 0, "slot budget")?;
    let expected = field::<usize>(&header, 1, 0, "demand count")?;

    // the announced count is untrusted until the records are seen
    let mut demands = Vec::with_capacity(expected.min(1 << 16));
    for (i, maybe_record) in records.enumerate() {
        let record = maybe_record?;
        let line = i + 1;
        expect_fields(&record, line, 3)?;
        demands.push(Demand::new(
            field(&record, 0, line, "source")?,
            field(&record, 1, line, "destination")?,
            field(&record, 2, line, "size")?,
        ));
    }

    if demands.len() != expected {
        return Err(InstanceParseError::DemandCount {
            expected,
            found: demands.len(),
        });
    }

    Ok(Instance::new(slot_budget, demands))
}

pub fn read_instance_file(path: &Path) -> Result<Instance, InstanceParseError> {
    read_instance(File::open(path)?)
}
