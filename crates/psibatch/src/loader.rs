use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::record::SequenceRecord;
use crate::Result;

const FIELD_SEPARATOR: char = '\t';

/// Records accepted from an input source, plus the number of lines rejected.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct LoadedRecords {
    pub records: Vec<SequenceRecord>,
    pub dropped: usize,
}

/// Load `<id>\t<payload>` records from a file.
pub fn load_sequences<P: AsRef<Path>>(path: P) -> Result<LoadedRecords> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let loaded = read_sequences(BufReader::new(file))?;

    tracing::info!(
        "Loaded {} sequences from {}",
        loaded.records.len(),
        path.display()
    );
    if loaded.dropped > 0 {
        tracing::warn!(
            "Dropped {} malformed line(s) from {}",
            loaded.dropped,
            path.display()
        );
    }

    Ok(loaded)
}

/// Read records from any buffered source, preserving line order.
pub fn read_sequences<R: BufRead>(reader: R) -> Result<LoadedRecords> {
    let mut loaded = LoadedRecords::default();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        match parse_line(&line) {
            Some(record) => loaded.records.push(record),
            None => {
                tracing::debug!("Skipping malformed line {}", line_no + 1);
                loaded.dropped += 1;
            }
        }
    }

    Ok(loaded)
}

/// A line is accepted only if it splits into exactly two non-empty fields.
fn parse_line(line: &str) -> Option<SequenceRecord> {
    let mut fields = line.trim().split(FIELD_SEPARATOR);
    let id = fields.next().filter(|f| !f.is_empty())?;
    let payload = fields.next().filter(|f| !f.is_empty())?;
    if fields.next().is_some() {
        return None;
    }
    Some(SequenceRecord::new(id, payload))
}
