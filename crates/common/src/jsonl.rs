//! Reading and writing JSON Lines files.
//!
//! Extracted test cases and evaluation transcripts are exchanged as JSONL,
//! one serialized record per line.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Write records to a JSONL file, one per line. Returns the record count.
pub fn write_jsonl<T, P>(path: P, items: &[T]) -> Result<usize>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::create(path)
        .with_context(|| format!("Failed to create JSONL file at {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    for item in items {
        serde_json::to_writer(&mut writer, item)
            .with_context(|| format!("Failed to serialize record for {}", path.display()))?;
        writer.write_all(b"\n")?;
    }

    writer.flush()?;
    Ok(items.len())
}

/// Read all records from a JSONL file. Blank lines are skipped.
pub fn read_jsonl<T, P>(path: P) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open JSONL file at {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut items = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read {}", path.display()))?;
        if line.trim().is_empty() {
            continue;
        }
        let item = serde_json::from_str(&line).with_context(|| {
            format!("Invalid JSONL record at {}:{}", path.display(), index + 1)
        })?;
        items.push(item);
    }

    Ok(items)
}
