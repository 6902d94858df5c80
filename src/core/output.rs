use crate::domain::model::Assignment;
use crate::domain::strategy::OutputFormat;
use crate::utils::error::{Result, SantaError};
use chrono::{DateTime, Local};
use csv::{ReaderBuilder, WriterBuilder};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const ARROW: &str = " -> ";
const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

pub fn render(assignment: &Assignment, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Arrow => Ok(assignment
            .pairs()
            .iter()
            .map(|pair| format!("{}{}{}\n", pair.giver.email, ARROW, pair.receiver.email))
            .collect()),
        OutputFormat::Csv => {
            let mut writer = WriterBuilder::new().has_headers(false).from_writer(Vec::new());
            for pair in assignment.pairs() {
                writer.write_record([
                    &pair.giver.first_name,
                    &pair.giver.last_name,
                    &pair.giver.email,
                    &pair.receiver.first_name,
                    &pair.receiver.last_name,
                    &pair.receiver.email,
                ])?;
            }
            let bytes = writer
                .into_inner()
                .map_err(|e| SantaError::IoError(e.into_error()))?;
            String::from_utf8(bytes).map_err(|e| SantaError::ValidationError {
                message: format!("rendered output is not UTF-8: {}", e),
            })
        }
    }
}

/// Reads a written artifact back into a giver email to receiver email map.
pub fn parse(content: &str, format: OutputFormat) -> Result<BTreeMap<String, String>> {
    let mut map = BTreeMap::new();
    match format {
        OutputFormat::Arrow => {
            for (index, line) in content.lines().enumerate() {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let (giver, receiver) = line.split_once(ARROW).ok_or_else(|| {
                    SantaError::malformed(index as u64 + 1, line, "expected 'giver -> receiver'")
                })?;
                insert_pair(&mut map, giver.trim(), receiver.trim(), index as u64 + 1, line)?;
            }
        }
        OutputFormat::Csv => {
            let mut reader = ReaderBuilder::new()
                .has_headers(false)
                .trim(csv::Trim::All)
                .from_reader(content.as_bytes());
            for (index, row) in reader.records().enumerate() {
                let record = row?;
                let line = record
                    .position()
                    .map(|p| p.line())
                    .unwrap_or(index as u64 + 1);
                if record.len() != 6 {
                    return Err(SantaError::malformed(
                        line,
                        record.iter().collect::<Vec<_>>().join(","),
                        format!("expected 6 columns, found {}", record.len()),
                    ));
                }
                let raw = record.iter().collect::<Vec<_>>().join(",");
                insert_pair(&mut map, &record[2], &record[5], line, &raw)?;
            }
        }
    }
    Ok(map)
}

fn insert_pair(
    map: &mut BTreeMap<String, String>,
    giver: &str,
    receiver: &str,
    line: u64,
    raw: &str,
) -> Result<()> {
    if giver.is_empty() || receiver.is_empty() {
        return Err(SantaError::malformed(line, raw, "missing giver or receiver"));
    }
    if map.insert(giver.to_string(), receiver.to_string()).is_some() {
        return Err(SantaError::malformed(
            line,
            raw,
            format!("{} appears twice as giver", giver),
        ));
    }
    Ok(())
}

fn stem(input: &Path) -> String {
    input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "participants".to_string())
}

/// `<input-stem>-Matched-<timestamp>.<ext>` inside `dir`.
pub fn output_file_name(
    dir: &Path,
    input: &Path,
    format: OutputFormat,
    at: DateTime<Local>,
) -> PathBuf {
    dir.join(format!(
        "{}-Matched-{}.{}",
        stem(input),
        at.format(TIMESTAMP_FORMAT),
        format.extension()
    ))
}

/// `<input-stem>-Debug-<timestamp>.txt` inside `dir`.
pub fn debug_file_name(dir: &Path, input: &Path, at: DateTime<Local>) -> PathBuf {
    dir.join(format!("{}-Debug-{}.txt", stem(input), at.format(TIMESTAMP_FORMAT)))
}
