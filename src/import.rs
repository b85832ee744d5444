//! CSV loading of time slots and entrants.
//!
//! Time slots: `id,date,weekday,start,capacity` (date `YYYY-MM-DD`, start
//! `HH:MM` or `HH:MM:SS`, capacity optional). Entrants: `id,name,category,slots`
//! with slot ids separated by `;`.

use crate::models::{Entrant, EntrantId, TimeSlot, TimeSlotId};
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use std::collections::HashSet;
use std::io::Read;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("line {line}: invalid date {value:?} (expected YYYY-MM-DD)")]
    InvalidDate { line: usize, value: String },
    #[error("line {line}: invalid start time {value:?} (expected HH:MM)")]
    InvalidTime { line: usize, value: String },
    #[error("line {line}: invalid slot id {value:?}")]
    InvalidSlotId { line: usize, value: String },
    #[error("line {line}: id {id} appears more than once")]
    DuplicateId { line: usize, id: u64 },
}

#[derive(Deserialize)]
struct TimeSlotRecord {
    id: TimeSlotId,
    date: String,
    weekday: String,
    start: String,
    #[serde(default)]
    capacity: Option<u32>,
}

#[derive(Deserialize)]
struct EntrantRecord {
    id: EntrantId,
    name: String,
    category: String,
    #[serde(default)]
    slots: String,
}

fn reader<R: Read>(input: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(input)
}

/// First data row is line 2, after the header.
fn line_of(index: usize) -> usize {
    index + 2
}

fn parse_start(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()
}

/// Read time slots; rows without a capacity get `default_capacity` courts.
pub fn time_slots_from_csv<R: Read>(
    input: R,
    default_capacity: u32,
) -> Result<Vec<TimeSlot>, ImportError> {
    let mut slots = Vec::new();
    let mut seen = HashSet::new();
    for (index, row) in reader(input).deserialize().enumerate() {
        let record: TimeSlotRecord = row?;
        let line = line_of(index);
        if !seen.insert(record.id) {
            return Err(ImportError::DuplicateId {
                line,
                id: record.id,
            });
        }
        let date = NaiveDate::parse_from_str(&record.date, "%Y-%m-%d").map_err(|_| {
            ImportError::InvalidDate {
                line,
                value: record.date.clone(),
            }
        })?;
        let start = parse_start(&record.start).ok_or_else(|| ImportError::InvalidTime {
            line,
            value: record.start.clone(),
        })?;
        slots.push(TimeSlot::new(
            record.id,
            date,
            record.weekday,
            start,
            record.capacity.unwrap_or(default_capacity),
        ));
    }
    log::info!("Imported {} time slots", slots.len());
    Ok(slots)
}

/// Read entrants with their `;`-separated slot ids.
pub fn entrants_from_csv<R: Read>(input: R) -> Result<Vec<Entrant>, ImportError> {
    let mut entrants = Vec::new();
    let mut seen = HashSet::new();
    for (index, row) in reader(input).deserialize().enumerate() {
        let record: EntrantRecord = row?;
        let line = line_of(index);
        if !seen.insert(record.id) {
            return Err(ImportError::DuplicateId {
                line,
                id: record.id,
            });
        }
        let slots = record
            .slots
            .split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<TimeSlotId>().map_err(|_| ImportError::InvalidSlotId {
                    line,
                    value: s.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        if slots.is_empty() {
            log::warn!("Entrant {} ({}) has no available slots", record.id, record.name);
        }
        entrants.push(Entrant::new(record.id, record.name, record.category, slots));
    }
    log::info!("Imported {} entrants", entrants.len());
    Ok(entrants)
}
