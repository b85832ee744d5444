//! Entrant and TimeSlot: the read-only inputs of a scheduling run.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Identifier of a registered entrant (assigned by the registration store).
pub type EntrantId = u64;

/// Identifier of a bookable time slot (assigned by the registration store).
pub type TimeSlotId = u64;

/// A registered pair in one category, with the slots they can play.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Entrant {
    pub id: EntrantId,
    pub name: String,
    pub category: String,
    /// Available slots, in registration order, without repeats.
    pub slots: Vec<TimeSlotId>,
}

impl Entrant {
    /// Create an entrant. Repeated slot ids are dropped, first occurrence wins.
    pub fn new(
        id: EntrantId,
        name: impl Into<String>,
        category: impl Into<String>,
        slots: impl IntoIterator<Item = TimeSlotId>,
    ) -> Self {
        let mut unique = Vec::new();
        for slot in slots {
            if !unique.contains(&slot) {
                unique.push(slot);
            }
        }
        Self {
            id,
            name: name.into(),
            category: category.into(),
            slots: unique,
        }
    }

    pub fn is_available(&self, slot: TimeSlotId) -> bool {
        self.slots.contains(&slot)
    }
}

/// A date + start time with a number of courts.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub id: TimeSlotId,
    pub date: NaiveDate,
    /// Display label, e.g. "Saturday".
    pub weekday: String,
    pub start: NaiveTime,
    /// Max concurrent matches (courts).
    pub capacity: u32,
}

impl TimeSlot {
    pub fn new(
        id: TimeSlotId,
        date: NaiveDate,
        weekday: impl Into<String>,
        start: NaiveTime,
        capacity: u32,
    ) -> Self {
        Self {
            id,
            date,
            weekday: weekday.into(),
            start,
            capacity,
        }
    }
}
