//! Round-robin pairing and greedy slot assignment for group matches.

use crate::models::{Entrant, EntrantId, Group, GroupId, Match, MatchId, TimeSlot, TimeSlotId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Why a match was left without a slot.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum WarningKind {
    /// The two entrants share no available slot.
    #[serde(rename = "sin_horario_compatible")]
    NoCommonSlot,
    /// Every common slot falls on a day (or slot) one of them already plays,
    /// or is not part of the run.
    #[serde(rename = "jugadores_ocupados")]
    PlayersBusy,
    /// Every remaining common slot is at court capacity.
    #[serde(rename = "cupo_lleno")]
    CapacityFull,
}

impl WarningKind {
    fn describe(self, local: EntrantId, visitor: EntrantId) -> String {
        match self {
            WarningKind::NoCommonSlot => {
                format!("Entrants {local} and {visitor} have no available slot in common")
            }
            WarningKind::PlayersBusy => format!(
                "Entrants {local} and {visitor} already play on the day of every common slot"
            ),
            WarningKind::CapacityFull => {
                format!("Every common slot of {local} and {visitor} is at court capacity")
            }
        }
    }
}

/// A scheduling conflict, reported instead of failing the run.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SchedulingWarning {
    #[serde(rename = "type")]
    pub kind: WarningKind,
    pub local: EntrantId,
    pub visitor: EntrantId,
    pub group: GroupId,
    pub message: String,
}

/// An unscheduled match with both entrants' known slots, for manual resolution.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct UnscheduledMatch {
    pub match_id: MatchId,
    pub local: EntrantId,
    pub visitor: EntrantId,
    pub local_slots: Vec<TimeSlotId>,
    pub visitor_slots: Vec<TimeSlotId>,
}

/// Output of one scheduling pass.
#[derive(Clone, Debug, Default)]
pub struct Schedule {
    pub matches: Vec<Match>,
    pub warnings: Vec<SchedulingWarning>,
    pub unscheduled: Vec<UnscheduledMatch>,
}

impl Schedule {
    /// The score the group former minimises.
    pub fn unscheduled_count(&self) -> usize {
        self.unscheduled.len()
    }
}

/// Mutable bookkeeping for one scheduling run: court usage per slot and
/// the slots and dates each entrant already plays.
#[derive(Debug)]
pub struct SchedulingContext<'a> {
    slots: HashMap<TimeSlotId, &'a TimeSlot>,
    usage: HashMap<TimeSlotId, u32>,
    used_slots: HashMap<EntrantId, HashSet<TimeSlotId>>,
    used_dates: HashMap<EntrantId, HashMap<NaiveDate, u32>>,
}

impl<'a> SchedulingContext<'a> {
    pub fn new(slots: &'a [TimeSlot]) -> Self {
        Self {
            slots: slots.iter().map(|s| (s.id, s)).collect(),
            usage: HashMap::new(),
            used_slots: HashMap::new(),
            used_dates: HashMap::new(),
        }
    }

    pub fn usage(&self, slot: TimeSlotId) -> u32 {
        self.usage.get(&slot).copied().unwrap_or(0)
    }

    fn plays_on(&self, entrant: EntrantId, date: NaiveDate) -> bool {
        self.used_dates
            .get(&entrant)
            .is_some_and(|dates| dates.contains_key(&date))
    }

    fn plays_in(&self, entrant: EntrantId, slot: TimeSlotId) -> bool {
        self.used_slots
            .get(&entrant)
            .is_some_and(|slots| slots.contains(&slot))
    }

    fn day_load(&self, entrant: EntrantId, date: NaiveDate) -> u32 {
        self.used_dates
            .get(&entrant)
            .and_then(|dates| dates.get(&date))
            .copied()
            .unwrap_or(0)
    }

    /// Slot ids of the entrant that exist in this run, in the entrant's order.
    pub fn known_slots(&self, entrant: &Entrant) -> Vec<TimeSlotId> {
        entrant
            .slots
            .iter()
            .copied()
            .filter(|id| self.slots.contains_key(id))
            .collect()
    }

    /// Pick a slot for `local` vs `visitor` and book it, or say why not.
    pub fn assign(&mut self, local: &Entrant, visitor: &Entrant) -> Result<TimeSlotId, WarningKind> {
        let common: Vec<TimeSlotId> = visitor
            .slots
            .iter()
            .copied()
            .filter(|id| local.is_available(*id))
            .collect();
        if common.is_empty() {
            return Err(WarningKind::NoCommonSlot);
        }

        // Shared ids missing from this run cannot host the match.
        let mut candidates: Vec<(&TimeSlot, u32, u32)> = common
            .iter()
            .filter_map(|id| self.slots.get(id).copied())
            .filter(|slot| {
                !self.plays_on(local.id, slot.date)
                    && !self.plays_on(visitor.id, slot.date)
                    && !self.plays_in(local.id, slot.id)
                    && !self.plays_in(visitor.id, slot.id)
            })
            .map(|slot| {
                let load = self.day_load(local.id, slot.date) + self.day_load(visitor.id, slot.date);
                (slot, self.usage(slot.id), load)
            })
            .collect();
        if candidates.is_empty() {
            return Err(WarningKind::PlayersBusy);
        }

        candidates.sort_by_key(|(_, usage, load)| (*usage, *load));
        let (slot, _, _) = candidates
            .into_iter()
            .find(|(slot, usage, _)| *usage < slot.capacity)
            .ok_or(WarningKind::CapacityFull)?;

        let (id, date) = (slot.id, slot.date);
        *self.usage.entry(id).or_insert(0) += 1;
        for entrant in [local.id, visitor.id] {
            self.used_slots.entry(entrant).or_default().insert(id);
            *self
                .used_dates
                .entry(entrant)
                .or_default()
                .entry(date)
                .or_insert(0) += 1;
        }
        Ok(id)
    }
}

/// Every unordered pair of members, in member order: n(n-1)/2 pairs.
pub fn round_robin_pairs(members: &[EntrantId]) -> Vec<(EntrantId, EntrantId)> {
    let mut pairs = Vec::with_capacity(members.len() * members.len().saturating_sub(1) / 2);
    for (i, &local) in members.iter().enumerate() {
        for &visitor in &members[i + 1..] {
            pairs.push((local, visitor));
        }
    }
    pairs
}

/// Create and schedule every round-robin match of `groups` against `ctx`.
///
/// Conflicts become warnings; the match is still created with no slot.
pub fn schedule_groups(
    ctx: &mut SchedulingContext<'_>,
    groups: &[Group],
    entrants: &HashMap<EntrantId, &Entrant>,
) -> Schedule {
    let mut schedule = Schedule::default();

    for group in groups {
        for (local_id, visitor_id) in round_robin_pairs(&group.members) {
            let (Some(local), Some(visitor)) = (entrants.get(&local_id), entrants.get(&visitor_id))
            else {
                log::error!(
                    "Group {} #{}: no entrant data for {} vs {}, skipping",
                    group.category,
                    group.number,
                    local_id,
                    visitor_id
                );
                continue;
            };

            match ctx.assign(local, visitor) {
                Ok(slot) => {
                    log::debug!("{} vs {} -> slot {}", local_id, visitor_id, slot);
                    schedule
                        .matches
                        .push(Match::new(group.id, local_id, visitor_id, Some(slot)));
                }
                Err(kind) => {
                    let message = kind.describe(local_id, visitor_id);
                    log::warn!("Group {} #{}: {}", group.category, group.number, message);
                    let game = Match::new(group.id, local_id, visitor_id, None);
                    schedule.unscheduled.push(UnscheduledMatch {
                        match_id: game.id,
                        local: local_id,
                        visitor: visitor_id,
                        local_slots: ctx.known_slots(local),
                        visitor_slots: ctx.known_slots(visitor),
                    });
                    schedule.warnings.push(SchedulingWarning {
                        kind,
                        local: local_id,
                        visitor: visitor_id,
                        group: group.id,
                        message,
                    });
                    schedule.matches.push(game);
                }
            }
        }
    }

    schedule
}
