//! Tournament aggregate, TournamentState and TournamentError.

use crate::models::bracket::{Bracket, BracketSlotId};
use crate::models::entrant::{Entrant, EntrantId, TimeSlot, TimeSlotId};
use crate::models::game::{Match, MatchId, PlayoffMatch};
use crate::models::group::{Group, GroupId};
use crate::models::standing::Standing;
use crate::logic::scheduling::{SchedulingWarning, UnscheduledMatch};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum TournamentError {
    /// A category was configured with zero groups.
    #[error("Category {category}: at least one group is required")]
    NoGroupsRequested { category: String },
    /// Groups smaller than two have no matches.
    #[error("Category {category}: group size {size} is not allowed (minimum 2)")]
    InvalidGroupSize { category: String, size: usize },
    /// Requested seats exceed entrants plus the overflow margin.
    #[error("Category {category}: {needed} seats requested but only {available} entrants (margin {margin})")]
    TooManySeats {
        category: String,
        needed: usize,
        available: usize,
        margin: usize,
    },
    /// Fewer than two qualifiers: nothing to play.
    #[error("Category {category}: {found} qualified entrant(s), need at least 2")]
    NotEnoughQualifiers { category: String, found: usize },
    #[error("A bracket already exists for category {0}")]
    BracketExists(String),
    /// Generated bracket repeats or drops a qualified entrant.
    #[error("Bracket integrity violated: duplicates {duplicates:?}, missing {missing:?}")]
    BracketIntegrity {
        duplicates: Vec<EntrantId>,
        missing: Vec<EntrantId>,
    },
    /// Revert/delete/edit on a match or slot that has no result.
    #[error("No result recorded")]
    NoResultRecorded,
    /// A result was submitted before a time was assigned.
    #[error("A time slot must be assigned before recording a result")]
    NoTimeAssigned,
    /// A bracket slot is still waiting for one of its entrants.
    #[error("Both entrants must be known before recording a result")]
    IncompleteMatchup,
    #[error("Invalid score: {0}")]
    InvalidScore(String),
    /// Tournament is not in a state that allows this action.
    #[error("Invalid state for this action")]
    InvalidState,
    #[error("Match not found")]
    MatchNotFound(MatchId),
    #[error("Group not found")]
    GroupNotFound(GroupId),
    #[error("Bracket slot not found")]
    BracketSlotNotFound(BracketSlotId),
    #[error("Time slot {0} not found")]
    TimeSlotNotFound(TimeSlotId),
    #[error("Category {0} not found")]
    CategoryNotFound(String),
}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Current phase of the tournament.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentState {
    /// Loading slots and entrants; no groups yet.
    #[default]
    Setup,
    /// Groups and matches exist; results and brackets can be entered.
    GroupStage,
}

/// Full tournament state: inputs, groups, matches, standings and brackets.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub state: TournamentState,
    /// Group-stage slots (capacity-bounded).
    pub time_slots: Vec<TimeSlot>,
    /// Playoff slots (no capacity bound).
    pub playoff_slots: Vec<TimeSlot>,
    pub entrants: Vec<Entrant>,
    pub groups: Vec<Group>,
    pub matches: Vec<Match>,
    pub warnings: Vec<SchedulingWarning>,
    /// Availability of both players for every match left without a slot.
    pub unscheduled: Vec<UnscheduledMatch>,
    /// Entrants left out of the groups, per category.
    pub unassigned: BTreeMap<String, Vec<EntrantId>>,
    /// Group tables, recomputed on every result change.
    pub standings: BTreeMap<GroupId, Vec<Standing>>,
    pub brackets: BTreeMap<String, Bracket>,
    pub playoff_matches: Vec<PlayoffMatch>,
}

impl Tournament {
    /// Create a new tournament in Setup state with no slots or entrants.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            state: TournamentState::Setup,
            time_slots: Vec::new(),
            playoff_slots: Vec::new(),
            entrants: Vec::new(),
            groups: Vec::new(),
            matches: Vec::new(),
            warnings: Vec::new(),
            unscheduled: Vec::new(),
            unassigned: BTreeMap::new(),
            standings: BTreeMap::new(),
            brackets: BTreeMap::new(),
            playoff_matches: Vec::new(),
        }
    }

    /// Apply `f` to a copy and keep the copy only if `f` succeeds.
    pub fn transaction<T>(
        &mut self,
        f: impl FnOnce(&mut Tournament) -> Result<T, TournamentError>,
    ) -> Result<T, TournamentError> {
        let mut draft = self.clone();
        let value = f(&mut draft)?;
        *self = draft;
        Ok(value)
    }

    /// Replace the group-stage slots (only valid in Setup).
    pub fn set_time_slots(&mut self, slots: Vec<TimeSlot>) -> Result<(), TournamentError> {
        if self.state != TournamentState::Setup {
            return Err(TournamentError::InvalidState);
        }
        self.time_slots = slots;
        Ok(())
    }

    /// Replace the entrant list (only valid in Setup).
    pub fn set_entrants(&mut self, entrants: Vec<Entrant>) -> Result<(), TournamentError> {
        if self.state != TournamentState::Setup {
            return Err(TournamentError::InvalidState);
        }
        self.entrants = entrants;
        Ok(())
    }

    /// Add a playoff slot; valid in any state.
    pub fn add_playoff_slot(&mut self, slot: TimeSlot) {
        self.playoff_slots.retain(|s| s.id != slot.id);
        self.playoff_slots.push(slot);
    }

    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self.entrants.iter().map(|e| e.category.clone()).collect();
        categories.sort();
        categories.dedup();
        categories
    }

    pub fn entrant(&self, id: EntrantId) -> Option<&Entrant> {
        self.entrants.iter().find(|e| e.id == id)
    }

    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == id)
    }

    pub fn get_match_mut(&mut self, id: MatchId) -> Option<&mut Match> {
        self.matches.iter_mut().find(|m| m.id == id)
    }

    pub fn group_matches(&self, group: GroupId) -> Vec<&Match> {
        self.matches.iter().filter(|m| m.group == group).collect()
    }

    /// Find the bracket holding a slot, by slot id.
    pub fn bracket_of_slot(&self, slot: BracketSlotId) -> Option<&Bracket> {
        self.brackets.values().find(|b| b.slot(slot).is_some())
    }

    pub fn bracket_of_slot_mut(&mut self, slot: BracketSlotId) -> Option<&mut Bracket> {
        self.brackets.values_mut().find(|b| b.slot(slot).is_some())
    }

    pub fn playoff_match_mut(&mut self, id: MatchId) -> Option<&mut PlayoffMatch> {
        self.playoff_matches.iter_mut().find(|m| m.id == id)
    }
}
