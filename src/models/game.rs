//! Matches and their results: set scores, walkovers, super tie-breaks.

use crate::models::bracket::BracketSlotId;
use crate::models::entrant::{EntrantId, TimeSlotId};
use crate::models::group::GroupId;
use crate::models::tournament::TournamentError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Games awarded per set when a walkover is entered without sets.
const WALKOVER_SET_GAMES: u32 = 6;

/// Which side of a match (the local entrant is listed first).
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    #[default]
    Local,
    Visitor,
}

impl Side {
    pub fn other(self) -> Self {
        match self {
            Side::Local => Side::Visitor,
            Side::Visitor => Side::Local,
        }
    }
}

/// Games won by each side in one set (or points in a super tie-break).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SetScore {
    pub games_local: u32,
    pub games_visitor: u32,
}

impl SetScore {
    pub fn new(games_local: u32, games_visitor: u32) -> Self {
        Self {
            games_local,
            games_visitor,
        }
    }

    fn winner(&self) -> Result<Side, TournamentError> {
        match self.games_local.cmp(&self.games_visitor) {
            std::cmp::Ordering::Greater => Ok(Side::Local),
            std::cmp::Ordering::Less => Ok(Side::Visitor),
            std::cmp::Ordering::Equal => Err(TournamentError::InvalidScore(format!(
                "set {}-{} has no winner",
                self.games_local, self.games_visitor
            ))),
        }
    }
}

/// A submitted result, as entered by the operator.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchOutcome {
    /// Played match. The super tie-break only counts when sets are 1-1.
    Normal {
        sets: Vec<SetScore>,
        #[serde(default)]
        super_tiebreak: Option<SetScore>,
    },
    /// Awarded without play. Without sets it is recorded as 6-0 6-0.
    Walkover {
        winner: Side,
        #[serde(default)]
        sets: Vec<SetScore>,
    },
}

/// A result reduced to the numbers standings and brackets need.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ResultSummary {
    pub sets_local: u32,
    pub sets_visitor: u32,
    pub games_local: u32,
    pub games_visitor: u32,
    pub winner: Side,
    pub walkover: bool,
}

impl ResultSummary {
    fn add_set(&mut self, set: &SetScore) -> Result<(), TournamentError> {
        match set.winner()? {
            Side::Local => self.sets_local += 1,
            Side::Visitor => self.sets_visitor += 1,
        }
        self.games_local += set.games_local;
        self.games_visitor += set.games_visitor;
        Ok(())
    }

    /// (sets won, sets lost, games won, games lost) from one side's view.
    pub fn for_side(&self, side: Side) -> (u32, u32, u32, u32) {
        match side {
            Side::Local => (
                self.sets_local,
                self.sets_visitor,
                self.games_local,
                self.games_visitor,
            ),
            Side::Visitor => (
                self.sets_visitor,
                self.sets_local,
                self.games_visitor,
                self.games_local,
            ),
        }
    }
}

impl MatchOutcome {
    /// Reduce the entered scores to sets, games and a winner.
    pub fn summarize(&self) -> Result<ResultSummary, TournamentError> {
        match self {
            MatchOutcome::Normal {
                sets,
                super_tiebreak,
            } => {
                if sets.is_empty() {
                    return Err(TournamentError::InvalidScore(
                        "a played match needs at least one set".to_string(),
                    ));
                }
                let mut summary = ResultSummary::default();
                for set in sets {
                    summary.add_set(set)?;
                }
                if summary.sets_local == summary.sets_visitor {
                    match super_tiebreak {
                        Some(tiebreak) if summary.sets_local == 1 => summary.add_set(tiebreak)?,
                        _ => {
                            return Err(TournamentError::InvalidScore(format!(
                                "sets level at {}-{} without a super tie-break",
                                summary.sets_local, summary.sets_visitor
                            )))
                        }
                    }
                }
                summary.winner = if summary.sets_local > summary.sets_visitor {
                    Side::Local
                } else {
                    Side::Visitor
                };
                Ok(summary)
            }
            MatchOutcome::Walkover { winner, sets } => {
                let mut summary = ResultSummary {
                    winner: *winner,
                    walkover: true,
                    ..ResultSummary::default()
                };
                if sets.is_empty() {
                    let set = match winner {
                        Side::Local => SetScore::new(WALKOVER_SET_GAMES, 0),
                        Side::Visitor => SetScore::new(0, WALKOVER_SET_GAMES),
                    };
                    summary.add_set(&set)?;
                    summary.add_set(&set)?;
                } else {
                    for set in sets {
                        summary.add_set(set)?;
                    }
                }
                Ok(summary)
            }
        }
    }
}

/// A stored result: what was entered plus its reduction.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub outcome: MatchOutcome,
    pub summary: ResultSummary,
}

impl MatchResult {
    pub fn from_outcome(outcome: MatchOutcome) -> Result<Self, TournamentError> {
        let summary = outcome.summarize()?;
        Ok(Self { outcome, summary })
    }
}

/// A round-robin match inside a group.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub group: GroupId,
    pub local: EntrantId,
    pub visitor: EntrantId,
    /// None while unscheduled.
    pub slot: Option<TimeSlotId>,
    /// None if not yet played.
    pub result: Option<MatchResult>,
}

impl Match {
    pub fn new(group: GroupId, local: EntrantId, visitor: EntrantId, slot: Option<TimeSlotId>) -> Self {
        Self {
            id: Uuid::new_v4(),
            group,
            local,
            visitor,
            slot,
            result: None,
        }
    }

    pub fn involves(&self, entrant: EntrantId) -> bool {
        self.local == entrant || self.visitor == entrant
    }

    pub fn entrant(&self, side: Side) -> EntrantId {
        match side {
            Side::Local => self.local,
            Side::Visitor => self.visitor,
        }
    }

    pub fn winner(&self) -> Option<EntrantId> {
        self.result.as_ref().map(|r| self.entrant(r.summary.winner))
    }
}

/// The playable match behind a bracket slot, created when a time is assigned.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayoffMatch {
    pub id: MatchId,
    pub bracket_slot: BracketSlotId,
    pub slot: Option<TimeSlotId>,
    pub result: Option<MatchResult>,
}

impl PlayoffMatch {
    pub fn new(bracket_slot: BracketSlotId, slot: TimeSlotId) -> Self {
        Self {
            id: Uuid::new_v4(),
            bracket_slot,
            slot: Some(slot),
            result: None,
        }
    }
}
