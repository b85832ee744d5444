//! Elimination bracket: rounds, slots and the per-category bracket.

use crate::models::entrant::EntrantId;
use crate::models::game::{MatchId, Side};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a bracket slot.
pub type BracketSlotId = Uuid;

/// A bracket round. `Knockout(n)` is the round played by `n` entrants,
/// so `Knockout(2)` is the final.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Round {
    PrePlayoff,
    Knockout(u32),
}

impl Round {
    pub const FINAL: Round = Round::Knockout(2);

    pub fn is_final(&self) -> bool {
        *self == Self::FINAL
    }

    /// Knockout rounds for a bracket of `entrants` (a power of two), first to last.
    pub fn knockout_sequence(entrants: u32) -> Vec<Round> {
        let mut rounds = Vec::new();
        let mut n = entrants;
        while n >= 2 {
            rounds.push(Round::Knockout(n));
            n /= 2;
        }
        rounds
    }
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Round::PrePlayoff => write!(f, "pre-playoff"),
            Round::Knockout(2) => write!(f, "final"),
            Round::Knockout(4) => write!(f, "semifinal"),
            Round::Knockout(8) => write!(f, "quarterfinal"),
            Round::Knockout(n) => write!(f, "round-of-{}", n),
        }
    }
}

impl FromStr for Round {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pre-playoff" => Ok(Round::PrePlayoff),
            "final" => Ok(Round::Knockout(2)),
            "semifinal" => Ok(Round::Knockout(4)),
            "quarterfinal" => Ok(Round::Knockout(8)),
            other => other
                .strip_prefix("round-of-")
                .and_then(|n| n.parse::<u32>().ok())
                .filter(|n| n.is_power_of_two() && *n >= 16)
                .map(Round::Knockout)
                .ok_or_else(|| format!("unknown round: {other}")),
        }
    }
}

impl TryFrom<String> for Round {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Round> for String {
    fn from(round: Round) -> Self {
        round.to_string()
    }
}

/// One matchup position in a round.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BracketSlot {
    pub id: BracketSlotId,
    pub category: String,
    pub round: Round,
    /// 1-based position within the round.
    pub position: u32,
    pub first: Option<EntrantId>,
    pub second: Option<EntrantId>,
    /// Seeded entrant waiting for a pre-playoff winner.
    pub is_bye: bool,
    pub winner: Option<EntrantId>,
    /// Set once a time has been assigned.
    pub match_id: Option<MatchId>,
}

impl BracketSlot {
    pub fn new(category: impl Into<String>, round: Round, position: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            category: category.into(),
            round,
            position,
            first: None,
            second: None,
            is_bye: false,
            winner: None,
            match_id: None,
        }
    }

    pub fn occupants(&self) -> impl Iterator<Item = EntrantId> {
        self.first.into_iter().chain(self.second)
    }

    pub fn contains(&self, entrant: EntrantId) -> bool {
        self.first == Some(entrant) || self.second == Some(entrant)
    }

    pub fn is_full(&self) -> bool {
        self.first.is_some() && self.second.is_some()
    }

    /// First occupant plays as local, second as visitor.
    pub fn entrant(&self, side: Side) -> Option<EntrantId> {
        match side {
            Side::Local => self.first,
            Side::Visitor => self.second,
        }
    }
}

/// Structure numbers computed from the qualifier count.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct BracketSummary {
    /// Largest power of two not above the qualifier count.
    pub pow2: usize,
    /// Entrants the pre-playoff round removes.
    pub to_eliminate: usize,
    /// Entrants playing the pre-playoff round.
    pub to_pre_play: usize,
    /// Entrants skipping the pre-playoff round.
    pub with_bye: usize,
}

impl BracketSummary {
    pub fn for_qualifiers(total: usize) -> Self {
        let pow2 = if total == 0 {
            0
        } else {
            1 << total.ilog2()
        };
        let to_eliminate = total - pow2;
        let to_pre_play = to_eliminate * 2;
        Self {
            pow2,
            to_eliminate,
            to_pre_play,
            with_bye: total - to_pre_play,
        }
    }
}

/// The elimination bracket of one category.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Bracket {
    pub category: String,
    pub summary: BracketSummary,
    /// Rounds in play order, pre-playoff first when present.
    pub rounds: Vec<Round>,
    /// Entrants seated straight into the first knockout round while others pre-play.
    pub bye_entrants: Vec<EntrantId>,
    pub slots: Vec<BracketSlot>,
}

impl Bracket {
    pub fn slot(&self, id: BracketSlotId) -> Option<&BracketSlot> {
        self.slots.iter().find(|s| s.id == id)
    }

    pub fn slot_mut(&mut self, id: BracketSlotId) -> Option<&mut BracketSlot> {
        self.slots.iter_mut().find(|s| s.id == id)
    }

    pub fn find(&self, round: Round, position: u32) -> Option<&BracketSlot> {
        self.slots
            .iter()
            .find(|s| s.round == round && s.position == position)
    }

    /// Slots of one round ordered by position.
    pub fn round(&self, round: Round) -> Vec<&BracketSlot> {
        let mut slots: Vec<_> = self.slots.iter().filter(|s| s.round == round).collect();
        slots.sort_by_key(|s| s.position);
        slots
    }

    pub fn round_len(&self, round: Round) -> usize {
        self.slots.iter().filter(|s| s.round == round).count()
    }

    pub fn next_round(&self, round: Round) -> Option<Round> {
        let index = self.rounds.iter().position(|r| *r == round)?;
        self.rounds.get(index + 1).copied()
    }

    /// First knockout round (the one pre-playoff winners feed).
    pub fn first_round(&self) -> Option<Round> {
        self.rounds
            .iter()
            .copied()
            .find(|r| matches!(r, Round::Knockout(_)))
    }

    /// Read-or-create the slot at (round, position). Taking `&mut self`
    /// makes the lookup and the insert one exclusive step.
    pub fn slot_entry(&mut self, round: Round, position: u32) -> &mut BracketSlot {
        let index = match self
            .slots
            .iter()
            .position(|s| s.round == round && s.position == position)
        {
            Some(index) => index,
            None => {
                log::warn!(
                    "Bracket {}: no slot at {} #{}, creating it",
                    self.category,
                    round,
                    position
                );
                self.slots
                    .push(BracketSlot::new(self.category.clone(), round, position));
                self.slots.len() - 1
            }
        };
        &mut self.slots[index]
    }
}
