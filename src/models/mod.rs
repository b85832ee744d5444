//! Data structures for the tennis tournament: entrants, slots, groups, matches, brackets.

mod bracket;
mod entrant;
mod game;
mod group;
mod standing;
mod tournament;

pub use bracket::{Bracket, BracketSlot, BracketSlotId, BracketSummary, Round};
pub use entrant::{Entrant, EntrantId, TimeSlot, TimeSlotId};
pub use game::{
    Match, MatchId, MatchOutcome, MatchResult, PlayoffMatch, ResultSummary, SetScore, Side,
};
pub use group::{Group, GroupId, GroupSizeConfig};
pub use standing::{Standing, QUALIFYING_POSITIONS};
pub use tournament::{Tournament, TournamentError, TournamentId, TournamentState};
