//! Moving winners forward through a bracket, and taking them back.

use crate::models::{
    Bracket, BracketSlotId, EntrantId, MatchId, Round, Side, TournamentError,
};

/// Where a winner was seated.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct AdvanceOutcome {
    /// None when the slot was the final.
    pub target: Option<BracketSlotId>,
    pub seat: Option<Side>,
}

/// What a revert cleared.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RevertOutcome {
    pub target: Option<BracketSlotId>,
    pub seat: Option<Side>,
    /// Match unlinked from the target because its result no longer applies.
    pub detached_match: Option<MatchId>,
}

/// Slots a round is expected to hold.
fn expected_len(bracket: &Bracket, round: Round) -> usize {
    match round {
        Round::Knockout(entrants) => entrants as usize / 2,
        Round::PrePlayoff => bracket.round_len(round),
    }
}

/// Next-round (round, position) fed by `position` of `round`.
///
/// Pre-playoff winners map 1:1 when the pre-playoff round is no larger
/// than the first knockout round, as do rounds of equal size; otherwise
/// two positions feed one (`ceil(position / 2)`).
pub fn target_position(bracket: &Bracket, round: Round, position: u32) -> Option<(Round, u32)> {
    if round.is_final() {
        return None;
    }
    let next = bracket.next_round(round)?;
    let current_len = expected_len(bracket, round);
    let next_len = expected_len(bracket, next);
    let one_to_one = (round == Round::PrePlayoff && current_len <= next_len) || current_len == next_len;
    let target = if one_to_one {
        position
    } else {
        position.div_ceil(2)
    };
    Some((next, target))
}

/// Seat the winner of `slot_id` in the next round.
///
/// The target slot is read or created in one step. A half-filled target
/// takes the winner in its empty seat; a full one (replay after an edit)
/// has the seat chosen by source parity overwritten.
pub fn advance_from(
    bracket: &mut Bracket,
    slot_id: BracketSlotId,
) -> Result<AdvanceOutcome, TournamentError> {
    let slot = bracket
        .slot(slot_id)
        .ok_or(TournamentError::BracketSlotNotFound(slot_id))?;
    let winner = slot.winner.ok_or(TournamentError::NoResultRecorded)?;
    let (round, position) = (slot.round, slot.position);

    let Some((next, next_position)) = target_position(bracket, round, position) else {
        log::info!("Bracket {}: {} won the {}", bracket.category, winner, round);
        return Ok(AdvanceOutcome::default());
    };

    let category = bracket.category.clone();
    let target = bracket.slot_entry(next, next_position);
    if let Some(seat) = seat_of(target.first, target.second, winner) {
        return Ok(AdvanceOutcome {
            target: Some(target.id),
            seat: Some(seat),
        });
    }

    let seat = match (target.first, target.second) {
        (Some(_), None) => Side::Visitor,
        (None, _) => Side::Local,
        (Some(_), Some(_)) if position % 2 == 0 => Side::Visitor,
        (Some(_), Some(_)) => Side::Local,
    };
    match seat {
        Side::Local => target.first = Some(winner),
        Side::Visitor => target.second = Some(winner),
    }
    log::info!(
        "Bracket {}: {} advances from {} #{} to {} #{}",
        category,
        winner,
        round,
        position,
        next,
        next_position
    );
    Ok(AdvanceOutcome {
        target: Some(target.id),
        seat: Some(seat),
    })
}

fn seat_of(first: Option<EntrantId>, second: Option<EntrantId>, entrant: EntrantId) -> Option<Side> {
    if first == Some(entrant) {
        Some(Side::Local)
    } else if second == Some(entrant) {
        Some(Side::Visitor)
    } else {
        None
    }
}

/// Undo the placement of `winner` from `slot_id` into the next round.
///
/// Only the seat holding `winner` is cleared, so a seeded entrant waiting in
/// the same slot stays. If the target had already been decided its winner
/// and linked match are cleared too; placements further on are left alone.
pub fn revert_from(
    bracket: &mut Bracket,
    slot_id: BracketSlotId,
    winner: EntrantId,
) -> Result<RevertOutcome, TournamentError> {
    let slot = bracket
        .slot(slot_id)
        .ok_or(TournamentError::BracketSlotNotFound(slot_id))?;
    let Some((next, next_position)) = target_position(bracket, slot.round, slot.position) else {
        return Ok(RevertOutcome::default());
    };

    let category = bracket.category.clone();
    let index = bracket
        .slots
        .iter()
        .position(|s| s.round == next && s.position == next_position && s.contains(winner))
        .or_else(|| {
            bracket
                .slots
                .iter()
                .position(|s| s.round == next && s.contains(winner))
        });
    let Some(index) = index else {
        log::debug!("Bracket {}: {} not found in {}, nothing to revert", category, winner, next);
        return Ok(RevertOutcome::default());
    };

    let target = &mut bracket.slots[index];
    let seat = if target.first == Some(winner) {
        target.first = None;
        Side::Local
    } else {
        target.second = None;
        Side::Visitor
    };

    let mut detached_match = None;
    if let Some(downstream) = target.winner.take() {
        log::warn!(
            "Bracket {}: {} #{} was already won by {}; later rounds are left as they are",
            category,
            target.round,
            target.position,
            downstream
        );
        detached_match = target.match_id.take();
    }
    log::info!(
        "Bracket {}: {} removed from {} #{}",
        category,
        winner,
        target.round,
        target.position
    );

    Ok(RevertOutcome {
        target: Some(target.id),
        seat: Some(seat),
        detached_match,
    })
}
