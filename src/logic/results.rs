//! Result entry, edit and deletion for group and playoff matches, plus the
//! manual time assignments that precede them.

use crate::logic::bracket_advance::{advance_from, revert_from, AdvanceOutcome, RevertOutcome};
use crate::logic::scheduling::UnscheduledMatch;
use crate::logic::standings::compute_standings;
use crate::models::{
    BracketSlotId, EntrantId, GroupId, MatchId, MatchOutcome, MatchResult, PlayoffMatch, Side,
    Standing, TimeSlotId, Tournament, TournamentError, TournamentState,
};

fn require_group_stage(tournament: &Tournament) -> Result<(), TournamentError> {
    if tournament.state != TournamentState::GroupStage {
        return Err(TournamentError::InvalidState);
    }
    Ok(())
}

/// Recompute and store the table of one group.
pub fn refresh_standings(
    tournament: &mut Tournament,
    group_id: GroupId,
) -> Result<Vec<Standing>, TournamentError> {
    let group = tournament
        .group(group_id)
        .ok_or(TournamentError::GroupNotFound(group_id))?;
    let table = compute_standings(group, &tournament.group_matches(group_id));
    tournament.standings.insert(group_id, table.clone());
    Ok(table)
}

/// Group of a match, after checking the match exists.
fn match_group(tournament: &Tournament, match_id: MatchId) -> Result<GroupId, TournamentError> {
    tournament
        .matches
        .iter()
        .find(|m| m.id == match_id)
        .map(|m| m.group)
        .ok_or(TournamentError::MatchNotFound(match_id))
}

/// Enter the first result of a group match. The match needs a time slot.
pub fn record_group_result(
    tournament: &mut Tournament,
    match_id: MatchId,
    outcome: MatchOutcome,
) -> Result<(), TournamentError> {
    require_group_stage(tournament)?;
    let game = tournament
        .get_match_mut(match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?;
    if game.slot.is_none() {
        return Err(TournamentError::NoTimeAssigned);
    }
    if game.result.is_some() {
        return Err(TournamentError::InvalidState);
    }
    game.result = Some(MatchResult::from_outcome(outcome)?);
    let group = game.group;
    refresh_standings(tournament, group)?;
    Ok(())
}

/// Replace the result of a group match.
pub fn edit_group_result(
    tournament: &mut Tournament,
    match_id: MatchId,
    outcome: MatchOutcome,
) -> Result<(), TournamentError> {
    require_group_stage(tournament)?;
    let game = tournament
        .get_match_mut(match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?;
    if game.result.is_none() {
        return Err(TournamentError::NoResultRecorded);
    }
    game.result = Some(MatchResult::from_outcome(outcome)?);
    let group = game.group;
    refresh_standings(tournament, group)?;
    Ok(())
}

/// Delete the result of a group match.
pub fn clear_group_result(
    tournament: &mut Tournament,
    match_id: MatchId,
) -> Result<(), TournamentError> {
    require_group_stage(tournament)?;
    let game = tournament
        .get_match_mut(match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?;
    if game.result.take().is_none() {
        return Err(TournamentError::NoResultRecorded);
    }
    let group = game.group;
    refresh_standings(tournament, group)?;
    Ok(())
}

/// Move a group match to another slot, or unschedule it with `None`.
///
/// Manual moves do not check court capacity. A played match cannot be
/// unscheduled.
pub fn reassign_match_slot(
    tournament: &mut Tournament,
    match_id: MatchId,
    slot: Option<TimeSlotId>,
) -> Result<(), TournamentError> {
    require_group_stage(tournament)?;
    if let Some(id) = slot {
        if !tournament.time_slots.iter().any(|s| s.id == id) {
            return Err(TournamentError::TimeSlotNotFound(id));
        }
    }
    let group = match_group(tournament, match_id)?;
    let game = tournament
        .get_match_mut(match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?;
    if slot.is_none() && game.result.is_some() {
        return Err(TournamentError::InvalidState);
    }
    game.slot = slot;
    let (local, visitor) = (game.local, game.visitor);

    match slot {
        Some(id) => {
            log::info!("Match {} moved to slot {}", match_id, id);
            tournament.unscheduled.retain(|u| u.match_id != match_id);
            tournament.warnings.retain(|w| {
                !(w.group == group && w.local == local && w.visitor == visitor)
            });
        }
        None => {
            log::info!("Match {} unscheduled", match_id);
            if !tournament.unscheduled.iter().any(|u| u.match_id == match_id) {
                let known = |entrant: EntrantId| -> Vec<TimeSlotId> {
                    tournament
                        .entrant(entrant)
                        .map(|e| {
                            e.slots
                                .iter()
                                .copied()
                                .filter(|id| tournament.time_slots.iter().any(|s| s.id == *id))
                                .collect()
                        })
                        .unwrap_or_default()
                };
                let entry = UnscheduledMatch {
                    match_id,
                    local,
                    visitor,
                    local_slots: known(local),
                    visitor_slots: known(visitor),
                };
                tournament.unscheduled.push(entry);
            }
        }
    }
    Ok(())
}

/// Give a bracket slot a playoff time. The first call creates and links its
/// match; later calls move it. Playoff slots have no court limit.
pub fn assign_playoff_time(
    tournament: &mut Tournament,
    slot_id: BracketSlotId,
    time_slot: TimeSlotId,
) -> Result<MatchId, TournamentError> {
    if !tournament.playoff_slots.iter().any(|s| s.id == time_slot) {
        return Err(TournamentError::TimeSlotNotFound(time_slot));
    }
    let linked = tournament
        .bracket_of_slot(slot_id)
        .and_then(|b| b.slot(slot_id))
        .ok_or(TournamentError::BracketSlotNotFound(slot_id))?
        .match_id;

    if let Some(match_id) = linked {
        if let Some(game) = tournament.playoff_match_mut(match_id) {
            game.slot = Some(time_slot);
            log::info!("Playoff match {} moved to slot {}", match_id, time_slot);
            return Ok(match_id);
        }
        log::warn!("Bracket slot {} linked to missing match {}, relinking", slot_id, match_id);
    }

    let game = PlayoffMatch::new(slot_id, time_slot);
    let match_id = game.id;
    tournament.playoff_matches.push(game);
    tournament
        .bracket_of_slot_mut(slot_id)
        .and_then(|b| b.slot_mut(slot_id))
        .ok_or(TournamentError::BracketSlotNotFound(slot_id))?
        .match_id = Some(match_id);
    log::info!("Playoff match {} created at slot {}", match_id, time_slot);
    Ok(match_id)
}

/// Everything a playoff result needs, read before anything is changed.
struct PlayoffContext {
    match_id: MatchId,
    first: EntrantId,
    second: EntrantId,
    winner: Option<EntrantId>,
    has_result: bool,
}

fn playoff_context(
    tournament: &Tournament,
    slot_id: BracketSlotId,
) -> Result<PlayoffContext, TournamentError> {
    let slot = tournament
        .bracket_of_slot(slot_id)
        .and_then(|b| b.slot(slot_id))
        .ok_or(TournamentError::BracketSlotNotFound(slot_id))?;
    let match_id = slot.match_id.ok_or(TournamentError::NoTimeAssigned)?;
    let game = tournament
        .playoff_matches
        .iter()
        .find(|m| m.id == match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?;
    if game.slot.is_none() {
        return Err(TournamentError::NoTimeAssigned);
    }
    let (Some(first), Some(second)) = (slot.first, slot.second) else {
        return Err(TournamentError::IncompleteMatchup);
    };
    Ok(PlayoffContext {
        match_id,
        first,
        second,
        winner: slot.winner,
        has_result: game.result.is_some(),
    })
}

impl PlayoffContext {
    fn winner_of(&self, result: &MatchResult) -> EntrantId {
        match result.summary.winner {
            Side::Local => self.first,
            Side::Visitor => self.second,
        }
    }
}

fn set_slot_winner(
    tournament: &mut Tournament,
    slot_id: BracketSlotId,
    winner: Option<EntrantId>,
) -> Result<(), TournamentError> {
    tournament
        .bracket_of_slot_mut(slot_id)
        .and_then(|b| b.slot_mut(slot_id))
        .ok_or(TournamentError::BracketSlotNotFound(slot_id))?
        .winner = winner;
    Ok(())
}

fn set_playoff_result(
    tournament: &mut Tournament,
    match_id: MatchId,
    result: Option<MatchResult>,
) -> Result<(), TournamentError> {
    tournament
        .playoff_match_mut(match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?
        .result = result;
    Ok(())
}

fn advance(
    tournament: &mut Tournament,
    slot_id: BracketSlotId,
) -> Result<AdvanceOutcome, TournamentError> {
    let bracket = tournament
        .bracket_of_slot_mut(slot_id)
        .ok_or(TournamentError::BracketSlotNotFound(slot_id))?;
    advance_from(bracket, slot_id)
}

/// Revert `winner` out of the next round and drop a match that no longer applies.
fn revert(
    tournament: &mut Tournament,
    slot_id: BracketSlotId,
    winner: EntrantId,
) -> Result<RevertOutcome, TournamentError> {
    let bracket = tournament
        .bracket_of_slot_mut(slot_id)
        .ok_or(TournamentError::BracketSlotNotFound(slot_id))?;
    let outcome = revert_from(bracket, slot_id, winner)?;
    if let Some(detached) = outcome.detached_match {
        tournament.playoff_matches.retain(|m| m.id != detached);
    }
    Ok(outcome)
}

/// Enter the result of a bracket match and advance its winner.
pub fn record_playoff_result(
    tournament: &mut Tournament,
    slot_id: BracketSlotId,
    outcome: MatchOutcome,
) -> Result<AdvanceOutcome, TournamentError> {
    let ctx = playoff_context(tournament, slot_id)?;
    if ctx.has_result || ctx.winner.is_some() {
        return Err(TournamentError::InvalidState);
    }
    let result = MatchResult::from_outcome(outcome)?;
    let winner = ctx.winner_of(&result);
    set_playoff_result(tournament, ctx.match_id, Some(result))?;
    set_slot_winner(tournament, slot_id, Some(winner))?;
    advance(tournament, slot_id)
}

/// Replace the result of a bracket match. When the winner changes the old
/// one is reverted before the new one advances.
pub fn edit_playoff_result(
    tournament: &mut Tournament,
    slot_id: BracketSlotId,
    outcome: MatchOutcome,
) -> Result<AdvanceOutcome, TournamentError> {
    let ctx = playoff_context(tournament, slot_id)?;
    if !ctx.has_result {
        return Err(TournamentError::NoResultRecorded);
    }
    let result = MatchResult::from_outcome(outcome)?;
    let winner = ctx.winner_of(&result);
    set_playoff_result(tournament, ctx.match_id, Some(result))?;

    match ctx.winner {
        Some(previous) if previous != winner => {
            revert(tournament, slot_id, previous)?;
        }
        _ => {}
    }
    set_slot_winner(tournament, slot_id, Some(winner))?;
    advance(tournament, slot_id)
}

/// Delete the result of a bracket match and take its winner back.
pub fn clear_playoff_result(
    tournament: &mut Tournament,
    slot_id: BracketSlotId,
) -> Result<RevertOutcome, TournamentError> {
    let ctx = playoff_context(tournament, slot_id)?;
    if !ctx.has_result {
        return Err(TournamentError::NoResultRecorded);
    }
    let outcome = match ctx.winner {
        Some(previous) => revert(tournament, slot_id, previous)?,
        None => RevertOutcome::default(),
    };
    set_playoff_result(tournament, ctx.match_id, None)?;
    set_slot_winner(tournament, slot_id, None)?;
    Ok(outcome)
}
