//! Phase changes: start and reset the group stage, and build brackets.

use crate::config::EngineConfig;
use crate::logic::bracket_builder::build_bracket;
use crate::logic::group_forming::form_groups;
use crate::logic::standings::compute_standings;
use crate::models::{
    Bracket, GroupSizeConfig, Standing, Tournament, TournamentError, TournamentState,
};
use std::collections::BTreeMap;

/// Form groups and schedule matches from the loaded slots and entrants;
/// moves Setup to GroupStage.
pub fn start_group_stage(
    tournament: &mut Tournament,
    configs: &BTreeMap<String, GroupSizeConfig>,
    engine: &EngineConfig,
) -> Result<(), TournamentError> {
    if tournament.state != TournamentState::Setup {
        return Err(TournamentError::InvalidState);
    }
    let formation = form_groups(
        &tournament.entrants,
        &tournament.time_slots,
        configs,
        engine,
    )?;

    tournament.standings = formation
        .groups
        .iter()
        .map(|g| (g.id, compute_standings(g, &[])))
        .collect();
    tournament.groups = formation.groups;
    tournament.matches = formation.matches;
    tournament.warnings = formation.warnings;
    tournament.unscheduled = formation.unscheduled;
    tournament.unassigned = formation.unassigned;
    tournament.state = TournamentState::GroupStage;
    Ok(())
}

/// Discard groups and matches and go back to Setup. Not allowed once a
/// bracket exists.
pub fn reset_group_stage(tournament: &mut Tournament) -> Result<(), TournamentError> {
    if tournament.state != TournamentState::GroupStage {
        return Err(TournamentError::InvalidState);
    }
    if let Some(category) = tournament.brackets.keys().next() {
        return Err(TournamentError::BracketExists(category.clone()));
    }
    tournament.groups.clear();
    tournament.matches.clear();
    tournament.warnings.clear();
    tournament.unscheduled.clear();
    tournament.unassigned.clear();
    tournament.standings.clear();
    tournament.playoff_matches.clear();
    tournament.state = TournamentState::Setup;
    log::info!("Tournament {}: group stage reset", tournament.id);
    Ok(())
}

/// Qualified rows of a category, by group number then position.
pub fn qualified_standings(tournament: &Tournament, category: &str) -> Vec<Standing> {
    let mut groups: Vec<_> = tournament
        .groups
        .iter()
        .filter(|g| g.category == category)
        .collect();
    groups.sort_by_key(|g| g.number);
    groups
        .iter()
        .filter_map(|g| tournament.standings.get(&g.id))
        .flat_map(|table| table.iter().filter(|s| s.qualified).cloned())
        .collect()
}

/// Build and store the bracket of `category` from its group standings.
pub fn generate_bracket(
    tournament: &mut Tournament,
    category: &str,
) -> Result<Bracket, TournamentError> {
    if tournament.state != TournamentState::GroupStage {
        return Err(TournamentError::InvalidState);
    }
    if !tournament.groups.iter().any(|g| g.category == category) {
        return Err(TournamentError::CategoryNotFound(category.to_string()));
    }
    if tournament.brackets.contains_key(category) {
        return Err(TournamentError::BracketExists(category.to_string()));
    }

    let pending = tournament
        .matches
        .iter()
        .filter(|m| m.result.is_none())
        .filter(|m| {
            tournament
                .group(m.group)
                .is_some_and(|g| g.category == category)
        })
        .count();
    if pending > 0 {
        log::warn!(
            "Category {}: building bracket with {} group matches unplayed",
            category,
            pending
        );
    }

    let bracket = build_bracket(category, &qualified_standings(tournament, category))?;
    tournament
        .brackets
        .insert(category.to_string(), bracket.clone());
    Ok(bracket)
}
