//! Group formation: partition each category by schedule affinity, schedule
//! the round robin, and keep the best of several seeded attempts.

use crate::config::EngineConfig;
use crate::logic::compatibility::group_affinity;
use crate::logic::scheduling::{
    schedule_groups, SchedulingContext, SchedulingWarning, UnscheduledMatch,
};
use crate::logic::shuffle::shuffled;
use crate::models::{
    Entrant, EntrantId, Group, GroupSizeConfig, Match, TimeSlot, TournamentError,
};
use std::collections::{BTreeMap, HashMap};

/// Smallest group that still has a match to play.
const MIN_GROUP_SIZE: usize = 2;

/// Groups and leftovers of one category.
#[derive(Clone, Debug, Default)]
pub struct CategoryGrouping {
    pub groups: Vec<Group>,
    pub unassigned: Vec<EntrantId>,
}

/// The chosen attempt of a formation run, across all configured categories.
#[derive(Clone, Debug, Default)]
pub struct GroupFormation {
    pub groups: Vec<Group>,
    pub matches: Vec<Match>,
    pub warnings: Vec<SchedulingWarning>,
    pub unscheduled: Vec<UnscheduledMatch>,
    pub unassigned: BTreeMap<String, Vec<EntrantId>>,
    /// 0-based index of the winning attempt.
    pub attempt: usize,
}

/// Reject configurations that cannot be formed before anything runs.
pub fn validate_config(
    category: &str,
    config: &GroupSizeConfig,
    available: usize,
    margin: usize,
) -> Result<(), TournamentError> {
    if config.group_count() == 0 {
        return Err(TournamentError::NoGroupsRequested {
            category: category.to_string(),
        });
    }
    if let Some(size) = config.sizes().find(|s| *s < MIN_GROUP_SIZE) {
        return Err(TournamentError::InvalidGroupSize {
            category: category.to_string(),
            size,
        });
    }
    let needed = config.seats();
    if needed > available + margin {
        return Err(TournamentError::TooManySeats {
            category: category.to_string(),
            needed,
            available,
            margin,
        });
    }
    Ok(())
}

/// Split one category's entrants (already in attempt order) into groups.
///
/// When there are more entrants than seats, the least available ones are
/// left unassigned. Groups are seeded with the first remaining entrant and
/// grown with the highest-affinity candidate, larger groups first. Entrants
/// left over once every group is formed join the last group.
pub fn partition_category(
    category: &str,
    entrants: &[&Entrant],
    config: &GroupSizeConfig,
) -> CategoryGrouping {
    let needed = config.seats();
    let mut pool: Vec<&Entrant> = entrants.to_vec();
    let mut unassigned = Vec::new();

    if needed <= pool.len() {
        pool.sort_by(|a, b| b.slots.len().cmp(&a.slots.len()));
        unassigned = pool.split_off(needed).iter().map(|e| e.id).collect();
    }

    let mut groups: Vec<Group> = Vec::new();
    for size in config.target_sizes() {
        if pool.is_empty() {
            break;
        }
        let mut members = vec![pool.remove(0)];
        while members.len() < size && !pool.is_empty() {
            let mut best = 0;
            let mut best_score = group_affinity(pool[0], &members);
            for (index, candidate) in pool.iter().enumerate().skip(1) {
                let score = group_affinity(candidate, &members);
                if score > best_score {
                    best = index;
                    best_score = score;
                }
            }
            members.push(pool.remove(best));
        }
        let number = groups.len() as u32 + 1;
        groups.push(Group::new(
            category,
            number,
            size,
            members.iter().map(|e| e.id).collect(),
        ));
    }

    if !pool.is_empty() {
        let leftovers = pool.iter().map(|e| e.id);
        match groups.last_mut() {
            Some(last) => last.absorb(leftovers),
            None => unassigned.extend(leftovers),
        }
    }

    CategoryGrouping { groups, unassigned }
}

/// Partition every configured category from one ordering and schedule it.
fn run_attempt(
    ordered: &[Entrant],
    slots: &[TimeSlot],
    configs: &BTreeMap<String, GroupSizeConfig>,
    attempt: usize,
) -> GroupFormation {
    let mut formation = GroupFormation {
        attempt,
        ..GroupFormation::default()
    };

    for (category, config) in configs {
        let members: Vec<&Entrant> = ordered.iter().filter(|e| &e.category == category).collect();
        if members.is_empty() {
            continue;
        }
        let grouping = partition_category(category, &members, config);
        formation.groups.extend(grouping.groups);
        formation
            .unassigned
            .insert(category.clone(), grouping.unassigned);
    }

    let by_id: HashMap<EntrantId, &Entrant> = ordered.iter().map(|e| (e.id, e)).collect();
    let mut ctx = SchedulingContext::new(slots);
    let schedule = schedule_groups(&mut ctx, &formation.groups, &by_id);
    formation.matches = schedule.matches;
    formation.warnings = schedule.warnings;
    formation.unscheduled = schedule.unscheduled;
    formation
}

/// Form groups for every configured category and schedule their matches.
///
/// Runs `engine.attempts` seeded reorderings (seed = attempt + 1) and keeps
/// the first one with the fewest unscheduled matches, stopping at zero.
pub fn form_groups(
    entrants: &[Entrant],
    slots: &[TimeSlot],
    configs: &BTreeMap<String, GroupSizeConfig>,
    engine: &EngineConfig,
) -> Result<GroupFormation, TournamentError> {
    if configs.is_empty() {
        return Err(TournamentError::NoGroupsRequested {
            category: "all".to_string(),
        });
    }
    for (category, config) in configs {
        let available = entrants.iter().filter(|e| &e.category == category).count();
        if available == 0 {
            log::warn!("Category {}: configured but has no entrants, skipping", category);
            continue;
        }
        validate_config(category, config, available, engine.overflow_margin)?;
    }
    for entrant in entrants.iter().filter(|e| !configs.contains_key(&e.category)) {
        log::warn!(
            "Entrant {} in unconfigured category {} left out",
            entrant.id,
            entrant.category
        );
    }

    log::info!(
        "Forming groups for {} categories, {} entrants, {} slots",
        configs.len(),
        entrants.len(),
        slots.len()
    );

    let mut best: Option<GroupFormation> = None;
    for attempt in 0..engine.attempts.max(1) {
        let ordered = shuffled(entrants, attempt as u64 + 1);
        let candidate = run_attempt(&ordered, slots, configs, attempt);
        let score = candidate.unscheduled.len();
        log::debug!(
            "Attempt {}: {} unscheduled, {} warnings",
            attempt + 1,
            score,
            candidate.warnings.len()
        );
        if best.as_ref().map_or(true, |b| score < b.unscheduled.len()) {
            best = Some(candidate);
            if score == 0 {
                break;
            }
        }
    }

    let formation = best.unwrap_or_default();
    log::info!(
        "Chose attempt {}: {} groups, {} matches, {} unscheduled",
        formation.attempt + 1,
        formation.groups.len(),
        formation.matches.len(),
        formation.unscheduled.len()
    );
    Ok(formation)
}
