//! Seeding an elimination bracket from the qualified group standings.

use crate::models::{
    Bracket, BracketSlot, BracketSummary, EntrantId, GroupId, Round, Standing, TournamentError,
};
use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Slot indices (0-based) from the outer edges inward: 0, n-1, 1, n-2, ...
fn outside_in(n: usize) -> Vec<usize> {
    (0..n)
        .map(|k| if k % 2 == 0 { k / 2 } else { n - 1 - k / 2 })
        .collect()
}

/// Qualifiers best first: position, points, set difference, game difference.
/// Equal rows keep their input order.
pub fn rank_qualifiers(qualified: &[Standing]) -> Vec<&Standing> {
    let mut ranked: Vec<&Standing> = qualified.iter().collect();
    ranked.sort_by_key(|s| {
        (
            s.position,
            Reverse(s.points),
            Reverse(s.set_diff),
            Reverse(s.game_diff),
        )
    });
    ranked
}

/// Pair pre-playoff entrants in order, each with the first remaining
/// opponent from another group (or the next one if none is left).
fn pair_pre_playoff(
    entrants: &[EntrantId],
    groups: &HashMap<EntrantId, GroupId>,
) -> Vec<(EntrantId, EntrantId)> {
    let mut pool = entrants.to_vec();
    let mut pairs = Vec::with_capacity(pool.len() / 2);
    while pool.len() >= 2 {
        let first = pool.remove(0);
        let group = groups.get(&first);
        let index = pool
            .iter()
            .position(|e| groups.get(e) != group)
            .unwrap_or(0);
        pairs.push((first, pool.remove(index)));
    }
    if let Some(odd) = pool.first() {
        log::error!("Entrant {} left without a pre-playoff opponent", odd);
    }
    pairs
}

/// Build the bracket of `category` from its qualified standing rows.
///
/// Top `with_bye` entrants are seated straight into the first knockout
/// round, outer slots first. The rest play a pre-playoff round whose
/// winners fill the seats left open. Fails without building anything if
/// an entrant would be missing or seated twice.
pub fn build_bracket(category: &str, qualified: &[Standing]) -> Result<Bracket, TournamentError> {
    let total = qualified.len();
    if total < 2 {
        return Err(TournamentError::NotEnoughQualifiers {
            category: category.to_string(),
            found: total,
        });
    }

    let summary = BracketSummary::for_qualifiers(total);
    let ranked = rank_qualifiers(qualified);
    let groups: HashMap<EntrantId, GroupId> =
        qualified.iter().map(|s| (s.entrant, s.group)).collect();
    let byes: Vec<EntrantId> = ranked[..summary.with_bye].iter().map(|s| s.entrant).collect();
    let pre_players: Vec<EntrantId> =
        ranked[summary.with_bye..].iter().map(|s| s.entrant).collect();

    let first_round = Round::Knockout(summary.pow2 as u32);
    let n = summary.pow2 / 2;
    let order = outside_in(n);
    let mut first: Vec<BracketSlot> = (0..n)
        .map(|i| BracketSlot::new(category, first_round, i as u32 + 1))
        .collect();

    let mut seeds = byes.iter().copied();
    for &s in &order {
        match seeds.next() {
            Some(entrant) => first[s].first = Some(entrant),
            None => break,
        }
    }
    let mut rest: Vec<EntrantId> = seeds.collect();

    let to_eliminate = summary.to_eliminate;
    // Position in the pre-playoff round feeding each open seat.
    let mut feeds: Vec<u32> = Vec::with_capacity(to_eliminate);
    if to_eliminate <= n {
        // Remaining seeds take second seats from the inside out, leaving
        // the top `to_eliminate` slots for pre-playoff winners.
        for &s in order[to_eliminate..].iter().rev() {
            if rest.is_empty() {
                break;
            }
            let opponent_group = first[s].first.and_then(|e| groups.get(&e));
            let index = rest
                .iter()
                .position(|e| groups.get(e) != opponent_group)
                .unwrap_or(0);
            first[s].second = Some(rest.remove(index));
        }
        for &s in &order[..to_eliminate] {
            first[s].is_bye = first[s].first.is_some();
            feeds.push(s as u32 + 1);
        }
    } else {
        // More pre-playoff matches than slots: each slot is fed by two
        // pre-playoff positions, 2s+1 and 2s+2.
        for &s in &order {
            if first[s].first.is_some() {
                first[s].is_bye = true;
            } else {
                feeds.push(2 * s as u32 + 1);
            }
            feeds.push(2 * s as u32 + 2);
        }
    }

    let pairs = pair_pre_playoff(&pre_players, &groups);
    let mut slots: Vec<BracketSlot> = pairs
        .iter()
        .zip(&feeds)
        .map(|(&(a, b), &position)| {
            let mut slot = BracketSlot::new(category, Round::PrePlayoff, position);
            slot.first = Some(a);
            slot.second = Some(b);
            slot
        })
        .collect();
    slots.sort_by_key(|s| s.position);

    let mut rounds = Vec::new();
    if summary.to_pre_play > 0 {
        rounds.push(Round::PrePlayoff);
    }
    rounds.extend(Round::knockout_sequence(summary.pow2 as u32));

    slots.extend(first);
    for round in rounds.iter().skip_while(|r| **r != first_round).skip(1) {
        if let Round::Knockout(entrants) = round {
            for position in 1..=entrants / 2 {
                slots.push(BracketSlot::new(category, *round, position));
            }
        }
    }

    let bracket = Bracket {
        category: category.to_string(),
        summary,
        rounds,
        bye_entrants: if summary.to_pre_play > 0 { byes } else { Vec::new() },
        slots,
    };
    check_coverage(&bracket, qualified)?;

    log::info!(
        "Bracket {}: {} qualifiers, {} pre-playoff matches, {} seeded",
        category,
        total,
        pairs.len(),
        summary.with_bye
    );
    Ok(bracket)
}

/// Every qualified entrant is seated exactly once in the pre-playoff and
/// first knockout rounds.
pub fn check_coverage(bracket: &Bracket, qualified: &[Standing]) -> Result<(), TournamentError> {
    let first_round = bracket.first_round();
    let mut seen: BTreeMap<EntrantId, usize> = BTreeMap::new();
    for slot in bracket
        .slots
        .iter()
        .filter(|s| s.round == Round::PrePlayoff || Some(s.round) == first_round)
    {
        for entrant in slot.occupants() {
            *seen.entry(entrant).or_insert(0) += 1;
        }
    }

    let expected: HashSet<EntrantId> = qualified.iter().map(|s| s.entrant).collect();
    let duplicates: Vec<EntrantId> = seen
        .iter()
        .filter(|(_, count)| **count > 1)
        .map(|(entrant, _)| *entrant)
        .collect();
    let mut missing: Vec<EntrantId> = expected
        .iter()
        .filter(|e| !seen.contains_key(e))
        .copied()
        .collect();
    missing.sort();

    if duplicates.is_empty() && missing.is_empty() {
        Ok(())
    } else {
        log::error!(
            "Bracket {} rejected: duplicates {:?}, missing {:?}",
            bracket.category,
            duplicates,
            missing
        );
        Err(TournamentError::BracketIntegrity {
            duplicates,
            missing,
        })
    }
}
