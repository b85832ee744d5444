//! Group tables, recomputed from the group's match results.

use crate::models::{EntrantId, Group, Match, Side, Standing, QUALIFYING_POSITIONS};
use std::cmp::Reverse;

/// Build the ranked table of `group` from scratch.
///
/// Only finished matches between two members count. Rows are sorted by
/// points, set difference and game difference; then one pass swaps each
/// fully tied adjacent pair whose lower row won their direct match.
pub fn compute_standings(group: &Group, matches: &[&Match]) -> Vec<Standing> {
    let mut rows: Vec<Standing> = group
        .members
        .iter()
        .map(|&entrant| Standing::new(entrant, group.id))
        .collect();

    for game in matches {
        let Some(result) = &game.result else {
            continue;
        };
        if game.group != group.id || !group.contains(game.local) || !group.contains(game.visitor)
        {
            continue;
        }
        for side in [Side::Local, Side::Visitor] {
            let entrant = game.entrant(side);
            let Some(row) = rows.iter_mut().find(|r| r.entrant == entrant) else {
                continue;
            };
            let (sets_won, sets_lost, games_won, games_lost) = result.summary.for_side(side);
            row.played += 1;
            row.sets_won += sets_won;
            row.sets_lost += sets_lost;
            row.games_won += games_won;
            row.games_lost += games_lost;
            if result.summary.winner == side {
                row.wins += 1;
                row.points += 1;
            } else {
                row.losses += 1;
            }
        }
    }

    for row in &mut rows {
        row.update_diffs();
    }
    rows.sort_by_key(|r| Reverse(r.tie_key()));

    for i in 0..rows.len().saturating_sub(1) {
        if rows[i].tie_key() != rows[i + 1].tie_key() {
            continue;
        }
        if head_to_head_winner(matches, rows[i].entrant, rows[i + 1].entrant)
            == Some(rows[i + 1].entrant)
        {
            log::debug!(
                "Group {} #{}: {} beat {} head-to-head",
                group.category,
                group.number,
                rows[i + 1].entrant,
                rows[i].entrant
            );
            rows.swap(i, i + 1);
        }
    }

    for (index, row) in rows.iter_mut().enumerate() {
        row.position = index as u32 + 1;
        row.qualified = row.position <= QUALIFYING_POSITIONS;
    }
    rows
}

fn head_to_head_winner(matches: &[&Match], a: EntrantId, b: EntrantId) -> Option<EntrantId> {
    matches
        .iter()
        .filter(|m| m.involves(a) && m.involves(b))
        .find_map(|m| m.winner())
}
