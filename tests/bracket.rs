//! Integration tests for bracket building and winner advancement.

use tennis_tournament_web::logic::{advance_from, build_bracket, revert_from, target_position};
use tennis_tournament_web::{Bracket, GroupId, Round, Side, Standing, TournamentError};
use uuid::Uuid;

/// Qualified rows for `groups` groups: winners (position 1) and runners-up
/// (position 2). Entrant id is `group * 10 + position`.
fn qualifiers(groups: usize, runners_up: usize) -> Vec<Standing> {
    let ids: Vec<GroupId> = (0..groups).map(|_| Uuid::new_v4()).collect();
    let mut rows = Vec::new();
    for (g, group) in ids.iter().enumerate() {
        for position in 1..=2u32 {
            if position == 2 && g >= runners_up {
                continue;
            }
            let mut row = Standing::new((g as u64 + 1) * 10 + u64::from(position), *group);
            row.position = position;
            row.points = 3 - position;
            row.qualified = true;
            rows.push(row);
        }
    }
    rows
}

fn occupants(bracket: &Bracket, round: Round) -> Vec<(Option<u64>, Option<u64>)> {
    bracket
        .round(round)
        .iter()
        .map(|s| (s.first, s.second))
        .collect()
}

fn decide(bracket: &mut Bracket, round: Round, position: u32, winner: Side) -> uuid::Uuid {
    let slot = bracket
        .slots
        .iter_mut()
        .find(|s| s.round == round && s.position == position)
        .unwrap();
    slot.winner = slot.entrant(winner);
    slot.id
}

#[test]
fn eight_qualifiers_need_no_pre_playoff() {
    let bracket = build_bracket("A", &qualifiers(4, 4)).unwrap();

    assert_eq!(bracket.summary.pow2, 8);
    assert_eq!(bracket.summary.to_pre_play, 0);
    assert_eq!(bracket.rounds, vec![Round::Knockout(8), Round::Knockout(4), Round::FINAL]);
    assert_eq!(bracket.round_len(Round::PrePlayoff), 0);
    assert!(bracket.bye_entrants.is_empty());
    let first = bracket.round(Round::Knockout(8));
    assert_eq!(first.len(), 4);
    assert!(first.iter().all(|s| s.is_full() && !s.is_bye));
    assert_eq!(bracket.round_len(Round::Knockout(4)), 2);
    assert_eq!(bracket.round_len(Round::FINAL), 1);
}

#[test]
fn five_qualifiers_play_one_pre_playoff() {
    let bracket = build_bracket("B", &qualifiers(3, 2)).unwrap();

    let s = bracket.summary;
    assert_eq!((s.pow2, s.to_eliminate, s.to_pre_play, s.with_bye), (4, 1, 2, 3));
    assert_eq!(bracket.rounds[0], Round::PrePlayoff);
    assert_eq!(bracket.round_len(Round::PrePlayoff), 1);
    assert_eq!(bracket.bye_entrants.len(), 3);

    // Seeds: 11, 21, 31 by position; 12 and 22 pre-play.
    assert_eq!(
        occupants(&bracket, Round::Knockout(4)),
        vec![(Some(11), None), (Some(21), Some(31))]
    );
    assert!(bracket.round(Round::Knockout(4))[0].is_bye);
    let pre = bracket.round(Round::PrePlayoff);
    assert_eq!((pre[0].first, pre[0].second), (Some(12), Some(22)));
    assert_eq!(pre[0].position, 1);
}

#[test]
fn pre_playoff_avoids_same_group_opponents() {
    let bracket = build_bracket("C", &qualifiers(3, 3)).unwrap();

    // 11 and 21 seeded; 31 plays 12 (not 32), then 22 plays 32.
    assert_eq!(bracket.bye_entrants, vec![11, 21]);
    assert_eq!(
        occupants(&bracket, Round::PrePlayoff),
        vec![(Some(31), Some(12)), (Some(22), Some(32))]
    );
    assert!(bracket.round(Round::Knockout(4)).iter().all(|s| s.is_bye));
}

#[test]
fn large_pre_playoff_round_halves_into_first_round() {
    // 7 qualifiers: 1 seed, 3 pre-playoff matches feeding two semifinals.
    let bracket = build_bracket("D", &qualifiers(4, 3)).unwrap();

    assert_eq!(bracket.summary.with_bye, 1);
    let positions: Vec<u32> = bracket
        .round(Round::PrePlayoff)
        .iter()
        .map(|s| s.position)
        .collect();
    assert_eq!(positions, vec![2, 3, 4]);
    assert_eq!(target_position(&bracket, Round::PrePlayoff, 2), Some((Round::Knockout(4), 1)));
    assert_eq!(target_position(&bracket, Round::PrePlayoff, 4), Some((Round::Knockout(4), 2)));
}

#[test]
fn too_few_qualifiers_is_rejected() {
    let err = build_bracket("E", &qualifiers(1, 0)).unwrap_err();
    assert_eq!(
        err,
        TournamentError::NotEnoughQualifiers {
            category: "E".to_string(),
            found: 1
        }
    );
}

#[test]
fn duplicate_qualifier_fails_the_build() {
    let mut rows = qualifiers(2, 2);
    rows[3] = rows[0].clone();
    match build_bracket("F", &rows) {
        Err(TournamentError::BracketIntegrity { duplicates, .. }) => {
            assert_eq!(duplicates, vec![11]);
        }
        other => panic!("expected integrity error, got {other:?}"),
    }
}

#[test]
fn winners_halve_into_the_next_round() {
    let mut bracket = build_bracket("G", &qualifiers(4, 4)).unwrap();
    assert_eq!(target_position(&bracket, Round::Knockout(8), 3), Some((Round::Knockout(4), 2)));
    assert_eq!(target_position(&bracket, Round::FINAL, 1), None);

    let first = decide(&mut bracket, Round::Knockout(8), 3, Side::Local);
    let second = decide(&mut bracket, Round::Knockout(8), 4, Side::Visitor);
    let winners = occupants(&bracket, Round::Knockout(8));

    advance_from(&mut bracket, second).unwrap();
    let outcome = advance_from(&mut bracket, first).unwrap();

    // The even-position winner arrived first and took the empty first seat.
    assert_eq!(outcome.seat, Some(Side::Visitor));
    let semi = bracket.find(Round::Knockout(4), 2).unwrap();
    assert_eq!(semi.first, winners[3].1);
    assert_eq!(semi.second, winners[2].0);
}

#[test]
fn final_does_not_advance() {
    let mut bracket = build_bracket("H", &qualifiers(1, 1)).unwrap();
    assert_eq!(bracket.rounds, vec![Round::FINAL]);
    let id = decide(&mut bracket, Round::FINAL, 1, Side::Local);

    let outcome = advance_from(&mut bracket, id).unwrap();

    assert_eq!(outcome.target, None);
    assert_eq!(bracket.slots.len(), 1);
}

#[test]
fn advancing_without_a_winner_is_rejected() {
    let mut bracket = build_bracket("I", &qualifiers(2, 2)).unwrap();
    let id = bracket.round(Round::Knockout(4))[0].id;
    assert_eq!(advance_from(&mut bracket, id), Err(TournamentError::NoResultRecorded));
}

#[test]
fn revert_keeps_the_seeded_entrant() {
    let mut bracket = build_bracket("J", &qualifiers(3, 2)).unwrap();
    let before = occupants(&bracket, Round::Knockout(4));
    let pre = decide(&mut bracket, Round::PrePlayoff, 1, Side::Visitor);

    let outcome = advance_from(&mut bracket, pre).unwrap();
    assert_eq!(outcome.seat, Some(Side::Visitor));
    assert_eq!(
        occupants(&bracket, Round::Knockout(4))[0],
        (Some(11), Some(22))
    );

    revert_from(&mut bracket, pre, 22).unwrap();
    assert_eq!(occupants(&bracket, Round::Knockout(4)), before);
}

#[test]
fn missing_target_slot_is_created_once() {
    let mut bracket = build_bracket("K", &qualifiers(2, 2)).unwrap();
    bracket.slots.retain(|s| s.round != Round::FINAL);
    let a = decide(&mut bracket, Round::Knockout(4), 1, Side::Local);
    let b = decide(&mut bracket, Round::Knockout(4), 2, Side::Local);

    advance_from(&mut bracket, a).unwrap();
    advance_from(&mut bracket, b).unwrap();
    advance_from(&mut bracket, b).unwrap();

    let finals = bracket.round(Round::FINAL);
    assert_eq!(finals.len(), 1);
    assert!(finals[0].is_full());
}

#[test]
fn replay_into_a_full_slot_uses_source_parity() {
    let mut bracket = build_bracket("L", &qualifiers(2, 2)).unwrap();
    let a = decide(&mut bracket, Round::Knockout(4), 1, Side::Local);
    let b = decide(&mut bracket, Round::Knockout(4), 2, Side::Local);
    advance_from(&mut bracket, a).unwrap();
    advance_from(&mut bracket, b).unwrap();

    // Position 2 now reports its other entrant as winner.
    let replay = decide(&mut bracket, Round::Knockout(4), 2, Side::Visitor);
    let outcome = advance_from(&mut bracket, replay).unwrap();

    assert_eq!(outcome.seat, Some(Side::Visitor));
    let semi = bracket.find(Round::Knockout(4), 2).unwrap();
    let last = bracket.find(Round::FINAL, 1).unwrap();
    assert_eq!(last.second, semi.second);
}

#[test]
fn revert_of_a_decided_target_detaches_its_match() {
    let mut bracket = build_bracket("M", &qualifiers(2, 2)).unwrap();
    let a = decide(&mut bracket, Round::Knockout(4), 1, Side::Local);
    let b = decide(&mut bracket, Round::Knockout(4), 2, Side::Local);
    advance_from(&mut bracket, a).unwrap();
    advance_from(&mut bracket, b).unwrap();
    let match_id = Uuid::new_v4();
    {
        let last = bracket.slots.iter_mut().find(|s| s.round == Round::FINAL).unwrap();
        last.match_id = Some(match_id);
        last.winner = last.first;
    }
    let winner = bracket.find(Round::Knockout(4), 1).unwrap().winner.unwrap();

    let outcome = revert_from(&mut bracket, a, winner).unwrap();

    assert_eq!(outcome.detached_match, Some(match_id));
    let last = bracket.find(Round::FINAL, 1).unwrap();
    assert_eq!(last.first, None);
    assert_eq!(last.winner, None);
    assert_eq!(last.match_id, None);
    assert!(last.second.is_some());
}
