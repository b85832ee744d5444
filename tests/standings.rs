//! Integration tests for match results and group standings.

use tennis_tournament_web::logic::compute_standings;
use tennis_tournament_web::{
    Group, Match, MatchOutcome, MatchResult, SetScore, Side, TournamentError,
};

fn played(group: &Group, local: u64, visitor: u64, outcome: MatchOutcome) -> Match {
    let mut m = Match::new(group.id, local, visitor, Some(1));
    m.result = Some(MatchResult::from_outcome(outcome).unwrap());
    m
}

fn straight(local_games: u32, visitor_games: u32) -> MatchOutcome {
    MatchOutcome::Normal {
        sets: vec![
            SetScore::new(local_games, visitor_games),
            SetScore::new(local_games, visitor_games),
        ],
        super_tiebreak: None,
    }
}

#[test]
fn walkover_without_sets_counts_as_two_love_sets() {
    let summary = MatchOutcome::Walkover {
        winner: Side::Visitor,
        sets: vec![],
    }
    .summarize()
    .unwrap();
    assert_eq!((summary.sets_local, summary.sets_visitor), (0, 2));
    assert_eq!((summary.games_local, summary.games_visitor), (0, 12));
    assert_eq!(summary.winner, Side::Visitor);
    assert!(summary.walkover);
}

#[test]
fn super_tiebreak_decides_split_sets() {
    let summary = MatchOutcome::Normal {
        sets: vec![SetScore::new(6, 3), SetScore::new(4, 6)],
        super_tiebreak: Some(SetScore::new(8, 10)),
    }
    .summarize()
    .unwrap();
    assert_eq!((summary.sets_local, summary.sets_visitor), (1, 2));
    assert_eq!((summary.games_local, summary.games_visitor), (18, 19));
    assert_eq!(summary.winner, Side::Visitor);
}

#[test]
fn super_tiebreak_is_ignored_when_sets_are_not_split() {
    let summary = MatchOutcome::Normal {
        sets: vec![SetScore::new(6, 3), SetScore::new(6, 4)],
        super_tiebreak: Some(SetScore::new(3, 10)),
    }
    .summarize()
    .unwrap();
    assert_eq!((summary.sets_local, summary.sets_visitor), (2, 0));
    assert_eq!(summary.winner, Side::Local);
}

#[test]
fn invalid_scores_are_rejected() {
    let empty = MatchOutcome::Normal {
        sets: vec![],
        super_tiebreak: None,
    };
    let drawn_set = straight(5, 5);
    let level_without_tiebreak = MatchOutcome::Normal {
        sets: vec![SetScore::new(6, 3), SetScore::new(4, 6)],
        super_tiebreak: None,
    };
    for outcome in [empty, drawn_set, level_without_tiebreak] {
        assert!(matches!(
            outcome.summarize(),
            Err(TournamentError::InvalidScore(_))
        ));
    }
}

#[test]
fn outcome_json_is_tagged() {
    let outcome: MatchOutcome =
        serde_json::from_str(r#"{"kind": "walkover", "winner": "local"}"#).unwrap();
    assert_eq!(
        outcome,
        MatchOutcome::Walkover {
            winner: Side::Local,
            sets: vec![]
        }
    );
}

#[test]
fn table_is_ordered_by_points() {
    let group = Group::new("A", 1, 3, vec![3, 2, 1]);
    let matches = vec![
        played(&group, 1, 2, straight(6, 2)),
        played(&group, 1, 3, straight(6, 1)),
        played(&group, 2, 3, straight(6, 4)),
    ];
    let refs: Vec<&Match> = matches.iter().collect();

    let table = compute_standings(&group, &refs);

    let order: Vec<u64> = table.iter().map(|s| s.entrant).collect();
    assert_eq!(order, vec![1, 2, 3]);
    assert_eq!(table[0].points, 2);
    assert_eq!(table[0].wins, 2);
    assert_eq!(table[0].set_diff, 4);
    assert_eq!(table[0].game_diff, 24 - 6);
    assert_eq!(table[2].losses, 2);
    assert!(table[0].qualified && table[1].qualified && !table[2].qualified);
    assert_eq!(
        table.iter().map(|s| s.position).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
}

#[test]
fn fully_tied_pair_is_split_by_head_to_head() {
    // A circle of identical wins: everyone ends 1-1, 2-2 in sets, 20-20 in games.
    let group = Group::new("A", 1, 3, vec![20, 10, 30]);
    let matches = vec![
        played(&group, 10, 20, straight(6, 4)),
        played(&group, 20, 30, straight(6, 4)),
        played(&group, 30, 10, straight(6, 4)),
    ];
    let refs: Vec<&Match> = matches.iter().collect();

    let table = compute_standings(&group, &refs);

    // 20 and 10 start tied in member order; 10 won their match.
    let order: Vec<u64> = table.iter().map(|s| s.entrant).collect();
    assert_eq!(order, vec![10, 20, 30]);
    assert!(table.iter().all(|s| s.points == 1 && s.set_diff == 0 && s.game_diff == 0));
}

#[test]
fn unplayed_and_foreign_matches_are_ignored() {
    let group = Group::new("A", 1, 2, vec![1, 2]);
    let other = Group::new("A", 2, 2, vec![3, 4]);
    let matches = vec![
        Match::new(group.id, 1, 2, Some(1)),
        played(&other, 3, 4, straight(6, 0)),
    ];
    let refs: Vec<&Match> = matches.iter().collect();

    let table = compute_standings(&group, &refs);

    assert!(table.iter().all(|s| s.played == 0 && s.points == 0));
    assert_eq!(table.len(), 2);
}
