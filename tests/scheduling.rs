//! Integration tests for the match scheduler.

use chrono::{NaiveDate, NaiveTime};
use std::collections::HashMap;
use tennis_tournament_web::logic::{round_robin_pairs, schedule_groups, SchedulingContext};
use tennis_tournament_web::{Entrant, EntrantId, Group, TimeSlot, WarningKind};

fn slot(id: u64, day: u32, hour: u32, capacity: u32) -> TimeSlot {
    TimeSlot::new(
        id,
        NaiveDate::from_ymd_opt(2025, 4, day).unwrap(),
        "Friday",
        NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
        capacity,
    )
}

fn entrant(id: u64, slots: &[u64]) -> Entrant {
    Entrant::new(id, format!("Pair {id}"), "A", slots.iter().copied())
}

fn by_id(entrants: &[Entrant]) -> HashMap<EntrantId, &Entrant> {
    entrants.iter().map(|e| (e.id, e)).collect()
}

#[test]
fn round_robin_covers_every_pair_once() {
    let pairs = round_robin_pairs(&[1, 2, 3, 4, 5]);
    assert_eq!(pairs.len(), 10);
    assert_eq!(pairs[0], (1, 2));
    assert_eq!(pairs[9], (4, 5));
    assert!(round_robin_pairs(&[7]).is_empty());
}

#[test]
fn no_common_slot_leaves_match_unscheduled() {
    let slots = vec![slot(1, 1, 18, 4), slot(2, 2, 18, 4)];
    let entrants = vec![entrant(1, &[1]), entrant(2, &[2])];
    let group = Group::new("A", 1, 2, vec![1, 2]);
    let mut ctx = SchedulingContext::new(&slots);

    let schedule = schedule_groups(&mut ctx, &[group], &by_id(&entrants));

    assert_eq!(schedule.matches.len(), 1);
    assert_eq!(schedule.matches[0].slot, None);
    assert_eq!(schedule.warnings.len(), 1);
    assert_eq!(schedule.warnings[0].kind, WarningKind::NoCommonSlot);
    let json = serde_json::to_value(&schedule.warnings[0]).unwrap();
    assert_eq!(json["type"], "sin_horario_compatible");
    assert_eq!(schedule.unscheduled[0].local_slots, vec![1]);
    assert_eq!(schedule.unscheduled[0].visitor_slots, vec![2]);
}

#[test]
fn second_match_on_same_day_is_refused() {
    // Two slots on the same day: the first match takes one, the next
    // match of the same entrant cannot use the other.
    let slots = vec![slot(1, 5, 18, 4), slot(2, 5, 20, 4)];
    let entrants = vec![entrant(1, &[1, 2]), entrant(2, &[1, 2]), entrant(3, &[1, 2])];
    let group = Group::new("A", 1, 3, vec![1, 2, 3]);
    let mut ctx = SchedulingContext::new(&slots);

    let schedule = schedule_groups(&mut ctx, &[group], &by_id(&entrants));

    assert_eq!(schedule.matches[0].slot, Some(1));
    assert_eq!(schedule.matches[1].slot, None);
    assert_eq!(schedule.warnings[0].kind, WarningKind::PlayersBusy);
    assert_eq!(schedule.unscheduled_count(), 2);
}

#[test]
fn full_slot_reports_capacity() {
    let slots = vec![slot(1, 6, 9, 1)];
    let entrants = vec![
        entrant(1, &[1]),
        entrant(2, &[1]),
        entrant(3, &[1]),
        entrant(4, &[1]),
    ];
    let groups = vec![
        Group::new("A", 1, 2, vec![1, 2]),
        Group::new("A", 2, 2, vec![3, 4]),
    ];
    let mut ctx = SchedulingContext::new(&slots);

    let schedule = schedule_groups(&mut ctx, &groups, &by_id(&entrants));

    assert_eq!(schedule.matches[0].slot, Some(1));
    assert_eq!(schedule.matches[1].slot, None);
    assert_eq!(schedule.warnings.len(), 1);
    assert_eq!(schedule.warnings[0].kind, WarningKind::CapacityFull);
    assert_eq!(ctx.usage(1), 1);
}

#[test]
fn least_used_slot_is_preferred() {
    let slots = vec![slot(1, 7, 9, 4), slot(2, 8, 9, 4)];
    let entrants = vec![
        entrant(1, &[1, 2]),
        entrant(2, &[1, 2]),
        entrant(3, &[1, 2]),
        entrant(4, &[1, 2]),
    ];
    let groups = vec![
        Group::new("A", 1, 2, vec![1, 2]),
        Group::new("A", 2, 2, vec![3, 4]),
    ];
    let mut ctx = SchedulingContext::new(&slots);

    let schedule = schedule_groups(&mut ctx, &groups, &by_id(&entrants));

    assert_eq!(schedule.matches[0].slot, Some(1));
    assert_eq!(schedule.matches[1].slot, Some(2));
    assert!(schedule.warnings.is_empty());
}

#[test]
fn shared_unknown_slot_counts_as_busy() {
    // Both list slot 99, which is not part of the run.
    let slots = vec![slot(1, 9, 9, 4)];
    let entrants = vec![entrant(1, &[1, 99]), entrant(2, &[99])];
    let group = Group::new("A", 1, 2, vec![1, 2]);
    let mut ctx = SchedulingContext::new(&slots);

    let schedule = schedule_groups(&mut ctx, &[group], &by_id(&entrants));

    assert_eq!(schedule.matches[0].slot, None);
    assert_eq!(schedule.warnings[0].kind, WarningKind::PlayersBusy);
    assert_eq!(schedule.unscheduled[0].local_slots, vec![1]);
    assert!(schedule.unscheduled[0].visitor_slots.is_empty());
}
