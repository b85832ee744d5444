//! Integration tests for CSV loading of time slots and entrants.

use chrono::{NaiveDate, NaiveTime};
use tennis_tournament_web::{entrants_from_csv, time_slots_from_csv, ImportError};

#[test]
fn time_slots_use_default_capacity_when_blank() {
    let data = "\
id,date,weekday,start,capacity
1,2025-06-07,Saturday,09:00,2
2, 2025-06-07 ,Saturday,18:30:00,
";
    let slots = time_slots_from_csv(data.as_bytes(), 4).unwrap();

    assert_eq!(slots.len(), 2);
    assert_eq!(slots[0].capacity, 2);
    assert_eq!(slots[1].capacity, 4);
    assert_eq!(slots[1].date, NaiveDate::from_ymd_opt(2025, 6, 7).unwrap());
    assert_eq!(slots[1].start, NaiveTime::from_hms_opt(18, 30, 0).unwrap());
    assert_eq!(slots[0].weekday, "Saturday");
}

#[test]
fn bad_date_reports_its_line() {
    let data = "\
id,date,weekday,start,capacity
1,2025-06-07,Saturday,09:00,2
2,07/06/2025,Saturday,10:00,2
";
    match time_slots_from_csv(data.as_bytes(), 4) {
        Err(ImportError::InvalidDate { line, value }) => {
            assert_eq!(line, 3);
            assert_eq!(value, "07/06/2025");
        }
        other => panic!("expected invalid date, got {other:?}"),
    }
}

#[test]
fn bad_start_time_is_rejected() {
    let data = "id,date,weekday,start,capacity\n1,2025-06-07,Saturday,nine,2\n";
    assert!(matches!(
        time_slots_from_csv(data.as_bytes(), 4),
        Err(ImportError::InvalidTime { line: 2, .. })
    ));
}

#[test]
fn entrants_split_slots_on_semicolons() {
    let data = "\
id,name,category,slots
10,Garcia / Lopez,Men A,1;3; 4
11,Ruiz / Soto,Women B,
";
    let entrants = entrants_from_csv(data.as_bytes()).unwrap();

    assert_eq!(entrants[0].slots, vec![1, 3, 4]);
    assert_eq!(entrants[0].category, "Men A");
    assert!(entrants[1].slots.is_empty());
}

#[test]
fn entrant_slot_ids_must_be_numbers() {
    let data = "id,name,category,slots\n10,Garcia / Lopez,Men A,1;x\n";
    match entrants_from_csv(data.as_bytes()) {
        Err(ImportError::InvalidSlotId { line, value }) => {
            assert_eq!((line, value.as_str()), (2, "x"));
        }
        other => panic!("expected invalid slot id, got {other:?}"),
    }
}

#[test]
fn repeated_ids_are_rejected() {
    let data = "\
id,name,category,slots
10,Garcia / Lopez,Men A,1
10,Ruiz / Soto,Men A,2
";
    assert!(matches!(
        entrants_from_csv(data.as_bytes()),
        Err(ImportError::DuplicateId { line: 3, id: 10 })
    ));
}
