//! Schedule overlap between entrants.

use crate::models::Entrant;

/// Number of time slots both entrants can play.
pub fn overlap(a: &Entrant, b: &Entrant) -> usize {
    a.slots.iter().filter(|slot| b.is_available(**slot)).count()
}

/// Sum of the candidate's overlap with every current member.
pub fn group_affinity(candidate: &Entrant, members: &[&Entrant]) -> usize {
    members.iter().map(|m| overlap(candidate, m)).sum()
}
