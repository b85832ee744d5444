//! Tournament engine: group forming, scheduling, standings, brackets and results.

pub mod bracket_advance;
pub mod bracket_builder;
pub mod compatibility;
pub mod group_forming;
pub mod results;
pub mod scheduling;
pub mod setup;
pub mod shuffle;
pub mod standings;

pub use bracket_advance::{advance_from, revert_from, target_position, AdvanceOutcome, RevertOutcome};
pub use bracket_builder::{build_bracket, check_coverage, rank_qualifiers};
pub use compatibility::{group_affinity, overlap};
pub use group_forming::{
    form_groups, partition_category, validate_config, CategoryGrouping, GroupFormation,
};
pub use results::{
    assign_playoff_time, clear_group_result, clear_playoff_result, edit_group_result,
    edit_playoff_result, reassign_match_slot, record_group_result, record_playoff_result,
    refresh_standings,
};
pub use scheduling::{
    round_robin_pairs, schedule_groups, Schedule, SchedulingContext, SchedulingWarning,
    UnscheduledMatch, WarningKind,
};
pub use setup::{generate_bracket, qualified_standings, reset_group_stage, start_group_stage};
pub use shuffle::{shuffled, Lcg};
pub use standings::compute_standings;
