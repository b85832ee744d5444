//! Tennis tournament engine: group forming and scheduling, standings, and
//! elimination brackets, with a small web API in `bin/web.rs`.

pub mod config;
pub mod import;
pub mod logic;
pub mod models;

pub use config::{EngineConfig, ServerConfig};
pub use import::{entrants_from_csv, time_slots_from_csv, ImportError};
pub use logic::{
    assign_playoff_time, build_bracket, clear_group_result, clear_playoff_result,
    compute_standings, edit_group_result, edit_playoff_result, form_groups, generate_bracket,
    reassign_match_slot, record_group_result, record_playoff_result, reset_group_stage,
    start_group_stage, AdvanceOutcome, GroupFormation, RevertOutcome, SchedulingWarning,
    UnscheduledMatch, WarningKind,
};
pub use models::{
    Bracket, BracketSlot, BracketSlotId, BracketSummary, Entrant, EntrantId, Group, GroupId,
    GroupSizeConfig, Match, MatchId, MatchOutcome, MatchResult, PlayoffMatch, ResultSummary,
    Round, SetScore, Side, Standing, TimeSlot, TimeSlotId, Tournament, TournamentError,
    TournamentId, TournamentState,
};
