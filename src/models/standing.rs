//! Standing: one entrant's row in a group table.

use crate::models::entrant::EntrantId;
use crate::models::group::GroupId;
use serde::{Deserialize, Serialize};

/// Top positions that qualify for the bracket.
pub const QUALIFYING_POSITIONS: u32 = 2;

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub entrant: EntrantId,
    pub group: GroupId,
    pub played: u32,
    pub wins: u32,
    pub losses: u32,
    /// One point per win.
    pub points: u32,
    pub sets_won: u32,
    pub sets_lost: u32,
    pub games_won: u32,
    pub games_lost: u32,
    pub set_diff: i64,
    pub game_diff: i64,
    /// 1-based position in the group.
    pub position: u32,
    pub qualified: bool,
}

impl Standing {
    pub fn new(entrant: EntrantId, group: GroupId) -> Self {
        Self {
            entrant,
            group,
            ..Self::default()
        }
    }

    /// Refresh the differentials from the won/lost totals.
    pub fn update_diffs(&mut self) {
        self.set_diff = i64::from(self.sets_won) - i64::from(self.sets_lost);
        self.game_diff = i64::from(self.games_won) - i64::from(self.games_lost);
    }

    /// Points, set difference, game difference: the sort key without head-to-head.
    pub fn tie_key(&self) -> (u32, i64, i64) {
        (self.points, self.set_diff, self.game_diff)
    }
}
