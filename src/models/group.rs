//! Group and the per-category group size configuration.

use crate::models::entrant::EntrantId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Unique identifier for a group.
pub type GroupId = Uuid;

/// How many groups of each size a category should be split into.
///
/// Serialized as a map from size to count, e.g. `{"3": 2, "4": 1}`.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupSizeConfig {
    counts: BTreeMap<usize, usize>,
}

impl GroupSizeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// The usual operator form: groups of 3, 4 and 5.
    pub fn from_counts(groups_of_3: usize, groups_of_4: usize, groups_of_5: usize) -> Self {
        Self::new()
            .with(3, groups_of_3)
            .with(4, groups_of_4)
            .with(5, groups_of_5)
    }

    /// Set the number of groups of `size` (zero counts are not stored).
    pub fn with(mut self, size: usize, count: usize) -> Self {
        if count == 0 {
            self.counts.remove(&size);
        } else {
            self.counts.insert(size, count);
        }
        self
    }

    pub fn count_of(&self, size: usize) -> usize {
        self.counts.get(&size).copied().unwrap_or(0)
    }

    /// Total groups requested.
    pub fn group_count(&self) -> usize {
        self.counts.values().sum()
    }

    /// Total seats requested: sum of size × count.
    pub fn seats(&self) -> usize {
        self.counts.iter().map(|(size, count)| size * count).sum()
    }

    /// Sizes requested, one entry per group, larger groups first.
    pub fn target_sizes(&self) -> Vec<usize> {
        self.counts
            .iter()
            .rev()
            .flat_map(|(&size, &count)| std::iter::repeat(size).take(count))
            .collect()
    }

    pub fn sizes(&self) -> impl Iterator<Item = usize> + '_ {
        self.counts.keys().copied()
    }
}

/// A round-robin pool within a category.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub category: String,
    /// 1-based number within the category.
    pub number: u32,
    pub members: Vec<EntrantId>,
    /// Nominal size from the configuration.
    pub size: usize,
    /// True when fewer members than `size` could be placed.
    pub incomplete: bool,
}

impl Group {
    pub fn new(category: impl Into<String>, number: u32, size: usize, members: Vec<EntrantId>) -> Self {
        let incomplete = members.len() < size;
        Self {
            id: Uuid::new_v4(),
            category: category.into(),
            number,
            members,
            size,
            incomplete,
        }
    }

    pub fn contains(&self, entrant: EntrantId) -> bool {
        self.members.contains(&entrant)
    }

    /// Add late members (overflow) and refresh the incomplete flag.
    pub fn absorb(&mut self, extra: impl IntoIterator<Item = EntrantId>) {
        self.members.extend(extra);
        self.incomplete = self.members.len() < self.size;
    }
}
