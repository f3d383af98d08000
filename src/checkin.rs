//! Per-day check-in toggling.
//!
//! Each calendar day is independently either checked in or not. A toggle
//! flips exactly one day and recomputes the streak over the resulting set;
//! nothing here performs I/O or fires celebrations.

use crate::streak::current_streak;
use chrono::NaiveDate;
use std::collections::BTreeSet;

pub const MILESTONE_INTERVAL: u32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Completed,
    Uncompleted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleOutcome {
    pub completed_dates: BTreeSet<NaiveDate>,
    pub streak: u32,
    /// Membership of the toggled day before the toggle.
    pub was_completed: bool,
}

impl ToggleOutcome {
    pub fn transition(&self) -> Transition {
        if self.was_completed {
            Transition::Uncompleted
        } else {
            Transition::Completed
        }
    }

    pub fn is_milestone(&self) -> bool {
        self.transition() == Transition::Completed && is_milestone_streak(self.streak)
    }
}

pub fn is_milestone_streak(streak: u32) -> bool {
    streak > 0 && streak % MILESTONE_INTERVAL == 0
}

pub fn toggle(completed_dates: &BTreeSet<NaiveDate>, date: NaiveDate) -> ToggleOutcome {
    let mut updated = completed_dates.clone();
    let was_completed = !updated.insert(date);
    if was_completed {
        updated.remove(&date);
    }

    ToggleOutcome {
        streak: current_streak(&updated),
        completed_dates: updated,
        was_completed,
    }
}
