//! In-memory repository over [`AppData`].
//!
//! Every mutation of a habit's completion record goes through here so the
//! cached `streak` never drifts from `completed_dates`. Callers persist the
//! whole document afterwards.

use crate::checkin::{ToggleOutcome, toggle};
use crate::dates::{DateError, parse_day};
use crate::models::{AppData, Goal, GoalRequest, GoalStatus, Habit, HabitRequest};
use crate::streak::current_streak;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrackerError {
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },
    #[error(transparent)]
    Date(#[from] DateError),
    #[error("{0}")]
    Invalid(String),
}

impl AppData {
    pub fn habit(&self, id: &str) -> Option<&Habit> {
        self.habits.iter().find(|habit| habit.id == id)
    }

    pub fn goal(&self, id: &str) -> Option<&Goal> {
        self.goals.iter().find(|goal| goal.id == id)
    }

    fn habit_mut(&mut self, id: &str) -> Result<&mut Habit, TrackerError> {
        self.habits
            .iter_mut()
            .find(|habit| habit.id == id)
            .ok_or_else(|| not_found("habit", id))
    }

    fn goal_mut(&mut self, id: &str) -> Result<&mut Goal, TrackerError> {
        self.goals
            .iter_mut()
            .find(|goal| goal.id == id)
            .ok_or_else(|| not_found("goal", id))
    }

    pub fn create_habit(
        &mut self,
        request: HabitRequest,
        now: DateTime<Utc>,
    ) -> Result<&Habit, TrackerError> {
        let name = required(&request.name, "habit name")?;
        self.habits.push(Habit {
            id: new_id(),
            name,
            description: request.description,
            frequency: request.frequency,
            color: request.color,
            icon: request.icon,
            streak: 0,
            completed_dates: BTreeSet::new(),
            created_at: now,
        });
        Ok(&self.habits[self.habits.len() - 1])
    }

    /// Edits descriptive fields only; completion history is untouched.
    pub fn update_habit(
        &mut self,
        id: &str,
        request: HabitRequest,
    ) -> Result<&Habit, TrackerError> {
        let name = required(&request.name, "habit name")?;
        let habit = self.habit_mut(id)?;
        habit.name = name;
        habit.description = request.description;
        habit.frequency = request.frequency;
        habit.color = request.color;
        habit.icon = request.icon;
        Ok(&*habit)
    }

    pub fn delete_habit(&mut self, id: &str) -> Result<Habit, TrackerError> {
        let index = self
            .habits
            .iter()
            .position(|habit| habit.id == id)
            .ok_or_else(|| not_found("habit", id))?;
        Ok(self.habits.remove(index))
    }

    pub fn toggle_habit(
        &mut self,
        id: &str,
        date: NaiveDate,
    ) -> Result<ToggleOutcome, TrackerError> {
        let habit = self.habit_mut(id)?;
        let outcome = toggle(&habit.completed_dates, date);
        habit.completed_dates = outcome.completed_dates.clone();
        habit.streak = outcome.streak;
        debug!(
            habit_id = id,
            date = %date,
            was_completed = outcome.was_completed,
            streak = outcome.streak,
            "habit toggled"
        );
        Ok(outcome)
    }

    /// Merges a batch of completion days. Nothing is applied if any day is
    /// malformed.
    pub fn import_completions<'a, I>(&mut self, id: &str, days: I) -> Result<&Habit, TrackerError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let parsed = days
            .into_iter()
            .map(parse_day)
            .collect::<Result<Vec<_>, _>>()?;
        let habit = self.habit_mut(id)?;
        habit.completed_dates.extend(parsed);
        habit.streak = current_streak(&habit.completed_dates);
        Ok(&*habit)
    }

    pub fn create_goal(
        &mut self,
        request: GoalRequest,
        now: DateTime<Utc>,
    ) -> Result<&Goal, TrackerError> {
        let title = required(&request.title, "goal title")?;
        let category = required(&request.category, "goal category")?;
        let mut goal = Goal {
            id: new_id(),
            title,
            description: request.description,
            category,
            progress: 0,
            deadline: request.deadline,
            status: GoalStatus::InProgress,
            color: request.color,
            icon: request.icon,
            created_at: now,
        };
        refresh_status(&mut goal, now);
        self.goals.push(goal);
        Ok(&self.goals[self.goals.len() - 1])
    }

    pub fn update_goal(
        &mut self,
        id: &str,
        request: GoalRequest,
        now: DateTime<Utc>,
    ) -> Result<&Goal, TrackerError> {
        let title = required(&request.title, "goal title")?;
        let category = required(&request.category, "goal category")?;
        let goal = self.goal_mut(id)?;
        goal.title = title;
        goal.description = request.description;
        goal.category = category;
        goal.deadline = request.deadline;
        goal.color = request.color;
        goal.icon = request.icon;
        if goal.status == GoalStatus::Overdue {
            goal.status = GoalStatus::InProgress;
        }
        refresh_status(goal, now);
        Ok(&*goal)
    }

    /// Sets progress; returns whether this update completed the goal.
    pub fn update_progress(
        &mut self,
        id: &str,
        progress: u8,
    ) -> Result<(&Goal, bool), TrackerError> {
        if progress > 100 {
            return Err(TrackerError::Invalid(format!(
                "progress must be between 0 and 100, got {progress}"
            )));
        }

        let goal = self.goal_mut(id)?;
        let newly_completed = progress == 100 && goal.status != GoalStatus::Completed;
        goal.progress = progress;
        if progress == 100 {
            goal.status = GoalStatus::Completed;
        }
        Ok((&*goal, newly_completed))
    }

    pub fn complete_goal(&mut self, id: &str) -> Result<(&Goal, bool), TrackerError> {
        let goal = self.goal_mut(id)?;
        let newly_completed = goal.status != GoalStatus::Completed;
        goal.progress = 100;
        goal.status = GoalStatus::Completed;
        Ok((&*goal, newly_completed))
    }

    pub fn delete_goal(&mut self, id: &str) -> Result<Goal, TrackerError> {
        let index = self
            .goals
            .iter()
            .position(|goal| goal.id == id)
            .ok_or_else(|| not_found("goal", id))?;
        Ok(self.goals.remove(index))
    }

    pub fn refresh_goal_statuses(&mut self, now: DateTime<Utc>) {
        for goal in &mut self.goals {
            refresh_status(goal, now);
        }
    }

    /// Goals with statuses evaluated at `now`; stored state is unchanged.
    pub fn goals_as_of(&self, now: DateTime<Utc>) -> Vec<Goal> {
        let mut goals = self.goals.clone();
        for goal in &mut goals {
            refresh_status(goal, now);
        }
        goals
    }

    /// Recomputes every cached streak and refreshes goal statuses. Returns
    /// the number of habits whose stored streak had drifted.
    pub fn reconcile(&mut self, now: DateTime<Utc>) -> usize {
        let mut repaired = 0;
        for habit in &mut self.habits {
            let streak = current_streak(&habit.completed_dates);
            if habit.streak != streak {
                warn!(
                    habit_id = %habit.id,
                    stored = habit.streak,
                    computed = streak,
                    "stored streak was stale, recomputed"
                );
                habit.streak = streak;
                repaired += 1;
            }
        }
        self.refresh_goal_statuses(now);
        repaired
    }
}

fn refresh_status(goal: &mut Goal, now: DateTime<Utc>) {
    if goal.progress == 100 {
        goal.status = GoalStatus::Completed;
    } else if goal.deadline < now && goal.status != GoalStatus::Completed {
        goal.status = GoalStatus::Overdue;
    }
}

fn required(value: &str, field: &str) -> Result<String, TrackerError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TrackerError::Invalid(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}

fn not_found(kind: &'static str, id: &str) -> TrackerError {
    TrackerError::NotFound {
        kind,
        id: id.to_string(),
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}
