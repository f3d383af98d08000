use crate::checkin::{ToggleOutcome, Transition};
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Celebration {
    Completion { habit_id: String },
    Milestone { habit_id: String, streak: u32 },
    GoalCompleted { goal_id: String },
}

/// Celebrations owed for a toggle. Undo never celebrates.
pub fn celebrations_for(habit_id: &str, outcome: &ToggleOutcome) -> Vec<Celebration> {
    if outcome.transition() == Transition::Uncompleted {
        return Vec::new();
    }

    let mut events = vec![Celebration::Completion {
        habit_id: habit_id.to_string(),
    }];
    if outcome.is_milestone() {
        events.push(Celebration::Milestone {
            habit_id: habit_id.to_string(),
            streak: outcome.streak,
        });
    }
    events
}

pub trait Notifier: Send + Sync {
    fn notify_completion(&self, habit_id: &str);
    fn notify_milestone(&self, habit_id: &str, streak: u32);
    fn notify_goal_completed(&self, goal_id: &str);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify_completion(&self, habit_id: &str) {
        info!(habit_id, "habit checked in");
    }

    fn notify_milestone(&self, habit_id: &str, streak: u32) {
        info!(habit_id, streak, "milestone reached: {streak} day streak");
    }

    fn notify_goal_completed(&self, goal_id: &str) {
        info!(goal_id, "goal completed");
    }
}

pub fn dispatch(notifier: &dyn Notifier, events: &[Celebration]) {
    for event in events {
        match event {
            Celebration::Completion { habit_id } => notifier.notify_completion(habit_id),
            Celebration::Milestone { habit_id, streak } => {
                notifier.notify_milestone(habit_id, *streak)
            }
            Celebration::GoalCompleted { goal_id } => notifier.notify_goal_completed(goal_id),
        }
    }
}
