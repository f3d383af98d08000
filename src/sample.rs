use crate::models::{AppData, Frequency, Goal, GoalStatus, Habit};
use crate::streak::current_streak;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::collections::BTreeSet;

/// Starter content for a brand new data file.
pub fn sample_data(today: NaiveDate, now: DateTime<Utc>) -> AppData {
    let goals = vec![
        sample_goal(
            (
                "1",
                "Learn React & TypeScript",
                "Master modern web development with React and TypeScript",
            ),
            "Learning",
            65,
            (30, 15),
            ("#60A5FA", "📚"),
            now,
        ),
        sample_goal(
            ("2", "Run a Marathon", "Complete a full 42km marathon race"),
            "Health",
            40,
            (90, 20),
            ("#34D399", "🏃"),
            now,
        ),
        sample_goal(
            ("3", "Save $10,000", "Build an emergency fund"),
            "Finance",
            75,
            (60, 45),
            ("#FBBF24", "💰"),
            now,
        ),
    ];

    let habits = vec![
        sample_habit(
            ("1", "Morning Meditation", "10 minutes of mindfulness meditation"),
            ("#A78BFA", "🧘"),
            today,
            12,
            now,
        ),
        sample_habit(
            ("2", "Read for 30 minutes", "Read books or articles"),
            ("#F472B6", "📖"),
            today,
            5,
            now,
        ),
        sample_habit(
            ("3", "Exercise", "30 minutes of physical activity"),
            ("#34D399", "💪"),
            today,
            3,
            now,
        ),
    ];

    AppData { goals, habits }
}

fn sample_goal(
    (id, title, description): (&str, &str, &str),
    category: &str,
    progress: u8,
    (due_in_days, created_days_ago): (i64, i64),
    (color, icon): (&str, &str),
    now: DateTime<Utc>,
) -> Goal {
    Goal {
        id: id.to_string(),
        title: title.to_string(),
        description: Some(description.to_string()),
        category: category.to_string(),
        progress,
        deadline: now + Duration::days(due_in_days),
        status: GoalStatus::InProgress,
        color: color.to_string(),
        icon: icon.to_string(),
        created_at: now - Duration::days(created_days_ago),
    }
}

fn sample_habit(
    (id, name, description): (&str, &str, &str),
    (color, icon): (&str, &str),
    today: NaiveDate,
    run_length: i64,
    now: DateTime<Utc>,
) -> Habit {
    let completed_dates: BTreeSet<NaiveDate> = (0..run_length)
        .map(|offset| today - Duration::days(offset))
        .collect();
    Habit {
        id: id.to_string(),
        name: name.to_string(),
        description: Some(description.to_string()),
        frequency: Frequency::Daily,
        color: color.to_string(),
        icon: icon.to_string(),
        streak: current_streak(&completed_dates),
        completed_dates,
        created_at: now - Duration::days(run_length),
    }
}
