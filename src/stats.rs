use crate::dates::day_key;
use crate::models::{
    AppData, DailyPoint, DashboardStats, Goal, GoalStatus, Habit, HabitHistory, HabitStats,
    HistoryDay, StatsResponse, WeeklyPoint,
};
use crate::streak::{is_streak_active, longest_streak};
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use std::collections::BTreeMap;

pub fn build_stats(data: &AppData) -> StatsResponse {
    build_stats_at(crate::dates::today(), Utc::now(), data)
}

/// Goal statuses are evaluated at `now`, habit figures relative to `today`.
pub fn build_stats_at(today: NaiveDate, now: DateTime<Utc>, data: &AppData) -> StatsResponse {
    const WEEK_COUNT: usize = 8;

    let mut last_7_days = Vec::with_capacity(7);
    for offset in (0..7).rev() {
        let date = today - Duration::days(offset as i64);
        let completed = check_ins_on(data, date);
        last_7_days.push(DailyPoint {
            date: day_key(date),
            weekday: date.format("%a").to_string(),
            completed,
            total: data.habits.len(),
            percentage: rounded_percent(completed, data.habits.len()),
        });
    }

    let current_week_start = week_start(today);
    let mut weekly_totals = Vec::with_capacity(WEEK_COUNT);

    for offset in (0..WEEK_COUNT).rev() {
        let start = current_week_start - Duration::weeks(offset as i64);
        let end = start + Duration::days(6);

        let mut check_ins = 0usize;
        for day_offset in 0..7 {
            check_ins += check_ins_on(data, start + Duration::days(day_offset));
        }

        let days_counted = if today < start {
            0
        } else if today > end {
            7
        } else {
            (today - start).num_days() as u8 + 1
        };

        let denom = if days_counted == 0 { 1.0 } else { f64::from(days_counted) };

        weekly_totals.push(WeeklyPoint {
            week: week_label(start),
            start_date: day_key(start),
            end_date: day_key(end),
            check_ins,
            days_counted,
            avg_per_day: check_ins as f64 / denom,
        });
    }

    StatsResponse {
        dashboard: dashboard_stats(&data.goals_as_of(now), &data.habits),
        habits: habit_stats(today, data),
        last_7_days,
        weekly_totals,
    }
}

pub fn dashboard_stats(goals: &[Goal], habits: &[Habit]) -> DashboardStats {
    let total_goals = goals.len();
    let count_with = |status: GoalStatus| {
        goals
            .iter()
            .filter(|goal| goal.status == status)
            .count()
    };
    let completed_goals = count_with(GoalStatus::Completed);

    let mut goals_by_category = BTreeMap::new();
    for goal in goals {
        *goals_by_category.entry(goal.category.clone()).or_insert(0) += 1;
    }
    let progress_sum: usize = goals.iter().map(|goal| usize::from(goal.progress)).sum();

    DashboardStats {
        total_goals,
        completed_goals,
        completion_rate: rounded_percent(completed_goals, total_goals),
        current_streak: habits.iter().map(|habit| habit.streak).max().unwrap_or(0),
        overdue_goals: count_with(GoalStatus::Overdue),
        avg_progress: rounded_ratio(progress_sum, total_goals),
        goals_by_category,
    }
}

pub fn habit_stats(today: NaiveDate, data: &AppData) -> HabitStats {
    let habits = &data.habits;
    let total_streaks: u32 = habits.iter().map(|habit| habit.streak).sum();
    HabitStats {
        total: habits.len(),
        completed_today: check_ins_on(data, today),
        longest_streak: habits.iter().map(|habit| habit.streak).max().unwrap_or(0),
        total_streaks,
        active_streaks: habits
            .iter()
            .filter(|habit| is_streak_active(&habit.completed_dates, today))
            .count(),
        avg_streak: rounded_ratio(total_streaks as usize, habits.len()),
        best_streak_ever: habits
            .iter()
            .map(|habit| longest_streak(&habit.completed_dates))
            .max()
            .unwrap_or(0),
    }
}

pub fn check_ins_on(data: &AppData, date: NaiveDate) -> usize {
    data.habits
        .iter()
        .filter(|habit| habit.completed_dates.contains(&date))
        .count()
}

/// One entry per day for the `days` days ending at `today`, oldest first.
pub fn habit_history(habit: &Habit, today: NaiveDate, days: u32) -> HabitHistory {
    let days: Vec<HistoryDay> = (0..i64::from(days))
        .rev()
        .map(|offset| {
            let date = today - Duration::days(offset);
            HistoryDay {
                date: day_key(date),
                completed: habit.completed_dates.contains(&date),
            }
        })
        .collect();

    HabitHistory {
        habit_id: habit.id.clone(),
        streak: habit.streak,
        completed_days: days.iter().filter(|day| day.completed).count(),
        days,
    }
}

fn rounded_ratio(sum: usize, count: usize) -> u32 {
    if count == 0 {
        0
    } else {
        (sum as f64 / count as f64).round() as u32
    }
}

fn rounded_percent(part: usize, whole: usize) -> u32 {
    rounded_ratio(part * 100, whole)
}

fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

fn week_label(date: NaiveDate) -> String {
    let iso = date.iso_week();
    format!("{}-W{:02}", iso.year(), iso.week())
}
