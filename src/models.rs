use crate::celebration::Celebration;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    #[default]
    Daily,
    Weekly,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Habit {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub frequency: Frequency,
    pub color: String,
    pub icon: String,
    /// Cached; always recomputed from `completed_dates`.
    #[serde(default)]
    pub streak: u32,
    #[serde(default)]
    pub completed_dates: BTreeSet<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum GoalStatus {
    #[default]
    InProgress,
    Completed,
    Overdue,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Goal {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: String,
    pub progress: u8,
    pub deadline: DateTime<Utc>,
    #[serde(default)]
    pub status: GoalStatus,
    pub color: String,
    pub icon: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AppData {
    #[serde(default)]
    pub goals: Vec<Goal>,
    #[serde(default)]
    pub habits: Vec<Habit>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HabitRequest {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub frequency: Frequency,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "default_habit_icon")]
    pub icon: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoalRequest {
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub deadline: DateTime<Utc>,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "default_goal_icon")]
    pub icon: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ToggleRequest {
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    pub dates: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub days: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct ProgressRequest {
    pub progress: u8,
}

#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub habit: Habit,
    pub date: String,
    pub was_completed: bool,
    pub celebrations: Vec<Celebration>,
}

#[derive(Debug, Serialize)]
pub struct GoalResponse {
    pub goal: Goal,
    pub celebrations: Vec<Celebration>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TodayResponse {
    pub date: String,
    pub completed: usize,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub total_goals: usize,
    pub completed_goals: usize,
    pub completion_rate: u32,
    pub current_streak: u32,
    pub overdue_goals: usize,
    pub avg_progress: u32,
    pub goals_by_category: BTreeMap<String, usize>,
}

#[derive(Debug, Serialize)]
pub struct HabitStats {
    pub total: usize,
    pub completed_today: usize,
    pub longest_streak: u32,
    pub total_streaks: u32,
    pub active_streaks: usize,
    pub avg_streak: u32,
    pub best_streak_ever: u32,
}

#[derive(Debug, Serialize)]
pub struct DailyPoint {
    pub date: String,
    pub weekday: String,
    pub completed: usize,
    pub total: usize,
    pub percentage: u32,
}

#[derive(Debug, Serialize)]
pub struct HistoryDay {
    pub date: String,
    pub completed: bool,
}

#[derive(Debug, Serialize)]
pub struct HabitHistory {
    pub habit_id: String,
    pub streak: u32,
    pub completed_days: usize,
    pub days: Vec<HistoryDay>,
}

#[derive(Debug, Serialize)]
pub struct WeeklyPoint {
    pub week: String,
    pub start_date: String,
    pub end_date: String,
    pub check_ins: usize,
    pub days_counted: u8,
    pub avg_per_day: f64,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub dashboard: DashboardStats,
    pub habits: HabitStats,
    pub last_7_days: Vec<DailyPoint>,
    pub weekly_totals: Vec<WeeklyPoint>,
}

fn default_color() -> String {
    "#60A5FA".to_string()
}

fn default_habit_icon() -> String {
    "✅".to_string()
}

fn default_goal_icon() -> String {
    "🎯".to_string()
}
