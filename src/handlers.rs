use crate::celebration::{Celebration, celebrations_for, dispatch};
use crate::dates::{day_key, parse_day, today};
use crate::errors::AppError;
use crate::models::{
    AppData, Goal, GoalRequest, GoalResponse, Habit, HabitHistory, HabitRequest, HistoryQuery,
    ImportRequest, ProgressRequest, StatsResponse, TodayResponse, ToggleRequest, ToggleResponse,
};
use crate::state::AppState;
use crate::stats::{build_stats, check_ins_on, habit_history};
use crate::storage::persist_data;
use crate::tracker::TrackerError;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use tracing::{error, info};

const DEFAULT_HISTORY_DAYS: u32 = 28;
const MAX_HISTORY_DAYS: u32 = 366;

pub async fn get_today(State(state): State<AppState>) -> Result<Json<TodayResponse>, AppError> {
    let date = today();
    let data = state.data.lock().await;

    Ok(Json(TodayResponse {
        date: day_key(date),
        completed: check_ins_on(&data, date),
        total: data.habits.len(),
    }))
}

pub async fn get_stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, AppError> {
    let data = state.data.lock().await;
    Ok(Json(build_stats(&data)))
}

pub async fn list_habits(State(state): State<AppState>) -> Json<Vec<Habit>> {
    let data = state.data.lock().await;
    Json(data.habits.clone())
}

pub async fn create_habit(
    State(state): State<AppState>,
    Json(payload): Json<HabitRequest>,
) -> Result<(StatusCode, Json<Habit>), AppError> {
    let now = Utc::now();
    let habit = commit(&state, |data| Ok(data.create_habit(payload, now)?.clone())).await?;

    info!(habit_id = %habit.id, "habit created");
    Ok((StatusCode::CREATED, Json(habit)))
}

pub async fn update_habit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<HabitRequest>,
) -> Result<Json<Habit>, AppError> {
    let habit = commit(&state, |data| Ok(data.update_habit(&id, payload)?.clone())).await?;
    Ok(Json(habit))
}

pub async fn delete_habit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    commit(&state, |data| data.delete_habit(&id)).await?;

    info!(habit_id = %id, "habit deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Flips one day for a habit. An empty body toggles today.
pub async fn toggle_habit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Option<Json<ToggleRequest>>,
) -> Result<Json<ToggleResponse>, AppError> {
    let request = payload.map(|Json(request)| request).unwrap_or_default();
    let date = match request.date.as_deref() {
        Some(value) => parse_day(value)?,
        None => today(),
    };

    let (outcome, habit) = commit(&state, |data| {
        let outcome = data.toggle_habit(&id, date)?;
        let habit = data.habit(&id).cloned().ok_or_else(|| TrackerError::NotFound {
            kind: "habit",
            id: id.clone(),
        })?;
        Ok((outcome, habit))
    })
    .await?;

    let celebrations = celebrations_for(&id, &outcome);
    dispatch(state.notifier.as_ref(), &celebrations);

    Ok(Json(ToggleResponse {
        habit,
        date: day_key(date),
        was_completed: outcome.was_completed,
        celebrations,
    }))
}

pub async fn import_completions(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ImportRequest>,
) -> Result<Json<Habit>, AppError> {
    let habit = commit(&state, |data| {
        Ok(data
            .import_completions(&id, payload.dates.iter().map(String::as_str))?
            .clone())
    })
    .await?;

    info!(
        habit_id = %id,
        imported = payload.dates.len(),
        streak = habit.streak,
        "completions imported"
    );
    Ok(Json(habit))
}

pub async fn get_habit_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HabitHistory>, AppError> {
    let days = query.days.unwrap_or(DEFAULT_HISTORY_DAYS);
    if days == 0 || days > MAX_HISTORY_DAYS {
        return Err(AppError::bad_request(format!(
            "days must be between 1 and {MAX_HISTORY_DAYS}"
        )));
    }

    let data = state.data.lock().await;
    let habit = data
        .habit(&id)
        .ok_or_else(|| AppError::not_found(format!("habit '{id}' not found")))?;
    Ok(Json(habit_history(habit, today(), days)))
}

/// Statuses are evaluated against the current time without touching state.
pub async fn list_goals(State(state): State<AppState>) -> Json<Vec<Goal>> {
    let data = state.data.lock().await;
    Json(data.goals_as_of(Utc::now()))
}

pub async fn create_goal(
    State(state): State<AppState>,
    Json(payload): Json<GoalRequest>,
) -> Result<(StatusCode, Json<Goal>), AppError> {
    let now = Utc::now();
    let goal = commit(&state, |data| Ok(data.create_goal(payload, now)?.clone())).await?;

    info!(goal_id = %goal.id, "goal created");
    Ok((StatusCode::CREATED, Json(goal)))
}

pub async fn update_goal(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<GoalRequest>,
) -> Result<Json<Goal>, AppError> {
    let now = Utc::now();
    let goal = commit(&state, |data| Ok(data.update_goal(&id, payload, now)?.clone())).await?;
    Ok(Json(goal))
}

pub async fn update_progress(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ProgressRequest>,
) -> Result<Json<GoalResponse>, AppError> {
    let (goal, newly_completed) = commit(&state, |data| {
        let (goal, newly_completed) = data.update_progress(&id, payload.progress)?;
        Ok((goal.clone(), newly_completed))
    })
    .await?;

    Ok(Json(goal_response(&state, goal, newly_completed)))
}

pub async fn complete_goal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GoalResponse>, AppError> {
    let (goal, newly_completed) = commit(&state, |data| {
        let (goal, newly_completed) = data.complete_goal(&id)?;
        Ok((goal.clone(), newly_completed))
    })
    .await?;

    Ok(Json(goal_response(&state, goal, newly_completed)))
}

pub async fn delete_goal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    commit(&state, |data| data.delete_goal(&id)).await?;

    info!(goal_id = %id, "goal deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Applies `change` to a copy of the document, persists the copy and only
/// then swaps it in. A failed write leaves memory as it was.
async fn commit<T, F>(state: &AppState, change: F) -> Result<T, AppError>
where
    F: FnOnce(&mut AppData) -> Result<T, TrackerError> + Send,
    T: Send,
{
    let mut data = state.data.lock().await;
    let mut staged = data.clone();
    let value = change(&mut staged)?;

    if let Err(err) = persist_data(&state.data_path, &staged).await {
        error!("failed to persist data, change discarded: {}", err.message);
        return Err(err);
    }

    *data = staged;
    Ok(value)
}

fn goal_response(state: &AppState, goal: Goal, newly_completed: bool) -> GoalResponse {
    let celebrations = if newly_completed {
        vec![Celebration::GoalCompleted {
            goal_id: goal.id.clone(),
        }]
    } else {
        Vec::new()
    };
    dispatch(state.notifier.as_ref(), &celebrations);

    GoalResponse { goal, celebrations }
}
