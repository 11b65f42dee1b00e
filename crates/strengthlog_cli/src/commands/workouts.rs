//! Workout commands.

use super::{CommandResult, Context};
use serde_json::json;
use std::fmt::Write;
use strengthlog_core::{filter_workouts, Workout, WorkoutsFilterType};
use strengthlog_sync::SyncError;

/// Creates a workout.
pub async fn add(ctx: &Context<'_>, title: &str, description: &str) -> CommandResult {
    reject_blank(title, description)?;
    let id = ctx.repository.create_workout(title, description).await?;
    ctx.emit(&format!("Workout added: {id}"), &json!({ "id": id }))
}

/// Changes a workout's title and description.
pub async fn edit(ctx: &Context<'_>, id: &str, title: &str, description: &str) -> CommandResult {
    reject_blank(title, description)?;
    ctx.repository.update_workout(id, title, description).await?;
    ctx.emit("Workout saved", &json!({ "id": id }))
}

/// Lists workouts passing `filter`.
pub async fn list(ctx: &Context<'_>, filter: WorkoutsFilterType, refresh: bool) -> CommandResult {
    let workouts = ctx.repository.get_workouts(refresh).await?;
    let shown = filter_workouts(&workouts, filter);
    ctx.emit(&render_list(&shown, filter), &shown)
}

/// Shows one workout.
pub async fn show(ctx: &Context<'_>, id: &str, refresh: bool) -> CommandResult {
    let workout = ctx
        .repository
        .get_workout(id, refresh)
        .await?
        .ok_or_else(|| SyncError::not_found(id))?;
    ctx.emit(&render_detail(&workout), &workout)
}

/// Completes or reactivates a workout.
pub async fn set_completed(ctx: &Context<'_>, id: &str, completed: bool) -> CommandResult {
    if completed {
        ctx.repository.complete_workout(id).await?;
        ctx.emit("Workout marked complete", &json!({ "id": id, "completed": true }))
    } else {
        ctx.repository.activate_workout(id).await?;
        ctx.emit("Workout marked active", &json!({ "id": id, "completed": false }))
    }
}

/// Deletes one workout.
pub async fn delete(ctx: &Context<'_>, id: &str) -> CommandResult {
    ctx.repository.delete_workout(id).await?;
    ctx.emit("Workout deleted", &json!({ "id": id }))
}

/// Deletes completed workouts.
pub async fn clear_completed(ctx: &Context<'_>) -> CommandResult {
    ctx.repository.clear_completed_workouts().await?;
    ctx.emit("Completed workouts cleared", &json!({}))
}

/// Deletes every workout.
pub async fn delete_all(ctx: &Context<'_>) -> CommandResult {
    ctx.repository.delete_all_workouts().await?;
    ctx.emit("All workouts deleted", &json!({}))
}

/// Pulls the remote collection.
pub async fn refresh(ctx: &Context<'_>) -> CommandResult {
    ctx.repository.refresh().await?;
    let count = ctx.repository.get_workouts(false).await?.len();
    ctx.emit(
        &format!("Refreshed {count} workouts from remote"),
        &json!({ "count": count }),
    )
}

fn reject_blank(title: &str, description: &str) -> CommandResult {
    if title.trim().is_empty() && description.trim().is_empty() {
        return Err("workouts cannot be empty".into());
    }
    Ok(())
}

fn empty_message(filter: WorkoutsFilterType) -> &'static str {
    match filter {
        WorkoutsFilterType::AllWorkouts => "You have no workouts!",
        WorkoutsFilterType::ActiveWorkouts => "You have no active workouts!",
        WorkoutsFilterType::CompletedWorkouts => "You have no completed workouts!",
    }
}

fn render_list(workouts: &[Workout], filter: WorkoutsFilterType) -> String {
    if workouts.is_empty() {
        return empty_message(filter).to_string();
    }
    let mut out = String::new();
    for workout in workouts {
        let mark = if workout.is_completed { 'x' } else { ' ' };
        let _ = writeln!(out, "[{mark}] {}  ({})", workout.title_for_list(), workout.id);
    }
    out.truncate(out.trim_end().len());
    out
}

fn render_detail(workout: &Workout) -> String {
    let status = if workout.is_completed { "completed" } else { "active" };
    format!(
        "{}\n  id:          {}\n  status:      {status}\n  description: {}",
        workout.title, workout.id, workout.description
    )
}
