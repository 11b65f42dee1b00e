//! Statistics command.

use super::{CommandResult, Context};
use strengthlog_core::{active_and_completed_stats, StatsResult};

/// Prints the active/completed split.
pub async fn run(ctx: &Context<'_>, refresh: bool) -> CommandResult {
    let workouts = ctx.repository.get_workouts(refresh).await?;
    let stats = active_and_completed_stats(&workouts);
    ctx.emit(&render(workouts.is_empty(), &stats), &stats)
}

fn render(empty: bool, stats: &StatsResult) -> String {
    if empty {
        return "You have no workouts.".to_string();
    }
    format!(
        "Active workouts: {:.1}%\nCompleted workouts: {:.1}%",
        stats.active_workouts_percent, stats.completed_workouts_percent
    )
}
