//! Compact command implementation.

use super::{CommandResult, Context};
use serde_json::json;

/// Rewrites the journal and reports the space saved.
pub fn run(ctx: &Context<'_>) -> CommandResult {
    let before = ctx.table.journal_size()?;
    ctx.table.compact()?;
    let after = ctx.table.journal_size()?;

    let saved = before.saturating_sub(after);
    let percent = if before > 0 {
        (saved as f64 / before as f64) * 100.0
    } else {
        0.0
    };
    ctx.emit(
        &format!(
            "Compacted journal: {before} -> {after} bytes ({saved} saved, {percent:.1}%)"
        ),
        &json!({ "bytes_before": before, "bytes_after": after }),
    )
}
