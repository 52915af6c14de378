//! Cart totals.

use anyhow::Result;

use crate::context::Context;

/// Run the summary command.
pub async fn run(ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;
    let summary = store.summary()?;

    if ctx.output.is_json() {
        ctx.output.json(&summary);
        return Ok(());
    }

    ctx.output.header("Cart summary");
    ctx.output.kv("Products", &summary.distinct_items.to_string());
    ctx.output.kv("Items", &summary.total_quantity.to_string());
    ctx.output.kv("Total", &summary.total.to_string());
    ctx.output.kv("Currency", &store.currency().to_string());

    Ok(())
}
