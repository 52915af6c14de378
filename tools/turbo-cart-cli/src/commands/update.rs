//! Change a product's amount.

use anyhow::Result;
use turbo_cart::UpdateProductAmount;

use super::UpdateArgs;
use crate::context::Context;

/// Run the update command.
pub async fn run(args: UpdateArgs, ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;

    let spinner = ctx
        .output
        .spinner(&format!("Checking stock for product {}...", args.id));
    let result = store
        .update_product_amount(UpdateProductAmount::new(args.id, args.amount))
        .await;
    spinner.finish_and_clear();
    let updated = result?;

    if ctx.output.is_json() {
        ctx.output.json(&updated);
        return Ok(());
    }

    match updated {
        Some(item) => ctx.output.success(&format!(
            "{} now has amount {}",
            super::display_name(&item.product),
            item.amount()
        )),
        None => ctx
            .output
            .warn("Amount must be at least 1; use `turbo-cart remove` to drop a product"),
    }

    Ok(())
}
