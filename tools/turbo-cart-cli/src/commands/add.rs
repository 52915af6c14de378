//! Add a product.

use anyhow::Result;

use super::ProductArgs;
use crate::context::Context;

/// Run the add command.
pub async fn run(args: ProductArgs, ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;

    let spinner = ctx
        .output
        .spinner(&format!("Checking stock for product {}...", args.id));
    let result = store.add_product(args.id).await;
    spinner.finish_and_clear();
    let item = result?;

    if ctx.output.is_json() {
        ctx.output.json(&item);
    } else {
        ctx.output.success(&format!(
            "Added {} ({} in cart)",
            super::display_name(&item.product),
            item.amount()
        ));
    }

    Ok(())
}
