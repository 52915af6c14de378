//! Remove a product.

use anyhow::Result;

use super::ProductArgs;
use crate::context::Context;

/// Run the remove command.
pub async fn run(args: ProductArgs, ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;
    let item = store.remove_product(args.id).await?;

    if ctx.output.is_json() {
        ctx.output.json(&item);
    } else {
        ctx.output
            .success(&format!("Removed {} from the cart", super::display_name(&item.product)));
    }

    Ok(())
}
