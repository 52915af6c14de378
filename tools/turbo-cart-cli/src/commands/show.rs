//! List the cart.

use anyhow::Result;

use crate::context::Context;

const WIDTHS: [usize; 5] = [6, 36, 10, 5, 10];

/// Run the show command.
pub async fn run(ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;
    let cart = store.cart();

    if ctx.output.is_json() {
        ctx.output.json(&cart);
        return Ok(());
    }

    if cart.is_empty() {
        ctx.output.info("Your cart is empty.");
        ctx.output.info("Run `turbo-cart add <id>` to add a product.");
        return Ok(());
    }

    ctx.output.header("Cart");
    ctx.output
        .table_row(&["ID", "PRODUCT", "PRICE", "QTY", "SUBTOTAL"], &WIDTHS);

    let summary = store.summary()?;
    for item in &cart {
        let id = item.id().to_string();
        let name = super::display_name(&item.product);
        let price = item.product.price(store.currency())?.to_string();
        let amount = item.amount().to_string();
        let subtotal = summary
            .subtotal_for(item.id())
            .map(|m| m.to_string())
            .unwrap_or_default();
        ctx.output.table_row(
            &[
                id.as_str(),
                name.as_str(),
                price.as_str(),
                amount.as_str(),
                subtotal.as_str(),
            ],
            &WIDTHS,
        );
    }

    println!();
    ctx.output.kv("Total", &summary.total.to_string());

    Ok(())
}
