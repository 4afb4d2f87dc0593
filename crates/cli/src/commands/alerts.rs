//! Restock alerts (demo).

use std::io::{self, Write};

use findmystore_core::StoreId;

use super::{CliError, Context, non_empty, require_product};
use crate::render;

/// Subscribe to alerts for a product in a city.
///
/// # Errors
///
/// Returns an error if the product is blank.
pub fn subscribe(ctx: &mut Context, product: &str, city: Option<&str>) -> Result<(), CliError> {
    let product = require_product(product)?;
    let city = non_empty(city).unwrap_or(&ctx.config.default_city);

    let message = ctx.session.subscribe(product, city);
    writeln!(io::stdout().lock(), "{message}")?;
    Ok(())
}

/// Add stock for a product at a store.
///
/// # Errors
///
/// Returns an error if the product is blank.
pub fn restock(
    ctx: &mut Context,
    store_id: i32,
    product: &str,
    quantity: Option<u32>,
) -> Result<(), CliError> {
    let product = require_product(product)?;

    let report = ctx
        .session
        .simulate_restock(product, StoreId::new(store_id), quantity);
    render::restock(&mut io::stdout().lock(), &report, ctx.config.currency)?;
    Ok(())
}
