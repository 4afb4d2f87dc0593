//! Cheapest-offer search and price comparison.

use std::io;

use rust_decimal::Decimal;

use super::{CliError, Context, require_product};
use crate::{ScopeArgs, render};

/// Find the cheapest in-stock offer for `product`.
///
/// # Errors
///
/// Returns an error if the product is blank or the Maps lookup fails.
pub async fn cheapest(
    ctx: &mut Context,
    scope: &ScopeArgs,
    product: &str,
    max_price: Option<Decimal>,
) -> Result<(), CliError> {
    let product = require_product(product)?;
    ctx.refresh(scope).await?;

    let offer = ctx.session.find_cheapest(product, max_price);
    render::cheapest(
        &mut io::stdout().lock(),
        product,
        offer.as_ref(),
        ctx.config.currency,
    )?;
    Ok(())
}

/// Compare `product` across every store in the search space.
///
/// # Errors
///
/// Returns an error if the product is blank or the Maps lookup fails.
pub async fn compare(ctx: &mut Context, scope: &ScopeArgs, product: &str) -> Result<(), CliError> {
    let product = require_product(product)?;
    ctx.refresh(scope).await?;

    let comparison = ctx.session.compare_prices(product);
    render::comparison(&mut io::stdout().lock(), &comparison, ctx.config.currency)?;
    Ok(())
}
