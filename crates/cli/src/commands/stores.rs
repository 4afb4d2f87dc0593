//! Store search, stock lookups and directions.

use std::io::{self, Write};

use findmystore_core::StoreId;

use super::{CliError, Context, non_empty, query_for, require_product};
use crate::{ScopeArgs, render};

/// Fetch stores for a city (default city when none is given) and list them.
///
/// # Errors
///
/// Returns an error if the Maps lookup fails.
pub async fn list(ctx: &mut Context, scope: &ScopeArgs) -> Result<(), CliError> {
    let city = non_empty(scope.city.as_deref()).unwrap_or(&ctx.config.default_city);
    let query = query_for(city, scope);
    let stores = ctx.session.fetch_stores(&ctx.directory, &query).await?;

    render::stores(&mut io::stdout().lock(), &stores)?;
    Ok(())
}

/// Show stock and price of `product` at one store.
///
/// # Errors
///
/// Returns an error if the product is blank or the Maps lookup fails.
pub async fn stock(
    ctx: &mut Context,
    scope: &ScopeArgs,
    store_id: i32,
    product: &str,
) -> Result<(), CliError> {
    let product = require_product(product)?;
    ctx.refresh(scope).await?;

    let info = ctx.session.check_stock(StoreId::new(store_id), product);
    render::stock(&mut io::stdout().lock(), &info, ctx.config.currency)?;
    Ok(())
}

/// Print a driving-directions link to a store.
///
/// # Errors
///
/// Returns `StoreNotFound` if the store is not in the search space.
pub async fn directions(
    ctx: &mut Context,
    scope: &ScopeArgs,
    store_id: i32,
    origin: Option<&str>,
) -> Result<(), CliError> {
    ctx.refresh(scope).await?;

    let link = ctx
        .session
        .directions(StoreId::new(store_id), origin)
        .ok_or(CliError::StoreNotFound)?;
    writeln!(io::stdout().lock(), "{link}")?;
    Ok(())
}
