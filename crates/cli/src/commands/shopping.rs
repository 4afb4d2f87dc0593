//! Shopping-list optimization.
//!
//! Lists come from a comma-separated argument or a YAML file holding either a
//! plain sequence or an `items:` key:
//!
//! ```yaml
//! items:
//!   - Milk Lotion
//!   - XYZ Shampoo
//! ```

use std::io;
use std::path::Path;

use serde::Deserialize;

use super::{CliError, Context};
use crate::{ScopeArgs, render};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListFile {
    Items(Vec<String>),
    Wrapped { items: Vec<String> },
}

/// Split a comma-separated list. Blank entries are dropped later by the
/// optimizer.
#[must_use]
pub fn split_items(items: &str) -> Vec<String> {
    items.split(',').map(str::to_string).collect()
}

/// Parse a YAML shopping list.
///
/// # Errors
///
/// Returns an error if the document is neither a list of strings nor a map
/// with an `items` list.
pub fn parse_list(yaml: &str) -> Result<Vec<String>, serde_yaml::Error> {
    if yaml.trim().is_empty() {
        return Ok(Vec::new());
    }
    let (ListFile::Items(items) | ListFile::Wrapped { items }) = serde_yaml::from_str(yaml)?;
    Ok(items)
}

/// Read and parse a YAML shopping-list file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn read_list_file(path: &Path) -> Result<Vec<String>, CliError> {
    let yaml = std::fs::read_to_string(path)?;
    parse_list(&yaml).map_err(|source| CliError::ShoppingList {
        path: path.display().to_string(),
        source,
    })
}

/// Plan the cheapest set of store visits for `items`.
///
/// # Errors
///
/// Returns an error if the Maps lookup fails.
pub async fn optimize(
    ctx: &mut Context,
    scope: &ScopeArgs,
    items: &[String],
) -> Result<(), CliError> {
    ctx.refresh(scope).await?;

    let outcome = ctx.session.optimize(items);
    let stores = ctx.session.search_space();
    render::shopping_plan(
        &mut io::stdout().lock(),
        &outcome,
        &stores,
        ctx.config.currency,
    )?;
    Ok(())
}
