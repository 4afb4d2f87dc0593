//! Finder tool definitions and executor for Claude tool use.
//!
//! Each tool takes a structured JSON object; inputs are deserialized into
//! typed structs before anything runs, so malformed calls are reported back
//! to the model as tool errors.

use findmystore_core::{Category, Store, StoreId};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::instrument;

use crate::maps;
use crate::services::pricing;
use crate::services::registry::{DEFAULT_RADIUS_KM, StoreDirectory, StoreQuery};
use crate::services::session::FinderSession;

use super::error::ClaudeError;
use super::types::Tool;

/// Tools available to the shopping assistant.
#[must_use]
pub fn finder_tools() -> Vec<Tool> {
    let categories: Vec<&str> = Category::SEARCHABLE.iter().map(Category::as_str).collect();

    vec![
        Tool {
            name: "find_stores".to_string(),
            description: "Find stores in a city, optionally filtered by category. The result becomes the current store set used by the other tools.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "city": {
                        "type": "string",
                        "description": "City to search in (defaults to the configured city)"
                    },
                    "category": {
                        "type": "string",
                        "enum": categories,
                        "description": "Store category"
                    },
                    "radius_km": {
                        "type": "number",
                        "description": "Search radius in kilometres (default 6)",
                        "minimum": 0
                    },
                    "open_now": {
                        "type": "boolean",
                        "description": "Only stores open right now (needs a category)"
                    }
                }
            }),
        },
        Tool {
            name: "check_inventory".to_string(),
            description: "Check the quantity and price of a product at one store.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "store_id": {"type": "integer", "description": "Store ID from find_stores"},
                    "product": {"type": "string", "description": "Product name"}
                },
                "required": ["store_id", "product"]
            }),
        },
        Tool {
            name: "find_cheapest".to_string(),
            description: "Find the store with the lowest price for a product that is in stock.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "product": {"type": "string", "description": "Product name"},
                    "max_price": {"type": "number", "description": "Ignore offers above this price"}
                },
                "required": ["product"]
            }),
        },
        Tool {
            name: "optimize_shopping_list".to_string(),
            description: "Plan which stores to visit to buy a whole shopping list cheaply. Returns per-store items, subtotals, items not found and the total.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "items": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": "Product names"
                    }
                },
                "required": ["items"]
            }),
        },
        Tool {
            name: "get_directions".to_string(),
            description: "Get a Google Maps driving directions link to a store.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "store_id": {"type": "integer", "description": "Store ID"},
                    "origin": {"type": "string", "description": "Starting address or place"}
                },
                "required": ["store_id"]
            }),
        },
        Tool {
            name: "subscribe_alert".to_string(),
            description: "Subscribe to restock alerts for a product in a city.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "product": {"type": "string", "description": "Product name"},
                    "city": {"type": "string", "description": "City"}
                },
                "required": ["product", "city"]
            }),
        },
    ]
}

// =============================================================================
// Tool Inputs
// =============================================================================

#[derive(Debug, Deserialize)]
struct FindStoresInput {
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    radius_km: Option<f64>,
    #[serde(default)]
    open_now: bool,
}

#[derive(Debug, Deserialize)]
struct CheckInventoryInput {
    store_id: StoreId,
    product: String,
}

#[derive(Debug, Deserialize)]
struct FindCheapestInput {
    product: String,
    #[serde(default)]
    max_price: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
struct OptimizeInput {
    items: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct DirectionsInput {
    store_id: StoreId,
    #[serde(default)]
    origin: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SubscribeInput {
    product: String,
    city: String,
}

// =============================================================================
// ToolExecutor
// =============================================================================

/// Executor for finder tools.
///
/// Runs every tool against one session.
pub struct ToolExecutor<'a> {
    session: &'a mut FinderSession,
    directory: &'a StoreDirectory,
    default_city: &'a str,
}

impl<'a> ToolExecutor<'a> {
    #[must_use]
    pub const fn new(
        session: &'a mut FinderSession,
        directory: &'a StoreDirectory,
        default_city: &'a str,
    ) -> Self {
        Self {
            session,
            directory,
            default_city,
        }
    }

    /// Execute a tool and return the result as a string.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown tools, invalid input, or failed lookups.
    #[instrument(skip(self, input), fields(tool_name = %name))]
    pub async fn execute(
        &mut self,
        name: &str,
        input: &serde_json::Value,
    ) -> Result<String, ClaudeError> {
        match name {
            "find_stores" => self.find_stores(parse_input(name, input)?).await,
            "check_inventory" => self.check_inventory(parse_input(name, input)?),
            "find_cheapest" => self.find_cheapest(parse_input(name, input)?),
            "optimize_shopping_list" => self.optimize(parse_input(name, input)?),
            "get_directions" => Ok(self.directions(parse_input(name, input)?)),
            "subscribe_alert" => {
                let input: SubscribeInput = parse_input(name, input)?;
                Ok(self.session.subscribe(&input.product, &input.city))
            }
            _ => Err(ClaudeError::ToolExecution(format!("Unknown tool: {name}"))),
        }
    }

    async fn find_stores(&mut self, input: FindStoresInput) -> Result<String, ClaudeError> {
        let category = input
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::parse::<Category>)
            .transpose()
            .map_err(|e| ClaudeError::ToolExecution(e.to_string()))?;
        let city = input
            .city
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(self.default_city);

        let query = StoreQuery::new(city)
            .with_category(category)
            .with_radius_km(input.radius_km.unwrap_or(DEFAULT_RADIUS_KM))
            .with_open_now(input.open_now);

        let stores = self
            .session
            .fetch_stores(self.directory, &query)
            .await
            .map_err(|e| ClaudeError::ToolExecution(format!("Failed to find stores: {e}")))?;

        to_json(&summarize_stores(&stores))
    }

    fn check_inventory(&mut self, input: CheckInventoryInput) -> Result<String, ClaudeError> {
        let info = self.session.check_stock(input.store_id, &input.product);
        to_json(&info)
    }

    fn find_cheapest(&mut self, input: FindCheapestInput) -> Result<String, ClaudeError> {
        match self.session.find_cheapest(&input.product, input.max_price) {
            Some(offer) => to_json(&offer),
            None => {
                let message = pricing::not_found_message(input.product.trim());
                to_json(&json!({ "message": message }))
            }
        }
    }

    fn optimize(&mut self, input: OptimizeInput) -> Result<String, ClaudeError> {
        to_json(&self.session.optimize(&input.items))
    }

    fn directions(&self, input: DirectionsInput) -> String {
        self.session
            .directions(input.store_id, input.origin.as_deref())
            .unwrap_or_else(|| "Store not found.".to_string())
    }
}

fn parse_input<T: DeserializeOwned>(
    tool: &str,
    input: &serde_json::Value,
) -> Result<T, ClaudeError> {
    serde_json::from_value(input.clone())
        .map_err(|e| ClaudeError::ToolExecution(format!("Invalid input for {tool}: {e}")))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, ClaudeError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| ClaudeError::ToolExecution(format!("Failed to serialize result: {e}")))
}

/// Summarize stores to minimize token usage.
fn summarize_stores(stores: &[Store]) -> serde_json::Value {
    let summaries: Vec<serde_json::Value> = stores
        .iter()
        .map(|s| {
            json!({
                "id": s.id,
                "name": s.name,
                "category": s.category,
                "rating": s.rating,
                "verified": s.verified,
                "hours": s.hours,
                "address": s.address,
                "map": maps::place_link(s),
            })
        })
        .collect();

    json!({
        "count": summaries.len(),
        "stores": summaries,
    })
}

#[cfg(test)]
mod tests {
    use findmystore_core::SessionId;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn session() -> FinderSession {
        FinderSession::new(SessionId::generate(), StdRng::seed_from_u64(4))
    }

    #[test]
    fn test_finder_tools_names() {
        let tools = finder_tools();
        let names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "find_stores",
                "check_inventory",
                "find_cheapest",
                "optimize_shopping_list",
                "get_directions",
                "subscribe_alert",
            ]
        );
        for tool in tools {
            assert_eq!(tool.input_schema.get("type"), Some(&json!("object")));
        }
    }

    #[tokio::test]
    async fn test_find_stores_defaults_city_and_updates_session() {
        let mut session = session();
        let directory = StoreDirectory::offline();
        let mut executor = ToolExecutor::new(&mut session, &directory, "Hyderabad");

        let result = executor
            .execute("find_stores", &json!({"category": "Electronics"}))
            .await
            .expect("find_stores");
        let value: serde_json::Value = serde_json::from_str(&result).expect("json");
        assert_eq!(value["count"], 1);
        assert_eq!(value["stores"][0]["name"], "ElectroHub Secunderabad");

        assert_eq!(session.stores().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_category_is_rejected() {
        let mut session = session();
        let directory = StoreDirectory::offline();
        let mut executor = ToolExecutor::new(&mut session, &directory, "Hyderabad");

        let err = executor
            .execute("find_stores", &json!({"category": "jewellery"}))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "tool execution error: unknown store category: jewellery"
        );
    }

    #[tokio::test]
    async fn test_check_inventory_requires_typed_input() {
        let mut session = session();
        let directory = StoreDirectory::offline();
        let mut executor = ToolExecutor::new(&mut session, &directory, "Hyderabad");

        let ok = executor
            .execute("check_inventory", &json!({"store_id": 1, "product": "Rice 10kg"}))
            .await
            .expect("check_inventory");
        let value: serde_json::Value = serde_json::from_str(&ok).expect("json");
        assert_eq!(value["qty"], 8);

        let err = executor
            .execute("check_inventory", &json!({"product": "Rice 10kg"}))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Invalid input for check_inventory"));
    }

    #[tokio::test]
    async fn test_find_cheapest_not_found_message() {
        let mut session = session();
        let directory = StoreDirectory::offline();
        let mut executor = ToolExecutor::new(&mut session, &directory, "Hyderabad");

        let result = executor
            .execute("find_cheapest", &json!({"product": "XYZ Shampoo", "max_price": 1}))
            .await
            .expect("find_cheapest");
        assert!(result.contains("No available 'XYZ Shampoo' found within criteria."));
    }

    #[tokio::test]
    async fn test_directions_and_subscribe() {
        let mut session = session();
        let directory = StoreDirectory::offline();
        let mut executor = ToolExecutor::new(&mut session, &directory, "Hyderabad");

        let missing = executor
            .execute("get_directions", &json!({"store_id": 42}))
            .await
            .expect("get_directions");
        assert_eq!(missing, "Store not found.");

        let link = executor
            .execute("get_directions", &json!({"store_id": 2, "origin": "Begumpet"}))
            .await
            .expect("get_directions");
        assert!(link.starts_with("https://www.google.com/maps/dir/?api=1"));

        let message = executor
            .execute("subscribe_alert", &json!({"product": "USB Cable", "city": "Hyderabad"}))
            .await
            .expect("subscribe_alert");
        assert_eq!(message, "Subscribed to 'USB Cable' alerts in Hyderabad (demo).");
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let mut session = session();
        let directory = StoreDirectory::offline();
        let mut executor = ToolExecutor::new(&mut session, &directory, "Hyderabad");

        let err = executor.execute("teleport", &json!({})).await.unwrap_err();
        assert_eq!(err.to_string(), "tool execution error: Unknown tool: teleport");
    }
}
