//! Business logic services.
//!
//! Services hold the finder semantics; HTTP handlers, the CLI and the agent
//! tools are thin wrappers around [`session::FinderSession`].

pub mod agent;
pub mod alerts;
pub mod inventory;
pub mod optimizer;
pub mod pricing;
pub mod registry;
pub mod session;

pub use agent::{AgentError, AgentService, MAX_TOOL_ITERATIONS};
pub use alerts::{AlertRegistry, RestockReport, Subscription};
pub use inventory::{Inventory, InventoryEntry, StockInfo};
pub use optimizer::{PlanEntry, ShoppingListOutcome, ShoppingPlan};
pub use pricing::{CheapestOffer, ComparisonRow, PriceComparison};
pub use registry::{StoreDirectory, StoreQuery};
pub use session::{FinderSession, SessionStore, SharedSession, TranscriptTurn};
