//! Budget utilization tracking.

pub mod service;
pub mod types;


pub use service::BudgetService;
pub use types::{BudgetOverview, BudgetStatus, BudgetSummary};
