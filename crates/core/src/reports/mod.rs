//! Derived financial aggregates.
//!
//! Pure computations over collection snapshots:
//! - Monthly and period income/expense totals
//! - Category spending for a month
//! - Recurring payment totals
//! - Account balances by currency
//! - The dashboard snapshot

pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use service::{ReportService, Snapshots};
pub use types::*;
