//! Core business logic for Clarity.
//!
//! This crate contains pure business logic with ZERO network or storage dependencies.
//! All domain records, validation rules, and aggregate calculations live here.
//!
//! # Modules
//!
//! - `models` - Accounts, categories, transactions, budgets, recurring payments
//! - `validation` - Input validation shared by the create and update paths
//! - `period` - Month keys, budget periods, and payment frequencies
//! - `budget` - Budget utilization tracking
//! - `reports` - Monthly totals, category spending, and the dashboard
//! - `calendar` - Per-day grouping and month grids
//! - `filter` - Transaction search
//! - `defaults` - The default category set

pub mod budget;
pub mod calendar;
pub mod defaults;
pub mod filter;
pub mod models;
pub mod period;
pub mod reports;
pub mod validation;

#[cfg(test)]
mod fixtures;
