//! Domain records owned by a single identity.
//!
//! Each record type comes with a `New*` create input and a `*Patch` sparse
//! update. Inputs carry no identity or generated fields (id, timestamps); the
//! data layer adds the owning identity when writing.

pub mod account;
pub mod budget;
pub mod category;
pub mod recurring;
pub mod transaction;

pub use account::{Account, AccountPatch, AccountType, NewAccount};
pub use budget::{Budget, BudgetPatch, NewBudget};
pub use category::{Category, CategoryPatch, NewCategory};
pub use recurring::{NewRecurringPayment, RecurringPayment, RecurringPaymentPatch};
pub use transaction::{NewTransaction, Transaction, TransactionPatch, TransactionType};

/// Currency used when none is given.
pub const DEFAULT_CURRENCY: &str = "RON";
