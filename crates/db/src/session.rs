//! Identity gate over the entity collections.
//!
//! The session owns one repository per entity and fans identity changes out
//! to all of them. Operations spanning several collections live here.

use std::sync::Arc;

use chrono::NaiveDate;
use clarity_core::models::{RecurringPayment, Transaction};
use clarity_core::reports::{Dashboard, ReportService, Snapshots};
use clarity_shared::types::{AccountId, CategoryId, RecurringPaymentId, UserId};
use clarity_shared::{AppError, AppResult};
use tokio::sync::Mutex;
use tracing::info;

use crate::repositories::{
    AccountRepository, BudgetRepository, CategoryRepository, RecurringPaymentRepository,
    TransactionRepository,
};
use crate::store::RecordStore;

/// The signed-in identity and its collections.
#[derive(Debug)]
pub struct Session {
    identity: Mutex<Option<UserId>>,
    accounts: AccountRepository,
    categories: CategoryRepository,
    transactions: TransactionRepository,
    budgets: BudgetRepository,
    recurring_payments: RecurringPaymentRepository,
}

impl Session {
    /// Creates a signed-out session over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            identity: Mutex::new(None),
            accounts: AccountRepository::new(Arc::clone(&store)),
            categories: CategoryRepository::new(Arc::clone(&store)),
            transactions: TransactionRepository::new(Arc::clone(&store)),
            budgets: BudgetRepository::new(Arc::clone(&store)),
            recurring_payments: RecurringPaymentRepository::new(store),
        }
    }

    /// Accounts collection.
    #[must_use]
    pub const fn accounts(&self) -> &AccountRepository {
        &self.accounts
    }

    /// Categories collection.
    #[must_use]
    pub const fn categories(&self) -> &CategoryRepository {
        &self.categories
    }

    /// Transactions collection.
    #[must_use]
    pub const fn transactions(&self) -> &TransactionRepository {
        &self.transactions
    }

    /// Budgets collection.
    #[must_use]
    pub const fn budgets(&self) -> &BudgetRepository {
        &self.budgets
    }

    /// Recurring payments collection.
    #[must_use]
    pub const fn recurring_payments(&self) -> &RecurringPaymentRepository {
        &self.recurring_payments
    }

    /// The signed-in identity.
    pub async fn identity(&self) -> Option<UserId> {
        *self.identity.lock().await
    }

    /// Switches identity.
    ///
    /// A new identity refetches every collection; `None` clears them all.
    /// Setting the current identity again does nothing.
    ///
    /// Collections switch while the session lock is held, so overlapping calls
    /// leave every collection on the identity [`identity`](Self::identity)
    /// reports. Fetches run after the lock is released; a fetch overtaken by
    /// a later switch is discarded.
    pub async fn set_identity(&self, identity: Option<UserId>) {
        {
            let mut current = self.identity.lock().await;
            if *current == identity {
                return;
            }
            *current = identity;
            tokio::join!(
                self.accounts.assign_identity(identity),
                self.categories.assign_identity(identity),
                self.transactions.assign_identity(identity),
                self.budgets.assign_identity(identity),
                self.recurring_payments.assign_identity(identity),
            );
        }

        match identity {
            Some(user_id) => {
                info!(user_id = %user_id, "Identity changed");
                self.refresh().await;
            }
            None => info!("Signed out"),
        }
    }

    /// Clears the identity and every collection.
    pub async fn sign_out(&self) {
        self.set_identity(None).await;
    }

    /// Refetches every collection.
    pub async fn refresh(&self) {
        tokio::join!(
            self.accounts.fetch(),
            self.categories.fetch(),
            self.transactions.fetch(),
            self.budgets.fetch(),
            self.recurring_payments.fetch(),
        );
    }

    /// Books the pending occurrence of a recurring payment as a transaction
    /// and advances the payment to its next date.
    ///
    /// # Errors
    ///
    /// Returns not-found for an unknown payment, a validation error for a
    /// paused payment or one whose category was deleted, or the store error.
    /// If the transaction is created but advancing fails, the transaction stays.
    pub async fn record_recurring_payment(
        &self,
        id: RecurringPaymentId,
    ) -> AppResult<(Transaction, RecurringPayment)> {
        let payment = self.recurring_payments.find(id).await.ok_or_else(|| {
            AppError::NotFound(format!("Recurring payment {id} is not in the collection"))
        })?;
        if !payment.is_active {
            return Err(AppError::Validation(format!(
                "Recurring payment '{}' is paused",
                payment.name
            )));
        }

        let transaction = self.transactions.create(payment.occurrence()?).await?;
        let payment = self.recurring_payments.advance(id).await?;
        info!(
            payment_id = %id,
            transaction_id = %transaction.id,
            "Recurring payment recorded"
        );
        Ok((transaction, payment))
    }

    /// Records every occurrence of active recurring payments due on or before `today`.
    ///
    /// A payment several periods behind is recorded once per missed period.
    ///
    /// # Errors
    ///
    /// Stops at the first failure; occurrences recorded before it remain.
    pub async fn record_due_payments(&self, today: NaiveDate) -> AppResult<Vec<Transaction>> {
        let mut recorded = Vec::new();
        for payment in self.recurring_payments.records().await {
            let mut next = payment;
            while next.is_due(today) {
                let (transaction, advanced) = self.record_recurring_payment(next.id).await?;
                recorded.push(transaction);
                next = advanced;
            }
        }
        Ok(recorded)
    }

    /// Deletes a category and refetches the collections that referenced it.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no identity or the store fails.
    pub async fn delete_category(&self, id: CategoryId) -> AppResult<()> {
        self.categories.delete(id).await?;
        tokio::join!(
            self.transactions.fetch(),
            self.budgets.fetch(),
            self.recurring_payments.fetch(),
        );
        Ok(())
    }

    /// Deletes an account and refetches the collections that referenced it.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no identity or the store fails.
    pub async fn delete_account(&self, id: AccountId) -> AppResult<()> {
        self.accounts.delete(id).await?;
        tokio::join!(self.transactions.fetch(), self.recurring_payments.fetch());
        Ok(())
    }

    /// Dashboard for `today` from the current snapshots.
    pub async fn dashboard(&self, today: NaiveDate) -> Dashboard {
        let accounts = self.accounts.records().await;
        let categories = self.categories.records().await;
        let transactions = self.transactions.records().await;
        let budgets = self.budgets.records().await;
        let recurring_payments = self.recurring_payments.records().await;

        ReportService::dashboard(
            Snapshots {
                accounts: &accounts,
                categories: &categories,
                transactions: &transactions,
                budgets: &budgets,
                recurring_payments: &recurring_payments,
            },
            today,
        )
    }
}
