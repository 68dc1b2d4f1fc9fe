//! Seeder for Clarity development and testing.
//!
//! Seeds the default categories and, for an identity with no transactions yet,
//! a demo account, a month of transactions, budgets, and recurring payments.
//!
//! Usage: CLARITY_USER_ID=<uuid> cargo run --bin seeder

use std::sync::Arc;

use anyhow::{Context, bail};
use chrono::{Datelike, Duration, Months, NaiveDate, Utc};
use clarity_core::models::{
    AccountType, Category, NewAccount, NewBudget, NewCategory, NewRecurringPayment,
    NewTransaction, TransactionType,
};
use clarity_core::period::{Frequency, PeriodType};
use clarity_db::{RestStore, Session};
use clarity_shared::AppConfig;
use clarity_shared::types::{AccountId, UserId};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Income category created alongside the defaults.
const SALARY_CATEGORY: &str = "Salary";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.filter.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let user_id: UserId = std::env::var("CLARITY_USER_ID")
        .context("CLARITY_USER_ID must be set in environment")?
        .parse()
        .context("CLARITY_USER_ID is not a UUID")?;

    let store = RestStore::new(&config.store)?;
    info!(url = %config.store.url, "Record store configured");

    let session = Session::new(Arc::new(store));
    session.set_identity(Some(user_id)).await;
    if let Some(error) = session.categories().error().await {
        bail!("Failed to load categories: {error}");
    }

    println!("Seeding default categories...");
    let created = session.categories().seed_defaults().await?;
    println!("  {created} categories created");

    if !session.transactions().records().await.is_empty() {
        println!("  Identity already has transactions, skipping demo data...");
        println!("Seeding complete!");
        return Ok(());
    }

    if category(&session.categories().records().await, SALARY_CATEGORY).is_err() {
        let mut salary = NewCategory::new(SALARY_CATEGORY);
        salary.icon = "💼".to_string();
        salary.color = "#10B981".to_string();
        session.categories().create(&salary).await?;
    }

    let categories = session.categories().records().await;
    let today = Utc::now().date_naive();

    println!("Seeding demo account...");
    let account = session
        .accounts()
        .create(&NewAccount::new("Main account", AccountType::Checking, dec!(5250)))
        .await?;

    println!("Seeding demo transactions...");
    seed_transactions(&session, &categories, account.id, today).await?;

    println!("Seeding demo budgets...");
    seed_budgets(&session, &categories, today).await?;

    println!("Seeding demo recurring payments...");
    seed_recurring(&session, &categories, today).await?;

    println!("Seeding complete!");
    Ok(())
}

fn category<'a>(categories: &'a [Category], name: &str) -> anyhow::Result<&'a Category> {
    categories
        .iter()
        .find(|c| c.name == name)
        .with_context(|| format!("Category '{name}' is missing"))
}

/// Seeds a month of transactions ending today.
async fn seed_transactions(
    session: &Session,
    categories: &[Category],
    account_id: AccountId,
    today: NaiveDate,
) -> anyhow::Result<()> {
    let entries: [(&str, TransactionType, Decimal, &str, i64); 8] = [
        (SALARY_CATEGORY, TransactionType::Income, dec!(4500), "Salary", 25),
        ("Food & Drinks", TransactionType::Expense, dec!(125), "Groceries", 20),
        ("Food & Drinks", TransactionType::Expense, dec!(45), "Lunch", 20),
        ("Transport", TransactionType::Expense, dec!(60), "Fuel", 14),
        ("Utilities", TransactionType::Expense, dec!(210.40), "Electricity", 10),
        ("Entertainment", TransactionType::Expense, dec!(45), "Streaming", 7),
        ("Clothing", TransactionType::Expense, dec!(189.99), "Shoes", 3),
        ("Food & Drinks", TransactionType::Expense, dec!(32.50), "Coffee beans", 1),
    ];

    for (name, transaction_type, amount, description, days_ago) in entries {
        let mut input = NewTransaction::new(
            category(categories, name)?.id,
            transaction_type,
            amount,
            description,
            today - Duration::days(days_ago),
        );
        input.account_id = Some(account_id);
        session.transactions().create(input).await?;
    }
    Ok(())
}

/// Seeds monthly budgets for the current month.
async fn seed_budgets(
    session: &Session,
    categories: &[Category],
    today: NaiveDate,
) -> anyhow::Result<()> {
    for (name, allocated) in [
        ("Food & Drinks", dec!(800)),
        ("Transport", dec!(300)),
        ("Entertainment", dec!(150)),
    ] {
        let input = NewBudget::for_period(
            category(categories, name)?.id,
            allocated,
            PeriodType::Monthly,
            today,
        );
        session.budgets().create(&input).await?;
    }
    Ok(())
}

/// Seeds recurring payments starting on the first of next month.
async fn seed_recurring(
    session: &Session,
    categories: &[Category],
    today: NaiveDate,
) -> anyhow::Result<()> {
    let next_month = today
        .with_day(1)
        .and_then(|first| first.checked_add_months(Months::new(1)))
        .context("Next month is out of range")?;

    for (name, direction, amount, frequency, category_name) in [
        ("Salary", TransactionType::Income, dec!(4500), Frequency::Monthly, SALARY_CATEGORY),
        ("Rent", TransactionType::Expense, dec!(1500), Frequency::Monthly, "Home & Garden"),
        ("Netflix", TransactionType::Expense, dec!(45), Frequency::Monthly, "Entertainment"),
        ("Internet", TransactionType::Expense, dec!(60), Frequency::Monthly, "Utilities"),
        ("Domain renewal", TransactionType::Expense, dec!(70), Frequency::Yearly, "Technology"),
    ] {
        let input = NewRecurringPayment::new(
            category(categories, category_name)?.id,
            name,
            direction,
            amount,
            frequency,
            next_month,
        );
        session.recurring_payments().create(input).await?;
    }
    Ok(())
}
