//! Prints the dashboard, category spending, and calendar for one month.
//!
//! Usage: CLARITY_USER_ID=<uuid> cargo run --bin report [YYYY-MM-DD]
//!
//! The optional date picks the day the dashboard is built for; it defaults to today.

use std::sync::Arc;

use anyhow::{Context, bail};
use chrono::{NaiveDate, Utc};
use clarity_core::calendar::{CalendarMonth, group_by_day};
use clarity_core::reports::ReportService;
use clarity_db::{RestStore, Session};
use clarity_shared::AppConfig;
use clarity_shared::types::UserId;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

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

    let today = match std::env::args().nth(1) {
        Some(arg) => arg
            .parse::<NaiveDate>()
            .with_context(|| format!("'{arg}' is not a YYYY-MM-DD date"))?,
        None => Utc::now().date_naive(),
    };

    let session = Session::new(Arc::new(RestStore::new(&config.store)?));
    session.set_identity(Some(user_id)).await;
    info!(user_id = %user_id, as_of = %today, "Collections loaded");

    for (table, error) in [
        ("accounts", session.accounts().error().await),
        ("categories", session.categories().error().await),
        ("transactions", session.transactions().error().await),
        ("budgets", session.budgets().error().await),
        ("recurring payments", session.recurring_payments().error().await),
    ] {
        if let Some(error) = error {
            bail!("Failed to load {table}: {error}");
        }
    }

    let dashboard = session.dashboard(today).await;
    let totals = &dashboard.month_totals;

    println!("Clarity dashboard for {}", dashboard.month);
    println!();
    println!("  Income     {:>12}", totals.total_income);
    println!("  Expenses   {:>12}", totals.total_expenses);
    println!("  Net        {:>12}", totals.net);
    println!("  Count      {:>12}", totals.total_transactions);

    println!();
    println!("Balances");
    for (currency, balance) in &dashboard.balances {
        println!("  {currency:<8} {balance:>12}");
    }

    println!();
    println!("Recent transactions");
    for t in &dashboard.recent_transactions {
        println!("  {}  {:>10}  {}", t.transaction_date, t.amount, t.description);
    }

    println!();
    println!("Budgets");
    for b in &dashboard.top_budgets {
        println!(
            "  {} {:<20} {:>10} / {:<10} {:>6}%  {:?}",
            b.category_icon,
            b.category_name,
            b.spent_amount,
            b.allocated_amount,
            b.utilization_percentage,
            b.status
        );
    }
    let overview = &dashboard.budget_overview;
    println!(
        "  Total {} / {} ({}%), {} over budget",
        overview.total_spent,
        overview.total_allocated,
        overview.utilization_percentage,
        overview.over_budget_count
    );

    println!();
    println!("Category spending");
    let categories = session.categories().records().await;
    let transactions = session.transactions().records().await;
    let spending = ReportService::category_spending(&categories, &transactions, dashboard.month);
    for s in spending.iter().filter(|s| s.transaction_count > 0) {
        println!(
            "  {} {:<20} {:>10} in {} (avg {})",
            s.icon, s.name, s.total_spent, s.transaction_count, s.average_amount
        );
    }
    let category_overview =
        ReportService::category_overview(&spending, &transactions, dashboard.month);
    println!(
        "  Uncategorized {}, limits used {}%",
        category_overview.uncategorized_spent, category_overview.utilization_percentage
    );

    println!();
    println!("Recurring payments");
    let recurring = &dashboard.recurring;
    println!(
        "  {} active, {} paused, net {} per cycle",
        recurring.active_count, recurring.inactive_count, recurring.net
    );
    for p in &dashboard.due_payments {
        println!("  Due: {} {} on {}", p.name, p.amount, p.next_payment_date);
    }

    println!();
    println!("Calendar");
    let grid = CalendarMonth::new(dashboard.month);
    let days = group_by_day(&transactions);
    println!("  Su Mo Tu We Th Fr Sa");
    for week in grid.cells().chunks(7) {
        let line: String = week
            .iter()
            .map(|cell| match cell {
                Some(day) => {
                    let busy = grid.date(*day).is_some_and(|date| days.contains_key(&date));
                    format!("{day:>2}{}", if busy { '*' } else { ' ' })
                }
                None => "   ".to_string(),
            })
            .collect();
        println!("  {}", line.trim_end());
    }
    Ok(())
}
