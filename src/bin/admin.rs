//! CLI administration tool for stay-booking.
//!
//! Manages the platform commission rate, shows booking statistics and runs
//! database checks without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Show the current commission rate
//! cargo run --bin admin -- rate show
//!
//! # Change the rate for future payments
//! cargo run --bin admin -- rate set 12.5 --note "partner terms"
//!
//! # Rate audit log
//! cargo run --bin admin -- rate history
//!
//! # Booking and commission counts
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string
//! - `DEFAULT_COMMISSION_RATE` (optional): rate reported while the audit log is empty

use stay_booking::application::services::CommissionService;
use stay_booking::config::{Config, mask_connection_string};
use stay_booking::domain::commission::CommissionRate;
use stay_booking::domain::entities::CommissionStatus;
use stay_booking::infrastructure::persistence::PgCommissionRepository;
use stay_booking::infrastructure::persistence::pg_booking_repository::status_counts;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use rust_decimal::Decimal;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing stay-booking.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage the platform commission rate
    Rate {
        #[command(subcommand)]
        action: RateAction,
    },

    /// Show booking and commission statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum RateAction {
    /// Show the rate in force
    Show,

    /// Replace the rate for future commission records
    Set {
        /// New rate in percent, between 0 and 100
        rate: Decimal,

        /// Reason recorded in the audit log
        #[arg(short, long)]
        note: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Show the rate audit log
    History,
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = Config::from_env().context("Invalid configuration")?;
    let database_url = config
        .database_url
        .clone()
        .context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .with_context(|| {
            format!(
                "Failed to connect to database at {}",
                mask_connection_string(&database_url)
            )
        })?;

    match cli.command {
        Commands::Rate { action } => handle_rate_action(action, &pool, &config).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Dispatches commission-rate commands.
async fn handle_rate_action(action: RateAction, pool: &PgPool, config: &Config) -> Result<()> {
    let default_rate = CommissionRate::new(config.default_commission_rate)
        .map_err(|e| anyhow::anyhow!("Invalid DEFAULT_COMMISSION_RATE: {}", e))?;
    let repo = Arc::new(PgCommissionRepository::new(Arc::new(pool.clone())));
    let service = CommissionService::new(repo, default_rate);

    match action {
        RateAction::Show => show_rate(&service).await?,
        RateAction::Set { rate, note, yes } => set_rate(&service, rate, note, yes).await?,
        RateAction::History => show_history(&service).await?,
    }

    Ok(())
}

async fn show_rate(service: &CommissionService) -> Result<()> {
    let snapshot = service
        .current_rate()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load rate: {}", e))?;

    println!("{}", "💰 Commission Rate".bright_blue().bold());
    println!();
    println!(
        "  Rate:    {}",
        format!("{}%", snapshot.rate).bright_green().bold()
    );
    match (snapshot.version, snapshot.changed_at) {
        (Some(version), Some(changed_at)) => {
            println!("  Version: {}", version.to_string().bright_black());
            println!(
                "  Changed: {}",
                changed_at.format("%Y-%m-%d %H:%M").to_string().bright_black()
            );
        }
        _ => println!("  Source:  {}", "configured default".yellow()),
    }
    println!();

    Ok(())
}

/// Changes the commission rate after confirmation.
///
/// Existing commission records keep the rate they were created with; only
/// bookings paid after the change use the new rate.
async fn set_rate(
    service: &CommissionService,
    rate: Decimal,
    note: Option<String>,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "✏️  Change Commission Rate".bright_blue().bold());
    println!();

    let current = service
        .current_rate()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load rate: {}", e))?;

    println!("  Current: {}", format!("{}%", current.rate).cyan());
    println!("  New:     {}", format!("{rate}%").bright_yellow().bold());
    if let Some(note) = &note {
        println!("  Note:    {}", note.bright_black());
    }
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Apply this rate to future payments?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let change = service
        .set_rate(rate, note)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to set rate: {}", e))?;

    println!();
    println!(
        "{} {}",
        "✅ Rate updated, version".green().bold(),
        change.id.to_string().green().bold()
    );
    println!();

    Ok(())
}

/// Prints the rate audit log, newest first.
///
/// ```text
/// 📜 Rate History
///
///   Ver  Changed            Previous  Rate      Note
///   ─────────────────────────────────────────────────────────
///   2    2024-06-03 10:30   10        15        summer terms
///   1    2024-05-01 09:00   -         10
/// ```
async fn show_history(service: &CommissionService) -> Result<()> {
    println!("{}", "📜 Rate History".bright_blue().bold());
    println!();

    let history = service
        .rate_history()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load history: {}", e))?;

    if history.is_empty() {
        println!("{}", "  No rate changes recorded".yellow());
        println!();
        return Ok(());
    }

    println!(
        "  {:<4} {:<18} {:<9} {:<9} {}",
        "Ver".bright_white().bold(),
        "Changed".bright_white().bold(),
        "Previous".bright_white().bold(),
        "Rate".bright_white().bold(),
        "Note".bright_white().bold()
    );
    println!("  {}", "─".repeat(60).bright_black());

    for change in &history {
        let previous = change
            .previous_rate
            .map(|r| r.to_string())
            .unwrap_or_else(|| "-".to_string());

        println!(
            "  {:<4} {:<18} {:<9} {:<9} {}",
            change.id.to_string().bright_black(),
            change
                .changed_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            previous,
            change.rate.to_string().cyan(),
            change.note.as_deref().unwrap_or("")
        );
    }
    println!();

    Ok(())
}

/// Displays booking counts by status and commission totals.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let accommodations: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM accommodations")
        .fetch_one(pool)
        .await?;

    println!(
        "  Accommodations: {}",
        accommodations.to_string().bright_green().bold()
    );
    println!();

    let counts = status_counts(pool)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count bookings: {}", e))?;

    println!(
        "  {:<12} {:<10} {}",
        "Booking".bright_white().bold(),
        "Payment".bright_white().bold(),
        "Count".bright_white().bold()
    );
    println!("  {}", "─".repeat(32).bright_black());
    for (status, payment_status, count) in &counts {
        println!(
            "  {:<12} {:<10} {}",
            status.as_str(),
            payment_status.as_str(),
            count.to_string().bright_green()
        );
    }
    println!();

    let commission_totals: Vec<(String, i64, Option<i64>)> = sqlx::query_as(
        r#"
        SELECT status, COUNT(*), SUM(commission_amount)::BIGINT
        FROM commission_records
        GROUP BY status
        ORDER BY status
        "#,
    )
    .fetch_all(pool)
    .await?;

    for (status, count, amount) in &commission_totals {
        let label = status
            .parse::<CommissionStatus>()
            .map(|s| s.as_str())
            .unwrap_or("unknown");
        println!(
            "  Commissions {:<10} {} records, {} total",
            label,
            count.to_string().bright_green().bold(),
            amount.unwrap_or(0).to_string().bright_green()
        );
    }
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;
            let migrations: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Migrations: {}", migrations.to_string().bright_white());
            println!();
        }
    }

    Ok(())
}
